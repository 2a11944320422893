//! Shared types used across the engine and the scanner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an agent within its population. Stable for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

/// Group membership of an agent.
///
/// Assigned at construction and immutable for the run. Every per-group
/// parameter is looked up through the kind, so further kinds only need a
/// new variant and a matching profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Historically dominant group; movement scaled by exploration freedom.
    Dominant,
    /// Historically suppressed group; movement gated by activation.
    Suppressed,
}

impl GroupKind {
    /// All group kinds, in population order.
    pub const ALL: [GroupKind; 2] = [GroupKind::Dominant, GroupKind::Suppressed];

    pub fn label(&self) -> &'static str {
        match self {
            GroupKind::Dominant => "dominant",
            GroupKind::Suppressed => "suppressed",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A point in the d-dimensional cognitive state space.
///
/// Used for population and group means and for the institutional centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeanState(pub Vec<f64>);

impl MeanState {
    pub fn zeros(dimensions: usize) -> Self {
        Self(vec![0.0; dimensions])
    }

    /// Arithmetic mean of a set of equally sized vectors.
    ///
    /// Returns `None` when `vectors` is empty.
    pub fn mean_of<'a, I>(vectors: I, dimensions: usize) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let mut sum = vec![0.0; dimensions];
        let mut count = 0usize;
        for v in vectors {
            for (acc, x) in sum.iter_mut().zip(v) {
                *acc += x;
            }
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        sum.iter_mut().for_each(|x| *x /= n);
        Some(Self(sum))
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Euclidean distance to another state.
    pub fn distance_to(&self, other: &MeanState) -> f64 {
        euclidean_distance(&self.0, &other.0)
    }

    /// Convex combination `weight * self + (1 - weight) * other`.
    pub fn blend(&self, other: &MeanState, weight: f64) -> MeanState {
        MeanState(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| weight * a + (1.0 - weight) * b)
                .collect(),
        )
    }

    pub fn norm(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

/// Euclidean distance between two vectors of equal length.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// One simulation step, as emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step index since the engine was constructed.
    pub step: u64,
    pub innovation: bool,
    pub synergy: f64,
    /// Distance between the dominant and suppressed group means.
    pub divergence: f64,
    /// Minimum distance from the new mean-state to the consulted history.
    pub novelty: f64,
    pub mean_state: MeanState,
}

/// Read-only statistics for one completed `run` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: usize,
    /// Leading steps excluded from `innovation_rate`.
    pub warmup: usize,
    pub total_innovations: usize,
    pub innovation_rate: f64,
    pub mean_synergy: f64,
    pub final_mean_state: MeanState,
    pub final_divergence: f64,
}

/// Snapshot of the engine's internal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub dominant_mean: Option<MeanState>,
    pub suppressed_mean: Option<MeanState>,
    pub system_mean: MeanState,
    pub institution: MeanState,
    pub divergence: f64,
    pub synergy: f64,
    pub threshold: f64,
    pub innovation_count: u64,
    pub step_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_vectors() {
        let a = [1.0, 2.0];
        let b = [3.0, 6.0];
        let m = MeanState::mean_of([&a[..], &b[..]], 2).unwrap();
        assert_eq!(m, MeanState(vec![2.0, 4.0]));
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert!(MeanState::mean_of(std::iter::empty::<&[f64]>(), 3).is_none());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = MeanState(vec![0.0, 0.0]);
        let b = MeanState(vec![3.0, 4.0]);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn blend_weights_first_operand() {
        let a = MeanState(vec![1.0]);
        let b = MeanState(vec![0.0]);
        assert!((a.blend(&b, 0.7).0[0] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn group_kind_serializes_snake_case() {
        let json = serde_json::to_string(&GroupKind::Suppressed).unwrap();
        assert_eq!(json, "\"suppressed\"");
        assert_eq!(GroupKind::Dominant.to_string(), "dominant");
    }
}
