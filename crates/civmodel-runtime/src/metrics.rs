//! Run-level statistics computed from emitted step records.

use civmodel_core::types::{MeanState, RunSummary, StepRecord};
use serde::{Deserialize, Serialize};

/// Summarize the records produced by one `run` call.
///
/// The innovation rate covers the steps after `warmup` when there are any,
/// otherwise every step. `records` must be non-empty.
pub fn summarize(records: &[StepRecord], warmup: usize, dimensions: usize) -> RunSummary {
    let steps = records.len();
    let total_innovations = records.iter().filter(|r| r.innovation).count();

    let innovation_rate = if steps > warmup {
        let counted = records[warmup..].iter().filter(|r| r.innovation).count();
        counted as f64 / (steps - warmup) as f64
    } else if steps > 0 {
        total_innovations as f64 / steps as f64
    } else {
        0.0
    };

    let mean_synergy = if steps > 0 {
        records.iter().map(|r| r.synergy).sum::<f64>() / steps as f64
    } else {
        0.0
    };

    let (final_mean_state, final_divergence) = records
        .last()
        .map(|r| (r.mean_state.clone(), r.divergence))
        .unwrap_or_else(|| (MeanState::zeros(dimensions), 0.0));

    RunSummary {
        steps,
        warmup,
        total_innovations,
        innovation_rate,
        mean_synergy,
        final_mean_state,
        final_divergence,
    }
}

/// Moving-average innovation rate over a sliding window.
///
/// Produces `flags.len() - window + 1` values; empty when the sequence is
/// shorter than the window.
pub fn rolling_rate(flags: &[bool], window: usize) -> Vec<f64> {
    if window == 0 || flags.len() < window {
        return Vec::new();
    }
    let mut count = flags[..window].iter().filter(|&&f| f).count();
    let mut rates = Vec::with_capacity(flags.len() - window + 1);
    rates.push(count as f64 / window as f64);
    for i in window..flags.len() {
        if flags[i] {
            count += 1;
        }
        if flags[i - window] {
            count -= 1;
        }
        rates.push(count as f64 / window as f64);
    }
    rates
}

/// Gaps (in steps) between consecutive innovations.
pub fn innovation_intervals(flags: &[bool]) -> Vec<usize> {
    let positions: Vec<usize> = flags
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i))
        .collect();
    positions.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Mean and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stat {
    pub mean: f64,
    pub std: f64,
}

impl Stat {
    /// Reduce samples in the order given. Empty input yields zeros.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: variance.sqrt(),
        }
    }
}
