//! Agent population: fixed-size, group-partitioned set of state vectors.
//!
//! The first `N / 2` agents are dominant, the remainder suppressed. Group
//! membership never changes during a run, and every agent belongs to
//! exactly one group.

use civmodel_core::config::RunConfig;
use civmodel_core::types::{AgentId, GroupKind, MeanState};
use rand::Rng;

/// One member of the population.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub group: GroupKind,
    pub state: Vec<f64>,
}

/// The population of agents for a single run.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
    dimensions: usize,
}

impl Population {
    /// Draw the initial population from each group's initial range.
    ///
    /// The config must already be validated.
    pub fn initialize<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Self {
        let n = config.population;
        let d = config.dimensions;
        let dominant = n / 2;

        let agents = (0..n)
            .map(|i| {
                let group = if i < dominant {
                    GroupKind::Dominant
                } else {
                    GroupKind::Suppressed
                };
                let (lo, hi) = config.profile(group).initial_range;
                let state = (0..d).map(|_| lo + (hi - lo) * rng.gen::<f64>()).collect();
                Agent {
                    id: AgentId(i),
                    group,
                    state,
                }
            })
            .collect();

        Self { agents, dimensions: d }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Number of agents in a group.
    pub fn group_size(&self, group: GroupKind) -> usize {
        self.agents.iter().filter(|a| a.group == group).count()
    }

    /// Mean state over every agent.
    pub fn mean(&self) -> MeanState {
        MeanState::mean_of(self.agents.iter().map(|a| a.state.as_slice()), self.dimensions)
            .unwrap_or_else(|| MeanState::zeros(self.dimensions))
    }

    /// Mean state of one group, or `None` if the group is empty.
    pub fn group_mean(&self, group: GroupKind) -> Option<MeanState> {
        MeanState::mean_of(
            self.agents
                .iter()
                .filter(|a| a.group == group)
                .map(|a| a.state.as_slice()),
            self.dimensions,
        )
    }

    /// Distance between the dominant and suppressed group means.
    ///
    /// Zero when either group is empty.
    pub fn divergence(&self) -> f64 {
        match (
            self.group_mean(GroupKind::Dominant),
            self.group_mean(GroupKind::Suppressed),
        ) {
            (Some(dominant), Some(suppressed)) => dominant.distance_to(&suppressed),
            _ => 0.0,
        }
    }
}

/// Draw from the standard normal distribution (Box-Muller transform).
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
