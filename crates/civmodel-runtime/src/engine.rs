//! Simulation engine: stochastic agent dynamics and innovation detection.
//!
//! Each step:
//! 1. Every agent moves with probability `exploration_prob`: a Gaussian
//!    perturbation scaled by its group's noise and gate, plus a pull towards
//!    the institution that activation weakens for suppressed agents
//! 2. States are clamped into `state_bounds`
//! 3. The new population mean is compared with the recorded history; it is
//!    an innovation when its minimum distance exceeds the threshold
//! 4. The mean is appended to history and the institution follows it
//! 5. Synergy is computed from activation and the current group divergence
//!
//! A run is fully determined by its configuration and seed.

use crate::metrics;
use crate::population::{standard_normal, Population};
use civmodel_core::config::RunConfig;
use civmodel_core::error::{CivError, Result};
use civmodel_core::types::{GroupKind, MeanState, RunSummary, StepRecord, SystemState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, trace};

/// Output of one `Engine::run` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    /// Innovation flag per step.
    pub innovations: Vec<bool>,
    /// Synergy multiplier per step.
    pub synergies: Vec<f64>,
    /// Full per-step records, including mean-states.
    pub records: Vec<StepRecord>,
    pub summary: RunSummary,
}

/// The simulation engine for a single run.
pub struct Engine {
    config: RunConfig,
    rng: ChaCha8Rng,
    population: Population,
    institution: MeanState,
    history: Vec<MeanState>,
    threshold: f64,
    step_count: u64,
    innovation_count: u64,
}

impl Engine {
    /// Validate the configuration and build the initial population.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let population = Population::initialize(&config, &mut rng);
        let d = config.dimensions;

        let dominant = population
            .group_mean(GroupKind::Dominant)
            .unwrap_or_else(|| MeanState::zeros(d));
        let suppressed = population
            .group_mean(GroupKind::Suppressed)
            .unwrap_or_else(|| MeanState::zeros(d));
        let institution = dominant.blend(&suppressed, config.institution.dominant_bias);

        let history = vec![population.mean()];
        let threshold = config.innovation_threshold();

        debug!(
            population = config.population,
            dimensions = d,
            exploration = config.exploration,
            activation = config.activation,
            seed = config.seed,
            threshold,
            "engine initialized"
        );

        Ok(Self {
            config,
            rng,
            population,
            institution,
            history,
            threshold,
            step_count: 0,
            innovation_count: 0,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Every recorded mean-state, starting with the initial one.
    pub fn history(&self) -> &[MeanState] {
        &self.history
    }

    pub fn institution(&self) -> &MeanState {
        &self.institution
    }

    /// Innovation threshold in effect for this run.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn innovation_count(&self) -> u64 {
        self.innovation_count
    }

    /// Current distance between the group means.
    pub fn divergence(&self) -> f64 {
        self.population.divergence()
    }

    /// Current synergy multiplier.
    pub fn synergy(&self) -> f64 {
        self.config
            .synergy
            .evaluate(self.config.activation, self.divergence())
    }

    /// Advance the simulation by one step.
    pub fn step(&mut self) -> StepRecord {
        self.move_agents();

        let mean = self.population.mean();
        let novelty = self.novelty(&mean);
        let innovation = novelty > self.threshold;

        self.history.push(mean.clone());
        let lr = self.config.institution.learning_rate;
        self.institution = mean.blend(&self.institution, lr);

        let divergence = self.population.divergence();
        let synergy = self.config.synergy.evaluate(self.config.activation, divergence);

        self.step_count += 1;
        if innovation {
            self.innovation_count += 1;
            trace!(step = self.step_count, novelty, threshold = self.threshold, "innovation");
        }

        StepRecord {
            step: self.step_count,
            innovation,
            synergy,
            divergence,
            novelty,
            mean_state: mean,
        }
    }

    /// Run `steps` steps in order and summarize them.
    ///
    /// Repeated calls continue from the current state; each summary covers
    /// only its own call.
    pub fn run(&mut self, steps: usize) -> Result<RunOutput> {
        if steps == 0 {
            return Err(CivError::InvalidStepCount(steps));
        }

        let mut records = Vec::with_capacity(steps);
        for _ in 0..steps {
            records.push(self.step());
        }

        let summary = metrics::summarize(&records, self.config.warmup_steps, self.config.dimensions);
        debug!(
            steps,
            innovations = summary.total_innovations,
            innovation_rate = summary.innovation_rate,
            mean_synergy = summary.mean_synergy,
            "run complete"
        );

        Ok(RunOutput {
            innovations: records.iter().map(|r| r.innovation).collect(),
            synergies: records.iter().map(|r| r.synergy).collect(),
            records,
            summary,
        })
    }

    /// Snapshot of the current state for analysis.
    pub fn system_state(&self) -> SystemState {
        SystemState {
            dominant_mean: self.population.group_mean(GroupKind::Dominant),
            suppressed_mean: self.population.group_mean(GroupKind::Suppressed),
            system_mean: self.population.mean(),
            institution: self.institution.clone(),
            divergence: self.divergence(),
            synergy: self.synergy(),
            threshold: self.threshold,
            innovation_count: self.innovation_count,
            step_count: self.step_count,
        }
    }

    fn move_agents(&mut self) {
        let prob = self.config.exploration_prob;
        let pull = self.config.institution.pull_strength;
        let (lo, hi) = self.config.state_bounds;

        // (noise std, institution responsiveness) per group
        let dynamics = |group: GroupKind| {
            let profile = self.config.profile(group);
            let gate = self.config.gate(group);
            (
                profile.noise_scale * gate,
                pull * (1.0 - gate * profile.pull_damping),
            )
        };
        let dominant = dynamics(GroupKind::Dominant);
        let suppressed = dynamics(GroupKind::Suppressed);

        let rng = &mut self.rng;
        let institution = self.institution.as_slice();
        for agent in self.population.agents_mut() {
            if rng.gen::<f64>() >= prob {
                continue;
            }
            let (noise, responsiveness) = match agent.group {
                GroupKind::Dominant => dominant,
                GroupKind::Suppressed => suppressed,
            };
            for (x, &centre) in agent.state.iter_mut().zip(institution) {
                let step = standard_normal(rng) * noise + (centre - *x) * responsiveness;
                *x = (*x + step).clamp(lo, hi);
            }
        }
    }

    /// Minimum distance from `mean` to the consulted history.
    fn novelty(&self, mean: &MeanState) -> f64 {
        let start = match self.config.history_window {
            Some(window) => self.history.len().saturating_sub(window),
            None => 0,
        };
        self.history[start..]
            .iter()
            .map(|past| mean.distance_to(past))
            .fold(f64::INFINITY, f64::min)
    }
}
