//! Run configuration for the simulation engine.
//!
//! A `RunConfig` is an immutable value passed explicitly to every engine.
//! There is no shared mutable default table: defaults come from
//! `RunConfig::default()` and overrides from the `with_*` methods, presets
//! or a deserialized TOML/JSON document.

use crate::error::{CivError, Result};
use crate::threshold::ThresholdSchedule;
use crate::types::GroupKind;
use serde::{Deserialize, Serialize};

/// Per-group behavioural parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupProfile {
    /// Standard deviation of the unit perturbation before gating.
    pub noise_scale: f64,
    /// Uniform range for each initial state component.
    pub initial_range: (f64, f64),
    /// How strongly the group's gate weakens the institutional pull
    /// (`pull * (1 - gate * damping)`).
    pub pull_damping: f64,
}

impl GroupProfile {
    pub fn dominant() -> Self {
        Self {
            noise_scale: 0.6,
            initial_range: (-0.5, 0.0),
            pull_damping: 0.0,
        }
    }

    pub fn suppressed() -> Self {
        Self {
            noise_scale: 0.6,
            initial_range: (-0.8, -0.3),
            pull_damping: 0.8,
        }
    }

    fn validate(&self, group: GroupKind) -> Result<()> {
        let field = |name: &str| format!("{}.{}", group.label(), name);
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(CivError::invalid_config(
                field("noise_scale"),
                format!("must be non-negative, got {}", self.noise_scale),
            ));
        }
        let (lo, hi) = self.initial_range;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(CivError::invalid_config(
                field("initial_range"),
                format!("must be a finite range with low <= high, got ({}, {})", lo, hi),
            ));
        }
        if !(0.0..=1.0).contains(&self.pull_damping) {
            return Err(CivError::invalid_config(
                field("pull_damping"),
                format!("must be within [0, 1], got {}", self.pull_damping),
            ));
        }
        Ok(())
    }
}

/// The institutional centre that agents are pulled towards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstitutionConfig {
    /// Fraction of the distance to the institution covered per move (default: 0.05).
    pub pull_strength: f64,
    /// Rate at which the institution follows the population mean (default: 0.04).
    pub learning_rate: f64,
    /// Initial weight of the dominant group mean in the institution (default: 0.7).
    pub dominant_bias: f64,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            pull_strength: 0.05,
            learning_rate: 0.04,
            dominant_bias: 0.7,
        }
    }
}

/// Synergy multiplier coefficients.
///
/// `synergy = 1 + alpha * activation + beta * divergence`, optionally gated
/// by a minimum activation and capped by an upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynergyConfig {
    /// Weight on activation (default: 0.5).
    pub alpha: f64,
    /// Weight on group divergence (default: 2.0).
    pub beta: f64,
    /// Below this activation the synergy is exactly 1.0 (default: 0.0).
    pub activation_gate: f64,
    /// Optional cap on the multiplier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
}

impl Default for SynergyConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 2.0,
            activation_gate: 0.0,
            upper_bound: None,
        }
    }
}

impl SynergyConfig {
    /// Synergy for the given activation and divergence.
    pub fn evaluate(&self, activation: f64, divergence: f64) -> f64 {
        if activation < self.activation_gate {
            return 1.0;
        }
        let synergy = 1.0 + self.alpha * activation + self.beta * divergence;
        match self.upper_bound {
            Some(cap) => synergy.min(cap),
            None => synergy,
        }
    }
}

/// Complete configuration of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Exploration freedom of the dominant group, in [0, 1] (default: 0.5).
    pub exploration: f64,
    /// Activation of the suppressed group, in [0, 1] (default: 0.0).
    pub activation: f64,
    /// Number of agents (default: 100).
    pub population: usize,
    /// Dimensionality of the cognitive state space (default: 4).
    pub dimensions: usize,
    /// Seed for the run's random stream (default: 42).
    pub seed: u64,
    /// Probability that an agent moves in a given step (default: 0.5).
    pub exploration_prob: f64,
    /// Component-wise clamp applied after every move (default: (-1, 1)).
    pub state_bounds: (f64, f64),
    pub dominant: GroupProfile,
    pub suppressed: GroupProfile,
    pub institution: InstitutionConfig,
    pub threshold: ThresholdSchedule,
    pub synergy: SynergyConfig,
    /// Compare against only the most recent N mean-states. `None` means the
    /// whole history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_window: Option<usize>,
    /// Leading steps excluded from the innovation rate (default: 0).
    pub warmup_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            exploration: 0.5,
            activation: 0.0,
            population: 100,
            dimensions: 4,
            seed: 42,
            exploration_prob: 0.5,
            state_bounds: (-1.0, 1.0),
            dominant: GroupProfile::dominant(),
            suppressed: GroupProfile::suppressed(),
            institution: InstitutionConfig::default(),
            threshold: ThresholdSchedule::default(),
            synergy: SynergyConfig::default(),
            history_window: None,
            warmup_steps: 0,
        }
    }
}

impl RunConfig {
    pub fn new(exploration: f64, activation: f64) -> Self {
        Self {
            exploration,
            activation,
            ..Default::default()
        }
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_activation(mut self, activation: f64) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the same noise scale on every group.
    pub fn with_noise_scale(mut self, noise_scale: f64) -> Self {
        self.dominant.noise_scale = noise_scale;
        self.suppressed.noise_scale = noise_scale;
        self
    }

    pub fn with_threshold(mut self, threshold: ThresholdSchedule) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_synergy(mut self, synergy: SynergyConfig) -> Self {
        self.synergy = synergy;
        self
    }

    pub fn with_history_window(mut self, window: Option<usize>) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_warmup(mut self, warmup_steps: usize) -> Self {
        self.warmup_steps = warmup_steps;
        self
    }

    /// Profile for a group kind.
    pub fn profile(&self, group: GroupKind) -> &GroupProfile {
        match group {
            GroupKind::Dominant => &self.dominant,
            GroupKind::Suppressed => &self.suppressed,
        }
    }

    /// The control parameter that gates a group's movement.
    pub fn gate(&self, group: GroupKind) -> f64 {
        match group {
            GroupKind::Dominant => self.exploration,
            GroupKind::Suppressed => self.activation,
        }
    }

    /// Innovation threshold implied by the configured activation.
    pub fn innovation_threshold(&self) -> f64 {
        self.threshold.at(self.activation)
    }

    /// Check every parameter against its valid range.
    pub fn validate(&self) -> Result<()> {
        unit_interval("exploration", self.exploration)?;
        unit_interval("activation", self.activation)?;
        unit_interval("exploration_prob", self.exploration_prob)?;

        if self.population == 0 {
            return Err(CivError::invalid_config("population", "must be positive, got 0"));
        }
        if self.dimensions == 0 {
            return Err(CivError::invalid_config("dimensions", "must be positive, got 0"));
        }

        let (lo, hi) = self.state_bounds;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(CivError::invalid_config(
                "state_bounds",
                format!("must be a finite range with low < high, got ({}, {})", lo, hi),
            ));
        }

        for group in GroupKind::ALL {
            self.profile(group).validate(group)?;
        }

        unit_interval("institution.pull_strength", self.institution.pull_strength)?;
        unit_interval("institution.learning_rate", self.institution.learning_rate)?;
        unit_interval("institution.dominant_bias", self.institution.dominant_bias)?;

        self.threshold.validate()?;

        let synergy = &self.synergy;
        for (field, value) in [
            ("synergy.alpha", synergy.alpha),
            ("synergy.beta", synergy.beta),
            ("synergy.activation_gate", synergy.activation_gate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CivError::invalid_config(
                    field,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }
        if let Some(cap) = synergy.upper_bound {
            if !cap.is_finite() || cap < 1.0 {
                return Err(CivError::invalid_config(
                    "synergy.upper_bound",
                    format!("must be at least 1.0, got {}", cap),
                ));
            }
        }

        if self.history_window == Some(0) {
            return Err(CivError::invalid_config("history_window", "must be positive when set"));
        }

        Ok(())
    }
}

fn unit_interval(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CivError::invalid_config(
            field,
            format!("must be within [0, 1], got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_controls() {
        let err = RunConfig::new(1.5, 0.0).validate().unwrap_err();
        assert_eq!(err.field(), Some("exploration"));

        let err = RunConfig::new(0.5, -0.1).validate().unwrap_err();
        assert_eq!(err.field(), Some("activation"));

        let err = RunConfig::new(f64::NAN, 0.0).validate().unwrap_err();
        assert_eq!(err.field(), Some("exploration"));
    }

    #[test]
    fn rejects_empty_population_and_space() {
        let err = RunConfig::default().with_population(0).validate().unwrap_err();
        assert_eq!(err.field(), Some("population"));

        let err = RunConfig::default().with_dimensions(0).validate().unwrap_err();
        assert_eq!(err.field(), Some("dimensions"));
    }

    #[test]
    fn rejects_negative_noise() {
        let mut config = RunConfig::default();
        config.suppressed.noise_scale = -0.1;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("suppressed.noise_scale"));
    }

    #[test]
    fn silenced_noise_is_valid() {
        assert!(RunConfig::default().with_noise_scale(0.0).validate().is_ok());
    }

    #[test]
    fn rejects_zero_history_window() {
        let err = RunConfig::default()
            .with_history_window(Some(0))
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("history_window"));
    }

    #[test]
    fn gate_follows_group_kind() {
        let config = RunConfig::new(0.7, 0.2);
        assert_eq!(config.gate(GroupKind::Dominant), 0.7);
        assert_eq!(config.gate(GroupKind::Suppressed), 0.2);
    }

    #[test]
    fn synergy_gate_and_cap() {
        let synergy = SynergyConfig {
            activation_gate: 0.4,
            upper_bound: Some(3.0),
            ..Default::default()
        };
        assert_eq!(synergy.evaluate(0.3, 0.5), 1.0);
        assert!((synergy.evaluate(0.6, 0.5) - 2.3).abs() < 1e-12);
        assert_eq!(synergy.evaluate(1.0, 5.0), 3.0);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: RunConfig = toml::from_str(
            r#"
            exploration = 0.75
            activation = 0.3

            [threshold]
            base = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(config.exploration, 0.75);
        assert_eq!(config.population, 100);
        assert_eq!(config.threshold.base, 0.05);
        assert_eq!(config.threshold.floor, 0.01);
    }

    #[test]
    fn unknown_keys_fail_fast() {
        let parsed: std::result::Result<RunConfig, _> = toml::from_str("male_space = 0.4");
        assert!(parsed.is_err());
    }
}
