//! Innovation-detection threshold as a function of activation.
//!
//! Activated cognitive diversity lowers the bar for qualitative change: the
//! threshold is non-increasing in activation, never negative, and never
//! above its configured base.

use crate::error::{CivError, Result};
use serde::{Deserialize, Serialize};

/// How the threshold decays as activation grows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdDecay {
    /// `base * (1 - modulation * activation)`.
    Linear { modulation: f64 },
    /// `base * exp(-rate * activation)`.
    Exponential { rate: f64 },
}

impl Default for ThresholdDecay {
    fn default() -> Self {
        ThresholdDecay::Linear { modulation: 0.8 }
    }
}

/// Threshold schedule: base level, lower floor and decay form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdSchedule {
    /// Threshold at zero activation (default: 0.06).
    pub base: f64,
    /// Lowest value the threshold may reach (default: 0.01).
    pub floor: f64,
    pub decay: ThresholdDecay,
}

impl Default for ThresholdSchedule {
    fn default() -> Self {
        Self {
            base: 0.06,
            floor: 0.01,
            decay: ThresholdDecay::default(),
        }
    }
}

impl ThresholdSchedule {
    pub fn linear(base: f64, modulation: f64) -> Self {
        Self {
            base,
            decay: ThresholdDecay::Linear { modulation },
            ..Default::default()
        }
    }

    pub fn exponential(base: f64, rate: f64) -> Self {
        Self {
            base,
            decay: ThresholdDecay::Exponential { rate },
            ..Default::default()
        }
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Threshold for the given activation level, clamped into `[floor, base]`.
    pub fn at(&self, activation: f64) -> f64 {
        let raw = match self.decay {
            ThresholdDecay::Linear { modulation } => self.base * (1.0 - modulation * activation),
            ThresholdDecay::Exponential { rate } => self.base * (-rate * activation).exp(),
        };
        raw.max(self.floor).min(self.base)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base.is_finite() || self.base <= 0.0 {
            return Err(CivError::invalid_config(
                "threshold.base",
                format!("must be positive, got {}", self.base),
            ));
        }
        if !self.floor.is_finite() || self.floor < 0.0 || self.floor > self.base {
            return Err(CivError::invalid_config(
                "threshold.floor",
                format!("must be within [0, base={}], got {}", self.base, self.floor),
            ));
        }
        match self.decay {
            ThresholdDecay::Linear { modulation } if !modulation.is_finite() || modulation < 0.0 => {
                Err(CivError::invalid_config(
                    "threshold.decay.modulation",
                    format!("must be non-negative, got {}", modulation),
                ))
            }
            ThresholdDecay::Exponential { rate } if !rate.is_finite() || rate < 0.0 => {
                Err(CivError::invalid_config(
                    "threshold.decay.rate",
                    format!("must be non-negative, got {}", rate),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_activation_gives_base() {
        let s = ThresholdSchedule::default();
        assert_eq!(s.at(0.0), s.base);
    }

    #[test]
    fn linear_default_values() {
        let s = ThresholdSchedule::default();
        assert!((s.at(0.5) - 0.06 * 0.6).abs() < 1e-12);
        assert!((s.at(1.0) - 0.06 * 0.2).abs() < 1e-12);
    }

    #[test]
    fn floor_holds_for_steep_decay() {
        let s = ThresholdSchedule::linear(0.05, 3.0).with_floor(0.02);
        assert_eq!(s.at(1.0), 0.02);
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(ThresholdSchedule::linear(0.0, 0.4).validate().is_err());
        assert!(ThresholdSchedule::linear(0.04, -0.1).validate().is_err());
        assert!(ThresholdSchedule::exponential(0.04, f64::NAN).validate().is_err());
        assert!(ThresholdSchedule::linear(0.04, 0.4).with_floor(0.05).validate().is_err());
        assert!(ThresholdSchedule::default().validate().is_ok());
    }

    #[test]
    fn toml_round_trip_uses_tagged_decay() {
        let s = ThresholdSchedule::exponential(0.05, 1.5);
        let text = toml::to_string(&s).unwrap();
        assert!(text.contains("kind = \"exponential\""));
        let back: ThresholdSchedule = toml::from_str(&text).unwrap();
        assert_eq!(back, s);
    }

    fn schedule() -> impl Strategy<Value = ThresholdSchedule> {
        (0.001f64..1.0, 0.0f64..1.0, prop::bool::ANY, 0.0f64..5.0).prop_map(
            |(base, floor_share, linear, k)| {
                let s = if linear {
                    ThresholdSchedule::linear(base, k)
                } else {
                    ThresholdSchedule::exponential(base, k)
                };
                s.with_floor(base * floor_share)
            },
        )
    }

    proptest! {
        #[test]
        fn threshold_is_non_increasing_in_activation(
            s in schedule(),
            a in 0.0f64..=1.0,
            b in 0.0f64..=1.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(s.at(hi) <= s.at(lo));
        }

        #[test]
        fn threshold_stays_within_floor_and_base(s in schedule(), a in 0.0f64..=1.0) {
            let t = s.at(a);
            prop_assert!(t >= 0.0);
            prop_assert!(t >= s.floor);
            prop_assert!(t <= s.base);
        }
    }
}
