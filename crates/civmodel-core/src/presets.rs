//! Named historical presets.
//!
//! Each preset is a fixed set of overrides applied on top of
//! `RunConfig::default()`. The table is read-only.

use crate::config::{RunConfig, SynergyConfig};
use crate::error::{CivError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A historical scenario with pre-filled parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoricalPreset {
    StagnationTypical,
    TangSongWindow,
    RenaissanceWindow,
    IndustrialTransition,
    ModernCreative,
}

impl HistoricalPreset {
    pub const ALL: [HistoricalPreset; 5] = [
        HistoricalPreset::StagnationTypical,
        HistoricalPreset::TangSongWindow,
        HistoricalPreset::RenaissanceWindow,
        HistoricalPreset::IndustrialTransition,
        HistoricalPreset::ModernCreative,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HistoricalPreset::StagnationTypical => "stagnation_typical",
            HistoricalPreset::TangSongWindow => "tang_song_window",
            HistoricalPreset::RenaissanceWindow => "renaissance_window",
            HistoricalPreset::IndustrialTransition => "industrial_transition",
            HistoricalPreset::ModernCreative => "modern_creative",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HistoricalPreset::StagnationTypical => {
                "Typical agrarian society with limited exploration"
            }
            HistoricalPreset::TangSongWindow => {
                "Tang-Song transition period: commercial and cultural flourishing"
            }
            HistoricalPreset::RenaissanceWindow => {
                "European Renaissance: revival of arts and sciences"
            }
            HistoricalPreset::IndustrialTransition => {
                "Industrial revolution: technological acceleration"
            }
            HistoricalPreset::ModernCreative => {
                "Modern creative society: high diversity and exploration"
            }
        }
    }

    /// The full run configuration for this preset.
    pub fn config(&self) -> RunConfig {
        let base = RunConfig::default();
        match self {
            HistoricalPreset::StagnationTypical => {
                let mut c = RunConfig::new(0.3, 0.05).with_population(80).with_dimensions(2);
                c.threshold.base = 0.075;
                c
            }
            HistoricalPreset::TangSongWindow => {
                let mut c = RunConfig::new(0.75, 0.25).with_population(150).with_dimensions(4);
                c.threshold.base = 0.0525;
                c.institution.learning_rate = 0.03;
                c
            }
            HistoricalPreset::RenaissanceWindow => RunConfig::new(0.78, 0.3)
                .with_population(120)
                .with_dimensions(4)
                .with_noise_scale(0.69),
            HistoricalPreset::IndustrialTransition => {
                let mut c = RunConfig::new(0.85, 0.65).with_population(200).with_dimensions(6);
                c.threshold.base = 0.0375;
                c.synergy = SynergyConfig {
                    activation_gate: 0.35,
                    upper_bound: Some(3.0),
                    ..base.synergy
                };
                c
            }
            HistoricalPreset::ModernCreative => {
                let mut c = RunConfig::new(0.9, 0.85).with_population(300).with_dimensions(8);
                c.exploration_prob = 0.6;
                c.synergy = SynergyConfig {
                    activation_gate: 0.3,
                    upper_bound: Some(3.0),
                    ..base.synergy
                };
                c
            }
        }
    }
}

impl fmt::Display for HistoricalPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HistoricalPreset {
    type Err = CivError;

    fn from_str(s: &str) -> Result<Self> {
        HistoricalPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| CivError::UnknownPreset {
                name: s.to_string(),
                available: names().into_iter().map(String::from).collect(),
            })
    }
}

/// Look up a preset configuration by its short identifier.
pub fn load(name: &str) -> Result<RunConfig> {
    name.parse::<HistoricalPreset>().map(|p| p.config())
}

/// All preset identifiers, in table order.
pub fn names() -> Vec<&'static str> {
    HistoricalPreset::ALL.iter().map(|p| p.name()).collect()
}

/// Iterate over every preset.
pub fn all() -> impl Iterator<Item = HistoricalPreset> {
    HistoricalPreset::ALL.into_iter()
}
