//! Configuration management for civmodel CLI.

use anyhow::{Context, Result};
use civmodel::prelude::*;
use civmodel::runtime::phase::DEFAULT_SIGMA;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "civmodel.toml";

/// civmodel project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base model for `run` and for every scan cell.
    #[serde(default)]
    pub model: RunConfig,
    #[serde(default)]
    pub scan: ScanSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSettings {
    pub exploration_range: (f64, f64),
    pub exploration_points: usize,
    pub activation_range: (f64, f64),
    pub activation_points: usize,
    pub seeds: Vec<u64>,
    pub steps: usize,
    /// Worker threads; all cores when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    /// Smoothing width for critical point detection.
    pub sigma: f64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            exploration_range: (0.2, 1.0),
            exploration_points: 12,
            activation_range: (0.0, 1.0),
            activation_points: 15,
            seeds: vec![42, 43, 44],
            steps: 300,
            workers: None,
            sigma: DEFAULT_SIGMA,
        }
    }
}

impl ScanSettings {
    pub fn plan(&self) -> ScanPlan {
        ScanPlan {
            exploration: AxisSpec::new(self.exploration_range, self.exploration_points),
            activation: AxisSpec::new(self.activation_range, self.activation_points),
            seeds: self.seeds.clone(),
            steps: self.steps,
        }
    }
}

impl Config {
    /// Load config from civmodel.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        let start = std::env::current_dir().context("Failed to read current directory")?;
        match find_config_file(&start) {
            Some(path) => {
                debug!(path = %path.display(), "loading project config");
                Self::load_from(&path)
            }
            None => {
                debug!("no {} found, using defaults", CONFIG_FILE);
                Ok(Config::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find civmodel.toml in `start` or its parent directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Parse a comma-separated seed list such as "42, 43,44".
pub fn parse_seeds(list: &str) -> Result<Vec<u64>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().with_context(|| format!("Invalid seed: {}", s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        Config::default().save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.model, RunConfig::default());
        assert_eq!(loaded.scan.seeds, vec![42, 43, 44]);
        assert_eq!(loaded.scan.exploration_points, 12);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[model]\nexploration = 0.8\n\n[scan]\nsteps = 50\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.model.exploration, 0.8);
        assert_eq!(loaded.model.population, RunConfig::default().population);
        assert_eq!(loaded.scan.steps, 50);
        assert_eq!(loaded.scan.activation_points, 15);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[scan]\nresolutoin = 4\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_found_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        Config::default().save(&dir.path().join(CONFIG_FILE)).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
    }

    #[test]
    fn seed_lists() {
        assert_eq!(parse_seeds("42, 43,44").unwrap(), vec![42, 43, 44]);
        assert_eq!(parse_seeds("7,").unwrap(), vec![7]);
        assert!(parse_seeds("1,x").is_err());
    }

    #[test]
    fn settings_build_plan() {
        let plan = ScanSettings::default().plan();
        assert_eq!(plan.exploration.points, 12);
        assert_eq!(plan.activation.points, 15);
        assert!(plan.validate().is_ok());
    }
}
