//! Grid and trajectory export: flat rows for CSV, JSON via serde.
//!
//! Scan grids flatten to one row per cell in exploration-major order;
//! run trajectories flatten to one row per step.

use crate::scanner::ScanGrid;
use civmodel_core::error::Result;
use civmodel_core::types::StepRecord;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One cell of a scan grid as a flat record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub exploration: f64,
    pub activation: f64,
    pub innovation_mean: f64,
    pub innovation_std: f64,
    pub synergy_mean: f64,
    pub synergy_std: f64,
    pub divergence_mean: f64,
    pub samples: usize,
}

/// Flatten a grid into rows, exploration-major.
pub fn grid_rows(grid: &ScanGrid) -> Vec<GridRow> {
    grid.cells
        .iter()
        .flatten()
        .map(|c| GridRow {
            exploration: c.exploration,
            activation: c.activation,
            innovation_mean: c.innovation_rate.mean,
            innovation_std: c.innovation_rate.std,
            synergy_mean: c.synergy.mean,
            synergy_std: c.synergy.std,
            divergence_mean: c.divergence.mean,
            samples: c.samples,
        })
        .collect()
}

pub fn grid_to_csv(grid: &ScanGrid) -> String {
    let mut csv = String::new();
    csv.push_str("exploration,activation,innovation_mean,innovation_std,synergy_mean,synergy_std,divergence_mean,samples\n");
    for row in grid_rows(grid) {
        csv.push_str(&format!(
            "{:.4},{:.4},{:.6},{:.6},{:.6},{:.6},{:.6},{}\n",
            row.exploration,
            row.activation,
            row.innovation_mean,
            row.innovation_std,
            row.synergy_mean,
            row.synergy_std,
            row.divergence_mean,
            row.samples,
        ));
    }
    csv
}

/// Per-step trajectory; mean-state components become `m0..m{d-1}` columns.
pub fn trajectory_to_csv(records: &[StepRecord]) -> String {
    let dimensions = records.first().map_or(0, |r| r.mean_state.dimensions());
    let mut csv = String::from("step,innovation,synergy,divergence,novelty");
    for k in 0..dimensions {
        csv.push_str(&format!(",m{}", k));
    }
    csv.push('\n');

    for r in records {
        csv.push_str(&format!(
            "{},{},{:.6},{:.6},{:.6}",
            r.step, r.innovation as u8, r.synergy, r.divergence, r.novelty
        ));
        for x in r.mean_state.as_slice() {
            csv.push_str(&format!(",{:.6}", x));
        }
        csv.push('\n');
    }
    csv
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::scanner::ParameterScanner;
    use civmodel_core::config::RunConfig;

    fn small_grid() -> ScanGrid {
        let base = RunConfig::default().with_population(10).with_dimensions(2);
        ParameterScanner::new(base)
            .scan_2d((0.2, 1.0), (0.0, 1.0), 2, &[1], 10)
            .unwrap()
    }

    #[test]
    fn grid_rows_are_exploration_major() {
        let rows = grid_rows(&small_grid());
        assert_eq!(rows.len(), 4);
        assert_eq!((rows[0].exploration, rows[0].activation), (0.2, 0.0));
        assert_eq!((rows[1].exploration, rows[1].activation), (0.2, 1.0));
        assert_eq!((rows[2].exploration, rows[2].activation), (1.0, 0.0));
    }

    #[test]
    fn grid_csv_has_header_and_one_line_per_cell() {
        let csv = grid_to_csv(&small_grid());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("exploration,activation,innovation_mean"));
        assert!(lines[4].starts_with("1.0000,1.0000,"));
        assert!(lines[1..].iter().all(|l| l.split(',').count() == 8));
    }

    #[test]
    fn trajectory_csv_columns() {
        let mut engine = Engine::new(RunConfig::new(0.8, 0.5).with_dimensions(3)).unwrap();
        let out = engine.run(5).unwrap();
        let csv = trajectory_to_csv(&out.records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "step,innovation,synergy,divergence,novelty,m0,m1,m2");
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("1,"));
        assert!(lines[1..].iter().all(|l| l.split(',').count() == 8));
    }

    #[test]
    fn empty_trajectory_is_header_only() {
        assert_eq!(trajectory_to_csv(&[]), "step,innovation,synergy,divergence,novelty\n");
    }
}
