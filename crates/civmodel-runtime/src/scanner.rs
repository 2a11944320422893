//! Parameter scanner: seed-averaged sweeps over (exploration, activation).
//!
//! Every (cell, seed) pair runs on its own engine with its own random stream,
//! so jobs are executed in parallel with rayon and share nothing mutable.
//! A cell's statistics are reduced only after all of its seeds complete,
//! in ascending seed order, which makes the result independent of both
//! scheduling and the order of the seed list.

use crate::engine::Engine;
use crate::metrics::Stat;
use civmodel_core::config::RunConfig;
use civmodel_core::error::{CivError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// One axis of a scan: `points` evenly spaced values over `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub low: f64,
    pub high: f64,
    pub points: usize,
}

impl AxisSpec {
    pub fn new(range: (f64, f64), points: usize) -> Self {
        Self {
            low: range.0,
            high: range.1,
            points,
        }
    }

    /// Evenly spaced values; the last value is exactly `high`.
    pub fn values(&self) -> Vec<f64> {
        match self.points {
            0 => Vec::new(),
            1 => vec![self.low],
            n => {
                let span = self.high - self.low;
                let last = (n - 1) as f64;
                (0..n)
                    .map(|k| {
                        if k == n - 1 {
                            self.high
                        } else {
                            self.low + span * (k as f64 / last)
                        }
                    })
                    .collect()
            }
        }
    }

    fn validate(&self, axis: &str) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(CivError::invalid_scan(format!(
                "{} range must be finite, got ({}, {})",
                axis, self.low, self.high
            )));
        }
        if self.low >= self.high {
            return Err(CivError::invalid_scan(format!(
                "{} range must satisfy low < high, got ({}, {})",
                axis, self.low, self.high
            )));
        }
        if self.points < 2 {
            return Err(CivError::invalid_scan(format!(
                "{} resolution must be at least 2, got {}",
                axis, self.points
            )));
        }
        Ok(())
    }
}

/// A complete scan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanPlan {
    pub exploration: AxisSpec,
    pub activation: AxisSpec,
    pub seeds: Vec<u64>,
    pub steps: usize,
}

impl ScanPlan {
    /// Square grid with the same resolution on both axes.
    pub fn new(
        exploration_range: (f64, f64),
        activation_range: (f64, f64),
        resolution: usize,
        seeds: &[u64],
        steps: usize,
    ) -> Self {
        Self {
            exploration: AxisSpec::new(exploration_range, resolution),
            activation: AxisSpec::new(activation_range, resolution),
            seeds: seeds.to_vec(),
            steps,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.exploration.validate("exploration")?;
        self.activation.validate("activation")?;
        if self.seeds.is_empty() {
            return Err(CivError::invalid_scan("seed list must not be empty"));
        }
        if self.steps == 0 {
            return Err(CivError::InvalidStepCount(0));
        }
        Ok(())
    }

    /// Number of engine runs the plan requires.
    pub fn total_runs(&self) -> usize {
        self.exploration.points * self.activation.points * self.seeds.len()
    }
}

/// Aggregated statistics for one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStats {
    pub exploration: f64,
    pub activation: f64,
    pub innovation_rate: Stat,
    pub synergy: Stat,
    /// Final group divergence across seeds.
    pub divergence: Stat,
    pub samples: usize,
}

/// Result of a 2D scan, indexed `cells[exploration_index][activation_index]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanGrid {
    pub exploration_values: Vec<f64>,
    pub activation_values: Vec<f64>,
    pub seeds: Vec<u64>,
    pub steps: usize,
    pub cells: Vec<Vec<CellStats>>,
}

impl ScanGrid {
    /// `(exploration points, activation points)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.exploration_values.len(), self.activation_values.len())
    }

    pub fn cell(&self, exploration_index: usize, activation_index: usize) -> Option<&CellStats> {
        self.cells.get(exploration_index)?.get(activation_index)
    }

    pub fn innovation_means(&self) -> Vec<Vec<f64>> {
        self.map_cells(|c| c.innovation_rate.mean)
    }

    pub fn innovation_stds(&self) -> Vec<Vec<f64>> {
        self.map_cells(|c| c.innovation_rate.std)
    }

    pub fn synergy_means(&self) -> Vec<Vec<f64>> {
        self.map_cells(|c| c.synergy.mean)
    }

    pub fn divergence_means(&self) -> Vec<Vec<f64>> {
        self.map_cells(|c| c.divergence.mean)
    }

    fn map_cells(&self, f: impl Fn(&CellStats) -> f64) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(&f).collect())
            .collect()
    }
}

/// Metrics from a single (cell, seed) run.
#[derive(Debug, Clone, Copy)]
struct Sample {
    seed: u64,
    innovation_rate: f64,
    mean_synergy: f64,
    divergence: f64,
}

/// Runs the engine over a grid of (exploration, activation) pairs.
pub struct ParameterScanner {
    base: RunConfig,
    workers: Option<usize>,
}

impl Default for ParameterScanner {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

impl ParameterScanner {
    /// Every run uses `base` with exploration, activation and seed overridden.
    pub fn new(base: RunConfig) -> Self {
        Self {
            base,
            workers: None,
        }
    }

    /// Run on a dedicated pool of `workers` threads instead of the global pool.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn base_config(&self) -> &RunConfig {
        &self.base
    }

    /// Scan a square grid of `resolution x resolution` cells.
    pub fn scan_2d(
        &self,
        exploration_range: (f64, f64),
        activation_range: (f64, f64),
        resolution: usize,
        seeds: &[u64],
        steps: usize,
    ) -> Result<ScanGrid> {
        let plan = ScanPlan::new(exploration_range, activation_range, resolution, seeds, steps);
        self.scan(&plan)
    }

    pub fn scan(&self, plan: &ScanPlan) -> Result<ScanGrid> {
        self.scan_with_progress(plan, |_, _| {})
    }

    /// Scan, reporting `(completed runs, total runs)` as runs finish.
    ///
    /// The first failing run aborts the scan; its error carries the cell
    /// coordinates and seed.
    pub fn scan_with_progress<F>(&self, plan: &ScanPlan, progress: F) -> Result<ScanGrid>
    where
        F: Fn(usize, usize) + Sync,
    {
        plan.validate()?;

        let exploration_values = plan.exploration.values();
        let activation_values = plan.activation.values();
        let total = plan.total_runs();

        info!(
            cells = exploration_values.len() * activation_values.len(),
            seeds = plan.seeds.len(),
            steps = plan.steps,
            runs = total,
            "starting parameter scan"
        );
        let start = Instant::now();

        let jobs: Vec<(usize, usize, u64)> = (0..exploration_values.len())
            .flat_map(|i| (0..activation_values.len()).map(move |j| (i, j)))
            .flat_map(|(i, j)| plan.seeds.iter().map(move |&seed| (i, j, seed)))
            .collect();

        let completed = AtomicUsize::new(0);
        let execute = || -> Result<Vec<(usize, usize, Sample)>> {
            jobs.par_iter()
                .map(|&(i, j, seed)| -> Result<(usize, usize, Sample)> {
                    let exploration = exploration_values[i];
                    let activation = activation_values[j];
                    let sample = self
                        .run_sample(exploration, activation, seed, plan.steps)
                        .map_err(|e| {
                            warn!(exploration, activation, seed, error = %e, "scan cell failed");
                            e.in_cell(exploration, activation, seed)
                        })?;
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    progress(done, total);
                    Ok((i, j, sample))
                })
                .collect()
        };

        let results = match self.workers {
            Some(workers) => rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| CivError::invalid_scan(format!("cannot start worker pool: {}", e)))?
                .install(execute)?,
            None => execute()?,
        };

        let mut buckets: Vec<Vec<Vec<Sample>>> =
            vec![vec![Vec::with_capacity(plan.seeds.len()); activation_values.len()]; exploration_values.len()];
        for (i, j, sample) in results {
            buckets[i][j].push(sample);
        }

        let cells = buckets
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, samples)| {
                        aggregate(exploration_values[i], activation_values[j], samples)
                    })
                    .collect()
            })
            .collect();

        info!(
            runs = total,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "parameter scan complete"
        );

        Ok(ScanGrid {
            exploration_values,
            activation_values,
            seeds: plan.seeds.clone(),
            steps: plan.steps,
            cells,
        })
    }

    fn run_sample(&self, exploration: f64, activation: f64, seed: u64, steps: usize) -> Result<Sample> {
        let config = self
            .base
            .clone()
            .with_exploration(exploration)
            .with_activation(activation)
            .with_seed(seed);
        let mut engine = Engine::new(config)?;
        let output = engine.run(steps)?;
        Ok(Sample {
            seed,
            innovation_rate: output.summary.innovation_rate,
            mean_synergy: output.summary.mean_synergy,
            divergence: output.summary.final_divergence,
        })
    }
}

/// Reduce one cell's samples in ascending seed order.
fn aggregate(exploration: f64, activation: f64, mut samples: Vec<Sample>) -> CellStats {
    samples.sort_by_key(|s| s.seed);
    let column = |f: fn(&Sample) -> f64| samples.iter().map(f).collect::<Vec<f64>>();
    CellStats {
        exploration,
        activation,
        innovation_rate: Stat::from_samples(&column(|s| s.innovation_rate)),
        synergy: Stat::from_samples(&column(|s| s.mean_synergy)),
        divergence: Stat::from_samples(&column(|s| s.divergence)),
        samples: samples.len(),
    }
}
