//! Phase analysis over a scanned innovation surface.
//!
//! Surfaces are `rows x cols` matrices indexed like `ScanGrid::cells`:
//! rows follow exploration, columns follow activation. Gradients are
//! measured in grid-index units.

use crate::scanner::ScanGrid;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Gaussian smoothing width, in grid cells.
pub const DEFAULT_SIGMA: f64 = 1.5;

/// Minimum smoothed gradient magnitude for a transition to count.
pub const DEFAULT_MIN_GRADIENT: f64 = 0.1;

/// Innovation-rate cut-off separating the two phases.
pub const DEFAULT_PHASE_THRESHOLD: f64 = 0.05;

/// Location of the steepest transition in the innovation surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalPoint {
    pub exploration: f64,
    pub activation: f64,
    /// Smoothed gradient magnitude at the point.
    pub gradient: f64,
    /// `(exploration index, activation index)`.
    pub index: (usize, usize),
}

/// Parameter sensitivity of the innovation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    /// Mean change in innovation rate per exploration step, one entry per
    /// adjacent pair of exploration values.
    pub marginal_exploration: Vec<f64>,
    /// Same along the activation axis.
    pub marginal_activation: Vec<f64>,
    /// Share of total variance explained by exploration alone, in percent.
    pub importance_exploration: f64,
    pub importance_activation: f64,
    /// Remainder attributed to the interaction of both parameters.
    pub interaction: f64,
}

/// Find the cell with the largest smoothed innovation gradient.
///
/// Returns `None` for grids smaller than 2x2 or when the largest gradient
/// magnitude is below `min_gradient`.
pub fn detect_critical_point(grid: &ScanGrid, sigma: f64, min_gradient: f64) -> Option<CriticalPoint> {
    let (rows, cols) = grid.shape();
    if rows < 2 || cols < 2 {
        return None;
    }

    let smoothed = gaussian_smooth(&grid.innovation_means(), sigma);
    let (d_rows, d_cols) = gradient(&smoothed);

    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..rows {
        for j in 0..cols {
            let magnitude = d_rows[i][j].hypot(d_cols[i][j]);
            if best.map_or(true, |(_, _, m)| magnitude > m) {
                best = Some((i, j, magnitude));
            }
        }
    }

    let (i, j, magnitude) = best?;
    if magnitude < min_gradient {
        debug!(magnitude, min_gradient, "no critical point above gradient floor");
        return None;
    }
    Some(CriticalPoint {
        exploration: grid.exploration_values[i],
        activation: grid.activation_values[j],
        gradient: magnitude,
        index: (i, j),
    })
}

/// Mask of cells whose mean innovation rate exceeds `threshold`.
pub fn phase_boundary(grid: &ScanGrid, threshold: f64) -> Vec<Vec<bool>> {
    grid.cells
        .iter()
        .map(|row| row.iter().map(|c| c.innovation_rate.mean > threshold).collect())
        .collect()
}

/// Fraction of cells inside the innovative phase.
pub fn phase_area(mask: &[Vec<bool>]) -> f64 {
    let total: usize = mask.iter().map(Vec::len).sum();
    if total == 0 {
        return 0.0;
    }
    let inside = mask.iter().flatten().filter(|&&b| b).count();
    inside as f64 / total as f64
}

/// Marginal effects and variance-share importance of both parameters.
///
/// Importance values are zero on a flat surface.
pub fn sensitivity(grid: &ScanGrid) -> Sensitivity {
    let surface = grid.innovation_means();
    let (rows, cols) = grid.shape();

    let marginal_exploration = (0..rows.saturating_sub(1))
        .map(|i| mean((0..cols).map(|j| surface[i + 1][j] - surface[i][j])))
        .collect();
    let marginal_activation = (0..cols.saturating_sub(1))
        .map(|j| mean((0..rows).map(|i| surface[i][j + 1] - surface[i][j])))
        .collect();

    let total = variance(surface.iter().flatten().copied());
    let by_exploration = variance(surface.iter().map(|row| mean(row.iter().copied())));
    let by_activation = variance((0..cols).map(|j| mean((0..rows).map(|i| surface[i][j]))));

    let (importance_exploration, importance_activation, interaction) = if total > 0.0 {
        let e = by_exploration / total * 100.0;
        let a = by_activation / total * 100.0;
        (e, a, 100.0 - e - a)
    } else {
        (0.0, 0.0, 0.0)
    };

    Sensitivity {
        marginal_exploration,
        marginal_activation,
        importance_exploration,
        importance_activation,
        interaction,
    }
}

/// Separable Gaussian filter with mirror (`d c b a | a b c d`) boundaries.
///
/// The kernel is truncated at `round(4 sigma)`; `sigma <= 0` leaves the
/// surface unchanged.
pub fn gaussian_smooth(surface: &[Vec<f64>], sigma: f64) -> Vec<Vec<f64>> {
    if sigma.is_nan() || sigma <= 0.0 || surface.is_empty() {
        return surface.to_vec();
    }
    let kernel = gaussian_kernel(sigma);
    let rows = surface.len();
    let cols = surface[0].len();

    let along_cols: Vec<Vec<f64>> = surface.iter().map(|row| convolve(row, &kernel)).collect();

    let mut out = vec![vec![0.0; cols]; rows];
    for j in 0..cols {
        let column: Vec<f64> = along_cols.iter().map(|row| row[j]).collect();
        for (i, v) in convolve(&column, &kernel).into_iter().enumerate() {
            out[i][j] = v;
        }
    }
    out
}

/// Finite-difference gradient along rows and columns: central differences
/// inside, one-sided at the edges. An axis of length 1 has zero gradient.
pub fn gradient(surface: &[Vec<f64>]) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let rows = surface.len();
    let cols = surface.first().map_or(0, Vec::len);
    let mut d_rows = vec![vec![0.0; cols]; rows];
    let mut d_cols = vec![vec![0.0; cols]; rows];

    for i in 0..rows {
        for j in 0..cols {
            d_rows[i][j] = diff(rows, i, |k| surface[k][j]);
            d_cols[i][j] = diff(cols, j, |k| surface[i][k]);
        }
    }
    (d_rows, d_cols)
}

fn diff(len: usize, at: usize, value: impl Fn(usize) -> f64) -> f64 {
    if len < 2 {
        0.0
    } else if at == 0 {
        value(1) - value(0)
    } else if at == len - 1 {
        value(at) - value(at - 1)
    } else {
        (value(at + 1) - value(at - 1)) / 2.0
    }
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (4.0 * sigma + 0.5) as i64;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

fn convolve(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len() as i64;
    let radius = (kernel.len() / 2) as i64;
    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * signal[reflect(i + k as i64 - radius, n)])
                .sum()
        })
        .collect()
}

/// Map an out-of-range index back into `0..n` by half-sample mirroring.
fn reflect(mut index: i64, n: i64) -> usize {
    let period = 2 * n;
    index = index.rem_euclid(period);
    if index >= n {
        index = period - 1 - index;
    }
    index as usize
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn variance(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    let m = mean(values.iter().copied());
    mean(values.iter().map(|v| (v - m).powi(2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Stat;
    use crate::scanner::CellStats;

    fn grid_from(surface: Vec<Vec<f64>>) -> ScanGrid {
        let rows = surface.len();
        let cols = surface[0].len();
        let exploration_values: Vec<f64> = (0..rows).map(|i| 0.1 * (i + 1) as f64).collect();
        let activation_values: Vec<f64> = (0..cols).map(|j| 0.1 * j as f64).collect();
        let cells = surface
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, &v)| CellStats {
                        exploration: exploration_values[i],
                        activation: activation_values[j],
                        innovation_rate: Stat { mean: v, std: 0.0 },
                        synergy: Stat { mean: 1.0, std: 0.0 },
                        divergence: Stat::default(),
                        samples: 1,
                    })
                    .collect()
            })
            .collect();
        ScanGrid {
            exploration_values,
            activation_values,
            seeds: vec![1],
            steps: 10,
            cells,
        }
    }

    fn step_surface(rows: usize, cols: usize, edge: usize) -> Vec<Vec<f64>> {
        (0..rows)
            .map(|_| (0..cols).map(|j| if j < edge { 0.0 } else { 1.0 }).collect())
            .collect()
    }

    #[test]
    fn reflect_mirrors_edges() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(2, 4), 2);
        assert_eq!(reflect(-3, 1), 0);
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(1.2);
        assert_eq!(k.len(), 11);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((k[0] - k[10]).abs() < 1e-15);
    }

    #[test]
    fn smoothing_preserves_constant_surface() {
        let surface = vec![vec![0.3; 5]; 4];
        let smoothed = gaussian_smooth(&surface, 1.5);
        assert!(smoothed.iter().flatten().all(|v| (v - 0.3).abs() < 1e-12));
    }

    #[test]
    fn gradient_of_linear_ramp() {
        let surface: Vec<Vec<f64>> = (0..3).map(|i| (0..4).map(|j| 2.0 * j as f64 + i as f64).collect()).collect();
        let (d_rows, d_cols) = gradient(&surface);
        assert!(d_cols.iter().flatten().all(|&g| (g - 2.0).abs() < 1e-12));
        assert!(d_rows.iter().flatten().all(|&g| (g - 1.0).abs() < 1e-12));
    }

    #[test]
    fn critical_point_at_sharp_transition() {
        let grid = grid_from(step_surface(6, 8, 4));
        let point = detect_critical_point(&grid, 0.5, DEFAULT_MIN_GRADIENT).unwrap();
        assert!(point.index.1 == 3 || point.index.1 == 4, "{:?}", point);
        assert_eq!(point.activation, grid.activation_values[point.index.1]);
        assert!(point.gradient >= DEFAULT_MIN_GRADIENT);
    }

    #[test]
    fn flat_surface_has_no_critical_point() {
        let grid = grid_from(vec![vec![0.2; 5]; 5]);
        assert!(detect_critical_point(&grid, 1.0, DEFAULT_MIN_GRADIENT).is_none());
    }

    #[test]
    fn degenerate_grid_has_no_critical_point() {
        let grid = grid_from(vec![vec![0.0, 1.0, 0.0]]);
        assert!(detect_critical_point(&grid, 1.0, 0.0).is_none());
    }

    #[test]
    fn boundary_mask_and_area() {
        let grid = grid_from(vec![vec![0.0, 0.04, 0.06], vec![0.2, 0.05, 0.9]]);
        let mask = phase_boundary(&grid, DEFAULT_PHASE_THRESHOLD);
        assert_eq!(mask, vec![vec![false, false, true], vec![true, false, true]]);
        assert!((phase_area(&mask) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn sensitivity_attributes_pure_activation_effect() {
        let grid = grid_from(step_surface(4, 6, 3));
        let s = sensitivity(&grid);
        assert_eq!(s.marginal_exploration.len(), 3);
        assert_eq!(s.marginal_activation.len(), 5);
        assert!(s.marginal_exploration.iter().all(|&m| m == 0.0));
        assert_eq!(s.marginal_activation[2], 1.0);
        assert!((s.importance_activation - 100.0).abs() < 1e-9);
        assert!(s.importance_exploration.abs() < 1e-9);
        assert!(s.interaction.abs() < 1e-9);
    }

    #[test]
    fn sensitivity_of_flat_surface_is_zero() {
        let s = sensitivity(&grid_from(vec![vec![0.5; 3]; 3]));
        assert_eq!(s.importance_exploration, 0.0);
        assert_eq!(s.importance_activation, 0.0);
        assert_eq!(s.interaction, 0.0);
    }
}
