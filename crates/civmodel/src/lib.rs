//! # civmodel
//!
//! Agent-based meta-model of how exploration freedom and the activation of
//! a suppressed group shape a civilization's rate of innovation.
//!
//! A dominant and a suppressed group of agents drift through a
//! low-dimensional cognitive state space. A step is an innovation when the
//! population mean reaches a state it has never been close to before.
//! Sweeping the two control parameters reveals a phase transition between
//! stagnation and sustained innovation.
//!
//! ## Quick Start
//!
//! ```rust
//! use civmodel::prelude::*;
//!
//! // A single run
//! let mut engine = Engine::new(RunConfig::new(0.85, 0.8).with_seed(42)).unwrap();
//! let output = engine.run(200).unwrap();
//! println!(
//!     "innovation rate {:.3}, mean synergy {:.3}",
//!     output.summary.innovation_rate, output.summary.mean_synergy
//! );
//!
//! // A small seed-averaged scan of the parameter plane
//! let base = RunConfig::default().with_population(20);
//! let grid = ParameterScanner::new(base)
//!     .scan_2d((0.2, 1.0), (0.0, 1.0), 3, &[42, 43], 50)
//!     .unwrap();
//! assert_eq!(grid.shape(), (3, 3));
//!
//! if let Some(point) = detect_critical_point(&grid, 1.0, 0.1) {
//!     println!("transition near ({:.2}, {:.2})", point.exploration, point.activation);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`civmodel_core`] - Configuration, threshold schedule, presets, shared types and errors
//! - [`civmodel_runtime`] - Population, engine, scanner, phase analysis and export
//!
//! ## Key Concepts
//!
//! | Term | Meaning |
//! |------|---------|
//! | Exploration | Perturbation scale of the dominant group |
//! | Activation | Perturbation scale of the suppressed group; lowers the innovation threshold |
//! | Divergence | Distance between the two group means |
//! | Synergy | `1 + alpha * activation + beta * divergence` |
//! | Innovation rate | Innovating steps divided by steps |
//!
//! ## Presets
//!
//! ```rust
//! use civmodel::prelude::*;
//! use civmodel::core::presets;
//!
//! let config = presets::load("renaissance_window").unwrap();
//! assert!(config.validate().is_ok());
//! assert!(presets::load("atlantis").is_err());
//! ```

pub use civmodel_core as core;
pub use civmodel_runtime as runtime;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```rust
/// use civmodel::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use civmodel_core::types::{
        AgentId, GroupKind, MeanState,
        StepRecord, RunSummary, SystemState,
    };

    // Configuration
    pub use civmodel_core::config::{GroupProfile, InstitutionConfig, RunConfig, SynergyConfig};
    pub use civmodel_core::threshold::{ThresholdDecay, ThresholdSchedule};
    pub use civmodel_core::presets::HistoricalPreset;

    // Error types
    pub use civmodel_core::error::{CivError, Result};

    // Runtime
    pub use civmodel_runtime::engine::{Engine, RunOutput};
    pub use civmodel_runtime::population::{Agent, Population};
    pub use civmodel_runtime::metrics::{rolling_rate, Stat};

    // Scanning and analysis
    pub use civmodel_runtime::scanner::{AxisSpec, CellStats, ParameterScanner, ScanGrid, ScanPlan};
    pub use civmodel_runtime::phase::{
        detect_critical_point, phase_area, phase_boundary, sensitivity,
        CriticalPoint, Sensitivity,
    };
    pub use civmodel_runtime::export::{grid_rows, grid_to_csv, trajectory_to_csv, GridRow};
}
