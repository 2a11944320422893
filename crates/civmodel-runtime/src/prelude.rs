//! civmodel Runtime Prelude: engine, scanner and analysis in one import.

pub use civmodel_core::prelude::*;

pub use crate::engine::{Engine, RunOutput};
pub use crate::population::{Agent, Population};
pub use crate::scanner::{AxisSpec, CellStats, ParameterScanner, ScanGrid, ScanPlan};
pub use crate::phase::{
    detect_critical_point, phase_area, phase_boundary, sensitivity,
    CriticalPoint, Sensitivity,
};
pub use crate::metrics::{rolling_rate, Stat};
