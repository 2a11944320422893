//! civmodel Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use civmodel_core::prelude::*;
//! ```

pub use crate::types::{
    AgentId, GroupKind, MeanState,
    StepRecord, RunSummary, SystemState,
    euclidean_distance,
};

pub use crate::config::{GroupProfile, InstitutionConfig, RunConfig, SynergyConfig};
pub use crate::threshold::{ThresholdDecay, ThresholdSchedule};
pub use crate::presets::HistoricalPreset;

pub use crate::error::{CivError, Result};
