//! Error types for civmodel operations.
//!
//! Every validation failure is raised synchronously where the violated
//! precondition is detected. Nothing is retried internally.

use thiserror::Error;

/// Result type for civmodel operations.
pub type Result<T> = std::result::Result<T, CivError>;

/// Errors that can occur while configuring, running or scanning the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CivError {
    /// A run configuration parameter is missing, malformed or out of range.
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// A run was requested with a non-positive number of steps.
    #[error("Invalid step count: {0} (must be at least 1)")]
    InvalidStepCount(usize),

    /// Scan ranges, resolution or seed list are malformed.
    #[error("Invalid scan configuration: {0}")]
    InvalidScanConfiguration(String),

    /// No preset is registered under the requested name.
    #[error("Preset '{name}' not found. Available: {}", .available.join(", "))]
    UnknownPreset { name: String, available: Vec<String> },

    /// A single engine run inside a scan failed; the scan was aborted.
    #[error("Scan cell (exploration={exploration}, activation={activation}, seed={seed}) failed: {source}")]
    CellFailed {
        exploration: f64,
        activation: f64,
        seed: u64,
        #[source]
        source: Box<CivError>,
    },

    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for CivError {
    fn from(e: std::io::Error) -> Self {
        CivError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CivError {
    fn from(e: serde_json::Error) -> Self {
        CivError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl CivError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CivError::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_scan(reason: impl Into<String>) -> Self {
        CivError::InvalidScanConfiguration(reason.into())
    }

    /// Attach scan-cell coordinates to an engine error.
    pub fn in_cell(self, exploration: f64, activation: f64, seed: u64) -> Self {
        CivError::CellFailed {
            exploration,
            activation,
            seed,
            source: Box::new(self),
        }
    }

    /// The configuration field named by an `InvalidConfiguration`, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            CivError::InvalidConfiguration { field, .. } => Some(field),
            CivError::CellFailed { source, .. } => source.field(),
            _ => None,
        }
    }
}
