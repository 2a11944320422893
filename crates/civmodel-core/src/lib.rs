//! # civmodel Core
//!
//! Shared types, configuration and errors for the civilization meta-model.
//!
//! The model simulates two groups of agents moving through a cognitive
//! state space:
//!
//! - **Dominant** agents explore with a freedom set by the exploration parameter
//! - **Suppressed** agents move only as far as their activation allows
//!
//! A step counts as an **innovation** when the population mean moves far
//! enough from every mean it has held before. Activation lowers that bar and,
//! together with the divergence between the groups, raises the **synergy**
//! multiplier.
//!
//! ## Quick Start
//!
//! ```rust
//! use civmodel_core::prelude::*;
//!
//! let config = RunConfig::new(0.75, 0.3).with_seed(7);
//! assert!(config.validate().is_ok());
//!
//! // Higher activation never raises the innovation threshold
//! let low = RunConfig::new(0.75, 0.1).innovation_threshold();
//! let high = RunConfig::new(0.75, 0.9).innovation_threshold();
//! assert!(high <= low);
//! ```

pub mod config;
pub mod error;
pub mod presets;
pub mod threshold;
pub mod types;
pub mod prelude;
