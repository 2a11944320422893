//! # civmodel Runtime
//!
//! Simulation engine, parameter scanner and phase analysis.
//!
//! The runtime owns everything that moves: the agent [`population`], the
//! step-by-step [`engine`], the seed-averaged [`scanner`] that sweeps the
//! (exploration, activation) plane in parallel, and the [`phase`] tools
//! that locate the transition in the resulting surface.
//!
//! ```rust
//! use civmodel_runtime::prelude::*;
//!
//! let mut engine = Engine::new(RunConfig::new(0.85, 0.8).with_seed(42)).unwrap();
//! let output = engine.run(100).unwrap();
//! assert_eq!(output.innovations.len(), 100);
//! assert!(output.synergies.iter().all(|&s| s >= 1.0));
//! ```

pub mod population;
pub mod engine;
pub mod metrics;
pub mod scanner;
pub mod phase;
pub mod export;
pub mod prelude;
