//! Engine-independent solver vocabulary for mpsolve.
//!
//! This crate provides the types a solver backend (like `mpsolve-highs`)
//! shares with its callers.
//!
//! # Overview
//!
//! - [`SolverConfig`]: Solve knobs (limits, threads, seed, verbosity)
//! - [`OutcomeCode`]: Raw engine outcome translated into mpsolve terms
//! - [`SolveStatus`]: Closed status taxonomy derived after each solve
//! - [`SolverError`]: Error types for solver operations

mod config;
mod error;
mod status;

pub use config::{AUTO_THREADING, ConfigError, SolverConfig};
pub use error::SolverError;
pub use status::{OutcomeCode, SolveStatus, solution_found};
