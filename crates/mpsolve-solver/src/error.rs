//! Solver error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Error type for engine-facing operations.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The engine session could not be created.
    #[error("[SOLVER_UNAVAILABLE] Engine session could not be created")]
    EngineUnavailable,
    /// An engine call reported an error status.
    #[error("[SOLVER_CALL_FAILED] Engine call '{operation}' failed with status {status}")]
    EngineCall {
        operation: &'static str,
        status: i32,
    },
    /// The engine ran out of memory.
    #[error("[SOLVER_OUT_OF_MEMORY] Engine ran out of memory during '{operation}'")]
    OutOfMemory { operation: &'static str },
    /// Pending model changes must be committed first.
    #[error("[PROGRAM_UNCOMMITTED] '{operation}' requires a committed program; call commit() first")]
    UncommittedChanges { operation: &'static str },
    /// No feasible solution is recorded.
    #[error("[SOLUTION_MISSING] '{operation}' requires a recorded solution")]
    NoSolution { operation: &'static str },
    /// The fractional scale variable solved to (numerically) zero.
    #[error("[FRACTIONAL_DEGENERATE_SCALE] Scale variable solved to {value}; the ratio is undefined")]
    DegenerateScale { value: f64 },
    /// A path could not be passed to the engine.
    #[error("[PATH_INVALID] Path '{path}' is not valid for the engine")]
    InvalidPath { path: String },
    /// A variable or constraint name could not be passed to the engine.
    #[error("[NAME_INVALID] Name '{name}' is not valid for the engine")]
    InvalidName { name: String },
    #[error("[CONFIG_INVALID] {0}")]
    Config(#[from] ConfigError),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EngineUnavailable => "SOLVER_UNAVAILABLE",
            SolverError::EngineCall { .. } => "SOLVER_CALL_FAILED",
            SolverError::OutOfMemory { .. } => "SOLVER_OUT_OF_MEMORY",
            SolverError::UncommittedChanges { .. } => "PROGRAM_UNCOMMITTED",
            SolverError::NoSolution { .. } => "SOLUTION_MISSING",
            SolverError::DegenerateScale { .. } => "FRACTIONAL_DEGENERATE_SCALE",
            SolverError::InvalidPath { .. } => "PATH_INVALID",
            SolverError::InvalidName { .. } => "NAME_INVALID",
            SolverError::Config(_) => "CONFIG_INVALID",
        }
    }
}
