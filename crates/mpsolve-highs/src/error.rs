//! Errors raised by program-level operations.

use mpsolve_core::ModelError;
use mpsolve_solver::SolverError;
use thiserror::Error;

/// Either a rejected model edit or an engine-side failure.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    /// The denominator normalization value must be positive and finite.
    #[error("[FRACTIONAL_INVALID_SCALE] Denominator scale must be positive and finite, got {gamma}")]
    InvalidScale { gamma: f64 },
}

impl ProgramError {
    pub fn code(&self) -> &'static str {
        match self {
            ProgramError::Model(err) => err.code(),
            ProgramError::Solver(err) => err.code(),
            ProgramError::InvalidScale { .. } => "FRACTIONAL_INVALID_SCALE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpsolve_expr::VariableId;

    #[test]
    fn test_code_delegates() {
        let model: ProgramError = ModelError::InvalidVariableId(VariableId::new(3)).into();
        assert_eq!(model.code(), "VARIABLE_INVALID_ID");
        let solver: ProgramError = SolverError::NoSolution { operation: "value" }.into();
        assert_eq!(solver.code(), "SOLUTION_MISSING");
        let scale = ProgramError::InvalidScale { gamma: 0.0 };
        assert!(scale.to_string().starts_with("[FRACTIONAL_INVALID_SCALE]"));
    }
}
