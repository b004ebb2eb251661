//! Expression construction errors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    MixedInputs,
    MissingInputs,
    MismatchedLengths { variables: usize, coefficients: usize },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::MixedInputs => "EXPR_MIXED_INPUTS",
            ExprError::MissingInputs => "EXPR_MISSING_INPUTS",
            ExprError::MismatchedLengths { .. } => "EXPR_MISMATCHED_LENGTHS",
        }
    }
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::MixedInputs => write!(
                f,
                "[{}] Use either terms or variables/coefficients, not both",
                self.code()
            ),
            ExprError::MissingInputs => write!(
                f,
                "[{}] variables and coefficients are required",
                self.code()
            ),
            ExprError::MismatchedLengths {
                variables,
                coefficients,
            } => write!(
                f,
                "[{}] variables ({}) and coefficients ({}) must have the same length",
                self.code(),
                variables,
                coefficients
            ),
        }
    }
}

impl std::error::Error for ExprError {}
