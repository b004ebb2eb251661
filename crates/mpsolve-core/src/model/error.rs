//! Model error types.

use mpsolve_expr::ids::{ConstraintId, VariableId};
use thiserror::Error;

/// Errors that can occur during model operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Invalid variable ID
    #[error("[VARIABLE_INVALID_ID] Variable ID {} does not exist", .0.inner())]
    InvalidVariableId(VariableId),
    /// Invalid variable bounds
    #[error("[VARIABLE_INVALID_BOUNDS] Variable bounds invalid: lower ({lower}) > upper ({upper})")]
    InvalidVariableBounds { lower: f64, upper: f64 },
    /// Invalid constraint ID
    #[error("[CONSTRAINT_INVALID_ID] Constraint ID {} does not exist", .0.inner())]
    InvalidConstraintId(ConstraintId),
    /// Invalid constraint bounds
    #[error("[CONSTRAINT_INVALID_BOUNDS] Constraint bounds invalid: lower ({lower}) > upper ({upper})")]
    InvalidConstraintBounds { lower: f64, upper: f64 },
    #[error("[COEFFICIENT_INVALID] Coefficient must be finite (got {coefficient})")]
    InvalidCoefficient { coefficient: f64 },
    /// Parallel inputs disagree in length.
    #[error("[INPUT_LENGTH_MISMATCH] Expected {expected} {what}, got {actual}")]
    MismatchedLengths {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Range constraints with expression bounds cannot be expressed.
    #[error(
        "[MODEL_UNSUPPORTED_RANGE] Range constraints with expression bounds are not supported; \
         add two constraints instead: `lower <= expr` and `expr <= upper`"
    )]
    UnsupportedRangeExpr,
    #[error("[INDICATOR_UNSUPPORTED] Indicator constraint not supported: {reason}")]
    UnsupportedIndicator { reason: &'static str },
    #[error("[INDICATOR_TRIGGER_NOT_BOOL] Indicator trigger {} must be a bool variable", .0.inner())]
    IndicatorTriggerNotBool(VariableId),
    #[error("[RELAX_UNSUPPORTED] Relaxation not supported: {reason}")]
    UnsupportedRelaxation { reason: &'static str },
    #[error("[RELAX_INVALID_BIG_M] Big-M must be positive and finite (got {value})")]
    InvalidBigM { value: f64 },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::InvalidConstraintBounds { .. } => "CONSTRAINT_INVALID_BOUNDS",
            ModelError::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            ModelError::MismatchedLengths { .. } => "INPUT_LENGTH_MISMATCH",
            ModelError::UnsupportedRangeExpr => "MODEL_UNSUPPORTED_RANGE",
            ModelError::UnsupportedIndicator { .. } => "INDICATOR_UNSUPPORTED",
            ModelError::IndicatorTriggerNotBool(_) => "INDICATOR_TRIGGER_NOT_BOOL",
            ModelError::UnsupportedRelaxation { .. } => "RELAX_UNSUPPORTED",
            ModelError::InvalidBigM { .. } => "RELAX_INVALID_BIG_M",
        }
    }

    /// Whether the error signals an operation the engine cannot express,
    /// as opposed to a caller contract violation.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            ModelError::UnsupportedRangeExpr
                | ModelError::UnsupportedIndicator { .. }
                | ModelError::UnsupportedRelaxation { .. }
        )
    }
}

pub(crate) fn check_lengths(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::MismatchedLengths {
            what,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_start_with_code() {
        let errors = [
            ModelError::InvalidVariableId(VariableId::new(4)),
            ModelError::InvalidVariableBounds {
                lower: 2.0,
                upper: 1.0,
            },
            ModelError::InvalidConstraintId(ConstraintId::new(1)),
            ModelError::InvalidConstraintBounds {
                lower: 2.0,
                upper: 1.0,
            },
            ModelError::InvalidCoefficient {
                coefficient: f64::NAN,
            },
            ModelError::MismatchedLengths {
                what: "coefficients",
                expected: 2,
                actual: 3,
            },
            ModelError::UnsupportedRangeExpr,
            ModelError::UnsupportedIndicator { reason: "equality" },
            ModelError::IndicatorTriggerNotBool(VariableId::new(0)),
            ModelError::UnsupportedRelaxation { reason: "quadratic" },
            ModelError::InvalidBigM { value: 0.0 },
        ];
        for err in errors {
            assert!(err.to_string().starts_with(&format!("[{}]", err.code())));
        }
    }

    #[test]
    fn range_error_names_workaround() {
        let msg = ModelError::UnsupportedRangeExpr.to_string();
        assert!(msg.contains("lower <= expr"));
        assert!(msg.contains("expr <= upper"));
        assert!(ModelError::UnsupportedRangeExpr.is_unsupported());
        assert!(!ModelError::InvalidBigM { value: 0.0 }.is_unsupported());
    }

    #[test]
    fn length_check() {
        assert!(check_lengths("bounds", 3, 3).is_ok());
        assert_eq!(
            check_lengths("bounds", 3, 2),
            Err(ModelError::MismatchedLengths {
                what: "bounds",
                expected: 3,
                actual: 2
            })
        );
    }
}
