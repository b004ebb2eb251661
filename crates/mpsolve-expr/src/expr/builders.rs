//! Builder functions for constructing linear expressions.

use crate::expr::core::LinearExpr;
use crate::expr::error::ExprError;
use crate::ids::VariableId;

/// Build a LinearExpr from flexible inputs.
///
/// Accepts either:
/// - `terms`: pre-paired (VariableId, f64) tuples
/// - `variables` + `coefficients`: parallel slices zipped together
///
/// Returns an error if both styles are mixed or if lengths mismatch.
pub fn linear_terms(
    terms: Option<Vec<(VariableId, f64)>>,
    variables: Option<&[VariableId]>,
    coefficients: Option<&[f64]>,
) -> Result<LinearExpr, ExprError> {
    match (terms, variables, coefficients) {
        (Some(t), None, None) => {
            let filtered: Vec<_> = t.into_iter().filter(|(_, c)| *c != 0.0).collect();
            Ok(LinearExpr::from_terms(filtered))
        }
        (None, Some(vars), Some(coeffs)) => {
            if vars.len() != coeffs.len() {
                return Err(ExprError::MismatchedLengths {
                    variables: vars.len(),
                    coefficients: coeffs.len(),
                });
            }
            let filtered: Vec<_> = vars
                .iter()
                .copied()
                .zip(coeffs.iter().copied())
                .filter(|(_, c)| *c != 0.0)
                .collect();
            Ok(LinearExpr::from_terms(filtered))
        }
        (None, None, None) | (None, Some(_), None) | (None, None, Some(_)) => {
            Err(ExprError::MissingInputs)
        }
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ExprError::MixedInputs),
    }
}

/// Sum of the given variables, each with coefficient 1.
pub fn quicksum(variables: &[VariableId]) -> LinearExpr {
    LinearExpr::from_terms(variables.iter().map(|v| (*v, 1.0)).collect())
}

/// Combines multiple expressions into one by concatenating their terms and
/// summing their constants.
///
/// Duplicate variable terms are NOT merged - use `normalized_terms()` on the
/// result if term consolidation is needed.
pub fn linear_sum(exprs: Vec<LinearExpr>) -> LinearExpr {
    exprs.into_iter().sum()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn linear_terms_rejects_mixed_inputs() {
        let result = linear_terms(
            Some(vec![(VariableId::new(1), 1.0)]),
            Some([VariableId::new(1)].as_slice()),
            None,
        );
        assert_eq!(result.unwrap_err(), ExprError::MixedInputs);
    }

    #[test]
    fn linear_terms_rejects_mismatched_lengths() {
        let result = linear_terms(
            None,
            Some([VariableId::new(1), VariableId::new(2)].as_slice()),
            Some([1.0].as_slice()),
        );
        assert_eq!(
            result.unwrap_err(),
            ExprError::MismatchedLengths {
                variables: 2,
                coefficients: 1
            }
        );
    }

    #[test]
    fn linear_terms_filters_zero_coefficients() {
        let expr = linear_terms(
            Some(vec![(VariableId::new(1), 0.0), (VariableId::new(2), 3.5)]),
            None,
            None,
        )
        .expect("linear_terms should succeed");

        let terms = expr
            .terms()
            .iter()
            .map(|(id, coeff)| (id.inner(), *coeff))
            .collect::<Vec<_>>();
        assert_eq!(terms, vec![(2, 3.5)]);
    }

    #[test]
    fn quicksum_uses_unit_coefficients() {
        let expr = quicksum(&[VariableId::new(3), VariableId::new(5)]);
        assert_eq!(
            expr.terms(),
            &[(VariableId::new(3), 1.0), (VariableId::new(5), 1.0)]
        );
    }

    #[test]
    fn linear_sum_concatenates_terms_and_constants() {
        let left = LinearExpr::term(VariableId::new(1), 1.0).add_constant(2.0);
        let right = LinearExpr::term(VariableId::new(2), 2.0).add_constant(0.5);
        let summed = linear_sum(vec![left, right]);
        assert_eq!(summed.terms().len(), 2);
        assert_eq!(summed.constant(), 2.5);
    }
}
