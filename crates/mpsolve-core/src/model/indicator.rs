//! Big-M linearization of indicator constraints.
//!
//! `(z == 1) -> a.x <= b` becomes `a.x + M z <= b + M` and
//! `(z == 0) -> a.x <= b` becomes `a.x - M z <= b`, where `M` is the slack
//! between `b` and the largest activity `a.x` can reach inside the current
//! variable bounds. `>=` is symmetric on the smallest activity.

use crate::types::{Bounds, NumberType};
use mpsolve_expr::expr::{ComparisonSense, IndicatorExpr};
use mpsolve_expr::ids::{ConstraintId, VariableId};

use super::Model;
use super::error::ModelError;

impl Model {
    /// Add `(trigger == active) -> body` for a bool `trigger`.
    ///
    /// The big-M is fixed from the bounds at the time of the call.
    pub fn add_indicator(
        &mut self,
        indicator: IndicatorExpr,
    ) -> Result<ConstraintId, ModelError> {
        let (trigger, active, body) = indicator.into_parts();
        if self.variable(trigger)?.number_type != NumberType::Bool {
            return Err(ModelError::IndicatorTriggerNotBool(trigger));
        }
        let (expr, sense, rhs) = body.into_parts();
        let (terms, constant) = expr.into_parts();
        let rhs = rhs - constant;
        let terms = self.normalize_terms(&terms)?;
        if terms.iter().any(|(var_id, _)| *var_id == trigger) {
            return Err(ModelError::UnsupportedIndicator {
                reason: "the trigger variable may not appear in its own body",
            });
        }

        let (low, high) = self.activity_range(&terms);
        let (big_m, bounds) = match sense {
            ComparisonSense::LessEqual => {
                if !high.is_finite() {
                    return Err(unbounded_body());
                }
                let big_m = (high - rhs).max(0.0);
                let bounds = if active {
                    Bounds::new(f64::NEG_INFINITY, rhs + big_m)
                } else {
                    Bounds::new(f64::NEG_INFINITY, rhs)
                };
                (big_m, bounds)
            }
            ComparisonSense::GreaterEqual => {
                if !low.is_finite() {
                    return Err(unbounded_body());
                }
                let big_m = (rhs - low).max(0.0);
                let bounds = if active {
                    Bounds::new(rhs - big_m, f64::INFINITY)
                } else {
                    Bounds::new(rhs, f64::INFINITY)
                };
                (big_m, bounds)
            }
            ComparisonSense::Equal => {
                return Err(ModelError::UnsupportedIndicator {
                    reason: "equality bodies are not supported; add one `<=` and one `>=` indicator",
                });
            }
        };

        // Sign of M z: pushes the row away from the bound when the trigger
        // is in its inactive state.
        let toward_upper = matches!(sense, ComparisonSense::LessEqual);
        let trigger_coeff = match (toward_upper, active) {
            (true, true) | (false, false) => big_m,
            (true, false) | (false, true) => -big_m,
        };
        let mut row = terms;
        if trigger_coeff != 0.0 {
            row.push((trigger, trigger_coeff));
        }
        let id = self.push_row(&row, bounds)?;

        tracing::debug!(
            component = "model",
            operation = "add_indicator",
            status = "success",
            constraint_id = id.inner(),
            trigger = trigger.inner(),
            active,
            big_m,
            "Linearized indicator constraint"
        );
        Ok(id)
    }

    /// Smallest and largest value of `terms` within the variable bounds.
    pub(crate) fn activity_range(&self, terms: &[(VariableId, f64)]) -> (f64, f64) {
        terms.iter().fold((0.0, 0.0), |(low, high), (var_id, coeff)| {
            let bounds = self.variables[var_id.index()].bounds;
            let (a, b) = (coeff * bounds.lower, coeff * bounds.upper);
            (low + a.min(b), high + a.max(b))
        })
    }
}

fn unbounded_body() -> ModelError {
    ModelError::UnsupportedIndicator {
        reason: "the body is unbounded; give every variable in it finite bounds",
    }
}
