//! Feasibility relaxation construction.
//!
//! Relaxation rewrites the mirror in place: violations become ordinary
//! non-negative variables, the objective is swapped for the violation
//! penalty, and the original objective is kept in the returned plan so the
//! caller can bring it back.

use crate::relax::{RelaxObjective, RelaxRequest, RelaxScope, is_relaxable};
use crate::types::{Bounds, Objective, Sense, VariableSpec};
use mpsolve_expr::ids::{ConstraintId, VariableId};

use super::error::ModelError;
use super::{Model, check_lengths};

/// Outcome of [`Model::build_relaxation`].
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxPlan {
    pub(crate) saved: Objective,
    pub objective: RelaxObjective,
    pub optimize_original: bool,
    /// Variables weighted in the phase-one objective with their penalties.
    pub penalty: Vec<(VariableId, f64)>,
    /// Every variable the relaxation created.
    pub artificials: Vec<VariableId>,
    /// Bounds of relaxed variables as they were before relaxation.
    pub(crate) relaxed_bounds: Vec<(VariableId, Bounds)>,
}

impl RelaxPlan {
    /// The objective that was active before relaxation.
    pub fn saved_objective(&self) -> &Objective {
        &self.saved
    }
}

impl Model {
    /// Rewrite the program into its feasibility relaxation.
    ///
    /// Nothing is modified when the request is rejected.
    pub fn build_relaxation(&mut self, request: &RelaxRequest) -> Result<RelaxPlan, ModelError> {
        self.validate_relaxation(request)?;
        let (bound_targets, row_targets) = self.relaxation_targets(&request.scope);

        let saved = self.objective.clone();
        self.objective.costs.iter_mut().for_each(|cost| *cost = 0.0);
        self.objective.offset = 0.0;
        self.objective.sense = Sense::Minimize;
        if !self.objective.quadratic.is_empty() {
            self.objective.quadratic.clear();
            self.pending.hessian_dirty = true;
        }
        self.pending.objective_dirty = true;

        let mut violations: Vec<(VariableId, f64)> = Vec::new();
        let mut relaxed_bounds = Vec::new();
        for (var_id, lower_penalty, upper_penalty) in bound_targets {
            let bounds = self.variables[var_id.index()].bounds;
            let mut relaxed = bounds;
            if is_relaxable(lower_penalty) && bounds.lower.is_finite() {
                let artificial = self.add_artificial("lb", var_id.index())?;
                self.push_row(
                    &[(var_id, 1.0), (artificial, 1.0)],
                    Bounds::new(bounds.lower, f64::INFINITY),
                )?;
                relaxed.lower = f64::NEG_INFINITY;
                violations.push((artificial, lower_penalty));
            }
            if is_relaxable(upper_penalty) && bounds.upper.is_finite() {
                let artificial = self.add_artificial("ub", var_id.index())?;
                self.push_row(
                    &[(var_id, 1.0), (artificial, -1.0)],
                    Bounds::new(f64::NEG_INFINITY, bounds.upper),
                )?;
                relaxed.upper = f64::INFINITY;
                violations.push((artificial, upper_penalty));
            }
            if relaxed != bounds {
                relaxed_bounds.push((var_id, bounds));
                self.set_bounds(var_id, relaxed)?;
            }
        }

        for (constraint_id, penalty) in row_targets {
            if !is_relaxable(penalty) {
                continue;
            }
            let bounds = self.constraints[constraint_id.index()].bounds;
            if bounds.lower.is_finite() {
                let artificial = self.add_artificial_anchored("rowlb", constraint_id, 1.0)?;
                violations.push((artificial, penalty));
            }
            if bounds.upper.is_finite() {
                let artificial = self.add_artificial_anchored("rowub", constraint_id, -1.0)?;
                violations.push((artificial, penalty));
            }
        }

        let mut artificials: Vec<VariableId> = violations.iter().map(|(id, _)| *id).collect();
        let mut penalty = Vec::with_capacity(violations.len());
        match request.objective {
            RelaxObjective::Linear => {
                for (artificial, weight) in violations {
                    self.objective.costs[artificial.index()] = weight;
                    penalty.push((artificial, weight));
                }
            }
            RelaxObjective::Quadratic => {
                self.objective.quadratic = violations.clone();
                self.pending.hessian_dirty = true;
                penalty = violations;
            }
            RelaxObjective::Cardinality => {
                for (artificial, weight) in violations {
                    let indicator = self.add_variable(
                        VariableSpec::boolean()
                            .with_name(format!("feasrelax:ind:{}", artificial.index())),
                    )?;
                    self.push_row(
                        &[(artificial, 1.0), (indicator, -request.big_m)],
                        Bounds::new(f64::NEG_INFINITY, 0.0),
                    )?;
                    self.objective.costs[indicator.index()] = weight;
                    penalty.push((indicator, weight));
                    artificials.push(indicator);
                }
            }
        }

        tracing::debug!(
            component = "relax",
            operation = "build",
            status = "success",
            objective = request.objective.as_str(),
            optimize_original = request.optimize_original,
            artificials = artificials.len(),
            "Built feasibility relaxation"
        );

        Ok(RelaxPlan {
            saved,
            objective: request.objective,
            optimize_original: request.optimize_original,
            penalty,
            artificials,
            relaxed_bounds,
        })
    }

    /// Undo a relaxation whose phase one found nothing: original bounds
    /// and objective come back, and every artificial is fixed at zero so
    /// the rows it touches mean what they meant before.
    pub fn abandon_relaxation(&mut self, plan: RelaxPlan) -> Result<(), ModelError> {
        for (var_id, bounds) in &plan.relaxed_bounds {
            self.set_bounds(*var_id, *bounds)?;
        }
        for artificial in &plan.artificials {
            self.set_bounds(*artificial, Bounds::new(0.0, 0.0))?;
        }
        self.restore_objective(plan.saved);
        tracing::debug!(
            component = "relax",
            operation = "abandon",
            status = "success",
            artificials = plan.artificials.len(),
            restored_bounds = plan.relaxed_bounds.len(),
            "Rolled back feasibility relaxation"
        );
        Ok(())
    }

    /// Cap total violation at `violation + tolerance` and restore the
    /// original objective. Returns the budget row.
    pub fn finish_relaxation(
        &mut self,
        plan: RelaxPlan,
        violation: f64,
        tolerance: f64,
    ) -> Result<ConstraintId, ModelError> {
        if plan.objective == RelaxObjective::Quadratic {
            return Err(quadratic_with_original());
        }
        let budget = self.push_row(
            &plan.penalty,
            Bounds::new(f64::NEG_INFINITY, violation + tolerance),
        )?;
        self.restore_objective(plan.saved);
        tracing::debug!(
            component = "relax",
            operation = "finish",
            status = "success",
            violation,
            budget_row = budget.inner(),
            "Restored original objective under violation budget"
        );
        Ok(budget)
    }

    /// Reinstall a saved objective; variables created since get zero cost.
    pub fn restore_objective(&mut self, saved: Objective) {
        let count = self.variables.len();
        let had_quadratic = !self.objective.quadratic.is_empty();
        self.objective = saved;
        self.objective.costs.resize(count, 0.0);
        if had_quadratic || !self.objective.quadratic.is_empty() {
            self.pending.hessian_dirty = true;
        }
        self.pending.objective_dirty = true;
    }

    fn validate_relaxation(&self, request: &RelaxRequest) -> Result<(), ModelError> {
        if request.objective == RelaxObjective::Quadratic {
            if request.optimize_original {
                return Err(quadratic_with_original());
            }
            if self.has_integral_variables() {
                return Err(ModelError::UnsupportedRelaxation {
                    reason: "quadratic relaxation requires a continuous program",
                });
            }
        }
        if request.objective == RelaxObjective::Cardinality
            && !(request.big_m.is_finite() && request.big_m > 0.0)
        {
            return Err(ModelError::InvalidBigM {
                value: request.big_m,
            });
        }
        if let RelaxScope::Explicit {
            constraints,
            rhs_penalties,
            variables,
            lower_penalties,
            upper_penalties,
        } = &request.scope
        {
            check_lengths("constraint penalties", constraints.len(), rhs_penalties.len())?;
            check_lengths("lower bound penalties", variables.len(), lower_penalties.len())?;
            check_lengths("upper bound penalties", variables.len(), upper_penalties.len())?;
            for constraint_id in constraints {
                self.ensure_constraint_exists(*constraint_id)?;
            }
            for var_id in variables {
                self.ensure_variable_exists(*var_id)?;
            }
        }
        Ok(())
    }

    #[allow(clippy::type_complexity)]
    fn relaxation_targets(
        &self,
        scope: &RelaxScope,
    ) -> (Vec<(VariableId, f64, f64)>, Vec<(ConstraintId, f64)>) {
        match scope {
            RelaxScope::All {
                bounds,
                constraints,
            } => {
                let bound_targets = if *bounds {
                    (0..self.variables.len())
                        .map(|i| (VariableId::new(i as u32), 1.0, 1.0))
                        .collect()
                } else {
                    Vec::new()
                };
                let row_targets = if *constraints {
                    (0..self.constraints.len())
                        .map(|i| (ConstraintId::new(i as u32), 1.0))
                        .collect()
                } else {
                    Vec::new()
                };
                (bound_targets, row_targets)
            }
            RelaxScope::Explicit {
                constraints,
                rhs_penalties,
                variables,
                lower_penalties,
                upper_penalties,
            } => {
                let bound_targets = variables
                    .iter()
                    .zip(lower_penalties.iter().zip(upper_penalties))
                    .map(|(id, (lower, upper))| (*id, *lower, *upper))
                    .collect();
                let row_targets = constraints
                    .iter()
                    .copied()
                    .zip(rhs_penalties.iter().copied())
                    .collect();
                (bound_targets, row_targets)
            }
        }
    }

    fn add_artificial(&mut self, kind: &str, index: usize) -> Result<VariableId, ModelError> {
        self.add_variable(artificial_spec(kind, index))
    }

    fn add_artificial_anchored(
        &mut self,
        kind: &str,
        constraint_id: ConstraintId,
        coefficient: f64,
    ) -> Result<VariableId, ModelError> {
        self.add_variable_anchored(
            artificial_spec(kind, constraint_id.index()),
            constraint_id,
            coefficient,
        )
    }
}

fn artificial_spec(kind: &str, index: usize) -> VariableSpec {
    VariableSpec::real(0.0, f64::INFINITY).with_name(format!("feasrelax:{kind}:{index}"))
}

fn quadratic_with_original() -> ModelError {
    ModelError::UnsupportedRelaxation {
        reason: "quadratic violation cannot be combined with re-optimizing the original objective; use the linear or cardinality objective",
    }
}
