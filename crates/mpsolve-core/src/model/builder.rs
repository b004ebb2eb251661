//! Model builder methods for adding variables, constraints, and objectives.

use std::collections::BTreeMap;

use crate::types::{Bounds, Constraint, NumberType, Sense, Variable, VariableSpec};
use mpsolve_expr::expr::{ComparisonSense, ConstraintExpr, LinearExpr, LogicalExpr};
use mpsolve_expr::ids::{ConstraintId, VariableId};

use crate::model::error::ModelError;
use crate::model::{Model, check_lengths};

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, spec: VariableSpec) -> Result<VariableId, ModelError> {
        self.add_variable_with_anchors(spec, &[], &[])
    }

    /// Add a variable that also appears in `constraint` with `coefficient`.
    pub fn add_variable_anchored(
        &mut self,
        spec: VariableSpec,
        constraint: ConstraintId,
        coefficient: f64,
    ) -> Result<VariableId, ModelError> {
        self.add_variable_with_anchors(spec, &[constraint], &[coefficient])
    }

    /// Add a variable that appears in every listed constraint with coefficient 1.
    pub fn add_variable_in(
        &mut self,
        spec: VariableSpec,
        constraints: &[ConstraintId],
    ) -> Result<VariableId, ModelError> {
        let ones = vec![1.0; constraints.len()];
        self.add_variable_with_anchors(spec, constraints, &ones)
    }

    /// Add a variable and insert it into existing constraints.
    ///
    /// This is the column-generation entry point: `coefficients[i]` is the
    /// new variable's coefficient in `constraints[i]`. Repeated constraints
    /// have their coefficients summed.
    pub fn add_variable_with_anchors(
        &mut self,
        spec: VariableSpec,
        constraints: &[ConstraintId],
        coefficients: &[f64],
    ) -> Result<VariableId, ModelError> {
        check_lengths("coefficients", constraints.len(), coefficients.len())?;
        let bounds = validated_bounds(&spec)?;
        if !spec.cost.is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: spec.cost,
            });
        }
        let mut merged: BTreeMap<ConstraintId, f64> = BTreeMap::new();
        for (&constraint_id, &coefficient) in constraints.iter().zip(coefficients) {
            self.ensure_constraint_exists(constraint_id)?;
            if !coefficient.is_finite() {
                return Err(ModelError::InvalidCoefficient { coefficient });
            }
            *merged.entry(constraint_id).or_insert(0.0) += coefficient;
        }

        let id = VariableId::new(self.variables.len() as u32);
        let mut anchors = Vec::new();
        for (constraint_id, coefficient) in merged {
            if coefficient == 0.0 {
                continue;
            }
            self.constraints[constraint_id.index()]
                .terms
                .push((id, coefficient));
            if constraint_id.index() < self.pending.committed_constraints {
                anchors.push((constraint_id, coefficient));
            }
        }

        tracing::trace!(
            component = "model",
            operation = "add_variable",
            status = "success",
            variable_id = id.inner(),
            number_type = spec.number_type.as_str(),
            anchors = anchors.len(),
            "Added variable"
        );

        self.variables.push(Variable {
            bounds,
            number_type: spec.number_type,
            anchors,
        });
        self.objective.costs.push(spec.cost);
        if let Some(name) = spec.name {
            self.variable_names
                .get_or_insert_with(BTreeMap::new)
                .insert(id, name);
        }
        Ok(id)
    }

    /// Add several variables; the i-th id belongs to the i-th spec.
    ///
    /// Either every spec is added or none is.
    pub fn add_variables(
        &mut self,
        specs: Vec<VariableSpec>,
    ) -> Result<Vec<VariableId>, ModelError> {
        for spec in &specs {
            validated_bounds(spec)?;
            if !spec.cost.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    coefficient: spec.cost,
                });
            }
        }
        let ids = specs
            .into_iter()
            .map(|spec| self.add_variable(spec))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            component = "model",
            operation = "add_variables",
            status = "success",
            count = ids.len(),
            "Added variable batch"
        );
        Ok(ids)
    }

    /// Add `count` variables described by parallel arrays.
    pub fn add_variables_from_arrays(
        &mut self,
        count: usize,
        lower_bounds: &[f64],
        upper_bounds: &[f64],
        costs: &[f64],
        number_types: &[NumberType],
    ) -> Result<Vec<VariableId>, ModelError> {
        check_lengths("lower bounds", count, lower_bounds.len())?;
        check_lengths("upper bounds", count, upper_bounds.len())?;
        check_lengths("objective coefficients", count, costs.len())?;
        check_lengths("number types", count, number_types.len())?;
        let specs = (0..count)
            .map(|i| VariableSpec::new(lower_bounds[i], upper_bounds[i], costs[i], number_types[i]))
            .collect();
        self.add_variables(specs)
    }

    /// Add a comparison or indicator constraint.
    pub fn add_constraint(
        &mut self,
        expr: impl Into<LogicalExpr>,
    ) -> Result<ConstraintId, ModelError> {
        match expr.into() {
            LogicalExpr::Comparison(comparison) => self.add_comparison(comparison),
            LogicalExpr::Indicator(indicator) => self.add_indicator(indicator),
        }
    }

    /// Add `lower <= expr <= upper`.
    pub fn add_range(
        &mut self,
        expr: LinearExpr,
        lower: f64,
        upper: f64,
    ) -> Result<ConstraintId, ModelError> {
        let (terms, constant) = expr.into_parts();
        self.push_row(&terms, Bounds::new(lower - constant, upper - constant))
    }

    /// Range constraints whose bounds are expressions cannot be expressed.
    ///
    /// Always fails with [`ModelError::UnsupportedRangeExpr`] and adds nothing;
    /// add `lower <= expr` and `expr <= upper` as two constraints instead.
    pub fn add_range_expr(
        &mut self,
        _expr: LinearExpr,
        _lower: LinearExpr,
        _upper: LinearExpr,
    ) -> Result<ConstraintId, ModelError> {
        tracing::warn!(
            component = "model",
            operation = "add_range_expr",
            status = "unsupported",
            "Rejected range constraint with expression bounds"
        );
        Err(ModelError::UnsupportedRangeExpr)
    }

    pub(crate) fn add_comparison(
        &mut self,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let (expr, sense, rhs) = constraint.into_parts();
        let (terms, constant) = expr.into_parts();
        let rhs = rhs - constant;
        let bounds = match sense {
            ComparisonSense::LessEqual => Bounds::new(f64::NEG_INFINITY, rhs),
            ComparisonSense::GreaterEqual => Bounds::new(rhs, f64::INFINITY),
            ComparisonSense::Equal => Bounds::new(rhs, rhs),
        };
        self.push_row(&terms, bounds)
    }

    pub(crate) fn push_row(
        &mut self,
        terms: &[(VariableId, f64)],
        bounds: Bounds,
    ) -> Result<ConstraintId, ModelError> {
        if !bounds.is_valid() {
            return Err(ModelError::InvalidConstraintBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        let terms = self.normalize_terms(terms)?;
        let id = ConstraintId::new(self.constraints.len() as u32);
        tracing::trace!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint_id = id.inner(),
            terms = terms.len(),
            "Added constraint"
        );
        self.constraints.push(Constraint { bounds, terms });
        Ok(id)
    }

    /// Replace the objective expression, and the sense when one is given.
    pub fn set_objective(
        &mut self,
        expr: LinearExpr,
        sense: Option<Sense>,
    ) -> Result<(), ModelError> {
        let terms = self.normalize_terms(expr.terms())?;
        if !expr.constant().is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: expr.constant(),
            });
        }
        self.objective.costs.iter_mut().for_each(|cost| *cost = 0.0);
        for (var_id, coeff) in &terms {
            self.objective.costs[var_id.index()] = *coeff;
        }
        self.objective.offset = expr.constant();
        if let Some(sense) = sense {
            self.objective.sense = sense;
        }
        self.pending.objective_dirty = true;
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = self.objective.sense.as_str(),
            terms = terms.len(),
            "Set objective function"
        );
        Ok(())
    }

    /// Change only the optimization sense.
    pub fn set_sense(&mut self, sense: Sense) {
        self.objective.sense = sense;
        self.pending.objective_dirty = true;
    }

    /// Re-bound an existing variable. Bool variables are not clamped here.
    pub fn set_bounds(&mut self, id: VariableId, bounds: Bounds) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        if !bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        self.variables[id.index()].bounds = bounds;
        if id.index() < self.pending.committed_variables {
            self.pending.bound_changes.insert(id);
        }
        Ok(())
    }
}

fn validated_bounds(spec: &VariableSpec) -> Result<Bounds, ModelError> {
    let invalid = ModelError::InvalidVariableBounds {
        lower: spec.bounds.lower,
        upper: spec.bounds.upper,
    };
    if !spec.bounds.is_valid() {
        return Err(invalid);
    }
    let bounds = match spec.number_type {
        NumberType::Bool => spec.bounds.clamp_boolean(),
        NumberType::Integer | NumberType::Real => spec.bounds,
    };
    if bounds.is_valid() { Ok(bounds) } else { Err(invalid) }
}
