//! Pending-change tracking between the mirror and the engine.
//!
//! Flush order is fixed: new columns (with nonzeros into rows the engine
//! already has), new rows, bound changes on old columns, the objective,
//! then the quadratic part, then names.

use std::collections::BTreeSet;

use crate::types::{Bounds, Constraint, NumberType, Objective, Sense, Variable};
use mpsolve_expr::ids::{ConstraintId, VariableId};

use super::Model;

#[derive(Debug, Clone, Default)]
pub(crate) struct PendingChanges {
    pub(crate) committed_variables: usize,
    pub(crate) committed_constraints: usize,
    pub(crate) bound_changes: BTreeSet<VariableId>,
    pub(crate) objective_dirty: bool,
    pub(crate) hessian_dirty: bool,
    pub(crate) renamed_variables: BTreeSet<VariableId>,
    pub(crate) renamed_constraints: BTreeSet<ConstraintId>,
}

/// A column the engine has not seen yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAddition {
    pub id: VariableId,
    pub bounds: Bounds,
    pub cost: f64,
    pub integral: bool,
    /// Nonzeros into rows the engine already holds.
    pub entries: Vec<(ConstraintId, f64)>,
}

/// A row the engine has not seen yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RowAddition {
    pub id: ConstraintId,
    pub bounds: Bounds,
    pub terms: Vec<(VariableId, f64)>,
}

/// Full linear objective, sent whenever it changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveUpdate {
    pub sense: Sense,
    pub offset: f64,
    pub costs: Vec<f64>,
}

/// Everything a backend must apply to catch up with the mirror.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommitBatch {
    pub columns: Vec<ColumnAddition>,
    pub rows: Vec<RowAddition>,
    pub bound_changes: Vec<(VariableId, Bounds)>,
    pub objective: Option<ObjectiveUpdate>,
    /// Diagonal quadratic weights; an empty list clears the quadratic part.
    pub hessian: Option<Vec<(VariableId, f64)>>,
    /// Non-empty names of new columns plus renamed committed ones.
    pub column_names: Vec<(VariableId, String)>,
    pub row_names: Vec<(ConstraintId, String)>,
}

impl CommitBatch {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
            && self.rows.is_empty()
            && self.bound_changes.is_empty()
            && self.objective.is_none()
            && self.hessian.is_none()
            && self.column_names.is_empty()
            && self.row_names.is_empty()
    }
}

impl Model {
    /// Whether anything changed since the last [`Model::mark_committed`].
    pub fn has_pending_changes(&self) -> bool {
        self.variables.len() > self.pending.committed_variables
            || self.constraints.len() > self.pending.committed_constraints
            || !self.pending.bound_changes.is_empty()
            || self.pending.objective_dirty
            || self.pending.hessian_dirty
            || !self.pending.renamed_variables.is_empty()
            || !self.pending.renamed_constraints.is_empty()
    }

    /// Collect the changes the engine has not seen, in flush order.
    pub fn pending_changes(&self) -> CommitBatch {
        let first_column = self.pending.committed_variables;
        let columns = self.variables[first_column..]
            .iter()
            .enumerate()
            .map(|(offset, variable)| {
                let index = first_column + offset;
                ColumnAddition {
                    id: VariableId::new(index as u32),
                    bounds: variable.bounds,
                    cost: self.objective.costs[index],
                    integral: variable.number_type.is_integral(),
                    entries: variable.anchors.clone(),
                }
            })
            .collect();

        let first_row = self.pending.committed_constraints;
        let rows = self.constraints[first_row..]
            .iter()
            .enumerate()
            .map(|(offset, constraint)| RowAddition {
                id: ConstraintId::new((first_row + offset) as u32),
                bounds: constraint.bounds,
                terms: constraint.terms.clone(),
            })
            .collect();

        let bound_changes = self
            .pending
            .bound_changes
            .iter()
            .map(|id| (*id, self.variables[id.index()].bounds))
            .collect();

        let objective = self.pending.objective_dirty.then(|| ObjectiveUpdate {
            sense: self.objective.sense,
            offset: self.objective.offset,
            costs: self.objective.costs.clone(),
        });
        let hessian = self
            .pending
            .hessian_dirty
            .then(|| self.objective.quadratic.clone());

        let column_names = (first_column..self.variables.len())
            .map(|index| VariableId::new(index as u32))
            .chain(self.pending.renamed_variables.iter().copied())
            .filter_map(|id| named(id, self.variable_name(id)))
            .collect();
        let row_names = (first_row..self.constraints.len())
            .map(|index| ConstraintId::new(index as u32))
            .chain(self.pending.renamed_constraints.iter().copied())
            .filter_map(|id| named(id, self.constraint_name(id)))
            .collect();

        CommitBatch {
            columns,
            rows,
            bound_changes,
            objective,
            hessian,
            column_names,
            row_names,
        }
    }

    /// Record that the engine now matches the mirror.
    pub fn mark_committed(&mut self) {
        for variable in &mut self.variables[self.pending.committed_variables..] {
            variable.anchors.clear();
        }
        self.pending = PendingChanges {
            committed_variables: self.variables.len(),
            committed_constraints: self.constraints.len(),
            ..PendingChanges::default()
        };
    }

    /// Forget everything the engine was told, so the next batch replays the
    /// whole program into a fresh engine.
    pub fn invalidate_commit(&mut self) {
        for variable in &mut self.variables {
            variable.anchors.clear();
        }
        self.pending = PendingChanges {
            objective_dirty: true,
            hessian_dirty: !self.objective.quadratic.is_empty(),
            ..PendingChanges::default()
        };
    }

    /// Rebuild a mirror from a program the engine already holds, for
    /// example after reading a model file.
    pub fn from_engine(
        columns: Vec<(Bounds, f64, NumberType)>,
        rows: Vec<Constraint>,
        sense: Sense,
        offset: f64,
    ) -> Self {
        let costs = columns.iter().map(|(_, cost, _)| *cost).collect();
        let variables = columns
            .into_iter()
            .map(|(bounds, _, number_type)| Variable {
                bounds,
                number_type,
                anchors: Vec::new(),
            })
            .collect();
        let mut model = Self {
            variables,
            constraints: rows,
            objective: Objective {
                sense,
                offset,
                costs,
                quadratic: Vec::new(),
            },
            ..Self::default()
        };
        model.mark_committed();
        model
    }
}

/// Empty names are skipped; the engine refuses them.
fn named<Id>(id: Id, name: Option<&str>) -> Option<(Id, String)> {
    name.filter(|name| !name.is_empty())
        .map(|name| (id, name.to_owned()))
}
