//! Model module for building optimization programs.
//!
//! The [`Model`] mirrors everything the engine will hold and remembers what
//! has not been pushed to it yet. Nothing here talks to an engine; a backend
//! drains [`Model::pending_changes`] and acknowledges with
//! [`Model::mark_committed`].
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for adding variables, constraints, and objectives
//! - [`indicator`]: Big-M linearization of indicator constraints
//! - [`storage`]: Read access to the mirrored program
//! - [`metadata`]: Variable and constraint naming
//! - [`commit`]: Pending-change tracking
//! - [`relax`]: Feasibility relaxation construction

mod builder;
mod commit;
mod error;
mod indicator;
mod metadata;
mod relax;
mod storage;

use crate::types::{Constraint, Objective, Variable};
use mpsolve_expr::ids::{ConstraintId, VariableId};
use std::collections::BTreeMap;

pub use commit::{ColumnAddition, CommitBatch, ObjectiveUpdate, RowAddition};
pub use error::ModelError;
pub(crate) use error::check_lengths;
pub use relax::RelaxPlan;

use commit::PendingChanges;

/// A program definition with deferred engine materialization.
///
/// Handles are dense indices: the i-th variable is `VariableId(i)`, the
/// i-th constraint is `ConstraintId(i)`. Nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Objective,
    pub(crate) pending: PendingChanges,
    // Lazy-allocated metadata storage
    pub(crate) variable_names: Option<BTreeMap<VariableId, String>>,
    pub(crate) constraint_names: Option<BTreeMap<ConstraintId, String>>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        if id.index() < self.constraints.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidConstraintId(id))
        }
    }

    /// Validate and merge terms, dropping zeros.
    pub(crate) fn normalize_terms(
        &self,
        terms: &[(VariableId, f64)],
    ) -> Result<Vec<(VariableId, f64)>, ModelError> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for &(var_id, coeff) in terms {
            self.ensure_variable_exists(var_id)?;
            if !coeff.is_finite() {
                return Err(ModelError::InvalidCoefficient { coefficient: coeff });
            }
            *merged.entry(var_id).or_insert(0.0) += coeff;
        }
        Ok(merged.into_iter().filter(|(_, coeff)| *coeff != 0.0).collect())
    }
}
