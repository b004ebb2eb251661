//! Storage access methods for the model.

use crate::types::{Constraint, Objective, Variable};
use mpsolve_expr::ids::{ConstraintId, VariableId};

use super::Model;
use super::error::ModelError;

impl Model {
    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Get the number of constraints
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Get the number of coefficients in the model.
    pub fn coefficient_count(&self) -> usize {
        self.constraints.iter().map(|row| row.terms.len()).sum()
    }

    /// Get a variable by ID.
    pub fn variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or(ModelError::InvalidVariableId(id))
    }

    /// Get a constraint by ID.
    pub fn constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(id.index())
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Whether any variable must take integral values.
    pub fn has_integral_variables(&self) -> bool {
        self.variables
            .iter()
            .any(|variable| variable.number_type.is_integral())
    }
}
