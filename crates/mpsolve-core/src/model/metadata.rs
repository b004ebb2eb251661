//! Metadata methods for variable and constraint naming.

use std::collections::BTreeMap;

use mpsolve_expr::ids::{ConstraintId, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Set name for a variable.
    pub fn set_variable_name(&mut self, id: VariableId, name: String) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        self.variable_names
            .get_or_insert_with(BTreeMap::new)
            .insert(id, name);
        if id.index() < self.pending.committed_variables {
            self.pending.renamed_variables.insert(id);
        }
        Ok(())
    }

    /// Get name for a variable.
    pub fn variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names
            .as_ref()
            .and_then(|names| names.get(&id).map(|s| s.as_str()))
    }

    /// Lookup a variable by name.
    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names.as_ref().and_then(|names| {
            names
                .iter()
                .find_map(|(id, value)| (value == name).then_some(*id))
        })
    }

    /// Set name for a constraint.
    pub fn set_constraint_name(
        &mut self,
        id: ConstraintId,
        name: String,
    ) -> Result<(), ModelError> {
        self.ensure_constraint_exists(id)?;
        self.constraint_names
            .get_or_insert_with(BTreeMap::new)
            .insert(id, name);
        if id.index() < self.pending.committed_constraints {
            self.pending.renamed_constraints.insert(id);
        }
        Ok(())
    }

    /// Get name for a constraint.
    pub fn constraint_name(&self, id: ConstraintId) -> Option<&str> {
        self.constraint_names
            .as_ref()
            .and_then(|names| names.get(&id).map(|s| s.as_str()))
    }

    /// Lookup a constraint by name.
    pub fn constraint_by_name(&self, name: &str) -> Option<ConstraintId> {
        self.constraint_names.as_ref().and_then(|names| {
            names
                .iter()
                .find_map(|(id, value)| (value == name).then_some(*id))
        })
    }
}
