//! mpsolve core: the program definition mirror.
//!
//! A [`Model`] records variables, constraints, and the objective, tracks what
//! an engine backend still has to be told, and builds feasibility
//! relaxations. It never calls an engine itself.

pub mod model;
pub mod relax;
pub mod types;

pub use model::{
    ColumnAddition, CommitBatch, Model, ModelError, ObjectiveUpdate, RelaxPlan, RowAddition,
};
pub use relax::{DEFAULT_BIG_M, RELAX_FAILED, RelaxObjective, RelaxRequest, RelaxScope};
pub use types::{Bounds, Constraint, NumberType, Objective, Sense, Variable, VariableSpec};
