//! Handles and expressions shared by every mpsolve layer.

pub mod expr;
pub mod ids;

pub use expr::{
    ComparisonSense, ConstraintExpr, ExprError, IndicatorExpr, LinearExpr, LogicalExpr,
    linear_sum, linear_terms, quicksum,
};
pub use ids::{ConstraintId, VariableId};
