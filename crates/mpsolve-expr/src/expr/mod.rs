//! Expression types for program modeling.
//!
//! - `core`       - LinearExpr: weighted sum of variables + constant
//! - `constraint` - comparisons, indicators, and the LogicalExpr union
//! - `builders`   - helpers for assembling expressions from slices
//! - `error`      - Expression construction errors

pub mod builders;
pub mod constraint;
pub mod core;
pub mod error;

pub use builders::{linear_sum, linear_terms, quicksum};
pub use constraint::{ComparisonSense, ConstraintExpr, IndicatorExpr, LogicalExpr};
pub use core::LinearExpr;
pub use error::ExprError;
