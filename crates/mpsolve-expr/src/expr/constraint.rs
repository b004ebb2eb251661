//! Logical expressions: comparisons against a right-hand side and
//! indicator implications built on top of them.

use crate::expr::core::LinearExpr;
use crate::ids::VariableId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }
}

/// `expr ⋈ rhs` with the expression constant already folded into `rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpr {
    expr: LinearExpr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(expr: LinearExpr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (LinearExpr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }

    /// Guard this comparison: it only has to hold when `trigger == 1`.
    pub fn only_if(self, trigger: VariableId) -> IndicatorExpr {
        IndicatorExpr::new(trigger, true, self)
    }

    /// Guard this comparison: it only has to hold when `trigger == 0`.
    pub fn unless(self, trigger: VariableId) -> IndicatorExpr {
        IndicatorExpr::new(trigger, false, self)
    }
}

/// `(trigger == active) → body`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorExpr {
    trigger: VariableId,
    active: bool,
    body: ConstraintExpr,
}

impl IndicatorExpr {
    pub fn new(trigger: VariableId, active: bool, body: ConstraintExpr) -> Self {
        Self {
            trigger,
            active,
            body,
        }
    }

    pub fn trigger(&self) -> VariableId {
        self.trigger
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn body(&self) -> &ConstraintExpr {
        &self.body
    }

    pub fn into_parts(self) -> (VariableId, bool, ConstraintExpr) {
        (self.trigger, self.active, self.body)
    }
}

/// Anything accepted as a single logical constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalExpr {
    Comparison(ConstraintExpr),
    Indicator(IndicatorExpr),
}

impl From<ConstraintExpr> for LogicalExpr {
    fn from(value: ConstraintExpr) -> Self {
        LogicalExpr::Comparison(value)
    }
}

impl From<IndicatorExpr> for LogicalExpr {
    fn from(value: IndicatorExpr) -> Self {
        LogicalExpr::Indicator(value)
    }
}
