use mpsolve_expr::ids::{ConstraintId, VariableId};

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberType {
    /// Integer restricted to {0, 1}.
    Bool,
    Integer,
    #[default]
    Real,
}

impl NumberType {
    pub fn as_str(self) -> &'static str {
        match self {
            NumberType::Bool => "bool",
            NumberType::Integer => "integer",
            NumberType::Real => "real",
        }
    }

    /// Whether the engine must treat the column as integral.
    pub fn is_integral(self) -> bool {
        !matches!(self, NumberType::Real)
    }
}

/// Bounds for a variable or constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `(-inf, +inf)`
    pub fn free() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// `[0, +inf)`
    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    pub(crate) fn is_valid(&self) -> bool {
        !self.lower.is_nan() && !self.upper.is_nan() && self.lower <= self.upper
    }

    /// Restrict to `[0, 1]`, as required for boolean variables.
    pub(crate) fn clamp_boolean(self) -> Self {
        Self::new(self.lower.max(0.0), self.upper.min(1.0))
    }
}

/// Everything needed to create one decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    pub bounds: Bounds,
    pub cost: f64,
    pub number_type: NumberType,
    pub name: Option<String>,
}

impl VariableSpec {
    pub fn new(lower: f64, upper: f64, cost: f64, number_type: NumberType) -> Self {
        Self {
            bounds: Bounds::new(lower, upper),
            cost,
            number_type,
            name: None,
        }
    }

    /// Create a continuous variable with specified bounds.
    pub fn real(lower: f64, upper: f64) -> Self {
        Self::new(lower, upper, 0.0, NumberType::Real)
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(lower: f64, upper: f64) -> Self {
        Self::new(lower, upper, 0.0, NumberType::Integer)
    }

    /// Create a boolean variable with bounds [0, 1].
    pub fn boolean() -> Self {
        Self::new(0.0, 1.0, 0.0, NumberType::Bool)
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A decision variable as mirrored by the program.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub bounds: Bounds,
    pub number_type: NumberType,
    /// Coefficients into rows that were already committed when the
    /// variable was created; flushed with the column.
    pub(crate) anchors: Vec<(ConstraintId, f64)>,
}

/// A constraint row `lower <= terms <= upper`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub bounds: Bounds,
    pub terms: Vec<(VariableId, f64)>,
}

/// Linear objective in dense form plus an optional diagonal quadratic part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Objective {
    pub sense: Sense,
    pub offset: f64,
    /// One cost per variable, indexed by `VariableId::index`.
    pub costs: Vec<f64>,
    /// Diagonal weights `w` contributing `w * x^2`.
    pub quadratic: Vec<(VariableId, f64)>,
}

impl Objective {
    /// Non-zero linear terms in variable order.
    pub fn linear_terms(&self) -> Vec<(VariableId, f64)> {
        self.costs
            .iter()
            .enumerate()
            .filter(|(_, cost)| **cost != 0.0)
            .map(|(index, cost)| (VariableId::new(index as u32), *cost))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn boolean_bounds_are_clamped() {
        let clamped = Bounds::new(-3.0, 5.0).clamp_boolean();
        assert_eq!(clamped, Bounds::new(0.0, 1.0));
        assert_eq!(Bounds::new(1.0, 1.0).clamp_boolean(), Bounds::new(1.0, 1.0));
    }

    #[test]
    fn bounds_validity() {
        assert!(Bounds::free().is_valid());
        assert!(Bounds::new(2.0, 2.0).is_valid());
        assert!(!Bounds::new(3.0, 2.0).is_valid());
        assert!(!Bounds::new(f64::NAN, 2.0).is_valid());
    }

    #[test]
    fn number_type_integrality() {
        assert!(NumberType::Bool.is_integral());
        assert!(NumberType::Integer.is_integral());
        assert!(!NumberType::Real.is_integral());
    }

    #[test]
    fn objective_linear_terms_skip_zero_costs() {
        let objective = Objective {
            costs: vec![0.0, 2.0, 0.0, -1.0],
            ..Objective::default()
        };
        assert_eq!(
            objective.linear_terms(),
            vec![(VariableId::new(1), 2.0), (VariableId::new(3), -1.0)]
        );
    }
}
