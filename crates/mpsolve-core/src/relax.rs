//! Feasibility relaxation requests.

use mpsolve_expr::ids::{ConstraintId, VariableId};

/// Returned by a relaxation that re-optimizes the original objective when
/// the phase-one problem produced no solution.
pub const RELAX_FAILED: f64 = -1.0;

/// Default big-M linking violation to its indicator in cardinality mode.
pub const DEFAULT_BIG_M: f64 = 1e6;

/// How violations are penalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelaxObjective {
    /// Weighted sum of violation magnitudes.
    #[default]
    Linear,
    /// Weighted sum of squared violations.
    Quadratic,
    /// Weighted count of violated bounds and constraints.
    Cardinality,
}

impl RelaxObjective {
    pub fn as_str(self) -> &'static str {
        match self {
            RelaxObjective::Linear => "linear",
            RelaxObjective::Quadratic => "quadratic",
            RelaxObjective::Cardinality => "cardinality",
        }
    }
}

/// Which elements may be violated.
#[derive(Debug, Clone, PartialEq)]
pub enum RelaxScope {
    /// Every variable bound and/or every constraint, each with unit penalty.
    All { bounds: bool, constraints: bool },
    /// Explicit elements with per-element penalties. Parallel slices must
    /// have matching lengths.
    Explicit {
        constraints: Vec<ConstraintId>,
        rhs_penalties: Vec<f64>,
        variables: Vec<VariableId>,
        lower_penalties: Vec<f64>,
        upper_penalties: Vec<f64>,
    },
}

/// A single relaxation call, consumed by the program.
///
/// A negative or infinite penalty marks the element as not relaxable.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxRequest {
    pub objective: RelaxObjective,
    pub optimize_original: bool,
    pub scope: RelaxScope,
    pub big_m: f64,
}

impl Default for RelaxRequest {
    fn default() -> Self {
        Self::all(false, true)
    }
}

impl RelaxRequest {
    /// Relax all variable bounds and/or all constraints.
    pub fn all(relax_bounds: bool, relax_constraints: bool) -> Self {
        Self {
            objective: RelaxObjective::Linear,
            optimize_original: false,
            scope: RelaxScope::All {
                bounds: relax_bounds,
                constraints: relax_constraints,
            },
            big_m: DEFAULT_BIG_M,
        }
    }

    /// Relax the given constraints only.
    pub fn constraints(constraints: Vec<ConstraintId>, rhs_penalties: Vec<f64>) -> Self {
        Self::subsets(constraints, rhs_penalties, Vec::new(), Vec::new(), Vec::new())
    }

    /// Relax the bounds of the given variables only.
    pub fn variables(
        variables: Vec<VariableId>,
        lower_penalties: Vec<f64>,
        upper_penalties: Vec<f64>,
    ) -> Self {
        Self::subsets(
            Vec::new(),
            Vec::new(),
            variables,
            lower_penalties,
            upper_penalties,
        )
    }

    /// Relax explicit subsets of constraints and variable bounds together.
    pub fn subsets(
        constraints: Vec<ConstraintId>,
        rhs_penalties: Vec<f64>,
        variables: Vec<VariableId>,
        lower_penalties: Vec<f64>,
        upper_penalties: Vec<f64>,
    ) -> Self {
        Self {
            scope: RelaxScope::Explicit {
                constraints,
                rhs_penalties,
                variables,
                lower_penalties,
                upper_penalties,
            },
            ..Self::all(false, false)
        }
    }

    pub fn with_objective(mut self, objective: RelaxObjective) -> Self {
        self.objective = objective;
        self
    }

    /// After minimizing violation, optimize the original objective among
    /// the minimal-violation solutions.
    pub fn with_optimize_original(mut self, enabled: bool) -> Self {
        self.optimize_original = enabled;
        self
    }

    pub fn with_big_m(mut self, big_m: f64) -> Self {
        self.big_m = big_m;
        self
    }
}

pub(crate) fn is_relaxable(penalty: f64) -> bool {
    penalty.is_finite() && penalty >= 0.0
}
