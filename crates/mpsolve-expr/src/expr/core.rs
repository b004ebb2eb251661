//! Linear expression: weighted sum of variables plus a constant.
//!
//! Terms are kept in insertion order and may repeat a variable; callers that
//! need one coefficient per variable use [`LinearExpr::normalized_terms`].

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::ids::VariableId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    constant: f64,
    terms: Vec<(VariableId, f64)>,
}

impl LinearExpr {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (all zeros).
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Expression from linear terms and constant.
    pub fn new(terms: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self { constant, terms }
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            terms: Vec::new(),
        }
    }

    /// Single linear term: coeff * var.
    pub fn term(var_id: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            constant: 0.0,
            terms: vec![(var_id, coeff)],
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var_id: VariableId) -> Self {
        Self::term(var_id, 1.0)
    }

    /// From raw linear terms, no constant.
    pub fn from_terms(terms: Vec<(VariableId, f64)>) -> Self {
        Self {
            constant: 0.0,
            terms,
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(|(_, c)| *c == 0.0)
    }

    /// Consume and return (terms, constant).
    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.terms, self.constant)
    }

    // ── Operations ──────────────────────────────────────────

    /// Scale all terms and constant by a factor.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            terms: self
                .terms
                .iter()
                .map(|(v, c)| (*v, *c * by))
                .filter(|(_, c)| *c != 0.0)
                .collect(),
        }
    }

    /// Add another expression (concatenates terms, sums constants).
    pub fn add(&self, other: &LinearExpr) -> Self {
        let mut terms = Vec::with_capacity(self.terms.len() + other.terms.len());
        terms.extend_from_slice(&self.terms);
        terms.extend_from_slice(&other.terms);
        Self {
            constant: self.constant + other.constant,
            terms,
        }
    }

    /// Add a constant offset.
    pub fn add_constant(&self, value: f64) -> Self {
        Self {
            constant: self.constant + value,
            terms: self.terms.clone(),
        }
    }

    /// Copy with constant set to zero.
    pub fn without_constant(&self) -> Self {
        Self {
            constant: 0.0,
            terms: self.terms.clone(),
        }
    }

    /// Move the constant onto a scaling variable: `(c x + c0)` becomes
    /// `(c x + c0 t)`.
    ///
    /// The result is homogeneous in `(x, t)`, which is what the
    /// Charnes-Cooper change of variable requires.
    pub fn homogenized(&self, scale: VariableId) -> Self {
        let c0 = self.constant;
        let mut expr = self.clone();
        expr += LinearExpr::term(scale, c0);
        expr -= c0;
        expr
    }

    /// Merged terms with duplicates combined and zeros dropped, ordered by id.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in &self.terms {
            if *coeff == 0.0 {
                continue;
            }
            *merged.entry(*var_id).or_insert(0.0) += *coeff;
        }
        merged.into_iter().filter(|(_, c)| *c != 0.0).collect()
    }

    /// Evaluate the expression given a value for each variable.
    pub fn evaluate(&self, mut value_of: impl FnMut(VariableId) -> f64) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, (var, coeff)| acc + coeff * value_of(*var))
    }

    // ── Comparison methods (produce ConstraintExpr) ─────────

    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.without_constant(), sense, rhs - self.constant)
    }

    pub fn compare_expr(&self, other: &LinearExpr, sense: ComparisonSense) -> ConstraintExpr {
        let combined = self.add(&other.scale(-1.0));
        ConstraintExpr::new(combined.without_constant(), sense, -combined.constant)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

// ── Conversions ─────────────────────────────────────────────

impl From<VariableId> for LinearExpr {
    fn from(var_id: VariableId) -> Self {
        LinearExpr::var(var_id)
    }
}

impl From<f64> for LinearExpr {
    fn from(constant: f64) -> Self {
        LinearExpr::from_constant(constant)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl<T: Into<LinearExpr>> std::ops::Add<T> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: T) -> Self::Output {
        self += rhs;
        self
    }
}

impl<T: Into<LinearExpr>> std::ops::Sub<T> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: T) -> Self::Output {
        self -= rhs;
        self
    }
}

impl<T: Into<LinearExpr>> std::ops::AddAssign<T> for LinearExpr {
    fn add_assign(&mut self, rhs: T) {
        let (terms, constant) = rhs.into().into_parts();
        self.terms.extend(terms);
        self.constant += constant;
    }
}

impl<T: Into<LinearExpr>> std::ops::SubAssign<T> for LinearExpr {
    fn sub_assign(&mut self, rhs: T) {
        let (terms, constant) = rhs.into().into_parts();
        self.terms.extend(terms.into_iter().map(|(v, c)| (v, -c)));
        self.constant -= constant;
    }
}

impl std::ops::Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

impl<T: Into<LinearExpr>> std::ops::Add<T> for VariableId {
    type Output = LinearExpr;

    fn add(self, rhs: T) -> Self::Output {
        LinearExpr::var(self) + rhs
    }
}

impl<T: Into<LinearExpr>> std::ops::Sub<T> for VariableId {
    type Output = LinearExpr;

    fn sub(self, rhs: T) -> Self::Output {
        LinearExpr::var(self) - rhs
    }
}

impl std::ops::Mul<f64> for VariableId {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        LinearExpr::term(self, rhs)
    }
}

impl std::ops::Mul<VariableId> for f64 {
    type Output = LinearExpr;

    fn mul(self, rhs: VariableId) -> Self::Output {
        LinearExpr::term(rhs, self)
    }
}

impl std::iter::Sum for LinearExpr {
    fn sum<I: Iterator<Item = LinearExpr>>(iter: I) -> Self {
        iter.fold(LinearExpr::new_empty(), |acc, expr| acc + expr)
    }
}
