//! Solution snapshot captured after a successful solve.

/// Primal solution read back from the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionSnapshot {
    pub objective_value: f64,
    /// Column values indexed by variable position.
    pub column_values: Vec<f64>,
    /// Row activities indexed by constraint position.
    pub row_values: Vec<f64>,
}

impl SolutionSnapshot {
    pub fn column_value(&self, index: usize) -> Option<f64> {
        self.column_values.get(index).copied()
    }

    pub fn row_value(&self, index: usize) -> Option<f64> {
        self.row_values.get(index).copied()
    }
}
