use crate::model::Model;
use crate::types::VariableSpec;
use mpsolve_expr::ids::VariableId;

pub(super) fn real(lower: f64, upper: f64) -> VariableSpec {
    VariableSpec::real(lower, upper)
}

/// `x, y` in `[0, 10]`, nothing else.
pub(super) fn two_variable_model() -> (Model, VariableId, VariableId) {
    let mut model = Model::new();
    let x = model.add_variable(real(0.0, 10.0)).unwrap();
    let y = model.add_variable(real(0.0, 10.0)).unwrap();
    (model, x, y)
}
