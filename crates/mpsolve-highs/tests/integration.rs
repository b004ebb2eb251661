#![allow(clippy::float_cmp)]

use mpsolve_core::{Bounds, NumberType, RELAX_FAILED, RelaxObjective, RelaxRequest, Sense, VariableSpec};
use mpsolve_expr::{LinearExpr, VariableId};
use mpsolve_highs::{Environment, LinearFractionalProgram, Program};
use mpsolve_solver::{OutcomeCode, SolveStatus, SolverConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn program() -> Program {
    init_tracing();
    Program::new(&Environment::new()).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected ~{expected}, got {actual}"
    );
}

/// x in [0, 10], x <= 2 and x >= 5, minimize x.
fn conflicting_program() -> (Program, VariableId) {
    let mut program = program();
    let x = program.add_variable(VariableSpec::real(0.0, 10.0)).unwrap();
    program
        .add_constraint(LinearExpr::var(x).le_scalar(2.0))
        .unwrap();
    program
        .add_constraint(LinearExpr::var(x).ge_scalar(5.0))
        .unwrap();
    program
        .set_objective(LinearExpr::var(x), Some(Sense::Minimize))
        .unwrap();
    (program, x)
}

/// Test: minimize 2x + 3y subject to x + y >= 5, x,y >= 0
#[test]
fn test_simple_lp() {
    let mut program = program();
    let x = program
        .add_variable(VariableSpec::real(0.0, f64::INFINITY))
        .unwrap();
    let y = program
        .add_variable(VariableSpec::real(0.0, f64::INFINITY))
        .unwrap();
    program
        .add_constraint((LinearExpr::var(x) + y).ge_scalar(5.0))
        .unwrap();
    program
        .set_objective(2.0 * x + 3.0 * y, Some(Sense::Minimize))
        .unwrap();

    assert_eq!(program.status(), SolveStatus::Ready);
    assert!(program.solve().unwrap());
    assert_eq!(program.status(), SolveStatus::Optimal);
    assert_eq!(program.outcome(), Some(OutcomeCode::Optimal));
    assert_eq!(program.solution_count(), 1);
    assert_close(program.objective_value().unwrap(), 10.0);
    assert_close(program.value(x).unwrap(), 5.0);
    assert_close(program.value(y).unwrap(), 0.0);
}

#[test]
fn test_integer_rounding_down() {
    let mut program = program();
    let x = program
        .add_variable(VariableSpec::integer(0.0, 10.0))
        .unwrap();
    program
        .add_constraint(LinearExpr::var(x).le_scalar(1.5))
        .unwrap();
    program
        .set_objective(LinearExpr::var(x), Some(Sense::Maximize))
        .unwrap();

    assert!(program.solve().unwrap());
    assert_close(program.value(x).unwrap(), 1.0);
}

#[test]
fn test_objective_offset_and_sense_only_change() {
    let mut program = program();
    let x = program.add_variable(VariableSpec::real(1.0, 4.0)).unwrap();
    program
        .set_objective(LinearExpr::var(x) + 10.0, None)
        .unwrap();
    assert!(program.solve().unwrap());
    assert_close(program.objective_value().unwrap(), 11.0);

    program.set_sense(Sense::Maximize);
    assert!(program.solve().unwrap());
    assert_close(program.objective_value().unwrap(), 14.0);
}

#[test]
fn test_bounds_round_trip_through_engine() {
    let mut program = program();
    let specs = [
        VariableSpec::real(-3.0, 4.0),
        VariableSpec::real(f64::NEG_INFINITY, f64::INFINITY),
        VariableSpec::integer(0.0, 7.0),
        VariableSpec::boolean(),
        VariableSpec::real(2.5, 2.5),
    ];
    let ids: Vec<_> = specs
        .iter()
        .map(|spec| program.add_variable(spec.clone()).unwrap())
        .collect();
    program.commit().unwrap();

    for (id, spec) in ids.iter().zip(&specs) {
        let engine = program.engine_bounds(*id).unwrap();
        assert_eq!(engine, spec.bounds, "bounds of {id}");
    }
}

#[test]
fn test_set_bounds_after_commit_reaches_engine() {
    let mut program = program();
    let x = program.add_variable(VariableSpec::real(0.0, 10.0)).unwrap();
    program
        .set_objective(LinearExpr::var(x), Some(Sense::Maximize))
        .unwrap();
    assert!(program.solve().unwrap());
    assert_close(program.value(x).unwrap(), 10.0);

    program.set_bounds(x, Bounds::new(0.0, 3.0)).unwrap();
    assert_eq!(
        program.engine_bounds(x).unwrap_err().code(),
        "PROGRAM_UNCOMMITTED"
    );
    assert!(program.solve().unwrap());
    assert_eq!(program.engine_bounds(x).unwrap(), Bounds::new(0.0, 3.0));
    assert_close(program.value(x).unwrap(), 3.0);
}

#[test]
fn test_batch_preserves_order() {
    let mut program = program();
    let specs: Vec<_> = (0..5)
        .map(|i| VariableSpec::real(f64::from(i), f64::from(i) + 1.0))
        .collect();
    let ids = program.add_variables(specs.clone()).unwrap();
    assert_eq!(ids.len(), 5);
    for (i, (id, spec)) in ids.iter().zip(&specs).enumerate() {
        assert_eq!(id.index(), i);
        assert_eq!(program.model().variable(*id).unwrap().bounds, spec.bounds);
    }

    let more = program
        .add_variables_from_arrays(
            2,
            &[0.0, 1.0],
            &[1.0, 1.0],
            &[0.0, 0.0],
            &[NumberType::Real, NumberType::Bool],
        )
        .unwrap();
    assert_eq!(more[0].index(), 5);
    assert_eq!(more[1].index(), 6);

    let err = program
        .add_variables_from_arrays(2, &[0.0], &[1.0, 1.0], &[0.0, 0.0], &[NumberType::Real; 2])
        .unwrap_err();
    assert_eq!(err.code(), "INPUT_LENGTH_MISMATCH");
    assert_eq!(program.variable_count(), 7);
}

#[test]
fn test_column_generation_between_solves() {
    let mut program = program();
    let x = program
        .add_variable(VariableSpec::real(0.0, f64::INFINITY).with_cost(3.0))
        .unwrap();
    let demand = program
        .add_constraint(LinearExpr::var(x).ge_scalar(4.0))
        .unwrap();
    assert!(program.solve().unwrap());
    assert_close(program.objective_value().unwrap(), 12.0);

    let y = program
        .add_variable_anchored(
            VariableSpec::real(0.0, f64::INFINITY).with_cost(1.0),
            demand,
            1.0,
        )
        .unwrap();
    assert!(program.solve().unwrap());
    assert_close(program.objective_value().unwrap(), 4.0);
    assert_close(program.value(y).unwrap(), 4.0);
    assert_close(program.value(x).unwrap(), 0.0);
    assert_close(program.row_activity(demand).unwrap(), 4.0);
}

#[test]
fn test_reads_after_new_edits_require_commit() {
    let mut program = program();
    let x = program.add_variable(VariableSpec::real(0.0, 1.0)).unwrap();
    assert!(program.solve().unwrap());
    assert!(program.value(x).is_ok());

    program.add_variable(VariableSpec::real(0.0, 1.0)).unwrap();
    assert_eq!(program.value(x).unwrap_err().code(), "PROGRAM_UNCOMMITTED");
    assert_eq!(
        program.objective_value().unwrap_err().code(),
        "PROGRAM_UNCOMMITTED"
    );

    program.commit().unwrap();
    assert_eq!(program.value(x).unwrap_err().code(), "SOLUTION_MISSING");
}

#[test]
fn test_infeasible_program() {
    let (mut program, x) = conflicting_program();
    assert!(!program.solve().unwrap());
    assert_eq!(program.status(), SolveStatus::InsolubleModel);
    assert!(!program.status().solution_found());
    assert_eq!(program.solution_count(), 0);
    assert_eq!(program.value(x).unwrap_err().code(), "SOLUTION_MISSING");
}

#[test]
fn test_empty_program_is_optimal() {
    let mut program = program();
    assert!(program.solve().unwrap());
    assert_eq!(program.status(), SolveStatus::Optimal);
    assert_close(program.objective_value().unwrap(), 0.0);
}

#[test]
fn test_indicator_constraint() {
    let mut program = program();
    let x = program.add_variable(VariableSpec::real(0.0, 10.0)).unwrap();
    let z = program.add_variable(VariableSpec::boolean()).unwrap();
    program
        .add_constraint(LinearExpr::var(x).le_scalar(2.0).only_if(z))
        .unwrap();

    program
        .set_objective(LinearExpr::var(x) + 9.0 * z, Some(Sense::Maximize))
        .unwrap();
    assert!(program.solve().unwrap());
    assert!(program.is_true(z).unwrap());
    assert_close(program.value(x).unwrap(), 2.0);

    program
        .set_objective(LinearExpr::var(x) + 5.0 * z, Some(Sense::Maximize))
        .unwrap();
    assert!(program.solve().unwrap());
    assert!(!program.is_true(z).unwrap());
    assert_close(program.value(x).unwrap(), 10.0);
}

#[test]
fn test_range_with_expression_bounds_is_rejected() {
    let mut program = program();
    let x = program.add_variable(VariableSpec::real(0.0, 10.0)).unwrap();
    let y = program.add_variable(VariableSpec::real(0.0, 10.0)).unwrap();
    let err = program
        .add_range_expr(LinearExpr::var(x), LinearExpr::var(y), LinearExpr::var(y) + 1.0)
        .unwrap_err();
    assert_eq!(err.code(), "MODEL_UNSUPPORTED_RANGE");
    assert!(err.to_string().contains("expr <= upper"));
    assert_eq!(program.constraint_count(), 0);

    let range = program.add_range(LinearExpr::var(x) + y, 1.0, 3.0).unwrap();
    assert_eq!(
        program.model().constraint(range).unwrap().bounds,
        Bounds::new(1.0, 3.0)
    );
}

#[test]
fn test_relax_installs_relaxation() {
    let (mut program, _x) = conflicting_program();
    program.commit().unwrap();
    let violated = mpsolve_expr::ConstraintId::new(1);

    let returned = program
        .relax(&RelaxRequest::constraints(vec![violated], vec![1.0]))
        .unwrap();
    assert_eq!(returned, 0.0);

    assert!(program.solve().unwrap());
    let violation = program.objective_value().unwrap();
    assert!(violation > 0.0);
    assert_close(violation, 3.0);
}

#[test]
fn test_relax_then_optimize_original() {
    let (mut program, x) = conflicting_program();
    program.commit().unwrap();
    let violated = mpsolve_expr::ConstraintId::new(1);

    let violation = program
        .relax(
            &RelaxRequest::constraints(vec![violated], vec![1.0]).with_optimize_original(true),
        )
        .unwrap();
    assert!(violation.is_finite() && violation >= 0.0);
    assert_close(violation, 3.0);

    assert!(program.solve().unwrap());
    assert_close(program.value(x).unwrap(), 2.0);
    assert_close(program.objective_value().unwrap(), 2.0);
}

#[test]
fn test_relax_variable_bounds() {
    let mut program = program();
    let x = program.add_variable(VariableSpec::real(0.0, 1.0)).unwrap();
    program
        .add_constraint(LinearExpr::var(x).ge_scalar(3.0))
        .unwrap();
    program.commit().unwrap();

    program
        .relax(&RelaxRequest::variables(vec![x], vec![-1.0], vec![2.0]))
        .unwrap();
    assert!(program.solve().unwrap());
    assert_close(program.objective_value().unwrap(), 4.0);
    assert_close(program.value(x).unwrap(), 3.0);
}

#[test]
fn test_relax_cardinality_counts_violations() {
    let (mut program, _x) = conflicting_program();
    program.commit().unwrap();
    program
        .relax(&RelaxRequest::all(false, true).with_objective(RelaxObjective::Cardinality))
        .unwrap();
    assert!(program.solve().unwrap());
    assert_close(program.objective_value().unwrap(), 1.0);
}

#[test]
fn test_relax_quadratic_penalty() {
    let (mut program, _x) = conflicting_program();
    program.commit().unwrap();
    let violated = mpsolve_expr::ConstraintId::new(1);
    program
        .relax(
            &RelaxRequest::constraints(vec![violated], vec![1.0])
                .with_objective(RelaxObjective::Quadratic),
        )
        .unwrap();
    assert!(program.solve().unwrap());
    assert!((program.objective_value().unwrap() - 9.0).abs() < 1e-4);
}

#[test]
fn test_relax_commits_pending_edits_first() {
    let (mut program, _x) = conflicting_program();
    assert!(program.has_pending_changes());
    let returned = program.relax(&RelaxRequest::default()).unwrap();
    assert_eq!(returned, 0.0);
    assert!(!program.has_pending_changes());
    assert!(program.solve().unwrap());
    assert_close(program.objective_value().unwrap(), 3.0);

    let (mut program, _x) = conflicting_program();
    let err = program
        .relax(
            &RelaxRequest::default()
                .with_objective(RelaxObjective::Quadratic)
                .with_optimize_original(true),
        )
        .unwrap_err();
    assert_eq!(err.code(), "RELAX_UNSUPPORTED");
    assert_eq!(program.variable_count(), 1);
    assert!(!program.has_pending_changes());
}

#[test]
fn test_relax_without_solution_reports_failure() {
    let (mut program, _x) = conflicting_program();
    program.commit().unwrap();
    // Nothing is relaxable, so the relaxation stays infeasible.
    let returned = program
        .relax(&RelaxRequest::constraints(vec![], vec![]).with_optimize_original(true))
        .unwrap();
    assert_eq!(returned, RELAX_FAILED);
    assert_eq!(program.model().objective().costs[0], 1.0);
}

#[test]
fn test_failed_relaxation_rolls_back_to_original() {
    init_tracing();
    let (mut program, x) = conflicting_program();
    // Relaxing only the bounds of x leaves the row conflict in place.
    let returned = program
        .relax(&RelaxRequest::variables(vec![x], vec![1.0], vec![1.0]).with_optimize_original(true))
        .unwrap();
    assert_eq!(returned, RELAX_FAILED);
    assert!(!program.has_pending_changes());

    assert_eq!(program.engine_bounds(x).unwrap(), Bounds::new(0.0, 10.0));
    let objective = program.model().objective();
    assert_eq!(objective.sense, Sense::Minimize);
    assert_eq!(objective.costs[0], 1.0);
    assert!(objective.costs[1..].iter().all(|cost| *cost == 0.0));
    for index in 1..program.variable_count() {
        let artificial = VariableId::new(index as u32);
        assert_eq!(
            program.engine_bounds(artificial).unwrap(),
            Bounds::new(0.0, 0.0)
        );
    }

    assert!(!program.solve().unwrap());
    assert_eq!(program.status(), SolveStatus::InsolubleModel);
}

#[test]
fn test_linear_fractional_program() {
    init_tracing();
    let mut lfp = LinearFractionalProgram::new(&Environment::new()).unwrap();
    let x = lfp.add_variable(0.0, f64::INFINITY).unwrap();

    let numerator = LinearExpr::var(x);
    let denominator = LinearExpr::var(x) + 1.0;
    let constraints = [LinearExpr::var(x) - 10.0];
    assert!(
        lfp.solve(&numerator, &denominator, &constraints, Sense::Maximize, 1.0)
            .unwrap()
    );

    assert_close(lfp.value(x).unwrap(), 10.0);
    assert_close(lfp.ratio_value().unwrap(), 10.0 / 11.0);
    assert_close(lfp.scale_value().unwrap(), 1.0 / 11.0);
}

#[test]
fn test_linear_fractional_with_scale() {
    init_tracing();
    let mut lfp = LinearFractionalProgram::new(&Environment::new()).unwrap();
    let x = lfp.add_variable(0.0, f64::INFINITY).unwrap();

    // minimize (x + 2) / (x + 1) with x <= 4: best at x = 4, ratio 1.2
    let numerator = LinearExpr::var(x) + 2.0;
    let denominator = LinearExpr::var(x) + 1.0;
    let constraints = [LinearExpr::var(x) - 4.0];
    assert!(
        lfp.solve(&numerator, &denominator, &constraints, Sense::Minimize, 5.0)
            .unwrap()
    );
    assert_close(lfp.value(x).unwrap(), 4.0);
    assert_close(lfp.ratio_value().unwrap(), 1.2);
}

#[test]
fn test_save_and_load_round_trip() {
    let mut program = program();
    let x = program.add_variable(VariableSpec::real(0.0, 8.0)).unwrap();
    let y = program.add_variable(VariableSpec::real(1.0, 8.0)).unwrap();
    program
        .add_constraint((LinearExpr::var(x) + y).ge_scalar(6.0))
        .unwrap();
    program
        .set_objective(LinearExpr::var(x) + 2.0 * y + 3.0, Some(Sense::Minimize))
        .unwrap();

    let path = std::env::temp_dir().join(format!("mpsolve_roundtrip_{}.mps", std::process::id()));
    program.save(&path).unwrap();
    assert!(!program.has_pending_changes());

    let mut loaded = Program::from_file(program.environment(), &path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded.variable_count(), 2);
    assert_eq!(loaded.constraint_count(), 1);
    assert_eq!(loaded.status(), SolveStatus::Ready);

    assert!(loaded.solve().unwrap());
    assert!(program.solve().unwrap());
    assert_close(
        loaded.objective_value().unwrap(),
        program.objective_value().unwrap(),
    );
    assert_close(loaded.objective_value().unwrap(), 10.0);
}

#[test]
fn test_config_knobs_do_not_break_solve() {
    init_tracing();
    let config = SolverConfig::new()
        .with_time_limit(30.0)
        .with_max_solution_count(5)
        .with_threads(1)
        .with_seed(42)
        .with_mip_gap(0.0)
        .with_presolve(false)
        .with_tolerance(1e-7);
    let env = Environment::with_config(config);
    let mut program = Program::new(&env).unwrap();
    let x = program
        .add_variable(VariableSpec::integer(0.0, 3.0).with_cost(-1.0))
        .unwrap();
    program.set_output(false);
    assert!(program.solve().unwrap());
    assert_close(program.value(x).unwrap(), 3.0);
}

#[test]
fn test_names_are_kept() {
    let mut program = program();
    let x = program
        .add_variable(VariableSpec::real(0.0, 1.0).with_name("x"))
        .unwrap();
    let c = program
        .add_constraint(LinearExpr::var(x).le_scalar(1.0))
        .unwrap();
    program.set_constraint_name(c, "cap").unwrap();
    assert_eq!(program.model().variable_by_name("x"), Some(x));
    assert_eq!(program.model().constraint_name(c), Some("cap"));
}

#[test]
fn test_names_reach_written_model() {
    let mut program = program();
    let x = program
        .add_variable(VariableSpec::real(0.0, 4.0).with_name("flow"))
        .unwrap();
    let c = program
        .add_constraint(LinearExpr::var(x).le_scalar(3.0))
        .unwrap();
    program.set_constraint_name(c, "capacity").unwrap();
    program
        .set_objective(LinearExpr::var(x), Some(Sense::Maximize))
        .unwrap();

    let path = std::env::temp_dir().join(format!("mpsolve_names_{}.mps", std::process::id()));
    program.save(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("flow"));
    assert!(written.contains("capacity"));

    // Renaming a committed column is a pending change of its own.
    program.set_variable_name(x, "throughput").unwrap();
    assert!(program.has_pending_changes());
    program.save(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(written.contains("throughput"));
    assert!(!written.contains("flow"));
}
