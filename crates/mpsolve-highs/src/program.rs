//! Program driver: commit, solve, classify, read back.

use std::path::Path;
use std::time::Instant;

use highs_sys::HighsInt;
use mpsolve_core::{
    Bounds, CommitBatch, Model, ModelError, NumberType, RELAX_FAILED, RelaxRequest, Sense,
    VariableSpec,
};
use mpsolve_expr::{ConstraintId, LinearExpr, LogicalExpr, VariableId};
use mpsolve_solver::{OutcomeCode, SolveStatus, SolverConfig, SolverError};
use tracing::{debug, warn};

use crate::env::Environment;
use crate::error::ProgramError;
use crate::ffi::{HighsOption, HighsSession};
use crate::memory::resident_bytes;
use crate::solution::SolutionSnapshot;
use crate::status::outcome_from_model_status;

const RUN_STATUS_ERROR: HighsInt = -1;
const RELAX_BUDGET_TOLERANCE: f64 = 1e-6;

// Engine defaults for knobs the config leaves unset.
const DEFAULT_THREADS: i32 = 0;
const DEFAULT_SEED: i32 = 0;
const DEFAULT_MIP_GAP: f64 = 1e-4;
const DEFAULT_FEASIBILITY_TOLERANCE: f64 = 1e-7;

/// One optimization program bound to its own engine session.
///
/// Edits land in an in-memory mirror and reach the engine on [`Program::commit`],
/// which [`Program::solve`], [`Program::relax`] and [`Program::save`] call
/// implicitly. Solution reads require a committed program.
#[derive(Debug)]
pub struct Program {
    env: Environment,
    session: HighsSession,
    model: Model,
    config: SolverConfig,
    status: SolveStatus,
    outcome: Option<OutcomeCode>,
    solution: Option<SolutionSnapshot>,
}

impl Program {
    /// Create an empty program using the environment's default config.
    pub fn new(env: &Environment) -> Result<Self, SolverError> {
        Ok(Self {
            env: env.clone(),
            session: HighsSession::new()?,
            model: Model::new(),
            config: env.config().clone(),
            status: SolveStatus::Ready,
            outcome: None,
            solution: None,
        })
    }

    /// Create a program from a model file readable by the engine.
    pub fn from_file(env: &Environment, path: impl AsRef<Path>) -> Result<Self, SolverError> {
        let mut program = Self::new(env)?;
        program.load(path)?;
        Ok(program)
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// The in-memory program definition.
    pub fn model(&self) -> &Model {
        &self.model
    }

    // ── Model building ──────────────────────────────────────

    pub fn add_variable(&mut self, spec: VariableSpec) -> Result<VariableId, ModelError> {
        self.model.add_variable(spec)
    }

    /// Add a variable with a nonzero `coefficient` in an existing constraint.
    pub fn add_variable_anchored(
        &mut self,
        spec: VariableSpec,
        constraint: ConstraintId,
        coefficient: f64,
    ) -> Result<VariableId, ModelError> {
        self.model.add_variable_anchored(spec, constraint, coefficient)
    }

    /// Add a variable with coefficient 1 in each of `constraints`.
    pub fn add_variable_in(
        &mut self,
        spec: VariableSpec,
        constraints: &[ConstraintId],
    ) -> Result<VariableId, ModelError> {
        self.model.add_variable_in(spec, constraints)
    }

    /// Column generation: add a variable into existing constraints.
    pub fn add_variable_with_anchors(
        &mut self,
        spec: VariableSpec,
        constraints: &[ConstraintId],
        coefficients: &[f64],
    ) -> Result<VariableId, ModelError> {
        self.model
            .add_variable_with_anchors(spec, constraints, coefficients)
    }

    pub fn add_variables(&mut self, specs: Vec<VariableSpec>) -> Result<Vec<VariableId>, ModelError> {
        self.model.add_variables(specs)
    }

    pub fn add_variables_from_arrays(
        &mut self,
        count: usize,
        lower_bounds: &[f64],
        upper_bounds: &[f64],
        costs: &[f64],
        number_types: &[NumberType],
    ) -> Result<Vec<VariableId>, ModelError> {
        self.model
            .add_variables_from_arrays(count, lower_bounds, upper_bounds, costs, number_types)
    }

    pub fn add_constraint(
        &mut self,
        expr: impl Into<LogicalExpr>,
    ) -> Result<ConstraintId, ModelError> {
        self.model.add_constraint(expr)
    }

    pub fn add_range(
        &mut self,
        expr: LinearExpr,
        lower: f64,
        upper: f64,
    ) -> Result<ConstraintId, ModelError> {
        self.model.add_range(expr, lower, upper)
    }

    /// Always rejected; see [`Model::add_range_expr`].
    pub fn add_range_expr(
        &mut self,
        expr: LinearExpr,
        lower: LinearExpr,
        upper: LinearExpr,
    ) -> Result<ConstraintId, ModelError> {
        self.model.add_range_expr(expr, lower, upper)
    }

    pub fn set_objective(
        &mut self,
        expr: LinearExpr,
        sense: Option<Sense>,
    ) -> Result<(), ModelError> {
        self.model.set_objective(expr, sense)
    }

    pub fn set_sense(&mut self, sense: Sense) {
        self.model.set_sense(sense);
    }

    pub fn set_bounds(&mut self, var: VariableId, bounds: Bounds) -> Result<(), ModelError> {
        self.model.set_bounds(var, bounds)
    }

    pub fn set_variable_name(
        &mut self,
        var: VariableId,
        name: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.model.set_variable_name(var, name.into())
    }

    pub fn set_constraint_name(
        &mut self,
        constraint: ConstraintId,
        name: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.model.set_constraint_name(constraint, name.into())
    }

    pub fn variable_count(&self) -> usize {
        self.model.variable_count()
    }

    pub fn constraint_count(&self) -> usize {
        self.model.constraint_count()
    }

    /// Whether edits are waiting for [`Program::commit`].
    pub fn has_pending_changes(&self) -> bool {
        self.model.has_pending_changes()
    }

    // ── Commit ──────────────────────────────────────────────

    /// Flush pending edits to the engine. Calling it again without new
    /// edits does nothing.
    pub fn commit(&mut self) -> Result<(), SolverError> {
        if !self.model.has_pending_changes() {
            return Ok(());
        }
        let started = Instant::now();
        let batch = self.model.pending_changes();
        let counts = (
            batch.columns.len(),
            batch.rows.len(),
            batch.bound_changes.len(),
        );
        if let Err(err) = self.apply_batch(batch) {
            self.discard_session()?;
            return Err(err);
        }
        self.model.mark_committed();
        self.solution = None;
        debug!(
            component = "solver",
            operation = "commit",
            status = "success",
            columns = counts.0,
            rows = counts.1,
            bound_changes = counts.2,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Committed pending changes"
        );
        Ok(())
    }

    /// Replace a session that may hold half a batch with an empty one; the
    /// next commit replays the whole mirror into it.
    fn discard_session(&mut self) -> Result<(), SolverError> {
        self.session = HighsSession::new()?;
        self.model.invalidate_commit();
        self.solution = None;
        warn!(
            component = "solver",
            operation = "commit",
            status = "rolled_back",
            columns = self.model.variable_count(),
            rows = self.model.constraint_count(),
            "Commit failed; engine session rebuilt from the model"
        );
        Ok(())
    }

    fn apply_batch(&mut self, batch: CommitBatch) -> Result<(), SolverError> {
        for column in batch.columns {
            let (rows, values): (Vec<HighsInt>, Vec<f64>) = column
                .entries
                .iter()
                .map(|(row, value)| (row.inner() as HighsInt, *value))
                .unzip();
            self.session
                .add_column(column.bounds, column.cost, &rows, &values)?;
            if column.integral {
                self.session
                    .set_integrality(column.id.inner() as HighsInt, true)?;
            }
        }
        for row in batch.rows {
            let (columns, values): (Vec<HighsInt>, Vec<f64>) = row
                .terms
                .iter()
                .map(|(var, value)| (var.inner() as HighsInt, *value))
                .unzip();
            self.session.add_row(row.bounds, &columns, &values)?;
        }
        for (var, bounds) in batch.bound_changes {
            self.session
                .change_column_bounds(var.inner() as HighsInt, bounds)?;
        }
        if let Some(objective) = batch.objective {
            self.session.change_costs(&objective.costs)?;
            self.session.change_offset(objective.offset)?;
            self.session.change_sense(objective.sense)?;
        }
        if let Some(weights) = batch.hessian {
            self.session
                .pass_diagonal_hessian(self.model.variable_count(), &weights)?;
        }
        for (var, name) in batch.column_names {
            self.session
                .set_column_name(var.inner() as HighsInt, &name)?;
        }
        for (constraint, name) in batch.row_names {
            self.session
                .set_row_name(constraint.inner() as HighsInt, &name)?;
        }
        Ok(())
    }

    // ── Solve ───────────────────────────────────────────────

    /// Commit, optimize, and classify. Returns whether a solution is
    /// available.
    ///
    /// Running out of memory is reported through
    /// [`SolveStatus::OutOfMemory`], not as an error. Any other engine
    /// failure sets [`SolveStatus::Error`] and is returned.
    pub fn solve(&mut self) -> Result<bool, SolverError> {
        if let Err(err) = self.commit() {
            self.status = SolveStatus::Error;
            return Err(err);
        }
        self.apply_config();
        self.solution = None;

        let started = Instant::now();
        let run_status = self.session.run();
        let outcome = outcome_from_model_status(self.session.model_status());
        self.outcome = Some(outcome);

        if run_status == RUN_STATUS_ERROR && outcome != OutcomeCode::MemoryLimit {
            self.status = SolveStatus::Error;
            warn!(
                component = "solver",
                operation = "solve",
                status = "error",
                run_status,
                outcome = outcome.as_str(),
                "HiGHS run failed"
            );
            return Err(SolverError::EngineCall {
                operation: "run",
                status: run_status as i32,
            });
        }

        let solution_count = self.session.solution_count();
        self.status = SolveStatus::classify(outcome, solution_count);
        if self.status.solution_found() {
            let (column_values, row_values) = self.session.primal_values()?;
            self.solution = Some(SolutionSnapshot {
                objective_value: self.session.objective_value(),
                column_values,
                row_values,
            });
        }

        debug!(
            component = "solver",
            operation = "solve",
            status = self.status.as_str(),
            outcome = outcome.as_str(),
            solution_count,
            objective_value = self.solution.as_ref().map(|s| s.objective_value),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            rss_bytes = resident_bytes(),
            "Solve finished"
        );
        Ok(self.status.solution_found())
    }

    /// Push every knob on each solve. Unset knobs go back to the engine
    /// default so a cleared setting does not linger in the session.
    fn apply_config(&mut self) {
        let config = self.config.clone();
        self.set_option_or_warn("output_flag", HighsOption::Bool(config.output));
        self.set_option_or_warn(
            "time_limit",
            HighsOption::Float(config.time_limit.unwrap_or(f64::INFINITY)),
        );
        self.set_option_or_warn(
            "mip_max_improving_sols",
            HighsOption::Int(config.max_solution_count.map_or(i32::MAX, clamp_to_i32)),
        );
        self.set_option_or_warn(
            "threads",
            HighsOption::Int(config.threads.map_or(DEFAULT_THREADS, clamp_to_i32)),
        );
        self.set_option_or_warn(
            "random_seed",
            HighsOption::Int(config.seed.map_or(DEFAULT_SEED, clamp_to_i32)),
        );
        self.set_option_or_warn(
            "objective_bound",
            HighsOption::Float(config.cutoff.unwrap_or(f64::INFINITY)),
        );
        self.set_option_or_warn(
            "mip_rel_gap",
            HighsOption::Float(config.mip_gap.unwrap_or(DEFAULT_MIP_GAP)),
        );
        let presolve = match config.presolve {
            Some(true) => "on",
            Some(false) => "off",
            None => "choose",
        };
        self.set_option_or_warn("presolve", HighsOption::Str(presolve.to_string()));
        let tolerance = config.tolerance.unwrap_or(DEFAULT_FEASIBILITY_TOLERANCE);
        self.set_option_or_warn(
            "primal_feasibility_tolerance",
            HighsOption::Float(tolerance),
        );
        self.set_option_or_warn("dual_feasibility_tolerance", HighsOption::Float(tolerance));
    }

    fn set_option_or_warn(&mut self, name: &'static str, value: HighsOption) {
        if let Err(err) = self.session.set_option(name, &value) {
            warn!(
                component = "solver",
                operation = "set_option",
                status = "ignored",
                option = name,
                value = ?value,
                error = %err,
                "HiGHS rejected option"
            );
        }
    }

    // ── Results ─────────────────────────────────────────────

    /// Status of the most recent solve attempt.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Raw outcome of the most recent solve attempt.
    pub fn outcome(&self) -> Option<OutcomeCode> {
        self.outcome
    }

    pub fn solution_count(&self) -> usize {
        usize::from(self.solution.is_some())
    }

    pub fn solution(&self) -> Option<&SolutionSnapshot> {
        self.solution.as_ref()
    }

    pub fn objective_value(&self) -> Result<f64, SolverError> {
        Ok(self.recorded_solution("objective_value")?.objective_value)
    }

    pub fn value(&self, var: VariableId) -> Result<f64, ProgramError> {
        self.model.variable(var)?;
        let solution = self.recorded_solution("value")?;
        solution
            .column_value(var.index())
            .ok_or(ProgramError::Solver(SolverError::NoSolution {
                operation: "value",
            }))
    }

    /// Whether a bool variable took the value 1.
    pub fn is_true(&self, var: VariableId) -> Result<bool, ProgramError> {
        Ok(self.value(var)? > 0.5)
    }

    /// Activity of a constraint in the recorded solution.
    pub fn row_activity(&self, constraint: ConstraintId) -> Result<f64, ProgramError> {
        self.model.constraint(constraint)?;
        let solution = self.recorded_solution("row_activity")?;
        solution
            .row_value(constraint.index())
            .ok_or(ProgramError::Solver(SolverError::NoSolution {
                operation: "row_activity",
            }))
    }

    /// Bounds of a variable as the engine holds them.
    pub fn engine_bounds(&self, var: VariableId) -> Result<Bounds, ProgramError> {
        self.model.variable(var)?;
        self.ensure_committed("engine_bounds")?;
        let columns = self.session.read_columns()?;
        columns
            .get(var.index())
            .map(|(bounds, _)| *bounds)
            .ok_or(ProgramError::Model(ModelError::InvalidVariableId(var)))
    }

    fn ensure_committed(&self, operation: &'static str) -> Result<(), SolverError> {
        if self.model.has_pending_changes() {
            return Err(SolverError::UncommittedChanges { operation });
        }
        Ok(())
    }

    fn recorded_solution(&self, operation: &'static str) -> Result<&SolutionSnapshot, SolverError> {
        self.ensure_committed(operation)?;
        self.solution
            .as_ref()
            .ok_or(SolverError::NoSolution { operation })
    }

    // ── Configuration ───────────────────────────────────────

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: SolverConfig) -> Result<(), SolverError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_time_limit(&mut self, seconds: f64) {
        self.config.time_limit = Some(seconds);
    }

    pub fn set_max_solution_count(&mut self, count: u32) {
        self.config.max_solution_count = Some(count);
    }

    /// Thread count; [`mpsolve_solver::AUTO_THREADING`] lets the engine choose.
    pub fn set_threads(&mut self, count: u32) {
        self.config.threads = Some(count);
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.config.seed = Some(seed);
    }

    pub fn set_output(&mut self, enabled: bool) {
        self.config.output = enabled;
    }

    /// Worst objective value a recorded solution may have.
    pub fn set_cutoff(&mut self, bound: f64) {
        self.config.cutoff = Some(bound);
    }

    // ── Relaxation ──────────────────────────────────────────

    /// Replace the program by its feasibility relaxation.
    ///
    /// Without `optimize_original` the relaxation is installed and `0.0` is
    /// returned; solve it and read the violation from
    /// [`Program::objective_value`]. With `optimize_original` the relaxation
    /// is solved here, its optimum bounds the total violation, the original
    /// objective is restored, and the optimum is returned. When the
    /// relaxation has no solution the program is rolled back to an
    /// equivalent of the original and [`RELAX_FAILED`] is returned.
    ///
    /// Pending edits are committed first.
    pub fn relax(&mut self, request: &RelaxRequest) -> Result<f64, ProgramError> {
        self.commit()?;
        let plan = self.model.build_relaxation(request)?;
        self.commit()?;
        if !plan.optimize_original {
            debug!(
                component = "relax",
                operation = "relax",
                status = "installed",
                objective = plan.objective.as_str(),
                artificials = plan.artificials.len(),
                "Installed feasibility relaxation"
            );
            return Ok(0.0);
        }

        if !self.solve()? {
            warn!(
                component = "relax",
                operation = "relax",
                status = "failed",
                solve_status = self.status.as_str(),
                "Feasibility relaxation has no solution"
            );
            self.model.abandon_relaxation(plan)?;
            self.commit()?;
            return Ok(RELAX_FAILED);
        }

        let violation = self.objective_value()?;
        let tolerance = RELAX_BUDGET_TOLERANCE * violation.abs().max(1.0);
        self.model.finish_relaxation(plan, violation, tolerance)?;
        self.commit()?;
        debug!(
            component = "relax",
            operation = "relax",
            status = "success",
            violation,
            "Relaxation solved; original objective restored"
        );
        Ok(violation)
    }

    // ── Files ───────────────────────────────────────────────

    /// Write the committed program; the format follows the file extension.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), SolverError> {
        self.commit()?;
        let path = path.as_ref();
        self.session.write_model(path)?;
        debug!(
            component = "solver",
            operation = "save",
            status = "success",
            path = %path.display(),
            "Wrote model file"
        );
        Ok(())
    }

    /// Replace the program with the contents of a model file.
    ///
    /// Column integrality is not read back; loaded variables are continuous.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), SolverError> {
        let path = path.as_ref();
        self.session.read_model(path)?;
        let columns = self
            .session
            .read_columns()?
            .into_iter()
            .map(|(bounds, cost)| (bounds, cost, NumberType::Real))
            .collect();
        let rows = self.session.read_rows()?;
        let sense = self.session.objective_sense()?;
        let offset = self.session.objective_offset()?;
        self.model = Model::from_engine(columns, rows, sense, offset);
        self.status = SolveStatus::Ready;
        self.outcome = None;
        self.solution = None;
        debug!(
            component = "solver",
            operation = "load",
            status = "success",
            path = %path.display(),
            variables = self.model.variable_count(),
            constraints = self.model.constraint_count(),
            "Read model file"
        );
        Ok(())
    }
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_program_is_ready() {
        let program = Program::new(&Environment::new()).unwrap();
        assert_eq!(program.status(), SolveStatus::Ready);
        assert_eq!(program.outcome(), None);
        assert_eq!(program.solution_count(), 0);
        assert!(!program.has_pending_changes());
    }

    #[test]
    fn test_program_inherits_environment_config() {
        let env = Environment::with_config(SolverConfig::new().with_seed(7));
        let mut program = Program::new(&env).unwrap();
        assert_eq!(program.config().seed, Some(7));
        program.set_seed(9);
        assert_eq!(program.config().seed, Some(9));
        assert_eq!(env.config().seed, Some(7));
    }

    #[test]
    fn test_set_config_validates() {
        let mut program = Program::new(&Environment::new()).unwrap();
        let err = program
            .set_config(SolverConfig::new().with_time_limit(-1.0))
            .unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
        assert!(program.config().time_limit.is_none());
    }

    #[test]
    fn test_commit_is_idempotent() {
        let mut program = Program::new(&Environment::new()).unwrap();
        program.add_variable(VariableSpec::real(0.0, 1.0)).unwrap();
        assert!(program.has_pending_changes());
        program.commit().unwrap();
        assert!(!program.has_pending_changes());
        program.commit().unwrap();
        assert_eq!(program.session.num_columns(), 1);
    }

    #[test]
    fn test_reads_reject_uncommitted_program() {
        let mut program = Program::new(&Environment::new()).unwrap();
        let x = program.add_variable(VariableSpec::real(0.0, 1.0)).unwrap();
        let err = program.value(x).unwrap_err();
        assert_eq!(err.code(), "PROGRAM_UNCOMMITTED");
        program.commit().unwrap();
        let err = program.value(x).unwrap_err();
        assert_eq!(err.code(), "SOLUTION_MISSING");
    }

    #[test]
    fn test_cleared_config_restores_engine_defaults() {
        let mut program = Program::new(&Environment::new()).unwrap();
        program.add_variable(VariableSpec::real(0.0, 1.0)).unwrap();
        program
            .set_config(
                SolverConfig::new()
                    .with_time_limit(30.0)
                    .with_seed(5)
                    .with_mip_gap(0.5)
                    .with_tolerance(1e-5),
            )
            .unwrap();
        assert!(program.solve().unwrap());
        assert_eq!(program.session.double_option("time_limit"), Some(30.0));
        assert_eq!(program.session.int_option("random_seed"), Some(5));

        program.set_config(SolverConfig::new()).unwrap();
        assert!(program.solve().unwrap());
        assert_eq!(
            program.session.double_option("time_limit"),
            Some(f64::INFINITY)
        );
        assert_eq!(program.session.int_option("random_seed"), Some(0));
        assert_eq!(program.session.double_option("mip_rel_gap"), Some(1e-4));
        assert_eq!(
            program
                .session
                .double_option("primal_feasibility_tolerance"),
            Some(1e-7)
        );
    }

    #[test]
    fn test_failed_commit_rebuilds_session() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
        let mut program = Program::new(&Environment::new()).unwrap();
        let x = program.add_variable(VariableSpec::real(0.0, 4.0)).unwrap();
        program
            .add_constraint(LinearExpr::var(x).le_scalar(3.0))
            .unwrap();
        program
            .set_objective(LinearExpr::var(x), Some(Sense::Maximize))
            .unwrap();
        program.commit().unwrap();

        let y = program.add_variable(VariableSpec::real(0.0, 1.0)).unwrap();
        program.set_variable_name(y, "bad\0name").unwrap();
        let err = program.solve().unwrap_err();
        assert_eq!(err.code(), "NAME_INVALID");
        assert_eq!(program.status(), SolveStatus::Error);
        assert_eq!(program.session.num_columns(), 0);
        assert!(program.has_pending_changes());

        program.set_variable_name(y, "spare").unwrap();
        assert!(program.solve().unwrap());
        assert_eq!(program.session.num_columns(), 2);
        assert_eq!(program.session.num_rows(), 1);
        assert!((program.objective_value().unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_engine_run_error_sets_error_status() {
        let mut program = Program::new(&Environment::new()).unwrap();
        let x = program
            .add_variable(VariableSpec::integer(0.0, 3.0))
            .unwrap();
        program.commit().unwrap();
        // The engine refuses integer programs with a quadratic objective.
        program.session.pass_diagonal_hessian(1, &[(x, 1.0)]).unwrap();

        let err = program.solve().unwrap_err();
        assert_eq!(err.code(), "SOLVER_CALL_FAILED");
        assert_eq!(program.status(), SolveStatus::Error);
        assert!(program.solution().is_none());
        assert_eq!(program.value(x).unwrap_err().code(), "SOLUTION_MISSING");
    }

    #[test]
    fn test_clamp_to_i32() {
        assert_eq!(clamp_to_i32(5), 5);
        assert_eq!(clamp_to_i32(u32::MAX), i32::MAX);
    }
}
