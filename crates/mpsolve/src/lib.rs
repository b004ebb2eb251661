//! mpsolve: mixed-integer and linear programming on HiGHS.
//!
//! Build a [`Program`], add variables and constraints, and [`Program::solve`].
//! Edits are committed to the engine incrementally, so columns can keep being
//! added between solves. Infeasible programs can be turned into feasibility
//! relaxations with [`Program::relax`], and ratio objectives are handled by
//! [`LinearFractionalProgram`].
//!
//! ```no_run
//! use mpsolve::prelude::*;
//!
//! let env = Environment::new();
//! let mut program = Program::new(&env)?;
//! let x = program.add_variable(VariableSpec::real(0.0, 10.0))?;
//! let y = program.add_variable(VariableSpec::boolean())?;
//! program.add_constraint((LinearExpr::var(x) + y).le_scalar(4.0))?;
//! program.set_objective(LinearExpr::var(x) + 3.0 * y, Some(Sense::Maximize))?;
//!
//! if program.solve()? && solution_found(program.status()) {
//!     println!("x = {}", program.value(x)?);
//! }
//! # Ok::<(), mpsolve::ProgramError>(())
//! ```
//!
//! Logging is off until [`init_logging`] is called; see [`logging`] for the
//! environment variables it reads.

pub mod logging;

pub use logging::{LogFormat, LoggingError, SolverInfo, init_logging, solver_info};
pub use mpsolve_core::{
    Bounds, DEFAULT_BIG_M, Model, ModelError, NumberType, RELAX_FAILED, RelaxObjective,
    RelaxRequest, RelaxScope, Sense, VariableSpec,
};
pub use mpsolve_expr::{
    ComparisonSense, ConstraintExpr, ConstraintId, ExprError, IndicatorExpr, LinearExpr,
    LogicalExpr, VariableId, linear_sum, linear_terms, quicksum,
};
pub use mpsolve_highs::{
    DEFAULT_SCALE, Environment, INFINITY, LinearFractionalProgram, MAX_INTEGER, Program,
    ProgramError, SolutionSnapshot,
};
pub use mpsolve_solver::{
    AUTO_THREADING, ConfigError, OutcomeCode, SolveStatus, SolverConfig, SolverError,
    solution_found,
};

/// Common imports for building and solving programs.
pub mod prelude {
    pub use crate::{
        Bounds, ConstraintId, Environment, LinearExpr, LinearFractionalProgram, NumberType,
        Program, ProgramError, RelaxObjective, RelaxRequest, Sense, SolveStatus, SolverConfig,
        VariableId, VariableSpec, solution_found,
    };
}
