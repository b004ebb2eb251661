//! HiGHS backend for mpsolve.
//!
//! A [`Program`] owns one HiGHS session and an in-memory mirror of the
//! program definition. Edits are buffered until [`Program::commit`] (called
//! implicitly by [`Program::solve`]) flushes them incrementally, so columns
//! and rows can keep being added between solves.
//!
//! ```no_run
//! use mpsolve_core::{Sense, VariableSpec};
//! use mpsolve_expr::LinearExpr;
//! use mpsolve_highs::{Environment, Program};
//!
//! let env = Environment::new();
//! let mut program = Program::new(&env)?;
//! let x = program.add_variable(VariableSpec::real(0.0, 10.0))?;
//! let y = program.add_variable(VariableSpec::integer(0.0, 10.0))?;
//! program.add_constraint((LinearExpr::var(x) + y).le_scalar(7.5))?;
//! program.set_objective(LinearExpr::var(x) + LinearExpr::term(y, 2.0), Some(Sense::Maximize))?;
//! if program.solve()? {
//!     println!("objective = {}", program.objective_value()?);
//! }
//! # Ok::<(), mpsolve_highs::ProgramError>(())
//! ```

mod env;
mod error;
pub mod ffi;
mod fractional;
mod memory;
mod program;
mod solution;
mod status;

pub use env::{Environment, INFINITY, MAX_INTEGER};
pub use error::ProgramError;
pub use ffi::{HighsOption, HighsSession, highs_version};
pub use fractional::{DEFAULT_SCALE, LinearFractionalProgram};
pub use program::Program;
pub use solution::SolutionSnapshot;
