//! Linear-fractional programs via the Charnes-Cooper transformation.
//!
//! `opt (c.x + c0) / (d.x + d0)` subject to `A x - b <= 0` is solved as the
//! linear program
//!
//! ```text
//! opt  c.y + c0 t
//! s.t. A y - b t <= 0
//!      d.y + d0 t == gamma
//!      t >= 0
//! ```
//!
//! and `x` is recovered as `y / t`. Every variable added to the wrapped
//! program plays the role of `y`.

use mpsolve_core::{Sense, VariableSpec};
use mpsolve_expr::{LinearExpr, VariableId};
use mpsolve_solver::SolverError;

use crate::env::Environment;
use crate::error::ProgramError;
use crate::program::Program;

/// Default normalization of the denominator.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Scale values below this magnitude make `y / t` meaningless.
const DEGENERATE_SCALE: f64 = 1e-12;

#[derive(Debug)]
pub struct LinearFractionalProgram {
    program: Program,
    scale: VariableId,
    gamma: f64,
}

impl LinearFractionalProgram {
    /// Empty program holding only the scale variable `t >= 0`.
    pub fn new(env: &Environment) -> Result<Self, ProgramError> {
        let mut program = Program::new(env)?;
        let scale = program.add_variable(
            VariableSpec::real(0.0, f64::INFINITY).with_name("charnes_cooper:t"),
        )?;
        Ok(Self {
            program,
            scale,
            gamma: DEFAULT_SCALE,
        })
    }

    /// Add a continuous variable. Its bounds apply to the scaled value `y`.
    pub fn add_variable(&mut self, lower: f64, upper: f64) -> Result<VariableId, ProgramError> {
        Ok(self.program.add_variable(VariableSpec::real(lower, upper))?)
    }

    /// The underlying linear program, for configuration and inspection.
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }

    /// The scaling variable `t`.
    pub fn scale_variable(&self) -> VariableId {
        self.scale
    }

    /// Optimize `numerator / denominator` subject to `constraints[i] <= 0`.
    ///
    /// Constraints must already be in `expr <= 0` form; no normalization is
    /// applied. `gamma` fixes the value of the transformed denominator and
    /// must be positive and finite.
    pub fn solve(
        &mut self,
        numerator: &LinearExpr,
        denominator: &LinearExpr,
        constraints: &[LinearExpr],
        sense: Sense,
        gamma: f64,
    ) -> Result<bool, ProgramError> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(ProgramError::InvalidScale { gamma });
        }
        self.gamma = gamma;
        let t = self.scale;
        for constraint in constraints {
            self.program
                .add_constraint(constraint.homogenized(t).le_scalar(0.0))?;
        }
        self.program
            .add_constraint(denominator.homogenized(t).eq_scalar(gamma))?;
        self.program
            .set_objective(numerator.homogenized(t), Some(sense))?;

        let found = self.program.solve()?;
        tracing::debug!(
            component = "fractional",
            operation = "solve",
            status = self.program.status().as_str(),
            constraints = constraints.len(),
            gamma,
            "Solved Charnes-Cooper transform"
        );
        Ok(found)
    }

    /// Value of an original variable, `y / t`.
    pub fn value(&self, var: VariableId) -> Result<f64, ProgramError> {
        let t = self.scale_value()?;
        if t.abs() < DEGENERATE_SCALE {
            return Err(SolverError::DegenerateScale { value: t }.into());
        }
        Ok(self.program.value(var)? / t)
    }

    /// Solved value of `t`.
    pub fn scale_value(&self) -> Result<f64, ProgramError> {
        self.program.value(self.scale)
    }

    /// Value of the original ratio objective.
    pub fn ratio_value(&self) -> Result<f64, ProgramError> {
        Ok(self.program.objective_value()? / self.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_gamma() {
        let mut lfp = LinearFractionalProgram::new(&Environment::new()).unwrap();
        let x = lfp.add_variable(0.0, f64::INFINITY).unwrap();
        let num = LinearExpr::var(x);
        let den = LinearExpr::var(x) + 1.0;
        for gamma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = lfp.solve(&num, &den, &[], Sense::Maximize, gamma).unwrap_err();
            assert_eq!(err.code(), "FRACTIONAL_INVALID_SCALE");
        }
        assert_eq!(lfp.program().constraint_count(), 0);
    }

    #[test]
    fn test_value_before_solve_is_missing() {
        let mut lfp = LinearFractionalProgram::new(&Environment::new()).unwrap();
        let x = lfp.add_variable(0.0, 1.0).unwrap();
        lfp.program_mut().commit().unwrap();
        assert_eq!(lfp.value(x).unwrap_err().code(), "SOLUTION_MISSING");
    }
}
