//! FFI bindings to HiGHS solver library.
//!
//! This module contains unsafe code for interacting with the C library.
//! [`HighsSession`] owns one `Highs` instance for its whole lifetime so that
//! columns and rows can be appended incrementally between solves.
#![allow(unsafe_code)]

use std::ffi::{CStr, CString, c_void};
use std::fmt;
use std::path::Path;

use highs_sys::HighsInt;
use mpsolve_core::{Bounds, Constraint, Sense};
use mpsolve_expr::ids::VariableId;
use mpsolve_solver::SolverError;
use tracing::{debug, trace, warn};

const STATUS_ERROR: HighsInt = -1;
const VAR_TYPE_CONTINUOUS: HighsInt = 0;
const VAR_TYPE_INTEGER: HighsInt = 1;
const SENSE_MINIMIZE: HighsInt = 1;
const SENSE_MAXIMIZE: HighsInt = -1;
const HESSIAN_FORMAT_TRIANGULAR: HighsInt = 1;
const SOLUTION_STATUS_FEASIBLE: HighsInt = 2;

/// Option value types for HiGHS solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(String),
}

/// Safe owner of a HiGHS instance.
pub struct HighsSession {
    raw: *mut c_void,
}

impl HighsSession {
    /// Create a fresh, empty engine instance.
    pub fn new() -> Result<Self, SolverError> {
        let raw = unsafe { highs_sys::Highs_create() };
        if raw.is_null() {
            warn!(
                component = "solver",
                operation = "init_highs",
                status = "error",
                "Highs_create returned null"
            );
            return Err(SolverError::EngineUnavailable);
        }
        debug!(
            component = "solver",
            operation = "init_highs",
            status = "success",
            "Created HiGHS session"
        );
        Ok(Self { raw })
    }

    /// Append a column with nonzeros into existing rows.
    pub fn add_column(
        &mut self,
        bounds: Bounds,
        cost: f64,
        rows: &[HighsInt],
        values: &[f64],
    ) -> Result<(), SolverError> {
        debug_assert_eq!(rows.len(), values.len());
        trace!(
            lower_bound = bounds.lower,
            upper_bound = bounds.upper,
            cost,
            nnz = rows.len(),
            component = "solver",
            operation = "add_column",
            status = "success",
            "Adding column"
        );
        let status = unsafe {
            highs_sys::Highs_addCol(
                self.raw,
                cost,
                bounds.lower,
                bounds.upper,
                rows.len() as HighsInt,
                rows.as_ptr(),
                values.as_ptr(),
            )
        };
        check("add_column", status)
    }

    /// Mark a column integral or continuous.
    pub fn set_integrality(&mut self, column: HighsInt, integral: bool) -> Result<(), SolverError> {
        let kind = if integral {
            VAR_TYPE_INTEGER
        } else {
            VAR_TYPE_CONTINUOUS
        };
        let status = unsafe { highs_sys::Highs_changeColIntegrality(self.raw, column, kind) };
        check("change_integrality", status)
    }

    /// Append a row over existing columns.
    pub fn add_row(
        &mut self,
        bounds: Bounds,
        columns: &[HighsInt],
        values: &[f64],
    ) -> Result<(), SolverError> {
        debug_assert_eq!(columns.len(), values.len());
        trace!(
            lower_bound = bounds.lower,
            upper_bound = bounds.upper,
            nnz = columns.len(),
            component = "solver",
            operation = "add_row",
            status = "success",
            "Adding row"
        );
        let status = unsafe {
            highs_sys::Highs_addRow(
                self.raw,
                bounds.lower,
                bounds.upper,
                columns.len() as HighsInt,
                columns.as_ptr(),
                values.as_ptr(),
            )
        };
        check("add_row", status)
    }

    pub fn change_column_bounds(
        &mut self,
        column: HighsInt,
        bounds: Bounds,
    ) -> Result<(), SolverError> {
        let status = unsafe {
            highs_sys::Highs_changeColBounds(self.raw, column, bounds.lower, bounds.upper)
        };
        check("change_column_bounds", status)
    }

    /// Name a column; the name shows up in written model files.
    pub fn set_column_name(&mut self, column: HighsInt, name: &str) -> Result<(), SolverError> {
        let c_text = c_name(name)?;
        let status = unsafe { highs_sys::Highs_passColName(self.raw, column, c_text.as_ptr()) };
        check("set_column_name", status)
    }

    /// Name a row.
    pub fn set_row_name(&mut self, row: HighsInt, name: &str) -> Result<(), SolverError> {
        let c_text = c_name(name)?;
        let status = unsafe { highs_sys::Highs_passRowName(self.raw, row, c_text.as_ptr()) };
        check("set_row_name", status)
    }

    /// Replace the cost of every column.
    pub fn change_costs(&mut self, costs: &[f64]) -> Result<(), SolverError> {
        if costs.is_empty() {
            return Ok(());
        }
        let status = unsafe {
            highs_sys::Highs_changeColsCostByRange(
                self.raw,
                0,
                (costs.len() - 1) as HighsInt,
                costs.as_ptr(),
            )
        };
        check("change_costs", status)
    }

    pub fn change_offset(&mut self, offset: f64) -> Result<(), SolverError> {
        let status = unsafe { highs_sys::Highs_changeObjectiveOffset(self.raw, offset) };
        check("change_offset", status)
    }

    pub fn change_sense(&mut self, sense: Sense) -> Result<(), SolverError> {
        let raw_sense = match sense {
            Sense::Minimize => SENSE_MINIMIZE,
            Sense::Maximize => SENSE_MAXIMIZE,
        };
        debug!(
            component = "solver",
            operation = "set_objective_sense",
            status = "success",
            sense = sense.as_str(),
            "Setting objective sense"
        );
        let status = unsafe { highs_sys::Highs_changeObjectiveSense(self.raw, raw_sense) };
        check("change_sense", status)
    }

    /// Install a diagonal quadratic objective `sum w_j x_j^2`.
    ///
    /// HiGHS minimizes `0.5 x'Qx`, so `Q_jj = 2 w_j`. An empty list clears the
    /// quadratic part.
    pub fn pass_diagonal_hessian(
        &mut self,
        dimension: usize,
        weights: &[(VariableId, f64)],
    ) -> Result<(), SolverError> {
        let mut per_column = vec![0.0; dimension];
        for (var_id, weight) in weights {
            if let Some(slot) = per_column.get_mut(var_id.index()) {
                *slot += 2.0 * weight;
            }
        }
        let mut start = Vec::with_capacity(dimension);
        let mut index = Vec::new();
        let mut value = Vec::new();
        for (column, q) in per_column.into_iter().enumerate() {
            start.push(index.len() as HighsInt);
            if q != 0.0 {
                index.push(column as HighsInt);
                value.push(q);
            }
        }
        let status = unsafe {
            highs_sys::Highs_passHessian(
                self.raw,
                dimension as HighsInt,
                index.len() as HighsInt,
                HESSIAN_FORMAT_TRIANGULAR,
                start.as_ptr(),
                index.as_ptr(),
                value.as_ptr(),
            )
        };
        check("pass_hessian", status)
    }

    /// Set an option. Unknown options and rejected values are errors.
    pub fn set_option(&mut self, name: &str, value: &HighsOption) -> Result<(), SolverError> {
        let c_name = c_string(name)?;
        let status = unsafe {
            match value {
                HighsOption::Bool(flag) => highs_sys::Highs_setBoolOptionValue(
                    self.raw,
                    c_name.as_ptr(),
                    HighsInt::from(*flag),
                ),
                HighsOption::Int(number) => highs_sys::Highs_setIntOptionValue(
                    self.raw,
                    c_name.as_ptr(),
                    *number as HighsInt,
                ),
                HighsOption::Float(number) => {
                    highs_sys::Highs_setDoubleOptionValue(self.raw, c_name.as_ptr(), *number)
                }
                HighsOption::Str(text) => {
                    let c_value = c_string(text)?;
                    highs_sys::Highs_setStringOptionValue(
                        self.raw,
                        c_name.as_ptr(),
                        c_value.as_ptr(),
                    )
                }
            }
        };
        check("set_option", status)
    }

    /// Run the engine. Returns the raw run status (0 ok, 1 warning, -1 error).
    pub fn run(&mut self) -> HighsInt {
        debug!(
            num_cols = self.num_columns(),
            num_rows = self.num_rows(),
            component = "solver",
            operation = "run",
            status = "started",
            "Running HiGHS"
        );
        unsafe { highs_sys::Highs_run(self.raw) }
    }

    /// Raw HiGHS model status of the last run.
    pub fn model_status(&self) -> HighsInt {
        unsafe { highs_sys::Highs_getModelStatus(self.raw) }
    }

    pub fn objective_value(&self) -> f64 {
        unsafe { highs_sys::Highs_getObjectiveValue(self.raw) }
    }

    /// 1 when the engine holds a feasible primal solution, else 0.
    pub fn solution_count(&self) -> usize {
        match self.int_info("primal_solution_status") {
            Some(SOLUTION_STATUS_FEASIBLE) => 1,
            _ => 0,
        }
    }

    /// Primal values of all columns and rows.
    pub fn primal_values(&self) -> Result<(Vec<f64>, Vec<f64>), SolverError> {
        let mut col_value = vec![0.0; self.num_columns()];
        let mut col_dual = vec![0.0; self.num_columns()];
        let mut row_value = vec![0.0; self.num_rows()];
        let mut row_dual = vec![0.0; self.num_rows()];
        let status = unsafe {
            highs_sys::Highs_getSolution(
                self.raw,
                col_value.as_mut_ptr(),
                col_dual.as_mut_ptr(),
                row_value.as_mut_ptr(),
                row_dual.as_mut_ptr(),
            )
        };
        check("get_solution", status)?;
        Ok((col_value, row_value))
    }

    pub fn num_columns(&self) -> usize {
        let count = unsafe { highs_sys::Highs_getNumCol(self.raw) };
        count.max(0) as usize
    }

    pub fn num_rows(&self) -> usize {
        let count = unsafe { highs_sys::Highs_getNumRow(self.raw) };
        count.max(0) as usize
    }

    pub fn num_nonzeros(&self) -> usize {
        let count = unsafe { highs_sys::Highs_getNumNz(self.raw) };
        count.max(0) as usize
    }

    /// Bounds and cost of every column, in column order.
    pub fn read_columns(&self) -> Result<Vec<(Bounds, f64)>, SolverError> {
        let count = self.num_columns();
        if count == 0 {
            return Ok(Vec::new());
        }
        let nnz = self.num_nonzeros().max(1);
        let mut num_col: HighsInt = 0;
        let mut costs = vec![0.0; count];
        let mut lower = vec![0.0; count];
        let mut upper = vec![0.0; count];
        let mut num_nz: HighsInt = 0;
        let mut start = vec![0 as HighsInt; count];
        let mut index = vec![0 as HighsInt; nnz];
        let mut value = vec![0.0; nnz];
        let status = unsafe {
            highs_sys::Highs_getColsByRange(
                self.raw,
                0,
                (count - 1) as HighsInt,
                &raw mut num_col,
                costs.as_mut_ptr(),
                lower.as_mut_ptr(),
                upper.as_mut_ptr(),
                &raw mut num_nz,
                start.as_mut_ptr(),
                index.as_mut_ptr(),
                value.as_mut_ptr(),
            )
        };
        check("get_columns", status)?;
        Ok(lower
            .into_iter()
            .zip(upper)
            .zip(costs)
            .map(|((lower, upper), cost)| (Bounds::new(lower, upper), cost))
            .collect())
    }

    /// Bounds and terms of every row, in row order.
    pub fn read_rows(&self) -> Result<Vec<Constraint>, SolverError> {
        let count = self.num_rows();
        if count == 0 {
            return Ok(Vec::new());
        }
        let nnz = self.num_nonzeros().max(1);
        let mut num_row: HighsInt = 0;
        let mut lower = vec![0.0; count];
        let mut upper = vec![0.0; count];
        let mut num_nz: HighsInt = 0;
        let mut start = vec![0 as HighsInt; count];
        let mut index = vec![0 as HighsInt; nnz];
        let mut value = vec![0.0; nnz];
        let status = unsafe {
            highs_sys::Highs_getRowsByRange(
                self.raw,
                0,
                (count - 1) as HighsInt,
                &raw mut num_row,
                lower.as_mut_ptr(),
                upper.as_mut_ptr(),
                &raw mut num_nz,
                start.as_mut_ptr(),
                index.as_mut_ptr(),
                value.as_mut_ptr(),
            )
        };
        check("get_rows", status)?;

        let num_nz = num_nz.max(0) as usize;
        let mut rows = Vec::with_capacity(count);
        for row in 0..count {
            let begin = start[row].max(0) as usize;
            let end = start
                .get(row + 1)
                .map_or(num_nz, |next| (*next).max(0) as usize);
            let terms = (begin..end)
                .map(|k| (VariableId::new(index[k] as u32), value[k]))
                .collect();
            rows.push(Constraint {
                bounds: Bounds::new(lower[row], upper[row]),
                terms,
            });
        }
        Ok(rows)
    }

    pub fn objective_sense(&self) -> Result<Sense, SolverError> {
        let mut raw_sense: HighsInt = SENSE_MINIMIZE;
        let status = unsafe { highs_sys::Highs_getObjectiveSense(self.raw, &raw mut raw_sense) };
        check("get_objective_sense", status)?;
        Ok(if raw_sense == SENSE_MAXIMIZE {
            Sense::Maximize
        } else {
            Sense::Minimize
        })
    }

    pub fn objective_offset(&self) -> Result<f64, SolverError> {
        let mut offset = 0.0;
        let status = unsafe { highs_sys::Highs_getObjectiveOffset(self.raw, &raw mut offset) };
        check("get_objective_offset", status)?;
        Ok(offset)
    }

    /// Replace the engine model with the contents of a model file.
    pub fn read_model(&mut self, path: &Path) -> Result<(), SolverError> {
        let c_path = c_path(path)?;
        let status = unsafe { highs_sys::Highs_readModel(self.raw, c_path.as_ptr()) };
        check("read_model", status)
    }

    /// Write the engine model; the format follows the file extension.
    pub fn write_model(&mut self, path: &Path) -> Result<(), SolverError> {
        let c_path = c_path(path)?;
        let status = unsafe { highs_sys::Highs_writeModel(self.raw, c_path.as_ptr()) };
        check("write_model", status)
    }

    /// Current value of a floating-point option.
    pub fn double_option(&self, name: &str) -> Option<f64> {
        let c_name = CString::new(name).ok()?;
        let mut value = 0.0;
        let status = unsafe {
            highs_sys::Highs_getDoubleOptionValue(self.raw, c_name.as_ptr(), &raw mut value)
        };
        (status == highs_sys::STATUS_OK).then_some(value)
    }

    /// Current value of an integer option.
    pub fn int_option(&self, name: &str) -> Option<HighsInt> {
        let c_name = CString::new(name).ok()?;
        let mut value: HighsInt = 0;
        let status = unsafe {
            highs_sys::Highs_getIntOptionValue(self.raw, c_name.as_ptr(), &raw mut value)
        };
        (status == highs_sys::STATUS_OK).then_some(value)
    }

    fn int_info(&self, name: &str) -> Option<HighsInt> {
        let c_name = CString::new(name).ok()?;
        let mut value: HighsInt = 0;
        let status =
            unsafe { highs_sys::Highs_getIntInfoValue(self.raw, c_name.as_ptr(), &raw mut value) };
        (status == highs_sys::STATUS_OK).then_some(value)
    }
}

impl Drop for HighsSession {
    fn drop(&mut self) {
        unsafe { highs_sys::Highs_destroy(self.raw) };
    }
}

impl fmt::Debug for HighsSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsSession")
            .field("num_columns", &self.num_columns())
            .field("num_rows", &self.num_rows())
            .finish_non_exhaustive()
    }
}

/// Return the HiGHS solver version string, if available.
pub fn highs_version() -> Option<String> {
    unsafe {
        let ptr = highs_sys::Highs_version();
        if ptr.is_null() {
            None
        } else {
            CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
        }
    }
}

fn check(operation: &'static str, status: HighsInt) -> Result<(), SolverError> {
    if status == STATUS_ERROR {
        warn!(
            component = "solver",
            operation,
            status = "error",
            status_code = status,
            "HiGHS call failed"
        );
        return Err(SolverError::EngineCall {
            operation,
            status: status as i32,
        });
    }
    Ok(())
}

fn c_string(text: &str) -> Result<CString, SolverError> {
    CString::new(text).map_err(|_| SolverError::InvalidPath {
        path: text.to_string(),
    })
}

fn c_name(name: &str) -> Result<CString, SolverError> {
    CString::new(name).map_err(|_| SolverError::InvalidName {
        name: name.to_string(),
    })
}

fn c_path(path: &Path) -> Result<CString, SolverError> {
    let text = path.to_str().ok_or_else(|| SolverError::InvalidPath {
        path: path.display().to_string(),
    })?;
    c_string(text)
}
