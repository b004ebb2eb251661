//! HiGHS model status conversions.

use highs_sys::HighsInt;
use mpsolve_solver::OutcomeCode;

/// Translate a raw HiGHS model status into an [`OutcomeCode`].
///
/// An empty model is trivially solved, so it reports `Optimal`.
pub(crate) fn outcome_from_model_status(status: HighsInt) -> OutcomeCode {
    match status {
        0 => OutcomeCode::Loaded,
        1..=5 => OutcomeCode::Failed,
        6 | 7 => OutcomeCode::Optimal,
        8 => OutcomeCode::Infeasible,
        9 => OutcomeCode::InfeasibleOrUnbounded,
        10 => OutcomeCode::Unbounded,
        11 => OutcomeCode::Cutoff,
        12 => OutcomeCode::Suboptimal,
        13 => OutcomeCode::TimeLimit,
        14 => OutcomeCode::IterationLimit,
        16 => OutcomeCode::SolutionLimit,
        17 => OutcomeCode::Interrupted,
        18 => OutcomeCode::MemoryLimit,
        _ => OutcomeCode::Unknown,
    }
}
