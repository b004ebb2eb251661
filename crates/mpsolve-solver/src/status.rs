//! Outcome codes and the derived solve status.

use serde::{Deserialize, Serialize};

/// Terminal or ongoing state reported by the engine after an optimize attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCode {
    /// Model loaded, not yet optimized.
    Loaded,
    /// Optimization still running.
    InProgress,
    Optimal,
    /// A solution was found but optimality was not proven.
    Suboptimal,
    Infeasible,
    InfeasibleOrUnbounded,
    Unbounded,
    /// Optimal objective is provably worse than the configured cutoff.
    Cutoff,
    IterationLimit,
    NodeLimit,
    TimeLimit,
    SolutionLimit,
    Interrupted,
    MemoryLimit,
    /// Engine reported an internal load/presolve/solve error.
    Failed,
    Unknown,
}

impl OutcomeCode {
    /// Every outcome code, in declaration order.
    pub const ALL: [OutcomeCode; 16] = [
        OutcomeCode::Loaded,
        OutcomeCode::InProgress,
        OutcomeCode::Optimal,
        OutcomeCode::Suboptimal,
        OutcomeCode::Infeasible,
        OutcomeCode::InfeasibleOrUnbounded,
        OutcomeCode::Unbounded,
        OutcomeCode::Cutoff,
        OutcomeCode::IterationLimit,
        OutcomeCode::NodeLimit,
        OutcomeCode::TimeLimit,
        OutcomeCode::SolutionLimit,
        OutcomeCode::Interrupted,
        OutcomeCode::MemoryLimit,
        OutcomeCode::Failed,
        OutcomeCode::Unknown,
    ];

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeCode::Loaded => "loaded",
            OutcomeCode::InProgress => "in_progress",
            OutcomeCode::Optimal => "optimal",
            OutcomeCode::Suboptimal => "suboptimal",
            OutcomeCode::Infeasible => "infeasible",
            OutcomeCode::InfeasibleOrUnbounded => "infeasible_or_unbounded",
            OutcomeCode::Unbounded => "unbounded",
            OutcomeCode::Cutoff => "cutoff",
            OutcomeCode::IterationLimit => "iteration_limit",
            OutcomeCode::NodeLimit => "node_limit",
            OutcomeCode::TimeLimit => "time_limit",
            OutcomeCode::SolutionLimit => "solution_limit",
            OutcomeCode::Interrupted => "interrupted",
            OutcomeCode::MemoryLimit => "memory_limit",
            OutcomeCode::Failed => "failed",
            OutcomeCode::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of the most recent optimization.
///
/// Exactly one status is active after each solve attempt; it is always
/// re-derived through [`SolveStatus::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Nothing solved yet.
    #[default]
    Ready,
    Proceeding,
    Optimal,
    /// At least one feasible solution is recorded.
    Feasible,
    ExceedLimit,
    InsolubleCutoff,
    InsolubleModel,
    OutOfMemory,
    Error,
}

impl SolveStatus {
    /// Every status, in declaration order.
    pub const ALL: [SolveStatus; 9] = [
        SolveStatus::Ready,
        SolveStatus::Proceeding,
        SolveStatus::Optimal,
        SolveStatus::Feasible,
        SolveStatus::ExceedLimit,
        SolveStatus::InsolubleCutoff,
        SolveStatus::InsolubleModel,
        SolveStatus::OutOfMemory,
        SolveStatus::Error,
    ];

    /// Derive the status from the engine outcome and the number of recorded
    /// feasible solutions.
    ///
    /// A recorded solution turns any outcome other than `Optimal` into
    /// `Feasible`.
    pub fn classify(outcome: OutcomeCode, solution_count: usize) -> Self {
        let status = match outcome {
            OutcomeCode::Optimal => return SolveStatus::Optimal,
            OutcomeCode::Suboptimal => return SolveStatus::Feasible,
            OutcomeCode::Loaded | OutcomeCode::InProgress => SolveStatus::Proceeding,
            OutcomeCode::IterationLimit
            | OutcomeCode::NodeLimit
            | OutcomeCode::TimeLimit
            | OutcomeCode::SolutionLimit => SolveStatus::ExceedLimit,
            OutcomeCode::Cutoff => SolveStatus::InsolubleCutoff,
            OutcomeCode::Infeasible
            | OutcomeCode::InfeasibleOrUnbounded
            | OutcomeCode::Unbounded => SolveStatus::InsolubleModel,
            OutcomeCode::MemoryLimit => SolveStatus::OutOfMemory,
            OutcomeCode::Interrupted | OutcomeCode::Failed | OutcomeCode::Unknown => {
                SolveStatus::Error
            }
        };
        if solution_count > 0 {
            SolveStatus::Feasible
        } else {
            status
        }
    }

    /// True iff a solution can be read.
    pub fn solution_found(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Ready => "ready",
            SolveStatus::Proceeding => "proceeding",
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::ExceedLimit => "exceed_limit",
            SolveStatus::InsolubleCutoff => "insoluble_cutoff",
            SolveStatus::InsolubleModel => "insoluble_model",
            SolveStatus::OutOfMemory => "out_of_memory",
            SolveStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The only sanctioned check before reading solution values.
pub fn solution_found(status: SolveStatus) -> bool {
    status.solution_found()
}
