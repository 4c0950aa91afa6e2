//! The solver engine boundary.
//!
//! A [`SolverEngine`] receives a self-contained [`SubProblem`] and returns a
//! status plus one [`Assignment`] per scheduled module. Engines are opaque to
//! the rest of the planner: they may fail, panic or run past their deadline,
//! and the orchestrator isolates each of those outcomes per partition.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use examforge_core::{Day, Hall, Module, Slot, SolveStatus, TimetableEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors an engine may return.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Engine failed: {0}")]
    Failed(String),

    #[error("Solve was cancelled")]
    Cancelled,

    #[error("Engine assigned unknown module: {0}")]
    UnknownModule(String),
}

/// The input of one engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubProblem {
    /// Partition name, or `"naive"` for a whole-catalog solve.
    pub name: String,
    pub modules: Vec<Module>,
    pub halls: Vec<Hall>,
    /// Days available to this sub-problem, in scheduling order.
    pub days: Vec<Day>,
    pub slots_per_day: u32,
}

impl SubProblem {
    pub fn new(
        name: impl Into<String>,
        modules: Vec<Module>,
        halls: Vec<Hall>,
        days: Vec<Day>,
        slots_per_day: u32,
    ) -> Self {
        Self {
            name: name.into(),
            modules,
            halls,
            days,
            slots_per_day,
        }
    }

    /// Looks up a module by code.
    pub fn module(&self, code: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.code() == code)
    }

    /// Number of (day, slot) pairs available.
    pub fn slot_capacity(&self) -> usize {
        self.days.len() * self.slots_per_day as usize
    }
}

/// Placement of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub module_code: String,
    pub day: Day,
    /// First slot; multi-slot exams occupy `slot..slot + duration`.
    pub slot: Slot,
    /// Hall labels in `Name-Capacity` form.
    pub halls: Vec<String>,
}

impl Assignment {
    pub fn new(module_code: impl Into<String>, day: Day, slot: Slot, halls: Vec<String>) -> Self {
        Self {
            module_code: module_code.into(),
            day,
            slot,
            halls,
        }
    }
}

/// Result of a successful engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutput {
    pub status: SolveStatus,
    pub assignments: Vec<Assignment>,
}

impl SolverOutput {
    pub fn new(status: SolveStatus, assignments: Vec<Assignment>) -> Self {
        Self {
            status,
            assignments,
        }
    }

    /// An infeasible output without assignments.
    pub fn infeasible() -> Self {
        Self::new(SolveStatus::Infeasible, Vec::new())
    }

    /// Turns assignments into timetable entries using the sub-problem's
    /// module metadata.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownModule`] when an assignment names a
    /// module that is not part of `problem`.
    pub fn into_entries(self, problem: &SubProblem) -> Result<Vec<TimetableEntry>, EngineError> {
        self.assignments
            .into_iter()
            .map(|a| {
                let module = problem
                    .module(&a.module_code)
                    .ok_or_else(|| EngineError::UnknownModule(a.module_code.clone()))?;
                Ok(TimetableEntry::for_module(module, a.day, a.slot, a.halls))
            })
            .collect()
    }
}

/// Cooperative cancellation flag shared between the orchestrator and an engine.
///
/// Engines should poll [`CancelToken::is_cancelled`] regularly and return
/// [`EngineError::Cancelled`] once it is set.
///
/// # Example
///
/// ```
/// use examforge_solver::CancelToken;
///
/// let token = CancelToken::new();
/// let seen_by_engine = token.clone();
/// token.cancel();
/// assert!(seen_by_engine.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// An exam scheduling engine.
///
/// Implementations must be callable from several threads at once; each call
/// receives its own sub-problem and cancel token.
pub trait SolverEngine: Send + Sync + Debug {
    /// Solves `problem`.
    ///
    /// `Ok` with [`SolveStatus::Infeasible`] means the engine proved or gave
    /// up on the problem; `Err` means the call itself failed.
    fn solve(&self, problem: &SubProblem, cancel: &CancelToken)
        -> Result<SolverOutput, EngineError>;

    /// Short name used in logs and reports.
    fn name(&self) -> &str {
        "engine"
    }
}

impl<E: SolverEngine + ?Sized> SolverEngine for Arc<E> {
    fn solve(
        &self,
        problem: &SubProblem,
        cancel: &CancelToken,
    ) -> Result<SolverOutput, EngineError> {
        (**self).solve(problem, cancel)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
