//! Concurrent per-partition solving with failure isolation.
//!
//! Each non-empty group becomes a [`SubProblem`] solved on a bounded worker
//! pool. A partition whose engine fails, panics or outlives its timeout is
//! recorded as infeasible with the failure attached; the remaining partitions
//! are unaffected. Entries of solved partitions are concatenated in group
//! order after every partition has finished.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError};
use examforge_config::OrchestratorConfig;
use examforge_core::{Day, Hall, SolveStatus, Timetable, TimetableEntry};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::{CancelToken, EngineError, SolverEngine, SolverOutput, SubProblem};
use crate::partition::PartitionGroup;

/// What went wrong in a failed partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The engine returned an error.
    Engine,
    /// The engine panicked.
    Panic,
    /// The engine did not finish within the partition timeout.
    Timeout,
}

/// A solver invocation failure attached to a partition result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl PartitionFailure {
    fn engine(err: &EngineError) -> Self {
        Self {
            kind: FailureKind::Engine,
            message: err.to_string(),
        }
    }

    fn panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "engine panicked".to_string()
        };
        Self {
            kind: FailureKind::Panic,
            message,
        }
    }

    fn timeout(limit: Duration) -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: format!("no result within {:.3}s", limit.as_secs_f64()),
        }
    }
}

impl fmt::Display for PartitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Outcome of one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionResult {
    pub group: String,
    pub module_count: usize,
    /// `Feasible` when the engine found a solution, otherwise `Infeasible`.
    pub status: SolveStatus,
    pub entry_count: usize,
    pub assigned_days: Vec<Day>,
    pub runtime_ms: f64,
    /// Set when the engine failed, panicked or timed out.
    pub failure: Option<PartitionFailure>,
}

/// Merged timetable and per-partition outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposedSolve {
    pub timetable: Timetable,
    pub groups: Vec<PartitionResult>,
}

impl DecomposedSolve {
    /// Number of partitions that produced a solution.
    pub fn solved_count(&self) -> usize {
        self.groups.iter().filter(|g| g.status.is_solved()).count()
    }

    /// Partitions that failed with an attached failure.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PartitionFailure)> {
        self.groups
            .iter()
            .filter_map(|g| g.failure.as_ref().map(|f| (g.group.as_str(), f)))
    }
}

/// Result of one isolated engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolatedSolve {
    /// Status reported by the engine, or `Infeasible` on failure.
    pub status: SolveStatus,
    pub entries: Vec<TimetableEntry>,
    pub failure: Option<PartitionFailure>,
    pub runtime: Duration,
}

impl IsolatedSolve {
    fn failed(failure: PartitionFailure, runtime: Duration) -> Self {
        Self {
            status: SolveStatus::Infeasible,
            entries: Vec::new(),
            failure: Some(failure),
            runtime,
        }
    }

    /// Converts to a timetable carrying the engine status.
    pub fn into_timetable(self) -> Timetable {
        if self.status.is_solved() {
            Timetable::new(self.status, self.entries)
        } else {
            Timetable::infeasible()
        }
    }
}

/// Solves partition groups concurrently and merges their entries.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use examforge_config::OrchestratorConfig;
/// use examforge_core::{Day, Hall, ModuleRecord, SolveStatus};
/// use examforge_solver::{DecomposedSolverOrchestrator, FirstFitEngine, PartitionGroup};
///
/// let orchestrator = DecomposedSolverOrchestrator::new(
///     Arc::new(FirstFitEngine::new()),
///     OrchestratorConfig::default(),
/// );
/// let group = PartitionGroup::whole(
///     "all",
///     vec![ModuleRecord::new("CE1101", "CE", 1, 40).build().unwrap()],
///     Day::sequence(2),
/// );
///
/// let solve = orchestrator.solve(vec![group], &[Hall::new("LR1", 50).unwrap()], 2);
/// assert_eq!(solve.timetable.status, SolveStatus::Feasible);
/// assert_eq!(solve.groups[0].entry_count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct DecomposedSolverOrchestrator {
    engine: Arc<dyn SolverEngine>,
    config: OrchestratorConfig,
}

impl DecomposedSolverOrchestrator {
    pub fn new(engine: Arc<dyn SolverEngine>, config: OrchestratorConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &Arc<dyn SolverEngine> {
        &self.engine
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Solves every non-empty group and merges the results.
    ///
    /// The merged status is `Feasible` when at least one entry was produced,
    /// otherwise `Infeasible`. Empty groups are skipped and not reported.
    pub fn solve(
        &self,
        groups: Vec<PartitionGroup>,
        halls: &[Hall],
        slots_per_day: u32,
    ) -> DecomposedSolve {
        let problems: Vec<SubProblem> = groups
            .into_iter()
            .filter(|g| {
                if g.is_empty() {
                    debug!(event = "partition_skipped", group = %g.name);
                }
                !g.is_empty()
            })
            .map(|g| SubProblem::new(g.name, g.modules, halls.to_vec(), g.days, slots_per_day))
            .collect();

        let partition_count = problems.len();
        let thread_count = self.config.thread_count.resolve(partition_count);
        info!(
            event = "decomposed_solve_start",
            engine = self.engine.name(),
            partitions = partition_count,
            threads = thread_count,
        );

        let solved: Vec<(SubProblem, IsolatedSolve)> = if thread_count <= 1 || partition_count <= 1
        {
            problems
                .into_iter()
                .map(|p| {
                    let run = self.solve_isolated(&p);
                    (p, run)
                })
                .collect()
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .build()
            {
                Ok(pool) => pool.install(|| {
                    problems
                        .into_par_iter()
                        .map(|p| {
                            let run = self.solve_isolated(&p);
                            (p, run)
                        })
                        .collect()
                }),
                Err(err) => {
                    warn!(event = "pool_unavailable", error = %err);
                    problems
                        .into_iter()
                        .map(|p| {
                            let run = self.solve_isolated(&p);
                            (p, run)
                        })
                        .collect()
                }
            }
        };

        let mut entries = Vec::new();
        let mut results = Vec::with_capacity(solved.len());
        for (problem, run) in solved {
            let solved = run.status.is_solved();
            results.push(PartitionResult {
                group: problem.name,
                module_count: problem.modules.len(),
                status: if solved {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::Infeasible
                },
                entry_count: run.entries.len(),
                assigned_days: problem.days,
                runtime_ms: run.runtime.as_secs_f64() * 1000.0,
                failure: run.failure,
            });
            if solved {
                entries.extend(run.entries);
            }
        }

        let timetable = Timetable::merged(entries);
        info!(
            event = "decomposed_solve_end",
            status = %timetable.status,
            entries = timetable.len(),
            solved = results.iter().filter(|r| r.status.is_solved()).count(),
            partitions = results.len(),
        );

        DecomposedSolve {
            timetable,
            groups: results,
        }
    }

    /// Runs the engine on `problem` on its own thread, honoring the
    /// configured timeout and containing panics.
    ///
    /// On timeout the engine's cancel token is set and the call returns
    /// without waiting for the engine thread.
    pub fn solve_isolated(&self, problem: &SubProblem) -> IsolatedSolve {
        let start = Instant::now();
        let cancel = CancelToken::new();
        let (tx, rx) = channel::bounded(1);

        let engine = Arc::clone(&self.engine);
        let owned = problem.clone();
        let token = cancel.clone();
        let spawned = thread::Builder::new()
            .name(format!("examforge-{}", problem.name))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| engine.solve(&owned, &token)));
                let _ = tx.send(result);
            });
        if let Err(err) = spawned {
            let failure = PartitionFailure {
                kind: FailureKind::Engine,
                message: format!("could not start engine thread: {err}"),
            };
            return self.finish(problem, IsolatedSolve::failed(failure, start.elapsed()));
        }

        let received = match self.config.partition_timeout() {
            Some(limit) => rx.recv_timeout(limit),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let run = match received {
            Ok(Ok(Ok(output))) => self.accept(problem, output, start.elapsed()),
            Ok(Ok(Err(err))) => {
                IsolatedSolve::failed(PartitionFailure::engine(&err), start.elapsed())
            }
            Ok(Err(payload)) => {
                IsolatedSolve::failed(PartitionFailure::panic(payload.as_ref()), start.elapsed())
            }
            Err(RecvTimeoutError::Timeout) => {
                cancel.cancel();
                let limit = self.config.partition_timeout().unwrap_or_default();
                IsolatedSolve::failed(PartitionFailure::timeout(limit), start.elapsed())
            }
            Err(RecvTimeoutError::Disconnected) => IsolatedSolve::failed(
                PartitionFailure {
                    kind: FailureKind::Panic,
                    message: "engine thread exited without a result".to_string(),
                },
                start.elapsed(),
            ),
        };

        self.finish(problem, run)
    }

    fn accept(&self, problem: &SubProblem, output: SolverOutput, runtime: Duration) -> IsolatedSolve {
        let status = output.status;
        if !status.is_solved() {
            return IsolatedSolve {
                status,
                entries: Vec::new(),
                failure: None,
                runtime,
            };
        }
        match output.into_entries(problem) {
            Ok(entries) => IsolatedSolve {
                status,
                entries,
                failure: None,
                runtime,
            },
            Err(err) => IsolatedSolve::failed(PartitionFailure::engine(&err), runtime),
        }
    }

    fn finish(&self, problem: &SubProblem, run: IsolatedSolve) -> IsolatedSolve {
        let runtime_ms = run.runtime.as_millis() as u64;
        match &run.failure {
            Some(failure) => warn!(
                event = "partition_failed",
                group = %problem.name,
                kind = ?failure.kind,
                error = %failure.message,
                duration_ms = runtime_ms,
            ),
            None => info!(
                event = "partition_end",
                group = %problem.name,
                modules = problem.modules.len(),
                days = problem.days.len(),
                status = %run.status,
                entries = run.entries.len(),
                duration_ms = runtime_ms,
            ),
        }
        run
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use examforge_config::ThreadCount;
    use examforge_core::ModuleRecord;

    use super::*;
    use crate::engine::Assignment;

    // Places every module on the first day and slot in the first hall.
    #[derive(Debug, Default)]
    struct StackingEngine {
        calls: AtomicUsize,
    }

    impl SolverEngine for StackingEngine {
        fn solve(
            &self,
            problem: &SubProblem,
            _cancel: &CancelToken,
        ) -> Result<SolverOutput, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (Some(day), Some(hall)) = (problem.days.first(), problem.halls.first()) else {
                return Ok(SolverOutput::infeasible());
            };
            let assignments = problem
                .modules
                .iter()
                .map(|m| Assignment::new(m.code(), day.clone(), 0, vec![hall.label()]))
                .collect();
            Ok(SolverOutput::new(SolveStatus::Optimal, assignments))
        }
    }

    fn group(name: &str, codes: &[&str]) -> PartitionGroup {
        let modules = codes
            .iter()
            .map(|c| ModuleRecord::new(*c, "CE", 1, 10).build().unwrap())
            .collect();
        PartitionGroup::whole(name, modules, Day::sequence(2))
    }

    fn halls() -> Vec<Hall> {
        vec![Hall::new("LR1", 100).unwrap()]
    }

    #[test]
    fn test_empty_groups_are_skipped() {
        let engine = Arc::new(StackingEngine::default());
        let orchestrator =
            DecomposedSolverOrchestrator::new(engine.clone(), OrchestratorConfig::default());

        let solve = orchestrator.solve(vec![group("a", &[]), group("b", &["B1"])], &halls(), 1);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(solve.groups.len(), 1);
        assert_eq!(solve.groups[0].group, "b");
    }

    #[test]
    fn test_merge_keeps_group_order_across_threads() {
        let config = OrchestratorConfig {
            thread_count: ThreadCount::Count(3),
            partition_timeout_secs: None,
        };
        let orchestrator =
            DecomposedSolverOrchestrator::new(Arc::new(StackingEngine::default()), config);

        let solve = orchestrator.solve(
            vec![group("a", &["A1", "A2"]), group("b", &["B1"]), group("c", &["C1"])],
            &halls(),
            1,
        );
        let codes: Vec<_> = solve
            .timetable
            .entries
            .iter()
            .map(|e| e.module_code.as_str())
            .collect();
        assert_eq!(codes, ["A1", "A2", "B1", "C1"]);
        assert_eq!(solve.solved_count(), 3);
        assert_eq!(solve.timetable.status, SolveStatus::Feasible);
    }

    #[test]
    fn test_no_groups_is_infeasible() {
        let orchestrator = DecomposedSolverOrchestrator::new(
            Arc::new(StackingEngine::default()),
            OrchestratorConfig::default(),
        );
        let solve = orchestrator.solve(vec![], &halls(), 1);
        assert_eq!(solve.timetable.status, SolveStatus::Infeasible);
        assert!(solve.groups.is_empty());
    }

    #[test]
    fn test_panic_message_is_captured() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let failure = PartitionFailure::panic(payload.as_ref());
        assert_eq!(failure.kind, FailureKind::Panic);
        assert_eq!(failure.message, "boom");
    }
}
