//! Solver engine doubles.
//!
//! Engines that target one partition delegate every other sub-problem to a
//! [`FirstFitEngine`], so a test can break a single partition and still get
//! real timetables from the rest.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use examforge_core::Day;
use examforge_solver::{
    CancelToken, EngineError, FirstFitEngine, SolverEngine, SolverOutput, SubProblem,
};

fn targets(target: &Option<String>, problem: &SubProblem) -> bool {
    target.as_deref().map_or(true, |name| name == problem.name)
}

/// Returns [`EngineError::Failed`] for its target sub-problem.
#[derive(Debug, Clone, Default)]
pub struct FailingEngine {
    target: Option<String>,
    fallback: FirstFitEngine,
}

impl FailingEngine {
    /// Fails every sub-problem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails only the sub-problem named `name`.
    pub fn on(name: &str) -> Self {
        Self {
            target: Some(name.to_string()),
            fallback: FirstFitEngine::new(),
        }
    }
}

impl SolverEngine for FailingEngine {
    fn solve(
        &self,
        problem: &SubProblem,
        cancel: &CancelToken,
    ) -> Result<SolverOutput, EngineError> {
        if targets(&self.target, problem) {
            return Err(EngineError::Failed(format!("{} rejected", problem.name)));
        }
        self.fallback.solve(problem, cancel)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Panics for its target sub-problem.
#[derive(Debug, Clone, Default)]
pub struct PanickingEngine {
    target: Option<String>,
    fallback: FirstFitEngine,
}

impl PanickingEngine {
    /// Panics on every sub-problem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Panics only on the sub-problem named `name`.
    pub fn on(name: &str) -> Self {
        Self {
            target: Some(name.to_string()),
            fallback: FirstFitEngine::new(),
        }
    }
}

impl SolverEngine for PanickingEngine {
    fn solve(
        &self,
        problem: &SubProblem,
        cancel: &CancelToken,
    ) -> Result<SolverOutput, EngineError> {
        if targets(&self.target, problem) {
            panic!("engine exploded on {}", problem.name);
        }
        self.fallback.solve(problem, cancel)
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Sleeps on its target sub-problem until cancelled.
///
/// Gives up with [`EngineError::Failed`] after `give_up_after` so a test
/// without a timeout cannot hang.
#[derive(Debug, Clone)]
pub struct SlowEngine {
    target: Option<String>,
    poll: Duration,
    give_up_after: Duration,
    fallback: FirstFitEngine,
}

impl SlowEngine {
    /// Stalls on every sub-problem.
    pub fn new() -> Self {
        Self {
            target: None,
            poll: Duration::from_millis(5),
            give_up_after: Duration::from_secs(30),
            fallback: FirstFitEngine::new(),
        }
    }

    /// Stalls only on the sub-problem named `name`.
    pub fn on(name: &str) -> Self {
        Self {
            target: Some(name.to_string()),
            ..Self::new()
        }
    }

    pub fn with_give_up_after(mut self, limit: Duration) -> Self {
        self.give_up_after = limit;
        self
    }
}

impl Default for SlowEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverEngine for SlowEngine {
    fn solve(
        &self,
        problem: &SubProblem,
        cancel: &CancelToken,
    ) -> Result<SolverOutput, EngineError> {
        if !targets(&self.target, problem) {
            return self.fallback.solve(problem, cancel);
        }
        let start = Instant::now();
        while !cancel.is_cancelled() {
            if start.elapsed() >= self.give_up_after {
                return Err(EngineError::Failed("never cancelled".to_string()));
            }
            thread::sleep(self.poll);
        }
        Err(EngineError::Cancelled)
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// One call seen by a [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub name: String,
    pub modules: Vec<String>,
    pub days: Vec<Day>,
    pub slots_per_day: u32,
}

/// Records every sub-problem, then delegates to `inner`.
#[derive(Debug, Default)]
pub struct RecordingEngine<E = FirstFitEngine> {
    inner: E,
    calls: Mutex<Vec<RecordedCall>>,
}

impl<E: SolverEngine> RecordingEngine<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls seen so far, sorted by sub-problem name.
    pub fn calls(&self) -> Vec<RecordedCall> {
        let mut calls = self.calls.lock().expect("recording lock").clone();
        calls.sort_by(|a, b| a.name.cmp(&b.name));
        calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("recording lock").len()
    }
}

impl<E: SolverEngine> SolverEngine for RecordingEngine<E> {
    fn solve(
        &self,
        problem: &SubProblem,
        cancel: &CancelToken,
    ) -> Result<SolverOutput, EngineError> {
        self.calls
            .lock()
            .expect("recording lock")
            .push(RecordedCall {
                name: problem.name.clone(),
                modules: problem.modules.iter().map(|m| m.code().to_string()).collect(),
                days: problem.days.clone(),
                slots_per_day: problem.slots_per_day,
            });
        self.inner.solve(problem, cancel)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
