//! ExamForge solving
//!
//! This crate provides:
//! - The [`SolverEngine`] boundary and its [`SubProblem`] input
//! - Precondition filtering of unschedulable modules
//! - Semester-band partitioning with disjoint or overlapping day slices
//! - The [`DecomposedSolverOrchestrator`], which solves partitions concurrently
//!   and isolates failures, panics and timeouts per partition
//! - [`FirstFitEngine`], a deterministic backtracking reference engine

pub mod engine;
pub mod filter;
pub mod first_fit;
pub mod orchestrator;
pub mod partition;

pub use engine::{Assignment, CancelToken, EngineError, SolverEngine, SolverOutput, SubProblem};
pub use filter::{ExcludedModule, ExclusionReason, FilterOutcome, PreconditionFilter};
pub use first_fit::FirstFitEngine;
pub use orchestrator::{
    DecomposedSolve, DecomposedSolverOrchestrator, FailureKind, IsolatedSolve, PartitionFailure,
    PartitionResult,
};
pub use partition::{PartitionGroup, PartitionStrategy, SemesterBandPartitioner};
