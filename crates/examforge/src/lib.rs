//! ExamForge - decomposed exam timetabling in Rust
//!
//! Split an exam catalog into semester bands, solve each band concurrently
//! with any [`SolverEngine`], merge the results and judge the merged
//! timetable with the same validator used for whole-catalog solves.
//!
//! # Example
//!
//! ```
//! use examforge::prelude::*;
//!
//! let catalog = Catalog::new(
//!     vec![
//!         ModuleRecord::new("CE1101", "CE", 1, 80).build().unwrap(),
//!         ModuleRecord::new("CE3101", "CE", 3, 80).build().unwrap(),
//!         ModuleRecord::new("CE5101", "CE", 5, 80).build().unwrap(),
//!     ],
//!     vec![Hall::new("LR1", 100).unwrap()],
//!     Day::sequence(3),
//!     1,
//! )
//! .unwrap();
//!
//! let planner = Planner::new(PlannerConfig::default())?;
//! let solve = planner.solve_decomposed(&catalog);
//! let report = planner.evaluate(&solve.timetable, &catalog);
//!
//! assert_eq!(solve.groups.len(), 3);
//! assert!(report.feasible);
//! assert_eq!(report.accuracy_score, 100);
//! # Ok::<(), examforge::ExamForgeError>(())
//! ```

mod error;
mod planner;

pub use error::{ExamForgeError, Result};
pub use planner::{compare, evaluate, Planner};

pub use examforge_benchmark::{
    ComparisonHarness, ComparisonReport, ComparisonSummary, MarkdownReport, SizeComparison,
    Strategy, StrategyRun,
};
pub use examforge_config::{
    BandConfig, ComparisonConfig, ConfigError, DaySlicing, EngineConfig, EvaluationConfig,
    OrchestratorConfig, PlannerConfig, ThreadCount,
};
pub use examforge_core::{
    Catalog, CatalogError, ConstraintLevel, ConstraintViolation, Day, Hall, Module, ModuleRecord,
    Slot, SolveStatus, Timetable, TimetableEntry, ViolationKind,
};
pub use examforge_scoring::{
    extract_hall_name, AccuracyScorer, ConstraintValidator, DayLoad, EvaluationReport, Evaluator,
    Utilization, UtilizationAnalyzer, ValidationOutcome,
};
pub use examforge_solver::{
    Assignment, CancelToken, DecomposedSolve, DecomposedSolverOrchestrator, EngineError,
    ExcludedModule, ExclusionReason, FailureKind, FilterOutcome, FirstFitEngine, PartitionFailure,
    PartitionGroup, PartitionResult, PartitionStrategy, PreconditionFilter,
    SemesterBandPartitioner, SolverEngine, SolverOutput, SubProblem,
};

/// Colorful console output, enabled by the `console` feature.
#[cfg(feature = "console")]
pub use examforge_console as console;

pub mod prelude {
    pub use super::{
        Catalog, ComparisonReport, Day, EvaluationReport, Hall, Module, ModuleRecord, Planner,
        PlannerConfig, SolveStatus, SolverEngine, Timetable, TimetableEntry,
    };
}
