//! Naive versus decomposed solving comparison for ExamForge.
//!
//! The [`ComparisonHarness`] takes growing prefixes of a catalog and solves
//! each one twice with the same engine:
//! - **naive**: one engine call over every schedulable module and every day
//! - **intelligent**: semester-band partitions solved concurrently by the
//!   [`DecomposedSolverOrchestrator`](examforge_solver::DecomposedSolverOrchestrator)
//!
//! Both timetables are evaluated with the same
//! [`Evaluator`](examforge_scoring::Evaluator), and the resulting
//! [`ComparisonReport`] exports to JSON and Markdown.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use examforge_benchmark::{ComparisonHarness, MarkdownReport};
//! use examforge_config::PlannerConfig;
//! use examforge_core::{Catalog, Day, Hall, ModuleRecord};
//! use examforge_solver::FirstFitEngine;
//!
//! let catalog = Catalog::new(
//!     vec![
//!         ModuleRecord::new("CE1101", "CE", 1, 40).build().unwrap(),
//!         ModuleRecord::new("CE3101", "CE", 3, 40).build().unwrap(),
//!     ],
//!     vec![Hall::new("LR1", 50).unwrap()],
//!     Day::sequence(3),
//!     1,
//! )
//! .unwrap();
//!
//! let harness = ComparisonHarness::new(Arc::new(FirstFitEngine::new()), &PlannerConfig::default());
//! let report = harness.run(&catalog, &[1, 2]).unwrap();
//!
//! assert_eq!(report.sizes.len(), 2);
//! assert!(report.sizes[1].naive.evaluation.feasible);
//! assert!(MarkdownReport::new(&report).to_string().contains("| 2 |"));
//! ```

mod harness;
mod report;
mod result;

pub use harness::ComparisonHarness;
pub use report::MarkdownReport;
pub use result::{ComparisonReport, ComparisonSummary, SizeComparison, Strategy, StrategyRun};
