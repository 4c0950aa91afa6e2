//! Timetable evaluation for ExamForge.
//!
//! This crate judges any candidate timetable, whoever produced it:
//! - [`ConstraintValidator`] checks hard and soft placement rules
//! - [`UtilizationAnalyzer`] measures hall usage and per-day load
//! - [`AccuracyScorer`] folds violation counts into a 0..=100 score
//! - [`Evaluator`] combines all three into an [`EvaluationReport`]
//!
//! Every component is a plain value holding only configuration. Evaluation
//! reads its arguments and allocates local state only, so a single evaluator
//! can be shared across threads.
//!
//! # Example
//!
//! ```
//! use examforge_core::{Catalog, Day, Hall, ModuleRecord, SolveStatus, Timetable, TimetableEntry};
//! use examforge_scoring::Evaluator;
//!
//! let module = ModuleRecord::new("CE1101", "CE", 1, 80).build().unwrap();
//! let catalog = Catalog::new(
//!     vec![module.clone()],
//!     vec![Hall::new("LR1", 100).unwrap()],
//!     Day::sequence(2),
//!     1,
//! )
//! .unwrap();
//!
//! let entry = TimetableEntry::for_module(&module, Day::new("day1"), 0, vec!["LR1-100".into()]);
//! let timetable = Timetable::new(SolveStatus::Optimal, vec![entry]);
//!
//! let report = Evaluator::default().evaluate(&timetable, &catalog);
//! assert!(report.feasible);
//! assert_eq!(report.accuracy_score, 100);
//! assert_eq!(report.hall_utilization_percent, 50.0);
//! ```

mod accuracy;
mod groups;
mod hall_name;
mod occupancy;
mod report;
mod utilization;
mod validator;

pub use accuracy::AccuracyScorer;
pub use hall_name::extract_hall_name;
pub use report::{EvaluationReport, Evaluator};
pub use utilization::{DayLoad, Utilization, UtilizationAnalyzer};
pub use validator::{ConstraintValidator, ValidationOutcome};
