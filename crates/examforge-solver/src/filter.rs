//! Precondition filtering of structurally unschedulable modules.

use std::fmt;

use examforge_core::{Hall, Module};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Why a module was left out of solving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The exam needs more consecutive slots than a day has.
    DurationExceedsDay { duration: u32, slots_per_day: u32 },
    /// No single hall seats every student.
    NoHallLargeEnough { students: u32, largest_hall: u32 },
    /// The module's semester belongs to no partition band.
    NoPartition { semester: u32 },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::DurationExceedsDay {
                duration,
                slots_per_day,
            } => write!(f, "duration {duration} exceeds {slots_per_day} slots per day"),
            ExclusionReason::NoHallLargeEnough {
                students,
                largest_hall,
            } => write!(
                f,
                "{students} students exceed the largest hall ({largest_hall})"
            ),
            ExclusionReason::NoPartition { semester } => {
                write!(f, "semester {semester} belongs to no band")
            }
        }
    }
}

/// A module left out of solving, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedModule {
    pub code: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// Modules split into schedulable and excluded ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Schedulable modules, in input order.
    pub kept: Vec<Module>,
    /// Excluded modules, in input order.
    pub excluded: Vec<ExcludedModule>,
}

impl FilterOutcome {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }
}

/// Removes modules that can never be scheduled.
///
/// A module is excluded when its duration exceeds `slots_per_day` or when no
/// hall has `capacity >= number_of_students`. Duration is checked first.
///
/// # Example
///
/// ```
/// use examforge_core::{Hall, ModuleRecord};
/// use examforge_solver::{ExclusionReason, PreconditionFilter};
///
/// let modules = vec![
///     ModuleRecord::new("CE1101", "CE", 1, 100).build().unwrap(),
///     ModuleRecord::new("CE1102", "CE", 1, 100).duration(3).build().unwrap(),
///     ModuleRecord::new("IS1101", "IS", 1, 600).build().unwrap(),
/// ];
/// let halls = vec![Hall::new("LR1", 550).unwrap()];
///
/// let outcome = PreconditionFilter::new().apply(&modules, &halls, 2);
/// assert_eq!(outcome.kept.len(), 1);
/// assert_eq!(outcome.excluded_count(), 2);
/// assert_eq!(
///     outcome.excluded[1].reason,
///     ExclusionReason::NoHallLargeEnough { students: 600, largest_hall: 550 }
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PreconditionFilter;

impl PreconditionFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, modules: &[Module], halls: &[Hall], slots_per_day: u32) -> FilterOutcome {
        let largest_hall = halls.iter().map(Hall::capacity).max().unwrap_or(0);
        let mut outcome = FilterOutcome::default();

        for module in modules {
            let reason = if module.duration() > slots_per_day {
                Some(ExclusionReason::DurationExceedsDay {
                    duration: module.duration(),
                    slots_per_day,
                })
            } else if !halls.iter().any(|h| h.fits(module.number_of_students())) {
                Some(ExclusionReason::NoHallLargeEnough {
                    students: module.number_of_students(),
                    largest_hall,
                })
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    warn!(event = "module_excluded", module = module.code(), reason = %reason);
                    outcome.excluded.push(ExcludedModule {
                        code: module.code().to_string(),
                        reason,
                    });
                }
                None => outcome.kept.push(module.clone()),
            }
        }

        outcome
    }
}
