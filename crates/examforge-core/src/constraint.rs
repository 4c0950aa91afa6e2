//! Constraint violation types.
//!
//! Every rule the validator checks produces [`ConstraintViolation`] values
//! tagged with a [`ViolationKind`]. The kind determines whether the violation
//! is hard (breaks the timetable) or soft (a preference penalty).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority level of a constraint.
///
/// # Example
///
/// ```
/// use examforge_core::{ConstraintLevel, ViolationKind};
///
/// assert_eq!(ViolationKind::HallConflict.level(), ConstraintLevel::Hard);
/// assert_eq!(ViolationKind::SoftDeptOverlap.level(), ConstraintLevel::Soft);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintLevel {
    /// Must be satisfied for the timetable to be usable.
    Hard,
    /// Undesirable but tolerable.
    Soft,
}

/// The rule a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A module is scheduled zero times, more than once, or is not in the catalog.
    ModuleDuplicate,
    /// Two modules share a hall at the same day and slot, or a hall is unknown.
    HallConflict,
    /// An entry seats more students than its halls hold.
    HallCapacity,
    /// Two non-common modules of one department and semester share a day and slot.
    DeptSemesterConflict,
    /// A common module shares a day and slot with a department module of its semester.
    CommonModuleConflict,
    /// Two modules of one department but different semesters share a day and slot.
    SoftDeptOverlap,
}

impl ViolationKind {
    /// Returns whether this kind is a hard or soft constraint.
    pub fn level(&self) -> ConstraintLevel {
        match self {
            ViolationKind::SoftDeptOverlap => ConstraintLevel::Soft,
            _ => ConstraintLevel::Hard,
        }
    }

    /// Returns true for hard constraint kinds.
    pub fn is_hard(&self) -> bool {
        self.level() == ConstraintLevel::Hard
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::ModuleDuplicate => "ModuleDuplicate",
            ViolationKind::HallConflict => "HallConflict",
            ViolationKind::HallCapacity => "HallCapacity",
            ViolationKind::DeptSemesterConflict => "DeptSemesterConflict",
            ViolationKind::CommonModuleConflict => "CommonModuleConflict",
            ViolationKind::SoftDeptOverlap => "SoftDeptOverlap",
        };
        f.write_str(name)
    }
}

/// A single broken rule with the modules involved.
///
/// # Example
///
/// ```
/// use examforge_core::{ConstraintViolation, ViolationKind};
///
/// let v = ConstraintViolation::new(
///     ViolationKind::HallConflict,
///     "LR1 on day1 slot 0 has multiple exams",
///     vec!["CE1101".to_string(), "EE1101".to_string()],
/// );
/// assert!(v.involves("EE1101"));
/// assert_eq!(v.to_string(), "HallConflict: LR1 on day1 slot 0 has multiple exams");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// The rule that was broken.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub detail: String,
    /// Codes of the modules involved, in timetable order.
    pub modules: Vec<String>,
}

impl ConstraintViolation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, detail: impl Into<String>, modules: Vec<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            modules,
        }
    }

    /// Returns true if the given module code is involved in this violation.
    pub fn involves(&self, code: &str) -> bool {
        self.modules.iter().any(|m| m == code)
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_dept_overlap_is_soft() {
        let hard = [
            ViolationKind::ModuleDuplicate,
            ViolationKind::HallConflict,
            ViolationKind::HallCapacity,
            ViolationKind::DeptSemesterConflict,
            ViolationKind::CommonModuleConflict,
        ];
        for kind in hard {
            assert!(kind.is_hard(), "{kind} should be hard");
        }
        assert!(!ViolationKind::SoftDeptOverlap.is_hard());
    }

    #[test]
    fn test_violation_serializes_kind_by_name() {
        let v = ConstraintViolation::new(
            ViolationKind::CommonModuleConflict,
            "clash",
            vec!["A".into()],
        );
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("\"kind\":\"CommonModuleConflict\""));
    }
}
