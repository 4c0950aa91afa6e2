//! Timetables produced by a solver or by merging partition results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Day, Module, Slot};

/// Outcome status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// A solution was found and proven optimal.
    Optimal,
    /// A solution was found.
    Feasible,
    /// No solution was found, either proven or given up on.
    Infeasible,
}

impl SolveStatus {
    /// True for `Optimal` and `Feasible`.
    pub fn is_solved(&self) -> bool {
        !matches!(self, SolveStatus::Infeasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::Feasible => write!(f, "FEASIBLE"),
            SolveStatus::Infeasible => write!(f, "INFEASIBLE"),
        }
    }
}

/// One scheduled exam.
///
/// `halls` holds labels in `Name-Capacity` form; large common modules may
/// span several halls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    #[serde(alias = "code")]
    pub module_code: String,
    #[serde(default)]
    pub name: String,
    pub day: Day,
    pub slot: Slot,
    pub halls: Vec<String>,
    pub students: u32,
    pub department: String,
    pub semester: u32,
    #[serde(default)]
    pub iscommon: bool,
}

impl TimetableEntry {
    /// Creates an entry for `module` copying its metadata.
    ///
    /// # Example
    ///
    /// ```
    /// use examforge_core::{Day, ModuleRecord, TimetableEntry};
    ///
    /// let module = ModuleRecord::new("CE3201", "CE", 3, 80).build().unwrap();
    /// let entry = TimetableEntry::for_module(&module, Day::new("day5"), 1, vec!["LR1-550".into()]);
    ///
    /// assert_eq!(entry.module_code, "CE3201");
    /// assert_eq!(entry.semester, 3);
    /// assert!(!entry.iscommon);
    /// ```
    pub fn for_module(module: &Module, day: Day, slot: Slot, halls: Vec<String>) -> Self {
        Self {
            module_code: module.code().to_string(),
            name: module.name().to_string(),
            day,
            slot,
            halls,
            students: module.number_of_students(),
            department: module.department().to_string(),
            semester: module.semester(),
            iscommon: module.is_common(),
        }
    }
}

/// A complete or partial timetable with its solve status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub status: SolveStatus,
    #[serde(alias = "timetable")]
    pub entries: Vec<TimetableEntry>,
}

impl Timetable {
    pub fn new(status: SolveStatus, entries: Vec<TimetableEntry>) -> Self {
        Self { status, entries }
    }

    /// An infeasible timetable with no entries.
    pub fn infeasible() -> Self {
        Self::new(SolveStatus::Infeasible, Vec::new())
    }

    /// Builds a merged timetable from concatenated partition entries.
    ///
    /// The status is `Feasible` when at least one entry exists, otherwise
    /// `Infeasible`.
    pub fn merged(entries: Vec<TimetableEntry>) -> Self {
        let status = if entries.is_empty() {
            SolveStatus::Infeasible
        } else {
            SolveStatus::Feasible
        };
        Self::new(status, entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&SolveStatus::Feasible).unwrap(),
            "\"FEASIBLE\""
        );
        assert_eq!(SolveStatus::Infeasible.to_string(), "INFEASIBLE");
    }

    #[test]
    fn test_merged_status_follows_entries() {
        assert_eq!(Timetable::merged(vec![]).status, SolveStatus::Infeasible);

        let entry = TimetableEntry {
            module_code: "A".into(),
            name: String::new(),
            day: Day::new("day1"),
            slot: 0,
            halls: vec!["LR1-10".into()],
            students: 5,
            department: "CE".into(),
            semester: 1,
            iscommon: false,
        };
        assert_eq!(Timetable::merged(vec![entry]).status, SolveStatus::Feasible);
    }

    #[test]
    fn test_timetable_accepts_source_field_names() {
        let json = r#"{"status":"OPTIMAL","timetable":[{"code":"CE1202","day":"day2","slot":0,
            "halls":["Mechanical-New Workshop-550"],"students":550,"department":"CE",
            "semester":1,"iscommon":true,"name":"Introduction to Infrastructure Planning"}]}"#;
        let tt: Timetable = serde_json::from_str(json).unwrap();
        assert_eq!(tt.status, SolveStatus::Optimal);
        assert_eq!(tt.entries[0].module_code, "CE1202");
        assert!(tt.entries[0].iscommon);
    }
}
