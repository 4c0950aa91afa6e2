//! Catalog and timetable builders.
//!
//! Builders panic on invalid input; they are meant for tests only.

use examforge_core::{
    Catalog, Day, Hall, Module, ModuleRecord, Slot, SolveStatus, Timetable, TimetableEntry,
};

/// A single-slot department module.
pub fn module(code: &str, department: &str, semester: u32, students: u32) -> Module {
    ModuleRecord::new(code, department, semester, students)
        .name(format!("{code} exam"))
        .build()
        .expect("valid test module")
}

/// A single-slot module common to every department of its semester.
pub fn common_module(code: &str, department: &str, semester: u32, students: u32) -> Module {
    ModuleRecord::new(code, department, semester, students)
        .name(format!("{code} exam"))
        .common(true)
        .build()
        .expect("valid test module")
}

pub fn hall(name: &str, capacity: u32) -> Hall {
    Hall::new(name, capacity).expect("valid test hall")
}

/// Days `day1..=dayN`.
pub fn days(count: usize) -> Vec<Day> {
    Day::sequence(count)
}

pub fn catalog(modules: Vec<Module>, halls: Vec<Hall>, days: Vec<Day>, slots_per_day: u32) -> Catalog {
    Catalog::new(modules, halls, days, slots_per_day).expect("valid test catalog")
}

/// An entry for a 10-student, non-common module.
pub fn entry(
    code: &str,
    department: &str,
    semester: u32,
    day: &str,
    slot: Slot,
    halls: &[&str],
) -> TimetableEntry {
    TimetableEntry {
        module_code: code.to_string(),
        name: String::new(),
        day: Day::new(day),
        slot,
        halls: halls.iter().map(|h| h.to_string()).collect(),
        students: 10,
        department: department.to_string(),
        semester,
        iscommon: false,
    }
}

/// An entry placing `module` at `day`/`slot` in `halls`.
pub fn placed(module: &Module, day: &str, slot: Slot, halls: &[&str]) -> TimetableEntry {
    TimetableEntry::for_module(
        module,
        Day::new(day),
        slot,
        halls.iter().map(|h| h.to_string()).collect(),
    )
}

/// A feasible timetable holding `entries`.
pub fn timetable(entries: Vec<TimetableEntry>) -> Timetable {
    Timetable::new(SolveStatus::Feasible, entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placed_copies_module_metadata() {
        let m = common_module("IS1402", "IS", 1, 300);
        let e = placed(&m, "day2", 1, &["LR1-550"]);
        assert!(e.iscommon);
        assert_eq!(e.students, 300);
        assert_eq!(e.name, "IS1402 exam");
    }
}
