//! Hard and soft constraint checks over a complete timetable.

use std::collections::HashSet;

use examforge_core::{
    Catalog, ConstraintViolation, Day, Slot, Timetable, TimetableEntry, ViolationKind,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::groups::OrderedGroups;
use crate::hall_name::extract_hall_name;
use crate::occupancy::Durations;

/// Violations found by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Hard violations in check order.
    pub hard: Vec<ConstraintViolation>,
    /// Soft violations in check order.
    pub soft: Vec<ConstraintViolation>,
}

impl ValidationOutcome {
    /// True when no hard constraint is broken.
    pub fn is_feasible(&self) -> bool {
        self.hard.is_empty()
    }

    pub fn hard_count(&self) -> usize {
        self.hard.len()
    }

    pub fn soft_count(&self) -> usize {
        self.soft.len()
    }

    /// Iterates over hard and soft violations of one kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &ConstraintViolation> {
        self.hard
            .iter()
            .chain(self.soft.iter())
            .filter(move |v| v.kind == kind)
    }
}

/// Checks a timetable against the placement rules.
///
/// Hard rules, each accumulated independently:
/// 1. every catalog module is scheduled exactly once, and every scheduled
///    code exists in the catalog
/// 2. no two modules share a hall at the same day and slot, and every hall
///    exists in the catalog
/// 3. no entry seats more students than its halls hold
/// 4. no two non-common modules of the same department and semester share
///    a day and slot
/// 5. no common module shares a day and slot with a department module of
///    its semester
///
/// The soft rule flags modules of one department but different semesters
/// sharing a day and slot, once per unordered pair.
///
/// An entry occupies `slot..slot + duration`, with the duration taken from
/// the catalog, and rules 2, 4, 5 and the soft rule are checked in every
/// occupied slot. Codes missing from the catalog occupy their start slot
/// only.
///
/// Grouping follows the timetable's entry order, so the same input always
/// yields the same violation lists in the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintValidator;

type SlotKey<'a> = (&'a Day, Slot);

impl ConstraintValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates `timetable` against `catalog`. Never fails.
    pub fn validate(&self, timetable: &Timetable, catalog: &Catalog) -> ValidationOutcome {
        let entries = &timetable.entries;
        let durations = Durations::of(catalog);
        let mut hard = Vec::new();

        check_module_once(entries, catalog, &mut hard);
        check_hall_exclusivity(entries, catalog, &durations, &mut hard);
        check_hall_capacity(entries, catalog, &mut hard);

        let by_slot: OrderedGroups<SlotKey<'_>, &TimetableEntry> = entries
            .iter()
            .flat_map(|e| durations.span(e).map(move |slot| ((&e.day, slot), e)))
            .collect();

        let mut soft = Vec::new();
        for (&(day, slot), exams) in by_slot.iter() {
            check_department_semester(day, slot, exams, &mut hard);
            check_department_overlap(day, slot, exams, &mut soft);
        }

        debug!(
            event = "validate",
            entries = entries.len(),
            hard = hard.len(),
            soft = soft.len(),
        );

        ValidationOutcome { hard, soft }
    }
}

fn codes_of(exams: &[&TimetableEntry]) -> Vec<String> {
    exams.iter().map(|e| e.module_code.clone()).collect()
}

fn check_module_once(
    entries: &[TimetableEntry],
    catalog: &Catalog,
    hard: &mut Vec<ConstraintViolation>,
) {
    let known: HashSet<&str> = catalog.modules().iter().map(|m| m.code()).collect();
    let counts: OrderedGroups<&str, ()> = entries
        .iter()
        .map(|e| (e.module_code.as_str(), ()))
        .collect();

    for (&code, occurrences) in counts.iter() {
        let count = occurrences.len();
        if !known.contains(code) {
            hard.push(ConstraintViolation::new(
                ViolationKind::ModuleDuplicate,
                format!("Module {code} is not in the catalog (scheduled {count} times)"),
                vec![code.to_string()],
            ));
        } else if count != 1 {
            hard.push(ConstraintViolation::new(
                ViolationKind::ModuleDuplicate,
                format!("Module {code} scheduled {count} times (should be 1)"),
                vec![code.to_string()],
            ));
        }
    }

    let scheduled: HashSet<&str> = entries.iter().map(|e| e.module_code.as_str()).collect();
    for module in catalog.modules() {
        if !scheduled.contains(module.code()) {
            hard.push(ConstraintViolation::new(
                ViolationKind::ModuleDuplicate,
                format!("Module {} scheduled 0 times (should be 1)", module.code()),
                vec![module.code().to_string()],
            ));
        }
    }
}

// Distinct hall names of one entry, in label order.
fn hall_names(entry: &TimetableEntry) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::with_capacity(entry.halls.len());
    for label in &entry.halls {
        let name = extract_hall_name(label);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn check_hall_exclusivity(
    entries: &[TimetableEntry],
    catalog: &Catalog,
    durations: &Durations<'_>,
    hard: &mut Vec<ConstraintViolation>,
) {
    let mut by_hall: OrderedGroups<(&str, &Day, Slot), &str> = OrderedGroups::new();
    let mut unknown = Vec::new();

    for entry in entries {
        for name in hall_names(entry) {
            for slot in durations.span(entry) {
                by_hall.push((name, &entry.day, slot), entry.module_code.as_str());
            }
            if catalog.hall(name).is_none() {
                unknown.push((name, entry.module_code.as_str()));
            }
        }
    }

    for (&(hall, day, slot), codes) in by_hall.iter() {
        if codes.len() > 1 {
            hard.push(ConstraintViolation::new(
                ViolationKind::HallConflict,
                format!(
                    "Hall {hall} on {day} slot {slot} has multiple exams: [{}]",
                    codes.join(", ")
                ),
                codes.iter().map(|c| c.to_string()).collect(),
            ));
        }
    }

    for (hall, code) in unknown {
        hard.push(ConstraintViolation::new(
            ViolationKind::HallConflict,
            format!("Hall {hall} used by {code} is not in the catalog"),
            vec![code.to_string()],
        ));
    }
}

fn check_hall_capacity(
    entries: &[TimetableEntry],
    catalog: &Catalog,
    hard: &mut Vec<ConstraintViolation>,
) {
    for entry in entries {
        let halls: Option<Vec<_>> = hall_names(entry)
            .into_iter()
            .map(|name| catalog.hall(name))
            .collect();
        // Unknown halls are already reported and have no capacity to compare.
        let Some(halls) = halls else {
            continue;
        };
        let seats: u64 = halls.iter().map(|h| u64::from(h.capacity())).sum();
        if u64::from(entry.students) > seats {
            hard.push(ConstraintViolation::new(
                ViolationKind::HallCapacity,
                format!(
                    "Module {} seats {} students in halls holding {}",
                    entry.module_code, entry.students, seats
                ),
                vec![entry.module_code.clone()],
            ));
        }
    }
}

fn check_department_semester(
    day: &Day,
    slot: Slot,
    exams: &[&TimetableEntry],
    hard: &mut Vec<ConstraintViolation>,
) {
    let mut departments: OrderedGroups<(&str, u32), &TimetableEntry> = OrderedGroups::new();
    let mut common: OrderedGroups<u32, &TimetableEntry> = OrderedGroups::new();

    for &entry in exams {
        if entry.department.is_empty() {
            continue;
        }
        if entry.iscommon {
            common.push(entry.semester, entry);
        } else {
            departments.push((entry.department.as_str(), entry.semester), entry);
        }
    }

    for (&(dept, semester), group) in departments.iter() {
        if group.len() > 1 {
            let codes = codes_of(group);
            hard.push(ConstraintViolation::new(
                ViolationKind::DeptSemesterConflict,
                format!(
                    "{dept} semester {semester} on {day} slot {slot}: [{}]",
                    codes.join(", ")
                ),
                codes,
            ));
        }
    }

    for (&semester, common_group) in common.iter() {
        for (&(dept, _), dept_group) in departments.iter().filter(|((_, s), _)| *s == semester) {
            let common_codes = codes_of(common_group);
            let dept_codes = codes_of(dept_group);
            let detail = format!(
                "Common [{}] with {dept} semester {semester} [{}] on {day} slot {slot}",
                common_codes.join(", "),
                dept_codes.join(", ")
            );
            let mut modules = common_codes;
            modules.extend(dept_codes);
            hard.push(ConstraintViolation::new(
                ViolationKind::CommonModuleConflict,
                detail,
                modules,
            ));
        }
    }
}

fn check_department_overlap(
    day: &Day,
    slot: Slot,
    exams: &[&TimetableEntry],
    soft: &mut Vec<ConstraintViolation>,
) {
    let by_department: OrderedGroups<&str, &TimetableEntry> = exams
        .iter()
        .filter(|e| !e.department.is_empty())
        .map(|&e| (e.department.as_str(), e))
        .collect();

    for (&dept, group) in by_department.iter() {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if a.semester != b.semester {
                    soft.push(ConstraintViolation::new(
                        ViolationKind::SoftDeptOverlap,
                        format!(
                            "{dept} has {} (sem {}) and {} (sem {}) on {day} slot {slot}",
                            a.module_code, a.semester, b.module_code, b.semester
                        ),
                        vec![a.module_code.clone(), b.module_code.clone()],
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
