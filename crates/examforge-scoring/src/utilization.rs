//! Hall utilization and per-day load.

use std::collections::HashSet;

use examforge_core::{Catalog, Day, Hall, Slot, Timetable};
use serde::{Deserialize, Serialize};

use crate::hall_name::extract_hall_name;
use crate::occupancy::Durations;

/// Number of entries scheduled on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLoad {
    pub day: Day,
    pub entries: usize,
}

/// Utilization metrics of one timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utilization {
    /// Occupied (hall, day, slot) triples as a percentage of all available ones.
    pub percent: f64,
    /// Distinct occupied (hall, day, slot) triples.
    pub used_slots: usize,
    /// `halls * days * slots_per_day`.
    pub total_slots: usize,
    /// Entries per day in catalog day order, zero-count days included.
    /// Days used by the timetable but missing from the catalog come last.
    pub day_load: Vec<DayLoad>,
}

impl Utilization {
    /// Entry count of `day`, zero when the day has no entries.
    pub fn load_of(&self, day: &str) -> usize {
        self.day_load
            .iter()
            .find(|d| d.day.as_str() == day)
            .map_or(0, |d| d.entries)
    }
}

/// Computes hall utilization and day load.
///
/// # Example
///
/// ```
/// use examforge_core::{Day, Hall, SolveStatus, Timetable, TimetableEntry};
/// use examforge_scoring::UtilizationAnalyzer;
///
/// let halls = vec![Hall::new("LR1", 550).unwrap(), Hall::new("AUD", 200).unwrap()];
/// let days = Day::sequence(2);
/// let entry = |code: &str, day: &str, slot, hall: &str| TimetableEntry {
///     module_code: code.into(),
///     name: String::new(),
///     day: Day::new(day),
///     slot,
///     halls: vec![hall.into()],
///     students: 10,
///     department: "CE".into(),
///     semester: 1,
///     iscommon: false,
/// };
/// let timetable = Timetable::new(
///     SolveStatus::Feasible,
///     vec![
///         entry("A", "day1", 0, "LR1-550"),
///         entry("B", "day1", 1, "AUD-200"),
///         entry("C", "day2", 0, "LR1-550"),
///     ],
/// );
///
/// let utilization = UtilizationAnalyzer::new().analyze(&timetable, &halls, &days, 2);
/// assert_eq!(utilization.percent, 37.5);
/// assert_eq!(utilization.load_of("day1"), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilizationAnalyzer;

impl UtilizationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes `timetable` over the `halls * days * slots_per_day` grid,
    /// counting each entry in its start slot only.
    ///
    /// The percentage is zero when the grid is empty.
    pub fn analyze(
        &self,
        timetable: &Timetable,
        halls: &[Hall],
        days: &[Day],
        slots_per_day: u32,
    ) -> Utilization {
        Self::measure(timetable, halls, days, slots_per_day, &Durations::default())
    }

    /// Analyzes `timetable` over the catalog's grid, counting a multi-slot
    /// exam in every slot it occupies.
    pub fn analyze_catalog(&self, timetable: &Timetable, catalog: &Catalog) -> Utilization {
        Self::measure(
            timetable,
            catalog.halls(),
            catalog.days(),
            catalog.slots_per_day(),
            &Durations::of(catalog),
        )
    }

    fn measure(
        timetable: &Timetable,
        halls: &[Hall],
        days: &[Day],
        slots_per_day: u32,
        durations: &Durations<'_>,
    ) -> Utilization {
        let total_slots = halls.len() * days.len() * slots_per_day as usize;

        let used: HashSet<(&str, &Day, Slot)> = timetable
            .entries
            .iter()
            .flat_map(|e| {
                let span = durations.span(e);
                e.halls.iter().flat_map(move |label| {
                    span.clone()
                        .map(move |slot| (extract_hall_name(label), &e.day, slot))
                })
            })
            .collect();
        let used_slots = used.len();

        let percent = if total_slots == 0 {
            0.0
        } else {
            100.0 * used_slots as f64 / total_slots as f64
        };

        let mut day_load: Vec<DayLoad> = days
            .iter()
            .map(|day| DayLoad {
                day: day.clone(),
                entries: 0,
            })
            .collect();
        for entry in &timetable.entries {
            match day_load.iter_mut().find(|d| d.day == entry.day) {
                Some(load) => load.entries += 1,
                None => day_load.push(DayLoad {
                    day: entry.day.clone(),
                    entries: 1,
                }),
            }
        }

        Utilization {
            percent,
            used_slots,
            total_slots,
            day_load,
        }
    }
}
