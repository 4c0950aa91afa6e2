//! Slots occupied by multi-slot exams.

use std::collections::HashMap;
use std::ops::Range;

use examforge_core::{Catalog, Slot, TimetableEntry};

/// Exam durations by module code.
///
/// Codes missing from the catalog last one slot.
#[derive(Debug, Default)]
pub(crate) struct Durations<'a> {
    by_code: HashMap<&'a str, u32>,
}

impl<'a> Durations<'a> {
    pub(crate) fn of(catalog: &'a Catalog) -> Self {
        Self {
            by_code: catalog
                .modules()
                .iter()
                .map(|m| (m.code(), m.duration()))
                .collect(),
        }
    }

    /// Slots `entry` occupies: `slot..slot + duration`.
    pub(crate) fn span(&self, entry: &TimetableEntry) -> Range<Slot> {
        let duration = self
            .by_code
            .get(entry.module_code.as_str())
            .copied()
            .unwrap_or(1)
            .max(1);
        entry.slot..entry.slot.saturating_add(duration)
    }
}
