//! Scheduling day and slot grid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a slot within a day, in `[0, slots_per_day)`.
pub type Slot = u32;

/// A named scheduling day. Days are ordered by their position in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(String);

impl Day {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds `count` days labelled `day1`, `day2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use examforge_core::Day;
    ///
    /// let days = Day::sequence(3);
    /// assert_eq!(days[2].as_str(), "day3");
    /// ```
    pub fn sequence(count: usize) -> Vec<Day> {
        (1..=count).map(|i| Day(format!("day{i}"))).collect()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Day {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for Day {
    fn from(label: String) -> Self {
        Self(label)
    }
}
