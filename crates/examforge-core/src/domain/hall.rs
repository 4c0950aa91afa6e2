//! Examination hall value object.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Unvalidated hall record, as read from a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallRecord {
    #[serde(alias = "hall")]
    pub name: String,
    pub capacity: u32,
}

/// A validated hall with a non-empty name.
///
/// # Example
///
/// ```
/// use examforge_core::Hall;
///
/// let hall = Hall::new("LR1", 550).unwrap();
/// assert_eq!(hall.label(), "LR1-550");
/// assert!(hall.fits(550));
/// assert!(!hall.fits(551));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "HallRecord", into = "HallRecord")]
pub struct Hall {
    name: String,
    capacity: u32,
}

impl Hall {
    /// Creates a hall.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidHall`] when the name is blank.
    pub fn new(name: impl Into<String>, capacity: u32) -> Result<Self> {
        Self::try_from(HallRecord {
            name: name.into(),
            capacity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns true if the hall seats `students`.
    pub fn fits(&self, students: u32) -> bool {
        self.capacity >= students
    }

    /// Timetable label in `Name-Capacity` form.
    pub fn label(&self) -> String {
        format!("{}-{}", self.name, self.capacity)
    }
}

impl TryFrom<HallRecord> for Hall {
    type Error = CatalogError;

    fn try_from(record: HallRecord) -> Result<Self> {
        if record.name.trim().is_empty() {
            return Err(CatalogError::InvalidHall {
                name: record.name,
                reason: "name must not be empty".to_string(),
            });
        }
        Ok(Self {
            name: record.name,
            capacity: record.capacity,
        })
    }
}

impl From<Hall> for HallRecord {
    fn from(hall: Hall) -> Self {
        Self {
            name: hall.name,
            capacity: hall.capacity,
        }
    }
}
