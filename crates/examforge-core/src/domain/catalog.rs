//! The catalog aggregate: modules, halls and the day/slot grid.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Day, Hall, Module};
use crate::error::{CatalogError, Result};

/// Unvalidated catalog, as read from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub modules: Vec<Module>,
    pub halls: Vec<Hall>,
    pub days: Vec<Day>,
    pub slots_per_day: u32,
}

/// A validated scheduling problem.
///
/// Construction rejects configurations that can never be scheduled (no halls,
/// no days, zero slots per day) as well as duplicate module codes and day
/// labels, so every component receiving a `Catalog` can rely on a non-empty
/// grid.
///
/// # Example
///
/// ```
/// use examforge_core::{Catalog, Day, Hall, ModuleRecord};
///
/// let catalog = Catalog::new(
///     vec![ModuleRecord::new("CE1101", "CE", 1, 120).build().unwrap()],
///     vec![Hall::new("LR1", 550).unwrap()],
///     Day::sequence(5),
///     2,
/// )
/// .unwrap();
///
/// assert_eq!(catalog.slot_capacity(), 10);
/// assert!(catalog.module("CE1101").is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CatalogRecord", into = "CatalogRecord")]
pub struct Catalog {
    modules: Vec<Module>,
    halls: Vec<Hall>,
    days: Vec<Day>,
    slots_per_day: u32,
}

impl Catalog {
    /// Creates and validates a catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NoHalls`], [`CatalogError::NoDays`], [`CatalogError::NoSlots`]
    ///   for an empty grid
    /// - [`CatalogError::DuplicateModule`] / [`CatalogError::DuplicateDay`] for
    ///   repeated identifiers
    pub fn new(
        modules: Vec<Module>,
        halls: Vec<Hall>,
        days: Vec<Day>,
        slots_per_day: u32,
    ) -> Result<Self> {
        if halls.is_empty() {
            return Err(CatalogError::NoHalls);
        }
        if days.is_empty() {
            return Err(CatalogError::NoDays);
        }
        if slots_per_day == 0 {
            return Err(CatalogError::NoSlots);
        }

        let mut codes = HashSet::new();
        for module in &modules {
            if !codes.insert(module.code()) {
                return Err(CatalogError::DuplicateModule(module.code().to_string()));
            }
        }
        let mut labels = HashSet::new();
        for day in &days {
            if !labels.insert(day.as_str()) {
                return Err(CatalogError::DuplicateDay(day.to_string()));
            }
        }

        Ok(Self {
            modules,
            halls,
            days,
            slots_per_day,
        })
    }

    /// Parses and validates a catalog from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn halls(&self) -> &[Hall] {
        &self.halls
    }

    /// Days in scheduling order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn slots_per_day(&self) -> u32 {
        self.slots_per_day
    }

    /// Looks up a module by code.
    pub fn module(&self, code: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.code() == code)
    }

    /// Looks up a hall by its bare name.
    pub fn hall(&self, name: &str) -> Option<&Hall> {
        self.halls.iter().find(|h| h.name() == name)
    }

    /// Capacity of the largest hall.
    pub fn max_hall_capacity(&self) -> u32 {
        self.halls.iter().map(Hall::capacity).max().unwrap_or(0)
    }

    /// Number of distinct (day, slot) pairs.
    pub fn slot_capacity(&self) -> usize {
        self.days.len() * self.slots_per_day as usize
    }

    /// Returns a catalog with the same grid and the first `size` modules.
    ///
    /// A `size` beyond the module count keeps every module.
    pub fn prefix(&self, size: usize) -> Catalog {
        let size = size.min(self.modules.len());
        Catalog {
            modules: self.modules[..size].to_vec(),
            halls: self.halls.clone(),
            days: self.days.clone(),
            slots_per_day: self.slots_per_day,
        }
    }

    /// Returns a catalog with the same grid and the given modules.
    pub fn with_modules(&self, modules: Vec<Module>) -> Result<Catalog> {
        Catalog::new(
            modules,
            self.halls.clone(),
            self.days.clone(),
            self.slots_per_day,
        )
    }
}

impl TryFrom<CatalogRecord> for Catalog {
    type Error = CatalogError;

    fn try_from(record: CatalogRecord) -> Result<Self> {
        Catalog::new(
            record.modules,
            record.halls,
            record.days,
            record.slots_per_day,
        )
    }
}

impl From<Catalog> for CatalogRecord {
    fn from(catalog: Catalog) -> Self {
        Self {
            modules: catalog.modules,
            halls: catalog.halls,
            days: catalog.days,
            slots_per_day: catalog.slots_per_day,
        }
    }
}
