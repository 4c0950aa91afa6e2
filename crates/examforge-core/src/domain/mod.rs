//! Catalog domain types
//!
//! Value objects are validated at construction, both when built in code and
//! when deserialized, so downstream components never see a zero semester,
//! a zero duration, or an empty scheduling grid.

mod catalog;
mod day;
mod hall;
mod module;

#[cfg(test)]
mod tests;

pub use catalog::{Catalog, CatalogRecord};
pub use day::{Day, Slot};
pub use hall::{Hall, HallRecord};
pub use module::{Module, ModuleRecord};
