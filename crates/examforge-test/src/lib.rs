//! Shared test fixtures for ExamForge crates.
//!
//! This crate provides catalog and timetable builders plus solver engine
//! doubles. It does NOT depend on `examforge-scoring` to avoid circular
//! dependencies.
//!
//! - [`fixtures`] - module, hall, day, catalog and timetable builders
//! - [`engines`] - engines that fail, panic, stall or record their calls
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! examforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use examforge_test::{catalog, days, hall, module};
//!
//! let catalog = catalog(vec![module("CE1101", "CE", 1, 50)], vec![hall("LR1", 100)], days(3), 2);
//! assert_eq!(catalog.slot_capacity(), 6);
//! ```

pub mod engines;
pub mod fixtures;

pub use engines::{FailingEngine, PanickingEngine, RecordedCall, RecordingEngine, SlowEngine};
pub use fixtures::{
    catalog, common_module, days, entry, hall, module, placed, timetable,
};
