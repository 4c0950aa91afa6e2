//! ExamForge Core - Catalog and timetable types for exam timetabling
//!
//! This crate provides the fundamental data model shared by every other
//! ExamForge crate:
//! - Catalog value objects (`Module`, `Hall`, `Day`) validated at construction
//! - The `Catalog` aggregate with its configuration checks
//! - `Timetable` and `TimetableEntry` as produced by a solver
//! - Constraint violation types reported by the validator

pub mod constraint;
pub mod domain;
pub mod error;
pub mod timetable;

pub use constraint::{ConstraintLevel, ConstraintViolation, ViolationKind};
pub use domain::{Catalog, CatalogRecord, Day, Hall, HallRecord, Module, ModuleRecord, Slot};
pub use error::CatalogError;
pub use timetable::{SolveStatus, Timetable, TimetableEntry};
