//! Error types for ExamForge catalogs

use thiserror::Error;

/// Errors raised while building or loading a catalog.
///
/// The first three variants are configuration errors: a catalog without
/// halls, days or slots can never be scheduled and is rejected before any
/// solving or validation starts.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog defines no halls.
    #[error("Configuration error: catalog has no halls")]
    NoHalls,

    /// The catalog defines no scheduling days.
    #[error("Configuration error: catalog has no days")]
    NoDays,

    /// `slots_per_day` is zero.
    #[error("Configuration error: slots_per_day must be at least 1")]
    NoSlots,

    /// A module record failed validation.
    #[error("Invalid module '{code}': {reason}")]
    InvalidModule { code: String, reason: String },

    /// A hall record failed validation.
    #[error("Invalid hall '{name}': {reason}")]
    InvalidHall { name: String, reason: String },

    /// Two modules share the same code.
    #[error("Duplicate module code: {0}")]
    DuplicateModule(String),

    /// Two days share the same label.
    #[error("Duplicate day label: {0}")]
    DuplicateDay(String),

    /// The catalog JSON could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
