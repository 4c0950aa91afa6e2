//! Error types for the planner facade.

use std::path::PathBuf;

use examforge_config::ConfigError;
use examforge_core::CatalogError;
use thiserror::Error;

/// Errors surfaced by [`Planner`](crate::Planner) entry points.
#[derive(Debug, Error)]
pub enum ExamForgeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, ExamForgeError>;
