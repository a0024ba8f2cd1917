//! Error types for the grid index.

use thiserror::Error;

/// Grid index errors.
///
/// Inserts and queries never fail; only construction and text ingestion
/// can produce an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Lattice parameters that would produce non-finite or zero cell sizes.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// WKT parsing error.
    #[error("WKT parse error: {0}")]
    WktParse(String),
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
