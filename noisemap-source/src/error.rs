//! Error types for source level evaluation.

use thiserror::Error;

/// Source level errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Speed must be finite and strictly positive (it is used in a logarithm).
    #[error("Invalid speed: {0} km/h")]
    InvalidSpeed(f64),
}

/// Result type for source level operations.
pub type Result<T> = std::result::Result<T, SourceError>;
