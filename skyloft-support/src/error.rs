//! Error types for skyloft-support

use thiserror::Error;

/// Error type for skyloft-support
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed wire data
    #[error("Invalid wire data: {0}")]
    InvalidData(String),

    /// Ran off the end of a buffer while reading
    #[error("Unexpected end of buffer")]
    Eof,
}

/// Result type for skyloft-support
pub type Result<T> = std::result::Result<T, Error>;
