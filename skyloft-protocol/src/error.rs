//! Error types for skyloft-protocol

use thiserror::Error;

/// Error type for skyloft-protocol
#[derive(Debug, Error)]
pub enum Error {
    /// Wire-format error from the support layer
    #[error("Wire error: {0}")]
    Wire(#[from] skyloft_support::Error),

    /// A packet that does not follow the protocol
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    /// A value that cannot be put on the wire
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type for skyloft-protocol
pub type Result<T> = std::result::Result<T, Error>;
