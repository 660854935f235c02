//! Error types for skyloft-sdk

use thiserror::Error;

/// Error type for skyloft-sdk
#[derive(Debug, Error)]
pub enum Error {
    /// Transport error
    #[error("Transport error: {0}")]
    Transport(#[from] skyloft_p2p::Error),

    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] skyloft_protocol::Error),

    /// No context registered under the given ID
    #[error("Unknown context {0}")]
    UnknownContext(usize),

    /// The context's driver task is gone
    #[error("Context is shut down")]
    ContextShutDown,

    /// An edit that cannot be sent
    #[error("Cannot send edit: {0}")]
    CannotSendEdit(String),
}

/// Result type for skyloft-sdk
pub type Result<T> = std::result::Result<T, Error>;
