//! Error types for skyloft-p2p

use thiserror::Error;

/// Error type for skyloft-p2p
#[derive(Debug, Error)]
pub enum Error {
    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// WebRTC error
    #[error("WebRTC error: {0}")]
    WebRtc(String),

    /// The signaling channel is not open
    #[error("Signaling channel is not open")]
    SignalingClosed,

    /// A URL that cannot name a signaling server
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<webrtc::Error> for Error {
    fn from(err: webrtc::Error) -> Self {
        Error::WebRtc(err.to_string())
    }
}

/// Result type for skyloft-p2p
pub type Result<T> = std::result::Result<T, Error>;
