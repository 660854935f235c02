//! Skyloft WebRTC Transport
//!
//! This library provides the transport layer of the Skyloft client core: a
//! WebSocket signaling channel carrying JSON SDP/ICE exchanges, per-node
//! WebRTC data channels, and the one-to-many socket that multiplexes one
//! signaling connection into independent datagram channels.

pub mod config;
pub mod data_channel;
pub mod error;
pub mod signaling_channel;
pub mod socket;

pub use config::Config;
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
