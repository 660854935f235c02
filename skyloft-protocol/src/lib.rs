//! Skyloft Wire Protocol
//!
//! This library provides the packet-level protocol of the Skyloft client
//! core: packet types and header codec, the handler-dispatch packet
//! receiver, readers/writers for the domain control packets, and the entity
//! property model with its flag-driven edit encoder and decoder.

pub mod entity;
pub mod error;
pub mod node_type;
pub mod packet;
pub mod packet_receiver;
pub mod packet_type;
pub mod packets;
pub mod sockaddr;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
