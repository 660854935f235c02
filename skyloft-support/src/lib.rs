//! Skyloft Wire-Format Support
//!
//! This library provides the low-level wire primitives for the Skyloft
//! client core: byte-count-coded integers, property flag bit vectors,
//! packed quaternions, 128-bit integer I/O and the typed octree appender
//! with its partial-fit protocol.

pub mod byte_count_coded;
pub mod error;
pub mod int128;
pub mod math;
pub mod octree_packet_data;
pub mod packed_quat;
pub mod property_flags;
pub mod reader;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
