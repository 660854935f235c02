//! Skyloft Client SDK
//!
//! The public surface of the Skyloft client core: `DomainServer` joins a
//! domain and keeps the connection alive; the mixer interfaces report each
//! assignment client's availability; `EntityServer` adds entity property
//! edits and decoded entity data. Each `DomainServer` owns one context —
//! an independent node roster and socket — and the other interfaces attach
//! to it by context ID.

pub mod context;
pub mod domain_handler;
pub mod domain_server;
pub mod entity_server;
pub mod error;
pub mod mixers;
pub mod node;
pub mod node_list;

pub use context::ContextId;
pub use domain_handler::DomainState;
pub use domain_server::DomainServer;
pub use entity_server::EntityServer;
pub use error::{Error, Result};
pub use mixers::{AssignmentClientState, AudioMixer, AvatarMixer, MessagesMixer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
