//! Control packet bodies
//!
//! Readers and writers for the domain protocol packets. Scalars are
//! little-endian, UUIDs big-endian, socket addresses per `sockaddr`.

pub mod domain_connect_request;
pub mod domain_connection_denied;
pub mod domain_disconnect_request;
pub mod domain_list;
pub mod domain_list_request;
pub mod domain_server_added_node;
pub mod domain_server_removed_node;
pub mod ping;
pub mod ping_reply;

pub use domain_connect_request::DomainConnectRequest;
pub use domain_connection_denied::{DeniedReason, DomainConnectionDenied};
pub use domain_disconnect_request::DomainDisconnectRequest;
pub use domain_list::{DomainList, NodeRecord};
pub use domain_list_request::DomainListRequest;
pub use domain_server_added_node::DomainServerAddedNode;
pub use domain_server_removed_node::DomainServerRemovedNode;
pub use ping::{Ping, PingKind};
pub use ping_reply::PingReply;
