//! Roster nodes

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use uuid::Uuid;

use skyloft_p2p::socket::ChannelId;
use skyloft_protocol::node_type::NodeType;
use skyloft_protocol::packets::NodeRecord;

/// Which of a node's two advertised addresses answered a ping first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSocket {
    None,
    Local,
    Public,
}

/// One remote assignment client in the roster.
#[derive(Debug, Clone)]
pub struct Node {
    uuid: Uuid,
    pub node_type: NodeType,
    pub public_addr: SocketAddr,
    pub local_addr: SocketAddr,
    pub local_id: u16,
    pub active_socket: ActiveSocket,
    pub last_heard: Instant,
    /// The data-channel slot serving this node, once one is open.
    pub channel_id: Option<ChannelId>,
}

impl Node {
    pub fn new(record: &NodeRecord) -> Self {
        Self {
            uuid: record.uuid,
            node_type: record.node_type,
            public_addr: record.public_addr,
            local_addr: record.local_addr,
            local_id: record.local_id,
            active_socket: ActiveSocket::None,
            last_heard: Instant::now(),
            channel_id: None,
        }
    }

    /// The node's UUID. Immutable after creation.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Refresh addresses and local ID from a newer roster record.
    pub fn update_from(&mut self, record: &NodeRecord) {
        self.public_addr = record.public_addr;
        self.local_addr = record.local_addr;
        self.local_id = record.local_id;
        self.heard_from();
    }

    /// Record traffic from this node.
    pub fn heard_from(&mut self) {
        self.last_heard = Instant::now();
    }

    /// Whether the node has been silent longer than `timeout`.
    pub fn is_silent(&self, timeout: Duration) -> bool {
        self.last_heard.elapsed() > timeout
    }

    /// The address to send to, once one has been activated.
    pub fn active_addr(&self) -> Option<SocketAddr> {
        match self.active_socket {
            ActiveSocket::None => None,
            ActiveSocket::Local => Some(self.local_addr),
            ActiveSocket::Public => Some(self.public_addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NodeRecord {
        NodeRecord {
            node_type: NodeType::AvatarMixer,
            uuid: Uuid::from_u128(5),
            public_addr: "203.0.113.2:40102".parse().unwrap(),
            local_addr: "192.168.0.2:40102".parse().unwrap(),
            local_id: 3,
        }
    }

    #[test]
    fn new_nodes_have_no_active_socket() {
        let node = Node::new(&record());
        assert_eq!(node.active_socket, ActiveSocket::None);
        assert_eq!(node.active_addr(), None);
        assert!(!node.is_silent(Duration::from_secs(2)));
    }

    #[test]
    fn activation_selects_the_address() {
        let mut node = Node::new(&record());
        node.active_socket = ActiveSocket::Public;
        assert_eq!(node.active_addr(), Some(node.public_addr));
        node.active_socket = ActiveSocket::Local;
        assert_eq!(node.active_addr(), Some(node.local_addr));
    }

    #[test]
    fn updates_keep_the_uuid() {
        let mut node = Node::new(&record());
        let mut newer = record();
        newer.public_addr = "203.0.113.9:40103".parse().unwrap();
        newer.local_id = 9;
        node.update_from(&newer);
        assert_eq!(node.uuid(), Uuid::from_u128(5));
        assert_eq!(node.public_addr, newer.public_addr);
        assert_eq!(node.local_id, 9);
    }
}
