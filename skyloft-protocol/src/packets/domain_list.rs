//! DomainList body
//!
//! The domain server's check-in reply: the client's assigned identity plus
//! the full roster of assignment-client nodes.

use std::net::SocketAddr;

use uuid::Uuid;

use skyloft_support::int128;
use skyloft_support::reader::PacketDataReader;

use crate::error::Result;
use crate::node_type::NodeType;
use crate::sockaddr::{read_sockaddr, write_sockaddr};

/// One advertised assignment-client node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub node_type: NodeType,
    pub uuid: Uuid,
    pub public_addr: SocketAddr,
    pub local_addr: SocketAddr,
    pub local_id: u16,
}

impl NodeRecord {
    pub fn write_payload(&self, out: &mut Vec<u8>) -> Result<()> {
        out.push(self.node_type.as_u8());
        out.extend_from_slice(&int128::write_u128_be(self.uuid.as_u128()));
        write_sockaddr(&self.public_addr, out)?;
        write_sockaddr(&self.local_addr, out)?;
        out.extend_from_slice(&self.local_id.to_le_bytes());
        Ok(())
    }

    pub fn read_payload(reader: &mut PacketDataReader) -> Result<Self> {
        Ok(Self {
            node_type: NodeType::from_u8(reader.read_u8()?),
            uuid: reader.read_uuid_be()?,
            public_addr: read_sockaddr(reader)?,
            local_addr: read_sockaddr(reader)?,
            local_id: reader.read_u16_le()?,
        })
    }
}

/// The check-in reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainList {
    pub domain_id: Uuid,
    pub domain_local_id: u16,
    /// The session UUID assigned to this client.
    pub session_id: Uuid,
    /// The local ID assigned to this client.
    pub local_id: u16,
    pub nodes: Vec<NodeRecord>,
}

impl DomainList {
    pub fn write_payload(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&int128::write_u128_be(self.domain_id.as_u128()));
        out.extend_from_slice(&self.domain_local_id.to_le_bytes());
        out.extend_from_slice(&int128::write_u128_be(self.session_id.as_u128()));
        out.extend_from_slice(&self.local_id.to_le_bytes());
        for node in &self.nodes {
            node.write_payload(out)?;
        }
        Ok(())
    }

    pub fn read_payload(reader: &mut PacketDataReader) -> Result<Self> {
        let domain_id = reader.read_uuid_be()?;
        let domain_local_id = reader.read_u16_le()?;
        let session_id = reader.read_uuid_be()?;
        let local_id = reader.read_u16_le()?;
        let mut nodes = Vec::new();
        while !reader.remaining().is_empty() {
            nodes.push(NodeRecord::read_payload(reader)?);
        }
        Ok(Self { domain_id, domain_local_id, session_id, local_id, nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(node_type: NodeType, uuid: u128) -> NodeRecord {
        NodeRecord {
            node_type,
            uuid: Uuid::from_u128(uuid),
            public_addr: "203.0.113.5:40102".parse().unwrap(),
            local_addr: "192.168.0.5:40102".parse().unwrap(),
            local_id: 99,
        }
    }

    #[test]
    fn round_trips_with_nodes() {
        let list = DomainList {
            domain_id: Uuid::from_u128(1),
            domain_local_id: 10,
            session_id: Uuid::from_u128(2),
            local_id: 11,
            nodes: vec![node(NodeType::AvatarMixer, 3), node(NodeType::EntityServer, 4)],
        };
        let mut out = Vec::new();
        list.write_payload(&mut out).unwrap();

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(DomainList::read_payload(&mut reader).unwrap(), list);
    }

    #[test]
    fn round_trips_empty() {
        let list = DomainList {
            domain_id: Uuid::from_u128(1),
            domain_local_id: 0,
            session_id: Uuid::from_u128(2),
            local_id: 0,
            nodes: Vec::new(),
        };
        let mut out = Vec::new();
        list.write_payload(&mut out).unwrap();

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(DomainList::read_payload(&mut reader).unwrap(), list);
    }

    #[test]
    fn truncated_node_record_is_an_error() {
        let list = DomainList {
            domain_id: Uuid::from_u128(1),
            domain_local_id: 0,
            session_id: Uuid::from_u128(2),
            local_id: 0,
            nodes: vec![node(NodeType::AudioMixer, 5)],
        };
        let mut out = Vec::new();
        list.write_payload(&mut out).unwrap();
        out.truncate(out.len() - 3);

        let mut reader = PacketDataReader::new(&out);
        assert!(DomainList::read_payload(&mut reader).is_err());
    }
}
