//! DomainServerRemovedNode body

use uuid::Uuid;

use skyloft_support::int128;
use skyloft_support::reader::PacketDataReader;

use crate::error::Result;

/// Notification that a node has left the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainServerRemovedNode {
    pub node_id: Uuid,
}

impl DomainServerRemovedNode {
    pub fn write_payload(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&int128::write_u128_be(self.node_id.as_u128()));
    }

    pub fn read_payload(reader: &mut PacketDataReader) -> Result<Self> {
        Ok(Self { node_id: reader.read_uuid_be()? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let removed = DomainServerRemovedNode { node_id: Uuid::from_u128(77) };
        let mut out = Vec::new();
        removed.write_payload(&mut out);
        assert_eq!(out.len(), 16);

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(DomainServerRemovedNode::read_payload(&mut reader).unwrap(), removed);
    }
}
