//! DomainServerAddedNode body

use skyloft_support::reader::PacketDataReader;

use crate::error::Result;
use crate::packets::domain_list::NodeRecord;

/// Out-of-cycle notification that a node joined the domain; carries the
/// same record shape a DomainList entry does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainServerAddedNode {
    pub node: NodeRecord,
}

impl DomainServerAddedNode {
    pub fn write_payload(&self, out: &mut Vec<u8>) -> Result<()> {
        self.node.write_payload(out)
    }

    pub fn read_payload(reader: &mut PacketDataReader) -> Result<Self> {
        Ok(Self { node: NodeRecord::read_payload(reader)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_type::NodeType;
    use uuid::Uuid;

    #[test]
    fn round_trips() {
        let added = DomainServerAddedNode {
            node: NodeRecord {
                node_type: NodeType::MessagesMixer,
                uuid: Uuid::from_u128(123),
                public_addr: "198.51.100.20:40102".parse().unwrap(),
                local_addr: "10.0.0.20:40102".parse().unwrap(),
                local_id: 6,
            },
        };
        let mut out = Vec::new();
        added.write_payload(&mut out).unwrap();

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(DomainServerAddedNode::read_payload(&mut reader).unwrap(), added);
    }
}
