//! DomainListRequest body

use uuid::Uuid;

use skyloft_support::int128;
use skyloft_support::reader::PacketDataReader;

use crate::error::Result;
use crate::node_type::NodeType;

/// Check-in request sent once joined, keeping the roster fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainListRequest {
    /// The session UUID the domain assigned.
    pub session_id: Uuid,
    /// Assignment-client types this client wants to hear about.
    pub interest: Vec<NodeType>,
}

impl DomainListRequest {
    pub fn write_payload(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&int128::write_u128_be(self.session_id.as_u128()));
        out.push(self.interest.len() as u8);
        for node_type in &self.interest {
            out.push(node_type.as_u8());
        }
    }

    pub fn read_payload(reader: &mut PacketDataReader) -> Result<Self> {
        let session_id = reader.read_uuid_be()?;
        let count = reader.read_u8()? as usize;
        let mut interest = Vec::with_capacity(count);
        for _ in 0..count {
            interest.push(NodeType::from_u8(reader.read_u8()?));
        }
        Ok(Self { session_id, interest })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let request = DomainListRequest {
            session_id: Uuid::from_u128(42),
            interest: vec![NodeType::EntityServer],
        };
        let mut out = Vec::new();
        request.write_payload(&mut out);

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(DomainListRequest::read_payload(&mut reader).unwrap(), request);
    }
}
