//! DomainConnectRequest body

use uuid::Uuid;

use skyloft_support::int128;
use skyloft_support::reader::PacketDataReader;

use crate::error::Result;
use crate::node_type::NodeType;

/// Check-in request sent while not yet joined to the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConnectRequest {
    /// Session UUID from a previous DomainList, or zero on first contact.
    pub session_id: Uuid,
    /// Assignment-client types this client wants to hear about.
    pub interest: Vec<NodeType>,
}

impl DomainConnectRequest {
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
        let request = DomainConnectRequest {
            session_id: Uuid::nil(),
            interest: vec![
                NodeType::AvatarMixer,
                NodeType::AudioMixer,
                NodeType::EntityServer,
                NodeType::MessagesMixer,
            ],
        };
        let mut out = Vec::new();
        request.write_payload(&mut out);
        assert_eq!(out.len(), 16 + 1 + 4);

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(DomainConnectRequest::read_payload(&mut reader).unwrap(), request);
    }
}
