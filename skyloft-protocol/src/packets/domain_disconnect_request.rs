//! DomainDisconnectRequest body

use skyloft_support::reader::PacketDataReader;

use crate::error::Result;

/// Best-effort goodbye sent when the client leaves a domain. Empty body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainDisconnectRequest;

impl DomainDisconnectRequest {
    pub fn write_payload(&self, _out: &mut Vec<u8>) {}

    pub fn read_payload(_reader: &mut PacketDataReader) -> Result<Self> {
        Ok(Self)
    }
}
