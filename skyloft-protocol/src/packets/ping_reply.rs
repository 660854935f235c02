//! PingReply body

use skyloft_support::reader::PacketDataReader;

use crate::error::Result;
use crate::packets::ping::PingKind;

/// Echo of a ping, carrying both timestamps for latency measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingReply {
    pub kind: PingKind,
    /// The timestamp from the ping being answered.
    pub ping_timestamp: u64,
    /// Reply send time, microseconds since the epoch.
    pub reply_timestamp: u64,
}

impl PingReply {
    pub fn write_payload(&self, out: &mut Vec<u8>) {
        out.push(self.kind as u8);
        out.extend_from_slice(&self.ping_timestamp.to_le_bytes());
        out.extend_from_slice(&self.reply_timestamp.to_le_bytes());
    }

    pub fn read_payload(reader: &mut PacketDataReader) -> Result<Self> {
        Ok(Self {
            kind: PingKind::from_u8(reader.read_u8()?)?,
            ping_timestamp: reader.read_u64_le()?,
            reply_timestamp: reader.read_u64_le()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let reply = PingReply {
            kind: PingKind::Local,
            ping_timestamp: 1000,
            reply_timestamp: 2000,
        };
        let mut out = Vec::new();
        reply.write_payload(&mut out);
        assert_eq!(out.len(), 17);

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(PingReply::read_payload(&mut reader).unwrap(), reply);
    }
}
