//! Ping body

use skyloft_support::reader::PacketDataReader;

use crate::error::{Error, Result};

/// Which of a node's two advertised addresses a ping is probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PingKind {
    Local = 1,
    Public = 2,
}

impl PingKind {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            1 => Ok(PingKind::Local),
            2 => Ok(PingKind::Public),
            other => Err(Error::MalformedPacket(format!("unknown ping kind {other}"))),
        }
    }
}

/// Address probe sent to newly added nodes until one address replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    pub kind: PingKind,
    /// Send time, microseconds since the epoch.
    pub timestamp: u64,
}

impl Ping {
    pub fn write_payload(&self, out: &mut Vec<u8>) {
        out.push(self.kind as u8);
        out.extend_from_slice(&self.timestamp.to_le_bytes());
    }

    pub fn read_payload(reader: &mut PacketDataReader) -> Result<Self> {
        Ok(Self {
            kind: PingKind::from_u8(reader.read_u8()?)?,
            timestamp: reader.read_u64_le()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let ping = Ping { kind: PingKind::Public, timestamp: 1688896885851574 };
        let mut out = Vec::new();
        ping.write_payload(&mut out);
        assert_eq!(out.len(), 9);

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(Ping::read_payload(&mut reader).unwrap(), ping);
    }

    #[test]
    fn unknown_kind_is_malformed() {
        let mut reader = PacketDataReader::new(&[9, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(Ping::read_payload(&mut reader).is_err());
    }
}
