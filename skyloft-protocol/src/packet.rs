//! Packet header codec
//!
//! Every packet begins with the same fixed header: a u16 little-endian
//! sequence field whose two high bits are the `reliable` and `message`
//! control flags (leaving a 14-bit sequence number), the packet type byte,
//! a per-type version byte, and the 16-byte big-endian sender UUID — zero
//! until the domain assigns a session.

use uuid::Uuid;

use skyloft_support::int128;
use skyloft_support::reader::PacketDataReader;

use crate::error::{Error, Result};
use crate::packet_type::PacketType;

/// Serialized size of the fixed header.
pub const PACKET_HEADER_SIZE: usize = 20;

/// Sequence numbers are 14 bits wide.
pub const SEQUENCE_MODULUS: u16 = 1 << 14;

const RELIABLE_BIT: u16 = 1 << 15;
const MESSAGE_BIT: u16 = 1 << 14;

/// The fixed header at the front of every packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    /// 14-bit sequence number.
    pub sequence: u16,
    /// Whether the packet expects retransmission handling.
    pub reliable: bool,
    /// Whether the packet is part of a multipart message.
    pub message: bool,
    /// Packet type.
    pub packet_type: PacketType,
    /// Version of the packet type's body layout.
    pub version: u8,
    /// Session UUID of the sender, or zero before authentication.
    pub sender_id: Uuid,
}

impl PacketHeader {
    /// A plain unreliable header for one packet type, at its current version.
    pub fn new(packet_type: PacketType, sequence: u16, sender_id: Uuid) -> Self {
        Self {
            sequence: sequence % SEQUENCE_MODULUS,
            reliable: false,
            message: false,
            packet_type,
            version: packet_type.version(),
            sender_id,
        }
    }

    /// Append the header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let mut sequence_field = self.sequence % SEQUENCE_MODULUS;
        if self.reliable {
            sequence_field |= RELIABLE_BIT;
        }
        if self.message {
            sequence_field |= MESSAGE_BIT;
        }
        out.extend_from_slice(&sequence_field.to_le_bytes());
        out.push(self.packet_type.as_u8());
        out.push(self.version);
        out.extend_from_slice(&int128::write_u128_be(self.sender_id.as_u128()));
    }

    /// Read a header from the front of a packet.
    pub fn read_from(reader: &mut PacketDataReader) -> Result<Self> {
        let sequence_field = reader.read_u16_le()?;
        let packet_type = PacketType::from_u8(reader.read_u8()?);
        let version = reader.read_u8()?;
        let sender_id = reader.read_uuid_be()?;
        Ok(Self {
            sequence: sequence_field & (SEQUENCE_MODULUS - 1),
            reliable: sequence_field & RELIABLE_BIT != 0,
            message: sequence_field & MESSAGE_BIT != 0,
            packet_type,
            version,
            sender_id,
        })
    }

    /// Verification stub pending the account service: until packets carry a
    /// real HMAC this accepts everything, keeping the call sites in place.
    pub fn verify(&self, _packet: &[u8]) -> bool {
        true
    }

    /// Signing stub pending the account service; writes nothing.
    pub fn sign(&self, _packet: &mut Vec<u8>) {}
}

/// Build a complete packet: header followed by a body.
pub fn build_packet(header: &PacketHeader, body: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(PACKET_HEADER_SIZE + body.len());
    header.write_to(&mut packet);
    packet.extend_from_slice(body);
    packet
}

/// A wrapping 14-bit sequence counter, one per outgoing packet type.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceNumber(u16);

impl SequenceNumber {
    /// The next sequence value, advancing the counter.
    pub fn next(&mut self) -> u16 {
        let value = self.0;
        self.0 = (self.0 + 1) % SEQUENCE_MODULUS;
        value
    }
}

/// Split a received packet into its header and body.
pub fn parse_packet(bytes: &[u8]) -> Result<(PacketHeader, &[u8])> {
    if bytes.len() < PACKET_HEADER_SIZE {
        return Err(Error::MalformedPacket(format!("{} bytes is shorter than a header", bytes.len())));
    }
    let mut reader = PacketDataReader::new(bytes);
    let header = PacketHeader::read_from(&mut reader)?;
    Ok((header, &bytes[PACKET_HEADER_SIZE..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let sender = Uuid::parse_str("a82f40b6-ee89-46cc-b504-02b88d72a546").unwrap();
        let mut header = PacketHeader::new(PacketType::DomainList, 1234, sender);
        header.reliable = true;
        header.message = true;

        let mut out = Vec::new();
        header.write_to(&mut out);
        assert_eq!(out.len(), PACKET_HEADER_SIZE);

        let mut reader = PacketDataReader::new(&out);
        let parsed = PacketHeader::read_from(&mut reader).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn control_bits_live_in_the_sequence_high_bits() {
        let mut header = PacketHeader::new(PacketType::Ping, 1, Uuid::nil());
        header.reliable = true;
        let mut out = Vec::new();
        header.write_to(&mut out);
        // Little-endian: the control bits are the top of the second byte.
        assert_eq!(out[0], 0x01);
        assert_eq!(out[1], 0x80);
    }

    #[test]
    fn sender_uuid_is_big_endian() {
        let sender = Uuid::parse_str("b71d5380-2fcc-4833-93a7-9a4967017587").unwrap();
        let header = PacketHeader::new(PacketType::Ping, 0, sender);
        let mut out = Vec::new();
        header.write_to(&mut out);
        assert_eq!(hex::encode(&out[4..]), "b71d53802fcc483393a79a4967017587");
    }

    #[test]
    fn sequence_numbers_wrap_at_fourteen_bits() {
        let mut sequence = SequenceNumber::default();
        for expected in 0..SEQUENCE_MODULUS {
            assert_eq!(sequence.next(), expected);
        }
        assert_eq!(sequence.next(), 0);
    }

    #[test]
    fn short_packets_are_malformed() {
        assert!(parse_packet(&[0u8; 10]).is_err());
    }
}
