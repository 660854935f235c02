//! Packet receiver
//!
//! Maps packet-type bytes to handler callbacks. Handlers run on the
//! socket's delivery task, so they must hand real work off to the owning
//! component instead of blocking on network I/O. Unknown packet types are
//! warned about once and then dropped silently.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;

use log::warn;

use crate::packet::{self, PacketHeader};
use crate::packet_type::PacketType;

/// A packet as delivered to a handler.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Parsed packet header.
    pub header: PacketHeader,
    /// The body after the header.
    pub payload: Vec<u8>,
    /// The remote address the datagram arrived from, when known.
    pub sender_addr: Option<SocketAddr>,
}

/// Handler callback for one packet type.
pub type PacketHandler = Box<dyn Fn(&ReceivedMessage) + Send + Sync>;

/// Dispatches received packets to handlers registered by type.
#[derive(Default)]
pub struct PacketReceiver {
    handlers: HashMap<PacketType, PacketHandler>,
    unknown_warned: HashSet<u8>,
}

impl PacketReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for a packet type, replacing any existing one.
    pub fn register(&mut self, packet_type: PacketType, handler: PacketHandler) {
        self.handlers.insert(packet_type, handler);
    }

    /// Parse a raw datagram and dispatch it. Returns whether a handler ran.
    pub fn handle(&mut self, bytes: &[u8], sender_addr: Option<SocketAddr>) -> bool {
        let (header, body) = match packet::parse_packet(bytes) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!("Dropping undecodable packet: {error}");
                return false;
            }
        };

        if !header.verify(bytes) {
            warn!("Dropping packet that failed verification");
            return false;
        }

        if header.packet_type == PacketType::Unknown {
            // bytes[2] is the raw type byte of the fixed header.
            let raw_type = bytes[2];
            if self.unknown_warned.insert(raw_type) {
                warn!("Dropping packets of unknown type {raw_type}");
            }
            return false;
        }

        if header.version != header.packet_type.version() {
            warn!(
                "Dropping {:?} packet of version {} (speaking {})",
                header.packet_type,
                header.version,
                header.packet_type.version()
            );
            return false;
        }

        match self.handlers.get(&header.packet_type) {
            Some(handler) => {
                let message = ReceivedMessage {
                    header,
                    payload: body.to_vec(),
                    sender_addr,
                };
                handler(&message);
                true
            }
            None => {
                let raw_type = header.packet_type.as_u8();
                if self.unknown_warned.insert(raw_type) {
                    warn!("No handler registered for packet type {:?}", header.packet_type);
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PacketHeader;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    fn packet_of(packet_type: PacketType, body: &[u8]) -> Vec<u8> {
        let header = PacketHeader::new(packet_type, 7, Uuid::nil());
        packet::build_packet(&header, body)
    }

    #[test]
    fn dispatches_by_type() {
        let mut receiver = PacketReceiver::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        receiver.register(
            PacketType::Ping,
            Box::new(move |message| {
                assert_eq!(message.payload, vec![1, 2, 3]);
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(receiver.handle(&packet_of(PacketType::Ping, &[1, 2, 3]), None));
        assert!(!receiver.handle(&packet_of(PacketType::PingReply, &[]), None));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_types_are_dropped() {
        let mut receiver = PacketReceiver::new();
        let mut bytes = packet_of(PacketType::Ping, &[]);
        bytes[2] = 250; // not a known type byte
        assert!(!receiver.handle(&bytes, None));
        // Second delivery is silently dropped; the warn set already has it.
        assert!(!receiver.handle(&bytes, None));
    }

    #[test]
    fn garbage_is_dropped() {
        let mut receiver = PacketReceiver::new();
        assert!(!receiver.handle(&[1, 2, 3], None));
    }

    #[test]
    fn version_mismatches_are_dropped() {
        let mut receiver = PacketReceiver::new();
        receiver.register(PacketType::Ping, Box::new(|_| panic!("must not dispatch")));
        let mut bytes = packet_of(PacketType::Ping, &[]);
        bytes[3] = PacketType::Ping.version() + 1;
        assert!(!receiver.handle(&bytes, None));
    }
}
