//! Packet types and versions

/// The type byte of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    Unknown = 0,
    Ping = 1,
    PingReply = 2,
    DomainList = 3,
    DomainListRequest = 4,
    DomainConnectRequest = 5,
    DomainConnectionDenied = 6,
    DomainServerAddedNode = 7,
    DomainServerRemovedNode = 8,
    DomainDisconnectRequest = 9,
    EntityEdit = 10,
    EntityData = 11,
    EntityErase = 12,
    MessagesData = 13,
    MessagesSubscribe = 14,
    MessagesUnsubscribe = 15,
}

impl PacketType {
    /// The wire byte for this packet type.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire byte.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => PacketType::Ping,
            2 => PacketType::PingReply,
            3 => PacketType::DomainList,
            4 => PacketType::DomainListRequest,
            5 => PacketType::DomainConnectRequest,
            6 => PacketType::DomainConnectionDenied,
            7 => PacketType::DomainServerAddedNode,
            8 => PacketType::DomainServerRemovedNode,
            9 => PacketType::DomainDisconnectRequest,
            10 => PacketType::EntityEdit,
            11 => PacketType::EntityData,
            12 => PacketType::EntityErase,
            13 => PacketType::MessagesData,
            14 => PacketType::MessagesSubscribe,
            15 => PacketType::MessagesUnsubscribe,
            _ => PacketType::Unknown,
        }
    }

    /// The current version byte for this packet type.
    ///
    /// Versions advance independently per type; a node that receives a
    /// version it does not speak drops the packet.
    pub fn version(self) -> u8 {
        match self {
            PacketType::DomainList => 2,
            PacketType::DomainConnectRequest => 2,
            PacketType::EntityEdit | PacketType::EntityData => 3,
            _ => 1,
        }
    }

    /// Types sent before the domain has assigned a session, so their
    /// headers carry a zero sender UUID.
    pub fn is_sourceless(self) -> bool {
        matches!(
            self,
            PacketType::DomainConnectRequest | PacketType::DomainListRequest | PacketType::Ping
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes_round_trip() {
        for value in 0u8..=15 {
            let packet_type = PacketType::from_u8(value);
            if packet_type != PacketType::Unknown {
                assert_eq!(packet_type.as_u8(), value);
            }
        }
    }

    #[test]
    fn unknown_bytes_map_to_unknown() {
        assert_eq!(PacketType::from_u8(200), PacketType::Unknown);
    }
}
