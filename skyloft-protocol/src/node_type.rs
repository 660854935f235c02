//! Node types
//!
//! Every remote participant in a domain carries a single-byte type
//! discriminant. The values are printable characters, which makes packet
//! dumps legible.

use serde::{Deserialize, Serialize};

/// The type of a remote node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    DomainServer = b'D',
    EntityServer = b'o',
    Agent = b'I',
    AudioMixer = b'M',
    AvatarMixer = b'W',
    AssetServer = b'A',
    MessagesMixer = b'm',
    Unassigned = 1,
}

impl NodeType {
    /// The wire byte for this node type.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire byte; unknown bytes map to `Unassigned`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            b'D' => NodeType::DomainServer,
            b'o' => NodeType::EntityServer,
            b'I' => NodeType::Agent,
            b'M' => NodeType::AudioMixer,
            b'W' => NodeType::AvatarMixer,
            b'A' => NodeType::AssetServer,
            b'm' => NodeType::MessagesMixer,
            _ => NodeType::Unassigned,
        }
    }

    /// Human-readable name for logs.
    pub fn name(self) -> &'static str {
        match self {
            NodeType::DomainServer => "Domain Server",
            NodeType::EntityServer => "Entity Server",
            NodeType::Agent => "Agent",
            NodeType::AudioMixer => "Audio Mixer",
            NodeType::AvatarMixer => "Avatar Mixer",
            NodeType::AssetServer => "Asset Server",
            NodeType::MessagesMixer => "Messages Mixer",
            NodeType::Unassigned => "Unassigned",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes_round_trip() {
        for node_type in [
            NodeType::DomainServer,
            NodeType::EntityServer,
            NodeType::Agent,
            NodeType::AudioMixer,
            NodeType::AvatarMixer,
            NodeType::AssetServer,
            NodeType::MessagesMixer,
            NodeType::Unassigned,
        ] {
            assert_eq!(NodeType::from_u8(node_type.as_u8()), node_type);
        }
    }

    #[test]
    fn unknown_bytes_are_unassigned() {
        assert_eq!(NodeType::from_u8(0xFF), NodeType::Unassigned);
        assert_eq!(NodeType::from_u8(0), NodeType::Unassigned);
    }
}
