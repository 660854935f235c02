//! DomainConnectionDenied body

use skyloft_support::reader::PacketDataReader;

use crate::error::Result;

/// Reason codes a domain may refuse a connection with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeniedReason {
    Unknown = 0,
    ProtocolMismatch = 1,
    LoginError = 2,
    NotAuthorized = 3,
    TooManyUsers = 4,
    TimedOut = 5,
}

impl DeniedReason {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => DeniedReason::ProtocolMismatch,
            2 => DeniedReason::LoginError,
            3 => DeniedReason::NotAuthorized,
            4 => DeniedReason::TooManyUsers,
            5 => DeniedReason::TimedOut,
            _ => DeniedReason::Unknown,
        }
    }
}

/// The domain's refusal reply to a connect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConnectionDenied {
    pub reason_code: DeniedReason,
    /// Human-readable explanation for the user.
    pub reason: String,
}

impl DomainConnectionDenied {
    pub fn write_payload(&self, out: &mut Vec<u8>) {
        out.push(self.reason_code as u8);
        out.extend_from_slice(&(self.reason.len() as u16).to_le_bytes());
        out.extend_from_slice(self.reason.as_bytes());
    }

    pub fn read_payload(reader: &mut PacketDataReader) -> Result<Self> {
        let reason_code = DeniedReason::from_u8(reader.read_u8()?);
        let reason = reader.read_string()?;
        Ok(Self { reason_code, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let denied = DomainConnectionDenied {
            reason_code: DeniedReason::TooManyUsers,
            reason: "Domain is at capacity".to_string(),
        };
        let mut out = Vec::new();
        denied.write_payload(&mut out);

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(DomainConnectionDenied::read_payload(&mut reader).unwrap(), denied);
    }
}
