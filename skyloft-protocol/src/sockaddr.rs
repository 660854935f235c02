//! Socket address wire form
//!
//! Node records advertise public and local socket addresses as: one address
//! family byte (4 = IPv4), four address bytes big-endian, and a big-endian
//! u16 port. Only IPv4 is spoken on this wire.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use skyloft_support::reader::PacketDataReader;

use crate::error::{Error, Result};

const FAMILY_IPV4: u8 = 4;

/// Serialized size of one socket address.
pub const SOCKADDR_WIRE_SIZE: usize = 7;

/// Append a socket address to `out`.
pub fn write_sockaddr(addr: &SocketAddr, out: &mut Vec<u8>) -> Result<()> {
    match addr {
        SocketAddr::V4(v4) => {
            out.push(FAMILY_IPV4);
            out.extend_from_slice(&v4.ip().octets());
            out.extend_from_slice(&v4.port().to_be_bytes());
            Ok(())
        }
        SocketAddr::V6(_) => {
            Err(Error::InvalidValue("IPv6 addresses are not spoken on this wire".to_string()))
        }
    }
}

/// Read a socket address.
pub fn read_sockaddr(reader: &mut PacketDataReader) -> Result<SocketAddr> {
    let family = reader.read_u8()?;
    if family != FAMILY_IPV4 {
        return Err(Error::MalformedPacket(format!("unknown address family {family}")));
    }
    let mut octets = [0u8; 4];
    for octet in octets.iter_mut() {
        *octet = reader.read_u8()?;
    }
    let port = u16::from_be_bytes([reader.read_u8()?, reader.read_u8()?]);
    Ok(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::from(octets), port)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let addr: SocketAddr = "192.168.0.17:40102".parse().unwrap();
        let mut out = Vec::new();
        write_sockaddr(&addr, &mut out).unwrap();
        assert_eq!(out.len(), SOCKADDR_WIRE_SIZE);
        assert_eq!(out, vec![4, 192, 168, 0, 17, 0x9c, 0xa6]);

        let mut reader = PacketDataReader::new(&out);
        assert_eq!(read_sockaddr(&mut reader).unwrap(), addr);
    }

    #[test]
    fn ipv6_is_rejected() {
        let addr: SocketAddr = "[::1]:9000".parse().unwrap();
        let mut out = Vec::new();
        assert!(write_sockaddr(&addr, &mut out).is_err());
        assert!(out.is_empty());
    }
}
