//! 128-bit integer I/O
//!
//! UUIDs are the only multi-word integers on the wire, serialized as 16
//! big-endian bytes while every other scalar is little-endian. Reads and
//! writes go through two 64-bit halves so the endianness of each half and
//! the order of the halves are both explicit.

/// Write `value` as 16 little-endian bytes.
pub fn write_u128_le(value: u128) -> [u8; 16] {
    let low = (value & 0xFFFF_FFFF_FFFF_FFFF) as u64;
    let high = (value >> 64) as u64;
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&low.to_le_bytes());
    out[8..].copy_from_slice(&high.to_le_bytes());
    out
}

/// Read 16 little-endian bytes back into a value.
pub fn read_u128_le(bytes: &[u8; 16]) -> u128 {
    let mut half = [0u8; 8];
    half.copy_from_slice(&bytes[..8]);
    let low = u64::from_le_bytes(half);
    half.copy_from_slice(&bytes[8..]);
    let high = u64::from_le_bytes(half);
    ((high as u128) << 64) | low as u128
}

/// Write `value` as 16 big-endian bytes.
pub fn write_u128_be(value: u128) -> [u8; 16] {
    let high = (value >> 64) as u64;
    let low = (value & 0xFFFF_FFFF_FFFF_FFFF) as u64;
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&high.to_be_bytes());
    out[8..].copy_from_slice(&low.to_be_bytes());
    out
}

/// Read 16 big-endian bytes back into a value.
pub fn read_u128_be(bytes: &[u8; 16]) -> u128 {
    let mut half = [0u8; 8];
    half.copy_from_slice(&bytes[..8]);
    let high = u64::from_be_bytes(half);
    half.copy_from_slice(&bytes[8..]);
    let low = u64::from_be_bytes(half);
    ((high as u128) << 64) | low as u128
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: [u128; 6] = [
        0,
        1,
        0xFFFF_FFFF_FFFF_FFFF,
        0x1_0000_0000_0000_0000,
        0xA82F_40B6_EE89_46CC_B504_02B8_8D72_A546,
        u128::MAX,
    ];

    #[test]
    fn little_endian_round_trip() {
        for value in CASES {
            assert_eq!(read_u128_le(&write_u128_le(value)), value, "value {value:#x}");
        }
    }

    #[test]
    fn big_endian_round_trip() {
        for value in CASES {
            assert_eq!(read_u128_be(&write_u128_be(value)), value, "value {value:#x}");
        }
    }

    #[test]
    fn big_endian_byte_order_matches_uuid_layout() {
        let value = 0xA82F_40B6_EE89_46CC_B504_02B8_8D72_A546u128;
        assert_eq!(
            hex::encode(write_u128_be(value)),
            "a82f40b6ee8946ccb50402b88d72a546"
        );
    }

    #[test]
    fn endiannesses_mirror_each_other() {
        for value in CASES {
            let mut le = write_u128_le(value);
            le.reverse();
            assert_eq!(le, write_u128_be(value), "value {value:#x}");
        }
    }
}
