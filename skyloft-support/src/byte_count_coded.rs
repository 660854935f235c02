//! Byte-count-coded integers
//!
//! This module provides the variable-length unsigned integer coding used for
//! the entity type and update delta fields of an entity edit. The first bits
//! of the stream are a unary count of the total byte length (N - 1 one-bits
//! terminated by a zero-bit); the value bits follow, least significant bit
//! first.

use crate::error::{Error, Result};

/// Encode a value as a byte-count-coded stream.
///
/// The total byte count is `valueBits / 7 + 1` where `valueBits` is the
/// position of the highest set bit (zero encodes as a single zero byte).
pub fn encode(value: u64) -> Vec<u8> {
    let value_bits = (64 - value.leading_zeros()) as usize;
    let number_of_bytes = value_bits / 7 + 1;
    let mut output = vec![0u8; number_of_bytes];

    // Unary length header: N - 1 ones, then the terminating zero.
    for bit in 0..number_of_bytes - 1 {
        output[bit / 8] |= 0x80 >> (bit % 8);
    }

    // Value bits, least significant first, starting right after the header.
    for bit in 0..value_bits {
        if value & (1u64 << bit) != 0 {
            let position = number_of_bytes + bit;
            output[position / 8] |= 0x80 >> (position % 8);
        }
    }

    output
}

/// Decode a byte-count-coded value from the front of `buffer`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(buffer: &[u8]) -> Result<(u64, usize)> {
    if buffer.is_empty() {
        return Err(Error::Eof);
    }

    // Count the unary ones to learn the total byte length.
    let mut number_of_bytes = 1usize;
    let mut bit = 0usize;
    loop {
        if bit >= buffer.len() * 8 {
            return Err(Error::InvalidData(
                "unterminated byte-count header".to_string(),
            ));
        }
        let set = buffer[bit / 8] & (0x80 >> (bit % 8)) != 0;
        bit += 1;
        if !set {
            break;
        }
        number_of_bytes += 1;
    }

    if buffer.len() < number_of_bytes {
        return Err(Error::Eof);
    }

    let mut value = 0u64;
    for position in number_of_bytes..number_of_bytes * 8 {
        if buffer[position / 8] & (0x80 >> (position % 8)) != 0 {
            let value_bit = position - number_of_bytes;
            if value_bit >= 64 {
                return Err(Error::InvalidData(
                    "byte-count-coded value exceeds 64 bits".to_string(),
                ));
            }
            value |= 1u64 << value_bit;
        }
    }

    Ok((value, number_of_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x40]);
        assert_eq!(encode(2), vec![0x20]);
        assert_eq!(encode(3), vec![0x60]);
    }

    #[test]
    fn round_trips() {
        for value in [0u64, 1, 2, 15, 16, 127, 128, 255, 4095, 1 << 20, u64::MAX >> 1, u64::MAX] {
            let encoded = encode(value);
            let (decoded, consumed) = decode(&encoded).unwrap();
            assert_eq!(decoded, value, "value {value}");
            assert_eq!(consumed, encoded.len(), "value {value}");
        }
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let mut encoded = encode(7);
        let expected_len = encoded.len();
        encoded.extend_from_slice(&[0xAB, 0xCD]);
        let (value, consumed) = decode(&encoded).unwrap();
        assert_eq!(value, 7);
        assert_eq!(consumed, expected_len);
    }

    #[test]
    fn decode_empty_is_an_error() {
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn decode_truncated_is_an_error() {
        // Header claims two bytes but only one is present.
        assert!(decode(&[0x80]).is_err());
    }
}
