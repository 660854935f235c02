//! Property flag bit vectors
//!
//! A `PropertyFlags` value is an ordered set of property identifiers drawn
//! from a closed enumeration. The same structure is both the runtime set and
//! the wire form: a big-endian bit stream whose first bits are a unary count
//! of the total byte length (N - 1 ones terminated by a zero), with flag `i`
//! stored at bit position `i + N`.

use std::ops::{BitOr, BitOrAssign, Sub, SubAssign};

/// An ordered set of property identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFlags {
    // Word i holds flags [64 * i, 64 * i + 64); bit 0 of a word is the lowest flag.
    words: Vec<u64>,
}

impl PropertyFlags {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a single flag.
    pub fn set_has_property(&mut self, flag: u16, value: bool) {
        let word = flag as usize / 64;
        let bit = flag as usize % 64;
        if value {
            if self.words.len() <= word {
                self.words.resize(word + 1, 0);
            }
            self.words[word] |= 1u64 << bit;
        } else if word < self.words.len() {
            self.words[word] &= !(1u64 << bit);
        }
    }

    /// Whether a flag is present.
    pub fn has_property(&self, flag: u16) -> bool {
        let word = flag as usize / 64;
        let bit = flag as usize % 64;
        word < self.words.len() && self.words[word] & (1u64 << bit) != 0
    }

    /// Whether no flag is present.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// The highest flag present, if any.
    pub fn max_flag(&self) -> Option<u16> {
        for (index, word) in self.words.iter().enumerate().rev() {
            if *word != 0 {
                let high = 63 - word.leading_zeros() as usize;
                return Some((index * 64 + high) as u16);
            }
        }
        None
    }

    /// Iterate the set flags in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.words.iter().enumerate().flat_map(|(index, word)| {
            (0..64)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| (index * 64 + bit) as u16)
        })
    }

    /// Encode to the wire form at the minimum length for the set.
    ///
    /// An empty set encodes as a single zero byte.
    pub fn encode(&self) -> Vec<u8> {
        match self.max_flag() {
            None => vec![0u8],
            Some(max_flag) => self.encode_with_length(max_flag as usize / 7 + 1),
        }
    }

    /// Encode to the wire form with an explicit byte length.
    ///
    /// Used to reserve the widest possible block up front so that flags can
    /// later be cleared in place without moving the payload behind it. Every
    /// set flag must fit within `length_in_bytes`.
    pub fn encode_with_length(&self, length_in_bytes: usize) -> Vec<u8> {
        let mut output = vec![0u8; length_in_bytes];

        // Unary length header.
        for bit in 0..length_in_bytes - 1 {
            output[bit / 8] |= 0x80 >> (bit % 8);
        }

        for flag in self.iter() {
            let position = flag as usize + length_in_bytes;
            debug_assert!(position < length_in_bytes * 8, "flag {flag} does not fit");
            output[position / 8] |= 0x80 >> (position % 8);
        }

        output
    }

    /// Decode a set from the front of `buffer`.
    ///
    /// Returns the set and the number of bytes consumed. The header fixes the
    /// byte length; trailing zero bytes within it are tolerated (an encoder
    /// that cleared flags in place may have left the longer header behind).
    /// A buffer shorter than the header claims yields the flags that are
    /// actually present.
    pub fn decode(buffer: &[u8]) -> (Self, usize) {
        let mut flags = PropertyFlags::new();
        if buffer.is_empty() {
            return (flags, 0);
        }

        let mut length_in_bytes = 1usize;
        let mut bit = 0usize;
        while bit < buffer.len() * 8 {
            let set = buffer[bit / 8] & (0x80 >> (bit % 8)) != 0;
            bit += 1;
            if !set {
                break;
            }
            length_in_bytes += 1;
        }

        let available = length_in_bytes.min(buffer.len());
        for position in length_in_bytes..available * 8 {
            if buffer[position / 8] & (0x80 >> (position % 8)) != 0 {
                flags.set_has_property((position - length_in_bytes) as u16, true);
            }
        }

        (flags, available)
    }
}

impl FromIterator<u16> for PropertyFlags {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        let mut flags = PropertyFlags::new();
        for flag in iter {
            flags.set_has_property(flag, true);
        }
        flags
    }
}

impl BitOrAssign<&PropertyFlags> for PropertyFlags {
    fn bitor_assign(&mut self, rhs: &PropertyFlags) {
        if self.words.len() < rhs.words.len() {
            self.words.resize(rhs.words.len(), 0);
        }
        for (word, other) in self.words.iter_mut().zip(rhs.words.iter()) {
            *word |= other;
        }
    }
}

impl BitOr for PropertyFlags {
    type Output = PropertyFlags;

    fn bitor(mut self, rhs: PropertyFlags) -> PropertyFlags {
        self |= &rhs;
        self
    }
}

impl SubAssign<&PropertyFlags> for PropertyFlags {
    fn sub_assign(&mut self, rhs: &PropertyFlags) {
        for (word, other) in self.words.iter_mut().zip(rhs.words.iter()) {
            *word &= !other;
        }
    }
}

impl Sub for PropertyFlags {
    type Output = PropertyFlags;

    fn sub(mut self, rhs: PropertyFlags) -> PropertyFlags {
        self -= &rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_encodes_as_one_zero_byte() {
        let flags = PropertyFlags::new();
        assert!(flags.is_empty());
        assert_eq!(flags.encode(), vec![0x00]);
    }

    #[test]
    fn known_wire_images() {
        // Flag 84 alone: 13 bytes, 12-bit unary header, bit 97 set.
        let flags: PropertyFlags = [84u16].into_iter().collect();
        assert_eq!(hex::encode(flags.encode()), "fff00000000000000000000040");

        // Flags 17 and 84: same block with bit 30 also set.
        let flags: PropertyFlags = [17u16, 84].into_iter().collect();
        assert_eq!(hex::encode(flags.encode()), "fff00002000000000000000040");
    }

    #[test]
    fn round_trip_is_identity() {
        let cases: Vec<Vec<u16>> = vec![
            vec![0],
            vec![6],
            vec![7],
            vec![17, 84],
            vec![0, 1, 2, 3, 126],
            (0..127).collect(),
        ];
        for case in cases {
            let flags: PropertyFlags = case.iter().copied().collect();
            let encoded = flags.encode();
            let (decoded, consumed) = PropertyFlags::decode(&encoded);
            assert_eq!(decoded, flags, "case {case:?}");
            assert_eq!(consumed, encoded.len(), "case {case:?}");
        }
    }

    #[test]
    fn wire_length_follows_max_flag() {
        for (flag, expected_len) in [(0u16, 1usize), (6, 1), (7, 2), (13, 2), (84, 13), (126, 19)] {
            let flags: PropertyFlags = [flag].into_iter().collect();
            assert_eq!(flags.encode().len(), expected_len, "flag {flag}");
        }
    }

    #[test]
    fn random_sets_round_trip() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let count = rng.gen_range(0..30);
            let flags: PropertyFlags = (0..count).map(|_| rng.gen_range(0u16..127)).collect();
            let encoded = flags.encode();
            let (decoded, consumed) = PropertyFlags::decode(&encoded);
            assert_eq!(decoded, flags);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn decode_tolerates_trailing_zero_bytes() {
        // A 19-byte reservation whose surviving flags would only need 3 bytes.
        let flags: PropertyFlags = [17u16].into_iter().collect();
        let padded = flags.encode_with_length(19);
        assert_eq!(padded.len(), 19);
        let (decoded, consumed) = PropertyFlags::decode(&padded);
        assert_eq!(decoded, flags);
        assert_eq!(consumed, 19);
    }

    #[test]
    fn union_and_difference() {
        let a: PropertyFlags = [1u16, 5, 9].into_iter().collect();
        let b: PropertyFlags = [5u16, 70].into_iter().collect();

        let union = a.clone() | b.clone();
        assert_eq!(union.iter().collect::<Vec<_>>(), vec![1, 5, 9, 70]);

        let difference = a - b;
        assert_eq!(difference.iter().collect::<Vec<_>>(), vec![1, 9]);
    }

    #[test]
    fn clearing_flags_never_grows_the_set() {
        let mut flags: PropertyFlags = [3u16, 90].into_iter().collect();
        flags.set_has_property(90, false);
        assert_eq!(flags.max_flag(), Some(3));
        flags.set_has_property(200, false);
        assert_eq!(flags.iter().collect::<Vec<_>>(), vec![3]);
    }
}
