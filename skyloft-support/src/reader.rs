//! Typed wire reader
//!
//! The read-side counterpart of `octree_packet_data`: a cursor over a byte
//! slice with typed reads matching each typed appender. Reads return
//! `Error::Eof` instead of panicking when the stream runs short.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::int128;
use crate::math::{AaCube, Color, Quat, Rect, Vec2, Vec3};
use crate::packed_quat;

/// A typed cursor over received packet bytes.
#[derive(Debug)]
pub struct PacketDataReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> PacketDataReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buffer[self.position..]
    }

    /// Advance the cursor without interpreting the bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.position + count > self.buffer.len() {
            return Err(Error::Eof);
        }
        let slice = &self.buffer[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.take(1)?[0] != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        let mut fixed = [0u8; 8];
        fixed.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(fixed))
    }

    pub fn read_f32_le(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_color(&mut self) -> Result<Color> {
        let bytes = self.take(3)?;
        Ok(Color::new(bytes[0], bytes[1], bytes[2]))
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32_le()?, self.read_f32_le()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32_le()?, self.read_f32_le()?, self.read_f32_le()?))
    }

    pub fn read_quat(&mut self) -> Result<Quat> {
        Ok(packed_quat::unpack(self.read_u64_le()?))
    }

    pub fn read_rect(&mut self) -> Result<Rect> {
        Ok(Rect {
            x: self.read_f32_le()?,
            y: self.read_f32_le()?,
            width: self.read_f32_le()?,
            height: self.read_f32_le()?,
        })
    }

    pub fn read_aa_cube(&mut self) -> Result<AaCube> {
        Ok(AaCube { corner: self.read_vec3()?, scale: self.read_f32_le()? })
    }

    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_u16_le()? as usize;
        let bytes = self.take(length)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::InvalidData("string is not UTF-8".to_string()))
    }

    pub fn read_byte_array(&mut self) -> Result<Vec<u8>> {
        let length = self.read_u16_le()? as usize;
        Ok(self.take(length)?.to_vec())
    }

    /// A zero length reads as the nil UUID; otherwise the length must be 16.
    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let length = self.read_u16_le()? as usize;
        match length {
            0 => Ok(Uuid::nil()),
            16 => self.read_uuid_be(),
            other => Err(Error::InvalidData(format!("UUID of wrong size: {other}"))),
        }
    }

    /// A bare 16-byte big-endian UUID with no length prefix (header fields).
    pub fn read_uuid_be(&mut self) -> Result<Uuid> {
        let bytes = self.take(16)?;
        let mut fixed = [0u8; 16];
        fixed.copy_from_slice(bytes);
        Ok(Uuid::from_u128(int128::read_u128_be(&fixed)))
    }

    pub fn read_quat_array(&mut self) -> Result<Vec<Quat>> {
        let length = self.read_u16_le()? as usize;
        (0..length).map(|_| self.read_quat()).collect()
    }

    pub fn read_vec3_array(&mut self) -> Result<Vec<Vec3>> {
        let length = self.read_u16_le()? as usize;
        (0..length).map(|_| self.read_vec3()).collect()
    }

    pub fn read_uuid_array(&mut self) -> Result<Vec<Uuid>> {
        let length = self.read_u16_le()? as usize;
        (0..length).map(|_| self.read_uuid_be()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octree_packet_data::{OctreePacketData, PacketContext};
    use crate::property_flags::PropertyFlags;

    #[test]
    fn reads_back_what_the_appenders_wrote() {
        let mut data = OctreePacketData::new(256);
        let mut ctx = PacketContext::new((0..6u16).collect::<PropertyFlags>());
        let uuid = Uuid::parse_str("b71d5380-2fcc-4833-93a7-9a4967017587").unwrap();

        data.append_u32_value(0, 123456, &mut ctx);
        data.append_string_value(1, "skyloft", &mut ctx);
        data.append_uuid_value(2, &uuid, &mut ctx);
        data.append_vec3_value(3, &Vec3::new(1.0, -2.0, 3.5), &mut ctx);
        data.append_color_value(4, &Color::new(9, 8, 7), &mut ctx);

        let bytes = data.into_bytes();
        let mut reader = PacketDataReader::new(&bytes);
        assert_eq!(reader.read_u32_le().unwrap(), 123456);
        assert_eq!(reader.read_string().unwrap(), "skyloft");
        assert_eq!(reader.read_uuid().unwrap(), uuid);
        assert_eq!(reader.read_vec3().unwrap(), Vec3::new(1.0, -2.0, 3.5));
        assert_eq!(reader.read_color().unwrap(), Color::new(9, 8, 7));
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn short_reads_are_eof_not_panics() {
        let mut reader = PacketDataReader::new(&[0x01, 0x02]);
        assert!(reader.read_u64_le().is_err());
        // The failed read consumed nothing.
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u16_le().unwrap(), 0x0201);
    }

    #[test]
    fn wrong_sized_uuid_is_invalid_data() {
        // Length prefix of 5 is neither empty nor a full UUID.
        let mut reader = PacketDataReader::new(&[5, 0, 1, 2, 3, 4, 5]);
        assert!(matches!(reader.read_uuid(), Err(Error::InvalidData(_))));
    }
}
