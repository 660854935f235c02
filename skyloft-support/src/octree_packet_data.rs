//! Typed octree appender
//!
//! `OctreePacketData` owns the byte buffer one entity packet is serialized
//! into and enforces the partial-fit protocol: every typed append validates
//! its value, checks that the serialized form fits under the buffer's hard
//! size limit, and only then writes and updates the `PacketContext`
//! bookkeeping. An append that does not fit flips the context to `Partial`
//! and leaves both the buffer and the flag sets untouched, so the caller can
//! keep trying later, smaller fields.

use log::error;
use uuid::Uuid;

use crate::int128;
use crate::math::{AaCube, Color, Quat, Rect, Vec2, Vec3};
use crate::packed_quat;
use crate::property_flags::PropertyFlags;

/// Largest element count any array property may carry; length fields are u16.
pub const MAX_ARRAY_LENGTH: usize = u16::MAX as usize;

/// Largest magnitude accepted for an f32 field.
pub const MAX_FLOAT_MAGNITUDE: f32 = 3.4028235e38;

/// Outcome of one serialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendState {
    /// Everything requested was written.
    Completed,
    /// Some fields were written, at least one did not fit.
    Partial,
    /// Nothing fit; the packet should be abandoned.
    None,
}

/// Scratch state for serializing one packet.
#[derive(Debug, Clone)]
pub struct PacketContext {
    /// Flags still waiting to be written.
    pub properties_to_write: PropertyFlags,
    /// Flags already written into the buffer.
    pub properties_written: PropertyFlags,
    /// Count of properties written.
    pub property_count: u32,
    /// Running outcome; starts Completed, degrades to Partial on a failed fit.
    pub append_state: AppendState,
}

impl PacketContext {
    /// Start a context for the given requested property set.
    pub fn new(requested: PropertyFlags) -> Self {
        Self {
            properties_to_write: requested,
            properties_written: PropertyFlags::new(),
            property_count: 0,
            append_state: AppendState::Completed,
        }
    }
}

/// A bounded, append-only packet buffer with typed property appenders.
#[derive(Debug)]
pub struct OctreePacketData {
    buffer: Vec<u8>,
    max_size: usize,
}

impl OctreePacketData {
    /// Create an empty buffer that will never grow beyond `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self { buffer: Vec::with_capacity(max_size), max_size }
    }

    /// Current write position.
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes still available under the size limit.
    pub fn remaining(&self) -> usize {
        self.max_size - self.buffer.len()
    }

    /// Hard size limit.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Roll the write position back to an earlier checkpoint.
    pub fn truncate(&mut self, position: usize) {
        self.buffer.truncate(position);
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Rewrite already-written bytes in place.
    pub fn overwrite(&mut self, position: usize, bytes: &[u8]) {
        self.buffer[position..position + bytes.len()].copy_from_slice(bytes);
    }

    /// Move everything from `from` onward down by `by` bytes, shrinking the
    /// buffer. Used to compact an over-reserved flag block.
    pub fn shift_left(&mut self, from: usize, by: usize) {
        if by == 0 {
            return;
        }
        self.buffer.drain(from - by..from);
    }

    // ---- raw appends (headers and prefixes, no property bookkeeping) ----

    /// Append raw bytes; false (and no write) if they do not fit.
    pub fn append_raw(&mut self, bytes: &[u8]) -> bool {
        if self.buffer.len() + bytes.len() > self.max_size {
            return false;
        }
        self.buffer.extend_from_slice(bytes);
        true
    }

    pub fn append_u8_raw(&mut self, value: u8) -> bool {
        self.append_raw(&[value])
    }

    pub fn append_u16_le_raw(&mut self, value: u16) -> bool {
        self.append_raw(&value.to_le_bytes())
    }

    pub fn append_u64_le_raw(&mut self, value: u64) -> bool {
        self.append_raw(&value.to_le_bytes())
    }

    /// UUIDs are the one big-endian scalar on the wire.
    pub fn append_uuid_be_raw(&mut self, value: &Uuid) -> bool {
        self.append_raw(&int128::write_u128_be(value.as_u128()))
    }

    // ---- typed property appenders ----

    /// Core of the three-step append contract: fit-check, write, bookkeep.
    fn append_property(&mut self, flag: u16, bytes: &[u8], ctx: &mut PacketContext) -> usize {
        if self.buffer.len() + bytes.len() > self.max_size {
            ctx.append_state = AppendState::Partial;
            return 0;
        }
        self.buffer.extend_from_slice(bytes);
        ctx.properties_to_write.set_has_property(flag, false);
        ctx.properties_written.set_has_property(flag, true);
        ctx.property_count += 1;
        bytes.len()
    }

    pub fn append_bool_value(&mut self, flag: u16, value: bool, ctx: &mut PacketContext) -> usize {
        self.append_property(flag, &[value as u8], ctx)
    }

    pub fn append_u8_value(&mut self, flag: u16, value: u8, ctx: &mut PacketContext) -> usize {
        self.append_property(flag, &[value], ctx)
    }

    pub fn append_u16_value(&mut self, flag: u16, value: u16, ctx: &mut PacketContext) -> usize {
        self.append_property(flag, &value.to_le_bytes(), ctx)
    }

    pub fn append_u32_value(&mut self, flag: u16, value: u32, ctx: &mut PacketContext) -> usize {
        self.append_property(flag, &value.to_le_bytes(), ctx)
    }

    pub fn append_u64_value(&mut self, flag: u16, value: u64, ctx: &mut PacketContext) -> usize {
        self.append_property(flag, &value.to_le_bytes(), ctx)
    }

    pub fn append_f32_value(&mut self, flag: u16, value: f32, ctx: &mut PacketContext) -> usize {
        if !value.is_finite() || value.abs() > MAX_FLOAT_MAGNITUDE {
            error!("Cannot write invalid f32 value: {value}");
            return 0;
        }
        self.append_property(flag, &value.to_le_bytes(), ctx)
    }

    pub fn append_color_value(&mut self, flag: u16, value: &Color, ctx: &mut PacketContext) -> usize {
        self.append_property(flag, &[value.red, value.green, value.blue], ctx)
    }

    pub fn append_vec2_value(&mut self, flag: u16, value: &Vec2, ctx: &mut PacketContext) -> usize {
        if !value.is_finite() {
            error!("Cannot write invalid vec2 value");
            return 0;
        }
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&value.x.to_le_bytes());
        bytes[4..].copy_from_slice(&value.y.to_le_bytes());
        self.append_property(flag, &bytes, ctx)
    }

    pub fn append_vec3_value(&mut self, flag: u16, value: &Vec3, ctx: &mut PacketContext) -> usize {
        if !value.is_finite() {
            error!("Cannot write invalid vec3 value");
            return 0;
        }
        self.append_property(flag, &vec3_bytes(value), ctx)
    }

    pub fn append_quat_value(&mut self, flag: u16, value: &Quat, ctx: &mut PacketContext) -> usize {
        if !value.is_finite() {
            error!("Cannot write invalid quat value");
            return 0;
        }
        let packed = packed_quat::pack(value);
        self.append_property(flag, &packed.to_le_bytes(), ctx)
    }

    pub fn append_rect_value(&mut self, flag: u16, value: &Rect, ctx: &mut PacketContext) -> usize {
        if !value.is_finite() {
            error!("Cannot write invalid rect value");
            return 0;
        }
        let mut bytes = [0u8; 16];
        bytes[..4].copy_from_slice(&value.x.to_le_bytes());
        bytes[4..8].copy_from_slice(&value.y.to_le_bytes());
        bytes[8..12].copy_from_slice(&value.width.to_le_bytes());
        bytes[12..].copy_from_slice(&value.height.to_le_bytes());
        self.append_property(flag, &bytes, ctx)
    }

    pub fn append_aa_cube_value(
        &mut self,
        flag: u16,
        value: &AaCube,
        ctx: &mut PacketContext,
    ) -> usize {
        if !value.is_valid() {
            error!("Cannot write invalid AACube value");
            return 0;
        }
        let mut bytes = [0u8; 16];
        bytes[..12].copy_from_slice(&vec3_bytes(&value.corner));
        bytes[12..].copy_from_slice(&value.scale.to_le_bytes());
        self.append_property(flag, &bytes, ctx)
    }

    pub fn append_string_value(&mut self, flag: u16, value: &str, ctx: &mut PacketContext) -> usize {
        if value.len() > MAX_ARRAY_LENGTH {
            error!("Cannot write invalid string value: {} bytes", value.len());
            return 0;
        }
        let mut bytes = Vec::with_capacity(2 + value.len());
        bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
        bytes.extend_from_slice(value.as_bytes());
        self.append_property(flag, &bytes, ctx)
    }

    pub fn append_byte_array_value(
        &mut self,
        flag: u16,
        value: &[u8],
        ctx: &mut PacketContext,
    ) -> usize {
        if value.len() > MAX_ARRAY_LENGTH {
            error!("Cannot write invalid byte array value: {} elements", value.len());
            return 0;
        }
        let mut bytes = Vec::with_capacity(2 + value.len());
        bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
        bytes.extend_from_slice(value);
        self.append_property(flag, &bytes, ctx)
    }

    /// Null UUIDs write as a zero length; everything else as 16 big-endian
    /// bytes behind a length of 16.
    pub fn append_uuid_value(&mut self, flag: u16, value: &Uuid, ctx: &mut PacketContext) -> usize {
        if value.is_nil() {
            self.append_property(flag, &0u16.to_le_bytes(), ctx)
        } else {
            let mut bytes = [0u8; 18];
            bytes[..2].copy_from_slice(&16u16.to_le_bytes());
            bytes[2..].copy_from_slice(&int128::write_u128_be(value.as_u128()));
            self.append_property(flag, &bytes, ctx)
        }
    }

    pub fn append_quat_array_value(
        &mut self,
        flag: u16,
        value: &[Quat],
        ctx: &mut PacketContext,
    ) -> usize {
        if value.len() > MAX_ARRAY_LENGTH || value.iter().any(|quat| !quat.is_finite()) {
            error!("Cannot write invalid quat array value: {} elements", value.len());
            return 0;
        }
        let mut bytes = Vec::with_capacity(2 + value.len() * 8);
        bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
        for quat in value {
            bytes.extend_from_slice(&packed_quat::pack(quat).to_le_bytes());
        }
        self.append_property(flag, &bytes, ctx)
    }

    pub fn append_vec3_array_value(
        &mut self,
        flag: u16,
        value: &[Vec3],
        ctx: &mut PacketContext,
    ) -> usize {
        if value.len() > MAX_ARRAY_LENGTH || value.iter().any(|vec| !vec.is_finite()) {
            error!("Cannot write invalid vec3 array value: {} elements", value.len());
            return 0;
        }
        let mut bytes = Vec::with_capacity(2 + value.len() * 12);
        bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
        for vec in value {
            bytes.extend_from_slice(&vec3_bytes(vec));
        }
        self.append_property(flag, &bytes, ctx)
    }

    pub fn append_uuid_array_value(
        &mut self,
        flag: u16,
        value: &[Uuid],
        ctx: &mut PacketContext,
    ) -> usize {
        if value.len() > MAX_ARRAY_LENGTH {
            error!("Cannot write invalid UUID array value: {} elements", value.len());
            return 0;
        }
        let mut bytes = Vec::with_capacity(2 + value.len() * 16);
        bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
        for uuid in value {
            bytes.extend_from_slice(&int128::write_u128_be(uuid.as_u128()));
        }
        self.append_property(flag, &bytes, ctx)
    }
}

fn vec3_bytes(value: &Vec3) -> [u8; 12] {
    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&value.x.to_le_bytes());
    bytes[4..8].copy_from_slice(&value.y.to_le_bytes());
    bytes[8..].copy_from_slice(&value.z.to_le_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PacketContext {
        let mut requested = PropertyFlags::new();
        requested.set_has_property(17, true);
        requested.set_has_property(84, true);
        PacketContext::new(requested)
    }

    #[test]
    fn append_moves_flags_between_sets() {
        let mut data = OctreePacketData::new(64);
        let mut ctx = context();

        let written = data.append_color_value(84, &Color::new(240, 37, 148), &mut ctx);
        assert_eq!(written, 3);
        assert_eq!(data.as_slice(), &[240, 37, 148]);
        assert!(!ctx.properties_to_write.has_property(84));
        assert!(ctx.properties_written.has_property(84));
        assert!(ctx.properties_to_write.has_property(17));
        assert_eq!(ctx.property_count, 1);
        assert_eq!(ctx.append_state, AppendState::Completed);
    }

    #[test]
    fn append_that_does_not_fit_is_partial_and_writes_nothing() {
        let mut data = OctreePacketData::new(2);
        let mut ctx = context();

        let written = data.append_color_value(84, &Color::new(1, 2, 3), &mut ctx);
        assert_eq!(written, 0);
        assert_eq!(data.position(), 0);
        assert_eq!(ctx.append_state, AppendState::Partial);
        assert!(ctx.properties_to_write.has_property(84));
        assert!(!ctx.properties_written.has_property(84));
        assert_eq!(ctx.property_count, 0);
    }

    #[test]
    fn invalid_float_is_rejected_without_touching_state() {
        let mut data = OctreePacketData::new(64);
        let mut ctx = context();

        for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(data.append_f32_value(17, value, &mut ctx), 0);
        }
        assert_eq!(data.position(), 0);
        assert_eq!(ctx.append_state, AppendState::Completed);
        assert_eq!(ctx.property_count, 0);
    }

    #[test]
    fn uuid_values_use_length_prefixed_big_endian_form() {
        let mut data = OctreePacketData::new(64);
        let mut ctx = context();

        let uuid = Uuid::parse_str("a82f40b6-ee89-46cc-b504-02b88d72a546").unwrap();
        assert_eq!(data.append_uuid_value(17, &uuid, &mut ctx), 18);
        assert_eq!(
            hex::encode(data.as_slice()),
            "1000a82f40b6ee8946ccb50402b88d72a546"
        );
    }

    #[test]
    fn null_uuid_writes_a_zero_length() {
        let mut data = OctreePacketData::new(64);
        let mut ctx = context();

        assert_eq!(data.append_uuid_value(17, &Uuid::nil(), &mut ctx), 2);
        assert_eq!(data.as_slice(), &[0, 0]);
    }

    #[test]
    fn typed_sizes_match_the_wire_contract() {
        let mut data = OctreePacketData::new(1024);
        let mut ctx = PacketContext::new((0..20).collect());

        assert_eq!(data.append_bool_value(0, true, &mut ctx), 1);
        assert_eq!(data.append_u8_value(1, 7, &mut ctx), 1);
        assert_eq!(data.append_u16_value(2, 7, &mut ctx), 2);
        assert_eq!(data.append_u32_value(3, 7, &mut ctx), 4);
        assert_eq!(data.append_u64_value(4, 7, &mut ctx), 8);
        assert_eq!(data.append_f32_value(5, 1.5, &mut ctx), 4);
        assert_eq!(data.append_vec2_value(6, &Vec2::new(1.0, 2.0), &mut ctx), 8);
        assert_eq!(data.append_vec3_value(7, &Vec3::new(1.0, 2.0, 3.0), &mut ctx), 12);
        assert_eq!(data.append_quat_value(8, &Quat::default(), &mut ctx), 8);
        assert_eq!(
            data.append_rect_value(9, &Rect { x: 0.0, y: 0.0, width: 4.0, height: 2.0 }, &mut ctx),
            16
        );
        assert_eq!(
            data.append_aa_cube_value(
                10,
                &AaCube { corner: Vec3::new(0.0, 0.0, 0.0), scale: 1.0 },
                &mut ctx
            ),
            16
        );
        assert_eq!(data.append_string_value(11, "hi", &mut ctx), 4);
        assert_eq!(data.append_byte_array_value(12, &[1, 2, 3], &mut ctx), 5);
        assert_eq!(data.append_quat_array_value(13, &[Quat::default(); 2], &mut ctx), 18);
        assert_eq!(data.append_vec3_array_value(14, &[Vec3::default(); 2], &mut ctx), 26);
        assert_eq!(data.append_uuid_array_value(15, &[Uuid::nil(); 2], &mut ctx), 34);
        assert_eq!(ctx.property_count, 16);
        assert_eq!(ctx.append_state, AppendState::Completed);
    }

    #[test]
    fn appends_never_write_past_the_limit() {
        // Sweep tight limits; position plus returned size stays in bounds.
        for limit in 0..24usize {
            let mut data = OctreePacketData::new(limit);
            let mut ctx = PacketContext::new((0..8).collect());
            let before = data.position();
            let written = data.append_vec3_value(7, &Vec3::new(1.0, 2.0, 3.0), &mut ctx);
            assert!(before + written <= limit);
            assert!(data.position() <= limit);
            let written = data.append_string_value(3, "hello", &mut ctx);
            assert!(data.position() <= limit);
            let _ = written;
        }
    }

    #[test]
    fn negative_scale_cube_is_invalid() {
        let mut data = OctreePacketData::new(64);
        let mut ctx = context();
        let cube = AaCube { corner: Vec3::default(), scale: -1.0 };
        assert_eq!(data.append_aa_cube_value(17, &cube, &mut ctx), 0);
        assert_eq!(data.position(), 0);
    }
}
