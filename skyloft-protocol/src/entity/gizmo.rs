//! Gizmo entity block, including the ring property group

use skyloft_support::math::Color;
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_GIZMO_TYPE: PropertyIndex = derived(0);
pub const PROP_RING_START_ANGLE: PropertyIndex = derived(1);
pub const PROP_RING_END_ANGLE: PropertyIndex = derived(2);
pub const PROP_RING_INNER_RADIUS: PropertyIndex = derived(3);
pub const PROP_RING_INNER_START_COLOR: PropertyIndex = derived(4);
pub const PROP_RING_INNER_END_COLOR: PropertyIndex = derived(5);
pub const PROP_RING_OUTER_START_COLOR: PropertyIndex = derived(6);
pub const PROP_RING_OUTER_END_COLOR: PropertyIndex = derived(7);
pub const PROP_RING_INNER_START_ALPHA: PropertyIndex = derived(8);
pub const PROP_RING_INNER_END_ALPHA: PropertyIndex = derived(9);
pub const PROP_RING_OUTER_START_ALPHA: PropertyIndex = derived(10);
pub const PROP_RING_OUTER_END_ALPHA: PropertyIndex = derived(11);
pub const PROP_RING_HAS_TICK_MARKS: PropertyIndex = derived(12);
pub const PROP_RING_MAJOR_TICK_MARKS_ANGLE: PropertyIndex = derived(13);
pub const PROP_RING_MINOR_TICK_MARKS_ANGLE: PropertyIndex = derived(14);
pub const PROP_RING_MAJOR_TICK_MARKS_LENGTH: PropertyIndex = derived(15);
pub const PROP_RING_MINOR_TICK_MARKS_LENGTH: PropertyIndex = derived(16);
pub const PROP_RING_MAJOR_TICK_MARKS_COLOR: PropertyIndex = derived(17);
pub const PROP_RING_MINOR_TICK_MARKS_COLOR: PropertyIndex = derived(18);

/// The ring property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingProperties {
    pub start_angle: Option<f32>,
    pub end_angle: Option<f32>,
    pub inner_radius: Option<f32>,
    pub inner_start_color: Option<Color>,
    pub inner_end_color: Option<Color>,
    pub outer_start_color: Option<Color>,
    pub outer_end_color: Option<Color>,
    pub inner_start_alpha: Option<f32>,
    pub inner_end_alpha: Option<f32>,
    pub outer_start_alpha: Option<f32>,
    pub outer_end_alpha: Option<f32>,
    pub has_tick_marks: Option<bool>,
    pub major_tick_marks_angle: Option<f32>,
    pub minor_tick_marks_angle: Option<f32>,
    pub major_tick_marks_length: Option<f32>,
    pub minor_tick_marks_length: Option<f32>,
    pub major_tick_marks_color: Option<Color>,
    pub minor_tick_marks_color: Option<Color>,
}

/// Properties specific to gizmo entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GizmoProperties {
    pub gizmo_type: Option<u32>,
    pub ring: RingProperties,
}

impl GizmoProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_GIZMO_TYPE, self.gizmo_type);
        mark_changed!(flags, PROP_RING_START_ANGLE, self.ring.start_angle);
        mark_changed!(flags, PROP_RING_END_ANGLE, self.ring.end_angle);
        mark_changed!(flags, PROP_RING_INNER_RADIUS, self.ring.inner_radius);
        mark_changed!(flags, PROP_RING_INNER_START_COLOR, self.ring.inner_start_color);
        mark_changed!(flags, PROP_RING_INNER_END_COLOR, self.ring.inner_end_color);
        mark_changed!(flags, PROP_RING_OUTER_START_COLOR, self.ring.outer_start_color);
        mark_changed!(flags, PROP_RING_OUTER_END_COLOR, self.ring.outer_end_color);
        mark_changed!(flags, PROP_RING_INNER_START_ALPHA, self.ring.inner_start_alpha);
        mark_changed!(flags, PROP_RING_INNER_END_ALPHA, self.ring.inner_end_alpha);
        mark_changed!(flags, PROP_RING_OUTER_START_ALPHA, self.ring.outer_start_alpha);
        mark_changed!(flags, PROP_RING_OUTER_END_ALPHA, self.ring.outer_end_alpha);
        mark_changed!(flags, PROP_RING_HAS_TICK_MARKS, self.ring.has_tick_marks);
        mark_changed!(flags, PROP_RING_MAJOR_TICK_MARKS_ANGLE, self.ring.major_tick_marks_angle);
        mark_changed!(flags, PROP_RING_MINOR_TICK_MARKS_ANGLE, self.ring.minor_tick_marks_angle);
        mark_changed!(flags, PROP_RING_MAJOR_TICK_MARKS_LENGTH, self.ring.major_tick_marks_length);
        mark_changed!(flags, PROP_RING_MINOR_TICK_MARKS_LENGTH, self.ring.minor_tick_marks_length);
        mark_changed!(flags, PROP_RING_MAJOR_TICK_MARKS_COLOR, self.ring.major_tick_marks_color);
        mark_changed!(flags, PROP_RING_MINOR_TICK_MARKS_COLOR, self.ring.minor_tick_marks_color);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(copy data, ctx, PROP_GIZMO_TYPE, self.gizmo_type, append_u32_value);
        append_property!(copy data, ctx, PROP_RING_START_ANGLE, self.ring.start_angle, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_END_ANGLE, self.ring.end_angle, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_INNER_RADIUS, self.ring.inner_radius, append_f32_value);
        append_property!(ref data, ctx, PROP_RING_INNER_START_COLOR, self.ring.inner_start_color, append_color_value);
        append_property!(ref data, ctx, PROP_RING_INNER_END_COLOR, self.ring.inner_end_color, append_color_value);
        append_property!(ref data, ctx, PROP_RING_OUTER_START_COLOR, self.ring.outer_start_color, append_color_value);
        append_property!(ref data, ctx, PROP_RING_OUTER_END_COLOR, self.ring.outer_end_color, append_color_value);
        append_property!(copy data, ctx, PROP_RING_INNER_START_ALPHA, self.ring.inner_start_alpha, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_INNER_END_ALPHA, self.ring.inner_end_alpha, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_OUTER_START_ALPHA, self.ring.outer_start_alpha, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_OUTER_END_ALPHA, self.ring.outer_end_alpha, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_HAS_TICK_MARKS, self.ring.has_tick_marks, append_bool_value);
        append_property!(copy data, ctx, PROP_RING_MAJOR_TICK_MARKS_ANGLE, self.ring.major_tick_marks_angle, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_MINOR_TICK_MARKS_ANGLE, self.ring.minor_tick_marks_angle, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_MAJOR_TICK_MARKS_LENGTH, self.ring.major_tick_marks_length, append_f32_value);
        append_property!(copy data, ctx, PROP_RING_MINOR_TICK_MARKS_LENGTH, self.ring.minor_tick_marks_length, append_f32_value);
        append_property!(ref data, ctx, PROP_RING_MAJOR_TICK_MARKS_COLOR, self.ring.major_tick_marks_color, append_color_value);
        append_property!(ref data, ctx, PROP_RING_MINOR_TICK_MARKS_COLOR, self.ring.minor_tick_marks_color, append_color_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_GIZMO_TYPE, block.gizmo_type, read_u32_le);
        read_property!(reader, flags, PROP_RING_START_ANGLE, block.ring.start_angle, read_f32_le);
        read_property!(reader, flags, PROP_RING_END_ANGLE, block.ring.end_angle, read_f32_le);
        read_property!(reader, flags, PROP_RING_INNER_RADIUS, block.ring.inner_radius, read_f32_le);
        read_property!(reader, flags, PROP_RING_INNER_START_COLOR, block.ring.inner_start_color, read_color);
        read_property!(reader, flags, PROP_RING_INNER_END_COLOR, block.ring.inner_end_color, read_color);
        read_property!(reader, flags, PROP_RING_OUTER_START_COLOR, block.ring.outer_start_color, read_color);
        read_property!(reader, flags, PROP_RING_OUTER_END_COLOR, block.ring.outer_end_color, read_color);
        read_property!(reader, flags, PROP_RING_INNER_START_ALPHA, block.ring.inner_start_alpha, read_f32_le);
        read_property!(reader, flags, PROP_RING_INNER_END_ALPHA, block.ring.inner_end_alpha, read_f32_le);
        read_property!(reader, flags, PROP_RING_OUTER_START_ALPHA, block.ring.outer_start_alpha, read_f32_le);
        read_property!(reader, flags, PROP_RING_OUTER_END_ALPHA, block.ring.outer_end_alpha, read_f32_le);
        read_property!(reader, flags, PROP_RING_HAS_TICK_MARKS, block.ring.has_tick_marks, read_bool);
        read_property!(reader, flags, PROP_RING_MAJOR_TICK_MARKS_ANGLE, block.ring.major_tick_marks_angle, read_f32_le);
        read_property!(reader, flags, PROP_RING_MINOR_TICK_MARKS_ANGLE, block.ring.minor_tick_marks_angle, read_f32_le);
        read_property!(reader, flags, PROP_RING_MAJOR_TICK_MARKS_LENGTH, block.ring.major_tick_marks_length, read_f32_le);
        read_property!(reader, flags, PROP_RING_MINOR_TICK_MARKS_LENGTH, block.ring.minor_tick_marks_length, read_f32_le);
        read_property!(reader, flags, PROP_RING_MAJOR_TICK_MARKS_COLOR, block.ring.major_tick_marks_color, read_color);
        read_property!(reader, flags, PROP_RING_MINOR_TICK_MARKS_COLOR, block.ring.minor_tick_marks_color, read_color);
        Ok(block)
    }
}
