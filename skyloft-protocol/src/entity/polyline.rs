//! PolyLine entity block

use skyloft_support::math::Vec3;
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_LINE_POINTS: PropertyIndex = derived(0);
pub const PROP_STROKE_WIDTHS: PropertyIndex = derived(1);
pub const PROP_STROKE_NORMALS: PropertyIndex = derived(2);
pub const PROP_STROKE_COLORS: PropertyIndex = derived(3);
pub const PROP_IS_UV_MODE_STRETCH: PropertyIndex = derived(4);
pub const PROP_LINE_GLOW: PropertyIndex = derived(5);
pub const PROP_LINE_FACE_CAMERA: PropertyIndex = derived(6);

/// Properties specific to polyline entities.
///
/// Stroke widths and colors ride as packed byte arrays (widths in
/// centimeters, colors as RGB triplets), matching their render-side use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyLineProperties {
    pub line_points: Option<Vec<Vec3>>,
    pub stroke_widths: Option<Vec<u8>>,
    pub stroke_normals: Option<Vec<Vec3>>,
    pub stroke_colors: Option<Vec<u8>>,
    pub is_uv_mode_stretch: Option<bool>,
    pub glow: Option<bool>,
    pub face_camera: Option<bool>,
}

impl PolyLineProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_LINE_POINTS, self.line_points);
        mark_changed!(flags, PROP_STROKE_WIDTHS, self.stroke_widths);
        mark_changed!(flags, PROP_STROKE_NORMALS, self.stroke_normals);
        mark_changed!(flags, PROP_STROKE_COLORS, self.stroke_colors);
        mark_changed!(flags, PROP_IS_UV_MODE_STRETCH, self.is_uv_mode_stretch);
        mark_changed!(flags, PROP_LINE_GLOW, self.glow);
        mark_changed!(flags, PROP_LINE_FACE_CAMERA, self.face_camera);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_LINE_POINTS, self.line_points, append_vec3_array_value);
        append_property!(ref data, ctx, PROP_STROKE_WIDTHS, self.stroke_widths, append_byte_array_value);
        append_property!(ref data, ctx, PROP_STROKE_NORMALS, self.stroke_normals, append_vec3_array_value);
        append_property!(ref data, ctx, PROP_STROKE_COLORS, self.stroke_colors, append_byte_array_value);
        append_property!(copy data, ctx, PROP_IS_UV_MODE_STRETCH, self.is_uv_mode_stretch, append_bool_value);
        append_property!(copy data, ctx, PROP_LINE_GLOW, self.glow, append_bool_value);
        append_property!(copy data, ctx, PROP_LINE_FACE_CAMERA, self.face_camera, append_bool_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_LINE_POINTS, block.line_points, read_vec3_array);
        read_property!(reader, flags, PROP_STROKE_WIDTHS, block.stroke_widths, read_byte_array);
        read_property!(reader, flags, PROP_STROKE_NORMALS, block.stroke_normals, read_vec3_array);
        read_property!(reader, flags, PROP_STROKE_COLORS, block.stroke_colors, read_byte_array);
        read_property!(reader, flags, PROP_IS_UV_MODE_STRETCH, block.is_uv_mode_stretch, read_bool);
        read_property!(reader, flags, PROP_LINE_GLOW, block.glow, read_bool);
        read_property!(reader, flags, PROP_LINE_FACE_CAMERA, block.face_camera, read_bool);
        Ok(block)
    }
}
