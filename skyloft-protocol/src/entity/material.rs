//! Material entity block

use skyloft_support::math::Vec2;
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_MATERIAL_URL: PropertyIndex = derived(0);
pub const PROP_MATERIAL_MAPPING_MODE: PropertyIndex = derived(1);
pub const PROP_MATERIAL_PRIORITY: PropertyIndex = derived(2);
pub const PROP_PARENT_MATERIAL_NAME: PropertyIndex = derived(3);
pub const PROP_MATERIAL_MAPPING_POS: PropertyIndex = derived(4);
pub const PROP_MATERIAL_MAPPING_SCALE: PropertyIndex = derived(5);
pub const PROP_MATERIAL_MAPPING_ROT: PropertyIndex = derived(6);
pub const PROP_MATERIAL_DATA: PropertyIndex = derived(7);
pub const PROP_MATERIAL_REPEAT: PropertyIndex = derived(8);

/// Properties specific to material entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialProperties {
    pub material_url: Option<String>,
    pub mapping_mode: Option<u32>,
    pub priority: Option<u16>,
    pub parent_material_name: Option<String>,
    pub mapping_pos: Option<Vec2>,
    pub mapping_scale: Option<Vec2>,
    pub mapping_rot: Option<f32>,
    pub material_data: Option<String>,
    pub repeat: Option<bool>,
}

impl MaterialProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_MATERIAL_URL, self.material_url);
        mark_changed!(flags, PROP_MATERIAL_MAPPING_MODE, self.mapping_mode);
        mark_changed!(flags, PROP_MATERIAL_PRIORITY, self.priority);
        mark_changed!(flags, PROP_PARENT_MATERIAL_NAME, self.parent_material_name);
        mark_changed!(flags, PROP_MATERIAL_MAPPING_POS, self.mapping_pos);
        mark_changed!(flags, PROP_MATERIAL_MAPPING_SCALE, self.mapping_scale);
        mark_changed!(flags, PROP_MATERIAL_MAPPING_ROT, self.mapping_rot);
        mark_changed!(flags, PROP_MATERIAL_DATA, self.material_data);
        mark_changed!(flags, PROP_MATERIAL_REPEAT, self.repeat);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_MATERIAL_URL, self.material_url, append_string_value);
        append_property!(copy data, ctx, PROP_MATERIAL_MAPPING_MODE, self.mapping_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_MATERIAL_PRIORITY, self.priority, append_u16_value);
        append_property!(ref data, ctx, PROP_PARENT_MATERIAL_NAME, self.parent_material_name, append_string_value);
        append_property!(ref data, ctx, PROP_MATERIAL_MAPPING_POS, self.mapping_pos, append_vec2_value);
        append_property!(ref data, ctx, PROP_MATERIAL_MAPPING_SCALE, self.mapping_scale, append_vec2_value);
        append_property!(copy data, ctx, PROP_MATERIAL_MAPPING_ROT, self.mapping_rot, append_f32_value);
        append_property!(ref data, ctx, PROP_MATERIAL_DATA, self.material_data, append_string_value);
        append_property!(copy data, ctx, PROP_MATERIAL_REPEAT, self.repeat, append_bool_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_MATERIAL_URL, block.material_url, read_string);
        read_property!(reader, flags, PROP_MATERIAL_MAPPING_MODE, block.mapping_mode, read_u32_le);
        read_property!(reader, flags, PROP_MATERIAL_PRIORITY, block.priority, read_u16_le);
        read_property!(reader, flags, PROP_PARENT_MATERIAL_NAME, block.parent_material_name, read_string);
        read_property!(reader, flags, PROP_MATERIAL_MAPPING_POS, block.mapping_pos, read_vec2);
        read_property!(reader, flags, PROP_MATERIAL_MAPPING_SCALE, block.mapping_scale, read_vec2);
        read_property!(reader, flags, PROP_MATERIAL_MAPPING_ROT, block.mapping_rot, read_f32_le);
        read_property!(reader, flags, PROP_MATERIAL_DATA, block.material_data, read_string);
        read_property!(reader, flags, PROP_MATERIAL_REPEAT, block.repeat, read_bool);
        Ok(block)
    }
}
