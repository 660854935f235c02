//! Grid entity block

use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_GRID_FOLLOW_CAMERA: PropertyIndex = derived(0);
pub const PROP_MAJOR_GRID_EVERY: PropertyIndex = derived(1);
pub const PROP_MINOR_GRID_EVERY: PropertyIndex = derived(2);

/// Properties specific to grid entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridProperties {
    pub follow_camera: Option<bool>,
    pub major_grid_every: Option<u32>,
    pub minor_grid_every: Option<f32>,
}

impl GridProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_GRID_FOLLOW_CAMERA, self.follow_camera);
        mark_changed!(flags, PROP_MAJOR_GRID_EVERY, self.major_grid_every);
        mark_changed!(flags, PROP_MINOR_GRID_EVERY, self.minor_grid_every);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(copy data, ctx, PROP_GRID_FOLLOW_CAMERA, self.follow_camera, append_bool_value);
        append_property!(copy data, ctx, PROP_MAJOR_GRID_EVERY, self.major_grid_every, append_u32_value);
        append_property!(copy data, ctx, PROP_MINOR_GRID_EVERY, self.minor_grid_every, append_f32_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_GRID_FOLLOW_CAMERA, block.follow_camera, read_bool);
        read_property!(reader, flags, PROP_MAJOR_GRID_EVERY, block.major_grid_every, read_u32_le);
        read_property!(reader, flags, PROP_MINOR_GRID_EVERY, block.minor_grid_every, read_f32_le);
        Ok(block)
    }
}
