//! Shape entity block (also used by Box and Sphere)

use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_SHAPE: PropertyIndex = derived(0);

/// Properties specific to shape entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeProperties {
    /// Shape name, e.g. "Cube" or "Sphere".
    pub shape: Option<String>,
}

impl ShapeProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_SHAPE, self.shape);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_SHAPE, self.shape, append_string_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_SHAPE, block.shape, read_string);
        Ok(block)
    }
}
