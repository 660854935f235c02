//! Light entity block

use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_IS_SPOTLIGHT: PropertyIndex = derived(0);
pub const PROP_INTENSITY: PropertyIndex = derived(1);
pub const PROP_EXPONENT: PropertyIndex = derived(2);
pub const PROP_CUTOFF: PropertyIndex = derived(3);
pub const PROP_FALLOFF_RADIUS: PropertyIndex = derived(4);

/// Properties specific to light entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightProperties {
    pub is_spotlight: Option<bool>,
    pub intensity: Option<f32>,
    pub exponent: Option<f32>,
    pub cutoff: Option<f32>,
    pub falloff_radius: Option<f32>,
}

impl LightProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_IS_SPOTLIGHT, self.is_spotlight);
        mark_changed!(flags, PROP_INTENSITY, self.intensity);
        mark_changed!(flags, PROP_EXPONENT, self.exponent);
        mark_changed!(flags, PROP_CUTOFF, self.cutoff);
        mark_changed!(flags, PROP_FALLOFF_RADIUS, self.falloff_radius);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(copy data, ctx, PROP_IS_SPOTLIGHT, self.is_spotlight, append_bool_value);
        append_property!(copy data, ctx, PROP_INTENSITY, self.intensity, append_f32_value);
        append_property!(copy data, ctx, PROP_EXPONENT, self.exponent, append_f32_value);
        append_property!(copy data, ctx, PROP_CUTOFF, self.cutoff, append_f32_value);
        append_property!(copy data, ctx, PROP_FALLOFF_RADIUS, self.falloff_radius, append_f32_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_IS_SPOTLIGHT, block.is_spotlight, read_bool);
        read_property!(reader, flags, PROP_INTENSITY, block.intensity, read_f32_le);
        read_property!(reader, flags, PROP_EXPONENT, block.exponent, read_f32_le);
        read_property!(reader, flags, PROP_CUTOFF, block.cutoff, read_f32_le);
        read_property!(reader, flags, PROP_FALLOFF_RADIUS, block.falloff_radius, read_f32_le);
        Ok(block)
    }
}
