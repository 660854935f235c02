//! Image entity block

use skyloft_support::math::Rect;
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_IMAGE_URL: PropertyIndex = derived(0);
pub const PROP_EMISSIVE: PropertyIndex = derived(1);
pub const PROP_KEEP_ASPECT_RATIO: PropertyIndex = derived(2);
pub const PROP_SUB_IMAGE: PropertyIndex = derived(3);

/// Properties specific to image entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageProperties {
    pub image_url: Option<String>,
    pub emissive: Option<bool>,
    pub keep_aspect_ratio: Option<bool>,
    pub sub_image: Option<Rect>,
}

impl ImageProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_IMAGE_URL, self.image_url);
        mark_changed!(flags, PROP_EMISSIVE, self.emissive);
        mark_changed!(flags, PROP_KEEP_ASPECT_RATIO, self.keep_aspect_ratio);
        mark_changed!(flags, PROP_SUB_IMAGE, self.sub_image);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_IMAGE_URL, self.image_url, append_string_value);
        append_property!(copy data, ctx, PROP_EMISSIVE, self.emissive, append_bool_value);
        append_property!(copy data, ctx, PROP_KEEP_ASPECT_RATIO, self.keep_aspect_ratio, append_bool_value);
        append_property!(ref data, ctx, PROP_SUB_IMAGE, self.sub_image, append_rect_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_IMAGE_URL, block.image_url, read_string);
        read_property!(reader, flags, PROP_EMISSIVE, block.emissive, read_bool);
        read_property!(reader, flags, PROP_KEEP_ASPECT_RATIO, block.keep_aspect_ratio, read_bool);
        read_property!(reader, flags, PROP_SUB_IMAGE, block.sub_image, read_rect);
        Ok(block)
    }
}
