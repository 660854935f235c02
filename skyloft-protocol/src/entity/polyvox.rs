//! PolyVox entity block

use uuid::Uuid;

use skyloft_support::math::Vec3;
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_VOXEL_VOLUME_SIZE: PropertyIndex = derived(0);
pub const PROP_VOXEL_DATA: PropertyIndex = derived(1);
pub const PROP_VOXEL_SURFACE_STYLE: PropertyIndex = derived(2);
pub const PROP_X_TEXTURE_URL: PropertyIndex = derived(3);
pub const PROP_Y_TEXTURE_URL: PropertyIndex = derived(4);
pub const PROP_Z_TEXTURE_URL: PropertyIndex = derived(5);
pub const PROP_X_N_NEIGHBOR_ID: PropertyIndex = derived(6);
pub const PROP_Y_N_NEIGHBOR_ID: PropertyIndex = derived(7);
pub const PROP_Z_N_NEIGHBOR_ID: PropertyIndex = derived(8);
pub const PROP_X_P_NEIGHBOR_ID: PropertyIndex = derived(9);
pub const PROP_Y_P_NEIGHBOR_ID: PropertyIndex = derived(10);
pub const PROP_Z_P_NEIGHBOR_ID: PropertyIndex = derived(11);

/// Properties specific to polyvox entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyVoxProperties {
    pub volume_size: Option<Vec3>,
    pub voxel_data: Option<Vec<u8>>,
    pub surface_style: Option<u16>,
    pub x_texture_url: Option<String>,
    pub y_texture_url: Option<String>,
    pub z_texture_url: Option<String>,
    pub x_n_neighbor_id: Option<Uuid>,
    pub y_n_neighbor_id: Option<Uuid>,
    pub z_n_neighbor_id: Option<Uuid>,
    pub x_p_neighbor_id: Option<Uuid>,
    pub y_p_neighbor_id: Option<Uuid>,
    pub z_p_neighbor_id: Option<Uuid>,
}

impl PolyVoxProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_VOXEL_VOLUME_SIZE, self.volume_size);
        mark_changed!(flags, PROP_VOXEL_DATA, self.voxel_data);
        mark_changed!(flags, PROP_VOXEL_SURFACE_STYLE, self.surface_style);
        mark_changed!(flags, PROP_X_TEXTURE_URL, self.x_texture_url);
        mark_changed!(flags, PROP_Y_TEXTURE_URL, self.y_texture_url);
        mark_changed!(flags, PROP_Z_TEXTURE_URL, self.z_texture_url);
        mark_changed!(flags, PROP_X_N_NEIGHBOR_ID, self.x_n_neighbor_id);
        mark_changed!(flags, PROP_Y_N_NEIGHBOR_ID, self.y_n_neighbor_id);
        mark_changed!(flags, PROP_Z_N_NEIGHBOR_ID, self.z_n_neighbor_id);
        mark_changed!(flags, PROP_X_P_NEIGHBOR_ID, self.x_p_neighbor_id);
        mark_changed!(flags, PROP_Y_P_NEIGHBOR_ID, self.y_p_neighbor_id);
        mark_changed!(flags, PROP_Z_P_NEIGHBOR_ID, self.z_p_neighbor_id);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_VOXEL_VOLUME_SIZE, self.volume_size, append_vec3_value);
        append_property!(ref data, ctx, PROP_VOXEL_DATA, self.voxel_data, append_byte_array_value);
        append_property!(copy data, ctx, PROP_VOXEL_SURFACE_STYLE, self.surface_style, append_u16_value);
        append_property!(ref data, ctx, PROP_X_TEXTURE_URL, self.x_texture_url, append_string_value);
        append_property!(ref data, ctx, PROP_Y_TEXTURE_URL, self.y_texture_url, append_string_value);
        append_property!(ref data, ctx, PROP_Z_TEXTURE_URL, self.z_texture_url, append_string_value);
        append_property!(ref data, ctx, PROP_X_N_NEIGHBOR_ID, self.x_n_neighbor_id, append_uuid_value);
        append_property!(ref data, ctx, PROP_Y_N_NEIGHBOR_ID, self.y_n_neighbor_id, append_uuid_value);
        append_property!(ref data, ctx, PROP_Z_N_NEIGHBOR_ID, self.z_n_neighbor_id, append_uuid_value);
        append_property!(ref data, ctx, PROP_X_P_NEIGHBOR_ID, self.x_p_neighbor_id, append_uuid_value);
        append_property!(ref data, ctx, PROP_Y_P_NEIGHBOR_ID, self.y_p_neighbor_id, append_uuid_value);
        append_property!(ref data, ctx, PROP_Z_P_NEIGHBOR_ID, self.z_p_neighbor_id, append_uuid_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_VOXEL_VOLUME_SIZE, block.volume_size, read_vec3);
        read_property!(reader, flags, PROP_VOXEL_DATA, block.voxel_data, read_byte_array);
        read_property!(reader, flags, PROP_VOXEL_SURFACE_STYLE, block.surface_style, read_u16_le);
        read_property!(reader, flags, PROP_X_TEXTURE_URL, block.x_texture_url, read_string);
        read_property!(reader, flags, PROP_Y_TEXTURE_URL, block.y_texture_url, read_string);
        read_property!(reader, flags, PROP_Z_TEXTURE_URL, block.z_texture_url, read_string);
        read_property!(reader, flags, PROP_X_N_NEIGHBOR_ID, block.x_n_neighbor_id, read_uuid);
        read_property!(reader, flags, PROP_Y_N_NEIGHBOR_ID, block.y_n_neighbor_id, read_uuid);
        read_property!(reader, flags, PROP_Z_N_NEIGHBOR_ID, block.z_n_neighbor_id, read_uuid);
        read_property!(reader, flags, PROP_X_P_NEIGHBOR_ID, block.x_p_neighbor_id, read_uuid);
        read_property!(reader, flags, PROP_Y_P_NEIGHBOR_ID, block.y_p_neighbor_id, read_uuid);
        read_property!(reader, flags, PROP_Z_P_NEIGHBOR_ID, block.z_p_neighbor_id, read_uuid);
        Ok(block)
    }
}
