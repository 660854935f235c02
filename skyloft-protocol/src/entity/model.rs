//! Model entity block, including the animation property group

use skyloft_support::math::{Quat, Vec3};
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_MODEL_URL: PropertyIndex = derived(0);
pub const PROP_MODEL_SCALE: PropertyIndex = derived(1);
pub const PROP_JOINT_ROTATIONS: PropertyIndex = derived(2);
pub const PROP_JOINT_TRANSLATIONS: PropertyIndex = derived(3);
pub const PROP_RELAY_PARENT_JOINTS: PropertyIndex = derived(4);
pub const PROP_GROUP_CULLED: PropertyIndex = derived(5);
pub const PROP_BLENDSHAPE_COEFFICIENTS: PropertyIndex = derived(6);
pub const PROP_USE_ORIGINAL_PIVOT: PropertyIndex = derived(7);
pub const PROP_ANIMATION_URL: PropertyIndex = derived(8);
pub const PROP_ANIMATION_ALLOW_TRANSLATION: PropertyIndex = derived(9);
pub const PROP_ANIMATION_FPS: PropertyIndex = derived(10);
pub const PROP_ANIMATION_FRAME_INDEX: PropertyIndex = derived(11);
pub const PROP_ANIMATION_PLAYING: PropertyIndex = derived(12);
pub const PROP_ANIMATION_LOOP: PropertyIndex = derived(13);
pub const PROP_ANIMATION_FIRST_FRAME: PropertyIndex = derived(14);
pub const PROP_ANIMATION_LAST_FRAME: PropertyIndex = derived(15);
pub const PROP_ANIMATION_HOLD: PropertyIndex = derived(16);

/// The animation property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationProperties {
    pub url: Option<String>,
    pub allow_translation: Option<bool>,
    pub fps: Option<f32>,
    pub frame_index: Option<f32>,
    pub playing: Option<bool>,
    pub looping: Option<bool>,
    pub first_frame: Option<f32>,
    pub last_frame: Option<f32>,
    pub hold: Option<bool>,
}

/// Properties specific to model entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelProperties {
    pub model_url: Option<String>,
    pub model_scale: Option<Vec3>,
    pub joint_rotations: Option<Vec<Quat>>,
    pub joint_translations: Option<Vec<Vec3>>,
    pub relay_parent_joints: Option<bool>,
    pub group_culled: Option<bool>,
    pub blendshape_coefficients: Option<String>,
    pub use_original_pivot: Option<bool>,
    pub animation: AnimationProperties,
}

impl ModelProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_MODEL_URL, self.model_url);
        mark_changed!(flags, PROP_MODEL_SCALE, self.model_scale);
        mark_changed!(flags, PROP_JOINT_ROTATIONS, self.joint_rotations);
        mark_changed!(flags, PROP_JOINT_TRANSLATIONS, self.joint_translations);
        mark_changed!(flags, PROP_RELAY_PARENT_JOINTS, self.relay_parent_joints);
        mark_changed!(flags, PROP_GROUP_CULLED, self.group_culled);
        mark_changed!(flags, PROP_BLENDSHAPE_COEFFICIENTS, self.blendshape_coefficients);
        mark_changed!(flags, PROP_USE_ORIGINAL_PIVOT, self.use_original_pivot);
        mark_changed!(flags, PROP_ANIMATION_URL, self.animation.url);
        mark_changed!(flags, PROP_ANIMATION_ALLOW_TRANSLATION, self.animation.allow_translation);
        mark_changed!(flags, PROP_ANIMATION_FPS, self.animation.fps);
        mark_changed!(flags, PROP_ANIMATION_FRAME_INDEX, self.animation.frame_index);
        mark_changed!(flags, PROP_ANIMATION_PLAYING, self.animation.playing);
        mark_changed!(flags, PROP_ANIMATION_LOOP, self.animation.looping);
        mark_changed!(flags, PROP_ANIMATION_FIRST_FRAME, self.animation.first_frame);
        mark_changed!(flags, PROP_ANIMATION_LAST_FRAME, self.animation.last_frame);
        mark_changed!(flags, PROP_ANIMATION_HOLD, self.animation.hold);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_MODEL_URL, self.model_url, append_string_value);
        append_property!(ref data, ctx, PROP_MODEL_SCALE, self.model_scale, append_vec3_value);
        append_property!(ref data, ctx, PROP_JOINT_ROTATIONS, self.joint_rotations, append_quat_array_value);
        append_property!(ref data, ctx, PROP_JOINT_TRANSLATIONS, self.joint_translations, append_vec3_array_value);
        append_property!(copy data, ctx, PROP_RELAY_PARENT_JOINTS, self.relay_parent_joints, append_bool_value);
        append_property!(copy data, ctx, PROP_GROUP_CULLED, self.group_culled, append_bool_value);
        append_property!(ref data, ctx, PROP_BLENDSHAPE_COEFFICIENTS, self.blendshape_coefficients, append_string_value);
        append_property!(copy data, ctx, PROP_USE_ORIGINAL_PIVOT, self.use_original_pivot, append_bool_value);
        append_property!(ref data, ctx, PROP_ANIMATION_URL, self.animation.url, append_string_value);
        append_property!(copy data, ctx, PROP_ANIMATION_ALLOW_TRANSLATION, self.animation.allow_translation, append_bool_value);
        append_property!(copy data, ctx, PROP_ANIMATION_FPS, self.animation.fps, append_f32_value);
        append_property!(copy data, ctx, PROP_ANIMATION_FRAME_INDEX, self.animation.frame_index, append_f32_value);
        append_property!(copy data, ctx, PROP_ANIMATION_PLAYING, self.animation.playing, append_bool_value);
        append_property!(copy data, ctx, PROP_ANIMATION_LOOP, self.animation.looping, append_bool_value);
        append_property!(copy data, ctx, PROP_ANIMATION_FIRST_FRAME, self.animation.first_frame, append_f32_value);
        append_property!(copy data, ctx, PROP_ANIMATION_LAST_FRAME, self.animation.last_frame, append_f32_value);
        append_property!(copy data, ctx, PROP_ANIMATION_HOLD, self.animation.hold, append_bool_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_MODEL_URL, block.model_url, read_string);
        read_property!(reader, flags, PROP_MODEL_SCALE, block.model_scale, read_vec3);
        read_property!(reader, flags, PROP_JOINT_ROTATIONS, block.joint_rotations, read_quat_array);
        read_property!(reader, flags, PROP_JOINT_TRANSLATIONS, block.joint_translations, read_vec3_array);
        read_property!(reader, flags, PROP_RELAY_PARENT_JOINTS, block.relay_parent_joints, read_bool);
        read_property!(reader, flags, PROP_GROUP_CULLED, block.group_culled, read_bool);
        read_property!(reader, flags, PROP_BLENDSHAPE_COEFFICIENTS, block.blendshape_coefficients, read_string);
        read_property!(reader, flags, PROP_USE_ORIGINAL_PIVOT, block.use_original_pivot, read_bool);
        read_property!(reader, flags, PROP_ANIMATION_URL, block.animation.url, read_string);
        read_property!(reader, flags, PROP_ANIMATION_ALLOW_TRANSLATION, block.animation.allow_translation, read_bool);
        read_property!(reader, flags, PROP_ANIMATION_FPS, block.animation.fps, read_f32_le);
        read_property!(reader, flags, PROP_ANIMATION_FRAME_INDEX, block.animation.frame_index, read_f32_le);
        read_property!(reader, flags, PROP_ANIMATION_PLAYING, block.animation.playing, read_bool);
        read_property!(reader, flags, PROP_ANIMATION_LOOP, block.animation.looping, read_bool);
        read_property!(reader, flags, PROP_ANIMATION_FIRST_FRAME, block.animation.first_frame, read_f32_le);
        read_property!(reader, flags, PROP_ANIMATION_LAST_FRAME, block.animation.last_frame, read_f32_le);
        read_property!(reader, flags, PROP_ANIMATION_HOLD, block.animation.hold, read_bool);
        Ok(block)
    }
}
