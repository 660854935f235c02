//! Zone entity block, including the keylight, ambient light, skybox, haze
//! and bloom property groups

use skyloft_support::math::{Color, Vec3};
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_KEYLIGHT_COLOR: PropertyIndex = derived(0);
pub const PROP_KEYLIGHT_INTENSITY: PropertyIndex = derived(1);
pub const PROP_KEYLIGHT_DIRECTION: PropertyIndex = derived(2);
pub const PROP_KEYLIGHT_CAST_SHADOW: PropertyIndex = derived(3);
pub const PROP_KEYLIGHT_SHADOW_BIAS: PropertyIndex = derived(4);
pub const PROP_KEYLIGHT_SHADOW_MAX_DISTANCE: PropertyIndex = derived(5);
pub const PROP_AMBIENT_LIGHT_INTENSITY: PropertyIndex = derived(6);
pub const PROP_AMBIENT_LIGHT_URL: PropertyIndex = derived(7);
pub const PROP_SKYBOX_COLOR: PropertyIndex = derived(8);
pub const PROP_SKYBOX_URL: PropertyIndex = derived(9);
pub const PROP_HAZE_RANGE: PropertyIndex = derived(10);
pub const PROP_HAZE_COLOR: PropertyIndex = derived(11);
pub const PROP_HAZE_GLARE_COLOR: PropertyIndex = derived(12);
pub const PROP_HAZE_ENABLE_GLARE: PropertyIndex = derived(13);
pub const PROP_HAZE_GLARE_ANGLE: PropertyIndex = derived(14);
pub const PROP_HAZE_ALTITUDE_EFFECT: PropertyIndex = derived(15);
pub const PROP_HAZE_CEILING: PropertyIndex = derived(16);
pub const PROP_HAZE_BASE_REF: PropertyIndex = derived(17);
pub const PROP_HAZE_BACKGROUND_BLEND: PropertyIndex = derived(18);
pub const PROP_HAZE_ATTENUATE_KEYLIGHT: PropertyIndex = derived(19);
pub const PROP_HAZE_KEYLIGHT_RANGE: PropertyIndex = derived(20);
pub const PROP_HAZE_KEYLIGHT_ALTITUDE: PropertyIndex = derived(21);
pub const PROP_BLOOM_INTENSITY: PropertyIndex = derived(22);
pub const PROP_BLOOM_THRESHOLD: PropertyIndex = derived(23);
pub const PROP_BLOOM_SIZE: PropertyIndex = derived(24);
pub const PROP_FLYING_ALLOWED: PropertyIndex = derived(25);
pub const PROP_GHOSTING_ALLOWED: PropertyIndex = derived(26);
pub const PROP_FILTER_URL: PropertyIndex = derived(27);
pub const PROP_KEY_LIGHT_MODE: PropertyIndex = derived(28);
pub const PROP_AMBIENT_LIGHT_MODE: PropertyIndex = derived(29);
pub const PROP_SKYBOX_MODE: PropertyIndex = derived(30);
pub const PROP_HAZE_MODE: PropertyIndex = derived(31);
pub const PROP_BLOOM_MODE: PropertyIndex = derived(32);
pub const PROP_AVATAR_PRIORITY: PropertyIndex = derived(33);
pub const PROP_SCREENSHARE: PropertyIndex = derived(34);

/// The keylight property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyLightProperties {
    pub color: Option<Color>,
    pub intensity: Option<f32>,
    pub direction: Option<Vec3>,
    pub cast_shadows: Option<bool>,
    pub shadow_bias: Option<f32>,
    pub shadow_max_distance: Option<f32>,
}

/// The ambient light property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmbientLightProperties {
    pub intensity: Option<f32>,
    pub url: Option<String>,
}

/// The skybox property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkyboxProperties {
    pub color: Option<Color>,
    pub url: Option<String>,
}

/// The haze property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HazeProperties {
    pub range: Option<f32>,
    pub color: Option<Color>,
    pub glare_color: Option<Color>,
    pub enable_glare: Option<bool>,
    pub glare_angle: Option<f32>,
    pub altitude_effect: Option<bool>,
    pub ceiling: Option<f32>,
    pub base: Option<f32>,
    pub background_blend: Option<f32>,
    pub attenuate_keylight: Option<bool>,
    pub keylight_range: Option<f32>,
    pub keylight_altitude: Option<f32>,
}

/// The bloom property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BloomProperties {
    pub intensity: Option<f32>,
    pub threshold: Option<f32>,
    pub size: Option<f32>,
}

/// Properties specific to zone entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneProperties {
    pub keylight: KeyLightProperties,
    pub ambient: AmbientLightProperties,
    pub skybox: SkyboxProperties,
    pub haze: HazeProperties,
    pub bloom: BloomProperties,
    pub flying_allowed: Option<bool>,
    pub ghosting_allowed: Option<bool>,
    pub filter_url: Option<String>,
    pub key_light_mode: Option<u32>,
    pub ambient_light_mode: Option<u32>,
    pub skybox_mode: Option<u32>,
    pub haze_mode: Option<u32>,
    pub bloom_mode: Option<u32>,
    pub avatar_priority: Option<u32>,
    pub screenshare: Option<u32>,
}

impl ZoneProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_KEYLIGHT_COLOR, self.keylight.color);
        mark_changed!(flags, PROP_KEYLIGHT_INTENSITY, self.keylight.intensity);
        mark_changed!(flags, PROP_KEYLIGHT_DIRECTION, self.keylight.direction);
        mark_changed!(flags, PROP_KEYLIGHT_CAST_SHADOW, self.keylight.cast_shadows);
        mark_changed!(flags, PROP_KEYLIGHT_SHADOW_BIAS, self.keylight.shadow_bias);
        mark_changed!(flags, PROP_KEYLIGHT_SHADOW_MAX_DISTANCE, self.keylight.shadow_max_distance);
        mark_changed!(flags, PROP_AMBIENT_LIGHT_INTENSITY, self.ambient.intensity);
        mark_changed!(flags, PROP_AMBIENT_LIGHT_URL, self.ambient.url);
        mark_changed!(flags, PROP_SKYBOX_COLOR, self.skybox.color);
        mark_changed!(flags, PROP_SKYBOX_URL, self.skybox.url);
        mark_changed!(flags, PROP_HAZE_RANGE, self.haze.range);
        mark_changed!(flags, PROP_HAZE_COLOR, self.haze.color);
        mark_changed!(flags, PROP_HAZE_GLARE_COLOR, self.haze.glare_color);
        mark_changed!(flags, PROP_HAZE_ENABLE_GLARE, self.haze.enable_glare);
        mark_changed!(flags, PROP_HAZE_GLARE_ANGLE, self.haze.glare_angle);
        mark_changed!(flags, PROP_HAZE_ALTITUDE_EFFECT, self.haze.altitude_effect);
        mark_changed!(flags, PROP_HAZE_CEILING, self.haze.ceiling);
        mark_changed!(flags, PROP_HAZE_BASE_REF, self.haze.base);
        mark_changed!(flags, PROP_HAZE_BACKGROUND_BLEND, self.haze.background_blend);
        mark_changed!(flags, PROP_HAZE_ATTENUATE_KEYLIGHT, self.haze.attenuate_keylight);
        mark_changed!(flags, PROP_HAZE_KEYLIGHT_RANGE, self.haze.keylight_range);
        mark_changed!(flags, PROP_HAZE_KEYLIGHT_ALTITUDE, self.haze.keylight_altitude);
        mark_changed!(flags, PROP_BLOOM_INTENSITY, self.bloom.intensity);
        mark_changed!(flags, PROP_BLOOM_THRESHOLD, self.bloom.threshold);
        mark_changed!(flags, PROP_BLOOM_SIZE, self.bloom.size);
        mark_changed!(flags, PROP_FLYING_ALLOWED, self.flying_allowed);
        mark_changed!(flags, PROP_GHOSTING_ALLOWED, self.ghosting_allowed);
        mark_changed!(flags, PROP_FILTER_URL, self.filter_url);
        mark_changed!(flags, PROP_KEY_LIGHT_MODE, self.key_light_mode);
        mark_changed!(flags, PROP_AMBIENT_LIGHT_MODE, self.ambient_light_mode);
        mark_changed!(flags, PROP_SKYBOX_MODE, self.skybox_mode);
        mark_changed!(flags, PROP_HAZE_MODE, self.haze_mode);
        mark_changed!(flags, PROP_BLOOM_MODE, self.bloom_mode);
        mark_changed!(flags, PROP_AVATAR_PRIORITY, self.avatar_priority);
        mark_changed!(flags, PROP_SCREENSHARE, self.screenshare);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_KEYLIGHT_COLOR, self.keylight.color, append_color_value);
        append_property!(copy data, ctx, PROP_KEYLIGHT_INTENSITY, self.keylight.intensity, append_f32_value);
        append_property!(ref data, ctx, PROP_KEYLIGHT_DIRECTION, self.keylight.direction, append_vec3_value);
        append_property!(copy data, ctx, PROP_KEYLIGHT_CAST_SHADOW, self.keylight.cast_shadows, append_bool_value);
        append_property!(copy data, ctx, PROP_KEYLIGHT_SHADOW_BIAS, self.keylight.shadow_bias, append_f32_value);
        append_property!(copy data, ctx, PROP_KEYLIGHT_SHADOW_MAX_DISTANCE, self.keylight.shadow_max_distance, append_f32_value);
        append_property!(copy data, ctx, PROP_AMBIENT_LIGHT_INTENSITY, self.ambient.intensity, append_f32_value);
        append_property!(ref data, ctx, PROP_AMBIENT_LIGHT_URL, self.ambient.url, append_string_value);
        append_property!(ref data, ctx, PROP_SKYBOX_COLOR, self.skybox.color, append_color_value);
        append_property!(ref data, ctx, PROP_SKYBOX_URL, self.skybox.url, append_string_value);
        append_property!(copy data, ctx, PROP_HAZE_RANGE, self.haze.range, append_f32_value);
        append_property!(ref data, ctx, PROP_HAZE_COLOR, self.haze.color, append_color_value);
        append_property!(ref data, ctx, PROP_HAZE_GLARE_COLOR, self.haze.glare_color, append_color_value);
        append_property!(copy data, ctx, PROP_HAZE_ENABLE_GLARE, self.haze.enable_glare, append_bool_value);
        append_property!(copy data, ctx, PROP_HAZE_GLARE_ANGLE, self.haze.glare_angle, append_f32_value);
        append_property!(copy data, ctx, PROP_HAZE_ALTITUDE_EFFECT, self.haze.altitude_effect, append_bool_value);
        append_property!(copy data, ctx, PROP_HAZE_CEILING, self.haze.ceiling, append_f32_value);
        append_property!(copy data, ctx, PROP_HAZE_BASE_REF, self.haze.base, append_f32_value);
        append_property!(copy data, ctx, PROP_HAZE_BACKGROUND_BLEND, self.haze.background_blend, append_f32_value);
        append_property!(copy data, ctx, PROP_HAZE_ATTENUATE_KEYLIGHT, self.haze.attenuate_keylight, append_bool_value);
        append_property!(copy data, ctx, PROP_HAZE_KEYLIGHT_RANGE, self.haze.keylight_range, append_f32_value);
        append_property!(copy data, ctx, PROP_HAZE_KEYLIGHT_ALTITUDE, self.haze.keylight_altitude, append_f32_value);
        append_property!(copy data, ctx, PROP_BLOOM_INTENSITY, self.bloom.intensity, append_f32_value);
        append_property!(copy data, ctx, PROP_BLOOM_THRESHOLD, self.bloom.threshold, append_f32_value);
        append_property!(copy data, ctx, PROP_BLOOM_SIZE, self.bloom.size, append_f32_value);
        append_property!(copy data, ctx, PROP_FLYING_ALLOWED, self.flying_allowed, append_bool_value);
        append_property!(copy data, ctx, PROP_GHOSTING_ALLOWED, self.ghosting_allowed, append_bool_value);
        append_property!(ref data, ctx, PROP_FILTER_URL, self.filter_url, append_string_value);
        append_property!(copy data, ctx, PROP_KEY_LIGHT_MODE, self.key_light_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_AMBIENT_LIGHT_MODE, self.ambient_light_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_SKYBOX_MODE, self.skybox_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_HAZE_MODE, self.haze_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_BLOOM_MODE, self.bloom_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_AVATAR_PRIORITY, self.avatar_priority, append_u32_value);
        append_property!(copy data, ctx, PROP_SCREENSHARE, self.screenshare, append_u32_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_KEYLIGHT_COLOR, block.keylight.color, read_color);
        read_property!(reader, flags, PROP_KEYLIGHT_INTENSITY, block.keylight.intensity, read_f32_le);
        read_property!(reader, flags, PROP_KEYLIGHT_DIRECTION, block.keylight.direction, read_vec3);
        read_property!(reader, flags, PROP_KEYLIGHT_CAST_SHADOW, block.keylight.cast_shadows, read_bool);
        read_property!(reader, flags, PROP_KEYLIGHT_SHADOW_BIAS, block.keylight.shadow_bias, read_f32_le);
        read_property!(reader, flags, PROP_KEYLIGHT_SHADOW_MAX_DISTANCE, block.keylight.shadow_max_distance, read_f32_le);
        read_property!(reader, flags, PROP_AMBIENT_LIGHT_INTENSITY, block.ambient.intensity, read_f32_le);
        read_property!(reader, flags, PROP_AMBIENT_LIGHT_URL, block.ambient.url, read_string);
        read_property!(reader, flags, PROP_SKYBOX_COLOR, block.skybox.color, read_color);
        read_property!(reader, flags, PROP_SKYBOX_URL, block.skybox.url, read_string);
        read_property!(reader, flags, PROP_HAZE_RANGE, block.haze.range, read_f32_le);
        read_property!(reader, flags, PROP_HAZE_COLOR, block.haze.color, read_color);
        read_property!(reader, flags, PROP_HAZE_GLARE_COLOR, block.haze.glare_color, read_color);
        read_property!(reader, flags, PROP_HAZE_ENABLE_GLARE, block.haze.enable_glare, read_bool);
        read_property!(reader, flags, PROP_HAZE_GLARE_ANGLE, block.haze.glare_angle, read_f32_le);
        read_property!(reader, flags, PROP_HAZE_ALTITUDE_EFFECT, block.haze.altitude_effect, read_bool);
        read_property!(reader, flags, PROP_HAZE_CEILING, block.haze.ceiling, read_f32_le);
        read_property!(reader, flags, PROP_HAZE_BASE_REF, block.haze.base, read_f32_le);
        read_property!(reader, flags, PROP_HAZE_BACKGROUND_BLEND, block.haze.background_blend, read_f32_le);
        read_property!(reader, flags, PROP_HAZE_ATTENUATE_KEYLIGHT, block.haze.attenuate_keylight, read_bool);
        read_property!(reader, flags, PROP_HAZE_KEYLIGHT_RANGE, block.haze.keylight_range, read_f32_le);
        read_property!(reader, flags, PROP_HAZE_KEYLIGHT_ALTITUDE, block.haze.keylight_altitude, read_f32_le);
        read_property!(reader, flags, PROP_BLOOM_INTENSITY, block.bloom.intensity, read_f32_le);
        read_property!(reader, flags, PROP_BLOOM_THRESHOLD, block.bloom.threshold, read_f32_le);
        read_property!(reader, flags, PROP_BLOOM_SIZE, block.bloom.size, read_f32_le);
        read_property!(reader, flags, PROP_FLYING_ALLOWED, block.flying_allowed, read_bool);
        read_property!(reader, flags, PROP_GHOSTING_ALLOWED, block.ghosting_allowed, read_bool);
        read_property!(reader, flags, PROP_FILTER_URL, block.filter_url, read_string);
        read_property!(reader, flags, PROP_KEY_LIGHT_MODE, block.key_light_mode, read_u32_le);
        read_property!(reader, flags, PROP_AMBIENT_LIGHT_MODE, block.ambient_light_mode, read_u32_le);
        read_property!(reader, flags, PROP_SKYBOX_MODE, block.skybox_mode, read_u32_le);
        read_property!(reader, flags, PROP_HAZE_MODE, block.haze_mode, read_u32_le);
        read_property!(reader, flags, PROP_BLOOM_MODE, block.bloom_mode, read_u32_le);
        read_property!(reader, flags, PROP_AVATAR_PRIORITY, block.avatar_priority, read_u32_le);
        read_property!(reader, flags, PROP_SCREENSHARE, block.screenshare, read_u32_le);
        Ok(block)
    }
}
