//! Particle effect entity block

use skyloft_support::math::{Color, Quat, Vec3};
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_MAX_PARTICLES: PropertyIndex = derived(0);
pub const PROP_LIFESPAN: PropertyIndex = derived(1);
pub const PROP_EMITTING_PARTICLES: PropertyIndex = derived(2);
pub const PROP_EMIT_RATE: PropertyIndex = derived(3);
pub const PROP_EMIT_SPEED: PropertyIndex = derived(4);
pub const PROP_SPEED_SPREAD: PropertyIndex = derived(5);
pub const PROP_EMIT_ORIENTATION: PropertyIndex = derived(6);
pub const PROP_EMIT_DIMENSIONS: PropertyIndex = derived(7);
pub const PROP_EMIT_RADIUS_START: PropertyIndex = derived(8);
pub const PROP_POLAR_START: PropertyIndex = derived(9);
pub const PROP_POLAR_FINISH: PropertyIndex = derived(10);
pub const PROP_AZIMUTH_START: PropertyIndex = derived(11);
pub const PROP_AZIMUTH_FINISH: PropertyIndex = derived(12);
pub const PROP_EMIT_ACCELERATION: PropertyIndex = derived(13);
pub const PROP_ACCELERATION_SPREAD: PropertyIndex = derived(14);
pub const PROP_PARTICLE_RADIUS: PropertyIndex = derived(15);
pub const PROP_RADIUS_SPREAD: PropertyIndex = derived(16);
pub const PROP_RADIUS_START: PropertyIndex = derived(17);
pub const PROP_RADIUS_FINISH: PropertyIndex = derived(18);
pub const PROP_COLOR_SPREAD: PropertyIndex = derived(19);
pub const PROP_COLOR_START: PropertyIndex = derived(20);
pub const PROP_COLOR_FINISH: PropertyIndex = derived(21);
pub const PROP_ALPHA_SPREAD: PropertyIndex = derived(22);
pub const PROP_ALPHA_START: PropertyIndex = derived(23);
pub const PROP_ALPHA_FINISH: PropertyIndex = derived(24);
pub const PROP_EMITTER_SHOULD_TRAIL: PropertyIndex = derived(25);
pub const PROP_PARTICLE_SPIN: PropertyIndex = derived(26);
pub const PROP_SPIN_SPREAD: PropertyIndex = derived(27);
pub const PROP_SPIN_START: PropertyIndex = derived(28);
pub const PROP_SPIN_FINISH: PropertyIndex = derived(29);
pub const PROP_ROTATE_WITH_ENTITY: PropertyIndex = derived(30);

/// Properties specific to particle effect entities.
///
/// Start/finish colors interpolate in float space, so they ride as vec3
/// rather than 8-bit color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleEffectProperties {
    pub max_particles: Option<u32>,
    pub lifespan: Option<f32>,
    pub emitting: Option<bool>,
    pub emit_rate: Option<f32>,
    pub emit_speed: Option<f32>,
    pub speed_spread: Option<f32>,
    pub emit_orientation: Option<Quat>,
    pub emit_dimensions: Option<Vec3>,
    pub emit_radius_start: Option<f32>,
    pub polar_start: Option<f32>,
    pub polar_finish: Option<f32>,
    pub azimuth_start: Option<f32>,
    pub azimuth_finish: Option<f32>,
    pub emit_acceleration: Option<Vec3>,
    pub acceleration_spread: Option<Vec3>,
    pub particle_radius: Option<f32>,
    pub radius_spread: Option<f32>,
    pub radius_start: Option<f32>,
    pub radius_finish: Option<f32>,
    pub color_spread: Option<Color>,
    pub color_start: Option<Vec3>,
    pub color_finish: Option<Vec3>,
    pub alpha_spread: Option<f32>,
    pub alpha_start: Option<f32>,
    pub alpha_finish: Option<f32>,
    pub emitter_should_trail: Option<bool>,
    pub particle_spin: Option<f32>,
    pub spin_spread: Option<f32>,
    pub spin_start: Option<f32>,
    pub spin_finish: Option<f32>,
    pub rotate_with_entity: Option<bool>,
}

impl ParticleEffectProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_MAX_PARTICLES, self.max_particles);
        mark_changed!(flags, PROP_LIFESPAN, self.lifespan);
        mark_changed!(flags, PROP_EMITTING_PARTICLES, self.emitting);
        mark_changed!(flags, PROP_EMIT_RATE, self.emit_rate);
        mark_changed!(flags, PROP_EMIT_SPEED, self.emit_speed);
        mark_changed!(flags, PROP_SPEED_SPREAD, self.speed_spread);
        mark_changed!(flags, PROP_EMIT_ORIENTATION, self.emit_orientation);
        mark_changed!(flags, PROP_EMIT_DIMENSIONS, self.emit_dimensions);
        mark_changed!(flags, PROP_EMIT_RADIUS_START, self.emit_radius_start);
        mark_changed!(flags, PROP_POLAR_START, self.polar_start);
        mark_changed!(flags, PROP_POLAR_FINISH, self.polar_finish);
        mark_changed!(flags, PROP_AZIMUTH_START, self.azimuth_start);
        mark_changed!(flags, PROP_AZIMUTH_FINISH, self.azimuth_finish);
        mark_changed!(flags, PROP_EMIT_ACCELERATION, self.emit_acceleration);
        mark_changed!(flags, PROP_ACCELERATION_SPREAD, self.acceleration_spread);
        mark_changed!(flags, PROP_PARTICLE_RADIUS, self.particle_radius);
        mark_changed!(flags, PROP_RADIUS_SPREAD, self.radius_spread);
        mark_changed!(flags, PROP_RADIUS_START, self.radius_start);
        mark_changed!(flags, PROP_RADIUS_FINISH, self.radius_finish);
        mark_changed!(flags, PROP_COLOR_SPREAD, self.color_spread);
        mark_changed!(flags, PROP_COLOR_START, self.color_start);
        mark_changed!(flags, PROP_COLOR_FINISH, self.color_finish);
        mark_changed!(flags, PROP_ALPHA_SPREAD, self.alpha_spread);
        mark_changed!(flags, PROP_ALPHA_START, self.alpha_start);
        mark_changed!(flags, PROP_ALPHA_FINISH, self.alpha_finish);
        mark_changed!(flags, PROP_EMITTER_SHOULD_TRAIL, self.emitter_should_trail);
        mark_changed!(flags, PROP_PARTICLE_SPIN, self.particle_spin);
        mark_changed!(flags, PROP_SPIN_SPREAD, self.spin_spread);
        mark_changed!(flags, PROP_SPIN_START, self.spin_start);
        mark_changed!(flags, PROP_SPIN_FINISH, self.spin_finish);
        mark_changed!(flags, PROP_ROTATE_WITH_ENTITY, self.rotate_with_entity);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(copy data, ctx, PROP_MAX_PARTICLES, self.max_particles, append_u32_value);
        append_property!(copy data, ctx, PROP_LIFESPAN, self.lifespan, append_f32_value);
        append_property!(copy data, ctx, PROP_EMITTING_PARTICLES, self.emitting, append_bool_value);
        append_property!(copy data, ctx, PROP_EMIT_RATE, self.emit_rate, append_f32_value);
        append_property!(copy data, ctx, PROP_EMIT_SPEED, self.emit_speed, append_f32_value);
        append_property!(copy data, ctx, PROP_SPEED_SPREAD, self.speed_spread, append_f32_value);
        append_property!(ref data, ctx, PROP_EMIT_ORIENTATION, self.emit_orientation, append_quat_value);
        append_property!(ref data, ctx, PROP_EMIT_DIMENSIONS, self.emit_dimensions, append_vec3_value);
        append_property!(copy data, ctx, PROP_EMIT_RADIUS_START, self.emit_radius_start, append_f32_value);
        append_property!(copy data, ctx, PROP_POLAR_START, self.polar_start, append_f32_value);
        append_property!(copy data, ctx, PROP_POLAR_FINISH, self.polar_finish, append_f32_value);
        append_property!(copy data, ctx, PROP_AZIMUTH_START, self.azimuth_start, append_f32_value);
        append_property!(copy data, ctx, PROP_AZIMUTH_FINISH, self.azimuth_finish, append_f32_value);
        append_property!(ref data, ctx, PROP_EMIT_ACCELERATION, self.emit_acceleration, append_vec3_value);
        append_property!(ref data, ctx, PROP_ACCELERATION_SPREAD, self.acceleration_spread, append_vec3_value);
        append_property!(copy data, ctx, PROP_PARTICLE_RADIUS, self.particle_radius, append_f32_value);
        append_property!(copy data, ctx, PROP_RADIUS_SPREAD, self.radius_spread, append_f32_value);
        append_property!(copy data, ctx, PROP_RADIUS_START, self.radius_start, append_f32_value);
        append_property!(copy data, ctx, PROP_RADIUS_FINISH, self.radius_finish, append_f32_value);
        append_property!(ref data, ctx, PROP_COLOR_SPREAD, self.color_spread, append_color_value);
        append_property!(ref data, ctx, PROP_COLOR_START, self.color_start, append_vec3_value);
        append_property!(ref data, ctx, PROP_COLOR_FINISH, self.color_finish, append_vec3_value);
        append_property!(copy data, ctx, PROP_ALPHA_SPREAD, self.alpha_spread, append_f32_value);
        append_property!(copy data, ctx, PROP_ALPHA_START, self.alpha_start, append_f32_value);
        append_property!(copy data, ctx, PROP_ALPHA_FINISH, self.alpha_finish, append_f32_value);
        append_property!(copy data, ctx, PROP_EMITTER_SHOULD_TRAIL, self.emitter_should_trail, append_bool_value);
        append_property!(copy data, ctx, PROP_PARTICLE_SPIN, self.particle_spin, append_f32_value);
        append_property!(copy data, ctx, PROP_SPIN_SPREAD, self.spin_spread, append_f32_value);
        append_property!(copy data, ctx, PROP_SPIN_START, self.spin_start, append_f32_value);
        append_property!(copy data, ctx, PROP_SPIN_FINISH, self.spin_finish, append_f32_value);
        append_property!(copy data, ctx, PROP_ROTATE_WITH_ENTITY, self.rotate_with_entity, append_bool_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_MAX_PARTICLES, block.max_particles, read_u32_le);
        read_property!(reader, flags, PROP_LIFESPAN, block.lifespan, read_f32_le);
        read_property!(reader, flags, PROP_EMITTING_PARTICLES, block.emitting, read_bool);
        read_property!(reader, flags, PROP_EMIT_RATE, block.emit_rate, read_f32_le);
        read_property!(reader, flags, PROP_EMIT_SPEED, block.emit_speed, read_f32_le);
        read_property!(reader, flags, PROP_SPEED_SPREAD, block.speed_spread, read_f32_le);
        read_property!(reader, flags, PROP_EMIT_ORIENTATION, block.emit_orientation, read_quat);
        read_property!(reader, flags, PROP_EMIT_DIMENSIONS, block.emit_dimensions, read_vec3);
        read_property!(reader, flags, PROP_EMIT_RADIUS_START, block.emit_radius_start, read_f32_le);
        read_property!(reader, flags, PROP_POLAR_START, block.polar_start, read_f32_le);
        read_property!(reader, flags, PROP_POLAR_FINISH, block.polar_finish, read_f32_le);
        read_property!(reader, flags, PROP_AZIMUTH_START, block.azimuth_start, read_f32_le);
        read_property!(reader, flags, PROP_AZIMUTH_FINISH, block.azimuth_finish, read_f32_le);
        read_property!(reader, flags, PROP_EMIT_ACCELERATION, block.emit_acceleration, read_vec3);
        read_property!(reader, flags, PROP_ACCELERATION_SPREAD, block.acceleration_spread, read_vec3);
        read_property!(reader, flags, PROP_PARTICLE_RADIUS, block.particle_radius, read_f32_le);
        read_property!(reader, flags, PROP_RADIUS_SPREAD, block.radius_spread, read_f32_le);
        read_property!(reader, flags, PROP_RADIUS_START, block.radius_start, read_f32_le);
        read_property!(reader, flags, PROP_RADIUS_FINISH, block.radius_finish, read_f32_le);
        read_property!(reader, flags, PROP_COLOR_SPREAD, block.color_spread, read_color);
        read_property!(reader, flags, PROP_COLOR_START, block.color_start, read_vec3);
        read_property!(reader, flags, PROP_COLOR_FINISH, block.color_finish, read_vec3);
        read_property!(reader, flags, PROP_ALPHA_SPREAD, block.alpha_spread, read_f32_le);
        read_property!(reader, flags, PROP_ALPHA_START, block.alpha_start, read_f32_le);
        read_property!(reader, flags, PROP_ALPHA_FINISH, block.alpha_finish, read_f32_le);
        read_property!(reader, flags, PROP_EMITTER_SHOULD_TRAIL, block.emitter_should_trail, read_bool);
        read_property!(reader, flags, PROP_PARTICLE_SPIN, block.particle_spin, read_f32_le);
        read_property!(reader, flags, PROP_SPIN_SPREAD, block.spin_spread, read_f32_le);
        read_property!(reader, flags, PROP_SPIN_START, block.spin_start, read_f32_le);
        read_property!(reader, flags, PROP_SPIN_FINISH, block.spin_finish, read_f32_le);
        read_property!(reader, flags, PROP_ROTATE_WITH_ENTITY, block.rotate_with_entity, read_bool);
        Ok(block)
    }
}
