//! Entity property bags
//!
//! `EntityProperties` is the candidate bag an edit is built from: every
//! field is optional, and only populated fields are flagged, encoded and
//! sent. The common block lives here; entity-type specific fields live in
//! the subtype structs behind `EntitySubproperties`.

use uuid::Uuid;

use skyloft_support::math::{AaCube, Color, Quat, Vec3};
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::entity_type::EntityType;
use crate::entity::property_list::*;
use crate::entity::{append_property, mark_changed, read_property};
use crate::entity::{
    gizmo::GizmoProperties, grid::GridProperties, image::ImageProperties,
    light::LightProperties, material::MaterialProperties, model::ModelProperties,
    particles::ParticleEffectProperties, polyline::PolyLineProperties,
    polyvox::PolyVoxProperties, shape::ShapeProperties, text::TextProperties,
    web::WebProperties, zone::ZoneProperties,
};
use crate::error::Result;

/// The grab property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrabProperties {
    pub grabbable: Option<bool>,
    pub kinematic: Option<bool>,
    pub follows_controller: Option<bool>,
    pub triggerable: Option<bool>,
    pub equippable: Option<bool>,
    pub delegate_to_parent: Option<bool>,
    pub left_equippable_position: Option<Vec3>,
    pub left_equippable_rotation: Option<Quat>,
    pub right_equippable_position: Option<Vec3>,
    pub right_equippable_rotation: Option<Quat>,
    pub equippable_indicator_url: Option<String>,
    pub equippable_indicator_scale: Option<Vec3>,
    pub equippable_indicator_offset: Option<Vec3>,
}

/// The pulse property group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PulseProperties {
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub period: Option<f32>,
    pub color_mode: Option<u32>,
    pub alpha_mode: Option<u32>,
}

/// Entity-type specific property block.
#[derive(Debug, Clone, PartialEq)]
pub enum EntitySubproperties {
    Shape(ShapeProperties),
    Model(ModelProperties),
    Text(TextProperties),
    Image(ImageProperties),
    Web(WebProperties),
    ParticleEffect(ParticleEffectProperties),
    PolyLine(PolyLineProperties),
    PolyVox(PolyVoxProperties),
    Grid(GridProperties),
    Gizmo(GizmoProperties),
    Light(LightProperties),
    Zone(ZoneProperties),
    Material(MaterialProperties),
    None,
}

impl EntitySubproperties {
    /// An empty block of the right variant for an entity type.
    pub fn for_type(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Box | EntityType::Sphere | EntityType::Shape => {
                EntitySubproperties::Shape(ShapeProperties::default())
            }
            EntityType::Model => EntitySubproperties::Model(ModelProperties::default()),
            EntityType::Text => EntitySubproperties::Text(TextProperties::default()),
            EntityType::Image => EntitySubproperties::Image(ImageProperties::default()),
            EntityType::Web => EntitySubproperties::Web(WebProperties::default()),
            EntityType::ParticleEffect => {
                EntitySubproperties::ParticleEffect(ParticleEffectProperties::default())
            }
            EntityType::PolyLine => EntitySubproperties::PolyLine(PolyLineProperties::default()),
            EntityType::PolyVox => EntitySubproperties::PolyVox(PolyVoxProperties::default()),
            EntityType::Grid => EntitySubproperties::Grid(GridProperties::default()),
            EntityType::Gizmo => EntitySubproperties::Gizmo(GizmoProperties::default()),
            EntityType::Light => EntitySubproperties::Light(LightProperties::default()),
            EntityType::Zone => EntitySubproperties::Zone(ZoneProperties::default()),
            EntityType::Material => EntitySubproperties::Material(MaterialProperties::default()),
            EntityType::Unknown => EntitySubproperties::None,
        }
    }

    fn mark_changed(&self, flags: &mut PropertyFlags) {
        match self {
            EntitySubproperties::Shape(block) => block.mark_changed(flags),
            EntitySubproperties::Model(block) => block.mark_changed(flags),
            EntitySubproperties::Text(block) => block.mark_changed(flags),
            EntitySubproperties::Image(block) => block.mark_changed(flags),
            EntitySubproperties::Web(block) => block.mark_changed(flags),
            EntitySubproperties::ParticleEffect(block) => block.mark_changed(flags),
            EntitySubproperties::PolyLine(block) => block.mark_changed(flags),
            EntitySubproperties::PolyVox(block) => block.mark_changed(flags),
            EntitySubproperties::Grid(block) => block.mark_changed(flags),
            EntitySubproperties::Gizmo(block) => block.mark_changed(flags),
            EntitySubproperties::Light(block) => block.mark_changed(flags),
            EntitySubproperties::Zone(block) => block.mark_changed(flags),
            EntitySubproperties::Material(block) => block.mark_changed(flags),
            EntitySubproperties::None => {}
        }
    }

    fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        match self {
            EntitySubproperties::Shape(block) => block.append(data, ctx),
            EntitySubproperties::Model(block) => block.append(data, ctx),
            EntitySubproperties::Text(block) => block.append(data, ctx),
            EntitySubproperties::Image(block) => block.append(data, ctx),
            EntitySubproperties::Web(block) => block.append(data, ctx),
            EntitySubproperties::ParticleEffect(block) => block.append(data, ctx),
            EntitySubproperties::PolyLine(block) => block.append(data, ctx),
            EntitySubproperties::PolyVox(block) => block.append(data, ctx),
            EntitySubproperties::Grid(block) => block.append(data, ctx),
            EntitySubproperties::Gizmo(block) => block.append(data, ctx),
            EntitySubproperties::Light(block) => block.append(data, ctx),
            EntitySubproperties::Zone(block) => block.append(data, ctx),
            EntitySubproperties::Material(block) => block.append(data, ctx),
            EntitySubproperties::None => {}
        }
    }

    fn read(
        entity_type: EntityType,
        reader: &mut PacketDataReader,
        flags: &PropertyFlags,
    ) -> Result<Self> {
        Ok(match entity_type {
            EntityType::Box | EntityType::Sphere | EntityType::Shape => {
                EntitySubproperties::Shape(ShapeProperties::read(reader, flags)?)
            }
            EntityType::Model => EntitySubproperties::Model(ModelProperties::read(reader, flags)?),
            EntityType::Text => EntitySubproperties::Text(TextProperties::read(reader, flags)?),
            EntityType::Image => EntitySubproperties::Image(ImageProperties::read(reader, flags)?),
            EntityType::Web => EntitySubproperties::Web(WebProperties::read(reader, flags)?),
            EntityType::ParticleEffect => {
                EntitySubproperties::ParticleEffect(ParticleEffectProperties::read(reader, flags)?)
            }
            EntityType::PolyLine => {
                EntitySubproperties::PolyLine(PolyLineProperties::read(reader, flags)?)
            }
            EntityType::PolyVox => {
                EntitySubproperties::PolyVox(PolyVoxProperties::read(reader, flags)?)
            }
            EntityType::Grid => EntitySubproperties::Grid(GridProperties::read(reader, flags)?),
            EntityType::Gizmo => EntitySubproperties::Gizmo(GizmoProperties::read(reader, flags)?),
            EntityType::Light => EntitySubproperties::Light(LightProperties::read(reader, flags)?),
            EntityType::Zone => EntitySubproperties::Zone(ZoneProperties::read(reader, flags)?),
            EntityType::Material => {
                EntitySubproperties::Material(MaterialProperties::read(reader, flags)?)
            }
            EntityType::Unknown => EntitySubproperties::None,
        })
    }
}

/// A candidate bag of entity properties for one edit.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityProperties {
    pub entity_type: EntityType,
    /// Microseconds since the epoch of the edit this bag describes.
    pub last_edited: u64,

    pub simulation_owner: Option<Vec<u8>>,
    pub parent_id: Option<Uuid>,
    pub parent_joint_index: Option<u16>,
    pub visible: Option<bool>,
    pub name: Option<String>,
    pub locked: Option<bool>,
    pub user_data: Option<String>,
    pub private_user_data: Option<String>,
    pub href: Option<String>,
    pub description: Option<String>,
    pub position: Option<Vec3>,
    pub dimensions: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub registration_point: Option<Vec3>,
    pub created: Option<u64>,
    pub last_edited_by: Option<Uuid>,
    pub entity_host_type: Option<u8>,
    pub owning_avatar_id: Option<Uuid>,
    pub query_aa_cube: Option<AaCube>,
    pub can_cast_shadow: Option<bool>,
    pub visible_in_secondary_camera: Option<bool>,
    pub render_layer: Option<u32>,
    pub primitive_mode: Option<u32>,
    pub ignore_pick_intersection: Option<bool>,
    pub render_with_zones: Option<Vec<Uuid>>,
    pub billboard_mode: Option<u32>,

    pub grab: GrabProperties,

    pub density: Option<f32>,
    pub velocity: Option<Vec3>,
    pub angular_velocity: Option<Vec3>,
    pub gravity: Option<Vec3>,
    pub acceleration: Option<Vec3>,
    pub damping: Option<f32>,
    pub angular_damping: Option<f32>,
    pub restitution: Option<f32>,
    pub friction: Option<f32>,
    pub lifetime: Option<f32>,
    pub collisionless: Option<bool>,
    pub collision_mask: Option<u16>,
    pub dynamic: Option<bool>,
    pub collision_sound_url: Option<String>,
    pub action_data: Option<Vec<u8>>,

    pub cloneable: Option<bool>,
    pub clone_lifetime: Option<f32>,
    pub clone_limit: Option<f32>,
    pub clone_dynamic: Option<bool>,
    pub clone_avatar_entity: Option<bool>,
    pub clone_origin_id: Option<Uuid>,

    pub script: Option<String>,
    pub script_timestamp: Option<u64>,
    pub server_scripts: Option<String>,

    pub item_name: Option<String>,
    pub item_description: Option<String>,
    pub item_categories: Option<String>,
    pub item_artist: Option<String>,
    pub item_license: Option<String>,
    pub limited_run: Option<u32>,
    pub marketplace_id: Option<String>,
    pub edition_number: Option<u32>,
    pub entity_instance_number: Option<u32>,
    pub certificate_id: Option<String>,
    pub certificate_type: Option<String>,
    pub static_certificate_version: Option<u32>,

    pub local_position: Option<Vec3>,
    pub local_rotation: Option<Quat>,
    pub local_velocity: Option<Vec3>,
    pub local_angular_velocity: Option<Vec3>,
    pub local_dimensions: Option<Vec3>,

    pub shape_type: Option<u32>,
    pub compound_shape_url: Option<String>,
    pub color: Option<Color>,
    pub alpha: Option<f32>,
    pub pulse: PulseProperties,
    pub textures: Option<String>,

    pub subtype: EntitySubproperties,
}

impl EntityProperties {
    /// An empty bag for one entity type.
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            last_edited: 0,
            simulation_owner: None,
            parent_id: None,
            parent_joint_index: None,
            visible: None,
            name: None,
            locked: None,
            user_data: None,
            private_user_data: None,
            href: None,
            description: None,
            position: None,
            dimensions: None,
            rotation: None,
            registration_point: None,
            created: None,
            last_edited_by: None,
            entity_host_type: None,
            owning_avatar_id: None,
            query_aa_cube: None,
            can_cast_shadow: None,
            visible_in_secondary_camera: None,
            render_layer: None,
            primitive_mode: None,
            ignore_pick_intersection: None,
            render_with_zones: None,
            billboard_mode: None,
            grab: GrabProperties::default(),
            density: None,
            velocity: None,
            angular_velocity: None,
            gravity: None,
            acceleration: None,
            damping: None,
            angular_damping: None,
            restitution: None,
            friction: None,
            lifetime: None,
            collisionless: None,
            collision_mask: None,
            dynamic: None,
            collision_sound_url: None,
            action_data: None,
            cloneable: None,
            clone_lifetime: None,
            clone_limit: None,
            clone_dynamic: None,
            clone_avatar_entity: None,
            clone_origin_id: None,
            script: None,
            script_timestamp: None,
            server_scripts: None,
            item_name: None,
            item_description: None,
            item_categories: None,
            item_artist: None,
            item_license: None,
            limited_run: None,
            marketplace_id: None,
            edition_number: None,
            entity_instance_number: None,
            certificate_id: None,
            certificate_type: None,
            static_certificate_version: None,
            local_position: None,
            local_rotation: None,
            local_velocity: None,
            local_angular_velocity: None,
            local_dimensions: None,
            shape_type: None,
            compound_shape_url: None,
            color: None,
            alpha: None,
            pulse: PulseProperties::default(),
            textures: None,
            subtype: EntitySubproperties::for_type(entity_type),
        }
    }

    /// The flags of every populated property, property groups included.
    pub fn changed_properties(&self) -> PropertyFlags {
        let mut flags = PropertyFlags::new();

        mark_changed!(flags, PROP_SIMULATION_OWNER, self.simulation_owner);
        mark_changed!(flags, PROP_PARENT_ID, self.parent_id);
        mark_changed!(flags, PROP_PARENT_JOINT_INDEX, self.parent_joint_index);
        mark_changed!(flags, PROP_VISIBLE, self.visible);
        mark_changed!(flags, PROP_NAME, self.name);
        mark_changed!(flags, PROP_LOCKED, self.locked);
        mark_changed!(flags, PROP_USER_DATA, self.user_data);
        mark_changed!(flags, PROP_PRIVATE_USER_DATA, self.private_user_data);
        mark_changed!(flags, PROP_HREF, self.href);
        mark_changed!(flags, PROP_DESCRIPTION, self.description);
        mark_changed!(flags, PROP_POSITION, self.position);
        mark_changed!(flags, PROP_DIMENSIONS, self.dimensions);
        mark_changed!(flags, PROP_ROTATION, self.rotation);
        mark_changed!(flags, PROP_REGISTRATION_POINT, self.registration_point);
        mark_changed!(flags, PROP_CREATED, self.created);
        mark_changed!(flags, PROP_LAST_EDITED_BY, self.last_edited_by);
        mark_changed!(flags, PROP_ENTITY_HOST_TYPE, self.entity_host_type);
        mark_changed!(flags, PROP_OWNING_AVATAR_ID, self.owning_avatar_id);
        mark_changed!(flags, PROP_QUERY_AA_CUBE, self.query_aa_cube);
        mark_changed!(flags, PROP_CAN_CAST_SHADOW, self.can_cast_shadow);
        mark_changed!(flags, PROP_VISIBLE_IN_SECONDARY_CAMERA, self.visible_in_secondary_camera);
        mark_changed!(flags, PROP_RENDER_LAYER, self.render_layer);
        mark_changed!(flags, PROP_PRIMITIVE_MODE, self.primitive_mode);
        mark_changed!(flags, PROP_IGNORE_PICK_INTERSECTION, self.ignore_pick_intersection);
        mark_changed!(flags, PROP_RENDER_WITH_ZONES, self.render_with_zones);
        mark_changed!(flags, PROP_BILLBOARD_MODE, self.billboard_mode);

        mark_changed!(flags, PROP_GRAB_GRABBABLE, self.grab.grabbable);
        mark_changed!(flags, PROP_GRAB_KINEMATIC, self.grab.kinematic);
        mark_changed!(flags, PROP_GRAB_FOLLOWS_CONTROLLER, self.grab.follows_controller);
        mark_changed!(flags, PROP_GRAB_TRIGGERABLE, self.grab.triggerable);
        mark_changed!(flags, PROP_GRAB_EQUIPPABLE, self.grab.equippable);
        mark_changed!(flags, PROP_GRAB_DELEGATE_TO_PARENT, self.grab.delegate_to_parent);
        mark_changed!(
            flags,
            PROP_GRAB_LEFT_EQUIPPABLE_POSITION_OFFSET,
            self.grab.left_equippable_position
        );
        mark_changed!(
            flags,
            PROP_GRAB_LEFT_EQUIPPABLE_ROTATION_OFFSET,
            self.grab.left_equippable_rotation
        );
        mark_changed!(
            flags,
            PROP_GRAB_RIGHT_EQUIPPABLE_POSITION_OFFSET,
            self.grab.right_equippable_position
        );
        mark_changed!(
            flags,
            PROP_GRAB_RIGHT_EQUIPPABLE_ROTATION_OFFSET,
            self.grab.right_equippable_rotation
        );
        mark_changed!(flags, PROP_GRAB_EQUIPPABLE_INDICATOR_URL, self.grab.equippable_indicator_url);
        mark_changed!(
            flags,
            PROP_GRAB_EQUIPPABLE_INDICATOR_SCALE,
            self.grab.equippable_indicator_scale
        );
        mark_changed!(
            flags,
            PROP_GRAB_EQUIPPABLE_INDICATOR_OFFSET,
            self.grab.equippable_indicator_offset
        );

        mark_changed!(flags, PROP_DENSITY, self.density);
        mark_changed!(flags, PROP_VELOCITY, self.velocity);
        mark_changed!(flags, PROP_ANGULAR_VELOCITY, self.angular_velocity);
        mark_changed!(flags, PROP_GRAVITY, self.gravity);
        mark_changed!(flags, PROP_ACCELERATION, self.acceleration);
        mark_changed!(flags, PROP_DAMPING, self.damping);
        mark_changed!(flags, PROP_ANGULAR_DAMPING, self.angular_damping);
        mark_changed!(flags, PROP_RESTITUTION, self.restitution);
        mark_changed!(flags, PROP_FRICTION, self.friction);
        mark_changed!(flags, PROP_LIFETIME, self.lifetime);
        mark_changed!(flags, PROP_COLLISIONLESS, self.collisionless);
        mark_changed!(flags, PROP_COLLISION_MASK, self.collision_mask);
        mark_changed!(flags, PROP_DYNAMIC, self.dynamic);
        mark_changed!(flags, PROP_COLLISION_SOUND_URL, self.collision_sound_url);
        mark_changed!(flags, PROP_ACTION_DATA, self.action_data);

        mark_changed!(flags, PROP_CLONEABLE, self.cloneable);
        mark_changed!(flags, PROP_CLONE_LIFETIME, self.clone_lifetime);
        mark_changed!(flags, PROP_CLONE_LIMIT, self.clone_limit);
        mark_changed!(flags, PROP_CLONE_DYNAMIC, self.clone_dynamic);
        mark_changed!(flags, PROP_CLONE_AVATAR_ENTITY, self.clone_avatar_entity);
        mark_changed!(flags, PROP_CLONE_ORIGIN_ID, self.clone_origin_id);

        mark_changed!(flags, PROP_SCRIPT, self.script);
        mark_changed!(flags, PROP_SCRIPT_TIMESTAMP, self.script_timestamp);
        mark_changed!(flags, PROP_SERVER_SCRIPTS, self.server_scripts);

        mark_changed!(flags, PROP_ITEM_NAME, self.item_name);
        mark_changed!(flags, PROP_ITEM_DESCRIPTION, self.item_description);
        mark_changed!(flags, PROP_ITEM_CATEGORIES, self.item_categories);
        mark_changed!(flags, PROP_ITEM_ARTIST, self.item_artist);
        mark_changed!(flags, PROP_ITEM_LICENSE, self.item_license);
        mark_changed!(flags, PROP_LIMITED_RUN, self.limited_run);
        mark_changed!(flags, PROP_MARKETPLACE_ID, self.marketplace_id);
        mark_changed!(flags, PROP_EDITION_NUMBER, self.edition_number);
        mark_changed!(flags, PROP_ENTITY_INSTANCE_NUMBER, self.entity_instance_number);
        mark_changed!(flags, PROP_CERTIFICATE_ID, self.certificate_id);
        mark_changed!(flags, PROP_CERTIFICATE_TYPE, self.certificate_type);
        mark_changed!(flags, PROP_STATIC_CERTIFICATE_VERSION, self.static_certificate_version);

        mark_changed!(flags, PROP_LOCAL_POSITION, self.local_position);
        mark_changed!(flags, PROP_LOCAL_ROTATION, self.local_rotation);
        mark_changed!(flags, PROP_LOCAL_VELOCITY, self.local_velocity);
        mark_changed!(flags, PROP_LOCAL_ANGULAR_VELOCITY, self.local_angular_velocity);
        mark_changed!(flags, PROP_LOCAL_DIMENSIONS, self.local_dimensions);

        mark_changed!(flags, PROP_SHAPE_TYPE, self.shape_type);
        mark_changed!(flags, PROP_COMPOUND_SHAPE_URL, self.compound_shape_url);
        mark_changed!(flags, PROP_COLOR, self.color);
        mark_changed!(flags, PROP_ALPHA, self.alpha);
        mark_changed!(flags, PROP_PULSE_MIN, self.pulse.min);
        mark_changed!(flags, PROP_PULSE_MAX, self.pulse.max);
        mark_changed!(flags, PROP_PULSE_PERIOD, self.pulse.period);
        mark_changed!(flags, PROP_PULSE_COLOR_MODE, self.pulse.color_mode);
        mark_changed!(flags, PROP_PULSE_ALPHA_MODE, self.pulse.alpha_mode);
        mark_changed!(flags, PROP_TEXTURES, self.textures);

        self.subtype.mark_changed(&mut flags);

        flags
    }

    /// Append every pending property in ascending flag order.
    pub(crate) fn append_all(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_SIMULATION_OWNER, self.simulation_owner, append_byte_array_value);
        append_property!(ref data, ctx, PROP_PARENT_ID, self.parent_id, append_uuid_value);
        append_property!(copy data, ctx, PROP_PARENT_JOINT_INDEX, self.parent_joint_index, append_u16_value);
        append_property!(copy data, ctx, PROP_VISIBLE, self.visible, append_bool_value);
        append_property!(ref data, ctx, PROP_NAME, self.name, append_string_value);
        append_property!(copy data, ctx, PROP_LOCKED, self.locked, append_bool_value);
        append_property!(ref data, ctx, PROP_USER_DATA, self.user_data, append_string_value);
        append_property!(ref data, ctx, PROP_PRIVATE_USER_DATA, self.private_user_data, append_string_value);
        append_property!(ref data, ctx, PROP_HREF, self.href, append_string_value);
        append_property!(ref data, ctx, PROP_DESCRIPTION, self.description, append_string_value);
        append_property!(ref data, ctx, PROP_POSITION, self.position, append_vec3_value);
        append_property!(ref data, ctx, PROP_DIMENSIONS, self.dimensions, append_vec3_value);
        append_property!(ref data, ctx, PROP_ROTATION, self.rotation, append_quat_value);
        append_property!(ref data, ctx, PROP_REGISTRATION_POINT, self.registration_point, append_vec3_value);
        append_property!(copy data, ctx, PROP_CREATED, self.created, append_u64_value);
        append_property!(ref data, ctx, PROP_LAST_EDITED_BY, self.last_edited_by, append_uuid_value);
        append_property!(copy data, ctx, PROP_ENTITY_HOST_TYPE, self.entity_host_type, append_u8_value);
        append_property!(ref data, ctx, PROP_OWNING_AVATAR_ID, self.owning_avatar_id, append_uuid_value);
        append_property!(ref data, ctx, PROP_QUERY_AA_CUBE, self.query_aa_cube, append_aa_cube_value);
        append_property!(copy data, ctx, PROP_CAN_CAST_SHADOW, self.can_cast_shadow, append_bool_value);
        append_property!(copy data, ctx, PROP_VISIBLE_IN_SECONDARY_CAMERA, self.visible_in_secondary_camera, append_bool_value);
        append_property!(copy data, ctx, PROP_RENDER_LAYER, self.render_layer, append_u32_value);
        append_property!(copy data, ctx, PROP_PRIMITIVE_MODE, self.primitive_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_IGNORE_PICK_INTERSECTION, self.ignore_pick_intersection, append_bool_value);
        append_property!(ref data, ctx, PROP_RENDER_WITH_ZONES, self.render_with_zones, append_uuid_array_value);
        append_property!(copy data, ctx, PROP_BILLBOARD_MODE, self.billboard_mode, append_u32_value);

        append_property!(copy data, ctx, PROP_GRAB_GRABBABLE, self.grab.grabbable, append_bool_value);
        append_property!(copy data, ctx, PROP_GRAB_KINEMATIC, self.grab.kinematic, append_bool_value);
        append_property!(copy data, ctx, PROP_GRAB_FOLLOWS_CONTROLLER, self.grab.follows_controller, append_bool_value);
        append_property!(copy data, ctx, PROP_GRAB_TRIGGERABLE, self.grab.triggerable, append_bool_value);
        append_property!(copy data, ctx, PROP_GRAB_EQUIPPABLE, self.grab.equippable, append_bool_value);
        append_property!(copy data, ctx, PROP_GRAB_DELEGATE_TO_PARENT, self.grab.delegate_to_parent, append_bool_value);
        append_property!(ref data, ctx, PROP_GRAB_LEFT_EQUIPPABLE_POSITION_OFFSET, self.grab.left_equippable_position, append_vec3_value);
        append_property!(ref data, ctx, PROP_GRAB_LEFT_EQUIPPABLE_ROTATION_OFFSET, self.grab.left_equippable_rotation, append_quat_value);
        append_property!(ref data, ctx, PROP_GRAB_RIGHT_EQUIPPABLE_POSITION_OFFSET, self.grab.right_equippable_position, append_vec3_value);
        append_property!(ref data, ctx, PROP_GRAB_RIGHT_EQUIPPABLE_ROTATION_OFFSET, self.grab.right_equippable_rotation, append_quat_value);
        append_property!(ref data, ctx, PROP_GRAB_EQUIPPABLE_INDICATOR_URL, self.grab.equippable_indicator_url, append_string_value);
        append_property!(ref data, ctx, PROP_GRAB_EQUIPPABLE_INDICATOR_SCALE, self.grab.equippable_indicator_scale, append_vec3_value);
        append_property!(ref data, ctx, PROP_GRAB_EQUIPPABLE_INDICATOR_OFFSET, self.grab.equippable_indicator_offset, append_vec3_value);

        append_property!(copy data, ctx, PROP_DENSITY, self.density, append_f32_value);
        append_property!(ref data, ctx, PROP_VELOCITY, self.velocity, append_vec3_value);
        append_property!(ref data, ctx, PROP_ANGULAR_VELOCITY, self.angular_velocity, append_vec3_value);
        append_property!(ref data, ctx, PROP_GRAVITY, self.gravity, append_vec3_value);
        append_property!(ref data, ctx, PROP_ACCELERATION, self.acceleration, append_vec3_value);
        append_property!(copy data, ctx, PROP_DAMPING, self.damping, append_f32_value);
        append_property!(copy data, ctx, PROP_ANGULAR_DAMPING, self.angular_damping, append_f32_value);
        append_property!(copy data, ctx, PROP_RESTITUTION, self.restitution, append_f32_value);
        append_property!(copy data, ctx, PROP_FRICTION, self.friction, append_f32_value);
        append_property!(copy data, ctx, PROP_LIFETIME, self.lifetime, append_f32_value);
        append_property!(copy data, ctx, PROP_COLLISIONLESS, self.collisionless, append_bool_value);
        append_property!(copy data, ctx, PROP_COLLISION_MASK, self.collision_mask, append_u16_value);
        append_property!(copy data, ctx, PROP_DYNAMIC, self.dynamic, append_bool_value);
        append_property!(ref data, ctx, PROP_COLLISION_SOUND_URL, self.collision_sound_url, append_string_value);
        append_property!(ref data, ctx, PROP_ACTION_DATA, self.action_data, append_byte_array_value);

        append_property!(copy data, ctx, PROP_CLONEABLE, self.cloneable, append_bool_value);
        append_property!(copy data, ctx, PROP_CLONE_LIFETIME, self.clone_lifetime, append_f32_value);
        append_property!(copy data, ctx, PROP_CLONE_LIMIT, self.clone_limit, append_f32_value);
        append_property!(copy data, ctx, PROP_CLONE_DYNAMIC, self.clone_dynamic, append_bool_value);
        append_property!(copy data, ctx, PROP_CLONE_AVATAR_ENTITY, self.clone_avatar_entity, append_bool_value);
        append_property!(ref data, ctx, PROP_CLONE_ORIGIN_ID, self.clone_origin_id, append_uuid_value);

        append_property!(ref data, ctx, PROP_SCRIPT, self.script, append_string_value);
        append_property!(copy data, ctx, PROP_SCRIPT_TIMESTAMP, self.script_timestamp, append_u64_value);
        append_property!(ref data, ctx, PROP_SERVER_SCRIPTS, self.server_scripts, append_string_value);

        append_property!(ref data, ctx, PROP_ITEM_NAME, self.item_name, append_string_value);
        append_property!(ref data, ctx, PROP_ITEM_DESCRIPTION, self.item_description, append_string_value);
        append_property!(ref data, ctx, PROP_ITEM_CATEGORIES, self.item_categories, append_string_value);
        append_property!(ref data, ctx, PROP_ITEM_ARTIST, self.item_artist, append_string_value);
        append_property!(ref data, ctx, PROP_ITEM_LICENSE, self.item_license, append_string_value);
        append_property!(copy data, ctx, PROP_LIMITED_RUN, self.limited_run, append_u32_value);
        append_property!(ref data, ctx, PROP_MARKETPLACE_ID, self.marketplace_id, append_string_value);
        append_property!(copy data, ctx, PROP_EDITION_NUMBER, self.edition_number, append_u32_value);
        append_property!(copy data, ctx, PROP_ENTITY_INSTANCE_NUMBER, self.entity_instance_number, append_u32_value);
        append_property!(ref data, ctx, PROP_CERTIFICATE_ID, self.certificate_id, append_string_value);
        append_property!(ref data, ctx, PROP_CERTIFICATE_TYPE, self.certificate_type, append_string_value);
        append_property!(copy data, ctx, PROP_STATIC_CERTIFICATE_VERSION, self.static_certificate_version, append_u32_value);

        append_property!(ref data, ctx, PROP_LOCAL_POSITION, self.local_position, append_vec3_value);
        append_property!(ref data, ctx, PROP_LOCAL_ROTATION, self.local_rotation, append_quat_value);
        append_property!(ref data, ctx, PROP_LOCAL_VELOCITY, self.local_velocity, append_vec3_value);
        append_property!(ref data, ctx, PROP_LOCAL_ANGULAR_VELOCITY, self.local_angular_velocity, append_vec3_value);
        append_property!(ref data, ctx, PROP_LOCAL_DIMENSIONS, self.local_dimensions, append_vec3_value);

        append_property!(copy data, ctx, PROP_SHAPE_TYPE, self.shape_type, append_u32_value);
        append_property!(ref data, ctx, PROP_COMPOUND_SHAPE_URL, self.compound_shape_url, append_string_value);
        append_property!(ref data, ctx, PROP_COLOR, self.color, append_color_value);
        append_property!(copy data, ctx, PROP_ALPHA, self.alpha, append_f32_value);
        append_property!(copy data, ctx, PROP_PULSE_MIN, self.pulse.min, append_f32_value);
        append_property!(copy data, ctx, PROP_PULSE_MAX, self.pulse.max, append_f32_value);
        append_property!(copy data, ctx, PROP_PULSE_PERIOD, self.pulse.period, append_f32_value);
        append_property!(copy data, ctx, PROP_PULSE_COLOR_MODE, self.pulse.color_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_PULSE_ALPHA_MODE, self.pulse.alpha_mode, append_u32_value);
        append_property!(ref data, ctx, PROP_TEXTURES, self.textures, append_string_value);

        self.subtype.append(data, ctx);
    }

    /// Read every flagged property in ascending flag order.
    pub(crate) fn read_all(
        entity_type: EntityType,
        reader: &mut PacketDataReader,
        flags: &PropertyFlags,
    ) -> Result<Self> {
        let mut props = EntityProperties::new(entity_type);

        read_property!(reader, flags, PROP_SIMULATION_OWNER, props.simulation_owner, read_byte_array);
        read_property!(reader, flags, PROP_PARENT_ID, props.parent_id, read_uuid);
        read_property!(reader, flags, PROP_PARENT_JOINT_INDEX, props.parent_joint_index, read_u16_le);
        read_property!(reader, flags, PROP_VISIBLE, props.visible, read_bool);
        read_property!(reader, flags, PROP_NAME, props.name, read_string);
        read_property!(reader, flags, PROP_LOCKED, props.locked, read_bool);
        read_property!(reader, flags, PROP_USER_DATA, props.user_data, read_string);
        read_property!(reader, flags, PROP_PRIVATE_USER_DATA, props.private_user_data, read_string);
        read_property!(reader, flags, PROP_HREF, props.href, read_string);
        read_property!(reader, flags, PROP_DESCRIPTION, props.description, read_string);
        read_property!(reader, flags, PROP_POSITION, props.position, read_vec3);
        read_property!(reader, flags, PROP_DIMENSIONS, props.dimensions, read_vec3);
        read_property!(reader, flags, PROP_ROTATION, props.rotation, read_quat);
        read_property!(reader, flags, PROP_REGISTRATION_POINT, props.registration_point, read_vec3);
        read_property!(reader, flags, PROP_CREATED, props.created, read_u64_le);
        read_property!(reader, flags, PROP_LAST_EDITED_BY, props.last_edited_by, read_uuid);
        read_property!(reader, flags, PROP_ENTITY_HOST_TYPE, props.entity_host_type, read_u8);
        read_property!(reader, flags, PROP_OWNING_AVATAR_ID, props.owning_avatar_id, read_uuid);
        read_property!(reader, flags, PROP_QUERY_AA_CUBE, props.query_aa_cube, read_aa_cube);
        read_property!(reader, flags, PROP_CAN_CAST_SHADOW, props.can_cast_shadow, read_bool);
        read_property!(reader, flags, PROP_VISIBLE_IN_SECONDARY_CAMERA, props.visible_in_secondary_camera, read_bool);
        read_property!(reader, flags, PROP_RENDER_LAYER, props.render_layer, read_u32_le);
        read_property!(reader, flags, PROP_PRIMITIVE_MODE, props.primitive_mode, read_u32_le);
        read_property!(reader, flags, PROP_IGNORE_PICK_INTERSECTION, props.ignore_pick_intersection, read_bool);
        read_property!(reader, flags, PROP_RENDER_WITH_ZONES, props.render_with_zones, read_uuid_array);
        read_property!(reader, flags, PROP_BILLBOARD_MODE, props.billboard_mode, read_u32_le);

        read_property!(reader, flags, PROP_GRAB_GRABBABLE, props.grab.grabbable, read_bool);
        read_property!(reader, flags, PROP_GRAB_KINEMATIC, props.grab.kinematic, read_bool);
        read_property!(reader, flags, PROP_GRAB_FOLLOWS_CONTROLLER, props.grab.follows_controller, read_bool);
        read_property!(reader, flags, PROP_GRAB_TRIGGERABLE, props.grab.triggerable, read_bool);
        read_property!(reader, flags, PROP_GRAB_EQUIPPABLE, props.grab.equippable, read_bool);
        read_property!(reader, flags, PROP_GRAB_DELEGATE_TO_PARENT, props.grab.delegate_to_parent, read_bool);
        read_property!(reader, flags, PROP_GRAB_LEFT_EQUIPPABLE_POSITION_OFFSET, props.grab.left_equippable_position, read_vec3);
        read_property!(reader, flags, PROP_GRAB_LEFT_EQUIPPABLE_ROTATION_OFFSET, props.grab.left_equippable_rotation, read_quat);
        read_property!(reader, flags, PROP_GRAB_RIGHT_EQUIPPABLE_POSITION_OFFSET, props.grab.right_equippable_position, read_vec3);
        read_property!(reader, flags, PROP_GRAB_RIGHT_EQUIPPABLE_ROTATION_OFFSET, props.grab.right_equippable_rotation, read_quat);
        read_property!(reader, flags, PROP_GRAB_EQUIPPABLE_INDICATOR_URL, props.grab.equippable_indicator_url, read_string);
        read_property!(reader, flags, PROP_GRAB_EQUIPPABLE_INDICATOR_SCALE, props.grab.equippable_indicator_scale, read_vec3);
        read_property!(reader, flags, PROP_GRAB_EQUIPPABLE_INDICATOR_OFFSET, props.grab.equippable_indicator_offset, read_vec3);

        read_property!(reader, flags, PROP_DENSITY, props.density, read_f32_le);
        read_property!(reader, flags, PROP_VELOCITY, props.velocity, read_vec3);
        read_property!(reader, flags, PROP_ANGULAR_VELOCITY, props.angular_velocity, read_vec3);
        read_property!(reader, flags, PROP_GRAVITY, props.gravity, read_vec3);
        read_property!(reader, flags, PROP_ACCELERATION, props.acceleration, read_vec3);
        read_property!(reader, flags, PROP_DAMPING, props.damping, read_f32_le);
        read_property!(reader, flags, PROP_ANGULAR_DAMPING, props.angular_damping, read_f32_le);
        read_property!(reader, flags, PROP_RESTITUTION, props.restitution, read_f32_le);
        read_property!(reader, flags, PROP_FRICTION, props.friction, read_f32_le);
        read_property!(reader, flags, PROP_LIFETIME, props.lifetime, read_f32_le);
        read_property!(reader, flags, PROP_COLLISIONLESS, props.collisionless, read_bool);
        read_property!(reader, flags, PROP_COLLISION_MASK, props.collision_mask, read_u16_le);
        read_property!(reader, flags, PROP_DYNAMIC, props.dynamic, read_bool);
        read_property!(reader, flags, PROP_COLLISION_SOUND_URL, props.collision_sound_url, read_string);
        read_property!(reader, flags, PROP_ACTION_DATA, props.action_data, read_byte_array);

        read_property!(reader, flags, PROP_CLONEABLE, props.cloneable, read_bool);
        read_property!(reader, flags, PROP_CLONE_LIFETIME, props.clone_lifetime, read_f32_le);
        read_property!(reader, flags, PROP_CLONE_LIMIT, props.clone_limit, read_f32_le);
        read_property!(reader, flags, PROP_CLONE_DYNAMIC, props.clone_dynamic, read_bool);
        read_property!(reader, flags, PROP_CLONE_AVATAR_ENTITY, props.clone_avatar_entity, read_bool);
        read_property!(reader, flags, PROP_CLONE_ORIGIN_ID, props.clone_origin_id, read_uuid);

        read_property!(reader, flags, PROP_SCRIPT, props.script, read_string);
        read_property!(reader, flags, PROP_SCRIPT_TIMESTAMP, props.script_timestamp, read_u64_le);
        read_property!(reader, flags, PROP_SERVER_SCRIPTS, props.server_scripts, read_string);

        read_property!(reader, flags, PROP_ITEM_NAME, props.item_name, read_string);
        read_property!(reader, flags, PROP_ITEM_DESCRIPTION, props.item_description, read_string);
        read_property!(reader, flags, PROP_ITEM_CATEGORIES, props.item_categories, read_string);
        read_property!(reader, flags, PROP_ITEM_ARTIST, props.item_artist, read_string);
        read_property!(reader, flags, PROP_ITEM_LICENSE, props.item_license, read_string);
        read_property!(reader, flags, PROP_LIMITED_RUN, props.limited_run, read_u32_le);
        read_property!(reader, flags, PROP_MARKETPLACE_ID, props.marketplace_id, read_string);
        read_property!(reader, flags, PROP_EDITION_NUMBER, props.edition_number, read_u32_le);
        read_property!(reader, flags, PROP_ENTITY_INSTANCE_NUMBER, props.entity_instance_number, read_u32_le);
        read_property!(reader, flags, PROP_CERTIFICATE_ID, props.certificate_id, read_string);
        read_property!(reader, flags, PROP_CERTIFICATE_TYPE, props.certificate_type, read_string);
        read_property!(reader, flags, PROP_STATIC_CERTIFICATE_VERSION, props.static_certificate_version, read_u32_le);

        read_property!(reader, flags, PROP_LOCAL_POSITION, props.local_position, read_vec3);
        read_property!(reader, flags, PROP_LOCAL_ROTATION, props.local_rotation, read_quat);
        read_property!(reader, flags, PROP_LOCAL_VELOCITY, props.local_velocity, read_vec3);
        read_property!(reader, flags, PROP_LOCAL_ANGULAR_VELOCITY, props.local_angular_velocity, read_vec3);
        read_property!(reader, flags, PROP_LOCAL_DIMENSIONS, props.local_dimensions, read_vec3);

        read_property!(reader, flags, PROP_SHAPE_TYPE, props.shape_type, read_u32_le);
        read_property!(reader, flags, PROP_COMPOUND_SHAPE_URL, props.compound_shape_url, read_string);
        read_property!(reader, flags, PROP_COLOR, props.color, read_color);
        read_property!(reader, flags, PROP_ALPHA, props.alpha, read_f32_le);
        read_property!(reader, flags, PROP_PULSE_MIN, props.pulse.min, read_f32_le);
        read_property!(reader, flags, PROP_PULSE_MAX, props.pulse.max, read_f32_le);
        read_property!(reader, flags, PROP_PULSE_PERIOD, props.pulse.period, read_f32_le);
        read_property!(reader, flags, PROP_PULSE_COLOR_MODE, props.pulse.color_mode, read_u32_le);
        read_property!(reader, flags, PROP_PULSE_ALPHA_MODE, props.pulse.alpha_mode, read_u32_le);
        read_property!(reader, flags, PROP_TEXTURES, props.textures, read_string);

        props.subtype = EntitySubproperties::read(entity_type, reader, flags)?;

        Ok(props)
    }
}
