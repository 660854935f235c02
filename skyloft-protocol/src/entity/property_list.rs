//! Entity property enumeration
//!
//! The closed enumeration behind the property-flag wire form: 127 slots,
//! indices 0 through 126. Slots 0-91 are common to every entity type;
//! slots 92-126 are the derived block, whose meaning depends on the entity
//! type named in the edit prefix. Each subtype module aliases the derived
//! slots it uses.

/// Index type of a property flag.
pub type PropertyIndex = u16;

pub const PROP_PAGED_PROPERTY: PropertyIndex = 0;
pub const PROP_CUSTOM_PROPERTIES_INCLUDED: PropertyIndex = 1;

// Core properties.
pub const PROP_SIMULATION_OWNER: PropertyIndex = 2;
pub const PROP_PARENT_ID: PropertyIndex = 3;
pub const PROP_PARENT_JOINT_INDEX: PropertyIndex = 4;
pub const PROP_VISIBLE: PropertyIndex = 5;
pub const PROP_NAME: PropertyIndex = 6;
pub const PROP_LOCKED: PropertyIndex = 7;
pub const PROP_USER_DATA: PropertyIndex = 8;
pub const PROP_PRIVATE_USER_DATA: PropertyIndex = 9;
pub const PROP_HREF: PropertyIndex = 10;
pub const PROP_DESCRIPTION: PropertyIndex = 11;
pub const PROP_POSITION: PropertyIndex = 12;
pub const PROP_DIMENSIONS: PropertyIndex = 13;
pub const PROP_ROTATION: PropertyIndex = 14;
pub const PROP_REGISTRATION_POINT: PropertyIndex = 15;
pub const PROP_CREATED: PropertyIndex = 16;
pub const PROP_LAST_EDITED_BY: PropertyIndex = 17;
pub const PROP_ENTITY_HOST_TYPE: PropertyIndex = 18;
pub const PROP_OWNING_AVATAR_ID: PropertyIndex = 19;
pub const PROP_QUERY_AA_CUBE: PropertyIndex = 20;
pub const PROP_CAN_CAST_SHADOW: PropertyIndex = 21;
pub const PROP_VISIBLE_IN_SECONDARY_CAMERA: PropertyIndex = 22;
pub const PROP_RENDER_LAYER: PropertyIndex = 23;
pub const PROP_PRIMITIVE_MODE: PropertyIndex = 24;
pub const PROP_IGNORE_PICK_INTERSECTION: PropertyIndex = 25;
pub const PROP_RENDER_WITH_ZONES: PropertyIndex = 26;
pub const PROP_BILLBOARD_MODE: PropertyIndex = 27;

// Grab group.
pub const PROP_GRAB_GRABBABLE: PropertyIndex = 28;
pub const PROP_GRAB_KINEMATIC: PropertyIndex = 29;
pub const PROP_GRAB_FOLLOWS_CONTROLLER: PropertyIndex = 30;
pub const PROP_GRAB_TRIGGERABLE: PropertyIndex = 31;
pub const PROP_GRAB_EQUIPPABLE: PropertyIndex = 32;
pub const PROP_GRAB_DELEGATE_TO_PARENT: PropertyIndex = 33;
pub const PROP_GRAB_LEFT_EQUIPPABLE_POSITION_OFFSET: PropertyIndex = 34;
pub const PROP_GRAB_LEFT_EQUIPPABLE_ROTATION_OFFSET: PropertyIndex = 35;
pub const PROP_GRAB_RIGHT_EQUIPPABLE_POSITION_OFFSET: PropertyIndex = 36;
pub const PROP_GRAB_RIGHT_EQUIPPABLE_ROTATION_OFFSET: PropertyIndex = 37;
pub const PROP_GRAB_EQUIPPABLE_INDICATOR_URL: PropertyIndex = 38;
pub const PROP_GRAB_EQUIPPABLE_INDICATOR_SCALE: PropertyIndex = 39;
pub const PROP_GRAB_EQUIPPABLE_INDICATOR_OFFSET: PropertyIndex = 40;

// Physics.
pub const PROP_DENSITY: PropertyIndex = 41;
pub const PROP_VELOCITY: PropertyIndex = 42;
pub const PROP_ANGULAR_VELOCITY: PropertyIndex = 43;
pub const PROP_GRAVITY: PropertyIndex = 44;
pub const PROP_ACCELERATION: PropertyIndex = 45;
pub const PROP_DAMPING: PropertyIndex = 46;
pub const PROP_ANGULAR_DAMPING: PropertyIndex = 47;
pub const PROP_RESTITUTION: PropertyIndex = 48;
pub const PROP_FRICTION: PropertyIndex = 49;
pub const PROP_LIFETIME: PropertyIndex = 50;
pub const PROP_COLLISIONLESS: PropertyIndex = 51;
pub const PROP_COLLISION_MASK: PropertyIndex = 52;
pub const PROP_DYNAMIC: PropertyIndex = 53;
pub const PROP_COLLISION_SOUND_URL: PropertyIndex = 54;
pub const PROP_ACTION_DATA: PropertyIndex = 55;

// Cloning.
pub const PROP_CLONEABLE: PropertyIndex = 56;
pub const PROP_CLONE_LIFETIME: PropertyIndex = 57;
pub const PROP_CLONE_LIMIT: PropertyIndex = 58;
pub const PROP_CLONE_DYNAMIC: PropertyIndex = 59;
pub const PROP_CLONE_AVATAR_ENTITY: PropertyIndex = 60;
pub const PROP_CLONE_ORIGIN_ID: PropertyIndex = 61;

// Scripts.
pub const PROP_SCRIPT: PropertyIndex = 62;
pub const PROP_SCRIPT_TIMESTAMP: PropertyIndex = 63;
pub const PROP_SERVER_SCRIPTS: PropertyIndex = 64;

// Certificate.
pub const PROP_ITEM_NAME: PropertyIndex = 65;
pub const PROP_ITEM_DESCRIPTION: PropertyIndex = 66;
pub const PROP_ITEM_CATEGORIES: PropertyIndex = 67;
pub const PROP_ITEM_ARTIST: PropertyIndex = 68;
pub const PROP_ITEM_LICENSE: PropertyIndex = 69;
pub const PROP_LIMITED_RUN: PropertyIndex = 70;
pub const PROP_MARKETPLACE_ID: PropertyIndex = 71;
pub const PROP_EDITION_NUMBER: PropertyIndex = 72;
pub const PROP_ENTITY_INSTANCE_NUMBER: PropertyIndex = 73;
pub const PROP_CERTIFICATE_ID: PropertyIndex = 74;
pub const PROP_CERTIFICATE_TYPE: PropertyIndex = 75;
pub const PROP_STATIC_CERTIFICATE_VERSION: PropertyIndex = 76;

// Script-facing local transforms.
pub const PROP_LOCAL_POSITION: PropertyIndex = 77;
pub const PROP_LOCAL_ROTATION: PropertyIndex = 78;
pub const PROP_LOCAL_VELOCITY: PropertyIndex = 79;
pub const PROP_LOCAL_ANGULAR_VELOCITY: PropertyIndex = 80;
pub const PROP_LOCAL_DIMENSIONS: PropertyIndex = 81;

// Properties shared by several subtypes.
pub const PROP_SHAPE_TYPE: PropertyIndex = 82;
pub const PROP_COMPOUND_SHAPE_URL: PropertyIndex = 83;
pub const PROP_COLOR: PropertyIndex = 84;
pub const PROP_ALPHA: PropertyIndex = 85;
pub const PROP_PULSE_MIN: PropertyIndex = 86;
pub const PROP_PULSE_MAX: PropertyIndex = 87;
pub const PROP_PULSE_PERIOD: PropertyIndex = 88;
pub const PROP_PULSE_COLOR_MODE: PropertyIndex = 89;
pub const PROP_PULSE_ALPHA_MODE: PropertyIndex = 90;
pub const PROP_TEXTURES: PropertyIndex = 91;

/// First derived slot; meanings are entity-type specific.
pub const PROP_DERIVED_START: PropertyIndex = 92;

/// Count of derived slots.
pub const NUM_DERIVED_PROPERTIES: PropertyIndex = 35;

/// One past the highest property index.
pub const PROP_AFTER_LAST_ITEM: PropertyIndex = PROP_DERIVED_START + NUM_DERIVED_PROPERTIES;

/// The derived slot `n` of the current entity type.
pub const fn derived(n: PropertyIndex) -> PropertyIndex {
    PROP_DERIVED_START + n
}

/// Widest possible flag block for this enumeration, in bytes.
pub const MAX_PROPERTY_FLAGS_BYTES: usize = (PROP_AFTER_LAST_ITEM as usize - 1) / 7 + 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumeration_bounds() {
        assert_eq!(PROP_AFTER_LAST_ITEM, 127);
        assert_eq!(derived(NUM_DERIVED_PROPERTIES - 1), 126);
        // 126 / 7 + 1 bytes: the reservation the edit encoder makes.
        assert_eq!(MAX_PROPERTY_FLAGS_BYTES, 19);
    }
}
