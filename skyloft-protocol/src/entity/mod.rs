//! Entity property model and edit codec
//!
//! Entities are typed bags of optional properties. The wire truth for which
//! properties a packet carries is the property-flag block; the field stream
//! behind it holds the values in ascending flag order, common block first,
//! then the entity-type block over the derived slots.

pub mod codec;
pub mod entity_type;
pub mod gizmo;
pub mod grid;
pub mod image;
pub mod light;
pub mod material;
pub mod model;
pub mod particles;
pub mod polyline;
pub mod polyvox;
pub mod properties;
pub mod property_list;
pub mod shape;
pub mod text;
pub mod web;
pub mod zone;

pub use codec::{
    decode_entity_edit, encode_entity_edit, encode_entity_edit_requested, EncodeOutcome,
    EntityEdit,
};
pub use entity_type::EntityType;
pub use properties::{EntityProperties, EntitySubproperties, GrabProperties, PulseProperties};

/// Append one optional property if it is still pending in the context.
///
/// The `copy` arm passes the value by value (scalars), the `ref` arm by
/// reference (strings, vectors, arrays).
macro_rules! append_property {
    (copy $data:expr, $ctx:expr, $flag:expr, $value:expr, $method:ident) => {
        if $ctx.properties_to_write.has_property($flag) {
            if let Some(value) = $value {
                $data.$method($flag, value, $ctx);
            }
        }
    };
    (ref $data:expr, $ctx:expr, $flag:expr, $value:expr, $method:ident) => {
        if $ctx.properties_to_write.has_property($flag) {
            if let Some(value) = &$value {
                $data.$method($flag, value, $ctx);
            }
        }
    };
}

/// Read one property into an `Option` field if its flag is set.
macro_rules! read_property {
    ($reader:expr, $flags:expr, $flag:expr, $target:expr, $method:ident) => {
        if $flags.has_property($flag) {
            $target = Some($reader.$method()?);
        }
    };
}

/// Mark a flag as changed when its field is populated.
macro_rules! mark_changed {
    ($flags:expr, $flag:expr, $value:expr) => {
        if $value.is_some() {
            $flags.set_has_property($flag, true);
        }
    };
}

pub(crate) use append_property;
pub(crate) use mark_changed;
pub(crate) use read_property;
