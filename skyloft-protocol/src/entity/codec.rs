//! Entity edit encoder and decoder
//!
//! Payload layout: octal code (one zero byte, the root), last-edited u64
//! little-endian microseconds, entity UUID as 16 big-endian bytes, entity
//! type byte-count-coded, update delta byte-count-coded (zero for an edit),
//! the property-flag block, then the typed field stream in ascending flag
//! order.
//!
//! The encoder reserves the widest possible flag block up front. Fields that
//! do not fit are dropped from the pending set without disturbing what was
//! already written, and the block is compacted to the surviving flags at the
//! end, so the wire image only ever advertises fields that are actually
//! present.

use uuid::Uuid;

use skyloft_support::byte_count_coded;
use skyloft_support::octree_packet_data::{AppendState, OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::entity_type::EntityType;
use crate::entity::properties::EntityProperties;
use crate::entity::property_list::MAX_PROPERTY_FLAGS_BYTES;
use crate::error::{Error, Result};

/// The root octal code that prefixes every edit.
const ROOT_OCTAL_CODE: u8 = 0;

/// Result of one encode attempt.
#[derive(Debug)]
pub struct EncodeOutcome {
    /// COMPLETED, PARTIAL or NONE, per the partial-fit protocol.
    pub append_state: AppendState,
    /// Requested properties that did not make it into this packet.
    pub didnt_fit: PropertyFlags,
}

/// A decoded entity edit.
#[derive(Debug, Clone)]
pub struct EntityEdit {
    pub entity_id: Uuid,
    pub properties: EntityProperties,
}

/// Encode an entity edit into `data`.
///
/// On `NONE` the buffer is rolled back to where it stood before the
/// property section began; the caller abandons the packet. On `PARTIAL` the
/// caller sends what fit and re-encodes `didnt_fit` into a fresh packet.
pub fn encode_entity_edit(
    entity_id: &Uuid,
    properties: &EntityProperties,
    data: &mut OctreePacketData,
) -> EncodeOutcome {
    encode_entity_edit_requested(entity_id, properties, properties.changed_properties(), data)
}

/// Encode only `requested` properties of the bag, for continuing a
/// multi-packet edit from a previous outcome's `didnt_fit`.
pub fn encode_entity_edit_requested(
    entity_id: &Uuid,
    properties: &EntityProperties,
    requested: PropertyFlags,
    data: &mut OctreePacketData,
) -> EncodeOutcome {
    let start = data.position();
    let prefix_ok = data.append_u8_raw(ROOT_OCTAL_CODE)
        && data.append_u64_le_raw(properties.last_edited)
        && data.append_uuid_be_raw(entity_id)
        && data.append_raw(&byte_count_coded::encode(properties.entity_type.as_u8() as u64))
        && data.append_raw(&byte_count_coded::encode(0));
    if !prefix_ok {
        data.truncate(start);
        return EncodeOutcome { append_state: AppendState::None, didnt_fit: requested };
    }

    // Reserve the widest flag block so flags can be cleared in place while
    // fields are appended behind it.
    let flags_offset = data.position();
    if !data.append_raw(&[0u8; MAX_PROPERTY_FLAGS_BYTES]) {
        data.truncate(start);
        return EncodeOutcome { append_state: AppendState::None, didnt_fit: requested };
    }

    let mut ctx = PacketContext::new(requested);
    properties.append_all(data, &mut ctx);

    let didnt_fit = ctx.properties_to_write.clone();

    if ctx.property_count == 0 {
        // Nothing fit; put the buffer back at the pre-property checkpoint.
        data.truncate(flags_offset);
        return EncodeOutcome { append_state: AppendState::None, didnt_fit };
    }

    // Compact the reservation to the actual encoding of what was written.
    let encoded_flags = ctx.properties_written.encode();
    data.overwrite(flags_offset, &encoded_flags);
    data.shift_left(
        flags_offset + MAX_PROPERTY_FLAGS_BYTES,
        MAX_PROPERTY_FLAGS_BYTES - encoded_flags.len(),
    );

    let append_state =
        if didnt_fit.is_empty() { AppendState::Completed } else { AppendState::Partial };
    EncodeOutcome { append_state, didnt_fit }
}

/// Decode an entity edit payload.
pub fn decode_entity_edit(payload: &[u8]) -> Result<EntityEdit> {
    let mut reader = PacketDataReader::new(payload);

    let octal_code = reader.read_u8()?;
    if octal_code != ROOT_OCTAL_CODE {
        return Err(Error::MalformedPacket(format!("unsupported octal code {octal_code}")));
    }
    let last_edited = reader.read_u64_le()?;
    let entity_id = reader.read_uuid_be()?;
    let (type_value, consumed) = byte_count_coded::decode(reader.remaining())?;
    reader.skip(consumed)?;
    let entity_type = EntityType::from_u8(type_value as u8);
    let (_update_delta, consumed) = byte_count_coded::decode(reader.remaining())?;
    reader.skip(consumed)?;

    let (flags, consumed) = PropertyFlags::decode(reader.remaining());
    reader.skip(consumed)?;

    let mut properties = EntityProperties::read_all(entity_type, &mut reader, &flags)?;
    properties.last_edited = last_edited;

    Ok(EntityEdit { entity_id, properties })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyloft_support::math::Color;

    const FULL_FIT_HEX: &str = "00b685f1f20a000600b71d53802fcc483393a79a49670175874000fff000020000000000000000401000a82f40b6ee8946ccb50402b88d72a546f02594";
    const PARTIAL_FIT_HEX: &str =
        "00b685f1f20a000600b71d53802fcc483393a79a49670175874000fff00000000000000000000040f02594";

    /// Prefix ahead of the flag block: octal code, last edited, entity ID,
    /// type, update delta.
    const PREFIX_SIZE: usize = 1 + 8 + 16 + 1 + 1;

    fn color_edit_properties() -> EntityProperties {
        let mut properties = EntityProperties::new(EntityType::Box);
        properties.last_edited = 1688896885851574;
        properties.last_edited_by =
            Some(Uuid::parse_str("a82f40b6-ee89-46cc-b504-02b88d72a546").unwrap());
        properties.color = Some(Color::new(240, 37, 148));
        properties
    }

    fn entity_id() -> Uuid {
        Uuid::parse_str("b71d5380-2fcc-4833-93a7-9a4967017587").unwrap()
    }

    #[test]
    fn full_fit_matches_the_reference_bytes() {
        let mut data = OctreePacketData::new(1492);
        let outcome = encode_entity_edit(&entity_id(), &color_edit_properties(), &mut data);

        assert_eq!(outcome.append_state, AppendState::Completed);
        assert!(outcome.didnt_fit.is_empty());
        assert_eq!(hex::encode(data.as_slice()), FULL_FIT_HEX);
    }

    #[test]
    fn partial_fit_drops_the_field_and_its_flag() {
        // Room for the reserved flag block plus the color, but not the
        // 18-byte last-edited-by UUID.
        let mut data = OctreePacketData::new(PREFIX_SIZE + MAX_PROPERTY_FLAGS_BYTES + 3);
        let outcome = encode_entity_edit(&entity_id(), &color_edit_properties(), &mut data);

        assert_eq!(outcome.append_state, AppendState::Partial);
        assert!(outcome.didnt_fit.has_property(crate::entity::property_list::PROP_LAST_EDITED_BY));
        assert!(!outcome.didnt_fit.has_property(crate::entity::property_list::PROP_COLOR));
        assert_eq!(hex::encode(data.as_slice()), PARTIAL_FIT_HEX);
    }

    #[test]
    fn no_fit_leaves_the_buffer_at_the_checkpoint() {
        // 48 bytes: two free bytes after the reserved flag block.
        let mut data = OctreePacketData::new(48);
        let outcome = encode_entity_edit(&entity_id(), &color_edit_properties(), &mut data);

        assert_eq!(outcome.append_state, AppendState::None);
        assert_eq!(data.position(), PREFIX_SIZE);
        assert!(outcome.didnt_fit.has_property(crate::entity::property_list::PROP_LAST_EDITED_BY));
        assert!(outcome.didnt_fit.has_property(crate::entity::property_list::PROP_COLOR));
    }

    #[test]
    fn encoding_is_idempotent() {
        let mut first = OctreePacketData::new(1492);
        let mut second = OctreePacketData::new(1492);
        encode_entity_edit(&entity_id(), &color_edit_properties(), &mut first);
        encode_entity_edit(&entity_id(), &color_edit_properties(), &mut second);
        assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn decode_inverts_encode() {
        let mut properties = color_edit_properties();
        properties.name = Some("lamp".to_string());
        properties.position = Some(skyloft_support::math::Vec3::new(1.0, 2.0, 3.0));

        let mut data = OctreePacketData::new(1492);
        let outcome = encode_entity_edit(&entity_id(), &properties, &mut data);
        assert_eq!(outcome.append_state, AppendState::Completed);

        let decoded = decode_entity_edit(data.as_slice()).unwrap();
        assert_eq!(decoded.entity_id, entity_id());
        assert_eq!(decoded.properties, properties);
    }

    #[test]
    fn decode_reads_a_subtype_block() {
        use crate::entity::light::LightProperties;
        use crate::entity::properties::EntitySubproperties;

        let mut properties = EntityProperties::new(EntityType::Light);
        properties.last_edited = 12345;
        properties.color = Some(Color::new(1, 2, 3));
        properties.subtype = EntitySubproperties::Light(LightProperties {
            is_spotlight: Some(true),
            intensity: Some(2.5),
            ..LightProperties::default()
        });

        let mut data = OctreePacketData::new(1492);
        let outcome = encode_entity_edit(&entity_id(), &properties, &mut data);
        assert_eq!(outcome.append_state, AppendState::Completed);

        let decoded = decode_entity_edit(data.as_slice()).unwrap();
        assert_eq!(decoded.properties, properties);
    }

    #[test]
    fn decode_rejects_a_nonzero_octal_code() {
        let mut data = OctreePacketData::new(1492);
        encode_entity_edit(&entity_id(), &color_edit_properties(), &mut data);
        let mut bytes = data.into_bytes();
        bytes[0] = 1;
        assert!(decode_entity_edit(&bytes).is_err());
    }
}
