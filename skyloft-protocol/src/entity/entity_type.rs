//! Entity types

/// The type of an entity, carried byte-count-coded in every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityType {
    Unknown = 0,
    Box = 1,
    Sphere = 2,
    Shape = 3,
    Model = 4,
    Text = 5,
    Image = 6,
    Web = 7,
    ParticleEffect = 8,
    PolyLine = 9,
    PolyVox = 10,
    Grid = 11,
    Gizmo = 12,
    Light = 13,
    Zone = 14,
    Material = 15,
}

impl EntityType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => EntityType::Box,
            2 => EntityType::Sphere,
            3 => EntityType::Shape,
            4 => EntityType::Model,
            5 => EntityType::Text,
            6 => EntityType::Image,
            7 => EntityType::Web,
            8 => EntityType::ParticleEffect,
            9 => EntityType::PolyLine,
            10 => EntityType::PolyVox,
            11 => EntityType::Grid,
            12 => EntityType::Gizmo,
            13 => EntityType::Light,
            14 => EntityType::Zone,
            15 => EntityType::Material,
            _ => EntityType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_round_trip() {
        for value in 0u8..=15 {
            assert_eq!(EntityType::from_u8(value).as_u8(), value);
        }
        assert_eq!(EntityType::from_u8(200), EntityType::Unknown);
    }

    #[test]
    fn box_is_type_one() {
        // The edit codec's known-answer vectors depend on this value.
        assert_eq!(EntityType::Box.as_u8(), 1);
    }
}
