//! Packed quaternions
//!
//! Rotations ship in 8 wire bytes using smallest-three packing: the index of
//! the largest-magnitude component rides in the top two bits of a u64, and
//! the other three components are stored in order as 15-bit signed
//! fixed-point values scaled from [-1/sqrt(2), 1/sqrt(2)]. The largest
//! component is normalized positive before packing and reconstructed from
//! the unit-length constraint on unpack.

use crate::math::Quat;

const COMPONENT_BITS: u32 = 15;
const COMPONENT_MASK: u64 = (1 << COMPONENT_BITS) - 1;
const COMPONENT_SCALE: f32 = ((1i32 << (COMPONENT_BITS - 1)) - 1) as f32; // 16383
const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Pack a unit quaternion into its 8-byte wire form.
pub fn pack(quat: &Quat) -> u64 {
    let components = [quat.x, quat.y, quat.z, quat.w];

    let mut largest_index = 0usize;
    for (index, component) in components.iter().enumerate() {
        if component.abs() > components[largest_index].abs() {
            largest_index = index;
        }
    }

    // q and -q are the same rotation; keep the dropped component positive.
    let flip = components[largest_index] < 0.0;

    let mut packed = (largest_index as u64) << 62;
    let mut slot = 0u32;
    for (index, component) in components.iter().enumerate() {
        if index == largest_index {
            continue;
        }
        let value = if flip { -component } else { *component };
        let fixed = (value * SQRT_2 * COMPONENT_SCALE)
            .round()
            .clamp(-COMPONENT_SCALE, COMPONENT_SCALE) as i32;
        packed |= (fixed as u64 & COMPONENT_MASK) << (30 - slot * COMPONENT_BITS);
        slot += 1;
    }

    packed
}

/// Unpack an 8-byte wire rotation back into a quaternion.
pub fn unpack(packed: u64) -> Quat {
    let largest_index = (packed >> 62) as usize;

    let mut components = [0.0f32; 4];
    let mut slot = 0u32;
    let mut sum_of_squares = 0.0f32;
    for index in 0..4 {
        if index == largest_index {
            continue;
        }
        let raw = ((packed >> (30 - slot * COMPONENT_BITS)) & COMPONENT_MASK) as u32;
        // Sign-extend the 15-bit field.
        let fixed = ((raw << (32 - COMPONENT_BITS)) as i32) >> (32 - COMPONENT_BITS);
        let value = fixed as f32 / COMPONENT_SCALE / SQRT_2;
        components[index] = value;
        sum_of_squares += value * value;
        slot += 1;
    }

    components[largest_index] = (1.0 - sum_of_squares).max(0.0).sqrt();

    Quat {
        x: components[0],
        y: components[1],
        z: components[2],
        w: components[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(x: f32, y: f32, z: f32, w: f32) -> Quat {
        let magnitude = (x * x + y * y + z * z + w * w).sqrt();
        Quat::new(x / magnitude, y / magnitude, z / magnitude, w / magnitude)
    }

    fn assert_close(a: &Quat, b: &Quat) {
        // Packing precision plus reconstruction of the dropped component.
        const TOLERANCE: f32 = 2.5e-4;
        let same = (a.x - b.x).abs() < TOLERANCE
            && (a.y - b.y).abs() < TOLERANCE
            && (a.z - b.z).abs() < TOLERANCE
            && (a.w - b.w).abs() < TOLERANCE;
        let negated = (a.x + b.x).abs() < TOLERANCE
            && (a.y + b.y).abs() < TOLERANCE
            && (a.z + b.z).abs() < TOLERANCE
            && (a.w + b.w).abs() < TOLERANCE;
        assert!(same || negated, "{a:?} != {b:?}");
    }

    #[test]
    fn identity_round_trips() {
        let identity = Quat::default();
        assert_close(&unpack(pack(&identity)), &identity);
    }

    #[test]
    fn assorted_rotations_round_trip() {
        let cases = [
            normalized(1.0, 0.0, 0.0, 1.0),
            normalized(0.0, 1.0, 0.0, 1.0),
            normalized(0.0, 0.0, 1.0, 1.0),
            normalized(0.5, -0.5, 0.5, 0.5),
            normalized(-0.3, 0.8, -0.1, 0.6),
            normalized(0.1, 0.2, 0.3, -0.9),
            normalized(-1.0, 0.001, 0.001, 0.001),
        ];
        for quat in cases {
            assert_close(&unpack(pack(&quat)), &quat);
        }
    }

    #[test]
    fn unpacked_rotations_are_unit_length() {
        let quat = normalized(0.4, -0.7, 0.2, 0.5);
        let unpacked = unpack(pack(&quat));
        let magnitude =
            (unpacked.x * unpacked.x + unpacked.y * unpacked.y + unpacked.z * unpacked.z
                + unpacked.w * unpacked.w)
                .sqrt();
        assert!((magnitude - 1.0).abs() < 1e-3);
    }

    #[test]
    fn largest_component_index_is_preserved() {
        let quat = normalized(0.05, 0.9, 0.1, 0.2);
        assert_eq!(pack(&quat) >> 62, 1);
    }
}
