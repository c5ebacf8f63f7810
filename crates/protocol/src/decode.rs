//! Sensor value reconstruction.

/// Combines a high and low register byte into an unsigned 16-bit value.
pub fn combine_u16(msb: u8, lsb: u8) -> u16 {
    u16::from_be_bytes([msb, lsb])
}

/// Combines a high and low register byte and reinterprets the result as
/// two's complement.
pub fn combine_i16(msb: u8, lsb: u8) -> i16 {
    i16::from_be_bytes([msb, lsb])
}

/// One three-axis sample in raw sensor counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Axes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Axes {
    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Scales every axis by `factor` (e.g. sensitivity per count).
    pub fn scaled(&self, factor: f32) -> [f32; 3] {
        [self.x, self.y, self.z].map(|v| f32::from(v) * factor)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(500))]

        #[test]
        fn prop_combine_i16_matches_twos_complement(msb in any::<u8>(), lsb in any::<u8>()) {
            let unsigned = i32::from(msb) * 256 + i32::from(lsb);
            let expected = if unsigned >= 0x8000 { unsigned - 0x10000 } else { unsigned };
            prop_assert_eq!(i32::from(combine_i16(msb, lsb)), expected);
        }

        #[test]
        fn prop_combine_i16_and_u16_share_bits(msb in any::<u8>(), lsb in any::<u8>()) {
            prop_assert_eq!(combine_i16(msb, lsb).to_be_bytes(), combine_u16(msb, lsb).to_be_bytes());
        }
    }
}
