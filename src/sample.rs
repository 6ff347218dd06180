//! Conversion of raw X/Y/Z1/Z2 readings into a touch sample

use crate::registers::MAX_12BIT;

/// Resistance of the touch plate, in ohms
pub const PLATE_RESISTANCE: i64 = 280;

/// Full scale of a 12-bit conversion
const ADC_FULL_SCALE: i64 = 4096;

/// A touch position with its derived pressure
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl TouchSample {
    /// Reported for rejected readings
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

/// The four conversion results, exactly as read from the chip
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub x: u16,
    pub y: u16,
    pub z1: u16,
    pub z2: u16,
}

/// How the resistance ratio is scaled into a pressure value
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressureMode {
    /// Multiplies by the integer quotient `280 / 4096`, which is zero, so
    /// every accepted sample reports a pressure of `0`. Kept as the default
    /// so that existing calibration built on this scale keeps working.
    #[default]
    Truncated,
    /// Computes `ratio * 280 / 4096` in a single expression.
    Scaled,
}

impl RawSample {
    /// Does this reading describe a pen on the panel?
    ///
    /// Out-of-range coordinates, a zero Z1, or Z1 not below Z2 mean the pen
    /// is up or the resistive divider gave an inconsistent result.
    pub fn is_valid(&self) -> bool {
        self.x <= MAX_12BIT
            && self.y <= MAX_12BIT
            && self.z1 != 0
            && self.z2 <= MAX_12BIT
            && self.z1 < self.z2
    }

    /// Convert into a [TouchSample], or `None` if the reading is rejected
    pub fn to_sample(self, mode: PressureMode) -> Option<TouchSample> {
        if !self.is_valid() {
            return None;
        }

        // Both coordinates are at most 12 bits wide here.
        let x = self.x as i16;
        let y = self.y as i16;

        let ratio = i64::from(self.x) * i64::from(self.z2 - self.z1) / i64::from(self.z1);
        let z = match mode {
            PressureMode::Truncated => ratio * (PLATE_RESISTANCE / ADC_FULL_SCALE),
            PressureMode::Scaled => ratio * PLATE_RESISTANCE / ADC_FULL_SCALE,
        };
        let z = z.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16;

        Some(TouchSample { x, y, z })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(x: u16, y: u16, z1: u16, z2: u16) -> RawSample {
        RawSample { x, y, z1, z2 }
    }

    #[test]
    fn truncated_pressure_is_always_zero() {
        let sample = raw(100, 200, 50, 300).to_sample(PressureMode::Truncated);
        assert_eq!(sample, Some(TouchSample::new(100, 200, 0)));

        let sample = raw(4095, 4095, 1, 4095).to_sample(PressureMode::Truncated);
        assert_eq!(sample, Some(TouchSample::new(4095, 4095, 0)));
    }

    #[test]
    fn scaled_pressure() {
        // ratio = 100 * 250 / 50 = 500; 500 * 280 / 4096 = 34
        let sample = raw(100, 200, 50, 300).to_sample(PressureMode::Scaled);
        assert_eq!(sample, Some(TouchSample::new(100, 200, 34)));
    }

    #[test]
    fn scaled_pressure_saturates() {
        // ratio = 4095 * 4094 / 1, far beyond i16 once scaled
        let sample = raw(4095, 0, 1, 4095).to_sample(PressureMode::Scaled);
        assert_eq!(sample, Some(TouchSample::new(4095, 0, i16::MAX)));
    }

    #[test]
    fn zero_z1_is_rejected() {
        for (x, y, z2) in [(0, 0, 0), (100, 200, 300), (4095, 4095, 4095)] {
            assert_eq!(raw(x, y, 0, z2).to_sample(PressureMode::Truncated), None);
        }
    }

    #[test]
    fn z1_not_below_z2_is_rejected() {
        assert_eq!(raw(100, 200, 400, 300).to_sample(PressureMode::Scaled), None);
        assert_eq!(raw(100, 200, 300, 300).to_sample(PressureMode::Scaled), None);
    }

    #[test]
    fn out_of_range_readings_are_rejected() {
        assert_eq!(raw(4096, 200, 50, 300).to_sample(PressureMode::Scaled), None);
        assert_eq!(raw(100, 4096, 50, 300).to_sample(PressureMode::Scaled), None);
        assert_eq!(raw(100, 200, 50, 4096).to_sample(PressureMode::Scaled), None);
        assert_eq!(
            raw(0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF).to_sample(PressureMode::Truncated),
            None
        );
    }
}
