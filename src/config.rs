//! Acquisition configuration written to CFR0, CFR1 and CFR2

use bondrewd::Bitfields;

use crate::registers::{Cfr0, Cfr1, Cfr2};

/// Precharge time before each conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Precharge {
    Us20 = 0,
    Us84 = 1,
    Us276 = 2,
    Us340 = 3,
    Us1044 = 4,
    Us1108 = 5,
    Us1300 = 6,
    Us1364 = 7,
}

/// Sense settling time before each conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Stabilization {
    Us0 = 0,
    Us100 = 1,
    Us500 = 2,
    Ms1 = 3,
    Ms5 = 4,
    Ms10 = 5,
    Ms50 = 6,
    Ms100 = 7,
}

/// Internal conversion clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConversionClock {
    Mhz4 = 0,
    Mhz2 = 1,
    Mhz1 = 2,
}

/// Converter resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Resolution {
    Bits10 = 0,
    Bits12 = 1,
}

/// Delay between conversion batches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BatchDelay {
    Ms0 = 0,
    Ms1 = 1,
    Ms2 = 2,
    Ms4 = 3,
    Ms10 = 4,
    Ms20 = 5,
    Ms40 = 6,
    Ms100 = 7,
}

/// Moving-average window, in samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AveragingWindow {
    Samples1 = 0,
    Samples3 = 1,
    Samples7 = 2,
    Samples15 = 3,
}

/// Median filter length, in taps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MedianFilter {
    Taps1 = 0,
    Taps3 = 1,
    Taps7 = 2,
    Taps15 = 3,
}

/// Acquisition timing and filtering applied by the chip.
///
/// The [Default] is what [crate::TSC2004::begin] writes: 276µs precharge,
/// 1ms stabilization, 1MHz clock, 12-bit conversions with pen-detect mode,
/// a 4ms batch delay and moving-average filtering on X, Y and Z using a
/// 7-sample window behind a 15-tap median filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub precharge: Precharge,
    pub stabilization: Stabilization,
    pub clock: ConversionClock,
    pub resolution: Resolution,
    pub pen_mode: bool,
    pub batch_delay: BatchDelay,
    pub averaging: AveragingWindow,
    pub median: MedianFilter,
    pub average_x: bool,
    pub average_y: bool,
    pub average_z: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precharge: Precharge::Us276,
            stabilization: Stabilization::Ms1,
            clock: ConversionClock::Mhz1,
            resolution: Resolution::Bits12,
            pen_mode: true,
            batch_delay: BatchDelay::Ms4,
            averaging: AveragingWindow::Samples7,
            median: MedianFilter::Taps15,
            average_x: true,
            average_y: true,
            average_z: true,
        }
    }
}

impl Config {
    /// Word for configuration register 0
    pub fn cfr0(&self) -> u16 {
        let cfr0 = Cfr0 {
            pen_mode: self.pen_mode as u8,
            status_mode: 0,
            resolution: self.resolution as u8,
            clock: self.clock as u8,
            stabilization: self.stabilization as u8,
            precharge: self.precharge as u8,
            padding0: 0,
        };

        u16::from_be_bytes(cfr0.into_bytes())
    }

    /// Word for configuration register 1
    pub fn cfr1(&self) -> u16 {
        let cfr1 = Cfr1 {
            padding0: 0,
            batch_delay: self.batch_delay as u8,
        };

        u16::from_be_bytes(cfr1.into_bytes())
    }

    /// Word for configuration register 2
    pub fn cfr2(&self) -> u16 {
        let cfr2 = Cfr2 {
            padding0: 0,
            median: self.median as u8,
            window: self.averaging as u8,
            padding1: 0,
            average_x: self.average_x as u8,
            average_y: self.average_y as u8,
            average_z: self.average_z as u8,
            padding2: 0,
        };

        u16::from_be_bytes(cfr2.into_bytes())
    }
}
