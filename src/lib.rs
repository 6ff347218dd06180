//! TSC2004 Resistive Touchscreen Controller

#![no_std]

use core::fmt::Debug;

use embedded_hal::blocking::{
    delay::DelayMs,
    i2c::{Read, Write},
};

pub use crate::{
    config::{
        AveragingWindow,
        BatchDelay,
        Config,
        ConversionClock,
        MedianFilter,
        Precharge,
        Resolution,
        Stabilization,
    },
    registers::{Command, Register},
    sample::{PressureMode, RawSample, TouchSample},
};

pub mod config;
pub mod registers;
pub mod sample;

/// Default I²C address for the TSC2004
pub const DEFAULT_ADDR: u8 = 0x4B;

/// Settle time required after a software reset, in milliseconds
pub const RESET_DELAY_MS: u8 = 10;

/// Any type of error which may occur while interacting with the device
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Some error originating from the communication bus
    BusError(E),
    /// The status register never reported a finished conversion
    NoDataAvailable,
}

/// TSC2004 driver
pub struct TSC2004<I2C> {
    /// Underlying I²C peripheral
    i2c: I2C,
    /// Device address on the bus
    addr: u8,
    /// Pressure scaling applied to accepted samples
    pressure_mode: PressureMode,
}

impl<I2C, E> TSC2004<I2C>
where
    I2C: Write<Error = E> + Read<Error = E>,
    E: Debug,
{
    /// Create a new instance of the driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::new_with_addr(i2c, DEFAULT_ADDR)
    }

    /// Create a new instance of the driver at the given address
    pub fn new_with_addr(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            pressure_mode: PressureMode::default(),
        }
    }

    /// Give the bus back to the caller
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Device address on the bus
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Pressure scaling applied to accepted samples
    pub fn pressure_mode(&self) -> PressureMode {
        self.pressure_mode
    }

    /// Choose how the pressure of accepted samples is scaled
    pub fn set_pressure_mode(&mut self, mode: PressureMode) {
        self.pressure_mode = mode;
    }

    /// Reset the device, configure it with [Config::default] and start
    /// continuous conversion
    pub fn begin<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.begin_with_config(&Config::default(), delay)
    }

    /// Reset the device, configure it and start continuous conversion
    pub fn begin_with_config<D: DelayMs<u8>>(
        &mut self,
        config: &Config,
        delay: &mut D,
    ) -> Result<(), Error<E>> {
        self.reset()?;
        delay.delay_ms(RESET_DELAY_MS);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "cfr0 0x{:04x}, cfr1 0x{:04x}, cfr2 0x{:04x}",
            config.cfr0(),
            config.cfr1(),
            config.cfr2()
        );

        self.write_register(Register::Cfr0, config.cfr0())?;
        self.write_register(Register::Cfr1, config.cfr1())?;
        self.write_register(Register::Cfr2, config.cfr2())?;

        self.write_command(Command::Normal)
    }

    /// Issue a software reset
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        self.write_command(Command::Reset)
    }

    /// Stop continuous conversion; [TSC2004::begin] starts it again
    pub fn stop(&mut self) -> Result<(), Error<E>> {
        self.write_command(Command::Stop)
    }

    /// Is the pen-detect mode bit set in CFR0?
    ///
    /// This reads back a configuration bit, which stays set for as long as
    /// pen-detect mode is configured, so it does not track the pen. Prefer
    /// [TSC2004::data_available] to detect a touch.
    pub fn touched(&mut self) -> Result<bool, Error<E>> {
        let cfr0 = self.read_register(Register::Cfr0)?;

        Ok(registers::pen_mode(cfr0))
    }

    /// Negation of [TSC2004::touched]
    pub fn buffer_empty(&mut self) -> Result<bool, Error<E>> {
        Ok(!self.touched()?)
    }

    /// Is there a finished conversion available to read from the device?
    pub fn data_available(&mut self) -> Result<bool, Error<E>> {
        let status = self.read_register(Register::Status)?;

        Ok(registers::data_available(status))
    }

    /// Poll the status register until a conversion is available, reading it
    /// at most `max_polls` times (and at least once)
    pub fn wait_for_data(&mut self, max_polls: u32) -> Result<(), Error<E>> {
        for _ in 0..max_polls.max(1) {
            if self.data_available()? {
                return Ok(());
            }
        }

        Err(Error::NoDataAvailable)
    }

    /// Poll the status register until a conversion is available.
    ///
    /// Never returns if the device stops converting.
    pub fn wait_for_data_blocking(&mut self) -> Result<(), Error<E>> {
        while !self.data_available()? {}

        Ok(())
    }

    /// Read the X, Y, Z1 and Z2 conversion results
    pub fn read_raw(&mut self) -> Result<RawSample, Error<E>> {
        let x = self.read_register(Register::X)?;
        let y = self.read_register(Register::Y)?;
        let z1 = self.read_register(Register::Z1)?;
        let z2 = self.read_register(Register::Z2)?;

        Ok(RawSample { x, y, z1, z2 })
    }

    /// Wait for a conversion, polling at most `max_polls` times, and read it
    /// as a [TouchSample].
    ///
    /// Readings which do not describe a pen on the panel are reported as
    /// [TouchSample::ZERO].
    pub fn sample(&mut self, max_polls: u32) -> Result<TouchSample, Error<E>> {
        Ok(self.try_sample(max_polls)?.unwrap_or(TouchSample::ZERO))
    }

    /// Like [TSC2004::sample], but waits for as long as it takes
    pub fn sample_blocking(&mut self) -> Result<TouchSample, Error<E>> {
        self.wait_for_data_blocking()?;
        let raw = self.read_raw()?;

        Ok(self.convert(raw).unwrap_or(TouchSample::ZERO))
    }

    /// Wait for a conversion, polling at most `max_polls` times, and read it.
    ///
    /// Returns `None` when the reading does not describe a pen on the panel.
    pub fn try_sample(&mut self, max_polls: u32) -> Result<Option<TouchSample>, Error<E>> {
        self.wait_for_data(max_polls)?;
        let raw = self.read_raw()?;

        Ok(self.convert(raw))
    }

    /// Read a register as a big-endian word
    pub fn read_register(&mut self, register: Register) -> Result<u16, Error<E>> {
        self.i2c
            .write(self.addr, &[register.read_control()])
            .map_err(Error::BusError)?;

        let mut buffer = [0u8; 2];
        self.i2c
            .read(self.addr, &mut buffer)
            .map_err(Error::BusError)?;

        Ok(registers::decode_word(&buffer))
    }

    /// Write a big-endian word to a register
    pub fn write_register(&mut self, register: Register, value: u16) -> Result<(), Error<E>> {
        self.i2c
            .write(self.addr, &register.write_frame(value))
            .map_err(Error::BusError)
    }

    /// Send a command byte
    pub fn write_command(&mut self, command: Command) -> Result<(), Error<E>> {
        self.i2c
            .write(self.addr, &[command.control_byte()])
            .map_err(Error::BusError)
    }

    // -----------------------------------------------------------------------
    // PRIVATE

    fn convert(&self, raw: RawSample) -> Option<TouchSample> {
        let sample = raw.to_sample(self.pressure_mode);

        #[cfg(feature = "defmt")]
        {
            if sample.is_none() {
                defmt::debug!("rejected reading {}", raw);
            }
        }

        sample
    }
}
