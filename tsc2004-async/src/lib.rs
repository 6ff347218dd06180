//! TSC2004 Resistive Touchscreen Controller

#![no_std]

use core::fmt::Debug;

use embedded_hal_async::{delay::DelayNs, i2c::I2c};
pub use tsc2004::{
    config,
    registers,
    sample,
    AveragingWindow,
    BatchDelay,
    Command,
    Config,
    ConversionClock,
    Error,
    MedianFilter,
    Precharge,
    PressureMode,
    RawSample,
    Register,
    Resolution,
    Stabilization,
    TouchSample,
    DEFAULT_ADDR,
    RESET_DELAY_MS,
};

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
    I2C: I2c<Error = E>,
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
    pub async fn begin<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.begin_with_config(&Config::default(), delay).await
    }

    /// Reset the device, configure it and start continuous conversion
    pub async fn begin_with_config<D: DelayNs>(
        &mut self,
        config: &Config,
        delay: &mut D,
    ) -> Result<(), Error<E>> {
        self.reset().await?;
        delay.delay_ms(u32::from(RESET_DELAY_MS)).await;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "cfr0 0x{:04x}, cfr1 0x{:04x}, cfr2 0x{:04x}",
            config.cfr0(),
            config.cfr1(),
            config.cfr2()
        );

        self.write_register(Register::Cfr0, config.cfr0()).await?;
        self.write_register(Register::Cfr1, config.cfr1()).await?;
        self.write_register(Register::Cfr2, config.cfr2()).await?;

        self.write_command(Command::Normal).await
    }

    /// Issue a software reset
    pub async fn reset(&mut self) -> Result<(), Error<E>> {
        self.write_command(Command::Reset).await
    }

    /// Stop continuous conversion; [TSC2004::begin] starts it again
    pub async fn stop(&mut self) -> Result<(), Error<E>> {
        self.write_command(Command::Stop).await
    }

    /// Is the pen-detect mode bit set in CFR0?
    ///
    /// This is a configuration bit, not pen state. Prefer
    /// [TSC2004::data_available] to detect a touch.
    pub async fn touched(&mut self) -> Result<bool, Error<E>> {
        let cfr0 = self.read_register(Register::Cfr0).await?;

        Ok(registers::pen_mode(cfr0))
    }

    /// Negation of [TSC2004::touched]
    pub async fn buffer_empty(&mut self) -> Result<bool, Error<E>> {
        Ok(!self.touched().await?)
    }

    /// Is there a finished conversion available to read from the device?
    pub async fn data_available(&mut self) -> Result<bool, Error<E>> {
        let status = self.read_register(Register::Status).await?;

        Ok(registers::data_available(status))
    }

    /// Poll the status register until a conversion is available, reading it
    /// at most `max_polls` times (and at least once)
    pub async fn wait_for_data(&mut self, max_polls: u32) -> Result<(), Error<E>> {
        for _ in 0..max_polls.max(1) {
            if self.data_available().await? {
                return Ok(());
            }
        }

        Err(Error::NoDataAvailable)
    }

    /// Poll the status register until a conversion is available, sleeping
    /// `interval_us` between reads.
    ///
    /// Never returns if the device stops converting; drop the future to
    /// cancel.
    pub async fn wait_for_data_blocking<D: DelayNs>(
        &mut self,
        delay: &mut D,
        interval_us: u32,
    ) -> Result<(), Error<E>> {
        while !self.data_available().await? {
            delay.delay_us(interval_us).await;
        }

        Ok(())
    }

    /// Read the X, Y, Z1 and Z2 conversion results
    pub async fn read_raw(&mut self) -> Result<RawSample, Error<E>> {
        let x = self.read_register(Register::X).await?;
        let y = self.read_register(Register::Y).await?;
        let z1 = self.read_register(Register::Z1).await?;
        let z2 = self.read_register(Register::Z2).await?;

        Ok(RawSample { x, y, z1, z2 })
    }

    /// Wait for a conversion, polling at most `max_polls` times, and read it
    /// as a [TouchSample]; rejected readings are [TouchSample::ZERO]
    pub async fn sample(&mut self, max_polls: u32) -> Result<TouchSample, Error<E>> {
        Ok(self
            .try_sample(max_polls)
            .await?
            .unwrap_or(TouchSample::ZERO))
    }

    /// Like [TSC2004::sample], but waits for as long as it takes
    pub async fn sample_blocking<D: DelayNs>(
        &mut self,
        delay: &mut D,
        interval_us: u32,
    ) -> Result<TouchSample, Error<E>> {
        self.wait_for_data_blocking(delay, interval_us).await?;
        let raw = self.read_raw().await?;

        Ok(self.convert(raw).unwrap_or(TouchSample::ZERO))
    }

    /// Wait for a conversion, polling at most `max_polls` times, and read it.
    ///
    /// Returns `None` when the reading does not describe a pen on the panel.
    pub async fn try_sample(&mut self, max_polls: u32) -> Result<Option<TouchSample>, Error<E>> {
        self.wait_for_data(max_polls).await?;
        let raw = self.read_raw().await?;

        Ok(self.convert(raw))
    }

    /// Read a register as a big-endian word
    pub async fn read_register(&mut self, register: Register) -> Result<u16, Error<E>> {
        self.i2c
            .write(self.addr, &[register.read_control()])
            .await
            .map_err(Error::BusError)?;

        let mut buffer = [0u8; 2];
        self.i2c
            .read(self.addr, &mut buffer)
            .await
            .map_err(Error::BusError)?;

        Ok(registers::decode_word(&buffer))
    }

    /// Write a big-endian word to a register
    pub async fn write_register(&mut self, register: Register, value: u16) -> Result<(), Error<E>> {
        self.i2c
            .write(self.addr, &register.write_frame(value))
            .await
            .map_err(Error::BusError)
    }

    /// Send a command byte
    pub async fn write_command(&mut self, command: Command) -> Result<(), Error<E>> {
        self.i2c
            .write(self.addr, &[command.control_byte()])
            .await
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
