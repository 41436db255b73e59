//! # TMD2772 Ambient Light and Proximity Sensor Driver
//!
//! This is a platform-agnostic Rust driver for the AMS TMD2772 digital ambient light
//! and proximity sensor, built using the [`embedded-hal`] traits for I2C communication.
//!
//! The TMD2772 provides:
//! - Two ALS photodiode channels (CH0 visible + IR, CH1 mostly IR)
//! - A proximity channel driven by an integrated IR LED
//! - Programmable integration times, wait time, LED drive and gain
//! - I2C interface (address 0x39)
//!
//! ## Features
//!
//! - **Fixed start-up configuration** matching the common breakout boards
//! - **Lux calculation** using the dual-channel CPL formula
//! - **Atomic sample read** of both ALS channels and proximity in one transaction
//! - **Async/await support** with feature gating (optional)
//! - **defmt logging** with feature gating (optional)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tmd2772::Tmd2772;
//!
//! # fn main() {
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! let mut sensor = Tmd2772::new(i2c);
//!
//! // Power on, set timings and gain
//! sensor.configure().unwrap();
//!
//! // Wait for the first integration cycle
//! // std::thread::sleep(std::time::Duration::from_millis(tmd2772::SETTLE_TIME_MS as u64));
//!
//! let measurement = sensor.measure().unwrap();
//! // println!("{}", measurement);
//! # let _ = measurement;
//! # }
//! ```
//!
//! ## Async Usage
//!
//! Enable the `async` feature to use async/await patterns:
//!
//! ```toml
//! [dependencies]
//! tmd2772 = { version = "0.1", features = ["async"] }
//! ```
//!
//! ```rust,ignore
//! use tmd2772::Tmd2772;
//!
//! let mut sensor = Tmd2772::new_async_with_delay(i2c, delay);
//! sensor.configure_and_settle_async().await?;
//! let measurement = sensor.measure_async().await?;
//! ```
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![no_std]
#![deny(missing_docs)]

#[cfg(test)]
extern crate std;

use core::fmt;

use embedded_hal::i2c::I2c;

#[cfg(feature = "async")]
use embedded_hal_async::i2c::I2c as AsyncI2c;

macro_rules! log_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt-03")]
        defmt::debug!($($arg)*);
    };
}

macro_rules! log_warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt-03")]
        defmt::warn!($($arg)*);
    };
}

pub mod config;
pub mod conversion;
pub mod ll;

pub use config::{
    AlsGain, Config, Control, Enable, LedDrive, ProximityDiode, ProximityGain, SETTLE_TIME_MS,
};
pub use conversion::{select_luminance, Calibration, Measurement, RawSample};
pub use ll::{Register, I2C_ADDRESS};

use ll::DATA_BLOCK_LEN;

/// All possible errors in this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// A configuration write failed; the sensor state is unknown
    Configuration {
        /// Register whose write failed
        register: u8,
        /// Bus error
        source: E,
    },
    /// The data block transaction failed or came back short
    Read(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { register, source } => write!(
                f,
                "failed to write register {:#04x}: {:?}",
                register, source
            ),
            Error::Read(_) => f.write_str("Input/Output error"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

/// High-level TMD2772 driver
pub struct Tmd2772<I2C, Delay = ()> {
    i2c: I2C,
    delay: Delay,
    config: Config,
    calibration: Calibration,
}

impl<I2C, E> Tmd2772<I2C, ()>
where
    I2C: I2c<Error = E>,
{
    /// Create a new TMD2772 driver instance without delay support
    pub fn new(i2c: I2C) -> Self {
        Self::with_config(i2c, (), Config::DEFAULT)
    }
}

impl<I2C, E, Delay> Tmd2772<I2C, Delay>
where
    I2C: I2c<Error = E>,
    Delay: embedded_hal::delay::DelayNs,
{
    /// Create a new TMD2772 driver instance with delay support
    pub fn new_with_delay(i2c: I2C, delay: Delay) -> Self {
        Self::with_config(i2c, delay, Config::DEFAULT)
    }

    /// Configure the sensor and block until the first sample is valid
    pub fn configure_and_settle(&mut self) -> Result<(), Error<E>> {
        self.configure()?;
        self.delay.delay_ms(SETTLE_TIME_MS);
        Ok(())
    }

    /// Wait one settling interval, then measure
    pub fn measure_blocking(&mut self) -> Result<Measurement, Error<E>> {
        self.delay.delay_ms(SETTLE_TIME_MS);
        self.measure()
    }
}

impl<I2C, Delay> Tmd2772<I2C, Delay> {
    /// Create a driver applying `config` instead of [`Config::DEFAULT`].
    ///
    /// The calibration is derived from the same config.
    pub fn with_config(i2c: I2C, delay: Delay, config: Config) -> Self {
        Self {
            i2c,
            delay,
            calibration: Calibration::for_config(&config),
            config,
        }
    }

    /// Configuration written by [`Tmd2772::configure`]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Calibration used for lux conversion
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Destroy the driver and return the I2C interface
    pub fn destroy(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E, Delay> Tmd2772<I2C, Delay>
where
    I2C: I2c<Error = E>,
{
    /// Write the configuration registers in order: enable, ATIME, PTIME, WTIME, control.
    ///
    /// Stops at the first failed write.
    pub fn configure(&mut self) -> Result<(), Error<E>> {
        for (register, value) in self.config.writes() {
            self.write_register(register, value)?;
        }
        Ok(())
    }

    /// Read C0DATA, C1DATA and PDATA in a single select-then-read transaction
    pub fn read_raw_sample(&mut self) -> Result<RawSample, Error<E>> {
        let mut data = [0u8; DATA_BLOCK_LEN];
        self.i2c
            .write_read(I2C_ADDRESS, &ll::select_frame(Register::C0DATA), &mut data)
            .map_err(|e| {
                log_warn!("TMD2772: data block read failed");
                Error::Read(e)
            })?;
        let sample = RawSample::from_bytes(&data);
        log_debug!("TMD2772: {}", sample);
        Ok(sample)
    }

    /// Read one sample and convert it
    pub fn measure(&mut self) -> Result<Measurement, Error<E>> {
        let sample = self.read_raw_sample()?;
        Ok(Measurement::from_raw(&sample, &self.calibration))
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
        log_debug!("TMD2772: write {=u8:#x} <- {=u8:#x}", register, value);
        self.i2c
            .write(I2C_ADDRESS, &ll::write_frame(register, value))
            .map_err(|source| {
                log_warn!("TMD2772: write to {=u8:#x} failed", register);
                Error::Configuration { register, source }
            })
    }
}

#[cfg(feature = "async")]
impl<I2C, E> Tmd2772<I2C, ()>
where
    I2C: AsyncI2c<Error = E>,
{
    /// Create a new TMD2772 driver instance without delay support (async version)
    pub fn new_async(i2c: I2C) -> Self {
        Self::with_config(i2c, (), Config::DEFAULT)
    }
}

#[cfg(feature = "async")]
impl<I2C, E, Delay> Tmd2772<I2C, Delay>
where
    I2C: AsyncI2c<Error = E>,
    Delay: embedded_hal_async::delay::DelayNs,
{
    /// Create a new TMD2772 driver instance with delay support (async version)
    pub fn new_async_with_delay(i2c: I2C, delay: Delay) -> Self {
        Self::with_config(i2c, delay, Config::DEFAULT)
    }

    /// Configure the sensor and wait until the first sample is valid (async version)
    pub async fn configure_and_settle_async(&mut self) -> Result<(), Error<E>> {
        self.configure_async().await?;
        self.delay.delay_ms(SETTLE_TIME_MS).await;
        Ok(())
    }
}

#[cfg(feature = "async")]
impl<I2C, E, Delay> Tmd2772<I2C, Delay>
where
    I2C: AsyncI2c<Error = E>,
{
    /// Write the configuration registers in order (async version)
    pub async fn configure_async(&mut self) -> Result<(), Error<E>> {
        for (register, value) in self.config.writes() {
            self.write_register_async(register, value).await?;
        }
        Ok(())
    }

    /// Read C0DATA, C1DATA and PDATA in one transaction (async version)
    pub async fn read_raw_sample_async(&mut self) -> Result<RawSample, Error<E>> {
        let mut data = [0u8; DATA_BLOCK_LEN];
        self.i2c
            .write_read(I2C_ADDRESS, &ll::select_frame(Register::C0DATA), &mut data)
            .await
            .map_err(|e| {
                log_warn!("TMD2772: data block read failed");
                Error::Read(e)
            })?;
        let sample = RawSample::from_bytes(&data);
        log_debug!("TMD2772: {}", sample);
        Ok(sample)
    }

    /// Read one sample and convert it (async version)
    pub async fn measure_async(&mut self) -> Result<Measurement, Error<E>> {
        let sample = self.read_raw_sample_async().await?;
        Ok(Measurement::from_raw(&sample, &self.calibration))
    }

    async fn write_register_async(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
        log_debug!("TMD2772: write {=u8:#x} <- {=u8:#x}", register, value);
        self.i2c
            .write(I2C_ADDRESS, &ll::write_frame(register, value))
            .await
            .map_err(|source| {
                log_warn!("TMD2772: write to {=u8:#x} failed", register);
                Error::Configuration { register, source }
            })
    }
}


#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::{format, vec, vec::Vec};

    fn config_writes() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(I2C_ADDRESS, vec![0x80, 0x0F]),
            I2cTransaction::write(I2C_ADDRESS, vec![0x81, 0xFF]),
            I2cTransaction::write(I2C_ADDRESS, vec![0x82, 0xFF]),
            I2cTransaction::write(I2C_ADDRESS, vec![0x83, 0xFF]),
            I2cTransaction::write(I2C_ADDRESS, vec![0x8F, 0x20]),
        ]
    }

    #[tokio::test]
    async fn test_configure_sequence_async() {
        let i2c = I2cMock::new(&config_writes());
        let mut sensor = Tmd2772::new_async(i2c);

        sensor.configure_async().await.unwrap();

        let mut i2c = sensor.destroy();
        i2c.done();
    }

    #[tokio::test]
    async fn test_configure_stops_on_failed_write_async() {
        let expectations = [
            I2cTransaction::write(I2C_ADDRESS, vec![0x80, 0x0F]),
            I2cTransaction::write(I2C_ADDRESS, vec![0x81, 0xFF]).with_error(ErrorKind::Other),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tmd2772::new_async(i2c);

        match sensor.configure_async().await {
            Err(Error::Configuration { register, source }) => {
                assert_eq!(register, Register::ATIME);
                assert_eq!(source, ErrorKind::Other);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut i2c = sensor.destroy();
        i2c.done();
    }

    #[tokio::test]
    async fn test_failed_read_reports_io_error_async() {
        let expectations = [I2cTransaction::write_read(I2C_ADDRESS, vec![0x94], vec![0; 6])
            .with_error(ErrorKind::Other)];
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tmd2772::new_async(i2c);

        let err = sensor.measure_async().await.unwrap_err();
        assert!(matches!(err, Error::Read(ErrorKind::Other)));
        assert_eq!(format!("{}", err), "Input/Output error");

        let mut i2c = sensor.destroy();
        i2c.done();
    }

    #[tokio::test]
    async fn test_configure_and_settle_then_measure_async() {
        let mut expectations = config_writes();
        expectations.push(I2cTransaction::write_read(
            I2C_ADDRESS,
            vec![0x94],
            vec![0x34, 0x12, 0x78, 0x56, 0x2A, 0x00],
        ));
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tmd2772::new_async_with_delay(i2c, NoopDelay::new());

        sensor.configure_and_settle_async().await.unwrap();
        let sample = sensor.read_raw_sample_async().await.unwrap();
        assert_eq!(
            sample,
            RawSample {
                c0: 0x1234,
                c1: 0x5678,
                proximity: 42,
            }
        );

        let mut i2c = sensor.destroy();
        i2c.done();
    }
}
