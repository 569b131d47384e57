#![cfg_attr(not(test), no_std)]
//! Async driver for the Bosch Sensortec BMP180, BMP280, BME280 and BMP388 (and BMP390) barometric sensors.
//!
//! Every reading runs a forced-mode conversion: the driver starts a conversion, polls the busy indication
//! and reads the raw ADC counts, which are then compensated with the sensor's factory calibration using
//! the integer formulas from the datasheets. Results are available as fixed-point integers, plain floats
//! and, with the `uom` feature, as typed quantities.
//!
//! ```rust,no_run
//! # use embedded_hal_async::delay::DelayNs;
//! # use embedded_hal_async::i2c::I2c;
//! use bsbmp::{AccuracyMode, Bmp, BmpResult, SdoPinState, SensorKind};
//! use bsbmp::config::Configuration;
//! # async fn demo<I: I2c, D: DelayNs>(i2c: I, delay: D) -> BmpResult<(), I::Error> {
//!
//! let mut device = Bmp::new_i2c(SensorKind::Bmp280, i2c, SdoPinState::Low.into(), delay, Configuration::default()).await?;
//!
//! let temperature = device.read_temperature_c(AccuracyMode::Standard).await?;
//! if temperature.timed_out() {
//!     // the sensor didn't finish in time, the value may be stale
//! }
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod calibration;
pub mod compensation;
pub mod config;
pub mod error;
pub mod measurement;
pub mod observer;
pub mod register;
pub mod sensor;
pub mod units;

#[cfg(test)]
mod testing;

pub use calibration::CalibrationSet;
pub use compensation::{Compensated, RawSample};
pub use config::{AccuracyMode, Configuration};
pub use error::{BmpError, BmpResult, InvalidCoefficient};
pub use measurement::{PollOutcome, Quantity};
pub use observer::{NoopObserver, Observer};
pub use sensor::{Bmp, BmpI2c, Reading, SdoPinState, SensorKind};
