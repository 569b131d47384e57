//! Forced-mode measurement cycles.
//!
//! A cycle is `trigger -> poll -> read`: the control register(s) are written to start one conversion,
//! the busy indication is polled at a fixed interval for a bounded number of attempts and the output
//! registers are read. The output registers are read even when polling timed out. The timeout is
//! reported next to the data and it is up to the caller to decide whether the data can be trusted.

use embedded_hal_async::delay::DelayNs;
use log::{debug, warn};

use crate::bus::Bus;
use crate::compensation::RawSample;
use crate::config::{AccuracyMode, Configuration};
use crate::error::BmpResult;
use crate::observer::Observer;
use crate::register::{bme280, bmp180, bmp280, bmp388};
use crate::sensor::SensorKind;

/// What a single forced conversion samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Conversion {
    Temperature,
    Pressure,
    TemperatureAndPressure,
    TemperatureAndHumidity,
}

impl Conversion {
    fn samples_temperature(self) -> bool {
        !matches!(self, Conversion::Pressure)
    }

    fn samples_pressure(self) -> bool {
        matches!(self, Conversion::Pressure | Conversion::TemperatureAndPressure)
    }
}

/// The quantity a caller is interested in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    Temperature,
    Pressure,
    Humidity,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// The conversion finished. `attempts` is the number of status reads it took.
    Ready { attempts: u32 },
    /// The busy indication never cleared within the configured number of attempts.
    TimedOut,
}

impl PollOutcome {
    pub fn timed_out(&self) -> bool {
        matches!(self, PollOutcome::TimedOut)
    }
}

/// Oversampling codes for one conversion, already translated for the sensor at hand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OversamplingCodes {
    pub temperature: u8,
    pub pressure: u8,
    pub humidity: u8,
}

impl OversamplingCodes {
    /// The code of the quantity the conversion is actually for.
    fn primary(&self, conversion: Conversion) -> u8 {
        match conversion {
            Conversion::Temperature => self.temperature,
            Conversion::Pressure | Conversion::TemperatureAndPressure => self.pressure,
            Conversion::TemperatureAndHumidity => self.humidity,
        }
    }
}

/// Writes the control register(s) that start a forced conversion.
///
/// The BMP180 can't sample two quantities at once. Combined conversions start a temperature conversion there.
pub async fn trigger<B: Bus>(
    bus: &mut B,
    kind: SensorKind,
    conversion: Conversion,
    codes: &OversamplingCodes,
) -> BmpResult<(), B::Error> {
    let temperature = if conversion.samples_temperature() { codes.temperature } else { 0 };
    let pressure = if conversion.samples_pressure() { codes.pressure } else { 0 };

    match kind {
        SensorKind::Bmp180 => {
            let command = match conversion {
                Conversion::Pressure => bmp180::Command::Pressure { oss: codes.pressure },
                _ => bmp180::Command::Temperature,
            };
            bus.write::<bmp180::Control>(&command).await?;
        }
        SensorKind::Bmp280 | SensorKind::Bme280 => {
            // CTRL_HUM is latched by the following CTRL_MEAS write.
            if kind == SensorKind::Bme280 {
                let humidity = if conversion == Conversion::TemperatureAndHumidity { codes.humidity } else { 0 };
                bus.write::<bme280::CtrlHum>(&humidity).await?;
            }
            bus.write::<bmp280::CtrlMeas>(&bmp280::CtrlMeasCfg {
                osrs_t: temperature,
                osrs_p: pressure,
                mode: bmp280::PowerMode::Forced,
            })
            .await?;
        }
        SensorKind::Bmp388 => {
            bus.write::<bmp388::Osr>(&bmp388::OsrCfg { osr_p: pressure, osr_t: temperature })
                .await?;
            bus.write::<bmp388::PwrCtrl>(&bmp388::PwrCtrlCfg {
                press_en: conversion.samples_pressure(),
                temp_en: conversion.samples_temperature(),
                mode: bmp388::PowerMode::Forced,
            })
            .await?;
        }
    }

    debug!("{} triggered {:?} conversion, oversampling {}", kind, conversion, codes.primary(conversion));
    Ok(())
}

/// Reports whether `conversion` is still running.
pub async fn is_busy<B: Bus>(bus: &mut B, kind: SensorKind, conversion: Conversion) -> BmpResult<bool, B::Error> {
    match kind {
        SensorKind::Bmp180 => bus.read::<bmp180::Control>().await,
        SensorKind::Bmp280 | SensorKind::Bme280 => bus.read::<bmp280::Status>().await,
        SensorKind::Bmp388 => {
            let flags = bus.read::<bmp388::Status>().await?;
            let ready = (conversion.samples_temperature() && flags.temperature_data_ready())
                || (conversion.samples_pressure() && flags.pressure_data_ready());
            Ok(!ready)
        }
    }
}

/// Polls the busy indication up to `attempts` times, sleeping `interval_ms` after every busy answer.
///
/// Bus errors abort polling immediately.
pub async fn wait_for_completion<B: Bus, D: DelayNs>(
    bus: &mut B,
    delay: &mut D,
    kind: SensorKind,
    conversion: Conversion,
    attempts: u32,
    interval_ms: u32,
) -> BmpResult<PollOutcome, B::Error> {
    for attempt in 1..=attempts {
        if !is_busy(bus, kind, conversion).await? {
            return Ok(PollOutcome::Ready { attempts: attempt });
        }
        delay.delay_ms(interval_ms).await;
    }

    warn!("{} {:?} conversion still busy after {} attempts", kind, conversion, attempts);
    Ok(PollOutcome::TimedOut)
}

/// Reads the output registers of `conversion` into `sample`.
pub async fn read_raw<B: Bus>(
    bus: &mut B,
    kind: SensorKind,
    conversion: Conversion,
    codes: &OversamplingCodes,
    sample: &mut RawSample,
) -> BmpResult<(), B::Error> {
    match (kind, conversion) {
        (SensorKind::Bmp180, Conversion::Pressure) => {
            let raw = bus.read::<bmp180::PressureData>().await?;
            sample.pressure = Some(bmp180::pressure_count(raw, codes.pressure));
        }
        (SensorKind::Bmp180, _) => {
            sample.temperature = bus.read::<bmp180::TemperatureData>().await?;
        }
        (SensorKind::Bmp280 | SensorKind::Bme280, Conversion::Temperature) => {
            sample.temperature = bus.read::<bmp280::TemperatureData>().await?;
        }
        (SensorKind::Bmp280 | SensorKind::Bme280, Conversion::Pressure) => {
            sample.pressure = Some(bus.read::<bmp280::PressureData>().await?);
        }
        (SensorKind::Bmp280 | SensorKind::Bme280, Conversion::TemperatureAndPressure) => {
            let data = bus.read::<bmp280::Data>().await?;
            sample.temperature = data.temperature;
            sample.pressure = Some(data.pressure);
        }
        (SensorKind::Bme280, Conversion::TemperatureAndHumidity) => {
            let data = bus.read::<bme280::TemperatureHumidityData>().await?;
            sample.temperature = data.temperature;
            sample.humidity = Some(data.humidity);
        }
        (SensorKind::Bmp280, Conversion::TemperatureAndHumidity) => {
            sample.temperature = bus.read::<bmp280::TemperatureData>().await?;
        }
        (SensorKind::Bmp388, Conversion::Temperature | Conversion::TemperatureAndHumidity) => {
            sample.temperature = bus.read::<bmp388::TemperatureData>().await?;
        }
        (SensorKind::Bmp388, Conversion::Pressure) => {
            sample.pressure = Some(bus.read::<bmp388::PressureData>().await?);
        }
        (SensorKind::Bmp388, Conversion::TemperatureAndPressure) => {
            let data = bus.read::<bmp388::Data>().await?;
            sample.temperature = data.temperature;
            sample.pressure = Some(data.pressure);
        }
    }

    Ok(())
}

/// The conversions needed to measure `quantity`, in order.
///
/// Every plan samples temperature, since no quantity can be compensated without it. The BMP180 needs
/// two conversions for pressure. Other parts sample temperature alongside in the same conversion.
fn plan(kind: SensorKind, quantity: Quantity) -> &'static [Conversion] {
    match (kind, quantity) {
        (_, Quantity::Temperature) => &[Conversion::Temperature],
        (SensorKind::Bmp180, Quantity::Pressure) => &[Conversion::Temperature, Conversion::Pressure],
        (_, Quantity::Pressure) => &[Conversion::TemperatureAndPressure],
        (SensorKind::Bme280, Quantity::Humidity) => &[Conversion::TemperatureAndHumidity],
        (_, Quantity::Humidity) => &[Conversion::Temperature],
    }
}

/// Runs every conversion needed for `quantity` and returns the raw counts.
///
/// The outcome is [`PollOutcome::TimedOut`] if any of the conversions timed out. Otherwise the
/// attempts of all conversions are summed up.
pub async fn measure<B: Bus, D: DelayNs, O: Observer>(
    bus: &mut B,
    delay: &mut D,
    observer: &mut O,
    kind: SensorKind,
    quantity: Quantity,
    accuracy: AccuracyMode,
    config: &Configuration,
) -> BmpResult<(RawSample, PollOutcome), B::Error> {
    let requested = kind.oversampling_code(accuracy);
    let companion = kind.oversampling_code(config.companion_temperature_accuracy);
    let codes = OversamplingCodes {
        temperature: if quantity == Quantity::Temperature { requested } else { companion },
        pressure: requested,
        humidity: requested,
    };

    let mut sample = RawSample { temperature: 0, pressure: None, humidity: None, oversampling: codes.pressure };
    let mut outcome = PollOutcome::Ready { attempts: 0 };

    for &conversion in plan(kind, quantity) {
        trigger(bus, kind, conversion, &codes).await?;
        observer.triggered(kind, conversion, codes.primary(conversion));

        let polled = wait_for_completion(bus, delay, kind, conversion, config.poll_attempts, config.poll_interval_ms)
            .await?;
        observer.polled(kind, polled);

        outcome = match (outcome, polled) {
            (PollOutcome::Ready { attempts: a }, PollOutcome::Ready { attempts: b }) => PollOutcome::Ready { attempts: a + b },
            _ => PollOutcome::TimedOut,
        };

        read_raw(bus, kind, conversion, &codes, &mut sample).await?;
    }

    debug!("{} raw sample {:?}", kind, sample);
    Ok((sample, outcome))
}
