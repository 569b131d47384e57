use core::fmt::{Display, Formatter};

use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_async::delay::DelayNs;
use log::debug;

use crate::bus::{Bus, I2c};
use crate::calibration::CalibrationSet;
use crate::compensation::{self, Compensated};
use crate::config::{AccuracyMode, Configuration};
use crate::error::{BmpError, BmpResult, InvalidCoefficient};
use crate::measurement::{self, Quantity};
use crate::observer::{NoopObserver, Observer};
use crate::register::{bmp180, bmp280, bmp388, Readable, Writable};
use crate::units;

/// The supported sensor parts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// Temperature and pressure. Oldest part, no status register and no combined conversions.
    Bmp180,
    /// Temperature and pressure.
    Bmp280,
    /// Temperature, pressure and humidity. Register compatible with the BMP280.
    Bme280,
    /// Temperature and pressure, 64-bit compensation. The BMP390 is accepted as well.
    Bmp388,
}

impl Display for SensorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            SensorKind::Bmp180 => "BMP180",
            SensorKind::Bmp280 => "BMP280",
            SensorKind::Bme280 => "BME280",
            SensorKind::Bmp388 => "BMP388",
        })
    }
}

impl SensorKind {
    /// Checks an identity register value against the values this kind of sensor reports.
    ///
    /// Returns a description of the identified part, or [`None`] if the signature belongs to something else.
    pub fn recognize_signature(self, signature: u8) -> Option<&'static str> {
        match (self, signature) {
            (SensorKind::Bmp180, 0x55) => Some("BMP180"),
            (SensorKind::Bmp280, 0x58) => Some("BMP280"),
            (SensorKind::Bmp280, 0x56 | 0x57) => Some("BMP280 (sample)"),
            (SensorKind::Bme280, 0x60) => Some("BME280"),
            (SensorKind::Bmp388, 0x50) => Some("BMP388"),
            (SensorKind::Bmp388, 0x60) => Some("BMP390"),
            _ => None,
        }
    }

    /// Oversampling code written to the control register for the given accuracy.
    ///
    /// Accuracies beyond what the part offers select its highest setting.
    pub fn oversampling_code(self, accuracy: AccuracyMode) -> u8 {
        match self {
            SensorKind::Bmp180 => match accuracy {
                AccuracyMode::UltraLow | AccuracyMode::Low => 0,
                AccuracyMode::Standard => 1,
                AccuracyMode::High => 2,
                AccuracyMode::UltraHigh | AccuracyMode::Highest => 3,
            },
            SensorKind::Bmp280 | SensorKind::Bme280 => match accuracy {
                AccuracyMode::UltraLow => 1,
                AccuracyMode::Low => 2,
                AccuracyMode::Standard => 3,
                AccuracyMode::High => 4,
                AccuracyMode::UltraHigh | AccuracyMode::Highest => 5,
            },
            SensorKind::Bmp388 => match accuracy {
                AccuracyMode::UltraLow => 0,
                AccuracyMode::Low => 1,
                AccuracyMode::Standard => 2,
                AccuracyMode::High => 3,
                AccuracyMode::UltraHigh => 4,
                AccuracyMode::Highest => 5,
            },
        }
    }

    pub fn supports_humidity(self) -> bool {
        self == SensorKind::Bme280
    }

    /// Reads the identity register.
    pub async fn read_id<B: Bus>(self, bus: &mut B) -> BmpResult<u8, B::Error> {
        match self {
            SensorKind::Bmp180 => bus.read::<bmp180::ChipId>().await,
            SensorKind::Bmp280 | SensorKind::Bme280 => bus.read::<bmp280::ChipId>().await,
            SensorKind::Bmp388 => bus.read::<bmp388::ChipId>().await,
        }
    }
}

/// I2C address selected by the level of the SDO pin. The BMP180 has no SDO pin and always uses 0x77.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SdoPinState {
    /// SDO is pulled high by connection to VDDIO
    High,
    /// SDO is pulled low by connection to GND
    Low,
}

impl From<SdoPinState> for SevenBitAddress {
    fn from(value: SdoPinState) -> Self {
        match value {
            SdoPinState::High => 0x77,
            SdoPinState::Low => 0x76,
        }
    }
}

/// A value read from the sensor, together with whether the conversion timed out.
///
/// When `timed_out` is set the output registers were read anyway, so the value may belong to
/// an earlier conversion or be incomplete.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading<T> {
    pub value: T,
    pub timed_out: bool,
}

impl<T> Reading<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        Reading { value: f(self.value), timed_out: self.timed_out }
    }
}

/// Type alias for a sensor communicating over I2C
pub type BmpI2c<T, D, O = NoopObserver> = Bmp<I2c<T>, D, O>;

/// Main driver struct. Owns the bus and delay for the lifetime of one physical sensor.
pub struct Bmp<B, D, O = NoopObserver> {
    bus: B,
    delay: D,
    observer: O,
    kind: SensorKind,
    calibration: CalibrationSet,
    config: Configuration,
}

impl<T, D> BmpI2c<T, D>
where
    T: embedded_hal_async::i2c::I2c,
    D: DelayNs,
{
    /// Constructs a driver for a sensor at `address` on an I2C bus.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use embedded_hal_async::delay::DelayNs;
    /// # use embedded_hal_async::i2c::I2c;
    /// use bsbmp::{AccuracyMode, Bmp, BmpResult, SdoPinState, SensorKind};
    /// use bsbmp::config::Configuration;
    /// # async fn demo<I: I2c, D: DelayNs>(i2c: I, delay: D) -> BmpResult<(), I::Error> {
    ///
    /// let mut device = Bmp::new_i2c(
    ///     SensorKind::Bme280,
    ///     i2c,
    ///     SdoPinState::High.into(),
    ///     delay,
    ///     Configuration::default(),
    /// ).await?;
    ///
    /// let pressure = device.read_pressure_pa(AccuracyMode::High).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new_i2c(
        kind: SensorKind,
        i2c: T,
        address: SevenBitAddress,
        delay: D,
        config: Configuration,
    ) -> BmpResult<Self, T::Error> {
        Self::new(kind, I2c::new(i2c, address), delay, config).await
    }
}

impl<B, D> Bmp<B, D>
where
    B: Bus,
    D: DelayNs,
{
    /// Identifies the sensor and loads its calibration block.
    ///
    /// Fails with [`BmpError::UnrecognizedSignature`] if the identity register doesn't match `kind`.
    pub async fn new(kind: SensorKind, bus: B, delay: D, config: Configuration) -> BmpResult<Self, B::Error> {
        Self::new_with_observer(kind, bus, delay, config, NoopObserver).await
    }
}

impl<B, D, O> Bmp<B, D, O>
where
    B: Bus,
    D: DelayNs,
    O: Observer,
{
    /// Same as [`Bmp::new`], reporting every step of every reading to `observer`.
    pub async fn new_with_observer(
        kind: SensorKind,
        mut bus: B,
        delay: D,
        config: Configuration,
        mut observer: O,
    ) -> BmpResult<Self, B::Error> {
        let signature = kind.read_id(&mut bus).await?;
        let Some(description) = kind.recognize_signature(signature) else {
            return Err(BmpError::UnrecognizedSignature { kind, signature });
        };
        debug!("found {} with signature 0x{:02x}", description, signature);

        let calibration = CalibrationSet::read(&mut bus, kind).await?;
        observer.calibration_loaded(&calibration);
        if config.validate_coefficients {
            calibration.validate()?;
        }

        Ok(Bmp { bus, delay, observer, kind, calibration, config })
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Reads the identity register again.
    pub async fn sensor_id(&mut self) -> BmpResult<u8, B::Error> {
        self.kind.read_id(&mut self.bus).await
    }

    /// The calibration coefficients currently used for compensation.
    pub fn calibration(&self) -> &CalibrationSet {
        &self.calibration
    }

    /// Checks the cached coefficients for erased-memory patterns.
    pub fn is_valid_coefficients(&self) -> Result<(), InvalidCoefficient> {
        self.calibration.validate()
    }

    /// Reads the calibration block from the sensor again and replaces the cached copy.
    pub async fn refresh_calibration(&mut self) -> BmpResult<(), B::Error> {
        self.calibration = CalibrationSet::read(&mut self.bus, self.kind).await?;
        self.observer.calibration_loaded(&self.calibration);

        Ok(())
    }

    /// Read a register (or fixed-size register block) using a typed marker from [`crate::register`].
    ///
    /// Nothing checks that the marker belongs to the connected kind of sensor.
    pub async fn read<R: Readable>(&mut self) -> BmpResult<R::Out, B::Error> {
        self.bus.read::<R>().await
    }

    /// Write a register using a typed marker from [`crate::register`].
    pub async fn write<W: Writable>(&mut self, v: &W::In) -> BmpResult<(), B::Error> {
        self.bus.write::<W>(v).await
    }

    /// Runs one complete measurement of `quantity` and compensates it.
    ///
    /// Temperature is always part of the result. Pressure and humidity are only present when asked for
    /// and supported by the sensor.
    pub async fn measure(&mut self, quantity: Quantity, accuracy: AccuracyMode) -> BmpResult<Reading<Compensated>, B::Error> {
        if self.config.reload_calibration {
            self.refresh_calibration().await?;
        }

        let (raw, outcome) = measurement::measure(
            &mut self.bus,
            &mut self.delay,
            &mut self.observer,
            self.kind,
            quantity,
            accuracy,
            &self.config,
        )
        .await?;

        let result = compensation::compensate(&self.calibration, &raw);
        debug!("{} compensated {:?}", self.kind, result);
        self.observer.compensated(&raw, &result);

        Ok(Reading { value: result, timed_out: outcome.timed_out() })
    }

    /// Temperature in 0.01 °C.
    pub async fn read_temperature_mult100c(&mut self, accuracy: AccuracyMode) -> BmpResult<Reading<i32>, B::Error> {
        Ok(self.measure(Quantity::Temperature, accuracy).await?.map(|c| c.temperature))
    }

    pub async fn read_temperature_c(&mut self, accuracy: AccuracyMode) -> BmpResult<Reading<f32>, B::Error> {
        Ok(self.read_temperature_mult100c(accuracy).await?.map(units::celsius))
    }

    /// Pressure in 0.1 Pa. The temperature used for compensation is sampled in the same call.
    pub async fn read_pressure_mult10pa(&mut self, accuracy: AccuracyMode) -> BmpResult<Reading<u32>, B::Error> {
        Ok(self
            .measure(Quantity::Pressure, accuracy)
            .await?
            .map(|c| c.pressure.unwrap_or_default()))
    }

    pub async fn read_pressure_pa(&mut self, accuracy: AccuracyMode) -> BmpResult<Reading<f32>, B::Error> {
        Ok(self.read_pressure_mult10pa(accuracy).await?.map(units::pascal))
    }

    /// Pressure in mmHg, truncated to two decimals.
    pub async fn read_pressure_mmhg(&mut self, accuracy: AccuracyMode) -> BmpResult<Reading<f32>, B::Error> {
        Ok(self.read_pressure_mult10pa(accuracy).await?.map(units::mmhg))
    }

    /// Altitude above sea level in meters assuming standard sea level pressure, truncated to two decimals.
    pub async fn read_altitude(&mut self, accuracy: AccuracyMode) -> BmpResult<Reading<f32>, B::Error> {
        Ok(self.read_pressure_mult10pa(accuracy).await?.map(units::altitude))
    }

    /// Relative humidity in Q22.10 format.
    ///
    /// The flag tells whether the sensor measures humidity at all. Sensors without a humidity
    /// sensor answer `(false, 0)` without touching the bus.
    pub async fn read_humidity_mult_q2210(&mut self, accuracy: AccuracyMode) -> BmpResult<(bool, Reading<u32>), B::Error> {
        if !self.kind.supports_humidity() {
            return Ok((false, Reading { value: 0, timed_out: false }));
        }

        let reading = self.measure(Quantity::Humidity, accuracy).await?;
        Ok((true, reading.map(|c| c.humidity.unwrap_or_default())))
    }

    /// Relative humidity in %RH. See [`Bmp::read_humidity_mult_q2210`] for the flag.
    pub async fn read_humidity_rh(&mut self, accuracy: AccuracyMode) -> BmpResult<(bool, Reading<f32>), B::Error> {
        let (supported, reading) = self.read_humidity_mult_q2210(accuracy).await?;
        Ok((supported, reading.map(units::relative_humidity)))
    }

    #[cfg(feature = "uom")]
    pub async fn read_temperature_uom(
        &mut self,
        accuracy: AccuracyMode,
    ) -> BmpResult<Reading<uom::si::f32::ThermodynamicTemperature>, B::Error> {
        Ok(self.read_temperature_mult100c(accuracy).await?.map(units::temperature_uom))
    }

    #[cfg(feature = "uom")]
    pub async fn read_pressure_uom(&mut self, accuracy: AccuracyMode) -> BmpResult<Reading<uom::si::f32::Pressure>, B::Error> {
        Ok(self.read_pressure_mult10pa(accuracy).await?.map(units::pressure_uom))
    }

    /// Gives up the driver and hands back the bus and delay.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}
