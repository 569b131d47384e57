//! Fixed point compensation.
//!
//! Each submodule reproduces one vendor reference formula bit for bit, including truncating division
//! and arithmetic right shifts of negative values. Nothing in here touches the bus.

pub mod bme280;
pub mod bmp180;
pub mod bmp280;
pub mod bmp388;

use crate::calibration::CalibrationSet;

/// Uncompensated ADC counts from a single measurement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub temperature: i32,
    pub pressure: Option<i32>,
    pub humidity: Option<i32>,
    /// Oversampling code of the pressure conversion. Only the BMP180 formula depends on it.
    pub oversampling: u8,
}

impl RawSample {
    pub fn temperature(temperature: i32) -> Self {
        Self { temperature, pressure: None, humidity: None, oversampling: 0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compensated {
    /// 0.01 °C
    pub temperature: i32,
    /// 0.1 Pa
    pub pressure: Option<u32>,
    /// %RH in Q22.10
    pub humidity: Option<u32>,
    /// The variant's fine temperature intermediate: `b5`, `t_fine` or `t_lin`.
    pub fine_temperature: i64,
}

/// Runs the formula matching the calibration set over `raw`.
///
/// Pressure and humidity are only computed when the sample carries them and the sensor supports them.
pub fn compensate(calibration: &CalibrationSet, raw: &RawSample) -> Compensated {
    match calibration {
        CalibrationSet::Bmp180(c) => {
            let (temperature, b5) = bmp180::temperature(raw.temperature, c);
            Compensated {
                temperature,
                pressure: raw.pressure.map(|up| bmp180::pressure(up, raw.oversampling, b5, c)),
                humidity: None,
                fine_temperature: b5 as i64,
            }
        }
        CalibrationSet::Bmp280(c) => {
            let (temperature, t_fine) = bmp280::temperature(raw.temperature, c);
            Compensated {
                temperature,
                pressure: raw.pressure.map(|up| bmp280::pressure(up, t_fine, c)),
                humidity: None,
                fine_temperature: t_fine as i64,
            }
        }
        CalibrationSet::Bme280(c) => {
            let (temperature, t_fine) = bmp280::temperature(raw.temperature, &c.base);
            Compensated {
                temperature,
                pressure: raw.pressure.map(|up| bmp280::pressure(up, t_fine, &c.base)),
                humidity: raw.humidity.map(|uh| bme280::humidity(uh, t_fine, &c.humidity)),
                fine_temperature: t_fine as i64,
            }
        }
        CalibrationSet::Bmp388(c) => {
            let (temperature, t_lin) = bmp388::temperature(raw.temperature, c);
            Compensated {
                temperature,
                pressure: raw.pressure.map(|up| bmp388::pressure(up, t_lin, c)),
                humidity: None,
                fine_temperature: t_lin,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{Bme280Calibration, Bmp180Calibration, Bmp280Calibration, Bmp388Calibration, HumidityCalibration};
    use crate::testing::{
        BME280_CALIBRATION_H, BME280_CALIBRATION_H1, BMP180_CALIBRATION, BMP280_CALIBRATION, BMP388_CALIBRATION,
    };

    fn bme280() -> CalibrationSet {
        CalibrationSet::Bme280(Bme280Calibration {
            base: Bmp280Calibration::from_bytes(&BMP280_CALIBRATION),
            humidity: HumidityCalibration::from_bytes(BME280_CALIBRATION_H1, &BME280_CALIBRATION_H),
        })
    }

    #[test]
    fn bmp180_dispatch() {
        let set = CalibrationSet::Bmp180(Bmp180Calibration::from_bytes(&BMP180_CALIBRATION));
        let raw = RawSample { temperature: 27898, pressure: Some(23843), humidity: None, oversampling: 0 };
        assert_eq!(
            Compensated { temperature: 1500, pressure: Some(699640), humidity: None, fine_temperature: 2400 },
            compensate(&set, &raw)
        );
    }

    #[test]
    fn bmp280_dispatch_ignores_humidity() {
        let set = CalibrationSet::Bmp280(Bmp280Calibration::from_bytes(&BMP280_CALIBRATION));
        let raw = RawSample { temperature: 519888, pressure: Some(415148), humidity: Some(30000), oversampling: 5 };
        assert_eq!(
            Compensated { temperature: 2508, pressure: Some(1006532), humidity: None, fine_temperature: 128422 },
            compensate(&set, &raw)
        );
    }

    #[test]
    fn bme280_dispatch() {
        let raw = RawSample { temperature: 519888, pressure: None, humidity: Some(30000), oversampling: 0 };
        assert_eq!(
            Compensated { temperature: 2508, pressure: None, humidity: Some(56317), fine_temperature: 128422 },
            compensate(&bme280(), &raw)
        );

        let raw = RawSample { temperature: 519888, pressure: Some(415148), humidity: None, oversampling: 3 };
        assert_eq!(Some(1006532), compensate(&bme280(), &raw).pressure);
    }

    #[test]
    fn bmp388_dispatch() {
        let set = CalibrationSet::Bmp388(Bmp388Calibration::from_bytes(&BMP388_CALIBRATION));
        let raw = RawSample { temperature: 8638073, pressure: Some(6640018), humidity: None, oversampling: 2 };
        assert_eq!(
            Compensated { temperature: 2549, pressure: Some(1005484), humidity: None, fine_temperature: 1671047 },
            compensate(&set, &raw)
        );
    }

    #[test]
    fn temperature_only_sample() {
        let set = CalibrationSet::Bmp388(Bmp388Calibration::from_bytes(&BMP388_CALIBRATION));
        let result = compensate(&set, &RawSample::temperature(8638073));
        assert_eq!(2549, result.temperature);
        assert_eq!(None, result.pressure);
    }
}
