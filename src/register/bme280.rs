//! BME280 registers that the BMP280 doesn't have.
//!
//! Identity, status, control and temperature/pressure registers are the same as
//! in [`crate::register::bmp280`].

use crate::register::{adc_20bit, Readable, Reg, Writable};

/// Marker struct for the CTRL_HUM (0xF2) register
///
/// - **Length:** 1 byte
/// - **Access:** Read/Write
///
/// Changes only become effective after the next write to
/// [`CtrlMeas`](crate::register::bmp280::CtrlMeas).
pub struct CtrlHum;
impl Reg for CtrlHum { const ADDR: u8 = 0xF2; }

impl Writable for CtrlHum {
    type In = u8;
    fn encode(v: &Self::In, out: &mut [u8]) { out[0] = v & 0b111; }
}

/// Marker struct for the dig_H1 calibration byte (0xA1)
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
pub struct CalibrationH1;
impl Reg for CalibrationH1 { const ADDR: u8 = 0xA1; }

impl Readable for CalibrationH1 {
    type Out = u8;
    fn decode(b: &[u8]) -> Self::Out { b[0] }
}

/// Marker struct for the remaining humidity calibration block (0xE1..0xE7)
///
/// - **Length:** 7 bytes
/// - **Access:** Read-only
///
/// dig_H4 and dig_H5 share a byte, so the block is handed over undecoded.
/// See [`HumidityCalibration::from_bytes`](crate::calibration::HumidityCalibration::from_bytes).
pub struct CalibrationH;
impl Reg for CalibrationH { const ADDR: u8 = 0xE1; }

impl Readable for CalibrationH {
    type Out = [u8; 7];
    const N: usize = 7;
    fn decode(b: &[u8]) -> Self::Out {
        let mut out = [0u8; 7];
        out.copy_from_slice(&b[..7]);
        out
    }
}

/// Marker struct for a burst read of TEMP and HUM (0xFA..0xFE)
///
/// - **Length:** 5 bytes
/// - **Access:** Read-only
pub struct TemperatureHumidityData;
impl Reg for TemperatureHumidityData { const ADDR: u8 = 0xFA; }

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawTemperatureHumidity {
    pub temperature: i32,
    pub humidity: i32,
}

impl Readable for TemperatureHumidityData {
    type Out = RawTemperatureHumidity;
    const N: usize = 5;
    fn decode(b: &[u8]) -> Self::Out {
        RawTemperatureHumidity {
            temperature: adc_20bit(&b[0..3]),
            humidity: u16::from_be_bytes([b[3], b[4]]) as i32,
        }
    }
}
