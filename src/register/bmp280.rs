//! BMP280 register map. The BME280 shares every register listed here.

use crate::calibration::Bmp280Calibration;
use crate::register::{adc_20bit, Readable, Reg, Writable};

/// Marker struct for the ID (0xD0) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
pub struct ChipId;
impl Reg for ChipId { const ADDR: u8 = 0xD0; }

impl Readable for ChipId {
    type Out = u8;
    fn decode(b: &[u8]) -> Self::Out { b[0] }
}

/// Marker struct for the STATUS (0xF3) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
///
/// Decodes to `true` while a conversion is running.
pub struct Status;
impl Reg for Status { const ADDR: u8 = 0xF3; }

impl Readable for Status {
    type Out = bool;
    fn decode(b: &[u8]) -> Self::Out { (b[0] & 0b0000_1000) != 0 }
}

/// Marker struct for the CTRL_MEAS (0xF4) register
///
/// - **Length:** 1 byte
/// - **Access:** Read/Write
pub struct CtrlMeas;
impl Reg for CtrlMeas { const ADDR: u8 = 0xF4; }

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PowerMode {
    Sleep,
    Forced,
}

impl From<PowerMode> for u8 {
    fn from(value: PowerMode) -> Self {
        match value {
            PowerMode::Sleep => 0b00,
            PowerMode::Forced => 0b01,
        }
    }
}

/// Oversampling codes are written as-is. A code of 0 skips that measurement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CtrlMeasCfg {
    pub osrs_t: u8,
    pub osrs_p: u8,
    pub mode: PowerMode,
}

impl Writable for CtrlMeas {
    type In = CtrlMeasCfg;
    fn encode(v: &Self::In, out: &mut [u8]) {
        let mode: u8 = v.mode.into();
        out[0] = ((v.osrs_t & 0b111) << 5) | ((v.osrs_p & 0b111) << 2) | mode;
    }
}

/// Marker struct for the temperature/pressure calibration block (0x88..0x9F)
///
/// - **Length:** 24 bytes, little-endian words
/// - **Access:** Read-only
pub struct Calibration;
impl Reg for Calibration { const ADDR: u8 = 0x88; }

impl Readable for Calibration {
    type Out = Bmp280Calibration;
    const N: usize = 24;
    fn decode(b: &[u8]) -> Self::Out { Bmp280Calibration::from_bytes(b) }
}

/// Marker struct for the PRESS (0xF7..0xF9) registers
///
/// - **Length:** 3 bytes
/// - **Access:** Read-only
pub struct PressureData;
impl Reg for PressureData { const ADDR: u8 = 0xF7; }

impl Readable for PressureData {
    type Out = i32;
    const N: usize = 3;
    fn decode(b: &[u8]) -> Self::Out { adc_20bit(b) }
}

/// Marker struct for the TEMP (0xFA..0xFC) registers
///
/// - **Length:** 3 bytes
/// - **Access:** Read-only
pub struct TemperatureData;
impl Reg for TemperatureData { const ADDR: u8 = 0xFA; }

impl Readable for TemperatureData {
    type Out = i32;
    const N: usize = 3;
    fn decode(b: &[u8]) -> Self::Out { adc_20bit(b) }
}

/// Marker struct for a burst read of PRESS and TEMP (0xF7..0xFC)
///
/// - **Length:** 6 bytes
/// - **Access:** Read-only
///
/// A burst read guarantees both values belong to the same conversion.
pub struct Data;
impl Reg for Data { const ADDR: u8 = 0xF7; }

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawData {
    pub pressure: i32,
    pub temperature: i32,
}

impl Readable for Data {
    type Out = RawData;
    const N: usize = 6;
    fn decode(b: &[u8]) -> Self::Out {
        RawData {
            pressure: adc_20bit(&b[0..3]),
            temperature: adc_20bit(&b[3..6]),
        }
    }
}
