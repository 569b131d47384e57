//! BMP388 register map.
//!
//! The BMP390 uses the same layout and is accepted as a member of the same family.

use crate::calibration::Bmp388Calibration;
use crate::register::{adc_24bit_le, Readable, Reg, Writable};

/// Marker struct for the CHIP_ID (0x00) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
pub struct ChipId;
impl Reg for ChipId { const ADDR: u8 = 0x00; }

impl Readable for ChipId {
    type Out = u8;
    fn decode(b: &[u8]) -> Self::Out { b[0] }
}

/// Marker struct for the STATUS (0x03) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
pub struct Status;
impl Reg for Status { const ADDR: u8 = 0x03; }

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StatusFlags {
    pub cmd_rdy: bool,
    pub drdy_press: bool,
    pub drdy_temp: bool,
}

impl StatusFlags {
    /// Is there new pressure data to be read?
    ///
    /// This value is cleared when any of the pressure DATA registers are read.
    pub fn pressure_data_ready(&self) -> bool { self.drdy_press }

    /// Is there new temperature data to be read?
    ///
    /// This value is cleared when any of the temperature DATA registers are read.
    pub fn temperature_data_ready(&self) -> bool { self.drdy_temp }
}

impl Readable for Status {
    type Out = StatusFlags;
    fn decode(b: &[u8]) -> Self::Out {
        StatusFlags {
            cmd_rdy:    (b[0] & 0b0001_0000) != 0,
            drdy_press: (b[0] & 0b0010_0000) != 0,
            drdy_temp:  (b[0] & 0b0100_0000) != 0,
        }
    }
}

/// Marker struct for the DATA_0 - DATA_2 (0x04 - 0x06) pressure registers
///
/// - **Length:** 3 bytes
/// - **Access:** Read-only
pub struct PressureData;
impl Reg for PressureData { const ADDR: u8 = 0x04; }

impl Readable for PressureData {
    type Out = i32;
    const N: usize = 3;
    fn decode(b: &[u8]) -> Self::Out { adc_24bit_le(b) }
}

/// Marker struct for the DATA_3 - DATA_5 (0x07 - 0x09) temperature registers
///
/// - **Length:** 3 bytes
/// - **Access:** Read-only
pub struct TemperatureData;
impl Reg for TemperatureData { const ADDR: u8 = 0x07; }

impl Readable for TemperatureData {
    type Out = i32;
    const N: usize = 3;
    fn decode(b: &[u8]) -> Self::Out { adc_24bit_le(b) }
}

/// Marker struct for the DATA_0 - DATA_5 (0x04 - 0x09) registers.
/// The sensor auto-increments on multiple reads, so reading 6 bytes from 0x04 reads
/// pressure and temperature in one burst as recommended by the datasheet.
///
/// - **Length:** 6 bytes
/// - **Access:** Read-only
pub struct Data;
impl Reg for Data { const ADDR: u8 = 0x04; }

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DataSample {
    pub pressure: i32,
    pub temperature: i32,
}

impl Readable for Data {
    type Out = DataSample;
    const N: usize = 6;
    fn decode(b: &[u8]) -> Self::Out {
        DataSample {
            pressure: adc_24bit_le(&b[0..3]),
            temperature: adc_24bit_le(&b[3..6]),
        }
    }
}

/// Marker struct for the PWR_CTRL (0x1B) register
///
/// - **Length:** 1 byte
/// - **Access:** Read/Write
pub struct PwrCtrl;
impl Reg for PwrCtrl { const ADDR: u8 = 0x1B; }

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PwrCtrlCfg {
    pub press_en: bool,
    pub temp_en: bool,
    pub mode: PowerMode,
}

/// Power modes that can be set in the PwrCtrl register. Normal mode is not supported by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    /// Sleep mode. This is the default mode after power on reset.
    Sleep,
    /// A single measurement is performed after which the device returns to Sleep mode.
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

impl Writable for PwrCtrl {
    type In = PwrCtrlCfg;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let mut value = 0u8;
        if v.press_en {
            value |= 0b0000_0001;
        }
        if v.temp_en {
            value |= 0b0000_0010;
        }
        let mode: u8 = v.mode.into();
        value |= mode << 4;
        out[0] = value;
    }
}

/// Marker struct for the OSR (0x1C) register
///
/// - **Length:** 1 byte
/// - **Access:** Read/Write
pub struct Osr;
impl Reg for Osr { const ADDR: u8 = 0x1C; }

/// Oversampling codes 0..=5 select x1 through x32.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OsrCfg {
    pub osr_p: u8,
    pub osr_t: u8,
}

impl Writable for Osr {
    type In = OsrCfg;
    fn encode(v: &Self::In, out: &mut [u8]) {
        out[0] = (v.osr_p & 0b111) | ((v.osr_t & 0b111) << 3);
    }
}

/// Marker struct for the trimming coefficients (0x31..0x45)
///
/// - **Length:** 21 bytes
/// - **Access:** Read-only
pub struct Calibration;
impl Reg for Calibration { const ADDR: u8 = 0x31; }

impl Readable for Calibration {
    type Out = Bmp388Calibration;
    const N: usize = 21;
    fn decode(b: &[u8]) -> Self::Out { Bmp388Calibration::from_bytes(b) }
}
