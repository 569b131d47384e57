//! BMP180 register map.
//!
//! The BMP180 has no status register. Conversion progress is reported through the SCO bit of the
//! control register itself, which stays set until the result has been written to the output registers.

use crate::calibration::Bmp180Calibration;
use crate::register::{Readable, Reg, Writable};

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

/// Marker struct for the CTRL_MEAS (0xF4) register
///
/// - **Length:** 1 byte
/// - **Access:** Read/Write
///
/// Writing a [`Command`] starts a conversion. Reading returns `true` while a conversion is in progress.
pub struct Control;
impl Reg for Control { const ADDR: u8 = 0xF4; }

const SCO_BIT: u8 = 0x20;
const TEMPERATURE_COMMAND: u8 = 0x2E;
const PRESSURE_COMMAND: u8 = 0x34;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Temperature,
    /// Pressure conversion using oversampling setting `oss` (0..=3).
    Pressure { oss: u8 },
}

impl Readable for Control {
    type Out = bool;
    fn decode(b: &[u8]) -> Self::Out { (b[0] & SCO_BIT) != 0 }
}

impl Writable for Control {
    type In = Command;
    fn encode(v: &Self::In, out: &mut [u8]) {
        out[0] = match v {
            Command::Temperature => TEMPERATURE_COMMAND,
            Command::Pressure { oss } => PRESSURE_COMMAND | ((oss & 0b11) << 6),
        };
    }
}

/// Marker struct for the calibration EEPROM (0xAA..0xBF)
///
/// - **Length:** 22 bytes, eleven big-endian words
/// - **Access:** Read-only
pub struct Calibration;
impl Reg for Calibration { const ADDR: u8 = 0xAA; }

impl Readable for Calibration {
    type Out = Bmp180Calibration;
    const N: usize = 22;
    fn decode(b: &[u8]) -> Self::Out { Bmp180Calibration::from_bytes(b) }
}

/// Marker struct for an uncompensated temperature read (0xF6..0xF7)
///
/// - **Length:** 2 bytes, big-endian
/// - **Access:** Read-only
pub struct TemperatureData;
impl Reg for TemperatureData { const ADDR: u8 = 0xF6; }

impl Readable for TemperatureData {
    type Out = i32;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Self::Out { u16::from_be_bytes([b[0], b[1]]) as i32 }
}

/// Marker struct for an uncompensated pressure read (0xF6..0xF8)
///
/// - **Length:** 3 bytes, MSB first
/// - **Access:** Read-only
///
/// The decoded value still contains the unused low bits. Use [`pressure_count`] to drop them.
pub struct PressureData;
impl Reg for PressureData { const ADDR: u8 = 0xF6; }

impl Readable for PressureData {
    type Out = i32;
    const N: usize = 3;
    fn decode(b: &[u8]) -> Self::Out {
        ((b[0] as i32) << 16) | ((b[1] as i32) << 8) | (b[2] as i32)
    }
}

/// Drops the bits that the given oversampling setting doesn't resolve.
pub fn pressure_count(raw: i32, oss: u8) -> i32 {
    raw >> (8 - oss as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_encode() {
        let mut out = [0u8; 1];
        Control::encode(&Command::Temperature, &mut out);
        assert_eq!(0x2E, out[0]);

        Control::encode(&Command::Pressure { oss: 0 }, &mut out);
        assert_eq!(0x34, out[0]);

        Control::encode(&Command::Pressure { oss: 3 }, &mut out);
        assert_eq!(0xF4, out[0]);
    }

    #[test]
    fn control_decode_reads_sco_bit() {
        assert!(Control::decode(&[0x2E]));
        assert!(Control::decode(&[0x34 | 0x20]));
        assert!(!Control::decode(&[0x0E]));
        assert!(!Control::decode(&[0x14]));
    }

    #[test]
    fn pressure_data_is_shifted_by_oversampling() {
        let raw = PressureData::decode(&[0x5D, 0x23, 0x00]);
        assert_eq!(23843, pressure_count(raw, 0));

        let raw = PressureData::decode(&[0x5D, 0x23, 0x60]);
        assert_eq!(23843 * 8 + 3, pressure_count(raw, 3));
    }

    #[test]
    fn temperature_data_is_big_endian() {
        assert_eq!(27898, TemperatureData::decode(&[0x6C, 0xFA]));
    }
}
