//! Typed register markers.
//!
//! Every register (or contiguous register block) the driver touches is described by a zero-sized marker type.
//! The marker knows its address, how many bytes a transfer covers and how to turn those bytes into a value,
//! so the bus layer never has to know anything about a particular sensor.

pub mod bme280;
pub mod bmp180;
pub mod bmp280;
pub mod bmp388;

pub trait Reg { const ADDR: u8; }

pub trait Readable: Reg {
    type Out;
    const N: usize = 1;
    fn decode(b: &[u8]) -> Self::Out;
}

pub trait Writable: Reg {
    type In;
    const N: usize = 1;
    fn encode(v: &Self::In, out: &mut [u8]);
}

/// Assembles a 20-bit ADC count from an MSB, LSB, XLSB register triplet.
///
/// Only the upper nibble of XLSB carries data.
pub(crate) fn adc_20bit(b: &[u8]) -> i32 {
    ((b[0] as i32) << 12) | ((b[1] as i32) << 4) | ((b[2] as i32) >> 4)
}

/// Assembles an unsigned 24-bit ADC count from an XLSB, LSB, MSB register triplet.
pub(crate) fn adc_24bit_le(b: &[u8]) -> i32 {
    (b[0] as i32) | ((b[1] as i32) << 8) | ((b[2] as i32) << 16)
}
