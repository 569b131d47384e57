use crate::bus::{Bus, MAX_REG_BYTES};
use crate::error::BmpError;
use crate::register::{Readable, Writable};
use embedded_hal_async::delay::DelayNs;
use heapless::{LinearMap, Vec};

/// BMP180 datasheet example coefficients, big-endian.
pub const BMP180_CALIBRATION: [u8; 22] = [
    0x01, 0x98, 0xFF, 0xB8, 0xC7, 0xD1, 0x7F, 0xE5, 0x7F, 0xF5, 0x5A, 0x71, 0x18, 0x2E, 0x00, 0x04, 0x80, 0x00,
    0xDD, 0xF9, 0x0B, 0x34,
];

/// BMP280 datasheet example coefficients, little-endian.
pub const BMP280_CALIBRATION: [u8; 24] = [
    0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C, 0x00, 0xF9, 0xFF,
    0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17,
];

pub const BME280_CALIBRATION_H1: u8 = 75;

pub const BME280_CALIBRATION_H: [u8; 7] = [0x6A, 0x01, 0x00, 0x13, 0x29, 0x03, 0x1E];

/// Coefficients read from a BMP390 on the bench.
pub const BMP388_CALIBRATION: [u8; 21] = [
    0x98, 0x6E, 0x13, 0x4D, 0xF9, 0xB0, 0x1B, 0xC0, 0x15, 0x06, 0x01, 0x92, 0x4A, 0xAE, 0x5D, 0x03, 0xFA, 0x08,
    0x0F, 0x06, 0xF5,
];

#[derive(Debug)]
enum Response {
    Data { bytes: [u8; MAX_REG_BYTES], len: usize },
    /// Answers `busy` for the first `busy_reads` reads and `idle` afterwards.
    Busy { busy: u8, idle: u8, busy_reads: usize },
    BusError,
}

#[derive(Debug)]
struct RegisterValue {
    response: Response,
    reads: usize,
}

pub struct FakeBus<const N: usize> {
    regs: LinearMap<(u8, usize), RegisterValue, N>,
    writes: Vec<(u8, u8), 32>,
}

impl<const N: usize> FakeBus<N> {
    pub fn new() -> Self {
        FakeBus {
            regs: LinearMap::new(),
            writes: Vec::new(),
        }
    }

    fn insert<R: Readable>(&mut self, response: Response) {
        self.regs
            .insert((R::ADDR, R::N), RegisterValue { response, reads: 0 })
            .unwrap();
    }

    pub fn with_response<R: Readable>(&mut self, data: &[u8]) {
        let mut register_value = [0u8; MAX_REG_BYTES];
        register_value[..data.len()].copy_from_slice(data);
        self.insert::<R>(Response::Data { bytes: register_value, len: data.len() });
    }

    pub fn with_busy_response<R: Readable>(&mut self, busy: u8, idle: u8, busy_reads: usize) {
        self.insert::<R>(Response::Busy { busy, idle, busy_reads });
    }

    pub fn with_bus_error<R: Readable>(&mut self) {
        self.insert::<R>(Response::BusError);
    }

    /// Number of reads of register `R` so far.
    pub fn reads<R: Readable>(&self) -> usize {
        self.regs.get(&(R::ADDR, R::N)).map(|v| v.reads).unwrap_or(0)
    }

    /// Every register write so far, as (address, value), in order.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }
}

impl<const N: usize> Bus for FakeBus<N> {
    type Error = ();

    async fn read<R: Readable>(&mut self) -> Result<R::Out, BmpError<Self::Error>> {
        if let Some(value) = self.regs.get_mut(&(R::ADDR, R::N)) {
            value.reads += 1;
            match &value.response {
                Response::Data { bytes, len } => {
                    if *len == R::N {
                        return Ok(R::decode(&bytes[..R::N]));
                    }
                }
                Response::Busy { busy, idle, busy_reads } => {
                    let byte = if value.reads <= *busy_reads { *busy } else { *idle };
                    return Ok(R::decode(&[byte]));
                }
                Response::BusError => return Err(BmpError::Bus(())),
            }
        }

        panic!("No mocked value for register 0x{:x} and length {}", R::ADDR, R::N)
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), BmpError<Self::Error>> {
        let mut buffer = [0u8; MAX_REG_BYTES];
        W::encode(v, &mut buffer[..W::N]);
        self.writes.push((W::ADDR, buffer[0])).unwrap();
        Ok(())
    }
}

/// Delay that returns immediately and remembers how long it was asked to wait.
#[derive(Default)]
pub struct FakeDelay {
    pub calls: u32,
    pub total_ms: u32,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ms += ns / 1_000_000;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ms += ms;
    }
}
