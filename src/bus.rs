use crate::error::{BmpError, BmpResult};
use crate::register::{Readable, Writable};

/// Largest transfer issued by the driver: the 24 byte BMP280/BME280 calibration block.
pub const MAX_REG_BYTES: usize = 24;

/// Register level access to a sensor.
///
/// Implementations transfer `R::N` bytes starting at `R::ADDR` and leave decoding to the marker type.
/// Any transport failure is returned as [`BmpError::Bus`] and is never retried by the driver.
pub trait Bus {
    type Error;

    fn read<R: Readable>(&mut self) -> impl Future<Output = BmpResult<R::Out, Self::Error>>;

    fn write<W: Writable>(&mut self, v: &W::In) -> impl Future<Output = BmpResult<(), Self::Error>>;
}

/// I2C transport. All four sensors share the same register-addressed protocol:
/// a write of the register address followed by a repeated-start read, or a write of address and payload.
pub struct I2c<I2cType> {
    i2c: I2cType,
    address: u8,
}

impl<I2cType> I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    pub(crate) fn new(i2c: I2cType, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Hands the underlying I2C peripheral back.
    pub fn release(self) -> I2cType {
        self.i2c
    }
}

impl<I2cType> Bus for I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    type Error = <I2cType as embedded_hal_async::i2c::ErrorType>::Error;

    async fn read<R: Readable>(&mut self) -> BmpResult<R::Out, Self::Error> {
        let mut buffer = [0u8; MAX_REG_BYTES];
        let data = &mut buffer[..R::N];
        self.i2c
            .write_read(self.address, &[R::ADDR], data)
            .await
            .map_err(BmpError::Bus)?;

        Ok(R::decode(data))
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> BmpResult<(), Self::Error> {
        let mut buffer = [0u8; MAX_REG_BYTES + 1];
        buffer[0] = W::ADDR;
        W::encode(v, &mut buffer[1..=W::N]);
        self.i2c
            .write(self.address, &buffer[..=W::N])
            .await
            .map_err(BmpError::Bus)?;

        Ok(())
    }
}
