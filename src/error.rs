//! Errors that can occur when using one of the supported sensors.
//!
//! This module provides an error type that encapsulates all possible errors that can occur during communication with
//! the sensor. It is generic over the underlying bus error type.
//!
//! A conversion timeout is deliberately *not* an error. See [`crate::Reading::timed_out`].

use core::fmt::{Display, Formatter};

use crate::sensor::SensorKind;

/// Type alias used to simplify return types throughout the driver
pub type BmpResult<T, BusError> = Result<T, BmpError<BusError>>;

/// This represents all possible errors that can occur when using a sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum BmpError<BusError> {
    /// An error has occurred in the I2C driver
    Bus(BusError),

    /// The identity register holds a value that does not belong to the configured sensor kind.
    ///
    /// Could possibly indicate that the wrong [`SensorKind`] was chosen, or a wiring problem.
    UnrecognizedSignature {
        kind: SensorKind,
        signature: u8,
    },

    /// A calibration coefficient reads as erased memory (all zeros or all ones).
    ///
    /// The calibration block is never substituted with defaults. Power-cycling the sensor and
    /// reading the coefficients again is the only way to recover.
    InvalidCoefficient(InvalidCoefficient),
}

impl<BusError> From<InvalidCoefficient> for BmpError<BusError> {
    fn from(value: InvalidCoefficient) -> Self {
        BmpError::InvalidCoefficient(value)
    }
}

impl<BusError: Display> Display for BmpError<BusError> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BmpError::Bus(e) => write!(f, "bus error: {}", e),
            BmpError::UnrecognizedSignature { kind, signature } => {
                write!(f, "signature 0x{:02x} doesn't belong to {} series", signature, kind)
            }
            BmpError::InvalidCoefficient(c) => Display::fmt(c, f),
        }
    }
}

/// Names the calibration coefficient that failed the validity check, and its raw bit pattern.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidCoefficient {
    pub name: &'static str,
    pub raw: u16,
}

impl Display for InvalidCoefficient {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "coefficient {} is invalid: 0x{:X}", self.name, self.raw)
    }
}
