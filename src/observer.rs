//! Caller supplied hooks into the measurement pipeline.
//!
//! An [`Observer`] is handed to the device at construction and sees every step of a reading as it
//! happens. It is the place to look at intermediate values, such as the raw ADC counts or the
//! fine temperature, without adding anything to the compensation formulas. All hooks default to doing nothing.

use crate::calibration::CalibrationSet;
use crate::compensation::{Compensated, RawSample};
use crate::measurement::{Conversion, PollOutcome};
use crate::sensor::SensorKind;

pub trait Observer {
    /// A forced conversion was started with the given oversampling code.
    fn triggered(&mut self, _kind: SensorKind, _conversion: Conversion, _oversampling: u8) {}

    /// Polling for the end of a conversion finished.
    fn polled(&mut self, _kind: SensorKind, _outcome: PollOutcome) {}

    /// The calibration block was read from the sensor.
    fn calibration_loaded(&mut self, _calibration: &CalibrationSet) {}

    /// Raw counts were turned into a compensated reading.
    fn compensated(&mut self, _raw: &RawSample, _result: &Compensated) {}
}

/// Observer that ignores everything. Used when no observer is given.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn triggered(&mut self, kind: SensorKind, conversion: Conversion, oversampling: u8) {
        (**self).triggered(kind, conversion, oversampling)
    }

    fn polled(&mut self, kind: SensorKind, outcome: PollOutcome) {
        (**self).polled(kind, outcome)
    }

    fn calibration_loaded(&mut self, calibration: &CalibrationSet) {
        (**self).calibration_loaded(calibration)
    }

    fn compensated(&mut self, raw: &RawSample, result: &Compensated) {
        (**self).compensated(raw, result)
    }
}
