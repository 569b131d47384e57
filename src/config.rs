/// Requested measurement accuracy. Higher accuracy means more internal samples per reading
/// and a longer conversion.
///
/// Each sensor maps these onto its own oversampling codes, see [`crate::SensorKind::oversampling_code`].
/// [`AccuracyMode::Highest`] only differs from [`AccuracyMode::UltraHigh`] on the BMP388, which has one
/// more oversampling step than the other parts. Elsewhere it selects the part's highest setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccuracyMode {
    UltraLow,
    Low,
    #[default]
    Standard,
    High,
    UltraHigh,
    Highest,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Configuration {
    pub(crate) poll_attempts: u32,
    pub(crate) poll_interval_ms: u32,
    pub(crate) companion_temperature_accuracy: AccuracyMode,
    pub(crate) reload_calibration: bool,
    pub(crate) validate_coefficients: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            poll_attempts: 10,
            poll_interval_ms: 5,
            companion_temperature_accuracy: AccuracyMode::Standard,
            reload_calibration: false,
            validate_coefficients: false,
        }
    }
}

impl Configuration {
    /// How many times the busy flag is checked before a conversion is reported as timed out.
    /// Values below 1 are treated as 1.
    pub fn poll_attempts(mut self, attempts: u32) -> Self {
        self.poll_attempts = attempts.max(1);

        self
    }

    /// Delay between two checks of the busy flag.
    pub fn poll_interval_ms(mut self, interval_ms: u32) -> Self {
        self.poll_interval_ms = interval_ms;

        self
    }

    /// Temperature accuracy used when temperature is only sampled to compensate a pressure or humidity reading.
    pub fn companion_temperature_accuracy(mut self, accuracy: AccuracyMode) -> Self {
        self.companion_temperature_accuracy = accuracy;

        self
    }

    /// Re-reads the calibration block before every compensated reading instead of using the copy
    /// read during construction.
    pub fn reload_calibration(mut self, reload: bool) -> Self {
        self.reload_calibration = reload;

        self
    }

    /// Rejects a sensor whose calibration block looks erased already during construction.
    pub fn validate_coefficients(mut self, validate: bool) -> Self {
        self.validate_coefficients = validate;

        self
    }
}
