//! Conversions from the integer values the compensation produces to engineering units.

/// Pascal in one millimeter of mercury.
pub const PA_PER_MMHG: f32 = 133.322;

/// Standard atmospheric pressure at sea level, in 0.1 Pa.
pub const SEA_LEVEL_PRESSURE_MULT10PA: f64 = 1013250.0;

/// 0.01 °C to °C.
pub fn celsius(mult100c: i32) -> f32 {
    mult100c as f32 / 100.0
}

/// 0.1 Pa to Pa.
pub fn pascal(mult10pa: u32) -> f32 {
    mult10pa as f32 / 10.0
}

/// 0.1 Pa to mmHg, truncated (not rounded) to two decimals.
pub fn mmhg(mult10pa: u32) -> f32 {
    let hundredths = (mult10pa as f32 / PA_PER_MMHG * 10.0) as i32;
    hundredths as f32 / 100.0
}

/// Altitude above sea level in meters, from the international barometric formula,
/// truncated to two decimals.
pub fn altitude(mult10pa: u32) -> f32 {
    let a = 44330.0 * (1.0 - libm::pow(mult10pa as f64 / SEA_LEVEL_PRESSURE_MULT10PA, 1.0 / 5.255));
    (a * 100.0) as i32 as f32 / 100.0
}

/// Q22.10 to %RH.
pub fn relative_humidity(q2210: u32) -> f32 {
    q2210 as f32 / 1024.0
}

#[cfg(feature = "uom")]
pub fn temperature_uom(mult100c: i32) -> uom::si::f32::ThermodynamicTemperature {
    uom::si::thermodynamic_temperature::ThermodynamicTemperature::new::<uom::si::thermodynamic_temperature::degree_celsius>(celsius(mult100c))
}

#[cfg(feature = "uom")]
pub fn pressure_uom(mult10pa: u32) -> uom::si::f32::Pressure {
    uom::si::pressure::Pressure::new::<uom::si::pressure::pascal>(pascal(mult10pa))
}
