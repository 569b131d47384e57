//! BME280 humidity compensation (datasheet section 4.2.3). Temperature and pressure use the
//! BMP280 formulas.

use crate::calibration::HumidityCalibration;

/// Upper bound of the humidity intermediate before the final shift. 100 %RH in Q22.10 after `>> 12`.
const HUMIDITY_MAX: i32 = 419430400;

/// Returns relative humidity in Q22.10 format (divide by 1024 for %RH).
pub fn humidity(adc_h: i32, t_fine: i32, c: &HumidityCalibration) -> u32 {
    let v = t_fine - 76800;

    let offset = (adc_h << 14)
        .wrapping_sub((c.dig_h4 as i32) << 20)
        .wrapping_sub((c.dig_h5 as i32).wrapping_mul(v))
        .wrapping_add(16384)
        >> 15;
    let scale = ((((v.wrapping_mul(c.dig_h6 as i32) >> 10)
        .wrapping_mul((v.wrapping_mul(c.dig_h3 as i32) >> 11) + 32768)
        >> 10)
        + 2097152)
        .wrapping_mul(c.dig_h2 as i32)
        + 8192)
        >> 14;
    let v = offset.wrapping_mul(scale);
    let v = v.wrapping_sub((((v >> 15).wrapping_mul(v >> 15) >> 7).wrapping_mul(c.dig_h1 as i32)) >> 4);

    saturate(v)
}

/// Clamps the humidity intermediate to `[0, 419430400]` and drops the 12 fractional bits.
fn saturate(v: i32) -> u32 {
    (v.clamp(0, HUMIDITY_MAX) >> 12) as u32
}
