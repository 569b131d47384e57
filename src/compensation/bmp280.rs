//! BMP280 integer compensation, following the 32-bit temperature and 64-bit pressure
//! reference code in section 8.2 of the datasheet. Used unchanged for the BME280.

use crate::calibration::Bmp280Calibration;

/// Returns the temperature in 0.01 °C and `t_fine`.
pub fn temperature(adc_t: i32, c: &Bmp280Calibration) -> (i32, i32) {
    let t1 = c.dig_t1 as i32;
    let var1 = ((adc_t >> 3) - (t1 << 1)).wrapping_mul(c.dig_t2 as i32) >> 11;
    let delta = (adc_t >> 4) - t1;
    let var2 = (delta.wrapping_mul(delta) >> 12).wrapping_mul(c.dig_t3 as i32) >> 14;
    let t_fine = var1 + var2;

    ((t_fine * 5 + 128) >> 8, t_fine)
}

/// Returns the pressure in 0.1 Pa, or 0 when the calibration would cause a division by zero.
pub fn pressure(adc_p: i32, t_fine: i32, c: &Bmp280Calibration) -> u32 {
    let mut var1 = t_fine as i64 - 128000;
    let mut var2 = var1.wrapping_mul(var1).wrapping_mul(c.dig_p6 as i64);
    var2 = var2.wrapping_add(var1.wrapping_mul(c.dig_p5 as i64) << 17);
    var2 = var2.wrapping_add((c.dig_p4 as i64) << 35);
    var1 = (var1.wrapping_mul(var1).wrapping_mul(c.dig_p3 as i64) >> 8)
        .wrapping_add(var1.wrapping_mul(c.dig_p2 as i64) << 12);
    var1 = ((1i64 << 47).wrapping_add(var1)).wrapping_mul(c.dig_p1 as i64) >> 33;
    if var1 == 0 {
        return 0;
    }

    let mut p: i64 = 1048576 - adc_p as i64;
    p = ((p << 31).wrapping_sub(var2)).wrapping_mul(3125) / var1;
    let var1 = (c.dig_p9 as i64).wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
    let var2 = (c.dig_p8 as i64).wrapping_mul(p) >> 19;
    p = ((p + var1 + var2) >> 8) + ((c.dig_p7 as i64) << 4);

    // p is Q24.8 Pa
    (p.wrapping_mul(10) / 256) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BMP280_CALIBRATION;

    fn calibration() -> Bmp280Calibration {
        Bmp280Calibration::from_bytes(&BMP280_CALIBRATION)
    }

    #[test]
    fn datasheet_temperature() {
        let (t, t_fine) = temperature(519888, &calibration());
        assert_eq!(2508, t);
        assert_eq!(128422, t_fine);
    }

    #[test]
    fn datasheet_pressure() {
        assert_eq!(1006532, pressure(415148, 128422, &calibration()));
    }

    #[test]
    fn zero_var1_yields_zero_pressure() {
        let mut c = calibration();
        c.dig_p1 = 0;
        assert_eq!(0, pressure(415148, 128422, &c));
    }
}
