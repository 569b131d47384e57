//! BMP180 integer compensation, as laid out in section 3.5 of the datasheet.
//!
//! All intermediates are 32 bits wide. `b7` is the only unsigned one.

use crate::calibration::Bmp180Calibration;

/// Returns the temperature in 0.01 °C and the `b5` intermediate that pressure compensation needs.
///
/// A divisor of zero can only come from a corrupted calibration set. The affected term is taken as 0.
pub fn temperature(ut: i32, c: &Bmp180Calibration) -> (i32, i32) {
    let x1 = ut.wrapping_sub(c.ac6 as i32).wrapping_mul(c.ac5 as i32) >> 15;
    let x2 = ((c.mc as i32) << 11).checked_div(x1 + c.md as i32).unwrap_or(0);
    let b5 = x1 + x2;

    (((b5 + 8) >> 4) * 10, b5)
}

/// Returns the pressure in 0.1 Pa.
///
/// `b5` has to come from the temperature conversion that immediately preceded the pressure conversion.
/// `up` is the pressure count already shifted by `8 - oss`.
pub fn pressure(up: i32, oss: u8, b5: i32, c: &Bmp180Calibration) -> u32 {
    let oss = oss as u32;
    let b6 = b5 - 4000;

    let x1 = (c.b2 as i32).wrapping_mul(b6.wrapping_mul(b6) >> 12) >> 11;
    let x2 = (c.ac2 as i32).wrapping_mul(b6) >> 11;
    let x3 = x1 + x2;
    let b3 = (((c.ac1 as i32 * 4 + x3) << oss) + 2) / 4;

    let x1 = (c.ac3 as i32).wrapping_mul(b6) >> 13;
    let x2 = (c.b1 as i32).wrapping_mul(b6.wrapping_mul(b6) >> 12) >> 16;
    let x3 = ((x1 + x2) + 2) >> 2;
    let b4 = (c.ac4 as u32).wrapping_mul(x3.wrapping_add(32768) as u32) >> 15;
    if b4 == 0 {
        return 0;
    }

    let b7 = (up as u32).wrapping_sub(b3 as u32).wrapping_mul(50000 >> oss);
    let mut p = divide_b7(b7, b4);

    let x1 = (p >> 8).wrapping_mul(p >> 8);
    let x1 = x1.wrapping_mul(3038) >> 16;
    let x2 = (-7357i32).wrapping_mul(p) >> 16;
    p = p.wrapping_add((x1 + x2 + 3791) >> 4);

    (p as u32).wrapping_mul(10)
}

/// Computes `2 * b7 / b4` without overflowing 32 bits.
///
/// Below 0x80000000 the doubling happens first and keeps the extra bit of precision.
/// Above it the doubling would overflow, so the division happens first.
fn divide_b7(b7: u32, b4: u32) -> i32 {
    if b7 < 0x8000_0000 {
        ((b7 * 2) / b4) as i32
    } else {
        ((b7 / b4) * 2) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BMP180_CALIBRATION;

    fn calibration() -> Bmp180Calibration {
        Bmp180Calibration::from_bytes(&BMP180_CALIBRATION)
    }

    #[test]
    fn datasheet_temperature() {
        let (t, b5) = temperature(27898, &calibration());
        assert_eq!(1500, t);
        assert_eq!(2400, b5);
    }

    #[test]
    fn datasheet_pressure() {
        let c = calibration();
        let (_, b5) = temperature(27898, &c);
        assert_eq!(699640, pressure(23843, 0, b5, &c));
    }

    #[test]
    fn pressure_with_small_b7() {
        let c = calibration();
        assert_eq!(1183200, pressure(40000, 0, 2400, &c));
    }

    #[test]
    fn pressure_with_large_b7() {
        let c = calibration();
        assert_eq!(1333230, pressure(45000, 0, 2400, &c));
        assert_eq!(1951600, pressure(65535, 0, 2400, &c));
    }

    #[test]
    fn pressure_shifts_by_oversampling() {
        let c = calibration();
        assert_eq!(699640, pressure(23843 * 8 + 3, 3, 2400, &c));
        assert_eq!(699620, pressure(23843 * 2, 1, 2400, &c));
    }

    #[test]
    fn b7_branches_agree() {
        let b4 = 33457;
        for b7 in [0x7FFF_0000u32, 0x7FFF_FFFF, 1_171_050_000, 1_978_900_000] {
            let doubled_first = ((b7 as u64 * 2) / b4 as u64) as i32;
            let divided_first = ((b7 / b4) * 2) as i32;
            assert_eq!(doubled_first, divide_b7(b7, b4));
            assert!(doubled_first - divided_first <= 1);
        }

        for b7 in [0x8000_0000u32, 2_228_900_000, 3_255_650_000] {
            let exact = ((b7 as u64 * 2) / b4 as u64) as i32;
            let p = divide_b7(b7, b4);
            assert!(exact - p <= 1 && exact >= p);
        }
    }

    #[test]
    fn zero_divisors_do_not_panic() {
        let mut c = calibration();
        c.md = -4743;
        let (_, b5) = temperature(27898, &c);
        assert_eq!(4743, b5);

        let mut c = calibration();
        c.ac4 = 0;
        assert_eq!(0, pressure(23843, 0, 2400, &c));
    }
}
