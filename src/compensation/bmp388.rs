//! BMP388 integer compensation, following the 64-bit fixed point path of the vendor's BMP3 API.
//!
//! Every intermediate is 64 bits wide. Narrowing any of them silently corrupts the result.

use crate::calibration::Bmp388Calibration;

/// Returns the temperature in 0.01 °C and `t_lin`.
pub fn temperature(uncomp_temp: i32, c: &Bmp388Calibration) -> (i32, i64) {
    let partial_data1 = uncomp_temp as i64 - 256 * c.nvm_par_t1 as i64;
    let partial_data2 = (c.nvm_par_t2 as i64).wrapping_mul(partial_data1);
    let partial_data3 = partial_data1.wrapping_mul(partial_data1);
    let partial_data4 = partial_data3.wrapping_mul(c.nvm_par_t3 as i64);
    let partial_data5 = partial_data2.wrapping_mul(262144).wrapping_add(partial_data4);
    let t_lin = partial_data5 / 4294967296;

    ((t_lin.wrapping_mul(25) / 16384) as i32, t_lin)
}

/// Returns the pressure in 0.1 Pa.
pub fn pressure(uncomp_press: i32, t_lin: i64, c: &Bmp388Calibration) -> u32 {
    let up = uncomp_press as i64;

    let partial_data1 = t_lin.wrapping_mul(t_lin);
    let partial_data2 = partial_data1 / 64;
    let partial_data3 = partial_data2.wrapping_mul(t_lin) / 256;
    let partial_data4 = (c.nvm_par_p8 as i64).wrapping_mul(partial_data3) / 32;
    let partial_data5 = (c.nvm_par_p7 as i64).wrapping_mul(partial_data1).wrapping_mul(16);
    let partial_data6 = (c.nvm_par_p6 as i64).wrapping_mul(t_lin).wrapping_mul(4194304);
    let offset = (c.nvm_par_p5 as i64)
        .wrapping_mul(140737488355328)
        .wrapping_add(partial_data4)
        .wrapping_add(partial_data5)
        .wrapping_add(partial_data6);

    let partial_data2 = (c.nvm_par_p4 as i64).wrapping_mul(partial_data3) / 32;
    let partial_data4 = (c.nvm_par_p3 as i64).wrapping_mul(partial_data1).wrapping_mul(4);
    let partial_data5 = (c.nvm_par_p2 as i64 - 16384).wrapping_mul(t_lin).wrapping_mul(2097152);
    let sensitivity = (c.nvm_par_p1 as i64 - 16384)
        .wrapping_mul(70368744177664)
        .wrapping_add(partial_data2)
        .wrapping_add(partial_data4)
        .wrapping_add(partial_data5);

    let partial_data1 = (sensitivity / 16777216).wrapping_mul(up);
    let partial_data2 = (c.nvm_par_p10 as i64).wrapping_mul(t_lin);
    let partial_data3 = partial_data2.wrapping_add(65536 * c.nvm_par_p9 as i64);
    let partial_data4 = partial_data3.wrapping_mul(up) / 8192;
    let partial_data5 = up.wrapping_mul(partial_data4 / 10) / 512;
    let partial_data5 = partial_data5.wrapping_mul(10);
    let partial_data6 = up.wrapping_mul(up);
    let partial_data2 = (c.nvm_par_p11 as i64).wrapping_mul(partial_data6) / 65536;
    let partial_data3 = partial_data2.wrapping_mul(up) / 128;
    let partial_data4 = (offset / 4)
        .wrapping_add(partial_data1)
        .wrapping_add(partial_data5)
        .wrapping_add(partial_data3);

    // 0.01 Pa
    let comp_press = (partial_data4 as u64).wrapping_mul(25) / 1099511627776;

    (comp_press / 10) as u32
}
