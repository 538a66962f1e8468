//! Low-precision nutation
//!
//! The four largest terms of the IAU 1980 series (Meeus, ch. 22), good to
//! about half an arcsecond, which is plenty for time-of-day quantities.

use crate::constants::{ASEC2RAD, DEG2RAD};
use crate::time::julian_centuries;

/// Mean longitudes of the Sun and Moon and of the Moon's ascending node, in radians
fn fundamental_arguments(t: f64) -> (f64, f64, f64) {
    let sun = (280.4665 + 36_000.7698 * t) * DEG2RAD;
    let moon = (218.3165 + 481_267.8813 * t) * DEG2RAD;
    let node = (125.044_52 - 1_934.136_261 * t + 0.002_070_8 * t * t + t * t * t / 450_000.0) * DEG2RAD;
    (sun, moon, node)
}

/// Nutation in longitude and in obliquity, in radians
pub fn nutation(jd: f64) -> (f64, f64) {
    let (sun, moon, node) = fundamental_arguments(julian_centuries(jd));

    let d_psi = -17.20 * node.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * node).sin();
    let d_eps = 9.20 * node.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
        - 0.09 * (2.0 * node).cos();

    (d_psi * ASEC2RAD, d_eps * ASEC2RAD)
}

/// Nutation in longitude in radians
pub fn nutation_longitude(jd: f64) -> f64 {
    nutation(jd).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_meeus_example_22a() {
        // 1987 April 10, 0h TD: Δψ = -3.788", Δε = +9.443"
        let (d_psi, d_eps) = nutation(2_446_895.5);
        assert_relative_eq!(d_psi / ASEC2RAD, -3.788, epsilon = 0.5);
        assert_relative_eq!(d_eps / ASEC2RAD, 9.443, epsilon = 0.1);
    }

    #[test]
    fn test_nutation_is_bounded() {
        for i in 0..200 {
            let d_psi = nutation_longitude(2_451_545.0 + i as f64 * 50.0) / ASEC2RAD;
            assert!(d_psi.abs() < 19.0);
        }
    }
}
