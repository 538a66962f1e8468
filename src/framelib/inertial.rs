use crate::constants::{ASEC2RAD, HOUR2RAD, J2000, JULIAN_CENTURY, RAD2HOUR};
use nalgebra::{Rotation3, Vector3};

/// Mean obliquity of the ecliptic (radians) at the given Julian date (IAU 1980)
pub fn mean_obliquity(jd: f64) -> f64 {
    let t = (jd - J2000) / JULIAN_CENTURY;
    let arcsec = 84_381.448 - 46.8150 * t - 0.00059 * t * t + 0.001813 * t * t * t;
    arcsec * ASEC2RAD
}

/// Rotation taking ecliptic-of-date vectors to equatorial-of-date vectors
pub fn ecliptic_to_equatorial_rotation(jd: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), mean_obliquity(jd))
}

/// Rotates an ecliptic vector of date into the equatorial frame of date
pub fn ecliptic_to_equatorial(v: &Vector3<f64>, jd: f64) -> Vector3<f64> {
    ecliptic_to_equatorial_rotation(jd) * *v
}

// Equatorial coordinates (RA/Dec), equinox of date
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Equatorial {
    pub ra: f64,  // Right ascension in radians
    pub dec: f64, // Declination in radians
}

impl Equatorial {
    pub fn new(ra: f64, dec: f64) -> Self {
        let normalized_ra = ra.rem_euclid(2.0 * std::f64::consts::PI);
        Equatorial {
            ra: normalized_ra,
            dec,
        }
    }

    /// Create a new Equatorial coordinate from RA in hours and Dec in radians
    pub fn from_hours(ra_hours: f64, dec: f64) -> Self {
        Self::new(ra_hours * HOUR2RAD, dec)
    }

    /// Get right ascension in hours, `[0, 24)`
    pub fn ra_hours(&self) -> f64 {
        crate::coordinates::angle::to_unsigned_ra(self.ra * RAD2HOUR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::cartesian::Cartesian3;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_obliquity_at_j2000() {
        assert_relative_eq!(mean_obliquity(J2000).to_degrees(), 23.439_291, epsilon = 1e-6);
    }

    #[test]
    fn test_summer_solstice_point() {
        // Ecliptic longitude 90 degrees sits at RA 6h, Dec = +obliquity
        let v = ecliptic_to_equatorial(&Vector3::new(0.0, 1.0, 0.0), J2000);
        let (ra, dec) = Cartesian3::from_vector3(v).to_ra_dec_hours();
        assert_relative_eq!(ra, 6.0, epsilon = 1e-10);
        assert_relative_eq!(dec, mean_obliquity(J2000), epsilon = 1e-12);
    }

    #[test]
    fn test_right_ascension_wraps() {
        let eq = Equatorial::new(-PI / 2.0, 0.3);
        assert_relative_eq!(eq.ra, 1.5 * PI, epsilon = 1e-12);
        assert_relative_eq!(eq.ra_hours(), 18.0, epsilon = 1e-12);
        assert_relative_eq!(Equatorial::from_hours(25.0, 0.0).ra_hours(), 1.0, epsilon = 1e-12);
    }
}
