pub mod angle;
pub mod cartesian;
pub mod refraction;
pub mod spherical;

pub use angle::{hour_angle_from_altitude, normalize_degrees, signed_hours, to_unsigned_ra, Angle};
pub use spherical::{angular_separation, position_angle};

// Re-export the Equatorial coordinate system from framelib
pub use crate::framelib::inertial::Equatorial;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_equatorial_hours() {
        let coord = Equatorial::from_hours(18.0, 0.5);
        assert_relative_eq!(coord.ra, 1.5 * PI, epsilon = 1e-12);
        assert_relative_eq!(coord.ra_hours(), 18.0, epsilon = 1e-12);
        assert_eq!(coord.dec, 0.5);
    }

    #[test]
    fn test_pole_to_equator_separation() {
        let pole = Equatorial::new(0.0, PI / 2.0);
        let equator = Equatorial::from_hours(7.0, 0.0);
        let sep = angular_separation(pole.ra_hours(), pole.dec, equator.ra_hours(), equator.dec);
        assert_relative_eq!(sep, PI / 2.0, epsilon = 1e-9);
    }
}
