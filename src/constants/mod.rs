//! Constants module for astronomical calculations

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in meters (per IAU 2012 Resolution B2)
pub const AU_M: f64 = 149_597_870_700.0;
/// Astronomical Unit in kilometers
pub const AU_KM: f64 = 149_597_870.700;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Minutes in a day
pub const DAY_MIN: f64 = 1_440.0;
/// One second expressed in hours
pub const SECOND_H: f64 = 1.0 / 3_600.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Days in a Julian century
pub const JULIAN_CENTURY: f64 = 36_525.0;

/// Ratio of the sidereal day to the solar day.
///
/// Multiplying a span measured in sidereal hours by this factor gives solar hours.
pub const SIDEREAL_TO_SOLAR: f64 = 0.997_267_759_562_841_4;
/// Factor applied to the Sun's twilight hour angle when converting it to sidereal time
pub const TWILIGHT_HOUR_ANGLE_FACTOR: f64 = 1.002_78;

// Lunar constants
/// Mean synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588;
/// Julian date of a reference full moon (2000-01-21)
pub const REFERENCE_FULL_MOON: f64 = 2_451_564.696;
/// Earth/Moon mass ratio
pub const EARTH_MOON_MASS_RATIO: f64 = 81.300_56;

// Angles
/// Arcseconds to radians conversion factor
pub const ASEC2RAD: f64 = 4.848_136_811_095_36e-6;
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Radians to hours conversion factor
pub const RAD2HOUR: f64 = 12.0 / PI;
/// Hours to radians conversion factor
pub const HOUR2RAD: f64 = PI / 12.0;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Physics
/// Speed of light in m/s
pub const C: f64 = 299_792_458.0;
/// Speed of light in km/s
pub const C_KM_S: f64 = C / 1_000.0;

// Earth constants
/// Earth's angular velocity in radians/s
pub const EARTH_ANGVEL: f64 = 7.292_115_0e-5;
/// Mean Earth radius in kilometers (spherical model used for topocentric corrections)
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.0;
/// WGS84 equatorial radius in kilometers
pub const WGS84_RADIUS_KM: f64 = 6_378.137;
/// WGS84 inverse flattening
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;
