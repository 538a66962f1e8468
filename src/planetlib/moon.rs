//! Low-precision geocentric lunar position
//!
//! Series from the Astronomical Almanac's "low precision formulae for the
//! Moon", good to roughly 0.3° in longitude and 0.2° in latitude over
//! 1950-2050. Coordinates are referred to the mean ecliptic and equinox of date.

use crate::constants::{AU_KM, WGS84_RADIUS_KM};
use crate::time::julian_centuries;
use nalgebra::Vector3;

// (amplitude deg, phase deg, rate deg/century)
const LONGITUDE_TERMS: [(f64, f64, f64); 6] = [
    (6.29, 135.0, 477_198.87),
    (-1.27, 259.3, -413_335.36),
    (0.66, 235.7, 890_534.22),
    (0.21, 269.9, 954_397.74),
    (-0.19, 357.5, 35_999.05),
    (-0.11, 186.5, 966_404.03),
];

const LATITUDE_TERMS: [(f64, f64, f64); 4] = [
    (5.13, 93.3, 483_202.02),
    (0.28, 228.2, 960_400.89),
    (-0.28, 318.3, 6_003.15),
    (-0.17, 217.6, -407_332.21),
];

const PARALLAX_TERMS: [(f64, f64, f64); 4] = [
    (0.0518, 135.0, 477_198.87),
    (0.0095, 259.3, -413_335.36),
    (0.0078, 235.7, 890_534.22),
    (0.0028, 269.9, 954_397.74),
];

fn sine_series(terms: &[(f64, f64, f64)], t: f64) -> f64 {
    terms
        .iter()
        .map(|(amp, phase, rate)| amp * (phase + rate * t).to_radians().sin())
        .sum()
}

fn cosine_series(terms: &[(f64, f64, f64)], t: f64) -> f64 {
    terms
        .iter()
        .map(|(amp, phase, rate)| amp * (phase + rate * t).to_radians().cos())
        .sum()
}

/// Geocentric ecliptic longitude, latitude (radians) and distance (AU) of the Moon
pub fn lunar_ecliptic_coordinates(jd: f64) -> (f64, f64, f64) {
    let t = julian_centuries(jd);

    let lon = 218.32 + 481_267.881 * t + sine_series(&LONGITUDE_TERMS, t);
    let lat = sine_series(&LATITUDE_TERMS, t);
    let parallax = 0.9508 + cosine_series(&PARALLAX_TERMS, t);

    let distance_au = WGS84_RADIUS_KM / parallax.to_radians().sin() / AU_KM;

    (lon.to_radians(), lat.to_radians(), distance_au)
}

/// Geocentric ecliptic position vector of the Moon in AU
pub fn lunar_geocentric_position(jd: f64) -> Vector3<f64> {
    let (lon, lat, r) = lunar_ecliptic_coordinates(jd);
    Vector3::new(
        r * lat.cos() * lon.cos(),
        r * lat.cos() * lon.sin(),
        r * lat.sin(),
    )
}
