//! Angular separation and position angle between points on the sky

use crate::constants::{HOUR2RAD, TAU};

/// Angular separation (radians, `[0, π]`) between two equatorial positions.
///
/// Right ascensions are in hours, declinations in radians. Uses the
/// spherical law of cosines with the cosine clamped into `[-1, 1]`, so
/// coincident points give exactly zero instead of `NaN`.
///
/// # Examples
///
/// ```rust
/// use planisphere::coordinates::spherical::angular_separation;
///
/// // Two points on the celestial equator 6 hours apart are 90 degrees apart
/// let sep = angular_separation(0.0, 0.0, 6.0, 0.0);
/// assert!((sep.to_degrees() - 90.0).abs() < 1e-10);
/// ```
pub fn angular_separation(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let cos_sep = dec1.sin() * dec2.sin() + dec1.cos() * dec2.cos() * ((ra1 - ra2) * HOUR2RAD).cos();
    cos_sep.clamp(-1.0, 1.0).acos()
}

/// Position angle (radians, `[0, 2π)`) of the second point as seen from the first.
///
/// Longitudes and latitudes are in radians, in any spherical frame
/// (equatorial, ecliptic, horizontal). The angle is measured from the
/// frame's north through increasing longitude.
pub fn position_angle(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let dlon = lon2 - lon1;
    let y = lat2.cos() * dlon.sin();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x).rem_euclid(TAU)
}
