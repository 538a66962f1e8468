//! Observer locations on the Earth's surface

use crate::constants::{AU_KM, EARTH_MEAN_RADIUS_KM, HOUR2RAD, WGS84_INVERSE_FLATTENING, WGS84_RADIUS_KM};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// A geographic observing site
///
/// Latitude and longitude are in radians (east positive), altitude in
/// metres above sea level. Two locations compare equal only when all three
/// fields match, which is what change detection relies on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
}

impl GeographicLocation {
    pub fn new(latitude: f64, longitude: f64, altitude_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m,
        }
    }

    /// Create a location from latitude and longitude in degrees
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self::new(latitude_deg.to_radians(), longitude_deg.to_radians(), altitude_m)
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }

    /// Geocentric position of the observer in AU, equatorial frame of date.
    ///
    /// Uses a spherical Earth. The observer's meridian sits at the local
    /// sidereal time `lst_hours`.
    pub fn geocentric_equatorial_au(&self, lst_hours: f64) -> Vector3<f64> {
        let r = (EARTH_MEAN_RADIUS_KM + self.altitude_m / 1000.0) / AU_KM;
        let lst = lst_hours * HOUR2RAD;
        let cos_lat = self.latitude.cos();
        Vector3::new(
            r * cos_lat * lst.cos(),
            r * cos_lat * lst.sin(),
            r * self.latitude.sin(),
        )
    }

    /// Earth-fixed (ECEF) position in km on the WGS84 ellipsoid
    pub fn ecef_km(&self) -> Vector3<f64> {
        let f = 1.0 / WGS84_INVERSE_FLATTENING;
        let e2 = f * (2.0 - f);
        let sin_lat = self.latitude.sin();
        let cos_lat = self.latitude.cos();
        let n = WGS84_RADIUS_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let h = self.altitude_m / 1000.0;

        Vector3::new(
            (n + h) * cos_lat * self.longitude.cos(),
            (n + h) * cos_lat * self.longitude.sin(),
            (n * (1.0 - e2) + h) * sin_lat,
        )
    }

    /// Geodetic location of an Earth-fixed (ECEF) point in km on the WGS84 ellipsoid
    pub fn from_ecef_km(position: &Vector3<f64>) -> Self {
        let f = 1.0 / WGS84_INVERSE_FLATTENING;
        let e2 = f * (2.0 - f);
        let p = position.x.hypot(position.y);
        let longitude = position.y.atan2(position.x);

        let mut latitude = position.z.atan2(p * (1.0 - e2));
        let mut height = 0.0;
        for _ in 0..6 {
            let sin_lat = latitude.sin();
            let n = WGS84_RADIUS_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
            height = if latitude.abs() < FRAC_PI_4 {
                p / latitude.cos() - n
            } else {
                position.z / sin_lat - n * (1.0 - e2)
            };
            latitude = position.z.atan2(p * (1.0 - e2 * n / (n + height)));
        }

        Self::new(latitude, longitude, height * 1000.0)
    }
}

impl Default for GeographicLocation {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}
