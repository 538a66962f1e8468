//! Orbit line sampling around the current instant
//!
//! The path is a fixed number of propagated samples spaced by a fixed
//! duration and centred on the current instant. Samples near either end
//! fade out so the drawn line does not stop abruptly.

use super::{LookAngles, Satellite};
use crate::constants::DAY_S;
use crate::toposlib::GeographicLocation;
use crate::Result;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Satellite display settings supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteConfig {
    /// Number of samples along the orbit line
    pub orbit_segments: usize,
    /// Samples over which each end of the line fades in
    pub orbit_fade_segments: usize,
    /// Time between samples in seconds
    pub segment_duration_s: f64,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            orbit_segments: 90,
            orbit_fade_segments: 5,
            segment_duration_s: 20.0,
        }
    }
}

impl SatelliteConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Segment duration in days
    pub fn segment_days(&self) -> f64 {
        self.segment_duration_s / DAY_S
    }
}

/// Brightness of orbit segment `segment`: ramps from 0 to 1 over `fade_segments` at each end
pub fn orbit_segment_intensity(segment: usize, segments: usize, fade_segments: usize) -> f64 {
    if fade_segments == 0 {
        return 1.0;
    }
    let last = segments.saturating_sub(1);
    let from_end = segment.min(last.saturating_sub(segment));
    (from_end as f64 / fade_segments as f64).clamp(0.0, 1.0)
}

/// One sample of the orbit line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPoint {
    pub jd: f64,
    /// TEME position in km
    pub position_teme_km: Vector3<f64>,
    /// Unit vector in the observer's horizontal frame: x north, y east, z up
    pub horizontal: Vector3<f64>,
    pub intensity: f64,
}

/// Sampled orbit line and the inputs it was computed for
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPath {
    pub center_jd: f64,
    pub location: GeographicLocation,
    /// Epoch of the elements used, identifying the element set
    pub epoch_jd: f64,
    pub segment_days: f64,
    pub points: Vec<OrbitPoint>,
}

impl OrbitPath {
    /// Sample `satellite` around `jd` as seen from `location`
    pub fn compute(
        satellite: &mut Satellite,
        jd: f64,
        location: &GeographicLocation,
        config: &SatelliteConfig,
    ) -> Result<Self> {
        let segments = config.orbit_segments;
        let step = config.segment_days();
        let start = jd - (segments / 2) as f64 * step;

        let points = (0..segments)
            .map(|i| {
                let t = start + i as f64 * step;
                let state = satellite.propagate(t)?;
                let look = satellite.look_angles(&state, location);
                Ok(OrbitPoint {
                    jd: t,
                    position_teme_km: state.position_km,
                    horizontal: horizontal_unit_vector(&look),
                    intensity: orbit_segment_intensity(i, segments, config.orbit_fade_segments),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            center_jd: jd,
            location: *location,
            epoch_jd: satellite.epoch_jd(),
            segment_days: step,
            points,
        })
    }

    /// Whether the path must be sampled again for these inputs
    pub fn is_stale(
        &self,
        jd: f64,
        location: &GeographicLocation,
        epoch_jd: f64,
        config: &SatelliteConfig,
    ) -> bool {
        self.location != *location
            || self.epoch_jd != epoch_jd
            || self.points.len() != config.orbit_segments
            || self.segment_days != config.segment_days()
            || (jd - self.center_jd).abs() > self.segment_days
    }
}

/// Direction of the look angles as a unit vector, x north, y east, z up
pub fn horizontal_unit_vector(look: &LookAngles) -> Vector3<f64> {
    let cos_el = look.elevation.cos();
    Vector3::new(
        cos_el * look.azimuth.cos(),
        cos_el * look.azimuth.sin(),
        look.elevation.sin(),
    )
}
