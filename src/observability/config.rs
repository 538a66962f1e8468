//! Observability settings supplied by the host

use crate::coordinates::refraction::{effective_horizon, Atmosphere};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Settings for the observability report
///
/// Altitudes are in degrees. The `show_*` flags select which parts of the
/// report are computed; disabled parts are left as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Apparent altitude of the horizon
    pub horizon_altitude_deg: f64,
    /// Altitude of the Sun that ends evening twilight
    pub twilight_altitude_deg: f64,
    /// Lower the horizon by atmospheric refraction
    pub apply_refraction: bool,
    pub atmosphere: Atmosphere,
    pub show_today: bool,
    pub show_acronychal_cosmical: bool,
    pub show_good_nights: bool,
    pub show_best_night: bool,
    pub show_full_moon: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            horizon_altitude_deg: 0.0,
            twilight_altitude_deg: -12.0,
            apply_refraction: true,
            atmosphere: Atmosphere::default(),
            show_today: true,
            show_acronychal_cosmical: true,
            show_good_nights: true,
            show_best_night: true,
            show_full_moon: true,
        }
    }
}

impl ObservabilityConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Geometric horizon altitude in radians, lowered by refraction when enabled
    pub fn effective_horizon(&self) -> f64 {
        let atmosphere = self.apply_refraction.then_some(&self.atmosphere);
        effective_horizon(self.horizon_altitude_deg, atmosphere).to_radians()
    }

    pub fn twilight_altitude(&self) -> f64 {
        self.twilight_altitude_deg.to_radians()
    }

    /// Whether any of the whole-year analyses is enabled
    pub fn shows_year(&self) -> bool {
        self.show_best_night || self.show_good_nights || self.show_acronychal_cosmical
    }
}
