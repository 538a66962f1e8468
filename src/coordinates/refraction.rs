//! Atmospheric refraction near the horizon
//!
//! Bennett's formula gives the refraction for an apparent (observed)
//! altitude, Saemundsson's for a true (geometric) altitude. Both return
//! arcminutes and are scaled for pressure and temperature.

use serde::{Deserialize, Serialize};

// Below this altitude both formulae diverge
const MIN_ALTITUDE_DEG: f64 = -3.0;

/// Atmospheric conditions used to scale refraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    /// Pressure in millibars
    pub pressure_mbar: f64,
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            pressure_mbar: 1013.25,
            temperature_c: 15.0,
        }
    }
}

impl Atmosphere {
    fn scale(&self) -> f64 {
        (self.pressure_mbar / 1010.0) * (283.0 / (273.0 + self.temperature_c))
    }

    /// Refraction in arcminutes for an apparent altitude in degrees (Bennett 1982)
    pub fn refraction_from_apparent(&self, apparent_deg: f64) -> f64 {
        let h = apparent_deg.max(MIN_ALTITUDE_DEG);
        let r = 1.0 / (h + 7.31 / (h + 4.4)).to_radians().tan();
        r * self.scale()
    }

    /// Refraction in arcminutes for a true altitude in degrees (Saemundsson 1986)
    pub fn refraction_from_true(&self, true_deg: f64) -> f64 {
        let h = true_deg.max(MIN_ALTITUDE_DEG);
        let r = 1.02 / (h + 10.3 / (h + 5.11)).to_radians().tan();
        r * self.scale()
    }
}

/// Geometric altitude (degrees) an object must reach to appear at `horizon_deg`.
///
/// With `atmosphere` set to `None` the horizon is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use planisphere::coordinates::refraction::{effective_horizon, Atmosphere};
///
/// // Refraction lifts objects by roughly half a degree at the horizon
/// let h = effective_horizon(0.0, Some(&Atmosphere::default()));
/// assert!(h < -0.5 && h > -0.65);
/// assert_eq!(effective_horizon(5.0, None), 5.0);
/// ```
pub fn effective_horizon(horizon_deg: f64, atmosphere: Option<&Atmosphere>) -> f64 {
    match atmosphere {
        Some(atm) => horizon_deg - atm.refraction_from_apparent(horizon_deg) / 60.0,
        None => horizon_deg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refraction_at_horizon() {
        let atm = Atmosphere::default();
        let r = atm.refraction_from_apparent(0.0);
        assert!(r > 33.0 && r < 36.0, "refraction at horizon was {} arcmin", r);
    }

    #[test]
    fn test_refraction_decreases_with_altitude() {
        let atm = Atmosphere::default();
        let mut previous = f64::INFINITY;
        for alt in [0.0, 2.0, 5.0, 10.0, 30.0, 60.0] {
            let r = atm.refraction_from_true(alt);
            assert!(r < previous);
            previous = r;
        }
        assert!(atm.refraction_from_true(90.0).abs() < 0.01);
    }

    #[test]
    fn test_formulae_are_consistent() {
        let atm = Atmosphere::default();
        let apparent = 10.0;
        let true_alt = apparent - atm.refraction_from_apparent(apparent) / 60.0;
        let back = true_alt + atm.refraction_from_true(true_alt) / 60.0;
        assert!((back - apparent).abs() < 0.01);
    }

    #[test]
    fn test_thin_air_refracts_less() {
        let sea_level = Atmosphere::default();
        let mountain = Atmosphere {
            pressure_mbar: 700.0,
            temperature_c: -5.0,
        };
        assert!(mountain.refraction_from_apparent(0.0) < sea_level.refraction_from_apparent(0.0));
    }
}
