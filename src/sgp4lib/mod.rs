//! Near-Earth satellite tracking
//!
//! Element sets come from TLE catalogs (see [`tle`]) and are propagated
//! with the `sgp4` crate. Positions are in the TEME frame in km; look
//! angles are computed in the observer's horizontal frame after rotating
//! TEME into the Earth-fixed frame by the Greenwich mean sidereal time.
//!
//! A satellite whose elements fail to parse, fail to propagate or place it
//! inside the Earth is flagged with an invalid orbit. It stays in the
//! catalog so a later element update can revive it.

pub mod catalog;
pub mod doppler;
pub mod orbit;
pub mod tle;

pub use catalog::{SatelliteCatalog, UpdateSummary};
pub use orbit::{orbit_segment_intensity, OrbitPath, OrbitPoint, SatelliteConfig};
pub use tle::{parse_tle_catalog, parse_tle_catalog_into, parse_tle_str, TleSet};

use crate::constants::{DAY_MIN, EARTH_ANGVEL, TAU, WGS84_RADIUS_KM};
use crate::time::{greenwich_mean_sidereal_time, jd_from_datetime, year_of};
use crate::toposlib::GeographicLocation;
use crate::{PlanisphereError, Result};
use log::warn;
use nalgebra::{Rotation3, Vector3};
use sgp4::{Constants, Elements, MinutesSinceEpoch};

/// Year of the first launch, used when a designator carries no year
pub const FIRST_LAUNCH_YEAR: i32 = 1957;

/// Position and velocity from one propagation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagatedState {
    pub jd: f64,
    /// TEME position in km
    pub position_km: Vector3<f64>,
    /// TEME velocity in km/s
    pub velocity_km_s: Vector3<f64>,
}

/// Where a satellite appears from an observing site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    /// Radians from north through east, `[0, 2π)`
    pub azimuth: f64,
    /// Radians above the horizon
    pub elevation: f64,
    pub range_km: f64,
    /// Positive when the satellite moves away
    pub range_rate_km_s: f64,
    /// Height above the WGS84 ellipsoid
    pub height_km: f64,
}

#[derive(Debug, Clone)]
struct Propagator {
    constants: Constants,
    epoch_jd: f64,
}

impl Propagator {
    fn from_tle(tle: &TleSet) -> Result<Self> {
        let text = format!("{}\n{}", tle.line1.trim(), tle.line2.trim());
        let elements: Elements = sgp4::parse_2les(&text)
            .map_err(|e| PlanisphereError::InvalidTle(format!("{}: {:?}", tle.id, e)))?
            .into_iter()
            .next()
            .ok_or_else(|| PlanisphereError::InvalidTle(format!("{}: no elements", tle.id)))?;

        let constants = Constants::from_elements(&elements).map_err(|e| {
            PlanisphereError::InvalidTle(format!("{}: SGP4 initialization failed: {:?}", tle.id, e))
        })?;

        Ok(Self {
            constants,
            epoch_jd: jd_from_datetime(&elements.datetime),
        })
    }
}

/// A tracked satellite
#[derive(Debug, Clone)]
pub struct Satellite {
    pub id: String,
    pub name: String,
    /// Entered by the user; catalog updates leave it alone
    pub user_defined: bool,
    tle: TleSet,
    propagator: Option<Propagator>,
    orbit_valid: bool,
    orbit: Option<OrbitPath>,
}

impl Satellite {
    /// Build a satellite from an element set.
    ///
    /// Elements that cannot be parsed give a satellite with an invalid orbit
    /// rather than an error.
    pub fn from_tle(tle: TleSet, user_defined: bool) -> Self {
        let mut satellite = Self {
            id: tle.id.clone(),
            name: tle.name.clone(),
            user_defined,
            tle: tle.clone(),
            propagator: None,
            orbit_valid: false,
            orbit: None,
        };
        satellite.set_new_tle_elements(tle);
        satellite
    }

    pub fn tle(&self) -> &TleSet {
        &self.tle
    }

    /// Replace the elements, keeping the id and user flag
    pub fn set_new_tle_elements(&mut self, tle: TleSet) {
        self.orbit = None;
        match Propagator::from_tle(&tle) {
            Ok(propagator) => {
                self.propagator = Some(propagator);
                self.orbit_valid = true;
            }
            Err(e) => {
                warn!("satellite {} ({}): {}", tle.id, tle.name, e);
                self.propagator = None;
                self.orbit_valid = false;
            }
        }
        self.name = tle.name.clone();
        self.tle = tle;
    }

    /// Whether these lines or name differ from the current elements
    pub fn differs_from(&self, tle: &TleSet) -> bool {
        self.tle.line1 != tle.line1 || self.tle.line2 != tle.line2 || self.tle.name != tle.name
    }

    pub fn orbit_valid(&self) -> bool {
        self.orbit_valid
    }

    /// Epoch of the current elements, or NaN when they did not parse
    pub fn epoch_jd(&self) -> f64 {
        self.propagator.as_ref().map_or(f64::NAN, |p| p.epoch_jd)
    }

    pub fn launch_year(&self) -> i32 {
        self.tle.launch_year().unwrap_or(FIRST_LAUNCH_YEAR)
    }

    /// Whether the satellite had been launched by the year containing `jd`
    pub fn is_launched(&self, jd: f64) -> bool {
        year_of(jd) >= self.launch_year()
    }

    /// Propagate to `jd`, flagging the orbit invalid on failure
    pub fn propagate(&mut self, jd: f64) -> Result<PropagatedState> {
        let propagator = self.propagator.as_ref().ok_or_else(|| {
            PlanisphereError::PropagationError(format!("satellite {} has no valid elements", self.id))
        })?;

        let minutes = (jd - propagator.epoch_jd) * DAY_MIN;
        let prediction = match propagator.constants.propagate(MinutesSinceEpoch(minutes)) {
            Ok(prediction) => prediction,
            Err(e) => {
                self.orbit_valid = false;
                return Err(PlanisphereError::PropagationError(format!(
                    "satellite {}: {:?}",
                    self.id, e
                )));
            }
        };

        let position_km = Vector3::from(prediction.position);
        if !position_km.iter().all(|c| c.is_finite()) || position_km.norm() < WGS84_RADIUS_KM {
            self.orbit_valid = false;
            return Err(PlanisphereError::PropagationError(format!(
                "satellite {} is inside the Earth at JD {}",
                self.id, jd
            )));
        }

        Ok(PropagatedState {
            jd,
            position_km,
            velocity_km_s: Vector3::from(prediction.velocity),
        })
    }

    /// Look angles of a propagated state from `location`
    pub fn look_angles(&self, state: &PropagatedState, location: &GeographicLocation) -> LookAngles {
        let (position, velocity) = teme_to_ecef(state);
        let observer = location.ecef_km();
        let rho = position - observer;
        let range_km = rho.norm();

        let (sin_lat, cos_lat) = location.latitude.sin_cos();
        let (sin_lon, cos_lon) = location.longitude.sin_cos();
        let south = sin_lat * cos_lon * rho.x + sin_lat * sin_lon * rho.y - cos_lat * rho.z;
        let east = -sin_lon * rho.x + cos_lon * rho.y;
        let zenith = cos_lat * cos_lon * rho.x + cos_lat * sin_lon * rho.y + sin_lat * rho.z;

        LookAngles {
            azimuth: east.atan2(-south).rem_euclid(TAU),
            elevation: (zenith / range_km).clamp(-1.0, 1.0).asin(),
            range_km,
            range_rate_km_s: rho.dot(&velocity) / range_km,
            height_km: GeographicLocation::from_ecef_km(&position).altitude_m / 1000.0,
        }
    }

    /// Propagate to `jd` and compute the look angles from `location`
    pub fn observe(&mut self, jd: f64, location: &GeographicLocation) -> Result<LookAngles> {
        let state = self.propagate(jd)?;
        Ok(self.look_angles(&state, location))
    }

    /// Received minus transmitted frequency at `jd`
    pub fn doppler_shift(
        &mut self,
        jd: f64,
        location: &GeographicLocation,
        transmitted_hz: f64,
    ) -> Result<f64> {
        let look = self.observe(jd, location)?;
        Ok(doppler::doppler_shift(transmitted_hz, look.range_rate_km_s))
    }

    /// Orbit line around `jd`, resampled only when stale
    pub fn orbit_path(
        &mut self,
        jd: f64,
        location: &GeographicLocation,
        config: &SatelliteConfig,
    ) -> Result<&OrbitPath> {
        let epoch_jd = self.epoch_jd();
        let stale = self
            .orbit
            .as_ref()
            .map_or(true, |path| path.is_stale(jd, location, epoch_jd, config));

        if stale {
            self.orbit = None;
            let path = OrbitPath::compute(self, jd, location, config)?;
            self.orbit = Some(path);
        }

        self.orbit.as_ref().ok_or_else(|| {
            PlanisphereError::PropagationError(format!("satellite {} has no orbit path", self.id))
        })
    }
}

/// Rotate a TEME state into the Earth-fixed frame
fn teme_to_ecef(state: &PropagatedState) -> (Vector3<f64>, Vector3<f64>) {
    let gmst = greenwich_mean_sidereal_time(state.jd).to_radians();
    let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst);
    let position = rotation * state.position_km;
    let omega = Vector3::new(0.0, 0.0, EARTH_ANGVEL);
    let velocity = rotation * state.velocity_km_s - omega.cross(&position);
    (position, velocity)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    pub(crate) const ISS_LINE2: &str =
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";
    /// Epoch of the set above, 2020-07-12 21:16 UT
    pub(crate) const ISS_EPOCH_JD: f64 = 2_459_043.386_122_69;

    pub(crate) fn iss() -> Satellite {
        let tle = TleSet::new("ISS (ZARYA)", ISS_LINE1, ISS_LINE2, true).unwrap();
        Satellite::from_tle(tle, false)
    }

    #[test]
    fn test_epoch_and_launch() {
        let sat = iss();
        assert!(sat.orbit_valid());
        assert_eq!(sat.id, "25544");
        assert_relative_eq!(sat.epoch_jd(), ISS_EPOCH_JD, epsilon = 1e-6);
        assert_eq!(sat.launch_year(), 1998);
        assert!(!sat.is_launched(2_447_892.5)); // 1990
        assert!(sat.is_launched(ISS_EPOCH_JD));
    }

    #[test]
    fn test_propagate_low_earth_orbit() {
        let mut sat = iss();
        let state = sat.propagate(ISS_EPOCH_JD + 0.1).unwrap();
        let radius = state.position_km.norm();
        assert!(radius > 6_700.0 && radius < 6_850.0, "radius {}", radius);
        let speed = state.velocity_km_s.norm();
        assert!(speed > 7.5 && speed < 7.8, "speed {}", speed);
    }

    #[test]
    fn test_overhead_observer_sees_zenith() {
        let mut sat = iss();
        let jd = ISS_EPOCH_JD + 0.25;
        let state = sat.propagate(jd).unwrap();
        let (position, _) = teme_to_ecef(&state);
        let mut site = GeographicLocation::from_ecef_km(&position);
        let height_km = site.altitude_m / 1000.0;
        site.altitude_m = 0.0;

        let look = sat.observe(jd, &site).unwrap();
        assert_relative_eq!(look.elevation.to_degrees(), 90.0, epsilon = 1e-4);
        assert_relative_eq!(look.range_km, height_km, epsilon = 1e-6);
        assert_relative_eq!(look.height_km, height_km, epsilon = 1e-9);
        assert!(look.height_km > 380.0 && look.height_km < 460.0);
        // Nearly circular orbit: little radial motion overhead
        assert!(look.range_rate_km_s.abs() < 0.5);

        let antipode = GeographicLocation::new(-site.latitude, site.longitude + std::f64::consts::PI, 0.0);
        let below = sat.observe(jd, &antipode).unwrap();
        assert!(below.elevation < -1.0);
    }

    #[test]
    fn test_invalid_elements_flag_orbit() {
        let tle = TleSet::new("JUNK", "1 99999U garbage", "2 99999 garbage", false).unwrap();
        let mut sat = Satellite::from_tle(tle, true);
        assert!(!sat.orbit_valid());
        assert!(sat.epoch_jd().is_nan());
        assert!(matches!(
            sat.propagate(ISS_EPOCH_JD),
            Err(PlanisphereError::PropagationError(_))
        ));

        sat.set_new_tle_elements(TleSet::new("ISS", ISS_LINE1, ISS_LINE2, false).unwrap());
        assert!(sat.orbit_valid());
        assert_eq!(sat.name, "ISS");
    }

    #[test]
    fn test_decaying_orbit_is_invalidated() {
        // Very low orbit with heavy drag
        let tle = TleSet::new(
            "REENTRY",
            "1 99001U 20001A   20194.50000000  .01000000  00000-0  10000-2 0  9997",
            "2 99001  51.6000 100.0000 0005000  90.0000 270.0000 16.00000000  1005",
            false,
        )
        .unwrap();
        let mut sat = Satellite::from_tle(tle, false);
        let epoch = sat.epoch_jd();
        assert!(sat.propagate(epoch).is_ok());
        assert!(sat.orbit_valid());

        // Six hour steps over four years
        let failure = (1..6_000)
            .map(|step| sat.propagate(epoch + step as f64 * 0.25))
            .find_map(|result| result.err())
            .expect("the orbit decays");
        assert!(matches!(failure, PlanisphereError::PropagationError(_)));
        assert!(!sat.orbit_valid());
    }

    #[test]
    fn test_orbit_path_is_cached() {
        let mut sat = iss();
        let site = GeographicLocation::from_degrees(40.4, -3.7, 650.0);
        let config = SatelliteConfig::default();
        let jd = ISS_EPOCH_JD + 0.5;

        let first = sat.orbit_path(jd, &site, &config).unwrap().clone();
        assert_eq!(first.points.len(), 90);
        assert_relative_eq!(first.points[45].jd, jd, epsilon = 1e-9);
        assert_eq!(first.points[0].intensity, 0.0);

        // Within one segment the cached path is reused
        let again = sat.orbit_path(jd + config.segment_days() * 0.5, &site, &config).unwrap();
        assert_eq!(again.center_jd, jd);

        let moved = sat.orbit_path(jd + config.segment_days() * 2.0, &site, &config).unwrap();
        assert!(moved.center_jd > jd);

        let elsewhere = GeographicLocation::from_degrees(-33.9, 151.2, 0.0);
        let relocated = sat.orbit_path(jd, &elsewhere, &config).unwrap();
        assert_eq!(relocated.location, elsewhere);
    }

    #[test]
    fn test_doppler_matches_range_rate() {
        let mut sat = iss();
        let site = GeographicLocation::from_degrees(40.4, -3.7, 650.0);
        let jd = ISS_EPOCH_JD + 0.3;
        let look = sat.observe(jd, &site).unwrap();
        let shift = sat.doppler_shift(jd, &site, 437.8e6).unwrap();
        assert_relative_eq!(shift, doppler::doppler_shift(437.8e6, look.range_rate_km_s));
    }
}
