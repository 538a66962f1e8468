//! Observability of a target from a site: today and over the whole year
//!
//! [`Observability`] is meant to be driven once per host update tick. It
//! keeps the yearly sample table and the results of the expensive scans,
//! and only recomputes them when something they depend on changed:
//!
//! * the calendar year rebuilds the whole table;
//! * the site's latitude or longitude, or the horizon and twilight
//!   altitudes, refresh the crossing times;
//! * a new target refreshes the target columns and the annual report.
//!
//! The Sun gets no annual analysis. The Moon gets its full moons instead.

pub mod annual;
pub mod config;
pub mod yearly;

pub use annual::{
    AcronychalCosmical, AnnualReport, BestNight, BestNightKind, DateRange, ObservableNights,
};
pub use config::ObservabilityConfig;
pub use yearly::{YearlySample, YearlySampleTable};

use crate::almanac::{
    find_full_moons, solve_fixed_object, EphemerisEvent, FullMoons, IterativeEventSolver,
};
use crate::celestial::{CelestialObject, ObservationTarget};
use crate::constants::DAY_S;
use crate::planetlib::{Body, Ephemeris, KeplerianEphemeris};
use crate::time::{local_sidereal_time, year_of};
use crate::toposlib::GeographicLocation;
use crate::{PlanisphereError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Change of the effective horizon (radians) treated as a new configuration: one arcminute
pub const HORIZON_CHANGE_THRESHOLD: f64 = 2.91e-4;

/// What changed since the previous update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Changes {
    year: bool,
    location: bool,
    config: bool,
    target: bool,
}

impl Changes {
    fn any(&self) -> bool {
        self.year || self.location || self.config || self.target
    }
}

/// Everything computed for one update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityReport {
    pub jd: f64,
    pub target: ObservationTarget,
    /// Rise, set and culmination around `jd`
    pub today: Option<EphemerisEvent>,
    /// Whole-year analyses; never present for the Sun or the Moon
    pub annual: Option<AnnualReport>,
    /// Full moons around `jd`; only for the Moon
    pub full_moons: Option<FullMoons>,
}

/// Daily events of a moving body, kept while the instant barely moves
#[derive(Debug, Clone, Copy)]
struct CachedEvents {
    jd: f64,
    target: ObservationTarget,
    events: EphemerisEvent,
}

/// Cached observability state for one host
pub struct Observability {
    config: ObservabilityConfig,
    ephemeris: Box<dyn Ephemeris>,
    location: Option<GeographicLocation>,
    year: Option<i32>,
    horizon: Option<f64>,
    target: Option<ObservationTarget>,
    config_changed: bool,
    table: Option<YearlySampleTable>,
    /// Target and year the table's object columns hold
    sampled_target: Option<(ObservationTarget, i32)>,
    today: Option<CachedEvents>,
    annual: Option<AnnualReport>,
    full_moons: Option<FullMoons>,
}

impl Observability {
    pub fn new(config: ObservabilityConfig, ephemeris: Box<dyn Ephemeris>) -> Self {
        Self {
            config,
            ephemeris,
            location: None,
            year: None,
            horizon: None,
            target: None,
            config_changed: false,
            table: None,
            sampled_target: None,
            today: None,
            annual: None,
            full_moons: None,
        }
    }

    /// An instance backed by the built-in Keplerian ephemeris
    pub fn with_builtin_ephemeris(config: ObservabilityConfig) -> Self {
        Self::new(config, Box::new(KeplerianEphemeris::new()))
    }

    pub fn config(&self) -> &ObservabilityConfig {
        &self.config
    }

    /// Replace the configuration; cached results are recomputed on the next update
    pub fn set_config(&mut self, config: ObservabilityConfig) {
        if config != self.config {
            self.config = config;
            self.config_changed = true;
        }
    }

    /// The yearly table as of the last update
    pub fn table(&self) -> Option<&YearlySampleTable> {
        self.table.as_ref()
    }

    /// Effective horizon in radians as of the last update
    pub fn horizon(&self) -> Option<f64> {
        self.horizon
    }

    /// Compute the report for `target` seen from `location` at `jd`
    pub fn update(
        &mut self,
        jd: f64,
        location: GeographicLocation,
        target: ObservationTarget,
    ) -> Result<ObservabilityReport> {
        let changes = self.detect_changes(jd, &location, &target);
        self.location = Some(location);
        self.target = Some(target);

        let horizon = self.horizon.unwrap_or_else(|| self.config.effective_horizon());
        self.refresh_table(jd, &location, horizon, &changes)?;

        if changes.any() {
            self.today = None;
        }
        if target != ObservationTarget::Moon {
            self.full_moons = None;
        }

        let today = if self.config.show_today {
            Some(self.events_today(jd, &location, &target, horizon)?)
        } else {
            None
        };

        let (annual, full_moons) = match target {
            ObservationTarget::Sun => (None, None),
            ObservationTarget::Moon => {
                let moons = if self.config.show_full_moon {
                    Some(self.full_moons_around(jd)?)
                } else {
                    None
                };
                (None, moons)
            }
            _ if self.config.shows_year() => {
                (Some(self.annual_report(jd, &target, &changes)?), None)
            }
            _ => (None, None),
        };

        self.config_changed = false;
        Ok(ObservabilityReport {
            jd,
            target,
            today,
            annual,
            full_moons,
        })
    }

    fn detect_changes(
        &mut self,
        jd: f64,
        location: &GeographicLocation,
        target: &ObservationTarget,
    ) -> Changes {
        let year = year_of(jd);
        let mut changes = Changes {
            year: self.year != Some(year),
            location: self.location.map_or(true, |old| {
                old.latitude != location.latitude || old.longitude != location.longitude
            }),
            config: self.config_changed,
            target: self.target.as_ref() != Some(target),
        };
        self.year = Some(year);

        let horizon = self.config.effective_horizon();
        let moved = self
            .horizon
            .map_or(true, |old| (old - horizon).abs() > HORIZON_CHANGE_THRESHOLD);
        if moved || self.config_changed {
            self.horizon = Some(horizon);
            changes.config = true;
        }

        if changes.any() {
            debug!("observability inputs changed: {:?}", changes);
        }
        changes
    }

    fn refresh_table(
        &mut self,
        jd: f64,
        location: &GeographicLocation,
        horizon: f64,
        changes: &Changes,
    ) -> Result<()> {
        let twilight = self.config.twilight_altitude();
        if changes.year || self.table.is_none() {
            self.table = Some(YearlySampleTable::sample(
                year_of(jd),
                self.ephemeris.as_ref(),
                location,
                horizon,
                twilight,
            )?);
            self.sampled_target = None;
        } else if changes.location || changes.config {
            if let Some(table) = self.table.as_mut() {
                debug!("refreshing crossing times for latitude {:.4}", location.latitude);
                table.refresh_sun_hour_angles(location.latitude, twilight, horizon);
            }
        }
        Ok(())
    }

    fn events_today(
        &mut self,
        jd: f64,
        location: &GeographicLocation,
        target: &ObservationTarget,
        horizon: f64,
    ) -> Result<EphemerisEvent> {
        let body = match *target {
            ObservationTarget::Fixed(eq) => {
                let lst = local_sidereal_time(jd, location.longitude);
                let hour_angle = lst - eq.ra_hours();
                return Ok(solve_fixed_object(location.latitude, eq.dec, hour_angle, horizon, jd));
            }
            ObservationTarget::Sun => Body::Sun,
            ObservationTarget::Moon => Body::Moon,
            ObservationTarget::Planet(body) => body,
        };

        if let Some(cached) = self.today {
            if cached.target == *target && (jd - cached.jd).abs() * DAY_S <= 1.0 {
                return Ok(cached.events);
            }
        }

        let solver = IterativeEventSolver::new(self.ephemeris.as_ref(), *location, horizon);
        let events = solver.solve(body, jd)?;
        self.today = Some(CachedEvents {
            jd,
            target: *target,
            events,
        });
        Ok(events)
    }

    fn full_moons_around(&mut self, jd: f64) -> Result<FullMoons> {
        if let Some(moons) = self.full_moons.filter(|m| m.contains(jd)) {
            return Ok(moons);
        }
        debug!("searching full moons around JD {:.3}", jd);
        let moons = find_full_moons(self.ephemeris.as_ref(), jd)?;
        self.full_moons = Some(moons);
        Ok(moons)
    }

    fn annual_report(
        &mut self,
        jd: f64,
        target: &ObservationTarget,
        changes: &Changes,
    ) -> Result<AnnualReport> {
        let ephemeris = self.ephemeris.as_ref();
        let Some(table) = self.table.as_mut() else {
            return Err(PlanisphereError::CalculationError(
                "yearly table missing".to_string(),
            ));
        };

        // The columns can be stale even on a quiet tick when the year or the
        // target moved while the yearly sections were switched off
        let sampled = Some((*target, table.year));
        let resampled = self.sampled_target != sampled;
        if !resampled && !changes.any() {
            if let Some(report) = self.annual.as_ref() {
                return Ok(report.clone());
            }
        }

        if resampled {
            match target {
                ObservationTarget::Fixed(eq) => table.set_fixed_target(eq.ra_hours(), eq.dec),
                ObservationTarget::Planet(body) => table.sample_moving_target(*body, ephemeris)?,
                _ => {}
            }
            self.sampled_target = sampled;
        }

        let declination = target.position_at(ephemeris, jd, None)?.dec;
        debug!("analysing year {} for {:?}", table.year, target);
        let report = annual::analyze_year(
            table,
            declination,
            target.has_greatest_elongation(),
            &self.config,
        );
        self.annual = Some(report.clone());
        Ok(report)
    }
}
