//! Rise, set and transit for the Sun, Moon and planets
//!
//! A moving target's coordinates at the moment of the event differ from its
//! coordinates now, so each event is found by fixed-point iteration: guess
//! the instant, recompute the target's position there, recompute the span
//! from the sidereal time of "now", and repeat until two successive spans
//! agree within one second.

use super::risetrans::{culmination_altitude, SkyQuadrant};
use super::{Convergence, Culmination, EphemerisEvent, RiseSet, TimedEvent, NUM_ITER};
use crate::constants::{SECOND_H, SIDEREAL_TO_SOLAR};
use crate::coordinates::angle::{
    altitude_at_hour_angle, hour_angle_from_altitude, signed_hours, to_unsigned_ra,
};
use crate::planetlib::{apparent_place, Body, Ephemeris};
use crate::time::local_sidereal_time;
use crate::toposlib::GeographicLocation;
use crate::Result;
use log::{debug, warn};

/// Which event a refinement loop is chasing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiurnalEvent {
    Rise,
    Set,
    Transit,
}

/// Solver for targets whose coordinates change during the day
pub struct IterativeEventSolver<'a> {
    ephemeris: &'a dyn Ephemeris,
    location: GeographicLocation,
    horizon_altitude: f64,
}

impl<'a> IterativeEventSolver<'a> {
    /// # Arguments
    ///
    /// * `ephemeris` - Source of body positions
    /// * `location` - Observer
    /// * `horizon_altitude` - Effective (refraction corrected) horizon in radians
    pub fn new(
        ephemeris: &'a dyn Ephemeris,
        location: GeographicLocation,
        horizon_altitude: f64,
    ) -> Self {
        Self {
            ephemeris,
            location,
            horizon_altitude,
        }
    }

    /// Right ascension (hours) and declination of `body`; topocentric for the Moon
    fn position(&self, body: Body, jd: f64) -> Result<(f64, f64)> {
        let observer = (body == Body::Moon).then_some(&self.location);
        let place = apparent_place(self.ephemeris, body, jd, observer)?;
        Ok((place.ra, place.dec))
    }

    /// Rise, set and culmination of `body` around `now`
    pub fn solve(&self, body: Body, now: f64) -> Result<EphemerisEvent> {
        let latitude = self.location.latitude;
        let lst = local_sidereal_time(now, self.location.longitude);
        let (ra, dec) = self.position(body, now)?;
        let hour_angle = signed_hours(lst - ra);

        let rise_set = match hour_angle_from_altitude(latitude, self.horizon_altitude, dec) {
            None => {
                if altitude_at_hour_angle(latitude, dec, hour_angle) > self.horizon_altitude {
                    RiseSet::Circumpolar
                } else {
                    RiseSet::NeverRises
                }
            }
            Some(h0) => {
                let spans = SkyQuadrant::classify(hour_angle, h0).spans(hour_angle, h0);
                let rise = self.refine(
                    body,
                    now,
                    lst,
                    spans.rising,
                    DiurnalEvent::Rise,
                    !spans.has_risen,
                )?;
                let set = self.refine(
                    body,
                    now,
                    lst,
                    spans.setting,
                    DiurnalEvent::Set,
                    spans.has_risen,
                )?;
                RiseSet::Crossing {
                    rise: TimedEvent::at(now, rise.value(), rise.is_converged()),
                    set: TimedEvent::at(now, set.value(), set.is_converged()),
                }
            }
        };

        let transit = self.refine(
            body,
            now,
            lst,
            -hour_angle,
            DiurnalEvent::Transit,
            hour_angle < 0.0,
        )?;
        let (_, dec_at_transit) = self.position(body, transit.value())?;
        let altitude = culmination_altitude(latitude, dec_at_transit);
        let culmination = (altitude > self.horizon_altitude).then(|| Culmination {
            event: TimedEvent::at(now, transit.value(), transit.is_converged()),
            altitude,
        });

        Ok(EphemerisEvent {
            rise_set,
            culmination,
        })
    }

    /// Refine one event starting from a span in sidereal hours.
    ///
    /// `future` fixes the direction of the search: spans are kept in
    /// `[0, 24)` when true and in `(-24, 0]` otherwise.
    fn refine(
        &self,
        body: Body,
        now: f64,
        lst: f64,
        initial_span: f64,
        event: DiurnalEvent,
        future: bool,
    ) -> Result<Convergence> {
        let latitude = self.location.latitude;
        let mut span = initial_span * SIDEREAL_TO_SOLAR;

        for iteration in 0..NUM_ITER {
            let jd = now + span / 24.0;
            let (ra, dec) = self.position(body, jd)?;
            let hour_angle = signed_hours(lst - ra);

            let target = match event {
                DiurnalEvent::Transit => 0.0,
                DiurnalEvent::Rise | DiurnalEvent::Set => {
                    match hour_angle_from_altitude(latitude, self.horizon_altitude, dec) {
                        Some(h0) if event == DiurnalEvent::Rise => -h0,
                        Some(h0) => h0,
                        None => {
                            debug!(
                                "{} stops crossing the horizon near JD {:.5}",
                                body.name(),
                                jd
                            );
                            return Ok(Convergence::NotConverged {
                                estimate: jd,
                                iterations: iteration,
                            });
                        }
                    }
                }
            };

            let mut sidereal = to_unsigned_ra(target - hour_angle);
            if !future && sidereal > 0.0 {
                sidereal -= 24.0;
            }
            let next = sidereal * SIDEREAL_TO_SOLAR;

            if (next - span).abs() < SECOND_H {
                return Ok(Convergence::Converged(now + next / 24.0));
            }
            span = next;
        }

        warn!(
            "{:?} of {} did not converge after {} iterations",
            event,
            body.name(),
            NUM_ITER
        );
        Ok(Convergence::NotConverged {
            estimate: now + span / 24.0,
            iterations: NUM_ITER,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planetlib::KeplerianEphemeris;
    use crate::PlanisphereError;
    use nalgebra::Vector3;

    /// Earth at the origin, the body wherever the closure puts it
    struct StubEphemeris<F: Fn(f64) -> Vector3<f64>>(F);

    impl<F: Fn(f64) -> Vector3<f64>> Ephemeris for StubEphemeris<F> {
        fn heliocentric_position(&self, body: Body, jd: f64) -> Result<Vector3<f64>> {
            Ok(match body {
                Body::Earth => Vector3::zeros(),
                _ => (self.0)(jd),
            })
        }
    }

    fn altitude_of(
        eph: &dyn Ephemeris,
        body: Body,
        site: &GeographicLocation,
        jd: f64,
    ) -> f64 {
        let observer = (body == Body::Moon).then_some(site);
        let place = apparent_place(eph, body, jd, observer).unwrap();
        let lst = local_sidereal_time(jd, site.longitude);
        altitude_at_hour_angle(site.latitude, place.dec, lst - place.ra)
    }

    #[test]
    fn test_sun_events_land_on_horizon() {
        let eph = KeplerianEphemeris::new();
        let site = GeographicLocation::from_degrees(40.4, -3.7, 650.0);
        let horizon = (-0.5667f64).to_radians();
        let solver = IterativeEventSolver::new(&eph, site, horizon);

        // 2024-05-01 12:00 UT, the Sun is up over Madrid
        let now = 2_460_432.0;
        let event = solver.solve(Body::Sun, now).unwrap();

        match event.rise_set {
            RiseSet::Crossing { rise, set } => {
                assert!(rise.converged && set.converged);
                assert!(rise.is_past(), "sunrise should be earlier today");
                assert!(!set.is_past(), "sunset should be later today");
                assert!(set.hours_from_now < 12.0);

                let alt_rise = altitude_of(&eph, Body::Sun, &site, rise.jd);
                let alt_set = altitude_of(&eph, Body::Sun, &site, set.jd);
                assert!((alt_rise - horizon).to_degrees().abs() < 0.02);
                assert!((alt_set - horizon).to_degrees().abs() < 0.02);
            }
            other => panic!("expected a crossing, got {:?}", other),
        }

        let culmination = event.culmination.expect("the Sun culminates above the horizon");
        assert!(culmination.event.converged);
        // Local noon in Madrid is around 12:15 UT (longitude plus equation of time)
        assert!(culmination.event.hours_from_now.abs() < 0.75);
        let hour_angle =
            signed_hours(local_sidereal_time(culmination.event.jd, site.longitude)
                - apparent_place(&eph, Body::Sun, culmination.event.jd, None).unwrap().ra);
        assert!(hour_angle.abs() < 0.001);
    }

    #[test]
    fn test_moon_events_converge() {
        let eph = KeplerianEphemeris::new();
        let site = GeographicLocation::from_degrees(35.0, 139.7, 0.0);
        let solver = IterativeEventSolver::new(&eph, site, 0.0);

        for day in 0..10 {
            let now = 2_460_400.25 + day as f64;
            let event = solver.solve(Body::Moon, now).unwrap();
            if let RiseSet::Crossing { rise, set } = event.rise_set {
                for crossing in [rise, set] {
                    if crossing.converged {
                        let alt = altitude_of(&eph, Body::Moon, &site, crossing.jd);
                        assert!(alt.to_degrees().abs() < 0.05, "altitude {}", alt.to_degrees());
                    }
                }
            }
        }
    }

    #[test]
    fn test_midnight_sun() {
        let eph = KeplerianEphemeris::new();
        let site = GeographicLocation::from_degrees(78.2, 15.6, 0.0);
        let solver = IterativeEventSolver::new(&eph, site, 0.0);
        // Late June in Svalbard
        let event = solver.solve(Body::Sun, 2_460_487.5).unwrap();
        assert_eq!(event.rise_set, RiseSet::Circumpolar);
    }

    #[test]
    fn test_target_leaving_the_crossing_band() {
        let now = 2_460_400.5;
        // On the equator at `now`, near the north ecliptic pole at any other instant
        let eph = StubEphemeris(move |jd: f64| {
            if jd == now {
                Vector3::new(1.0, 0.0, 0.0)
            } else {
                Vector3::new(0.0, 0.0, 1.0)
            }
        });
        let site = GeographicLocation::from_degrees(40.4, -3.7, 650.0);
        let solver = IterativeEventSolver::new(&eph, site, 0.0);

        match solver.solve(Body::Mars, now).unwrap().rise_set {
            RiseSet::Crossing { rise, set } => assert!(!rise.converged && !set.converged),
            other => panic!("expected a crossing, got {:?}", other),
        }

        let lst = local_sidereal_time(now, site.longitude);
        let rise = solver
            .refine(Body::Mars, now, lst, 3.0, DiurnalEvent::Rise, true)
            .unwrap();
        assert_eq!(
            rise,
            Convergence::NotConverged {
                estimate: now + 3.0 * SIDEREAL_TO_SOLAR / 24.0,
                iterations: 0
            }
        );
        assert!(matches!(
            rise.into_result(),
            Err(PlanisphereError::NotConverged { iterations: 0, .. })
        ));
    }

    #[test]
    fn test_oscillating_transit_gives_up() {
        let now = 2_460_400.5;
        let site = GeographicLocation::from_degrees(40.4, -3.7, 650.0);
        let lst = local_sidereal_time(now, site.longitude);

        // Spans that a target at 0h and at 12h of right ascension lead to
        let to_ra_0 = to_unsigned_ra(-lst) * SIDEREAL_TO_SOLAR;
        let to_ra_12 = to_unsigned_ra(12.0 - lst) * SIDEREAL_TO_SOLAR;
        let pivot = now + (to_ra_0 + to_ra_12) / 48.0;
        let ra_0 = Vector3::new(1.0, 0.0, 0.0);
        let ra_12 = Vector3::new(-1.0, 0.0, 0.0);
        // Landing on either span sends the next guess to the other one
        let (before, after) = if to_ra_0 < to_ra_12 {
            (ra_12, ra_0)
        } else {
            (ra_0, ra_12)
        };
        let eph = StubEphemeris(move |jd: f64| if jd < pivot { before } else { after });
        let solver = IterativeEventSolver::new(&eph, site, 0.0);

        let transit = solver
            .refine(Body::Mars, now, lst, 0.0, DiurnalEvent::Transit, true)
            .unwrap();
        assert!(matches!(
            transit,
            Convergence::NotConverged {
                iterations: NUM_ITER,
                ..
            }
        ));
        assert!(transit.into_result().is_err());

        let event = solver.solve(Body::Mars, now).unwrap();
        let culmination = event.culmination.expect("an equatorial target culminates at 49.6 degrees");
        assert!(!culmination.event.converged);
    }
}
