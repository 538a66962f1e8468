//! Rise, set, transit and full-moon events
//!
//! Fixed targets get a closed-form answer from [`risetrans`]. Targets that
//! move across the sky during a day (Sun, Moon, planets) are refined by the
//! fixed-point loops in [`iterative`]. [`fullmoon`] brackets and solves for
//! the full moons around an instant.
//!
//! Every event carries the instant it happens and the signed span from
//! "now" in solar hours: negative for events in the past ("... ago"),
//! positive for future ones ("in ...").

pub mod fullmoon;
pub mod iterative;
pub mod risetrans;

pub use fullmoon::{find_full_moons, FullMoons};
pub use iterative::IterativeEventSolver;
pub use risetrans::{solve_fixed_object, SkyQuadrant};

use crate::{PlanisphereError, Result};
use serde::{Deserialize, Serialize};

/// Iteration cap shared by every refinement loop
pub const NUM_ITER: usize = 100;

/// A single event in time relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Julian date of the event
    pub jd: f64,
    /// Solar hours from now; negative when the event already happened
    pub hours_from_now: f64,
    /// False when the refinement loop hit its iteration cap
    pub converged: bool,
}

impl TimedEvent {
    /// An exact event `hours_from_now` solar hours after `now`
    pub fn from_span(now: f64, hours_from_now: f64) -> Self {
        Self {
            jd: now + hours_from_now / 24.0,
            hours_from_now,
            converged: true,
        }
    }

    /// An event at `jd`, measured against `now`
    pub fn at(now: f64, jd: f64, converged: bool) -> Self {
        Self {
            jd,
            hours_from_now: (jd - now) * 24.0,
            converged,
        }
    }

    pub fn is_past(&self) -> bool {
        self.hours_from_now < 0.0
    }
}

/// Horizon crossings of a target on the current day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RiseSet {
    /// Always above the horizon
    Circumpolar,
    /// Always below the horizon
    NeverRises,
    /// Crosses the horizon; `rise` and `set` are the nearest crossings
    /// consistent with whether the target is currently up
    Crossing { rise: TimedEvent, set: TimedEvent },
}

/// Upper culmination (meridian transit)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Culmination {
    pub event: TimedEvent,
    /// Altitude at culmination in radians
    pub altitude: f64,
}

/// Everything known about a target's day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EphemerisEvent {
    pub rise_set: RiseSet,
    /// `None` when the target culminates below the horizon
    pub culmination: Option<Culmination>,
}

/// Outcome of a refinement loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convergence {
    /// Successive estimates agreed within the tolerance
    Converged(f64),
    /// The loop stopped early; `estimate` is the last value it produced
    NotConverged { estimate: f64, iterations: usize },
}

impl Convergence {
    /// The final estimate, converged or not
    pub fn value(&self) -> f64 {
        match *self {
            Convergence::Converged(v) => v,
            Convergence::NotConverged { estimate, .. } => estimate,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged(_))
    }

    /// Treat non-convergence as an error
    pub fn into_result(self) -> Result<f64> {
        match self {
            Convergence::Converged(v) => Ok(v),
            Convergence::NotConverged {
                estimate,
                iterations,
            } => Err(PlanisphereError::NotConverged {
                last_estimate: estimate,
                iterations,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_event_spans() {
        let now = 2_460_000.0;
        let past = TimedEvent::from_span(now, -6.0);
        assert!(past.is_past());
        assert_eq!(past.jd, now - 0.25);

        let future = TimedEvent::at(now, now + 0.5, true);
        assert!(!future.is_past());
        assert!((future.hours_from_now - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_convergence_into_result() {
        assert_eq!(Convergence::Converged(1.5).into_result().unwrap(), 1.5);

        let stalled = Convergence::NotConverged {
            estimate: 2.5,
            iterations: NUM_ITER,
        };
        assert_eq!(stalled.value(), 2.5);
        match stalled.into_result() {
            Err(PlanisphereError::NotConverged {
                last_estimate,
                iterations,
            }) => {
                assert_eq!(last_estimate, 2.5);
                assert_eq!(iterations, NUM_ITER);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
