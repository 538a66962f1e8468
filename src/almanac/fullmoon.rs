//! Dates of the full moons around an instant
//!
//! A full moon is when the Moon and the Earth line up on the same side of
//! the Sun. The z-component of the cross product of their heliocentric
//! ecliptic positions changes sign there (and again at new moon, half a
//! lunation away), so a bracket of a quarter lunation either side of the
//! mean full moon contains exactly one root. The root is found with the
//! Illinois variant of regula falsi, which keeps shrinking the bracket from
//! both ends.

use super::{Convergence, NUM_ITER};
use crate::constants::{DAY_MIN, REFERENCE_FULL_MOON, SYNODIC_MONTH};
use crate::coordinates::cartesian::Cartesian3;
use crate::planetlib::{Body, Ephemeris};
use crate::{PlanisphereError, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Bracket width at which the search stops: one minute
const TOLERANCE_DAYS: f64 = 1.0 / DAY_MIN;

/// The full moons immediately before and after an instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FullMoons {
    /// Julian date of the last full moon at or before the instant
    pub previous: f64,
    /// Julian date of the first full moon after the instant
    pub next: f64,
    /// False if either search stopped at its iteration cap
    pub converged: bool,
}

impl FullMoons {
    /// Whether `jd` still lies in the lunation these dates describe
    pub fn contains(&self, jd: f64) -> bool {
        jd >= self.previous && jd <= self.next
    }
}

/// Lunar phase function: zero at full and new moon.
///
/// The ecliptic-normal component of `moon × earth` on heliocentric positions.
pub fn lunar_phase_function(ephemeris: &dyn Ephemeris, jd: f64) -> Result<f64> {
    let moon = Cartesian3::from(ephemeris.heliocentric_position(Body::Moon, jd)?);
    let earth = Cartesian3::from(ephemeris.heliocentric_position(Body::Earth, jd)?);
    Ok(moon.cross(&earth).z)
}

/// Mean full moon nearest to `jd`, counted in whole lunations from the reference full moon
pub fn nearest_mean_full_moon(jd: f64) -> f64 {
    let lunations = ((jd - REFERENCE_FULL_MOON) / SYNODIC_MONTH).round();
    REFERENCE_FULL_MOON + lunations * SYNODIC_MONTH
}

/// Illinois-modified regula falsi on `[a, b]`.
///
/// Stops when the bracket is narrower than `tolerance`. Errors if the
/// function has the same sign at both ends.
pub fn regula_falsi<F>(mut f: F, mut a: f64, mut b: f64, tolerance: f64) -> Result<Convergence>
where
    F: FnMut(f64) -> Result<f64>,
{
    let mut fa = f(a)?;
    let mut fb = f(b)?;

    if fa == 0.0 {
        return Ok(Convergence::Converged(a));
    }
    if fb == 0.0 {
        return Ok(Convergence::Converged(b));
    }
    if fa * fb > 0.0 {
        return Err(PlanisphereError::CalculationError(format!(
            "root not bracketed in [{}, {}]",
            a, b
        )));
    }

    // Which end moved last: -1 for b, +1 for a
    let mut side = 0;
    for _ in 0..NUM_ITER {
        if (b - a).abs() < tolerance {
            return Ok(Convergence::Converged(0.5 * (a + b)));
        }

        let c = (a * fb - b * fa) / (fb - fa);
        let fc = f(c)?;

        if fc == 0.0 {
            return Ok(Convergence::Converged(c));
        }

        if fc * fb > 0.0 {
            b = c;
            fb = fc;
            if side == -1 {
                fa *= 0.5;
            }
            side = -1;
        } else {
            a = c;
            fa = fc;
            if side == 1 {
                fb *= 0.5;
            }
            side = 1;
        }
    }

    Ok(Convergence::NotConverged {
        estimate: 0.5 * (a + b),
        iterations: NUM_ITER,
    })
}

/// Solve for the full moon whose mean date is `estimate`
pub fn refine_full_moon<F>(phase: F, estimate: f64) -> Result<Convergence>
where
    F: FnMut(f64) -> Result<f64>,
{
    let half_width = 0.25 * SYNODIC_MONTH;
    regula_falsi(phase, estimate - half_width, estimate + half_width, TOLERANCE_DAYS)
}

/// Full moons immediately before and after `jd` for an arbitrary phase function.
///
/// The nearest mean full moon is solved first; depending on which side of
/// `jd` it lands, the one a lunation earlier or later is solved next.
pub fn find_full_moons_with<F>(mut phase: F, jd: f64) -> Result<FullMoons>
where
    F: FnMut(f64) -> Result<f64>,
{
    let estimate = nearest_mean_full_moon(jd);
    let first = refine_full_moon(&mut phase, estimate)?;

    let (previous, next) = if first.value() > jd {
        let earlier = refine_full_moon(&mut phase, estimate - SYNODIC_MONTH)?;
        (earlier, first)
    } else {
        let later = refine_full_moon(&mut phase, estimate + SYNODIC_MONTH)?;
        (first, later)
    };

    let converged = previous.is_converged() && next.is_converged();
    if !converged {
        warn!("full moon search around JD {:.3} did not converge", jd);
    }

    Ok(FullMoons {
        previous: previous.value(),
        next: next.value(),
        converged,
    })
}

/// Full moons immediately before and after `jd` from an ephemeris
pub fn find_full_moons(ephemeris: &dyn Ephemeris, jd: f64) -> Result<FullMoons> {
    find_full_moons_with(|t| lunar_phase_function(ephemeris, t), jd)
}
