//! Equation of time
//!
//! Apparent minus mean solar time in minutes (Meeus, eq. 28.3). Positive
//! values mean a sundial runs ahead of the clock.

use crate::coordinates::angle::normalize_degrees;
use crate::framelib::{mean_obliquity, nutation_longitude};
use crate::planetlib::{apparent_place, Body, Ephemeris};
use crate::Result;

/// Aberration and the FK5 correction folded into the Sun's mean longitude, in degrees
const SUN_LONGITUDE_OFFSET_DEG: f64 = 0.005_718_3;

/// Sun's mean longitude in degrees `[0, 360)`
fn sun_mean_longitude(jd: f64) -> f64 {
    let tau = (jd - 2_451_545.0) / 365_250.0;
    let l0 = 280.466_456_7
        + tau
            * (360_007.689_277_9
                + tau * (0.030_320_28 + tau * (1.0 / 49_931.0 - tau * (1.0 / 15_300.0 - tau / 2_000_000.0))));
    normalize_degrees(l0)
}

/// Equation of time at `jd` in minutes
pub fn equation_of_time_minutes(ephemeris: &dyn Ephemeris, jd: f64) -> Result<f64> {
    let l0 = sun_mean_longitude(jd);
    let sun = apparent_place(ephemeris, Body::Sun, jd, None)?;
    let alpha = normalize_degrees(sun.ra * 15.0);

    let mut minutes = 4.0
        * (l0 - SUN_LONGITUDE_OFFSET_DEG - alpha
            + nutation_longitude(jd).to_degrees() * mean_obliquity(jd).cos());

    // Never more than 20 minutes in magnitude; larger values straddle the 0/360 wrap
    if minutes.abs() > 20.0 {
        minutes -= 1_440.0_f64.copysign(minutes);
    }
    Ok(minutes)
}
