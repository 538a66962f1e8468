//! Time module for astronomical time calculations
//!
//! Instants are plain `f64` Julian dates on the UT scale. This module
//! converts them to and from calendar dates and `chrono` date-times, sizes
//! calendar years, and computes sidereal time.

pub mod calendar;

pub use calendar::{compute_julian_date, format_date, CalendarDate};

use crate::constants::{DAY_S, J2000, JULIAN_CENTURY};
use crate::coordinates::angle::{normalize_degrees, to_unsigned_ra};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Julian date of the Unix epoch (1970-01-01T00:00:00Z)
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian centuries elapsed since J2000.0
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000) / JULIAN_CENTURY
}

/// Julian date of January 1st, 0h UT, of the given year
pub fn jan1_jd(year: i32) -> f64 {
    compute_julian_date(year, 1, 1.0)
}

/// Number of days (365 or 366) in the given calendar year.
///
/// A year has 366 days when January 1st plus 365 days still falls inside it.
pub fn days_in_year(year: i32) -> usize {
    let last_day = CalendarDate::from_jd(jan1_jd(year) + 365.0);
    if last_day.year == year {
        366
    } else {
        365
    }
}

/// Calendar year containing the given Julian date
pub fn year_of(jd: f64) -> i32 {
    CalendarDate::from_jd(jd).year
}

/// Julian date of a UTC date-time
pub fn jd_from_datetime(dt: &NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    let seconds = utc.timestamp() as f64 + utc.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + seconds / DAY_S
}

/// UTC date-time of a Julian date, or `None` outside chrono's range
pub fn datetime_from_jd(jd: f64) -> Option<NaiveDateTime> {
    let seconds = (jd - UNIX_EPOCH_JD) * DAY_S;
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

/// Greenwich mean sidereal time in degrees `[0, 360)` (Meeus, eq. 12.4)
pub fn greenwich_mean_sidereal_time(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    let theta = 280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(theta)
}

/// Local mean sidereal time in hours `[0, 24)` for an east-positive longitude in radians
pub fn local_sidereal_time(jd: f64, longitude: f64) -> f64 {
    to_unsigned_ra((greenwich_mean_sidereal_time(jd) + longitude.to_degrees()) / 15.0)
}

/// Local clock time in hours `[0, 24)` for a UTC offset in hours
pub fn local_time_hours(jd: f64, utc_offset_hours: f64) -> f64 {
    to_unsigned_ra((jd + 0.5).fract() * 24.0 + utc_offset_hours)
}
