//! Calendar date and Julian date conversion functions
//!
//! Proleptic Gregorian calendar throughout.

use serde::{Deserialize, Serialize};

/// Convert Julian day integer to calendar date (year, month, day)
pub fn compute_calendar_date(jd_integer: i32) -> (i32, i32, i32) {
    // See the Explanatory Supplement to the Astronomical Almanac 15.11.
    let f = jd_integer + 1401 + ((4 * jd_integer + 274277) / 146097 * 3 / 4 - 38);
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;

    (year, month, day)
}

/// Convert (year, month, day) to Julian date float
pub fn compute_julian_date(year: i32, month: i32, day: f64) -> f64 {
    compute_julian_day(year, month, day.floor() as i32) as f64 - 0.5 + day.fract()
}

/// Convert (year, month, day) to Julian day integer
pub fn compute_julian_day(year: i32, month: i32, day: i32) -> i32 {
    let janfeb = month < 3;

    1461 * (year + 4800 - if janfeb { 1 } else { 0 }) / 4
        + 367 * (month - 2 + if janfeb { 12 } else { 0 }) / 12
        - 3 * ((year + 4900 - if janfeb { 1 } else { 0 }) / 100) / 4
        - 32075
        + day
}

/// A calendar date with the time of day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Hours since midnight, including the fraction
    pub hours: f64,
}

impl CalendarDate {
    /// Calendar date of a Julian date
    pub fn from_jd(jd: f64) -> Self {
        let shifted = jd + 0.5;
        let day_number = shifted.floor();
        let (year, month, day) = compute_calendar_date(day_number as i32);
        CalendarDate {
            year,
            month: month as u32,
            day: day as u32,
            hours: (shifted - day_number) * 24.0,
        }
    }

    /// Julian date of this calendar date
    pub fn to_jd(&self) -> f64 {
        compute_julian_date(self.year, self.month as i32, self.day as f64) + self.hours / 24.0
    }
}

/// Format a Julian date as a calendar date string (YYYY-MM-DD)
pub fn format_date(jd: f64) -> String {
    let date = CalendarDate::from_jd(jd);
    format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
}
