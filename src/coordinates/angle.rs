//! # Angle Representation Module
//!
//! Angles keep the unit they were created in (degrees, radians or hours)
//! and convert only when asked. Right ascension and hour angles travel
//! through the crate as hours, declinations and altitudes as radians.
//!
//! The free functions in this module are the small primitives the rest of
//! the crate is built on: range normalization, the hour angle at which a
//! declination reaches a given altitude, and base-60 decomposition.
//!
//! ## Examples
//!
//! ```rust
//! use planisphere::coordinates::angle::{to_unsigned_ra, Angle};
//!
//! let ra = Angle::from_hours(6.0);
//! assert!((ra.to_degrees() - 90.0).abs() < 1e-12);
//!
//! assert_eq!(to_unsigned_ra(-1.0), 23.0);
//! ```

use crate::constants::{HOUR2RAD, RAD2HOUR};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Internal representation format for angle values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AngleFormat {
    /// Angle stored in degrees
    Degrees(f64),
    /// Angle stored in radians
    Radians(f64),
    /// Angle stored in hours (15 degrees per hour)
    Hours(f64),
}

/// Represents an angular measurement in the unit it was created with
///
/// Values are returned exactly when read back in their original unit.
/// Conversion uses `std::f64::consts::PI`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    angle: AngleFormat,
}

impl Angle {
    /// Creates an angle from a value in degrees
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planisphere::coordinates::angle::Angle;
    ///
    /// let right_angle = Angle::from_degrees(90.0);
    /// assert_eq!(right_angle.to_degrees(), 90.0);
    /// ```
    pub fn from_degrees(degrees: f64) -> Self {
        Angle {
            angle: AngleFormat::Degrees(degrees),
        }
    }

    /// Creates an angle from a value in radians
    pub fn from_radians(radians: f64) -> Self {
        Angle {
            angle: AngleFormat::Radians(radians),
        }
    }

    /// Creates an angle from a value in hours
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planisphere::coordinates::angle::Angle;
    ///
    /// let ra = Angle::from_hours(12.0);
    /// assert!((ra.to_radians() - std::f64::consts::PI).abs() < 1e-15);
    /// ```
    pub fn from_hours(hours: f64) -> Self {
        Angle {
            angle: AngleFormat::Hours(hours),
        }
    }

    /// Returns the angle value in degrees
    pub fn to_degrees(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg,
            AngleFormat::Radians(rad) => rad * (180.0 / PI),
            AngleFormat::Hours(h) => h * 15.0,
        }
    }

    /// Returns the angle value in radians
    pub fn to_radians(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg * (PI / 180.0),
            AngleFormat::Radians(rad) => rad,
            AngleFormat::Hours(h) => h * HOUR2RAD,
        }
    }

    /// Returns the angle value in hours
    pub fn to_hours(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg / 15.0,
            AngleFormat::Radians(rad) => rad * RAD2HOUR,
            AngleFormat::Hours(h) => h,
        }
    }

    /// Returns the internal format of this angle
    pub fn format(&self) -> AngleFormat {
        self.angle
    }

    /// Splits the absolute value of the angle, in hours, into hours/minutes/seconds
    pub fn hms(&self) -> Sexagesimal {
        Sexagesimal::from_decimal(self.to_hours())
    }

    /// Splits the absolute value of the angle, in degrees, into degrees/arcminutes/arcseconds
    pub fn dms(&self) -> Sexagesimal {
        Sexagesimal::from_decimal(self.to_degrees())
    }
}

/// Wraps a right ascension or sidereal time in hours into `[0, 24)`.
///
/// Negative inputs and inputs of several turns are handled. The function is
/// idempotent: applying it twice gives the same value as applying it once.
pub fn to_unsigned_ra(hours: f64) -> f64 {
    let wrapped = hours.rem_euclid(24.0);
    // rem_euclid can round up to exactly 24.0 for tiny negative inputs
    if wrapped >= 24.0 {
        0.0
    } else {
        wrapped
    }
}

/// Reduces an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps an hour angle (or any hour difference) into `(-12, 12]`.
///
/// Negative values are east of the meridian, positive values west.
pub fn signed_hours(hours: f64) -> f64 {
    let wrapped = to_unsigned_ra(hours);
    if wrapped > 12.0 {
        wrapped - 24.0
    } else {
        wrapped
    }
}

/// Hour angle (in hours, always non-negative) at which an object of the given
/// declination crosses the given altitude, as seen from the given latitude.
///
/// All arguments are in radians. Returns `None` when the object never
/// reaches that altitude (it stays entirely above or entirely below it).
///
/// # Examples
///
/// ```rust
/// use planisphere::coordinates::angle::hour_angle_from_altitude;
///
/// // From the equator, an object on the celestial equator is up for 12 hours
/// let h0 = hour_angle_from_altitude(0.0, 0.0, 0.0).unwrap();
/// assert!((h0 - 6.0).abs() < 1e-12);
///
/// // Polaris never sets from 60 degrees north
/// let lat = 60f64.to_radians();
/// let dec = 89.26f64.to_radians();
/// assert!(hour_angle_from_altitude(lat, 0.0, dec).is_none());
/// ```
pub fn hour_angle_from_altitude(latitude: f64, altitude: f64, declination: f64) -> Option<f64> {
    let denom = latitude.cos() * declination.cos();
    let numer = altitude.sin() - latitude.sin() * declination.sin();

    if numer.abs() > denom.abs() || denom == 0.0 {
        return None;
    }

    let cos_h = (numer / denom).clamp(-1.0, 1.0);
    Some(cos_h.acos() * RAD2HOUR)
}

/// Altitude (radians) of an object with the given declination at the given hour angle (hours).
pub fn altitude_at_hour_angle(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let sin_alt = latitude.sin() * declination.sin()
        + latitude.cos() * declination.cos() * (hour_angle * HOUR2RAD).cos();
    sin_alt.clamp(-1.0, 1.0).asin()
}

/// Base-60 decomposition of an absolute value
///
/// Seconds keep their fractional part so the decomposition reproduces the
/// input; [`Sexagesimal::truncated`] gives the integer triple used for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sexagesimal {
    /// Whole hours or degrees
    pub whole: u32,
    /// Minutes (0..60)
    pub minutes: u32,
    /// Seconds including the fractional part (0..60)
    pub seconds: f64,
}

impl Sexagesimal {
    /// Decomposes `|value|` into whole units, minutes and seconds
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planisphere::coordinates::angle::Sexagesimal;
    ///
    /// let s = Sexagesimal::from_decimal(-2.5125);
    /// assert_eq!(s.whole, 2);
    /// assert_eq!(s.minutes, 30);
    /// assert!((s.seconds - 45.0).abs() < 1e-9);
    /// ```
    pub fn from_decimal(value: f64) -> Self {
        let value = value.abs();
        let whole = value.trunc();
        let minutes_total = (value - whole) * 60.0;
        let minutes = minutes_total.trunc();
        let seconds = ((minutes_total - minutes) * 60.0).max(0.0);

        Sexagesimal {
            whole: whole as u32,
            minutes: minutes as u32,
            seconds,
        }
    }

    /// Recombines the parts into a decimal value
    pub fn to_decimal(&self) -> f64 {
        self.whole as f64 + self.minutes as f64 / 60.0 + self.seconds / 3_600.0
    }

    /// Integer (whole, minutes, seconds) with the seconds truncated
    pub fn truncated(&self) -> (u32, u32, u32) {
        (self.whole, self.minutes, self.seconds.trunc() as u32)
    }
}
