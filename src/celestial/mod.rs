//! Observation targets and their positions in the sky

use crate::coordinates::Equatorial;
use crate::planetlib::{apparent_place, Body, Ephemeris};
use crate::toposlib::GeographicLocation;
use crate::Result;
use serde::{Deserialize, Serialize};

/// A trait for objects that have a position in the sky
pub trait CelestialObject {
    /// Equatorial position (equinox of date) at a Julian date.
    ///
    /// `observer` requests a topocentric position where that matters.
    fn position_at(
        &self,
        ephemeris: &dyn Ephemeris,
        jd: f64,
        observer: Option<&GeographicLocation>,
    ) -> Result<Equatorial>;
}

/// Kind of target, deciding which solver handles it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Fixed on the sky (stars, deep-sky objects): closed-form solution
    Fixed,
    Sun,
    Moon,
    /// Any other solar-system body: iterative solution
    Planet,
}

/// The object selected for observability analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObservationTarget {
    /// A point fixed on the sky
    Fixed(Equatorial),
    Sun,
    Moon,
    Planet(Body),
}

impl ObservationTarget {
    /// A fixed target from RA in hours and Dec in degrees
    pub fn fixed(ra_hours: f64, dec_deg: f64) -> Self {
        ObservationTarget::Fixed(Equatorial::from_hours(ra_hours, dec_deg.to_radians()))
    }

    /// Target for a solar system body, folding the Sun and Moon into their own variants
    pub fn body(body: Body) -> Self {
        match body {
            Body::Sun => ObservationTarget::Sun,
            Body::Moon => ObservationTarget::Moon,
            other => ObservationTarget::Planet(other),
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            ObservationTarget::Fixed(_) => TargetKind::Fixed,
            ObservationTarget::Sun => TargetKind::Sun,
            ObservationTarget::Moon => TargetKind::Moon,
            ObservationTarget::Planet(_) => TargetKind::Planet,
        }
    }

    /// The solar-system body behind this target, if any
    pub fn as_body(&self) -> Option<Body> {
        match self {
            ObservationTarget::Fixed(_) => None,
            ObservationTarget::Sun => Some(Body::Sun),
            ObservationTarget::Moon => Some(Body::Moon),
            ObservationTarget::Planet(body) => Some(*body),
        }
    }

    /// Whether the position changes appreciably over a day
    pub fn is_moving(&self) -> bool {
        !matches!(self, ObservationTarget::Fixed(_))
    }

    /// Targets whose best night is their greatest elongation rather than opposition
    pub fn has_greatest_elongation(&self) -> bool {
        self.as_body().map(|b| b.is_inferior()).unwrap_or(false)
    }
}

impl CelestialObject for ObservationTarget {
    fn position_at(
        &self,
        ephemeris: &dyn Ephemeris,
        jd: f64,
        observer: Option<&GeographicLocation>,
    ) -> Result<Equatorial> {
        let body = match self {
            ObservationTarget::Fixed(eq) => return Ok(*eq),
            ObservationTarget::Sun => Body::Sun,
            ObservationTarget::Moon => Body::Moon,
            ObservationTarget::Planet(body) => *body,
        };
        let place = apparent_place(ephemeris, body, jd, observer)?;
        Ok(Equatorial::from_hours(place.ra, place.dec))
    }
}
