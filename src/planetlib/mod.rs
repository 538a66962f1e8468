//! Planetary ephemeris calculations module
//!
//! The [`Ephemeris`] trait is the seam between the solvers and whatever
//! supplies body positions. [`KeplerianEphemeris`] is the built-in
//! low-precision implementation; hosts with a better theory (VSOP87, JPL
//! DE files) can plug their own in.

pub mod kepler;
pub mod moon;

pub use kepler::KeplerianEphemeris;

use crate::coordinates::cartesian::Cartesian3;
use crate::framelib::inertial::ecliptic_to_equatorial;
use crate::time::local_sidereal_time;
use crate::toposlib::GeographicLocation;
use crate::Result;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Enum representing the major solar system bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    /// Look a body up by its English name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Body> {
        const ALL: [Body; 11] = [
            Body::Sun,
            Body::Mercury,
            Body::Venus,
            Body::Earth,
            Body::Moon,
            Body::Mars,
            Body::Jupiter,
            Body::Saturn,
            Body::Uranus,
            Body::Neptune,
            Body::Pluto,
        ];
        ALL.iter()
            .copied()
            .find(|body| body.name().eq_ignore_ascii_case(name))
    }

    /// Planets whose orbit lies inside the Earth's
    pub fn is_inferior(&self) -> bool {
        matches!(self, Body::Mercury | Body::Venus)
    }
}

/// Source of heliocentric body positions
pub trait Ephemeris {
    /// Heliocentric position of `body` in AU, mean ecliptic and equinox of date
    fn heliocentric_position(&self, body: Body, jd: f64) -> Result<Vector3<f64>>;
}

/// Apparent place of a body: right ascension (hours), declination and distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApparentPlace {
    /// Right ascension in hours `[0, 24)`
    pub ra: f64,
    /// Declination in radians
    pub dec: f64,
    /// Distance from the observer in AU
    pub distance: f64,
}

/// Equatorial-of-date vector (AU) from the Earth's centre to `body`.
pub fn geocentric_equatorial_vector(
    ephemeris: &dyn Ephemeris,
    body: Body,
    jd: f64,
) -> Result<Vector3<f64>> {
    let earth = ephemeris.heliocentric_position(Body::Earth, jd)?;
    let target = ephemeris.heliocentric_position(body, jd)?;
    Ok(ecliptic_to_equatorial(&(target - earth), jd))
}

/// Right ascension and declination of `body` at `jd`.
///
/// With an observer the position is topocentric (the observer's offset from
/// the geocentre, rotated by local sidereal time, is removed), which matters
/// for the Moon. Without one it is geocentric.
pub fn apparent_place(
    ephemeris: &dyn Ephemeris,
    body: Body,
    jd: f64,
    observer: Option<&GeographicLocation>,
) -> Result<ApparentPlace> {
    let mut v = geocentric_equatorial_vector(ephemeris, body, jd)?;
    if let Some(site) = observer {
        let lst = local_sidereal_time(jd, site.longitude);
        v -= site.geocentric_equatorial_au(lst);
    }

    let cart = Cartesian3::from_vector3(v);
    let (ra, dec) = cart.to_ra_dec_hours();
    Ok(ApparentPlace {
        ra,
        dec,
        distance: cart.magnitude(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AU_KM;

    #[test]
    fn test_body_names() {
        assert_eq!(Body::from_name("venus"), Some(Body::Venus));
        assert_eq!(Body::from_name("Moon"), Some(Body::Moon));
        assert_eq!(Body::from_name("Vulcan"), None);
        assert!(Body::Mercury.is_inferior());
        assert!(!Body::Mars.is_inferior());
    }

    #[test]
    fn test_sun_at_june_solstice() {
        let eph = KeplerianEphemeris::new();
        // 2024-06-20 20:51 UT
        let sun = apparent_place(&eph, Body::Sun, 2_460_482.369, None).unwrap();
        assert!((sun.ra - 6.0).abs() < 0.02, "Sun RA {}", sun.ra);
        assert!((sun.dec.to_degrees() - 23.44).abs() < 0.05);
        assert!((sun.distance - 1.016).abs() < 0.002);
    }

    #[test]
    fn test_lunar_parallax_shift() {
        let eph = KeplerianEphemeris::new();
        let jd = 2_460_000.5;
        let site = GeographicLocation::from_degrees(45.0, 10.0, 0.0);
        let geo = apparent_place(&eph, Body::Moon, jd, None).unwrap();
        let topo = apparent_place(&eph, Body::Moon, jd, Some(&site)).unwrap();

        let shift_km = ((geo.distance - topo.distance) * AU_KM).abs();
        assert!(shift_km < 6_400.0);
        let sep = crate::coordinates::angular_separation(geo.ra, geo.dec, topo.ra, topo.dec);
        // Horizontal parallax never exceeds about a degree
        assert!(sep.to_degrees() < 1.1);
    }
}
