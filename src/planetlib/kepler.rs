//! Approximate planetary positions from mean Keplerian elements
//!
//! Uses the JPL "Keplerian Elements for Approximate Positions of the Major
//! Planets" table valid 1800-2050 (E.M. Standish). Elements are referred to
//! the J2000 ecliptic and equinox; positions are rotated to the equinox of
//! date with the general precession in longitude so every vector this module
//! returns is in the mean ecliptic frame of date.

use super::moon::lunar_geocentric_position;
use super::{Body, Ephemeris};
use crate::constants::{ASEC2RAD, EARTH_MOON_MASS_RATIO};
use crate::time::julian_centuries;
use crate::{PlanisphereError, Result};
use lazy_static::lazy_static;
use nalgebra::{Rotation3, Vector3};
use std::collections::HashMap;

/// Mean orbital elements at J2000 and their rates per Julian century
#[derive(Debug, Clone, Copy)]
pub struct OrbitalElements {
    /// Semi-major axis (AU) and rate
    pub a: (f64, f64),
    /// Eccentricity and rate
    pub e: (f64, f64),
    /// Inclination (deg) and rate
    pub i: (f64, f64),
    /// Mean longitude (deg) and rate
    pub l: (f64, f64),
    /// Longitude of perihelion (deg) and rate
    pub peri: (f64, f64),
    /// Longitude of the ascending node (deg) and rate
    pub node: (f64, f64),
}

/// Key for the Earth-Moon barycenter row
const EM_BARYCENTER: &str = "EM Bary";

lazy_static! {
    static ref ELEMENTS: HashMap<&'static str, OrbitalElements> = {
        let mut m = HashMap::new();
        m.insert("Mercury", OrbitalElements {
            a: (0.387_099_27, 0.000_000_37),
            e: (0.205_635_93, 0.000_019_06),
            i: (7.004_979_02, -0.005_947_49),
            l: (252.250_323_50, 149_472.674_111_75),
            peri: (77.457_796_28, 0.160_476_89),
            node: (48.330_765_93, -0.125_340_81),
        });
        m.insert("Venus", OrbitalElements {
            a: (0.723_335_66, 0.000_003_90),
            e: (0.006_776_72, -0.000_041_07),
            i: (3.394_676_05, -0.000_788_90),
            l: (181.979_099_50, 58_517.815_387_29),
            peri: (131.602_467_18, 0.002_683_29),
            node: (76.679_842_55, -0.277_694_18),
        });
        m.insert(EM_BARYCENTER, OrbitalElements {
            a: (1.000_002_61, 0.000_005_62),
            e: (0.016_711_23, -0.000_043_92),
            i: (-0.000_015_31, -0.012_946_68),
            l: (100.464_571_66, 35_999.372_449_81),
            peri: (102.937_681_93, 0.323_273_64),
            node: (0.0, 0.0),
        });
        m.insert("Mars", OrbitalElements {
            a: (1.523_710_34, 0.000_018_47),
            e: (0.093_394_10, 0.000_078_82),
            i: (1.849_691_42, -0.008_131_31),
            l: (-4.553_432_05, 19_140.302_684_99),
            peri: (-23.943_629_59, 0.444_410_88),
            node: (49.559_538_91, -0.292_573_43),
        });
        m.insert("Jupiter", OrbitalElements {
            a: (5.202_887_00, -0.000_116_07),
            e: (0.048_386_24, -0.000_132_53),
            i: (1.304_396_95, -0.001_837_14),
            l: (34.396_440_51, 3_034.746_127_75),
            peri: (14.728_479_83, 0.212_526_68),
            node: (100.473_909_09, 0.204_691_06),
        });
        m.insert("Saturn", OrbitalElements {
            a: (9.536_675_94, -0.001_250_60),
            e: (0.053_861_79, -0.000_509_91),
            i: (2.485_991_87, 0.001_936_09),
            l: (49.954_244_23, 1_222.493_622_01),
            peri: (92.598_878_31, -0.418_972_16),
            node: (113.662_424_48, -0.288_677_94),
        });
        m.insert("Uranus", OrbitalElements {
            a: (19.189_164_64, -0.001_961_76),
            e: (0.047_257_44, -0.000_043_97),
            i: (0.772_637_83, -0.002_429_39),
            l: (313.238_104_51, 428.482_027_85),
            peri: (170.954_276_30, 0.408_052_81),
            node: (74.016_925_03, 0.042_405_89),
        });
        m.insert("Neptune", OrbitalElements {
            a: (30.069_922_76, 0.000_262_91),
            e: (0.008_590_48, 0.000_051_05),
            i: (1.770_043_47, 0.000_353_72),
            l: (-55.120_029_69, 218.459_453_25),
            peri: (44.964_762_27, -0.322_414_64),
            node: (131.784_225_74, -0.005_086_64),
        });
        m.insert("Pluto", OrbitalElements {
            a: (39.482_116_75, -0.000_315_96),
            e: (0.248_827_30, 0.000_051_70),
            i: (17.140_012_06, 0.000_048_18),
            l: (238.929_038_33, 145.207_805_15),
            peri: (224.068_916_29, -0.040_629_42),
            node: (110.303_936_84, -0.011_834_82),
        });
        m
    };
}

/// Solve Kepler's equation `M = E - e sin E` for the eccentric anomaly (radians)
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut e_anom = if eccentricity < 0.8 {
        mean_anomaly
    } else {
        std::f64::consts::PI
    };

    for _ in 0..50 {
        let delta = (e_anom - eccentricity * e_anom.sin() - mean_anomaly)
            / (1.0 - eccentricity * e_anom.cos());
        e_anom -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }

    e_anom
}

impl OrbitalElements {
    /// Heliocentric position (AU) in the J2000 ecliptic frame
    pub fn position_j2000(&self, jd: f64) -> Vector3<f64> {
        let t = julian_centuries(jd);
        let at = |(value, rate): (f64, f64)| value + rate * t;

        let a = at(self.a);
        let e = at(self.e);
        let incl = at(self.i).to_radians();
        let l = at(self.l);
        let peri = at(self.peri);
        let node = at(self.node);

        let mean_anomaly = (l - peri).to_radians().rem_euclid(std::f64::consts::TAU);
        let arg_peri = (peri - node).to_radians();
        let ecc_anomaly = solve_kepler(mean_anomaly, e);

        let in_plane = Vector3::new(
            a * (ecc_anomaly.cos() - e),
            a * (1.0 - e * e).sqrt() * ecc_anomaly.sin(),
            0.0,
        );

        let orientation = Rotation3::from_axis_angle(&Vector3::z_axis(), node.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), incl)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), arg_peri);

        orientation * in_plane
    }
}

/// Rotation from the J2000 ecliptic to the mean ecliptic of date (precession in longitude)
fn precession_to_date(jd: f64) -> Rotation3<f64> {
    let t = julian_centuries(jd);
    let p = (5_029.096_6 * t + 1.111_13 * t * t) * ASEC2RAD;
    Rotation3::from_axis_angle(&Vector3::z_axis(), p)
}

/// Built-in ephemeris from mean Keplerian elements and a short lunar series
///
/// Accuracy is of the order of arcminutes for the inner planets and a few
/// tenths of a degree for the Moon, which is plenty for rise/set times and
/// day-resolution annual tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerianEphemeris;

impl KeplerianEphemeris {
    pub fn new() -> Self {
        Self
    }

    fn elements(key: &str) -> Result<&'static OrbitalElements> {
        ELEMENTS
            .get(key)
            .ok_or_else(|| PlanisphereError::EphemerisError(format!("No elements for {}", key)))
    }

    fn earth_moon_barycenter(&self, jd: f64) -> Result<Vector3<f64>> {
        let emb = Self::elements(EM_BARYCENTER)?.position_j2000(jd);
        Ok(precession_to_date(jd) * emb)
    }
}

impl Ephemeris for KeplerianEphemeris {
    fn heliocentric_position(&self, body: Body, jd: f64) -> Result<Vector3<f64>> {
        match body {
            Body::Sun => Ok(Vector3::zeros()),
            Body::Earth => {
                let moon = lunar_geocentric_position(jd);
                Ok(self.earth_moon_barycenter(jd)? - moon / (1.0 + EARTH_MOON_MASS_RATIO))
            }
            Body::Moon => {
                let moon = lunar_geocentric_position(jd);
                let earth = self.earth_moon_barycenter(jd)? - moon / (1.0 + EARTH_MOON_MASS_RATIO);
                Ok(earth + moon)
            }
            planet => {
                let j2000 = Self::elements(planet.name())?.position_j2000(jd);
                Ok(precession_to_date(jd) * j2000)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_kepler() {
        for &e in &[0.0, 0.1, 0.5, 0.9] {
            for i in 0..12 {
                let m = i as f64 * 0.5;
                let big_e = solve_kepler(m, e);
                assert_relative_eq!(big_e - e * big_e.sin(), m, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_orbital_radii() {
        let eph = KeplerianEphemeris::new();
        let jd = 2_460_000.5;
        let expectations = [
            (Body::Mercury, 0.30, 0.47),
            (Body::Venus, 0.71, 0.73),
            (Body::Earth, 0.98, 1.02),
            (Body::Mars, 1.38, 1.67),
            (Body::Jupiter, 4.9, 5.5),
            (Body::Saturn, 9.0, 10.2),
        ];
        for (body, lo, hi) in expectations {
            let r = eph.heliocentric_position(body, jd).unwrap().norm();
            assert!(r > lo && r < hi, "{} at {} AU", body.name(), r);
        }
    }

    #[test]
    fn test_earth_longitude_at_march_equinox() {
        // Around the March equinox the Sun is at ecliptic longitude 0,
        // so the Earth sits at heliocentric longitude 180 degrees.
        let eph = KeplerianEphemeris::new();
        let earth = eph.heliocentric_position(Body::Earth, 2_460_389.629).unwrap(); // 2024-03-20 03:06 UT
        let lon = earth.y.atan2(earth.x).to_degrees().rem_euclid(360.0);
        assert!((lon - 180.0).abs() < 0.1, "Earth longitude {}", lon);
        assert!(earth.z.abs() < 1e-4);
    }
}
