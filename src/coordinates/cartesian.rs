//! # Cartesian Coordinate System Module
//!
//! A 3D Cartesian vector used as the intermediate form for every frame
//! change in the crate. Ephemeris positions, observer offsets and satellite
//! states are all handled as Cartesian vectors and converted to spherical
//! angles only at the end.
//!
//! ## Coordinate System Convention
//!
//! - **X-axis**: Points toward the vernal equinox (RA = 0h, Dec = 0°)
//! - **Y-axis**: Points toward RA = 6h, Dec = 0°
//! - **Z-axis**: Points toward the north celestial pole (Dec = +90°)
//!
//! ## Examples
//!
//! ```rust
//! use planisphere::coordinates::cartesian::Cartesian3;
//!
//! let v = Cartesian3::new(0.0, 2.0, 0.0);
//! let (ra_hours, dec) = v.to_ra_dec_hours();
//! assert!((ra_hours - 6.0).abs() < 1e-12);
//! assert!(dec.abs() < 1e-12);
//! ```

use crate::constants::RAD2HOUR;
use crate::coordinates::angle::to_unsigned_ra;
use nalgebra::Vector3;

/// Three-dimensional Cartesian coordinate
///
/// Can hold a unit direction, a position (AU or km depending on the caller)
/// or a velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian3 {
    /// X-component (toward vernal equinox)
    pub x: f64,
    /// Y-component (toward RA = 6h)
    pub y: f64,
    /// Z-component (toward north celestial pole)
    pub z: f64,
}

impl Cartesian3 {
    /// Creates a new Cartesian coordinate
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// Converts a direction into right ascension (hours, `[0, 24)`) and declination (radians)
    ///
    /// The vector is normalized first, so any length works. A zero vector
    /// maps to `(0, 0)`.
    pub fn to_ra_dec_hours(&self) -> (f64, f64) {
        match self.normalize() {
            Some(unit) => {
                let dec = unit.z.clamp(-1.0, 1.0).asin();
                let ra = to_unsigned_ra(unit.y.atan2(unit.x) * RAD2HOUR);
                (ra, dec)
            }
            None => (0.0, 0.0),
        }
    }

    /// Euclidean length of the vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero vector
    pub fn normalize(&self) -> Option<Cartesian3> {
        let mag = self.magnitude();
        if mag == 0.0 {
            None
        } else {
            Some(Cartesian3 {
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
            })
        }
    }

    /// Cross product with another coordinate
    pub fn cross(&self, other: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Creates from nalgebra Vector3
    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Cartesian3::new(vec.x, vec.y, vec.z)
    }
}

impl From<Vector3<f64>> for Cartesian3 {
    fn from(vec: Vector3<f64>) -> Self {
        Cartesian3::from_vector3(vec)
    }
}
