//! Reference frames and the rotations between them

pub mod inertial;
pub mod nutation;

pub use inertial::{ecliptic_to_equatorial, mean_obliquity, Equatorial};
pub use nutation::{nutation, nutation_longitude};
