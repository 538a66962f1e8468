//! Planisphere: observability and satellite tracking calculations for planetarium software
//!
//! This crate provides the computational core behind a planetarium's
//! "when can I see it" features: rise, set and transit times, the yearly
//! observability of a target, full-moon dates and near-Earth satellite
//! propagation from two-line element sets.
//!
//! Results are returned as structured values (instants, signed spans,
//! day-of-year ranges). Formatting them for display is left to the host.

use thiserror::Error;

pub mod almanac;
pub mod celestial;
pub mod constants;
pub mod coordinates;
pub mod eot;
pub mod framelib;
pub mod observability;
pub mod planetlib;
pub mod sgp4lib;
pub mod time;
pub mod toposlib;

// Re-export commonly used types
pub use almanac::{Culmination, EphemerisEvent, RiseSet, TimedEvent};
pub use celestial::{CelestialObject, ObservationTarget};
pub use coordinates::Equatorial;
pub use observability::{Observability, ObservabilityConfig, ObservabilityReport};
pub use planetlib::{Body, Ephemeris, KeplerianEphemeris};
pub use sgp4lib::{Satellite, SatelliteCatalog, TleSet};
pub use toposlib::GeographicLocation;

/// Main error type for the planisphere library
#[derive(Debug, Error)]
pub enum PlanisphereError {
    #[error("Ephemeris error: {0}")]
    EphemerisError(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("No convergence after {iterations} iterations (last estimate JD {last_estimate})")]
    NotConverged { last_estimate: f64, iterations: usize },

    #[error("Invalid TLE: {0}")]
    InvalidTle(String),

    #[error("Propagation error: {0}")]
    PropagationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for planisphere operations
pub type Result<T> = std::result::Result<T, PlanisphereError>;
