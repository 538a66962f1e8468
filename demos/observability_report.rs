//! Observability report for one target and site
//!
//! Prints the structured report as JSON, followed by the equation of time
//! and, when a TLE file is given, the look angles of one satellite.
//!
//! Usage:
//!   cargo run --example observability_report -- --lat 40.4 --lon -3.7 --body Mars
//!   cargo run --example observability_report -- --ra 6.752 --dec -16.716 --date 2024-03-01T21:00:00
//!   cargo run --example observability_report -- --tle stations.txt --satellite 25544

use std::fs::File;
use std::io::BufReader;

use chrono::{NaiveDateTime, Utc};
use clap::Parser;
use planisphere::eot::equation_of_time_minutes;
use planisphere::sgp4lib::{parse_tle_catalog, SatelliteCatalog};
use planisphere::time::jd_from_datetime;
use planisphere::{Body, GeographicLocation, Observability, ObservabilityConfig, ObservationTarget};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Prints when a target can be observed from a site", long_about = None)]
struct Args {
    /// Latitude in degrees, north positive
    #[arg(long, default_value_t = 40.4, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees, east positive
    #[arg(long, default_value_t = -3.7, allow_hyphen_values = true)]
    lon: f64,

    /// Altitude in metres
    #[arg(long, default_value_t = 650.0)]
    alt: f64,

    /// UTC date and time, e.g. 2024-03-01T21:00:00 (defaults to now)
    #[arg(long)]
    date: Option<String>,

    /// Solar system body to analyse
    #[arg(long, conflicts_with_all = ["ra", "dec"])]
    body: Option<String>,

    /// Right ascension of a fixed target in hours
    #[arg(long, requires = "dec")]
    ra: Option<f64>,

    /// Declination of a fixed target in degrees
    #[arg(long, requires = "ra", allow_hyphen_values = true)]
    dec: Option<f64>,

    /// JSON file with observability settings
    #[arg(long)]
    config: Option<String>,

    /// TLE catalog file
    #[arg(long)]
    tle: Option<String>,

    /// Catalog number of the satellite to observe from the TLE file
    #[arg(long, requires = "tle")]
    satellite: Option<String>,
}

fn parse_target(args: &Args) -> Result<ObservationTarget> {
    if let (Some(ra), Some(dec)) = (args.ra, args.dec) {
        return Ok(ObservationTarget::fixed(ra, dec));
    }
    let name = args.body.as_deref().unwrap_or("Sun");
    let body = Body::from_name(name).ok_or_else(|| format!("unknown body '{}'", name))?;
    Ok(ObservationTarget::body(body))
}

fn parse_jd(date: Option<&str>) -> Result<f64> {
    let dt = match date {
        Some(text) => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")?,
        None => Utc::now().naive_utc(),
    };
    Ok(jd_from_datetime(&dt))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ObservabilityConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ObservabilityConfig::default(),
    };
    let location = GeographicLocation::from_degrees(args.lat, args.lon, args.alt);
    let target = parse_target(&args)?;
    let jd = parse_jd(args.date.as_deref())?;

    let mut observability = Observability::with_builtin_ephemeris(config);
    let report = observability.update(jd, location, target)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let eot = equation_of_time_minutes(&planisphere::KeplerianEphemeris::new(), jd)?;
    println!("Equation of time: {:+.2} min", eot);

    if let Some(path) = &args.tle {
        let sets = parse_tle_catalog(BufReader::new(File::open(path)?), true)?;
        println!("Parsed {} element sets from {}", sets.len(), path);

        let mut catalog = SatelliteCatalog::new(false);
        let summary = catalog.update_from_tle_sets(sets, jd);
        println!("Tracking {} satellites ({} added)", catalog.len(), summary.added);

        if let Some(id) = &args.satellite {
            let satellite = catalog
                .get_mut(id)
                .ok_or_else(|| format!("satellite {} not in {}", id, path))?;
            if !satellite.is_launched(jd) {
                println!("{} had not been launched yet", satellite.name);
                return Ok(());
            }
            let look = satellite.observe(jd, &location)?;
            println!(
                "{}: az {:.2}°, el {:.2}°, range {:.1} km, height {:.1} km, range rate {:+.3} km/s",
                satellite.name,
                look.azimuth.to_degrees(),
                look.elevation.to_degrees(),
                look.range_km,
                look.height_km,
                look.range_rate_km_s
            );
        }
    }

    Ok(())
}
