//! End-to-end observability scenarios driven through the public API

use planisphere::observability::{BestNightKind, ObservableNights};
use planisphere::{
    Body, GeographicLocation, Observability, ObservabilityConfig, ObservationTarget, RiseSet,
};
use rstest::rstest;

/// 2024-03-01 0h UT
const MARCH_2024: f64 = 2_460_370.5;
/// 2025-01-01 0h UT
const JAN_2025: f64 = 2_460_676.5;

fn madrid() -> GeographicLocation {
    GeographicLocation::from_degrees(40.4, -3.7, 650.0)
}

fn sirius() -> ObservationTarget {
    ObservationTarget::fixed(6.752, -16.716)
}

#[test]
fn test_sirius_from_madrid() {
    let mut obs = Observability::with_builtin_ephemeris(ObservabilityConfig::default());
    let report = obs.update(MARCH_2024, madrid(), sirius()).unwrap();

    assert!(matches!(report.today.unwrap().rise_set, RiseSet::Crossing { .. }));

    let annual = report.annual.unwrap();
    assert!(annual.observable);
    assert_eq!(annual.year, 2024);

    // Opposite the Sun around New Year
    let best = annual.best_night.unwrap();
    assert_eq!(best.kind, BestNightKind::LargestSunSeparation);
    assert!(best.day <= 15 || best.day >= 350, "best night on day {}", best.day);

    // Lost in the glare around the July conjunction, visible across the year end
    match annual.good_nights.unwrap() {
        ObservableNights::Ranges(ranges) => {
            assert_eq!(ranges.len(), 1, "{:?}", ranges);
            assert!(ranges[0].wraps_year_end());
            assert!(ranges[0].contains(0));
            assert!(!ranges[0].contains(185));
        }
        other => panic!("unexpected good nights {:?}", other),
    }

    let phenomena = annual.acronychal_cosmical.unwrap();
    assert!(phenomena.has_acronychal());
    assert!(phenomena.has_cosmical());
    assert_eq!(phenomena.code(), 3);
}

#[test]
fn test_southern_target_never_observable() {
    let mut obs = Observability::with_builtin_ephemeris(ObservabilityConfig::default());
    let report = obs
        .update(MARCH_2024, madrid(), ObservationTarget::fixed(12.0, -80.0))
        .unwrap();

    assert!(matches!(report.today.unwrap().rise_set, RiseSet::NeverRises));
    let annual = report.annual.unwrap();
    assert!(!annual.observable);
    assert_eq!(annual.good_nights, Some(ObservableNights::Never));
    assert_eq!(annual.acronychal_cosmical.unwrap().code(), 0);
    assert!(annual.best_night.is_none());
}

#[rstest]
#[case(50.0, true)]
#[case(60.0, false)]
fn test_polaris_and_summer_twilight(#[case] latitude: f64, #[case] whole_year: bool) {
    let polaris = ObservationTarget::fixed(2.53, 89.26);
    let site = GeographicLocation::from_degrees(latitude, 10.0, 0.0);
    let mut obs = Observability::with_builtin_ephemeris(ObservabilityConfig::default());
    let report = obs.update(MARCH_2024, site, polaris).unwrap();

    assert!(matches!(report.today.unwrap().rise_set, RiseSet::Circumpolar));

    match report.annual.unwrap().good_nights.unwrap() {
        ObservableNights::WholeYear => assert!(whole_year),
        ObservableNights::Ranges(ranges) => {
            assert!(!whole_year);
            // No dark time around the June solstice
            assert!(ranges.iter().all(|r| !r.contains(172)));
            assert!(ranges.iter().any(|r| r.contains(0)));
        }
        ObservableNights::Never => panic!("Polaris is always up"),
    }
}

#[test]
fn test_mars_opposition_2025() {
    let mut obs = Observability::with_builtin_ephemeris(ObservabilityConfig::default());
    let report = obs
        .update(JAN_2025, madrid(), ObservationTarget::body(Body::Mars))
        .unwrap();

    // Opposition on 2025-01-16
    let best = report.annual.unwrap().best_night.unwrap();
    assert_eq!(best.kind, BestNightKind::LargestSunSeparation);
    assert!((5..=25).contains(&best.day), "best night on day {}", best.day);
    assert!(best.separation.to_degrees() > 170.0);
}

#[test]
fn test_venus_greatest_elongation_2025() {
    let mut obs = Observability::with_builtin_ephemeris(ObservabilityConfig::default());
    let report = obs
        .update(JAN_2025, madrid(), ObservationTarget::body(Body::Venus))
        .unwrap();

    let best = report.annual.unwrap().best_night.unwrap();
    assert_eq!(best.kind, BestNightKind::GreatestElongation);
    let elongation = best.separation.to_degrees();
    assert!(elongation > 44.0 && elongation < 48.5, "elongation {}", elongation);
}

#[test]
fn test_switching_targets_keeps_table() {
    let mut obs = Observability::with_builtin_ephemeris(ObservabilityConfig::default());
    obs.update(MARCH_2024, madrid(), sirius()).unwrap();
    let sun_column = obs.table().unwrap().days[100].sun_ra;

    let vega = ObservationTarget::fixed(18.6156, 38.78);
    let report = obs.update(MARCH_2024 + 0.5, madrid(), vega).unwrap();
    assert_eq!(obs.table().unwrap().days[100].sun_ra, sun_column);
    assert!((obs.table().unwrap().days[100].object_ra - 18.6156).abs() < 1e-9);
    assert!(report.annual.unwrap().observable);
}

#[test]
fn test_json_config_drives_sections() {
    let config = ObservabilityConfig::from_json(
        r#"{"show_today": false, "show_acronychal_cosmical": false, "twilight_altitude_deg": -18.0}"#,
    )
    .unwrap();
    let mut obs = Observability::with_builtin_ephemeris(config);
    let report = obs.update(MARCH_2024, madrid(), sirius()).unwrap();

    assert!(report.today.is_none());
    let annual = report.annual.unwrap();
    assert!(annual.acronychal_cosmical.is_none());
    assert!(annual.best_night.is_some());
    assert!(annual.good_nights.is_some());
}
