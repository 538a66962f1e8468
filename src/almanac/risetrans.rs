//! Closed-form rise, set and transit for targets fixed on the sky
//!
//! For a fixed declination the hour angle of the horizon crossings, `±H0`,
//! is constant, so the spans to the previous or next crossing follow from
//! the current hour angle `H` alone. Which spans apply depends on which of
//! four quadrants of the diurnal circle the target is in.

use super::{Culmination, EphemerisEvent, RiseSet, TimedEvent};
use crate::constants::SIDEREAL_TO_SOLAR;
use crate::coordinates::angle::{altitude_at_hour_angle, hour_angle_from_altitude, signed_hours};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Position of a target on its diurnal circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyQuadrant {
    /// East of the meridian, not yet risen
    BelowHorizonEastward,
    /// East of the meridian, risen and climbing toward transit
    AboveHorizonEastward,
    /// West of the meridian, already set
    BelowHorizonWestward,
    /// West of the meridian, past transit and sinking
    AboveHorizonWestward,
}

/// Signed spans, in sidereal hours, to the horizon crossings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonSpans {
    /// Span to the rise: negative when the target rose in the past
    pub rising: f64,
    /// Span to the set: negative when the target set in the past
    pub setting: f64,
    pub has_risen: bool,
}

impl SkyQuadrant {
    /// Classify a signed hour angle (hours, `(-12, 12]`) against the horizon hour angle `H0`
    pub fn classify(hour_angle: f64, horizon_hour_angle: f64) -> Self {
        let east = hour_angle < 0.0;
        let below = hour_angle.abs() > horizon_hour_angle;
        match (east, below) {
            (true, true) => SkyQuadrant::BelowHorizonEastward,
            (true, false) => SkyQuadrant::AboveHorizonEastward,
            (false, true) => SkyQuadrant::BelowHorizonWestward,
            (false, false) => SkyQuadrant::AboveHorizonWestward,
        }
    }

    pub fn is_above_horizon(&self) -> bool {
        matches!(
            self,
            SkyQuadrant::AboveHorizonEastward | SkyQuadrant::AboveHorizonWestward
        )
    }

    pub fn is_east(&self) -> bool {
        matches!(
            self,
            SkyQuadrant::BelowHorizonEastward | SkyQuadrant::AboveHorizonEastward
        )
    }

    /// Spans to the rise and set for a target at `|H|` with horizon hour angle `H0`
    pub fn spans(&self, hour_angle: f64, horizon_hour_angle: f64) -> HorizonSpans {
        let h = hour_angle.abs();
        let h0 = horizon_hour_angle;
        let (rising, setting) = match self {
            SkyQuadrant::BelowHorizonEastward => (h - h0, -(24.0 - h - h0)),
            SkyQuadrant::AboveHorizonEastward => {
                let rising = -(h0 - h);
                (rising, 2.0 * h0 + rising)
            }
            SkyQuadrant::BelowHorizonWestward => (24.0 - h - h0, -(h - h0)),
            SkyQuadrant::AboveHorizonWestward => (-(h0 + h), h0 - h),
        };

        HorizonSpans {
            rising,
            setting,
            has_risen: self.is_above_horizon(),
        }
    }
}

/// Altitude (radians) at upper culmination
pub fn culmination_altitude(latitude: f64, declination: f64) -> f64 {
    FRAC_PI_2 - (latitude - declination).abs()
}

/// Altitude (radians) at lower culmination
pub fn lower_culmination_altitude(latitude: f64, declination: f64) -> f64 {
    (-(latitude + declination).cos()).clamp(-1.0, 1.0).asin()
}

/// Signed span in solar hours to the transit nearest in the target's current half of the sky.
///
/// East of the meridian the transit is ahead, west of it the transit is past.
pub fn transit_span(hour_angle: f64) -> f64 {
    -signed_hours(hour_angle) * SIDEREAL_TO_SOLAR
}

/// Rise, set and culmination of a target fixed on the sky.
///
/// # Arguments
///
/// * `latitude` - Observer latitude in radians
/// * `declination` - Target declination in radians
/// * `hour_angle` - Current hour angle of the target in hours (any range)
/// * `horizon_altitude` - Effective horizon altitude in radians
/// * `now` - Current Julian date
pub fn solve_fixed_object(
    latitude: f64,
    declination: f64,
    hour_angle: f64,
    horizon_altitude: f64,
    now: f64,
) -> EphemerisEvent {
    let hour_angle = signed_hours(hour_angle);

    let rise_set = match hour_angle_from_altitude(latitude, horizon_altitude, declination) {
        None => {
            if altitude_at_hour_angle(latitude, declination, hour_angle) > horizon_altitude {
                RiseSet::Circumpolar
            } else {
                RiseSet::NeverRises
            }
        }
        Some(h0) => {
            let spans = SkyQuadrant::classify(hour_angle, h0).spans(hour_angle, h0);
            RiseSet::Crossing {
                rise: TimedEvent::from_span(now, spans.rising * SIDEREAL_TO_SOLAR),
                set: TimedEvent::from_span(now, spans.setting * SIDEREAL_TO_SOLAR),
            }
        }
    };

    let altitude = culmination_altitude(latitude, declination);
    let culmination = (altitude > horizon_altitude).then(|| Culmination {
        event: TimedEvent::from_span(now, transit_span(hour_angle)),
        altitude,
    });

    EphemerisEvent {
        rise_set,
        culmination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::angle::to_unsigned_ra;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    const NOW: f64 = 2_460_000.5;

    #[rstest]
    #[case(-8.0, SkyQuadrant::BelowHorizonEastward)]
    #[case(-3.0, SkyQuadrant::AboveHorizonEastward)]
    #[case(8.0, SkyQuadrant::BelowHorizonWestward)]
    #[case(3.0, SkyQuadrant::AboveHorizonWestward)]
    #[case(0.0, SkyQuadrant::AboveHorizonWestward)]
    fn test_classify(#[case] hour_angle: f64, #[case] expected: SkyQuadrant) {
        assert_eq!(SkyQuadrant::classify(hour_angle, 6.0), expected);
    }

    #[test]
    fn test_circumpolar_boundary() {
        let lat = 60f64.to_radians();

        let north = solve_fixed_object(lat, 85f64.to_radians(), 4.0, 0.0, NOW);
        assert_eq!(north.rise_set, RiseSet::Circumpolar);
        assert!(north.culmination.is_some());

        let south = solve_fixed_object(lat, (-85f64).to_radians(), 4.0, 0.0, NOW);
        assert_eq!(south.rise_set, RiseSet::NeverRises);
        assert!(south.culmination.is_none());
    }

    #[test]
    fn test_equatorial_object_from_equator() {
        // Up for exactly 12 sidereal hours, currently 3 hours after rising
        let event = solve_fixed_object(0.0, 0.0, -3.0, 0.0, NOW);
        match event.rise_set {
            RiseSet::Crossing { rise, set } => {
                assert_relative_eq!(rise.hours_from_now, -3.0 * SIDEREAL_TO_SOLAR, epsilon = 1e-9);
                assert_relative_eq!(set.hours_from_now, 9.0 * SIDEREAL_TO_SOLAR, epsilon = 1e-9);
                assert!(rise.is_past());
                assert!(!set.is_past());
            }
            other => panic!("expected a crossing, got {:?}", other),
        }

        let culmination = event.culmination.unwrap();
        assert_relative_eq!(culmination.altitude, FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(
            culmination.event.hours_from_now,
            3.0 * SIDEREAL_TO_SOLAR,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_transit_past_when_west() {
        let event = solve_fixed_object(0.7, 0.2, 2.0, 0.0, NOW);
        let culmination = event.culmination.unwrap();
        assert!(culmination.event.is_past());
        assert_relative_eq!(
            culmination.altitude,
            FRAC_PI_2 - (0.7f64 - 0.2).abs(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_spans_land_on_horizon() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..500 {
            let lat: f64 = rng.gen_range(-1.4..1.4);
            let dec: f64 = rng.gen_range(-1.4..1.4);
            let hour_angle: f64 = rng.gen_range(-11.99..12.0);

            let Some(h0) = hour_angle_from_altitude(lat, 0.0, dec) else {
                continue;
            };
            let quadrant = SkyQuadrant::classify(hour_angle, h0);
            let spans = quadrant.spans(hour_angle, h0);

            // The rise happens at hour angle -H0 and the set at +H0
            let at_rise = to_unsigned_ra(hour_angle + spans.rising);
            let at_set = to_unsigned_ra(hour_angle + spans.setting);
            let diff_rise = signed_hours(at_rise - to_unsigned_ra(-h0));
            let diff_set = signed_hours(at_set - h0);
            assert!(diff_rise.abs() < 1e-9, "rise off by {}", diff_rise);
            assert!(diff_set.abs() < 1e-9, "set off by {}", diff_set);

            assert_eq!(spans.has_risen, spans.rising <= 0.0);
            assert_eq!(spans.has_risen, spans.setting >= 0.0);
            assert!(spans.rising.abs() <= 24.0 && spans.setting.abs() <= 24.0);
        }
    }

    #[test]
    fn test_lower_culmination() {
        let lat = 60f64.to_radians();
        let dec = (-85f64).to_radians();
        assert_relative_eq!(
            lower_culmination_altitude(lat, dec).to_degrees(),
            -65.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            lower_culmination_altitude(lat, 85f64.to_radians()).to_degrees(),
            55.0,
            epsilon = 1e-9
        );
    }
}
