//! Whole-year analyses over a [`YearlySampleTable`]
//!
//! Three independent scans:
//!
//! * the best night, when the target is farthest from the Sun;
//! * the acronychal and cosmical rise and set dates, when the target
//!   crosses the horizon as the Sun crosses it on the other or same side;
//! * the ranges of nights on which the target is above the horizon at some
//!   time between evening and morning twilight.
//!
//! All of them pick the first day when several tie.

use super::config::ObservabilityConfig;
use super::yearly::{YearlySample, YearlySampleTable};
use crate::almanac::risetrans::culmination_altitude;
use crate::coordinates::angle::signed_hours;
use crate::coordinates::angular_separation;
use crate::time::CalendarDate;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Largest accepted gap between the target's and the Sun's crossings, in hours
pub const ACRONYCHAL_TOLERANCE_H: f64 = 5.0 / 60.0;

/// Sidereal-time bins scanned between evening and morning twilight
pub const DARK_TIME_BINS: usize = 1000;

/// How the best night is labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestNightKind {
    /// Mercury and Venus never reach opposition
    GreatestElongation,
    LargestSunSeparation,
}

/// Day of largest angular distance from the Sun
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestNight {
    pub day: usize,
    pub jd: f64,
    /// Separation from the Sun in radians
    pub separation: f64,
    pub kind: BestNightKind,
}

/// Acronychal and cosmical rise and set days, `None` when not found within tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcronychalCosmical {
    /// Target rises as the Sun sets
    pub acronychal_rise: Option<usize>,
    /// Target sets as the Sun rises
    pub acronychal_set: Option<usize>,
    /// Target rises with the Sun
    pub cosmical_rise: Option<usize>,
    /// Target sets with the Sun
    pub cosmical_set: Option<usize>,
}

impl AcronychalCosmical {
    pub fn has_acronychal(&self) -> bool {
        self.acronychal_rise.is_some() || self.acronychal_set.is_some()
    }

    pub fn has_cosmical(&self) -> bool {
        self.cosmical_rise.is_some() || self.cosmical_set.is_some()
    }

    /// Two-bit summary: bit 0 acronychal found, bit 1 cosmical found
    pub fn code(&self) -> u8 {
        u8::from(self.has_acronychal()) | (u8::from(self.has_cosmical()) << 1)
    }
}

/// Inclusive range of days of the year.
///
/// When `start_day > end_day` the range runs through December 31st into
/// January.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_day: usize,
    pub end_day: usize,
}

impl DateRange {
    pub fn new(start_day: usize, end_day: usize) -> Self {
        Self { start_day, end_day }
    }

    pub fn wraps_year_end(&self) -> bool {
        self.start_day > self.end_day
    }

    pub fn contains(&self, day: usize) -> bool {
        if self.wraps_year_end() {
            day >= self.start_day || day <= self.end_day
        } else {
            day >= self.start_day && day <= self.end_day
        }
    }

    /// Number of days covered in a year of `n_days`
    pub fn len(&self, n_days: usize) -> usize {
        if self.wraps_year_end() {
            n_days - self.start_day + self.end_day + 1
        } else {
            self.end_day - self.start_day + 1
        }
    }
}

/// Nights on which the target can be seen in the dark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservableNights {
    WholeYear,
    Never,
    Ranges(Vec<DateRange>),
}

/// Result of the whole-year analyses for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualReport {
    pub year: i32,
    pub jan1_jd: f64,
    /// False when the target never culminates above the horizon
    pub observable: bool,
    pub best_night: Option<BestNight>,
    pub acronychal_cosmical: Option<AcronychalCosmical>,
    pub good_nights: Option<ObservableNights>,
}

impl AnnualReport {
    /// Calendar date of a day index of this report's year
    pub fn date_of(&self, day: usize) -> CalendarDate {
        CalendarDate::from_jd(self.jan1_jd + day as f64)
    }
}

/// Whether a target of declination `dec` ever culminates above `horizon` (radians)
pub fn is_never_observable(latitude: f64, dec: f64, horizon: f64) -> bool {
    (latitude - dec).abs() >= FRAC_PI_2 - horizon
}

/// Day of largest separation between the target and the Sun
pub fn best_night(table: &YearlySampleTable, greatest_elongation: bool) -> Option<BestNight> {
    let kind = if greatest_elongation {
        BestNightKind::GreatestElongation
    } else {
        BestNightKind::LargestSunSeparation
    };

    let mut best: Option<BestNight> = None;
    for sample in &table.days {
        let separation = angular_separation(
            sample.object_ra,
            sample.object_dec,
            sample.sun_ra,
            sample.sun_dec,
        );
        if best.map_or(true, |b| separation > b.separation) {
            best = Some(BestNight {
                day: sample.day,
                jd: sample.jd,
                separation,
                kind,
            });
        }
    }
    best
}

/// Closest approach of two crossing times over the year
struct ClosestDay {
    day: Option<usize>,
    gap: f64,
}

impl ClosestDay {
    fn new() -> Self {
        Self {
            day: None,
            gap: 12.0,
        }
    }

    fn offer(&mut self, day: usize, difference: f64) {
        let gap = signed_hours(difference).abs();
        if gap < self.gap {
            self.gap = gap;
            self.day = Some(day);
        }
    }

    fn accepted(&self) -> Option<usize> {
        self.day.filter(|_| self.gap < ACRONYCHAL_TOLERANCE_H)
    }
}

/// Acronychal and cosmical rise and set days.
///
/// Only days on which both the target and the Sun cross the horizon take
/// part. Differences are wrapped to `(-12, 12]` hours before comparing.
pub fn acronychal_cosmical(table: &YearlySampleTable) -> AcronychalCosmical {
    let mut acro_rise = ClosestDay::new();
    let mut acro_set = ClosestDay::new();
    let mut cos_rise = ClosestDay::new();
    let mut cos_set = ClosestDay::new();

    for sample in &table.days {
        let (Some(object_rise), Some(object_set), Some(sun_rise), Some(sun_set)) = (
            sample.object_rise_lst,
            sample.object_set_lst,
            sample.sun_rise_lst,
            sample.sun_set_lst,
        ) else {
            continue;
        };

        acro_rise.offer(sample.day, object_rise - sun_set);
        acro_set.offer(sample.day, object_set - sun_rise);
        cos_rise.offer(sample.day, object_rise - sun_rise);
        cos_set.offer(sample.day, object_set - sun_set);
    }

    AcronychalCosmical {
        acronychal_rise: acro_rise.accepted(),
        acronychal_set: acro_set.accepted(),
        cosmical_rise: cos_rise.accepted(),
        cosmical_set: cos_set.accepted(),
    }
}

/// Sun below twilight all day, and never above the horizon either
pub fn is_polar_night(sample: &YearlySample, latitude: f64) -> bool {
    sample.sun_never_reaches_twilight() && (sample.sun_dec - latitude).abs() >= FRAC_PI_2
}

/// Whether the target is above the horizon at some point of the dark part of the night
pub fn is_up_in_dark_time(sample: &YearlySample, latitude: f64, horizon: f64) -> bool {
    let (Some(morning), Some(evening)) =
        (sample.sun_twilight_morning_lst, sample.sun_twilight_evening_lst)
    else {
        return false;
    };

    let Some(h0) = sample.object_horizon_hour_angle else {
        // Never crosses the horizon: up all night if it culminates above it
        return culmination_altitude(latitude, sample.object_dec) > horizon;
    };

    let end = if morning < evening { morning + 24.0 } else { morning };
    let step = (end - evening) / DARK_TIME_BINS as f64;
    (0..DARK_TIME_BINS).any(|j| {
        let lst = evening + step * j as f64;
        signed_hours(lst - sample.object_ra).abs() < h0
    })
}

/// Per-day good-night flags
pub fn good_night_flags(table: &YearlySampleTable) -> Vec<bool> {
    table
        .days
        .iter()
        .map(|sample| {
            if is_polar_night(sample, table.latitude) {
                (sample.object_dec - table.latitude).abs() < FRAC_PI_2
            } else {
                is_up_in_dark_time(sample, table.latitude, table.horizon_altitude)
            }
        })
        .collect()
}

/// Turn per-day flags into inclusive ranges.
///
/// A run reaching the last day and a run starting on day 0 form a single
/// range across the year end.
pub fn merge_good_night_runs(flags: &[bool]) -> ObservableNights {
    if flags.iter().all(|&good| good) && !flags.is_empty() {
        return ObservableNights::WholeYear;
    }

    let mut ranges = Vec::new();
    let mut start = None;
    for (day, &good) in flags.iter().enumerate() {
        match (good, start) {
            (true, None) => start = Some(day),
            (false, Some(s)) => {
                ranges.push(DateRange::new(s, day - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        ranges.push(DateRange::new(s, flags.len() - 1));
    }

    if ranges.is_empty() {
        return ObservableNights::Never;
    }

    let last_day = flags.len() - 1;
    if ranges.len() > 1 && ranges[0].start_day == 0 {
        if let Some(tail) = ranges.last().copied().filter(|r| r.end_day == last_day) {
            let head = ranges.remove(0);
            if let Some(merged) = ranges.last_mut() {
                *merged = DateRange::new(tail.start_day, head.end_day);
            }
        }
    }

    ObservableNights::Ranges(ranges)
}

/// Good-night ranges of the target
pub fn good_nights(table: &YearlySampleTable) -> ObservableNights {
    merge_good_night_runs(&good_night_flags(table))
}

/// Run the enabled analyses.
///
/// `declination` is the target's current declination, used to decide
/// whether it is observable at all from `table.latitude`.
pub fn analyze_year(
    table: &YearlySampleTable,
    declination: f64,
    greatest_elongation: bool,
    config: &ObservabilityConfig,
) -> AnnualReport {
    let mut report = AnnualReport {
        year: table.year,
        jan1_jd: table.jan1_jd,
        observable: true,
        best_night: None,
        acronychal_cosmical: None,
        good_nights: None,
    };

    if is_never_observable(table.latitude, declination, table.horizon_altitude) {
        report.observable = false;
        if config.show_acronychal_cosmical {
            report.acronychal_cosmical = Some(AcronychalCosmical::default());
        }
        if config.show_good_nights {
            report.good_nights = Some(ObservableNights::Never);
        }
        return report;
    }

    if config.show_best_night {
        report.best_night = best_night(table, greatest_elongation);
    }
    if config.show_acronychal_cosmical {
        report.acronychal_cosmical = Some(acronychal_cosmical(table));
    }
    if config.show_good_nights {
        report.good_nights = Some(good_nights(table));
    }
    report
}
