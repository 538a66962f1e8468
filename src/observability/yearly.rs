//! Day-by-day positions of the Sun and the target over a calendar year
//!
//! One [`YearlySample`] per day at 0h UT. Besides the raw coordinates each
//! record holds the local sidereal times at which the Sun and the target
//! cross the reference altitudes, which is what the annual analyses
//! compare. The table is always rebuilt as a whole.

use crate::constants::TWILIGHT_HOUR_ANGLE_FACTOR;
use crate::coordinates::angle::{hour_angle_from_altitude, to_unsigned_ra};
use crate::planetlib::{apparent_place, Body, Ephemeris};
use crate::time::{days_in_year, jan1_jd};
use crate::toposlib::GeographicLocation;
use crate::Result;
use log::debug;
use serde::{Deserialize, Serialize};

/// Positions and crossing times for one day.
///
/// Right ascensions and sidereal times are in hours, declinations in
/// radians. Crossing times are `None` when the altitude is never reached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YearlySample {
    /// Day of the year, 0 for January 1st
    pub day: usize,
    pub jd: f64,
    pub sun_ra: f64,
    pub sun_dec: f64,
    pub object_ra: f64,
    pub object_dec: f64,
    /// Hour angle of the target at the horizon
    pub object_horizon_hour_angle: Option<f64>,
    pub object_rise_lst: Option<f64>,
    pub object_set_lst: Option<f64>,
    /// End of morning twilight
    pub sun_twilight_morning_lst: Option<f64>,
    /// Start of evening darkness
    pub sun_twilight_evening_lst: Option<f64>,
    pub sun_rise_lst: Option<f64>,
    pub sun_set_lst: Option<f64>,
}

impl YearlySample {
    /// Whether the Sun never gets as low as the twilight altitude on this day
    pub fn sun_never_reaches_twilight(&self) -> bool {
        self.sun_twilight_morning_lst.is_none() || self.sun_twilight_evening_lst.is_none()
    }
}

/// Samples for every day of one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySampleTable {
    pub year: i32,
    pub jan1_jd: f64,
    /// Observer latitude in radians
    pub latitude: f64,
    /// Effective horizon altitude in radians
    pub horizon_altitude: f64,
    /// Twilight altitude in radians
    pub twilight_altitude: f64,
    pub days: Vec<YearlySample>,
}

impl YearlySampleTable {
    /// Sample the Sun for every day of `year`.
    ///
    /// The target columns are left empty until [`set_fixed_target`] or
    /// [`sample_moving_target`] fills them.
    ///
    /// [`set_fixed_target`]: Self::set_fixed_target
    /// [`sample_moving_target`]: Self::sample_moving_target
    pub fn sample(
        year: i32,
        ephemeris: &dyn Ephemeris,
        location: &GeographicLocation,
        horizon_altitude: f64,
        twilight_altitude: f64,
    ) -> Result<Self> {
        let jan1 = jan1_jd(year);
        let n_days = days_in_year(year);
        debug!("sampling the Sun over {} ({} days)", year, n_days);

        let days = (0..n_days)
            .map(|day| {
                let jd = jan1 + day as f64;
                let sun = apparent_place(ephemeris, Body::Sun, jd, None)?;
                Ok(YearlySample {
                    day,
                    jd,
                    sun_ra: sun.ra,
                    sun_dec: sun.dec,
                    ..YearlySample::default()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut table = Self {
            year,
            jan1_jd: jan1,
            latitude: location.latitude,
            horizon_altitude,
            twilight_altitude,
            days,
        };
        table.refresh_sun_hour_angles(location.latitude, twilight_altitude, horizon_altitude);
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Recompute the Sun's crossing times for a new latitude or new altitudes.
    ///
    /// Twilight times are stretched by the sidereal-to-solar ratio; the
    /// target's crossing times are refreshed as well.
    pub fn refresh_sun_hour_angles(
        &mut self,
        latitude: f64,
        twilight_altitude: f64,
        horizon_altitude: f64,
    ) {
        self.latitude = latitude;
        self.twilight_altitude = twilight_altitude;
        self.horizon_altitude = horizon_altitude;

        for sample in &mut self.days {
            match hour_angle_from_altitude(latitude, twilight_altitude, sample.sun_dec) {
                Some(h) => {
                    let h = h * TWILIGHT_HOUR_ANGLE_FACTOR;
                    sample.sun_twilight_morning_lst = Some(to_unsigned_ra(sample.sun_ra - h));
                    sample.sun_twilight_evening_lst = Some(to_unsigned_ra(sample.sun_ra + h));
                }
                None => {
                    sample.sun_twilight_morning_lst = None;
                    sample.sun_twilight_evening_lst = None;
                }
            }

            match hour_angle_from_altitude(latitude, horizon_altitude, sample.sun_dec) {
                Some(h) => {
                    sample.sun_rise_lst = Some(to_unsigned_ra(sample.sun_ra - h));
                    sample.sun_set_lst = Some(to_unsigned_ra(sample.sun_ra + h));
                }
                None => {
                    sample.sun_rise_lst = None;
                    sample.sun_set_lst = None;
                }
            }
        }

        self.refresh_object_hour_angles();
    }

    /// Fill the target columns with a position fixed on the sky
    pub fn set_fixed_target(&mut self, ra_hours: f64, dec: f64) {
        let ra = to_unsigned_ra(ra_hours);
        for sample in &mut self.days {
            sample.object_ra = ra;
            sample.object_dec = dec;
        }
        self.refresh_object_hour_angles();
    }

    /// Fill the target columns with the geocentric position of `body` on each day
    pub fn sample_moving_target(&mut self, body: Body, ephemeris: &dyn Ephemeris) -> Result<()> {
        debug!("sampling {} over {}", body.name(), self.year);
        for sample in &mut self.days {
            let place = apparent_place(ephemeris, body, sample.jd, None)?;
            sample.object_ra = place.ra;
            sample.object_dec = place.dec;
        }
        self.refresh_object_hour_angles();
        Ok(())
    }

    fn refresh_object_hour_angles(&mut self) {
        let latitude = self.latitude;
        let horizon = self.horizon_altitude;
        for sample in &mut self.days {
            let h0 = hour_angle_from_altitude(latitude, horizon, sample.object_dec);
            sample.object_horizon_hour_angle = h0;
            sample.object_rise_lst = h0.map(|h| to_unsigned_ra(sample.object_ra - h));
            sample.object_set_lst = h0.map(|h| to_unsigned_ra(sample.object_ra + h));
        }
    }
}
