//! Solar position for a timezone-aware instant.
//!
//! Azimuth and altitude come from the NREL Solar Position Algorithm as
//! implemented by the `solar-positioning` crate. Atmospheric refraction is
//! not applied, so altitude is the geometric elevation of the sun's centre.
//!
//! Sunrise and sunset for display use the `sunrise` crate and never feed
//! into a verdict.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate};
use chrono_tz::Tz;
use solar_positioning::{spa, time::DeltaT};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::constants::{DEFAULT_OBSERVER_ELEVATION, FALLBACK_DELTA_T};

/// Where the sun is, as seen from the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Degrees clockwise from true north, `[0, 360)`
    pub azimuth: f64,
    /// Degrees above the horizon, negative below
    pub altitude: f64,
}

/// Computes the sun's position for a coordinate and instant.
#[cfg_attr(test, mockall::automock)]
pub trait SolarPositionCalculator {
    /// `instant` is already localized to the coordinate's timezone.
    fn position(&self, latitude: f64, longitude: f64, instant: &DateTime<Tz>)
    -> Result<SolarPosition>;
}

/// [`SolarPositionCalculator`] backed by the SPA algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaCalculator {
    /// Observer height above sea level, metres
    pub elevation: f64,
    /// Fixed ΔT (TT - UT1) in seconds; estimated per date when `None`
    pub delta_t: Option<f64>,
}

impl Default for SpaCalculator {
    fn default() -> Self {
        Self {
            elevation: DEFAULT_OBSERVER_ELEVATION,
            delta_t: None,
        }
    }
}

impl SpaCalculator {
    pub fn new(elevation: f64, delta_t: Option<f64>) -> Self {
        Self { elevation, delta_t }
    }

    /// ΔT for the instant's UTC year and month.
    fn delta_t_for(&self, instant: &DateTime<Tz>) -> f64 {
        self.delta_t.unwrap_or_else(|| {
            let utc = instant.naive_utc();
            DeltaT::estimate_from_date(utc.year(), utc.month()).unwrap_or(FALLBACK_DELTA_T)
        })
    }
}

impl SolarPositionCalculator for SpaCalculator {
    fn position(
        &self,
        latitude: f64,
        longitude: f64,
        instant: &DateTime<Tz>,
    ) -> Result<SolarPosition> {
        let delta_t = self.delta_t_for(instant);

        let position = spa::solar_position(
            *instant,
            latitude,
            longitude,
            self.elevation,
            delta_t,
            None,
        )
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| {
            format!(
                "SPA failed for ({:.4}, {:.4}) at {}",
                latitude,
                longitude,
                instant.to_rfc3339()
            )
        })?;

        Ok(SolarPosition {
            azimuth: position.azimuth(),
            altitude: position.elevation_angle(),
        })
    }
}

/// Sunrise and sunset on `date`, expressed in `timezone`.
///
/// Used for debug output only.
pub fn sun_times_for_display(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
    timezone: &Tz,
) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
    let coord = Coordinates::new(latitude, longitude)
        .ok_or_else(|| anyhow::anyhow!("Invalid coordinates ({}, {})", latitude, longitude))?;
    let solar_day = SolarDay::new(coord, date);

    let sunrise = solar_day
        .event_time(SolarEvent::Sunrise)
        .with_timezone(timezone);
    let sunset = solar_day
        .event_time(SolarEvent::Sunset)
        .with_timezone(timezone);

    Ok((sunrise, sunset))
}
