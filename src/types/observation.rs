//! Defines the records produced by the forecast extractor and consumed by the chart renderer.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Serialize;

/// One forecasted time slot as read from the forecast page.
///
/// Every field is required; a slot missing any of them is rejected during
/// extraction rather than stored as a partial record.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Observation {
    /// Forecast time, anchored to a calendar date after day-rollover normalization.
    pub time: NaiveDateTime,
    /// Temperature in degrees Celsius.
    pub temperature: i32,
    /// Chance of precipitation in percent (0-100).
    pub precipitation_chance: u32,
    /// Relative humidity in percent (0-100).
    pub humidity: u32,
    /// Pressure in tenths of a millibar, as encoded on the page.
    pub pressure: u32,
}

impl Observation {
    /// Pressure in millibars, as plotted on the chart.
    pub fn pressure_mb(&self) -> f64 {
        f64::from(self.pressure) / 10.0
    }
}

/// All observations gathered from one page fetch, in page order, plus the
/// moment the data was collected.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct ForecastCollection {
    pub observations: Vec<Observation>,
    /// Unix timestamp (seconds) of the extraction.
    pub collected_at: i64,
}

impl ForecastCollection {
    pub fn new(observations: Vec<Observation>, collected_at: i64) -> Self {
        Self {
            observations,
            collected_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// `collected_at` in the local time zone, or `None` when the timestamp is out of range.
    pub fn collected_at_local(&self) -> Option<DateTime<Local>> {
        Local.timestamp_opt(self.collected_at, 0).single()
    }
}
