//! Canonical per-day and per-profile-point records.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::sentinel::Reading;

/// Which visualized variable a consumer is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Temperature,
    Anomaly,
}

impl Variable {
    /// Display label used in summary strings.
    pub fn label(&self) -> &'static str {
        match self {
            Variable::Temperature => "Temperature",
            Variable::Anomaly => "Anomaly",
        }
    }
}

/// One calendar day at a location.
///
/// Exactly one record exists per calendar day within a requested range.
/// `diff_from_current_ms` is the absolute distance to the pipeline's current
/// date; the record matching "today" has `diff_from_current_ms == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// `YYYY-MM-DD`.
    pub iso_date: String,
    /// ISO weekday, 1 = Monday .. 7 = Sunday.
    pub iso_weekday: u8,
    /// The day's UTC-noon instant.
    pub date: DateTime<Utc>,
    pub year: i32,
    /// Long display label, e.g. `January 5, 2022`.
    pub label: String,
    /// `|current_date - date|` in milliseconds.
    pub diff_from_current_ms: i64,
    pub temperature: Reading,
    pub anomaly: Reading,
}

impl DayRecord {
    /// Build a record for `date` against the pipeline's current date.
    pub fn new(
        date: DateTime<Utc>,
        current_date: DateTime<Utc>,
        temperature: Reading,
        anomaly: Reading,
    ) -> Self {
        Self {
            iso_date: calendar::iso_date(date),
            iso_weekday: calendar::iso_weekday(date),
            date,
            year: date.year(),
            label: calendar::long_label(date),
            diff_from_current_ms: (current_date - date).num_milliseconds().abs(),
            temperature,
            anomaly,
        }
    }

    /// A gap-filled placeholder day; both readings are `Missing`.
    pub fn synthetic(date: DateTime<Utc>, current_date: DateTime<Utc>) -> Self {
        Self::new(date, current_date, Reading::Missing, Reading::Missing)
    }

    /// The reading for the requested variable.
    pub fn reading(&self, variable: Variable) -> Reading {
        match variable {
            Variable::Temperature => self.temperature,
            Variable::Anomaly => self.anomaly,
        }
    }

    /// True for the record matching the pipeline's current date.
    pub fn is_current(&self) -> bool {
        self.diff_from_current_ms == 0
    }
}

/// One point along a sketched profile line.
///
/// `distance_km` is measured from the path's first vertex; a profile's
/// samples are sorted ascending by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    /// Position of the raw sample in the service response.
    pub index: usize,
    pub day: DayRecord,
    pub longitude: f64,
    pub latitude: f64,
    pub distance_km: f64,
}
