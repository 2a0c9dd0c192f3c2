//! Three-valued sentinel semantics for per-day readings.
//!
//! A reading is always one of three states, and the distinction between the
//! first two is load-bearing:
//!
//! - [`Reading::Missing`] — nothing was ever requested or returned for the
//!   day; the record is a synthetic gap-filled placeholder.
//! - [`Reading::NoData`] — the sampling service returned the day but the
//!   sensor recorded nothing (empty raw field).
//! - [`Reading::Value`] — a real finite measurement in °C.
//!
//! Consumers must branch on the variant before treating the number as a
//! measurement; `Missing` and `NoData` render differently and are never
//! interchanged.

use serde::{Deserialize, Serialize};

/// A temperature or anomaly reading with sentinel states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    /// Synthetic gap-filled day; no sample was requested or returned.
    Missing,
    /// The service returned the day but carried no sensor value.
    NoData,
    /// A finite measurement in °C.
    Value(f64),
}

impl Reading {
    /// Parse a raw sample field.
    ///
    /// An absent or empty field means the sensor recorded nothing for the
    /// day; a non-empty field that fails to parse is treated the same way.
    pub fn from_raw_field(raw: Option<&str>) -> Self {
        match raw {
            None => Reading::NoData,
            Some(s) if s.is_empty() => Reading::NoData,
            Some(s) => match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Reading::Value(v),
                _ => Reading::NoData,
            },
        }
    }

    /// True only for a real measurement.
    pub fn is_value(&self) -> bool {
        matches!(self, Reading::Value(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Reading::NoData)
    }

    /// The measurement, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Encode for chart collaborators that expect a bare float series.
    ///
    /// `Missing` maps to negative infinity and `NoData` to NaN, so the two
    /// sentinel states stay distinguishable after encoding.
    pub fn to_chart_value(&self) -> f64 {
        match self {
            Reading::Missing => f64::NEG_INFINITY,
            Reading::NoData => f64::NAN,
            Reading::Value(v) => *v,
        }
    }

    /// Display label for markers and tooltips: `"23.4° C"` or `"No Data"`.
    pub fn format_celsius(&self) -> String {
        match self {
            Reading::Value(v) => format!("{v:.1}° C"),
            Reading::Missing | Reading::NoData => "No Data".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field_is_no_data() {
        assert_eq!(Reading::from_raw_field(Some("")), Reading::NoData);
        assert_eq!(Reading::from_raw_field(None), Reading::NoData);
    }

    #[test]
    fn test_unparseable_field_is_no_data() {
        assert_eq!(Reading::from_raw_field(Some("n/a")), Reading::NoData);
        assert_eq!(Reading::from_raw_field(Some("NaN")), Reading::NoData);
    }

    #[test]
    fn test_numeric_field_parses() {
        assert_eq!(Reading::from_raw_field(Some("28.63")), Reading::Value(28.63));
        assert_eq!(Reading::from_raw_field(Some("-1.8")), Reading::Value(-1.8));
    }

    #[test]
    fn test_sentinels_never_conflated() {
        // A gap-filled day and a sampled-but-empty day are different states
        // and encode to different floats.
        assert_ne!(Reading::Missing, Reading::NoData);
        assert_eq!(Reading::Missing.to_chart_value(), f64::NEG_INFINITY);
        assert!(Reading::NoData.to_chart_value().is_nan());
    }

    #[test]
    fn test_format() {
        assert_eq!(Reading::Value(28.63).format_celsius(), "28.6° C");
        assert_eq!(Reading::NoData.format_celsius(), "No Data");
        assert_eq!(Reading::Missing.format_celsius(), "No Data");
    }
}
