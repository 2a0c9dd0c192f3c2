//! Resolving the archive's valid time domain from raster metadata.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A variable's time dimension as exposed by the raster metadata provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeDimension {
    /// Dimension name, e.g. `StdTime`.
    pub name: String,
    /// `[start, end]` in ms since epoch, sorted.
    pub extent: [i64; 2],
    /// Every valid sample timestamp in ms since epoch, sorted ascending.
    pub values: Vec<i64>,
}

/// Capability: raster metadata lookup for a logical variable name.
///
/// Implemented by the imagery-service collaborator; the pipeline only reads
/// the time dimension through it.
pub trait RasterMetadata {
    fn time_dimension(&self, variable: &str) -> Option<TimeDimension>;
}

#[derive(Debug, Error)]
pub enum DomainResolutionError {
    /// The named variable has no time dimension in the service metadata.
    #[error("no time dimension found for variable '{0}'")]
    DimensionNotFound(String),

    /// The dimension's extent is not a valid ordered millisecond pair.
    #[error("invalid time extent [{0}, {1}] for variable '{2}'")]
    InvalidExtent(i64, i64, String),
}

/// The archive's full valid date range and timestamp set.
///
/// Resolved once at load time and shared read-only for the session; `end` is
/// the most recent available day and seeds the default current date.
#[derive(Debug, Clone)]
pub struct TimeDomain {
    /// Name of the time dimension, propagated into every sampling selector.
    pub dimension_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    valid_timestamps: BTreeSet<i64>,
}

impl TimeDomain {
    /// Is `ts` (ms since epoch) one of the archive's sample timestamps?
    pub fn contains(&self, ts: i64) -> bool {
        self.valid_timestamps.contains(&ts)
    }

    /// Is the instant a valid sample day?
    pub fn contains_date(&self, date: DateTime<Utc>) -> bool {
        self.contains(date.timestamp_millis())
    }

    pub fn timestamp_count(&self) -> usize {
        self.valid_timestamps.len()
    }

    /// First/last archive years, for yearly series requests.
    pub fn years_extent(&self) -> YearsExtent {
        YearsExtent {
            start_year: self.start.year(),
            end_year: self.end.year(),
        }
    }
}

/// The archive's year span, derived once from the time domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearsExtent {
    pub start_year: i32,
    pub end_year: i32,
}

impl YearsExtent {
    pub fn clamp_year(&self, year: i32) -> i32 {
        year.clamp(self.start_year, self.end_year)
    }
}

/// Resolve the archive's time domain from the metadata of `variable`.
pub fn resolve_time_domain(
    metadata: &dyn RasterMetadata,
    variable: &str,
) -> Result<TimeDomain, DomainResolutionError> {
    let dimension = metadata
        .time_dimension(variable)
        .ok_or_else(|| DomainResolutionError::DimensionNotFound(variable.to_string()))?;

    let [start_ms, end_ms] = dimension.extent;
    let (start, end) = match (
        Utc.timestamp_millis_opt(start_ms).single(),
        Utc.timestamp_millis_opt(end_ms).single(),
    ) {
        (Some(s), Some(e)) if s <= e => (s, e),
        _ => {
            return Err(DomainResolutionError::InvalidExtent(
                start_ms,
                end_ms,
                variable.to_string(),
            ))
        }
    };

    tracing::info!(
        variable,
        dimension = %dimension.name,
        start = %start,
        end = %end,
        timestamps = dimension.values.len(),
        "resolved archive time domain"
    );

    Ok(TimeDomain {
        dimension_name: dimension.name,
        start,
        end,
        valid_timestamps: dimension.values.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::utc_noon;

    struct FakeMetadata {
        dimension: Option<TimeDimension>,
    }

    impl RasterMetadata for FakeMetadata {
        fn time_dimension(&self, _variable: &str) -> Option<TimeDimension> {
            self.dimension.clone()
        }
    }

    fn day_ms(year: i32, month: u32, day: u32) -> i64 {
        utc_noon(year, month, day).unwrap().timestamp_millis()
    }

    #[test]
    fn test_resolve() {
        let start = day_ms(1985, 1, 1);
        let end = day_ms(2023, 12, 31);
        let metadata = FakeMetadata {
            dimension: Some(TimeDimension {
                name: "StdTime".to_string(),
                extent: [start, end],
                values: vec![start, day_ms(1985, 1, 2), end],
            }),
        };

        let domain = resolve_time_domain(&metadata, "sst").unwrap();
        assert_eq!(domain.dimension_name, "StdTime");
        assert_eq!(domain.start, utc_noon(1985, 1, 1).unwrap());
        assert_eq!(domain.end, utc_noon(2023, 12, 31).unwrap());
        assert!(domain.contains(start));
        assert!(!domain.contains(day_ms(1985, 1, 3)));
        assert_eq!(
            domain.years_extent(),
            YearsExtent {
                start_year: 1985,
                end_year: 2023
            }
        );
    }

    #[test]
    fn test_missing_dimension() {
        let metadata = FakeMetadata { dimension: None };
        let err = resolve_time_domain(&metadata, "sst").unwrap_err();
        assert!(matches!(err, DomainResolutionError::DimensionNotFound(v) if v == "sst"));
    }

    #[test]
    fn test_inverted_extent() {
        let metadata = FakeMetadata {
            dimension: Some(TimeDimension {
                name: "StdTime".to_string(),
                extent: [day_ms(2023, 1, 1), day_ms(1985, 1, 1)],
                values: Vec::new(),
            }),
        };
        let err = resolve_time_domain(&metadata, "sst").unwrap_err();
        assert!(matches!(err, DomainResolutionError::InvalidExtent(..)));
    }

    #[test]
    fn test_clamp_year() {
        let extent = YearsExtent {
            start_year: 1985,
            end_year: 2023,
        };
        assert_eq!(extent.clamp_year(1960), 1985);
        assert_eq!(extent.clamp_year(2024), 2023);
        assert_eq!(extent.clamp_year(2000), 2000);
    }
}
