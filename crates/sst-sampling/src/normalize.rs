//! Normalizing raw service responses into canonical day records.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{Result, SamplingError};
use crate::service::RawSample;
use sst_common::{DayRecord, Reading};

/// Turn one raw response into an ordered list of [`DayRecord`]s.
///
/// Sample order is preserved as returned; nothing is dropped and nothing is
/// fabricated (gap filling is a separate, explicit step the caller applies
/// to daily series only). A raw field that is empty, absent, or
/// unparseable becomes `NoData`.
pub fn day_records(
    samples: &[RawSample],
    primary_field: &str,
    anomaly_field: &str,
    current_date: DateTime<Utc>,
) -> Result<Vec<DayRecord>> {
    samples
        .iter()
        .map(|sample| {
            let date = Utc
                .timestamp_millis_opt(sample.timestamp)
                .single()
                .ok_or_else(|| {
                    SamplingError::response(format!(
                        "sample timestamp {} out of range",
                        sample.timestamp
                    ))
                })?;

            Ok(DayRecord::new(
                date,
                current_date,
                Reading::from_raw_field(sample.raw_field(primary_field)),
                Reading::from_raw_field(sample.raw_field(anomaly_field)),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sst_common::calendar::utc_noon;

    fn ms(year: i32, month: u32, day: u32) -> i64 {
        utc_noon(year, month, day).unwrap().timestamp_millis()
    }

    #[test]
    fn test_normalization() {
        let current = utc_noon(2022, 1, 2).unwrap();
        let samples = vec![
            RawSample::new(ms(2022, 1, 1))
                .with_value("sst", "24.31")
                .with_value("ssta", "-0.12"),
            RawSample::new(ms(2022, 1, 2))
                .with_value("sst", "")
                .with_value("ssta", ""),
            RawSample::new(ms(2022, 1, 3)).with_value("sst", "24.55"),
        ];

        let records = day_records(&samples, "sst", "ssta", current).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].temperature, Reading::Value(24.31));
        assert_eq!(records[0].anomaly, Reading::Value(-0.12));
        assert_eq!(records[0].iso_date, "2022-01-01");

        // Empty field: sampled but nothing recorded.
        assert_eq!(records[1].temperature, Reading::NoData);
        assert!(records[1].is_current());

        // Absent field normalizes the same way.
        assert_eq!(records[2].anomaly, Reading::NoData);
        assert_eq!(records[2].temperature, Reading::Value(24.55));
    }

    #[test]
    fn test_no_data_is_not_missing() {
        let current = utc_noon(2022, 1, 1).unwrap();
        let samples = vec![RawSample::new(ms(2022, 1, 1)).with_value("sst", "")];
        let records = day_records(&samples, "sst", "ssta", current).unwrap();
        assert!(records[0].temperature.is_no_data());
        assert!(!records[0].temperature.is_missing());
    }

    #[test]
    fn test_order_preserved() {
        let current = utc_noon(2023, 12, 31).unwrap();
        let samples: Vec<RawSample> = (1985..=2023)
            .map(|year| RawSample::new(ms(year, 12, 31)).with_value("sst", "20.0"))
            .collect();

        let records = day_records(&samples, "sst", "ssta", current).unwrap();
        assert_eq!(records.len(), 39);
        assert!(records.windows(2).all(|w| w[0].year <= w[1].year));
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let current = utc_noon(2022, 1, 1).unwrap();
        let samples = vec![RawSample::new(i64::MAX)];
        assert!(matches!(
            day_records(&samples, "sst", "ssta", current),
            Err(SamplingError::Response(_))
        ));
    }
}
