//! UTC calendar arithmetic for the daily archive.
//!
//! Every day in the archive is keyed by its UTC-noon timestamp. Keeping all
//! day arithmetic at noon avoids midnight boundary surprises when timestamps
//! are compared across services.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::record::DayRecord;

/// The UTC-noon instant of a calendar day, if the date is valid.
pub fn utc_noon(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Normalize any instant to its calendar day's UTC noon.
pub fn noon_of(instant: DateTime<Utc>) -> DateTime<Utc> {
    // Always valid: the y/m/d came from an existing date.
    utc_noon(instant.year(), instant.month(), instant.day()).unwrap()
}

/// A month/day anchor moved to another year.
///
/// Follows the rollover the archive's upstream uses: a Feb 29 anchor lands on
/// Mar 1 in non-leap years.
pub fn month_day_in_year(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    utc_noon(year, month, day).unwrap_or_else(|| {
        // Only Feb 29 can be invalid here.
        utc_noon(year, 3, 1).unwrap()
    })
}

/// ISO 8601 date portion, `YYYY-MM-DD`.
pub fn iso_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// ISO weekday, 1 = Monday .. 7 = Sunday.
pub fn iso_weekday(date: DateTime<Utc>) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Long display label, e.g. `January 5, 2022`.
pub fn long_label(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Month-and-day label, e.g. `December 31`.
pub fn month_day_label(date: DateTime<Utc>) -> String {
    date.format("%B %-d").to_string()
}

/// The inclusive UTC-noon range of one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// Jan 1, UTC noon.
    pub start: DateTime<Utc>,
    /// Dec 31, UTC noon.
    pub end: DateTime<Utc>,
}

impl YearRange {
    pub fn for_year(year: i32) -> Self {
        Self {
            // Jan 1 and Dec 31 exist in every year.
            start: utc_noon(year, 1, 1).unwrap(),
            end: utc_noon(year, 12, 31).unwrap(),
        }
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Complete a sparse day list into a full calendar year.
///
/// Synthesizes forward one day at a time from the last existing record (or
/// from Dec 31 of the prior year when the list is empty) until the range end
/// is reached. Synthesized records carry [`crate::Reading::Missing`] for both
/// readings. Existing records are preserved verbatim and never overwritten,
/// and a list already reaching the range end comes back unchanged, so the
/// operation is idempotent.
pub fn fill_missing_days(
    mut records: Vec<DayRecord>,
    range: &YearRange,
    current_date: DateTime<Utc>,
) -> Vec<DayRecord> {
    let mut day = match records.last() {
        Some(last) => last.date,
        // Jan 1 of the range year is synthesized on the first step.
        None => utc_noon(range.year() - 1, 12, 31).unwrap(),
    };

    while day < range.end {
        day += Duration::days(1);
        records.push(DayRecord::synthetic(day, current_date));
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::Reading;

    #[test]
    fn test_utc_noon() {
        let d = utc_noon(2022, 1, 1).unwrap();
        assert_eq!(d.to_rfc3339(), "2022-01-01T12:00:00+00:00");
        assert!(utc_noon(2022, 2, 29).is_none());
        assert!(utc_noon(2020, 2, 29).is_some());
    }

    #[test]
    fn test_month_day_rollover() {
        // Feb 29 anchor rolls to Mar 1 outside leap years.
        let d = month_day_in_year(2021, 2, 29);
        assert_eq!(iso_date(d), "2021-03-01");
        let d = month_day_in_year(2020, 2, 29);
        assert_eq!(iso_date(d), "2020-02-29");
    }

    #[test]
    fn test_labels_and_weekday() {
        let d = utc_noon(2022, 1, 5).unwrap();
        assert_eq!(iso_date(d), "2022-01-05");
        assert_eq!(long_label(d), "January 5, 2022");
        assert_eq!(month_day_label(d), "January 5");
        // 2022-01-05 was a Wednesday.
        assert_eq!(iso_weekday(d), 3);
    }

    #[test]
    fn test_fill_empty_regular_year() {
        let range = YearRange::for_year(2022);
        let current = utc_noon(2022, 1, 1).unwrap();
        let records = fill_missing_days(Vec::new(), &range, current);

        assert_eq!(records.len(), 365);
        assert_eq!(records.first().unwrap().iso_date, "2022-01-01");
        assert_eq!(records.last().unwrap().iso_date, "2022-12-31");
        assert!(records
            .iter()
            .all(|r| r.temperature == Reading::Missing && r.anomaly == Reading::Missing));
        // Current date Jan 1: the first synthesized record is "today".
        assert_eq!(records.first().unwrap().diff_from_current_ms, 0);
    }

    #[test]
    fn test_fill_empty_leap_year() {
        let range = YearRange::for_year(2020);
        let current = utc_noon(2020, 6, 1).unwrap();
        let records = fill_missing_days(Vec::new(), &range, current);
        assert_eq!(records.len(), 366);
    }

    #[test]
    fn test_fill_preserves_existing() {
        let range = YearRange::for_year(2022);
        let current = utc_noon(2022, 3, 1).unwrap();
        let existing = vec![
            DayRecord::new(
                utc_noon(2022, 1, 1).unwrap(),
                current,
                Reading::Value(24.0),
                Reading::Value(0.2),
            ),
            DayRecord::new(
                utc_noon(2022, 1, 2).unwrap(),
                current,
                Reading::NoData,
                Reading::NoData,
            ),
        ];

        let records = fill_missing_days(existing, &range, current);
        assert_eq!(records.len(), 365);
        assert_eq!(records[0].temperature, Reading::Value(24.0));
        assert_eq!(records[1].temperature, Reading::NoData);
        assert_eq!(records[2].temperature, Reading::Missing);
    }

    #[test]
    fn test_fill_is_idempotent() {
        let range = YearRange::for_year(2022);
        let current = utc_noon(2022, 12, 31).unwrap();
        let once = fill_missing_days(Vec::new(), &range, current);
        let twice = fill_missing_days(once.clone(), &range, current);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fill_year_end_matches_current_date() {
        // Current date at year end: the final synthesized record is "today".
        let range = YearRange::for_year(2022);
        let current = utc_noon(2022, 12, 31).unwrap();
        let records = fill_missing_days(Vec::new(), &range, current);
        assert_eq!(records.len(), 365);
        assert_eq!(records.last().unwrap().diff_from_current_ms, 0);
    }
}
