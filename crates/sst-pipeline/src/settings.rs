//! Session settings mutated by the update coordinator.

use chrono::{DateTime, Datelike, Utc};

use sst_common::calendar::{month_day_in_year, noon_of, YearRange};
use sst_common::{TimeDomain, YearsExtent};
use sst_sampling::SampleWindow;

/// The pipeline's per-session mutable state: which day and year the user is
/// looking at, inside the archive's fixed year span.
///
/// Only the coordinator mutates this; everything else reads snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub years_extent: YearsExtent,
    /// Currently selected day, always UTC noon.
    pub current_date: DateTime<Utc>,
    pub current_year: i32,
    /// Jan 1 .. Dec 31 of `current_year`.
    pub current_year_range: YearRange,
}

impl Settings {
    /// Seed from a resolved time domain: the most recent available day
    /// becomes the current date.
    pub fn from_time_domain(domain: &TimeDomain) -> Self {
        let current_date = noon_of(domain.end);
        Self {
            years_extent: domain.years_extent(),
            current_date,
            current_year: current_date.year(),
            current_year_range: YearRange::for_year(current_date.year()),
        }
    }

    /// Select a day; the year and year range follow.
    pub fn set_day(&mut self, day: DateTime<Utc>) {
        self.current_date = noon_of(day);
        self.current_year = self.current_date.year();
        self.refresh_year_range();
    }

    /// Select a year, clamped into the archive's span; the current date
    /// keeps its month/day (Feb 29 rolls to Mar 1 outside leap years).
    pub fn set_year(&mut self, year: i32) {
        let year = self.years_extent.clamp_year(year);
        self.current_year = year;
        self.current_date =
            month_day_in_year(year, self.current_date.month(), self.current_date.day());
        self.refresh_year_range();
    }

    /// Recompute the year range from the current year.
    pub fn refresh_year_range(&mut self) {
        self.current_year_range = YearRange::for_year(self.current_year);
    }

    /// Snapshot for a fetch.
    pub fn window(&self) -> SampleWindow {
        SampleWindow {
            years_extent: self.years_extent,
            current_date: self.current_date,
            year_range: self.current_year_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sst_common::calendar::{iso_date, utc_noon};
    use sst_common::time_domain::{resolve_time_domain, RasterMetadata, TimeDimension};

    struct Meta;
    impl RasterMetadata for Meta {
        fn time_dimension(&self, _variable: &str) -> Option<TimeDimension> {
            let start = utc_noon(1985, 1, 1).unwrap().timestamp_millis();
            let end = utc_noon(2023, 9, 14).unwrap().timestamp_millis();
            Some(TimeDimension {
                name: "StdTime".to_string(),
                extent: [start, end],
                values: vec![start, end],
            })
        }
    }

    fn settings() -> Settings {
        let domain = resolve_time_domain(&Meta, "sst").unwrap();
        Settings::from_time_domain(&domain)
    }

    #[test]
    fn test_seeded_from_domain_end() {
        let s = settings();
        assert_eq!(iso_date(s.current_date), "2023-09-14");
        assert_eq!(s.current_year, 2023);
        assert_eq!(s.current_year_range, YearRange::for_year(2023));
    }

    #[test]
    fn test_set_day_normalizes_to_noon() {
        let mut s = settings();
        let late_evening = utc_noon(2001, 5, 20).unwrap() + chrono::Duration::hours(9);
        s.set_day(late_evening);
        assert_eq!(iso_date(s.current_date), "2001-05-20");
        assert_eq!(s.current_date, utc_noon(2001, 5, 20).unwrap());
        assert_eq!(s.current_year, 2001);
        assert_eq!(s.current_year_range, YearRange::for_year(2001));
    }

    #[test]
    fn test_set_year_keeps_month_day() {
        let mut s = settings();
        s.set_day(utc_noon(2023, 9, 14).unwrap());
        s.set_year(1999);
        assert_eq!(iso_date(s.current_date), "1999-09-14");
    }

    #[test]
    fn test_set_year_clamps() {
        let mut s = settings();
        s.set_year(1960);
        assert_eq!(s.current_year, 1985);
        s.set_year(2050);
        assert_eq!(s.current_year, 2023);
    }

    #[test]
    fn test_set_year_feb_29_rolls_over() {
        let mut s = settings();
        s.set_day(utc_noon(2020, 2, 29).unwrap());
        s.set_year(2021);
        assert_eq!(iso_date(s.current_date), "2021-03-01");
    }
}
