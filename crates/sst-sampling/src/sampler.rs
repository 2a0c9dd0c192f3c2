//! High-level fetch façade over the sampling service.
//!
//! `Sampler` is the recommended interface for the update coordinator: it
//! owns the variable names, the effective time-dimension name and the
//! request shape details, and exposes the three fetches the pipeline needs
//! (yearly series, daily series, distance profile).

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::geodesic::Geodesic;
use crate::normalize;
use crate::profile;
use crate::request::{
    DimensionSlice, Geometry, PixelSize, SampleRequest, TimeSelector,
};
use crate::service::SampleService;
use sst_common::calendar::{month_day_in_year, YearRange};
use sst_common::{DayRecord, LonLat, ProfileSample, YearsExtent};

/// Default sample count along a profile line.
pub const DEFAULT_PROFILE_SAMPLE_COUNT: usize = 50;

/// The temporal window a fetch runs against; a snapshot of the pipeline's
/// settings at trigger time.
#[derive(Debug, Clone, Copy)]
pub struct SampleWindow {
    pub years_extent: YearsExtent,
    /// The currently selected day, UTC noon.
    pub current_date: DateTime<Utc>,
    /// Jan 1 .. Dec 31 of the currently selected year.
    pub year_range: YearRange,
}

/// High-level sampling façade.
pub struct Sampler {
    service: Arc<dyn SampleService>,
    primary_variable: String,
    anomaly_variable: String,
    /// Effective time-dimension name, shared by both variables' selectors
    /// (see [`crate::request::resolve_dimension_name`]).
    dimension_name: String,
    pixel_size: Option<PixelSize>,
    profile_sample_count: usize,
}

impl Sampler {
    pub fn new(
        service: Arc<dyn SampleService>,
        primary_variable: impl Into<String>,
        anomaly_variable: impl Into<String>,
        dimension_name: impl Into<String>,
    ) -> Self {
        Self {
            service,
            primary_variable: primary_variable.into(),
            anomaly_variable: anomaly_variable.into(),
            dimension_name: dimension_name.into(),
            pixel_size: None,
            profile_sample_count: DEFAULT_PROFILE_SAMPLE_COUNT,
        }
    }

    /// Forward the raster's native pixel size with every request.
    pub fn with_pixel_size(mut self, pixel_size: PixelSize) -> Self {
        self.pixel_size = Some(pixel_size);
        self
    }

    pub fn with_profile_sample_count(mut self, count: usize) -> Self {
        self.profile_sample_count = count;
        self
    }

    fn out_fields(&self) -> Vec<String> {
        vec![self.primary_variable.clone(), self.anomaly_variable.clone()]
    }

    /// Per-variable slice selectors over the shared time dimension.
    fn slice_selector(&self, timestamps: Vec<i64>) -> TimeSelector {
        TimeSelector::Slices {
            definition: vec![
                DimensionSlice::slices(
                    self.primary_variable.clone(),
                    self.dimension_name.clone(),
                    timestamps.clone(),
                ),
                DimensionSlice::slices(
                    self.anomaly_variable.clone(),
                    self.dimension_name.clone(),
                    timestamps,
                ),
            ],
        }
    }

    /// One sample per archive year at the current date's month/day.
    ///
    /// Resolves `Ok(None)` when `cancel` fired before the response landed;
    /// the caller must discard, never render, a `None`.
    pub async fn yearly_series(
        &self,
        location: LonLat,
        window: &SampleWindow,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<DayRecord>>> {
        let (month, day) = (window.current_date.month(), window.current_date.day());
        let slices: Vec<i64> = (window.years_extent.start_year..=window.years_extent.end_year)
            .map(|year| month_day_in_year(year, month, day).timestamp_millis())
            .collect();

        tracing::debug!(
            lon = location.lon,
            lat = location.lat,
            years = slices.len(),
            "requesting yearly series"
        );

        let request = SampleRequest::new(
            Geometry::point(location),
            self.out_fields(),
            self.slice_selector(slices),
        )
        .with_pixel_size(self.pixel_size);

        let samples = self.service.get_samples(&request, cancel).await?;
        if cancel.is_cancelled() {
            tracing::debug!("yearly fetch cancelled, discarding response");
            return Ok(None);
        }

        normalize::day_records(
            &samples,
            &self.primary_variable,
            &self.anomaly_variable,
            window.current_date,
        )
        .map(Some)
    }

    /// Every native-cadence sample across the current year.
    ///
    /// The result may stop short of Dec 31 near the archive's live edge;
    /// completing it is the caller's explicit gap-filling step.
    pub async fn daily_series(
        &self,
        location: LonLat,
        window: &SampleWindow,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<DayRecord>>> {
        tracing::debug!(
            lon = location.lon,
            lat = location.lat,
            year = window.year_range.year(),
            "requesting daily series"
        );

        let request = SampleRequest::new(
            Geometry::point(location),
            self.out_fields(),
            TimeSelector::Extent {
                start: window.year_range.start.timestamp_millis(),
                end: window.year_range.end.timestamp_millis(),
            },
        )
        .with_pixel_size(self.pixel_size);

        let samples = self.service.get_samples(&request, cancel).await?;
        if cancel.is_cancelled() {
            tracing::debug!("daily fetch cancelled, discarding response");
            return Ok(None);
        }

        normalize::day_records(
            &samples,
            &self.primary_variable,
            &self.anomaly_variable,
            window.current_date,
        )
        .map(Some)
    }

    /// Sample both variables along a sketched path at the current timestamp
    /// and build the distance-sorted profile.
    pub async fn distance_profile(
        &self,
        path: &[LonLat],
        window: &SampleWindow,
        geodesic: &dyn Geodesic,
    ) -> Result<Vec<ProfileSample>> {
        profile::validate_path(path)?;

        tracing::debug!(
            vertices = path.len(),
            samples = self.profile_sample_count,
            "requesting distance profile"
        );

        let request = SampleRequest::new(
            Geometry::polyline(path.to_vec()),
            self.out_fields(),
            self.slice_selector(vec![window.current_date.timestamp_millis()]),
        )
        .with_pixel_size(self.pixel_size)
        .with_sample_count(self.profile_sample_count);

        // Profile fetches have no cancellation domain of their own.
        let cancel = CancellationToken::new();
        let samples = self.service.get_samples(&request, &cancel).await?;

        profile::build_profile(
            &samples,
            path[0],
            &self.primary_variable,
            &self.anomaly_variable,
            window.current_date,
            geodesic,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SamplingError;
    use crate::service::RawSample;
    use async_trait::async_trait;
    use sst_common::calendar::utc_noon;
    use std::sync::Mutex;

    /// Records requests and replies from a script.
    struct ScriptedService {
        requests: Mutex<Vec<SampleRequest>>,
        reply: Box<dyn Fn(&SampleRequest) -> Result<Vec<RawSample>> + Send + Sync>,
    }

    impl ScriptedService {
        fn new(
            reply: impl Fn(&SampleRequest) -> Result<Vec<RawSample>> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                reply: Box::new(reply),
            })
        }
    }

    #[async_trait]
    impl SampleService for ScriptedService {
        async fn get_samples(
            &self,
            request: &SampleRequest,
            _cancel: &CancellationToken,
        ) -> Result<Vec<RawSample>> {
            self.requests.lock().unwrap().push(request.clone());
            (self.reply)(request)
        }
    }

    fn window(year: i32, month: u32, day: u32) -> SampleWindow {
        SampleWindow {
            years_extent: YearsExtent {
                start_year: 1985,
                end_year: 2023,
            },
            current_date: utc_noon(year, month, day).unwrap(),
            year_range: YearRange::for_year(year),
        }
    }

    fn echo_slices(request: &SampleRequest) -> Result<Vec<RawSample>> {
        let TimeSelector::Slices { definition } = &request.time else {
            return Err(SamplingError::service("expected slices"));
        };
        Ok(definition[0]
            .values
            .iter()
            .map(|ts| {
                RawSample::new(*ts)
                    .with_value("sst", "21.5")
                    .with_value("ssta", "0.3")
            })
            .collect())
    }

    #[tokio::test]
    async fn test_yearly_scenario_1985_2023() {
        let service = ScriptedService::new(echo_slices);
        let sampler = Sampler::new(service.clone(), "sst", "ssta", "StdTime");

        let records = sampler
            .yearly_series(
                LonLat::new(-102.91, 16.53),
                &window(2023, 12, 31),
                &CancellationToken::new(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(records.len(), 39);
        assert_eq!(records.first().unwrap().year, 1985);
        assert_eq!(records.last().unwrap().year, 2023);
        assert!(records.windows(2).all(|w| w[0].year <= w[1].year));

        // Both variables' selectors share the dimension name.
        let requests = service.requests.lock().unwrap();
        let TimeSelector::Slices { definition } = &requests[0].time else {
            panic!("expected slices");
        };
        assert_eq!(definition.len(), 2);
        assert!(definition.iter().all(|s| s.dimension_name == "StdTime"));
    }

    #[tokio::test]
    async fn test_yearly_cancelled_resolves_none() {
        let service = ScriptedService::new(echo_slices);
        let sampler = Sampler::new(service, "sst", "ssta", "StdTime");

        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = sampler
            .yearly_series(LonLat::new(0.0, 0.0), &window(2022, 6, 1), &cancel)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_daily_uses_year_extent() {
        let service = ScriptedService::new(|request| {
            let TimeSelector::Extent { start, end } = request.time else {
                return Err(SamplingError::service("expected extent"));
            };
            assert!(start < end);
            Ok(vec![RawSample::new(start).with_value("sst", "20.0")])
        });
        let sampler = Sampler::new(service, "sst", "ssta", "StdTime");

        let records = sampler
            .daily_series(
                LonLat::new(0.0, 0.0),
                &window(2022, 6, 1),
                &CancellationToken::new(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(records[0].iso_date, "2022-01-01");
    }

    #[tokio::test]
    async fn test_feb_29_anchor_rolls_over() {
        let service = ScriptedService::new(echo_slices);
        let sampler = Sampler::new(service.clone(), "sst", "ssta", "StdTime");

        sampler
            .yearly_series(
                LonLat::new(0.0, 0.0),
                &window(2020, 2, 29),
                &CancellationToken::new(),
            )
            .await
            .unwrap()
            .unwrap();

        let requests = service.requests.lock().unwrap();
        let TimeSelector::Slices { definition } = &requests[0].time else {
            panic!("expected slices");
        };
        // 2019 has no Feb 29; its slice lands on Mar 1.
        let ts_2019 = definition[0].values[2019 - 1985];
        assert_eq!(ts_2019, utc_noon(2019, 3, 1).unwrap().timestamp_millis());
        let ts_2020 = definition[0].values[2020 - 1985];
        assert_eq!(ts_2020, utc_noon(2020, 2, 29).unwrap().timestamp_millis());
    }
}
