//! The update coordinator: debounce, cancellation and sequencing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;

use crate::config::PipelineConfig;
use crate::error::{ErrorSink, PipelineError, TracingErrorSink};
use crate::events::{CurrentValue, PipelineEvent, SeriesStatistics};
use crate::settings::Settings;
use sst_common::calendar::{fill_missing_days, noon_of};
use sst_common::time_domain::{resolve_time_domain, RasterMetadata};
use sst_common::{
    rank_of, range_summary, ColorRamp, DayRecord, LonLat, Reading, Rgba, TimeDomain, Variable,
};
use sst_sampling::{
    resolve_dimension_name, Geodesic, GreatCircle, SampleService, SampleWindow, Sampler,
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One color ramp per visualized variable, built at initialization.
#[derive(Debug, Clone)]
pub struct VariableRamps {
    pub temperature: ColorRamp,
    pub anomaly: ColorRamp,
}

impl VariableRamps {
    pub fn get(&self, variable: Variable) -> &ColorRamp {
        match variable {
            Variable::Temperature => &self.temperature,
            Variable::Anomaly => &self.anomaly,
        }
    }
}

/// Session state guarded by one lock; never held across an await that
/// touches the sampling service.
struct PipelineState {
    settings: Settings,
    location: Option<LonLat>,
    variable: Variable,
    sketch_active: bool,
    profile_path: Option<Arc<Vec<LonLat>>>,
    cached_yearly: Option<Arc<Vec<DayRecord>>>,
    cached_daily: Option<Arc<Vec<DayRecord>>>,
}

struct Inner {
    sampler: Sampler,
    time_domain: Arc<TimeDomain>,
    geodesic: Arc<dyn Geodesic>,
    ramps: VariableRamps,
    debounce: Duration,
    step_interval: Duration,
    state: Mutex<PipelineState>,
    /// Single-flight sequence: only the highest number ever applies results.
    flights: AtomicU64,
    yearly_cancel: Mutex<Option<CancellationToken>>,
    daily_cancel: Mutex<Option<CancellationToken>>,
    events: broadcast::Sender<PipelineEvent>,
    error_sink: Arc<dyn ErrorSink>,
}

/// Orchestrates fetches triggered by location/day/year changes.
///
/// Cheap to clone; all clones share the same session.
#[derive(Clone)]
pub struct UpdateCoordinator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for UpdateCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCoordinator").finish_non_exhaustive()
    }
}

impl UpdateCoordinator {
    /// Create a coordinator with the default geodesic and error sink.
    pub fn new(
        sampler: Sampler,
        time_domain: TimeDomain,
        ramps: VariableRamps,
        config: &PipelineConfig,
    ) -> Self {
        Self::with_collaborators(
            sampler,
            time_domain,
            ramps,
            config,
            Arc::new(GreatCircle),
            Arc::new(TracingErrorSink),
        )
    }

    /// Create a coordinator with explicit external collaborators.
    pub fn with_collaborators(
        sampler: Sampler,
        time_domain: TimeDomain,
        ramps: VariableRamps,
        config: &PipelineConfig,
        geodesic: Arc<dyn Geodesic>,
        error_sink: Arc<dyn ErrorSink>,
    ) -> Self {
        let settings = Settings::from_time_domain(&time_domain);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                sampler,
                time_domain: Arc::new(time_domain),
                geodesic,
                ramps,
                debounce: Duration::from_millis(config.debounce_ms),
                step_interval: Duration::from_millis(config.step_interval_ms),
                state: Mutex::new(PipelineState {
                    settings,
                    location: config.initial_location,
                    variable: Variable::Temperature,
                    sketch_active: false,
                    profile_path: None,
                    cached_yearly: None,
                    cached_daily: None,
                }),
                flights: AtomicU64::new(0),
                yearly_cancel: Mutex::new(None),
                daily_cancel: Mutex::new(None),
                events,
                error_sink,
            }),
        }
    }

    /// Wire everything from a service and its metadata: resolve the time
    /// domain for the primary variable, reconcile the anomaly variable's
    /// dimension name, and build the sampler.
    pub fn from_metadata(
        service: Arc<dyn SampleService>,
        metadata: &dyn RasterMetadata,
        ramps: VariableRamps,
        config: &PipelineConfig,
    ) -> Result<Self, PipelineError> {
        let time_domain = resolve_time_domain(metadata, &config.primary_variable)?;
        let anomaly_dimension = metadata
            .time_dimension(&config.anomaly_variable)
            .map(|d| d.name);
        let dimension_name =
            resolve_dimension_name(&time_domain.dimension_name, anomaly_dimension.as_deref());

        let sampler = Sampler::new(
            service,
            config.primary_variable.clone(),
            config.anomaly_variable.clone(),
            dimension_name,
        )
        .with_profile_sample_count(config.profile_sample_count);

        Ok(Self::new(sampler, time_domain, ramps, config))
    }

    /// Subscribe to update events.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.inner.events.subscribe()
    }

    pub fn time_domain(&self) -> Arc<TimeDomain> {
        Arc::clone(&self.inner.time_domain)
    }

    pub async fn settings(&self) -> Settings {
        self.inner.state.lock().await.settings
    }

    pub async fn variable(&self) -> Variable {
        self.inner.state.lock().await.variable
    }

    /// The renderer's color for `value` under `variable`'s ramp.
    pub fn color_for(&self, variable: Variable, value: f64) -> Rgba {
        self.inner.ramps.get(variable).color_for(value)
    }

    pub(crate) fn step_interval(&self) -> Duration {
        self.inner.step_interval
    }

    /// Kick the first update for the configured initial location, if any.
    pub async fn start(&self) {
        if self.inner.state.lock().await.location.is_some() {
            self.schedule(Duration::ZERO);
        }
    }

    /// Move the analysis location. Cancels both in-flight fetch kinds and
    /// runs the update sequence without a debounce delay.
    pub async fn set_location(&self, location: LonLat) {
        self.inner.cancel_in_flight().await;
        self.inner.state.lock().await.location = Some(location);
        self.schedule(Duration::ZERO);
    }

    /// Select a day (normalized to UTC noon); debounced.
    pub async fn set_day(&self, day: DateTime<Utc>) {
        self.inner.state.lock().await.settings.set_day(day);
        self.schedule(self.inner.debounce);
    }

    /// Select a year (clamped to the archive's span); debounced.
    pub async fn set_year(&self, year: i32) {
        self.inner.state.lock().await.settings.set_year(year);
        self.schedule(self.inner.debounce);
    }

    /// Flip the visible variable. No refetch: cached series are republished
    /// so collaborators re-render through the other color ramp.
    pub async fn set_variable(&self, variable: Variable) {
        let (yearly, daily, location, current_year) = {
            let mut state = self.inner.state.lock().await;
            state.variable = variable;
            (
                state.cached_yearly.clone(),
                state.cached_daily.clone(),
                state.location,
                state.settings.current_year,
            )
        };

        let _ = self
            .inner
            .events
            .send(PipelineEvent::VariableChanged(variable));

        if let Some(yearly) = yearly {
            let _ = self
                .inner
                .events
                .send(PipelineEvent::YearlySeriesUpdated(Arc::clone(&yearly)));
            self.inner
                .publish_statistics(&yearly, variable, current_year);
        }

        if let Some(daily) = daily {
            if let (Some(location), Some(today)) =
                (location, daily.iter().find(|r| r.is_current()))
            {
                self.inner.publish_current_value(location, today, variable);
            }
            let _ = self
                .inner
                .events
                .send(PipelineEvent::DailySeriesUpdated(daily));
        }
    }

    /// Gate profile requests while a sketch interaction is in progress.
    pub async fn set_sketch_active(&self, active: bool) {
        self.inner.state.lock().await.sketch_active = active;
    }

    /// A sketch completed: remember the path and fetch its profile.
    ///
    /// Ignored while the sketch interaction is still active.
    pub async fn update_profile(&self, path: Vec<LonLat>) {
        let (path, window) = {
            let mut state = self.inner.state.lock().await;
            if state.sketch_active {
                tracing::debug!("sketch interaction still active, ignoring profile request");
                return;
            }
            let path = Arc::new(path);
            state.profile_path = Some(Arc::clone(&path));
            (path, state.settings.window())
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_profile(path, &window).await;
        });
    }

    /// Drop the sketched path and publish an empty profile.
    pub async fn clear_profile(&self) {
        self.inner.state.lock().await.profile_path = None;
        let _ = self
            .inner
            .events
            .send(PipelineEvent::ProfileUpdated(Arc::new(Vec::new())));
    }

    /// Jump to the first archive day.
    pub async fn first_day(&self) {
        self.set_day(self.inner.time_domain.start).await;
    }

    /// Jump to the most recent archive day.
    pub async fn last_day(&self) {
        self.set_day(self.inner.time_domain.end).await;
    }

    /// Step one day forward, wrapping to the first day past the end.
    pub async fn next_day(&self) {
        let end = noon_of(self.inner.time_domain.end);
        let current = self.settings().await.current_date;
        let next = if current < end {
            current + chrono::Duration::days(1)
        } else {
            noon_of(self.inner.time_domain.start)
        };
        self.set_day(next).await;
    }

    /// Step one day back, wrapping to the most recent day before the start.
    pub async fn prev_day(&self) {
        let start = noon_of(self.inner.time_domain.start);
        let current = self.settings().await.current_date;
        let prev = if current > start {
            current - chrono::Duration::days(1)
        } else {
            noon_of(self.inner.time_domain.end)
        };
        self.set_day(prev).await;
    }

    /// Schedule one run of the update sequence under a fresh sequence
    /// number. A trigger arriving before the delay elapses supersedes this
    /// one; the superseded run wakes, notices, and does nothing.
    fn schedule(&self, delay: Duration) {
        let seq = self.inner.flights.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if !inner.is_current(seq) {
                tracing::debug!(seq, "update superseded before start");
                return;
            }
            inner.run_update(seq).await;
        });
    }
}

impl Inner {
    fn is_current(&self, seq: u64) -> bool {
        self.flights.load(Ordering::SeqCst) == seq
    }

    /// Cancel and clear both fetch kinds.
    async fn cancel_in_flight(&self) {
        for slot in [&self.yearly_cancel, &self.daily_cancel] {
            if let Some(token) = slot.lock().await.take() {
                token.cancel();
            }
        }
    }

    /// Supersede the previous token of a fetch kind with a fresh one.
    async fn replace_token(slot: &Mutex<Option<CancellationToken>>) -> CancellationToken {
        let mut guard = slot.lock().await;
        if let Some(previous) = guard.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *guard = Some(token.clone());
        token
    }

    /// The update sequence: yearly fetch, then daily fetch, then publish.
    async fn run_update(self: Arc<Self>, seq: u64) {
        let (location, window, variable) = {
            let mut state = self.state.lock().await;
            state.settings.refresh_year_range();
            (state.location, state.settings.window(), state.variable)
        };
        let Some(location) = location else {
            tracing::debug!("no analysis location set, nothing to update");
            return;
        };

        // Yearly first, daily after: keeps the yearly chart visually ahead
        // and avoids two concurrent requests per trigger.
        let yearly_token = Self::replace_token(&self.yearly_cancel).await;
        let yearly = match self
            .sampler
            .yearly_series(location, &window, &yearly_token)
            .await
        {
            Ok(Some(records)) => records,
            Ok(None) => return,
            Err(err) => {
                self.error_sink.report(&err.into());
                return;
            }
        };
        if !self.is_current(seq) || yearly_token.is_cancelled() {
            tracing::debug!(seq, "discarding stale yearly result");
            return;
        }

        let yearly = Arc::new(yearly);
        self.state.lock().await.cached_yearly = Some(Arc::clone(&yearly));
        let _ = self
            .events
            .send(PipelineEvent::YearlySeriesUpdated(Arc::clone(&yearly)));
        self.publish_statistics(&yearly, variable, window.year_range.year());

        let daily_token = Self::replace_token(&self.daily_cancel).await;
        let daily = match self
            .sampler
            .daily_series(location, &window, &daily_token)
            .await
        {
            Ok(Some(records)) => records,
            Ok(None) => return,
            Err(err) => {
                self.error_sink.report(&err.into());
                return;
            }
        };
        if !self.is_current(seq) || daily_token.is_cancelled() {
            tracing::debug!(seq, "discarding stale daily result");
            return;
        }

        // Near the live edge the year is incomplete; finish it out with
        // Missing placeholders.
        let needs_fill = daily
            .last()
            .map_or(true, |last| last.date < window.year_range.end);
        let daily = if needs_fill {
            fill_missing_days(daily, &window.year_range, window.current_date)
        } else {
            daily
        };
        let daily = Arc::new(daily);
        self.state.lock().await.cached_daily = Some(Arc::clone(&daily));

        match daily.iter().find(|r| r.is_current()) {
            Some(today) => self.publish_current_value(location, today, variable),
            None => tracing::warn!("daily series has no record for the current date"),
        }
        let _ = self
            .events
            .send(PipelineEvent::DailySeriesUpdated(Arc::clone(&daily)));

        // The current date moved; an active profile is stale now.
        let path = self.state.lock().await.profile_path.clone();
        if let Some(path) = path {
            self.run_profile(path, &window).await;
        }
    }

    async fn run_profile(&self, path: Arc<Vec<LonLat>>, window: &SampleWindow) {
        match self
            .sampler
            .distance_profile(&path, window, self.geodesic.as_ref())
            .await
        {
            Ok(profile) => {
                let _ = self
                    .events
                    .send(PipelineEvent::ProfileUpdated(Arc::new(profile)));
            }
            Err(err) => self.error_sink.report(&err.into()),
        }
    }

    fn publish_current_value(&self, location: LonLat, today: &DayRecord, variable: Variable) {
        let _ = self.events.send(PipelineEvent::CurrentValueUpdated(CurrentValue {
            location,
            temperature: today.temperature,
            anomaly: today.anomaly,
            label: today.reading(variable).format_celsius(),
        }));
    }

    /// Rank the current year within the yearly series and summarize the
    /// spread, both for the active variable.
    fn publish_statistics(&self, records: &[DayRecord], variable: Variable, current_year: i32) {
        let series: Vec<Reading> = records.iter().map(|r| r.reading(variable)).collect();
        let rank = records
            .iter()
            .find(|r| r.year == current_year)
            .and_then(|r| r.reading(variable).value())
            .and_then(|value| rank_of(value, &series));

        let _ = self.events.send(PipelineEvent::StatisticsUpdated(SeriesStatistics {
            rank,
            range_summary: range_summary(variable.label(), &series),
        }));
    }
}
