//! Typed update events published to external collaborators.
//!
//! Chart widgets, map markers and summary labels subscribe through
//! [`crate::UpdateCoordinator::subscribe`]; the coordinator never talks to a
//! UI directly.

use std::sync::Arc;

use sst_common::{DayRecord, LonLat, ProfileSample, Rank, Reading, Variable};

/// The value at the analysis location on the current day, for the map
/// marker.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentValue {
    pub location: LonLat,
    pub temperature: Reading,
    pub anomaly: Reading,
    /// Display label for the active variable, e.g. `28.6° C` or `No Data`.
    pub label: String,
}

/// Rank and spread of the yearly series for the active variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStatistics {
    /// Rank of the current year's value, warmest first.
    pub rank: Option<Rank>,
    /// e.g. `Temperature Range: 1.73° C ( 26.41° C to 28.14° C )`.
    pub range_summary: Option<String>,
}

/// Events emitted by the update coordinator.
///
/// Series payloads are shared (`Arc`) and replaced wholesale on each update;
/// consumers must not assume any relationship to previously received lists.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// One record per archive year at the current date's month/day.
    YearlySeriesUpdated(Arc<Vec<DayRecord>>),
    /// One record per calendar day of the current year, gap-filled.
    DailySeriesUpdated(Arc<Vec<DayRecord>>),
    /// Distance-sorted profile along the sketched path.
    ProfileUpdated(Arc<Vec<ProfileSample>>),
    CurrentValueUpdated(CurrentValue),
    StatisticsUpdated(SeriesStatistics),
    /// The visible variable flipped; cached series are republished after
    /// this so collaborators re-render through the other color ramp.
    VariableChanged(Variable),
}
