//! Core model for the SST sample pipeline.
//!
//! This crate holds the leaf types and pure logic shared by the sampling and
//! orchestration layers:
//!
//! - **Sentinel readings**: the three-valued `Missing` / `NoData` / `Value`
//!   semantics every per-day value carries.
//! - **Day records**: the canonical per-calendar-day record built against the
//!   currently selected date.
//! - **Time domain**: resolving the archive's valid date range and timestamp
//!   set from raster metadata.
//! - **Calendar arithmetic**: UTC-noon day handling, per-year ranges and the
//!   gap filler that completes a sparse day list into a full calendar year.
//! - **Rank/statistics**: percentile-style ranking of a value within a yearly
//!   series, plus range summaries.
//! - **Color mapping**: clamped piecewise-linear mapping from a reading to a
//!   blended color over a discrete ramp.
//!
//! Everything here is synchronous and I/O free; the async sampling machinery
//! lives in `sst-sampling` and the update orchestration in `sst-pipeline`.

pub mod calendar;
pub mod color;
pub mod geo;
pub mod rank;
pub mod record;
pub mod sentinel;
pub mod time_domain;

// Re-export commonly used types at crate root
pub use calendar::{fill_missing_days, utc_noon, YearRange};
pub use color::{ColorRamp, ColorRampError, RampSegment, Rgba};
pub use geo::LonLat;
pub use rank::{range_summary, rank_of, Rank};
pub use record::{DayRecord, ProfileSample, Variable};
pub use sentinel::Reading;
pub use time_domain::{
    resolve_time_domain, DomainResolutionError, RasterMetadata, TimeDimension, TimeDomain,
    YearsExtent,
};
