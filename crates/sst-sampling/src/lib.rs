//! Sampling layer for the SST pipeline.
//!
//! This crate owns everything between the pipeline's orchestration and the
//! external raster-sampling backend:
//!
//! - [`SampleService`]: the cancellable async capability the backend
//!   implements (point/line geometry, mosaic/time selector, nearest-neighbor
//!   resolution).
//! - Request types: [`SampleRequest`] with per-variable dimension slices or a
//!   time extent, mirroring the mosaic selector the backend understands.
//! - [`normalize`]: raw samples to canonical [`sst_common::DayRecord`] lists;
//!   never drops a sample, never fabricates one.
//! - [`Sampler`]: the high-level fetch façade (yearly series, daily series,
//!   distance profile) that resolves `Ok(None)` when a fetch was cancelled.
//! - [`Geodesic`]: the opaque two-point distance capability with a spherical
//!   great-circle default.
//!
//! Cancellation is cooperative: every service call receives a
//! `tokio_util::sync::CancellationToken`, and a service must not produce
//! observable side effects once the token is cancelled.

pub mod error;
pub mod geodesic;
pub mod normalize;
pub mod profile;
pub mod request;
pub mod sampler;
pub mod service;

// Re-export commonly used types at crate root
pub use error::{Result, SamplingError};
pub use geodesic::{Geodesic, GreatCircle};
pub use request::{
    resolve_dimension_name, DimensionSlice, Geometry, Interpolation, PixelSize, SampleRequest,
    TimeSelector,
};
pub use sampler::{SampleWindow, Sampler};
pub use service::{RawSample, SampleService};
