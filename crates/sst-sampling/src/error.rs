//! Error types for the sampling layer.

use thiserror::Error;

/// Errors that can occur while sampling the raster archive.
///
/// Cancellation is deliberately not represented here: a cancelled fetch
/// resolves to `Ok(None)` at the [`crate::Sampler`] level and is discarded
/// by the caller.
#[derive(Error, Debug)]
pub enum SamplingError {
    /// The external sampling service failed.
    #[error("sampling service error: {0}")]
    Service(String),

    /// The requested profile geometry is degenerate or invalid.
    #[error("invalid profile geometry: {0}")]
    Geometry(String),

    /// The service response violated its contract.
    #[error("malformed sample response: {0}")]
    Response(String),
}

impl SamplingError {
    /// Create a Service error.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Create a Geometry error.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Create a Response error.
    pub fn response(msg: impl Into<String>) -> Self {
        Self::Response(msg.into())
    }
}

/// Result type for sampling operations.
pub type Result<T> = std::result::Result<T, SamplingError>;
