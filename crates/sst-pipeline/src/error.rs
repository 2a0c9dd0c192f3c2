//! Pipeline error types and the error sink.

use thiserror::Error;

use sst_common::{ColorRampError, DomainResolutionError};
use sst_sampling::SamplingError;

/// Errors surfaced by the pipeline.
///
/// Cancellation never appears here: cancelled fetches resolve to "no update
/// produced" and are discarded silently.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Domain(#[from] DomainResolutionError),

    #[error(transparent)]
    ColorRamp(#[from] ColorRampError),
}

/// Capability: where per-fetch failures go.
///
/// A failed fetch does not corrupt pipeline state — the pre-fetch settings
/// and cached series stay authoritative — but the failure itself is handed
/// to the sink so the application can show its error surface.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &PipelineError);
}

/// Default sink: structured log, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, error: &PipelineError) {
        tracing::error!(%error, "pipeline fetch failed");
    }
}
