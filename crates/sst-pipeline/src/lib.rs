//! Update orchestration for the SST sample pipeline.
//!
//! The [`UpdateCoordinator`] owns the session's mutable state (current
//! location, date, year, active variable) and turns user-driven changes into
//! debounced, cancellable fetch sequences against the sampling layer:
//!
//! ```text
//! location / day / year change
//!      │
//!      ▼
//! debounce window ──► superseded? drop
//!      │
//!      ▼
//! yearly fetch (cancel-replace yearly token)
//!      │ applied only if still the newest sequence
//!      ▼
//! daily fetch (cancel-replace daily token)
//!      │ gap-fill short years, locate today's record
//!      ▼
//! publish: yearly series, daily series, current value, statistics
//!      │
//!      ▼
//! refresh active distance profile
//! ```
//!
//! Results are published as typed [`PipelineEvent`]s over a broadcast
//! channel; external collaborators (charts, markers) subscribe. Stale
//! results — a superseded sequence or a cancelled token — are never
//! published. Service failures reach the caller-supplied [`ErrorSink`] and
//! leave the pre-fetch state authoritative.
//!
//! The [`Player`] drives the playback loop (one day forward per step),
//! waiting for the external view to settle between steps.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod player;
pub mod settings;

// Re-export commonly used types at crate root
pub use config::PipelineConfig;
pub use coordinator::{UpdateCoordinator, VariableRamps};
pub use error::{ErrorSink, PipelineError, TracingErrorSink};
pub use events::{CurrentValue, PipelineEvent, SeriesStatistics};
pub use player::{Player, SettlesImmediately, ViewSettling};
pub use settings::Settings;
