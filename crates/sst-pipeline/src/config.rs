//! Pipeline configuration loading and defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use sst_common::LonLat;

/// Tunables for the update pipeline, loaded from a YAML file or defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Debounce window for day/year change triggers, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Pause between playback steps, in milliseconds.
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,

    /// Sample count along a sketched profile line.
    #[serde(default = "default_profile_sample_count")]
    pub profile_sample_count: usize,

    /// Logical name of the primary (temperature) variable.
    #[serde(default = "default_primary_variable")]
    pub primary_variable: String,

    /// Logical name of the anomaly variable.
    #[serde(default = "default_anomaly_variable")]
    pub anomaly_variable: String,

    /// Analysis location to seed the session with.
    #[serde(default = "default_initial_location")]
    pub initial_location: Option<LonLat>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            step_interval_ms: default_step_interval_ms(),
            profile_sample_count: default_profile_sample_count(),
            primary_variable: default_primary_variable(),
            anomaly_variable: default_anomaly_variable(),
            initial_location: default_initial_location(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged, so a bare checkout still runs.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(?path, "pipeline config not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config: {path:?}"))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse pipeline config: {path:?}"))
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid pipeline config")
    }
}

fn default_debounce_ms() -> u64 {
    50
}
fn default_step_interval_ms() -> u64 {
    800
}
fn default_profile_sample_count() -> usize {
    50
}
fn default_primary_variable() -> String {
    "sst".to_string()
}
fn default_anomaly_variable() -> String {
    "ssta".to_string()
}
fn default_initial_location() -> Option<LonLat> {
    // Eastern Pacific, off the Mexican coast.
    Some(LonLat::new(-102.91, 16.53))
}
