//! The external sampling-service capability.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::request::SampleRequest;
use sst_common::LonLat;

/// One raw sample as returned by the backend.
///
/// Field values arrive as raw text: an empty string means the day was
/// sampled but the sensor recorded nothing, which is distinct from the field
/// being absent only in provenance — both normalize to `NoData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Sample timestamp in ms since epoch.
    pub timestamp: i64,

    /// Where the sample was actually taken. Present for line requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LonLat>,

    /// Raw field text keyed by output-field name.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl RawSample {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            location: None,
            values: BTreeMap::new(),
        }
    }

    pub fn with_location(mut self, location: LonLat) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_value(mut self, field: impl Into<String>, raw: impl Into<String>) -> Self {
        self.values.insert(field.into(), raw.into());
        self
    }

    /// The raw text for a field, if the backend returned it.
    pub fn raw_field(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

/// Capability: the external point/line raster-sampling backend.
///
/// Implementations must return samples ordered by timestamp (point
/// requests) or along the backend's tiling order (line requests — geometric
/// order is *not* guaranteed), must honor the nearest-neighbor resolution
/// mode, and must not produce observable side effects after `cancel` fires.
#[async_trait]
pub trait SampleService: Send + Sync {
    async fn get_samples(
        &self,
        request: &SampleRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawSample>>;
}
