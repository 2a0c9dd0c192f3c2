//! Sampling request types.
//!
//! A [`SampleRequest`] mirrors what the external raster-sampling backend
//! understands: a geometry, an optional pixel size and sample count, a
//! "nearest, do not interpolate" resolution mode, the output fields to
//! return, and a mosaic/time selector — either per-variable slice lists over
//! the time dimension or a plain time extent.

use serde::{Deserialize, Serialize};

use sst_common::LonLat;

/// Geometry a sampling request runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Point { location: LonLat },
    Polyline { path: Vec<LonLat> },
}

impl Geometry {
    pub fn point(location: LonLat) -> Self {
        Self::Point { location }
    }

    pub fn polyline(path: Vec<LonLat>) -> Self {
        Self::Polyline { path }
    }
}

/// Raster resampling mode for the sample lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Take the nearest cell, never blend neighbors.
    #[default]
    Nearest,
    Bilinear,
}

/// Raster cell size hint forwarded to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSize {
    pub x: f64,
    pub y: f64,
}

/// One variable's slice selector over the time dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSlice {
    pub variable_name: String,
    pub dimension_name: String,
    /// True for discrete timestamp slices, false for a range pair.
    pub is_slice: bool,
    /// Timestamps in ms since epoch.
    pub values: Vec<i64>,
}

impl DimensionSlice {
    /// Discrete timestamp slices for one variable.
    pub fn slices(
        variable_name: impl Into<String>,
        dimension_name: impl Into<String>,
        values: Vec<i64>,
    ) -> Self {
        Self {
            variable_name: variable_name.into(),
            dimension_name: dimension_name.into(),
            is_slice: true,
            values,
        }
    }
}

/// Mosaic/time selector: which timestamps the backend should resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeSelector {
    /// Per-variable discrete slices.
    Slices { definition: Vec<DimensionSlice> },
    /// Every native-cadence sample inside `[start, end]` ms.
    Extent { start: i64, end: i64 },
}

/// A point/line sampling request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRequest {
    pub geometry: Geometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<PixelSize>,
    /// For line geometries: how many samples to spread along the path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<usize>,
    /// Ask for every value along the time selector, not just the first.
    pub return_first_value_only: bool,
    pub interpolation: Interpolation,
    /// Raw field names to return per sample.
    pub out_fields: Vec<String>,
    pub time: TimeSelector,
}

impl SampleRequest {
    pub fn new(geometry: Geometry, out_fields: Vec<String>, time: TimeSelector) -> Self {
        Self {
            geometry,
            pixel_size: None,
            sample_count: None,
            return_first_value_only: false,
            interpolation: Interpolation::Nearest,
            out_fields,
            time,
        }
    }

    pub fn with_pixel_size(mut self, pixel_size: Option<PixelSize>) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    pub fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = Some(count);
        self
    }
}

/// Resolve the time-dimension name shared by the two variables' selectors.
///
/// The anomaly layer's upstream metadata sometimes omits (or contradicts)
/// the dimension name carried by the primary layer; the primary's name is
/// authoritative and is propagated so the selector pair never disagrees.
pub fn resolve_dimension_name(primary: &str, anomaly: Option<&str>) -> String {
    match anomaly {
        Some(name) if !name.is_empty() && name == primary => name.to_string(),
        Some(name) if !name.is_empty() => {
            tracing::warn!(
                primary,
                anomaly = name,
                "variable metadata disagrees on the time dimension, using the primary's"
            );
            primary.to_string()
        }
        _ => {
            tracing::debug!(primary, "anomaly selector missing dimension name, propagating");
            primary.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = SampleRequest::new(
            Geometry::point(LonLat::new(-102.91, 16.53)),
            vec!["sst".to_string(), "ssta".to_string()],
            TimeSelector::Extent {
                start: 0,
                end: 86_400_000,
            },
        );
        assert_eq!(req.interpolation, Interpolation::Nearest);
        assert!(!req.return_first_value_only);
        assert!(req.sample_count.is_none());
    }

    #[test]
    fn test_dimension_name_propagation() {
        assert_eq!(resolve_dimension_name("StdTime", None), "StdTime");
        assert_eq!(resolve_dimension_name("StdTime", Some("")), "StdTime");
        assert_eq!(resolve_dimension_name("StdTime", Some("StdTime")), "StdTime");
        // Disagreement resolves to the primary.
        assert_eq!(resolve_dimension_name("StdTime", Some("Time")), "StdTime");
    }

    #[test]
    fn test_slice_builder() {
        let slice = DimensionSlice::slices("sst", "StdTime", vec![1, 2, 3]);
        assert!(slice.is_slice);
        assert_eq!(slice.values.len(), 3);
    }
}
