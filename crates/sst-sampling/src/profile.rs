//! Distance-profile construction from line samples.

use chrono::{DateTime, Utc};

use crate::error::{Result, SamplingError};
use crate::geodesic::Geodesic;
use crate::normalize;
use crate::service::RawSample;
use sst_common::{LonLat, ProfileSample};

/// Validate a sketched profile path.
///
/// A profile needs at least two vertices; anything shorter aborts the fetch
/// before the service is called.
pub fn validate_path(path: &[LonLat]) -> Result<()> {
    if path.len() < 2 {
        return Err(SamplingError::geometry(format!(
            "profile path needs at least 2 vertices, got {}",
            path.len()
        )));
    }
    Ok(())
}

/// Build the distance-sorted spatial profile from raw line samples.
///
/// Distance is geodesic kilometers from the path's *first vertex* to each
/// sample's location. The result is stable-sorted ascending by distance:
/// the backend's sampling order along a path follows its internal tiling
/// and is not guaranteed to match geometric order, especially when the path
/// self-intersects.
pub fn build_profile(
    samples: &[RawSample],
    path_start: LonLat,
    primary_field: &str,
    anomaly_field: &str,
    current_date: DateTime<Utc>,
    geodesic: &dyn Geodesic,
) -> Result<Vec<ProfileSample>> {
    let records = normalize::day_records(samples, primary_field, anomaly_field, current_date)?;

    let mut profile: Vec<ProfileSample> = samples
        .iter()
        .zip(records)
        .enumerate()
        .map(|(index, (sample, day))| {
            let location = sample.location.ok_or_else(|| {
                SamplingError::response(format!("line sample {index} has no location"))
            })?;

            Ok(ProfileSample {
                index,
                day,
                longitude: location.lon,
                latitude: location.lat,
                distance_km: geodesic.distance_km(path_start, location),
            })
        })
        .collect::<Result<_>>()?;

    profile.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(profile)
}
