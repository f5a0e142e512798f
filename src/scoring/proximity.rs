//! Nearest-sample search over the aurora grid
//!
//! Distance is planar Euclidean on raw degree coordinates, not great-circle.

use crate::models::GeoSample;

/// Sample nearest to the target point, first one wins on ties.
///
/// Returns `None` when there is no aurora data.
#[must_use]
pub fn nearest_sample(samples: &[GeoSample], target_lat: f64, target_lon: f64) -> Option<GeoSample> {
    let mut best: Option<(GeoSample, f64)> = None;

    for sample in samples {
        let d_lat = sample.latitude - target_lat;
        let d_lon = sample.longitude - target_lon;
        let mut distance = (d_lat * d_lat + d_lon * d_lon).sqrt();
        if distance.is_nan() {
            distance = f64::INFINITY;
        }

        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((*sample, distance)),
        }
    }

    best.map(|(sample, _)| sample)
}
