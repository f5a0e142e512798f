//! Viewing location ranker
//!
//! Each candidate gets an elevation (looked up, or estimated from latitude when
//! the lookup fails) and a score averaging an elevation term and a distance
//! term. The best five are returned as display strings.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::feeds::ElevationSource;
use crate::models::Candidate;

/// Maximum number of viewing locations returned
pub const MAX_VIEWING_LOCATIONS: usize = 5;

/// Elevation at which the elevation term saturates
const FULL_ELEVATION_METERS: f64 = 1000.0;

/// Distance beyond which the distance term is zero
const MAX_USEFUL_DISTANCE_KM: f64 = 50.0;

/// Crude elevation estimate used when no measurement is available
#[must_use]
pub fn fallback_elevation(latitude: f64) -> f64 {
    latitude.abs() * 100.0
}

/// Viewing score in [0, 1]: mean of elevation and proximity terms
#[must_use]
pub fn viewing_score(elevation_meters: f64, distance_km: f64) -> f64 {
    let elevation_score = (elevation_meters / FULL_ELEVATION_METERS).max(0.0).min(1.0);
    let distance_score = if distance_km.is_finite() {
        1.0 - (distance_km / MAX_USEFUL_DISTANCE_KM).max(0.0).min(1.0)
    } else {
        0.0
    };
    ((elevation_score + distance_score) / 2.0).clamp(0.0, 1.0)
}

/// Look up every candidate's elevation concurrently and score it.
///
/// Lookups are independent: a failed or timed-out lookup only switches that
/// candidate to [`fallback_elevation`]. Output order matches input order.
pub async fn resolve_candidates<E: ElevationSource>(
    candidates: Vec<Candidate>,
    elevation: &E,
    lookup_timeout: Duration,
) -> Vec<Candidate> {
    let lookups = candidates.into_iter().map(|mut candidate| async move {
        let lookup = tokio::time::timeout(
            lookup_timeout,
            elevation.elevation(candidate.latitude, candidate.longitude),
        )
        .await;

        match lookup {
            Ok(Ok(meters)) if meters.is_finite() => {
                candidate.elevation_meters = meters;
                candidate.elevation_estimated = false;
            }
            Ok(Ok(meters)) => {
                warn!(place = %candidate.name, "Elevation lookup returned {meters}, using latitude estimate");
                estimate_elevation(&mut candidate);
            }
            Ok(Err(e)) => {
                warn!(place = %candidate.name, "Elevation lookup failed: {e}, using latitude estimate");
                estimate_elevation(&mut candidate);
            }
            Err(_) => {
                warn!(
                    place = %candidate.name,
                    "Elevation lookup timed out after {:.1}s, using latitude estimate",
                    lookup_timeout.as_secs_f64()
                );
                estimate_elevation(&mut candidate);
            }
        }

        candidate.score = viewing_score(candidate.elevation_meters, candidate.distance_km);
        candidate
    });

    join_all(lookups).await
}

fn estimate_elevation(candidate: &mut Candidate) {
    candidate.elevation_meters = fallback_elevation(candidate.latitude);
    candidate.elevation_estimated = true;
}

/// Sort by score descending (stable) and keep the top five
#[must_use]
pub fn rank_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(MAX_VIEWING_LOCATIONS);
    candidates
}

/// "{name} ({distance:.1}km {bearing})"
#[must_use]
pub fn format_candidate(candidate: &Candidate) -> String {
    format!(
        "{} ({:.1}km {})",
        candidate.name, candidate.distance_km, candidate.bearing
    )
}

/// Resolve, rank and format candidates. An empty input yields an empty list.
pub async fn rank_locations<E: ElevationSource>(
    candidates: Vec<Candidate>,
    elevation: &E,
    lookup_timeout: Duration,
) -> Vec<String> {
    if candidates.is_empty() {
        debug!("No viewing location candidates");
        return Vec::new();
    }

    let resolved = resolve_candidates(candidates, elevation, lookup_timeout).await;
    let estimated = resolved.iter().filter(|c| c.elevation_estimated).count();
    debug!(
        "Scored {} candidates ({} with estimated elevation)",
        resolved.len(),
        estimated
    );

    rank_candidates(resolved).iter().map(format_candidate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::CompassPoint;
    use crate::{AuroraError, Result};

    const TIMEOUT: Duration = Duration::from_millis(200);

    /// Elevation by exact latitude; `None` fails, NaN hangs forever
    struct FakeElevation {
        table: Vec<(f64, Option<f64>)>,
    }

    impl ElevationSource for FakeElevation {
        async fn elevation(&self, latitude: f64, _longitude: f64) -> Result<f64> {
            match self.table.iter().find(|(lat, _)| *lat == latitude) {
                Some((_, Some(meters))) if meters.is_nan() => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                Some((_, Some(meters))) => Ok(*meters),
                _ => Err(AuroraError::api("elevation service unavailable")),
            }
        }
    }

    fn candidate(name: &str, latitude: f64, distance_km: f64) -> Candidate {
        Candidate {
            name: name.to_string(),
            latitude,
            longitude: 0.0,
            distance_km,
            bearing: CompassPoint::N,
            elevation_meters: 0.0,
            elevation_estimated: false,
            score: 0.0,
        }
    }

    #[test]
    fn test_score_extremes() {
        assert_eq!(viewing_score(1000.0, 0.0), 1.0);
        assert_eq!(viewing_score(0.0, 50.0), 0.0);
        assert_eq!(viewing_score(0.0, 120.0), 0.0);
        assert_eq!(viewing_score(4000.0, 0.0), 1.0);
    }

    #[test]
    fn test_score_components() {
        assert!((viewing_score(500.0, 25.0) - 0.5).abs() < 1e-12);
        assert!((viewing_score(250.0, 0.0) - 0.625).abs() < 1e-12);
        assert_eq!(viewing_score(-30.0, 50.0), 0.0);
    }

    #[test]
    fn test_unknown_distance_scores_as_farthest() {
        assert_eq!(viewing_score(0.0, f64::NAN), 0.0);
        assert_eq!(viewing_score(1000.0, f64::NAN), 0.5);
        assert_eq!(viewing_score(1000.0, f64::INFINITY), 0.5);
    }

    #[test]
    fn test_fallback_elevation() {
        assert_eq!(fallback_elevation(64.0), 6400.0);
        assert_eq!(fallback_elevation(-5.5), 550.0);
    }

    #[test]
    fn test_format_candidate() {
        let mut c = candidate("Murphy Dome", 64.95, 31.26);
        c.bearing = CompassPoint::NW;
        assert_eq!(format_candidate(&c), "Murphy Dome (31.3km NW)");
    }

    #[test]
    fn test_rank_keeps_top_five_stable() {
        let mut candidates: Vec<Candidate> = (0..20)
            .map(|i| {
                let mut c = candidate(&format!("place {i}"), 0.0, 0.0);
                c.score = if i % 2 == 0 { 0.5 } else { 0.25 };
                c
            })
            .collect();
        candidates[7].score = 0.9;

        let ranked = rank_candidates(candidates);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["place 7", "place 0", "place 2", "place 4", "place 6"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_empty_candidates_give_empty_list() {
        let source = FakeElevation { table: vec![] };
        assert!(rank_locations(Vec::new(), &source, TIMEOUT).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_only_affects_that_candidate() {
        let candidates = vec![
            candidate("high", 10.0, 10.0),
            candidate("broken", 3.0, 5.0),
            candidate("low", 20.0, 40.0),
        ];
        let healthy = FakeElevation {
            table: vec![(10.0, Some(900.0)), (3.0, Some(100.0)), (20.0, Some(50.0))],
        };
        let degraded = FakeElevation {
            table: vec![(10.0, Some(900.0)), (20.0, Some(50.0))],
        };

        let with_all = resolve_candidates(candidates.clone(), &healthy, TIMEOUT).await;
        let with_failure = resolve_candidates(candidates.clone(), &degraded, TIMEOUT).await;

        assert_eq!(with_all[0], with_failure[0]);
        assert_eq!(with_all[2], with_failure[2]);
        assert!(with_failure[1].elevation_estimated);
        assert!((with_failure[1].elevation_meters - 300.0).abs() < 1e-9);
        assert!(!with_all[1].elevation_estimated);

        let ranked_all = rank_locations(candidates.clone(), &healthy, TIMEOUT).await;
        let ranked_failure = rank_locations(candidates, &degraded, TIMEOUT).await;
        let expected = ["high (10.0km N)", "broken (5.0km N)", "low (40.0km N)"];
        assert_eq!(ranked_all, expected);
        assert_eq!(ranked_failure, expected);
    }

    #[tokio::test]
    async fn test_hanging_lookup_times_out_to_fallback() {
        let candidates = vec![candidate("stuck", 7.0, 0.0), candidate("fine", 8.0, 0.0)];
        let source = FakeElevation {
            table: vec![(7.0, Some(f64::NAN)), (8.0, Some(1200.0))],
        };
        let resolved = resolve_candidates(candidates, &source, Duration::from_millis(50)).await;
        assert!(resolved[0].elevation_estimated);
        assert!((resolved[0].elevation_meters - 700.0).abs() < 1e-9);
        assert_eq!(resolved[1].elevation_meters, 1200.0);
        assert_eq!(resolved[1].score, 1.0);
    }

    #[tokio::test]
    async fn test_rank_locations_formats_best_first() {
        let candidates = vec![
            candidate("far flat", 1.0, 60.0),
            candidate("close hill", 2.0, 2.0),
            candidate("mid", 3.0, 25.0),
        ];
        let source = FakeElevation {
            table: vec![(1.0, Some(0.0)), (2.0, Some(800.0)), (3.0, Some(400.0))],
        };
        let ranked = rank_locations(candidates, &source, TIMEOUT).await;
        assert_eq!(
            ranked,
            ["close hill (2.0km N)", "mid (25.0km N)", "far flat (60.0km N)"]
        );
    }
}
