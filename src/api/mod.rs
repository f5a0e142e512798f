//! JSON API for the dashboard

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::DefaultsConfig;
use crate::dashboard::{Dashboard, DashboardService};
use crate::feeds::{AuroraFeed, ElevationSource, PlaceSearch, PlaceSource, WeatherFeed};
use crate::models::PlaceSuggestion;
use crate::{AuroraError, VERSION};

/// Shared handler state
pub struct ApiState<A, W, P, E> {
    pub service: DashboardService<A, W, P, E>,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PlacesQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiSuggestion {
    pub label: String,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<PlaceSuggestion> for ApiSuggestion {
    fn from(suggestion: PlaceSuggestion) -> Self {
        Self {
            label: suggestion.label(),
            name: suggestion.name,
            country: suggestion.country,
            latitude: suggestion.latitude,
            longitude: suggestion.longitude,
        }
    }
}

impl IntoResponse for AuroraError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuroraError::Validation { .. } => StatusCode::BAD_REQUEST,
            AuroraError::Api { .. } | AuroraError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AuroraError::General { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

pub fn router<A, W, P, E>(state: Arc<ApiState<A, W, P, E>>) -> Router
where
    A: AuroraFeed + Send + Sync + 'static,
    W: WeatherFeed + Send + Sync + 'static,
    P: PlaceSource + PlaceSearch + Send + Sync + 'static,
    E: ElevationSource + Send + Sync + 'static,
{
    Router::new()
        .route("/dashboard", get(get_dashboard::<A, W, P, E>))
        .route("/places", get(get_places::<A, W, P, E>))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_dashboard<A, W, P, E>(
    State(state): State<Arc<ApiState<A, W, P, E>>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, AuroraError>
where
    A: AuroraFeed + Send + Sync + 'static,
    W: WeatherFeed + Send + Sync + 'static,
    P: PlaceSource + PlaceSearch + Send + Sync + 'static,
    E: ElevationSource + Send + Sync + 'static,
{
    let (latitude, longitude) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => (state.defaults.latitude, state.defaults.longitude),
    };

    let mut dashboard = state.service.build(latitude, longitude, Utc::now()).await?;
    if latitude == state.defaults.latitude
        && longitude == state.defaults.longitude
        && dashboard.location.name == dashboard.location.format_coordinates()
    {
        dashboard.location.name = state.defaults.location_name.clone();
    }
    Ok(Json(dashboard))
}

async fn get_places<A, W, P, E>(
    State(state): State<Arc<ApiState<A, W, P, E>>>,
    Query(query): Query<PlacesQuery>,
) -> Result<Json<Vec<ApiSuggestion>>, AuroraError>
where
    A: Send + Sync + 'static,
    W: Send + Sync + 'static,
    P: PlaceSearch + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    let suggestions = state.service.search_places(&query.q).await?;
    Ok(Json(suggestions.into_iter().map(ApiSuggestion::from).collect()))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AuroraSnapshot, City, ForecastEntry, GeoSample, Place, WeatherCategory, WeatherSnapshot,
    };
    use crate::Result;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    struct FakeAurora(bool);

    impl AuroraFeed for FakeAurora {
        async fn fetch_aurora(&self) -> Result<AuroraSnapshot> {
            if !self.0 {
                return Err(AuroraError::api("NOAA returned 503"));
            }
            Ok(AuroraSnapshot {
                samples: vec![GeoSample::new(-147.0, 65.0, 6.0)],
                ..AuroraSnapshot::default()
            })
        }
    }

    struct FakeWeather;

    impl WeatherFeed for FakeWeather {
        async fn fetch_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
            Ok(WeatherSnapshot {
                city: City {
                    latitude,
                    longitude,
                    ..City::default()
                },
                entries: vec![ForecastEntry {
                    timestamp: 1_700_000_000,
                    temperature_c: Some(-12.0),
                    cloud_cover_percent: 0.0,
                    category: WeatherCategory::Clear,
                }],
            })
        }
    }

    struct FakePlaces;

    impl PlaceSource for FakePlaces {
        async fn nearby_places(&self, latitude: f64, longitude: f64, _limit: usize) -> Result<Vec<Place>> {
            Ok(vec![Place {
                name: "Ester Dome".to_string(),
                latitude: latitude + 0.1,
                longitude,
            }])
        }
    }

    impl PlaceSearch for FakePlaces {
        async fn search_places(&self, query: &str, _limit: usize) -> Result<Vec<PlaceSuggestion>> {
            Ok(vec![PlaceSuggestion {
                name: query.to_string(),
                country: "NO".to_string(),
                latitude: 69.65,
                longitude: 18.96,
            }])
        }
    }

    struct FakeElevation;

    impl ElevationSource for FakeElevation {
        async fn elevation(&self, _latitude: f64, _longitude: f64) -> Result<f64> {
            Ok(700.0)
        }
    }

    fn app(aurora_up: bool) -> Router {
        let service = DashboardService::new(FakeAurora(aurora_up), FakeWeather, FakePlaces, FakeElevation);
        router(Arc::new(ApiState {
            service,
            defaults: DefaultsConfig::default(),
        }))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_dashboard_for_coordinates() {
        let (status, body) = get(app(true), "/dashboard?lat=65.0&lon=-147.0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["aurora_chance"], 72);
        assert_eq!(body["location"]["name"], "65.0000, -147.0000");
        assert_eq!(body["viewing_locations"][0], "Ester Dome (11.1km N)");
        assert!(body["viewing_message"].is_null());
    }

    #[tokio::test]
    async fn test_dashboard_uses_default_location() {
        let (status, body) = get(app(true), "/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"]["name"], "Fairbanks, Alaska");
        assert_eq!(body["location"]["latitude"], 64.8378);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_are_rejected() {
        let (status, body) = get(app(true), "/dashboard?lat=95&lon=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("latitude"));
    }

    #[tokio::test]
    async fn test_feed_failure_is_service_unavailable() {
        let (status, body) = get(app(false), "/dashboard?lat=65&lon=-147").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body["error"],
            "Failed to fetch aurora or weather data. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_places_search() {
        let (status, body) = get(app(true), "/places?q=Troms").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["label"], "Troms, NO");

        let (status, body) = get(app(true), "/places?q=ab").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], VERSION);
    }
}
