//! OpenWeatherMap client: 3-hourly forecast, reverse and direct geocoding

use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use super::http::get_json;
use super::{PlaceSearch, PlaceSource, WeatherFeed};
use crate::config::FeedsConfig;
use crate::models::{City, ForecastEntry, Place, PlaceSuggestion, WeatherCategory, WeatherSnapshot};
use crate::{AuroraError, Result};

/// OpenWeatherMap API response structures
mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub list: Vec<ForecastItem>,
        pub city: Option<CityInfo>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastItem {
        pub dt: i64,
        pub main: Option<MainReadings>,
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub clouds: Option<Clouds>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainReadings {
        pub temp: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub main: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Clouds {
        pub all: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CityInfo {
        pub name: Option<String>,
        pub country: Option<String>,
        pub coord: Option<Coord>,
        pub sunrise: Option<i64>,
        pub sunset: Option<i64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Coord {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub lat: f64,
        pub lon: f64,
        pub country: Option<String>,
    }
}

impl wire::ForecastResponse {
    /// Convert to a snapshot; the request point stands in for missing city coordinates
    fn into_snapshot(self, latitude: f64, longitude: f64) -> WeatherSnapshot {
        let city = match self.city {
            Some(info) => {
                let (lat, lon) = info.coord.map_or((latitude, longitude), |c| (c.lat, c.lon));
                City {
                    name: info.name.unwrap_or_default(),
                    country: info.country.unwrap_or_default(),
                    latitude: lat,
                    longitude: lon,
                    sunrise: info.sunrise.filter(|t| *t > 0),
                    sunset: info.sunset.filter(|t| *t > 0),
                }
            }
            None => City {
                latitude,
                longitude,
                ..City::default()
            },
        };

        let mut entries: Vec<ForecastEntry> = self
            .list
            .into_iter()
            .map(|item| ForecastEntry {
                timestamp: item.dt,
                temperature_c: item.main.and_then(|m| m.temp),
                cloud_cover_percent: item.clouds.and_then(|c| c.all).unwrap_or(0.0),
                category: item
                    .weather
                    .first()
                    .map_or(WeatherCategory::Other, |w| WeatherCategory::from_condition(&w.main)),
            })
            .collect();
        entries.sort_by_key(|e| e.timestamp);

        WeatherSnapshot { city, entries }
    }
}

/// OpenWeatherMap API client
#[derive(Clone)]
pub struct OpenWeatherMapClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherMapClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &FeedsConfig) -> Self {
        Self {
            client,
            base_url: config.openweathermap_url.trim_end_matches('/').to_string(),
            api_key: config.openweathermap_api_key.clone(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AuroraError::config("OpenWeatherMap API key is not configured"))
    }

    async fn geocode(&self, url: String) -> Result<Vec<wire::GeocodingResult>> {
        get_json::<Vec<wire::GeocodingResult>>(&self.client, &url, "OpenWeatherMap geocoding").await
    }
}

impl WeatherFeed for OpenWeatherMapClient {
    #[instrument(name = "fetch_weather", skip(self))]
    async fn fetch_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        let url = format!(
            "{}/data/2.5/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base_url,
            latitude,
            longitude,
            self.api_key()?
        );

        let response: wire::ForecastResponse =
            get_json(&self.client, &url, "OpenWeatherMap forecast").await?;
        let snapshot = response.into_snapshot(latitude, longitude);

        if snapshot.entries.is_empty() {
            warn!("Forecast for {latitude:.4}, {longitude:.4} has no entries");
        } else {
            info!(
                "Forecast for '{}' with {} entries",
                snapshot.city.name,
                snapshot.entries.len()
            );
        }
        Ok(snapshot)
    }
}

impl PlaceSource for OpenWeatherMapClient {
    #[instrument(name = "nearby_places", skip(self))]
    async fn nearby_places(&self, latitude: f64, longitude: f64, limit: usize) -> Result<Vec<Place>> {
        let url = format!(
            "{}/geo/1.0/reverse?lat={}&lon={}&limit={}&appid={}",
            self.base_url,
            latitude,
            longitude,
            limit,
            self.api_key()?
        );

        let places: Vec<Place> = self
            .geocode(url)
            .await?
            .into_iter()
            .take(limit)
            .map(|r| Place {
                name: r.name,
                latitude: r.lat,
                longitude: r.lon,
            })
            .collect();

        debug!("Found {} places near {latitude:.4}, {longitude:.4}", places.len());
        Ok(places)
    }
}

impl PlaceSearch for OpenWeatherMapClient {
    #[instrument(name = "search_places", skip(self))]
    async fn search_places(&self, query: &str, limit: usize) -> Result<Vec<PlaceSuggestion>> {
        let url = format!(
            "{}/geo/1.0/direct?q={}&limit={}&appid={}",
            self.base_url,
            urlencoding::encode(query),
            limit,
            self.api_key()?
        );

        let suggestions: Vec<PlaceSuggestion> = self
            .geocode(url)
            .await?
            .into_iter()
            .take(limit)
            .map(|r| PlaceSuggestion {
                name: r.name,
                country: r.country.unwrap_or_default(),
                latitude: r.lat,
                longitude: r.lon,
            })
            .collect();

        if suggestions.is_empty() {
            warn!("No results found for '{query}'");
        }
        Ok(suggestions)
    }
}
