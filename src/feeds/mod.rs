//! External data feeds
//!
//! Traits describing the collaborators the dashboard depends on, plus HTTP
//! implementations:
//! - NOAA SWPC: ovation aurora grid and best-effort space-weather readings
//! - OpenWeatherMap: 3-hourly forecast, nearby places, place search
//! - OpenTopoData: point elevation

pub mod http;
pub mod noaa;
pub mod openweathermap;
pub mod opentopodata;

use std::future::Future;

use crate::Result;
use crate::models::{AuroraSnapshot, Place, PlaceSuggestion, WeatherSnapshot};

pub use noaa::NoaaClient;
pub use openweathermap::OpenWeatherMapClient;
pub use opentopodata::OpenTopoDataClient;

/// Source of the current aurora forecast grid
pub trait AuroraFeed {
    fn fetch_aurora(&self) -> impl Future<Output = Result<AuroraSnapshot>> + Send;
}

/// Source of the cloud-cover forecast for a point
pub trait WeatherFeed {
    fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<WeatherSnapshot>> + Send;
}

/// Places near a point, closest discovery first
pub trait PlaceSource {
    fn nearby_places(
        &self,
        latitude: f64,
        longitude: f64,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Place>>> + Send;
}

/// Free-text place lookup for autocomplete
pub trait PlaceSearch {
    fn search_places(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PlaceSuggestion>>> + Send;
}

/// Elevation in meters for a single point
pub trait ElevationSource {
    fn elevation(&self, latitude: f64, longitude: f64) -> impl Future<Output = Result<f64>> + Send;
}
