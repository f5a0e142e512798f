//! Data models for the Aurora Tonight application
//!
//! This module contains the core domain models organized by concern:
//! - Aurora: geomagnetic forecast grid and space-weather readings
//! - Weather: city descriptor and 3-hourly forecast entries
//! - Location: places, search suggestions and ranked viewing candidates

pub mod aurora;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use aurora::{AuroraSnapshot, GeoSample, SpaceWeather};
pub use location::{Candidate, Location, Place, PlaceSuggestion};
pub use weather::{City, ForecastEntry, WeatherCategory, WeatherSnapshot};
