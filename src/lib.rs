//! `Aurora Tonight` - aurora visibility estimates for a location
//!
//! This library combines a geomagnetic forecast grid, a cloud-cover forecast and
//! nearby place lookups into an aurora chance percentage and a ranked list of
//! viewing spots.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feeds;
pub mod geo;
pub mod models;
pub mod scoring;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::AuroraConfig;
pub use dashboard::{Dashboard, DashboardService};
pub use error::AuroraError;
pub use geo::{CompassPoint, bearing, distance_km};
pub use models::{AuroraSnapshot, Candidate, GeoSample, WeatherSnapshot};
pub use scoring::{aurora_chance, nearest_sample, rank_locations, score};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AuroraError>;
