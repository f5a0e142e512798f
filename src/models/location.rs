//! Location models: query location, nearby places and viewing candidates

use serde::{Deserialize, Serialize};

use crate::geo::{self, CompassPoint};

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (city, region, etc.)
    pub name: String,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
        }
    }

    /// Location named after its own coordinates
    #[must_use]
    pub fn unnamed(latitude: f64, longitude: f64) -> Self {
        let mut location = Self::new(latitude, longitude, String::new());
        location.name = location.format_coordinates();
        location
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A nearby place returned by the geocoding collaborator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Free-text search suggestion
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceSuggestion {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlaceSuggestion {
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// A viewing location candidate annotated relative to the origin
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
    pub bearing: CompassPoint,
    /// Measured elevation, or the latitude-based estimate
    pub elevation_meters: f64,
    /// Whether `elevation_meters` is the fallback estimate
    pub elevation_estimated: bool,
    /// Viewing score in [0, 1]
    pub score: f64,
}

impl Candidate {
    /// Annotate a place with distance and bearing from the origin.
    ///
    /// Elevation and score stay zero until the ranker resolves them.
    #[must_use]
    pub fn from_place(origin_lat: f64, origin_lon: f64, place: Place) -> Self {
        let distance_km = geo::distance_km(origin_lat, origin_lon, place.latitude, place.longitude);
        let bearing = geo::bearing(origin_lat, origin_lon, place.latitude, place.longitude);
        Self {
            name: place.name,
            latitude: place.latitude,
            longitude: place.longitude,
            distance_km,
            bearing,
            elevation_meters: 0.0,
            elevation_estimated: false,
            score: 0.0,
        }
    }
}
