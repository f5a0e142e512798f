//! Weather snapshot model: city descriptor and 3-hourly forecast entries

use serde::{Deserialize, Serialize};

/// Forecast entries per day at the feed's native 3-hour cadence
pub const ENTRIES_PER_DAY: usize = 8;

/// Coarse weather condition of a forecast entry
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Other,
}

impl WeatherCategory {
    /// Map a provider condition group (e.g. "Clouds", "rain") to a category
    #[must_use]
    pub fn from_condition(condition: &str) -> Self {
        match condition.trim().to_ascii_lowercase().as_str() {
            "clear" => WeatherCategory::Clear,
            "clouds" => WeatherCategory::Clouds,
            "rain" => WeatherCategory::Rain,
            "drizzle" => WeatherCategory::Drizzle,
            "thunderstorm" => WeatherCategory::Thunderstorm,
            _ => WeatherCategory::Other,
        }
    }
}

/// City the forecast was issued for
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct City {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Sunrise as a Unix timestamp
    pub sunrise: Option<i64>,
    /// Sunset as a Unix timestamp
    pub sunset: Option<i64>,
}

impl City {
    /// "{name}, {country}" when the feed named the city
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        if self.name.is_empty() {
            return None;
        }
        if self.country.is_empty() {
            Some(self.name.clone())
        } else {
            Some(format!("{}, {}", self.name, self.country))
        }
    }
}

/// One forecast step
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Unix timestamp of the forecast step
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature_c: Option<f64>,
    /// Cloud cover percentage (0-100)
    pub cloud_cover_percent: f64,
    pub category: WeatherCategory,
}

/// City plus forecast entries in ascending time order
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub city: City,
    pub entries: Vec<ForecastEntry>,
}

impl WeatherSnapshot {
    /// The entry closest to now
    #[must_use]
    pub fn current(&self) -> Option<&ForecastEntry> {
        self.entries.first()
    }

    /// One entry per day (every 8th entry)
    pub fn daily_entries(&self) -> impl Iterator<Item = &ForecastEntry> {
        self.entries.iter().step_by(ENTRIES_PER_DAY)
    }
}
