//! Per-location dashboard pipeline
//!
//! Fetches the aurora grid, the weather forecast and nearby places
//! concurrently, then derives the aurora chance, the ranked viewing locations,
//! a five-day outlook and the space-weather readings.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::feeds::{AuroraFeed, ElevationSource, PlaceSearch, PlaceSource, WeatherFeed};
use crate::models::{
    AuroraSnapshot, Candidate, City, Location, PlaceSuggestion, SpaceWeather, WeatherCategory,
    WeatherSnapshot,
};
use crate::scoring::{aurora_chance, chance_for_entry, rank_locations};
use crate::{AuroraError, Result};

pub const HIGH_CHANCE_HEADLINE: &str = "High chance of aurora! Get ready for a spectacular show.";
pub const LOW_CHANCE_HEADLINE: &str =
    "Low chance of aurora. Keep an eye on the forecast for updates.";
pub const NO_ACTIVITY_MESSAGE: &str = "No aurora activity expected at this time.";
pub const NO_LOCATIONS_MESSAGE: &str = "No suitable viewing locations found within a 50km radius. The aurora may still be visible from your current location.";

/// Days shown in the outlook
pub const OUTLOOK_DAYS: usize = 5;

/// Suggestions returned by place search
pub const SEARCH_LIMIT: usize = 5;

/// Queries this short (after trimming) are not searched
const MIN_QUERY_CHARS: usize = 3;

const DEFAULT_NEARBY_LIMIT: usize = 20;
const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// One day of the outlook
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyOutlook {
    /// "Today", then short weekday names
    pub label: String,
    pub aurora_chance: u8,
    pub category: WeatherCategory,
    /// Temperature in whole degrees Celsius
    pub temperature_c: Option<i32>,
}

/// Space-weather readings formatted for display
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AdvancedReadings {
    pub kp_index: String,
    pub solar_wind_speed: String,
    pub bz: String,
    pub solar_wind_density: String,
}

impl From<&SpaceWeather> for AdvancedReadings {
    fn from(readings: &SpaceWeather) -> Self {
        Self {
            kp_index: readings.format_kp(),
            solar_wind_speed: readings.format_solar_wind_speed(),
            bz: readings.format_bz(),
            solar_wind_density: readings.format_solar_wind_density(),
        }
    }
}

/// Everything the presentation layer shows for one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Dashboard {
    pub location: Location,
    /// Aurora chance percentage (0-100)
    pub aurora_chance: u8,
    pub headline: String,
    /// Up to five "{name} ({distance}km {bearing})" entries, best first
    pub viewing_locations: Vec<String>,
    /// Shown in place of the list when the chance is 0 or the list is empty
    pub viewing_message: Option<String>,
    pub outlook: Vec<DailyOutlook>,
    pub readings: AdvancedReadings,
    /// `None` when the forecast carried no sunrise/sunset
    pub is_night: Option<bool>,
    pub observation_time: String,
    pub forecast_time: String,
}

/// Whether `now` falls outside the city's daylight window
#[must_use]
pub fn is_night(city: &City, now: DateTime<Utc>) -> Option<bool> {
    let sunrise = city.sunrise?;
    let sunset = city.sunset?;
    let now = now.timestamp();
    Some(now > sunset || now < sunrise)
}

/// One entry per day, at most five, scored like the current chance
#[must_use]
pub fn daily_outlook(aurora: &AuroraSnapshot, weather: &WeatherSnapshot) -> Vec<DailyOutlook> {
    weather
        .daily_entries()
        .take(OUTLOOK_DAYS)
        .enumerate()
        .map(|(day, entry)| {
            let label = if day == 0 {
                "Today".to_string()
            } else {
                DateTime::<Utc>::from_timestamp(entry.timestamp, 0)
                    .map_or_else(|| format!("Day {}", day + 1), |t| t.format("%a").to_string())
            };
            let chance = if aurora.has_samples() {
                chance_for_entry(aurora, &weather.city, entry)
            } else {
                0
            };
            DailyOutlook {
                label,
                aurora_chance: chance,
                category: entry.category,
                temperature_c: entry.temperature_c.map(|t| t.round() as i32),
            }
        })
        .collect()
}

/// Location named after the forecast city, or after the coordinates
#[must_use]
pub fn location_name(weather: &WeatherSnapshot, latitude: f64, longitude: f64) -> Location {
    match weather.city.display_name() {
        Some(name) => Location::new(latitude, longitude, name),
        None => Location::unnamed(latitude, longitude),
    }
}

#[must_use]
pub fn headline(chance: u8) -> &'static str {
    if chance > 50 {
        HIGH_CHANCE_HEADLINE
    } else {
        LOW_CHANCE_HEADLINE
    }
}

#[must_use]
pub fn viewing_message(chance: u8, locations: &[String]) -> Option<&'static str> {
    if chance == 0 {
        Some(NO_ACTIVITY_MESSAGE)
    } else if locations.is_empty() {
        Some(NO_LOCATIONS_MESSAGE)
    } else {
        None
    }
}

/// Reject coordinates outside the valid latitude/longitude ranges
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AuroraError::validation(format!(
            "latitude {latitude} must be between -90 and 90"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AuroraError::validation(format!(
            "longitude {longitude} must be between -180 and 180"
        )));
    }
    Ok(())
}

/// Dashboard pipeline over its four collaborators
pub struct DashboardService<A, W, P, E> {
    aurora: A,
    weather: W,
    places: P,
    elevation: E,
    nearby_limit: usize,
    lookup_timeout: Duration,
}

impl<A, W, P, E> DashboardService<A, W, P, E> {
    pub fn new(aurora: A, weather: W, places: P, elevation: E) -> Self {
        Self {
            aurora,
            weather,
            places,
            elevation,
            nearby_limit: DEFAULT_NEARBY_LIMIT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Number of nearby places considered as candidates
    #[must_use]
    pub fn with_nearby_limit(mut self, limit: usize) -> Self {
        self.nearby_limit = limit;
        self
    }

    /// Upper bound for each elevation lookup
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}

impl<A, W, P, E> DashboardService<A, W, P, E>
where
    A: AuroraFeed,
    W: WeatherFeed,
    P: PlaceSource,
    E: ElevationSource,
{
    /// Build the dashboard for a point.
    ///
    /// Fails with a generic "data unavailable" error when the aurora or weather
    /// feed fails. A failed place lookup only empties the viewing list.
    #[instrument(name = "build_dashboard", skip(self, now))]
    pub async fn build(&self, latitude: f64, longitude: f64, now: DateTime<Utc>) -> Result<Dashboard> {
        validate_coordinates(latitude, longitude)?;

        let feeds = async {
            tokio::try_join!(
                self.aurora.fetch_aurora(),
                self.weather.fetch_weather(latitude, longitude)
            )
        };
        let nearby = self
            .places
            .nearby_places(latitude, longitude, self.nearby_limit);

        let (feeds, nearby) = tokio::join!(feeds, nearby);

        let (aurora, weather) = feeds.map_err(|e| {
            error!("Feed fetch failed: {e}");
            AuroraError::api("data unavailable")
        })?;

        let places = nearby.unwrap_or_else(|e| {
            warn!("Nearby place lookup failed: {e}");
            Vec::new()
        });

        let chance = aurora_chance(&aurora, &weather);

        let candidates: Vec<Candidate> = places
            .into_iter()
            .map(|place| Candidate::from_place(latitude, longitude, place))
            .collect();
        let viewing_locations =
            rank_locations(candidates, &self.elevation, self.lookup_timeout).await;

        let location = location_name(&weather, latitude, longitude);
        info!(
            "Aurora chance for '{}' is {chance}% with {} viewing locations",
            location.name,
            viewing_locations.len()
        );

        Ok(Dashboard {
            headline: headline(chance).to_string(),
            viewing_message: viewing_message(chance, &viewing_locations).map(str::to_string),
            outlook: daily_outlook(&aurora, &weather),
            readings: AdvancedReadings::from(&aurora.space_weather),
            is_night: is_night(&weather.city, now),
            observation_time: aurora.observation_time,
            forecast_time: aurora.forecast_time,
            location,
            aurora_chance: chance,
            viewing_locations,
        })
    }
}

impl<A, W, P, E> DashboardService<A, W, P, E>
where
    P: PlaceSearch,
{
    /// Autocomplete suggestions for a free-text query
    pub async fn search_places(&self, query: &str) -> Result<Vec<PlaceSuggestion>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }
        let mut suggestions = self.places.search_places(query, SEARCH_LIMIT).await?;
        suggestions.truncate(SEARCH_LIMIT);
        Ok(suggestions)
    }
}
