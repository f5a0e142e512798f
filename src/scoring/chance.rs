//! Aurora chance scorer
//!
//! `score` blends the nearest grid intensity, the cloud cover and the observer's
//! absolute latitude into a whole percentage. Rounding is half away from zero
//! (`f64::round`), which is half-up for the non-negative values produced here.

use crate::models::{AuroraSnapshot, City, ForecastEntry, WeatherSnapshot};
use crate::scoring::proximity::nearest_sample;

/// Multiplier applied for the observer's absolute latitude
#[must_use]
pub fn latitude_factor(abs_latitude: f64) -> f64 {
    let latitude = abs_latitude.abs();
    if latitude > 60.0 {
        1.2
    } else if latitude > 50.0 {
        1.1
    } else if latitude < 40.0 {
        0.8
    } else {
        1.0
    }
}

/// Aurora chance in [0, 100].
///
/// Intensity is mapped ×10 onto a percentage capped at 100, scaled by the
/// clear-sky fraction and by [`latitude_factor`]. Out-of-range inputs are
/// clamped: negative or NaN intensity counts as 0, cloud cover is held to 0-100.
#[must_use]
pub fn score(aurora_intensity: f64, cloud_cover_percent: f64, abs_latitude: f64) -> u8 {
    let intensity = aurora_intensity.max(0.0);
    let cloud_cover = cloud_cover_percent.max(0.0).min(100.0);

    let mut chance = (intensity * 10.0).min(100.0);
    chance *= (100.0 - cloud_cover) / 100.0;
    chance *= latitude_factor(abs_latitude);

    chance.clamp(0.0, 100.0).round() as u8
}

/// Chance for one forecast entry at the city's position
#[must_use]
pub fn chance_for_entry(aurora: &AuroraSnapshot, city: &City, entry: &ForecastEntry) -> u8 {
    let intensity = nearest_sample(&aurora.samples, city.latitude, city.longitude)
        .map_or(0.0, |sample| sample.intensity);
    score(intensity, entry.cloud_cover_percent, city.latitude.abs())
}

/// Current aurora chance; 0 when either snapshot carries no signal
#[must_use]
pub fn aurora_chance(aurora: &AuroraSnapshot, weather: &WeatherSnapshot) -> u8 {
    if !aurora.has_samples() {
        return 0;
    }
    weather
        .current()
        .map_or(0, |entry| chance_for_entry(aurora, &weather.city, entry))
}
