//! Geomagnetic forecast snapshot and space-weather readings

use serde::{Deserialize, Serialize};

/// One cell of the aurora forecast grid
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoSample {
    /// Longitude in decimal degrees (-180..180)
    pub longitude: f64,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Aurora intensity, nominally 0-10 but open-ended
    pub intensity: f64,
}

impl GeoSample {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64, intensity: f64) -> Self {
        Self {
            longitude,
            latitude,
            intensity,
        }
    }
}

/// Scalar solar wind and geomagnetic readings, each optional
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SpaceWeather {
    /// Planetary K-index (0-9)
    pub kp_index: Option<f64>,
    /// North-south IMF component in nanotesla
    pub bz_nt: Option<f64>,
    /// Solar wind speed in km/s
    pub solar_wind_speed_kms: Option<f64>,
    /// Solar wind density in particles/cm³
    pub solar_wind_density: Option<f64>,
}

impl SpaceWeather {
    #[must_use]
    pub fn format_kp(&self) -> String {
        format_reading(self.kp_index, "")
    }

    #[must_use]
    pub fn format_solar_wind_speed(&self) -> String {
        format_reading(self.solar_wind_speed_kms, " km/s")
    }

    #[must_use]
    pub fn format_bz(&self) -> String {
        format_reading(self.bz_nt, " nT")
    }

    #[must_use]
    pub fn format_solar_wind_density(&self) -> String {
        format_reading(self.solar_wind_density, " p/cm³")
    }
}

fn format_reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v}{unit}"),
        _ => "N/A".to_string(),
    }
}

/// One forecast instant of the aurora grid
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AuroraSnapshot {
    /// Observation time as reported by the feed
    pub observation_time: String,
    /// Forecast time as reported by the feed
    pub forecast_time: String,
    /// Sparse grid of (longitude, latitude, intensity) samples
    pub samples: Vec<GeoSample>,
    /// Optional scalar readings fetched alongside the grid
    pub space_weather: SpaceWeather,
}

impl AuroraSnapshot {
    #[must_use]
    pub fn has_samples(&self) -> bool {
        !self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_formats() {
        let readings = SpaceWeather {
            kp_index: Some(5.0),
            bz_nt: Some(-7.5),
            solar_wind_speed_kms: Some(512.0),
            solar_wind_density: Some(3.2),
        };
        assert_eq!(readings.format_kp(), "5");
        assert_eq!(readings.format_bz(), "-7.5 nT");
        assert_eq!(readings.format_solar_wind_speed(), "512 km/s");
        assert_eq!(readings.format_solar_wind_density(), "3.2 p/cm³");
    }

    #[test]
    fn test_missing_readings_render_na() {
        let readings = SpaceWeather::default();
        assert_eq!(readings.format_kp(), "N/A");
        assert_eq!(readings.format_bz(), "N/A");
        assert_eq!(readings.format_solar_wind_speed(), "N/A");
        assert_eq!(readings.format_solar_wind_density(), "N/A");
    }
}
