//! NOAA Space Weather Prediction Center client
//!
//! The ovation grid is required. Kp and solar wind readings come from separate
//! products and are best-effort: a failure leaves the reading empty.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::AuroraFeed;
use super::http::get_json;
use crate::Result;
use crate::config::FeedsConfig;
use crate::models::{AuroraSnapshot, GeoSample, SpaceWeather};

const KP_PATH: &str = "/json/planetary_k_index_1m.json";
const PLASMA_PATH: &str = "/products/solar-wind/plasma-5-minute.json";
const MAG_PATH: &str = "/products/solar-wind/mag-5-minute.json";

/// Ovation aurora forecast response
#[derive(Debug, Deserialize)]
struct OvationResponse {
    #[serde(rename = "Observation Time", default)]
    observation_time: String,
    #[serde(rename = "Forecast Time", default)]
    forecast_time: String,
    /// Rows of `[longitude, latitude, aurora]`, longitude in 0..360
    #[serde(default)]
    coordinates: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct KpReading {
    kp_index: Option<f64>,
    estimated_kp: Option<f64>,
}

impl OvationResponse {
    fn into_snapshot(self, space_weather: SpaceWeather) -> AuroraSnapshot {
        let samples: Vec<GeoSample> = self
            .coordinates
            .iter()
            .filter_map(|row| match row.as_slice() {
                [Some(lon), Some(lat), Some(aurora), ..]
                    if lon.is_finite() && lat.is_finite() && aurora.is_finite() =>
                {
                    Some(GeoSample::new(signed_longitude(*lon), *lat, *aurora))
                }
                _ => None,
            })
            .collect();

        AuroraSnapshot {
            observation_time: self.observation_time,
            forecast_time: self.forecast_time,
            samples,
            space_weather,
        }
    }
}

/// Map a 0..360 longitude onto -180..180
fn signed_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Latest non-empty value of a named column in a header-first table product
fn latest_column(rows: &[Vec<Value>], column: &str) -> Option<f64> {
    let (header, data) = rows.split_first()?;
    let index = header.iter().position(|h| h.as_str() == Some(column))?;
    data.iter()
        .rev()
        .find_map(|row| row.get(index).and_then(number))
}

/// NOAA SWPC client
#[derive(Clone)]
pub struct NoaaClient {
    client: ClientWithMiddleware,
    aurora_url: String,
    space_weather_url: String,
}

impl NoaaClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &FeedsConfig) -> Self {
        Self {
            client,
            aurora_url: config.aurora_url.clone(),
            space_weather_url: config.space_weather_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_space_weather(&self) -> SpaceWeather {
        let kp_url = format!("{}{KP_PATH}", self.space_weather_url);
        let plasma_url = format!("{}{PLASMA_PATH}", self.space_weather_url);
        let mag_url = format!("{}{MAG_PATH}", self.space_weather_url);

        let (kp, plasma, mag) = tokio::join!(
            get_json::<Vec<KpReading>>(&self.client, &kp_url, "NOAA Kp"),
            get_json::<Vec<Vec<Value>>>(&self.client, &plasma_url, "NOAA plasma"),
            get_json::<Vec<Vec<Value>>>(&self.client, &mag_url, "NOAA magnetometer"),
        );

        let kp_index = match kp {
            Ok(readings) => readings
                .iter()
                .rev()
                .find_map(|r| r.kp_index.or(r.estimated_kp)),
            Err(e) => {
                debug!("Kp index unavailable: {e}");
                None
            }
        };

        let (solar_wind_speed_kms, solar_wind_density) = match plasma {
            Ok(rows) => (latest_column(&rows, "speed"), latest_column(&rows, "density")),
            Err(e) => {
                debug!("Solar wind plasma unavailable: {e}");
                (None, None)
            }
        };

        let bz_nt = match mag {
            Ok(rows) => latest_column(&rows, "bz_gsm"),
            Err(e) => {
                debug!("Solar wind magnetic field unavailable: {e}");
                None
            }
        };

        SpaceWeather {
            kp_index,
            bz_nt,
            solar_wind_speed_kms,
            solar_wind_density,
        }
    }
}

impl AuroraFeed for NoaaClient {
    #[instrument(name = "fetch_aurora", skip(self))]
    async fn fetch_aurora(&self) -> Result<AuroraSnapshot> {
        let (grid, space_weather) = tokio::join!(
            get_json::<OvationResponse>(&self.client, &self.aurora_url, "NOAA ovation"),
            self.fetch_space_weather(),
        );

        let snapshot = grid?.into_snapshot(space_weather);
        info!(
            "Aurora grid with {} samples (forecast time {})",
            snapshot.samples.len(),
            snapshot.forecast_time
        );
        Ok(snapshot)
    }
}
