//! OpenTopoData elevation client

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::ElevationSource;
use super::http::get_json;
use crate::config::FeedsConfig;
use crate::{AuroraError, Result};

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    #[serde(default)]
    results: Vec<ElevationResult>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: Option<f64>,
}

/// OpenTopoData API client
#[derive(Clone)]
pub struct OpenTopoDataClient {
    client: ClientWithMiddleware,
    base_url: String,
    dataset: String,
}

impl OpenTopoDataClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &FeedsConfig) -> Self {
        Self {
            client,
            base_url: config.elevation_url.trim_end_matches('/').to_string(),
            dataset: config.elevation_dataset.clone(),
        }
    }
}

impl ElevationSource for OpenTopoDataClient {
    #[instrument(name = "elevation", level = "debug", skip(self))]
    async fn elevation(&self, latitude: f64, longitude: f64) -> Result<f64> {
        let url = format!(
            "{}/v1/{}?locations={},{}",
            self.base_url, self.dataset, latitude, longitude
        );

        let response: ElevationResponse = get_json(&self.client, &url, "OpenTopoData").await?;
        let elevation = response
            .results
            .first()
            .and_then(|r| r.elevation)
            .ok_or_else(|| {
                AuroraError::api(format!(
                    "No elevation available for {latitude:.4}, {longitude:.4}"
                ))
            })?;

        debug!("Elevation {elevation:.0}m");
        Ok(elevation)
    }
}
