use std::path::PathBuf;

use anyhow::Result;
use aurora_tonight::{AuroraConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    // optional path to a config file as the first argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AuroraConfig::load_from_path(config_path)?;

    telemetry::init_logging(&config.logging)?;
    tracing::info!("Aurora Tonight v{}", aurora_tonight::VERSION);

    if config.feeds.openweathermap_api_key.is_none() {
        tracing::warn!(
            "No OpenWeatherMap API key configured; set AURORA_FEEDS__OPENWEATHERMAP_API_KEY"
        );
    }

    web::run(&config).await
}
