use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, ApiState};
use crate::config::AuroraConfig;
use crate::dashboard::DashboardService;
use crate::feeds::{NoaaClient, OpenTopoDataClient, OpenWeatherMapClient, http::build_client};

/// Wire the feed clients into the router
pub fn app(config: &AuroraConfig) -> Result<Router> {
    let client = build_client(&config.http).context("Failed to build HTTP client")?;

    let owm = OpenWeatherMapClient::new(client.clone(), &config.feeds);
    let service = DashboardService::new(
        NoaaClient::new(client.clone(), &config.feeds),
        owm.clone(),
        owm,
        OpenTopoDataClient::new(client, &config.feeds),
    )
    .with_nearby_limit(config.defaults.nearby_places)
    .with_lookup_timeout(Duration::from_secs(config.http.lookup_timeout_seconds.into()));

    let state = Arc::new(ApiState {
        service,
        defaults: config.defaults.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new().nest("/api", api::router(state)).layer(
        ServiceBuilder::new().layer(cors).layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds.into(),
        ))),
    ))
}

pub async fn run(config: &AuroraConfig) -> Result<()> {
    let app = app(config)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
