//! Shared HTTP plumbing for the feed clients

use std::time::{Duration, Instant};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};

use crate::config::HttpConfig;
use crate::{AuroraError, Result};

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Build the HTTP client shared by all feeds
pub fn build_client(config: &HttpConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(concat!("aurora-tonight/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AuroraError::config(format!("Failed to create HTTP client: {e}")))?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Strip the API key from a URL, or from text embedding one, before it is logged
pub(crate) fn redact(url: &str) -> String {
    match url.split_once("appid=") {
        Some((head, tail)) => {
            let end = tail
                .find(|c: char| c == '&' || c == ')' || c.is_whitespace())
                .unwrap_or(tail.len());
            format!("{head}appid=***{}", redact(&tail[end..]))
        }
        None => url.to_string(),
    }
}

/// Error text without the request URL
fn describe(error: reqwest_middleware::Error) -> String {
    match error {
        reqwest_middleware::Error::Reqwest(e) => e.without_url().to_string(),
        other => redact(&other.to_string()),
    }
}

/// GET a URL and decode the JSON body, mapping every failure to `AuroraError::Api`
#[instrument(name = "get_json", level = "debug", skip_all, fields(feed = feed, url = %redact(url)))]
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    url: &str,
    feed: &'static str,
) -> Result<T> {
    let start = Instant::now();

    let response = client.get(url).send().await.map_err(|e| {
        let e = describe(e);
        warn!("{feed} request failed after {:.3}s: {e}", start.elapsed().as_secs_f64());
        AuroraError::api(format!("{feed} request failed: {e}"))
    })?;

    let status = response.status();
    debug!("{feed} responded {status} in {:.3}s", start.elapsed().as_secs_f64());

    if !status.is_success() {
        return Err(match status.as_u16() {
            401 => {
                error!("{feed} rejected the API key (HTTP 401)");
                AuroraError::api(format!("{feed} rejected the API key"))
            }
            429 => {
                warn!("{feed} rate limit exceeded (HTTP 429)");
                AuroraError::api(format!("{feed} rate limit exceeded"))
            }
            _ => {
                warn!("{feed} request failed with status {status}");
                AuroraError::api(format!(
                    "{feed} request failed with status: {} - {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown error")
                ))
            }
        });
    }

    let body = response.json::<T>().await.map_err(|e| {
        let e = e.without_url();
        error!("Failed to parse {feed} response: {e}");
        AuroraError::api(format!("Invalid data received from {feed}: {e}"))
    })?;

    let elapsed = start.elapsed();
    if elapsed > SLOW_RESPONSE {
        warn!("Slow {feed} response: {:.3}s", elapsed.as_secs_f64());
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ClientWithMiddleware {
        build_client(&HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_redact_api_key() {
        assert_eq!(
            redact("https://x.test/forecast?lat=1&appid=secret&units=metric"),
            "https://x.test/forecast?lat=1&appid=***&units=metric"
        );
        assert_eq!(
            redact("https://x.test/forecast?appid=secret"),
            "https://x.test/forecast?appid=***"
        );
        assert_eq!(redact("https://x.test/plain"), "https://x.test/plain");
        assert_eq!(
            redact("error sending request for url (https://x.test/f?appid=secret)"),
            "error sending request for url (https://x.test/f?appid=***)"
        );
    }

    #[tokio::test]
    async fn test_connection_error_does_not_leak_api_key() {
        let url = "http://127.0.0.1:1/data/2.5/forecast?lat=1&appid=SECRETKEY123";
        let result: Result<Value> = get_json(&client(), url, "OpenWeatherMap forecast").await;

        let err = result.unwrap_err();
        assert!(matches!(err, AuroraError::Api { .. }));
        assert!(!err.to_string().contains("SECRETKEY123"), "leaked: {err}");
    }

    #[tokio::test]
    async fn test_decode_error_does_not_leak_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let url = format!("{}/forecast?appid=SECRETKEY123", server.uri());
        let err = get_json::<Value>(&client(), &url, "test").await.unwrap_err();
        assert!(!err.to_string().contains("SECRETKEY123"), "leaked: {err}");
    }

    #[tokio::test]
    async fn test_get_json_decodes_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 3})))
            .mount(&server)
            .await;

        let body: Value = get_json(&client(), &format!("{}/ok", server.uri()), "test")
            .await
            .unwrap();
        assert_eq!(body["value"], 3);
    }

    #[tokio::test]
    async fn test_get_json_maps_status_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/denied"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result: Result<Value> =
            get_json(&client(), &format!("{}/denied", server.uri()), "test").await;
        assert!(matches!(result, Err(AuroraError::Api { .. })));
    }

    #[tokio::test]
    async fn test_get_json_maps_bad_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result: Result<Value> =
            get_json(&client(), &format!("{}/garbage", server.uri()), "test").await;
        assert!(matches!(result, Err(AuroraError::Api { .. })));
    }
}
