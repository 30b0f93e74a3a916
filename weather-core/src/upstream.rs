use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::WeatherError;
use crate::model::LocationQuery;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The two upstream resources this backend knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherResource {
    /// Current conditions at a location.
    Current,
    /// Flat time-series forecast list.
    Forecast,
}

impl WeatherResource {
    pub fn path(self) -> &'static str {
        match self {
            WeatherResource::Current => "/weather",
            WeatherResource::Forecast => "/forecast",
        }
    }
}

/// HTTP client for the weather provider.
///
/// One outbound GET per invocation, bounded by a fixed timeout. No retries,
/// no caching. The body is decoded to [`serde_json::Value`] and handed to the
/// normalizer untouched, so shape violations surface with a field path
/// instead of an opaque decode error.
#[derive(Debug, Clone)]
pub struct UpstreamWeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl UpstreamWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build weather upstream HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetch `resource` selected by `query`.
    ///
    /// Coordinates go out as `lat`/`lon`; free text goes out as both `q` and
    /// `zip`, leaving disambiguation of the two to the provider.
    pub async fn fetch(
        &self,
        resource: WeatherResource,
        query: &LocationQuery,
    ) -> Result<Value, WeatherError> {
        let mut params: Vec<(&str, String)> = Vec::with_capacity(4);

        match query {
            LocationQuery::Coordinates { lat, lon } => {
                params.push(("lat", lat.to_string()));
                params.push(("lon", lon.to_string()));
            }
            LocationQuery::Text(text) => {
                params.push(("q", text.clone()));
                params.push(("zip", text.clone()));
            }
        }

        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        self.request(resource, &params).await
    }

    /// Fetch the forecast list for an already-resolved city name.
    ///
    /// Used by the combined path, which selects by the normalized city of the
    /// preceding current-conditions call. City names are sent as `q` only.
    pub async fn fetch_forecast_for_city(&self, city: &str) -> Result<Value, WeatherError> {
        let params = [
            ("q", city.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];

        self.request(WeatherResource::Forecast, &params).await
    }

    async fn request(
        &self,
        resource: WeatherResource,
        params: &[(&str, String)],
    ) -> Result<Value, WeatherError> {
        let url = format!("{}{}", self.base_url, resource.path());
        tracing::debug!(%url, "calling weather upstream");

        let res = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|err| WeatherError::UpstreamUnavailable(err.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|err| WeatherError::UpstreamUnavailable(err.to_string()))?;

        if !status.is_success() {
            return Err(WeatherError::UpstreamUnavailable(format!(
                "weather upstream returned status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|err| WeatherError::UpstreamMalformed(err.to_string()))
    }
}

// Truncates by characters, not bytes: error bodies are arbitrary upstream
// text and a byte cut could land inside a multi-byte character.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let prefix: String = body.chars().take(MAX).collect();
        format!("{prefix}...")
    } else {
        body.to_string()
    }
}
