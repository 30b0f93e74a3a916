use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::WeatherError;
use crate::model::LocationQuery;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The IP-geolocation collaborator: maps a client address to coordinates.
///
/// A trait seam so the facade can be exercised against a stub in tests.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Resolve `ip` to [`LocationQuery::Coordinates`].
    async fn locate(&self, ip: &str) -> Result<LocationQuery, WeatherError>;
}

/// Production geolocator backed by an ipinfo.io-shaped service.
#[derive(Debug, Clone)]
pub struct IpInfoClient {
    http: Client,
    base_url: String,
}

impl IpInfoClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build geolocation HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl GeoLocator for IpInfoClient {
    async fn locate(&self, ip: &str) -> Result<LocationQuery, WeatherError> {
        let url = format!("{}/{}/json", self.base_url, ip);
        tracing::debug!(%url, "resolving client address");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| WeatherError::UpstreamUnavailable(err.to_string()))?;

        let payload: Value = res
            .json()
            .await
            .map_err(|err| WeatherError::UpstreamMalformed(err.to_string()))?;

        let loc = payload.get("loc").and_then(Value::as_str).unwrap_or("");
        parse_loc(loc)
    }
}

/// Parse a combined `"lat,lon"` field into coordinates.
///
/// Anything that does not split into exactly two numeric components is an
/// undeterminable location, reported as such rather than as a generic fault.
pub fn parse_loc(loc: &str) -> Result<LocationQuery, WeatherError> {
    let parts: Vec<&str> = loc.split(',').collect();
    let [lat, lon] = parts.as_slice() else {
        return Err(WeatherError::LocationUndeterminable);
    };

    match (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
        (Ok(lat), Ok(lon)) => Ok(LocationQuery::Coordinates { lat, lon }),
        _ => Err(WeatherError::LocationUndeterminable),
    }
}

/// Validate a caller-supplied free-text query (city name or zip code).
pub fn resolve_from_user_input(text: Option<&str>) -> Result<LocationQuery, WeatherError> {
    match text {
        Some(text) if !text.is_empty() => Ok(LocationQuery::Text(text.to_string())),
        _ => Err(WeatherError::MissingQuery),
    }
}
