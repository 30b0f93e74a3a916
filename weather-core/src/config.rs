use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEOLOCATION_BASE_URL: &str = "https://ipinfo.io";

/// Process configuration, read from the environment at startup.
///
/// Base URLs are overridable so tests can point the clients at a mock server.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeatherMap API key, injected as the `appid` query parameter.
    pub api_key: String,
    /// Bearer token required on every weather route.
    pub auth_token: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Base URL of the weather provider.
    pub weather_base_url: String,
    /// Base URL of the IP-geolocation collaborator.
    pub geo_base_url: String,
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// `OPENWEATHERMAP_API_KEY` and `WEATHER_AUTH_TOKEN` are required; the
    /// rest fall back to sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = get("OPENWEATHERMAP_API_KEY")
            .filter(|v| !v.is_empty())
            .context("OPENWEATHERMAP_API_KEY must be set")?;

        let auth_token = get("WEATHER_AUTH_TOKEN")
            .filter(|v| !v.is_empty())
            .context("WEATHER_AUTH_TOKEN must be set")?;

        let bind_addr =
            get("WEATHER_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let weather_base_url = get("WEATHER_UPSTREAM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string());

        let geo_base_url = get("GEOLOCATION_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEOLOCATION_BASE_URL.to_string());

        Ok(Self {
            api_key,
            auth_token,
            bind_addr,
            weather_base_url,
            geo_base_url,
        })
    }
}
