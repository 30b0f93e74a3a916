use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use weather_core::{Config, IpInfoClient, UpstreamWeatherClient, WeatherFacade};
use weather_server::{AppState, routes};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let upstream = UpstreamWeatherClient::new(&config.weather_base_url, &config.api_key)?;
    let geo = IpInfoClient::new(&config.geo_base_url)?;
    let facade = WeatherFacade::new(Box::new(geo), upstream);

    let state = AppState {
        facade: Arc::new(facade),
        auth_token: config.auth_token.clone(),
    };

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "weather server listening");

    axum::serve(
        listener,
        routes::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
