use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use crate::auth::RequireAuth;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather/current/", get(current_weather))
        .route("/weather/current_forecast/", get(current_forecast))
        .route("/weather/search/", get(search_weather))
        .route("/weather/forecast/", get(weather_forecast))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    query: Option<String>,
}

/// GET the current weather based on the client's IP address.
async fn current_weather(
    _auth: RequireAuth,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Json<Value>, ApiError> {
    let ip = client_ip(&headers, peer);
    let current = state.facade.current_by_address(&ip).await?;
    Ok(Json(json!({ "current_weather_data": current })))
}

/// GET the current weather and the next-7-days forecast, both derived from
/// the client's IP address.
async fn current_forecast(
    _auth: RequireAuth,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Json<Value>, ApiError> {
    let ip = client_ip(&headers, peer);
    let combined = state.facade.current_and_forecast_by_address(&ip).await?;
    Ok(Json(json!({
        "current_weather_data": combined.current_weather_data,
        "next_7_days_forecast": combined.next_7_days_forecast,
    })))
}

/// GET the current weather for a provided city name or zip code.
async fn search_weather(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let current = state
        .facade
        .current_by_query(params.query.as_deref())
        .await
        .map_err(ApiError::user_input)?;
    Ok(Json(json!({ "current_weather_data": current })))
}

/// GET the next-7-days forecast for a provided city name or zip code.
async fn weather_forecast(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let window = state
        .facade
        .forecast_by_query(params.query.as_deref())
        .await
        .map_err(ApiError::user_input)?;
    Ok(Json(json!({ "next_7_days_forecast": window })))
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Client address for geolocation: first entry of `X-Forwarded-For` when a
/// reverse proxy set it, otherwise the direct peer address.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}
