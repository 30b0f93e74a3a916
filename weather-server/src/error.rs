use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use weather_core::WeatherError;

/// HTTP-level error: a status plus the exact JSON body to send.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    pub fn unauthorized(detail: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: json!({ "detail": detail }),
        }
    }

    /// Mapping for the search and forecast-by-query routes: anything other
    /// than a missing query is reported under `error` with the caller-facing
    /// hint that their input may be at fault.
    pub fn user_input(err: WeatherError) -> Self {
        match err {
            WeatherError::MissingQuery => err.into(),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({
                    "error": format!("Check that the entered data is correct:  {other}"),
                }),
            },
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::MissingQuery => Self {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "detail": err.to_string() }),
            },
            WeatherError::LocationUndeterminable => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({ "detail": err.to_string() }),
            },
            WeatherError::UpstreamUnavailable(_)
            | WeatherError::UpstreamMalformed(_)
            | WeatherError::Normalization { .. }
            | WeatherError::Aggregation(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({ "error": err.to_string() }),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, body = %self.body, "request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}
