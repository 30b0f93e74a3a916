use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor standing in for the authentication collaborator.
///
/// Rejects with 401 before any facade logic runs. Routes opt in by taking
/// `RequireAuth` as an argument.
pub struct RequireAuth;

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match token {
            Some(token) if token == state.auth_token => Ok(RequireAuth),
            Some(_) => Err(ApiError::unauthorized("Invalid token.")),
            None => Err(ApiError::unauthorized(
                "Authentication credentials were not provided.",
            )),
        }
    }
}
