use std::sync::Arc;
use weather_core::WeatherFacade;

/// Shared handler state. Everything request-scoped lives in the facade's
/// return values; the state itself is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<WeatherFacade>,
    pub auth_token: String,
}
