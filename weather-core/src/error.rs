use thiserror::Error;

/// Failure taxonomy for the weather facade and its collaborators.
///
/// Client-input errors (`MissingQuery`) and environmental errors
/// (`LocationUndeterminable`) are first-class and kept distinct from upstream
/// faults so the HTTP layer can map each to the right status and body.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The caller supplied no city name or zip code.
    #[error("Please provide a city name or zip code")]
    MissingQuery,

    /// The geolocation collaborator could not map the client address to
    /// coordinates. Expected real-world condition, not a generic 500.
    #[error("Unable to determine user location.")]
    LocationUndeterminable,

    /// The upstream call failed on the wire or returned a non-success status.
    #[error("upstream request failed: {0}")]
    UpstreamUnavailable(String),

    /// The upstream body could not be decoded as JSON.
    #[error("upstream response could not be decoded: {0}")]
    UpstreamMalformed(String),

    /// An expected key was missing or had the wrong shape in an otherwise
    /// well-formed upstream payload.
    #[error("unexpected upstream payload shape at `{path}`")]
    Normalization { path: String },

    /// Composition failure with a human-readable diagnostic.
    #[error("{0}")]
    Aggregation(String),
}

impl WeatherError {
    pub fn normalization(path: impl Into<String>) -> Self {
        WeatherError::Normalization { path: path.into() }
    }
}
