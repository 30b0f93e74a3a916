use serde::{Deserialize, Serialize};

/// Wall-clock time rendered into canonical records, e.g. "09:30".
pub const TIME_FORMAT: &str = "%H:%M";

/// Calendar date rendered into canonical records, e.g. "15 January 2024".
pub const DATE_FORMAT: &str = "%d %B %Y";

/// Timestamp format carried by each entry of the upstream forecast list.
pub const UPSTREAM_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Location selector for a single upstream call.
///
/// Produced by the location resolver or supplied directly by a caller;
/// consumed once per facade operation, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: f64, lon: f64 },
    Text(String),
}

/// Canonical current-conditions record.
///
/// `time` and `date` are stamped from the moment of normalization. The
/// upstream "current" payload carries no timestamp field, so wall-clock now
/// is the only honest source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub time: String,
    pub country: String,
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub date: String,
}

/// One normalized entry of the upstream forecast series.
///
/// Unlike [`CurrentWeather`], `time` and `date` come from the entry's own
/// upstream timestamp, not from the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: String,
    pub country: String,
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub date: String,
}

/// Result of the combined current + forecast path. Both sub-calls must have
/// succeeded; there is no partial form of this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedWeather {
    pub current_weather_data: CurrentWeather,
    pub next_7_days_forecast: Vec<ForecastEntry>,
}
