//! Pure transformations from raw upstream payloads to canonical records.
//!
//! No I/O happens here. Every function takes the decoded payload (and, where
//! the result depends on the clock, an explicit `now`) so the whole module is
//! deterministic under test. Shape violations are reported with the path of
//! the offending field.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::WeatherError;
use crate::model::{
    CurrentWeather, DATE_FORMAT, ForecastEntry, TIME_FORMAT, UPSTREAM_TIMESTAMP_FORMAT,
};

/// Normalize a current-conditions payload.
///
/// `time`/`date` are stamped from `now` — the upstream current payload has no
/// timestamp of its own.
pub fn extract_current(payload: &Value, now: NaiveDateTime) -> Result<CurrentWeather, WeatherError> {
    let country = str_field(payload, &["sys", "country"], "sys.country")?;
    let city = str_field(payload, &["name"], "name")?;
    let temperature = f64_field(payload, &["main", "temp"], "main.temp")?;
    let description = first_condition_description(payload, "weather")?;

    Ok(CurrentWeather {
        time: now.format(TIME_FORMAT).to_string(),
        country,
        city,
        temperature,
        description,
        date: now.format(DATE_FORMAT).to_string(),
    })
}

/// Read the city/country pair out of a forecast-shaped payload.
///
/// Forecast payloads nest location under `city`, unlike current payloads
/// which use top-level `name` and `sys.country`. The asymmetry is upstream's.
pub fn extract_location(payload: &Value) -> Result<(String, String), WeatherError> {
    let city = str_field(payload, &["city", "name"], "city.name")?;
    let country = str_field(payload, &["city", "country"], "city.country")?;
    Ok((city, country))
}

/// Normalize the flat forecast list, preserving upstream (chronological)
/// order. City and country are not per-entry upstream, so the caller passes
/// the pair from [`extract_location`] and it is carried into every entry.
pub fn extract_forecast_series(
    payload: &Value,
    city: &str,
    country: &str,
) -> Result<Vec<ForecastEntry>, WeatherError> {
    let list = payload
        .get("list")
        .and_then(Value::as_array)
        .ok_or_else(|| WeatherError::normalization("list"))?;

    let mut series = Vec::with_capacity(list.len());

    for (idx, entry) in list.iter().enumerate() {
        let dt_txt = str_field(entry, &["dt_txt"], &format!("list[{idx}].dt_txt"))?;
        let stamp = NaiveDateTime::parse_from_str(&dt_txt, UPSTREAM_TIMESTAMP_FORMAT)
            .map_err(|_| WeatherError::normalization(format!("list[{idx}].dt_txt")))?;

        let temperature = f64_field(entry, &["main", "temp"], &format!("list[{idx}].main.temp"))?;
        let description = first_condition_description(entry, &format!("list[{idx}].weather"))?;

        series.push(ForecastEntry {
            time: stamp.format(TIME_FORMAT).to_string(),
            country: country.to_string(),
            city: city.to_string(),
            temperature,
            description,
            date: stamp.format(DATE_FORMAT).to_string(),
        });
    }

    Ok(series)
}

/// Keep entries whose date falls within the next seven calendar days.
///
/// The comparison re-parses the already-formatted `date` string, so it is
/// date-granular: time of day plays no part. There is deliberately no lower
/// bound; entries dated before `today` pass through unchanged.
pub fn filter_next_7_days(
    series: Vec<ForecastEntry>,
    today: NaiveDate,
) -> Result<Vec<ForecastEntry>, WeatherError> {
    let cutoff = today + Duration::days(7);
    let mut window = Vec::with_capacity(series.len());

    for (idx, entry) in series.into_iter().enumerate() {
        let date = NaiveDate::parse_from_str(&entry.date, DATE_FORMAT)
            .map_err(|_| WeatherError::normalization(format!("list[{idx}].date")))?;
        if date <= cutoff {
            window.push(entry);
        }
    }

    Ok(window)
}

fn lookup<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut value = payload;
    for key in keys {
        value = value.get(key)?;
    }
    Some(value)
}

fn str_field(payload: &Value, keys: &[&str], path: &str) -> Result<String, WeatherError> {
    lookup(payload, keys)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WeatherError::normalization(path))
}

fn f64_field(payload: &Value, keys: &[&str], path: &str) -> Result<f64, WeatherError> {
    lookup(payload, keys)
        .and_then(Value::as_f64)
        .ok_or_else(|| WeatherError::normalization(path))
}

/// First element of a `weather`-conditions list, `description` field.
fn first_condition_description(container: &Value, path: &str) -> Result<String, WeatherError> {
    container
        .get("weather")
        .and_then(Value::as_array)
        .and_then(|conditions| conditions.first())
        .and_then(|condition| condition.get("description"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WeatherError::normalization(format!("{path}[0].description")))
}
