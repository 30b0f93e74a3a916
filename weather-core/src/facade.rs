use chrono::Local;
use serde_json::Value;

use crate::error::WeatherError;
use crate::location::{GeoLocator, resolve_from_user_input};
use crate::model::{CombinedWeather, CurrentWeather, ForecastEntry};
use crate::normalize;
use crate::upstream::{UpstreamWeatherClient, WeatherResource};

/// Orchestrates resolver, upstream client and normalizer for the four
/// request shapes.
///
/// Collaborators are composed explicitly, not inherited: the combined
/// operation calls [`WeatherFacade::current_by_address`] as an ordinary
/// function and then performs its own forecast step. All upstream calls are
/// strictly sequential; the combined path's second call depends on the first
/// call's normalized output.
pub struct WeatherFacade {
    geo: Box<dyn GeoLocator>,
    upstream: UpstreamWeatherClient,
}

impl WeatherFacade {
    pub fn new(geo: Box<dyn GeoLocator>, upstream: UpstreamWeatherClient) -> Self {
        Self { geo, upstream }
    }

    /// Current conditions at the location of `client_ip`.
    ///
    /// A geolocation failure surfaces verbatim; the weather provider is not
    /// called in that case.
    pub async fn current_by_address(&self, client_ip: &str) -> Result<CurrentWeather, WeatherError> {
        let query = self.geo.locate(client_ip).await?;
        let payload = self.upstream.fetch(WeatherResource::Current, &query).await?;
        normalize::extract_current(&payload, Local::now().naive_local())
    }

    /// Current conditions for a caller-supplied city name or zip code.
    pub async fn current_by_query(&self, text: Option<&str>) -> Result<CurrentWeather, WeatherError> {
        let query = resolve_from_user_input(text)?;
        let payload = self.upstream.fetch(WeatherResource::Current, &query).await?;
        normalize::extract_current(&payload, Local::now().naive_local())
    }

    /// Seven-day forecast window for a caller-supplied city name or zip code.
    pub async fn forecast_by_query(
        &self,
        text: Option<&str>,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let query = resolve_from_user_input(text)?;
        let payload = self.upstream.fetch(WeatherResource::Forecast, &query).await?;
        forecast_window(&payload)
    }

    /// Current conditions plus the seven-day window, both derived from
    /// `client_ip`.
    ///
    /// Short-circuits on a current-conditions failure: the forecast call is
    /// never attempted and the failure propagates unchanged. The forecast is
    /// selected by the *resolved city name* from the first call, not by the
    /// original coordinates.
    pub async fn current_and_forecast_by_address(
        &self,
        client_ip: &str,
    ) -> Result<CombinedWeather, WeatherError> {
        let current = self.current_by_address(client_ip).await?;

        let payload = self
            .upstream
            .fetch_forecast_for_city(&current.city)
            .await
            .map_err(forecast_step_failure)?;
        let forecast = forecast_window(&payload).map_err(forecast_step_failure)?;

        Ok(CombinedWeather {
            current_weather_data: current,
            next_7_days_forecast: forecast,
        })
    }
}

fn forecast_window(payload: &Value) -> Result<Vec<ForecastEntry>, WeatherError> {
    let (city, country) = normalize::extract_location(payload)?;
    let series = normalize::extract_forecast_series(payload, &city, &country)?;
    normalize::filter_next_7_days(series, Local::now().date_naive())
}

fn forecast_step_failure(err: WeatherError) -> WeatherError {
    WeatherError::Aggregation(format!("Error retrieving forecast data: {err}"))
}
