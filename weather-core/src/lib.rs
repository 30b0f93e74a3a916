//! Core library for the weather aggregation backend.
//!
//! This crate defines:
//! - Configuration handling
//! - The upstream weather-provider client and the geolocation collaborator
//! - Normalization of upstream payloads into canonical records
//! - The facade orchestrating the four request shapes
//!
//! It is used by `weather-server`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod facade;
pub mod location;
pub mod model;
pub mod normalize;
pub mod upstream;

pub use config::Config;
pub use error::WeatherError;
pub use facade::WeatherFacade;
pub use location::{GeoLocator, IpInfoClient};
pub use model::{CombinedWeather, CurrentWeather, ForecastEntry, LocationQuery};
pub use upstream::{UpstreamWeatherClient, WeatherResource};
