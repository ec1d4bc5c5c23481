//! Core library for the `weather-dashboard` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding of free-text place names
//! - Abstraction over weather providers, with an OpenWeatherMap implementation
//! - The fetch-and-normalize pipeline producing a [`WeatherReport`]
//!
//! Nothing here renders output; `dashboard-cli` does that.

pub mod condition;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod locator;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use condition::Condition;
pub use config::Config;
pub use error::{ProviderError, Resource, WeatherError};
pub use fetcher::{FORECAST_LIMIT, WeatherFetcher};
pub use locator::Locator;
pub use model::{
    AirQuality, AqiLevel, Coordinates, ForecastEntry, Place, Units, WeatherReport, WeatherSnapshot,
};
pub use pipeline::Pipeline;
pub use provider::{OpenWeatherProvider, WeatherProvider};
