use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::ProviderError,
    model::{AirQuality, Coordinates, ForecastEntry, Units, WeatherSnapshot},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// A source of weather data for a coordinate pair.
///
/// Implementations return normalized values; the forecast comes back in
/// provider order with at most `limit` entries. Entries past `limit` are
/// never inspected, so a malformed tail cannot fail the call.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(
        &self,
        at: Coordinates,
        units: Units,
    ) -> Result<WeatherSnapshot, ProviderError>;

    async fn forecast(
        &self,
        at: Coordinates,
        units: Units,
        limit: usize,
    ) -> Result<Vec<ForecastEntry>, ProviderError>;

    async fn air_quality(
        &self,
        at: Coordinates,
        units: Units,
    ) -> Result<AirQuality, ProviderError>;
}
