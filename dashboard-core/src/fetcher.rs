use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::{
    error::{ProviderError, Resource, WeatherError},
    model::{AirQuality, Place, Units, WeatherReport},
    provider::WeatherProvider,
};

/// Maximum number of forecast entries kept in a report.
pub const FORECAST_LIMIT: usize = 5;

/// Fetches current conditions, forecast and air quality for a place.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Current and forecast are required; air quality degrades to `None`.
    ///
    /// The three requests run concurrently. When both required requests fail,
    /// the current-conditions failure is the one reported.
    pub async fn fetch(&self, place: &Place, units: Units) -> Result<WeatherReport, WeatherError> {
        let at = place.coordinates().ok_or(WeatherError::InvalidPlace)?;

        let (current, forecast, air) = tokio::join!(
            self.provider.current(at, units),
            self.provider.forecast(at, units, FORECAST_LIMIT),
            self.provider.air_quality(at, units),
        );

        let current = current.map_err(|e| WeatherError::fetch(Resource::Current, e))?;
        let mut forecast = forecast.map_err(|e| WeatherError::fetch(Resource::Forecast, e))?;
        forecast.truncate(FORECAST_LIMIT);

        Ok(WeatherReport {
            place: place.clone(),
            units,
            current,
            forecast,
            air: absorb_air_failure(air),
        })
    }
}

fn absorb_air_failure(result: Result<AirQuality, ProviderError>) -> Option<AirQuality> {
    match result {
        Ok(air) => {
            debug!("Air quality index {}", air.aqi.index());
            Some(air)
        }
        Err(e) if e.is_defect() => {
            error!("Air quality unavailable, provider contract broken: {e}");
            None
        }
        Err(e) => {
            warn!("Air quality unavailable: {e}");
            None
        }
    }
}
