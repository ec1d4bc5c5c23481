use std::sync::Arc;
use tracing::{Instrument, info, info_span};

use crate::{
    config::Config,
    error::WeatherError,
    fetcher::WeatherFetcher,
    locator::Locator,
    model::{Units, WeatherReport},
    provider::OpenWeatherProvider,
};

/// Locate a place, then fetch its weather.
#[derive(Debug, Clone)]
pub struct Pipeline {
    locator: Locator,
    fetcher: WeatherFetcher,
    units: Units,
}

impl Pipeline {
    pub fn new(locator: Locator, fetcher: WeatherFetcher, units: Units) -> Self {
        Self {
            locator,
            fetcher,
            units,
        }
    }

    /// Build the OpenWeatherMap + Nominatim pipeline. Fails when no API key
    /// is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = OpenWeatherProvider::from_config(config)?;
        let locator = Locator::from_config(config)?;

        Ok(Self::new(
            locator,
            WeatherFetcher::new(Arc::new(provider)),
            config.units,
        ))
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub async fn lookup(&self, query: &str) -> Result<WeatherReport, WeatherError> {
        async {
            let place = self.locator.locate(query).await?;
            let report = self.fetcher.fetch(&place, self.units).await?;

            info!(
                address = report.place.display_name(),
                air = report.air.is_some(),
                "Weather lookup complete"
            );
            Ok(report)
        }
        .instrument(info_span!("lookup", query = query.trim()))
        .await
    }
}
