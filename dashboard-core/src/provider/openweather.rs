use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::{
    condition::Condition,
    config::Config,
    error::{ProviderError, truncate_body},
    model::{AirQuality, AqiLevel, Coordinates, ForecastEntry, Units, WeatherSnapshot},
};

use super::WeatherProvider;

/// OpenWeatherMap 2.5 API: `/weather`, `/forecast` and `/air_pollution`.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.into(),
            http,
        })
    }

    /// Fails when no API key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(api_key.to_owned(), &config.weather_url, config.timeout())?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        at: Coordinates,
        units: Units,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        debug!("GET {url} ({:.4}, {:.4})", at.latitude, at.longitude);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", units.as_str().to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    // Entries are decoded one by one after the list is cut to the limit.
    list: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: i64,
}

#[derive(Debug, Deserialize)]
struct OwAirComponents {
    pm2_5: f64,
    no2: f64,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAirMain,
    components: OwAirComponents,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirEntry>,
}

/// Condition category, raw label and description of the first weather item.
fn describe(weather: &[OwWeather]) -> (Condition, String, String) {
    match weather.first() {
        Some(w) => (Condition::from_label(&w.main), w.main.clone(), w.description.clone()),
        None => (Condition::Unknown, "Unknown".to_string(), String::new()),
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, ProviderError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| ProviderError::Payload(format!("timestamp {ts} out of range")))
}

fn normalize_current(raw: OwCurrentResponse) -> Result<WeatherSnapshot, ProviderError> {
    let (condition, condition_label, description) = describe(&raw.weather);

    Ok(WeatherSnapshot {
        condition,
        condition_label,
        description,
        temperature: raw.main.temp,
        feels_like: raw.main.feels_like,
        humidity_pct: raw.main.humidity,
        wind_speed: raw.wind.speed,
        pressure_hpa: raw.main.pressure,
        observed_at: unix_to_utc(raw.dt)?,
    })
}

fn normalize_forecast(
    raw: OwForecastResponse,
    limit: usize,
) -> Result<Vec<ForecastEntry>, ProviderError> {
    raw.list
        .into_iter()
        .take(limit)
        .map(|value| {
            let entry: OwForecastEntry = serde_json::from_value(value)?;
            let (condition, condition_label, description) = describe(&entry.weather);
            Ok(ForecastEntry {
                timestamp: unix_to_utc(entry.dt)?,
                temperature: entry.main.temp,
                condition,
                condition_label,
                description,
            })
        })
        .collect()
}

fn normalize_air(raw: OwAirResponse) -> Result<AirQuality, ProviderError> {
    let entry = raw
        .list
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Payload("air pollution response contained no data".into()))?;

    let aqi = AqiLevel::from_index(entry.main.aqi)
        .ok_or_else(|| ProviderError::Payload(format!("AQI {} outside 1..=5", entry.main.aqi)))?;

    Ok(AirQuality {
        aqi,
        pm2_5: entry.components.pm2_5,
        no2: entry.components.no2,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(
        &self,
        at: Coordinates,
        units: Units,
    ) -> Result<WeatherSnapshot, ProviderError> {
        normalize_current(self.get_json("weather", at, units).await?)
    }

    async fn forecast(
        &self,
        at: Coordinates,
        units: Units,
        limit: usize,
    ) -> Result<Vec<ForecastEntry>, ProviderError> {
        normalize_forecast(self.get_json("forecast", at, units).await?, limit)
    }

    async fn air_quality(
        &self,
        at: Coordinates,
        units: Units,
    ) -> Result<AirQuality, ProviderError> {
        normalize_air(self.get_json("air_pollution", at, units).await?)
    }
}
