//! Free-text place name to coordinates, via OpenStreetMap Nominatim.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::Config,
    error::{WeatherError, truncate_body},
    model::{Coordinates, Place},
};

#[derive(Debug, Deserialize)]
struct NominatimHit {
    // Nominatim sends coordinates as strings.
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Clone)]
pub struct Locator {
    base_url: String,
    http: Client,
}

impl Locator {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(&config.geocoder_url, &config.user_agent, config.timeout())?)
    }

    /// Resolve `query` to a place with coordinates and a canonical address.
    pub async fn locate(&self, query: &str) -> Result<Place, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::PlaceNotFound {
                query: query.to_string(),
            });
        }

        debug!("Geocoding {query:?}");

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .get(url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(geocoding_error)?;

        let status = res.status();
        let body = res.text().await.map_err(geocoding_error)?;

        if !status.is_success() {
            return Err(WeatherError::GeocodingFailed {
                cause: format!("status {}: {}", status, truncate_body(&body)),
            });
        }

        let hits: Vec<NominatimHit> =
            serde_json::from_str(&body).map_err(|e| WeatherError::GeocodingFailed {
                cause: format!("failed to parse geocoder JSON: {e}"),
            })?;

        let Some(hit) = hits.into_iter().next() else {
            return Err(WeatherError::PlaceNotFound {
                query: query.to_string(),
            });
        };

        let coordinates = parse_coordinates(&hit.lat, &hit.lon).ok_or_else(|| {
            WeatherError::GeocodingFailed {
                cause: format!("invalid coordinates ({}, {})", hit.lat, hit.lon),
            }
        })?;

        debug!(
            "Found {} ({:.4}, {:.4})",
            hit.display_name, coordinates.latitude, coordinates.longitude
        );

        Ok(Place::resolved(query, coordinates, hit.display_name))
    }
}

fn geocoding_error(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::GeocodingTimeout
    } else {
        WeatherError::GeocodingFailed {
            cause: err.to_string(),
        }
    }
}

fn parse_coordinates(lat: &str, lon: &str) -> Option<Coordinates> {
    let lat = lat.trim().parse().ok()?;
    let lon = lon.trim().parse().ok()?;
    Coordinates::new(lat, lon)
}
