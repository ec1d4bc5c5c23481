use reqwest::StatusCode;
use thiserror::Error;

/// Required resources whose failure aborts a lookup. Air quality is optional
/// and never reported through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Current,
    Forecast,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Current => "current",
            Resource::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to a weather provider for a single resource.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse provider JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected payload: {0}")]
    Payload(String),
}

impl ProviderError {
    /// True when retrying cannot help: bad credentials or a payload that does
    /// not match the expected shape.
    pub fn is_defect(&self) -> bool {
        match self {
            ProviderError::Transport(_) => false,
            ProviderError::Status { status, .. } => {
                status.is_client_error() && *status != StatusCode::TOO_MANY_REQUESTS
            }
            ProviderError::Decode(_) | ProviderError::Payload(_) => true,
        }
    }
}

/// Every way a lookup can fail.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Geocoding service timed out. Please try again.")]
    GeocodingTimeout,

    #[error("Could not find location: {query}")]
    PlaceNotFound { query: String },

    #[error("Geocoding failed: {cause}")]
    GeocodingFailed { cause: String },

    #[error("place has no valid coordinates")]
    InvalidPlace,

    #[error("Failed to fetch {resource} weather: {cause}")]
    WeatherFetchFailed {
        resource: Resource,
        #[source]
        cause: ProviderError,
    },
}

impl WeatherError {
    /// Whether repeating the same query may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            WeatherError::GeocodingTimeout | WeatherError::GeocodingFailed { .. } => true,
            WeatherError::WeatherFetchFailed { cause, .. } => !cause.is_defect(),
            WeatherError::PlaceNotFound { .. } | WeatherError::InvalidPlace => false,
        }
    }

    pub(crate) fn fetch(resource: Resource, cause: ProviderError) -> Self {
        WeatherError::WeatherFetchFailed { resource, cause }
    }
}

/// Cut long response bodies down for error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
