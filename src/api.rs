//! Weather API client

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::state::{LocationSummary, WeatherQuery, WeatherResult};
use crate::suggest::SuggestionKey;

pub const DEFAULT_BASE_URL: &str = "https://freetestapi.com/api/v1/weathers";

/// Message used when a failed response carries no usable body
pub const GENERIC_FAILURE: &str = "Failed to fetch weather";

/// Weather API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    /// Non-2xx response; `message` is taken from the body when present
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("{GENERIC_FAILURE} (HTTP {status})"))
}

/// Client for the `/weathers` collection endpoint
#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}?search={}", self.base_url, urlencoding::encode(query))
    }

    fn coordinates_url(&self, lat: f64, lon: f64) -> String {
        format!("{}?lat={}&lon={}", self.base_url, lat, lon)
    }

    async fn get_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Search by city name; the first match wins
    pub async fn fetch_by_city(&self, city: &str) -> Result<Option<WeatherResult>, ApiError> {
        let results: Vec<WeatherResult> = self.get_list(&self.search_url(city)).await?;
        Ok(results.into_iter().next())
    }

    pub async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Option<WeatherResult>, ApiError> {
        let results: Vec<WeatherResult> = self.get_list(&self.coordinates_url(lat, lon)).await?;
        Ok(results.into_iter().next())
    }

    pub async fn fetch(&self, query: &WeatherQuery) -> Result<Option<WeatherResult>, ApiError> {
        match query {
            WeatherQuery::City(city) => self.fetch_by_city(city).await,
            WeatherQuery::Coordinates { lat, lon } => self.fetch_by_coordinates(*lat, *lon).await,
        }
    }

    /// Fetch the suggestion list for a search key
    pub async fn suggestions(&self, key: &SuggestionKey) -> Result<Vec<LocationSummary>, ApiError> {
        let url = match key {
            SuggestionKey::All => self.base_url.clone(),
            SuggestionKey::Search(query) => self.search_url(query),
        };
        self.get_list(&url).await
    }
}
