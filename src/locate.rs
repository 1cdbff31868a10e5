//! Current-position lookup used to pick the startup query

use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(thiserror::Error, Debug)]
pub enum GeolocationError {
    #[error("geolocation is not available")]
    Unavailable,
    #[error("geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geolocation lookup failed: {0}")]
    Lookup(String),
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Resolves the position from the caller's public IP address
pub struct IpGeolocator {
    client: reqwest::Client,
    url: String,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let response: IpLocationResponse = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "success" {
            return Err(GeolocationError::Lookup(
                response.message.unwrap_or(response.status),
            ));
        }

        match (response.lat, response.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(GeolocationError::Lookup("missing coordinates".to_string())),
        }
    }
}

/// Always reports the configured position
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// Geolocation turned off
pub struct Disabled;

#[async_trait]
impl Geolocator for Disabled {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_position() {
        let coords = Coordinates {
            lat: 51.5,
            lon: -0.1,
        };
        let position = FixedPosition(coords).current_position().await.unwrap();
        assert_eq!(position, coords);
    }

    #[tokio::test]
    async fn test_disabled_is_unavailable() {
        let err = Disabled.current_position().await.unwrap_err();
        assert!(matches!(err, GeolocationError::Unavailable));
    }
}
