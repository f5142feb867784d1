//! Current weather from Open-Meteo
//!
//! Only the current-conditions block is requested. Fields missing from the
//! payload stay `None` and derate nothing.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{WeatherObservation, WeatherProvider};
use crate::error::ProviderError;
use crate::location::GeoLocation;

const PROVIDER: &str = "open-meteo";

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Open-Meteo forecast API client
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn current_url(&self, location: &GeoLocation) -> String {
        format!(
            "{}/forecast?latitude={:.4}&longitude={:.4}&current=cloud_cover,temperature_2m,rain,wind_speed_10m&wind_speed_unit=kmh",
            self.base_url, location.latitude, location.longitude
        )
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(10))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current(&self, location: &GeoLocation) -> Result<WeatherObservation, ProviderError> {
        let url = self.current_url(location);
        debug!(%url, "fetching current weather");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "weather API returned error status");
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status(),
            });
        }

        let body: OpenMeteoResponse =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Decode {
                    provider: PROVIDER,
                    source,
                })?;

        let current = body.current.ok_or_else(|| ProviderError::Payload {
            provider: PROVIDER,
            reason: "missing `current` block".to_string(),
        })?;

        Ok(current.into())
    }
}

// Open-Meteo API response structures
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current: Option<OpenMeteoCurrent>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    cloud_cover: Option<f64>,
    temperature_2m: Option<f64>,
    rain: Option<f64>,
    wind_speed_10m: Option<f64>,
}

impl From<OpenMeteoCurrent> for WeatherObservation {
    fn from(c: OpenMeteoCurrent) -> Self {
        Self {
            cloud_cover_percent: c.cloud_cover,
            rain_mm: c.rain,
            temperature_c: c.temperature_2m,
            wind_speed_kmh: c.wind_speed_10m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let json = r#"{
            "latitude": -23.5,
            "longitude": -46.625,
            "current_units": {"cloud_cover": "%", "rain": "mm"},
            "current": {
                "time": "2025-01-10T12:00",
                "interval": 900,
                "cloud_cover": 50,
                "temperature_2m": 30.0,
                "rain": 0.0,
                "wind_speed_10m": 10.0
            }
        }"#;
        let body: OpenMeteoResponse = serde_json::from_str(json).unwrap();
        let obs: WeatherObservation = body.current.unwrap().into();
        assert_eq!(obs.cloud_cover_percent, Some(50.0));
        assert_eq!(obs.temperature_c, Some(30.0));
        assert_eq!(obs.rain_mm, Some(0.0));
        assert_eq!(obs.wind_speed_kmh, Some(10.0));
    }

    #[test]
    fn test_parse_partial_payload() {
        let json = r#"{"current": {"temperature_2m": 18.5, "rain": null}}"#;
        let body: OpenMeteoResponse = serde_json::from_str(json).unwrap();
        let obs: WeatherObservation = body.current.unwrap().into();
        assert_eq!(obs.temperature_c, Some(18.5));
        assert_eq!(obs.cloud_cover_percent, None);
        assert_eq!(obs.rain_mm, None);
    }

    #[test]
    fn test_url_contains_coordinates() {
        let client = OpenMeteoClient::new("http://localhost:1234/v1/", Duration::from_secs(1));
        let url = client.current_url(&GeoLocation::new(59.3293, 18.0686, None));
        assert!(url.starts_with("http://localhost:1234/v1/forecast?"));
        assert!(url.contains("latitude=59.3293"));
        assert!(url.contains("longitude=18.0686"));
    }

    #[tokio::test]
    #[ignore] // Ignore by default as it requires network access
    async fn test_fetch_live_weather() {
        let client = OpenMeteoClient::default();
        let location = GeoLocation::new(59.3293, 18.0686, Some("Stockholm".to_string()));
        let obs = client.current(&location).await;
        assert!(obs.is_ok(), "Failed to fetch current weather");
    }
}
