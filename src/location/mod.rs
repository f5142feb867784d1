//! Site location and IP-based geolocation
//!
//! Location only parametrises the irradiance and weather lookups; the
//! accountant never sees it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ProviderError;

const PROVIDER: &str = "ip-api";

pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json/";

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64, name: Option<String>) -> Self {
        Self {
            latitude,
            longitude,
            name,
        }
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({:.4}, {:.4})", name, self.latitude, self.longitude),
            None => write!(f, "({:.4}, {:.4})", self.latitude, self.longitude),
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<GeoLocation, ProviderError>;
}

/// Geolocation by public IP through ip-api.com
pub struct IpApiClient {
    client: Client,
    url: String,
}

impl IpApiClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }
}

impl Default for IpApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_GEOLOCATION_URL, Duration::from_secs(10))
    }
}

#[async_trait]
impl LocationProvider for IpApiClient {
    async fn locate(&self) -> Result<GeoLocation, ProviderError> {
        debug!(url = %self.url, "resolving location from public IP");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status(),
            });
        }

        let body: IpApiResponse =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Decode {
                    provider: PROVIDER,
                    source,
                })?;

        let location = body.into_location()?;
        info!(%location, "location detected");
        Ok(location)
    }
}

/// Fixed location from configuration
#[derive(Debug, Clone)]
pub struct StaticLocation(pub GeoLocation);

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn locate(&self) -> Result<GeoLocation, ProviderError> {
        Ok(self.0.clone())
    }
}

// ip-api response structure
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

impl IpApiResponse {
    fn into_location(self) -> Result<GeoLocation, ProviderError> {
        if self.status != "success" {
            return Err(ProviderError::Payload {
                provider: PROVIDER,
                reason: self.message.unwrap_or_else(|| format!("status {}", self.status)),
            });
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(GeoLocation::new(lat, lon, self.city)),
            _ => Err(ProviderError::Payload {
                provider: PROVIDER,
                reason: "missing lat/lon".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_location() {
        let location = GeoLocation::new(59.3293, 18.0686, Some("Stockholm".to_string()));
        assert_eq!(location.latitude, 59.3293);
        assert_eq!(location.to_string(), "Stockholm (59.3293, 18.0686)");
    }

    #[test]
    fn test_parse_success() {
        let json = r#"{"status":"success","country":"Brazil","city":"Recife","lat":-8.0476,"lon":-34.877,"query":"1.2.3.4"}"#;
        let body: IpApiResponse = serde_json::from_str(json).unwrap();
        let loc = body.into_location().unwrap();
        assert_eq!(loc.name.as_deref(), Some("Recife"));
        assert_eq!(loc.latitude, -8.0476);
    }

    #[test]
    fn test_parse_fail_status() {
        let json = r#"{"status":"fail","message":"reserved range","query":"127.0.0.1"}"#;
        let body: IpApiResponse = serde_json::from_str(json).unwrap();
        let err = body.into_location().unwrap_err();
        assert!(err.to_string().contains("reserved range"));
    }

    #[tokio::test]
    async fn test_static_location() {
        let provider = StaticLocation(GeoLocation::new(1.0, 2.0, None));
        assert_eq!(provider.locate().await.unwrap().longitude, 2.0);
    }
}
