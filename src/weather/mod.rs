//! Weather inputs: derating logic and the provider boundary.

pub mod derating;
pub mod open_meteo;

pub use derating::{DeratingCoefficients, DeratingFactors, WeatherObservation};
pub use open_meteo::OpenMeteoClient;

use async_trait::async_trait;
use tracing::warn;

use crate::error::ProviderError;
use crate::location::GeoLocation;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at `location`
    async fn current(&self, location: &GeoLocation) -> Result<WeatherObservation, ProviderError>;
}

/// Fetch current weather, substituting a neutral observation on any failure.
///
/// Nothing past this boundary ever sees a provider error.
pub async fn fetch_or_neutral<P>(provider: &P, location: &GeoLocation) -> WeatherObservation
where
    P: WeatherProvider + ?Sized,
{
    match provider.current(location).await {
        Ok(obs) => obs,
        Err(error) => {
            warn!(%error, "weather unavailable, using neutral derating");
            WeatherObservation::neutral()
        }
    }
}

/// Provider that always reports neutral conditions (offline runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralWeather;

#[async_trait]
impl WeatherProvider for NeutralWeather {
    async fn current(&self, _location: &GeoLocation) -> Result<WeatherObservation, ProviderError> {
        Ok(WeatherObservation::neutral())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWeather;

    #[async_trait]
    impl WeatherProvider for FailingWeather {
        async fn current(&self, _: &GeoLocation) -> Result<WeatherObservation, ProviderError> {
            Err(ProviderError::Payload {
                provider: "test",
                reason: "boom".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_failure_becomes_neutral() {
        let loc = GeoLocation::new(0.0, 0.0, None);
        let obs = fetch_or_neutral(&FailingWeather, &loc).await;
        assert!(obs.is_neutral());
    }

    #[tokio::test]
    async fn test_neutral_provider() {
        let loc = GeoLocation::new(10.0, 20.0, None);
        let obs = fetch_or_neutral(&NeutralWeather, &loc).await;
        assert_eq!(DeratingFactors::from_observation(&obs), DeratingFactors::NEUTRAL);
    }
}
