use crate::{
    Config, FetchError, Location, RawForecast,
    provider::{fixed::FixedLocationProvider, ip_api::IpApiGeolocator, open_meteo::OpenMeteoClient},
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod fixed;
pub mod ip_api;
pub mod open_meteo;

/// Where the location for a refresh comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationSource {
    Ip,
    Fixed,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Ip => "ip",
            LocationSource::Fixed => "fixed",
        }
    }

    pub const fn all() -> &'static [LocationSource] {
        &[LocationSource::Ip, LocationSource::Fixed]
    }
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LocationSource {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "ip" => Ok(LocationSource::Ip),
            "fixed" => Ok(LocationSource::Fixed),
            _ => Err(anyhow::anyhow!(
                "Unknown location source '{value}'. Supported sources: ip, fixed."
            )),
        }
    }
}

/// Resolves the location a forecast should be fetched for.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Result<Location, FetchError>;
}

/// Fetches current, full hourly and daily series for a coordinate.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<RawForecast, FetchError>;
}

/// Shared HTTP client honouring the configured request timeout.
pub fn http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
        .build()?;
    Ok(client)
}

/// Construct the location provider selected in config.
pub fn location_provider_from_config(
    config: &Config,
    http: reqwest::Client,
) -> anyhow::Result<Box<dyn LocationProvider>> {
    let source = config.location_source_id()?;

    let boxed: Box<dyn LocationProvider> = match source {
        LocationSource::Ip => Box::new(IpApiGeolocator::with_client(
            http,
            config.endpoints.geolocation_url.clone(),
        )),
        LocationSource::Fixed => {
            let location = config.fixed_location.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "Location source is 'fixed' but no fixed location is configured.\n\
                     Hint: run `nowcast configure` and enter a city and coordinates."
                )
            })?;
            Box::new(FixedLocationProvider::new(location))
        }
    };

    Ok(boxed)
}

pub fn forecast_provider_from_config(
    config: &Config,
    http: reqwest::Client,
) -> Box<dyn ForecastProvider> {
    Box::new(OpenMeteoClient::with_client(
        http,
        config.endpoints.forecast_url.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn location_source_as_str_roundtrip() {
        for id in LocationSource::all() {
            let s = id.as_str();
            let parsed = LocationSource::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn location_source_is_case_insensitive() {
        assert_eq!(LocationSource::try_from("FIXED").unwrap(), LocationSource::Fixed);
    }

    #[test]
    fn unknown_location_source_error() {
        let err = LocationSource::try_from("gps").unwrap_err();
        assert!(err.to_string().contains("Unknown location source"));
    }

    #[test]
    fn fixed_source_without_location_errors() {
        let mut cfg = Config::default();
        cfg.set_location_source(LocationSource::Fixed);

        let err = location_provider_from_config(&cfg, reqwest::Client::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no fixed location is configured"));
        assert!(msg.contains("Hint: run `nowcast configure`"));
    }

    #[test]
    fn default_config_builds_ip_provider() {
        let cfg = Config::default();
        let provider = location_provider_from_config(&cfg, reqwest::Client::new());
        assert!(provider.is_ok());
    }

    #[test]
    fn http_client_builds_from_default_config() {
        assert!(http_client(&Config::default()).is_ok());
    }
}
