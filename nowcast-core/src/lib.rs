//! Core library for the `nowcast` weather display.
//!
//! This crate defines:
//! - Configuration handling
//! - Location lookup (IP geolocation or a fixed place)
//! - Forecast fetching and normalization from Open-Meteo
//! - Windowing of the hourly series and snapshot aggregation
//! - The static weather-code table
//!
//! It is used by `nowcast-cli`, but the aggregator has no UI dependencies
//! and can be driven by any display layer.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod weather_code;

pub use aggregator::ForecastAggregator;
pub use config::{Config, Endpoints};
pub use error::FetchError;
pub use model::{ForecastDay, ForecastPoint, ForecastSnapshot, LocatedForecast, Location, RawForecast};
pub use provider::{ForecastProvider, LocationProvider, LocationSource};

/// Build an aggregator wired to the providers selected in `config`.
pub fn aggregator_from_config(config: &Config) -> anyhow::Result<ForecastAggregator> {
    let http = provider::http_client(config)?;
    let locator = provider::location_provider_from_config(config, http.clone())?;
    let forecaster = provider::forecast_provider_from_config(config, http);
    Ok(ForecastAggregator::new(locator, forecaster))
}
