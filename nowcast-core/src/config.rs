use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    Location,
    provider::{LocationSource, ip_api, open_meteo},
};

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Remote services used for a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geolocation_url: String,
    pub forecast_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geolocation_url: ip_api::DEFAULT_URL.to_string(),
            forecast_url: open_meteo::DEFAULT_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "ip" or "fixed".
    pub location_source: String,

    pub refresh_interval_secs: u64,

    pub request_timeout_secs: u64,

    pub endpoints: Endpoints,

    /// Example TOML:
    /// [fixed_location]
    /// city = "London"
    /// country = "United Kingdom"
    /// latitude = 51.5
    /// longitude = -0.12
    pub fixed_location: Option<Location>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location_source: LocationSource::Ip.as_str().to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
            fixed_location: None,
        }
    }
}

impl Config {
    /// Return the location source as a strongly-typed LocationSource.
    pub fn location_source_id(&self) -> Result<LocationSource> {
        LocationSource::try_from(self.location_source.as_str()).map_err(|e| {
            anyhow!("{e}\nHint: run `nowcast configure` or fix `location_source` in the config file.")
        })
    }

    pub fn set_location_source(&mut self, source: LocationSource) {
        self.location_source = source.as_str().to_string();
    }

    /// Pin the location and switch the source to "fixed".
    pub fn set_fixed_location(&mut self, location: Location) {
        self.fixed_location = Some(location);
        self.set_location_source(LocationSource::Fixed);
    }

    /// Interval between refreshes, never below one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nowcast", "nowcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_ip_location_and_public_endpoints() {
        let cfg = Config::default();

        assert_eq!(cfg.location_source_id().unwrap(), LocationSource::Ip);
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(60));
        assert_eq!(cfg.endpoints.geolocation_url, "http://ip-api.com/json/");
        assert_eq!(cfg.endpoints.forecast_url, "https://api.open-meteo.com/v1/forecast/");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg = Config::from_toml("refresh_interval_secs = 300\n").unwrap();

        assert_eq!(cfg.refresh_interval_secs, 300);
        assert_eq!(cfg.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(cfg.endpoints, Endpoints::default());
        assert!(cfg.fixed_location.is_none());
    }

    #[test]
    fn fixed_location_parses_from_toml() {
        let cfg = Config::from_toml(
            r#"
            location_source = "fixed"

            [fixed_location]
            city = "London"
            country = "United Kingdom"
            latitude = 51.5
            longitude = -0.12
            "#,
        )
        .unwrap();

        assert_eq!(cfg.location_source_id().unwrap(), LocationSource::Fixed);
        let loc = cfg.fixed_location.expect("fixed location must be present");
        assert_eq!(loc.city, "London");
        assert_eq!(loc.longitude, -0.12);
    }

    #[test]
    fn unknown_location_source_mentions_hint() {
        let cfg = Config { location_source: "gps".into(), ..Config::default() };
        let msg = cfg.location_source_id().unwrap_err().to_string();

        assert!(msg.contains("Unknown location source"));
        assert!(msg.contains("Hint: run `nowcast configure`"));
    }

    #[test]
    fn set_fixed_location_switches_source() {
        let mut cfg = Config::default();
        cfg.set_fixed_location(Location {
            city: "Oslo".into(),
            country: "Norway".into(),
            latitude: 59.91,
            longitude: 10.75,
        });

        assert_eq!(cfg.location_source_id().unwrap(), LocationSource::Fixed);
        assert!(cfg.fixed_location.is_some());
    }

    #[test]
    fn refresh_interval_has_a_floor() {
        let cfg = Config { refresh_interval_secs: 0, ..Config::default() };
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.refresh_interval_secs = 120;
        let text = toml::to_string_pretty(&cfg).unwrap();

        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.refresh_interval_secs, 120);
        assert_eq!(back.location_source, "ip");
    }
}
