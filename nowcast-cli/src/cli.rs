use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use nowcast_core::{
    Config, ForecastAggregator, LocatedForecast, Location, LocationSource, aggregator_from_config,
};
use tokio::time::MissedTickBehavior;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nowcast", version, about = "Current weather, next 24 hours and 10-day forecast")]
pub struct Cli {
    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the location source and refresh interval.
    Configure,

    /// Show the location used for forecasts.
    Locate,

    /// Fetch and print one forecast snapshot.
    Show {
        /// Latitude; skips location lookup when given with --lon.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude; skips location lookup when given with --lat.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the snapshot as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Keep the display up to date, refreshing on the configured interval.
    Watch,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            return "debug";
        }
        match self.command {
            Command::Watch => "info",
            _ => "warn",
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Locate => {
                let config = Config::load()?;
                let aggregator = aggregator_from_config(&config)?;
                let location = aggregator
                    .locate()
                    .await
                    .context("Failed to determine location")?;
                println!("{}", render::location_label(&location));
                println!("{:.4}, {:.4}", location.latitude, location.longitude);
                Ok(())
            }
            Command::Show { lat, lon, json } => {
                let config = Config::load()?;
                let aggregator = aggregator_from_config(&config)?;
                let forecast = match (lat, lon) {
                    (Some(latitude), Some(longitude)) => {
                        let snapshot = aggregator
                            .get(latitude, longitude)
                            .await
                            .context("Failed to fetch forecast")?;
                        LocatedForecast {
                            location: Location {
                                city: format!("{latitude}, {longitude}"),
                                country: String::new(),
                                latitude,
                                longitude,
                            },
                            snapshot,
                        }
                    }
                    _ => aggregator.refresh().await.context("Failed to fetch forecast")?,
                };

                if json {
                    println!("{}", serde_json::to_string_pretty(&forecast)?);
                } else {
                    print!("{}", render::render(&forecast, Utc::now().date_naive()));
                }
                Ok(())
            }
            Command::Watch => {
                let config = Config::load()?;
                let aggregator = aggregator_from_config(&config)?;
                watch(&aggregator, config.refresh_interval()).await
            }
        }
    }
}

/// Refresh on every tick; the next tick waits until the current refresh returns.
///
/// A failed refresh keeps the last good snapshot on screen.
async fn watch(aggregator: &ForecastAggregator, every: std::time::Duration) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(interval_secs = every.as_secs(), "watching forecast");

    let mut last: Option<LocatedForecast> = None;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("stopping");
                return Ok(());
            }
        }

        match aggregator.refresh().await {
            Ok(forecast) => last = Some(forecast),
            Err(e) => tracing::warn!(error = %e, "refresh failed, keeping previous snapshot"),
        }

        if let Some(forecast) = &last {
            // clear screen, cursor home
            print!("\x1B[2J\x1B[H");
            print!("{}", render::render(forecast, Utc::now().date_naive()));
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let sources: Vec<&str> = LocationSource::all().iter().map(|s| s.as_str()).collect();
    let current = config.location_source_id().unwrap_or(LocationSource::Ip);
    let start = LocationSource::all()
        .iter()
        .position(|s| *s == current)
        .unwrap_or(0);

    let choice = Select::new("Location source:", sources)
        .with_starting_cursor(start)
        .with_help_message("ip = look up by public IP on every refresh, fixed = always use one place")
        .prompt()?;

    match LocationSource::try_from(choice)? {
        LocationSource::Ip => config.set_location_source(LocationSource::Ip),
        LocationSource::Fixed => {
            let previous = config.fixed_location.clone();
            let city = Text::new("City:")
                .with_default(previous.as_ref().map_or("", |l| l.city.as_str()))
                .prompt()?;
            let country = Text::new("Country:")
                .with_default(previous.as_ref().map_or("", |l| l.country.as_str()))
                .prompt()?;
            let latitude = CustomType::<f64>::new("Latitude:")
                .with_validator(|v: &f64| {
                    Ok(if (-90.0..=90.0).contains(v) {
                        inquire::validator::Validation::Valid
                    } else {
                        inquire::validator::Validation::Invalid("must be between -90 and 90".into())
                    })
                })
                .prompt()?;
            let longitude = CustomType::<f64>::new("Longitude:")
                .with_validator(|v: &f64| {
                    Ok(if (-180.0..=180.0).contains(v) {
                        inquire::validator::Validation::Valid
                    } else {
                        inquire::validator::Validation::Invalid("must be between -180 and 180".into())
                    })
                })
                .prompt()?;

            config.set_fixed_location(Location { city, country, latitude, longitude });
        }
    }

    config.refresh_interval_secs = CustomType::<u64>::new("Refresh interval (seconds):")
        .with_default(config.refresh_interval_secs)
        .prompt()?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["nowcast", "show", "--lat", "51.5", "--lon", "-0.12"]).unwrap();
        match cli.command {
            Command::Show { lat, lon, json } => {
                assert_eq!(lat, Some(51.5));
                assert_eq!(lon, Some(-0.12));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["nowcast", "show", "--lat", "51.5"]).is_err());
    }

    #[test]
    fn log_level_depends_on_command() {
        let watch = Cli::try_parse_from(["nowcast", "watch"]).unwrap();
        assert_eq!(watch.log_level(), "info");

        let show = Cli::try_parse_from(["nowcast", "show"]).unwrap();
        assert_eq!(show.log_level(), "warn");

        let verbose = Cli::try_parse_from(["nowcast", "-v", "locate"]).unwrap();
        assert_eq!(verbose.log_level(), "debug");
    }
}
