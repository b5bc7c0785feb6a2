use std::sync::Arc;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::{
    FetchError, ForecastDay, ForecastPoint, ForecastSnapshot, LocatedForecast, Location,
    provider::{ForecastProvider, LocationProvider},
};

pub const HOURLY_WINDOW: usize = 24;
pub const DAILY_WINDOW: usize = 10;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Start of the first full hour after `now`: truncate to the hour, add one.
pub fn next_full_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let hour = TimeDelta::hours(1);
    // Truncating a valid UTC timestamp to the hour cannot overflow.
    now.duration_trunc(hour).unwrap_or(now) + hour
}

/// The next [`HOURLY_WINDOW`] hourly points, skipping the current hour's bucket.
///
/// Input order is kept; the API already returns ascending times.
pub fn window_hourly(points: Vec<ForecastPoint>, now: DateTime<Utc>) -> Vec<ForecastPoint> {
    let cutoff = next_full_hour(now);
    points
        .into_iter()
        .filter(|p| p.time >= cutoff)
        .take(HOURLY_WINDOW)
        .collect()
}

pub fn window_daily(mut days: Vec<ForecastDay>) -> Vec<ForecastDay> {
    days.truncate(DAILY_WINDOW);
    days
}

/// Runs one refresh: location, then forecast, then windowing.
///
/// Any error aborts the whole refresh; there is no retry and no partial
/// snapshot.
#[derive(Clone)]
pub struct ForecastAggregator {
    locator: Arc<dyn LocationProvider>,
    forecaster: Arc<dyn ForecastProvider>,
    clock: Clock,
}

impl std::fmt::Debug for ForecastAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAggregator")
            .field("locator", &self.locator)
            .field("forecaster", &self.forecaster)
            .finish_non_exhaustive()
    }
}

impl ForecastAggregator {
    pub fn new(locator: Box<dyn LocationProvider>, forecaster: Box<dyn ForecastProvider>) -> Self {
        Self {
            locator: Arc::from(locator),
            forecaster: Arc::from(forecaster),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used for the hourly cutoff.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub async fn locate(&self) -> Result<Location, FetchError> {
        self.locator.locate().await
    }

    /// Snapshot for explicit coordinates.
    pub async fn get(&self, latitude: f64, longitude: f64) -> Result<ForecastSnapshot, FetchError> {
        let raw = self.forecaster.fetch(latitude, longitude).await?;
        let now = (self.clock)();

        let mut current = raw.current;
        current.is_current = true;

        let snapshot = ForecastSnapshot {
            current,
            hourly: window_hourly(raw.hourly, now),
            daily: window_daily(raw.daily),
        };

        tracing::debug!(
            %now,
            hourly = snapshot.hourly.len(),
            daily = snapshot.daily.len(),
            "snapshot assembled"
        );
        Ok(snapshot)
    }

    /// Resolve the location first, then fetch its snapshot.
    pub async fn refresh(&self) -> Result<LocatedForecast, FetchError> {
        let location = self.locator.locate().await?;
        let snapshot = self.get(location.latitude, location.longitude).await?;

        tracing::info!(
            city = %location.city,
            country = %location.country,
            temperature_c = snapshot.current.temperature_c,
            "forecast refreshed"
        );
        Ok(LocatedForecast { location, snapshot })
    }
}
