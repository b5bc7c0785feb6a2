use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Approximate location of the machine, or a configured fixed place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One reading: either the current conditions or an hourly forecast bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub precipitation_probability_pct: u8,
    pub weather_code: i32,
    pub is_day: bool,
    pub is_current: bool,
}

/// Summary for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temperature_min_c: f64,
    pub temperature_max_c: f64,
    pub precipitation_probability_mean_pct: u8,
    pub weather_code: i32,
}

/// Everything a forecast provider returns, before any windowing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecast {
    pub current: ForecastPoint,
    /// Full hourly series, usually 240 points for 10 days.
    pub hourly: Vec<ForecastPoint>,
    pub daily: Vec<ForecastDay>,
}

/// Result of one refresh, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub current: ForecastPoint,
    /// At most 24 points, strictly increasing, all after the current hour.
    pub hourly: Vec<ForecastPoint>,
    /// At most 10 days, strictly increasing.
    pub daily: Vec<ForecastDay>,
}

/// A snapshot together with the location it was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedForecast {
    pub location: Location,
    pub snapshot: ForecastSnapshot,
}
