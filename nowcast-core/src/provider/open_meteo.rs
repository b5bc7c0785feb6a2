use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{FetchError, ForecastDay, ForecastPoint, RawForecast};

use super::ForecastProvider;

pub const DEFAULT_URL: &str = "https://api.open-meteo.com/v1/forecast/";

pub const FORECAST_DAYS: usize = 10;

const CURRENT_VARIABLES: &str = "temperature_2m,precipitation_probability,weather_code,is_day";
const HOURLY_VARIABLES: &str = "temperature_2m,precipitation_probability,weather_code,is_day";
const DAILY_VARIABLES: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_probability_mean,weather_code";

const HOUR_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Forecast client for the Open-Meteo API.
///
/// Returns the full, un-windowed hourly series; trimming it to the next
/// 24 hours is left to [`crate::ForecastAggregator`].
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_client(Client::new(), DEFAULT_URL.to_string())
    }

    pub fn with_client(http: Client, url: String) -> Self {
        Self { url, http }
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

type Section = Map<String, Value>;

#[derive(Debug, Deserialize)]
struct OmResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    current: Section,
    #[serde(default)]
    hourly: Section,
    #[serde(default)]
    daily: Section,
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<RawForecast, FetchError> {
        tracing::debug!(latitude, longitude, url = %self.url, "requesting forecast");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("timezone", "GMT".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
                ("current", CURRENT_VARIABLES.to_string()),
                ("daily", DAILY_VARIABLES.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::transport("Failed to send request to Open-Meteo", e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::transport("Failed to read Open-Meteo response body", e))?;

        let parsed = decode_response(status, &body)?;
        let forecast = parse_forecast(&parsed)?;

        tracing::debug!(
            hourly = forecast.hourly.len(),
            daily = forecast.daily.len(),
            "forecast parsed"
        );
        Ok(forecast)
    }
}

/// Open-Meteo reports bad requests as `{"error": true, "reason": ...}`, usually
/// with a 400 status; that reason wins over the bare status.
fn decode_response(status: StatusCode, body: &str) -> Result<OmResponse, FetchError> {
    match serde_json::from_str::<OmResponse>(body) {
        Ok(resp) if resp.error => Err(FetchError::Service(resp.reason.unwrap_or_default())),
        Ok(_) | Err(_) if !status.is_success() => {
            Err(FetchError::status("Open-Meteo request", status, body))
        }
        Ok(resp) => Ok(resp),
        Err(e) => Err(FetchError::decode("Failed to parse Open-Meteo JSON", e)),
    }
}

fn parse_forecast(resp: &OmResponse) -> Result<RawForecast, FetchError> {
    Ok(RawForecast {
        current: parse_current(&resp.current)?,
        hourly: parse_hourly(&resp.hourly)?,
        daily: parse_daily(&resp.daily)?,
    })
}

fn parse_current(section: &Section) -> Result<ForecastPoint, FetchError> {
    let time = parse_hour(string_value(required(section, "time")?, "time")?)?;

    Ok(ForecastPoint {
        time,
        temperature_c: scalar(section, "temperature_2m", celsius)?,
        precipitation_probability_pct: scalar(section, "precipitation_probability", percent)?,
        weather_code: scalar(section, "weather_code", code)?,
        is_day: scalar(section, "is_day", is_day)?,
        is_current: true,
    })
}

fn parse_hourly(section: &Section) -> Result<Vec<ForecastPoint>, FetchError> {
    let times = time_series(section, parse_hour)?;
    let n = times.len();

    let temperature = series(section, "temperature_2m", n, celsius)?;
    let precipitation = series(section, "precipitation_probability", n, percent)?;
    let weather_code = series(section, "weather_code", n, code)?;
    let day = series(section, "is_day", n, is_day)?;

    Ok((0..n)
        .map(|i| ForecastPoint {
            time: times[i],
            temperature_c: temperature[i],
            precipitation_probability_pct: precipitation[i],
            weather_code: weather_code[i],
            is_day: day[i],
            is_current: false,
        })
        .collect())
}

fn parse_daily(section: &Section) -> Result<Vec<ForecastDay>, FetchError> {
    let dates = time_series(section, parse_day)?;
    let n = dates.len();

    let min = series(section, "temperature_2m_min", n, celsius)?;
    let max = series(section, "temperature_2m_max", n, celsius)?;
    let precipitation = series(section, "precipitation_probability_mean", n, percent)?;
    let weather_code = series(section, "weather_code", n, code)?;

    Ok((0..n)
        .map(|i| ForecastDay {
            date: dates[i],
            temperature_min_c: min[i],
            temperature_max_c: max[i],
            precipitation_probability_mean_pct: precipitation[i],
            weather_code: weather_code[i],
        })
        .collect())
}

fn celsius(v: f64) -> f64 {
    v
}

// Integral values arrive as floats; `as` truncates toward zero.
fn percent(v: f64) -> u8 {
    v as u8
}

fn code(v: f64) -> i32 {
    v as i32
}

// Only an exact 1.0 counts as daytime.
fn is_day(v: f64) -> bool {
    v == 1.0
}

fn parse_hour(s: &str) -> Result<DateTime<Utc>, FetchError> {
    NaiveDateTime::parse_from_str(s, HOUR_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|e| FetchError::decode(&format!("invalid timestamp '{s}'"), e))
}

fn parse_day(s: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(s, DAY_FORMAT)
        .map_err(|e| FetchError::decode(&format!("invalid date '{s}'"), e))
}

fn required<'a>(section: &'a Section, field: &str) -> Result<&'a Value, FetchError> {
    section
        .get(field)
        .ok_or_else(|| FetchError::MissingField(field.to_string()))
}

fn number(value: &Value, field: &str) -> Result<f64, FetchError> {
    value
        .as_f64()
        .ok_or_else(|| FetchError::Decode(format!("field `{field}`: expected a number, got {value}")))
}

fn string_value<'a>(value: &'a Value, field: &str) -> Result<&'a str, FetchError> {
    value
        .as_str()
        .ok_or_else(|| FetchError::Decode(format!("field `{field}`: expected a string, got {value}")))
}

fn array<'a>(section: &'a Section, field: &str) -> Result<&'a Vec<Value>, FetchError> {
    let value = required(section, field)?;
    value
        .as_array()
        .ok_or_else(|| FetchError::Decode(format!("field `{field}`: expected an array")))
}

fn scalar<T>(section: &Section, field: &str, convert: fn(f64) -> T) -> Result<T, FetchError> {
    number(required(section, field)?, field).map(convert)
}

/// Extract a required numeric array aligned with the section's `time` array.
fn series<T>(
    section: &Section,
    field: &str,
    len: usize,
    convert: fn(f64) -> T,
) -> Result<Vec<T>, FetchError> {
    let values = array(section, field)?;
    if values.len() != len {
        return Err(FetchError::Decode(format!(
            "field `{field}` has {} values but `time` has {len}",
            values.len()
        )));
    }

    values
        .iter()
        .map(|v| number(v, field).map(convert))
        .collect()
}

fn time_series<T>(
    section: &Section,
    parse: fn(&str) -> Result<T, FetchError>,
) -> Result<Vec<T>, FetchError> {
    array(section, "time")?
        .iter()
        .map(|v| string_value(v, "time").and_then(parse))
        .collect()
}
