use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{FetchError, Location};

use super::LocationProvider;

pub const DEFAULT_URL: &str = "http://ip-api.com/json/";

/// Resolves the caller's location from its public IP via ip-api.com.
///
/// No caching: every call re-resolves.
#[derive(Debug, Clone)]
pub struct IpApiGeolocator {
    url: String,
    http: Client,
}

impl IpApiGeolocator {
    pub fn new() -> Self {
        Self::with_client(Client::new(), DEFAULT_URL.to_string())
    }

    pub fn with_client(http: Client, url: String) -> Self {
        Self { url, http }
    }
}

impl Default for IpApiGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
}

fn parse_ip_response(body: &str) -> Result<Location, FetchError> {
    let parsed: IpResponse =
        serde_json::from_str(body).map_err(|e| FetchError::decode("Failed to parse IP API JSON", e))?;

    if parsed.status == "fail" {
        return Err(FetchError::Service(parsed.message.unwrap_or_default()));
    }

    Ok(Location {
        city: parsed.city,
        country: parsed.country,
        latitude: parsed.lat,
        longitude: parsed.lon,
    })
}

#[async_trait]
impl LocationProvider for IpApiGeolocator {
    async fn locate(&self) -> Result<Location, FetchError> {
        tracing::debug!(url = %self.url, "resolving location from IP");

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::transport("Failed to send request to IP API", e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::transport("Failed to read IP API response body", e))?;

        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::status("IP API request", status, &body));
        }

        let location = parse_ip_response(&body)?;
        tracing::debug!(city = %location.city, country = %location.country, "location resolved");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_successful_response() {
        let body = r#"{
            "status": "success",
            "country": "United Kingdom",
            "countryCode": "GB",
            "city": "London",
            "lat": 51.5,
            "lon": -0.12,
            "timezone": "Europe/London"
        }"#;

        let loc = parse_ip_response(body).unwrap();
        assert_eq!(loc.city, "London");
        assert_eq!(loc.country, "United Kingdom");
        assert_eq!(loc.latitude, 51.5);
        assert_eq!(loc.longitude, -0.12);
    }

    #[test]
    fn fail_status_becomes_service_error() {
        let body = r#"{"status":"fail","message":"invalid query"}"#;

        match parse_ip_response(body).unwrap_err() {
            FetchError::Service(msg) => assert_eq!(msg, "invalid query"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse_ip_response("<html>nope</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let err = parse_ip_response(r#"{"status":"success","lat":"north"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
