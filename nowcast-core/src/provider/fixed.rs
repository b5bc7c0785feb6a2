use async_trait::async_trait;

use crate::{FetchError, Location};

use super::LocationProvider;

/// Always reports the configured location; no network involved.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    location: Location,
}

impl FixedLocationProvider {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn locate(&self) -> Result<Location, FetchError> {
        Ok(self.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_location() {
        let london = Location {
            city: "London".into(),
            country: "United Kingdom".into(),
            latitude: 51.5,
            longitude: -0.12,
        };
        let provider = FixedLocationProvider::new(london.clone());

        assert_eq!(provider.locate().await.unwrap(), london);
    }
}
