//! Forecast retrieval from the locator found in the station metadata

use crate::api::{RetryPolicy, WeatherApiClient};
use crate::models::{ForecastPayload, StationMetadata};
use tracing::{error, info};

/// Fetches the forecast payload named by `properties.forecast`.
///
/// Unlike the points lookup this stage makes a single attempt; a transient
/// status here fails the run.
pub struct ForecastFetcher<'a> {
    client: &'a WeatherApiClient,
}

impl<'a> ForecastFetcher<'a> {
    #[must_use]
    pub fn new(client: &'a WeatherApiClient) -> Self {
        Self { client }
    }

    #[tracing::instrument(name = "fetch_forecast", skip_all)]
    pub fn fetch(&self, metadata: &StationMetadata) -> crate::Result<ForecastPayload> {
        let url = metadata.forecast_url().inspect_err(|_| {
            error!("Missing 'forecast' in metadata properties");
        })?;

        info!("Fetching weather forecast data from {url}");
        let body = self
            .client
            .get_json(url, metadata.contact(), &RetryPolicy::none())?;
        Ok(ForecastPayload::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeatherPlotError;
    use crate::config::ApiConfig;
    use crate::models::Contact;
    use serde_json::json;

    #[test]
    fn test_fetch_without_properties_is_schema_error() {
        let client = WeatherApiClient::new(&ApiConfig::default()).unwrap();
        let metadata = StationMetadata::new(
            json!({"type": "Feature"}),
            Contact::parse("user@example.com").unwrap(),
        );

        let err = ForecastFetcher::new(&client).fetch(&metadata).unwrap_err();
        assert!(matches!(err, WeatherPlotError::Schema { .. }));
    }
}
