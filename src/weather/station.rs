//! Station resolution through the points endpoint

use crate::api::{RetryPolicy, WeatherApiClient};
use crate::inputs::Inputs;
use crate::models::StationMetadata;
use tracing::{debug, info};

/// Resolves a coordinate to the station metadata that points at its forecast
pub struct StationResolver<'a> {
    client: &'a WeatherApiClient,
    policy: RetryPolicy,
}

impl<'a> StationResolver<'a> {
    #[must_use]
    pub fn new(client: &'a WeatherApiClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// `{base_url}/points/{lat},{lon}`
    #[must_use]
    pub fn points_url(&self, inputs: &Inputs) -> String {
        format!(
            "{}/points/{}",
            self.client.base_url(),
            inputs.coordinate.as_path_segment()
        )
    }

    /// Look up the station metadata and attach the contact to it
    #[tracing::instrument(name = "resolve_station", skip_all, fields(coordinate = %inputs.coordinate))]
    pub fn resolve(&self, inputs: &Inputs) -> crate::Result<StationMetadata> {
        let url = self.points_url(inputs);
        info!(
            "Fetching metadata for coordinates: ({}, {})",
            inputs.coordinate.latitude, inputs.coordinate.longitude
        );

        let body = self.client.get_json(&url, &inputs.contact, &self.policy)?;
        let metadata = StationMetadata::new(body, inputs.contact.clone());

        if let (Some(office), Some(x), Some(y)) =
            (metadata.grid_id(), metadata.grid_x(), metadata.grid_y())
        {
            debug!("Resolved forecast grid {office}/{x},{y}");
        }
        if let Some(hourly) = metadata.forecast_hourly_url() {
            debug!("Hourly forecast available at {hourly}");
        }

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::models::{Contact, Coordinate};

    #[test]
    fn test_points_url() {
        let config = ApiConfig {
            base_url: "https://api.weather.gov".to_string(),
            ..ApiConfig::default()
        };
        let client = WeatherApiClient::new(&config).unwrap();
        let resolver = StationResolver::new(&client, RetryPolicy::default());
        let inputs = Inputs {
            coordinate: Coordinate::new(40.7813, -73.9740).unwrap(),
            contact: Contact::parse("demo@example.org").unwrap(),
        };

        assert_eq!(
            resolver.points_url(&inputs),
            "https://api.weather.gov/points/40.7813,-73.974"
        );
    }
}
