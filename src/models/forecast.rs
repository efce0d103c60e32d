//! Payloads passed between pipeline stages

use super::Contact;
use crate::WeatherPlotError;
use serde_json::Value;
use std::path::PathBuf;

/// Decoded body of the points lookup, carried together with the caller's contact
#[derive(Debug, Clone)]
pub struct StationMetadata {
    body: Value,
    contact: Contact,
}

impl StationMetadata {
    #[must_use]
    pub fn new(body: Value, contact: Contact) -> Self {
        Self { body, contact }
    }

    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    #[must_use]
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// The forecast locator at `properties.forecast`
    pub fn forecast_url(&self) -> crate::Result<&str> {
        let properties = self
            .body
            .get("properties")
            .ok_or_else(|| WeatherPlotError::schema("station metadata has no 'properties'"))?;
        properties
            .get("forecast")
            .ok_or_else(|| {
                WeatherPlotError::schema("station metadata has no 'properties.forecast'")
            })?
            .as_str()
            .ok_or_else(|| WeatherPlotError::schema("'properties.forecast' is not a string"))
    }

    /// Forecast office identifier, when present
    #[must_use]
    pub fn grid_id(&self) -> Option<&str> {
        self.body.pointer("/properties/gridId")?.as_str()
    }

    #[must_use]
    pub fn grid_x(&self) -> Option<i64> {
        self.body.pointer("/properties/gridX")?.as_i64()
    }

    #[must_use]
    pub fn grid_y(&self) -> Option<i64> {
        self.body.pointer("/properties/gridY")?.as_i64()
    }

    /// Hourly forecast locator, when present
    #[must_use]
    pub fn forecast_hourly_url(&self) -> Option<&str> {
        self.body.pointer("/properties/forecastHourly")?.as_str()
    }
}

/// Decoded body of the forecast resource
#[derive(Debug, Clone)]
pub struct ForecastPayload {
    body: Value,
}

impl ForecastPayload {
    #[must_use]
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// Index-aligned timestamps and temperatures, in forecast order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastSeries {
    times: Vec<String>,
    temperatures: Vec<i64>,
    unit: Option<String>,
}

impl ForecastSeries {
    /// Build a series from parallel sequences, which must have equal length
    pub fn new(times: Vec<String>, temperatures: Vec<i64>) -> crate::Result<Self> {
        if times.len() != temperatures.len() {
            return Err(WeatherPlotError::validation(format!(
                "series length mismatch: {} times, {} temperatures",
                times.len(),
                temperatures.len()
            )));
        }
        Ok(Self {
            times,
            temperatures,
            unit: None,
        })
    }

    /// Attach the temperature unit, e.g. `F`
    #[must_use]
    pub fn with_unit(mut self, unit: Option<String>) -> Self {
        self.unit = unit;
        self
    }

    pub(crate) fn push(&mut self, time: String, temperature: i64) {
        self.times.push(time);
        self.temperatures.push(temperature);
    }

    /// Timestamps formatted as `YYYY-MM-DD HH:MM:SS`
    #[must_use]
    pub fn times(&self) -> &[String] {
        &self.times
    }

    #[must_use]
    pub fn temperatures(&self) -> &[i64] {
        &self.temperatures
    }

    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First timestamp of the series
    #[must_use]
    pub fn first_time(&self) -> Option<&str> {
        self.times.first().map(String::as_str)
    }

    /// Lowest and highest temperature
    #[must_use]
    pub fn temperature_range(&self) -> Option<(i64, i64)> {
        let min = self.temperatures.iter().min()?;
        let max = self.temperatures.iter().max()?;
        Some((*min, *max))
    }
}

/// Rendered chart on disk
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    /// Where the image was written
    pub path: PathBuf,
    /// Image size in pixels
    pub width: u32,
    pub height: u32,
    /// Number of plotted points
    pub points: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact() -> Contact {
        Contact::parse("user@example.com").unwrap()
    }

    #[test]
    fn test_forecast_url_present() {
        let metadata = StationMetadata::new(
            json!({"properties": {"forecast": "https://example/forecast", "gridId": "OKX", "gridX": 33, "gridY": 37}}),
            contact(),
        );
        assert_eq!(metadata.forecast_url().unwrap(), "https://example/forecast");
        assert_eq!(metadata.grid_id(), Some("OKX"));
        assert_eq!(metadata.grid_x(), Some(33));
        assert_eq!(metadata.grid_y(), Some(37));
        assert_eq!(metadata.forecast_hourly_url(), None);
        assert_eq!(metadata.contact().as_str(), "user@example.com");
    }

    #[test]
    fn test_forecast_url_missing_properties() {
        let metadata = StationMetadata::new(json!({"type": "Feature"}), contact());
        let err = metadata.forecast_url().unwrap_err();
        assert!(matches!(err, WeatherPlotError::Schema { .. }));
    }

    #[test]
    fn test_forecast_url_missing_forecast() {
        let metadata = StationMetadata::new(json!({"properties": {}}), contact());
        let err = metadata.forecast_url().unwrap_err();
        assert!(err.to_string().contains("properties.forecast"));
    }

    #[test]
    fn test_series_rejects_length_mismatch() {
        let err = ForecastSeries::new(vec!["2024-06-01 12:00:00".into()], vec![]).unwrap_err();
        assert!(matches!(err, WeatherPlotError::Validation { .. }));
    }

    #[test]
    fn test_series_accessors() {
        let series = ForecastSeries::new(
            vec!["2024-06-01 12:00:00".into(), "2024-06-01 13:00:00".into()],
            vec![64, 58],
        )
        .unwrap()
        .with_unit(Some("F".into()));

        assert_eq!(series.len(), 2);
        assert_eq!(series.first_time(), Some("2024-06-01 12:00:00"));
        assert_eq!(series.temperature_range(), Some((58, 64)));
        assert_eq!(series.unit(), Some("F"));
        assert!(ForecastSeries::default().temperature_range().is_none());
    }
}
