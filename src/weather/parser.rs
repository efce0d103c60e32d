//! Forecast payload parsing
//!
//! Turns `properties.periods` into an index-aligned series of formatted start times
//! and integer temperatures, keeping the order of the payload.

use crate::WeatherPlotError;
use crate::models::{ForecastPayload, ForecastSeries};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Output format of every timestamp in a [`ForecastSeries`]
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// Extract the time/temperature series from a forecast payload
#[tracing::instrument(name = "parse_forecast", skip_all)]
pub fn parse_forecast(payload: &ForecastPayload) -> crate::Result<ForecastSeries> {
    info!("Parsing forecast data");

    let periods = payload
        .body()
        .get("properties")
        .ok_or_else(|| WeatherPlotError::schema("forecast payload has no 'properties'"))?
        .get("periods")
        .ok_or_else(|| WeatherPlotError::schema("forecast payload has no 'properties.periods'"))?
        .as_array()
        .ok_or_else(|| WeatherPlotError::schema("'properties.periods' is not an array"))?;

    let mut series = ForecastSeries::default();
    for (index, period) in periods.iter().enumerate() {
        let temperature = period_temperature(period, index)?;
        let time = period_start_time(period, index)?;
        series.push(time, temperature);
    }

    let unit = periods
        .first()
        .and_then(|p| p.get("temperatureUnit"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if series.is_empty() {
        warn!("Forecast payload contains no periods");
    } else {
        debug!(
            "Parsed {} periods starting at {}",
            series.len(),
            series.first_time().unwrap_or_default()
        );
    }

    Ok(series.with_unit(unit))
}

fn period_temperature(period: &Value, index: usize) -> crate::Result<i64> {
    let value = period.get("temperature").ok_or_else(|| {
        WeatherPlotError::schema(format!("'properties.periods[{index}].temperature' is missing"))
    })?;
    value.as_i64().ok_or_else(|| {
        WeatherPlotError::schema(format!(
            "'properties.periods[{index}].temperature' is not an integer: {value}"
        ))
    })
}

fn period_start_time(period: &Value, index: usize) -> crate::Result<String> {
    let raw = period
        .get("startTime")
        .ok_or_else(|| {
            WeatherPlotError::schema(format!("'properties.periods[{index}].startTime' is missing"))
        })?
        .as_str()
        .ok_or_else(|| {
            WeatherPlotError::schema(format!(
                "'properties.periods[{index}].startTime' is not a string"
            ))
        })?;

    let parsed = parse_start_time(raw).ok_or_else(|| {
        WeatherPlotError::schema(format!(
            "'properties.periods[{index}].startTime' is not an ISO-8601 timestamp: '{raw}'"
        ))
    })?;
    Ok(parsed.format(TIME_FORMAT).to_string())
}

/// Parse an ISO-8601 start time as a naive wall-clock timestamp.
///
/// A trailing `Z` is stripped first; an explicit UTC offset is dropped, keeping
/// the local time as written.
#[must_use]
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.strip_suffix('Z').unwrap_or(raw);

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Some(parsed.naive_local());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn payload(periods: Value) -> ForecastPayload {
        ForecastPayload::new(json!({ "properties": { "periods": periods } }))
    }

    #[rstest]
    #[case("2024-06-01T12:00:00Z", "2024-06-01 12:00:00")]
    #[case("2024-06-01T06:00:00-04:00", "2024-06-01 06:00:00")]
    #[case("2024-06-01T06:00:00+02:00", "2024-06-01 06:00:00")]
    #[case("2024-06-01T06:30", "2024-06-01 06:30:00")]
    #[case("2024-06-01 18:15:30.250", "2024-06-01 18:15:30")]
    #[case("2024-06-01", "2024-06-01 00:00:00")]
    fn test_parse_start_time(#[case] raw: &str, #[case] expected: &str) {
        let parsed = parse_start_time(raw).unwrap();
        assert_eq!(parsed.format(TIME_FORMAT).to_string(), expected);
    }

    #[rstest]
    #[case("tomorrow")]
    #[case("2024-13-01T00:00:00Z")]
    #[case("")]
    fn test_parse_start_time_rejects(#[case] raw: &str) {
        assert!(parse_start_time(raw).is_none());
    }

    #[test]
    fn test_parse_preserves_order() {
        let payload = payload(json!([
            {"startTime": "2024-06-01T14:00:00Z", "temperature": 71, "temperatureUnit": "F"},
            {"startTime": "2024-06-01T12:00:00Z", "temperature": 64, "temperatureUnit": "F"},
            {"startTime": "2024-06-01T13:00:00Z", "temperature": 64, "temperatureUnit": "F"},
        ]));

        let series = parse_forecast(&payload).unwrap();
        assert_eq!(
            series.times(),
            ["2024-06-01 14:00:00", "2024-06-01 12:00:00", "2024-06-01 13:00:00"]
        );
        assert_eq!(series.temperatures(), [71, 64, 64]);
        assert_eq!(series.unit(), Some("F"));
    }

    #[test]
    fn test_parse_empty_periods() {
        let series = parse_forecast(&payload(json!([]))).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.unit(), None);
    }

    #[rstest]
    #[case(json!({"type": "Feature"}))]
    #[case(json!({"properties": {}}))]
    #[case(json!({"properties": {"periods": "none"}}))]
    fn test_parse_missing_periods(#[case] body: Value) {
        let err = parse_forecast(&ForecastPayload::new(body)).unwrap_err();
        assert!(matches!(err, WeatherPlotError::Schema { .. }));
    }

    #[test]
    fn test_parse_period_missing_fields() {
        let err = parse_forecast(&payload(json!([
            {"startTime": "2024-06-01T12:00:00Z", "temperature": 64},
            {"startTime": "2024-06-01T13:00:00Z"},
        ])))
        .unwrap_err();
        assert!(err.to_string().contains("periods[1].temperature"));

        let err = parse_forecast(&payload(json!([{"temperature": 64}]))).unwrap_err();
        assert!(err.to_string().contains("periods[0].startTime"));
    }

    #[test]
    fn test_parse_non_integer_temperature() {
        let err = parse_forecast(&payload(json!([
            {"startTime": "2024-06-01T12:00:00Z", "temperature": "warm"},
        ])))
        .unwrap_err();
        assert!(matches!(err, WeatherPlotError::Schema { .. }));
    }
}
