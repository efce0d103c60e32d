//! Coordinate and contact models

use crate::WeatherPlotError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// local-part "@" domain "." TLD of two or more letters
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Geographic point the forecast is requested for
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees, within [-90, 90]
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherPlotError::validation(format!(
                "Invalid coordinates: lat={latitude}, lon={longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Path segment used by the points endpoint, e.g. `40.7813,-73.974` or `40.0,-74.0`
    #[must_use]
    pub fn as_path_segment(&self) -> String {
        // Debug keeps the fractional part of whole degrees
        format!("{:?},{:?}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Latitude: {:?}, Longitude: {:?}",
            self.latitude, self.longitude
        )
    }
}

/// Contact address sent to the weather service so it can identify the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact(String);

impl Contact {
    /// Validate and wrap an email address
    pub fn parse(email: &str) -> crate::Result<Self> {
        if !EMAIL_PATTERN.is_match(email) {
            return Err(WeatherPlotError::validation(format!(
                "Invalid email address: {email}"
            )));
        }
        Ok(Self(email.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    #[case(40.7813, -73.974)]
    fn test_coordinate_within_bounds(#[case] lat: f64, #[case] lon: f64) {
        let coordinate = Coordinate::new(lat, lon).unwrap();
        assert_eq!(coordinate.latitude, lat);
        assert_eq!(coordinate.longitude, lon);
    }

    #[rstest]
    #[case(90.0001, 0.0)]
    #[case(-91.0, 0.0)]
    #[case(0.0, 180.5)]
    #[case(0.0, -181.0)]
    #[case(f64::NAN, 0.0)]
    fn test_coordinate_out_of_bounds(#[case] lat: f64, #[case] lon: f64) {
        let err = Coordinate::new(lat, lon).unwrap_err();
        assert!(matches!(err, WeatherPlotError::Validation { .. }));
    }

    #[rstest]
    #[case(40.7813, -73.9740, "40.7813,-73.974")]
    #[case(40.0, -74.0, "40.0,-74.0")]
    #[case(0.0, 0.0, "0.0,0.0")]
    #[case(-33.5, 151.25, "-33.5,151.25")]
    fn test_path_segment_uses_shortest_form(
        #[case] lat: f64,
        #[case] lon: f64,
        #[case] expected: &str,
    ) {
        let coordinate = Coordinate::new(lat, lon).unwrap();
        assert_eq!(coordinate.as_path_segment(), expected);
    }

    #[test]
    fn test_display_keeps_whole_degrees() {
        let coordinate = Coordinate::new(40.0, -74.0).unwrap();
        assert_eq!(coordinate.to_string(), "Latitude: 40.0, Longitude: -74.0");
    }

    #[rstest]
    #[case("user@example.com")]
    #[case("demo@example.org")]
    #[case("first.last+tag@sub.domain.co")]
    fn test_contact_accepts_valid_addresses(#[case] email: &str) {
        assert_eq!(Contact::parse(email).unwrap().as_str(), email);
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("a@b")]
    #[case("")]
    #[case("user@example.c")]
    #[case("user name@example.com")]
    fn test_contact_rejects_invalid_addresses(#[case] email: &str) {
        let err = Contact::parse(email).unwrap_err();
        assert!(matches!(err, WeatherPlotError::Validation { .. }));
    }
}
