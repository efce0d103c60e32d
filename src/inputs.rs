//! Input loading
//!
//! Reads the coordinate file (`lat: <float>, lon: <float>`) and the contact email file.

use crate::WeatherPlotError;
use crate::models::{Contact, Coordinate};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Coordinate and contact read from the input files
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub coordinate: Coordinate,
    pub contact: Contact,
}

/// Read and validate both input files
#[tracing::instrument(name = "load_inputs", skip_all)]
pub fn load_inputs(latlon_file: &Path, email_file: &Path) -> crate::Result<Inputs> {
    // Both sources must exist before either is parsed
    for path in [latlon_file, email_file] {
        if !path.exists() {
            return Err(WeatherPlotError::NotFound {
                path: path.to_path_buf(),
            });
        }
    }

    info!("Reading latitude and longitude from {}", latlon_file.display());
    let coordinate = parse_coordinate(&read_source(latlon_file)?)?;

    info!("Reading email address from {}", email_file.display());
    let contact = Contact::parse(read_source(email_file)?.trim())?;

    info!("Fetched information: {coordinate}, email={contact}");
    Ok(Inputs {
        coordinate,
        contact,
    })
}

/// Parse `lat: <float>, lon: <float>`; keys, order and separators are fixed
pub fn parse_coordinate(text: &str) -> crate::Result<Coordinate> {
    let text = text.trim();
    let malformed = || {
        WeatherPlotError::validation(format!(
            "Expected 'lat: <float>, lon: <float>', got '{text}'"
        ))
    };

    let (lat_part, lon_part) = text.split_once(", ").ok_or_else(malformed)?;
    let latitude = parse_field(lat_part, "lat").ok_or_else(malformed)??;
    let longitude = parse_field(lon_part, "lon").ok_or_else(malformed)??;

    debug!("Parsed coordinate lat={latitude}, lon={longitude}");
    Coordinate::new(latitude, longitude)
}

/// `None` when the key does not match, `Some(Err)` when the value is not a float
fn parse_field(part: &str, key: &str) -> Option<crate::Result<f64>> {
    let (name, value) = part.split_once(": ")?;
    if name != key {
        return None;
    }
    Some(value.parse::<f64>().map_err(|e| {
        WeatherPlotError::validation(format!("Invalid value for '{key}': '{value}' ({e})"))
    }))
}

fn read_source(path: &Path) -> crate::Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => WeatherPlotError::NotFound {
            path: path.to_path_buf(),
        },
        _ => WeatherPlotError::io(path, e),
    })
}
