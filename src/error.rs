//! Error types and handling for the `WeatherPlot` pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the `WeatherPlot` pipeline
#[derive(Error, Debug)]
pub enum WeatherPlotError {
    /// An input source does not exist
    #[error("Input not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Malformed or out-of-range input, or nothing to plot
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// An upstream JSON payload is missing an expected key
    #[error("Unexpected response structure: {message}")]
    Schema { message: String },

    /// Non-success HTTP status, transport failure or undecodable body
    #[error("Upstream error for {url}{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Upstream {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Filesystem failure while writing the chart
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeatherPlotError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new schema error
    pub fn schema<S: Into<String>>(message: S) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<U: Into<String>, S: Into<String>>(
        url: U,
        status: Option<u16>,
        message: S,
    ) -> Self {
        Self::Upstream {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a new I/O error bound to a path
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable category name, suitable for structured logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherPlotError::NotFound { .. } => "not_found",
            WeatherPlotError::Validation { .. } => "validation",
            WeatherPlotError::Schema { .. } => "schema",
            WeatherPlotError::Upstream { .. } => "upstream",
            WeatherPlotError::Io { .. } => "io",
            WeatherPlotError::Config { .. } => "config",
        }
    }

    /// HTTP status attached to an upstream error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            WeatherPlotError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherPlotError::NotFound { path } => {
                format!("Input file {} does not exist.", path.display())
            }
            WeatherPlotError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherPlotError::Schema { .. } => {
                "The weather service returned data in an unexpected shape. The API may have changed."
                    .to_string()
            }
            WeatherPlotError::Upstream { status: Some(s), .. } => {
                format!("The weather service answered with HTTP {s}. Please try again later.")
            }
            WeatherPlotError::Upstream { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            WeatherPlotError::Io { path, .. } => {
                format!("Could not write {}. Please check file permissions.", path.display())
            }
            WeatherPlotError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}
