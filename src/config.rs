//! Configuration management for `WeatherPlot`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherPlotError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory when no path is given
const LOCAL_CONFIG_FILE: &str = "weatherplot.toml";

/// Root configuration structure for `WeatherPlot`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherPlotConfig {
    /// Weather service settings
    pub api: ApiConfig,
    /// Retry policy of the points lookup
    pub retry: RetryConfig,
    /// Input file locations
    pub inputs: InputsConfig,
    /// Chart output settings
    pub chart: ChartConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the weather service
    pub base_url: String,
    /// Application name sent in the `User-Agent` header
    pub app_name: String,
    /// Application version sent in the `User-Agent` header
    pub app_version: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u32,
}

/// Bounded retry on transient server statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Base of the exponential backoff in milliseconds
    pub backoff_factor_ms: u64,
    /// Upper bound of any single wait in milliseconds
    pub max_backoff_ms: u64,
    /// HTTP statuses that are retried
    pub statuses: Vec<u16>,
}

/// Input file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    /// File holding `lat: <float>, lon: <float>`
    pub latlon_file: PathBuf,
    /// File holding the contact email address
    pub email_file: PathBuf,
}

/// Chart output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Explicit output path; synthesised from the current time when absent
    pub output: Option<PathBuf>,
    /// Directory for synthesised file names
    pub output_dir: PathBuf,
    /// TrueType/OpenType font used for titles and labels
    pub font_path: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.weather.gov".to_string(),
            app_name: "WeatherPlot".to_string(),
            app_version: crate::VERSION.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_factor_ms: 300,
            max_backoff_ms: 10_000,
            statuses: vec![500, 502, 503, 504],
        }
    }
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            latlon_file: PathBuf::from("latlon.txt"),
            email_file: PathBuf::from("email.txt"),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: None,
            output_dir: PathBuf::from("."),
            font_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl ApiConfig {
    /// Per-request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl WeatherPlotConfig {
    /// Load configuration from the given file, falling back to the default locations
    pub fn load_from_path(config_path: Option<&Path>) -> crate::Result<Self> {
        let mut builder = Config::builder();

        let config_file = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(WeatherPlotError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Some(path.to_path_buf())
            }
            None => Self::discover_config_file(),
        };

        if let Some(file) = &config_file {
            builder = builder.add_source(
                File::from(file.as_path())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // WEATHERPLOT__API__BASE_URL -> api.base_url
        builder = builder.add_source(
            Environment::with_prefix("WEATHERPLOT")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("retry.statuses")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| WeatherPlotError::config(format!("Failed to build configuration: {e}")))?;

        let config: WeatherPlotConfig = settings.try_deserialize().map_err(|e| {
            WeatherPlotError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// First existing file among `./weatherplot.toml` and the user config directory
    #[must_use]
    pub fn discover_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        Self::get_config_path().filter(|p| p.exists())
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherplot").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if !(1..=300).contains(&self.api.timeout_seconds) {
            return Err(WeatherPlotError::config(
                "API timeout must be between 1 and 300 seconds",
            ));
        }

        if !(1..=10).contains(&self.retry.max_attempts) {
            return Err(WeatherPlotError::config(
                "Retry max attempts must be between 1 and 10",
            ));
        }

        if let Some(status) = self.retry.statuses.iter().find(|s| !(100..=599).contains(*s)) {
            return Err(WeatherPlotError::config(format!(
                "Retry status {status} is not a valid HTTP status"
            )));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherPlotError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherPlotError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(WeatherPlotError::config(
                "API base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        if self.api.app_name.trim().is_empty() {
            return Err(WeatherPlotError::config("API app name cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WeatherPlotConfig::default();
        assert_eq!(config.api.base_url, "https://api.weather.gov");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_factor_ms, 300);
        assert_eq!(config.retry.statuses, vec![500, 502, 503, 504]);
        assert_eq!(config.logging.level, "info");
        assert!(config.chart.output.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeatherPlotConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WeatherPlotConfig::default();
        config.api.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout"));

        let mut config = WeatherPlotConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = WeatherPlotConfig::default();
        config.retry.statuses = vec![503, 42];
        assert!(config.validate().unwrap_err().to_string().contains("42"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = WeatherPlotConfig::default();
        config.api.base_url = "ftp://api.weather.gov".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "http://127.0.0.1:9999"
timeout_seconds = 5

[retry]
max_attempts = 2
statuses = [503]

[chart]
output = "plots/today.png"
"#
        )
        .unwrap();

        let config = WeatherPlotConfig::load_from_path(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.api.app_name, "WeatherPlot");
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.statuses, vec![503]);
        assert_eq!(config.retry.backoff_factor_ms, 300);
        assert_eq!(config.chart.output, Some(PathBuf::from("plots/today.png")));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = WeatherPlotConfig::load_from_path(Some(Path::new("/no/such/weatherplot.toml")))
            .unwrap_err();
        assert!(matches!(err, WeatherPlotError::NotFound { .. }));
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WeatherPlotConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weatherplot"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
