//! `WeatherPlot` - Seven-day temperature forecast charts
//!
//! This library reads a coordinate and a contact email, looks up the matching
//! forecast grid at the National Weather Service, downloads its forecast and
//! renders the temperature series as a PNG line chart.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod inputs;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod weather;

// Re-export core types for public API
pub use api::{RetryPolicy, WeatherApiClient};
pub use chart::ChartRenderer;
pub use config::WeatherPlotConfig;
pub use error::WeatherPlotError;
pub use inputs::{Inputs, load_inputs};
pub use models::{
    ChartArtifact, Contact, Coordinate, ForecastPayload, ForecastSeries, StationMetadata,
};
pub use pipeline::{Pipeline, PipelineOutcome, PipelineRequest};
pub use weather::{ForecastFetcher, StationResolver, parse_forecast};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherPlotError>;
