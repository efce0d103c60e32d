//! Data models for the WeatherPlot pipeline
//!
//! - Location: the coordinate and contact read from the input files
//! - Forecast: the payloads handed from stage to stage and the final chart

pub mod forecast;
pub mod location;

pub use forecast::{ChartArtifact, ForecastPayload, ForecastSeries, StationMetadata};
pub use location::{Contact, Coordinate};
