//! Weather service stages
//!
//! - station: coordinate to forecast locator (points lookup, retried)
//! - forecast: forecast payload retrieval (single attempt)
//! - parser: payload to time/temperature series

pub mod forecast;
pub mod parser;
pub mod station;

pub use forecast::ForecastFetcher;
pub use parser::{parse_forecast, parse_start_time};
pub use station::StationResolver;
