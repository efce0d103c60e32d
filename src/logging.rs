//! Construction of the `tracing` subscriber
//!
//! The subscriber is handed to the caller instead of being installed globally, so a run can
//! scope it with [`tracing::subscriber::with_default`].

use crate::config::LoggingConfig;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Build a subscriber for the configured level and format.
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
pub fn subscriber(config: &LoggingConfig) -> Box<dyn Subscriber + Send + Sync> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weatherplot={}", config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.format.as_str() {
        "json" => Box::new(builder.json().finish()),
        _ => Box::new(builder.finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_scopes_events() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        let subscriber = subscriber(&config);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("inside scoped subscriber");
        });
    }
}
