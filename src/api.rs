//! Weather service HTTP client
//!
//! Blocking client for the National Weather Service API. Every request carries the
//! identifying `User-Agent` the service asks for, a per-request timeout, and is driven
//! by a [`RetryPolicy`] that decides which failures are worth another attempt.

use crate::WeatherPlotError;
use crate::config::{ApiConfig, RetryConfig};
use crate::models::Contact;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, RETRY_AFTER, USER_AGENT};
use serde_json::Value;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Media type the weather service documents for its JSON responses
const GEO_JSON: &str = "application/geo+json";

/// Which failures are retried, how often, and how long to wait in between
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    max_attempts: u32,
    backoff_factor: Duration,
    max_backoff: Duration,
    statuses: Vec<u16>,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(
        max_attempts: u32,
        backoff_factor: Duration,
        max_backoff: Duration,
        statuses: Vec<u16>,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_factor,
            max_backoff,
            statuses,
        }
    }

    /// Single attempt, nothing retried
    #[must_use]
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO, Vec::new())
    }

    #[must_use]
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.backoff_factor_ms),
            Duration::from_millis(config.max_backoff_ms),
            config.statuses.clone(),
        )
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether a response with this status should be attempted again
    #[must_use]
    pub fn retries_status(&self, status: StatusCode) -> bool {
        self.statuses.contains(&status.as_u16())
    }

    /// Wait after the `failures`-th failed attempt: `factor * 2^(failures - 1)`, capped
    #[must_use]
    pub fn backoff(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(16);
        self.backoff_factor
            .saturating_mul(2_u32.pow(exponent))
            .min(self.max_backoff)
    }

    /// A server-provided `Retry-After`, bounded by the maximum backoff
    fn retry_after(&self, seconds: u64) -> Duration {
        Duration::from_secs(seconds).min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Weather API client
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    /// HTTP client
    client: Client,
    base_url: String,
    app_name: String,
    app_version: String,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: &ApiConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                WeatherPlotError::config(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_name: config.app_name.clone(),
            app_version: config.app_version.clone(),
        })
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<AppName>/<Version> (<contact>)`
    #[must_use]
    pub fn user_agent(&self, contact: &Contact) -> String {
        format!("{}/{} ({})", self.app_name, self.app_version, contact)
    }

    /// GET `url` and decode the body as JSON, retrying according to `policy`
    #[instrument(skip(self, contact, policy), fields(max_attempts = policy.max_attempts()))]
    pub fn get_json(
        &self,
        url: &str,
        contact: &Contact,
        policy: &RetryPolicy,
    ) -> crate::Result<Value> {
        let user_agent = self.user_agent(contact);
        let request_start = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let attempt_start = Instant::now();
            let retries_left = attempt < policy.max_attempts();

            debug!(
                "Making HTTP request (attempt {}/{})",
                attempt,
                policy.max_attempts()
            );

            let result = self
                .client
                .get(url)
                .header(USER_AGENT, &user_agent)
                .header(ACCEPT, GEO_JSON)
                .send();

            match result {
                Ok(response) => {
                    let status = response.status();
                    debug!(
                        "HTTP response received: {} in {:.3}s",
                        status,
                        attempt_start.elapsed().as_secs_f64()
                    );

                    if status.is_success() {
                        let body = response.text().map_err(|e| {
                            WeatherPlotError::upstream(
                                url,
                                Some(status.as_u16()),
                                format!("failed to read response body: {e}"),
                            )
                        })?;
                        info!(
                            "Successful API request in {:.3}s (attempt {})",
                            request_start.elapsed().as_secs_f64(),
                            attempt
                        );
                        return serde_json::from_str(&body).map_err(|e| {
                            WeatherPlotError::upstream(
                                url,
                                Some(status.as_u16()),
                                format!("response body is not valid JSON: {e}"),
                            )
                        });
                    }

                    let error_msg = format!(
                        "request failed with status {}",
                        status.canonical_reason().unwrap_or("Unknown error")
                    );

                    if !policy.retries_status(status) {
                        error!("HTTP error for {}: {} ({})", url, status, error_msg);
                        return Err(WeatherPlotError::upstream(
                            url,
                            Some(status.as_u16()),
                            error_msg,
                        ));
                    }

                    if !retries_left {
                        error!(
                            "API request failed after {} attempts: {}",
                            attempt, error_msg
                        );
                        return Err(WeatherPlotError::upstream(
                            url,
                            Some(status.as_u16()),
                            format!("{error_msg} after {attempt} attempts"),
                        ));
                    }

                    let server_hint = (status == StatusCode::SERVICE_UNAVAILABLE)
                        .then(|| {
                            response
                                .headers()
                                .get(RETRY_AFTER)
                                .and_then(|h| h.to_str().ok())
                                .and_then(|s| s.trim().parse::<u64>().ok())
                        })
                        .flatten();

                    let wait = match server_hint {
                        Some(seconds) => policy.retry_after(seconds),
                        None => policy.backoff(attempt),
                    };

                    warn!(
                        "Transient HTTP {} on attempt {}, retrying in {:.1}s",
                        status.as_u16(),
                        attempt,
                        wait.as_secs_f64()
                    );
                    thread::sleep(wait);
                }
                Err(e) => {
                    if !retries_left {
                        error!("Network error after {} attempts: {}", attempt, e);
                        return Err(WeatherPlotError::upstream(
                            url,
                            None,
                            format!("network error after {attempt} attempts: {e}"),
                        ));
                    }

                    let wait = policy.backoff(attempt);
                    warn!(
                        "Network error on attempt {} ({:.3}s): {}, retrying in {:.1}s",
                        attempt,
                        attempt_start.elapsed().as_secs_f64(),
                        e,
                        wait.as_secs_f64()
                    );
                    thread::sleep(wait);
                }
            }
        }
    }
}
