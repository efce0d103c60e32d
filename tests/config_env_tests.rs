//! Environment overrides of the layered configuration
//!
//! Kept in its own test binary since it mutates the process environment.

use std::io::Write;
use weatherplot::WeatherPlotConfig;

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[api]
base_url = "http://127.0.0.1:9999"
timeout_seconds = 5

[retry]
max_attempts = 5
"#
    )
    .unwrap();

    // SAFETY: the only test in this binary, nothing reads the environment concurrently
    unsafe {
        std::env::set_var("WEATHERPLOT__API__BASE_URL", "http://localhost:8080");
        std::env::set_var("WEATHERPLOT__RETRY__MAX_ATTEMPTS", "2");
        std::env::set_var("WEATHERPLOT__RETRY__STATUSES", "502,503");
        std::env::set_var("WEATHERPLOT__LOGGING__FORMAT", "json");
    }

    let config = WeatherPlotConfig::load_from_path(Some(file.path())).unwrap();

    unsafe {
        std::env::remove_var("WEATHERPLOT__API__BASE_URL");
        std::env::remove_var("WEATHERPLOT__RETRY__MAX_ATTEMPTS");
        std::env::remove_var("WEATHERPLOT__RETRY__STATUSES");
        std::env::remove_var("WEATHERPLOT__LOGGING__FORMAT");
    }

    assert_eq!(config.api.base_url, "http://localhost:8080");
    assert_eq!(config.api.timeout_seconds, 5);
    assert_eq!(config.retry.max_attempts, 2);
    assert_eq!(config.retry.statuses, vec![502, 503]);
    assert_eq!(config.logging.format, "json");
}
