use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "MedRounds";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the portal base URL.
pub const API_URL_ENV: &str = "MEDROUNDS_API_URL";

/// Development portal backend. Deployments override via `MEDROUNDS_API_URL`.
const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// HTTP client timeout. The portal has no long-running endpoints; anything
/// slower than this is treated as a transport failure.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Get the portal base URL, without a trailing slash.
pub fn api_base_url() -> String {
    std::env::var(API_URL_ENV)
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Timeout applied to every portal HTTP call.
pub fn http_timeout() -> Duration {
    Duration::from_secs(HTTP_TIMEOUT_SECS)
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_has_no_trailing_slash() {
        assert!(!api_base_url().ends_with('/'));
    }

    #[test]
    fn timeout_is_finite() {
        assert!(http_timeout() >= Duration::from_secs(1));
    }

    #[test]
    fn app_name_is_medrounds() {
        assert_eq!(APP_NAME, "MedRounds");
    }

    #[test]
    fn default_filter_names_crate() {
        assert!(default_log_filter().contains("medrounds"));
    }
}
