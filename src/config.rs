//! API endpoint configuration.
//!
//! Defaults match the production deployment; overridable through the
//! environment (with `.env` support via dotenvy) for staging setups.

use std::time::Duration;

/// Base URL of the loyalty API, without a trailing slash.
pub const DEFAULT_BASE_URL: &str = "https://test.easybonus.uz/api";

/// Request timeout applied to every API call.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Load overrides from the environment: `BONUSCAN_API_URL` and
    /// `BONUSCAN_TIMEOUT_SECS`. Missing or malformed values fall back
    /// to the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let base_url = std::env::var("BONUSCAN_API_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = std::env::var("BONUSCAN_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self { base_url, timeout }
    }
}
