//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the client starts against a local
//! development backend with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use vibelink_shared::constants::{
    AI_RECOMMENDATIONS_PER_PAGE, DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS,
    MIN_SWIPE_DISTANCE, POLL_INTERVAL_SECS, SEARCH_DEBOUNCE_MS,
};

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// REST backend origin.
    /// Env: `VIBELINK_API_URL`
    /// Default: `http://127.0.0.1:8000`
    pub api_base_url: String,

    /// Directory holding `vibelink.db`.
    /// Env: `VIBELINK_DATA_DIR`
    /// Default: `None`, meaning the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Conversation and message polling period.
    /// Env: `VIBELINK_POLL_SECS`
    pub poll_interval: Duration,

    /// Quiet period before a search keystroke issues a request.
    /// Env: `VIBELINK_SEARCH_DEBOUNCE_MS`
    pub search_debounce: Duration,

    /// Per-request timeout.
    /// Env: `VIBELINK_HTTP_TIMEOUT_SECS`
    pub request_timeout: Duration,

    /// Horizontal drag distance (px) that commits a swipe.
    /// Env: `VIBELINK_SWIPE_THRESHOLD`
    pub min_swipe_distance: f64,

    /// AI recommendations requested per page.
    /// Env: `VIBELINK_AI_PAGE_SIZE`
    pub ai_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: None,
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            search_debounce: Duration::from_millis(SEARCH_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            min_swipe_distance: MIN_SWIPE_DISTANCE,
            ai_page_size: AI_RECOMMENDATIONS_PER_PAGE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("VIBELINK_API_URL") {
            let trimmed = url.trim().trim_end_matches('/');
            if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                config.api_base_url = trimmed.to_string();
            } else {
                tracing::warn!(value = %url, "Invalid VIBELINK_API_URL, using default");
            }
        }

        if let Some(dir) = lookup("VIBELINK_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(secs) = parse_positive::<u64>(&lookup, "VIBELINK_POLL_SECS") {
            config.poll_interval = Duration::from_secs(secs);
        }

        if let Some(ms) = parse_positive::<u64>(&lookup, "VIBELINK_SEARCH_DEBOUNCE_MS") {
            config.search_debounce = Duration::from_millis(ms);
        }

        if let Some(secs) = parse_positive::<u64>(&lookup, "VIBELINK_HTTP_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(px) = lookup("VIBELINK_SWIPE_THRESHOLD") {
            match px.parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => config.min_swipe_distance = v,
                _ => tracing::warn!(value = %px, "Invalid VIBELINK_SWIPE_THRESHOLD, using default"),
            }
        }

        if let Some(n) = parse_positive::<u32>(&lookup, "VIBELINK_AI_PAGE_SIZE") {
            config.ai_page_size = n;
        }

        config
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Some(v),
        _ => {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            None
        }
    }
}
