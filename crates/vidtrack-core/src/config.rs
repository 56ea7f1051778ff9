//! Configuration for the YouTube service layer
//!
//! Settings are loaded from a JSON config file under the platform config
//! directory (`~/.config/vidtrack/config.json` on Linux), with environment
//! variable overrides:
//!
//! - `VIDTRACK_CONFIG` — path to an alternative config file
//! - `VIDTRACK_API_KEY` — YouTube Data API key (overrides the file value)
//!
//! Only the recognized options below are read; unknown keys in the file are
//! ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Default daily quota allowance (YouTube Data API free tier)
pub const DEFAULT_DAILY_QUOTA_LIMIT: u64 = 10_000;

/// Default maximum results per search call
pub const DEFAULT_MAX_SEARCH_RESULTS: u32 = 10;

/// Default cache TTL in seconds (15 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15 * 60;

/// Minimum cache TTL in seconds
pub const MIN_CACHE_TTL_SECS: u64 = 60;

/// Default number of concurrent outbound calls
pub const DEFAULT_RATE_LIMIT_CONCURRENCY: usize = 2;

/// Maximum number of concurrent outbound calls
pub const MAX_RATE_LIMIT_CONCURRENCY: usize = 3;

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Minimum HTTP request timeout in seconds
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Default warning threshold (percentage, log only)
pub const DEFAULT_WARNING_THRESHOLD: f64 = 75.0;

/// Default critical threshold (percentage, user-facing warning)
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 90.0;

// ============================================================================
// Settings
// ============================================================================

/// Settings for the YouTube API service layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeSettings {
    /// YouTube Data API key
    pub api_key: String,
    /// Daily quota allowance in quota units
    pub daily_quota_limit: u64,
    /// Maximum results per search call (1-50)
    pub max_search_results: u32,
    /// Cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Concurrent outbound calls allowed by the rate limiter (1-3)
    pub rate_limit_concurrency: usize,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Usage percentage at which to log a warning (0-100)
    pub warning_threshold: f64,
    /// Usage percentage at which to emit a user-facing warning (0-100)
    pub critical_threshold: f64,
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            daily_quota_limit: DEFAULT_DAILY_QUOTA_LIMIT,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            rate_limit_concurrency: DEFAULT_RATE_LIMIT_CONCURRENCY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}

impl YouTubeSettings {
    /// Load settings from the default config file and environment
    ///
    /// Missing file is not an error: defaults are used, then env overrides
    /// are applied on top.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(path)
    }

    /// Load settings from a specific config file path
    ///
    /// Useful for testing or non-standard configurations.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            log::debug!("[config] Loaded settings from {:?}", path);
            serde_json::from_str(&content)?
        } else {
            log::debug!("[config] No config file at {:?}, using defaults", path);
            Self::default()
        };

        if let Ok(key) = std::env::var("VIDTRACK_API_KEY") {
            if !key.is_empty() {
                settings.api_key = key;
            }
        }

        Ok(settings.validate())
    }

    /// Resolve the config file path
    ///
    /// `VIDTRACK_CONFIG` takes priority over the platform config directory.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("VIDTRACK_CONFIG") {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidtrack")
            .join("config.json")
    }

    /// Validate and normalize the settings
    ///
    /// Out-of-range values are clamped rather than rejected, so a hand-edited
    /// config file cannot leave the service in an unusable state.
    pub fn validate(&self) -> Self {
        Self {
            api_key: self.api_key.trim().to_string(),
            daily_quota_limit: self.daily_quota_limit.max(1),
            max_search_results: self.max_search_results.clamp(1, 50),
            cache_ttl_secs: self.cache_ttl_secs.max(MIN_CACHE_TTL_SECS),
            rate_limit_concurrency: self
                .rate_limit_concurrency
                .clamp(1, MAX_RATE_LIMIT_CONCURRENCY),
            request_timeout_secs: self.request_timeout_secs.max(MIN_REQUEST_TIMEOUT_SECS),
            warning_threshold: self.warning_threshold.clamp(0.0, 100.0),
            critical_threshold: self.critical_threshold.clamp(0.0, 100.0),
        }
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
