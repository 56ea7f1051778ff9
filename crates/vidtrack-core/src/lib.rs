//! # vidtrack-core
//!
//! Core logic for VidTrack - a quota-aware aggregation layer over the
//! YouTube Data API v3.
//!
//! This crate provides:
//! - Quota accounting, cost estimation and threshold alerts (`services::quota`)
//! - The shared YouTube client with caching, batching and rate limiting
//!   (`services::youtube`)
//! - Configuration loading (`config` module)
//! - Unified error handling (`error` module)

pub mod config;
pub mod error;
pub mod services;

// Re-exports for convenience
pub use config::YouTubeSettings;
pub use error::{Error, Result};

// Re-export commonly used types from services
pub use services::quota::{
    AlertLevel, ApiAvailability, ApiCallRecord, CallStats, NotificationSink, OperationType,
    QuotaCostEstimate, QuotaManager, QuotaStatus,
};
pub use services::youtube::{ChannelUpdateRequest, VideoInfo, YouTubeClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_version_format() {
        let v = version();
        // Should be semver format: x.y.z
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "Version should be in x.y.z format");
    }
}
