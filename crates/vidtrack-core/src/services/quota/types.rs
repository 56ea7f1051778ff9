//! Quota tracking types
//!
//! Types shared across the quota ledger, cost estimator, call recorder and
//! threshold notifier.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Operation Types
// ============================================================================

/// YouTube Data API operation type
///
/// Each operation has a distinct quota cost profile: search-type calls carry
/// a flat per-call cost, detail lookups are charged per batch of up to 50 ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// `search.list` — flat per-call cost
    Search,
    /// `videos.list` — batched detail lookup
    VideoDetails,
    /// `channels.list` — batched detail lookup
    ChannelDetails,
    /// `playlistItems.list` — paged playlist reads
    PlaylistItems,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Search => write!(f, "search"),
            OperationType::VideoDetails => write!(f, "video_details"),
            OperationType::ChannelDetails => write!(f, "channel_details"),
            OperationType::PlaylistItems => write!(f, "playlist_items"),
        }
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "search" => Ok(OperationType::Search),
            "video_details" | "videos" => Ok(OperationType::VideoDetails),
            "channel_details" | "channels" => Ok(OperationType::ChannelDetails),
            "playlist_items" | "playlists" => Ok(OperationType::PlaylistItems),
            _ => Err(format!("Unknown operation type: {}", s)),
        }
    }
}

/// Static cost configuration for one operation type
///
/// Immutable after load; the cost table in [`super::cost::CostEstimator`]
/// owns one row per operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OperationCost {
    /// Operation this row applies to
    pub operation: OperationType,
    /// Quota units charged per API call
    pub units_per_call: u64,
    /// Maximum ids the API accepts in a single call (1 for non-batch ops)
    pub max_items_per_call: usize,
}

// ============================================================================
// Ledger Status
// ============================================================================

/// Point-in-time view of the quota ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaStatus {
    /// Daily quota allowance in units
    pub daily_limit: u64,
    /// Units consumed since the last reset
    pub used_today: u64,
    /// Units still available today
    pub remaining: u64,
    /// Usage as a percentage of the daily limit (0.0 - 100.0+)
    pub usage_percent: f64,
    /// When the ledger next resets (UTC midnight)
    pub reset_time: DateTime<Utc>,
}

/// Availability summary consumed by the rest of the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiAvailability {
    /// Whether any budget remains for today
    pub is_available: bool,
    /// Usage as a percentage of the daily limit
    pub usage_percentage: f64,
    /// Units still available today
    pub remaining_quota: u64,
    /// When the ledger next resets (UTC midnight)
    pub reset_time: DateTime<Utc>,
}

// ============================================================================
// Call Records
// ============================================================================

/// Structured record of a single external API call
///
/// Append-only; the recorder trims records older than its rolling window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCallRecord {
    /// Unique identifier for this record
    pub id: String,
    /// When the call completed
    pub timestamp: DateTime<Utc>,
    /// Operation that was performed
    pub operation: OperationType,
    /// Quota units charged for the call
    pub quota_cost: u64,
    /// Whether the call succeeded
    pub success: bool,
    /// Wall-clock duration of the call in milliseconds
    pub duration_ms: i64,
    /// Error message for failed calls
    pub error_message: Option<String>,
    /// Number of items the call returned (successful calls only)
    pub items_returned: Option<usize>,
}

impl ApiCallRecord {
    /// Record a successful call
    pub fn success(
        operation: OperationType,
        quota_cost: u64,
        duration_ms: i64,
        items_returned: usize,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            operation,
            quota_cost,
            success: true,
            duration_ms,
            error_message: None,
            items_returned: Some(items_returned),
        }
    }

    /// Record a failed call
    pub fn failure(
        operation: OperationType,
        quota_cost: u64,
        duration_ms: i64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            operation,
            quota_cost,
            success: false,
            duration_ms,
            error_message: Some(error.into()),
            items_returned: None,
        }
    }
}

/// Aggregate statistics for one operation type over the rolling window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallStats {
    /// Operation these stats cover
    pub operation: String,
    /// Total calls recorded
    pub calls: u64,
    /// Total quota units consumed
    pub total_cost: u64,
    /// Failed calls
    pub errors: u64,
    /// Sum of call durations in milliseconds
    pub total_duration_ms: i64,
}

// ============================================================================
// Alert Level
// ============================================================================

/// Alert level for quota usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Normal usage, no alert
    Normal,
    /// Usage is approaching the limit (log only)
    Warning,
    /// Usage is close to the limit (user-facing warning)
    Critical,
    /// Budget is fully consumed (user-facing hard stop)
    Exhausted,
}

impl AlertLevel {
    /// Determine the alert level for a usage percentage
    pub fn from_usage(used_percent: f64, warning_threshold: f64, critical_threshold: f64) -> Self {
        if used_percent >= 100.0 {
            AlertLevel::Exhausted
        } else if used_percent >= critical_threshold {
            AlertLevel::Critical
        } else if used_percent >= warning_threshold {
            AlertLevel::Warning
        } else {
            AlertLevel::Normal
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Normal => write!(f, "normal"),
            AlertLevel::Warning => write!(f, "warning"),
            AlertLevel::Critical => write!(f, "critical"),
            AlertLevel::Exhausted => write!(f, "exhausted"),
        }
    }
}

// ============================================================================
// Cost Estimates
// ============================================================================

/// Projected cost for a planned batch of operations
///
/// Computed, never persisted. The breakdown maps a human-readable operation
/// label to its projected unit cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaCostEstimate {
    /// Projected cost per planned operation group
    pub breakdown: BTreeMap<String, u64>,
    /// Total projected cost in quota units
    pub total_cost: u64,
    /// Units still available today
    pub remaining_quota: u64,
    /// Projected usage percentage after running the plan
    pub projected_usage_percent: f64,
    /// Whether the plan exceeds the remaining quota
    pub exceeds_remaining: bool,
    /// Human-readable suggestions when the projection crosses the warning
    /// threshold
    pub suggestions: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_display() {
        assert_eq!(OperationType::Search.to_string(), "search");
        assert_eq!(OperationType::VideoDetails.to_string(), "video_details");
        assert_eq!(OperationType::ChannelDetails.to_string(), "channel_details");
        assert_eq!(OperationType::PlaylistItems.to_string(), "playlist_items");
    }

    #[test]
    fn test_operation_type_from_str() {
        assert_eq!("search".parse::<OperationType>().unwrap(), OperationType::Search);
        assert_eq!(
            "video_details".parse::<OperationType>().unwrap(),
            OperationType::VideoDetails
        );
        assert_eq!("videos".parse::<OperationType>().unwrap(), OperationType::VideoDetails);
        assert!("bogus".parse::<OperationType>().is_err());
    }

    #[test]
    fn test_alert_level_from_usage() {
        assert_eq!(AlertLevel::from_usage(50.0, 75.0, 90.0), AlertLevel::Normal);
        assert_eq!(AlertLevel::from_usage(75.0, 75.0, 90.0), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_usage(89.9, 75.0, 90.0), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_usage(90.0, 75.0, 90.0), AlertLevel::Critical);
        assert_eq!(AlertLevel::from_usage(100.0, 75.0, 90.0), AlertLevel::Exhausted);
        assert_eq!(AlertLevel::from_usage(130.0, 75.0, 90.0), AlertLevel::Exhausted);
    }

    #[test]
    fn test_alert_level_ordering() {
        assert!(AlertLevel::Normal < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Critical);
        assert!(AlertLevel::Critical < AlertLevel::Exhausted);
    }

    #[test]
    fn test_call_record_constructors() {
        let ok = ApiCallRecord::success(OperationType::Search, 100, 250, 10);
        assert!(ok.success);
        assert_eq!(ok.quota_cost, 100);
        assert_eq!(ok.items_returned, Some(10));
        assert!(ok.error_message.is_none());

        let bad = ApiCallRecord::failure(OperationType::VideoDetails, 0, 30_000, "timeout");
        assert!(!bad.success);
        assert_eq!(bad.items_returned, None);
        assert_eq!(bad.error_message.as_deref(), Some("timeout"));
    }
}
