//! Call recorder
//!
//! Append-only in-memory log of every external API call, used for
//! per-operation analytics. The log is trimmed to a rolling window (24 hours
//! by default) so memory stays bounded; the quota manager also trims it when
//! the ledger rolls over to a new day.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use super::types::{ApiCallRecord, CallStats};

/// Rolling window length in hours
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// In-memory rolling log of API calls
#[derive(Debug)]
pub struct CallRecorder {
    window: Duration,
    records: RwLock<Vec<ApiCallRecord>>,
}

impl CallRecorder {
    /// Create a recorder with the default 24 h window
    pub fn new() -> Self {
        Self::with_window(Duration::hours(DEFAULT_WINDOW_HOURS))
    }

    /// Create a recorder with a custom rolling window
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Append a call record
    pub async fn record(&self, record: ApiCallRecord) {
        if record.success {
            log::debug!(
                "[quota:recorder] {} ok: {} units, {} ms, {} items",
                record.operation,
                record.quota_cost,
                record.duration_ms,
                record.items_returned.unwrap_or(0)
            );
        } else {
            log::warn!(
                "[quota:recorder] {} failed after {} ms: {}",
                record.operation,
                record.duration_ms,
                record.error_message.as_deref().unwrap_or("unknown error")
            );
        }
        self.records.write().await.push(record);
    }

    /// Drop records older than the rolling window
    pub async fn trim_expired(&self) -> usize {
        let cutoff = Utc::now() - self.window;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.timestamp >= cutoff);
        let dropped = before - records.len();
        if dropped > 0 {
            log::debug!("[quota:recorder] Trimmed {} expired records", dropped);
        }
        dropped
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the log is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// The most recent `limit` records, newest first
    pub async fn recent(&self, limit: usize) -> Vec<ApiCallRecord> {
        let records = self.records.read().await;
        records.iter().rev().take(limit).cloned().collect()
    }

    /// Aggregate statistics per operation type over the current window
    pub async fn stats(&self) -> Vec<CallStats> {
        let records = self.records.read().await;
        let mut by_op: BTreeMap<String, CallStats> = BTreeMap::new();

        for record in records.iter() {
            let entry = by_op
                .entry(record.operation.to_string())
                .or_insert_with(|| CallStats {
                    operation: record.operation.to_string(),
                    ..Default::default()
                });
            entry.calls += 1;
            entry.total_cost += record.quota_cost;
            entry.total_duration_ms += record.duration_ms;
            if !record.success {
                entry.errors += 1;
            }
        }

        by_op.into_values().collect()
    }
}

impl Default for CallRecorder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quota::types::OperationType;

    #[tokio::test]
    async fn test_record_and_len() {
        let recorder = CallRecorder::new();
        assert!(recorder.is_empty().await);

        recorder
            .record(ApiCallRecord::success(OperationType::Search, 100, 200, 5))
            .await;
        recorder
            .record(ApiCallRecord::failure(OperationType::Search, 0, 50, "boom"))
            .await;

        assert_eq!(recorder.len().await, 2);
    }

    #[tokio::test]
    async fn test_stats_aggregation() {
        let recorder = CallRecorder::new();
        recorder
            .record(ApiCallRecord::success(OperationType::Search, 100, 200, 5))
            .await;
        recorder
            .record(ApiCallRecord::success(OperationType::Search, 100, 300, 8))
            .await;
        recorder
            .record(ApiCallRecord::failure(OperationType::Search, 0, 100, "timeout"))
            .await;
        recorder
            .record(ApiCallRecord::success(OperationType::VideoDetails, 2, 150, 80))
            .await;

        let stats = recorder.stats().await;
        assert_eq!(stats.len(), 2);

        let search = stats.iter().find(|s| s.operation == "search").unwrap();
        assert_eq!(search.calls, 3);
        assert_eq!(search.total_cost, 200);
        assert_eq!(search.errors, 1);
        assert_eq!(search.total_duration_ms, 600);

        let details = stats.iter().find(|s| s.operation == "video_details").unwrap();
        assert_eq!(details.calls, 1);
        assert_eq!(details.total_cost, 2);
        assert_eq!(details.errors, 0);
    }

    #[tokio::test]
    async fn test_trim_expired() {
        let recorder = CallRecorder::with_window(Duration::hours(24));

        let mut old = ApiCallRecord::success(OperationType::Search, 100, 200, 5);
        old.timestamp = Utc::now() - Duration::hours(25);
        recorder.record(old).await;
        recorder
            .record(ApiCallRecord::success(OperationType::Search, 100, 200, 5))
            .await;

        let dropped = recorder.trim_expired().await;
        assert_eq!(dropped, 1);
        assert_eq!(recorder.len().await, 1);
    }

    #[tokio::test]
    async fn test_recent_newest_first() {
        let recorder = CallRecorder::new();
        recorder
            .record(ApiCallRecord::success(OperationType::Search, 100, 1, 1))
            .await;
        recorder
            .record(ApiCallRecord::success(OperationType::VideoDetails, 1, 2, 2))
            .await;

        let recent = recorder.recent(1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].operation, OperationType::VideoDetails);
    }
}
