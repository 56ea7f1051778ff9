//! Quota manager
//!
//! Single owned component combining the ledger, cost estimator, call
//! recorder and threshold notifier. One instance is created at startup and
//! injected (as `Arc<QuotaManager>`) into every API-consuming service; there
//! is no ambient global state.

use std::sync::Arc;

use crate::config::YouTubeSettings;
use crate::error::{Error, Result};

use super::cost::CostEstimator;
use super::ledger::QuotaLedger;
use super::notifier::{NotificationSink, ThresholdNotifier};
use super::recorder::CallRecorder;
use super::types::{
    ApiAvailability, ApiCallRecord, CallStats, OperationType, QuotaCostEstimate, QuotaStatus,
};

/// Process-wide quota state for the YouTube API
///
/// All admission checks, usage recording and threshold evaluation go through
/// this type. Checks are advisory (see [`QuotaLedger`]); the upstream API
/// enforces the real limit.
#[derive(Debug)]
pub struct QuotaManager {
    ledger: QuotaLedger,
    estimator: CostEstimator,
    recorder: CallRecorder,
    notifier: ThresholdNotifier,
}

impl QuotaManager {
    /// Create a manager from settings, with a logging-only notification sink
    pub fn new(settings: &YouTubeSettings) -> Self {
        Self {
            ledger: QuotaLedger::new(settings.daily_quota_limit),
            estimator: CostEstimator::new(),
            recorder: CallRecorder::new(),
            notifier: ThresholdNotifier::new(
                settings.warning_threshold,
                settings.critical_threshold,
            ),
        }
    }

    /// Create a manager delivering user-facing notices to `sink`
    pub fn with_sink(settings: &YouTubeSettings, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            ledger: QuotaLedger::new(settings.daily_quota_limit),
            estimator: CostEstimator::new(),
            recorder: CallRecorder::new(),
            notifier: ThresholdNotifier::with_sink(
                settings.warning_threshold,
                settings.critical_threshold,
                sink,
            ),
        }
    }

    /// The cost estimator
    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    /// Check whether an operation over `item_count` items fits today's budget
    ///
    /// Returns the estimated cost on success. A predicted shortfall is a
    /// [`Error::QuotaExceeded`] and also drives a threshold evaluation, so
    /// the hard-stop notice fires without waiting for the next recorded call.
    pub async fn check_available(
        &self,
        operation: OperationType,
        item_count: usize,
    ) -> Result<u64> {
        self.roll_over_if_needed().await;

        let cost = self.estimator.estimate(operation, item_count);
        if cost == 0 {
            return Ok(0);
        }

        if !self.ledger.is_available(cost).await {
            let used = self.ledger.used_today().await;
            let limit = self.ledger.daily_limit();
            self.notifier.check_thresholds(used, limit).await;
            return Err(Error::quota_exceeded(format!(
                "{} needs {} units, only {} of {} remain today",
                operation,
                cost,
                limit.saturating_sub(used),
                limit
            )));
        }

        Ok(cost)
    }

    /// Record a completed call and re-evaluate thresholds
    ///
    /// Only successful calls consume budget; every call lands in the
    /// recorder for analytics.
    pub async fn record_call(&self, record: ApiCallRecord) {
        self.roll_over_if_needed().await;

        let used = self
            .ledger
            .record(record.quota_cost, record.success)
            .await;
        self.recorder.record(record).await;
        self.notifier
            .check_thresholds(used, self.ledger.daily_limit())
            .await;
    }

    /// Raise the hard-stop notice for an upstream quota rejection
    ///
    /// The upstream API can report exhaustion while the local ledger still
    /// shows headroom (other consumers of the same key, estimate drift).
    pub async fn notify_quota_exhausted(&self, reason: &str) {
        self.notifier.notify_exhausted(reason).await;
    }

    /// Availability summary for the rest of the application
    pub async fn availability(&self) -> ApiAvailability {
        let status = self.status().await;
        ApiAvailability {
            is_available: status.remaining > 0,
            usage_percentage: status.usage_percent,
            remaining_quota: status.remaining,
            reset_time: status.reset_time,
        }
    }

    /// Current ledger status
    pub async fn status(&self) -> QuotaStatus {
        self.roll_over_if_needed().await;
        self.ledger.status().await
    }

    /// Per-operation call statistics over the rolling window
    pub async fn stats(&self) -> Vec<CallStats> {
        self.recorder.stats().await
    }

    /// The most recent call records, newest first
    pub async fn recent_calls(&self, limit: usize) -> Vec<ApiCallRecord> {
        self.recorder.recent(limit).await
    }

    /// Project the cost of a suggestion run against today's remaining budget
    pub async fn estimate_suggestion_cost(
        &self,
        channel_count: usize,
        topic_count: usize,
        estimated_videos: usize,
    ) -> QuotaCostEstimate {
        self.roll_over_if_needed().await;
        let used = self.ledger.used_today().await;
        self.estimator.estimate_suggestion_cost(
            channel_count,
            topic_count,
            estimated_videos,
            used,
            self.ledger.daily_limit(),
        )
    }

    /// Apply the lazy daily reset, clearing stale call history with it
    async fn roll_over_if_needed(&self) {
        if self.ledger.reset_if_new_day().await {
            self.recorder.trim_expired().await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
