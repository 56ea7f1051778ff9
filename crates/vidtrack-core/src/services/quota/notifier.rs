//! Threshold notifier
//!
//! Evaluates quota usage against the configured thresholds and raises
//! notices:
//!
//! - warning threshold (75 % default): log only
//! - critical threshold (90 % default): user-facing warning via the sink
//! - 100 %: user-facing hard-stop notice via the sink
//!
//! Notices are re-emitted on every evaluation that sits at or above a
//! threshold — deduplication is the caller's concern, bounded by its polling
//! cadence. Sink failures are logged and swallowed; a broken notification
//! channel must never fail the operation that triggered the check.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

use super::types::AlertLevel;

// ============================================================================
// Notification Sink
// ============================================================================

/// Destination for user-facing quota notices
///
/// Implementations might post to a UI event channel, a tray icon, or a chat
/// webhook. The notifier treats the sink as unreliable: errors are logged
/// and dropped.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notice to the user
    async fn notify(&self, level: AlertLevel, message: &str) -> Result<()>;
}

/// Sink that writes notices to the log
///
/// The default when no user-facing channel is wired up.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, level: AlertLevel, message: &str) -> Result<()> {
        match level {
            AlertLevel::Exhausted => log::error!("[quota:notify] {}", message),
            _ => log::warn!("[quota:notify] {}", message),
        }
        Ok(())
    }
}

// ============================================================================
// Threshold Notifier
// ============================================================================

/// Usage-threshold monitor
pub struct ThresholdNotifier {
    warning_threshold: f64,
    critical_threshold: f64,
    sink: Arc<dyn NotificationSink>,
}

impl std::fmt::Debug for ThresholdNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThresholdNotifier")
            .field("warning_threshold", &self.warning_threshold)
            .field("critical_threshold", &self.critical_threshold)
            .finish()
    }
}

impl ThresholdNotifier {
    /// Create a notifier with the given thresholds, logging-only sink
    pub fn new(warning_threshold: f64, critical_threshold: f64) -> Self {
        Self::with_sink(warning_threshold, critical_threshold, Arc::new(LogSink))
    }

    /// Create a notifier delivering user-facing notices to `sink`
    pub fn with_sink(
        warning_threshold: f64,
        critical_threshold: f64,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            warning_threshold: warning_threshold.clamp(0.0, 100.0),
            critical_threshold: critical_threshold.clamp(0.0, 100.0),
            sink,
        }
    }

    /// Evaluate usage and emit the appropriate notice
    ///
    /// Returns the alert level the usage maps to, which callers can surface
    /// directly (the CLI status view does).
    pub async fn check_thresholds(&self, used_today: u64, daily_limit: u64) -> AlertLevel {
        let percent = (used_today as f64 / daily_limit.max(1) as f64) * 100.0;
        let level = AlertLevel::from_usage(percent, self.warning_threshold, self.critical_threshold);

        match level {
            AlertLevel::Normal => {}
            AlertLevel::Warning => {
                log::warn!(
                    "[quota:notify] Usage at {:.1}% of daily limit ({}/{} units)",
                    percent,
                    used_today,
                    daily_limit
                );
            }
            AlertLevel::Critical => {
                let message = format!(
                    "YouTube API quota at {:.1}% ({}/{} units). Further updates may be limited today.",
                    percent, used_today, daily_limit
                );
                self.deliver(level, &message).await;
            }
            AlertLevel::Exhausted => {
                let message = format!(
                    "YouTube API quota exhausted ({}/{} units). Requests are paused until the UTC midnight reset.",
                    used_today, daily_limit
                );
                self.deliver(level, &message).await;
            }
        }

        level
    }

    /// Emit the hard-stop notice directly
    ///
    /// Used when the upstream API rejects a call with a quota signal even
    /// though the local ledger still shows headroom.
    pub async fn notify_exhausted(&self, reason: &str) {
        let message = format!(
            "YouTube API reported its quota as exhausted: {}. Requests are paused until the UTC midnight reset.",
            reason
        );
        self.deliver(AlertLevel::Exhausted, &message).await;
    }

    /// Deliver through the sink, swallowing failures
    async fn deliver(&self, level: AlertLevel, message: &str) {
        if let Err(err) = self.sink.notify(level, message).await {
            log::warn!("[quota:notify] Notification sink failed: {}", err);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
