//! Daily quota ledger
//!
//! Process-wide counter of quota units consumed today, with lazy
//! reset-at-UTC-midnight semantics. The ledger is advisory: `is_available`
//! is a check-then-act race tolerated by design, because the upstream API
//! enforces the authoritative limit server-side. The local ledger only
//! exists to avoid obviously-wasted calls.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;

use super::types::QuotaStatus;

/// State guarded by the ledger lock
#[derive(Debug)]
struct LedgerState {
    used_today: u64,
    last_reset_date: NaiveDate,
}

/// Daily quota counter with lazy once-per-UTC-day reset
///
/// Only successful calls consume budget; failed calls are recorded for
/// analytics by the [`super::recorder::CallRecorder`] but never charged
/// here, mirroring the upstream API's behavior of not billing failed calls.
#[derive(Debug)]
pub struct QuotaLedger {
    daily_limit: u64,
    state: RwLock<LedgerState>,
}

impl QuotaLedger {
    /// Create a ledger with the given daily allowance
    pub fn new(daily_limit: u64) -> Self {
        Self {
            daily_limit,
            state: RwLock::new(LedgerState {
                used_today: 0,
                last_reset_date: Utc::now().date_naive(),
            }),
        }
    }

    /// Create a ledger with pre-seeded usage and reset date
    ///
    /// Useful for testing reset behavior.
    pub fn with_state(daily_limit: u64, used_today: u64, last_reset_date: NaiveDate) -> Self {
        Self {
            daily_limit,
            state: RwLock::new(LedgerState {
                used_today,
                last_reset_date,
            }),
        }
    }

    /// Daily quota allowance in units
    pub fn daily_limit(&self) -> u64 {
        self.daily_limit
    }

    /// Whether `units_required` fits within today's remaining budget
    ///
    /// Advisory only: nothing is reserved, and concurrent callers may both
    /// see the same headroom. The upstream API remains authoritative.
    pub async fn is_available(&self, units_required: u64) -> bool {
        self.reset_if_new_day().await;
        let state = self.state.read().await;
        state.used_today.saturating_add(units_required) <= self.daily_limit
    }

    /// Record consumed units for a completed call
    ///
    /// Only `success == true` increments the counter. Returns the units
    /// used today after the update.
    pub async fn record(&self, units_used: u64, success: bool) -> u64 {
        self.reset_if_new_day().await;
        let mut state = self.state.write().await;
        if success {
            state.used_today = state.used_today.saturating_add(units_used);
            log::debug!(
                "[quota:ledger] Recorded {} units, {}/{} used today",
                units_used,
                state.used_today,
                self.daily_limit
            );
        }
        state.used_today
    }

    /// Zero the counter if the stored reset date is stale
    ///
    /// Idempotent per UTC day: repeated calls within the same day are
    /// no-ops. Returns `true` when a reset actually happened, so the owner
    /// can clear dependent state (the call recorder's rolling window).
    pub async fn reset_if_new_day(&self) -> bool {
        self.reset_if_stale(Utc::now().date_naive()).await
    }

    pub(crate) async fn reset_if_stale(&self, today: NaiveDate) -> bool {
        // Cheap read-path check first; most calls hit this and bail.
        {
            let state = self.state.read().await;
            if state.last_reset_date >= today {
                return false;
            }
        }

        let mut state = self.state.write().await;
        // Re-check under the write lock: another task may have reset already.
        if state.last_reset_date >= today {
            return false;
        }
        log::info!(
            "[quota:ledger] New UTC day {}, resetting counter (was {} units)",
            today,
            state.used_today
        );
        state.used_today = 0;
        state.last_reset_date = today;
        true
    }

    /// Units consumed since the last reset
    pub async fn used_today(&self) -> u64 {
        self.state.read().await.used_today
    }

    /// Usage as a percentage of the daily limit
    pub async fn usage_percent(&self) -> f64 {
        let used = self.used_today().await;
        if self.daily_limit == 0 {
            return 100.0;
        }
        (used as f64 / self.daily_limit as f64) * 100.0
    }

    /// Current ledger status
    pub async fn status(&self) -> QuotaStatus {
        self.reset_if_new_day().await;
        let state = self.state.read().await;
        let used = state.used_today;
        QuotaStatus {
            daily_limit: self.daily_limit,
            used_today: used,
            remaining: self.daily_limit.saturating_sub(used),
            usage_percent: (used as f64 / self.daily_limit.max(1) as f64) * 100.0,
            reset_time: next_utc_midnight(),
        }
    }
}

/// Next UTC midnight (when the upstream API resets its daily quota)
pub fn next_utc_midnight() -> DateTime<Utc> {
    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    DateTime::<Utc>::from_naive_utc_and_offset(tomorrow.and_time(NaiveTime::MIN), Utc)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_available_within_limit() {
        let ledger = QuotaLedger::new(10_000);
        assert!(ledger.is_available(10_000).await);
        assert!(ledger.is_available(1).await);
        assert!(!ledger.is_available(10_001).await);
    }

    #[tokio::test]
    async fn test_available_near_limit() {
        // dailyLimit=10000, usedToday=9950, request cost=100 -> unavailable
        let ledger = QuotaLedger::new(10_000);
        ledger.record(9_950, true).await;
        assert!(!ledger.is_available(100).await);
        assert!(ledger.is_available(50).await);
    }

    #[tokio::test]
    async fn test_record_only_counts_success() {
        let ledger = QuotaLedger::new(1_000);
        ledger.record(100, true).await;
        ledger.record(100, false).await;
        assert_eq!(ledger.used_today().await, 100);
    }

    #[tokio::test]
    async fn test_record_saturates_above_limit() {
        let ledger = QuotaLedger::new(100);
        let used = ledger.record(u64::MAX, true).await;
        assert_eq!(used, u64::MAX);
        assert!(!ledger.is_available(1).await);
    }

    #[tokio::test]
    async fn test_reset_on_stale_date() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let ledger = QuotaLedger::with_state(10_000, 5_000, yesterday);

        assert!(ledger.reset_if_new_day().await);
        assert_eq!(ledger.used_today().await, 0);
    }

    #[tokio::test]
    async fn test_reset_idempotent_within_day() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let ledger = QuotaLedger::with_state(10_000, 5_000, yesterday);

        assert!(ledger.reset_if_new_day().await);
        // Repeated invocations within the same day must be no-ops
        assert!(!ledger.reset_if_new_day().await);
        assert!(!ledger.reset_if_new_day().await);
        assert_eq!(ledger.used_today().await, 0);
    }

    #[tokio::test]
    async fn test_no_reset_same_day() {
        let ledger = QuotaLedger::new(10_000);
        ledger.record(500, true).await;
        assert!(!ledger.reset_if_new_day().await);
        assert_eq!(ledger.used_today().await, 500);
    }

    #[tokio::test]
    async fn test_lazy_reset_via_availability_check() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let ledger = QuotaLedger::with_state(100, 100, yesterday);

        // The stale counter would deny this; the lazy reset admits it.
        assert!(ledger.is_available(100).await);
    }

    #[tokio::test]
    async fn test_status() {
        let ledger = QuotaLedger::new(10_000);
        ledger.record(2_500, true).await;

        let status = ledger.status().await;
        assert_eq!(status.daily_limit, 10_000);
        assert_eq!(status.used_today, 2_500);
        assert_eq!(status.remaining, 7_500);
        assert!((status.usage_percent - 25.0).abs() < f64::EPSILON);
        assert!(status.reset_time > Utc::now());
    }

    #[tokio::test]
    async fn test_usage_percent_zero_limit() {
        let ledger = QuotaLedger::new(0);
        assert_eq!(ledger.usage_percent().await, 100.0);
    }

    #[test]
    fn test_next_utc_midnight_is_future() {
        let midnight = next_utc_midnight();
        assert!(midnight > Utc::now());
        assert!(midnight - Utc::now() <= Duration::days(1));
    }
}
