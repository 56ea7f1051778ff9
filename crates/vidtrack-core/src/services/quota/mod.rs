//! Quota management module
//!
//! Tracks YouTube Data API quota consumption so the application can stop
//! issuing obviously-wasted calls before the upstream API starts rejecting
//! them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ QuotaManager (injected into every API consumer)         │
//! │                                                         │
//! │  ┌────────────┐ ┌─────────────┐ ┌────────────────────┐  │
//! │  │QuotaLedger │ │CostEstimator│ │ThresholdNotifier   │  │
//! │  │- used today│ │- unit table │ │- 75% log           │  │
//! │  │- UTC reset │ │- batching   │ │- 90% warn (sink)   │  │
//! │  └────────────┘ └─────────────┘ │- 100% hard stop    │  │
//! │  ┌────────────────────────────┐ └────────────────────┘  │
//! │  │CallRecorder (24h rolling)  │                         │
//! │  └────────────────────────────┘                         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Semantics
//!
//! - The ledger resets lazily, exactly once per UTC calendar day.
//! - `check_available` is advisory: nothing is reserved, and the upstream
//!   API remains the authoritative enforcer.
//! - Only successful calls consume the tracked budget; failures are logged
//!   for analytics.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use vidtrack_core::services::quota::{OperationType, QuotaManager};
//!
//! let quota = Arc::new(QuotaManager::new(&settings));
//!
//! let cost = quota.check_available(OperationType::Search, 0).await?;
//! // ... perform the call ...
//! quota.record_call(ApiCallRecord::success(OperationType::Search, cost, 240, 10)).await;
//! ```

pub mod cost;
pub mod ledger;
pub mod manager;
pub mod notifier;
pub mod recorder;
pub mod types;

// Re-export main types
pub use types::{
    AlertLevel,
    ApiAvailability,
    ApiCallRecord,
    CallStats,
    OperationCost,
    OperationType,
    QuotaCostEstimate,
    QuotaStatus,
};

// Re-export components
pub use cost::{CostEstimator, MAX_BATCH_SIZE, SEARCH_UNITS_PER_CALL};
pub use ledger::{next_utc_midnight, QuotaLedger};
pub use manager::QuotaManager;
pub use notifier::{LogSink, NotificationSink, ThresholdNotifier};
pub use recorder::CallRecorder;
