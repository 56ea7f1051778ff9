//! Quota cost estimation
//!
//! Pure arithmetic mapping operation type + item count to quota units,
//! including the batching rules of the YouTube Data API:
//!
//! - `search.list` costs a flat 100 units per call regardless of result count
//! - `videos.list` / `channels.list` accept up to 50 ids per call at 1 unit
//!   per call, so a detail lookup costs `ceil(n / 50)` units
//! - `playlistItems.list` costs 1 unit per page

use std::collections::BTreeMap;

use super::types::{OperationCost, OperationType, QuotaCostEstimate};

// ============================================================================
// Cost Constants (quota units)
// ============================================================================

/// Flat per-call cost of a search operation
pub const SEARCH_UNITS_PER_CALL: u64 = 100;

/// Per-call cost of a video detail batch
pub const VIDEO_DETAILS_UNITS_PER_CALL: u64 = 1;

/// Per-call cost of a channel detail batch
pub const CHANNEL_DETAILS_UNITS_PER_CALL: u64 = 1;

/// Per-call cost of a playlist-items page
pub const PLAYLIST_ITEMS_UNITS_PER_CALL: u64 = 1;

/// Maximum ids the API accepts in one detail call
pub const MAX_BATCH_SIZE: usize = 50;

/// Projected usage percentage above which optimization suggestions are added
pub const SUGGESTION_WARNING_THRESHOLD: f64 = 80.0;

// ============================================================================
// Cost Estimator
// ============================================================================

/// Cost estimator over the static per-operation cost table
#[derive(Debug, Clone)]
pub struct CostEstimator {
    costs: [OperationCost; 4],
}

impl CostEstimator {
    /// Create an estimator with the standard YouTube Data API v3 cost table
    pub fn new() -> Self {
        Self {
            costs: [
                OperationCost {
                    operation: OperationType::Search,
                    units_per_call: SEARCH_UNITS_PER_CALL,
                    max_items_per_call: 1,
                },
                OperationCost {
                    operation: OperationType::VideoDetails,
                    units_per_call: VIDEO_DETAILS_UNITS_PER_CALL,
                    max_items_per_call: MAX_BATCH_SIZE,
                },
                OperationCost {
                    operation: OperationType::ChannelDetails,
                    units_per_call: CHANNEL_DETAILS_UNITS_PER_CALL,
                    max_items_per_call: MAX_BATCH_SIZE,
                },
                OperationCost {
                    operation: OperationType::PlaylistItems,
                    units_per_call: PLAYLIST_ITEMS_UNITS_PER_CALL,
                    max_items_per_call: MAX_BATCH_SIZE,
                },
            ],
        }
    }

    /// Cost table row for an operation
    pub fn cost_for(&self, operation: OperationType) -> OperationCost {
        // The table always carries all four variants.
        self.costs
            .iter()
            .copied()
            .find(|c| c.operation == operation)
            .unwrap_or(OperationCost {
                operation,
                units_per_call: SEARCH_UNITS_PER_CALL,
                max_items_per_call: 1,
            })
    }

    /// Quota units required for an operation over `item_count` items
    ///
    /// Search is flat per call. Batch-detail operations cost one call per
    /// started chunk of [`MAX_BATCH_SIZE`] ids; zero items cost nothing.
    pub fn estimate(&self, operation: OperationType, item_count: usize) -> u64 {
        match operation {
            OperationType::Search => SEARCH_UNITS_PER_CALL,
            _ => {
                if item_count == 0 {
                    return 0;
                }
                let row = self.cost_for(operation);
                let calls = item_count.div_ceil(row.max_items_per_call.max(1)) as u64;
                calls * row.units_per_call
            }
        }
    }

    /// Project the cost of a full suggestion run
    ///
    /// A suggestion run issues one search per tracked channel, one search per
    /// topic, and detail batches for the videos those searches surface. The
    /// returned estimate carries a per-group breakdown, an
    /// exceeds-remaining-quota flag, and optimization suggestions when the
    /// projected usage crosses [`SUGGESTION_WARNING_THRESHOLD`].
    pub fn estimate_suggestion_cost(
        &self,
        channel_count: usize,
        topic_count: usize,
        estimated_videos: usize,
        used_today: u64,
        daily_limit: u64,
    ) -> QuotaCostEstimate {
        let channel_cost = channel_count as u64 * SEARCH_UNITS_PER_CALL;
        let topic_cost = topic_count as u64 * SEARCH_UNITS_PER_CALL;
        let detail_cost = self.estimate(OperationType::VideoDetails, estimated_videos);

        let mut breakdown = BTreeMap::new();
        breakdown.insert("channel_searches".to_string(), channel_cost);
        breakdown.insert("topic_searches".to_string(), topic_cost);
        breakdown.insert("video_details".to_string(), detail_cost);

        let total_cost = channel_cost + topic_cost + detail_cost;
        let remaining_quota = daily_limit.saturating_sub(used_today);
        let exceeds_remaining = total_cost > remaining_quota;

        let projected_used = used_today.saturating_add(total_cost);
        let projected_usage_percent =
            (projected_used as f64 / daily_limit.max(1) as f64) * 100.0;

        let mut suggestions = Vec::new();
        if exceeds_remaining {
            suggestions.push(format!(
                "Plan needs {} units but only {} remain today; run it after the UTC midnight reset",
                total_cost, remaining_quota
            ));
        }
        if projected_usage_percent >= SUGGESTION_WARNING_THRESHOLD {
            if channel_count + topic_count > 0 {
                suggestions.push(
                    "Searches dominate the cost (100 units each); reduce the number of tracked \
                     channels or topics per run"
                        .to_string(),
                );
            }
            suggestions.push(
                "Repeated queries within 15 minutes are served from cache at no quota cost; \
                 space runs closer together"
                    .to_string(),
            );
        }

        QuotaCostEstimate {
            breakdown,
            total_cost,
            remaining_quota,
            projected_usage_percent,
            exceeds_remaining,
            suggestions,
        }
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
