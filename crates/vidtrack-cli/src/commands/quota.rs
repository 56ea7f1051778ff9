//! Quota inspection commands
//!
//! These commands work without an API key: they read the local quota ledger
//! and the cost tables, never the network. Note that the ledger is
//! per-process, so a fresh CLI invocation always starts from zero usage;
//! the estimate subcommand is still useful for planning a run against a
//! known usage level.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_info, print_output, print_single, print_warning, usage_colored};
use vidtrack_core::QuotaManager;

#[derive(Subcommand)]
pub enum QuotaAction {
    /// Show the daily quota status
    Status,

    /// Estimate the cost of a planned run against the daily budget
    Estimate {
        /// Number of tracked channels to check
        #[arg(long, default_value_t = 0)]
        channels: usize,

        /// Number of topic searches to run
        #[arg(long, default_value_t = 0)]
        topics: usize,

        /// Number of videos needing a details fetch
        #[arg(long, default_value_t = 0)]
        videos: usize,

        /// Assume this many units already used today
        #[arg(long, default_value_t = 0)]
        used: u64,
    },
}

/// Status row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct StatusRow {
    #[tabled(rename = "Daily Limit")]
    pub daily_limit: u64,
    #[tabled(rename = "Used Today")]
    pub used_today: u64,
    #[tabled(rename = "Remaining")]
    pub remaining: u64,
    #[tabled(rename = "Usage")]
    pub usage: String,
    #[tabled(rename = "Resets (UTC)")]
    pub reset_time: String,
}

/// Estimate breakdown row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct EstimateRow {
    #[tabled(rename = "Operation")]
    pub operation: String,
    #[tabled(rename = "Cost (units)")]
    pub cost: u64,
}

pub async fn execute(ctx: &Context, action: QuotaAction) -> Result<()> {
    match action {
        QuotaAction::Status => status(ctx).await,
        QuotaAction::Estimate {
            channels,
            topics,
            videos,
            used,
        } => estimate(ctx, channels, topics, videos, used).await,
    }
}

async fn status(ctx: &Context) -> Result<()> {
    let quota = QuotaManager::new(&ctx.settings);
    let status = quota.status().await;

    let row = StatusRow {
        daily_limit: status.daily_limit,
        used_today: status.used_today,
        remaining: status.remaining,
        usage: usage_colored(status.usage_percent),
        reset_time: status.reset_time.format("%Y-%m-%d %H:%M").to_string(),
    };
    print_single(&row, ctx.format)?;
    Ok(())
}

async fn estimate(
    ctx: &Context,
    channels: usize,
    topics: usize,
    videos: usize,
    used: u64,
) -> Result<()> {
    let quota = QuotaManager::new(&ctx.settings);
    let estimate = quota
        .estimator()
        .estimate_suggestion_cost(channels, topics, videos, used, ctx.settings.daily_quota_limit);

    let rows: Vec<EstimateRow> = estimate
        .breakdown
        .iter()
        .map(|(operation, cost)| EstimateRow {
            operation: operation.clone(),
            cost: *cost,
        })
        .collect();
    print_output(&rows, ctx.format)?;

    print_info(
        &format!(
            "Total: {} units, {} remaining today, projected usage {}",
            estimate.total_cost,
            estimate.remaining_quota,
            usage_colored(estimate.projected_usage_percent)
        ),
        ctx.quiet,
    );

    if estimate.exceeds_remaining {
        print_warning(
            "This run does not fit in today's remaining quota.",
            ctx.quiet,
        );
    }
    for suggestion in &estimate.suggestions {
        print_info(&format!("  hint: {}", suggestion), ctx.quiet);
    }
    Ok(())
}
