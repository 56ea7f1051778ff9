//! Channel commands
//!
//! Fetch recent videos for a single channel, or run a bulk update over a
//! JSON file of tracked channels.

use anyhow::{Context as _, Result};
use chrono::{Duration, Utc};
use clap::Subcommand;

use super::{Context, VideoRow};
use crate::output::{print_info, print_output, print_success, print_warning};
use vidtrack_core::ChannelUpdateRequest;

#[derive(Subcommand)]
pub enum ChannelAction {
    /// List a channel's recent videos
    Videos {
        /// Channel id (UC...)
        channel_id: String,

        /// Only include videos published in the last N days
        #[arg(long)]
        since_days: Option<i64>,

        /// Maximum number of results (1-50)
        #[arg(long)]
        max: Option<u32>,
    },

    /// Fetch new videos for every channel in a JSON file
    ///
    /// The file holds an array of channel entries: channel_id, channel_name,
    /// last_check_date, max_results and an optional user_rating. Channels
    /// rated 1 are skipped.
    Update {
        /// Path to the channels JSON file
        #[arg(long)]
        file: String,
    },
}

pub async fn execute(ctx: &Context, action: ChannelAction) -> Result<()> {
    match action {
        ChannelAction::Videos {
            channel_id,
            since_days,
            max,
        } => channel_videos(ctx, &channel_id, since_days, max).await,
        ChannelAction::Update { file } => bulk_update(ctx, &file).await,
    }
}

async fn channel_videos(
    ctx: &Context,
    channel_id: &str,
    since_days: Option<i64>,
    max: Option<u32>,
) -> Result<()> {
    let client = ctx.client()?;
    let since = since_days.map(|days| Utc::now() - Duration::days(days.max(0)));

    let videos = client
        .get_channel_videos_since(channel_id, since, max)
        .await?;

    if videos.is_empty() {
        print_info(
            &format!("No new videos for channel {}.", channel_id),
            ctx.quiet,
        );
        return Ok(());
    }

    let rows: Vec<VideoRow> = videos.iter().map(VideoRow::from).collect();
    print_output(&rows, ctx.format)?;
    Ok(())
}

async fn bulk_update(ctx: &Context, file: &str) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read channels file {}", file))?;
    let requests: Vec<ChannelUpdateRequest> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid channels file {}", file))?;

    if requests.is_empty() {
        print_info("No channels in file.", ctx.quiet);
        return Ok(());
    }

    let skipped = requests.iter().filter(|r| r.is_excluded()).count();
    print_info(
        &format!(
            "Updating {} channels ({} skipped by rating)...",
            requests.len() - skipped,
            skipped
        ),
        ctx.quiet,
    );

    let client = ctx.client()?;
    let videos = client.get_bulk_channel_updates(&requests).await?;

    let availability = client.get_api_availability().await;
    if !availability.is_available {
        print_warning(
            "Daily quota is exhausted; results may be partial.",
            ctx.quiet,
        );
    }

    if videos.is_empty() {
        print_info("No new videos.", ctx.quiet);
        return Ok(());
    }

    let rows: Vec<VideoRow> = videos.iter().map(VideoRow::from).collect();
    print_output(&rows, ctx.format)?;
    print_success(&format!("{} new videos", videos.len()), ctx.quiet);
    Ok(())
}
