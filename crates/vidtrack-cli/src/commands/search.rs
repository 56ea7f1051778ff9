//! Video search command

use anyhow::Result;
use chrono::{Duration, Utc};

use super::{Context, VideoRow};
use crate::output::{print_info, print_output};

pub async fn execute(
    ctx: &Context,
    query: &str,
    since_days: Option<i64>,
    max: Option<u32>,
) -> Result<()> {
    let client = ctx.client()?;
    let published_after = since_days.map(|days| Utc::now() - Duration::days(days.max(0)));

    let videos = client
        .search_videos_by_topic(query, published_after, max)
        .await?;

    if videos.is_empty() {
        print_info(&format!("No videos found for '{}'.", query), ctx.quiet);
        return Ok(());
    }

    let rows: Vec<VideoRow> = videos.iter().map(VideoRow::from).collect();
    print_output(&rows, ctx.format)?;
    print_info(
        &format!("{} videos found for '{}'", videos.len(), query),
        ctx.quiet,
    );
    Ok(())
}
