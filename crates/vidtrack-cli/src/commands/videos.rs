//! Video details command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_info, print_output, truncate};
use vidtrack_core::VideoInfo;

/// Detail row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct DetailRow {
    #[tabled(rename = "Video ID")]
    pub video_id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Channel")]
    pub channel: String,
    #[tabled(rename = "Duration")]
    pub duration: String,
    #[tabled(rename = "Views")]
    pub views: String,
    #[tabled(rename = "Likes")]
    pub likes: String,
}

impl From<&VideoInfo> for DetailRow {
    fn from(video: &VideoInfo) -> Self {
        Self {
            video_id: video.video_id.clone(),
            title: truncate(&video.title, 40),
            channel: truncate(&video.channel_title, 25),
            duration: video.duration.clone().unwrap_or_else(|| "-".to_string()),
            views: video
                .view_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            likes: video
                .like_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub async fn execute(ctx: &Context, ids: &[String]) -> Result<()> {
    // Accept both space separated and comma separated id lists
    let ids: Vec<String> = ids
        .iter()
        .flat_map(|arg| arg.split(','))
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    let client = ctx.client()?;
    let videos = client.get_video_details_by_ids(&ids).await?;

    if videos.is_empty() {
        print_info("No video details found.", ctx.quiet);
        return Ok(());
    }

    let rows: Vec<DetailRow> = videos.iter().map(DetailRow::from).collect();
    print_output(&rows, ctx.format)?;

    if videos.len() < ids.len() {
        print_info(
            &format!(
                "{} of {} requested videos returned (the rest are missing or were skipped)",
                videos.len(),
                ids.len()
            ),
            ctx.quiet,
        );
    }
    Ok(())
}
