//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod channel;
pub mod quota;
pub mod search;
pub mod videos;

use anyhow::Context as _;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{truncate, OutputFormat};
use vidtrack_core::{VideoInfo, YouTubeClient, YouTubeSettings};

/// Shared context for all commands
pub struct Context {
    pub settings: YouTubeSettings,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Build the API client
    ///
    /// Fails without an API key; quota-only commands avoid this path so they
    /// keep working offline.
    pub fn client(&self) -> anyhow::Result<YouTubeClient> {
        YouTubeClient::new(&self.settings)
            .context("Failed to initialize the YouTube client")
    }
}

/// Video row for table display, shared by search and channel commands
#[derive(Debug, Serialize, Tabled)]
pub struct VideoRow {
    #[tabled(rename = "Video ID")]
    pub video_id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Channel")]
    pub channel: String,
    #[tabled(rename = "Published")]
    pub published: String,
}

impl From<&VideoInfo> for VideoRow {
    fn from(video: &VideoInfo) -> Self {
        Self {
            video_id: video.video_id.clone(),
            title: truncate(&video.title, 50),
            channel: truncate(&video.channel_title, 25),
            published: video
                .published_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}
