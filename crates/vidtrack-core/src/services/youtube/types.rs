//! YouTube domain and wire types
//!
//! `VideoInfo` is the normalized shape the rest of the application consumes.
//! The `*Response` structs mirror the YouTube Data API v3 list payloads and
//! are Option-heavy on purpose: the API omits fields freely, and a missing
//! snippet must not fail the whole page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Domain Types
// ============================================================================

/// Normalized video metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    /// YouTube video id
    pub video_id: String,
    /// Video title
    pub title: String,
    /// Video description (may be empty)
    pub description: String,
    /// Owning channel id
    pub channel_id: String,
    /// Owning channel title
    pub channel_title: String,
    /// Publication time
    pub published_at: Option<DateTime<Utc>>,
    /// Thumbnail URL (medium size preferred)
    pub thumbnail_url: Option<String>,
    /// ISO 8601 duration (`PT4M13S`), present after a details fetch
    pub duration: Option<String>,
    /// View count, present after a details fetch
    pub view_count: Option<u64>,
    /// Like count, present after a details fetch
    pub like_count: Option<u64>,
}

impl VideoInfo {
    /// How many optional detail fields are populated
    ///
    /// Used as the tie-break when deduplicating overlapping result lists:
    /// a record from `videos.list` (with statistics) beats a bare search hit.
    pub fn richness(&self) -> usize {
        [
            self.published_at.is_some(),
            self.thumbnail_url.is_some(),
            self.duration.is_some(),
            self.view_count.is_some(),
            self.like_count.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// One channel's entry in a bulk update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelUpdateRequest {
    /// Channel to fetch new videos for
    pub channel_id: String,
    /// Display name, used only for logging
    pub channel_name: String,
    /// Only videos published after this instant are requested
    pub last_check_date: Option<DateTime<Utc>>,
    /// Maximum videos to fetch for this channel
    pub max_results: u32,
    /// User rating for the channel; rating 1 ("not interested") excludes the
    /// channel from bulk updates entirely
    pub user_rating: Option<i32>,
}

impl ChannelUpdateRequest {
    /// Whether this channel is excluded from bulk updates
    pub fn is_excluded(&self) -> bool {
        self.user_rating == Some(1)
    }
}

// ============================================================================
// Wire Types — search.list
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    pub id: Option<SearchResultId>,
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResultId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Snippet {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnails {
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: Option<String>,
}

impl Thumbnails {
    fn best_url(&self) -> Option<String> {
        self.medium
            .as_ref()
            .and_then(|t| t.url.clone())
            .or_else(|| self.default.as_ref().and_then(|t| t.url.clone()))
    }
}

// ============================================================================
// Wire Types — videos.list
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    pub id: Option<String>,
    pub snippet: Option<Snippet>,
    #[serde(rename = "contentDetails")]
    pub content_details: Option<ContentDetails>,
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentDetails {
    pub duration: Option<String>,
}

/// Statistics counts arrive as decimal strings in the v3 API
#[derive(Debug, Deserialize)]
pub(crate) struct Statistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
}

// ============================================================================
// Wire Types — error envelope
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub reason: Option<String>,
}

impl ApiErrorBody {
    /// Whether any error detail carries a quota-related reason
    pub fn is_quota_reason(&self) -> bool {
        self.errors.iter().any(|detail| {
            matches!(
                detail.reason.as_deref(),
                Some("quotaExceeded") | Some("dailyLimitExceeded") | Some("rateLimitExceeded")
            )
        })
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Build a `VideoInfo` from a search hit; hits without a video id are dropped
pub(crate) fn video_from_search(result: SearchResult) -> Option<VideoInfo> {
    let video_id = result.id.and_then(|id| id.video_id)?;
    let snippet = result.snippet;
    Some(VideoInfo {
        video_id,
        title: snippet
            .as_ref()
            .and_then(|s| s.title.clone())
            .unwrap_or_default(),
        description: snippet
            .as_ref()
            .and_then(|s| s.description.clone())
            .unwrap_or_default(),
        channel_id: snippet
            .as_ref()
            .and_then(|s| s.channel_id.clone())
            .unwrap_or_default(),
        channel_title: snippet
            .as_ref()
            .and_then(|s| s.channel_title.clone())
            .unwrap_or_default(),
        published_at: snippet.as_ref().and_then(|s| s.published_at),
        thumbnail_url: snippet
            .as_ref()
            .and_then(|s| s.thumbnails.as_ref())
            .and_then(|t| t.best_url()),
        duration: None,
        view_count: None,
        like_count: None,
    })
}

/// Build a `VideoInfo` from a `videos.list` item; items without an id are
/// dropped
pub(crate) fn video_from_item(item: VideoItem) -> Option<VideoInfo> {
    let video_id = item.id?;
    let snippet = item.snippet;
    Some(VideoInfo {
        video_id,
        title: snippet
            .as_ref()
            .and_then(|s| s.title.clone())
            .unwrap_or_default(),
        description: snippet
            .as_ref()
            .and_then(|s| s.description.clone())
            .unwrap_or_default(),
        channel_id: snippet
            .as_ref()
            .and_then(|s| s.channel_id.clone())
            .unwrap_or_default(),
        channel_title: snippet
            .as_ref()
            .and_then(|s| s.channel_title.clone())
            .unwrap_or_default(),
        published_at: snippet.as_ref().and_then(|s| s.published_at),
        thumbnail_url: snippet
            .as_ref()
            .and_then(|s| s.thumbnails.as_ref())
            .and_then(|t| t.best_url()),
        duration: item.content_details.and_then(|c| c.duration),
        view_count: item
            .statistics
            .as_ref()
            .and_then(|s| s.view_count.as_ref())
            .and_then(|v| v.parse().ok()),
        like_count: item
            .statistics
            .as_ref()
            .and_then(|s| s.like_count.as_ref())
            .and_then(|v| v.parse().ok()),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_richness() {
        let bare = VideoInfo {
            video_id: "a".into(),
            title: "t".into(),
            description: String::new(),
            channel_id: String::new(),
            channel_title: String::new(),
            published_at: None,
            thumbnail_url: None,
            duration: None,
            view_count: None,
            like_count: None,
        };
        assert_eq!(bare.richness(), 0);

        let rich = VideoInfo {
            published_at: Some(Utc::now()),
            duration: Some("PT1M".into()),
            view_count: Some(10),
            ..bare.clone()
        };
        assert_eq!(rich.richness(), 3);
    }

    #[test]
    fn test_channel_update_exclusion() {
        let req = ChannelUpdateRequest {
            channel_id: "UC1".into(),
            channel_name: "Channel".into(),
            last_check_date: None,
            max_results: 10,
            user_rating: Some(1),
        };
        assert!(req.is_excluded());

        let kept = ChannelUpdateRequest {
            user_rating: Some(5),
            ..req.clone()
        };
        assert!(!kept.is_excluded());

        let unrated = ChannelUpdateRequest {
            user_rating: None,
            ..req
        };
        assert!(!unrated.is_excluded());
    }

    #[test]
    fn test_parse_search_response() {
        let json = serde_json::json!({
            "kind": "youtube#searchListResponse",
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "abc123"},
                    "snippet": {
                        "title": "A video",
                        "description": "About things",
                        "channelId": "UC1",
                        "channelTitle": "Channel One",
                        "publishedAt": "2026-08-20T10:00:00Z",
                        "thumbnails": {"medium": {"url": "https://img/m.jpg"}}
                    }
                },
                {
                    // Channel hit, no videoId: dropped
                    "id": {"kind": "youtube#channel"},
                    "snippet": {"title": "A channel"}
                }
            ]
        });

        let parsed: SearchListResponse = serde_json::from_value(json).unwrap();
        let videos: Vec<VideoInfo> = parsed
            .items
            .into_iter()
            .filter_map(video_from_search)
            .collect();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "abc123");
        assert_eq!(videos[0].channel_title, "Channel One");
        assert_eq!(videos[0].thumbnail_url.as_deref(), Some("https://img/m.jpg"));
        assert!(videos[0].published_at.is_some());
    }

    #[test]
    fn test_parse_video_item_statistics_strings() {
        let json = serde_json::json!({
            "id": "abc123",
            "snippet": {"title": "A video", "channelId": "UC1"},
            "contentDetails": {"duration": "PT4M13S"},
            "statistics": {"viewCount": "123456", "likeCount": "789"}
        });

        let item: VideoItem = serde_json::from_value(json).unwrap();
        let video = video_from_item(item).unwrap();
        assert_eq!(video.duration.as_deref(), Some("PT4M13S"));
        assert_eq!(video.view_count, Some(123_456));
        assert_eq!(video.like_count, Some(789));
    }

    #[test]
    fn test_error_envelope_quota_reason() {
        let json = serde_json::json!({
            "error": {
                "code": 403,
                "message": "The request cannot be completed...",
                "errors": [{"domain": "youtube.quota", "reason": "quotaExceeded"}]
            }
        });

        let envelope: ApiErrorEnvelope = serde_json::from_value(json).unwrap();
        let body = envelope.error.unwrap();
        assert_eq!(body.code, Some(403));
        assert!(body.is_quota_reason());
    }

    #[test]
    fn test_error_envelope_non_quota() {
        let json = serde_json::json!({
            "error": {"code": 400, "message": "Bad request", "errors": [{"reason": "invalidParameter"}]}
        });
        let envelope: ApiErrorEnvelope = serde_json::from_value(json).unwrap();
        assert!(!envelope.error.unwrap().is_quota_reason());
    }
}
