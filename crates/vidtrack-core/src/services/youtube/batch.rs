//! Batch request helpers
//!
//! The Data API caps detail lookups at 50 ids per call, so large id lists
//! are split into chunks, issued sequentially, and merged with
//! partial-success semantics: one failing chunk never aborts the rest, and a
//! quota-exceeded signal abandons the remaining chunks while keeping what
//! was already gathered.

use std::collections::HashMap;

use super::types::VideoInfo;

/// Result of a chunked batch fetch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Everything that was fetched successfully, deduplicated by video id
    pub videos: Vec<VideoInfo>,
    /// Chunks that were issued and succeeded
    pub succeeded_chunks: usize,
    /// Chunks that were issued and failed
    pub failed_chunks: usize,
    /// Whether the batch stopped early on a quota-exceeded signal
    pub quota_exhausted: bool,
}

impl BatchOutcome {
    /// Whether at least one chunk succeeded (or none were needed)
    pub fn any_success(&self) -> bool {
        self.succeeded_chunks > 0 || self.failed_chunks == 0
    }
}

/// Split ids into chunks no larger than `chunk_size`, dropping empties
///
/// Input order is preserved; duplicate ids are collapsed to the first
/// occurrence so overlapping sources don't pay for the same video twice.
pub fn chunk_ids(ids: &[String], chunk_size: usize) -> Vec<Vec<String>> {
    let mut seen = HashMap::new();
    let unique: Vec<String> = ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string(), ()).is_none())
        .map(|id| id.to_string())
        .collect();

    unique
        .chunks(chunk_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Deduplicate videos by id, preserving first-seen order
///
/// When the same id appears twice (bulk updates pulling one video from two
/// sources), the later record wins if it is at least as rich — a
/// `videos.list` record with statistics replaces a bare search hit, and the
/// most-recently-seen record wins ties.
pub fn dedup_videos(videos: Vec<VideoInfo>) -> Vec<VideoInfo> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut result: Vec<VideoInfo> = Vec::with_capacity(videos.len());

    for video in videos {
        match index.get(&video.video_id) {
            Some(&position) => {
                if video.richness() >= result[position].richness() {
                    result[position] = video;
                }
            }
            None => {
                index.insert(video.video_id.clone(), result.len());
                result.push(video);
            }
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn video(id: &str) -> VideoInfo {
        VideoInfo {
            video_id: id.to_string(),
            title: format!("Video {}", id),
            description: String::new(),
            channel_id: "UC1".to_string(),
            channel_title: "Channel".to_string(),
            published_at: None,
            thumbnail_url: None,
            duration: None,
            view_count: None,
            like_count: None,
        }
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("vid{:03}", i)).collect()
    }

    #[test]
    fn test_chunk_sizes() {
        assert_eq!(chunk_ids(&ids(0), 50).len(), 0);
        assert_eq!(chunk_ids(&ids(1), 50).len(), 1);
        assert_eq!(chunk_ids(&ids(50), 50).len(), 1);
        assert_eq!(chunk_ids(&ids(51), 50).len(), 2);

        // 120 ids split into 3 calls of <= 50 each
        let chunks = chunk_ids(&ids(120), 50);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 50));
        assert_eq!(chunks[0].len(), 50);
        assert_eq!(chunks[2].len(), 20);
    }

    #[test]
    fn test_chunk_filters_empty_and_duplicate_ids() {
        let input = vec![
            "a".to_string(),
            "".to_string(),
            "  ".to_string(),
            "b".to_string(),
            "a".to_string(),
        ];
        let chunks = chunk_ids(&input, 50);
        assert_eq!(chunks, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_dedup_single_entry_per_id() {
        let merged = dedup_videos(vec![video("abc123"), video("xyz"), video("abc123")]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].video_id, "abc123");
        assert_eq!(merged[1].video_id, "xyz");
    }

    #[test]
    fn test_dedup_prefers_richer_record() {
        let bare = video("abc123");
        let mut rich = video("abc123");
        rich.published_at = Some(Utc::now());
        rich.view_count = Some(1000);
        rich.title = "Richer".to_string();

        // Richer record later in the list replaces the bare one in place
        let merged = dedup_videos(vec![bare.clone(), video("other"), rich]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "Richer");

        // A later bare record does not displace an earlier rich one
        let mut rich_first = video("abc123");
        rich_first.view_count = Some(5);
        let merged = dedup_videos(vec![rich_first, bare]);
        assert_eq!(merged[0].view_count, Some(5));
    }

    #[test]
    fn test_dedup_equal_richness_most_recent_wins() {
        let mut first = video("abc123");
        first.title = "First".to_string();
        let mut second = video("abc123");
        second.title = "Second".to_string();

        let merged = dedup_videos(vec![first, second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Second");
    }

    #[test]
    fn test_outcome_any_success() {
        let empty = BatchOutcome::default();
        assert!(empty.any_success());

        let partial = BatchOutcome {
            succeeded_chunks: 1,
            failed_chunks: 2,
            ..Default::default()
        };
        assert!(partial.any_success());

        let total_failure = BatchOutcome {
            failed_chunks: 3,
            ..Default::default()
        };
        assert!(!total_failure.any_success());
    }
}
