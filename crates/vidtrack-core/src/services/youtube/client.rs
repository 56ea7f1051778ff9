//! YouTube API client
//!
//! The single shared client every feature goes through. Each operation runs
//! the same pipeline:
//!
//! ```text
//! cost estimate -> quota check -> rate limiter -> cache -> HTTP -> record -> thresholds
//! ```
//!
//! Operations degrade rather than fail wherever a partial answer is useful: empty
//! inputs return empty results without touching the network, multi-chunk
//! batches return whatever subset succeeded, and a quota-exceeded signal
//! abandons remaining work while keeping partial results.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::Semaphore;

use crate::config::YouTubeSettings;
use crate::error::{Error, Result};
use crate::services::quota::{
    ApiAvailability, ApiCallRecord, OperationType, QuotaManager, MAX_BATCH_SIZE,
};

use super::batch::{chunk_ids, dedup_videos, BatchOutcome};
use super::cache::{
    cache_key, minute_bucket, ResponseCache, DETAILS_CACHE_CAPACITY, SEARCH_CACHE_CAPACITY,
};
use super::transport::{ApiTransport, HttpTransport};
use super::types::{
    video_from_item, video_from_search, ChannelUpdateRequest, SearchListResponse,
    VideoInfo, VideoListResponse,
};

/// Shared client for the YouTube Data API
pub struct YouTubeClient {
    transport: Arc<dyn ApiTransport>,
    quota: Arc<QuotaManager>,
    limiter: Arc<Semaphore>,
    search_cache: ResponseCache<Vec<VideoInfo>>,
    details_cache: ResponseCache<VideoInfo>,
    max_search_results: u32,
}

impl YouTubeClient {
    /// Create a client with the production HTTP transport and its own quota
    /// manager
    pub fn new(settings: &YouTubeSettings) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(settings)?);
        let quota = Arc::new(QuotaManager::new(settings));
        Ok(Self::with_transport(settings, transport, quota))
    }

    /// Create a client over an explicit transport and quota manager
    ///
    /// This is the dependency-injection seam: embedding applications share
    /// one `QuotaManager` across clients, tests script the transport.
    pub fn with_transport(
        settings: &YouTubeSettings,
        transport: Arc<dyn ApiTransport>,
        quota: Arc<QuotaManager>,
    ) -> Self {
        let ttl = chrono::Duration::seconds(settings.cache_ttl_secs as i64);
        Self {
            transport,
            quota,
            limiter: Arc::new(Semaphore::new(settings.rate_limit_concurrency.max(1))),
            search_cache: ResponseCache::new("search", ttl, SEARCH_CACHE_CAPACITY),
            details_cache: ResponseCache::new("details", ttl, DETAILS_CACHE_CAPACITY),
            max_search_results: settings.max_search_results,
        }
    }

    /// The shared quota manager
    pub fn quota(&self) -> Arc<QuotaManager> {
        Arc::clone(&self.quota)
    }

    /// Availability summary for the rest of the application
    pub async fn get_api_availability(&self) -> ApiAvailability {
        self.quota.availability().await
    }

    // ========================================================================
    // Search Operations
    // ========================================================================

    /// Search for videos matching a topic, newest first
    ///
    /// An empty or whitespace query returns an empty result without touching
    /// quota or the network.
    pub async fn search_videos_by_topic(
        &self,
        query: &str,
        published_after: Option<DateTime<Utc>>,
        max_results: Option<u32>,
    ) -> Result<Vec<VideoInfo>> {
        let query = query.trim();
        if query.is_empty() {
            log::debug!("[youtube:client] Empty search query, skipping");
            return Ok(Vec::new());
        }
        let max = self.effective_max(max_results);

        let normalized = query.to_lowercase();
        let after_bucket = published_after
            .map(|at| minute_bucket(at).to_string())
            .unwrap_or_default();
        let key = cache_key(
            "search",
            &[
                ("q", normalized.as_str()),
                ("after", after_bucket.as_str()),
                ("max", &max.to_string()),
            ],
        );
        if let Some(hit) = self.search_cache.get(&key).await {
            return Ok(hit);
        }

        let mut params = vec![
            ("part".to_string(), "snippet".to_string()),
            ("q".to_string(), query.to_string()),
            ("type".to_string(), "video".to_string()),
            ("order".to_string(), "date".to_string()),
            ("maxResults".to_string(), max.to_string()),
        ];
        if let Some(after) = published_after {
            params.push((
                "publishedAfter".to_string(),
                after.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }

        let videos = self.search_call(&params).await?;
        self.search_cache.put(key, videos.clone()).await;
        Ok(videos)
    }

    /// Fetch a channel's videos published after `since`, newest first
    pub async fn get_channel_videos_since(
        &self,
        channel_id: &str,
        since: Option<DateTime<Utc>>,
        max_results: Option<u32>,
    ) -> Result<Vec<VideoInfo>> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            log::debug!("[youtube:client] Empty channel id, skipping");
            return Ok(Vec::new());
        }
        let max = self.effective_max(max_results);

        let since_bucket = since
            .map(|at| minute_bucket(at).to_string())
            .unwrap_or_default();
        let key = cache_key(
            "channel_videos",
            &[
                ("channel", channel_id),
                ("since", since_bucket.as_str()),
                ("max", &max.to_string()),
            ],
        );
        if let Some(hit) = self.search_cache.get(&key).await {
            return Ok(hit);
        }

        let mut params = vec![
            ("part".to_string(), "snippet".to_string()),
            ("channelId".to_string(), channel_id.to_string()),
            ("type".to_string(), "video".to_string()),
            ("order".to_string(), "date".to_string()),
            ("maxResults".to_string(), max.to_string()),
        ];
        if let Some(since) = since {
            params.push((
                "publishedAfter".to_string(),
                since.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }

        let videos = self.search_call(&params).await?;
        self.search_cache.put(key, videos.clone()).await;
        Ok(videos)
    }

    /// One quota-checked, rate-limited `search.list` call
    async fn search_call(&self, params: &[(String, String)]) -> Result<Vec<VideoInfo>> {
        let cost = self
            .quota
            .check_available(OperationType::Search, 0)
            .await?;

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| Error::internal("Rate limiter closed"))?;

        let start = Instant::now();
        let value = match self.transport.get_json("search", params).await {
            Ok(value) => value,
            Err(err) => {
                self.record_failure(OperationType::Search, start, &err).await;
                return Err(err);
            }
        };
        let duration_ms = start.elapsed().as_millis() as i64;

        let parsed: SearchListResponse = match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                let err = Error::MalformedResponse(format!("search.list: {}", err));
                self.record_failure(OperationType::Search, start, &err).await;
                return Err(err);
            }
        };

        let videos: Vec<VideoInfo> = parsed
            .items
            .into_iter()
            .filter_map(video_from_search)
            .collect();
        self.quota
            .record_call(ApiCallRecord::success(
                OperationType::Search,
                cost,
                duration_ms,
                videos.len(),
            ))
            .await;
        Ok(videos)
    }

    // ========================================================================
    // Batch Detail Operations
    // ========================================================================

    /// Fetch full details for a list of video ids
    ///
    /// Ids are deduplicated, served from cache where possible, and fetched
    /// in chunks of up to 50. Chunk failures are tolerated: the call
    /// succeeds with the subset that worked, and only an all-chunks-failed
    /// batch surfaces an error. A quota-exceeded signal abandons the
    /// remaining chunks immediately.
    pub async fn get_video_details_by_ids(&self, ids: &[String]) -> Result<Vec<VideoInfo>> {
        let chunks_input = chunk_ids(ids, MAX_BATCH_SIZE);
        if chunks_input.is_empty() {
            return Ok(Vec::new());
        }

        // Serve what we can from cache, fetch the rest
        let mut videos: Vec<VideoInfo> = Vec::new();
        let mut misses: Vec<String> = Vec::new();
        for id in chunks_input.into_iter().flatten() {
            let key = cache_key("video", &[("id", id.as_str())]);
            match self.details_cache.get(&key).await {
                Some(hit) => videos.push(hit),
                None => misses.push(id),
            }
        }

        let mut outcome = self.fetch_details_chunked(&misses).await;
        let fetched_any = !outcome.videos.is_empty();
        videos.append(&mut outcome.videos);

        if videos.is_empty() && !outcome.any_success() {
            // Nothing from cache and every chunk failed: surface a hard error
            return Err(if outcome.quota_exhausted {
                Error::quota_exceeded("All detail chunks rejected by quota")
            } else {
                Error::network("All detail chunks failed")
            });
        }

        if outcome.failed_chunks > 0 && fetched_any {
            log::warn!(
                "[youtube:client] Partial detail fetch: {} chunks ok, {} failed{}",
                outcome.succeeded_chunks,
                outcome.failed_chunks,
                if outcome.quota_exhausted {
                    " (quota exhausted)"
                } else {
                    ""
                }
            );
        }

        Ok(dedup_videos(videos))
    }

    /// Issue `videos.list` calls for `ids` in API-sized chunks
    async fn fetch_details_chunked(&self, ids: &[String]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for chunk in chunk_ids(ids, MAX_BATCH_SIZE) {
            let cost = match self
                .quota
                .check_available(OperationType::VideoDetails, chunk.len())
                .await
            {
                Ok(cost) => cost,
                Err(err) => {
                    // Local ledger says the budget is gone; abandon the rest.
                    // The denied chunk counts as failed so a batch that never
                    // got off the ground is not mistaken for an empty success.
                    log::warn!("[youtube:client] Abandoning detail batch: {}", err);
                    outcome.failed_chunks += 1;
                    outcome.quota_exhausted = true;
                    break;
                }
            };

            match self.fetch_detail_chunk(&chunk, cost).await {
                Ok(mut chunk_videos) => {
                    outcome.succeeded_chunks += 1;
                    outcome.videos.append(&mut chunk_videos);
                }
                Err(err) => {
                    outcome.failed_chunks += 1;
                    if err.is_quota_exceeded() {
                        // record_failure already raised the hard-stop notice
                        outcome.quota_exhausted = true;
                        break;
                    }
                    // Non-quota chunk failure: keep going with the rest
                    log::warn!("[youtube:client] Detail chunk failed: {}", err);
                }
            }
        }

        outcome
    }

    /// One quota-checked, rate-limited `videos.list` call
    async fn fetch_detail_chunk(&self, chunk: &[String], cost: u64) -> Result<Vec<VideoInfo>> {
        let params = vec![
            (
                "part".to_string(),
                "snippet,contentDetails,statistics".to_string(),
            ),
            ("id".to_string(), chunk.join(",")),
            ("maxResults".to_string(), MAX_BATCH_SIZE.to_string()),
        ];

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| Error::internal("Rate limiter closed"))?;

        let start = Instant::now();
        let value = match self.transport.get_json("videos", &params).await {
            Ok(value) => value,
            Err(err) => {
                self.record_failure(OperationType::VideoDetails, start, &err)
                    .await;
                return Err(err);
            }
        };
        let duration_ms = start.elapsed().as_millis() as i64;

        let parsed: VideoListResponse = match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                let err = Error::MalformedResponse(format!("videos.list: {}", err));
                self.record_failure(OperationType::VideoDetails, start, &err)
                    .await;
                return Err(err);
            }
        };

        let videos: Vec<VideoInfo> = parsed
            .items
            .into_iter()
            .filter_map(video_from_item)
            .collect();

        for video in &videos {
            let key = cache_key("video", &[("id", video.video_id.as_str())]);
            self.details_cache.put(key, video.clone()).await;
        }

        self.quota
            .record_call(ApiCallRecord::success(
                OperationType::VideoDetails,
                cost,
                duration_ms,
                videos.len(),
            ))
            .await;
        Ok(videos)
    }

    // ========================================================================
    // Bulk Channel Updates
    // ========================================================================

    /// Fetch new videos for a set of tracked channels
    ///
    /// Channels rated 1 ("not interested") are skipped entirely. Per-channel
    /// failures are tolerated; a quota-exceeded signal stops the run and the
    /// videos gathered so far are returned. Results are deduplicated across
    /// channels.
    pub async fn get_bulk_channel_updates(
        &self,
        requests: &[ChannelUpdateRequest],
    ) -> Result<Vec<VideoInfo>> {
        let mut videos: Vec<VideoInfo> = Vec::new();
        let mut attempted = 0usize;
        let mut succeeded = 0usize;
        let mut last_error: Option<Error> = None;

        for request in requests {
            if request.is_excluded() {
                log::debug!(
                    "[youtube:client] Skipping channel {} ({}): rated not-interested",
                    request.channel_name,
                    request.channel_id
                );
                continue;
            }

            attempted += 1;
            match self
                .get_channel_videos_since(
                    &request.channel_id,
                    request.last_check_date,
                    Some(request.max_results),
                )
                .await
            {
                Ok(mut channel_videos) => {
                    succeeded += 1;
                    videos.append(&mut channel_videos);
                }
                Err(err) if err.is_quota_exceeded() => {
                    log::warn!(
                        "[youtube:client] Quota exhausted during bulk update at channel {}; \
                         returning partial results",
                        request.channel_name
                    );
                    last_error = Some(err);
                    break;
                }
                Err(err) => {
                    log::warn!(
                        "[youtube:client] Bulk update failed for channel {}: {}",
                        request.channel_name,
                        err
                    );
                    last_error = Some(err);
                }
            }
        }

        if attempted > 0 && succeeded == 0 {
            if let Some(err) = last_error {
                return Err(err);
            }
        }

        Ok(dedup_videos(videos))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn effective_max(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.max_search_results).clamp(1, 50)
    }

    async fn record_failure(&self, operation: OperationType, start: Instant, err: &Error) {
        let duration_ms = start.elapsed().as_millis() as i64;
        self.quota
            .record_call(ApiCallRecord::failure(
                operation,
                0,
                duration_ms,
                err.to_string(),
            ))
            .await;
        if err.is_quota_exceeded() {
            self.quota.notify_quota_exhausted(&err.to_string()).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    enum MockReply {
        Json(Value),
        Quota,
        Network,
    }

    /// Transport that replays scripted responses and records every call
    #[derive(Default)]
    struct MockTransport {
        replies: Mutex<VecDeque<MockReply>>,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl MockTransport {
        fn scripted(replies: Vec<MockReply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        async fn call_count(&self) -> usize {
            self.calls.lock().await.len()
        }
    }

    #[async_trait]
    impl ApiTransport for MockTransport {
        async fn get_json(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value> {
            self.calls
                .lock()
                .await
                .push((endpoint.to_string(), params.to_vec()));
            match self.replies.lock().await.pop_front() {
                Some(MockReply::Json(value)) => Ok(value),
                Some(MockReply::Quota) => Err(Error::quota_exceeded("quotaExceeded")),
                Some(MockReply::Network) => Err(Error::network("connection reset")),
                None => Err(Error::network("no scripted reply")),
            }
        }
    }

    fn settings() -> YouTubeSettings {
        YouTubeSettings {
            api_key: "test-key".to_string(),
            ..Default::default()
        }
    }

    fn client_with(transport: Arc<MockTransport>, settings: &YouTubeSettings) -> YouTubeClient {
        let quota = Arc::new(QuotaManager::new(settings));
        YouTubeClient::with_transport(settings, transport, quota)
    }

    fn search_json(ids: &[&str]) -> Value {
        json!({
            "items": ids.iter().map(|id| json!({
                "id": {"kind": "youtube#video", "videoId": id},
                "snippet": {
                    "title": format!("Video {}", id),
                    "description": "",
                    "channelId": "UC1",
                    "channelTitle": "Channel One",
                    "publishedAt": "2026-08-20T10:00:00Z"
                }
            })).collect::<Vec<_>>()
        })
    }

    fn videos_json(ids: &[String]) -> Value {
        json!({
            "items": ids.iter().map(|id| json!({
                "id": id,
                "snippet": {"title": format!("Video {}", id), "channelId": "UC1"},
                "contentDetails": {"duration": "PT1M"},
                "statistics": {"viewCount": "100"}
            })).collect::<Vec<_>>()
        })
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("vid{:03}", i)).collect()
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let transport = MockTransport::scripted(vec![]);
        let client = client_with(transport.clone(), &settings());

        let result = client.search_videos_by_topic("   ", None, None).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(transport.call_count().await, 0);
        assert_eq!(client.quota().status().await.used_today, 0);
    }

    #[tokio::test]
    async fn test_search_parses_and_charges_quota() {
        let transport = MockTransport::scripted(vec![MockReply::Json(search_json(&["a", "b"]))]);
        let client = client_with(transport.clone(), &settings());

        let videos = client
            .search_videos_by_topic("rust async", None, Some(5))
            .await
            .unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].video_id, "a");

        let status = client.quota().status().await;
        assert_eq!(status.used_today, 100);
    }

    #[tokio::test]
    async fn test_search_cache_suppresses_duplicate_call() {
        let transport = MockTransport::scripted(vec![MockReply::Json(search_json(&["a"]))]);
        let client = client_with(transport.clone(), &settings());

        let first = client
            .search_videos_by_topic("Rust Async", None, None)
            .await
            .unwrap();
        // Case-insensitive match on the normalized query
        let second = client
            .search_videos_by_topic("rust async", None, None)
            .await
            .unwrap();

        assert_eq!(first.len(), second.len());
        assert_eq!(transport.call_count().await, 1);
        // Quota charged only for the real call
        assert_eq!(client.quota().status().await.used_today, 100);
    }

    #[tokio::test]
    async fn test_search_denied_when_quota_insufficient() {
        let transport = MockTransport::scripted(vec![]);
        let settings = YouTubeSettings {
            daily_quota_limit: 50,
            ..settings()
        };
        let client = client_with(transport.clone(), &settings);

        let err = client
            .search_videos_by_topic("rust", None, None)
            .await
            .unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(transport.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_search_network_failure_recorded_not_charged() {
        let transport = MockTransport::scripted(vec![MockReply::Network]);
        let client = client_with(transport.clone(), &settings());

        let err = client
            .search_videos_by_topic("rust", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));

        let quota = client.quota();
        assert_eq!(quota.status().await.used_today, 0);
        let stats = quota.stats().await;
        assert_eq!(stats[0].errors, 1);
    }

    #[tokio::test]
    async fn test_details_empty_ids_short_circuits() {
        let transport = MockTransport::scripted(vec![]);
        let client = client_with(transport.clone(), &settings());

        let result = client.get_video_details_by_ids(&[]).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(transport.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_details_chunks_of_fifty() {
        let all = ids(120);
        let transport = MockTransport::scripted(vec![
            MockReply::Json(videos_json(&all[0..50])),
            MockReply::Json(videos_json(&all[50..100])),
            MockReply::Json(videos_json(&all[100..120])),
        ]);
        let client = client_with(transport.clone(), &settings());

        let videos = client.get_video_details_by_ids(&all).await.unwrap();
        assert_eq!(videos.len(), 120);
        assert_eq!(transport.call_count().await, 3);
        // 3 calls at 1 unit each
        assert_eq!(client.quota().status().await.used_today, 3);
    }

    #[tokio::test]
    async fn test_details_quota_failure_keeps_partial_and_stops() {
        let all = ids(120);
        let transport = MockTransport::scripted(vec![
            MockReply::Json(videos_json(&all[0..50])),
            MockReply::Quota,
        ]);
        let client = client_with(transport.clone(), &settings());

        let videos = client.get_video_details_by_ids(&all).await.unwrap();
        // Only chunk 1's items; chunk 3 is never issued
        assert_eq!(videos.len(), 50);
        assert_eq!(transport.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_details_local_denial_with_nothing_gathered_is_error() {
        let transport = MockTransport::scripted(vec![]);
        let settings = YouTubeSettings {
            daily_quota_limit: 1,
            ..settings()
        };
        let client = client_with(transport.clone(), &settings);

        // Burn the whole day's budget so the ledger denies the first chunk
        client
            .quota()
            .record_call(ApiCallRecord::success(OperationType::VideoDetails, 1, 5, 50))
            .await;

        let err = client.get_video_details_by_ids(&ids(10)).await.unwrap_err();
        assert!(err.is_quota_exceeded());
        // The denied batch never reaches the transport
        assert_eq!(transport.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_details_local_denial_after_success_keeps_partial() {
        let all = ids(100);
        let transport = MockTransport::scripted(vec![MockReply::Json(videos_json(&all[0..50]))]);
        let settings = YouTubeSettings {
            daily_quota_limit: 1,
            ..settings()
        };
        let client = client_with(transport.clone(), &settings);

        // Chunk 1 consumes the single unit; the ledger denies chunk 2
        let videos = client.get_video_details_by_ids(&all).await.unwrap();
        assert_eq!(videos.len(), 50);
        assert_eq!(transport.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_details_non_quota_failure_continues() {
        let all = ids(120);
        let transport = MockTransport::scripted(vec![
            MockReply::Json(videos_json(&all[0..50])),
            MockReply::Network,
            MockReply::Json(videos_json(&all[100..120])),
        ]);
        let client = client_with(transport.clone(), &settings());

        let videos = client.get_video_details_by_ids(&all).await.unwrap();
        assert_eq!(videos.len(), 70);
        assert_eq!(transport.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_details_all_chunks_failed_is_error() {
        let all = ids(120);
        let transport = MockTransport::scripted(vec![
            MockReply::Network,
            MockReply::Network,
            MockReply::Network,
        ]);
        let client = client_with(transport.clone(), &settings());

        let err = client.get_video_details_by_ids(&all).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_details_served_from_cache() {
        let one = vec!["abc123".to_string()];
        let transport = MockTransport::scripted(vec![MockReply::Json(videos_json(&one))]);
        let client = client_with(transport.clone(), &settings());

        let first = client.get_video_details_by_ids(&one).await.unwrap();
        let second = client.get_video_details_by_ids(&one).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(transport.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_bulk_updates_skip_rated_one() {
        let transport = MockTransport::scripted(vec![MockReply::Json(search_json(&["keep"]))]);
        let client = client_with(transport.clone(), &settings());

        let requests = vec![
            ChannelUpdateRequest {
                channel_id: "UCskip".to_string(),
                channel_name: "Skipped".to_string(),
                last_check_date: None,
                max_results: 10,
                user_rating: Some(1),
            },
            ChannelUpdateRequest {
                channel_id: "UCkeep".to_string(),
                channel_name: "Kept".to_string(),
                last_check_date: None,
                max_results: 10,
                user_rating: Some(4),
            },
        ];

        let videos = client.get_bulk_channel_updates(&requests).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "keep");
        // Only the kept channel produced a call
        assert_eq!(transport.call_count().await, 1);
        let (_, params) = &transport.calls.lock().await[0];
        assert!(params
            .iter()
            .any(|(k, v)| k == "channelId" && v == "UCkeep"));
    }

    #[tokio::test]
    async fn test_bulk_updates_quota_stop_returns_partial() {
        let transport = MockTransport::scripted(vec![
            MockReply::Json(search_json(&["a"])),
            MockReply::Quota,
        ]);
        let client = client_with(transport.clone(), &settings());

        let request = |id: &str| ChannelUpdateRequest {
            channel_id: id.to_string(),
            channel_name: id.to_string(),
            last_check_date: None,
            max_results: 10,
            user_rating: None,
        };
        let requests = vec![request("UC1"), request("UC2"), request("UC3")];

        let videos = client.get_bulk_channel_updates(&requests).await.unwrap();
        assert_eq!(videos.len(), 1);
        // Third channel never attempted after the quota signal
        assert_eq!(transport.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_bulk_updates_dedup_across_channels() {
        let transport = MockTransport::scripted(vec![
            MockReply::Json(search_json(&["abc123", "only1"])),
            MockReply::Json(search_json(&["abc123", "only2"])),
        ]);
        let client = client_with(transport.clone(), &settings());

        let request = |id: &str| ChannelUpdateRequest {
            channel_id: id.to_string(),
            channel_name: id.to_string(),
            last_check_date: None,
            max_results: 10,
            user_rating: None,
        };

        let videos = client
            .get_bulk_channel_updates(&[request("UC1"), request("UC2")])
            .await
            .unwrap();
        assert_eq!(videos.len(), 3);
        let dupes = videos.iter().filter(|v| v.video_id == "abc123").count();
        assert_eq!(dupes, 1);
    }

    #[tokio::test]
    async fn test_bulk_updates_all_failed_is_error() {
        let transport = MockTransport::scripted(vec![MockReply::Network, MockReply::Network]);
        let client = client_with(transport.clone(), &settings());

        let request = |id: &str| ChannelUpdateRequest {
            channel_id: id.to_string(),
            channel_name: id.to_string(),
            last_check_date: None,
            max_results: 10,
            user_rating: None,
        };

        let err = client
            .get_bulk_channel_updates(&[request("UC1"), request("UC2")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_api_availability() {
        let transport = MockTransport::scripted(vec![MockReply::Json(search_json(&["a"]))]);
        let client = client_with(transport.clone(), &settings());

        client
            .search_videos_by_topic("rust", None, None)
            .await
            .unwrap();

        let availability = client.get_api_availability().await;
        assert!(availability.is_available);
        assert_eq!(availability.remaining_quota, 10_000 - 100);
        assert!((availability.usage_percentage - 1.0).abs() < f64::EPSILON);
    }
}
