//! YouTube Data API module
//!
//! Everything that talks to the YouTube Data API v3 lives here. The
//! [`YouTubeClient`] is the only entry point features use; it layers the
//! quota pipeline, response caching and rate limiting over the raw
//! [`transport::ApiTransport`].
//!
//! ```text
//! feature code
//!     └── YouTubeClient
//!           ├── QuotaManager     (admission + accounting, services::quota)
//!           ├── ResponseCache    (TTL'd search + detail caches)
//!           ├── Semaphore        (bounded concurrent requests)
//!           └── ApiTransport     (reqwest in production, mocks in tests)
//! ```

pub mod batch;
pub mod cache;
pub mod client;
pub mod transport;
pub mod types;

// Re-export main types
pub use types::{ChannelUpdateRequest, VideoInfo};

// Re-export components
pub use batch::{chunk_ids, dedup_videos, BatchOutcome};
pub use cache::{cache_key, minute_bucket, ResponseCache};
pub use client::YouTubeClient;
pub use transport::{ApiTransport, HttpTransport};
