//! Services module

pub mod quota;
pub mod youtube;

pub use quota::{
    ApiAvailability, ApiCallRecord, CallStats, OperationType, QuotaCostEstimate, QuotaManager,
    QuotaStatus,
};
pub use youtube::{ChannelUpdateRequest, VideoInfo, YouTubeClient};
