//! HTTP transport for the YouTube Data API
//!
//! The [`ApiTransport`] trait is the seam between the client's quota/cache
//! pipeline and the network. Production uses [`HttpTransport`] (reqwest);
//! tests script responses through a mock implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::YouTubeSettings;
use crate::error::{Error, Result};

use super::types::ApiErrorEnvelope;

// ============================================================================
// Constants
// ============================================================================

/// YouTube Data API v3 base URL
const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum characters of a malformed response body to include in logs
const MAX_LOGGED_BODY_CHARS: usize = 500;

// ============================================================================
// Transport Trait
// ============================================================================

/// Executes one raw API request
///
/// Implementations own authentication and HTTP concerns; callers own quota
/// accounting, caching and rate limiting.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue a GET against `endpoint` (e.g. `"search"`) with query params
    /// and return the parsed JSON body
    async fn get_json(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value>;
}

// ============================================================================
// HTTP Transport
// ============================================================================

/// reqwest-backed transport authenticated with an API key
pub struct HttpTransport {
    client: Client,
    api_key: String,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport from settings
    ///
    /// Fails when no API key is configured; everything downstream would just
    /// produce 403s.
    pub fn new(settings: &YouTubeSettings) -> Result<Self> {
        if !settings.has_api_key() {
            return Err(Error::config(
                "No YouTube API key configured (set VIDTRACK_API_KEY or api_key in config.json)",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Override the base URL
    ///
    /// Useful for testing against a local server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Map a non-success response to the error taxonomy
    ///
    /// The v3 error envelope carries reason strings; `quotaExceeded` and
    /// friends become [`Error::QuotaExceeded`] regardless of HTTP status.
    fn classify_error(status: u16, body: &str) -> Error {
        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
            if let Some(error) = envelope.error {
                let quota_reason = error.is_quota_reason();
                let message = error
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", status));
                if quota_reason || status == 403 {
                    return Error::quota_exceeded(message);
                }
                return Error::Api(format!("HTTP {}: {}", status, message));
            }
        }
        // Unparseable error body; fall back to status-based classification
        if status == 403 || status == 429 {
            Error::quota_exceeded(format!("HTTP {}", status))
        } else {
            Error::Api(format!("HTTP {}", status))
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get_json(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("[youtube:http] GET {} ({} params)", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&status) {
            let err = Self::classify_error(status, &body);
            log::warn!("[youtube:http] {} returned {}: {}", endpoint, status, err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            let truncated: String = body.chars().take(MAX_LOGGED_BODY_CHARS).collect();
            log::error!(
                "[youtube:http] Malformed response from {}: {} (body: {})",
                endpoint,
                e,
                truncated
            );
            Error::MalformedResponse(format!("{} returned unparseable JSON: {}", endpoint, e))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
