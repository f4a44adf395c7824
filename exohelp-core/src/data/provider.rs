//! Table source trait and structured error types.
//!
//! The `TableSource` trait abstracts over where raw table text comes from (the
//! archive over HTTP, or a fixture in tests). The snapshot cache sits above
//! this trait; sources don't know about the cache.

use super::schema::SchemaError;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("download failed: HTTP {status} from {url}")]
    Download { url: String, status: u16 },

    #[error("transport error fetching {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("cache error: {0}")]
    Cache(String),
}

/// Something that can return the raw text body behind a URL.
pub trait TableSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the body at `url`. Non-success responses are errors.
    fn fetch(&self, url: &str) -> Result<String, DataError>;
}

/// Blocking HTTP source with a fixed request timeout and no retries.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl TableSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, url: &str) -> Result<String, DataError> {
        debug!(url, "sending request");
        let resp = self.client.get(url).send().map_err(|e| DataError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "archive returned an error status");
            return Err(DataError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|e| DataError::Transport {
            url: url.to_string(),
            reason: format!("failed to read body: {e}"),
        })?;
        info!(url, bytes = body.len(), "download complete");
        Ok(body)
    }
}
