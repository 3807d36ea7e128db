//! Archive download.
//!
//! Every failure here is fatal to a certification run and ends in the
//! rejection path; nothing is retried automatically.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::PipelineConfig;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Archive download returned HTTP {0}")]
    Status(u16),

    #[error("Archive download timed out after {0}s")]
    Timeout(u64),

    #[error("Archive download failed: {0}")]
    Transport(String),

    #[error("Archive exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },
}

/// Fetches the raw bytes of a skill archive.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Downloads archives over HTTP(S) with a bounded timeout and body size.
pub struct HttpArchiveFetcher {
    client: Client,
    timeout_secs: u64,
    max_bytes: u64,
}

impl HttpArchiveFetcher {
    pub fn new(config: &PipelineConfig) -> Self {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            timeout_secs: config.fetch_timeout_secs,
            max_bytes: config.archive_max_bytes,
        }
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout_secs)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ArchiveFetcher for HttpArchiveFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes)
        {
            return Err(FetchError::TooLarge {
                limit: self.max_bytes,
            });
        }

        // Content-Length may be absent or wrong; enforce the limit while reading.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.classify(e))? {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(url, bytes = body.len(), "Archive downloaded");
        Ok(body)
    }
}
