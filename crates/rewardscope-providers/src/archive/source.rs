//! Hourly CSV sources

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use rewardscope_config::ArchiveConfig;
use rewardscope_core::ArchiveSlot;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while maintaining the archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The hour could not be fetched (transport failure or non-success status)
    #[error("HTTP error for {slot}: {message}")]
    Http { slot: ArchiveSlot, message: String },

    /// Local archive file could not be written, read or removed
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of raw hourly CSV bodies
///
/// An `Err(ArchiveError::Http { .. })` means the hour is unavailable.
#[async_trait]
pub trait HourlyCsvSource: Send + Sync {
    async fn fetch_hour(&self, slot: &ArchiveSlot) -> Result<Vec<u8>, ArchiveError>;
}

/// Hourly CSV endpoint over HTTP
pub struct HttpCsvSource {
    client: Client,
    config: ArchiveConfig,
}

impl HttpCsvSource {
    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self {
            client: crate::http_client(config.request_timeout_secs),
            config: config.clone(),
        }
    }

    pub fn url_for(&self, slot: &ArchiveSlot) -> String {
        self.config.remote_url(&slot.remote_path())
    }
}

#[async_trait]
impl HourlyCsvSource for HttpCsvSource {
    async fn fetch_hour(&self, slot: &ArchiveSlot) -> Result<Vec<u8>, ArchiveError> {
        let url = self.url_for(slot);

        debug!(
            event_type = "download_start",
            slot = %slot,
            url = %url,
            "Requesting hourly CSV"
        );

        let http_error = |message: String| ArchiveError::Http {
            slot: *slot,
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| http_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(http_error(format!("HTTP {}", response.status())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| http_error(e.to_string()))?;

        Ok(body.to_vec())
    }
}
