//! Remote CSV endpoint and local archive configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Archive fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Base URL of the hourly CSV endpoint; files live under `{base_url}csv/`
    pub base_url: String,

    /// Directory holding the local archive
    pub archive_dir: PathBuf,

    /// Number of hours walked back from the last complete hour
    pub window_hours: u32,

    /// Pause after each download in milliseconds
    pub request_delay_ms: u64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://block-rewards.io.solutions/block-workers/".to_string(),
            archive_dir: PathBuf::from("downloaded_csv"),
            window_hours: 30 * 24,
            request_delay_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl ArchiveConfig {
    /// URL of a remote path relative to the endpoint base
    ///
    /// Tolerates a base URL with or without a trailing slash.
    pub fn remote_url(&self, remote_path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), remote_path)
    }
}
