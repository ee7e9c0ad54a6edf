//! Backward walk over the archive window
//!
//! Starting at the last fully elapsed UTC hour, each hour in the window is
//! either already on disk and complete (skipped, no request), or fetched and
//! written verbatim. Upstream publishes hours contiguously, so the first
//! unavailable or empty hour ends the walk: nothing older exists.
//!
//! | Local file | Remote | Action |
//! |------------|--------|--------|
//! | Complete | - | Skip |
//! | Incomplete | - | Delete, then download |
//! | Absent | Success, non-empty | Write, pause |
//! | Absent | Success, empty | Delete, stop |
//! | Absent | Failure | Stop |

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rewardscope_config::ArchiveConfig;
use rewardscope_core::archive::{is_file_complete, window};
use rewardscope_core::ArchiveSlot;
use tracing::{debug, info, warn};

use super::source::{ArchiveError, HourlyCsvSource};

/// Why the walk ended before the window was exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source could not provide the hour
    Unavailable,
    /// The source returned an empty body
    EmptyFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStop {
    pub slot: ArchiveSlot,
    pub reason: StopReason,
}

/// Outcome of one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Hours written to disk
    pub downloaded: usize,
    /// Complete files left untouched
    pub skipped: usize,
    /// Incomplete files deleted for re-download
    pub replaced: usize,
    /// `None` when every hour in the window was handled
    pub stopped_at: Option<WalkStop>,
}

/// Keeps the local archive in sync with a [`HourlyCsvSource`]
pub struct ArchiveFetcher<S> {
    source: S,
    archive_dir: PathBuf,
    window_hours: u32,
    request_delay: Duration,
}

impl<S: HourlyCsvSource> ArchiveFetcher<S> {
    pub fn new(source: S, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            archive_dir: archive_dir.into(),
            window_hours: rewardscope_core::ARCHIVE_WINDOW_HOURS,
            request_delay: Duration::from_secs(1),
        }
    }

    pub fn from_config(source: S, config: &ArchiveConfig) -> Self {
        Self::new(source, config.archive_dir.clone())
            .with_window_hours(config.window_hours)
            .with_request_delay(Duration::from_millis(config.request_delay_ms))
    }

    pub fn with_window_hours(mut self, hours: u32) -> Self {
        self.window_hours = hours;
        self
    }

    /// Pause after each download
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Walk the window ending at the last complete hour before `now`
    ///
    /// # Errors
    ///
    /// Only local I/O failures are errors. Unavailable or empty hours end the
    /// walk and are reported in [`FetchSummary::stopped_at`].
    pub async fn sync(&self, now: DateTime<Utc>) -> Result<FetchSummary, ArchiveError> {
        fs::create_dir_all(&self.archive_dir).map_err(|source| ArchiveError::Io {
            path: self.archive_dir.clone(),
            source,
        })?;

        let last = ArchiveSlot::last_complete(now);
        let mut summary = FetchSummary::default();

        info!(
            event_type = "archive_sync_start",
            last_slot = %last,
            window_hours = self.window_hours,
            archive_dir = %self.archive_dir.display(),
            "Syncing hourly archive"
        );

        for slot in window(last, self.window_hours) {
            let path = self.archive_dir.join(slot.file_name());

            if path.exists() {
                if is_file_complete(&path) {
                    debug!(event_type = "archive_skip", slot = %slot, "Skipping complete file");
                    summary.skipped += 1;
                    continue;
                }

                warn!(
                    event_type = "archive_incomplete",
                    slot = %slot,
                    "Existing file is incomplete, re-downloading"
                );
                remove(&path)?;
                summary.replaced += 1;
            }

            let body = match self.source.fetch_hour(&slot).await {
                Ok(body) => body,
                Err(ArchiveError::Http { message, .. }) => {
                    info!(
                        event_type = "archive_exhausted",
                        slot = %slot,
                        reason = %message,
                        "No more files available at or before this hour"
                    );
                    summary.stopped_at = Some(WalkStop {
                        slot,
                        reason: StopReason::Unavailable,
                    });
                    break;
                }
                Err(e) => return Err(e),
            };

            fs::write(&path, &body).map_err(|source| ArchiveError::Io {
                path: path.clone(),
                source,
            })?;

            if file_len(&path)? == 0 {
                warn!(
                    event_type = "archive_empty",
                    slot = %slot,
                    "Downloaded file is empty, removing it"
                );
                remove(&path)?;
                summary.stopped_at = Some(WalkStop {
                    slot,
                    reason: StopReason::EmptyFile,
                });
                break;
            }

            info!(
                event_type = "download_complete",
                slot = %slot,
                bytes = body.len(),
                "Downloaded hourly CSV"
            );
            summary.downloaded += 1;

            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        info!(
            event_type = "archive_sync_complete",
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            replaced = summary.replaced,
            stopped_at = ?summary.stopped_at.map(|stop| stop.slot.stem()),
            "Archive sync finished"
        );

        Ok(summary)
    }
}

fn remove(path: &Path) -> Result<(), ArchiveError> {
    fs::remove_file(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_len(path: &Path) -> Result<u64, ArchiveError> {
    fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })
}
