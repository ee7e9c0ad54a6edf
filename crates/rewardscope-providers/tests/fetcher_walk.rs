//! Archive fetcher walk behaviour against a scripted in-memory source

use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rewardscope_core::ArchiveSlot;
use rewardscope_providers::{
    ArchiveError, ArchiveFetcher, FetchSummary, HourlyCsvSource, StopReason, WalkStop,
};
use tempfile::tempdir;

const COMPLETE_CSV: &str = "a,b,c,d\n1,2,3,4\n";

/// Serves bodies by slot stem; unknown stems answer 404
#[derive(Default)]
struct ScriptedSource {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn serve(mut self, stem: &str, body: &str) -> Self {
        self.bodies.insert(stem.to_string(), body.as_bytes().to_vec());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HourlyCsvSource for ScriptedSource {
    async fn fetch_hour(&self, slot: &ArchiveSlot) -> Result<Vec<u8>, ArchiveError> {
        self.requests.lock().unwrap().push(slot.stem());
        self.bodies
            .get(&slot.stem())
            .cloned()
            .ok_or_else(|| ArchiveError::Http {
                slot: *slot,
                message: "HTTP 404 Not Found".to_string(),
            })
    }
}

/// 2024-01-01 03:20 UTC, so the last complete hour is 02:00
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 3, 20, 0).unwrap()
}

fn fetcher(source: ScriptedSource, dir: &std::path::Path) -> ArchiveFetcher<ScriptedSource> {
    ArchiveFetcher::new(source, dir)
        .with_window_hours(6)
        .with_request_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_walk_downloads_until_first_gap() {
    let dir = tempdir().unwrap();
    let source = ScriptedSource::default()
        .serve("2024-01-01-02", COMPLETE_CSV)
        .serve("2024-01-01-01", COMPLETE_CSV)
        // 00 missing, 2023-12-31-23 present but must never be requested
        .serve("2023-12-31-23", COMPLETE_CSV);

    let fetcher = fetcher(source, dir.path());
    let summary = fetcher.sync(now()).await.unwrap();

    assert_eq!(summary.downloaded, 2);
    assert_eq!(
        summary.stopped_at.map(|s| (s.slot.stem(), s.reason)),
        Some(("2024-01-01-00".to_string(), StopReason::Unavailable))
    );
    assert_eq!(
        fetcher.source().requests(),
        vec!["2024-01-01-02", "2024-01-01-01", "2024-01-01-00"]
    );
    assert!(dir.path().join("2024-01-01-02-block-workers.csv").exists());
    assert!(dir.path().join("2024-01-01-01-block-workers.csv").exists());
    assert!(!dir.path().join("2023-12-31-23-block-workers.csv").exists());
}

#[tokio::test]
async fn test_body_written_verbatim() {
    let dir = tempdir().unwrap();
    let body = "h1,h2,h3,h4\r\n\"quoted, field\",2,3,4\r\n";
    let source = ScriptedSource::default().serve("2024-01-01-02", body);

    fetcher(source, dir.path()).sync(now()).await.unwrap();

    let written = fs::read(dir.path().join("2024-01-01-02-block-workers.csv")).unwrap();
    assert_eq!(written, body.as_bytes());
}

#[tokio::test]
async fn test_complete_archive_issues_no_requests() {
    let dir = tempdir().unwrap();
    let mut stems = Vec::new();
    let mut source = ScriptedSource::default();
    for hour in (0..=2).rev() {
        stems.push(format!("2024-01-01-{hour:02}"));
    }
    stems.extend(["2023-12-31-23", "2023-12-31-22", "2023-12-31-21"].map(String::from));
    for stem in &stems {
        source = source.serve(stem, COMPLETE_CSV);
    }

    let first = fetcher(source, dir.path());
    let summary = first.sync(now()).await.unwrap();
    assert_eq!(summary.downloaded, 6);
    assert!(summary.stopped_at.is_none());

    let before: Vec<Vec<u8>> = stems
        .iter()
        .map(|s| fs::read(dir.path().join(format!("{s}-block-workers.csv"))).unwrap())
        .collect();

    // Second run: a source that would fail every request
    let second = fetcher(ScriptedSource::default(), dir.path());
    let summary = second.sync(now()).await.unwrap();

    assert_eq!(
        summary,
        FetchSummary {
            downloaded: 0,
            skipped: 6,
            replaced: 0,
            stopped_at: None,
        }
    );
    assert!(second.source().requests().is_empty());

    let after: Vec<Vec<u8>> = stems
        .iter()
        .map(|s| fs::read(dir.path().join(format!("{s}-block-workers.csv"))).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_incomplete_file_is_replaced() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("2024-01-01-02-block-workers.csv");
    fs::write(&path, "header,only,row,here\n").unwrap();

    let source = ScriptedSource::default().serve("2024-01-01-02", COMPLETE_CSV);
    let summary = fetcher(source, dir.path()).sync(now()).await.unwrap();

    assert_eq!(summary.replaced, 1);
    assert_eq!(summary.downloaded, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), COMPLETE_CSV);
}

#[tokio::test]
async fn test_incomplete_file_removed_even_when_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("2024-01-01-02-block-workers.csv");
    fs::write(&path, "a,b,c\n1,2,3\n").unwrap();

    let summary = fetcher(ScriptedSource::default(), dir.path())
        .sync(now())
        .await
        .unwrap();

    assert_eq!(summary.replaced, 1);
    assert_eq!(summary.downloaded, 0);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_empty_body_stops_walk_and_is_discarded() {
    let dir = tempdir().unwrap();
    let source = ScriptedSource::default()
        .serve("2024-01-01-02", COMPLETE_CSV)
        .serve("2024-01-01-01", "")
        .serve("2024-01-01-00", COMPLETE_CSV);

    let fetcher = fetcher(source, dir.path());
    let summary = fetcher.sync(now()).await.unwrap();

    assert_eq!(summary.downloaded, 1);
    assert_eq!(
        summary.stopped_at,
        Some(WalkStop {
            slot: ArchiveSlot::from_file_name("2024-01-01-01-block-workers.csv").unwrap(),
            reason: StopReason::EmptyFile,
        })
    );
    assert!(!dir.path().join("2024-01-01-01-block-workers.csv").exists());
    assert_eq!(fetcher.source().requests().len(), 2);
}

#[tokio::test]
async fn test_skips_then_resumes_downloading_older_hours() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("2024-01-01-02-block-workers.csv"), COMPLETE_CSV).unwrap();

    let source = ScriptedSource::default().serve("2024-01-01-01", COMPLETE_CSV);
    let fetcher = fetcher(source, dir.path());
    let summary = fetcher.sync(now()).await.unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.downloaded, 1);
    assert_eq!(
        fetcher.source().requests(),
        vec!["2024-01-01-01", "2024-01-01-00"]
    );
}

#[tokio::test]
async fn test_creates_missing_archive_dir() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("archive").join("hourly");

    fetcher(ScriptedSource::default(), &nested)
        .sync(now())
        .await
        .unwrap();

    assert!(nested.is_dir());
}

#[tokio::test(start_paused = true)]
async fn test_pauses_after_each_download() {
    let dir = tempdir().unwrap();
    let source = ScriptedSource::default()
        .serve("2024-01-01-02", COMPLETE_CSV)
        .serve("2024-01-01-01", COMPLETE_CSV);

    let started = tokio::time::Instant::now();
    ArchiveFetcher::new(source, dir.path())
        .with_window_hours(6)
        .sync(now())
        .await
        .unwrap();

    // Default one-second pause after each of the two downloads
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(3));
}
