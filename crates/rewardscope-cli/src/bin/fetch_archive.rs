//! Archive Fetcher
//!
//! Walks backward from the last complete UTC hour over the archive window and
//! downloads every hourly CSV not already present and complete. The first
//! unavailable hour ends the run.
//!
//! ```text
//! fetch_archive
//! fetch_archive --config ./rewardscope.toml --archive-dir /var/lib/rewardscope
//! ```

use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use rewardscope_config::{CliConfigMerge, Settings};
use rewardscope_providers::{ArchiveFetcher, HttpCsvSource};

#[derive(Parser)]
#[command(
    name = "fetch-archive",
    about = "Sync the rolling 30-day hourly reward archive",
    version
)]
struct Args {
    /// Configuration file (defaults to ./rewardscope.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the archive directory
    #[arg(long)]
    archive_dir: Option<PathBuf>,
}

impl CliConfigMerge for Args {
    fn merge_into_config(&self, config: &mut Settings) {
        if let Some(dir) = &self.archive_dir {
            config.archive.archive_dir = dir.clone();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Settings::load_optional(args.config.as_deref())?.merge_cli_args(&args);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.app.log_level.as_directive().into()),
        )
        .init();

    let source = HttpCsvSource::from_config(&config.archive);
    let fetcher = ArchiveFetcher::from_config(source, &config.archive);
    let summary = fetcher.sync(Utc::now()).await?;

    info!(
        event_type = "fetch_archive_done",
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        replaced = summary.replaced,
        stopped_at = ?summary.stopped_at.map(|stop| stop.slot.stem()),
        "Archive fetch finished"
    );

    Ok(())
}
