//! Aggregator & Publisher
//!
//! Aggregates every file in the local archive into the hourly series, adds
//! the live token price and conversion rate, and writes the snapshot to the
//! key-value store under the configured key.
//!
//! ```text
//! publish_snapshot
//! publish_snapshot --dry-run
//! ```

use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use rewardscope_config::{CliConfigMerge, Settings};
use rewardscope_core::{aggregate_directory, sort_by_datetime, Snapshot};
use rewardscope_providers::{KvStoreClient, PriceFeed};

#[derive(Parser)]
#[command(
    name = "publish-snapshot",
    about = "Aggregate the hourly archive and publish the reward snapshot",
    version
)]
struct Args {
    /// Configuration file (defaults to ./rewardscope.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the archive directory
    #[arg(long)]
    archive_dir: Option<PathBuf>,

    /// Print the snapshot as JSON instead of writing it to the store
    #[arg(long)]
    dry_run: bool,
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

    // Resolve credentials before doing any work
    let store = if args.dry_run {
        None
    } else {
        Some(KvStoreClient::from_config(&config.store)?)
    };

    let mut records = aggregate_directory(&config.archive.archive_dir)?;
    if config.series.sort_chronologically {
        sort_by_datetime(&mut records);
    }

    info!(
        event_type = "series_aggregated",
        records = records.len(),
        archive_dir = %config.archive.archive_dir.display(),
        "Aggregated hourly archive"
    );

    let quotes = PriceFeed::from_config(&config.prices).fetch_quotes().await?;
    let snapshot = Snapshot::new(
        records,
        quotes.token_price,
        quotes.conversion_rate,
        Local::now().naive_local(),
    );

    match store {
        Some(store) => {
            let reply = store.put_json(&config.store.key, &snapshot).await?;
            info!(
                event_type = "snapshot_published",
                key = %config.store.key,
                http_status = reply.status,
                "KV update result: {}",
                reply.body
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }

    Ok(())
}
