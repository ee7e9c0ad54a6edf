//! Reward report
//!
//! Prints the latest hour's per-processor rewards in token, quote and local
//! currency, and optionally the payback period for a purchase price.
//!
//! ```text
//! reward_report
//! reward_report --processor "nvidia a100" --purchase-price 25000
//! ```

use clap::Parser;
use std::path::PathBuf;

use rewardscope_config::{CliConfigMerge, Settings};
use rewardscope_core::{aggregate_directory, latest_record, value_record, ProcessorValuation};
use rewardscope_providers::PriceFeed;

#[derive(Parser)]
#[command(
    name = "reward-report",
    about = "Latest hourly processor rewards with currency conversion and ROI",
    version
)]
struct Args {
    /// Configuration file (defaults to ./rewardscope.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the archive directory
    #[arg(long)]
    archive_dir: Option<PathBuf>,

    /// Processor to compute the payback period for (case-insensitive)
    #[arg(short, long, requires = "purchase_price")]
    processor: Option<String>,

    /// Purchase price in local currency
    #[arg(long, requires = "processor")]
    purchase_price: Option<f64>,
}

impl CliConfigMerge for Args {
    fn merge_into_config(&self, config: &mut Settings) {
        if let Some(dir) = &self.archive_dir {
            config.archive.archive_dir = dir.clone();
        }
    }
}

fn print_table(valuations: &[ProcessorValuation], symbol: &str, currency: &str) {
    println!(
        "{:<32} {:>14} {:>14} {:>14}",
        "PROCESSOR", "REWARD/H", symbol, currency
    );
    println!("{}", "-".repeat(77));
    for v in valuations {
        println!(
            "{:<32} {:>14.6} {:>14.2} {:>14.2}",
            v.name, v.reward, v.quote_reward, v.local_reward
        );
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
        .with_writer(std::io::stderr)
        .init();

    let records = aggregate_directory(&config.archive.archive_dir)?;
    let Some(latest) = latest_record(&records) else {
        return Err(format!(
            "No archive files in {}",
            config.archive.archive_dir.display()
        )
        .into());
    };

    let quotes = PriceFeed::from_config(&config.prices).fetch_quotes().await?;
    let valuations = value_record(latest, quotes.token_price, quotes.conversion_rate);

    println!("Hour: {}", latest.datetime);
    println!(
        "{}: {:.4}   {}: {:.4}",
        config.prices.ticker_symbol,
        quotes.token_price,
        config.prices.rate_currency,
        quotes.conversion_rate
    );
    println!();
    print_table(
        &valuations,
        &config.prices.ticker_symbol,
        &config.prices.rate_currency,
    );

    if let (Some(processor), Some(purchase_price)) = (&args.processor, args.purchase_price) {
        let wanted = processor.to_lowercase();
        let Some(valuation) = valuations.iter().find(|v| v.name == wanted) else {
            return Err(format!("Processor '{}' not found in the latest hour", processor).into());
        };

        println!();
        match valuation.days_to_roi(purchase_price) {
            Some(days) => println!(
                "Payback for {} at {:.2} {}: {:.2} days",
                valuation.name, purchase_price, config.prices.rate_currency, days
            ),
            None => println!("Payback for {}: no positive daily reward", valuation.name),
        }
    }

    Ok(())
}
