//! Remote integrations for rewardscope
//!
//! ## Providers
//!
//! - `archive` - Hourly CSV endpoint and the backward-walking archive fetcher
//! - `prices` - Token ticker price and currency conversion rate
//! - `store` - Key-value store the published snapshot is written to
//!
//! ## Design Principles
//!
//! 1. **Sequential**: one request at a time, no concurrency
//! 2. **Stop on gap**: an unavailable hour ends the archive walk
//! 3. **Fire-and-forget publish**: the store response is logged, not retried
//! 4. **Seams for tests**: the fetcher reads through [`archive::HourlyCsvSource`]

pub mod archive;
pub mod prices;
pub mod store;

pub use archive::{
    ArchiveError, ArchiveFetcher, FetchSummary, HourlyCsvSource, HttpCsvSource, StopReason,
    WalkStop,
};
pub use prices::{MarketQuotes, PriceError, PriceFeed};
pub use store::{KvCredentials, KvStoreClient, StoreError, StoreResponse};

use std::time::Duration;

/// HTTP client with a request timeout
///
/// Falls back to the default client if the builder fails.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
