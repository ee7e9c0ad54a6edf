//! Hourly archive provider
//!
//! ## Architecture
//!
//! - `source` - Where hourly CSV bodies come from ([`HttpCsvSource`] in production)
//! - `fetcher` - Backward walk over the archive window, persisting each hour
//!
//! ## URL Pattern
//!
//! ```text
//! {base_url}/csv/{YYYY-MM-DD}-{HH}.csv
//! ```

pub mod fetcher;
pub mod source;

pub use fetcher::{ArchiveFetcher, FetchSummary, StopReason, WalkStop};
pub use source::{ArchiveError, HourlyCsvSource, HttpCsvSource};
