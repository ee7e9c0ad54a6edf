//! Core reward aggregation
//!
//! Turns hourly worker reward archives into per-processor reward series.
//!
//! ## Pipeline
//!
//! - `row` - Per-row filter (column count, tier, numeric fields, positivity)
//! - `accumulator` - Running reward-per-unit sums keyed by (processor, tier)
//! - `aggregate` - One archive file into one [`HourlyRecord`], a directory into a series
//! - `archive` - Archive slot naming, the backward window and the completeness check
//! - `valuation` - Quote/local currency figures and days-to-ROI for a record
//!
//! ## Combination Rule
//!
//! Each processor has one average per tier. When both tiers have data the
//! combined reward is their plain mean (not weighted by observation count);
//! otherwise it is whichever tier has data. Processors without a positive
//! combined reward are dropped.

pub mod accumulator;
pub mod aggregate;
pub mod archive;
pub mod errors;
pub mod row;
pub mod types;
pub mod valuation;

// Re-export commonly used types
pub use accumulator::{combine_tier_averages, ProcessorTiers, RewardAccumulator, TierStats};
pub use aggregate::{aggregate_directory, aggregate_file, aggregate_reader, sort_by_datetime};
pub use archive::{is_complete_csv, is_file_complete, ArchiveSlot, ARCHIVE_WINDOW_HOURS};
pub use errors::AggregateError;
pub use row::{validate_row, RewardObservation, RowVerdict};
pub use types::{HourlyRecord, ProcessorReward, Snapshot, Tier};
pub use valuation::{latest_record, value_record, ProcessorValuation};
