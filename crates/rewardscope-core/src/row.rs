//! Row filter for archive files
//!
//! Every data row is judged by [`validate_row`]. Rejections are not errors:
//! the aggregator drops them and keeps going, but the verdict says why so the
//! decision stays testable.
//!
//! ## Column Layout (0-indexed)
//!
//! | Column | Meaning | Notes |
//! |--------|---------|-------|
//! | 7 | Connectivity tier | Case-insensitive |
//! | 8 | Processor model | Lowercased |
//! | 9 | Quantity | Numeric, > 0 |
//! | 13 | Rewarded amount | Numeric, > 0 |
//!
//! Rows shorter than [`MIN_ROW_COLUMNS`] are rejected before any field is read.

use csv::StringRecord;

use crate::types::Tier;

/// Minimum number of columns for a row to be considered at all
pub const MIN_ROW_COLUMNS: usize = 15;

pub const TIER_COLUMN: usize = 7;
pub const PROCESSOR_COLUMN: usize = 8;
pub const QUANTITY_COLUMN: usize = 9;
pub const REWARDED_COLUMN: usize = 13;

/// A row that passed every filter
#[derive(Debug, Clone, PartialEq)]
pub struct RewardObservation {
    pub processor: String,
    pub tier: Tier,
    pub quantity: f64,
    pub rewarded: f64,
}

impl RewardObservation {
    /// Rewarded amount per unit of quantity
    ///
    /// Quantity is strictly positive for any accepted row.
    pub fn reward_per_unit(&self) -> f64 {
        self.rewarded / self.quantity
    }
}

/// Outcome of [`validate_row`]
#[derive(Debug, Clone, PartialEq)]
pub enum RowVerdict {
    Accepted(RewardObservation),
    TooFewColumns { found: usize },
    UnknownTier,
    NonNumeric,
    NonPositive,
}

impl RowVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RowVerdict::Accepted(_))
    }
}

/// Parse a numeric field; non-finite values count as non-numeric
fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decide whether a data row contributes to aggregation
///
/// Checks run in order: column count, tier membership, numeric parse,
/// positivity, finite ratio. The first failing check determines the verdict.
pub fn validate_row(record: &StringRecord) -> RowVerdict {
    if record.len() < MIN_ROW_COLUMNS {
        return RowVerdict::TooFewColumns {
            found: record.len(),
        };
    }

    // Indices below MIN_ROW_COLUMNS are always present past the length check
    let field = |index: usize| record.get(index).unwrap_or_default();

    let Some(tier) = Tier::from_label(field(TIER_COLUMN)) else {
        return RowVerdict::UnknownTier;
    };

    let (Some(quantity), Some(rewarded)) = (
        parse_amount(field(QUANTITY_COLUMN)),
        parse_amount(field(REWARDED_COLUMN)),
    ) else {
        return RowVerdict::NonNumeric;
    };

    if quantity <= 0.0 || rewarded <= 0.0 {
        return RowVerdict::NonPositive;
    }

    let observation = RewardObservation {
        processor: field(PROCESSOR_COLUMN).to_lowercase(),
        tier,
        quantity,
        rewarded,
    };

    // Finite inputs can still overflow the ratio
    if !observation.reward_per_unit().is_finite() {
        return RowVerdict::NonNumeric;
    }

    RowVerdict::Accepted(observation)
}
