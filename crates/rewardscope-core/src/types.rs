//! Domain types shared by the aggregator, the publisher and the report

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Network connectivity tier of a worker
///
/// Only these two labels take part in aggregation; any other label excludes
/// the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// "high speed"
    HighSpeed,
    /// "ultra high speed"
    UltraHighSpeed,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::HighSpeed, Tier::UltraHighSpeed];

    /// Canonical lowercase label as it appears in archive files
    pub fn label(&self) -> &'static str {
        match self {
            Tier::HighSpeed => "high speed",
            Tier::UltraHighSpeed => "ultra high speed",
        }
    }

    /// Match a raw CSV label, ignoring case
    ///
    /// Surrounding whitespace is significant: " high speed" is not a tier.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "high speed" => Some(Tier::HighSpeed),
            "ultra high speed" => Some(Tier::UltraHighSpeed),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Combined reward-per-unit for one processor model in one hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorReward {
    /// Lowercased processor model
    pub name: String,
    pub reward: f64,
}

/// Aggregate of one archive file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Start of the hour the file covers (ISO 8601, no offset)
    pub datetime: NaiveDateTime,
    /// Sorted by reward, descending
    pub processors: Vec<ProcessorReward>,
}

/// Value written to the remote key-value store
///
/// Field names are fixed by the dashboard that reads the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub processor_data: Vec<HourlyRecord>,
    /// Spot price of the reward token in the quote currency
    pub io_price: f64,
    /// Quote-to-local currency conversion rate
    pub usd_cny_rate: f64,
    pub last_updated: NaiveDateTime,
}

impl Snapshot {
    pub fn new(
        processor_data: Vec<HourlyRecord>,
        io_price: f64,
        usd_cny_rate: f64,
        last_updated: NaiveDateTime,
    ) -> Self {
        Self {
            processor_data,
            io_price,
            usd_cny_rate,
            last_updated,
        }
    }
}
