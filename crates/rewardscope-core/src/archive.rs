//! Local archive layout
//!
//! One CSV file per (UTC date, hour):
//!
//! ```text
//! Local file:  {YYYY-MM-DD}-{HH}-block-workers.csv
//! Remote path: csv/{YYYY-MM-DD}-{HH}.csv
//! ```
//!
//! The window walks backward from the last fully elapsed hour, 30 days deep.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveDateTime, Timelike, Utc};
use csv::ReaderBuilder;

/// 30 days of hourly files
pub const ARCHIVE_WINDOW_HOURS: u32 = 30 * 24;

/// Descriptive suffix after the date/hour stem
pub const ARCHIVE_FILE_SUFFIX: &str = "-block-workers.csv";

/// Minimum width of the first row for a file to count as complete
pub const MIN_HEADER_COLUMNS: usize = 4;

/// One hour of archive data, addressed by UTC date and hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveSlot {
    date: NaiveDate,
    hour: u32,
}

impl ArchiveSlot {
    /// `None` if `hour` is not 0-23
    pub fn new(date: NaiveDate, hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self { date, hour })
    }

    /// Slot containing the given instant
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            date: instant.date_naive(),
            hour: instant.hour(),
        }
    }

    /// Most recent hour guaranteed complete upstream: `now` truncated to the
    /// hour, minus one hour
    pub fn last_complete(now: DateTime<Utc>) -> Self {
        Self::containing(now - ChronoDuration::hours(1))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Start of the hour
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date
            .and_hms_opt(self.hour, 0, 0)
            .unwrap_or_else(|| self.date.and_time(Default::default()))
    }

    /// Slot `hours` earlier
    pub fn hours_before(&self, hours: u32) -> Self {
        let shifted = self.timestamp() - ChronoDuration::hours(i64::from(hours));
        Self {
            date: shifted.date(),
            hour: shifted.hour(),
        }
    }

    /// `{YYYY-MM-DD}-{HH}`
    pub fn stem(&self) -> String {
        format!("{}-{:02}", self.date.format("%Y-%m-%d"), self.hour)
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.stem(), ARCHIVE_FILE_SUFFIX)
    }

    /// Path relative to the remote endpoint base
    pub fn remote_path(&self) -> String {
        format!("csv/{}.csv", self.stem())
    }

    /// Recover the slot from a file name's `YYYY-MM-DD-HH` prefix
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let datetime = timestamp_from_file_name(file_name)?;
        Self::new(datetime.date(), datetime.hour())
    }
}

impl std::fmt::Display for ArchiveSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.stem())
    }
}

/// Slots from `last` backward, newest first
pub fn window(last: ArchiveSlot, hours: u32) -> impl Iterator<Item = ArchiveSlot> {
    (0..hours).map(move |i| last.hours_before(i))
}

/// Parse the `YYYY-MM-DD-HH` prefix of an archive file name
///
/// The first three `-` separated parts form the date and the fourth the hour;
/// anything after is ignored.
pub fn timestamp_from_file_name(file_name: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = file_name.split('-').collect();
    if parts.len() < 4 {
        return None;
    }

    let date = parts[..3].join("-");
    let hour = parts[3];
    NaiveDateTime::parse_from_str(&format!("{date}T{hour}:00:00"), "%Y-%m-%dT%H:%M:%S").ok()
}

/// Completeness check for delimited content
///
/// Complete means: every row parses, there are at least two rows (header plus
/// one data row), and the first row has at least [`MIN_HEADER_COLUMNS`]
/// columns.
pub fn is_complete_csv<R: Read>(reader: R) -> bool {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = 0usize;
    let mut first_width = 0usize;
    for result in reader.records() {
        let Ok(record) = result else {
            return false;
        };
        if rows == 0 {
            first_width = record.len();
        }
        rows += 1;
    }

    rows > 1 && first_width >= MIN_HEADER_COLUMNS
}

/// [`is_complete_csv`] on a file; unreadable files are incomplete
pub fn is_file_complete(path: &Path) -> bool {
    File::open(path).map(is_complete_csv).unwrap_or(false)
}
