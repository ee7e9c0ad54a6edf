//! Archive aggregation
//!
//! A file becomes one [`HourlyRecord`]; a directory becomes the series of all
//! records in listing order.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use csv::ReaderBuilder;

use crate::accumulator::RewardAccumulator;
use crate::archive::timestamp_from_file_name;
use crate::errors::AggregateError;
use crate::row::{validate_row, RowVerdict};
use crate::types::{HourlyRecord, ProcessorReward};

/// Aggregate delimited content into the ranked per-processor rewards
///
/// The first row is a header and is skipped. Rows rejected by
/// [`validate_row`] and rows that fail to decode are dropped; only I/O
/// failures abort.
pub fn aggregate_reader<R: Read>(reader: R) -> Result<Vec<ProcessorReward>, AggregateError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut accumulator = RewardAccumulator::new();
    for result in reader.records().skip(1) {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(_) => continue,
        };

        if let RowVerdict::Accepted(observation) = validate_row(&record) {
            accumulator.record(&observation);
        }
    }

    Ok(accumulator.into_rewards())
}

pub fn aggregate_file(path: &Path) -> Result<Vec<ProcessorReward>, AggregateError> {
    let file = File::open(path).map_err(|source| AggregateError::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;
    aggregate_reader(file)
}

/// Aggregate every `.csv` file in `dir`
///
/// Each record's timestamp comes from the file name; a name that does not
/// parse gets the current local time instead. Records follow directory
/// listing order, which is platform-dependent. Use [`sort_by_datetime`] when
/// chronological order is required.
pub fn aggregate_directory(dir: &Path) -> Result<Vec<HourlyRecord>, AggregateError> {
    let read_dir_error = |source| AggregateError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut records = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }

        let datetime = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(timestamp_from_file_name)
            .unwrap_or_else(now_local);

        records.push(HourlyRecord {
            datetime,
            processors: aggregate_file(&path)?,
        });
    }

    Ok(records)
}

/// Stable chronological sort
pub fn sort_by_datetime(records: &mut [HourlyRecord]) {
    records.sort_by_key(|record| record.datetime);
}

fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "c0,c1,c2,c3,c4,c5,c6,tier,processor,quantity,c10,c11,c12,rewarded,c14";

    fn data_row(tier: &str, processor: &str, quantity: &str, rewarded: &str) -> String {
        format!("w,a,b,c,d,e,f,{tier},{processor},{quantity},x,y,z,{rewarded},end")
    }

    fn csv_of(rows: &[String]) -> String {
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content.push('\n');
        content
    }

    #[test]
    fn test_two_tier_example() {
        let content = csv_of(&[
            data_row("High Speed", "ModelX", "10", "5"),
            data_row("Ultra High Speed", "ModelX", "4", "4"),
        ]);

        let rewards = aggregate_reader(content.as_bytes()).unwrap();
        assert_eq!(
            rewards,
            vec![ProcessorReward {
                name: "modelx".to_string(),
                reward: 0.75,
            }]
        );
    }

    #[test]
    fn test_header_row_is_skipped() {
        // Header shaped like a valid row must not be counted
        let content = format!(
            "{}\n{}\n",
            data_row("high speed", "ghost", "1", "100"),
            data_row("high speed", "real", "2", "1"),
        );

        let rewards = aggregate_reader(content.as_bytes()).unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].name, "real");
    }

    #[test]
    fn test_non_numeric_quantity_does_not_abort() {
        let content = csv_of(&[
            data_row("high speed", "a", "abc", "5"),
            data_row("high speed", "b", "2", "1"),
        ]);

        let rewards = aggregate_reader(content.as_bytes()).unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].name, "b");
        assert_eq!(rewards[0].reward, 0.5);
    }

    #[test]
    fn test_short_and_unknown_tier_rows_dropped() {
        let content = csv_of(&[
            "only,three,columns".to_string(),
            data_row("low speed", "a", "1", "1"),
            data_row("ultra high speed", "b", "1", "2"),
        ]);

        let rewards = aggregate_reader(content.as_bytes()).unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].name, "b");
    }

    #[test]
    fn test_processor_names_merge_case_insensitively() {
        let content = csv_of(&[
            data_row("high speed", "ModelX", "1", "1"),
            data_row("high speed", "MODELX", "1", "3"),
        ]);

        let rewards = aggregate_reader(content.as_bytes()).unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].reward, 2.0);
    }

    #[test]
    fn test_undecodable_row_is_filtered() {
        let mut content = csv_of(&[data_row("high speed", "ok", "1", "1")]).into_bytes();
        content.extend_from_slice(b"w,a,b,c,d,e,f,high speed,\xff\xfe,1,x,y,z,1,end\n");

        let rewards = aggregate_reader(content.as_slice()).unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].name, "ok");
    }

    #[test]
    fn test_empty_input_yields_no_rewards() {
        assert!(aggregate_reader("".as_bytes()).unwrap().is_empty());
        assert!(aggregate_reader(HEADER.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_sort_by_datetime() {
        let at = |h| {
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let mut records = vec![
            HourlyRecord {
                datetime: at(5),
                processors: vec![],
            },
            HourlyRecord {
                datetime: at(1),
                processors: vec![],
            },
        ];

        sort_by_datetime(&mut records);
        assert_eq!(records[0].datetime, at(1));
        assert_eq!(records[1].datetime, at(5));
    }
}
