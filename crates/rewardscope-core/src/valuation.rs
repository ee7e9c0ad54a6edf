//! Reward valuation in quote and local currency
//!
//! Rewards are hourly, in reward-token units per processor. With the token's
//! quote price and a quote-to-local conversion rate they convert to money;
//! a purchase price in local currency then gives a payback period.

use crate::types::{HourlyRecord, ProcessorReward};

const HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorValuation {
    pub name: String,
    /// Token units per hour
    pub reward: f64,
    /// Quote currency per hour
    pub quote_reward: f64,
    /// Local currency per hour
    pub local_reward: f64,
}

impl ProcessorValuation {
    pub fn new(processor: &ProcessorReward, token_price: f64, conversion_rate: f64) -> Self {
        let quote_reward = processor.reward * token_price;
        Self {
            name: processor.name.clone(),
            reward: processor.reward,
            quote_reward,
            local_reward: quote_reward * conversion_rate,
        }
    }

    pub fn daily_local_reward(&self) -> f64 {
        self.local_reward * HOURS_PER_DAY
    }

    /// Days until `purchase_price` (local currency) is earned back
    ///
    /// `None` when the daily reward is not positive.
    pub fn days_to_roi(&self, purchase_price: f64) -> Option<f64> {
        let daily = self.daily_local_reward();
        (daily > 0.0 && daily.is_finite()).then(|| purchase_price / daily)
    }
}

/// Value every processor of one record, keeping the record's ranking
pub fn value_record(
    record: &HourlyRecord,
    token_price: f64,
    conversion_rate: f64,
) -> Vec<ProcessorValuation> {
    record
        .processors
        .iter()
        .map(|p| ProcessorValuation::new(p, token_price, conversion_rate))
        .collect()
}

/// Record with the latest timestamp
///
/// Independent of series order. On equal timestamps the later record wins.
pub fn latest_record(records: &[HourlyRecord]) -> Option<&HourlyRecord> {
    records.iter().max_by_key(|record| record.datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(hour: u32, processors: &[(&str, f64)]) -> HourlyRecord {
        HourlyRecord {
            datetime: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            processors: processors
                .iter()
                .map(|(name, reward)| ProcessorReward {
                    name: name.to_string(),
                    reward: *reward,
                })
                .collect(),
        }
    }

    #[test]
    fn test_valuation_figures() {
        let valuation = ProcessorValuation::new(
            &ProcessorReward {
                name: "modelx".to_string(),
                reward: 2.0,
            },
            1.5,
            7.0,
        );

        assert_eq!(valuation.quote_reward, 3.0);
        assert_eq!(valuation.local_reward, 21.0);
        assert_eq!(valuation.daily_local_reward(), 504.0);
        assert_eq!(valuation.days_to_roi(1008.0), Some(2.0));
    }

    #[test]
    fn test_days_to_roi_without_reward() {
        let valuation = ProcessorValuation::new(
            &ProcessorReward {
                name: "idle".to_string(),
                reward: 1.0,
            },
            0.0,
            7.0,
        );
        assert_eq!(valuation.days_to_roi(100.0), None);
    }

    #[test]
    fn test_value_record_keeps_order() {
        let rec = record(3, &[("a", 3.0), ("b", 1.0)]);
        let names: Vec<_> = value_record(&rec, 1.0, 1.0)
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_latest_record_ignores_series_order() {
        let series = vec![record(9, &[("late", 1.0)]), record(2, &[("early", 1.0)])];
        let latest = latest_record(&series).unwrap();
        assert_eq!(latest.processors[0].name, "late");

        assert!(latest_record(&[]).is_none());
    }
}
