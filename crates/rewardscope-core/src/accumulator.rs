//! Reward-per-unit accumulators keyed by (processor, tier)
//!
//! Lives for the duration of one archive file. Processors keep the order in
//! which they were first seen so that ties in the final ranking are
//! deterministic.

use std::collections::HashMap;

use crate::row::RewardObservation;
use crate::types::{ProcessorReward, Tier};

/// Running sum and count for one (processor, tier) pair
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TierStats {
    pub sum: f64,
    pub count: u64,
}

impl TierStats {
    fn record(&mut self, reward_per_unit: f64) {
        self.sum += reward_per_unit;
        self.count += 1;
    }

    /// Mean reward per unit, 0 without observations
    pub fn average(&self) -> f64 {
        if self.count > 0 {
            self.sum / self.count as f64
        } else {
            0.0
        }
    }
}

/// Both tier accumulators of one processor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessorTiers {
    high_speed: TierStats,
    ultra_high_speed: TierStats,
}

impl ProcessorTiers {
    /// Stats for a tier; zero if nothing was recorded
    pub fn tier(&self, tier: Tier) -> TierStats {
        match tier {
            Tier::HighSpeed => self.high_speed,
            Tier::UltraHighSpeed => self.ultra_high_speed,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut TierStats {
        match tier {
            Tier::HighSpeed => &mut self.high_speed,
            Tier::UltraHighSpeed => &mut self.ultra_high_speed,
        }
    }

    pub fn combined_reward(&self) -> f64 {
        combine_tier_averages(
            self.high_speed.average(),
            self.ultra_high_speed.average(),
        )
    }
}

/// Combine the two tier averages into one reward figure
///
/// Plain mean when both are positive, otherwise the larger of the two.
pub fn combine_tier_averages(high_speed: f64, ultra_high_speed: f64) -> f64 {
    if high_speed > 0.0 && ultra_high_speed > 0.0 {
        (high_speed + ultra_high_speed) / 2.0
    } else {
        high_speed.max(ultra_high_speed)
    }
}

/// Per-file accumulator over all processors
#[derive(Debug, Default)]
pub struct RewardAccumulator {
    processors: Vec<(String, ProcessorTiers)>,
    index: HashMap<String, usize>,
}

impl RewardAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, observation: &RewardObservation) {
        let slot = match self.index.get(&observation.processor) {
            Some(&slot) => slot,
            None => {
                self.processors
                    .push((observation.processor.clone(), ProcessorTiers::default()));
                let slot = self.processors.len() - 1;
                self.index.insert(observation.processor.clone(), slot);
                slot
            }
        };

        self.processors[slot]
            .1
            .tier_mut(observation.tier)
            .record(observation.reward_per_unit());
    }

    /// Stats for (processor, tier); zero if never recorded
    pub fn stats(&self, processor: &str, tier: Tier) -> TierStats {
        self.index
            .get(processor)
            .map(|&slot| self.processors[slot].1.tier(tier))
            .unwrap_or_default()
    }

    /// Final ranking: positive, finite combined rewards, descending
    ///
    /// The sort is stable, so equal rewards keep first-seen order.
    pub fn into_rewards(self) -> Vec<ProcessorReward> {
        let mut rewards: Vec<ProcessorReward> = self
            .processors
            .into_iter()
            .filter_map(|(name, tiers)| {
                let reward = tiers.combined_reward();
                let publishable = reward > 0.0 && reward.is_finite();
                publishable.then_some(ProcessorReward { name, reward })
            })
            .collect();

        rewards.sort_by(|a, b| b.reward.total_cmp(&a.reward));
        rewards
    }
}
