//! Declarative rotation schedule.
//!
//! # Responsibility
//! - Describe one sampling request per tier/band as data.
//! - Provide the default daily schedule.
//!
//! # Invariants
//! - `syllable_min <= syllable_max` when both are set.
//! - `IdPool` entries carry no syllable band; the id pool is per tier only.

use crate::model::word::{Difficulty, SyllableBand};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How candidates are drawn for one schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Shrinking id pool, one record lookup per draw.
    IdPool,
    /// Full record set sampled in memory with a bounded attempt budget.
    FullSet,
}

impl SamplingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IdPool => "id_pool",
            Self::FullSet => "full_set",
        }
    }
}

/// One tier/band request of the daily rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllable_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllable_max: Option<u32>,
    pub count: u32,
    pub strategy: SamplingStrategy,
}

impl ScheduleEntry {
    pub fn id_pool(difficulty: Difficulty, count: u32) -> Self {
        Self {
            difficulty,
            syllable_min: None,
            syllable_max: None,
            count,
            strategy: SamplingStrategy::IdPool,
        }
    }

    pub fn full_set(difficulty: Difficulty, band: SyllableBand, count: u32) -> Self {
        Self {
            difficulty,
            syllable_min: band.min,
            syllable_max: band.max,
            count,
            strategy: SamplingStrategy::FullSet,
        }
    }

    pub fn band(&self) -> SyllableBand {
        SyllableBand {
            min: self.syllable_min,
            max: self.syllable_max,
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if let (Some(min), Some(max)) = (self.syllable_min, self.syllable_max) {
            if min > max {
                return Err(ScheduleError::InvertedBand { min, max });
            }
        }
        if self.strategy == SamplingStrategy::IdPool && !self.band().is_unbounded() {
            return Err(ScheduleError::BandOnIdPool(self.difficulty));
        }
        Ok(())
    }
}

/// Invalid schedule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    InvertedBand { min: u32, max: u32 },
    BandOnIdPool(Difficulty),
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvertedBand { min, max } => {
                write!(f, "syllable_min ({min}) must be <= syllable_max ({max})")
            }
            Self::BandOnIdPool(difficulty) => write!(
                f,
                "id_pool entry for `{difficulty}` cannot carry a syllable band; use full_set"
            ),
        }
    }
}

impl Error for ScheduleError {}

/// The daily rotation: 2 easy, 3 medium, 5 difficult across three bands.
pub fn default_schedule() -> Vec<ScheduleEntry> {
    vec![
        ScheduleEntry::id_pool(Difficulty::Easy, 2),
        ScheduleEntry::id_pool(Difficulty::Medium, 3),
        ScheduleEntry::full_set(Difficulty::Difficult, SyllableBand::between(1, 2), 2),
        ScheduleEntry::full_set(Difficulty::Difficult, SyllableBand::between(3, 4), 2),
        ScheduleEntry::full_set(Difficulty::Difficult, SyllableBand::between(5, 10), 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_schedule, SamplingStrategy, ScheduleEntry, ScheduleError};
    use crate::model::word::{Difficulty, SyllableBand};

    #[test]
    fn default_schedule_is_valid_and_totals_ten_words() {
        let schedule = default_schedule();
        assert!(schedule.iter().all(|entry| entry.validate().is_ok()));
        assert_eq!(schedule.iter().map(|entry| entry.count).sum::<u32>(), 10);
        assert_eq!(schedule[0].strategy, SamplingStrategy::IdPool);
        assert_eq!(schedule[4].band(), SyllableBand::between(5, 10));
    }

    #[test]
    fn validate_rejects_inverted_band() {
        let entry = ScheduleEntry::full_set(Difficulty::Difficult, SyllableBand::between(4, 3), 1);
        assert_eq!(
            entry.validate(),
            Err(ScheduleError::InvertedBand { min: 4, max: 3 })
        );
    }

    #[test]
    fn validate_rejects_band_on_id_pool() {
        let mut entry = ScheduleEntry::id_pool(Difficulty::Easy, 2);
        entry.syllable_max = Some(2);
        assert_eq!(
            entry.validate(),
            Err(ScheduleError::BandOnIdPool(Difficulty::Easy))
        );
    }
}
