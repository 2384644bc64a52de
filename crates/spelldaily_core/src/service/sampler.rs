//! Word sampling for one schedule entry.
//!
//! # Responsibility
//! - Draw up to `count` eligible catalog words that are not already active.
//! - Signal the evictor when a request cannot be satisfied.
//!
//! # Invariants
//! - Id-pool sampling never draws the same id twice; the pool shrinks by one
//!   per draw, so the loop runs at most `pool.len()` times.
//! - Full-set sampling stops after `FULL_SET_MAX_ATTEMPTS` draws. Rejected
//!   records stay in the working set and may be redrawn.
//! - A short result is a normal outcome, never an error.

use crate::clock::Clock;
use crate::model::schedule::{SamplingStrategy, ScheduleEntry};
use crate::model::word::{CatalogWord, Difficulty, SyllableBand};
use crate::repo::active_set_repo::ActiveSetRepository;
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::RepoResult;
use crate::service::evictor::{ActiveSetEvictor, EvictionOutcome};
use log::{debug, info, warn};
use rand::Rng;

/// Draw budget for full-set sampling.
pub const FULL_SET_MAX_ATTEMPTS: u32 = 50;

/// What happened on the eviction side of a sampling call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvictionSignal {
    /// The request was satisfied (or asked for nothing).
    NotNeeded,
    /// Shortfall, but no active entry matched the filter.
    NoMatchingEntry,
    Touched(EvictionOutcome),
    /// Shortfall and the touch itself failed; the sampled words still stand.
    Failed(String),
}

impl EvictionSignal {
    pub fn was_invoked(&self) -> bool {
        !matches!(self, Self::NotNeeded)
    }
}

/// Words drawn for one request plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub words: Vec<CatalogWord>,
    /// Number of random draws performed.
    pub draws: u32,
    pub eviction: EvictionSignal,
}

/// Sampler over a catalog and an active set.
pub struct WordSampler<C: CatalogRepository, A: ActiveSetRepository, K: Clock> {
    catalog: C,
    active: A,
    clock: K,
}

impl<C: CatalogRepository, A: ActiveSetRepository, K: Clock> WordSampler<C, A, K> {
    pub fn new(catalog: C, active: A, clock: K) -> Self {
        Self {
            catalog,
            active,
            clock,
        }
    }

    /// Runs the strategy named by `entry`.
    pub fn sample<R: Rng + ?Sized>(&self, entry: &ScheduleEntry, rng: &mut R) -> RepoResult<Sample> {
        let count = entry.count as usize;
        match entry.strategy {
            SamplingStrategy::IdPool => self.fetch_random_by_difficulty(entry.difficulty, count, rng),
            SamplingStrategy::FullSet => {
                self.fetch_words(entry.difficulty, count, entry.band(), rng)
            }
        }
    }

    /// Id-pool sampling without replacement.
    ///
    /// The evictor fires only when zero words were accepted; a partial
    /// result is accepted as is.
    pub fn fetch_random_by_difficulty<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        count: usize,
        rng: &mut R,
    ) -> RepoResult<Sample> {
        let mut pool = self.catalog.list_eligible_ids(difficulty)?;
        let pool_size = pool.len();
        let mut words = Vec::with_capacity(count.min(pool_size));
        let mut draws = 0_u32;

        while words.len() < count && !pool.is_empty() {
            let id = pool.swap_remove(rng.gen_range(0..pool.len()));
            draws += 1;

            let Some(word) = self.catalog.get_eligible(id)? else {
                debug!("event=sample_draw module=sampler status=gone id={id}");
                continue;
            };
            if self.active.word_exists(&word.word)? {
                continue;
            }
            words.push(word);
        }

        info!(
            "event=sample_request module=sampler status=ok strategy=id_pool difficulty={} requested={} selected={} pool={} draws={}",
            difficulty,
            count,
            words.len(),
            pool_size,
            draws
        );

        let eviction = if words.is_empty() && count > 0 {
            self.signal_shortfall(difficulty, SyllableBand::ANY, count, 0)
        } else {
            EvictionSignal::NotNeeded
        };

        Ok(Sample {
            words,
            draws,
            eviction,
        })
    }

    /// Full-set sampling with a bounded attempt budget.
    pub fn fetch_words<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        count: usize,
        band: SyllableBand,
        rng: &mut R,
    ) -> RepoResult<Sample> {
        let mut remaining = self.catalog.list_eligible(difficulty, band)?;
        let candidate_count = remaining.len();
        let mut words = Vec::with_capacity(count.min(candidate_count));
        let mut attempts = 0_u32;

        while words.len() < count && attempts < FULL_SET_MAX_ATTEMPTS && !remaining.is_empty() {
            let index = rng.gen_range(0..remaining.len());
            if !self.active.word_exists(&remaining[index].word)? {
                words.push(remaining.swap_remove(index));
            }
            attempts += 1;
        }

        info!(
            "event=sample_request module=sampler status=ok strategy=full_set difficulty={} band={} requested={} selected={} candidates={} draws={}",
            difficulty,
            band,
            count,
            words.len(),
            candidate_count,
            attempts
        );

        let eviction = if words.len() < count {
            self.signal_shortfall(difficulty, band, count, words.len())
        } else {
            EvictionSignal::NotNeeded
        };

        words.truncate(count);
        Ok(Sample {
            words,
            draws: attempts,
            eviction,
        })
    }

    fn signal_shortfall(
        &self,
        difficulty: Difficulty,
        band: SyllableBand,
        requested: usize,
        selected: usize,
    ) -> EvictionSignal {
        warn!(
            "event=sample_shortfall module=sampler status=short difficulty={} band={} requested={} selected={}",
            difficulty, band, requested, selected
        );

        let evictor = ActiveSetEvictor::new(&self.active, &self.clock);
        match evictor.touch_oldest(difficulty, band) {
            Ok(Some(outcome)) => EvictionSignal::Touched(outcome),
            Ok(None) => EvictionSignal::NoMatchingEntry,
            Err(err) => {
                warn!(
                    "event=evict_touch module=sampler status=error difficulty={} band={} error={}",
                    difficulty, band, err
                );
                EvictionSignal::Failed(err.to_string())
            }
        }
    }
}
