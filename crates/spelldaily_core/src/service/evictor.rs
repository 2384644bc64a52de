//! Oldest-entry touch for the active daily set.
//!
//! # Responsibility
//! - Push the least recently refreshed entry of a tier/band to the back of
//!   the rotation queue by stamping it with the current time.
//!
//! # Invariants
//! - At most one entry is touched per call.
//! - No entry is deleted or replaced here; expiry is owned elsewhere.
//! - No matching entry is a no-op, not an error.

use crate::clock::Clock;
use crate::model::word::{Difficulty, EntryId, SyllableBand};
use crate::repo::active_set_repo::ActiveSetRepository;
use crate::repo::RepoResult;
use log::info;

/// Result of a successful touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionOutcome {
    pub entry_id: EntryId,
    pub previous_created_at: i64,
    pub new_created_at: i64,
}

/// Touches the oldest matching active entry.
pub struct ActiveSetEvictor<A: ActiveSetRepository, K: Clock> {
    active: A,
    clock: K,
}

impl<A: ActiveSetRepository, K: Clock> ActiveSetEvictor<A, K> {
    pub fn new(active: A, clock: K) -> Self {
        Self { active, clock }
    }

    /// Stamps the oldest entry matching `difficulty` and `band` with now.
    ///
    /// Returns `Ok(None)` when nothing matches. Store failures from either
    /// the lookup or the update are returned unchanged.
    pub fn touch_oldest(
        &self,
        difficulty: Difficulty,
        band: SyllableBand,
    ) -> RepoResult<Option<EvictionOutcome>> {
        let Some(oldest) = self.active.find_oldest(difficulty, band)? else {
            info!(
                "event=evict_touch module=evictor status=noop difficulty={} band={}",
                difficulty, band
            );
            return Ok(None);
        };

        let now = self.clock.now_ms();
        self.active.touch(oldest.id, now)?;
        info!(
            "event=evict_touch module=evictor status=ok difficulty={} band={} entry={} previous_created_at={} created_at={}",
            difficulty, band, oldest.id, oldest.created_at, now
        );

        Ok(Some(EvictionOutcome {
            entry_id: oldest.id,
            previous_created_at: oldest.created_at,
            new_created_at: now,
        }))
    }
}
