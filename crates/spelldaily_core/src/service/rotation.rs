//! Daily rotation job.
//!
//! # Responsibility
//! - Run the sampler over every schedule entry in order.
//! - Insert every selected word into the active set with a fresh timestamp.
//!
//! # Invariants
//! - Insertion order is schedule order, then draw order within an entry.
//! - A store failure on one entry is logged and the job moves on to the next
//!   entry; words already drawn for the failed entry are dropped.
//! - Inserts are not transactional across the batch; a failed insert drops
//!   that word only.
//! - `run` itself never fails; callers inspect the report.

use crate::clock::{Clock, SystemClock};
use crate::model::schedule::ScheduleEntry;
use crate::model::word::{ActiveEntry, CatalogWord};
use crate::repo::active_set_repo::{ActiveSetRepository, InsertOutcome, SqliteActiveSetRepository};
use crate::repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
use crate::repo::RepoResult;
use crate::service::sampler::{EvictionSignal, WordSampler};
use log::{error, info, warn};
use rand::Rng;
use rusqlite::Connection;
use std::time::Instant;

/// Per-entry outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Fulfilled,
    /// Fewer words than requested were available.
    Short,
    /// A store call failed; nothing from this entry was inserted.
    StoreFailed(String),
}

/// Report line for one schedule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestReport {
    pub entry: ScheduleEntry,
    pub selected: usize,
    pub status: RequestStatus,
    pub eviction: EvictionSignal,
}

/// Summary of one job run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    pub requests: Vec<RequestReport>,
    /// Words written to the active set, in insertion order.
    pub inserted: Vec<String>,
    /// Words skipped because they were already active at insert time.
    pub duplicates: Vec<String>,
    /// Words whose insert failed with a store error.
    pub failed_inserts: Vec<String>,
}

impl RotationReport {
    /// Total words requested across the schedule.
    pub fn requested(&self) -> usize {
        self.requests
            .iter()
            .map(|request| request.entry.count as usize)
            .sum()
    }

    /// Whether every entry was fulfilled and every selected word inserted.
    pub fn is_complete(&self) -> bool {
        self.inserted.len() == self.requested()
    }
}

/// Orchestrates sampling and write-back for a schedule.
pub struct RotationJob<C: CatalogRepository, A: ActiveSetRepository, K: Clock> {
    catalog: C,
    active: A,
    clock: K,
}

impl<C: CatalogRepository, A: ActiveSetRepository, K: Clock> RotationJob<C, A, K> {
    pub fn new(catalog: C, active: A, clock: K) -> Self {
        Self {
            catalog,
            active,
            clock,
        }
    }

    /// Runs one rotation over `schedule`.
    pub fn run<R: Rng + ?Sized>(&self, schedule: &[ScheduleEntry], rng: &mut R) -> RotationReport {
        let started_at = Instant::now();
        let sampler = WordSampler::new(&self.catalog, &self.active, &self.clock);
        let mut report = RotationReport::default();
        let mut selected: Vec<CatalogWord> = Vec::new();

        for (index, entry) in schedule.iter().enumerate() {
            match sampler.sample(entry, rng) {
                Ok(sample) => {
                    let status = if sample.words.len() < entry.count as usize {
                        RequestStatus::Short
                    } else {
                        RequestStatus::Fulfilled
                    };
                    info!(
                        "event=rotation_request module=rotation status={} index={} difficulty={} band={} requested={} selected={}",
                        status_label(&status),
                        index,
                        entry.difficulty,
                        entry.band(),
                        entry.count,
                        sample.words.len()
                    );
                    report.requests.push(RequestReport {
                        entry: *entry,
                        selected: sample.words.len(),
                        status,
                        eviction: sample.eviction,
                    });
                    selected.extend(sample.words);
                }
                Err(err) => {
                    error!(
                        "event=rotation_request module=rotation status=store_error index={} difficulty={} band={} error={}",
                        index,
                        entry.difficulty,
                        entry.band(),
                        err
                    );
                    report.requests.push(RequestReport {
                        entry: *entry,
                        selected: 0,
                        status: RequestStatus::StoreFailed(err.to_string()),
                        eviction: EvictionSignal::NotNeeded,
                    });
                }
            }
        }

        for word in &selected {
            self.insert_word(word, &mut report);
        }

        info!(
            "event=rotation_done module=rotation status=ok requested={} inserted={} duplicates={} failed_inserts={} duration_ms={}",
            report.requested(),
            report.inserted.len(),
            report.duplicates.len(),
            report.failed_inserts.len(),
            started_at.elapsed().as_millis()
        );
        report
    }

    fn insert_word(&self, word: &CatalogWord, report: &mut RotationReport) {
        let entry = ActiveEntry::from_catalog(word, self.clock.now_ms());
        match self.active.insert(&entry) {
            Ok(InsertOutcome::Inserted) => {
                info!(
                    "event=rotation_insert module=rotation status=ok word={} narration_asset={} syllables={} difficulty={} created_at={}",
                    entry.word,
                    entry.narration_asset,
                    entry.syllable_count,
                    entry.difficulty,
                    entry.created_at
                );
                report.inserted.push(entry.word);
            }
            Ok(InsertOutcome::Duplicate) => {
                info!(
                    "event=rotation_insert module=rotation status=duplicate word={} difficulty={}",
                    entry.word, entry.difficulty
                );
                report.duplicates.push(entry.word);
            }
            Err(err) => {
                warn!(
                    "event=rotation_insert module=rotation status=error word={} difficulty={} error={}",
                    entry.word, entry.difficulty, err
                );
                report.failed_inserts.push(entry.word);
            }
        }
    }
}

/// Runs the rotation against SQLite stores with the system clock and a
/// thread-local RNG.
///
/// Fails only when the connection is not a migrated spelldaily database.
pub fn run_daily_rotation(
    conn: &Connection,
    schedule: &[ScheduleEntry],
) -> RepoResult<RotationReport> {
    let catalog = SqliteCatalogRepository::try_new(conn)?;
    let active = SqliteActiveSetRepository::try_new(conn)?;
    let job = RotationJob::new(catalog, active, SystemClock);
    Ok(job.run(schedule, &mut rand::thread_rng()))
}

fn status_label(status: &RequestStatus) -> &'static str {
    match status {
        RequestStatus::Fulfilled => "fulfilled",
        RequestStatus::Short => "short",
        RequestStatus::StoreFailed(_) => "store_error",
    }
}
