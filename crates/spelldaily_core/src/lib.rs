//! Core domain logic for spelldaily.
//! Selects the daily rotating set of spelling words and writes it back to
//! the active daily set.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, RotationConfig, DATABASE_ENV_VAR};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::schedule::{default_schedule, SamplingStrategy, ScheduleEntry, ScheduleError};
pub use model::word::{
    ActiveEntry, CatalogWord, Difficulty, EntryId, NewCatalogWord, OldestEntry, SyllableBand,
    WordId, WordValidationError,
};
pub use repo::active_set_repo::{ActiveSetRepository, InsertOutcome, SqliteActiveSetRepository};
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use repo::{RepoError, RepoResult};
pub use service::evictor::{ActiveSetEvictor, EvictionOutcome};
pub use service::rotation::{
    run_daily_rotation, RequestReport, RequestStatus, RotationJob, RotationReport,
};
pub use service::sampler::{EvictionSignal, Sample, WordSampler, FULL_SET_MAX_ATTEMPTS};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
