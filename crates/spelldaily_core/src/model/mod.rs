//! Domain model for the vocabulary catalog and the active daily set.
//!
//! # Responsibility
//! - Define canonical records used by rotation business logic.
//! - Describe the rotation schedule as data.
//!
//! # Invariants
//! - Catalog words are read-only from the rotation job's perspective.
//! - Active entries are touched, never deleted, by the rotation job.

pub mod schedule;
pub mod word;
