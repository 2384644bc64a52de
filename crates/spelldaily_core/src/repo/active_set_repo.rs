//! Active daily set repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Membership test, oldest-entry lookup, touch and insert over `daily`.
//!
//! # Invariants
//! - `daily.word` is unique; a duplicate insert is reported as
//!   `InsertOutcome::Duplicate`, not as an error.
//! - Oldest lookup orders by `created_at ASC, uuid ASC` and returns one row.
//! - Touch never deletes; it only rewrites `created_at`.

use super::{ensure_connection_ready, parse_difficulty, parse_syllables, parse_uuid};
use super::{RepoError, RepoResult};
use crate::model::word::{ActiveEntry, Difficulty, EntryId, OldestEntry, SyllableBand};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

/// Result of inserting one active entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The word is already active (lost a race with another run, or the same
    /// word was selected twice in one batch).
    Duplicate,
}

/// Store contract for the active daily set.
pub trait ActiveSetRepository {
    /// Returns whether an entry with exactly this word text exists.
    fn word_exists(&self, word: &str) -> RepoResult<bool>;

    /// Finds the matching entry with the smallest `created_at`.
    fn find_oldest(
        &self,
        difficulty: Difficulty,
        band: SyllableBand,
    ) -> RepoResult<Option<OldestEntry>>;

    /// Rewrites `created_at` of one entry.
    fn touch(&self, id: EntryId, created_at: i64) -> RepoResult<()>;

    fn insert(&self, entry: &ActiveEntry) -> RepoResult<InsertOutcome>;
}

impl<T: ActiveSetRepository + ?Sized> ActiveSetRepository for &T {
    fn word_exists(&self, word: &str) -> RepoResult<bool> {
        (**self).word_exists(word)
    }

    fn find_oldest(
        &self,
        difficulty: Difficulty,
        band: SyllableBand,
    ) -> RepoResult<Option<OldestEntry>> {
        (**self).find_oldest(difficulty, band)
    }

    fn touch(&self, id: EntryId, created_at: i64) -> RepoResult<()> {
        (**self).touch(id, created_at)
    }

    fn insert(&self, entry: &ActiveEntry) -> RepoResult<InsertOutcome> {
        (**self).insert(entry)
    }
}

/// SQLite-backed active daily set.
pub struct SqliteActiveSetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActiveSetRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["daily"])?;
        Ok(Self { conn })
    }

    /// Lists the whole active set, oldest first.
    pub fn list_entries(&self) -> RepoResult<Vec<ActiveEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                uuid,
                word,
                narration_asset,
                syllable_count,
                difficulty,
                created_at
             FROM daily
             ORDER BY created_at ASC, uuid ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_active_row(row)?);
        }

        Ok(entries)
    }
}

impl ActiveSetRepository for SqliteActiveSetRepository<'_> {
    fn word_exists(&self, word: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM daily WHERE word = ?1);",
            [word],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_oldest(
        &self,
        difficulty: Difficulty,
        band: SyllableBand,
    ) -> RepoResult<Option<OldestEntry>> {
        let mut sql = String::from("SELECT uuid, created_at FROM daily WHERE difficulty = ?");
        let mut bind_values = vec![Value::Text(difficulty.as_str().to_string())];

        if let Some(min) = band.min {
            sql.push_str(" AND syllable_count >= ?");
            bind_values.push(Value::Integer(i64::from(min)));
        }
        if let Some(max) = band.max {
            sql.push_str(" AND syllable_count <= ?");
            bind_values.push(Value::Integer(i64::from(max)));
        }
        sql.push_str(" ORDER BY created_at ASC, uuid ASC LIMIT 1");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let uuid_text: String = row.get("uuid")?;
        Ok(Some(OldestEntry {
            id: parse_uuid(&uuid_text, "daily.uuid")?,
            created_at: row.get("created_at")?,
        }))
    }

    fn touch(&self, id: EntryId, created_at: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE daily SET created_at = ?1 WHERE uuid = ?2;",
            params![created_at, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn insert(&self, entry: &ActiveEntry) -> RepoResult<InsertOutcome> {
        entry.validate()?;

        let result = self.conn.execute(
            "INSERT INTO daily (
                uuid,
                word,
                narration_asset,
                syllable_count,
                difficulty,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                entry.id.to_string(),
                entry.word.as_str(),
                entry.narration_asset.as_str(),
                i64::from(entry.syllable_count),
                entry.difficulty.as_str(),
                entry.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(err) => {
                let err = RepoError::from(err);
                if matches!(&err, RepoError::Db(db_err) if db_err.is_unique_violation()) {
                    return Ok(InsertOutcome::Duplicate);
                }
                Err(err)
            }
        }
    }
}

fn parse_active_row(row: &Row<'_>) -> RepoResult<ActiveEntry> {
    let uuid_text: String = row.get("uuid")?;
    let difficulty_text: String = row.get("difficulty")?;

    let entry = ActiveEntry {
        id: parse_uuid(&uuid_text, "daily.uuid")?,
        word: row.get("word")?,
        narration_asset: row.get("narration_asset")?,
        syllable_count: parse_syllables(row.get("syllable_count")?, "daily.syllable_count")?,
        difficulty: parse_difficulty(&difficulty_text, "daily.difficulty")?,
        created_at: row.get("created_at")?,
    };
    entry.validate()?;
    Ok(entry)
}
