//! Word catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Answer eligibility queries over the `dictionary` table.
//! - Provide the import write path used by local tooling.
//!
//! # Invariants
//! - Every read path filters to rows with a narration asset.
//! - Syllable bounds are inclusive.
//! - Result ordering is deterministic (`uuid ASC`) so seeded sampling is
//!   reproducible.
//! - List paths skip malformed rows with a warning; single-record lookups
//!   report them as `InvalidData`.

use super::{ensure_connection_ready, parse_difficulty, parse_syllables, parse_uuid};
use super::{RepoError, RepoResult};
use crate::model::word::{CatalogWord, Difficulty, NewCatalogWord, SyllableBand, WordId};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const CATALOG_SELECT_SQL: &str = "SELECT
    uuid,
    word,
    narration_asset,
    syllable_count,
    difficulty
FROM dictionary
WHERE narration_asset IS NOT NULL";

/// Read contract over the word catalog.
pub trait CatalogRepository {
    /// Ids of every eligible word in `difficulty`, without syllable filter.
    fn list_eligible_ids(&self, difficulty: Difficulty) -> RepoResult<Vec<WordId>>;

    /// Full eligible records in `difficulty` restricted to `band`.
    fn list_eligible(
        &self,
        difficulty: Difficulty,
        band: SyllableBand,
    ) -> RepoResult<Vec<CatalogWord>>;

    /// One eligible record by id, `None` when absent or no longer eligible.
    fn get_eligible(&self, id: WordId) -> RepoResult<Option<CatalogWord>>;
}

impl<T: CatalogRepository + ?Sized> CatalogRepository for &T {
    fn list_eligible_ids(&self, difficulty: Difficulty) -> RepoResult<Vec<WordId>> {
        (**self).list_eligible_ids(difficulty)
    }

    fn list_eligible(
        &self,
        difficulty: Difficulty,
        band: SyllableBand,
    ) -> RepoResult<Vec<CatalogWord>> {
        (**self).list_eligible(difficulty, band)
    }

    fn get_eligible(&self, id: WordId) -> RepoResult<Option<CatalogWord>> {
        (**self).get_eligible(id)
    }
}

/// SQLite-backed word catalog.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["dictionary"])?;
        Ok(Self { conn })
    }

    /// Adds one word to the catalog and returns its generated id.
    ///
    /// Words without a narration asset are stored but stay ineligible.
    pub fn import_word(&self, word: &NewCatalogWord) -> RepoResult<WordId> {
        word.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO dictionary (
                uuid,
                word,
                narration_asset,
                syllable_count,
                difficulty
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                word.word.trim(),
                word.narration_asset.as_deref(),
                i64::from(word.syllable_count),
                word.difficulty.as_str(),
            ],
        )?;

        Ok(id)
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn list_eligible_ids(&self, difficulty: Difficulty) -> RepoResult<Vec<WordId>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid
             FROM dictionary
             WHERE difficulty = ?1
               AND narration_asset IS NOT NULL
             ORDER BY uuid ASC;",
        )?;

        let mut rows = stmt.query([difficulty.as_str()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            if let Some(id) = skip_malformed(parse_uuid(&text, "dictionary.uuid"))? {
                ids.push(id);
            }
        }

        Ok(ids)
    }

    fn list_eligible(
        &self,
        difficulty: Difficulty,
        band: SyllableBand,
    ) -> RepoResult<Vec<CatalogWord>> {
        let mut sql = format!("{CATALOG_SELECT_SQL} AND difficulty = ?");
        let mut bind_values = vec![Value::Text(difficulty.as_str().to_string())];

        if let Some(min) = band.min {
            sql.push_str(" AND syllable_count >= ?");
            bind_values.push(Value::Integer(i64::from(min)));
        }
        if let Some(max) = band.max {
            sql.push_str(" AND syllable_count <= ?");
            bind_values.push(Value::Integer(i64::from(max)));
        }
        sql.push_str(" ORDER BY uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut words = Vec::new();
        while let Some(row) = rows.next()? {
            if let Some(word) = skip_malformed(parse_catalog_row(row))? {
                words.push(word);
            }
        }

        Ok(words)
    }

    fn get_eligible(&self, id: WordId) -> RepoResult<Option<CatalogWord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATALOG_SELECT_SQL} AND uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_catalog_row(row)?)),
            None => Ok(None),
        }
    }
}

/// Turns `InvalidData` into a logged skip; every other error propagates.
fn skip_malformed<T>(parsed: RepoResult<T>) -> RepoResult<Option<T>> {
    match parsed {
        Ok(value) => Ok(Some(value)),
        Err(RepoError::InvalidData(reason)) => {
            warn!("event=catalog_row_skipped module=repo status=warn reason={reason}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn parse_catalog_row(row: &Row<'_>) -> RepoResult<CatalogWord> {
    let uuid_text: String = row.get("uuid")?;
    let difficulty_text: String = row.get("difficulty")?;
    let narration_asset: Option<String> = row.get("narration_asset")?;

    Ok(CatalogWord {
        id: parse_uuid(&uuid_text, "dictionary.uuid")?,
        word: row.get("word")?,
        narration_asset: narration_asset.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "eligible row `{uuid_text}` has null dictionary.narration_asset"
            ))
        })?,
        syllable_count: parse_syllables(row.get("syllable_count")?, "dictionary.syllable_count")?,
        difficulty: parse_difficulty(&difficulty_text, "dictionary.difficulty")?,
    })
}
