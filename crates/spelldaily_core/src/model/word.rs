//! Word domain model for the catalog and the active daily set.
//!
//! # Responsibility
//! - Define catalog and active-set records shared by repositories and services.
//! - Provide difficulty tiers and inclusive syllable bands used as filters.
//!
//! # Invariants
//! - `syllable_count` is always >= 1.
//! - `word` is never blank after trim.
//! - A `CatalogWord` only exists for catalog rows with a narration asset.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a catalog word.
pub type WordId = Uuid;

/// Stable identifier of an active daily entry.
pub type EntryId = Uuid;

/// Difficulty tier of a vocabulary word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    /// Storage/wire label for this tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Difficult => "difficult",
        }
    }

    /// Parses a storage/wire label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "difficult" => Some(Self::Difficult),
            _ => None,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive syllable-count filter. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllableBand {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl SyllableBand {
    /// Band without bounds.
    pub const ANY: Self = Self {
        min: None,
        max: None,
    };

    /// Band with both inclusive bounds set.
    pub fn between(min: u32, max: u32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns whether `syllables` falls inside the band (bounds inclusive).
    pub fn contains(&self, syllables: u32) -> bool {
        self.min.map_or(true, |min| syllables >= min)
            && self.max.map_or(true, |max| syllables <= max)
    }
}

impl Display for SyllableBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (None, None) => f.write_str("any"),
            (Some(min), None) => write!(f, "{min}.."),
            (None, Some(max)) => write!(f, "..{max}"),
            (Some(min), Some(max)) => write!(f, "{min}..={max}"),
        }
    }
}

/// Validation failures for word records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordValidationError {
    NilId,
    BlankWord,
    ZeroSyllables,
    MissingNarration,
}

impl Display for WordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "word id must not be nil"),
            Self::BlankWord => write!(f, "word text must not be blank"),
            Self::ZeroSyllables => write!(f, "syllable_count must be >= 1"),
            Self::MissingNarration => write!(f, "narration_asset must not be blank"),
        }
    }
}

impl Error for WordValidationError {}

/// Eligible catalog record (narration asset present).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogWord {
    pub id: WordId,
    pub word: String,
    pub narration_asset: String,
    pub syllable_count: u32,
    pub difficulty: Difficulty,
}

/// Catalog row as written by the import path.
///
/// `narration_asset` may be absent; such rows stay in the catalog but are
/// never selected until an asset is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogWord {
    pub word: String,
    #[serde(default)]
    pub narration_asset: Option<String>,
    pub syllable_count: u32,
    pub difficulty: Difficulty,
}

impl NewCatalogWord {
    pub fn validate(&self) -> Result<(), WordValidationError> {
        if self.word.trim().is_empty() {
            return Err(WordValidationError::BlankWord);
        }
        if self.syllable_count == 0 {
            return Err(WordValidationError::ZeroSyllables);
        }
        if matches!(self.narration_asset.as_deref(), Some(asset) if asset.trim().is_empty()) {
            return Err(WordValidationError::MissingNarration);
        }
        Ok(())
    }
}

/// Row of the active daily set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEntry {
    pub id: EntryId,
    pub word: String,
    pub narration_asset: String,
    pub syllable_count: u32,
    pub difficulty: Difficulty,
    /// Unix epoch milliseconds. Insertion time and eviction ordering key.
    pub created_at: i64,
}

impl ActiveEntry {
    /// Builds a fresh active entry from a selected catalog word.
    ///
    /// Copies word fields at insertion time; later catalog edits do not
    /// propagate to the active set.
    pub fn from_catalog(word: &CatalogWord, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            word: word.word.clone(),
            narration_asset: word.narration_asset.clone(),
            syllable_count: word.syllable_count,
            difficulty: word.difficulty,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), WordValidationError> {
        if self.id.is_nil() {
            return Err(WordValidationError::NilId);
        }
        if self.word.trim().is_empty() {
            return Err(WordValidationError::BlankWord);
        }
        if self.narration_asset.trim().is_empty() {
            return Err(WordValidationError::MissingNarration);
        }
        if self.syllable_count == 0 {
            return Err(WordValidationError::ZeroSyllables);
        }
        Ok(())
    }
}

/// Eviction candidate returned by the oldest-entry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OldestEntry {
    pub id: EntryId,
    pub created_at: i64,
}
