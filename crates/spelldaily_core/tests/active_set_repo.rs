use spelldaily_core::db::open_db_in_memory;
use spelldaily_core::{
    ActiveEntry, ActiveSetRepository, CatalogWord, Difficulty, InsertOutcome, RepoError,
    SqliteActiveSetRepository, SyllableBand,
};
use uuid::Uuid;

fn entry(word: &str, syllables: u32, difficulty: Difficulty, created_at: i64) -> ActiveEntry {
    let catalog = CatalogWord {
        id: Uuid::new_v4(),
        word: word.to_string(),
        narration_asset: format!("audio/{word}.mp3"),
        syllable_count: syllables,
        difficulty,
    };
    ActiveEntry::from_catalog(&catalog, created_at)
}

#[test]
fn insert_then_word_exists_matches_exact_text() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActiveSetRepository::try_new(&conn).unwrap();

    assert!(!repo.word_exists("cat").unwrap());
    let outcome = repo.insert(&entry("cat", 1, Difficulty::Easy, 10)).unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted);

    assert!(repo.word_exists("cat").unwrap());
    assert!(!repo.word_exists("cats").unwrap());
}

#[test]
fn duplicate_word_insert_is_reported_not_raised() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActiveSetRepository::try_new(&conn).unwrap();

    repo.insert(&entry("cat", 1, Difficulty::Easy, 10)).unwrap();
    let outcome = repo.insert(&entry("cat", 1, Difficulty::Easy, 20)).unwrap();
    assert_eq!(outcome, InsertOutcome::Duplicate);

    let entries = repo.list_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].created_at, 10);
}

#[test]
fn invalid_entry_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActiveSetRepository::try_new(&conn).unwrap();

    let mut bad = entry("cat", 1, Difficulty::Easy, 10);
    bad.word = String::new();
    assert!(matches!(
        repo.insert(&bad).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(repo.list_entries().unwrap().is_empty());
}

#[test]
fn find_oldest_respects_difficulty_and_band() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActiveSetRepository::try_new(&conn).unwrap();

    let old_easy = entry("cat", 1, Difficulty::Easy, 100);
    let short_difficult = entry("rhythm", 2, Difficulty::Difficult, 200);
    let mid_difficult = entry("chameleon", 4, Difficulty::Difficult, 300);
    let newer_mid_difficult = entry("syzygy", 3, Difficulty::Difficult, 400);
    for item in [&old_easy, &short_difficult, &mid_difficult, &newer_mid_difficult] {
        repo.insert(item).unwrap();
    }

    let oldest = repo
        .find_oldest(Difficulty::Difficult, SyllableBand::between(3, 4))
        .unwrap()
        .unwrap();
    assert_eq!(oldest.id, mid_difficult.id);
    assert_eq!(oldest.created_at, 300);

    let oldest_any = repo
        .find_oldest(Difficulty::Difficult, SyllableBand::ANY)
        .unwrap()
        .unwrap();
    assert_eq!(oldest_any.id, short_difficult.id);

    assert!(repo
        .find_oldest(Difficulty::Medium, SyllableBand::ANY)
        .unwrap()
        .is_none());
    assert!(repo
        .find_oldest(Difficulty::Difficult, SyllableBand::between(5, 10))
        .unwrap()
        .is_none());
}

#[test]
fn find_oldest_breaks_ties_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActiveSetRepository::try_new(&conn).unwrap();

    let first = entry("cat", 1, Difficulty::Easy, 100);
    let second = entry("dog", 1, Difficulty::Easy, 100);
    repo.insert(&first).unwrap();
    repo.insert(&second).unwrap();

    let expected = first.id.min(second.id);
    let oldest = repo
        .find_oldest(Difficulty::Easy, SyllableBand::ANY)
        .unwrap()
        .unwrap();
    assert_eq!(oldest.id, expected);
}

#[test]
fn touch_rewrites_created_at_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActiveSetRepository::try_new(&conn).unwrap();

    let item = entry("cat", 1, Difficulty::Easy, 100);
    repo.insert(&item).unwrap();
    repo.touch(item.id, 5_000).unwrap();

    let entries = repo.list_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, item.id);
    assert_eq!(entries[0].word, "cat");
    assert_eq!(entries[0].created_at, 5_000);
}

#[test]
fn touch_missing_entry_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActiveSetRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = repo.touch(missing, 1).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn list_entries_is_oldest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActiveSetRepository::try_new(&conn).unwrap();

    repo.insert(&entry("late", 1, Difficulty::Easy, 300)).unwrap();
    repo.insert(&entry("early", 1, Difficulty::Easy, 100)).unwrap();
    repo.insert(&entry("middle", 2, Difficulty::Medium, 200))
        .unwrap();

    let words: Vec<String> = repo
        .list_entries()
        .unwrap()
        .into_iter()
        .map(|item| item.word)
        .collect();
    assert_eq!(words, vec!["early", "middle", "late"]);
}
