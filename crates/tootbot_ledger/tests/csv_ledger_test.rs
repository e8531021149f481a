//! Tests for the CSV ledger.

use tempfile::TempDir;
use tootbot_ledger::{ContentStore, CsvLedger, LedgerEntry, LedgerOutcome, LEDGER_HEADER};

fn open_ledger(dir: &TempDir) -> CsvLedger {
    CsvLedger::open(dir.path().join("cache.csv")).unwrap()
}

#[test]
fn test_open_creates_file_with_header() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = open_ledger(&temp_dir);

    let content = std::fs::read_to_string(ledger.path()).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert_eq!(content.lines().next().unwrap(), LEDGER_HEADER.join(","));
    assert!(ledger.entries().unwrap().is_empty());
}

#[test]
fn test_open_creates_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = CsvLedger::open(temp_dir.path().join("state/nested/cache.csv")).unwrap();
    assert!(ledger.path().exists());
}

#[test]
fn test_reopen_keeps_existing_rows() {
    let temp_dir = TempDir::new().unwrap();
    {
        let ledger = open_ledger(&temp_dir);
        ledger
            .append(&LedgerEntry::published("abc123", "https://m.example/1", "https://i.redd.it/xyz"))
            .unwrap();
    }

    let ledger = open_ledger(&temp_dir);
    assert!(ledger.contains("abc123").unwrap());
    assert_eq!(ledger.entries().unwrap().len(), 1);
}

#[test]
fn test_contains_matches_any_column() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = open_ledger(&temp_dir);
    let checksum = "a".repeat(64);

    ledger
        .append(&LedgerEntry::uploaded_media(
            "abc123",
            "https://m.example/1",
            "https://i.redd.it/xyz.jpg",
            checksum.clone(),
        ))
        .unwrap();

    assert!(ledger.contains("abc123").unwrap());
    assert!(ledger.contains("https://m.example/1").unwrap());
    assert!(ledger.contains("https://i.redd.it/xyz.jpg").unwrap());
    assert!(ledger.contains(&checksum).unwrap());
    assert!(!ledger.contains("abc").unwrap());
    assert!(!ledger.contains("zzz999").unwrap());
}

#[test]
fn test_empty_identifier_is_never_contained() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = open_ledger(&temp_dir);

    // Published rows leave the checksum column empty.
    ledger
        .append(&LedgerEntry::published("abc123", "https://m.example/1", "https://i.redd.it/xyz"))
        .unwrap();
    ledger
        .append(&LedgerEntry::skipped("def456", "", LedgerOutcome::SkippedNonMedia))
        .unwrap();

    assert!(!ledger.contains("").unwrap());
    assert!(ledger.contains("def456").unwrap());
}

#[test]
fn test_entries_preserve_append_order() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = open_ledger(&temp_dir);

    ledger
        .append(&LedgerEntry::skipped("first", "https://a", LedgerOutcome::SkippedNonMedia))
        .unwrap();
    ledger
        .append(&LedgerEntry::skipped(
            "second",
            "https://b",
            LedgerOutcome::Failed("quota, exceeded".to_string()),
        ))
        .unwrap();

    let entries = ledger.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source_id(), "first");
    assert_eq!(*entries[0].outcome(), LedgerOutcome::SkippedNonMedia);
    assert_eq!(entries[1].source_id(), "second");
    assert_eq!(
        *entries[1].outcome(),
        LedgerOutcome::Failed("quota, exceeded".to_string())
    );
}

#[test]
fn test_legacy_five_column_rows_are_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.csv");
    std::fs::write(
        &path,
        "Reddit post ID,Date and time,Post link,Media Checksum\n\
         old1,01/02/2023 10:11:12,https://m.example/9,https://i.imgur.com/q.png,deadbeef\n",
    )
    .unwrap();

    let ledger = CsvLedger::open(&path).unwrap();
    let entries = ledger.entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].checksum(), "deadbeef");
    assert_eq!(*entries[0].outcome(), LedgerOutcome::Published);
    assert!(ledger.contains("deadbeef").unwrap());
}
