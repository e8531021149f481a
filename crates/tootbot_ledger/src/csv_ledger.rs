//! CSV-backed ledger implementation.
//!
//! The file is opened per operation: appends open in append mode, write one
//! row, flush and close, so a membership check right after an append always
//! sees it and nothing is lost across restarts.

use crate::{ContentStore, LedgerEntry};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tootbot_error::{LedgerError, LedgerErrorKind, TootbotResult};

/// Header row written when a new ledger file is created.
pub const LEDGER_HEADER: [&str; 6] = [
    "Reddit post ID",
    "Date and time",
    "Post link",
    "Shared media URL",
    "Media Checksum",
    "Outcome",
];

/// Ledger stored as a CSV file, one row per append.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    /// Open the ledger at `path`, creating it with a header row if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be created.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> TootbotResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LedgerError::new(LedgerErrorKind::Open(format!(
                        "{}: {}",
                        parent.display(),
                        e
                    )))
                })?;
            }

            let mut writer = csv::Writer::from_path(&path).map_err(|e| {
                LedgerError::new(LedgerErrorKind::Open(format!("{}: {}", path.display(), e)))
            })?;
            writer
                .write_record(LEDGER_HEADER)
                .and_then(|_| writer.flush().map_err(csv::Error::from))
                .map_err(|e| {
                    LedgerError::new(LedgerErrorKind::Write(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                })?;

            tracing::info!(path = %path.display(), "Ledger file not found, created a new one");
        }

        Ok(Self { path })
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every data row back, skipping the header and unparsable rows.
    pub fn entries(&self) -> TootbotResult<Vec<LedgerEntry>> {
        let mut entries = Vec::new();
        for record in self.records()? {
            match LedgerEntry::from_record(&record) {
                Some(entry) => entries.push(entry),
                None => tracing::debug!(row = ?record, "Skipping non-entry ledger row"),
            }
        }
        Ok(entries)
    }

    fn records(&self) -> TootbotResult<Vec<csv::StringRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                LedgerError::new(LedgerErrorKind::Read(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            })?;

        reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                LedgerError::new(LedgerErrorKind::Parse(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
                .into()
            })
    }
}

impl ContentStore for CsvLedger {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn contains(&self, identifier: &str) -> TootbotResult<bool> {
        if identifier.is_empty() {
            return Ok(false);
        }
        let found = self
            .records()?
            .iter()
            .any(|record| record.iter().any(|field| field == identifier));

        tracing::debug!(identifier, found, "Ledger membership check");
        Ok(found)
    }

    #[tracing::instrument(skip(self, entry), fields(source_id = %entry.source_id(), outcome = %entry.outcome()))]
    fn append(&self, entry: &LedgerEntry) -> TootbotResult<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| {
                LedgerError::new(LedgerErrorKind::Open(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer
            .write_record(entry.to_record())
            .and_then(|_| writer.flush().map_err(csv::Error::from))
            .map_err(|e| {
                LedgerError::new(LedgerErrorKind::Write(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            })?;

        tracing::info!(
            source_id = %entry.source_id(),
            destination_url = %entry.destination_url(),
            "Recorded ledger entry"
        );
        Ok(())
    }
}
