//! Append-only publication ledger.
//!
//! The ledger is the only record of what has already been published. Every
//! processed post leaves at least one row behind, whether it was published,
//! skipped or failed, so it is never picked up again.
//!
//! # Example
//!
//! ```rust
//! use tootbot_ledger::{ContentStore, CsvLedger, LedgerEntry};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let ledger = CsvLedger::open(dir.path().join("cache.csv"))?;
//!
//! ledger.append(&LedgerEntry::published("abc123", "https://mastodon.example/@bot/1", "https://i.redd.it/xyz.jpg"))?;
//! assert!(ledger.contains("abc123")?);
//! assert!(ledger.contains("https://i.redd.it/xyz.jpg")?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod csv_ledger;
mod entry;

pub use csv_ledger::{CsvLedger, LEDGER_HEADER};
pub use entry::{LedgerEntry, LedgerOutcome, TIMESTAMP_FORMAT};

use tootbot_error::TootbotResult;

/// Durable membership log of published content.
pub trait ContentStore {
    /// Whether `identifier` equals any field of any recorded row.
    ///
    /// The check is deliberately column-agnostic: a post id, a media URL and
    /// a checksum are all looked up the same way. An empty identifier is
    /// never contained, since rows leave unused columns empty.
    fn contains(&self, identifier: &str) -> TootbotResult<bool>;

    /// Append one row. The row is durable once this returns.
    fn append(&self, entry: &LedgerEntry) -> TootbotResult<()>;
}
