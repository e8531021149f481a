//! Ledger row types.

use chrono::{Local, NaiveDateTime};
use derive_getters::Getters;
use std::str::FromStr;

/// Timestamp format used in the ledger's date column.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// What happened to the post a row refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum LedgerOutcome {
    /// The post was published
    #[display("published")]
    Published,
    /// One media file was uploaded as part of a published post
    #[display("media uploaded")]
    MediaUploaded,
    /// Every media file had already been published under another post
    #[display("skipped: already posted")]
    SkippedDuplicate,
    /// No media could be attached and media is required
    #[display("skipped: non-media")]
    SkippedNonMedia,
    /// The destination rejected the post
    #[display("error: {}", _0)]
    Failed(String),
}

impl FromStr for LedgerOutcome {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "published" | "" => Self::Published,
            "media uploaded" => Self::MediaUploaded,
            "skipped: already posted" => Self::SkippedDuplicate,
            "skipped: non-media" => Self::SkippedNonMedia,
            other => Self::Failed(other.strip_prefix("error: ").unwrap_or(other).to_string()),
        })
    }
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct LedgerEntry {
    /// Listing id of the source post
    source_id: String,
    /// Local time the row was written
    recorded_at: NaiveDateTime,
    /// URL of the published post (empty unless published)
    destination_url: String,
    /// URL of the shared media (or the post link)
    media_source_url: String,
    /// SHA-256 of the shared media file (empty for post rows)
    checksum: String,
    /// Outcome recorded for the post
    outcome: LedgerOutcome,
}

impl LedgerEntry {
    /// Create a row stamped with the current local time.
    pub fn new(
        source_id: impl Into<String>,
        destination_url: impl Into<String>,
        media_source_url: impl Into<String>,
        checksum: impl Into<String>,
        outcome: LedgerOutcome,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            recorded_at: truncate_to_seconds(Local::now().naive_local()),
            destination_url: destination_url.into(),
            media_source_url: media_source_url.into(),
            checksum: checksum.into(),
            outcome,
        }
    }

    /// Row for a successfully published post.
    pub fn published(
        source_id: impl Into<String>,
        destination_url: impl Into<String>,
        media_source_url: impl Into<String>,
    ) -> Self {
        Self::new(
            source_id,
            destination_url,
            media_source_url,
            "",
            LedgerOutcome::Published,
        )
    }

    /// Row for one uploaded media file of a published post.
    pub fn uploaded_media(
        source_id: impl Into<String>,
        destination_url: impl Into<String>,
        media_source_url: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        Self::new(
            source_id,
            destination_url,
            media_source_url,
            checksum,
            LedgerOutcome::MediaUploaded,
        )
    }

    /// Row for a post that was not published; the destination URL stays empty.
    pub fn skipped(
        source_id: impl Into<String>,
        media_source_url: impl Into<String>,
        outcome: LedgerOutcome,
    ) -> Self {
        Self::new(source_id, "", media_source_url, "", outcome)
    }

    /// Override the timestamp (used when reading rows back).
    pub fn with_recorded_at(mut self, recorded_at: NaiveDateTime) -> Self {
        self.recorded_at = truncate_to_seconds(recorded_at);
        self
    }

    /// Timestamp rendered in [`TIMESTAMP_FORMAT`].
    pub fn timestamp(&self) -> String {
        self.recorded_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Row fields in column order.
    pub(crate) fn to_record(&self) -> [String; 6] {
        [
            self.source_id.clone(),
            self.timestamp(),
            self.destination_url.clone(),
            self.media_source_url.clone(),
            self.checksum.clone(),
            self.outcome.to_string(),
        ]
    }

    /// Rebuild a row from its fields.
    ///
    /// Rows written before the outcome column existed have five fields and
    /// read back as published.
    pub(crate) fn from_record(record: &csv::StringRecord) -> Option<Self> {
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        let recorded_at = NaiveDateTime::parse_from_str(record.get(1)?, TIMESTAMP_FORMAT).ok()?;
        let outcome = record
            .get(5)
            .unwrap_or_default()
            .parse()
            .unwrap_or(LedgerOutcome::Published);
        Some(Self {
            source_id: field(0),
            recorded_at,
            destination_url: field(2),
            media_source_url: field(3),
            checksum: field(4),
            outcome,
        })
    }
}

fn truncate_to_seconds(at: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    at.with_nanosecond(0).unwrap_or(at)
}
