//! Mastodon API entities, reduced to the fields the bot reads.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::Deserialize;

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct Account {
    /// Account id
    id: String,
    /// Local user name
    username: String,
    /// Account URL
    #[serde(default)]
    url: String,
}

/// A published status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct Status {
    /// Status id
    id: String,
    /// Canonical URI
    uri: String,
    /// HTML URL, absent for some remote statuses
    #[serde(default)]
    url: Option<String>,
    /// Creation time
    created_at: DateTime<Utc>,
}

impl Status {
    /// Public URL, falling back to the URI.
    pub fn public_url(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.uri)
    }
}

/// An uploaded media attachment.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Attachment {
    pub id: String,
    /// `None` while the server is still processing the file
    #[serde(default)]
    pub url: Option<String>,
}
