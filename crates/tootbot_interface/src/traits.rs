//! Trait definitions for listing sources, destinations and monitoring.

use async_trait::async_trait;
use std::path::Path;
use tootbot_core::{MediaHandle, Post, PublishedPost};
use tootbot_error::TootbotResult;

/// A source of candidate posts (e.g. a subreddit listing).
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch up to `limit` posts from the named source.
    ///
    /// Implementations should fail soft and return an empty batch on
    /// transport errors; an `Err` is reserved for misconfiguration.
    async fn fetch_posts(&self, source_name: &str, limit: usize) -> TootbotResult<Vec<Post>>;

    /// Source name for logging (e.g. "reddit").
    fn source_name(&self) -> &str;
}

/// A destination that accepts a caption with optional media.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload one local media file and return the destination's handle for it.
    async fn upload_media(&self, local_path: &Path) -> TootbotResult<MediaHandle>;

    /// Publish a caption with previously uploaded media attached.
    async fn publish(
        &self,
        caption: &str,
        media: &[MediaHandle],
        nsfw: bool,
    ) -> TootbotResult<PublishedPost>;

    /// Delete the account's own posts older than `days` days.
    ///
    /// Returns how many were deleted. Destinations without history
    /// management keep everything.
    async fn delete_older_than(&self, _days: u32) -> TootbotResult<usize> {
        Ok(0)
    }

    /// Maximum caption length accepted by this destination.
    fn caption_budget(&self) -> usize;

    /// Destination name (e.g. "mastodon").
    fn platform_name(&self) -> &str;
}

/// Type of a monitoring check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CheckKind {
    /// Start of a cycle
    #[display("start")]
    Start,
    /// Successful completion (or a plain progress ping)
    #[display("ok")]
    Ok,
    /// Failure of a cycle
    #[display("fail")]
    Fail,
}

/// Fire-and-forget liveness signal.
#[async_trait]
pub trait Heartbeat: Send + Sync {
    /// Send one check-in. Never fails; errors are logged by the implementation.
    async fn check(&self, kind: CheckKind, data: Option<&str>);
}

/// Heartbeat that does nothing, used when monitoring is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHeartbeat;

#[async_trait]
impl Heartbeat for NoOpHeartbeat {
    async fn check(&self, _kind: CheckKind, _data: Option<&str>) {}
}
