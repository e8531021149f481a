//! Fingerprinted media for a single post.
//!
//! A [`MediaAttachmentSet`] owns the files downloaded for one post. Files are
//! removed when the set is destroyed or dropped, so every exit path of the
//! publishing routine cleans up after itself.

use crate::{FetchMedia, sha256_file_async};
use std::path::{Path, PathBuf};
use tootbot_core::Post;

/// One downloaded, validated media file.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct MediaAsset {
    /// File on local disk
    local_path: PathBuf,
    /// SHA-256 of the file bytes, lower-case hex
    checksum: String,
    /// URL the file was downloaded from
    source_url: String,
}

impl MediaAsset {
    /// Create an asset record.
    pub fn new(
        local_path: impl Into<PathBuf>,
        checksum: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            checksum: checksum.into(),
            source_url: source_url.into(),
        }
    }
}

/// Media files for one post, keyed by checksum in download order.
#[derive(Debug, Default)]
pub struct MediaAttachmentSet {
    post_id: String,
    assets: Vec<MediaAsset>,
}

impl MediaAttachmentSet {
    /// Fetch and fingerprint every media file for `post`.
    ///
    /// Never fails: fetch errors, hashing errors and placeholder assets are
    /// logged and leave the set smaller (possibly empty). Files whose digest
    /// appears in `placeholder_checksums` are deleted. A second file with a
    /// checksum already in the set is deleted as redundant.
    #[tracing::instrument(skip_all, fields(post_id = %post.id()))]
    pub async fn build(
        post: &Post,
        fetcher: &dyn FetchMedia,
        placeholder_checksums: &[String],
    ) -> Self {
        let mut set = Self {
            post_id: post.id().clone(),
            assets: Vec::new(),
        };

        let files = match fetcher.fetch_for(post).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(error = %e, "No media obtained for post");
                return set;
            }
        };

        for file in files {
            let checksum = match sha256_file_async(&file.path).await {
                Ok(checksum) => checksum,
                Err(e) => {
                    tracing::error!(path = %file.path.display(), error = %e, "Could not fingerprint media file");
                    discard(&file.path).await;
                    continue;
                }
            };

            if placeholder_checksums.iter().any(|known| known.eq_ignore_ascii_case(&checksum)) {
                tracing::warn!(path = %file.path.display(), checksum = %checksum, "Placeholder image, not posting");
                discard(&file.path).await;
                continue;
            }

            if set.contains(&checksum) {
                tracing::debug!(path = %file.path.display(), checksum = %checksum, "Same file fetched twice");
                if set.get(&checksum).map(MediaAsset::local_path) != Some(&file.path) {
                    discard(&file.path).await;
                }
                continue;
            }

            tracing::debug!(path = %file.path.display(), checksum = %checksum, "Media file ready");
            set.assets.push(MediaAsset::new(file.path, checksum, file.source_url));
        }

        tracing::info!(count = set.assets.len(), "Built media attachment set");
        set
    }

    /// Build a set from assets that already exist on disk.
    pub fn from_assets(post_id: impl Into<String>, assets: Vec<MediaAsset>) -> Self {
        let mut set = Self {
            post_id: post_id.into(),
            assets: Vec::with_capacity(assets.len()),
        };
        for asset in assets {
            if !set.contains(asset.checksum()) {
                set.assets.push(asset);
            }
        }
        set
    }

    /// Id of the post the media belongs to.
    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Assets in download order.
    pub fn assets(&self) -> &[MediaAsset] {
        &self.assets
    }

    /// Checksums in download order.
    pub fn checksums(&self) -> Vec<String> {
        self.assets.iter().map(|a| a.checksum.clone()).collect()
    }

    /// Look up an asset by checksum.
    pub fn get(&self, checksum: &str) -> Option<&MediaAsset> {
        self.assets.iter().find(|a| a.checksum == checksum)
    }

    /// Local path for `checksum`.
    pub fn path_for(&self, checksum: &str) -> Option<&Path> {
        self.get(checksum).map(|a| a.local_path.as_path())
    }

    /// Whether `checksum` is tracked.
    pub fn contains(&self, checksum: &str) -> bool {
        self.get(checksum).is_some()
    }

    /// Number of tracked assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// No tracked assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Delete one tracked file and forget it.
    ///
    /// The entry is forgotten even if the file could not be deleted.
    /// Returns whether `checksum` was tracked.
    pub fn destroy_one(&mut self, checksum: &str) -> bool {
        let Some(index) = self.assets.iter().position(|a| a.checksum == checksum) else {
            return false;
        };
        let asset = self.assets.remove(index);
        remove_file(&asset.local_path);
        true
    }

    /// Delete every tracked file and clear the set.
    ///
    /// Missing files are logged and skipped. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.assets.is_empty() {
            return;
        }
        tracing::debug!(post_id = %self.post_id, count = self.assets.len(), "Removing media files");
        for asset in self.assets.drain(..) {
            remove_file(&asset.local_path);
        }
    }
}

impl Drop for MediaAttachmentSet {
    fn drop(&mut self) {
        self.destroy();
    }
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::error!(path = %path.display(), error = %e, "Error while deleting media file");
    }
}

// Also reached from `Drop`, so it stays synchronous.
fn remove_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::error!(path = %path.display(), error = %e, "Error while deleting media file");
    }
}
