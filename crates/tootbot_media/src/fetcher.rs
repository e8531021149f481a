//! Provider dispatch for media downloads.

use crate::providers::{generic, gfycat, giphy, imgur, reddit};
use crate::{HttpTransport, ProviderKind, classify};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tootbot_core::Post;
use tootbot_error::TootbotResult;

/// Default cap on images fetched from one gallery or album.
pub const DEFAULT_MAX_IMAGES: usize = 4;

/// A file fully downloaded for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Where the bytes were written
    pub path: PathBuf,
    /// URL the bytes came from
    pub source_url: String,
}

impl FetchedFile {
    /// Create a new fetched-file record.
    pub fn new(path: impl Into<PathBuf>, source_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source_url: source_url.into(),
        }
    }
}

/// Capability to turn a post into local media files.
#[async_trait]
pub trait FetchMedia: Send + Sync {
    /// Download every usable media file for `post`.
    ///
    /// Returned files exist and passed validation. An `Err` means nothing
    /// usable was obtained; callers treat it as "no media".
    async fn fetch_for(&self, post: &Post) -> TootbotResult<Vec<FetchedFile>>;
}

/// Downloads media according to the post's [`ProviderKind`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tootbot_media::{MediaFetcher, ReqwestTransport};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = ReqwestTransport::new("tootbot/0.3", ReqwestTransport::DEFAULT_TIMEOUT)?;
/// let fetcher = MediaFetcher::new(Arc::new(transport), "media")
///     .with_max_images(4)
///     .with_imgur_client_id(Some("client-id".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MediaFetcher {
    transport: Arc<dyn HttpTransport>,
    media_dir: PathBuf,
    max_images: usize,
    imgur_client_id: Option<String>,
}

impl std::fmt::Debug for MediaFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFetcher")
            .field("media_dir", &self.media_dir)
            .field("max_images", &self.max_images)
            .field("imgur_configured", &self.imgur_client_id.is_some())
            .finish()
    }
}

impl MediaFetcher {
    /// Create a fetcher writing into `media_dir`.
    pub fn new(transport: Arc<dyn HttpTransport>, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            media_dir: media_dir.into(),
            max_images: DEFAULT_MAX_IMAGES,
            imgur_client_id: None,
        }
    }

    /// Cap the number of images taken from galleries and albums.
    pub fn with_max_images(mut self, max_images: usize) -> Self {
        self.max_images = max_images.max(1);
        self
    }

    /// Imgur API client id; Imgur links fail soft without one.
    pub fn with_imgur_client_id(mut self, client_id: Option<String>) -> Self {
        self.imgur_client_id = client_id.filter(|id| !id.trim().is_empty());
        self
    }

    /// Directory downloads are written to.
    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Image cap for galleries and albums.
    pub fn max_images(&self) -> usize {
        self.max_images
    }

    pub(crate) fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    pub(crate) fn imgur_client_id(&self) -> Option<&str> {
        self.imgur_client_id.as_deref()
    }

    /// Run the fetch strategy for `kind`.
    #[tracing::instrument(skip(self, post), fields(post_id = %post.id(), url = %post.url()))]
    pub async fn fetch(&self, kind: ProviderKind, post: &Post) -> TootbotResult<Vec<FetchedFile>> {
        tracing::debug!(provider = %kind, "Fetching media");
        match kind {
            ProviderKind::RedditGallery => reddit::fetch_gallery(self, post).await,
            ProviderKind::RedditHosted => reddit::fetch_hosted(self, post.url()).await.map(|f| vec![f]),
            ProviderKind::RedditVideo => reddit::fetch_video(self, post).await.map(|f| vec![f]),
            ProviderKind::Imgur => imgur::fetch(self, post.url()).await,
            ProviderKind::Gfycat => gfycat::fetch(self, post.url()).await.map(|f| vec![f]),
            ProviderKind::Giphy => giphy::fetch(self, post.url()).await.map(|f| vec![f]),
            ProviderKind::Generic => generic::fetch(self, post).await.map(|f| vec![f]),
        }
    }
}

#[async_trait]
impl FetchMedia for MediaFetcher {
    async fn fetch_for(&self, post: &Post) -> TootbotResult<Vec<FetchedFile>> {
        let kind = classify(post.url(), post);
        tracing::info!(post_id = %post.id(), provider = %kind, "Post links to media provider");
        self.fetch(kind, post).await
    }
}
