use super::dto::{Listing, Submission};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tootbot_core::{GalleryItem, GalleryItemBuilder, GalleryMediaKind, Post, PostBuilder};
use tootbot_error::{HttpError, TootbotResult};
use tootbot_interface::ListingSource;
use tootbot_media::HttpTransport;
use tracing::{debug, instrument, warn};

/// Default listing host.
pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// Reads the daily top listing of a subreddit.
///
/// Uses the unauthenticated JSON endpoint, so the transport's user agent
/// should identify the bot.
#[derive(Clone)]
pub struct RedditListing {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl std::fmt::Debug for RedditListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditListing")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RedditListing {
    /// Create a listing client against [`REDDIT_BASE_URL`].
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: REDDIT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Listing URL for `subreddit`.
    pub fn listing_url(&self, subreddit: &str, limit: usize) -> String {
        format!(
            "{}/r/{}/top.json?t=day&limit={}",
            self.base_url, subreddit, limit
        )
    }
}

#[async_trait]
impl ListingSource for RedditListing {
    #[instrument(skip(self))]
    async fn fetch_posts(&self, source_name: &str, limit: usize) -> TootbotResult<Vec<Post>> {
        let url = self.listing_url(source_name, limit);
        let response = match self.transport.get(&url, &[]).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Error retrieving posts from subreddit");
                return Ok(Vec::new());
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "Subreddit listing request failed");
            return Ok(Vec::new());
        }

        match parse_listing(&response.body) {
            Ok(posts) => {
                debug!(count = posts.len(), "Retrieved posts");
                Ok(posts)
            }
            Err(e) => {
                warn!(error = %e, "Could not parse subreddit listing");
                Ok(Vec::new())
            }
        }
    }

    fn source_name(&self) -> &str {
        "reddit"
    }
}

/// Parse a listing JSON body into posts, in listing order.
///
/// Entries that cannot be turned into a [`Post`] are skipped.
///
/// # Errors
///
/// Returns an error if the body is not a listing document.
pub fn parse_listing(body: &[u8]) -> TootbotResult<Vec<Post>> {
    let listing: Listing = serde_json::from_slice(body)
        .map_err(|e| HttpError::new(format!("Invalid listing JSON: {}", e)))?;

    Ok(listing
        .data
        .children
        .into_iter()
        .filter_map(|child| {
            let id = child.data.id.clone();
            let post = to_post(child.data);
            if post.is_none() {
                warn!(post_id = %id, "Skipping malformed listing entry");
            }
            post
        })
        .collect())
}

fn to_post(submission: Submission) -> Option<Post> {
    let gallery_items = gallery_items(&submission);
    let video_fallback_url = submission
        .media
        .and_then(|media| media.reddit_video)
        .map(|video| video.fallback_url);

    PostBuilder::default()
        .shortlink(format!("https://redd.it/{}", submission.id))
        .id(submission.id)
        .url(submission.url.map(|u| unescape_html(&u)).unwrap_or_default())
        .title(unescape_html(&submission.title))
        .is_nsfw(submission.over_18)
        .is_self(submission.is_self)
        .is_spoiler(submission.spoiler)
        .is_stickied(submission.stickied)
        .is_gallery(submission.is_gallery.unwrap_or(false))
        .gallery_items(gallery_items)
        .video_fallback_url(video_fallback_url)
        .build()
        .ok()
}

fn gallery_items(submission: &Submission) -> Vec<GalleryItem> {
    let (Some(gallery), Some(metadata)) = (&submission.gallery_data, &submission.media_metadata)
    else {
        return Vec::new();
    };

    gallery
        .items
        .iter()
        .filter_map(|item| {
            let meta = metadata.get(&item.media_id)?;
            let source = meta.s.as_ref()?;
            let kind = meta
                .e
                .as_deref()
                .and_then(|e| GalleryMediaKind::from_str(e).ok())
                .unwrap_or(GalleryMediaKind::Unknown);
            GalleryItemBuilder::default()
                .media_id(item.media_id.clone())
                .kind(kind)
                .mime_type(meta.m.clone().unwrap_or_default())
                .source_url(unescape_html(source.u.as_deref()?))
                .width(source.x.unwrap_or_default())
                .height(source.y.unwrap_or_default())
                .build()
                .ok()
        })
        .collect()
}

/// Undo the entity escaping the listing applies to titles and URLs.
///
/// ```
/// use tootbot_social::unescape_html;
///
/// assert_eq!(unescape_html("a.jpg?w=1&amp;s=2"), "a.jpg?w=1&s=2");
/// ```
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
