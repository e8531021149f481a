//! Listing post records.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Declared kind of a gallery entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
)]
pub enum GalleryMediaKind {
    /// Still image, downloadable as-is
    #[display("Image")]
    Image,
    /// Animated image (served as GIF/MP4 renditions)
    #[display("AnimatedImage")]
    AnimatedImage,
    /// Hosted video
    #[display("RedditVideo")]
    RedditVideo,
    /// Anything the listing reports that we do not handle
    #[display("Unknown")]
    #[serde(other)]
    #[strum(disabled)]
    Unknown,
}

/// One entry of a gallery post.
///
/// # Examples
///
/// ```
/// use tootbot_core::{GalleryItemBuilder, GalleryMediaKind};
///
/// let item = GalleryItemBuilder::default()
///     .media_id("abc".to_string())
///     .kind(GalleryMediaKind::Image)
///     .mime_type("image/png".to_string())
///     .source_url("https://i.redd.it/abc.png".to_string())
///     .build()
///     .unwrap();
/// assert_eq!(item.mime_subtype(), Some("png"));
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize, derive_builder::Builder,
)]
pub struct GalleryItem {
    /// Provider media identifier
    media_id: String,
    /// Declared media kind
    kind: GalleryMediaKind,
    /// Declared MIME type, e.g. `image/jpg`
    mime_type: String,
    /// Full-size source URL
    source_url: String,
    /// Width in pixels
    #[builder(default)]
    #[serde(default)]
    width: u32,
    /// Height in pixels
    #[builder(default)]
    #[serde(default)]
    height: u32,
}

impl GalleryItem {
    /// MIME subtype (the part after `/`), used as the file extension.
    pub fn mime_subtype(&self) -> Option<&str> {
        self.mime_type
            .split_once('/')
            .map(|(_, sub)| sub)
            .filter(|sub| !sub.is_empty())
    }
}

/// A submission read from a listing source.
///
/// Built once per polling cycle and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use tootbot_core::PostBuilder;
///
/// let post = PostBuilder::default()
///     .id("abc123".to_string())
///     .url("https://i.redd.it/xyz.jpg".to_string())
///     .title("Cool cat".to_string())
///     .shortlink("https://redd.it/abc123".to_string())
///     .build()
///     .unwrap();
/// assert!(!post.is_gallery());
/// assert!(post.gallery_items().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
pub struct Post {
    /// Listing identifier
    id: String,
    /// Linked URL (media, external page, or the post itself)
    url: String,
    /// Post title
    title: String,
    /// Canonical short link back to the post
    shortlink: String,
    /// Marked not-safe-for-work
    #[builder(default)]
    #[serde(default)]
    is_nsfw: bool,
    /// Text-only post
    #[builder(default)]
    #[serde(default)]
    is_self: bool,
    /// Marked as spoiler
    #[builder(default)]
    #[serde(default)]
    is_spoiler: bool,
    /// Pinned by moderators
    #[builder(default)]
    #[serde(default)]
    is_stickied: bool,
    /// Multi-image gallery post
    #[builder(default)]
    #[serde(default)]
    is_gallery: bool,
    /// Gallery entries, in listing order
    #[builder(default)]
    #[serde(default)]
    gallery_items: Vec<GalleryItem>,
    /// MP4 rendition of a hosted video
    #[builder(default)]
    #[serde(default)]
    video_fallback_url: Option<String>,
}
