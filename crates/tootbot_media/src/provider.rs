//! Hosting provider classification.

use tootbot_core::Post;

/// Where a post's media lives.
///
/// Variants are listed in classification priority order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum ProviderKind {
    /// Multi-image gallery hosted by the listing site
    #[display("reddit gallery")]
    RedditGallery,
    /// Image hosted by the listing site
    #[display("reddit image")]
    RedditHosted,
    /// Video hosted by the listing site
    #[display("reddit video")]
    RedditVideo,
    /// Imgur image or album
    #[display("imgur")]
    Imgur,
    /// Gfycat clip
    #[display("gfycat")]
    Gfycat,
    /// Giphy animation
    #[display("giphy")]
    Giphy,
    /// Anything else; resolved by MIME type
    #[display("generic")]
    Generic,
}

const URL_RULES: &[(&[&str], ProviderKind)] = &[
    (&["i.redd.it", "i.reddituploads.com"], ProviderKind::RedditHosted),
    (&["v.redd.it"], ProviderKind::RedditVideo),
    (&["imgur.com"], ProviderKind::Imgur),
    (&["gfycat.com"], ProviderKind::Gfycat),
    (&["giphy.com"], ProviderKind::Giphy),
];

/// Classify a post's media provider.
///
/// The gallery flag wins over the URL; otherwise the first URL rule whose
/// marker is a substring of `url` decides, falling back to
/// [`ProviderKind::Generic`].
///
/// # Examples
///
/// ```
/// use tootbot_core::PostBuilder;
/// use tootbot_media::{classify, ProviderKind};
///
/// let post = PostBuilder::default()
///     .id("p".to_string())
///     .url("https://v.redd.it/abc".to_string())
///     .title("t".to_string())
///     .shortlink("https://redd.it/p".to_string())
///     .build()
///     .unwrap();
/// assert_eq!(classify(post.url(), &post), ProviderKind::RedditVideo);
/// ```
pub fn classify(url: &str, post: &Post) -> ProviderKind {
    if *post.is_gallery() {
        return ProviderKind::RedditGallery;
    }

    URL_RULES
        .iter()
        .find(|(markers, _)| markers.iter().any(|marker| url.contains(marker)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ProviderKind::Generic)
}
