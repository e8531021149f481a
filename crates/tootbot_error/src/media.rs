//! Media resolution and download error types.

/// Kinds of media errors.
///
/// None of these are fatal to a polling cycle: the attachment builder logs
/// them and carries on without the asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// Provider pattern did not yield an identifier
    #[display("Could not identify {} ID in URL: {}", provider, url)]
    UnidentifiedId {
        /// Provider whose pattern failed
        provider: String,
        /// URL that was inspected
        url: String,
    },
    /// Remote content is not one of the accepted MIME types
    #[display("Not a valid media type ({}): {}", mime, url)]
    InvalidMediaType {
        /// Reported content type
        mime: String,
        /// URL that was inspected
        url: String,
    },
    /// URL is not an absolute http(s) link
    #[display("Malformed URL: {}", _0)]
    MalformedUrl(String),
    /// Download returned a non-success status
    #[display("Download of {} failed with status {}", url, status)]
    DownloadFailed {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },
    /// Video post without a fallback payload
    #[display("No video payload for post {}", _0)]
    MissingVideo(String),
    /// A `.gif` asset decoded as something else (usually a still preview)
    #[display("Not an animated GIF: {}", _0)]
    NotAnimated(String),
    /// Asset matches a known provider placeholder
    #[display("Placeholder asset: {}", _0)]
    Placeholder(String),
    /// Filesystem failure while storing or hashing
    #[display("Media I/O error: {}", _0)]
    Io(String),
    /// Page scraping found nothing usable
    #[display("Scrape failed: {}", _0)]
    Scrape(String),
    /// Imgur API rejected or failed a lookup
    #[display("Imgur API error: {}", _0)]
    ImgurApi(String),
}

/// Media error with location tracking.
///
/// # Examples
///
/// ```
/// use tootbot_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::MalformedUrl("/r/pics".to_string()));
/// assert!(format!("{}", err).contains("Malformed URL"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
