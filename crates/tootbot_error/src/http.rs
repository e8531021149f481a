//! Errors talking to remote hosts.

/// A remote host could not be reached or answered with something unreadable.
///
/// Covers every network hop the bot makes: listing requests, media downloads,
/// Mastodon calls and Healthchecks pings, plus listing bodies that do not
/// decode as a listing document. HTTP status failures of a specific
/// operation use that operation's kind instead (for example
/// `MediaErrorKind::DownloadFailed` or `PublishErrorKind::Status`).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// What failed, including the URL where one is known
    pub message: String,
    /// Line number where the error was raised
    pub line: u32,
    /// File where the error was raised
    pub file: &'static str,
}

impl HttpError {
    /// Record a transport or decoding failure at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use tootbot_error::HttpError;
    ///
    /// let err = HttpError::new("GET https://www.reddit.com/r/pics/top.json failed: timed out");
    /// assert!(err.message.contains("r/pics"));
    /// assert!(err.to_string().starts_with("HTTP Error: GET"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
