//! Configuration error types.

/// The configuration could not be loaded or is unusable.
///
/// Raised while layering `tootbot.toml` and `TOOTBOT__*` variables, when a
/// required key such as `mastodon.access_token` is missing, and when a loaded
/// value breaks a startup check (zero caption budget, zero image cap, a
/// non-http instance URL). These errors end the process before any cycle runs.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What is wrong, naming the offending key where possible
    pub message: String,
    /// Line number where the error was raised
    pub line: u32,
    /// File where the error was raised
    pub file: &'static str,
}

impl ConfigError {
    /// Record a configuration problem at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use tootbot_error::{ConfigError, TootbotError, TootbotErrorKind};
    ///
    /// let err: TootbotError = ConfigError::new("mastodon.caption_budget must be greater than 0").into();
    /// assert!(matches!(err.kind(), TootbotErrorKind::Config(e) if e.message.contains("caption_budget")));
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
