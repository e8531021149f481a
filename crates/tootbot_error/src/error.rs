//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, LedgerError, MediaError, PublishError};

/// Union of every error the relay can produce.
///
/// # Examples
///
/// ```
/// use tootbot_error::{HttpError, TootbotError};
///
/// let err: TootbotError = HttpError::new("Connection failed").into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TootbotErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Dedup ledger error
    #[from(LedgerError)]
    Ledger(LedgerError),
    /// Media resolution error
    #[from(MediaError)]
    Media(MediaError),
    /// Destination publishing error
    #[from(PublishError)]
    Publish(PublishError),
}

/// Tootbot error with kind discrimination.
///
/// # Examples
///
/// ```
/// use tootbot_error::{ConfigError, TootbotResult};
///
/// fn might_fail() -> TootbotResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Tootbot Error: {}", _0)]
pub struct TootbotError(Box<TootbotErrorKind>);

impl TootbotError {
    /// Create a new error from a kind.
    pub fn new(kind: TootbotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TootbotErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to TootbotErrorKind
impl<T> From<T> for TootbotError
where
    T: Into<TootbotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Tootbot operations.
pub type TootbotResult<T> = std::result::Result<T, TootbotError>;
