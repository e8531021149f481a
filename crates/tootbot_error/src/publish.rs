//! Destination publishing error types.

/// Kinds of publishing errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PublishErrorKind {
    /// Media upload was rejected
    #[display("Media upload failed: {}", _0)]
    Upload(String),
    /// Status post was rejected
    #[display("Status post failed: {}", _0)]
    Status(String),
    /// Credentials missing or refused
    #[display("Authentication failed: {}", _0)]
    Auth(String),
    /// Destination answered with an unexpected body
    #[display("Unexpected response: {}", _0)]
    Response(String),
}

/// Publishing error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    /// The kind of error that occurred
    pub kind: PublishErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PublishError {
    /// Create a new publishing error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
