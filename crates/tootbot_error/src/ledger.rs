//! Ledger error types.

/// Kinds of ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LedgerErrorKind {
    /// Failed to create or open the ledger file
    #[display("Failed to open ledger: {}", _0)]
    Open(String),
    /// Failed to read rows from the ledger
    #[display("Failed to read ledger: {}", _0)]
    Read(String),
    /// Failed to append or flush a row
    #[display("Failed to write ledger: {}", _0)]
    Write(String),
    /// A row did not have the expected shape
    #[display("Malformed ledger row: {}", _0)]
    Parse(String),
}

/// Ledger error with location tracking.
///
/// # Examples
///
/// ```
/// use tootbot_error::{LedgerError, LedgerErrorKind};
///
/// let err = LedgerError::new(LedgerErrorKind::Open("cache.csv".to_string()));
/// assert!(format!("{}", err).contains("open ledger"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ledger Error: {} at line {} in {}", kind, line, file)]
pub struct LedgerError {
    /// The kind of error that occurred
    pub kind: LedgerErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LedgerError {
    /// Create a new ledger error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LedgerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
