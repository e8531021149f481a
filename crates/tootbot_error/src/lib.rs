//! Error types for the Tootbot content relay.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use tootbot_error::{HttpError, TootbotResult};
//!
//! fn fetch_listing() -> TootbotResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! assert!(fetch_listing().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod ledger;
mod media;
mod publish;

pub use config::ConfigError;
pub use error::{TootbotError, TootbotErrorKind, TootbotResult};
pub use http::HttpError;
pub use ledger::{LedgerError, LedgerErrorKind};
pub use media::{MediaError, MediaErrorKind};
pub use publish::{PublishError, PublishErrorKind};
