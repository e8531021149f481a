//! Capability traits for Tootbot's outer collaborators.
//!
//! The publication pipeline only talks to the outside world through these
//! traits, so listing sources and destinations can be swapped (or mocked)
//! without touching the gate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{CheckKind, Heartbeat, ListingSource, NoOpHeartbeat, Publisher};
