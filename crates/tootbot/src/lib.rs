//! Tootbot - subreddit to Mastodon relay
//!
//! Tootbot polls subreddit listings, downloads the media each post links to
//! (hosted images, videos and galleries, Imgur, Gfycat, Giphy, or any direct
//! media link), and posts it to a Mastodon account. A CSV ledger of post
//! ids, URLs and media checksums guarantees nothing is published twice, even
//! when the same picture shows up under a different post.
//!
//! # Architecture
//!
//! - `tootbot_error` - Error types
//! - `tootbot_core` - Post and media data types
//! - `tootbot_interface` - `ListingSource`, `Publisher` and `Heartbeat` traits
//! - `tootbot_ledger` - CSV ledger (`ContentStore`)
//! - `tootbot_media` - Provider classification, downloads, fingerprints
//! - `tootbot_social` - Reddit, Mastodon and Healthchecks clients
//! - `tootbot_bot` - Configuration, publication gate and scheduler
//!
//! This crate re-exports everything and wires the pieces together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;

pub use app::{USER_AGENT, build_scheduler};

pub use tootbot_bot::*;
pub use tootbot_core::*;
pub use tootbot_error::*;
pub use tootbot_interface::*;
pub use tootbot_ledger::*;
pub use tootbot_media::*;
pub use tootbot_social::*;
