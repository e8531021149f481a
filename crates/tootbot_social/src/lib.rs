//! Platform clients for Tootbot.
//!
//! - [`RedditListing`] reads subreddit listings through the public JSON API.
//! - [`MastodonPublisher`] uploads media and posts statuses.
//! - [`HealthChecks`] reports liveness to a Healthchecks.io style endpoint.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod healthchecks;
mod mastodon;
mod reddit;

pub use healthchecks::{HEARTBEAT_TIMEOUT, HealthChecks};
pub use mastodon::{Account, MastodonPublisher, STATUS_PAGE_SIZE, Status, mime_for_path};
pub use reddit::{REDDIT_BASE_URL, RedditListing, parse_listing, unescape_html};
