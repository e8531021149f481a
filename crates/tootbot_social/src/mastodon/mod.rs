//! Mastodon destination.

mod client;
mod dto;

pub use client::{MastodonPublisher, STATUS_PAGE_SIZE, mime_for_path};
pub use dto::{Account, Status};
