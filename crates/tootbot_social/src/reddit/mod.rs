//! Subreddit listings.

mod client;
mod dto;

pub use client::{REDDIT_BASE_URL, RedditListing, parse_listing, unescape_html};
