//! Core data types for Tootbot.
//!
//! This crate holds the records that flow between the listing source, the
//! media pipeline and the destination publisher:
//!
//! - [`Post`]: one submission read from a listing, immutable once built
//! - [`GalleryItem`]: one image of a multi-image gallery post
//! - [`MediaHandle`] / [`PublishedPost`]: what a destination hands back

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod post;
mod publish;

pub use post::{GalleryItem, GalleryItemBuilder, GalleryMediaKind, Post, PostBuilder};
pub use publish::{MediaHandle, PublishedPost};
