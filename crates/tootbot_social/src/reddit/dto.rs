//! Wire format of the public listing JSON.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Child {
    pub data: Submission,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Submission {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub spoiler: bool,
    #[serde(default)]
    pub stickied: bool,
    #[serde(default)]
    pub is_gallery: Option<bool>,
    #[serde(default)]
    pub gallery_data: Option<GalleryData>,
    #[serde(default)]
    pub media_metadata: Option<HashMap<String, MediaMetadata>>,
    #[serde(default)]
    pub media: Option<Media>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GalleryData {
    #[serde(default)]
    pub items: Vec<GalleryDataItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GalleryDataItem {
    pub media_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaMetadata {
    #[serde(default)]
    pub e: Option<String>,
    #[serde(default)]
    pub m: Option<String>,
    #[serde(default)]
    pub s: Option<MediaSource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaSource {
    #[serde(default)]
    pub u: Option<String>,
    #[serde(default)]
    pub x: Option<u32>,
    #[serde(default)]
    pub y: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Media {
    #[serde(default)]
    pub reddit_video: Option<RedditVideo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RedditVideo {
    pub fallback_url: String,
}
