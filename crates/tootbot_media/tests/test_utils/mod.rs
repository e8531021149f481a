//! Test utilities for media tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tootbot_core::{GalleryItem, GalleryItemBuilder, GalleryMediaKind, Post, PostBuilder};
use tootbot_error::{HttpError, TootbotResult};
use tootbot_media::{HttpResponse, HttpTransport};

/// Minimal bytes that sniff as each format.
pub const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00";

/// Transport serving canned responses; unknown URLs get a 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, HttpResponse>,
    failing: Vec<String>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, url: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes
            .insert(url.to_string(), HttpResponse::new(200, Some(content_type), body));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.routes
            .insert(url.to_string(), HttpResponse::new(status, None, Vec::new()));
        self
    }

    /// Simulate a connection failure for `url`.
    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn headers_for(&self, url: &str) -> Vec<(String, String)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(requested, _)| requested == url)
            .map(|(_, headers)| headers.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> TootbotResult<HttpResponse> {
        self.requests.lock().unwrap().push((
            url.to_string(),
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        if self.failing.iter().any(|failing| failing == url) {
            return Err(HttpError::new(format!("connection refused: {}", url)).into());
        }
        Ok(self
            .routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, Some("text/html"), "not found")))
    }
}

pub fn post(id: &str, url: &str) -> Post {
    PostBuilder::default()
        .id(id.to_string())
        .url(url.to_string())
        .title(format!("Post {}", id))
        .shortlink(format!("https://redd.it/{}", id))
        .build()
        .expect("valid post")
}

pub fn gallery_item(media_id: &str, source_url: &str) -> GalleryItem {
    GalleryItemBuilder::default()
        .media_id(media_id.to_string())
        .kind(GalleryMediaKind::Image)
        .mime_type("image/jpg".to_string())
        .source_url(source_url.to_string())
        .build()
        .expect("valid gallery item")
}
