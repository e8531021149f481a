//! Mock collaborators for gate and scheduler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tootbot_core::{MediaHandle, Post, PostBuilder, PublishedPost};
use tootbot_error::{PublishError, PublishErrorKind, TootbotResult};
use tootbot_interface::{CheckKind, Heartbeat, ListingSource, Publisher};
use tootbot_media::{FetchMedia, FetchedFile};

pub fn post(id: &str, url: &str, title: &str) -> Post {
    PostBuilder::default()
        .id(id.to_string())
        .url(url.to_string())
        .title(title.to_string())
        .shortlink(format!("https://redd.it/{}", id))
        .build()
        .expect("valid post")
}

pub fn nsfw_post(id: &str, url: &str) -> Post {
    PostBuilder::default()
        .id(id.to_string())
        .url(url.to_string())
        .title("Spicy".to_string())
        .shortlink(format!("https://redd.it/{}", id))
        .is_nsfw(true)
        .build()
        .expect("valid post")
}

/// Writes the configured files for a post id into the media directory.
pub struct MockFetcher {
    dir: PathBuf,
    media: HashMap<String, Vec<(String, String)>>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            media: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Files `(name, contents)` returned for `post_id`.
    pub fn with_media(mut self, post_id: &str, files: &[(&str, &str)]) -> Self {
        self.media.insert(
            post_id.to_string(),
            files
                .iter()
                .map(|(name, contents)| (name.to_string(), contents.to_string()))
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchMedia for MockFetcher {
    async fn fetch_for(&self, post: &Post) -> TootbotResult<Vec<FetchedFile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let files = self.media.get(post.id()).cloned().unwrap_or_default();
        Ok(files
            .into_iter()
            .map(|(name, contents)| {
                let path = self.dir.join(&name);
                std::fs::write(&path, contents).expect("write media");
                FetchedFile::new(path, format!("https://i.redd.it/{}", name))
            })
            .collect())
    }
}

/// A published status as seen by the mock destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub caption: String,
    pub media: Vec<MediaHandle>,
    pub nsfw: bool,
}

pub struct MockPublisher {
    budget: usize,
    fail_publish: bool,
    uploads: Mutex<Vec<PathBuf>>,
    published: Mutex<Vec<Published>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            budget: 500,
            fail_publish: false,
            uploads: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_publish: true,
            ..Self::new()
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn upload_media(&self, local_path: &Path) -> TootbotResult<MediaHandle> {
        assert!(local_path.exists(), "uploaded file must exist");
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(local_path.to_path_buf());
        Ok(MediaHandle(format!("media-{}", uploads.len())))
    }

    async fn publish(
        &self,
        caption: &str,
        media: &[MediaHandle],
        nsfw: bool,
    ) -> TootbotResult<PublishedPost> {
        if self.fail_publish {
            return Err(PublishError::new(PublishErrorKind::Status(
                "422: Validation failed".to_string(),
            ))
            .into());
        }
        let mut published = self.published.lock().unwrap();
        published.push(Published {
            caption: caption.to_string(),
            media: media.to_vec(),
            nsfw,
        });
        let id = published.len().to_string();
        Ok(PublishedPost {
            url: format!("https://mastodon.example/@bot/{}", id),
            id,
        })
    }

    fn caption_budget(&self) -> usize {
        self.budget
    }

    fn platform_name(&self) -> &str {
        "mock"
    }
}

/// Serves fixed posts per subreddit.
#[derive(Default)]
pub struct MockListing {
    posts: HashMap<String, Vec<Post>>,
    requests: Mutex<Vec<(String, usize)>>,
}

impl MockListing {
    pub fn with_posts(mut self, subreddit: &str, posts: Vec<Post>) -> Self {
        self.posts.insert(subreddit.to_string(), posts);
        self
    }

    pub fn requests(&self) -> Vec<(String, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingSource for MockListing {
    async fn fetch_posts(&self, source_name: &str, limit: usize) -> TootbotResult<Vec<Post>> {
        self.requests
            .lock()
            .unwrap()
            .push((source_name.to_string(), limit));
        Ok(self.posts.get(source_name).cloned().unwrap_or_default())
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}

#[derive(Default)]
pub struct RecordingHeartbeat {
    checks: Mutex<Vec<(CheckKind, Option<String>)>>,
}

impl RecordingHeartbeat {
    pub fn checks(&self) -> Vec<(CheckKind, Option<String>)> {
        self.checks.lock().unwrap().clone()
    }
}

#[async_trait]
impl Heartbeat for RecordingHeartbeat {
    async fn check(&self, kind: CheckKind, data: Option<&str>) {
        self.checks
            .lock()
            .unwrap()
            .push((kind, data.map(str::to_string)));
    }
}
