use super::dto::{Account, Attachment, Status};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::path::Path;
use std::time::Duration;
use tootbot_core::{MediaHandle, PublishedPost};
use tootbot_error::{HttpError, PublishError, PublishErrorKind, TootbotResult};
use tootbot_interface::Publisher;
use tracing::{debug, error, info, instrument, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MEDIA_POLL_ATTEMPTS: u32 = 10;
const MEDIA_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Statuses fetched per page, and the most deleted per call.
pub const STATUS_PAGE_SIZE: u32 = 10;

/// Mastodon client authenticated with an access token.
#[derive(Clone)]
pub struct MastodonPublisher {
    client: Client,
    instance_url: String,
    access_token: String,
    caption_budget: usize,
}

impl std::fmt::Debug for MastodonPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MastodonPublisher")
            .field("instance_url", &self.instance_url)
            .field("caption_budget", &self.caption_budget)
            .finish()
    }
}

impl MastodonPublisher {
    /// Create a client for `instance_url`.
    ///
    /// # Errors
    ///
    /// Fails if the access token is empty or the HTTP client cannot be built.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        caption_budget: usize,
    ) -> TootbotResult<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(PublishError::new(PublishErrorKind::Auth(
                "no access token configured".to_string(),
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("tootbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token,
            caption_budget,
        })
    }

    /// Instance base URL, without trailing slash.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.instance_url, path)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        kind: fn(String) -> PublishErrorKind,
    ) -> TootbotResult<Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Request to Mastodon failed");
                HttpError::new(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::new(PublishErrorKind::Auth(format!("{}: {}", status, body))).into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Mastodon returned error");
            return Err(PublishError::new(kind(format!("{}: {}", status, body))).into());
        }
        Ok(response)
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> TootbotResult<T> {
        response.json().await.map_err(|e| {
            PublishError::new(PublishErrorKind::Response(format!(
                "Failed to parse response: {}",
                e
            )))
            .into()
        })
    }

    /// Fetch the authenticated account; used to check credentials at startup.
    #[instrument(skip(self), fields(instance = %self.instance_url))]
    pub async fn verify(&self) -> TootbotResult<Account> {
        let request = self
            .client
            .get(self.endpoint("/api/v1/accounts/verify_credentials"));
        let response = self.send(request, PublishErrorKind::Auth).await?;
        let account: Account = Self::json(response).await?;
        info!(username = %account.username(), "Logged in to Mastodon");
        Ok(account)
    }

    /// Delete one batch of the bot's statuses older than `days` days.
    ///
    /// Pages back through the account's statuses until a page ends with a
    /// status older than the cut-off, deletes the old statuses on that page
    /// and returns. At most [`STATUS_PAGE_SIZE`] statuses are deleted per
    /// call. Single deletion failures are logged and skipped.
    #[instrument(skip(self))]
    pub async fn delete_statuses_older_than(&self, days: u32) -> TootbotResult<usize> {
        let account = self.verify().await?;
        let cutoff = Utc::now() - ChronoDuration::days(i64::from(days));
        let statuses_path = format!("/api/v1/accounts/{}/statuses", account.id());

        let mut page = self.status_page(&statuses_path, None).await?;
        while let Some(last) = page.last() {
            if *last.created_at() < cutoff {
                break;
            }
            debug!(
                max_id = %last.id(),
                created_at = %last.created_at(),
                "Last status on page is not old enough"
            );
            let max_id = last.id().clone();
            page = self.status_page(&statuses_path, Some(&max_id)).await?;
        }

        let mut deleted = 0;
        for status in page.iter().filter(|s| *s.created_at() < cutoff) {
            let request = self
                .client
                .delete(self.endpoint(&format!("/api/v1/statuses/{}", status.id())));
            match self.send(request, PublishErrorKind::Status).await {
                Ok(_) => {
                    info!(url = %status.public_url(), created_at = %status.created_at(), "Deleted status");
                    deleted += 1;
                }
                Err(e) => warn!(status_id = %status.id(), error = %e, "Could not delete status"),
            }
        }

        info!(deleted, days, "Removed old statuses");
        Ok(deleted)
    }

    async fn status_page(&self, path: &str, max_id: Option<&str>) -> TootbotResult<Vec<Status>> {
        let mut url = format!("{}?limit={}", self.endpoint(path), STATUS_PAGE_SIZE);
        if let Some(max_id) = max_id {
            url.push_str(&format!("&max_id={}", max_id));
        }
        let response = self.send(self.client.get(&url), PublishErrorKind::Response).await?;
        Self::json(response).await
    }

    async fn wait_for_processing(&self, attachment: Attachment) -> TootbotResult<Attachment> {
        let mut attachment = attachment;
        for _ in 0..MEDIA_POLL_ATTEMPTS {
            if attachment.url.is_some() {
                return Ok(attachment);
            }
            tokio::time::sleep(MEDIA_POLL_INTERVAL).await;
            let request = self
                .client
                .get(self.endpoint(&format!("/api/v1/media/{}", attachment.id)));
            let response = self.send(request, PublishErrorKind::Upload).await?;
            attachment = Self::json(response).await?;
        }
        warn!(media_id = %attachment.id, "Media still processing, attaching anyway");
        Ok(attachment)
    }
}

/// Content type for an upload, by file extension.
///
/// ```
/// use std::path::Path;
/// use tootbot_social::mime_for_path;
///
/// assert_eq!(mime_for_path(Path::new("a/b.JPG")), "image/jpeg");
/// assert_eq!(mime_for_path(Path::new("clip.mp4")), "video/mp4");
/// ```
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Publisher for MastodonPublisher {
    #[instrument(skip(self), fields(path = %local_path.display()))]
    async fn upload_media(&self, local_path: &Path) -> TootbotResult<MediaHandle> {
        let bytes = tokio::fs::read(local_path).await.map_err(|e| {
            PublishError::new(PublishErrorKind::Upload(format!(
                "{}: {}",
                local_path.display(),
                e
            )))
        })?;
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for_path(local_path))
            .map_err(|e| PublishError::new(PublishErrorKind::Upload(e.to_string())))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self.client.post(self.endpoint("/api/v2/media")).multipart(form);
        let response = self.send(request, PublishErrorKind::Upload).await?;
        let attachment: Attachment = Self::json(response).await?;
        let attachment = self.wait_for_processing(attachment).await?;

        debug!(media_id = %attachment.id, "Uploaded media");
        Ok(MediaHandle(attachment.id))
    }

    #[instrument(skip(self, caption, media), fields(media_count = media.len()))]
    async fn publish(
        &self,
        caption: &str,
        media: &[MediaHandle],
        nsfw: bool,
    ) -> TootbotResult<PublishedPost> {
        let mut params: Vec<(&str, String)> = vec![("status", caption.to_string())];
        params.extend(media.iter().map(|handle| ("media_ids[]", handle.0.clone())));
        params.push(("sensitive", nsfw.to_string()));

        let request = self.client.post(self.endpoint("/api/v1/statuses")).form(&params);
        let response = self.send(request, PublishErrorKind::Status).await?;
        let status: Status = Self::json(response).await?;

        info!(url = %status.public_url(), "Posted to Mastodon");
        Ok(PublishedPost {
            id: status.id().clone(),
            url: status.public_url().to_string(),
        })
    }

    async fn delete_older_than(&self, days: u32) -> TootbotResult<usize> {
        self.delete_statuses_older_than(days).await
    }

    fn caption_budget(&self) -> usize {
        self.caption_budget
    }

    fn platform_name(&self) -> &str {
        "mastodon"
    }
}
