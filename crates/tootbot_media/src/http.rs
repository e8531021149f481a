//! HTTP transport seam.
//!
//! Every provider fetch goes through [`HttpTransport`], so the resolver logic
//! can be exercised against canned responses.

use async_trait::async_trait;
use std::time::Duration;
use tootbot_error::{HttpError, TootbotResult};

/// A fully received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// `Content-Type` header without parameters, lower-cased
    pub content_type: Option<String>,
    /// Complete response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response from its parts, normalizing the content type.
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.map(normalize_content_type),
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Strip parameters from a content type (`image/jpeg; q=1` → `image/jpeg`).
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// HTTP client interface used by the media pipeline.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` with extra request headers and return the complete response.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only
    /// transport failures (connect, timeout, body read) are `Err`.
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> TootbotResult<HttpResponse>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Build a transport with the given user agent and timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> TootbotResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[tracing::instrument(skip(self, headers))]
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> TootbotResult<HttpResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(format!("Reading body of {} failed: {}", url, e)))?;

        tracing::debug!(status, size = body.len(), "Received response");
        Ok(HttpResponse::new(status, content_type.as_deref(), body.to_vec()))
    }
}
