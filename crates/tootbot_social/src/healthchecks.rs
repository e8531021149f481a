//! Healthchecks.io liveness pings.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tootbot_error::{HttpError, TootbotResult};
use tootbot_interface::{CheckKind, Heartbeat};
use tracing::{debug, error};

/// Per-ping timeout.
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(3);

/// Sends check-ins to `<base_url><uuid>`.
#[derive(Debug, Clone)]
pub struct HealthChecks {
    client: Client,
    base_url: String,
    uuid: String,
}

impl HealthChecks {
    /// Create a heartbeat for the check `uuid` on `base_url`.
    pub fn new(base_url: impl Into<String>, uuid: impl Into<String>) -> TootbotResult<Self> {
        let client = Client::builder()
            .timeout(HEARTBEAT_TIMEOUT)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            uuid: uuid.into(),
        })
    }

    /// Ping URL for a check kind.
    ///
    /// ```
    /// use tootbot_interface::CheckKind;
    /// use tootbot_social::HealthChecks;
    ///
    /// let hc = HealthChecks::new("https://hc-ping.com", "1234").unwrap();
    /// assert_eq!(hc.check_url(CheckKind::Start), "https://hc-ping.com/1234/start");
    /// assert_eq!(hc.check_url(CheckKind::Ok), "https://hc-ping.com/1234");
    /// ```
    pub fn check_url(&self, kind: CheckKind) -> String {
        let suffix = match kind {
            CheckKind::Start => "/start",
            CheckKind::Ok => "",
            CheckKind::Fail => "/fail",
        };
        format!("{}{}{}", self.base_url, self.uuid, suffix)
    }
}

#[async_trait]
impl Heartbeat for HealthChecks {
    async fn check(&self, kind: CheckKind, data: Option<&str>) {
        let url = self.check_url(kind);
        let request = self.client.put(&url).body(data.unwrap_or_default().to_string());
        match request.send().await {
            Ok(response) if response.status().is_success() => {
                debug!(check = %kind, data, "Healthchecks check-in sent");
            }
            Ok(response) => {
                error!(check = %kind, status = %response.status(), "Healthchecks check-in rejected");
            }
            Err(e) => {
                error!(check = %kind, error = %e, "During Healthchecks check-in");
            }
        }
    }
}
