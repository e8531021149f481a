//! Bot configuration.
//!
//! Settings come from a TOML file layered under `TOOTBOT__*` environment
//! variables, e.g. `TOOTBOT__MASTODON__ACCESS_TOKEN`.

use crate::{GatePolicy, ScheduleSettings};
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tootbot_error::{ConfigError, TootbotError, TootbotResult};
use tracing::{debug, instrument, warn};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tootbot.toml";

const ENV_PREFIX: &str = "TOOTBOT";

/// General bot behaviour.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct BotConfig {
    /// CSV ledger of published content
    #[serde(default = "default_ledger_file")]
    ledger_file: PathBuf,

    /// Seconds between polling cycles
    #[serde(default = "default_delay_between_posts")]
    delay_between_posts: u64,

    /// Stop after the first cycle
    #[serde(default)]
    run_once_only: bool,

    /// Hashtags added to every caption
    #[serde(default)]
    hashtags: Vec<String>,

    /// Posts requested per subreddit and cycle
    #[serde(default = "default_post_limit")]
    post_limit: usize,
}

fn default_ledger_file() -> PathBuf {
    PathBuf::from("cache.csv")
}

fn default_delay_between_posts() -> u64 {
    900
}

fn default_post_limit() -> usize {
    10
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            ledger_file: default_ledger_file(),
            delay_between_posts: default_delay_between_posts(),
            run_once_only: false,
            hashtags: Vec::new(),
            post_limit: default_post_limit(),
        }
    }
}

/// Which listing posts are eligible at all.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct FilterConfig {
    /// Allow posts flagged NSFW
    #[serde(default)]
    nsfw_allowed: bool,

    /// Mark NSFW posts sensitive on the destination
    #[serde(default = "default_true")]
    nsfw_marked: bool,

    /// Allow spoiler posts
    #[serde(default)]
    spoilers_allowed: bool,

    /// Allow text-only posts
    #[serde(default)]
    self_posts_allowed: bool,

    /// Allow posts pinned by moderators
    #[serde(default)]
    stickied_allowed: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            nsfw_allowed: false,
            nsfw_marked: true,
            spoilers_allowed: false,
            self_posts_allowed: false,
            stickied_allowed: false,
        }
    }
}

/// Media download settings.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct MediaConfig {
    /// Download directory
    #[serde(default = "default_media_folder")]
    folder: PathBuf,

    /// Skip posts without media instead of posting text only
    #[serde(default = "default_true")]
    media_only: bool,

    /// Images taken from one gallery or album
    #[serde(default = "default_max_images")]
    max_images: usize,

    /// SHA-256 digests of known provider placeholder images
    #[serde(default)]
    placeholder_checksums: Vec<String>,
}

fn default_media_folder() -> PathBuf {
    PathBuf::from("media")
}

fn default_max_images() -> usize {
    tootbot_media::DEFAULT_MAX_IMAGES
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            folder: default_media_folder(),
            media_only: true,
            max_images: default_max_images(),
            placeholder_checksums: Vec::new(),
        }
    }
}

/// Periodic promotional message.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct PromoConfig {
    /// Add the message to every Nth post; zero or less disables it
    #[serde(default)]
    every: i64,

    /// Message text
    #[serde(default)]
    message: String,
}

/// Destination account and posting policy.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct MastodonConfig {
    /// Instance base URL, e.g. `https://mastodon.social`
    instance_url: String,

    /// Access token of the bot account
    access_token: String,

    /// Maximum caption length
    #[serde(default = "default_caption_budget")]
    caption_budget: usize,

    /// Mark every post sensitive
    #[serde(default)]
    sensitive_media: bool,

    /// Delete own statuses older than this many days; 0 keeps everything
    #[serde(default)]
    delete_after_days: u32,

    /// Sleep longer after destination errors
    #[serde(default = "default_true")]
    throttling_enabled: bool,

    /// Upper bound in seconds for one cycle's total sleep when throttling
    #[serde(default = "default_throttling_max_delay")]
    throttling_max_delay: u64,
}

fn default_caption_budget() -> usize {
    500
}

fn default_throttling_max_delay() -> u64 {
    3600
}

/// Imgur API access.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct ImgurConfig {
    /// API client id
    #[serde(default)]
    client_id: Option<String>,
}

/// Healthchecks monitoring.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct HealthConfig {
    /// Ping base URL, e.g. `https://hc-ping.com/`
    #[serde(default)]
    base_url: Option<String>,

    /// Check UUID
    #[serde(default)]
    uuid: Option<String>,
}

impl HealthConfig {
    /// Base URL and UUID when monitoring is configured.
    pub fn endpoint(&self) -> Option<(&str, &str)> {
        let base_url = self.base_url.as_deref().filter(|s| !s.trim().is_empty())?;
        let uuid = self.uuid.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((base_url, uuid))
    }
}

/// One polled subreddit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct SubredditConfig {
    /// Subreddit name without the `r/` prefix
    name: String,

    /// Comma separated hashtags for posts from this subreddit
    #[serde(default)]
    tags: String,
}

impl SubredditConfig {
    /// Create a subreddit entry.
    pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into(),
        }
    }

    /// Per-subreddit hashtags, trimmed, empty entries dropped.
    pub fn hashtags(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Complete bot configuration.
///
/// # Example
///
/// ```
/// use tootbot_bot::TootbotConfig;
///
/// let config = TootbotConfig::from_toml_str(r#"
///     [mastodon]
///     instance_url = "https://mastodon.example"
///     access_token = "secret"
///
///     [[subreddits]]
///     name = "pics"
///     tags = "photo, pics"
/// "#).unwrap();
///
/// assert_eq!(*config.mastodon().caption_budget(), 500);
/// assert_eq!(config.subreddits()[0].hashtags(), vec!["photo", "pics"]);
/// ```
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct TootbotConfig {
    /// General behaviour
    #[serde(default)]
    bot: BotConfig,

    /// Eligibility filter
    #[serde(default)]
    filter: FilterConfig,

    /// Media handling
    #[serde(default)]
    media: MediaConfig,

    /// Promotional message
    #[serde(default)]
    promo: PromoConfig,

    /// Destination
    mastodon: MastodonConfig,

    /// Imgur API
    #[serde(default)]
    imgur: ImgurConfig,

    /// Monitoring
    #[serde(default)]
    health: HealthConfig,

    /// Polled subreddits, in order
    #[serde(default)]
    subreddits: Vec<SubredditConfig>,
}

impl TootbotConfig {
    /// Load from `path` and the environment.
    ///
    /// Without a path, `~/.config/tootbot/tootbot.toml` and then `./tootbot.toml`
    /// are layered when present. An explicit path must exist. `TOOTBOT__*`
    /// variables override either.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a source cannot be read, a required field
    /// is missing, or validation fails.
    #[instrument]
    pub fn load(path: Option<&Path>) -> TootbotResult<Self> {
        let mut builder = Config::builder();
        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration");
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                debug!("Loading configuration with precedence: current dir > home dir");
                if let Some(home) = dirs::home_dir() {
                    let home_config = home.join(".config/tootbot").join(DEFAULT_CONFIG_FILE);
                    builder = builder.add_source(File::from(home_config).required(false));
                }
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
            }
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?;

        Self::finish(config)
    }

    /// Parse a TOML document without consulting the environment.
    pub fn from_toml_str(toml: &str) -> TootbotResult<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read configuration: {}", e)))?;

        Self::finish(config)
    }

    fn finish(config: Config) -> TootbotResult<Self> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Gate policy derived from the filter, media, promo and destination settings.
    pub fn gate_policy(&self) -> GatePolicy {
        GatePolicy::from_parts(
            &self.filter,
            &self.media,
            self.mastodon.sensitive_media,
            self.bot.hashtags.clone(),
            self.promo.message.clone(),
        )
    }

    /// Loop timing derived from the bot and destination settings.
    pub fn schedule_settings(&self) -> ScheduleSettings {
        ScheduleSettings {
            delay_between_posts: Duration::from_secs(self.bot.delay_between_posts),
            run_once_only: self.bot.run_once_only,
            post_limit: self.bot.post_limit,
            throttling_enabled: self.mastodon.throttling_enabled,
            throttling_max_delay: Duration::from_secs(self.mastodon.throttling_max_delay),
            delete_after_days: self.mastodon.delete_after_days,
        }
    }

    /// Check invariants the rest of the bot relies on.
    pub fn validate(&self) -> TootbotResult<()> {
        if self.mastodon.caption_budget == 0 {
            return Err(invalid("mastodon.caption_budget must be greater than 0"));
        }
        if self.media.max_images == 0 {
            return Err(invalid("media.max_images must be greater than 0"));
        }
        if !self.mastodon.instance_url.starts_with("http") {
            return Err(invalid(format!(
                "mastodon.instance_url must be an http(s) URL, got {:?}",
                self.mastodon.instance_url
            )));
        }
        if self.subreddits.is_empty() {
            warn!("No subreddits configured, nothing will be posted");
        }
        Ok(())
    }
}

#[track_caller]
fn invalid(message: impl Into<String>) -> TootbotError {
    ConfigError::new(message).into()
}
