//! Publication logic for Tootbot.
//!
//! [`PublicationGate`] decides for each candidate post whether it is new,
//! resolves and fingerprints its media, composes the caption and hands the
//! result to a [`Publisher`](tootbot_interface::Publisher). Every decision that
//! consumes a post is written to the ledger first, so a post is handled at
//! most once. [`Scheduler`] wraps the gate in the polling loop.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod caption;
mod config;
mod gate;
mod scheduler;
mod session;

pub use caption::{ELLIPSIS, PROMO_SEPARATOR, compose_caption, hashtag_string};
pub use config::{
    BotConfig, DEFAULT_CONFIG_FILE, FilterConfig, HealthConfig, ImgurConfig, MastodonConfig,
    MediaConfig, PromoConfig, SubredditConfig, TootbotConfig,
};
pub use gate::{Candidate, GateOutcome, GatePolicy, GatePolicyBuilder, PublicationGate};
pub use scheduler::{ScheduleSettings, Scheduler, extra_sleep_rounds};
pub use session::Session;
