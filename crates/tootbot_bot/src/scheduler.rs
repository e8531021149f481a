//! The polling loop.

use crate::{Candidate, GateOutcome, PublicationGate, SubredditConfig};
use std::sync::Arc;
use std::time::Duration;
use tootbot_error::TootbotResult;
use tootbot_interface::{CheckKind, Heartbeat, ListingSource, Publisher};
use tracing::{error, info, instrument, warn};

/// Timing of the polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSettings {
    /// Sleep between cycles
    pub delay_between_posts: Duration,
    /// Exit after the first cycle
    pub run_once_only: bool,
    /// Posts requested per subreddit
    pub post_limit: usize,
    /// Add extra sleep rounds after destination errors
    pub throttling_enabled: bool,
    /// Ceiling on total sleep per cycle when throttling
    pub throttling_max_delay: Duration,
    /// Delete own statuses older than this many days; 0 disables
    pub delete_after_days: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            delay_between_posts: Duration::from_secs(900),
            run_once_only: false,
            post_limit: 10,
            throttling_enabled: true,
            throttling_max_delay: Duration::from_secs(3600),
            delete_after_days: 0,
        }
    }
}

/// Number of extra `delay` sleeps after a cycle with `errors` destination errors.
///
/// Rounds stop once `errors` rounds were slept or the total sleep, counting
/// the regular delay, would pass `max_delay`.
///
/// ```
/// use std::time::Duration;
/// use tootbot_bot::extra_sleep_rounds;
///
/// let minute = Duration::from_secs(60);
/// assert_eq!(extra_sleep_rounds(minute, 0, minute * 10), 0);
/// assert_eq!(extra_sleep_rounds(minute, 3, minute * 10), 3);
/// assert_eq!(extra_sleep_rounds(minute, 50, minute * 10), 10);
/// ```
pub fn extra_sleep_rounds(delay: Duration, errors: u32, max_delay: Duration) -> u32 {
    if delay.is_zero() {
        return errors;
    }
    let mut rounds = 0;
    let mut elapsed = delay;
    while rounds < errors && elapsed <= max_delay {
        elapsed += delay;
        rounds += 1;
    }
    rounds
}

/// Drives fetch, gate and housekeeping cycles.
pub struct Scheduler {
    gate: PublicationGate,
    listing: Arc<dyn ListingSource>,
    publisher: Arc<dyn Publisher>,
    heartbeat: Arc<dyn Heartbeat>,
    subreddits: Vec<SubredditConfig>,
    settings: ScheduleSettings,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("gate", &self.gate)
            .field("listing", &self.listing.source_name())
            .field("subreddits", &self.subreddits)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Scheduler {
    /// Assemble a scheduler.
    pub fn new(
        gate: PublicationGate,
        listing: Arc<dyn ListingSource>,
        publisher: Arc<dyn Publisher>,
        heartbeat: Arc<dyn Heartbeat>,
        subreddits: Vec<SubredditConfig>,
        settings: ScheduleSettings,
    ) -> Self {
        Self {
            gate,
            listing,
            publisher,
            heartbeat,
            subreddits,
            settings,
        }
    }

    /// The gate and its session counters.
    pub fn gate(&self) -> &PublicationGate {
        &self.gate
    }

    /// Fetch every configured subreddit, in configuration order.
    ///
    /// A failing subreddit is logged and contributes no candidates.
    pub async fn collect(&self) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for subreddit in &self.subreddits {
            match self
                .listing
                .fetch_posts(subreddit.name(), self.settings.post_limit)
                .await
            {
                Ok(posts) => {
                    let hashtags = subreddit.hashtags();
                    candidates.extend(
                        posts
                            .into_iter()
                            .map(|post| Candidate::new(post, hashtags.clone())),
                    );
                }
                Err(e) => {
                    warn!(subreddit = %subreddit.name(), error = %e, "Could not fetch subreddit");
                }
            }
        }
        candidates
    }

    /// Run one polling cycle.
    #[instrument(skip(self))]
    pub async fn run_cycle(&mut self) -> TootbotResult<Option<GateOutcome>> {
        self.heartbeat.check(CheckKind::Start, None).await;

        let candidates = self.collect().await;
        info!(count = candidates.len(), "Collected candidate posts");

        let outcome = match self.gate.run_cycle(&candidates).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Cycle aborted");
                self.heartbeat.check(CheckKind::Fail, Some(&e.to_string())).await;
                return Err(e);
            }
        };

        if self.settings.delete_after_days > 0 {
            info!(days = self.settings.delete_after_days, "Deleting old statuses");
            if let Err(e) = self
                .publisher
                .delete_older_than(self.settings.delete_after_days)
                .await
            {
                warn!(error = %e, "Could not delete old statuses");
            }
        } else {
            info!("Deleting old statuses disabled");
        }

        self.heartbeat.check(CheckKind::Ok, None).await;
        Ok(outcome)
    }

    /// Loop until `run_once_only` ends it.
    ///
    /// Cycle failures are logged and the loop keeps going.
    pub async fn run(&mut self) -> TootbotResult<()> {
        loop {
            if let Err(e) = self.run_cycle().await {
                error!(error = %e, "Polling cycle failed");
            }

            if self.settings.run_once_only {
                info!("Exiting because run_once_only is set");
                return Ok(());
            }

            let delay = self.settings.delay_between_posts;
            info!(seconds = delay.as_secs(), "Sleeping");
            tokio::time::sleep(delay).await;

            if self.settings.throttling_enabled {
                let rounds = extra_sleep_rounds(
                    delay,
                    self.gate.session().destination_errors(),
                    self.settings.throttling_max_delay,
                );
                for round in 1..=rounds {
                    self.heartbeat
                        .check(CheckKind::Ok, Some("Extra wait due to destination API error"))
                        .await;
                    info!(round, "Extra sleep due to destination API error(s)");
                    tokio::time::sleep(delay).await;
                }
            }

            info!("Restarting main process");
        }
    }

    /// Report the post the next cycle would publish, without downloading or
    /// publishing anything.
    pub async fn dry_run(&self) -> TootbotResult<Option<Candidate>> {
        let candidates = self.collect().await;
        let next = self.gate.first_unposted(&candidates)?.cloned();
        match &next {
            Some(candidate) => info!(
                post_id = %candidate.post.id(),
                title = %candidate.post.title(),
                url = %candidate.post.url(),
                "Would publish"
            ),
            None => info!("Nothing to publish"),
        }
        Ok(next)
    }
}
