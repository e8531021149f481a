//! Wiring configuration into concrete clients.

use std::sync::Arc;
use tootbot_bot::{PublicationGate, Scheduler, Session, TootbotConfig};
use tootbot_error::TootbotResult;
use tootbot_interface::{Heartbeat, NoOpHeartbeat};
use tootbot_ledger::CsvLedger;
use tootbot_media::{MediaFetcher, ReqwestTransport};
use tootbot_social::{HealthChecks, MastodonPublisher, RedditListing};
use tracing::info;

/// User agent sent to listing and media hosts.
pub const USER_AGENT: &str = concat!("tootbot/", env!("CARGO_PKG_VERSION"));

/// Build the scheduler and its collaborators from `config`.
///
/// Also returns the Mastodon client so the caller can verify credentials
/// before the loop starts. No network request is made here.
///
/// # Errors
///
/// Fails if the ledger cannot be opened or a client cannot be built.
pub fn build_scheduler(config: &TootbotConfig) -> TootbotResult<(Scheduler, Arc<MastodonPublisher>)> {
    let transport = Arc::new(ReqwestTransport::new(
        USER_AGENT,
        ReqwestTransport::DEFAULT_TIMEOUT,
    )?);

    let ledger = Arc::new(CsvLedger::open(config.bot().ledger_file())?);
    info!(path = %ledger.path().display(), "Using ledger");

    let fetcher = Arc::new(
        MediaFetcher::new(transport.clone(), config.media().folder())
            .with_max_images(*config.media().max_images())
            .with_imgur_client_id(config.imgur().client_id().clone()),
    );
    if config.imgur().client_id().is_none() {
        info!("No Imgur client id configured, Imgur links will be skipped");
    }

    let publisher = Arc::new(MastodonPublisher::new(
        config.mastodon().instance_url(),
        config.mastodon().access_token(),
        *config.mastodon().caption_budget(),
    )?);

    let heartbeat: Arc<dyn Heartbeat> = match config.health().endpoint() {
        Some((base_url, uuid)) => {
            info!(base_url, "Healthchecks monitoring enabled");
            Arc::new(HealthChecks::new(base_url, uuid)?)
        }
        None => Arc::new(NoOpHeartbeat),
    };

    let gate = PublicationGate::new(
        ledger,
        fetcher,
        publisher.clone(),
        config.gate_policy(),
        Session::new(*config.promo().every()),
    );

    let scheduler = Scheduler::new(
        gate,
        Arc::new(RedditListing::new(transport)),
        publisher.clone(),
        heartbeat,
        config.subreddits().clone(),
        config.schedule_settings(),
    );

    Ok((scheduler, publisher))
}
