//! Tootbot binary.

use clap::Parser;
use std::path::PathBuf;
use tootbot::{TootbotConfig, build_scheduler};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Relay subreddit posts to Mastodon.
#[derive(Parser, Debug)]
#[command(name = "tootbot")]
#[command(about = "Relay top subreddit posts with their media to Mastodon")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./tootbot.toml when present)
    #[arg(short, long, env = "TOOTBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Show which post would be published, without downloading or posting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Tootbot");

    let config = TootbotConfig::load(cli.config.as_deref())?;
    info!(
        subreddits = config.subreddits().len(),
        delay = *config.bot().delay_between_posts(),
        "Configuration loaded"
    );

    let (mut scheduler, publisher) = build_scheduler(&config)?;

    if cli.dry_run {
        info!("DRY RUN MODE - nothing will be downloaded or published");
        scheduler.dry_run().await?;
        return Ok(());
    }

    if let Err(e) = publisher.verify().await {
        error!(error = %e, "Could not log in to Mastodon");
        return Err(e.into());
    }

    if cli.once {
        scheduler.run_cycle().await?;
        return Ok(());
    }

    scheduler.run().await?;
    Ok(())
}
