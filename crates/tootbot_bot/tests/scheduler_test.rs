//! Polling loop wiring.

mod test_utils;

use std::sync::Arc;
use test_utils::{MockFetcher, MockListing, MockPublisher, RecordingHeartbeat, post};
use tootbot_bot::{
    GateOutcome, GatePolicyBuilder, PublicationGate, ScheduleSettings, Scheduler, Session,
    SubredditConfig,
};
use tootbot_interface::CheckKind;
use tootbot_ledger::{ContentStore, CsvLedger};

struct Setup {
    _dir: tempfile::TempDir,
    ledger: Arc<CsvLedger>,
    fetcher: Arc<MockFetcher>,
    listing: Arc<MockListing>,
    publisher: Arc<MockPublisher>,
    heartbeat: Arc<RecordingHeartbeat>,
}

fn setup(listing: MockListing) -> Setup {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(CsvLedger::open(dir.path().join("cache.csv")).unwrap());
    let fetcher = Arc::new(
        MockFetcher::new(dir.path())
            .with_media("a1", &[("a1.jpg", "a1")])
            .with_media("b1", &[("b1.jpg", "b1")]),
    );
    Setup {
        _dir: dir,
        ledger,
        fetcher,
        listing: Arc::new(listing),
        publisher: Arc::new(MockPublisher::new()),
        heartbeat: Arc::new(RecordingHeartbeat::default()),
    }
}

fn scheduler(s: &Setup, settings: ScheduleSettings) -> Scheduler {
    let policy = GatePolicyBuilder::default().media_only(true).build().unwrap();
    let gate = PublicationGate::new(
        s.ledger.clone(),
        s.fetcher.clone(),
        s.publisher.clone(),
        policy,
        Session::default(),
    );
    Scheduler::new(
        gate,
        s.listing.clone(),
        s.publisher.clone(),
        s.heartbeat.clone(),
        vec![
            SubredditConfig::new("pics", "photo"),
            SubredditConfig::new("aww", ""),
        ],
        settings,
    )
}

fn run_once() -> ScheduleSettings {
    ScheduleSettings {
        run_once_only: true,
        post_limit: 5,
        ..ScheduleSettings::default()
    }
}

fn listing() -> MockListing {
    MockListing::default()
        .with_posts("pics", vec![post("a1", "https://i.redd.it/a1.jpg", "From pics")])
        .with_posts("aww", vec![post("b1", "https://i.redd.it/b1.jpg", "From aww")])
}

#[tokio::test]
async fn test_run_once_publishes_first_source_only() {
    let s = setup(listing());
    let mut scheduler = scheduler(&s, run_once());

    scheduler.run().await.unwrap();

    assert_eq!(
        s.listing.requests(),
        vec![("pics".to_string(), 5), ("aww".to_string(), 5)]
    );
    let published = s.publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].caption, "From pics #photo https://redd.it/a1");
    assert!(s.ledger.contains("a1").unwrap());
    assert!(!s.ledger.contains("b1").unwrap());

    let kinds: Vec<_> = s.heartbeat.checks().into_iter().map(|(kind, _)| kind).collect();
    assert_eq!(kinds, vec![CheckKind::Start, CheckKind::Ok]);
}

#[tokio::test]
async fn test_next_cycle_moves_on_to_next_post() {
    let s = setup(listing());
    let mut scheduler = scheduler(&s, run_once());

    let first = scheduler.run_cycle().await.unwrap();
    let second = scheduler.run_cycle().await.unwrap();
    let third = scheduler.run_cycle().await.unwrap();

    assert!(matches!(first, Some(GateOutcome::Published(_))));
    assert!(matches!(second, Some(GateOutcome::Published(_))));
    assert_eq!(third, None);
    assert_eq!(s.publisher.published()[1].caption, "From aww https://redd.it/b1");
}

#[tokio::test]
async fn test_dry_run_reports_without_side_effects() {
    let s = setup(listing());
    let scheduler = scheduler(&s, run_once());

    let next = scheduler.dry_run().await.unwrap().unwrap();

    assert_eq!(next.post.id(), "a1");
    assert_eq!(next.hashtags, vec!["photo".to_string()]);
    assert_eq!(s.fetcher.calls(), 0);
    assert!(s.publisher.published().is_empty());
    assert!(!s.ledger.contains("a1").unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_loop_sleeps_between_cycles() {
    let s = setup(MockListing::default());
    let settings = ScheduleSettings {
        delay_between_posts: std::time::Duration::from_secs(60),
        ..ScheduleSettings::default()
    };
    let mut scheduler = scheduler(&s, settings);

    // The loop never ends on its own; give it three minutes of paused time.
    let result = tokio::time::timeout(std::time::Duration::from_secs(150), scheduler.run()).await;

    assert!(result.is_err());
    let starts = s
        .heartbeat
        .checks()
        .into_iter()
        .filter(|(kind, _)| *kind == CheckKind::Start)
        .count();
    assert_eq!(starts, 3);
}
