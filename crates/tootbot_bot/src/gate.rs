//! The publication gate: decides whether a post goes out, and records it.

use crate::{FilterConfig, MediaConfig, Session, compose_caption, hashtag_string};
use derive_getters::Getters;
use std::sync::Arc;
use tootbot_core::{MediaHandle, Post, PublishedPost};
use tootbot_error::TootbotResult;
use tootbot_interface::Publisher;
use tootbot_ledger::{ContentStore, LedgerEntry, LedgerOutcome};
use tootbot_media::{FetchMedia, MediaAttachmentSet};
use tracing::{debug, error, info, instrument, warn};

/// A listing post together with the hashtags of the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The post
    pub post: Post,
    /// Per-source hashtags, placed before the global ones
    pub hashtags: Vec<String>,
}

impl Candidate {
    /// Pair a post with its source hashtags.
    pub fn new(post: Post, hashtags: Vec<String>) -> Self {
        Self { post, hashtags }
    }
}

/// What the gate did with one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Excluded by the eligibility filter; nothing recorded
    Filtered(&'static str),
    /// Post id or URL already in the ledger; nothing fetched or recorded
    AlreadyPosted,
    /// Every media file was already shared by another post
    DuplicateMedia,
    /// No media and the media-only policy is active
    NonMedia,
    /// Published to the destination
    Published(PublishedPost),
    /// The destination rejected the post; recorded so it is not retried
    Failed(String),
}

impl GateOutcome {
    /// Whether this outcome used up the cycle's single publication slot.
    pub fn ends_cycle(&self) -> bool {
        matches!(self, Self::Published(_) | Self::Failed(_))
    }
}

/// Policy knobs applied by the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(default)]
pub struct GatePolicy {
    /// Accept NSFW posts
    nsfw_allowed: bool,
    /// Mark NSFW posts sensitive
    nsfw_marked: bool,
    /// Accept spoiler posts
    spoilers_allowed: bool,
    /// Accept text-only posts
    self_posts_allowed: bool,
    /// Accept stickied posts
    stickied_allowed: bool,
    /// Skip posts without media
    media_only: bool,
    /// Mark every post with media sensitive
    sensitive_media: bool,
    /// Hashtags added to every caption
    global_hashtags: Vec<String>,
    /// Known placeholder image digests
    placeholder_checksums: Vec<String>,
    /// Promo message text
    promo_message: String,
}

impl GatePolicy {
    /// Combine the configuration sections the gate reads.
    pub fn from_parts(
        filter: &FilterConfig,
        media: &MediaConfig,
        sensitive_media: bool,
        global_hashtags: Vec<String>,
        promo_message: String,
    ) -> Self {
        Self {
            nsfw_allowed: *filter.nsfw_allowed(),
            nsfw_marked: *filter.nsfw_marked(),
            spoilers_allowed: *filter.spoilers_allowed(),
            self_posts_allowed: *filter.self_posts_allowed(),
            stickied_allowed: *filter.stickied_allowed(),
            media_only: *media.media_only(),
            sensitive_media,
            global_hashtags,
            placeholder_checksums: media.placeholder_checksums().clone(),
            promo_message,
        }
    }

    /// Reason `post` is excluded by the flag filter, if it is.
    pub fn exclusion_reason(&self, post: &Post) -> Option<&'static str> {
        if *post.is_nsfw() && !self.nsfw_allowed {
            Some("marked as NSFW")
        } else if *post.is_self() && !self.self_posts_allowed {
            Some("self post")
        } else if *post.is_spoiler() && !self.spoilers_allowed {
            Some("marked as spoiler")
        } else if *post.is_stickied() && !self.stickied_allowed {
            Some("stickied")
        } else {
            None
        }
    }
}

/// Runs candidates through dedup, media resolution and publishing.
pub struct PublicationGate {
    ledger: Arc<dyn ContentStore + Send + Sync>,
    fetcher: Arc<dyn FetchMedia>,
    publisher: Arc<dyn Publisher>,
    policy: GatePolicy,
    session: Session,
}

impl std::fmt::Debug for PublicationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicationGate")
            .field("publisher", &self.publisher.platform_name())
            .field("policy", &self.policy)
            .field("session", &self.session)
            .finish()
    }
}

impl PublicationGate {
    /// Assemble a gate from its collaborators.
    pub fn new(
        ledger: Arc<dyn ContentStore + Send + Sync>,
        fetcher: Arc<dyn FetchMedia>,
        publisher: Arc<dyn Publisher>,
        policy: GatePolicy,
        session: Session,
    ) -> Self {
        Self {
            ledger,
            fetcher,
            publisher,
            policy,
            session,
        }
    }

    /// Counters carried between cycles.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Active policy.
    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    /// Process candidates in order until one uses the publication slot.
    ///
    /// Returns the outcome that ended the scan, or `None` when every
    /// candidate was skipped.
    ///
    /// # Errors
    ///
    /// Only ledger failures are returned; the scan stops so nothing is
    /// published without a durable record.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn run_cycle(&mut self, candidates: &[Candidate]) -> TootbotResult<Option<GateOutcome>> {
        for candidate in candidates {
            let outcome = self.process(candidate).await?;
            if outcome.ends_cycle() {
                return Ok(Some(outcome));
            }
        }
        info!("No new post to publish this cycle");
        Ok(None)
    }

    /// First candidate that passes the filter and is not in the ledger.
    ///
    /// Reads the ledger but never fetches or publishes.
    pub fn first_unposted<'c>(&self, candidates: &'c [Candidate]) -> TootbotResult<Option<&'c Candidate>> {
        for candidate in candidates {
            if self.policy.exclusion_reason(&candidate.post).is_none()
                && !self.already_posted(&candidate.post)?
            {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    fn already_posted(&self, post: &Post) -> TootbotResult<bool> {
        Ok(self.ledger.contains(post.id())? || self.ledger.contains(post.url())?)
    }

    /// Run one candidate through every gate step.
    #[instrument(skip_all, fields(post_id = %candidate.post.id()))]
    pub async fn process(&mut self, candidate: &Candidate) -> TootbotResult<GateOutcome> {
        let post = &candidate.post;

        if let Some(reason) = self.policy.exclusion_reason(post) {
            info!(reason, "Skipping post");
            return Ok(GateOutcome::Filtered(reason));
        }

        if self.already_posted(post)? {
            debug!("Skipping post, already in ledger");
            return Ok(GateOutcome::AlreadyPosted);
        }

        // Dropping the set removes its files, including on early returns.
        let mut media =
            MediaAttachmentSet::build(post, self.fetcher.as_ref(), &self.policy.placeholder_checksums)
                .await;

        let fetched = media.len();
        for checksum in media.checksums() {
            if self.ledger.contains(&checksum)? {
                info!(checksum = %checksum, "Media already posted by another post, dropping it");
                media.destroy_one(&checksum);
            }
        }

        if fetched > 0 && media.is_empty() {
            info!("Skipping post, all media already posted");
            self.ledger.append(&LedgerEntry::skipped(
                post.id(),
                post.url(),
                LedgerOutcome::SkippedDuplicate,
            ))?;
            media.destroy();
            return Ok(GateOutcome::DuplicateMedia);
        }

        if self.policy.media_only && media.is_empty() {
            info!("Skipping post, no media and media-only posting is on");
            self.ledger.append(&LedgerEntry::skipped(
                post.id(),
                post.url(),
                LedgerOutcome::SkippedNonMedia,
            ))?;
            media.destroy();
            return Ok(GateOutcome::NonMedia);
        }

        let caption = self.caption_for(candidate);
        let sensitive = (self.policy.sensitive_media && !media.is_empty())
            || (*post.is_nsfw() && self.policy.nsfw_marked);

        let outcome = match self.publish(&media, &caption, sensitive).await {
            Ok(published) => {
                for asset in media.assets() {
                    self.ledger.append(&LedgerEntry::uploaded_media(
                        post.id(),
                        &published.url,
                        asset.source_url(),
                        asset.checksum(),
                    ))?;
                }
                self.ledger
                    .append(&LedgerEntry::published(post.id(), &published.url, post.url()))?;
                self.session.record_destination_success();
                info!(url = %published.url, media = media.len(), "Published post");
                GateOutcome::Published(published)
            }
            Err(e) => {
                error!(error = %e, "Error while publishing post");
                self.session.record_destination_failure();
                let message = e.to_string();
                self.ledger.append(&LedgerEntry::skipped(
                    post.id(),
                    post.url(),
                    LedgerOutcome::Failed(message.clone()),
                ))?;
                GateOutcome::Failed(message)
            }
        };

        media.destroy();
        Ok(outcome)
    }

    fn caption_for(&mut self, candidate: &Candidate) -> String {
        let post = &candidate.post;
        let hashtags = hashtag_string(&candidate.hashtags, &self.policy.global_hashtags);
        let promo = if self.session.next_caption_has_promo() {
            Some(self.policy.promo_message.as_str())
        } else {
            None
        };
        compose_caption(
            post.title(),
            &hashtags,
            post.shortlink(),
            promo,
            self.publisher.caption_budget(),
        )
    }

    async fn publish(
        &self,
        media: &MediaAttachmentSet,
        caption: &str,
        sensitive: bool,
    ) -> TootbotResult<PublishedPost> {
        let mut handles: Vec<MediaHandle> = Vec::with_capacity(media.len());
        for asset in media.assets() {
            let handle = self.publisher.upload_media(asset.local_path()).await?;
            debug!(path = %asset.local_path().display(), handle = %handle, "Uploaded media");
            handles.push(handle);
        }
        if handles.is_empty() {
            warn!("Posting without media");
        }
        self.publisher.publish(caption, &handles, sensitive).await
    }
}
