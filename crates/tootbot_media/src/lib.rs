//! Media resolution for Tootbot.
//!
//! Given a listing post, this crate works out which host serves its media,
//! downloads the files into a media folder, and fingerprints them so the
//! publication gate can detect content that was already shared.
//!
//! # Pipeline
//!
//! 1. [`classify`] maps the post to a [`ProviderKind`].
//! 2. [`MediaFetcher`] runs the provider strategy and returns [`FetchedFile`]s.
//! 3. [`MediaAttachmentSet::build`] hashes each file with [`sha256_file`] and
//!    takes ownership of it until it is destroyed.
//!
//! Every network call goes through [`HttpTransport`]; production code uses
//! [`ReqwestTransport`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tootbot_media::{MediaAttachmentSet, MediaFetcher, ReqwestTransport};
//! # use tootbot_core::Post;
//!
//! # async fn example(post: Post) -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new("tootbot/0.3", ReqwestTransport::DEFAULT_TIMEOUT)?;
//! let fetcher = MediaFetcher::new(Arc::new(transport), "media");
//!
//! let mut media = MediaAttachmentSet::build(&post, &fetcher, &[]).await;
//! for checksum in media.checksums() {
//!     println!("{} -> {:?}", checksum, media.path_for(&checksum));
//! }
//! media.destroy();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attachment;
mod download;
mod fetcher;
mod fingerprint;
mod http;
mod provider;
mod providers;

pub use attachment::{MediaAsset, MediaAttachmentSet};
pub use download::{save_file, write_atomically};
pub use fetcher::{DEFAULT_MAX_IMAGES, FetchMedia, FetchedFile, MediaFetcher};
pub use fingerprint::{CHUNK_SIZE, sha256_file, sha256_file_async};
pub use http::{HttpResponse, HttpTransport, ReqwestTransport, normalize_content_type};
pub use provider::{ProviderKind, classify};
pub use providers::generic::ALLOWED_MEDIA_TYPES;
