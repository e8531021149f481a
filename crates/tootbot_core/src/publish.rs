//! Destination-side handles.

use serde::{Deserialize, Serialize};

/// Opaque identifier a destination returns for an uploaded media file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct MediaHandle(pub String);

/// Confirmation of a published post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublishedPost {
    /// Destination-side identifier
    pub id: String,
    /// Public URL of the published post
    pub url: String,
}
