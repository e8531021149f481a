//! Direct links to media on arbitrary hosts.

use super::{extension_of, url_basename};
use crate::{FetchedFile, MediaFetcher, write_atomically};
use tootbot_core::Post;
use tootbot_error::{MediaError, MediaErrorKind, TootbotResult};

/// Content types accepted from unknown hosts, with their file extensions.
pub const ALLOWED_MEDIA_TYPES: &[(&str, &str)] = &[
    ("image/png", ".png"),
    ("image/jpeg", ".jpg"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
    ("video/mp4", ".mp4"),
];

fn extension_for(mime: &str) -> Option<&'static str> {
    ALLOWED_MEDIA_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
}

/// Local file name for a generic download.
pub(crate) fn file_name(url: &str, post_id: &str, mime_extension: &str) -> String {
    let base = url_basename(url);
    match (base.is_empty(), extension_of(&base)) {
        (true, _) => format!("{}{}", post_id, mime_extension),
        (false, Some(_)) => base,
        (false, None) => format!("{}{}", base, mime_extension),
    }
}

pub(crate) async fn fetch(fetcher: &MediaFetcher, post: &Post) -> TootbotResult<FetchedFile> {
    let url = post.url().as_str();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        tracing::error!(url, "Malformed URL, not attempting download");
        return Err(MediaError::new(MediaErrorKind::MalformedUrl(url.to_string())).into());
    }

    let response = fetcher.transport().get(url, &[]).await?;
    if !response.is_success() {
        return Err(MediaError::new(MediaErrorKind::DownloadFailed {
            url: url.to_string(),
            status: response.status,
        })
        .into());
    }

    let mime = response.content_type.clone().unwrap_or_default();
    let Some(extension) = extension_for(&mime) else {
        tracing::warn!(url, mime = %mime, "Not a valid media type");
        return Err(MediaError::new(MediaErrorKind::InvalidMediaType {
            mime,
            url: url.to_string(),
        })
        .into());
    };

    let path = fetcher
        .media_dir()
        .join(file_name(url, post.id(), extension));
    write_atomically(&path, &response.body).await?;
    tracing::info!(url, path = %path.display(), mime = %mime, "Downloaded media file");
    Ok(FetchedFile::new(path, url))
}
