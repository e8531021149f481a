//! Media hosted by the listing site: images, videos and galleries.

use super::{extension_of, url_basename};
use crate::{FetchedFile, MediaFetcher, save_file};
use tootbot_core::{GalleryMediaKind, Post};
use tootbot_error::{MediaError, MediaErrorKind, TootbotResult};

/// Download a single hosted image.
///
/// Legacy upload links carry no extension; those are saved as `.jpg`.
pub(crate) async fn fetch_hosted(fetcher: &MediaFetcher, url: &str) -> TootbotResult<FetchedFile> {
    let mut file_name = url_basename(url);
    if file_name.is_empty() {
        return Err(MediaError::new(MediaErrorKind::MalformedUrl(url.to_string())).into());
    }
    if extension_of(&file_name).is_none() {
        file_name.push_str(".jpg");
    }

    let path = fetcher.media_dir().join(&file_name);
    tracing::info!(url, path = %path.display(), "Downloading hosted image");
    let path = save_file(fetcher.transport(), url, &path).await?;
    Ok(FetchedFile::new(path, url))
}

/// Download the MP4 fallback rendition of a hosted video.
pub(crate) async fn fetch_video(fetcher: &MediaFetcher, post: &Post) -> TootbotResult<FetchedFile> {
    let Some(video_url) = post.video_fallback_url().as_deref() else {
        tracing::error!(post_id = %post.id(), url = %post.url(), "Listing returned no media for this video post");
        return Err(MediaError::new(MediaErrorKind::MissingVideo(post.id().clone())).into());
    };

    let path = fetcher.media_dir().join(format!("{}.mp4", post.id()));
    tracing::info!(url = video_url, path = %path.display(), "Downloading hosted video");
    let path = save_file(fetcher.transport(), video_url, &path).await?;
    Ok(FetchedFile::new(path, video_url))
}

/// Download up to `max_images` still images of a gallery, ordered by media id.
///
/// Individual download failures are logged and skipped.
pub(crate) async fn fetch_gallery(
    fetcher: &MediaFetcher,
    post: &Post,
) -> TootbotResult<Vec<FetchedFile>> {
    let mut items: Vec<_> = post
        .gallery_items()
        .iter()
        .filter(|item| *item.kind() == GalleryMediaKind::Image)
        .collect();
    items.sort_by(|a, b| a.media_id().cmp(b.media_id()));

    tracing::debug!(post_id = %post.id(), eligible = items.len(), "Gallery post");

    let mut files = Vec::new();
    for item in items {
        if files.len() >= fetcher.max_images() {
            break;
        }

        let extension = item.mime_subtype().unwrap_or("jpg");
        let path = fetcher
            .media_dir()
            .join(format!("{}.{}", item.media_id(), extension));
        tracing::info!(
            url = %item.source_url(),
            path = %path.display(),
            width = item.width(),
            height = item.height(),
            "Downloading gallery image"
        );

        match save_file(fetcher.transport(), item.source_url(), &path).await {
            Ok(path) => files.push(FetchedFile::new(path, item.source_url().clone())),
            Err(e) => tracing::warn!(media_id = %item.media_id(), error = %e, "Skipping gallery image"),
        }
    }

    Ok(files)
}
