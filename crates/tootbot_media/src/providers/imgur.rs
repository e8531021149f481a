//! Imgur images and albums.
//!
//! Links are resolved through the Imgur read API. `.gifv` and `.mp4` links
//! are rewritten to their `.gif` rendition; Imgur sometimes serves a still
//! preview frame for those, so every `.gif` download is sniffed and dropped
//! unless it really is a GIF.

use super::extension_of;
use crate::{FetchedFile, MediaFetcher, save_file};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;
use tootbot_error::{MediaError, MediaErrorKind, TootbotResult};

const IMGUR_API: &str = "https://api.imgur.com/3";

static IMGUR_ID: OnceLock<Option<Regex>> = OnceLock::new();

fn imgur_regex() -> Option<&'static Regex> {
    IMGUR_ID
        .get_or_init(|| Regex::new(r"(?:.*)imgur\.com(?:/gallery/|/a/|/)(.*?)(?:/.*|\.|$)").ok())
        .as_ref()
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    link: String,
}

/// Extract the image or album id from an Imgur URL.
pub(crate) fn imgur_id(url: &str) -> Option<String> {
    imgur_regex()?
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|id| !id.is_empty())
}

fn is_album(url: &str) -> bool {
    url.contains("/a/") || url.contains("/gallery/")
}

/// Rewrite GIF-like links to their `.gif` rendition.
///
/// Returns the URL to download and the local extension.
pub(crate) fn normalize_link(link: &str) -> (String, String) {
    match extension_of(link).as_deref() {
        Some(".gifv") => (link.replace(".gifv", ".gif"), ".gif".to_string()),
        Some(".mp4") => (link.replace(".mp4", ".gif"), ".gif".to_string()),
        Some(ext) => (link.to_string(), ext.to_string()),
        None => (link.to_string(), String::new()),
    }
}

pub(crate) async fn fetch(fetcher: &MediaFetcher, url: &str) -> TootbotResult<Vec<FetchedFile>> {
    let Some(id) = imgur_id(url) else {
        tracing::error!(url, "Could not identify Imgur image/gallery ID");
        return Err(MediaError::new(MediaErrorKind::UnidentifiedId {
            provider: "Imgur".to_string(),
            url: url.to_string(),
        })
        .into());
    };

    let links = image_links(fetcher, url, &id).await?;

    let mut files = Vec::new();
    for link in links {
        if files.len() >= fetcher.max_images() {
            break;
        }

        let (download_url, extension) = normalize_link(&link);
        let path = fetcher
            .media_dir()
            .join(format!("{}_{}{}", id, files.len(), extension));
        tracing::info!(url = %download_url, path = %path.display(), "Downloading Imgur image");

        let path = match save_file(fetcher.transport(), &download_url, &path).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping Imgur image");
                continue;
            }
        };

        if extension == ".gif" && !is_gif(&path).await {
            tracing::warn!(path = %path.display(), "Imgur: not a GIF, not posting");
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::error!(path = %path.display(), error = %e, "Error while deleting media file");
            }
            continue;
        }

        files.push(FetchedFile::new(path, download_url));
    }

    Ok(files)
}

async fn image_links(fetcher: &MediaFetcher, url: &str, id: &str) -> TootbotResult<Vec<String>> {
    let Some(client_id) = fetcher.imgur_client_id() else {
        return Err(MediaError::new(MediaErrorKind::ImgurApi(
            "no Imgur client id configured".to_string(),
        ))
        .into());
    };
    let auth = format!("Client-ID {}", client_id);
    let headers = [("Authorization", auth.as_str())];

    if is_album(url) {
        tracing::info!(url, "Imgur link points to gallery");
        let response = fetcher
            .transport()
            .get(&format!("{}/album/{}/images", IMGUR_API, id), &headers)
            .await?;
        let images: ApiResponse<Vec<ApiImage>> = parse_api(&response)?;
        Ok(images.data.into_iter().map(|image| image.link).collect())
    } else {
        let response = fetcher
            .transport()
            .get(&format!("{}/image/{}", IMGUR_API, id), &headers)
            .await?;
        let image: ApiResponse<ApiImage> = parse_api(&response)?;
        Ok(vec![image.data.link])
    }
}

fn parse_api<T: serde::de::DeserializeOwned>(
    response: &crate::HttpResponse,
) -> TootbotResult<ApiResponse<T>> {
    if !response.is_success() {
        return Err(MediaError::new(MediaErrorKind::ImgurApi(format!(
            "status {}",
            response.status
        )))
        .into());
    }
    serde_json::from_slice(&response.body).map_err(|e| {
        MediaError::new(MediaErrorKind::ImgurApi(format!("unexpected response: {}", e))).into()
    })
}

/// Whether the file's bytes decode as a GIF, regardless of its name.
async fn is_gif(path: &Path) -> bool {
    match tokio::fs::read(path).await {
        Ok(bytes) => matches!(image::guess_format(&bytes), Ok(image::ImageFormat::Gif)),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Could not read downloaded file");
            false
        }
    }
}
