//! Gfycat clips, scraped from the clip's HTML page.

use super::url_basename;
use crate::{FetchedFile, MediaFetcher, save_file};
use scraper::{Html, Selector};
use tootbot_error::{MediaError, MediaErrorKind, TootbotResult};

/// Pick the high-quality MP4 from a Gfycat page.
///
/// The page lists several `<source>` renditions; the last one whose `src`
/// mentions both `giant` and `mp4` wins.
pub(crate) fn find_giant_mp4(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("source[src]").ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .filter(|src| src.contains("giant") && src.contains("mp4"))
        .last()
        .map(str::to_string)
}

pub(crate) async fn fetch(fetcher: &MediaFetcher, url: &str) -> TootbotResult<FetchedFile> {
    let name = url_basename(url);
    if name.is_empty() {
        return Err(MediaError::new(MediaErrorKind::UnidentifiedId {
            provider: "Gfycat".to_string(),
            url: url.to_string(),
        })
        .into());
    }

    let page = fetcher.transport().get(url, &[]).await?;
    if !page.is_success() {
        return Err(MediaError::new(MediaErrorKind::DownloadFailed {
            url: url.to_string(),
            status: page.status,
        })
        .into());
    }

    let Some(video_url) = find_giant_mp4(&page.text()) else {
        tracing::error!(url, "Gfycat page has no MP4 source");
        return Err(MediaError::new(MediaErrorKind::Scrape(format!("no mp4 source on {}", url))).into());
    };

    let path = fetcher.media_dir().join(format!("{}.mp4", name));
    tracing::info!(url = %video_url, path = %path.display(), "Downloading Gfycat clip");
    let path = save_file(fetcher.transport(), &video_url, &path).await?;
    Ok(FetchedFile::new(path, video_url))
}
