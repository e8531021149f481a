//! Giphy animations, always fetched as their MP4 rendition.

use crate::{FetchedFile, MediaFetcher, save_file};
use regex::Regex;
use std::sync::OnceLock;
use tootbot_error::{MediaError, MediaErrorKind, TootbotResult};

static GIPHY_ID: OnceLock<Option<Regex>> = OnceLock::new();

fn giphy_regex() -> Option<&'static Regex> {
    GIPHY_ID
        .get_or_init(|| {
            Regex::new(r"https?://((?:.*)giphy\.com/media/|giphy\.com/gifs/|i\.giphy\.com/)(.*-)?(\w+)(/|\.|\n|$)").ok()
        })
        .as_ref()
}

/// Extract the media id from a Giphy link.
pub(crate) fn giphy_id(url: &str) -> Option<String> {
    giphy_regex()?
        .captures(url)
        .and_then(|caps| caps.get(3))
        .map(|m| m.as_str().to_string())
}

/// MP4 rendition of a Giphy media id.
pub(crate) fn mp4_url(id: &str) -> String {
    format!("https://media.giphy.com/media/{}/giphy.mp4", id)
}

pub(crate) async fn fetch(fetcher: &MediaFetcher, url: &str) -> TootbotResult<FetchedFile> {
    let Some(id) = giphy_id(url) else {
        tracing::error!(url, "Could not identify Giphy ID");
        return Err(MediaError::new(MediaErrorKind::UnidentifiedId {
            provider: "Giphy".to_string(),
            url: url.to_string(),
        })
        .into());
    };

    let video_url = mp4_url(&id);
    let path = fetcher.media_dir().join(format!("{}_giphy.mp4", id));
    tracing::info!(url = %video_url, path = %path.display(), "Downloading Giphy animation");
    let path = save_file(fetcher.transport(), &video_url, &path).await?;
    Ok(FetchedFile::new(path, video_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_giphy_id() {
        assert_eq!(
            giphy_id("https://giphy.com/gifs/funny-cat-3o7TKSjRrfIPjeiVyM"),
            Some("3o7TKSjRrfIPjeiVyM".to_string())
        );
        assert_eq!(
            giphy_id("https://media.giphy.com/media/3o7TKSjRrfIPjeiVyM/giphy.gif"),
            Some("3o7TKSjRrfIPjeiVyM".to_string())
        );
        assert_eq!(
            giphy_id("https://i.giphy.com/3o7TKSjRrfIPjeiVyM.gif"),
            Some("3o7TKSjRrfIPjeiVyM".to_string())
        );
        assert_eq!(giphy_id("https://giphy.com/"), None);
    }

    #[test]
    fn test_mp4_url() {
        assert_eq!(mp4_url("abc"), "https://media.giphy.com/media/abc/giphy.mp4");
    }
}
