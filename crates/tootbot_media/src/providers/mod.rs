//! Per-provider fetch strategies.

pub(crate) mod generic;
pub(crate) mod gfycat;
pub(crate) mod giphy;
pub(crate) mod imgur;
pub(crate) mod reddit;

/// Last path segment of a URL, without query or fragment.
pub(crate) fn url_basename(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Lower-cased extension of a file name, including the dot.
pub(crate) fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}
