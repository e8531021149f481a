//! Idempotent file downloads.
//!
//! Files land at a deterministic path. The body is written to a sibling
//! `.part` file and renamed over the destination, so an earlier copy is
//! replaced wholesale and a failed transfer never leaves a truncated file at
//! the final path.

use crate::HttpTransport;
use std::path::{Path, PathBuf};
use tootbot_error::{MediaError, MediaErrorKind, TootbotResult};

/// Download `url` to `path`, replacing any previous file there.
///
/// # Errors
///
/// Returns an error on transport failure, a non-2xx status, or a filesystem
/// failure. In every error case no file is left at `path` by this call.
#[tracing::instrument(skip(transport, path), fields(path = %path.display()))]
pub async fn save_file(
    transport: &dyn HttpTransport,
    url: &str,
    path: &Path,
) -> TootbotResult<PathBuf> {
    let response = transport.get(url, &[]).await?;
    if !response.is_success() {
        tracing::error!(status = response.status, "File failed to download");
        return Err(MediaError::new(MediaErrorKind::DownloadFailed {
            url: url.to_string(),
            status: response.status,
        })
        .into());
    }

    write_atomically(path, &response.body).await?;

    tracing::info!(size = response.body.len(), "Downloaded media file");
    Ok(path.to_path_buf())
}

/// Write `data` to a temporary sibling of `path`, then rename it into place.
pub async fn write_atomically(path: &Path, data: &[u8]) -> TootbotResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !tokio::fs::try_exists(parent).await.unwrap_or(false) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                MediaError::new(MediaErrorKind::Io(format!("{}: {}", parent.display(), e)))
            })?;
            tracing::info!(dir = %parent.display(), "Media folder not found, created new folder");
        }
    }

    let temp_path = part_path(path);
    if let Err(e) = tokio::fs::write(&temp_path, data).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(MediaError::new(MediaErrorKind::Io(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
        .into());
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(MediaError::new(MediaErrorKind::Io(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
        .into());
    }

    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
