//! Content fingerprints.

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;
use tootbot_error::{MediaError, MediaErrorKind, TootbotResult};

/// Read size used while hashing.
pub const CHUNK_SIZE: usize = 4096;

/// SHA-256 of a file's bytes as 64 lowercase hex characters.
///
/// The file is streamed in [`CHUNK_SIZE`] blocks; metadata such as name or
/// modification time does not influence the digest.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("a.bin");
/// std::fs::write(&path, b"abc")?;
/// assert_eq!(
///     tootbot_media::sha256_file(&path)?,
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// # Ok(())
/// # }
/// ```
pub fn sha256_file(path: &Path) -> TootbotResult<String> {
    let io_err = |e: std::io::Error| {
        MediaError::new(MediaErrorKind::Io(format!("{}: {}", path.display(), e)))
    };

    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer).map_err(io_err)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// [`sha256_file`] run on tokio's blocking thread pool.
///
/// # Errors
///
/// Fails if the file cannot be read or the hashing task is cancelled.
pub async fn sha256_file_async(path: &Path) -> TootbotResult<String> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || sha256_file(&owned))
        .await
        .map_err(|e| {
            MediaError::new(MediaErrorKind::Io(format!(
                "{}: hashing task failed: {}",
                path.display(),
                e
            )))
        })?
}
