//! File downloader
//!
//! Downloads a resolved link into `{dir}/{name}.pdf`. The destination file
//! is created before the request is sent, and it is removed again if
//! anything fails afterwards. A failed download therefore never leaves a
//! partial file behind.

use crate::crawler::classifier::OutputName;
use crate::crawler::fetcher::send_get;
use crate::CrawlerError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Downloads `url` into `dir` under the given output name
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the complete file
/// * `Err(CrawlerError)` - `Io` if the file can't be created or written,
///   `Network` on transport failure, `HttpStatus` on a non-2xx response.
///   In every case the destination file no longer exists.
pub async fn persist(
    client: &Client,
    url: &str,
    dir: &Path,
    name: &OutputName,
) -> Result<PathBuf, CrawlerError> {
    let path = dir.join(name.file_name());

    let file = File::create(&path)
        .await
        .map_err(|e| CrawlerError::io(&path, e))?;

    match download_into(client, url, file, &path).await {
        Ok(bytes) => {
            tracing::debug!("Wrote {} bytes to {}", bytes, path.display());
            Ok(path)
        }
        Err(e) => {
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(
                    "Failed to remove partial file {}: {}",
                    path.display(),
                    remove_err
                );
            }
            Err(e)
        }
    }
}

/// Streams the response body of `url` into `file`
///
/// Returns the number of bytes written.
async fn download_into(
    client: &Client,
    url: &str,
    mut file: File,
    path: &Path,
) -> Result<u64, CrawlerError> {
    let mut response = send_get(client, url).await?;

    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(|e| CrawlerError::Network {
        url: url.to_string(),
        source: e,
    })? {
        file.write_all(&chunk)
            .await
            .map_err(|e| CrawlerError::io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| CrawlerError::io(path, e))?;
    file.sync_all().await.map_err(|e| CrawlerError::io(path, e))?;

    Ok(written)
}
