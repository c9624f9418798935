//! Asset downloads with file-existence caching.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};

/// Download a URL to `dest`, streaming to disk.
///
/// Skips the download when `dest` already exists: reruns rely on this to
/// resume past completed work. A partially written file from an
/// interrupted run will be treated as complete; that gap is accepted.
pub async fn fetch_asset(client: &Client, url: &str, dest: impl AsRef<Path>) -> CatalogResult<PathBuf> {
    let dest = dest.as_ref();

    if dest.exists() {
        debug!("Asset exists, skipping download: {}", dest.display());
        return Ok(dest.to_path_buf());
    }

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut response = client.get(url).send().await?.error_for_status()?;
    let mut file = tokio::fs::File::create(dest).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    info!("Downloaded: {}", dest.display());
    Ok(dest.to_path_buf())
}

/// Download a track's audio to `<dir>/<slug>.mp3`.
pub async fn download_track_audio(
    client: &Client,
    slug: &str,
    audio_url: Option<&str>,
    dir: impl AsRef<Path>,
) -> CatalogResult<PathBuf> {
    let url = audio_url.ok_or_else(|| CatalogError::NoAudioUrl(slug.to_string()))?;
    let dest = dir.as_ref().join(format!("{}.mp3", slug));
    fetch_asset(client, url, dest).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_asset_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"audio-bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("track.mp3");
        let client = Client::new();
        fetch_asset(&client, &server.uri(), &dest).await.unwrap();
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"audio-bytes");
    }

    #[tokio::test]
    async fn test_fetch_asset_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("track.mp3");
        tokio::fs::write(&dest, b"original").await.unwrap();

        // Unreachable URL: the existing file must short-circuit the fetch.
        let client = Client::new();
        fetch_asset(&client, "http://127.0.0.1:1/nothing", &dest)
            .await
            .unwrap();
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_missing_audio_url() {
        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();
        let err = download_track_audio(&client, "slug", None, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NoAudioUrl(_)));
    }
}
