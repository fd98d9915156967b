//! Download utilities
//!
//! Fetch game icons and store them as PNG.

use crate::core::error::IconFetchFailed;
use image::ImageFormat;
use std::path::Path;

/// Download an image and save it to `dest` as PNG
///
/// Any format `image` can decode is accepted; the result is always re-encoded.
pub async fn download_icon(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), IconFetchFailed> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(IconFetchFailed::Status(response.status()));
    }

    let bytes = response.bytes().await?;
    let icon = image::load_from_memory(&bytes)?;
    icon.save_with_format(dest, ImageFormat::Png)?;

    tracing::debug!("Saved icon from {} to {:?}", url, dest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    fn client() -> reqwest::Client {
        let network = NetworkConfig {
            timeout_seconds: 1,
            ..Default::default()
        };
        crate::util::http_client(&network).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("icon.png");

        let err = download_icon(&client(), "http://127.0.0.1:9/icon.png", &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, IconFetchFailed::Http(_)));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_malformed_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("icon.png");

        assert!(download_icon(&client(), "not a url", &dest).await.is_err());
        assert!(!dest.exists());
    }
}
