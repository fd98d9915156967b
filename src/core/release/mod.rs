//! Release feed module
//!
//! Queries GitHub Releases for the latest published tag of an emulator.

use crate::config::NetworkConfig;
use crate::core::error::ProbeError;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

/// Subset of the GitHub Release info we rely on
#[derive(Debug, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
}

/// Client for the GitHub latest-release endpoint
#[derive(Debug, Clone)]
pub struct ReleaseFeed {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
}

impl ReleaseFeed {
    /// Wrap a client built by [`crate::util::http_client`]
    pub fn new(client: reqwest::Client, network: &NetworkConfig) -> Self {
        Self {
            client,
            api_base: network.api_base.trim_end_matches('/').to_string(),
            timeout: network.timeout(),
        }
    }

    /// Per-request timeout, also applied to local version probes
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Latest-release endpoint for an `{owner}/{repo}` source
    pub fn release_url(&self, source: &str) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, source)
    }

    /// Fetch the latest release tag for an `{owner}/{repo}` source
    pub async fn latest_tag(&self, source: &str) -> Result<String, ProbeError> {
        let release = self.fetch_latest_release(source).await.map_err(|reason| {
            ProbeError::ReleaseFeedUnavailable {
                source_repo: source.to_string(),
                reason,
            }
        })?;

        tracing::debug!("Latest release of {} is {}", source, release.tag_name);
        Ok(release.tag_name)
    }

    async fn fetch_latest_release(&self, source: &str) -> Result<GitHubRelease, String> {
        let url = self.release_url(source);

        let request = self
            .client
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/vnd.github+json"))
            .header("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

        let response = match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => return Err(format!("network error: {}", e)),
            Err(_) => return Err("request timed out".to_string()),
        };

        if !response.status().is_success() {
            if response.status().as_u16() == 404 {
                return Err("no releases found".to_string());
            }
            return Err(format!("GitHub API error: {}", response.status()));
        }

        response
            .json::<GitHubRelease>()
            .await
            .map_err(|e| format!("failed to parse release info: {}", e))
    }
}
