//! Utility module
//!
//! Common utilities used across the application.

pub mod download;

use crate::config::NetworkConfig;

/// Build the HTTP client shared by release lookups and icon downloads
///
/// Every request carries the identifying User-Agent and the configured timeout.
pub fn http_client(network: &NetworkConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(network.user_agent.as_str())
        .timeout(network.timeout())
        .build()
}
