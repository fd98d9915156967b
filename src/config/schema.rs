//! Configuration schema
//!
//! Defines the structure of the configuration file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// Library layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding one subdirectory per emulator (empty = current directory)
    #[serde(default)]
    pub library_dir: String,

    /// Directory scanned for game files to add, relative to the library
    #[serde(default = "default_incoming_dir")]
    pub incoming_dir: String,

    /// Check emulators for new releases on startup
    #[serde(default = "default_true")]
    pub check_updates: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            library_dir: String::new(),
            incoming_dir: default_incoming_dir(),
            check_updates: true,
        }
    }
}

impl GeneralConfig {
    /// Absolute library root
    pub fn library_root(&self) -> std::io::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        if self.library_dir.is_empty() {
            Ok(cwd)
        } else {
            Ok(cwd.join(&self.library_dir))
        }
    }

    /// Incoming directory resolved against the library root
    pub fn incoming_path(&self, library_root: &Path) -> PathBuf {
        library_root.join(&self.incoming_dir)
    }
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds (release feed and icon downloads)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Value of the identifying User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the release API
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            api_base: default_api_base(),
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

// Default value functions for serde
fn default_incoming_dir() -> String {
    "rom zips".to_string()
}
fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    5
}
fn default_user_agent() -> String {
    "emulauncher".to_string()
}
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.general.incoming_dir, "rom zips");
        assert!(config.general.check_updates);
        assert_eq!(config.network.timeout_seconds, 5);
        assert_eq!(config.network.api_base, "https://api.github.com");
    }

    #[test]
    fn test_partial_section() {
        let config: Config = toml::from_str(
            r#"
            [general]
            library_dir = "/games"
            check_updates = false

            [network]
            timeout_seconds = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.general.library_dir, "/games");
        assert!(!config.general.check_updates);
        assert_eq!(config.general.incoming_dir, "rom zips");
        assert_eq!(config.network.timeout(), Duration::from_secs(2));
        assert_eq!(config.network.user_agent, "emulauncher");
    }

    #[test]
    fn test_absolute_library_dir_wins() {
        let general = GeneralConfig {
            library_dir: "/srv/emulators".to_string(),
            ..Default::default()
        };
        let root = general.library_root().unwrap();
        assert_eq!(root, PathBuf::from("/srv/emulators"));
        assert_eq!(
            general.incoming_path(&root),
            PathBuf::from("/srv/emulators/rom zips")
        );
    }
}
