//! Error types
//!
//! Failure taxonomy shared by the registry, catalog, probes and launcher.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid emulator registry configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("emulator id '{0}' is registered more than once")]
    DuplicateId(String),

    #[error("extension '.{extension}' is claimed by both '{first}' and '{second}'")]
    DuplicateExtension {
        extension: String,
        first: String,
        second: String,
    },
}

/// Failure while adding to or looking up the game catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no emulator handles '.{0}' files")]
    UnsupportedExtension(String),

    #[error("invalid game name '{0}'")]
    InvalidName(String),

    #[error("game '{name}' already exists for {emulator}")]
    GameExists { name: String, emulator: String },

    #[error("game '{0}' not found")]
    NotFound(String),

    #[error("game '{name}' exists for several emulators ({}); pick one", .emulators.join(", "))]
    Ambiguous {
        name: String,
        emulators: Vec<String>,
    },

    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Failure of an installed or latest version probe
///
/// These never abort a version-check pass; the emulator is reported as unknown.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not read installed version of {emulator}: {reason}")]
    VersionProbeFailed { emulator: String, reason: String },

    #[error("release feed for {source_repo} unavailable: {reason}")]
    ReleaseFeedUnavailable { source_repo: String, reason: String },
}

/// Icon download or decode failure (non-fatal)
#[derive(Debug, Error)]
pub enum IconFetchFailed {
    #[error("icon request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("icon request returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("icon is not a readable image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Failure to start an external process
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
