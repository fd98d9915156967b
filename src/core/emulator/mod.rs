//! Emulator module
//!
//! Per-emulator descriptors and the behavior that differs between them.
//!
//! # Architecture
//!
//! Every supported emulator is a variant of [`EmulatorKind`]. Behavior that
//! varies (run command, installed-version probe, release tracking) is selected
//! with a `match` on the kind, so adding an emulator means:
//!
//! 1. Add a variant to `EmulatorKind`
//! 2. Fill in its arms in `id()`, `extension()`, `release_source()` and `version_probe()`
//! 3. Add it to `EmulatorKind::builtin()`
//!
//! The compiler flags every missed arm.

mod registry;

pub use registry::Registry;

use crate::core::catalog::GameEntry;
use crate::core::error::ProbeError;
use crate::core::launch::RunCommand;
use crate::core::release::ReleaseFeed;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Version reported by both probes of an emulator without release tracking
pub const UNTRACKED_VERSION: &str = "auto";

/// Emulators the launcher knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmulatorKind {
    /// mGBA (Game Boy Advance)
    Mgba,
    /// Dolphin (GameCube / Wii)
    Dolphin,
    /// melonDS (Nintendo DS)
    MelonDs,
    /// Azahar (Nintendo 3DS)
    Azahar,
    /// Fallback behavior for descriptors without dedicated support
    Generic,
}

/// How to read the installed version out of an emulator binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionProbe {
    /// The binary is not consulted
    Fixed(&'static str),
    /// Run with the flag, take the second whitespace-separated token of the output
    SecondToken(&'static str),
    /// Run with the flag, take the second token of the first output line
    FirstLineSecondToken(&'static str),
}

impl VersionProbe {
    /// Command-line flag passed to the binary, if the probe runs it
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            VersionProbe::Fixed(_) => None,
            VersionProbe::SecondToken(flag) | VersionProbe::FirstLineSecondToken(flag) => {
                Some(*flag)
            }
        }
    }

    /// Extract the version from the binary's output
    pub fn parse(&self, output: &str) -> Option<String> {
        let text = match self {
            VersionProbe::Fixed(version) => return Some(version.to_string()),
            VersionProbe::SecondToken(_) => output,
            VersionProbe::FirstLineSecondToken(_) => output.lines().next()?,
        };
        text.split_whitespace().nth(1).map(str::to_string)
    }
}

impl EmulatorKind {
    /// Emulators shipped with the launcher, in registration order
    pub fn builtin() -> &'static [EmulatorKind] {
        &[
            EmulatorKind::Mgba,
            EmulatorKind::Dolphin,
            EmulatorKind::MelonDs,
            EmulatorKind::Azahar,
        ]
    }

    /// Directory and binary name
    pub fn id(&self) -> &'static str {
        match self {
            EmulatorKind::Mgba => "mgba",
            EmulatorKind::Dolphin => "dolphin",
            EmulatorKind::MelonDs => "melonds",
            EmulatorKind::Azahar => "azahar",
            EmulatorKind::Generic => "generic",
        }
    }

    /// Game file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            EmulatorKind::Mgba => "gba",
            EmulatorKind::Dolphin => "rvz",
            EmulatorKind::MelonDs => "nds",
            EmulatorKind::Azahar => "cci",
            EmulatorKind::Generic => "",
        }
    }

    /// GitHub `{owner}/{repo}` to check for releases
    pub fn release_source(&self) -> Option<&'static str> {
        match self {
            EmulatorKind::Mgba => Some("mgba-emu/mgba"),
            EmulatorKind::Dolphin => None,
            EmulatorKind::MelonDs => Some("melonDS-emu/melonDS"),
            EmulatorKind::Azahar => Some("azahar-emu/azahar"),
            EmulatorKind::Generic => None,
        }
    }

    pub fn version_probe(&self) -> VersionProbe {
        match self {
            EmulatorKind::Mgba => VersionProbe::SecondToken("--version"),
            EmulatorKind::Dolphin => VersionProbe::Fixed(UNTRACKED_VERSION),
            EmulatorKind::MelonDs => VersionProbe::FirstLineSecondToken("--help"),
            EmulatorKind::Azahar => VersionProbe::SecondToken("-v"),
            EmulatorKind::Generic => VersionProbe::Fixed("0"),
        }
    }
}

/// Immutable description of one installed emulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorDescriptor {
    kind: EmulatorKind,
    id: String,
    extension: String,
    release_source: Option<String>,
    root: PathBuf,
}

impl EmulatorDescriptor {
    /// Descriptor for a built-in emulator installed under `root`
    pub fn builtin(kind: EmulatorKind, root: &Path) -> Self {
        Self {
            kind,
            id: kind.id().to_string(),
            extension: kind.extension().to_string(),
            release_source: kind.release_source().map(str::to_string),
            root: root.to_path_buf(),
        }
    }

    /// Descriptor with the fallback behavior
    ///
    /// Runs games through a diagnostic `echo` instead of a real binary.
    pub fn generic(
        id: impl Into<String>,
        extension: impl Into<String>,
        release_source: Option<String>,
        root: &Path,
    ) -> Self {
        Self {
            kind: EmulatorKind::Generic,
            id: id.into(),
            extension: extension.into(),
            release_source: release_source.filter(|s| !s.is_empty()),
            root: root.to_path_buf(),
        }
    }

    pub fn kind(&self) -> EmulatorKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn release_source(&self) -> Option<&str> {
        self.release_source.as_deref()
    }

    /// Install directory, which is also the games root
    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.id)
    }

    /// Path of the emulator executable
    pub fn binary_path(&self) -> PathBuf {
        self.dir().join(&self.id)
    }

    /// Emulator icon, if one is installed
    pub fn icon_path(&self) -> Option<PathBuf> {
        let path = self.dir().join(format!("{}.png", self.id));
        path.is_file().then_some(path)
    }

    /// Names inside the emulator directory that belong to the emulator itself
    pub fn reserved_names(&self) -> [String; 4] {
        [
            self.id.clone(),
            format!("{}.config", self.id),
            format!("{}.home", self.id),
            format!("{}.png", self.id),
        ]
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names().iter().any(|r| r == name)
    }

    /// File name a game is stored under
    pub fn game_file_name(&self) -> String {
        format!("game.{}", self.extension)
    }

    /// Command line that runs `game` in this emulator
    pub fn build_run_command(&self, game: &GameEntry) -> RunCommand {
        let game_path = game.game_path().display().to_string();
        match self.kind {
            EmulatorKind::Generic => RunCommand::new("echo").arg(format!("run {}", game_path)),
            _ => RunCommand::new(self.binary_path()).arg(game_path),
        }
    }

    /// Command line that opens the emulator without a game
    pub fn bare_run_command(&self) -> RunCommand {
        match self.kind {
            EmulatorKind::Generic => RunCommand::new("echo").arg(format!("run {}", self.id)),
            _ => RunCommand::new(self.binary_path()),
        }
    }

    /// Read the installed version from the local binary
    ///
    /// Emulators without a release source always report [`UNTRACKED_VERSION`].
    pub async fn installed_version(&self, timeout: Duration) -> Result<String, ProbeError> {
        if self.release_source.is_none() {
            return Ok(UNTRACKED_VERSION.to_string());
        }

        let probe = self.kind.version_probe();
        let Some(flag) = probe.flag() else {
            return probe.parse("").ok_or_else(|| self.probe_failed("no version"));
        };

        let binary = self.binary_path();
        let mut command = tokio::process::Command::new(&binary);
        command.arg(flag).kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(self.probe_failed(format!("cannot run {}: {}", binary.display(), e)));
            }
            Err(_) => return Err(self.probe_failed("version probe timed out")),
        };

        // Some emulators print their banner on stderr
        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = if stdout.trim().is_empty() {
            String::from_utf8_lossy(&output.stderr)
        } else {
            stdout
        };

        probe
            .parse(&text)
            .ok_or_else(|| self.probe_failed(format!("unrecognized output: {:?}", text.trim())))
    }

    /// Latest published version according to the release feed
    ///
    /// Emulators without a release source resolve to [`UNTRACKED_VERSION`]
    /// without touching the network.
    pub async fn latest_version(&self, feed: &ReleaseFeed) -> Result<String, ProbeError> {
        match &self.release_source {
            Some(source) => feed.latest_tag(source).await,
            None => Ok(UNTRACKED_VERSION.to_string()),
        }
    }

    fn probe_failed(&self, reason: impl Into<String>) -> ProbeError {
        ProbeError::VersionProbeFailed {
            emulator: self.id.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    #[test]
    fn test_version_output_parsing() {
        let mgba = EmulatorKind::Mgba.version_probe();
        assert_eq!(
            mgba.parse("mGBA 0.10.3 (f2b5ed5)\n").as_deref(),
            Some("0.10.3")
        );

        let melonds = EmulatorKind::MelonDs.version_probe();
        assert_eq!(
            melonds
                .parse("melonDS 1.0rc\nusage: melonDS [options] ...\n")
                .as_deref(),
            Some("1.0rc")
        );
        // Second token must come from the first line only
        assert_eq!(melonds.parse("melonDS\n1.0\n"), None);

        let azahar = EmulatorKind::Azahar.version_probe();
        assert_eq!(azahar.parse("Azahar 2121.2").as_deref(), Some("2121.2"));
        assert_eq!(azahar.parse(""), None);
    }

    #[test]
    fn test_builtin_table() {
        let ids: Vec<_> = EmulatorKind::builtin().iter().map(|k| k.id()).collect();
        assert_eq!(ids, ["mgba", "dolphin", "melonds", "azahar"]);
        assert_eq!(EmulatorKind::Dolphin.release_source(), None);
        assert_eq!(EmulatorKind::MelonDs.version_probe().flag(), Some("--help"));
    }

    #[test]
    fn test_paths_and_reserved_names() {
        let mgba = EmulatorDescriptor::builtin(EmulatorKind::Mgba, Path::new("/lib"));
        assert_eq!(mgba.binary_path(), PathBuf::from("/lib/mgba/mgba"));
        assert_eq!(mgba.game_file_name(), "game.gba");
        assert!(mgba.is_reserved("mgba.config"));
        assert!(mgba.is_reserved("mgba"));
        assert!(!mgba.is_reserved("mgba.bak"));
        assert!(mgba.icon_path().is_none());
    }

    #[test]
    fn test_generic_empty_source_is_untracked() {
        let emu = EmulatorDescriptor::generic("test", "tst", Some(String::new()), Path::new("/"));
        assert_eq!(emu.release_source(), None);
        assert_eq!(emu.bare_run_command().to_string(), r#"echo "run test""#);
    }

    #[tokio::test]
    async fn test_untracked_versions_match() {
        let dolphin = EmulatorDescriptor::builtin(EmulatorKind::Dolphin, Path::new("/nowhere"));
        let network = NetworkConfig::default();
        let feed = ReleaseFeed::new(crate::util::http_client(&network).unwrap(), &network);

        let installed = dolphin.installed_version(Duration::from_secs(1)).await.unwrap();
        let latest = dolphin.latest_version(&feed).await.unwrap();
        assert_eq!(installed, UNTRACKED_VERSION);
        assert_eq!(installed, latest);
    }

    #[tokio::test]
    async fn test_missing_binary_probe_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mgba = EmulatorDescriptor::builtin(EmulatorKind::Mgba, dir.path());

        let err = mgba
            .installed_version(Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::VersionProbeFailed { ref emulator, .. } if emulator == "mgba"));
    }
}
