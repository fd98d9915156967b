//! Game catalog module
//!
//! Reflects the per-emulator game directories into a sorted list of games.
//!
//! Layout under the library root:
//!
//! ```text
//! {emulator}/{emulator}            emulator binary (plus .config/.home/.png)
//! {emulator}/{game}/game.{ext}     game file
//! {emulator}/{game}/icon.png       optional icon
//! ```

pub mod intake;

use crate::core::emulator::{EmulatorDescriptor, Registry};
use crate::core::error::CatalogError;
use crate::util::download::download_icon;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// File name of a game's icon inside its directory
pub const ICON_FILE: &str = "icon.png";

/// A game directory bound to the emulator that runs it
#[derive(Debug, Clone)]
pub struct GameEntry {
    name: String,
    emulator: Arc<EmulatorDescriptor>,
    game_path: PathBuf,
}

impl GameEntry {
    pub fn new(name: impl Into<String>, emulator: Arc<EmulatorDescriptor>) -> Self {
        let name = name.into();
        let game_path = emulator.dir().join(&name).join(emulator.game_file_name());
        Self {
            name,
            emulator,
            game_path,
        }
    }

    /// Directory name, used as display label
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emulator(&self) -> &Arc<EmulatorDescriptor> {
        &self.emulator
    }

    /// `{emulator}/{name}/game.{ext}`
    pub fn game_path(&self) -> &Path {
        &self.game_path
    }

    pub fn dir(&self) -> PathBuf {
        self.emulator.dir().join(&self.name)
    }

    /// Game icon, if one was stored
    pub fn icon_path(&self) -> Option<PathBuf> {
        let path = self.dir().join(ICON_FILE);
        path.is_file().then_some(path)
    }

    pub fn has_game_file(&self) -> bool {
        self.game_path.is_file()
    }
}

impl PartialEq for GameEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.emulator.id() == other.emulator.id()
    }
}

impl Eq for GameEntry {}

/// Request to move a file from the incoming directory into the library
#[derive(Debug, Clone)]
pub struct AddGame {
    /// Game file to move
    pub source: PathBuf,
    /// Display name, becomes the game directory name
    pub name: String,
    /// Optional icon to download
    pub icon_url: Option<String>,
}

/// Sort games by name, byte-wise and case-sensitive
///
/// Stable, so games with the same name keep their registration order.
pub fn sort_alphabetical(games: &mut [GameEntry]) {
    games.sort_by(|a, b| a.name.cmp(&b.name));
}

/// List the games installed for one emulator
///
/// A missing emulator directory yields no games.
pub fn scan_emulator(emulator: &Arc<EmulatorDescriptor>) -> Result<Vec<GameEntry>, CatalogError> {
    let dir = emulator.dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("Emulator directory {:?} does not exist", dir);
            return Ok(Vec::new());
        }
        Err(e) => return Err(CatalogError::fs(dir, e)),
    };

    let mut games = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::fs(&dir, e))?;

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!("Skipping non UTF-8 entry {:?}", entry.path());
            continue;
        };

        if emulator.is_reserved(&name) || !entry.path().is_dir() {
            continue;
        }

        let game = GameEntry::new(name, Arc::clone(emulator));
        if !game.has_game_file() {
            tracing::warn!("{} has no {}", game.name(), emulator.game_file_name());
        }
        games.push(game);
    }

    Ok(games)
}

/// Validate a display name for use as a directory name
fn validate_name(name: &str, emulator: &EmulatorDescriptor) -> Result<(), CatalogError> {
    let mut components = Path::new(name).components();
    let single_component = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if name.trim().is_empty()
        || !single_component
        || name.contains(['/', '\\'])
        || emulator.is_reserved(name)
    {
        return Err(CatalogError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Move a file, falling back to copy + remove across filesystems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Err(rename_err) = fs::rename(from, to) {
        tracing::debug!("rename failed ({}), copying instead", rename_err);
        fs::copy(from, to)?;
        if let Err(e) = fs::remove_file(from) {
            let _ = fs::remove_file(to);
            return Err(e);
        }
    }
    Ok(())
}

/// Create the game directory and move the game file into it
///
/// If the move fails the freshly created directory is removed again.
fn place_game(game_dir: &Path, source: &Path, dest: &Path) -> Result<(), CatalogError> {
    fs::create_dir(game_dir).map_err(|e| CatalogError::fs(game_dir, e))?;
    if let Err(e) = move_file(source, dest) {
        if let Err(cleanup) = fs::remove_dir_all(game_dir) {
            tracing::error!("Could not remove {:?}: {}", game_dir, cleanup);
        }
        return Err(CatalogError::fs(source, e));
    }
    Ok(())
}

/// In-memory view of all installed games
#[derive(Debug)]
pub struct Catalog {
    registry: Arc<Registry>,
    games: Vec<GameEntry>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            games: Vec::new(),
        }
    }

    /// Create a catalog and scan the library
    pub fn load(registry: Arc<Registry>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(registry);
        catalog.rebuild()?;
        Ok(catalog)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Games from the last rebuild, sorted by name
    pub fn games(&self) -> &[GameEntry] {
        &self.games
    }

    /// Discard the current list and rescan every emulator directory
    pub fn rebuild(&mut self) -> Result<&[GameEntry], CatalogError> {
        let mut games = Vec::new();
        for emulator in self.registry.all() {
            games.extend(scan_emulator(emulator)?);
        }
        sort_alphabetical(&mut games);

        tracing::debug!("Catalog rebuilt with {} games", games.len());
        self.games = games;
        Ok(&self.games)
    }

    /// Find a game by name
    ///
    /// The same name may exist under several emulators; pass `emulator` to pick one.
    pub fn find(&self, name: &str, emulator: Option<&str>) -> Result<&GameEntry, CatalogError> {
        let matches: Vec<&GameEntry> = self
            .games
            .iter()
            .filter(|g| g.name == name)
            .filter(|g| emulator.is_none_or(|id| g.emulator.id() == id))
            .collect();

        match matches.as_slice() {
            [] => Err(CatalogError::NotFound(name.to_string())),
            [game] => Ok(game),
            _ => Err(CatalogError::Ambiguous {
                name: name.to_string(),
                emulators: matches
                    .iter()
                    .map(|g| g.emulator.id().to_string())
                    .collect(),
            }),
        }
    }

    /// Emulator responsible for a game file, by extension
    pub fn resolve_source(&self, source: &Path) -> Result<&Arc<EmulatorDescriptor>, CatalogError> {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        self.registry
            .resolve_by_extension(ext)
            .ok_or_else(|| CatalogError::UnsupportedExtension(ext.to_string()))
    }

    /// Move a game file into the library and rescan
    ///
    /// The game directory and file move succeed or fail together. The icon
    /// download and the rescan are best effort and never undo the addition.
    pub async fn add_game(
        &mut self,
        request: &AddGame,
        client: &reqwest::Client,
    ) -> Result<GameEntry, CatalogError> {
        let emulator = Arc::clone(self.resolve_source(&request.source)?);
        validate_name(&request.name, &emulator)?;

        if !request.source.is_file() {
            return Err(CatalogError::fs(
                &request.source,
                io::Error::new(io::ErrorKind::NotFound, "game file not found"),
            ));
        }

        let game = GameEntry::new(request.name.clone(), Arc::clone(&emulator));
        let game_dir = game.dir();
        if game_dir.exists() {
            return Err(CatalogError::GameExists {
                name: request.name.clone(),
                emulator: emulator.id().to_string(),
            });
        }

        place_game(&game_dir, &request.source, game.game_path())?;

        tracing::info!("Added {} to {}", game.name(), emulator.id());

        if let Some(url) = request.icon_url.as_deref().filter(|u| !u.trim().is_empty()) {
            if let Err(e) = download_icon(client, url, &game_dir.join(ICON_FILE)).await {
                tracing::warn!("Could not load icon for {}: {}", game.name(), e);
            }
        }

        // The game is in place; a failed rescan leaves the old list but is not an add failure
        if let Err(e) = self.rebuild() {
            tracing::warn!("Added {} but could not rescan the library: {}", game.name(), e);
        }
        Ok(self
            .games
            .iter()
            .find(|g| **g == game)
            .cloned()
            .unwrap_or(game))
    }
}
