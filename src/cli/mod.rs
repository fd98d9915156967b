//! CLI module
//!
//! Command-line interface for emulauncher.

mod args;

pub use args::{Args, Commands};

use anyhow::{Context, Result};
use emulauncher::config::{self, Config};
use emulauncher::core::catalog::{AddGame, Catalog, intake};
use emulauncher::core::emulator::Registry;
use emulauncher::core::launch;
use emulauncher::core::release::ReleaseFeed;
use emulauncher::core::version::{self, VersionStatus};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs, built once per invocation
pub struct Session {
    config: Config,
    root: PathBuf,
    registry: Arc<Registry>,
    client: reqwest::Client,
    feed: ReleaseFeed,
}

impl Session {
    pub fn open(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => config::load_from(path)?,
            None => config::load()?,
        };

        let root = match &args.root {
            Some(root) => std::path::absolute(root)?,
            None => config
                .general
                .library_root()
                .context("Cannot resolve library directory")?,
        };
        tracing::debug!("Library root: {:?}", root);

        let registry = Arc::new(Registry::builtin(&root)?);
        let client = emulauncher::util::http_client(&config.network)?;
        let feed = ReleaseFeed::new(client.clone(), &config.network);

        Ok(Self {
            config,
            root,
            registry,
            client,
            feed,
        })
    }

    pub fn check_updates(&self) -> bool {
        self.config.general.check_updates
    }

    fn incoming_dir(&self) -> PathBuf {
        self.config.general.incoming_path(&self.root)
    }

    fn catalog(&self) -> Result<Catalog> {
        Catalog::load(Arc::clone(&self.registry)).context("Failed to scan game library")
    }
}

/// List all installed games
pub fn list_games(session: &Session) -> Result<()> {
    let catalog = session.catalog()?;
    let games = catalog.games();

    if games.is_empty() {
        println!("🎮 No games found in {}", session.root.display());
        println!("   Use 'emulauncher add <file> --name <name>' to add one.");
        return Ok(());
    }

    println!("🎮 Games ({}):", games.len());
    println!();

    for game in games {
        let missing = if game.has_game_file() {
            ""
        } else {
            " (game file missing)"
        };
        println!("   {} [{}]{}", game.name(), game.emulator().id(), missing);
    }

    Ok(())
}

/// Launch a game by name
pub fn run_game(session: &Session, name: &str, emulator: Option<&str>) -> Result<()> {
    let catalog = session.catalog()?;
    let game = catalog.find(name, emulator)?;

    println!("🚀 Launching {} with {}", game.name(), game.emulator().id());
    let pid = launch::launch(game)?;
    println!("✅ Started (PID: {})", pid);

    Ok(())
}

/// Launch an emulator on its own
pub fn open_emulator(session: &Session, id: &str) -> Result<()> {
    let emulator = session
        .registry
        .get(id)
        .with_context(|| format!("Unknown emulator '{}'", id))?;

    println!("🚀 Opening {}", emulator.id());
    let pid = launch::launch_emulator(emulator)?;
    println!("✅ Started (PID: {})", pid);

    Ok(())
}

/// Add a game from the incoming directory
pub async fn add_game(
    session: &Session,
    file: &Path,
    name: &str,
    icon_url: Option<String>,
) -> Result<()> {
    let source = if file.is_absolute() {
        file.to_path_buf()
    } else {
        session.incoming_dir().join(file)
    };

    let mut catalog = session.catalog()?;
    let request = AddGame {
        source,
        name: name.to_string(),
        icon_url,
    };

    println!("📦 Adding '{}'...", name);
    let game = catalog.add_game(&request, &session.client).await?;

    println!("✅ Added {} to {}", game.name(), game.emulator().id());
    if game.icon_path().is_none() {
        println!("   No icon stored, the default icon will be used.");
    }
    println!("   Use 'emulauncher run \"{}\"' to play.", game.name());

    Ok(())
}

/// List files that can be added
pub fn list_incoming(session: &Session) -> Result<()> {
    let dir = session.incoming_dir();
    let files = intake::choices(&dir);

    if files.iter().all(|f| f.is_empty()) {
        println!("📥 Nothing to add in {}", dir.display());
        return Ok(());
    }

    println!("📥 Incoming ({}):", files.len());
    for file in &files {
        let ext = Path::new(file)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let target = session
            .registry
            .resolve_by_extension(ext)
            .map_or("unsupported", |emulator| emulator.id());
        println!("   {} -> {}", file, target);
    }

    Ok(())
}

/// List registered emulators with their installed version
pub async fn list_emulators(session: &Session) -> Result<()> {
    println!("🕹  Emulators ({}):", session.registry.all().len());

    for emulator in session.registry.all() {
        let version = match emulator.installed_version(session.feed.timeout()).await {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("{}", e);
                "unknown".to_string()
            }
        };
        let source = emulator.release_source().unwrap_or("untracked");
        println!(
            "   {} (.{}) - {} [{}]",
            emulator.id(),
            emulator.extension(),
            version,
            source
        );
    }

    Ok(())
}

/// Check every emulator for a newer release
pub async fn check_versions(session: &Session) -> Result<()> {
    println!("🔄 Checking emulator versions...");

    let statuses = version::check_all(&session.registry, &session.feed).await;
    let unknown: Vec<_> = statuses
        .iter()
        .filter(|s| matches!(s, VersionStatus::Unknown { .. }))
        .map(|s| s.emulator_id().to_string())
        .collect();
    let reports = version::outdated(statuses);

    for report in &reports {
        println!("⚠️  {} is outdated!", report.emulator.id());
        println!("   installed: {}", report.installed);
        println!("   latest: {}", report.latest);
    }

    if !unknown.is_empty() {
        println!("❔ Could not check: {}", unknown.join(", "));
    }

    if reports.is_empty() {
        println!("✨ All checked emulators are up to date.");
    }

    Ok(())
}
