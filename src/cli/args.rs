//! CLI argument definitions
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// emulauncher - Lightweight launcher for locally installed emulators
#[derive(Parser, Debug)]
#[command(name = "emulauncher")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Library directory holding one folder per emulator (overrides config)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file to use instead of ~/.emulauncher/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List installed games
    List,

    /// Launch a game
    Run {
        /// Game name
        name: String,
        /// Emulator id, needed when several emulators have a game with this name
        #[arg(short, long)]
        emulator: Option<String>,
    },

    /// Launch an emulator without a game
    Open {
        /// Emulator id
        emulator: String,
    },

    /// Add a game from the incoming directory
    Add {
        /// Game file, relative to the incoming directory unless absolute
        file: PathBuf,
        /// Display name of the game
        #[arg(short, long)]
        name: String,
        /// URL of an icon image to download
        #[arg(short, long)]
        icon_url: Option<String>,
    },

    /// List files in the incoming directory that can be added
    Incoming,

    /// List registered emulators and their installed versions
    Emulators,

    /// Check emulators for new releases
    Check,
}
