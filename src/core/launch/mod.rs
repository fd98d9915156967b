//! Launch module
//!
//! Start emulators as detached processes.
//!
//! Launching is fire-and-forget: the child is spawned and immediately
//! released. The launcher never waits on it and does not track its lifetime
//! or exit code.

use crate::core::catalog::GameEntry;
use crate::core::emulator::EmulatorDescriptor;
use crate::core::error::LaunchError;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// An operating-system command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl RunCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Spawn the command without waiting for it
    ///
    /// Returns the child's process id.
    pub fn spawn_detached(&self) -> Result<u32, LaunchError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if let Some(dir) = self.program.parent().filter(|d| d.is_dir()) {
            cmd.current_dir(dir);
        }

        tracing::info!("Launching: {}", self);

        let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            command: self.to_string(),
            source,
        })?;

        Ok(child.id())
    }
}

impl fmt::Display for RunCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " \"{}\"", arg)?;
        }
        Ok(())
    }
}

/// Launch a game with its bound emulator
pub fn launch(game: &GameEntry) -> Result<u32, LaunchError> {
    let command = game.emulator().build_run_command(game);
    let pid = command.spawn_detached()?;
    tracing::debug!("{} started as pid {}", game.name(), pid);
    Ok(pid)
}

/// Launch an emulator on its own, without a game
pub fn launch_emulator(emulator: &EmulatorDescriptor) -> Result<u32, LaunchError> {
    emulator.bare_run_command().spawn_detached()
}
