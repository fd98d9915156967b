//! Core module
//!
//! Emulator registry, game catalog, version checks and launching.

pub mod catalog;
pub mod emulator;
pub mod error;
pub mod launch;
pub mod release;
pub mod version;
