//! Emulator registry
//!
//! The fixed set of emulators, built once at startup and shared read-only.

use super::{EmulatorDescriptor, EmulatorKind};
use crate::core::error::RegistryError;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Registered emulators in registration order
#[derive(Debug, Clone)]
pub struct Registry {
    emulators: Vec<Arc<EmulatorDescriptor>>,
}

impl Registry {
    /// Registry of the built-in emulators installed under `root`
    pub fn builtin(root: &Path) -> Result<Self, RegistryError> {
        Self::new(
            EmulatorKind::builtin()
                .iter()
                .map(|kind| EmulatorDescriptor::builtin(*kind, root))
                .collect(),
        )
    }

    /// Build a registry, rejecting duplicate ids and extensions
    pub fn new(descriptors: Vec<EmulatorDescriptor>) -> Result<Self, RegistryError> {
        let mut ids = HashSet::new();
        let mut extensions: HashMap<&str, &str> = HashMap::new();

        for descriptor in &descriptors {
            if !ids.insert(descriptor.id()) {
                return Err(RegistryError::DuplicateId(descriptor.id().to_string()));
            }
            if let Some(first) = extensions.insert(descriptor.extension(), descriptor.id()) {
                return Err(RegistryError::DuplicateExtension {
                    extension: descriptor.extension().to_string(),
                    first: first.to_string(),
                    second: descriptor.id().to_string(),
                });
            }
        }

        Ok(Self {
            emulators: descriptors.into_iter().map(Arc::new).collect(),
        })
    }

    /// All emulators in registration order
    pub fn all(&self) -> &[Arc<EmulatorDescriptor>] {
        &self.emulators
    }

    /// Emulator that handles files with extension `ext` (no leading dot)
    pub fn resolve_by_extension(&self, ext: &str) -> Option<&Arc<EmulatorDescriptor>> {
        self.emulators.iter().find(|e| e.extension() == ext)
    }

    /// Emulator by id
    pub fn get(&self, id: &str) -> Option<&Arc<EmulatorDescriptor>> {
        self.emulators.iter().find(|e| e.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_round_trip() {
        let registry = Registry::builtin(Path::new("/lib")).unwrap();
        for emulator in registry.all() {
            let resolved = registry.resolve_by_extension(emulator.extension()).unwrap();
            assert!(Arc::ptr_eq(resolved, emulator));
        }
    }

    #[test]
    fn test_resolve_is_exact() {
        let registry = Registry::builtin(Path::new("/lib")).unwrap();
        assert_eq!(registry.resolve_by_extension("nds").unwrap().id(), "melonds");
        assert!(registry.resolve_by_extension(".nds").is_none());
        assert!(registry.resolve_by_extension("NDS").is_none());
        assert!(registry.resolve_by_extension("zip").is_none());
    }

    #[test]
    fn test_registration_order() {
        let registry = Registry::builtin(Path::new("/lib")).unwrap();
        let ids: Vec<_> = registry.all().iter().map(|e| e.id()).collect();
        assert_eq!(ids, ["mgba", "dolphin", "melonds", "azahar"]);
        assert_eq!(registry.get("azahar").unwrap().extension(), "cci");
        assert!(registry.get("snes9x").is_none());
    }

    #[test]
    fn test_duplicate_extension_rejected() {
        let root = Path::new("/lib");
        let err = Registry::new(vec![
            EmulatorDescriptor::builtin(EmulatorKind::Mgba, root),
            EmulatorDescriptor::generic("vba", "gba", None, root),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateExtension {
                extension: "gba".to_string(),
                first: "mgba".to_string(),
                second: "vba".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let root = Path::new("/lib");
        let err = Registry::new(vec![
            EmulatorDescriptor::builtin(EmulatorKind::Mgba, root),
            EmulatorDescriptor::generic("mgba", "agb", None, root),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId("mgba".to_string()));
    }
}
