//! Incoming game files
//!
//! Lists files waiting in the incoming directory to be added to the library.

use std::io;
use std::path::Path;

/// Archives are left for the user to extract first
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "7z"];

fn is_archive(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext))
}

/// Selectable file names in `dir`, sorted
///
/// A missing directory has no candidates.
pub fn candidates(dir: &Path) -> io::Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !is_archive(name) {
                files.push(name.to_string());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Candidates for a selection list
///
/// Never empty: with nothing to add, a single blank placeholder is returned.
pub fn choices(dir: &Path) -> Vec<String> {
    match candidates(dir) {
        Ok(files) if !files.is_empty() => files,
        Ok(_) => vec![String::new()],
        Err(e) => {
            tracing::warn!("Could not list {:?}: {}", dir, e);
            vec![String::new()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_archives_excluded() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.nds", "a.gba", "pack.zip", "pack.7z", "c.cci", "notes.ZIP"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("extracted")).unwrap();

        assert_eq!(
            candidates(dir.path()).unwrap(),
            ["a.gba", "b.nds", "c.cci", "notes.ZIP"]
        );
    }

    #[test]
    fn test_empty_directory_gives_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("only.zip"), "").unwrap();

        assert!(candidates(dir.path()).unwrap().is_empty());
        assert_eq!(choices(dir.path()), [""]);
    }

    #[test]
    fn test_missing_directory_gives_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("rom zips");

        assert!(candidates(&missing).unwrap().is_empty());
        assert_eq!(choices(&missing), [""]);
    }
}
