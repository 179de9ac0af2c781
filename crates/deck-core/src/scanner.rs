//! Directory scanner for discovering deck files

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of scanning directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root directories that were scanned
    pub roots: Vec<PathBuf>,
    /// Deck files found, sorted by path
    pub files: Vec<PathBuf>,
}

impl ScanResult {
    /// Number of deck files found
    pub fn total_files(&self) -> usize {
        self.files.len()
    }
}

/// Walk one or more directories collecting files with one of `extensions`
/// (compared case-insensitively, without the dot)
pub fn scan_deck_files<P: AsRef<Path>>(roots: &[P], extensions: &[&str]) -> Result<ScanResult> {
    let mut files = Vec::new();

    for root in roots {
        for entry in WalkDir::new(root.as_ref()).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if has_extension(path, extensions) {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();

    Ok(ScanResult {
        roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
        files,
    })
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| ext.eq_ignore_ascii_case(wanted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a/burn.txt"), &["txt", "dec"]));
        assert!(has_extension(Path::new("a/burn.MWDECK"), &["mwdeck"]));
        assert!(!has_extension(Path::new("a/burn.json"), &["txt"]));
        assert!(!has_extension(Path::new("a/README"), &["txt"]));
    }

    #[test]
    fn test_scan_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("legacy/old");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("burn.txt"), "4 Lightning Bolt").unwrap();
        fs::write(nested.join("control.dec"), "4 Counterspell").unwrap();
        fs::write(nested.join("notes.md"), "# not a deck").unwrap();

        let result = scan_deck_files(&[dir.path()], &["txt", "dec"]).unwrap();
        assert_eq!(result.total_files(), 2);
        assert!(result.files[0].ends_with("burn.txt"));
        assert!(result.files[1].ends_with("legacy/old/control.dec"));
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        assert!(scan_deck_files(&["/no/such/dir"], &["txt"]).is_err());
    }
}
