//! Archive discovery in the target directory
//!
//! Finds ZIP files directly inside the target directory (no recursion) with a
//! single case-insensitive suffix match. Setup problems — missing directory,
//! missing permissions, nothing to extract — are fatal here, before any
//! extraction side effects happen.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};

/// Find the ZIP archives directly inside `dir`, sorted by path.
///
/// Fails with a fatal-setup error when `dir` does not exist, is not a
/// directory, cannot be read or written, or contains no `.zip` files.
pub fn find_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let meta = match fs::metadata(dir) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::DirectoryNotFound(dir.to_path_buf()));
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(Error::PermissionDenied(dir.to_path_buf(), e.to_string()));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    if !meta.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    // The run creates combined_extraction under this directory later, so a
    // read-only directory is a setup failure, not a mid-batch surprise.
    if meta.permissions().readonly() {
        return Err(Error::PermissionDenied(
            dir.to_path_buf(),
            "directory is read-only".to_string(),
        ));
    }

    // Listing probe; covers read and traverse permission in one step.
    fs::read_dir(dir).map_err(|e| Error::PermissionDenied(dir.to_path_buf(), e.to_string()))?;

    let pattern = format!("{}/*.zip", Pattern::escape(&dir.to_string_lossy()));
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut archives = Vec::new();
    for entry in
        glob::glob_with(&pattern, options).map_err(|e| Error::InvalidGlob(e.to_string()))?
    {
        match entry {
            // A directory named something.zip is not an archive
            Ok(path) if path.is_file() => archives.push(path),
            Ok(_) => {}
            Err(e) => println!("Warning: skipping unreadable entry: {}", e),
        }
    }

    // Sort for a deterministic extraction order (last archive wins on
    // colliding paths, so the order is observable).
    archives.sort();

    if archives.is_empty() {
        return Err(Error::NoArchivesFound(dir.to_path_buf()));
    }

    Ok(archives)
}
