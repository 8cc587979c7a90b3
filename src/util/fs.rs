//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Ensure a directory exists, creating it and its parents if necessary.
///
/// Safe to call concurrently for the same or overlapping directories: a
/// directory created by another thread in the meantime is not an error.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path)
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Expand source entries relative to a base directory.
///
/// Entries containing glob metacharacters are expanded (matches sorted);
/// plain entries are kept as-is, in declaration order, even if they do not
/// exist yet.
pub fn expand_sources(base: &Path, entries: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for entry in entries {
        let full = base.join(entry);

        if !entry.contains(['*', '?', '[']) {
            results.push(full);
            continue;
        }

        let pattern = full.to_string_lossy();
        let mut matches = Vec::new();
        for path in glob(&pattern).with_context(|| format!("invalid glob pattern: {}", entry))? {
            match path {
                Ok(path) if path.is_file() => matches.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!("glob error: {}", e),
            }
        }
        matches.sort();
        results.extend(matches);
    }

    // Keep the first occurrence of each file
    let mut seen = std::collections::HashSet::new();
    results.retain(|p| seen.insert(p.clone()));
    Ok(results)
}

/// Make a path absolute without touching the filesystem.
///
/// Returns the path as-is if the current directory cannot be determined.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
