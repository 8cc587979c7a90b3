//! Object file paths.
//!
//! Object files mirror the source tree beneath the object directory:
//! `src/net/socket.c` compiles to `<objects>/src/net/socket.o`. The mapping
//! is a pure function of its inputs, and two sources can only share an
//! object path if they share a directory and a file stem.

use std::path::{Component, Path, PathBuf};

use crate::compiler::error::CompileError;
use crate::util::fs::{absolute, ensure_dir};

/// Maximum absolute path length accepted for object files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLimit(Option<usize>);

impl PathLimit {
    /// `MAX_PATH` on Windows.
    pub const WINDOWS_MAX_PATH: usize = 260;

    /// The limit of the host operating system.
    pub fn host() -> Self {
        if cfg!(windows) {
            PathLimit(Some(Self::WINDOWS_MAX_PATH))
        } else {
            PathLimit(None)
        }
    }

    pub fn unlimited() -> Self {
        PathLimit(None)
    }

    pub fn max(chars: usize) -> Self {
        PathLimit(Some(chars))
    }

    pub fn limit(&self) -> Option<usize> {
        self.0
    }

    /// Fail if the absolute form of `path` exceeds the limit.
    pub fn check(&self, path: &Path) -> Result<(), CompileError> {
        let Some(limit) = self.0 else {
            return Ok(());
        };

        let absolute = absolute(path);
        if absolute.to_string_lossy().chars().count() > limit {
            return Err(CompileError::PathTooLong {
                path: absolute,
                limit,
            });
        }
        Ok(())
    }
}

impl Default for PathLimit {
    fn default() -> Self {
        PathLimit::host()
    }
}

/// Map a source file to its object file path.
///
/// The source's directory structure is mirrored beneath `object_dir` and its
/// extension replaced by `suffix`. With a `source_root`, sources beneath it
/// are mirrored relative to it. Root and drive components are dropped (a
/// drive letter becomes a directory) and `..` becomes `__`, so the result
/// never leaves `object_dir`.
pub fn object_file_path(
    object_dir: &Path,
    source: &Path,
    suffix: &str,
    source_root: Option<&Path>,
) -> PathBuf {
    let relative = source_root
        .and_then(|root| source.strip_prefix(root).ok())
        .unwrap_or(source);

    let mut output = object_dir.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Prefix(prefix) => output.push(prefix_dir_name(prefix.as_os_str())),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => output.push("__"),
            Component::Normal(part) => output.push(part),
        }
    }

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.set_file_name(format!("{}{}", stem, suffix));
    output
}

fn prefix_dir_name(prefix: &std::ffi::OsStr) -> String {
    let name: String = prefix
        .to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    name.trim_matches('_').to_string()
}

/// Resolve the object path for `source` and create its parent directory.
///
/// The path length is checked before anything is created.
pub fn resolve(
    object_dir: &Path,
    source: &Path,
    suffix: &str,
    source_root: Option<&Path>,
    limit: PathLimit,
) -> Result<PathBuf, CompileError> {
    let output = object_file_path(object_dir, source, suffix, source_root);
    limit.check(&output)?;

    if let Some(parent) = output.parent() {
        ensure_dir(parent).map_err(|source| CompileError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    Ok(output)
}
