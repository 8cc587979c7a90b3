//! Test fixtures for common test scenarios.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Create source files below `<tmp>/project` and return the project root.
///
/// Each file gets a minimal C translation unit.
pub fn source_tree(tmp: &TempDir, files: &[&str]) -> PathBuf {
    let root = tmp.path().join("project");
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "int unit(void) { return 0; }\n").unwrap();
    }
    root
}

/// Create a source file with the given contents below `<tmp>/project`.
pub fn source_file(tmp: &TempDir, file: &str, contents: &str) -> PathBuf {
    let path = tmp.path().join("project").join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Source with a precompiled header as its first include.
pub const PCH_FIRST_SOURCE: &str = r#"#include "pch.h"
#include <stdio.h>

int main(void) { return 0; }
"#;

/// Source that includes the precompiled header too late to use it.
pub const PCH_LATE_SOURCE: &str = r#"/* utilities */
#include <stdio.h>
#include "pch.h"

void util(void) {}
"#;
