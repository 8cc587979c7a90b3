//! Configuration file support for Harbour Compile.
//!
//! A compile request is described by a TOML file (`Compile.toml` by
//! default). Paths in the request are relative to the file's directory.
//!
//! Toolchain overrides are stored separately:
//! - Global: `~/.harbour/toolchain.toml`
//! - Project: `.harbour/toolchain.toml`
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::compiler::includes::scan_file;
use crate::compiler::output::PathLimit;
use crate::compiler::spec::{CompileSpec, IncludeDirectives, Language};
use crate::util::fs::{absolute, expand_sources};
use crate::util::logger::OperationLogger;

/// Default request file name.
pub const REQUEST_FILE: &str = "Compile.toml";

/// A compile request file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileRequest {
    /// Source files or glob patterns
    pub sources: Vec<String>,

    /// Root of the object file tree
    pub object_dir: PathBuf,

    /// Directory for the options file
    pub temp_dir: PathBuf,

    /// Source language (c, cxx)
    pub language: Language,

    /// Preprocessor defines, `NAME` or `NAME=VALUE`
    pub defines: Vec<String>,

    /// Include search directories
    pub include_dirs: Vec<PathBuf>,

    /// System include search directories
    pub system_include_dirs: Vec<PathBuf>,

    /// Additional compiler arguments
    pub args: Vec<String>,

    /// Header the precompiled header was built from, as written in includes
    pub precompiled_header: Option<String>,

    /// Prefix header force-included into eligible sources
    pub prefix_header: Option<PathBuf>,

    /// Compiled precompiled header binary
    pub pch_file: Option<PathBuf>,

    /// Pass generic arguments through an options file
    pub command_file: bool,

    /// Operation log file (defaults to `<temp_dir>/output.txt`)
    pub log_file: Option<PathBuf>,

    /// Base directory mirrored beneath the object directory
    pub source_root: Option<PathBuf>,

    /// Maximum object path length (defaults to the host limit)
    pub path_limit: Option<usize>,

    /// Include directives per source, overriding scanning
    pub includes: BTreeMap<String, Vec<String>>,
}

impl Default for CompileRequest {
    fn default() -> Self {
        CompileRequest {
            sources: Vec::new(),
            object_dir: PathBuf::from("build/obj"),
            temp_dir: PathBuf::from("build/tmp"),
            language: Language::default(),
            defines: Vec::new(),
            include_dirs: Vec::new(),
            system_include_dirs: Vec::new(),
            args: Vec::new(),
            precompiled_header: None,
            prefix_header: None,
            pch_file: None,
            command_file: false,
            log_file: None,
            source_root: None,
            path_limit: None,
            includes: BTreeMap::new(),
        }
    }
}

impl CompileRequest {
    /// Load a request from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read compile request: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse compile request: {}", path.display()))
    }

    /// Parse a request from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Object path length limit for this request.
    pub fn path_limit(&self) -> PathLimit {
        match self.path_limit {
            Some(limit) => PathLimit::max(limit),
            None => PathLimit::host(),
        }
    }

    /// Operation log location, relative to `base_dir`.
    pub fn log_location(&self, base_dir: &Path) -> PathBuf {
        match &self.log_file {
            Some(log) => base_dir.join(log),
            None => base_dir.join(&self.temp_dir).join("output.txt"),
        }
    }

    /// Build the compile spec, resolving paths against `base_dir`.
    ///
    /// Include directives come from the `[includes]` table when it names a
    /// source, otherwise they are scanned from the source text.
    pub fn into_spec(self, base_dir: &Path) -> Result<CompileSpec> {
        let base_dir = absolute(base_dir);
        let logger = Arc::new(OperationLogger::new(self.log_location(&base_dir)));

        let mut spec = CompileSpec::new(
            base_dir.join(&self.object_dir),
            base_dir.join(&self.temp_dir),
            logger,
        );
        spec.language = self.language;
        // Sources are mirrored relative to the request directory by default
        spec.source_root = Some(match &self.source_root {
            Some(root) => base_dir.join(root),
            None => base_dir.clone(),
        });
        spec.macros = self.defines.iter().map(|d| parse_define(d)).collect();
        spec.include_roots = self.include_dirs.iter().map(|d| base_dir.join(d)).collect();
        spec.system_include_roots = self
            .system_include_dirs
            .iter()
            .map(|d| base_dir.join(d))
            .collect();
        spec.args = self.args;
        spec.pre_compiled_header = self.precompiled_header;
        spec.prefix_header_file = self.prefix_header.map(|p| base_dir.join(p));
        spec.pre_compiled_header_object_file = self.pch_file.map(|p| base_dir.join(p));

        let declared: BTreeMap<PathBuf, Vec<String>> = self
            .includes
            .into_iter()
            .map(|(source, includes)| (base_dir.join(source), includes))
            .collect();

        for source in expand_sources(&base_dir, &self.sources)? {
            let includes = match declared.get(&source) {
                Some(includes) => IncludeDirectives::new(includes.iter().cloned()),
                None => scan_file(&source).with_context(|| {
                    format!("failed to scan include directives of {}", source.display())
                })?,
            };
            spec = spec.with_source(source, includes);
        }

        Ok(spec)
    }
}

fn parse_define(define: &str) -> (String, Option<String>) {
    match define.split_once('=') {
        Some((name, value)) => (name.to_string(), Some(value.to_string())),
        None => (define.to_string(), None),
    }
}

/// Toolchain configuration for compiler overrides.
///
/// This is stored in a separate file (`toolchain.toml`) from the request
/// to allow easy toolchain switching without modifying it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain settings
    pub toolchain: ToolchainSettings,
}

/// Toolchain settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Toolchain family (gcc, clang, apple-clang, msvc)
    pub family: Option<String>,

    /// Path to the compiler (e.g., /usr/bin/clang)
    pub compiler: Option<PathBuf>,
}

impl ToolchainConfig {
    /// Load toolchain configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse toolchain config: {}", path.display()))
    }

    /// Load toolchain configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load toolchain config from {}: {:#}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: ToolchainConfig) {
        if other.toolchain.family.is_some() {
            self.toolchain.family = other.toolchain.family;
        }
        if other.toolchain.compiler.is_some() {
            self.toolchain.compiler = other.toolchain.compiler;
        }
    }
}

/// Load merged toolchain configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.harbour/toolchain.toml)
/// 2. Global config (~/.harbour/toolchain.toml)
/// 3. Defaults
pub fn load_toolchain_config(global_path: Option<&Path>, project_path: &Path) -> ToolchainConfig {
    let mut config = ToolchainConfig::default();

    if let Some(global_path) = global_path {
        config.merge(ToolchainConfig::load_or_default(global_path));
    }

    config.merge(ToolchainConfig::load_or_default(project_path));

    config
}

/// Get the global harbour config directory (~/.harbour).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".harbour"))
}

/// Get the global toolchain config path (~/.harbour/toolchain.toml).
pub fn global_toolchain_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("toolchain.toml"))
}

/// Get the project toolchain config path (.harbour/toolchain.toml).
pub fn project_toolchain_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".harbour").join("toolchain.toml")
}
