//! Compile request types.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::util::logger::OperationLogger;

/// Source language of a compile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C
    #[default]
    C,
    /// C++
    Cxx,
}

impl Language {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }
}

/// The `#include` and `#import` directives of one source file, in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncludeDirectives {
    includes: Vec<String>,
}

impl IncludeDirectives {
    /// Create directives from header names in declaration order.
    pub fn new(includes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        IncludeDirectives {
            includes: includes.into_iter().map(Into::into).collect(),
        }
    }

    /// The first declared header, if any.
    pub fn first(&self) -> Option<&str> {
        self.includes.first().map(String::as_str)
    }

    /// Whether `header` is declared anywhere in this file.
    pub fn contains(&self, header: &str) -> bool {
        self.includes.iter().any(|h| h == header)
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.includes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(String::as_str)
    }
}

/// One batch of source files compiled under shared options into one
/// object directory.
///
/// Read-only for the duration of a compile call.
#[derive(Debug, Clone)]
pub struct CompileSpec {
    /// Source files, in declaration order
    pub source_files: Vec<PathBuf>,
    /// Root of the object file tree
    pub object_file_dir: PathBuf,
    /// Directory for the options file
    pub temp_dir: PathBuf,
    /// Base directory mirrored beneath the object root (sources outside it
    /// are mirrored by their full path)
    pub source_root: Option<PathBuf>,
    /// Source language
    pub language: Language,
    /// Preprocessor macros (name, optional value)
    pub macros: Vec<(String, Option<String>)>,
    /// Include search directories
    pub include_roots: Vec<PathBuf>,
    /// System include search directories
    pub system_include_roots: Vec<PathBuf>,
    /// Additional compiler arguments
    pub args: Vec<String>,
    /// Header name the precompiled header was built from
    pub pre_compiled_header: Option<String>,
    /// Prefix header force-included when the precompiled header applies
    pub prefix_header_file: Option<PathBuf>,
    /// Compiled precompiled header binary (MSVC `.pch`)
    pub pre_compiled_header_object_file: Option<PathBuf>,
    /// Include directives per source file
    pub include_directives: HashMap<PathBuf, IncludeDirectives>,
    /// Operation log shared by every invocation of this request
    pub operation_logger: Arc<OperationLogger>,
}

impl CompileSpec {
    /// Create an empty spec writing objects below `object_file_dir`.
    pub fn new(
        object_file_dir: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
        operation_logger: Arc<OperationLogger>,
    ) -> Self {
        CompileSpec {
            source_files: Vec::new(),
            object_file_dir: object_file_dir.into(),
            temp_dir: temp_dir.into(),
            source_root: None,
            language: Language::default(),
            macros: Vec::new(),
            include_roots: Vec::new(),
            system_include_roots: Vec::new(),
            args: Vec::new(),
            pre_compiled_header: None,
            prefix_header_file: None,
            pre_compiled_header_object_file: None,
            include_directives: HashMap::new(),
            operation_logger,
        }
    }

    /// Add a source file together with its include directives.
    pub fn with_source(
        mut self,
        source: impl Into<PathBuf>,
        includes: IncludeDirectives,
    ) -> Self {
        let source = source.into();
        self.include_directives.insert(source.clone(), includes);
        self.source_files.push(source);
        self
    }

    /// Set the precompiled header name.
    pub fn with_pre_compiled_header(mut self, header: impl Into<String>) -> Self {
        self.pre_compiled_header = Some(header.into());
        self
    }

    /// Include directives declared by `source`.
    ///
    /// A source without an entry is treated as including nothing.
    pub fn includes_for(&self, source: &Path) -> Option<&IncludeDirectives> {
        self.include_directives.get(source)
    }
}

/// Whether a compile call did any work.
///
/// Independent of whether the individual invocations succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkResult {
    did_work: bool,
}

impl WorkResult {
    pub fn new(did_work: bool) -> Self {
        WorkResult { did_work }
    }

    pub fn did_work(&self) -> bool {
        self.did_work
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_directives_order() {
        let includes = IncludeDirectives::new(["pch.h", "stdio.h"]);
        assert_eq!(includes.first(), Some("pch.h"));
        assert!(includes.contains("stdio.h"));
        assert!(!includes.contains("stdlib.h"));
        assert_eq!(includes.iter().collect::<Vec<_>>(), vec!["pch.h", "stdio.h"]);
    }

    #[test]
    fn test_with_source_preserves_declaration_order() {
        let logger = Arc::new(OperationLogger::new("build.log"));
        let spec = CompileSpec::new("/out", "/tmp", logger)
            .with_source("src/b.c", IncludeDirectives::default())
            .with_source("src/a.c", IncludeDirectives::new(["a.h"]));

        assert_eq!(
            spec.source_files,
            vec![PathBuf::from("src/b.c"), PathBuf::from("src/a.c")]
        );
        assert_eq!(
            spec.includes_for(Path::new("src/a.c")).and_then(|i| i.first()),
            Some("a.h")
        );
        assert!(spec.includes_for(Path::new("src/c.c")).is_none());
    }

    #[test]
    fn test_language_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            language: Language,
        }

        let w: Wrapper = toml::from_str("language = \"cxx\"").unwrap();
        assert_eq!(w.language, Language::Cxx);
        assert_eq!(Language::C.as_str(), "c");
    }
}
