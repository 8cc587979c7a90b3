//! GCC/Clang argument policy.

use std::path::Path;

use crate::compiler::error::CompileError;
use crate::compiler::spec::{CompileSpec, Language};
use crate::util::fs::absolute;

use super::options_file::{reference_arg, write_options_file, ArgSyntax};
use super::{ArgumentPolicy, ToolchainFamily};

/// GCC-compatible compilers (gcc, clang, apple-clang).
#[derive(Debug, Clone)]
pub struct GccPolicy {
    /// Compiler family (gcc, clang, apple-clang)
    pub family: ToolchainFamily,
}

impl GccPolicy {
    /// Create a new GCC-style policy.
    pub fn new(family: ToolchainFamily) -> Self {
        GccPolicy { family }
    }
}

impl Default for GccPolicy {
    fn default() -> Self {
        GccPolicy::new(ToolchainFamily::Gcc)
    }
}

impl ArgumentPolicy for GccPolicy {
    fn family(&self) -> ToolchainFamily {
        self.family
    }

    fn generic_args(&self, spec: &CompileSpec) -> Vec<String> {
        let mut args = Vec::new();

        // Compile only
        args.push("-c".to_string());

        // Language
        args.push("-x".to_string());
        args.push(spec.language.as_str().to_string());

        // Defines
        for (name, value) in &spec.macros {
            match value {
                Some(v) => args.push(format!("-D{}={}", name, v)),
                None => args.push(format!("-D{}", name)),
            }
        }

        // Include directories
        for dir in &spec.include_roots {
            args.push(format!("-I{}", dir.display()));
        }
        for dir in &spec.system_include_roots {
            args.push("-isystem".to_string());
            args.push(dir.display().to_string());
        }

        // Custom flags
        args.extend(spec.args.iter().cloned());

        args
    }

    fn output_args(&self, output: &Path) -> Vec<String> {
        vec!["-o".to_string(), output.display().to_string()]
    }

    fn pch_args(&self, spec: &CompileSpec) -> Vec<String> {
        // GCC picks up `<header>.gch` next to the force-included header
        match (&spec.prefix_header_file, &spec.pre_compiled_header) {
            (Some(prefix), _) => vec![
                "-include".to_string(),
                absolute(prefix).display().to_string(),
            ],
            (None, Some(header)) => vec!["-include".to_string(), header.clone()],
            (None, None) => Vec::new(),
        }
    }

    fn object_suffix(&self) -> &str {
        ".o"
    }

    fn write_options_file(
        &self,
        args: &[String],
        temp_dir: &Path,
    ) -> Result<Vec<String>, CompileError> {
        let path = write_options_file(args, temp_dir, ArgSyntax::Gcc)?;
        Ok(vec![reference_arg(&path)])
    }
}
