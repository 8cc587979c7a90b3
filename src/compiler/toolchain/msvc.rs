//! MSVC argument policy.

use std::path::Path;

use crate::compiler::error::CompileError;
use crate::compiler::spec::{CompileSpec, Language};

use super::options_file::{reference_arg, write_options_file, ArgSyntax};
use super::{ArgumentPolicy, ToolchainFamily};

/// MSVC (`cl.exe`).
#[derive(Debug, Clone, Default)]
pub struct MsvcPolicy;

impl MsvcPolicy {
    /// Create a new MSVC policy.
    pub fn new() -> Self {
        MsvcPolicy
    }
}

impl ArgumentPolicy for MsvcPolicy {
    fn family(&self) -> ToolchainFamily {
        ToolchainFamily::Msvc
    }

    fn generic_args(&self, spec: &CompileSpec) -> Vec<String> {
        let mut args = Vec::new();

        // Quiet logo, compile only
        args.push("/nologo".to_string());
        args.push("/c".to_string());

        // Force the source language
        args.push(
            match spec.language {
                Language::C => "/TC",
                Language::Cxx => "/TP",
            }
            .to_string(),
        );

        // Defines
        for (name, value) in &spec.macros {
            match value {
                Some(v) => args.push(format!("/D{}={}", name, v)),
                None => args.push(format!("/D{}", name)),
            }
        }

        // cl.exe has no separate system include flag
        for dir in spec.include_roots.iter().chain(&spec.system_include_roots) {
            args.push(format!("/I{}", dir.display()));
        }

        // Custom flags
        args.extend(spec.args.iter().cloned());

        args
    }

    fn output_args(&self, output: &Path) -> Vec<String> {
        vec![format!("/Fo{}", output.display())]
    }

    fn pch_args(&self, spec: &CompileSpec) -> Vec<String> {
        let Some(header) = &spec.pre_compiled_header else {
            return Vec::new();
        };

        let mut args = vec![format!("/Yu{}", header)];
        if let Some(pch) = &spec.pre_compiled_header_object_file {
            args.push(format!("/Fp{}", pch.display()));
        }
        match &spec.prefix_header_file {
            Some(prefix) => args.push(format!("/FI{}", prefix.display())),
            None => args.push(format!("/FI{}", header)),
        }
        args
    }

    fn object_suffix(&self) -> &str {
        ".obj"
    }

    fn write_options_file(
        &self,
        args: &[String],
        temp_dir: &Path,
    ) -> Result<Vec<String>, CompileError> {
        let path = write_options_file(args, temp_dir, ArgSyntax::Windows)?;
        Ok(vec![reference_arg(&path)])
    }
}
