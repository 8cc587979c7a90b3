//! Compiler argument policies.
//!
//! Each toolchain family knows its own flag syntax: the shared compile
//! arguments, output flags, precompiled-header flags and command-file
//! syntax. The compile driver never branches on the family itself.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::compiler::error::CompileError;
use crate::compiler::spec::CompileSpec;

mod gcc;
mod msvc;
pub mod options_file;

pub use gcc::GccPolicy;
pub use msvc::MsvcPolicy;
pub use options_file::ArgSyntax;

/// The family of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainFamily {
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
    /// Apple Clang (macOS)
    AppleClang,
    /// Microsoft Visual C++
    Msvc,
}

impl ToolchainFamily {
    /// Get the family name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainFamily::Gcc => "gcc",
            ToolchainFamily::Clang => "clang",
            ToolchainFamily::AppleClang => "apple-clang",
            ToolchainFamily::Msvc => "msvc",
        }
    }

    /// Infer the family from a compiler executable name.
    ///
    /// - `cl`, `cl.exe`, `clang-cl` -> msvc
    /// - anything containing `clang` -> clang
    /// - everything else -> gcc
    pub fn infer(compiler: &Path) -> Self {
        let name = compiler
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name == "cl" || name == "clang-cl" {
            ToolchainFamily::Msvc
        } else if name.contains("clang") {
            ToolchainFamily::Clang
        } else {
            ToolchainFamily::Gcc
        }
    }

    /// Argument policy for this family.
    pub fn policy(&self) -> Arc<dyn ArgumentPolicy> {
        match self {
            ToolchainFamily::Msvc => Arc::new(MsvcPolicy::new()),
            family => Arc::new(GccPolicy::new(*family)),
        }
    }
}

impl FromStr for ToolchainFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcc" => Ok(ToolchainFamily::Gcc),
            "clang" => Ok(ToolchainFamily::Clang),
            "apple-clang" | "appleclang" => Ok(ToolchainFamily::AppleClang),
            "msvc" | "cl" => Ok(ToolchainFamily::Msvc),
            _ => Err(format!(
                "unknown toolchain family '{}'; expected 'gcc', 'clang', 'apple-clang', or 'msvc'",
                s
            )),
        }
    }
}

/// Toolchain-specific argument syntax.
///
/// Implementations are pure apart from [`ArgumentPolicy::write_options_file`].
pub trait ArgumentPolicy: Send + Sync {
    /// Get the toolchain family.
    fn family(&self) -> ToolchainFamily;

    /// Arguments shared by every per-file invocation of a request.
    fn generic_args(&self, spec: &CompileSpec) -> Vec<String>;

    /// Arguments directing the compiler to write `output`.
    fn output_args(&self, output: &Path) -> Vec<String>;

    /// Arguments that make the compiler use the precompiled header.
    fn pch_args(&self, spec: &CompileSpec) -> Vec<String>;

    /// Object file suffix, including the leading dot.
    fn object_suffix(&self) -> &str;

    /// Write `args` to an options file in `temp_dir` and return the
    /// arguments that reference it.
    fn write_options_file(
        &self,
        args: &[String],
        temp_dir: &Path,
    ) -> Result<Vec<String>, CompileError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_family() {
        assert_eq!(ToolchainFamily::infer(Path::new("/usr/bin/gcc")), ToolchainFamily::Gcc);
        assert_eq!(
            ToolchainFamily::infer(Path::new("x86_64-linux-gnu-gcc-13")),
            ToolchainFamily::Gcc
        );
        assert_eq!(ToolchainFamily::infer(Path::new("clang-17")), ToolchainFamily::Clang);
        assert_eq!(ToolchainFamily::infer(Path::new("cl.exe")), ToolchainFamily::Msvc);
        assert_eq!(ToolchainFamily::infer(Path::new("cc")), ToolchainFamily::Gcc);
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("GCC".parse::<ToolchainFamily>(), Ok(ToolchainFamily::Gcc));
        assert_eq!("msvc".parse::<ToolchainFamily>(), Ok(ToolchainFamily::Msvc));
        assert_eq!(
            "apple-clang".parse::<ToolchainFamily>(),
            Ok(ToolchainFamily::AppleClang)
        );
        assert!("tcc".parse::<ToolchainFamily>().is_err());
    }

    #[test]
    fn test_policy_for_family() {
        assert_eq!(ToolchainFamily::Msvc.policy().object_suffix(), ".obj");
        assert_eq!(ToolchainFamily::Clang.policy().object_suffix(), ".o");
        assert_eq!(ToolchainFamily::Clang.policy().family(), ToolchainFamily::Clang);
    }
}
