//! Per-file compiler invocations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::compiler::toolchain::ArgumentPolicy;
use crate::util::fs::absolute;
use crate::util::logger::OperationLogger;

/// One compiler execution for exactly one source file.
///
/// Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    name: String,
    working_dir: PathBuf,
    args: Vec<String>,
    source: PathBuf,
    output: PathBuf,
    #[serde(skip)]
    logger: Arc<OperationLogger>,
}

impl Invocation {
    /// Display name, e.g. "compiling main.c".
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Full argument list, without the compiler executable.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Absolute path of the source file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Object file path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Operation log of the request this invocation belongs to.
    pub fn logger(&self) -> &Arc<OperationLogger> {
        &self.logger
    }
}

/// Builds the invocations of one request.
///
/// The working directory and logger are shared by every invocation built.
pub struct InvocationBuilder<'a> {
    policy: &'a dyn ArgumentPolicy,
    working_dir: PathBuf,
    logger: Arc<OperationLogger>,
}

impl<'a> InvocationBuilder<'a> {
    pub fn new(
        policy: &'a dyn ArgumentPolicy,
        working_dir: impl Into<PathBuf>,
        logger: Arc<OperationLogger>,
    ) -> Self {
        InvocationBuilder {
            policy,
            working_dir: working_dir.into(),
            logger,
        }
    }

    /// Compose the invocation for `source`.
    ///
    /// Arguments are ordered generic, precompiled header, source, output.
    pub fn build(
        &self,
        generic: &[String],
        pch_args: Vec<String>,
        source: &Path,
        output: &Path,
    ) -> Invocation {
        let source = absolute(source);
        let output_args = self.policy.output_args(output);

        let mut args = Vec::with_capacity(generic.len() + pch_args.len() + 1 + output_args.len());
        args.extend(generic.iter().cloned());
        args.extend(pch_args);
        args.push(source.display().to_string());
        args.extend(output_args);

        Invocation {
            name: display_name(&source),
            working_dir: self.working_dir.clone(),
            args,
            source,
            output: output.to_path_buf(),
            logger: Arc::clone(&self.logger),
        }
    }
}

fn display_name(source: &Path) -> String {
    let file = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    format!("compiling {}", file)
}
