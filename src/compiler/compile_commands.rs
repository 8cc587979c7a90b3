//! Compilation database (`compile_commands.json`).

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::compiler::invocation::Invocation;
use crate::util::fs::write_string;

/// One entry of a compilation database.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    pub arguments: Vec<String>,
    pub output: String,
}

impl CompileCommand {
    /// Entry for `invocation` run with `compiler`.
    pub fn from_invocation(compiler: &Path, invocation: &Invocation) -> Self {
        let mut arguments = Vec::with_capacity(invocation.args().len() + 1);
        arguments.push(compiler.display().to_string());
        arguments.extend(invocation.args().iter().cloned());

        CompileCommand {
            directory: invocation.working_dir().display().to_string(),
            file: invocation.source().display().to_string(),
            arguments,
            output: invocation.output().display().to_string(),
        }
    }
}

/// Write a compilation database for `invocations` to `path`.
pub fn write_compile_commands(
    path: &Path,
    compiler: &Path,
    invocations: &[Invocation],
) -> Result<()> {
    let commands: Vec<CompileCommand> = invocations
        .iter()
        .map(|i| CompileCommand::from_invocation(compiler, i))
        .collect();

    let json = serde_json::to_string_pretty(&commands)?;
    write_string(path, &json)?;

    tracing::debug!("Wrote {} compile command(s) to {}", commands.len(), path.display());

    Ok(())
}
