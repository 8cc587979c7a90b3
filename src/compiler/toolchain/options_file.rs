//! Options files (command files).
//!
//! Long argument lists are written to a file in the request's temp
//! directory and passed to the compiler as `@<file>`, keeping the command
//! line under the operating system limit.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::compiler::error::CompileError;

/// File name of the options file inside the temp directory.
pub const OPTIONS_FILE_NAME: &str = "options.txt";

/// Quoting rules of an options file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSyntax {
    /// GCC/Clang response files: backslash escapes inside double quotes.
    Gcc,
    /// MSVC command files: Windows command-line quoting.
    Windows,
}

impl ArgSyntax {
    /// Quote a single argument for this syntax.
    pub fn quote(&self, arg: &str) -> String {
        match self {
            ArgSyntax::Gcc => quote_gcc(arg),
            ArgSyntax::Windows => quote_windows(arg),
        }
    }
}

fn quote_gcc(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '\\');
    if !needs_quotes {
        return arg.to_string();
    }

    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn quote_windows(arg: &str) -> String {
    let needs_quotes = arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"');
    if !needs_quotes {
        return arg.to_string();
    }

    // Backslashes are literal unless they precede a quote.
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                out.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.extend(std::iter::repeat('\\').take(backslashes));
                out.push(c);
                backslashes = 0;
            }
        }
    }
    out.extend(std::iter::repeat('\\').take(backslashes * 2));
    out.push('"');
    out
}

/// Write `args` to `<temp_dir>/options.txt`, one argument per line.
///
/// The file is flushed to disk before returning.
pub fn write_options_file(
    args: &[String],
    temp_dir: &Path,
    syntax: ArgSyntax,
) -> Result<PathBuf, CompileError> {
    let path = crate::util::fs::absolute(&temp_dir.join(OPTIONS_FILE_NAME));
    let map_err = |source| CompileError::OptionsFile {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(temp_dir).map_err(map_err)?;

    let mut contents = String::new();
    for arg in args {
        contents.push_str(&syntax.quote(arg));
        contents.push('\n');
    }

    let mut file = File::create(&path).map_err(map_err)?;
    file.write_all(contents.as_bytes()).map_err(map_err)?;
    file.sync_all().map_err(map_err)?;

    tracing::debug!("Wrote {} argument(s) to {}", args.len(), path.display());

    Ok(path)
}

/// The argument referencing an options file.
pub fn reference_arg(path: &Path) -> String {
    format!("@{}", path.display())
}
