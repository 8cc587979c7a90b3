//! Compile error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::compiler::queue::QueueFailure;

/// Error from a compile call.
///
/// Every variant except [`CompileError::Execution`] is raised before the
/// invocation queue is populated, so no invocation of the failing request
/// runs.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to write options file: {}", .path.display())]
    OptionsFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "cannot create file, path length exceeds the operating system limit of {limit} characters: {}",
        .path.display()
    )]
    PathTooLong { path: PathBuf, limit: usize },

    #[error("failed to create directory: {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Execution(#[from] QueueFailure),
}

impl CompileError {
    /// Whether the request was aborted before any invocation ran.
    pub fn is_fatal_before_queue(&self) -> bool {
        !matches!(self, CompileError::Execution(_))
    }
}
