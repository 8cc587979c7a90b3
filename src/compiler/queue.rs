//! The invocation queue capability.
//!
//! A queue runs one batch of invocations to completion, in any order and
//! with any degree of parallelism, and reports failures in aggregate.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::compiler::invocation::Invocation;

/// Executes a batch of compiler invocations.
pub trait InvocationQueue {
    /// Set the log location reported alongside failures.
    fn set_log_location(&mut self, location: &Path);

    /// Run every invocation, blocking until all have been attempted.
    ///
    /// Failures are collected and returned as one [`QueueFailure`] after the
    /// whole batch has run.
    fn run_all(&mut self, invocations: Vec<Invocation>) -> Result<(), QueueFailure>;
}

/// A single failed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationFailure {
    /// Display name of the invocation (e.g. "compiling main.c")
    pub name: String,
    /// Failure detail (exit status and compiler output)
    pub message: String,
}

impl InvocationFailure {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        InvocationFailure {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Aggregate failure of a batch.
#[derive(Debug, Clone, Error)]
#[error(
    "{} of {} compiler invocation(s) failed{}",
    .failures.len(),
    .total,
    render_failures(.failures, .log_location.as_deref())
)]
pub struct QueueFailure {
    /// Number of invocations in the batch
    pub total: usize,
    /// Every failed invocation
    pub failures: Vec<InvocationFailure>,
    /// Operation log holding the full compiler output
    pub log_location: Option<PathBuf>,
}

impl QueueFailure {
    pub fn new(total: usize, failures: Vec<InvocationFailure>) -> Self {
        QueueFailure {
            total,
            failures,
            log_location: None,
        }
    }

    pub fn with_log_location(mut self, location: Option<PathBuf>) -> Self {
        self.log_location = location;
        self
    }
}

fn render_failures(failures: &[InvocationFailure], log_location: Option<&Path>) -> String {
    let mut out = String::new();
    for failure in failures {
        let _ = write!(out, "\n  {}: {}", failure.name, failure.message.trim_end());
    }
    if let Some(location) = log_location {
        let _ = write!(out, "\nsee the complete log at: {}", location.display());
    }
    out
}
