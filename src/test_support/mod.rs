//! Test utilities and mocks for Harbour Compile unit tests.
//!
//! Provides a recording [`InvocationQueue`] that captures the batch it is
//! handed instead of running compilers, plus fixtures for source trees.

pub mod fixtures;

use std::path::{Path, PathBuf};

use crate::compiler::{Invocation, InvocationQueue, QueueFailure};

pub use fixtures::*;

type Inspector = Box<dyn FnMut() -> String + Send>;

/// Invocation queue that records what it is given.
#[derive(Default)]
pub struct RecordingQueue {
    log_location: Option<PathBuf>,
    invocations: Vec<Invocation>,
    run_count: usize,
    failure: Option<QueueFailure>,
    inspector: Option<Inspector>,
    inspected: Option<String>,
}

impl RecordingQueue {
    /// Create a queue whose batches always succeed.
    pub fn new() -> Self {
        RecordingQueue::default()
    }

    /// Create a queue that records the batch, then fails with `failure`.
    pub fn failing(failure: QueueFailure) -> Self {
        RecordingQueue {
            failure: Some(failure),
            ..Default::default()
        }
    }

    /// Run `inspector` when a batch arrives, before recording it.
    ///
    /// Used to observe filesystem state at the moment execution would start.
    pub fn inspect_before_run(mut self, inspector: impl FnMut() -> String + Send + 'static) -> Self {
        self.inspector = Some(Box::new(inspector));
        self
    }

    /// Log location set by the driver.
    pub fn log_location(&self) -> Option<&Path> {
        self.log_location.as_deref()
    }

    /// Every invocation received, in submission order.
    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// Number of `run_all` calls.
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Result of the inspector, if one ran.
    pub fn inspected(&self) -> Option<&str> {
        self.inspected.as_deref()
    }
}

impl InvocationQueue for RecordingQueue {
    fn set_log_location(&mut self, location: &Path) {
        self.log_location = Some(location.to_path_buf());
    }

    fn run_all(&mut self, invocations: Vec<Invocation>) -> Result<(), QueueFailure> {
        if let Some(inspector) = self.inspector.as_mut() {
            self.inspected = Some(inspector());
        }
        self.run_count += 1;
        self.invocations.extend(invocations);

        match self.failure.clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}
