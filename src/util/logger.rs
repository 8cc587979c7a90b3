//! Per-request operation log.
//!
//! Every invocation of a compile request records its outcome and captured
//! compiler output here. The log is written to its location when the request
//! is done, so failures can point the user at the complete output.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;

use crate::util::fs::write_string;

#[derive(Debug, Clone)]
struct LogEntry {
    description: String,
    output: String,
    success: bool,
}

/// Thread-safe operation log shared by the invocations of one request.
#[derive(Debug)]
pub struct OperationLogger {
    log_location: PathBuf,
    entries: Mutex<Vec<LogEntry>>,
}

impl OperationLogger {
    /// Create a logger that writes to `log_location` when done.
    pub fn new(log_location: impl Into<PathBuf>) -> Self {
        OperationLogger {
            log_location: log_location.into(),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Location of the log file.
    pub fn log_location(&self) -> &Path {
        &self.log_location
    }

    /// Record a successful operation.
    pub fn operation_succeeded(&self, description: &str, output: &str) {
        self.record(description, output, true);
    }

    /// Record a failed operation.
    pub fn operation_failed(&self, description: &str, output: &str) {
        self.record(description, output, false);
    }

    fn record(&self, description: &str, output: &str, success: bool) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(LogEntry {
            description: description.to_string(),
            output: output.to_string(),
            success,
        });
    }

    /// Number of recorded operations.
    pub fn operation_count(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of recorded failures.
    pub fn failure_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| !e.success)
            .count()
    }

    /// Render the log contents.
    pub fn render(&self) -> String {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut out = String::new();
        for entry in entries.iter() {
            let status = if entry.success { "successful" } else { "failed" };
            let _ = writeln!(out, "{} {}.", entry.description, status);
            if !entry.output.trim().is_empty() {
                out.push_str(entry.output.trim_end());
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Write the log file.
    pub fn done(&self) -> Result<()> {
        write_string(&self.log_location, &self.render())?;
        tracing::debug!("Wrote operation log to {}", self.log_location.display());
        Ok(())
    }
}
