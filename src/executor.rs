//! Parallel compiler execution with progress reporting.

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::compiler::compile_commands::write_compile_commands;
use crate::compiler::{Invocation, InvocationFailure, InvocationQueue, QueueFailure};
use crate::util::process::{combined_output, ProcessBuilder};

/// Runs invocations against a compiler executable on a rayon pool.
///
/// Every invocation is attempted once. Outcomes and compiler output are
/// recorded in the invocation's operation log, and failures are reported
/// together after the whole batch has run.
#[derive(Debug, Clone)]
pub struct ParallelQueue {
    compiler: PathBuf,
    jobs: Option<usize>,
    verbose: bool,
    log_location: Option<PathBuf>,
    compile_commands: Option<PathBuf>,
}

impl ParallelQueue {
    /// Create a queue running `compiler`.
    pub fn new(compiler: impl Into<PathBuf>) -> Self {
        ParallelQueue {
            compiler: compiler.into(),
            jobs: None,
            verbose: false,
            log_location: None,
            compile_commands: None,
        }
    }

    /// Limit the number of concurrent compiler processes.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs.filter(|j| *j > 0);
        self
    }

    /// Print each command instead of a progress bar.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Write a `compile_commands.json` for each batch before running it.
    pub fn emit_compile_commands(mut self, path: Option<PathBuf>) -> Self {
        self.compile_commands = path;
        self
    }

    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if self.verbose || total <= 1 {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    }

    fn run_one(&self, invocation: &Invocation) -> Result<(), InvocationFailure> {
        let cmd = ProcessBuilder::new(&self.compiler)
            .args(invocation.args())
            .cwd(invocation.working_dir());

        if self.verbose {
            eprintln!("     Running `{}`", cmd.display_command());
        }
        tracing::debug!("{}: {}", invocation.name(), cmd.display_command());

        let logger = invocation.logger();
        match cmd.exec() {
            Ok(output) if output.status.success() => {
                logger.operation_succeeded(invocation.name(), &combined_output(&output));
                Ok(())
            }
            Ok(output) => {
                let text = combined_output(&output);
                logger.operation_failed(invocation.name(), &text);
                Err(InvocationFailure::new(
                    invocation.name(),
                    exit_message(&output.status, &text),
                ))
            }
            Err(e) => {
                let message = format!("{:#}", e);
                logger.operation_failed(invocation.name(), &message);
                Err(InvocationFailure::new(invocation.name(), message))
            }
        }
    }

    fn run_batch(&self, invocations: &[Invocation], pb: Option<&ProgressBar>) -> Vec<InvocationFailure> {
        let results: Vec<_> = invocations
            .par_iter()
            .map(|invocation| {
                let result = self.run_one(invocation);
                if let Some(pb) = pb {
                    pb.set_message(invocation.name().to_string());
                    pb.inc(1);
                }
                result
            })
            .collect();

        results.into_iter().filter_map(Result::err).collect()
    }
}

impl InvocationQueue for ParallelQueue {
    fn set_log_location(&mut self, location: &Path) {
        self.log_location = Some(location.to_path_buf());
    }

    fn run_all(&mut self, invocations: Vec<Invocation>) -> Result<(), QueueFailure> {
        let total = invocations.len();
        if total == 0 {
            return Ok(());
        }

        if let Some(path) = &self.compile_commands {
            if let Err(e) = write_compile_commands(path, &self.compiler, &invocations) {
                tracing::warn!("failed to write {}: {:#}", path.display(), e);
            }
        }

        let start = Instant::now();
        let pb = self.progress_bar(total);

        let pool = self
            .jobs
            .map(|j| rayon::ThreadPoolBuilder::new().num_threads(j).build());
        let failures = match pool {
            Some(Ok(pool)) => pool.install(|| self.run_batch(&invocations, pb.as_ref())),
            Some(Err(e)) => {
                tracing::warn!("failed to build a thread pool, using the global pool: {}", e);
                self.run_batch(&invocations, pb.as_ref())
            }
            None => self.run_batch(&invocations, pb.as_ref()),
        };

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        tracing::debug!(
            "ran {} invocation(s) in {:.2}s, {} failed",
            total,
            start.elapsed().as_secs_f64(),
            failures.len()
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(QueueFailure::new(total, failures).with_log_location(self.log_location.clone()))
        }
    }
}

fn exit_message(status: &std::process::ExitStatus, output: &str) -> String {
    let status = match status.code() {
        Some(code) => format!("compiler exited with status {}", code),
        None => "compiler terminated by signal".to_string(),
    };
    match output.lines().find(|l| !l.trim().is_empty()) {
        Some(first) => format!("{} ({})", status, first.trim()),
        None => status,
    }
}
