//! `harbour-compile compile` command

use std::time::Instant;

use anyhow::Result;

use super::prepare;
use crate::cli::CompileArgs;
use harbour_compile::executor::ParallelQueue;

pub fn execute(args: CompileArgs, verbose: bool) -> Result<()> {
    let start = Instant::now();
    let prepared = prepare(&args.request)?;

    let compile_commands = args
        .emit_compile_commands
        .then(|| prepared.base_dir.join("compile_commands.json"));

    let mut queue = ParallelQueue::new(&prepared.compiler)
        .jobs(args.jobs)
        .verbose(verbose)
        .emit_compile_commands(compile_commands);

    let result = prepared.driver.execute(&prepared.spec, &mut queue);

    // The log is written whenever anything ran, so failures can point at it
    let logger = &prepared.spec.operation_logger;
    if logger.operation_count() > 0 {
        if let Err(e) = logger.done() {
            tracing::warn!("failed to write operation log: {:#}", e);
        }
    }

    if result?.did_work() {
        eprintln!(
            "    Finished {} file(s) in {:.2}s",
            prepared.spec.source_files.len(),
            start.elapsed().as_secs_f64()
        );
    } else {
        eprintln!("    Nothing to compile");
    }

    Ok(())
}
