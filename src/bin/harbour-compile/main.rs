//! Harbour Compile - per-file native compiler driver

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("harbour_compile=debug")
    } else {
        EnvFilter::new("harbour_compile=info")
    };

    // stdout is reserved for `plan` output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Compile(args) => commands::compile::execute(args, cli.verbose),
        Commands::Plan(args) => commands::plan::execute(args),
    }
}
