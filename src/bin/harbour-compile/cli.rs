//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Harbour Compile - compile C and C++ sources one invocation per file
#[derive(Parser)]
#[command(name = "harbour-compile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile every source of a request
    Compile(CompileArgs),

    /// Print the compiler invocations of a request as JSON without running them
    Plan(PlanArgs),
}

/// Options shared by every command that reads a request.
#[derive(Args)]
pub struct RequestArgs {
    /// Path to the compile request
    #[arg(long, short = 'r', default_value = "Compile.toml")]
    pub request: PathBuf,

    /// Compiler executable (overrides toolchain.toml and CC)
    #[arg(long)]
    pub compiler: Option<PathBuf>,

    /// Toolchain family (gcc, clang, apple-clang, msvc)
    #[arg(long)]
    pub family: Option<String>,

    /// Pass the shared arguments through an options file
    #[arg(long)]
    pub command_file: bool,
}

#[derive(Args)]
pub struct CompileArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Number of parallel jobs
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Emit compile_commands.json next to the request
    #[arg(long)]
    pub emit_compile_commands: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}
