//! Shared utilities

pub mod config;
pub mod fs;
pub mod logger;
pub mod process;

pub use config::{CompileRequest, ToolchainConfig};
pub use logger::OperationLogger;
pub use process::ProcessBuilder;
