//! Harbour Compile - the per-file native compiler driver of Harbour
//!
//! This crate turns one compile request (sources, shared toolchain options,
//! an optional precompiled header and an object directory) into one compiler
//! invocation per source file, and hands the batch to an invocation queue.

pub mod compiler;
pub mod executor;
pub mod util;

/// Test utilities and mocks for Harbour Compile unit tests.
#[cfg(test)]
pub mod test_support;

pub use compiler::{
    CompileError, CompileOptions, CompileSpec, Invocation, InvocationQueue, NativeCompiler,
    WorkResult,
};
pub use executor::ParallelQueue;
pub use util::logger::OperationLogger;
