//! Native compiler driver.
//!
//! Turns one [`CompileSpec`] into one [`Invocation`] per source file and
//! hands the batch to an [`InvocationQueue`]. All toolchain-specific syntax
//! lives behind [`ArgumentPolicy`].

pub mod args;
pub mod compile_commands;
pub mod error;
pub mod includes;
pub mod invocation;
pub mod native;
pub mod output;
pub mod pch;
pub mod queue;
pub mod spec;
pub mod toolchain;

pub use args::ArgTransform;
pub use error::CompileError;
pub use includes::{scan_file, scan_includes};
pub use invocation::{Invocation, InvocationBuilder};
pub use native::{CompileOptions, NativeCompiler};
pub use output::PathLimit;
pub use pch::PchDecision;
pub use queue::{InvocationFailure, InvocationQueue, QueueFailure};
pub use spec::{CompileSpec, IncludeDirectives, Language, WorkResult};
pub use toolchain::{ArgumentPolicy, GccPolicy, MsvcPolicy, ToolchainFamily};
