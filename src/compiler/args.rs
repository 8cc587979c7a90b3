//! Generic argument assembly.

use std::fmt;
use std::sync::Arc;

use crate::compiler::error::CompileError;
use crate::compiler::spec::CompileSpec;
use crate::compiler::toolchain::ArgumentPolicy;

/// Caller hook that rewrites the generic arguments of a request.
///
/// A pure function from argument list to argument list.
#[derive(Clone)]
pub struct ArgTransform(Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>);

impl ArgTransform {
    pub fn new(f: impl Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static) -> Self {
        ArgTransform(Arc::new(f))
    }

    /// Append `extra` after the policy's arguments.
    pub fn append(extra: Vec<String>) -> Self {
        ArgTransform::new(move |mut args| {
            args.extend(extra.iter().cloned());
            args
        })
    }

    /// Drop every argument equal to one of `remove`.
    pub fn remove(remove: Vec<String>) -> Self {
        ArgTransform::new(move |args| args.into_iter().filter(|a| !remove.contains(a)).collect())
    }

    /// Apply `self`, then `next`.
    pub fn then(self, next: ArgTransform) -> Self {
        ArgTransform::new(move |args| next.apply(self.apply(args)))
    }

    pub fn apply(&self, args: Vec<String>) -> Vec<String> {
        (self.0)(args)
    }
}

impl fmt::Debug for ArgTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ArgTransform(..)")
    }
}

/// Build the arguments shared by every invocation of one request.
///
/// With `command_file` set, the arguments are written to the request's
/// options file and the returned list is the policy's reference to it. The
/// file is complete on disk when this returns. Call once per request.
pub fn assemble(
    spec: &CompileSpec,
    policy: &dyn ArgumentPolicy,
    transform: Option<&ArgTransform>,
    command_file: bool,
) -> Result<Vec<String>, CompileError> {
    let mut args = policy.generic_args(spec);

    if let Some(transform) = transform {
        args = transform.apply(args);
    }

    if command_file {
        args = policy.write_options_file(&args, &spec.temp_dir)?;
    }

    Ok(args)
}
