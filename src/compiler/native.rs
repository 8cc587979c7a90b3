//! Native compile driver.
//!
//! Drives one compile request: assembles the generic arguments once, then
//! for every source in declaration order decides precompiled header use,
//! resolves the object path and builds the invocation. The complete list is
//! handed to the invocation queue only after every file has been processed,
//! so a fatal error never leaves a partial batch behind.

use std::sync::Arc;

use crate::compiler::args::{self, ArgTransform};
use crate::compiler::error::CompileError;
use crate::compiler::invocation::{Invocation, InvocationBuilder};
use crate::compiler::output::{self, PathLimit};
use crate::compiler::pch;
use crate::compiler::queue::InvocationQueue;
use crate::compiler::spec::{CompileSpec, WorkResult};
use crate::compiler::toolchain::ArgumentPolicy;

/// Options for the compile driver.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Pass the generic arguments through an options file
    pub command_file: bool,
    /// Maximum object path length
    pub path_limit: PathLimit,
    /// Caller hook applied to the generic arguments
    pub arg_transform: Option<ArgTransform>,
}

/// Native compiler driver for one toolchain family.
///
/// Holds no per-request state; concurrent calls for different requests are
/// independent.
#[derive(Clone)]
pub struct NativeCompiler {
    policy: Arc<dyn ArgumentPolicy>,
    options: CompileOptions,
}

impl NativeCompiler {
    /// Create a new driver.
    pub fn new(policy: Arc<dyn ArgumentPolicy>, options: CompileOptions) -> Self {
        NativeCompiler { policy, options }
    }

    /// Build every invocation of `spec` without running them.
    ///
    /// Writes the options file (command-file mode) and creates the object
    /// directories.
    pub fn plan(&self, spec: &CompileSpec) -> Result<Vec<Invocation>, CompileError> {
        let policy = self.policy.as_ref();
        let generic = args::assemble(
            spec,
            policy,
            self.options.arg_transform.as_ref(),
            self.options.command_file,
        )?;

        let builder = InvocationBuilder::new(
            policy,
            &spec.object_file_dir,
            Arc::clone(&spec.operation_logger),
        );

        let mut invocations = Vec::with_capacity(spec.source_files.len());
        for source in &spec.source_files {
            let decision = pch::evaluate(spec, policy, source);
            if let Some(warning) = &decision.warning {
                tracing::warn!("{}", warning);
            }

            let output = output::resolve(
                &spec.object_file_dir,
                source,
                policy.object_suffix(),
                spec.source_root.as_deref(),
                self.options.path_limit,
            )?;

            invocations.push(builder.build(&generic, decision.args, source, &output));
        }

        Ok(invocations)
    }

    /// Compile every source of `spec` on `queue`.
    ///
    /// Returns whether the request had any source files, regardless of the
    /// outcome of individual invocations; a failed invocation surfaces as
    /// [`CompileError::Execution`] after the whole batch has run.
    pub fn execute(
        &self,
        spec: &CompileSpec,
        queue: &mut dyn InvocationQueue,
    ) -> Result<WorkResult, CompileError> {
        let invocations = self.plan(spec)?;

        tracing::debug!(
            "Queueing {} invocation(s) ({})",
            invocations.len(),
            self.policy.family().as_str()
        );

        queue.set_log_location(spec.operation_logger.log_location());
        queue.run_all(invocations)?;

        Ok(WorkResult::new(!spec.source_files.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use crate::compiler::queue::{InvocationFailure, QueueFailure};
    use crate::compiler::spec::IncludeDirectives;
    use crate::compiler::toolchain::GccPolicy;
    use crate::test_support::{source_tree, RecordingQueue};
    use crate::util::fs::absolute;
    use crate::util::logger::OperationLogger;

    fn compiler(options: CompileOptions) -> NativeCompiler {
        NativeCompiler::new(Arc::new(GccPolicy::default()), options)
    }

    fn spec(tmp: &TempDir) -> CompileSpec {
        CompileSpec::new(
            tmp.path().join("out"),
            tmp.path().join("tmp"),
            Arc::new(OperationLogger::new(tmp.path().join("out").join("log.txt"))),
        )
    }

    #[test]
    fn test_one_invocation_per_source() {
        let tmp = TempDir::new().unwrap();
        let spec = spec(&tmp)
            .with_source("src/a.c", IncludeDirectives::default())
            .with_source("src/b.c", IncludeDirectives::default());
        let mut queue = RecordingQueue::new();

        let result = compiler(CompileOptions::default())
            .execute(&spec, &mut queue)
            .unwrap();

        assert!(result.did_work());
        let out = tmp.path().join("out");
        assert_eq!(queue.log_location(), Some(out.join("log.txt").as_path()));

        let invocations = queue.invocations();
        assert_eq!(invocations.len(), 2);
        for (invocation, name) in invocations.iter().zip(["a", "b"]) {
            let source = absolute(Path::new(&format!("src/{}.c", name)));
            let object = out.join("src").join(format!("{}.o", name));
            let mut expected: Vec<String> =
                vec!["-c".into(), "-x".into(), "c".into(), source.display().to_string()];
            expected.extend(["-o".to_string(), object.display().to_string()]);

            assert_eq!(invocation.name(), format!("compiling {}.c", name));
            assert_eq!(invocation.args(), expected.as_slice());
            assert_eq!(invocation.working_dir(), out.as_path());
        }
        assert!(out.join("src").is_dir());
    }

    #[test]
    fn test_no_sources_no_work() {
        let tmp = TempDir::new().unwrap();
        let spec = spec(&tmp).with_pre_compiled_header("pch.h");
        let mut queue = RecordingQueue::new();

        let result = compiler(CompileOptions::default())
            .execute(&spec, &mut queue)
            .unwrap();

        assert!(!result.did_work());
        assert!(queue.invocations().is_empty());
    }

    #[test]
    fn test_pch_only_for_eligible_files() {
        let tmp = TempDir::new().unwrap();
        let mut spec = spec(&tmp)
            .with_pre_compiled_header("pch.h")
            .with_source("src/first.c", IncludeDirectives::new(["pch.h", "stdio.h"]))
            .with_source("src/late.c", IncludeDirectives::new(["stdio.h", "pch.h"]))
            .with_source("src/none.c", IncludeDirectives::new(["stdio.h"]));
        spec.prefix_header_file = Some(PathBuf::from("/pch/prefix-headers.h"));

        let invocations = compiler(CompileOptions::default()).plan(&spec).unwrap();

        let has_pch = |i: &Invocation| i.args().iter().any(|a| a == "-include");
        assert!(has_pch(&invocations[0]));
        assert!(!has_pch(&invocations[1]));
        assert!(!has_pch(&invocations[2]));
    }

    #[test]
    fn test_path_too_long_aborts_whole_request() {
        let tmp = TempDir::new().unwrap();
        let long = PathBuf::from("src").join("n".repeat(200)).join("b.c");
        let spec = spec(&tmp)
            .with_source("src/a.c", IncludeDirectives::default())
            .with_source(&long, IncludeDirectives::default());
        let mut queue = RecordingQueue::new();
        let options = CompileOptions {
            path_limit: PathLimit::max(tmp.path().to_string_lossy().len() + 100),
            ..Default::default()
        };

        let err = compiler(options).execute(&spec, &mut queue).unwrap_err();

        assert!(matches!(err, CompileError::PathTooLong { .. }));
        assert!(err.is_fatal_before_queue());
        assert_eq!(queue.run_count(), 0);
    }

    #[test]
    fn test_command_file_written_before_queue_runs() {
        let tmp = TempDir::new().unwrap();
        let mut spec = spec(&tmp)
            .with_source("src/a.c", IncludeDirectives::default())
            .with_source("src/b.c", IncludeDirectives::default());
        spec.args = vec!["-Wall".to_string()];
        let options_file = tmp.path().join("tmp").join("options.txt");
        let mut queue = RecordingQueue::new().inspect_before_run({
            let options_file = options_file.clone();
            move || std::fs::read_to_string(&options_file).unwrap_or_default()
        });
        let options = CompileOptions {
            command_file: true,
            ..Default::default()
        };

        compiler(options).execute(&spec, &mut queue).unwrap();

        assert_eq!(queue.inspected(), Some("-c\n-x\nc\n-Wall\n"));
        let reference = format!("@{}", absolute(&options_file).display());
        for invocation in queue.invocations() {
            assert_eq!(invocation.args()[0], reference);
            assert_eq!(invocation.args().len(), 4);
        }
    }

    #[test]
    fn test_options_file_failure_builds_nothing() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut spec = spec(&tmp).with_source("src/a.c", IncludeDirectives::default());
        spec.temp_dir = blocker;
        let mut queue = RecordingQueue::new();
        let options = CompileOptions {
            command_file: true,
            ..Default::default()
        };

        let err = compiler(options).execute(&spec, &mut queue).unwrap_err();

        assert!(matches!(err, CompileError::OptionsFile { .. }));
        assert_eq!(queue.run_count(), 0);
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn test_directory_failure_aborts() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("out")).unwrap();
        std::fs::write(tmp.path().join("out").join("src"), "").unwrap();
        let spec = spec(&tmp).with_source("src/a.c", IncludeDirectives::default());
        let mut queue = RecordingQueue::new();

        let err = compiler(CompileOptions::default())
            .execute(&spec, &mut queue)
            .unwrap_err();

        assert!(matches!(err, CompileError::CreateDir { .. }));
        assert_eq!(queue.run_count(), 0);
    }

    #[test]
    fn test_queue_failure_propagates_with_work_done() {
        let tmp = TempDir::new().unwrap();
        let spec = spec(&tmp).with_source("src/a.c", IncludeDirectives::default());
        let mut queue = RecordingQueue::failing(QueueFailure::new(
            1,
            vec![InvocationFailure::new("compiling a.c", "exit code 1")],
        ));

        let err = compiler(CompileOptions::default())
            .execute(&spec, &mut queue)
            .unwrap_err();

        assert!(matches!(err, CompileError::Execution(_)));
        assert!(!err.is_fatal_before_queue());
        assert_eq!(queue.invocations().len(), 1);
    }

    #[test]
    fn test_transform_and_source_root() {
        let tmp = TempDir::new().unwrap();
        let root = source_tree(&tmp, &["src/net/a.c", "src/fs/a.c"]);
        let mut spec = spec(&tmp)
            .with_source(root.join("src/net/a.c"), IncludeDirectives::default())
            .with_source(root.join("src/fs/a.c"), IncludeDirectives::default());
        spec.source_root = Some(root.clone());
        let options = CompileOptions {
            arg_transform: Some(ArgTransform::append(vec!["-O2".to_string()])),
            ..Default::default()
        };

        let invocations = compiler(options).plan(&spec).unwrap();

        let out = tmp.path().join("out");
        assert_eq!(invocations[0].output(), out.join("src/net/a.o").as_path());
        assert_eq!(invocations[1].output(), out.join("src/fs/a.o").as_path());
        assert!(invocations.iter().all(|i| i.args()[3] == "-O2"));
    }

    #[test]
    fn test_concurrent_requests_are_independent() {
        let compiler = compiler(CompileOptions {
            command_file: true,
            ..Default::default()
        });
        let dirs: Vec<TempDir> = (0..4).map(|_| TempDir::new().unwrap()).collect();

        std::thread::scope(|s| {
            for (i, tmp) in dirs.iter().enumerate() {
                let compiler = &compiler;
                s.spawn(move || {
                    let mut spec = spec(tmp).with_source("src/a.c", IncludeDirectives::default());
                    spec.args = vec![format!("-DREQUEST={}", i)];
                    let mut queue = RecordingQueue::new();
                    compiler.execute(&spec, &mut queue).unwrap();

                    let options =
                        std::fs::read_to_string(tmp.path().join("tmp").join("options.txt")).unwrap();
                    assert!(options.contains(&format!("-DREQUEST={}", i)));
                    assert_eq!(queue.invocations().len(), 1);
                });
            }
        });
    }
}
