//! Command implementations

pub mod compile;
pub mod plan;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use crate::cli::RequestArgs;
use harbour_compile::compiler::{CompileOptions, CompileSpec, NativeCompiler, ToolchainFamily};
use harbour_compile::util::config::{
    global_toolchain_config_path, load_toolchain_config, project_toolchain_config_path,
    CompileRequest,
};
use harbour_compile::util::fs::absolute;
use harbour_compile::util::process::find_c_compiler;

/// A loaded request, ready to compile.
pub struct Prepared {
    pub spec: CompileSpec,
    pub driver: NativeCompiler,
    pub compiler: PathBuf,
    pub base_dir: PathBuf,
}

/// Load the request and resolve the toolchain.
///
/// Compiler: `--compiler` > toolchain.toml > `CC` > PATH.
/// Family: `--family` > toolchain.toml > inferred from the compiler name.
pub fn prepare(args: &RequestArgs) -> Result<Prepared> {
    let request_path = absolute(&args.request);
    let base_dir = request_path
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| anyhow!("invalid request path: {}", request_path.display()))?;

    let request = CompileRequest::load(&request_path)?;

    let config = load_toolchain_config(
        global_toolchain_config_path().as_deref(),
        &project_toolchain_config_path(&base_dir),
    );

    let compiler = match args.compiler.clone().or(config.toolchain.compiler) {
        Some(compiler) => compiler,
        None => match find_c_compiler() {
            Some(compiler) => compiler,
            None => bail!("no C compiler found; pass --compiler or set CC"),
        },
    };

    let family = match args.family.as_ref().or(config.toolchain.family.as_ref()) {
        Some(family) => family
            .parse::<ToolchainFamily>()
            .map_err(|e| anyhow!("{}", e))?,
        None => ToolchainFamily::infer(&compiler),
    };
    tracing::debug!("Using {} ({})", compiler.display(), family.as_str());

    let options = CompileOptions {
        command_file: args.command_file || request.command_file,
        path_limit: request.path_limit(),
        arg_transform: None,
    };

    let spec = request
        .into_spec(&base_dir)
        .with_context(|| format!("invalid compile request: {}", request_path.display()))?;

    Ok(Prepared {
        spec,
        driver: NativeCompiler::new(family.policy(), options),
        compiler,
        base_dir,
    })
}
