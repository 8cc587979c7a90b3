//! Precompiled header eligibility.
//!
//! A precompiled header can only be used by a source file whose first
//! declared include is exactly that header. A file that includes the header
//! later on compiles without it and gets a warning.

use std::path::Path;

use crate::compiler::spec::CompileSpec;
use crate::compiler::toolchain::ArgumentPolicy;

/// Per-file precompiled header decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PchDecision {
    /// Arguments to add to the invocation (empty when not eligible)
    pub args: Vec<String>,
    /// Warning for a file that declares the header too late
    pub warning: Option<String>,
}

/// Decide whether `source` can use the request's precompiled header.
pub fn evaluate(spec: &CompileSpec, policy: &dyn ArgumentPolicy, source: &Path) -> PchDecision {
    let Some(header) = spec.pre_compiled_header.as_deref() else {
        return PchDecision::default();
    };
    let Some(includes) = spec.includes_for(source).filter(|i| !i.is_empty()) else {
        return PchDecision::default();
    };

    if includes.first() == Some(header) {
        return PchDecision {
            args: policy.pch_args(spec),
            warning: None,
        };
    }

    if includes.contains(header) {
        return PchDecision {
            args: Vec::new(),
            warning: Some(cant_use_pch_message(header, source)),
        };
    }

    PchDecision::default()
}

fn cant_use_pch_message(header: &str, source: &Path) -> String {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    format!(
        "The source file {} includes the header {} but it is not the first declared header, \
         so the pre-compiled header will not be used.",
        name, header
    )
}
