//! Include directive scanning.
//!
//! Extracts `#include` and `#import` directives from C/C++ source text in
//! declaration order. Both forms are treated alike, as are quoted and
//! angle-bracket headers.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::compiler::spec::IncludeDirectives;
use crate::util::fs::read_to_string;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").expect("valid block comment regex"));

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("valid line comment regex"));

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*#[ \t]*(?:include|import)[ \t]*(?:"([^"\n]+)"|<([^>\n]+)>)"#)
        .expect("valid include directive regex")
});

/// Scan source text for include directives.
pub fn scan_includes(content: &str) -> IncludeDirectives {
    // Comments are blanked out, keeping their newlines so that a directive
    // following a block comment still starts a line.
    let content = BLOCK_COMMENT.replace_all(content, |caps: &regex::Captures| {
        caps[0].chars().filter(|c| *c == '\n').collect::<String>()
    });
    let content = LINE_COMMENT.replace_all(&content, "");

    IncludeDirectives::new(DIRECTIVE.captures_iter(&content).filter_map(|cap| {
        cap.get(1)
            .or_else(|| cap.get(2))
            .map(|m| m.as_str().trim().to_string())
    }))
}

/// Scan a source file for include directives.
pub fn scan_file(path: &Path) -> Result<IncludeDirectives> {
    let content = read_to_string(path)?;
    Ok(scan_includes(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{source_file, PCH_LATE_SOURCE};
    use tempfile::TempDir;

    #[test]
    fn test_scan_in_declaration_order() {
        let includes = scan_includes(
            "#include \"pch.h\"\n#include <stdio.h>\n#import <Foundation/Foundation.h>\n",
        );
        assert_eq!(
            includes.iter().collect::<Vec<_>>(),
            vec!["pch.h", "stdio.h", "Foundation/Foundation.h"]
        );
    }

    #[test]
    fn test_scan_allows_whitespace() {
        let includes = scan_includes("  #  include   \"a.h\"\n\t#import<b.h>\n");
        assert_eq!(includes.iter().collect::<Vec<_>>(), vec!["a.h", "b.h"]);
    }

    #[test]
    fn test_scan_skips_comments() {
        let includes = scan_includes(
            "/* #include \"hidden.h\"\n */#include \"after.h\"\n// #include \"off.h\"\n#include <on.h> // trailing\n",
        );
        assert_eq!(includes.iter().collect::<Vec<_>>(), vec!["after.h", "on.h"]);
    }

    #[test]
    fn test_scan_block_comment_keeps_lines() {
        let includes = scan_includes("/* header\n   comment */\n#include \"first.h\"\n");
        assert_eq!(includes.first(), Some("first.h"));
    }

    #[test]
    fn test_scan_ignores_macro_includes() {
        let includes = scan_includes("#include HEADER\n#define X 1\n");
        assert!(includes.is_empty());
    }

    #[test]
    fn test_scan_file() {
        let tmp = TempDir::new().unwrap();
        let path = source_file(&tmp, "src/util.c", PCH_LATE_SOURCE);

        let includes = scan_file(&path).unwrap();

        assert_eq!(includes.first(), Some("stdio.h"));
        assert!(includes.contains("pch.h"));
    }

    #[test]
    fn test_scan_missing_file() {
        let err = scan_file(Path::new("/does/not/exist.c")).unwrap_err();
        assert!(err.to_string().contains("exist.c"));
    }
}
