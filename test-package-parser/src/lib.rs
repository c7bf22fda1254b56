// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Corpus tests for the Futhark parser.
//!
//! Test cases live in the `cases/` directory, one subdirectory per case
//! holding a `main.fut`. The build script generates a test function for
//! each case; the tests parse it, render it back to source, and check that
//! the rendering is stable.
//!
//! Imports inside a case are resolved against the case directory by
//! [`DirectoryResolver`], so a case can carry its own library files.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use futhark_syntax::ast::Program;
use futhark_syntax::source_analysis::{
    Diagnostic, ImportError, ImportResolver, ParseOptions, Span, SyntaxError, parse_program_with,
};

/// Import chains deeper than this are reported as failures.
pub const MAX_IMPORT_DEPTH: usize = 16;

/// Returns the directory holding the test cases.
#[must_use]
pub fn cases_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("cases")
}

/// Resolves `import "path"` to `path.fut` relative to a directory.
///
/// Imported files are parsed with a resolver rooted at their own
/// directory, so relative imports nest the way Futhark's do.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: Utf8PathBuf,
    depth: usize,
    resolved: Vec<Utf8PathBuf>,
}

impl DirectoryResolver {
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            depth: 0,
            resolved: Vec::new(),
        }
    }

    /// Files loaded so far, in the order their imports were reached.
    #[must_use]
    pub fn resolved(&self) -> &[Utf8PathBuf] {
        &self.resolved
    }

    fn nested(&self, root: &Utf8Path) -> Self {
        Self {
            root: root.to_path_buf(),
            depth: self.depth + 1,
            resolved: Vec::new(),
        }
    }
}

impl ImportResolver for DirectoryResolver {
    fn resolve(&mut self, path: &str, _span: Span) -> Result<Program, ImportError> {
        if self.depth >= MAX_IMPORT_DEPTH {
            return Err(ImportError::new("imports nest too deeply"));
        }
        let file = self.root.join(format!("{path}.fut"));
        let source = fs::read_to_string(&file)
            .map_err(|error| ImportError::new(format!("cannot read {file}: {error}")))?;
        tracing::debug!(%file, "loading import");

        let mut nested = self.nested(file.parent().unwrap_or(self.root.as_path()));
        let options = ParseOptions::default().with_source_name(file.as_str());
        let program = parse_program_with(
            &source,
            &options,
            Some(&mut nested as &mut dyn ImportResolver),
            &mut Vec::new(),
        )
        .map_err(|error| ImportError::new(format!("{file}: {error}")))?;

        self.resolved.push(file);
        self.resolved.extend(nested.resolved);
        Ok(program)
    }
}

/// Parses a case's `main.fut` with imports resolved from the case directory.
///
/// # Errors
///
/// Returns the syntax error if the case fails to parse.
pub fn parse_case(
    case_dir: &Utf8Path,
    source: &str,
) -> Result<(Program, DirectoryResolver, Vec<Diagnostic>), SyntaxError> {
    let mut resolver = DirectoryResolver::new(case_dir);
    let mut diagnostics = Vec::new();
    let options = ParseOptions::default().with_source_name(case_dir.join("main.fut").as_str());
    let program = parse_program_with(
        source,
        &options,
        Some(&mut resolver as &mut dyn ImportResolver),
        &mut diagnostics,
    )?;
    Ok((program, resolver, diagnostics))
}
