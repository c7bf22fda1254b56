// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for lexing and parsing.
//!
//! A parse produces at most one [`SyntaxError`]. It carries the source
//! location of the smallest offending text and integrates with [`miette`]
//! for rendering against the source file.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use std::fmt;

use ecow::EcoString;
use miette::{Diagnostic, NamedSource, Report};
use thiserror::Error;

use super::Span;

/// Which kind of quoted literal was left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    Character,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Character => "character",
        })
    }
}

/// The kind of lexical error carried by an error token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum LexErrorKind {
    /// A newline or the end of input came before the closing quote.
    #[error("unterminated {0} literal")]
    UnterminatedLiteral(LiteralKind),

    /// A numeric escape outside the Unicode scalar range, or `\x`/`\o`
    /// without digits.
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(EcoString),

    /// Identifier characters glued to a number that are not a valid suffix.
    #[error("invalid numeric literal `{0}`")]
    InvalidNumericSuffix(EcoString),

    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
}

/// A set of token descriptions the parser would have accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpectedSet(Vec<EcoString>);

impl ExpectedSet {
    #[must_use]
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EcoString>,
    {
        Self(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn one(item: impl Into<EcoString>) -> Self {
        Self(vec![item.into()])
    }

    /// Returns `true` if `description` is one of the alternatives.
    #[must_use]
    pub fn contains(&self, description: &str) -> bool {
        self.0.iter().any(|item| item == description)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(EcoString::as_str)
    }
}

impl fmt::Display for ExpectedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("something else"),
            [only] => f.write_str(only),
            [first, second] => write!(f, "{first} or {second}"),
            [init @ .., last] => {
                for item in init {
                    write!(f, "{item}, ")?;
                }
                write!(f, "or {last}")
            }
        }
    }
}

/// The kind of syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("unterminated {0} literal")]
    UnterminatedLiteral(LiteralKind),

    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(EcoString),

    #[error("invalid numeric literal `{0}`")]
    InvalidNumericSuffix(EcoString),

    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: ExpectedSet,
        found: EcoString,
    },

    /// End of input inside a bracketed group; `open` is the opening bracket.
    #[error("unclosed `{delimiter}`")]
    UnclosedDelimiter { delimiter: char, open: Span },

    #[error("sum type has no constructors")]
    EmptySumType,

    #[error("malformed array dimension: expected a name, a decimal literal or `]`, found {found}")]
    MalformedDimension { found: EcoString },

    #[error("missing operand after `{operator}`")]
    MissingOperand { operator: EcoString },

    #[error("expression nested too deeply (limit {limit})")]
    NestingTooDeep { limit: usize },

    #[error("failed to import \"{path}\": {reason}")]
    ImportFailed { path: EcoString, reason: EcoString },
}

impl From<LexErrorKind> for SyntaxErrorKind {
    fn from(kind: LexErrorKind) -> Self {
        match kind {
            LexErrorKind::UnterminatedLiteral(literal) => Self::UnterminatedLiteral(literal),
            LexErrorKind::InvalidEscape(text) => Self::InvalidEscape(text),
            LexErrorKind::InvalidNumericSuffix(text) => Self::InvalidNumericSuffix(text),
            LexErrorKind::UnexpectedCharacter(c) => Self::UnexpectedCharacter(c),
        }
    }
}

/// The single error a failed parse produces.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(futhark::syntax))]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    #[label("here")]
    pub span: Span,
}

impl SyntaxError {
    #[must_use]
    pub fn new(kind: impl Into<SyntaxErrorKind>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
        }
    }

    /// Creates an "expected X, found Y" error.
    #[must_use]
    pub fn unexpected(expected: ExpectedSet, found: impl Into<EcoString>, span: Span) -> Self {
        Self::new(
            SyntaxErrorKind::UnexpectedToken {
                expected,
                found: found.into(),
            },
            span,
        )
    }

    /// Wraps the error with its source text for rendering.
    ///
    /// ```
    /// use futhark_syntax::parse_program;
    ///
    /// let error = parse_program("def x = ").unwrap_err();
    /// let report = error.into_report("main.fut", "def x = ");
    /// assert!(report.to_string().contains("expected"));
    /// ```
    #[must_use]
    pub fn into_report(self, source_name: &str, source: &str) -> Report {
        Report::new(self).with_source_code(NamedSource::new(source_name, source.to_owned()))
    }
}

/// Failure reported by an [`ImportResolver`](crate::source_analysis::ImportResolver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ImportError {
    pub message: EcoString,
}

impl ImportError {
    #[must_use]
    pub fn new(message: impl Into<EcoString>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
