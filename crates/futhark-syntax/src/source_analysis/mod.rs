// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing of Futhark source code.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Each token
//! carries its source location via [`Span`] and the whitespace and comments
//! that precede it.
//!
//! ```
//! use futhark_syntax::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("map (+1) xs").collect();
//! assert_eq!(tokens.len(), 6); // map, (, +, 1, ), xs
//! ```
//!
//! # Parsing
//!
//! [`parse_program`] turns a whole file into a [`Program`](crate::ast::Program);
//! [`parse_expression`], [`parse_type`] and [`parse_pattern`] parse a single
//! fragment. Infix operators are grouped by precedence climbing over the
//! [`classify`] table, which derives an operator's level from its spelling.
//!
//! # Error Handling
//!
//! The lexer never stops: malformed input becomes [`TokenKind::Error`]
//! tokens. The parser does stop, at the first problem, and reports exactly
//! one [`SyntaxError`].

mod error;
mod lexer;
mod parser;
mod span;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use error::{
    ExpectedSet, ImportError, LexErrorKind, LiteralKind, SyntaxError, SyntaxErrorKind,
};
pub use lexer::{Lexer, lex, lex_with_eof, tokenize};
pub use parser::operators::{Associativity, OperatorClass, OperatorLevel, TYPE_ARROW, classify};
pub use parser::{
    DEFAULT_MAX_NESTING_DEPTH, Diagnostic, DiagnosticSink, ImportResolver, ParseOptions,
    Severity, parse_expression, parse_pattern, parse_program, parse_program_with, parse_type,
};
pub(crate) use parser::{STACK_GROWTH, STACK_RED_ZONE};
pub use span::{LineCol, Span};
pub use token::{
    FloatLiteral, FloatSuffix, IntLiteral, IntSuffix, Keyword, OPERATOR_WORDS, Punct, Radix,
    Token, TokenKind, Trivia,
};
