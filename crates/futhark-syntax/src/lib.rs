// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Futhark syntax front end.
//!
//! This crate turns Futhark source text into a syntax tree:
//! - Lexical analysis (tokenization, literal decoding)
//! - Parsing (AST construction with precedence climbing)
//! - Unparsing (rendering an AST back to parseable source)
//!
//! Nothing here resolves names, checks types, or reads files. Imports are
//! only validated and handed to an [`ImportResolver`](source_analysis::ImportResolver).
//!
//! ```
//! use futhark_syntax::{parse_program, unparse::unparse_program};
//!
//! let program = parse_program("def inc (x: i32) = x + 1").unwrap();
//! let text = unparse_program(&program);
//! assert_eq!(parse_program(&text).unwrap().declarations.len(), 1);
//! ```

pub mod ast;
pub mod source_analysis;
pub mod unparse;

pub use source_analysis::{
    ParseOptions, Span, SyntaxError, parse_expression, parse_pattern, parse_program,
    parse_program_with, parse_type,
};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Declaration, Expression, Identifier, Pattern, Program, TypeExpr};
    pub use crate::source_analysis::{Span, SyntaxError};
}
