// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety testing.
//!
//! This target feeds arbitrary byte sequences to the lexer and parser and
//! asserts that neither panics. The parser must handle all input gracefully,
//! producing either a program or exactly one syntax error.
//!
//! # Success Criteria
//!
//! The parser passes fuzzing if:
//! - It never panics or overflows the stack on any input
//! - Every token span lies inside the input
//! - The error span, when parsing fails, lies inside the input
//!
//! # Corpus Seeding
//!
//! Seed `fuzz/corpus/parse_arbitrary/` with the `.fut` files from
//! `test-package-parser/cases/` for realistic starting points.

#![no_main]

use futhark_syntax::parse_program;
use futhark_syntax::source_analysis::lex_with_eof;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Source files are text; invalid UTF-8 is rejected before lexing
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(len) = u32::try_from(source.len()) else {
        return;
    };

    for token in lex_with_eof(source) {
        assert!(token.span().end() <= len, "token {token:?} out of bounds");
    }

    if let Err(error) = parse_program(source) {
        assert!(error.span.end() <= len, "error {error:?} out of bounds");
    }
});
