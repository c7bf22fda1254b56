// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for renderer stability.
//!
//! Whenever arbitrary input parses, its rendering must parse too and render
//! to the same text. A failure means the renderer dropped grouping that the
//! parser depends on.

#![no_main]

use futhark_syntax::parse_program;
use futhark_syntax::unparse::unparse_program;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(program) = parse_program(source) else {
        return;
    };
    let rendered = unparse_program(&program);
    let reparsed = match parse_program(&rendered) {
        Ok(reparsed) => reparsed,
        Err(error) => panic!("rendering of {source:?} failed to parse: {error}\n{rendered}"),
    };
    assert_eq!(unparse_program(&reparsed), rendered);
});
