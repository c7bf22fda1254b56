// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Futhark lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated inputs:
//!
//! 1. **Lexer never panics**: arbitrary string input always produces tokens
//! 2. **Token spans within input**: all token spans satisfy `end <= input.len()`
//! 3. **Token spans are ordered**: each token starts after the previous one ends
//! 4. **EOF is always last**: `lex_with_eof` always ends with exactly one EOF
//! 5. **Valid fragments produce no errors**: known-valid inputs lex cleanly
//! 6. **Spans land on char boundaries**: every span slices the input
//! 7. **Integer literals keep their digits**: separators are dropped, the
//!    suffix is kept, and the printed literal lexes to the same token

use proptest::prelude::*;

use super::lexer::{lex, lex_with_eof, tokenize};
use super::token::{IntSuffix, Radix, TokenKind};

// ============================================================================
// Generators
// ============================================================================

/// Known-valid single-token fragments that should lex without errors.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "42",
    "3.14",
    "1.5f32",
    "2e-3f64",
    "0xff",
    "0b1010i8",
    "0b1u8",
    "1_000_000",
    "\"hello\\n\"",
    "'a'",
    "'\\t'",
    "x",
    "x'",
    "acc_2",
    "#some",
    "#[",
    "true",
    "+",
    "-",
    "*",
    "**",
    "...",
    "..<",
    "..>",
    "->",
    "<-",
    "|>",
    "<|",
    "==",
    "!=",
    "&&",
    "||",
    "%",
    "//",
    "%%",
    ">>>",
    "@",
    "<=",
];

/// Multi-token valid fragments that should lex cleanly.
const VALID_EXPRESSIONS: &[&str] = &[
    "map (+1) xs",
    "\\x -> x + 1",
    "let y = x * 2 in y",
    "xs[0:n]",
    "(x, y).0",
    "{a = 1, b = 2}",
    "r.a.b",
    "M.f x",
    "a with [i] = v",
    "loop acc = 0 for i < n do acc + i",
    "match x case #some y -> y case #none -> 0",
    "def f 'a [n] (xs: [n]a) : [n]a = xs",
    "type^ fn '~t = t -> t",
    "module m = { def x = 1 } -- trailing comment",
    "-- | docs\ndef x = 1",
    "import \"lib/github.com/foo/bar\"",
    "#[inline] def g = f 2",
    "!x && y || z",
];

const INT_SUFFIXES: &[&str] = &["i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64"];

/// An integer literal as its radix, `_`-separated digit groups and optional
/// width suffix.
fn integer_literal() -> impl Strategy<Value = (Radix, Vec<String>, Option<&'static str>)> {
    let radix = prop_oneof![
        Just(Radix::Decimal),
        Just(Radix::Hexadecimal),
        Just(Radix::Binary),
    ];
    let suffix = prop::option::of(prop::sample::select(INT_SUFFIXES));
    (radix, suffix).prop_flat_map(|(radix, suffix)| {
        let group = match radix {
            Radix::Decimal => "[0-9]{1,4}",
            Radix::Hexadecimal => "[0-9a-f]{1,4}",
            Radix::Binary => "[01]{1,4}",
        };
        (
            Just(radix),
            prop::collection::vec(group, 1..4),
            Just(suffix),
        )
    })
}

fn valid_single_token() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_SINGLE_TOKENS).prop_map(std::string::ToString::to_string)
}

fn valid_expression() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_EXPRESSIONS).prop_map(std::string::ToString::to_string)
}

// ============================================================================
// Property tests
// ============================================================================

/// Default is 512 cases; override via `PROPTEST_CASES` env var for nightly runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: Lexer never panics on arbitrary string input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _tokens = lex(&input);
        let _result = tokenize(&input);
    }

    /// Property 2: All token spans are within input bounds.
    #[test]
    fn token_spans_within_input(input in "\\PC{0,500}") {
        let tokens = lex_with_eof(&input);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for token in &tokens {
            let span = token.span();
            prop_assert!(
                span.end() <= input_len,
                "Token {:?} span end {} exceeds input length {} for input {:?}",
                token.kind(),
                span.end(),
                input_len,
                input,
            );
            prop_assert!(
                span.start() <= span.end(),
                "Token {:?} span start {} > end {} for input {:?}",
                token.kind(),
                span.start(),
                span.end(),
                input,
            );
        }
    }

    /// Property 3: Token spans are non-overlapping and ordered.
    #[test]
    fn token_spans_non_overlapping(input in "\\PC{0,500}") {
        let tokens = lex(&input);
        for window in tokens.windows(2) {
            let prev = &window[0];
            let next = &window[1];
            prop_assert!(
                next.span().start() >= prev.span().end(),
                "Overlapping spans: {:?} at {:?} and {:?} at {:?} for input {:?}",
                prev.kind(),
                prev.span(),
                next.kind(),
                next.span(),
                input,
            );
        }
    }

    /// Property 4: `lex_with_eof` ends with EOF and has no other EOF.
    #[test]
    fn eof_always_last(input in "\\PC{0,500}") {
        let tokens = lex_with_eof(&input);
        let Some((last, rest)) = tokens.split_last() else {
            return Err(TestCaseError::fail("lex_with_eof returned no tokens"));
        };
        prop_assert!(last.kind().is_eof(), "last token was {:?}", last.kind());
        prop_assert!(rest.iter().all(|token| !token.kind().is_eof()));
    }

    /// Property 5: Spans slice the input on char boundaries.
    #[test]
    fn spans_on_char_boundaries(input in "[a-z0-9 +*.'\"\\\\#é中]{0,80}") {
        for token in lex_with_eof(&input) {
            prop_assert!(
                token.span().text(&input).is_some(),
                "Span {:?} of {:?} does not slice {:?}",
                token.span(),
                token.kind(),
                input,
            );
        }
    }

    /// Property 6: Known-valid single tokens lex to exactly one token.
    #[test]
    fn valid_tokens_no_errors(input in valid_single_token()) {
        let tokens = lex(&input);
        prop_assert_eq!(tokens.len(), 1, "{:?} lexed as {:?}", input, tokens);
        prop_assert!(
            !tokens[0].kind().is_error(),
            "Valid input {:?} produced error token {:?}",
            input,
            tokens[0].kind(),
        );
    }

    /// Property 7: Known-valid fragments produce no Error tokens.
    #[test]
    fn valid_expressions_no_errors(input in valid_expression()) {
        for token in lex(&input) {
            prop_assert!(
                !token.kind().is_error(),
                "Valid fragment {:?} produced error token {:?}",
                input,
                token.kind(),
            );
        }
    }

    /// Property 8: Identifiers round-trip through the lexer unchanged.
    #[test]
    fn identifiers_lex_as_themselves(name in "[a-z][a-z0-9_']{0,12}") {
        let tokens = lex(&name);
        prop_assume!(tokens.len() == 1);
        match tokens[0].kind() {
            TokenKind::Identifier(text) => prop_assert_eq!(text.as_str(), name.as_str()),
            TokenKind::Keyword(keyword) => prop_assert_eq!(keyword.as_str(), name.as_str()),
            TokenKind::Operator(word) => prop_assert_eq!(word.as_str(), name.as_str()),
            other => prop_assert!(false, "{:?} lexed as {:?}", name, other),
        }
    }

    /// Property 9: Integer literals drop their separators and keep their
    /// suffix; printing the literal back lexes to the same token.
    #[test]
    fn integer_literals_keep_digits_and_suffix((radix, groups, suffix) in integer_literal()) {
        let source = format!("{}{}{}", radix.prefix(), groups.join("_"), suffix.unwrap_or(""));
        let tokens = lex(&source);
        prop_assert_eq!(tokens.len(), 1, "{:?} lexed as {:?}", source, tokens);
        let TokenKind::Integer(literal) = tokens[0].kind() else {
            return Err(TestCaseError::fail(format!(
                "{source:?} lexed as {:?}",
                tokens[0].kind()
            )));
        };
        prop_assert_eq!(literal.radix, radix);
        let expected_digits = groups.concat();
        prop_assert_eq!(literal.digits.as_str(), expected_digits.as_str());
        prop_assert_eq!(literal.suffix.map(IntSuffix::as_str), suffix);

        let printed = literal.to_string();
        let relexed = lex(&printed);
        prop_assert_eq!(relexed.len(), 1, "{:?} relexed as {:?}", printed, relexed);
        prop_assert_eq!(relexed[0].kind(), tokens[0].kind());
    }

    /// Property 10: Comments never produce tokens.
    #[test]
    fn comments_are_trivia(text in "[^\n]{0,60}") {
        let source = format!("--{text}\n");
        prop_assert!(lex(&source).is_empty());
    }
}
