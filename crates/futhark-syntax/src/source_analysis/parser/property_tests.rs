// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Futhark parser.
//!
//! These tests use `proptest` to verify parser invariants over generated inputs:
//!
//! 1. **Parser never panics**: arbitrary string input always returns a result
//! 2. **Error spans within input**: the error span satisfies `end <= input.len()`
//! 3. **Chains group by associativity**: `a op b op c` folds left or right
//!    exactly as [`classify`](super::operators::classify) says
//! 4. **Tighter levels group first**: mixed-level expressions nest by rank
//! 5. **Rendering is stable**: parse, render, parse, render gives the same text

use proptest::prelude::*;

use super::operators::{Associativity, classify};
use super::{parse_expression, parse_program};
use crate::unparse::{unparse_expression, unparse_program};

// ============================================================================
// Near-valid Futhark generators
// ============================================================================

/// Futhark declarations for composing near-valid inputs.
const FRAGMENTS: &[&str] = &[
    "def x = 42",
    "def pi: f64 = 3.14",
    "def inc (x: i32) = x + 1",
    "def sum [n] (xs: [n]i32) : i32 = reduce (+) 0 xs",
    "def f 'a (x: a) = (x, x)",
    "def g = \\x y -> x * y",
    "def h xs = map (\\x -> x + 1) xs",
    "def r = {a = 1, b = true}",
    "def p = (1, 2).0",
    "def s = xs[1:n:2]",
    "def u = xs with [0] = 1",
    "def l = let y = 2 in y * y",
    "def c x = if x > 0 then x else -x",
    "def m x = match x case #some y -> y case #none -> 0",
    "def lp n = loop acc = 0 for i < n do acc + i",
    "def w = loop (i, x) = (0, 1) while i < 10 do (i + 1, x * 2)",
    "type t = i32",
    "type^ fn 'a = a -> a",
    "type opt 'a = #some a | #none",
    "type~ vec = ?[n].[n]f32",
    "module m = { def x = 1 }",
    "module type s = { type t val f : t -> t }",
    "module n = m",
    "open m",
    "local def hidden = 0",
    "#[inline] def fast x = x",
    "-- | documented\ndef d = 1",
    "def (<+>) a b = a + b",
    "def q = a |> f |> g",
    "def z = [1, 2, 3] ++ [4]",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(std::string::ToString::to_string)
}

/// Generates a truncated fragment (cut after a random number of chars).
fn truncated_fragment() -> impl Strategy<Value = String> {
    valid_fragment().prop_flat_map(|s| {
        let len = s.chars().count();
        (0..=len).prop_map(move |cut| s.chars().take(cut).collect())
    })
}

/// Generates input with mismatched brackets via single-pass char mapping.
fn mismatched_brackets() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| {
        s.chars()
            .map(|ch| match ch {
                '[' => '(',
                ']' => '}',
                '(' => '[',
                '{' => '(',
                _ => ch,
            })
            .collect()
    })
}

/// Generates input with duplicated operators.
fn duplicated_operators() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| s.replace('+', "+ +").replace('*', "* *"))
}

/// Generates several fragments joined into one program.
fn joined_fragments() -> impl Strategy<Value = String> {
    prop::collection::vec(valid_fragment(), 1..6).prop_map(|parts| parts.join("\n"))
}

fn near_valid_futhark() -> impl Strategy<Value = String> {
    prop_oneof![
        valid_fragment(),
        truncated_fragment(),
        mismatched_brackets(),
        duplicated_operators(),
        joined_fragments(),
    ]
}

/// Symbolic operators whose spelling lexes as a single operator token.
const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "//", "**", "++", "@", "^", "==", "!=", "<", "<=", ">", ">=",
    "&&", "||", "|>", "<|", ">>", "<<", "+.", "*^",
];

fn operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(OPERATORS)
}

/// Renders the expected grouping of `a0 op a1 op ... op an`.
fn expected_chain(op: &str, operands: usize, associativity: Associativity) -> String {
    let names: Vec<String> = (0..operands).map(|i| format!("a{i}")).collect();
    match associativity {
        Associativity::Right => names
            .iter()
            .rev()
            .cloned()
            .reduce(|right, left| format!("({left} {op} {right})"))
            .unwrap_or_default(),
        Associativity::Left | Associativity::NonAssoc => names
            .iter()
            .cloned()
            .reduce(|left, right| format!("({left} {op} {right})"))
            .unwrap_or_default(),
    }
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

    /// Property 1: Parser never panics on arbitrary string input.
    #[test]
    fn parser_never_panics(input in "\\PC{0,500}") {
        let _result = parse_program(&input);
        let _result = parse_expression(&input);
    }

    /// Property 2: The error span lies within the input.
    #[test]
    fn error_span_within_input(input in "\\PC{0,500}") {
        if let Err(error) = parse_program(&input) {
            let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
            prop_assert!(
                error.span.end() <= input_len,
                "Error span end {} exceeds input length {} for input {:?}: {}",
                error.span.end(),
                input_len,
                input,
                error,
            );
            prop_assert!(error.span.start() <= error.span.end());
        }
    }

    /// Property 2b: Near-valid input never panics and reports in-bounds spans.
    #[test]
    fn near_valid_input_reports_in_bounds(input in near_valid_futhark()) {
        if let Err(error) = parse_program(&input) {
            let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
            prop_assert!(
                error.span.end() <= input_len,
                "Error span {:?} out of bounds for input {:?}: {}",
                error.span,
                input,
                error,
            );
            prop_assert!(!error.to_string().contains("TokenKind"));
        }
    }

    /// Property 3: Chains of one operator group by its associativity.
    #[test]
    fn same_operator_chains_follow_associativity(op in operator(), operands in 2usize..7) {
        let Some(class) = classify(op) else {
            return Err(TestCaseError::fail(format!("{op} is not an infix operator")));
        };
        let source = (0..operands)
            .map(|i| format!("a{i}"))
            .collect::<Vec<_>>()
            .join(&format!(" {op} "));
        let expression = parse_expression(&source)
            .map_err(|error| TestCaseError::fail(format!("{source:?}: {error}")))?;
        prop_assert_eq!(
            unparse_expression(&expression),
            expected_chain(op, operands, class.associativity),
            "for {:?}",
            source,
        );
    }

    /// Property 4: The tighter of two operators groups first.
    #[test]
    fn tighter_operator_groups_first(first in operator(), second in operator()) {
        let (Some(first_class), Some(second_class)) = (classify(first), classify(second)) else {
            return Err(TestCaseError::fail("unclassified operator"));
        };
        prop_assume!(first_class.level != second_class.level);
        let source = format!("a {first} b {second} c");
        let expression = parse_expression(&source)
            .map_err(|error| TestCaseError::fail(format!("{source:?}: {error}")))?;
        let expected = if first_class.level > second_class.level {
            format!("((a {first} b) {second} c)")
        } else {
            format!("(a {first} (b {second} c))")
        };
        prop_assert_eq!(unparse_expression(&expression), expected, "for {:?}", source);
    }

    /// Property 5: Rendering a parsed program is a fixpoint after one round.
    #[test]
    fn rendering_is_stable(source in joined_fragments()) {
        let program = parse_program(&source)
            .map_err(|error| TestCaseError::fail(format!("{source:?}: {error}")))?;
        let rendered = unparse_program(&program);
        let reparsed = parse_program(&rendered)
            .map_err(|error| TestCaseError::fail(format!("{rendered:?}: {error}")))?;
        prop_assert_eq!(reparsed.declarations.len(), program.declarations.len());
        prop_assert_eq!(unparse_program(&reparsed), rendered);
    }

    /// Property 6: Negation of an operand never captures an infix operator.
    #[test]
    fn negation_binds_to_its_operand(op in operator()) {
        let source = format!("-a {op} b");
        let expression = parse_expression(&source)
            .map_err(|error| TestCaseError::fail(format!("{source:?}: {error}")))?;
        prop_assert_eq!(unparse_expression(&expression), format!("((-a) {op} b)"));
    }
}
