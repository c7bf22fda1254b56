// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Futhark source code.
//!
//! The parser turns the token stream produced by the lexer into the AST in
//! [`crate::ast`]. It is written for a compiler front end rather than an
//! editor: it stops at the first problem and reports exactly one
//! [`SyntaxError`], pointing at the smallest span responsible.
//!
//! # Design
//!
//! - **One error, precise span** - no recovery, no error nodes in the AST
//! - **Trivia-aware** - doc comments travel as leading trivia on tokens and
//!   are attached to declarations here
//! - **Bounded recursion** - every recursive entry point goes through
//!   [`Parser::nested`], which enforces a depth limit and grows the stack
//!   with `stacker`
//!
//! # Operator Precedence (Pratt Parsing)
//!
//! User-definable infix operators are grouped by precedence climbing. An
//! operator's level is derived from its spelling by
//! [`classify`](operators::classify):
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 16 | `**…` `lsl` `lsr` `asr` | Right |
//! | 15 | `*…` `/…` `%…` `mod` `land` `lor` `lxor` | Left |
//! | 14 | `+…` `-…` | Left |
//! | 12 | `@…` `^…` | Right |
//! | 9 | `==` `<…` `>…` `$…` `!=` `&…` `|…` | Left |
//! | 8 | `&` `&&` | Right |
//! | 7 | `||` `or` | Right |
//! | 5 | `:=` | Right |
//!
//! Application by juxtaposition binds tighter than all of them.
//!
//! # Usage
//!
//! ```
//! use futhark_syntax::source_analysis::parse_program;
//!
//! let program = parse_program("def main (xs: []i32) = reduce (+) 0 xs").unwrap();
//! assert_eq!(program.declarations.len(), 1);
//! ```

use ecow::EcoString;

use crate::ast::{
    Attribute, AttributeKind, Expression, Identifier, Pattern, Program, QualName, TypeExpr,
};
use crate::source_analysis::{
    ExpectedSet, ImportError, Keyword, Punct, Span, SyntaxError, SyntaxErrorKind, Token,
    TokenKind, Trivia, tokenize,
};

// Submodules with additional impl blocks for Parser
mod declarations;
mod expressions;
mod modules;
pub(crate) mod operators;
mod patterns;
mod types;

#[cfg(test)]
mod property_tests;

/// Result of a single parsing step.
pub(super) type ParseResult<T> = Result<T, SyntaxError>;

/// Default limit on syntactic nesting.
///
/// Deeply nested input such as `((((...))))` recurses once per level
/// through several parser frames. The limit turns pathological input into
/// a [`SyntaxErrorKind::NestingTooDeep`] error; `stacker::maybe_grow` at
/// each recursive entry point keeps legitimate deep nesting from
/// overflowing the native stack.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 1024;

/// Remaining stack below which `stacker` allocates a new segment.
pub(crate) const STACK_RED_ZONE: usize = 32 * 1024;

/// Size of each stack segment allocated by `stacker`.
pub(crate) const STACK_GROWTH: usize = 256 * 1024;

// ============================================================================
// Configuration & Collaborators
// ============================================================================

/// Options for [`parse_program_with`].
///
/// ```
/// use futhark_syntax::source_analysis::ParseOptions;
///
/// let options = ParseOptions::default()
///     .with_source_name("lib/math.fut")
///     .with_max_nesting_depth(64);
/// assert_eq!(options.max_nesting_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name used in log events; not interpreted.
    pub source_name: EcoString,
    /// Maximum syntactic nesting before the parse is abandoned.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_name: "<input>".into(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn with_source_name(mut self, source_name: impl Into<EcoString>) -> Self {
        self.source_name = source_name.into();
        self
    }

    #[must_use]
    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}

/// A diagnostic message delivered to a [`DiagnosticSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: EcoString,
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(error: &SyntaxError) -> Self {
        Self::error(error.to_string(), error.span)
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The parse failed.
    Error,
    /// Suspicious but accepted input, such as a detached doc comment.
    Warning,
}

/// Receives the diagnostics of a parse.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Loads the program named by an `import "path"` declaration.
///
/// The parser calls the resolver once per import it encounters and stores
/// the result in the AST without looking inside it. Closures implement the
/// trait directly:
///
/// ```
/// use futhark_syntax::source_analysis::{
///     ImportError, ParseOptions, Span, parse_program, parse_program_with,
/// };
///
/// let mut resolver = |path: &str, _span: Span| match path {
///     "lib" => parse_program("def one = 1").map_err(|e| ImportError::new(e.to_string())),
///     _ => Err(ImportError::new("no such file")),
/// };
/// let mut diagnostics = Vec::new();
/// let program = parse_program_with(
///     "import \"lib\"",
///     &ParseOptions::default(),
///     Some(&mut resolver),
///     &mut diagnostics,
/// );
/// assert!(program.is_ok());
/// ```
pub trait ImportResolver {
    /// Returns the parsed program for `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`ImportError`] when the path cannot be loaded or parsed.
    fn resolve(&mut self, path: &str, span: Span) -> Result<Program, ImportError>;
}

impl<F> ImportResolver for F
where
    F: FnMut(&str, Span) -> Result<Program, ImportError>,
{
    fn resolve(&mut self, path: &str, span: Span) -> Result<Program, ImportError> {
        self(path, span)
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parses a whole source file with default options.
///
/// # Errors
///
/// Returns the first lexical or syntax error.
pub fn parse_program(source: &str) -> Result<Program, SyntaxError> {
    parse_program_with(source, &ParseOptions::default(), None, &mut Vec::new())
}

/// Parses a whole source file.
///
/// Warnings, and the error if the parse fails, are also delivered to
/// `sink`. Imports are resolved through `resolver` when one is given and
/// left unresolved otherwise.
///
/// # Errors
///
/// Returns the first lexical or syntax error, or an
/// [`SyntaxErrorKind::ImportFailed`] error when the resolver fails.
pub fn parse_program_with(
    source: &str,
    options: &ParseOptions,
    resolver: Option<&mut dyn ImportResolver>,
    sink: &mut dyn DiagnosticSink,
) -> Result<Program, SyntaxError> {
    tracing::debug!(source = %options.source_name, bytes = source.len(), "parsing program");
    let result = tokenize(source).and_then(|tokens| {
        let mut parser = Parser::new(tokens, options, resolver);
        let program = parser.parse_program();
        for warning in parser.warnings.drain(..) {
            sink.report(warning);
        }
        program
    });
    match &result {
        Ok(program) => tracing::debug!(
            source = %options.source_name,
            declarations = program.declarations.len(),
            "parsed program"
        ),
        Err(error) => {
            tracing::debug!(
                source = %options.source_name,
                error = %error,
                offset = error.span.start(),
                "parse failed"
            );
            sink.report(Diagnostic::from(error));
        }
    }
    result
}

/// Parses a single expression.
///
/// ```
/// use futhark_syntax::ast::Expression;
/// use futhark_syntax::source_analysis::parse_expression;
///
/// let expression = parse_expression("x - 1").unwrap();
/// assert!(matches!(expression, Expression::Infix { .. }));
/// ```
///
/// # Errors
///
/// Returns the first error, including trailing tokens after the expression.
pub fn parse_expression(source: &str) -> Result<Expression, SyntaxError> {
    parse_fragment(source, Parser::parse_expression)
}

/// Parses a single type expression.
///
/// # Errors
///
/// Returns the first error, including trailing tokens after the type.
pub fn parse_type(source: &str) -> Result<TypeExpr, SyntaxError> {
    parse_fragment(source, Parser::parse_type)
}

/// Parses a single pattern.
///
/// # Errors
///
/// Returns the first error, including trailing tokens after the pattern.
pub fn parse_pattern(source: &str) -> Result<Pattern, SyntaxError> {
    parse_fragment(source, Parser::parse_pattern)
}

fn parse_fragment<T>(
    source: &str,
    parse: impl FnOnce(&mut Parser<'static>) -> ParseResult<T>,
) -> Result<T, SyntaxError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens, &ParseOptions::default(), None);
    let fragment = parse(&mut parser)?;
    parser.expect_end()?;
    Ok(fragment)
}

// ============================================================================
// Parser State
// ============================================================================

/// The parser state.
pub(super) struct Parser<'r> {
    /// The tokens being parsed; always ends with EOF.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
    /// Current syntactic nesting depth.
    nesting_depth: usize,
    max_nesting_depth: usize,
    resolver: Option<&'r mut dyn ImportResolver>,
    /// Warnings gathered so far, handed to the sink when parsing ends.
    warnings: Vec<Diagnostic>,
}

impl<'r> Parser<'r> {
    /// Creates a new parser for the given tokens.
    fn new(
        mut tokens: Vec<Token>,
        options: &ParseOptions,
        resolver: Option<&'r mut dyn ImportResolver>,
    ) -> Self {
        if !tokens.last().is_some_and(|token| token.kind().is_eof()) {
            let end = tokens.last().map_or(0, |token| token.span().end());
            tokens.push(Token::new(TokenKind::Eof, Span::point(end)));
        }
        Self {
            tokens,
            current: 0,
            nesting_depth: 0,
            max_nesting_depth: options.max_nesting_depth,
            resolver,
            warnings: Vec::new(),
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the token `offset` positions ahead, or EOF past the end.
    fn token_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + offset).min(last)]
    }

    /// Returns the current token.
    pub(super) fn current_token(&self) -> &Token {
        self.token_at(0)
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    pub(super) fn current_span(&self) -> Span {
        self.current_token().span()
    }

    /// Peeks at the kind of the token `offset` positions ahead.
    pub(super) fn kind_at(&self, offset: usize) -> &TokenKind {
        self.token_at(offset).kind()
    }

    /// Checks if we're at the end of input.
    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances to the next token and returns the previous one.
    ///
    /// Never moves past EOF.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Whether the token `offset` positions ahead starts exactly where the
    /// token before it ends.
    pub(super) fn is_adjacent_at(&self, offset: usize) -> bool {
        let index = self.current + offset;
        if index == 0 || index >= self.tokens.len() {
            return false;
        }
        self.tokens[index - 1].span().end() == self.tokens[index].span().start()
    }

    /// Whether the current token touches the previous one.
    pub(super) fn is_adjacent(&self) -> bool {
        self.is_adjacent_at(0)
    }

    pub(super) fn check_punct(&self, punct: Punct) -> bool {
        self.current_kind().is_punct(punct)
    }

    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_kind().is_keyword(keyword)
    }

    /// Consumes the current token if it is `punct`, returning its span.
    pub(super) fn eat_punct(&mut self, punct: Punct) -> Option<Span> {
        self.check_punct(punct).then(|| self.advance().span())
    }

    /// Consumes the current token if it is `keyword`, returning its span.
    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> Option<Span> {
        self.check_keyword(keyword).then(|| self.advance().span())
    }

    /// Expects the current token to be `punct`, advancing if it is.
    pub(super) fn expect_punct(&mut self, punct: Punct) -> ParseResult<Span> {
        self.eat_punct(punct)
            .ok_or_else(|| self.unexpected(&[backticked(punct.as_str()).as_str()]))
    }

    /// Expects the current token to be `keyword`, advancing if it is.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<Span> {
        self.eat_keyword(keyword)
            .ok_or_else(|| self.unexpected(&[backticked(keyword.as_str()).as_str()]))
    }

    /// Expects the delimiter closing the one at `open`.
    ///
    /// Running into the end of input reports the opening delimiter as
    /// unclosed; any other token is unexpected, and `alternatives` lists
    /// what else could have continued the bracketed form.
    pub(super) fn expect_closing(
        &mut self,
        close: Punct,
        open: Span,
        alternatives: &[&str],
    ) -> ParseResult<Span> {
        if let Some(span) = self.eat_punct(close) {
            return Ok(span);
        }
        if self.is_at_end() {
            return Err(self.unclosed(open));
        }
        let closing = backticked(close.as_str());
        let mut expected = vec![closing.as_str()];
        expected.extend_from_slice(alternatives);
        Err(self.unexpected(&expected))
    }

    /// An [`SyntaxErrorKind::UnclosedDelimiter`] for the delimiter at `open`.
    pub(super) fn unclosed(&self, open: Span) -> SyntaxError {
        let delimiter = self
            .tokens
            .iter()
            .find(|token| token.span() == open)
            .and_then(|token| match token.kind() {
                TokenKind::Punct(punct) => punct.as_str().chars().last(),
                _ => None,
            })
            .unwrap_or('(');
        SyntaxError::new(
            SyntaxErrorKind::UnclosedDelimiter { delimiter, open },
            open,
        )
    }

    /// Expects the end of input.
    pub(super) fn expect_end(&self) -> ParseResult<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected(&["end of input"]))
        }
    }

    /// An "expected ..., found <current token>" error at the current token.
    pub(super) fn unexpected(&self, expected: &[&str]) -> SyntaxError {
        SyntaxError::unexpected(
            ExpectedSet::new(expected.iter().copied()),
            self.current_kind().to_string(),
            self.current_span(),
        )
    }

    /// Expects an identifier.
    pub(super) fn expect_identifier(&mut self) -> ParseResult<Identifier> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let identifier = Identifier::new(name.clone(), self.current_span());
            self.advance();
            Ok(identifier)
        } else {
            Err(self.unexpected(&["an identifier"]))
        }
    }

    /// Parses a possibly qualified name: `x`, `M.x`, `M.N.x`.
    ///
    /// The dots must touch the names on both sides.
    pub(super) fn parse_qual_name(&mut self) -> ParseResult<QualName> {
        let mut name = self.expect_identifier()?;
        let mut qualifiers = Vec::new();
        while self.check_punct(Punct::Dot)
            && self.is_adjacent()
            && self.is_adjacent_at(1)
            && self.kind_at(1).is_identifier()
        {
            self.advance();
            let next = self.expect_identifier()?;
            qualifiers.push(std::mem::replace(&mut name, next));
        }
        let span = qualifiers
            .first()
            .map_or(name.span, |first| first.span.merge(name.span));
        Ok(QualName {
            qualifiers,
            name,
            span,
        })
    }

    /// Whether the token `offset` positions ahead can name a record field.
    pub(super) fn is_field_name_at(&self, offset: usize) -> bool {
        match self.kind_at(offset) {
            TokenKind::Identifier(_) => true,
            TokenKind::Integer(literal) => literal.is_plain_decimal(),
            _ => false,
        }
    }

    /// Parses a record field name: an identifier or a tuple position.
    pub(super) fn parse_field_name(&mut self) -> ParseResult<Identifier> {
        if !self.is_field_name_at(0) {
            return Err(self.unexpected(&["a field name"]));
        }
        let token = self.advance();
        let name = match token.kind() {
            TokenKind::Integer(literal) => literal.digits.clone(),
            TokenKind::Identifier(name) => name.clone(),
            _ => EcoString::new(),
        };
        Ok(Identifier::new(name, token.span()))
    }

    // ========================================================================
    // Attributes & Doc Comments
    // ========================================================================

    /// Parses `#[attr]`.
    pub(super) fn parse_attribute(&mut self) -> ParseResult<Attribute> {
        let open = self.expect_punct(Punct::AttributeOpen)?;
        let kind = self.parse_attribute_info()?.kind;
        let close = self.expect_closing(Punct::RightBracket, open, &[])?;
        Ok(Attribute {
            kind,
            span: open.merge(close),
        })
    }

    /// Parses the inside of an attribute: `name`, `3`, `name(a, b)`.
    fn parse_attribute_info(&mut self) -> ParseResult<Attribute> {
        let start = self.current_span();
        let name: EcoString = match self.current_kind() {
            TokenKind::Integer(literal) => {
                let kind = AttributeKind::Integer(literal.clone());
                self.advance();
                return Ok(Attribute { kind, span: start });
            }
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Keyword(keyword) => keyword.as_str().into(),
            _ => return Err(self.unexpected(&["an attribute"])),
        };
        self.advance();
        let Some(open) = self.eat_punct(Punct::LeftParen) else {
            return Ok(Attribute {
                kind: AttributeKind::Name(name),
                span: start,
            });
        };
        let mut arguments = Vec::new();
        if !self.check_punct(Punct::RightParen) {
            loop {
                arguments.push(self.nested(Self::parse_attribute_info)?);
                if self.eat_punct(Punct::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect_closing(Punct::RightParen, open, &["`,`"])?;
        Ok(Attribute {
            kind: AttributeKind::Call { name, arguments },
            span: start.merge(close),
        })
    }

    /// Extracts a doc comment from the current token's leading trivia.
    ///
    /// Collects the `-- |` line and the plain `--` lines directly following
    /// it, strips the comment markers, and joins them with newlines. A blank
    /// line after a doc comment detaches it: the comment is dropped and a
    /// [`Severity::Warning`] is recorded.
    pub(super) fn collect_doc_comment(&mut self) -> Option<EcoString> {
        let span = self.current_span();
        let mut lines: Vec<&str> = Vec::new();
        let mut in_doc = false;
        let mut detached = false;
        for trivia in self.current_token().leading_trivia() {
            match trivia {
                Trivia::DocComment(text) => {
                    lines.clear();
                    in_doc = true;
                    lines.push(strip_comment_marker(text, "-- |"));
                }
                Trivia::LineComment(text) if in_doc => {
                    lines.push(strip_comment_marker(text, "--"));
                }
                Trivia::LineComment(_) => {}
                Trivia::Whitespace(_) => {
                    if in_doc && trivia.contains_blank_line() {
                        lines.clear();
                        in_doc = false;
                        detached = true;
                    }
                }
            }
        }
        let doc = (!lines.is_empty()).then(|| EcoString::from(lines.join("\n")));
        if detached {
            self.warnings.push(Diagnostic::warning(
                "doc comment is not attached to a declaration; remove the blank line after it",
                span,
            ));
        }
        doc
    }

    // ========================================================================
    // Nesting
    // ========================================================================

    /// Runs `parse` one nesting level deeper.
    ///
    /// Fails with [`SyntaxErrorKind::NestingTooDeep`] at the current token
    /// once the configured limit is reached.
    pub(super) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.nesting_depth >= self.max_nesting_depth {
            return Err(SyntaxError::new(
                SyntaxErrorKind::NestingTooDeep {
                    limit: self.max_nesting_depth,
                },
                self.current_span(),
            ));
        }
        self.nesting_depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || parse(self));
        self.nesting_depth -= 1;
        result
    }
}

/// Wraps token text in backticks, the way expected tokens are described.
fn backticked(text: &str) -> String {
    format!("`{text}`")
}

/// Strips a comment marker and one following space.
fn strip_comment_marker<'a>(text: &'a str, marker: &str) -> &'a str {
    let rest = text.strip_prefix(marker).unwrap_or(text);
    rest.strip_prefix(' ').unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, Literal, RangeKind};
    use crate::unparse::{unparse_expression, unparse_pattern, unparse_type};

    fn expr(source: &str) -> String {
        match parse_expression(source) {
            Ok(expression) => unparse_expression(&expression),
            Err(error) => panic!("failed to parse {source:?}: {error}"),
        }
    }

    fn ty(source: &str) -> String {
        match parse_type(source) {
            Ok(ty) => unparse_type(&ty),
            Err(error) => panic!("failed to parse {source:?}: {error}"),
        }
    }

    fn pat(source: &str) -> String {
        match parse_pattern(source) {
            Ok(pattern) => unparse_pattern(&pattern),
            Err(error) => panic!("failed to parse {source:?}: {error}"),
        }
    }

    fn expr_err(source: &str) -> SyntaxError {
        parse_expression(source).expect_err(source)
    }

    fn program_err(source: &str) -> SyntaxError {
        parse_program(source).expect_err(source)
    }

    fn expected(error: &SyntaxError) -> (&ExpectedSet, &str) {
        match &error.kind {
            SyntaxErrorKind::UnexpectedToken { expected, found } => (expected, found),
            other => panic!("expected UnexpectedToken, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------------

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(expr("a + b * c"), "(a + (b * c))");
        assert_eq!(expr("a * b + c"), "((a * b) + c)");
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(expr("a - b - c"), "((a - b) - c)");
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(expr("a ** b ** c"), "(a ** (b ** c))");
    }

    #[test]
    fn user_operators_take_the_level_of_their_leading_character() {
        assert_eq!(expr("a +++ b *** c"), "(a +++ (b *** c))");
        assert_eq!(expr("x |> f |> g"), "((x |> f) |> g)");
        assert_eq!(expr("xs ++ ys ++ zs"), "((xs ++ ys) ++ zs)");
    }

    #[test]
    fn logical_operators_group_below_comparisons() {
        assert_eq!(expr("a < b && c == d"), "((a < b) && (c == d))");
        assert_eq!(expr("a || b && c"), "(a || (b && c))");
        assert_eq!(expr("a && b || c"), "((a && b) || c)");
        assert_eq!(expr("a && b && c"), "(a && (b && c))");
    }

    #[test]
    fn concatenation_is_right_associative() {
        assert_eq!(expr("a ^ b ^ c"), "(a ^ (b ^ c))");
        assert_eq!(expr("a @ b + c"), "(a @ (b + c))");
    }

    #[test]
    fn word_operators() {
        assert_eq!(expr("a mod b"), "(a mod b)");
        assert_eq!(expr("x lsl 2 + 1"), "((x lsl 2) + 1)");
    }

    #[test]
    fn application_binds_tighter_than_operators() {
        assert_eq!(expr("f x + g y"), "((f x) + (g y))");
        assert_eq!(expr("f x y"), "((f x) y)");
    }

    #[test]
    fn unary_minus_is_negation_without_a_left_operand() {
        assert_eq!(expr("- 1"), "(-1)");
        assert_eq!(expr("x - 1"), "(x - 1)");
        assert_eq!(expr("-f x"), "(-(f x))");
        assert_eq!(expr("-x ** 2"), "((-x) ** 2)");
        assert_eq!(expr("a * -b"), "(a * (-b))");
    }

    #[test]
    fn parenthesized_negation_is_not_a_literal() {
        let expression = parse_expression("(-1)").unwrap();
        let Expression::Parens(inner, span) = expression else {
            panic!("expected parentheses");
        };
        assert_eq!(span, Span::new(0, 4));
        let Expression::Negate { operand, .. } = *inner else {
            panic!("expected negation");
        };
        assert!(matches!(*operand, Expression::Literal(Literal::Integer(_), _)));
    }

    #[test]
    fn logical_not_takes_an_atom() {
        assert_eq!(expr("!f x"), "((!f) x)");
        assert_eq!(expr("!(f x)"), "(!(f x))");
        assert_eq!(expr("!a && b"), "((!a) && b)");
    }

    #[test]
    fn missing_operand_after_operator() {
        let error = expr_err("x +");
        assert_eq!(
            error.kind,
            SyntaxErrorKind::MissingOperand {
                operator: "+".into()
            }
        );
        assert_eq!(error.span, Span::new(2, 3));
    }

    // ------------------------------------------------------------------------
    // Ascription, ranges, updates
    // ------------------------------------------------------------------------

    #[test]
    fn ascription_binds_loosest() {
        assert_eq!(expr("f x + 1 : i32"), "(((f x) + 1) : i32)");
        assert_eq!(expr("xs :> [n]i32"), "(xs :> [n]i32)");
    }

    #[test]
    fn operator_after_ascribed_type_is_an_error() {
        let error = expr_err("f x : i32 + 1");
        let (expected, found) = expected(&error);
        assert!(expected.contains("end of input"));
        assert_eq!(found, "`+`");
    }

    #[test]
    fn ranges() {
        assert_eq!(expr("0 ..< n"), "(0 ..< n)");
        assert_eq!(expr("1 .. 3 ... 9"), "(1 .. 3 ... 9)");
        assert_eq!(expr("n .. n - 1 ..> 0"), "(n .. (n - 1) ..> 0)");
        let Expression::Range { kind, step, .. } = parse_expression("a .. b").unwrap() else {
            panic!("expected a range");
        };
        assert_eq!(kind, RangeKind::Inclusive);
        assert!(step.is_none());
    }

    #[test]
    fn updates_chain_to_the_left() {
        assert_eq!(
            expr("a with [0] = 1 with [1] = 2"),
            "((a with [0] = 1) with [1] = 2)"
        );
        assert_eq!(expr("r with x.y = f z"), "(r with x.y = (f z))");
    }

    // ------------------------------------------------------------------------
    // Atoms and postfix forms
    // ------------------------------------------------------------------------

    #[test]
    fn sections() {
        assert_eq!(expr("(+)"), "(+)");
        assert_eq!(expr("(+ 1)"), "(+ 1)");
        assert_eq!(expr("(x -)"), "(x -)");
        assert_eq!(expr("(.a.b)"), "(.a.b)");
        assert_eq!(expr("map (*2) xs"), "((map (* 2)) xs)");
    }

    #[test]
    fn indexing_requires_adjacent_bracket() {
        assert_eq!(expr("a[i, 1:n:2]"), "a[i, 1:n:2]");
        assert_eq!(expr("a[:n]"), "a[:n]");
        assert_eq!(expr("f [1, 2]"), "(f [1, 2])");
    }

    #[test]
    fn projections_and_qualified_names() {
        assert_eq!(expr("f32.sqrt x"), "(f32.sqrt x)");
        assert_eq!(expr("p.0 + p.1"), "((p).0 + (p).1)");
        assert_eq!(expr("(f x).a.b"), "(f x).a.b");
        assert_eq!(expr("M.(x + y)"), "M.((x + y))");
    }

    #[test]
    fn records_tuples_and_arrays() {
        assert_eq!(expr("{a = 1, b}"), "{a = 1, b}");
        assert_eq!(expr("(1, 2.5f32, 'c')"), "(1, 2.5f32, 'c')");
        assert_eq!(expr("[]"), "[]");
        assert_eq!(expr("()"), "()");
        assert_eq!(expr("#some (x, y)"), "(#some (x, y))");
    }

    #[test]
    fn unclosed_parenthesis_at_end_of_input() {
        let error = expr_err("(a + b");
        assert_eq!(
            error.kind,
            SyntaxErrorKind::UnclosedDelimiter {
                delimiter: '(',
                open: Span::new(0, 1)
            }
        );
    }

    #[test]
    fn mismatched_bracket_is_unexpected() {
        let error = expr_err("(a + b]");
        let (expected, found) = expected(&error);
        assert!(expected.contains("`)`"));
        assert_eq!(found, "`]`");
    }

    // ------------------------------------------------------------------------
    // Keyword forms
    // ------------------------------------------------------------------------

    #[test]
    fn keyword_forms_extend_right() {
        assert_eq!(
            expr("if c then 1 else x + 1"),
            "(if c then 1 else (x + 1))"
        );
        assert_eq!(expr("\\x -> x + 1"), "(\\x -> (x + 1))");
        assert_eq!(
            expr("let x = 1 let y = 2 in x + y"),
            "(let x = 1 in (let y = 2 in (x + y)))"
        );
    }

    #[test]
    fn loops() {
        assert_eq!(
            expr("loop acc = 0 for i < n do acc + i"),
            "(loop acc = 0 for i < n do (acc + i))"
        );
        assert_eq!(
            expr("loop (x, y) for z in zs do (y, z)"),
            "(loop (x, y) for z in zs do (y, z))"
        );
        assert_eq!(
            expr("loop x = 1 while x < 100 do x * 2"),
            "(loop x = 1 while (x < 100) do (x * 2))"
        );
    }

    #[test]
    fn match_cases() {
        assert_eq!(
            expr("match o case #some x -> x case #none -> 0"),
            "(match o case (#some x) -> x case #none -> 0)"
        );
    }

    #[test]
    fn let_forms() {
        assert_eq!(
            expr("let f x y = x + y in f 1 2"),
            "(let f x y = (x + y) in ((f 1) 2))"
        );
        assert_eq!(
            expr("let a[i] = 0 in a"),
            "(let a[i] = 0 in a)"
        );
        assert_eq!(
            expr("let (a, b): (i32, i32) = p in a"),
            "(let ((a, b) : (i32, i32)) = p in a)"
        );
    }

    #[test]
    fn let_without_body_at_end_of_input() {
        let error = program_err("let x =");
        let (_, found) = expected(&error);
        assert_eq!(found, "end of input");
        assert_eq!(error.span, Span::point(7));
    }

    // ------------------------------------------------------------------------
    // Types and patterns
    // ------------------------------------------------------------------------

    #[test]
    fn function_types_are_right_associative() {
        assert_eq!(ty("a -> b -> c"), "(a -> (b -> c))");
        assert_eq!(ty("(x: i32) -> [x]f32"), "((x: i32) -> [x]f32)");
    }

    #[test]
    fn type_terms() {
        assert_eq!(ty("[n][m]f32"), "[n][m]f32");
        assert_eq!(ty("*[]i32"), "*[]i32");
        assert_eq!(ty("vec [3] f64"), "(vec [3] f64)");
        assert_eq!(ty("#circle f32 | #square f32 f32"), "#circle f32 | #square f32 f32");
        assert_eq!(ty("?[n].[n]i32"), "?[n].[n]i32");
        assert_eq!(ty("{x: f32, y: f32}"), "{x: f32, y: f32}");
    }

    #[test]
    fn malformed_dimension() {
        let error = parse_type("[1.5]i32").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::MalformedDimension { .. }));
        assert_eq!(error.span, Span::new(1, 4));
    }

    #[test]
    fn empty_sum_type() {
        let error = program_err("type t = |");
        assert_eq!(error.kind, SyntaxErrorKind::EmptySumType);
    }

    #[test]
    fn patterns() {
        assert_eq!(pat("(x, _, -1)"), "(x, _, -1)");
        assert_eq!(pat("{a, b = (c, d), e: i32}"), "{a, b = (c, d), e: i32}");
        assert_eq!(pat("#some (x: i32)"), "(#some (x : i32))");
        assert_eq!(pat("x: []f32"), "(x : []f32)");
    }

    // ------------------------------------------------------------------------
    // Programs
    // ------------------------------------------------------------------------

    #[test]
    fn trailing_tokens_are_rejected() {
        let error = expr_err("f x )");
        let (expected, found) = expected(&error);
        assert!(expected.contains("end of input"));
        assert_eq!(found, "`)`");
    }

    #[test]
    fn doc_comments_attach_to_declarations() {
        let program = parse_program("-- | Doubles.\n-- Twice.\ndef double x = x * 2").unwrap();
        assert_eq!(program.declarations[0].doc(), Some("Doubles.\nTwice."));
    }

    #[test]
    fn detached_doc_comment_warns() {
        let mut diagnostics = Vec::new();
        let program = parse_program_with(
            "-- | Lost.\n\ndef x = 1",
            &ParseOptions::default(),
            None,
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(program.declarations[0].doc(), None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn errors_are_reported_to_the_sink() {
        let mut diagnostics = Vec::new();
        let result = parse_program_with(
            "def x = (",
            &ParseOptions::default(),
            None,
            &mut diagnostics,
        );
        assert!(result.is_err());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let source = format!("def x = {}1{}", "(".repeat(100), ")".repeat(100));
        let options = ParseOptions::default().with_max_nesting_depth(32);
        let error = parse_program_with(&source, &options, None, &mut Vec::new()).unwrap_err();
        assert_eq!(error.kind, SyntaxErrorKind::NestingTooDeep { limit: 32 });
    }

    #[test]
    fn deep_nesting_within_the_default_limit_parses() {
        let source = format!("def x = {}1{}", "(".repeat(200), ")".repeat(200));
        assert!(parse_program(&source).is_ok());
    }

    #[test]
    fn imports_are_resolved_through_the_resolver() {
        let mut seen = Vec::new();
        let mut resolver = |path: &str, _span: Span| {
            seen.push(path.to_string());
            parse_program("def one = 1").map_err(|e| ImportError::new(e.to_string()))
        };
        let program = parse_program_with(
            "import \"lib/util\"\nopen import \"other\"",
            &ParseOptions::default(),
            Some(&mut resolver),
            &mut Vec::new(),
        )
        .unwrap();
        assert_eq!(seen, ["lib/util", "other"]);
        let Declaration::Import { resolved, .. } = &program.declarations[0] else {
            panic!("expected an import");
        };
        assert_eq!(resolved.as_ref().map(|p| p.declarations.len()), Some(1));
    }

    #[test]
    fn import_failure_becomes_a_syntax_error() {
        let mut resolver =
            |_: &str, _: Span| -> Result<Program, ImportError> { Err(ImportError::new("missing")) };
        let error = parse_program_with(
            "import \"nowhere\"",
            &ParseOptions::default(),
            Some(&mut resolver),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(
            error.kind,
            SyntaxErrorKind::ImportFailed {
                path: "nowhere".into(),
                reason: "missing".into()
            }
        );
        assert_eq!(error.span, Span::new(7, 16));
    }
}
