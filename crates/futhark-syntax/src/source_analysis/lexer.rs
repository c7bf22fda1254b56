// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Futhark source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written: Futhark's lexical grammar depends on adjacency (`t.0`
//! is a projection, `t .0` is not), which is awkward to express with a
//! generated scanner.
//!
//! # Design Principles
//!
//! - **Never panic**: malformed input becomes a [`TokenKind::Error`] token
//!   covering the offending text, and scanning resumes after it
//! - **Trivia preservation**: whitespace and comments are attached to the
//!   following token so doc comments reach their declaration
//! - **Precise spans**: every token carries its exact source location
//!
//! # Example
//!
//! ```
//! use futhark_syntax::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("x + 1").collect();
//! assert_eq!(tokens.len(), 3); // x, +, 1 (EOF excluded from iterator)
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::token::OPERATOR_WORDS;
use super::{
    FloatLiteral, FloatSuffix, IntLiteral, IntSuffix, Keyword, LexErrorKind, LiteralKind, Punct,
    Radix, Span, SyntaxError, Token, TokenKind, Trivia,
};

/// Result of scanning one backslash escape.
enum Escape {
    Char(char),
    Invalid(Span),
    Unterminated,
}

/// A lexer that tokenizes Futhark source code.
///
/// The lexer produces tokens with their source spans and leading trivia. It
/// implements [`Iterator`], yielding every token before end of input.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
    /// Pending trivia to attach to the next token.
    pending_trivia: Vec<Trivia>,
    /// Token produced by [`Lexer::peek`] and not yet consumed.
    peeked: Option<Token>,
    /// End of the previous token, when a `.` directly after it followed by a
    /// digit is a tuple projection.
    projection_anchor: Option<u32>,
    /// The next token is projection field digits.
    lexing_field: bool,
    /// Override span for the current token (used for escape errors).
    override_span: Option<Span>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            pending_trivia: Vec::new(),
            peeked: None,
            projection_anchor: None,
            lexing_field: false,
            override_span: None,
        }
    }

    /// Consumes and returns the next token.
    ///
    /// Once the input is exhausted every call returns an EOF token.
    pub fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.lex_token(),
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lex_token(),
        };
        self.peeked.insert(token)
    }

    /// Byte offset of the next unconsumed token (or of the scan cursor, if
    /// nothing has been peeked). Calling this never advances the lexer.
    #[must_use]
    pub fn position(&self) -> u32 {
        self.peeked
            .as_ref()
            .map_or_else(|| self.current_position(), |token| token.span().start())
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is same as `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Skips whitespace and comments, collecting them as trivia.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    let start = self.current_position();
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                    let text = self.text_for(self.span_from(start));
                    self.pending_trivia
                        .push(Trivia::Whitespace(EcoString::from(text)));
                }
                Some('-') if self.peek_char_n(1) == Some('-') => self.lex_comment(),
                _ => break,
            }
        }
    }

    /// Lexes a comment to end of line. `-- |` starts a doc comment.
    fn lex_comment(&mut self) {
        let start = self.current_position();
        let is_doc = self.peek_char_n(2) == Some(' ') && self.peek_char_n(3) == Some('|');
        self.advance_while(|c| c != '\n');
        let text = EcoString::from(self.text_for(self.span_from(start)));
        self.pending_trivia.push(if is_doc {
            Trivia::DocComment(text)
        } else {
            Trivia::LineComment(text)
        });
    }

    /// Lexes the next token.
    fn lex_token(&mut self) -> Token {
        self.skip_trivia();
        let leading_trivia = std::mem::take(&mut self.pending_trivia);

        let start = self.current_position();
        let lexing_field = std::mem::take(&mut self.lexing_field);

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) if lexing_field && c.is_ascii_digit() => {
                self.advance_while(|c| c.is_ascii_digit());
                let digits = self.text_for(self.span_from(start));
                TokenKind::Integer(IntLiteral::decimal(digits))
            }
            Some(c) => self.lex_token_kind(c, start),
        };

        let span = self
            .override_span
            .take()
            .unwrap_or_else(|| self.span_from(start));

        let anchors_projection = match &kind {
            TokenKind::Identifier(_) => true,
            TokenKind::Punct(punct) => punct.is_closing(),
            TokenKind::Integer(_) => lexing_field,
            _ => false,
        };
        self.projection_anchor = anchors_projection.then_some(self.current_position());

        Token::with_trivia(kind, span, leading_trivia)
    }

    /// Lexes a single token kind starting with character `c`.
    fn lex_token_kind(&mut self, c: char, start: u32) -> TokenKind {
        match c {
            '(' => self.single(Punct::LeftParen),
            ')' => self.single(Punct::RightParen),
            '[' => self.single(Punct::LeftBracket),
            ']' => self.single(Punct::RightBracket),
            '{' => self.single(Punct::LeftBrace),
            '}' => self.single(Punct::RightBrace),
            ',' => self.single(Punct::Comma),
            '\\' => self.single(Punct::Backslash),
            '?' => self.single(Punct::Question),
            '~' => self.single(Punct::Tilde),
            ':' => self.lex_colon(),
            '.' => self.lex_dot(start),
            '"' => self.lex_string(),
            '\'' => self.lex_apostrophe(),
            '#' => self.lex_hash(),
            '0'..='9' => self.lex_number(start),
            '_' if !self.peek_char_n(1).is_some_and(|c| c.is_ascii_alphabetic()) => {
                self.single(Punct::Underscore)
            }
            c if c == '_' || c.is_ascii_alphabetic() => self.lex_identifier_or_keyword(start),
            c if is_operator_char(c) => self.lex_operator(start),
            c => {
                self.advance();
                TokenKind::Error(LexErrorKind::UnexpectedCharacter(c))
            }
        }
    }

    fn single(&mut self, punct: Punct) -> TokenKind {
        self.advance();
        TokenKind::Punct(punct)
    }

    /// Lexes `:`, `:>` or `:=`.
    fn lex_colon(&mut self) -> TokenKind {
        self.advance();
        match self.peek_char() {
            Some('>') => self.single(Punct::ColonGreater),
            Some('=') => {
                self.advance();
                TokenKind::Operator(":=".into())
            }
            _ => TokenKind::Punct(Punct::Colon),
        }
    }

    /// Lexes `.`, the range punctuation `..`, `...`, `..<`, `..>`, or the dot
    /// of a numeric projection.
    fn lex_dot(&mut self, start: u32) -> TokenKind {
        self.advance();
        if self.peek_char() == Some('.') {
            self.advance();
            return match self.peek_char() {
                Some('.') => self.single(Punct::DotDotDot),
                Some('<') => self.single(Punct::DotDotLess),
                Some('>') => self.single(Punct::DotDotGreater),
                _ => TokenKind::Punct(Punct::DotDot),
            };
        }
        if self.projection_anchor == Some(start)
            && self.peek_char().is_some_and(|c| c.is_ascii_digit())
        {
            self.lexing_field = true;
        }
        TokenKind::Punct(Punct::Dot)
    }

    /// Lexes an identifier, keyword or operator word.
    fn lex_identifier_or_keyword(&mut self, start: u32) -> TokenKind {
        self.advance_while(is_identifier_char);
        let text = self.text_for(self.span_from(start));
        if let Some(keyword) = Keyword::from_word(text) {
            TokenKind::Keyword(keyword)
        } else if OPERATOR_WORDS.contains(&text) {
            TokenKind::Operator(text.into())
        } else {
            TokenKind::Identifier(text.into())
        }
    }

    /// Lexes a symbolic operator with longest match. A `--` never continues
    /// an operator since it starts a comment.
    fn lex_operator(&mut self, start: u32) -> TokenKind {
        self.advance();
        while self
            .peek_char()
            .is_some_and(|c| is_operator_char(c) || c == '.')
        {
            if self.peek_char() == Some('-') && self.peek_char_n(1) == Some('-') {
                break;
            }
            self.advance();
        }
        match self.text_for(self.span_from(start)) {
            "=" => TokenKind::Punct(Punct::Equal),
            "|" => TokenKind::Punct(Punct::Pipe),
            "->" => TokenKind::Punct(Punct::Arrow),
            text => TokenKind::Operator(text.into()),
        }
    }

    /// Lexes `#name` constructors and the `#[` attribute opener.
    fn lex_hash(&mut self) -> TokenKind {
        self.advance();
        match self.peek_char() {
            Some('[') => self.single(Punct::AttributeOpen),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let start = self.current_position();
                self.advance_while(is_identifier_char);
                TokenKind::Constructor(self.text_for(self.span_from(start)).into())
            }
            _ => TokenKind::Error(LexErrorKind::UnexpectedCharacter('#')),
        }
    }

    /// Lexes a numeric literal: decimal, `0x` hexadecimal or `0b` binary,
    /// with optional fraction, exponent and type suffix.
    fn lex_number(&mut self, start: u32) -> TokenKind {
        let radix = match (self.peek_char_n(1), self.peek_char_n(2)) {
            _ if self.peek_char() != Some('0') => Radix::Decimal,
            (Some('x' | 'X'), Some(c)) if c.is_ascii_hexdigit() => Radix::Hexadecimal,
            (Some('b' | 'B'), Some('0' | '1')) => Radix::Binary,
            _ => Radix::Decimal,
        };
        let is_digit: fn(char) -> bool = match radix {
            Radix::Binary => |c| matches!(c, '0' | '1' | '_'),
            Radix::Decimal => |c| c.is_ascii_digit() || c == '_',
            Radix::Hexadecimal => |c| c.is_ascii_hexdigit() || c == '_',
        };
        if radix != Radix::Decimal {
            self.advance(); // 0
            self.advance(); // x or b
        }

        let whole_start = self.current_position();
        self.advance_while(is_digit);
        let whole = strip_separators(self.text_for(self.span_from(whole_start)));

        let mut fraction = None;
        let fraction_digit = self.peek_char_n(1).is_some_and(|c| is_digit(c) && c != '_');
        if radix != Radix::Binary && self.peek_char() == Some('.') && fraction_digit {
            self.advance(); // .
            let fraction_start = self.current_position();
            self.advance_while(is_digit);
            fraction = Some(strip_separators(
                self.text_for(self.span_from(fraction_start)),
            ));
        }

        let mut exponent = None;
        let marker = match radix {
            Radix::Decimal => Some(['e', 'E']),
            Radix::Hexadecimal => Some(['p', 'P']),
            Radix::Binary => None,
        };
        if let Some(markers) = marker {
            let has_exponent = self.peek_char().is_some_and(|c| markers.contains(&c))
                && match self.peek_char_n(1) {
                    Some('+' | '-') => self.peek_char_n(2).is_some_and(|c| c.is_ascii_digit()),
                    Some(c) => c.is_ascii_digit(),
                    None => false,
                };
            if has_exponent {
                self.advance(); // e or p
                let exponent_start = self.current_position();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit() || c == '_');
                exponent = Some(strip_separators(
                    self.text_for(self.span_from(exponent_start)),
                ));
            }
        }

        let suffix_start = self.current_position();
        self.advance_while(is_identifier_char);
        let suffix = self.text_for(self.span_from(suffix_start));
        let invalid = || {
            TokenKind::Error(LexErrorKind::InvalidNumericSuffix(
                self.text_for(self.span_from(start)).into(),
            ))
        };

        let is_float = fraction.is_some() || exponent.is_some();
        let float = |suffix| {
            TokenKind::Float(FloatLiteral {
                radix,
                whole: whole.clone(),
                fraction: fraction.clone(),
                exponent: exponent.clone(),
                suffix,
            })
        };
        if suffix.is_empty() {
            return if is_float {
                float(None)
            } else {
                TokenKind::Integer(IntLiteral {
                    digits: whole.clone(),
                    radix,
                    suffix: None,
                })
            };
        }
        if let Some(float_suffix) = FloatSuffix::from_text(suffix) {
            return if radix == Radix::Binary {
                invalid()
            } else {
                float(Some(float_suffix))
            };
        }
        match IntSuffix::from_text(suffix) {
            Some(int_suffix) if !is_float => TokenKind::Integer(IntLiteral {
                digits: whole.clone(),
                radix,
                suffix: Some(int_suffix),
            }),
            _ => invalid(),
        }
    }

    /// Lexes a double-quoted string literal.
    ///
    /// An invalid escape does not end the literal: scanning continues to the
    /// closing quote and the error token spans just the escape.
    fn lex_string(&mut self) -> TokenKind {
        self.advance(); // opening "
        let content_start = self.current_position();
        let mut value = EcoString::new();
        let mut invalid_escape = None;

        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return TokenKind::Error(LexErrorKind::UnterminatedLiteral(
                        LiteralKind::String,
                    ));
                }
                Some('"') => break,
                Some('\\') => match self.lex_escape() {
                    Escape::Char(c) => value.push(c),
                    Escape::Invalid(span) => {
                        invalid_escape.get_or_insert(span);
                    }
                    Escape::Unterminated => {
                        return TokenKind::Error(LexErrorKind::UnterminatedLiteral(
                            LiteralKind::String,
                        ));
                    }
                },
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        let raw = EcoString::from(self.text_for(self.span_from(content_start)));
        self.advance(); // closing "

        if let Some(span) = invalid_escape {
            self.override_span = Some(span);
            return TokenKind::Error(LexErrorKind::InvalidEscape(self.text_for(span).into()));
        }
        TokenKind::String { raw, value }
    }

    /// Lexes one backslash escape, positioned at the backslash.
    fn lex_escape(&mut self) -> Escape {
        let start = self.current_position();
        self.advance(); // \
        let (radix, digits_start) = match self.peek_char() {
            None | Some('\n') => return Escape::Unterminated,
            Some('0'..='9') => (10, self.current_position()),
            Some('x') => {
                self.advance();
                (16, self.current_position())
            }
            Some('o') => {
                self.advance();
                (8, self.current_position())
            }
            Some(c) => {
                self.advance();
                return Escape::Char(named_escape(c));
            }
        };
        self.advance_while(|c| c.is_digit(radix));
        let digits = self.text_for(self.span_from(digits_start));
        u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| Escape::Invalid(self.span_from(start)), Escape::Char)
    }

    /// Lexes a character literal or one of the apostrophe punctuators that
    /// introduce type parameters (`'t`, `'^t`, `'~t`).
    fn lex_apostrophe(&mut self) -> TokenKind {
        match (self.peek_char_n(1), self.peek_char_n(2)) {
            (Some('\\'), _) => {
                self.advance(); // '
                match self.lex_escape() {
                    Escape::Char(c) if self.peek_char() == Some('\'') => {
                        self.advance();
                        TokenKind::Character(c)
                    }
                    Escape::Invalid(span) => {
                        if self.peek_char() == Some('\'') {
                            self.advance();
                        }
                        self.override_span = Some(span);
                        TokenKind::Error(LexErrorKind::InvalidEscape(self.text_for(span).into()))
                    }
                    _ => TokenKind::Error(LexErrorKind::UnterminatedLiteral(
                        LiteralKind::Character,
                    )),
                }
            }
            (Some(c), Some('\'')) if c != '\n' && c != '\'' => {
                self.advance();
                self.advance();
                self.advance();
                TokenKind::Character(c)
            }
            (Some('^'), _) => {
                self.advance();
                self.single(Punct::ApostropheHat)
            }
            (Some('~'), _) => {
                self.advance();
                self.single(Punct::ApostropheTilde)
            }
            (Some(c), _) if c.is_ascii_alphabetic() || c == '_' => self.single(Punct::Apostrophe),
            _ => {
                self.advance();
                if self.peek_char().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                TokenKind::Error(LexErrorKind::UnterminatedLiteral(LiteralKind::Character))
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Returns `true` for characters that may start or continue a symbolic operator.
fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '!' | '%' | '&' | '*' | '+' | '-' | '/' | '<' | '=' | '>' | '^' | '|' | '@' | '$'
    )
}

/// Returns `true` for characters that continue an identifier.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

/// Decodes a single-character escape; unknown escapes stand for themselves.
fn named_escape(c: char) -> char {
    match c {
        'a' => '\u{7}',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        other => other,
    }
}

fn strip_separators(digits: &str) -> EcoString {
    digits.chars().filter(|&c| c != '_').collect()
}

/// Lexes source text into a vector of tokens, excluding EOF.
///
/// Error tokens are included; scanning resumes after each one.
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lexes source text into a vector of tokens, including the final EOF token.
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    tokens
}

/// Lexes source text, stopping at the first scan error.
///
/// On success the returned tokens end with EOF.
///
/// # Errors
///
/// Returns the first error token as a [`SyntaxError`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        match token.kind() {
            TokenKind::Error(kind) => {
                tracing::debug!(error = %kind, offset = token.span().start(), "lexing failed");
                return Err(SyntaxError::new(kind.clone(), token.span()));
            }
            TokenKind::Eof => {
                tokens.push(token);
                tracing::trace!(tokens = tokens.len(), "lexed source");
                return Ok(tokens);
            }
            _ => tokens.push(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::SyntaxErrorKind;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(Token::into_kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.into())
    }

    fn op(text: &str) -> TokenKind {
        TokenKind::Operator(text.into())
    }

    fn punct(punct: Punct) -> TokenKind {
        TokenKind::Punct(punct)
    }

    fn int(digits: &str) -> TokenKind {
        TokenKind::Integer(IntLiteral::decimal(digits))
    }

    #[test]
    fn lex_empty() {
        assert!(lex("").is_empty());
        let tokens = lex_with_eof("  -- only a comment");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].kind().is_eof());
        assert_eq!(tokens[0].span(), Span::point(19));
    }

    #[test]
    fn lex_identifiers_and_keywords() {
        assert_eq!(
            lex_kinds("xs x' _tmp def loopy in"),
            vec![
                ident("xs"),
                ident("x'"),
                ident("_tmp"),
                TokenKind::Keyword(Keyword::Def),
                ident("loopy"),
                TokenKind::Keyword(Keyword::In),
            ]
        );
    }

    #[test]
    fn lex_lone_underscore() {
        assert_eq!(
            lex_kinds("_ _1"),
            vec![punct(Punct::Underscore), punct(Punct::Underscore), int("1")]
        );
    }

    #[test]
    fn lex_operator_words() {
        assert_eq!(
            lex_kinds("a mod b lsl c or d"),
            vec![
                ident("a"),
                op("mod"),
                ident("b"),
                op("lsl"),
                ident("c"),
                op("or"),
                ident("d"),
            ]
        );
    }

    #[test]
    fn lex_qualified_name_is_not_fused() {
        assert_eq!(
            lex_kinds("f32.sqrt"),
            vec![ident("f32"), punct(Punct::Dot), ident("sqrt")]
        );
    }

    #[test]
    fn lex_range_punctuation() {
        assert_eq!(lex_kinds("1..5"), vec![int("1"), punct(Punct::DotDot), int("5")]);
        assert_eq!(
            lex_kinds("a..<b ..> c"),
            vec![
                ident("a"),
                punct(Punct::DotDotLess),
                ident("b"),
                punct(Punct::DotDotGreater),
                ident("c"),
            ]
        );
        assert_eq!(
            lex_kinds("0..2...10"),
            vec![
                int("0"),
                punct(Punct::DotDot),
                int("2"),
                punct(Punct::DotDotDot),
                int("10"),
            ]
        );
    }

    #[test]
    fn lex_numeric_projection() {
        assert_eq!(
            lex_kinds("t.0.1"),
            vec![
                ident("t"),
                punct(Punct::Dot),
                int("0"),
                punct(Punct::Dot),
                int("1"),
            ]
        );
        assert_eq!(
            lex_kinds("(a).12"),
            vec![
                punct(Punct::LeftParen),
                ident("a"),
                punct(Punct::RightParen),
                punct(Punct::Dot),
                int("12"),
            ]
        );
    }

    #[test]
    fn lex_float_after_space_is_not_projection() {
        assert_eq!(
            lex_kinds("f 1.5"),
            vec![
                ident("f"),
                TokenKind::Float(FloatLiteral {
                    radix: Radix::Decimal,
                    whole: "1".into(),
                    fraction: Some("5".into()),
                    exponent: None,
                    suffix: None,
                }),
            ]
        );
    }

    #[test]
    fn lex_integers() {
        assert_eq!(
            lex_kinds("1_000 0xFF_u8 0b1010 7i64"),
            vec![
                int("1000"),
                TokenKind::Integer(IntLiteral {
                    digits: "FF".into(),
                    radix: Radix::Hexadecimal,
                    suffix: Some(IntSuffix::U8),
                }),
                TokenKind::Integer(IntLiteral {
                    digits: "1010".into(),
                    radix: Radix::Binary,
                    suffix: None,
                }),
                TokenKind::Integer(IntLiteral {
                    digits: "7".into(),
                    radix: Radix::Decimal,
                    suffix: Some(IntSuffix::I64),
                }),
            ]
        );
    }

    #[test]
    fn lex_floats() {
        assert_eq!(
            lex_kinds("3.0e-2f32 1e10 2f64 0x1.8p3"),
            vec![
                TokenKind::Float(FloatLiteral {
                    radix: Radix::Decimal,
                    whole: "3".into(),
                    fraction: Some("0".into()),
                    exponent: Some("-2".into()),
                    suffix: Some(FloatSuffix::F32),
                }),
                TokenKind::Float(FloatLiteral {
                    radix: Radix::Decimal,
                    whole: "1".into(),
                    fraction: None,
                    exponent: Some("10".into()),
                    suffix: None,
                }),
                TokenKind::Float(FloatLiteral {
                    radix: Radix::Decimal,
                    whole: "2".into(),
                    fraction: None,
                    exponent: None,
                    suffix: Some(FloatSuffix::F64),
                }),
                TokenKind::Float(FloatLiteral {
                    radix: Radix::Hexadecimal,
                    whole: "1".into(),
                    fraction: Some("8".into()),
                    exponent: Some("3".into()),
                    suffix: None,
                }),
            ]
        );
    }

    #[test]
    fn lex_invalid_numeric_suffixes() {
        for source in ["1i7", "1.5i32", "12abc", "0b1f32"] {
            assert_eq!(
                lex_kinds(source),
                vec![TokenKind::Error(LexErrorKind::InvalidNumericSuffix(
                    source.into()
                ))],
                "{source}"
            );
        }
    }

    #[test]
    fn lex_strings_and_escapes() {
        assert_eq!(
            lex_kinds(r#""a\nb" "\65\x42\o103" "\q\"""#),
            vec![
                TokenKind::String {
                    raw: "a\\nb".into(),
                    value: "a\nb".into(),
                },
                TokenKind::String {
                    raw: "\\65\\x42\\o103".into(),
                    value: "ABC".into(),
                },
                TokenKind::String {
                    raw: "\\q\\\"".into(),
                    value: "q\"".into(),
                },
            ]
        );
    }

    #[test]
    fn lex_invalid_escape_spans_the_escape() {
        let tokens = lex_with_eof(r#""ab\x" next"#);
        assert_eq!(
            tokens[0].kind(),
            &TokenKind::Error(LexErrorKind::InvalidEscape("\\x".into()))
        );
        assert_eq!(tokens[0].span(), Span::new(3, 5));
        // Scanning resumes after the literal.
        assert_eq!(tokens[1].kind(), &ident("next"));
    }

    #[test]
    fn lex_escape_out_of_unicode_range() {
        assert_eq!(
            lex_kinds(r#""\x110000""#),
            vec![TokenKind::Error(LexErrorKind::InvalidEscape(
                "\\x110000".into()
            ))]
        );
    }

    #[test]
    fn lex_unterminated_string() {
        let tokens = lex("x \"abc\ny");
        assert_eq!(
            tokens[1].kind(),
            &TokenKind::Error(LexErrorKind::UnterminatedLiteral(LiteralKind::String))
        );
        assert_eq!(tokens[1].span(), Span::new(2, 6));
        assert_eq!(tokens[2].kind(), &ident("y"));
    }

    #[test]
    fn lex_characters() {
        assert_eq!(
            lex_kinds(r"'a' '\n' '\x41' 'é'"),
            vec![
                TokenKind::Character('a'),
                TokenKind::Character('\n'),
                TokenKind::Character('A'),
                TokenKind::Character('é'),
            ]
        );
    }

    #[test]
    fn lex_type_parameter_apostrophes() {
        assert_eq!(
            lex_kinds("'t '^f '~n"),
            vec![
                punct(Punct::Apostrophe),
                ident("t"),
                punct(Punct::ApostropheHat),
                ident("f"),
                punct(Punct::ApostropheTilde),
                ident("n"),
            ]
        );
    }

    #[test]
    fn lex_unterminated_character() {
        for source in ["'", "'$", "'\\n"] {
            assert_eq!(
                lex_kinds(source),
                vec![TokenKind::Error(LexErrorKind::UnterminatedLiteral(
                    LiteralKind::Character
                ))],
                "{source}"
            );
        }
    }

    #[test]
    fn lex_constructors_and_attributes() {
        assert_eq!(
            lex_kinds("#some #[inline]"),
            vec![
                TokenKind::Constructor("some".into()),
                punct(Punct::AttributeOpen),
                ident("inline"),
                punct(Punct::RightBracket),
            ]
        );
        assert_eq!(
            lex_kinds("# x"),
            vec![
                TokenKind::Error(LexErrorKind::UnexpectedCharacter('#')),
                ident("x"),
            ]
        );
    }

    #[test]
    fn lex_punctuation() {
        assert_eq!(
            lex_kinds("( ) [ ] { } , : :> := = | -> \\ ? ~"),
            vec![
                punct(Punct::LeftParen),
                punct(Punct::RightParen),
                punct(Punct::LeftBracket),
                punct(Punct::RightBracket),
                punct(Punct::LeftBrace),
                punct(Punct::RightBrace),
                punct(Punct::Comma),
                punct(Punct::Colon),
                punct(Punct::ColonGreater),
                op(":="),
                punct(Punct::Equal),
                punct(Punct::Pipe),
                punct(Punct::Arrow),
                punct(Punct::Backslash),
                punct(Punct::Question),
                punct(Punct::Tilde),
            ]
        );
    }

    #[test]
    fn lex_operators_longest_match() {
        assert_eq!(
            lex_kinds("a+b x |> f <=< ** != ==> !x"),
            vec![
                ident("a"),
                op("+"),
                ident("b"),
                ident("x"),
                op("|>"),
                ident("f"),
                op("<=<"),
                op("**"),
                op("!="),
                op("==>"),
                op("!"),
                ident("x"),
            ]
        );
    }

    #[test]
    fn lex_double_dash_starts_comment() {
        let tokens = lex("a+--b\nc");
        assert_eq!(
            tokens.iter().map(Token::kind).cloned().collect::<Vec<_>>(),
            vec![ident("a"), op("+"), ident("c")]
        );
        assert_eq!(
            tokens[2].leading_trivia()[0],
            Trivia::LineComment("--b".into())
        );
    }

    #[test]
    fn lex_doc_comments() {
        let tokens = lex("-- | Sums an array.\n-- Linear time.\ndef");
        let trivia = tokens[0].leading_trivia();
        assert_eq!(trivia[0], Trivia::DocComment("-- | Sums an array.".into()));
        assert_eq!(trivia[2], Trivia::LineComment("-- Linear time.".into()));
        assert!(tokens[0].has_leading_comment());
    }

    #[test]
    fn lex_unexpected_characters() {
        let tokens = lex("a ; é");
        assert_eq!(
            tokens[1].kind(),
            &TokenKind::Error(LexErrorKind::UnexpectedCharacter(';'))
        );
        assert_eq!(
            tokens[2].kind(),
            &TokenKind::Error(LexErrorKind::UnexpectedCharacter('é'))
        );
        assert_eq!(tokens[2].span().len(), 2);
    }

    #[test]
    fn lex_spans() {
        let tokens = lex("let x = 10");
        let spans: Vec<_> = tokens.iter().map(Token::span).collect();
        assert_eq!(
            spans,
            vec![
                Span::new(0, 3),
                Span::new(4, 5),
                Span::new(6, 7),
                Span::new(8, 10),
            ]
        );
    }

    #[test]
    fn peek_and_position_are_idempotent() {
        let mut lexer = Lexer::new("a  b");
        assert_eq!(lexer.position(), 0);
        let peeked = lexer.peek().clone();
        assert_eq!(lexer.peek(), &peeked);
        assert_eq!(lexer.position(), 0);
        assert_eq!(lexer.position(), 0);
        assert_eq!(lexer.next_token(), peeked);

        assert_eq!(lexer.peek().kind(), &ident("b"));
        assert_eq!(lexer.position(), 3);
        assert_eq!(lexer.next_token().kind(), &ident("b"));
        assert!(lexer.next_token().kind().is_eof());
        assert!(lexer.next_token().kind().is_eof());
    }

    #[test]
    fn tokenize_stops_at_first_error() {
        let error = tokenize("x \"abc").unwrap_err();
        assert_eq!(
            error.kind,
            SyntaxErrorKind::UnterminatedLiteral(LiteralKind::String)
        );
        assert_eq!(error.span, Span::new(2, 6));

        let tokens = tokenize("x + 1").unwrap();
        assert_eq!(tokens.len(), 4);
        assert!(tokens[3].kind().is_eof());
    }
}
