// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Futhark lexical analysis.
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the type of token
//! - A [`Span`] indicating its location in source
//! - Leading [`Trivia`] (whitespace and comments) so doc comments can be
//!   attached to the declaration that follows them
//!
//! Qualified names are *not* fused by the lexer: `M.x` is the three tokens
//! `Identifier`, `Punct::Dot`, `Identifier`, and the parser decides from
//! adjacency whether the dot qualifies a name.

use std::fmt;

use ecow::EcoString;

use super::{LexErrorKind, Span};

/// The base of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Binary,
    Decimal,
    Hexadecimal,
}

impl Radix {
    /// The source prefix for this radix (`""`, `"0b"` or `"0x"`).
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Binary => "0b",
            Self::Decimal => "",
            Self::Hexadecimal => "0x",
        }
    }

    /// The numeric base.
    #[must_use]
    pub const fn base(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }
}

/// Type suffix of an integer literal: `42i64`, `0xffu8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntSuffix {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntSuffix {
    /// Looks up a suffix by its spelling.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
        }
    }
}

/// Type suffix of a floating-point literal: `1.5f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatSuffix {
    F16,
    F32,
    F64,
}

impl FloatSuffix {
    /// Looks up a suffix by its spelling.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "f16" => Self::F16,
            "f32" => Self::F32,
            "f64" => Self::F64,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// An integer literal.
///
/// `digits` holds the digits in the literal's own radix, without the radix
/// prefix and without `_` separators, so `0xff_ffu8` has digits `ffff`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntLiteral {
    pub digits: EcoString,
    pub radix: Radix,
    pub suffix: Option<IntSuffix>,
}

impl IntLiteral {
    /// A suffix-free decimal literal.
    #[must_use]
    pub fn decimal(digits: impl Into<EcoString>) -> Self {
        Self {
            digits: digits.into(),
            radix: Radix::Decimal,
            suffix: None,
        }
    }

    /// Whether this is decimal with no width suffix, as in `[3]` or `p.1`.
    #[must_use]
    pub fn is_plain_decimal(&self) -> bool {
        self.radix == Radix::Decimal && self.suffix.is_none()
    }

    /// The literal's value, or `None` if it does not fit in a `u64`.
    #[must_use]
    pub fn value(&self) -> Option<u64> {
        u64::from_str_radix(&self.digits, self.radix.base()).ok()
    }
}

impl fmt::Display for IntLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.radix.prefix(), self.digits)?;
        if let Some(suffix) = self.suffix {
            f.write_str(suffix.as_str())?;
        }
        Ok(())
    }
}

/// A floating-point literal.
///
/// Decimal floats use an `e` exponent, hexadecimal floats a `p` exponent.
/// The exponent keeps its sign (`-3`); all parts are stored without `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FloatLiteral {
    pub radix: Radix,
    pub whole: EcoString,
    pub fraction: Option<EcoString>,
    pub exponent: Option<EcoString>,
    pub suffix: Option<FloatSuffix>,
}

impl fmt::Display for FloatLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.radix.prefix(), self.whole)?;
        if let Some(fraction) = &self.fraction {
            write!(f, ".{fraction}")?;
        }
        if let Some(exponent) = &self.exponent {
            let marker = if self.radix == Radix::Hexadecimal {
                'p'
            } else {
                'e'
            };
            write!(f, "{marker}{exponent}")?;
        }
        if let Some(suffix) = self.suffix {
            f.write_str(suffix.as_str())?;
        }
        Ok(())
    }
}

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Def,
    Entry,
    Let,
    Type,
    Module,
    Val,
    Include,
    Open,
    Import,
    Local,
    If,
    Then,
    Else,
    Match,
    Case,
    Loop,
    For,
    While,
    Do,
    In,
    With,
    Unsafe,
    Assert,
    True,
    False,
}

impl Keyword {
    /// Looks up a reserved word.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "def" => Self::Def,
            "entry" => Self::Entry,
            "let" => Self::Let,
            "type" => Self::Type,
            "module" => Self::Module,
            "val" => Self::Val,
            "include" => Self::Include,
            "open" => Self::Open,
            "import" => Self::Import,
            "local" => Self::Local,
            "if" => Self::If,
            "then" => Self::Then,
            "else" => Self::Else,
            "match" => Self::Match,
            "case" => Self::Case,
            "loop" => Self::Loop,
            "for" => Self::For,
            "while" => Self::While,
            "do" => Self::Do,
            "in" => Self::In,
            "with" => Self::With,
            "unsafe" => Self::Unsafe,
            "assert" => Self::Assert,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Def => "def",
            Self::Entry => "entry",
            Self::Let => "let",
            Self::Type => "type",
            Self::Module => "module",
            Self::Val => "val",
            Self::Include => "include",
            Self::Open => "open",
            Self::Import => "import",
            Self::Local => "local",
            Self::If => "if",
            Self::Then => "then",
            Self::Else => "else",
            Self::Match => "match",
            Self::Case => "case",
            Self::Loop => "loop",
            Self::For => "for",
            Self::While => "while",
            Self::Do => "do",
            Self::In => "in",
            Self::With => "with",
            Self::Unsafe => "unsafe",
            Self::Assert => "assert",
            Self::True => "true",
            Self::False => "false",
        }
    }
}

/// Words that lex as operators rather than identifiers.
pub const OPERATOR_WORDS: &[&str] = &["mod", "land", "lor", "lxor", "lsl", "lsr", "asr", "or"];

/// Punctuation with fixed spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,
    /// `:>`
    ColonGreater,
    Equal,
    Pipe,
    /// `->`
    Arrow,
    Backslash,
    Question,
    Tilde,
    Underscore,
    Dot,
    /// `..`
    DotDot,
    /// `...`
    DotDotDot,
    /// `..<`
    DotDotLess,
    /// `..>`
    DotDotGreater,
    /// `'` introducing a type parameter
    Apostrophe,
    /// `'^`
    ApostropheHat,
    /// `'~`
    ApostropheTilde,
    /// `#[`
    AttributeOpen,
}

impl Punct {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::ColonGreater => ":>",
            Self::Equal => "=",
            Self::Pipe => "|",
            Self::Arrow => "->",
            Self::Backslash => "\\",
            Self::Question => "?",
            Self::Tilde => "~",
            Self::Underscore => "_",
            Self::Dot => ".",
            Self::DotDot => "..",
            Self::DotDotDot => "...",
            Self::DotDotLess => "..<",
            Self::DotDotGreater => "..>",
            Self::Apostrophe => "'",
            Self::ApostropheHat => "'^",
            Self::ApostropheTilde => "'~",
            Self::AttributeOpen => "#[",
        }
    }

    /// Returns `true` for the bracket that closes a delimited group.
    #[must_use]
    pub const fn is_closing(self) -> bool {
        matches!(self, Self::RightParen | Self::RightBracket | Self::RightBrace)
    }
}

/// The kind of token, not including source location or trivia.
///
/// Tokens are cheap to clone: all text is held in [`EcoString`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A plain name segment: `map`, `xs'`, `_tmp`
    Identifier(EcoString),

    /// A sum type constructor, without the `#`: `#some` holds `some`
    Constructor(EcoString),

    /// A symbolic operator (`+`, `<=<`, `|>`) or an operator word (`mod`)
    Operator(EcoString),

    Integer(IntLiteral),

    Float(FloatLiteral),

    /// A string literal. `raw` is the text between the quotes as written,
    /// `value` the decoded contents.
    String { raw: EcoString, value: EcoString },

    /// A character literal, decoded: `'a'`, `'\n'`
    Character(char),

    Keyword(Keyword),

    Punct(Punct),

    /// End of file
    Eof,

    /// A scan error covering the offending text
    Error(LexErrorKind),
}

impl TokenKind {
    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Integer(_)
                | Self::Float(_)
                | Self::String { .. }
                | Self::Character(_)
                | Self::Keyword(Keyword::True | Keyword::False)
        )
    }

    /// Returns `true` if this token is an identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Returns `true` if this token is the given punctuation.
    #[must_use]
    pub fn is_punct(&self, punct: Punct) -> bool {
        matches!(self, Self::Punct(p) if *p == punct)
    }

    /// Returns `true` if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(k) if *k == keyword)
    }

    /// Returns `true` if this token is an operator spelled exactly `text`.
    #[must_use]
    pub fn is_operator(&self, text: &str) -> bool {
        matches!(self, Self::Operator(op) if op == text)
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is an error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(s) | Self::Operator(s) => write!(f, "`{s}`"),
            Self::Constructor(s) => write!(f, "`#{s}`"),
            Self::Integer(literal) => write!(f, "`{literal}`"),
            Self::Float(literal) => write!(f, "`{literal}`"),
            Self::String { raw, .. } => write!(f, "`\"{raw}\"`"),
            Self::Character(c) => write!(f, "`'{}'`", c.escape_default()),
            Self::Keyword(keyword) => write!(f, "`{}`", keyword.as_str()),
            Self::Punct(punct) => write!(f, "`{}`", punct.as_str()),
            Self::Eof => f.write_str("end of input"),
            Self::Error(kind) => write!(f, "<error: {kind}>"),
        }
    }
}

/// Non-semantic source text that precedes a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Whitespace (spaces, tabs, newlines)
    Whitespace(EcoString),

    /// A line comment: `-- comment text`
    LineComment(EcoString),

    /// A doc comment: `-- | doc text`
    DocComment(EcoString),
}

impl Trivia {
    /// Returns the text content of this trivia.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s) | Self::LineComment(s) | Self::DocComment(s) => s,
        }
    }

    /// Returns `true` if this trivia is whitespace spanning a blank line.
    #[must_use]
    pub fn contains_blank_line(&self) -> bool {
        matches!(self, Self::Whitespace(s) if s.matches('\n').count() > 1)
    }

    /// Returns `true` if this is a comment.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment(_) | Self::DocComment(_))
    }
}

/// A token with its source location and leading trivia.
///
/// # Examples
///
/// ```
/// use futhark_syntax::source_analysis::{Span, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Identifier("xs".into()), Span::new(0, 2));
/// assert!(token.kind().is_identifier());
/// assert_eq!(token.span().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
    leading_trivia: Vec<Trivia>,
}

impl Token {
    /// Creates a new token with no trivia.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            leading_trivia: Vec::new(),
        }
    }

    /// Creates a new token with leading trivia.
    #[must_use]
    pub fn with_trivia(kind: TokenKind, span: Span, leading_trivia: Vec<Trivia>) -> Self {
        Self {
            kind,
            span,
            leading_trivia,
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Consumes the token and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the source span of this token (excluding trivia).
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the trivia that precedes this token.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    /// Returns `true` if this token has any leading comments.
    #[must_use]
    pub fn has_leading_comment(&self) -> bool {
        self.leading_trivia.iter().any(Trivia::is_comment)
    }
}
