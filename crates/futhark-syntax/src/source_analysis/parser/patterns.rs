// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Pattern parsing.

use crate::ast::{Identifier, Pattern, RecordPatternField};
use crate::source_analysis::{Punct, TokenKind};

use super::{ParseResult, Parser};

impl Parser<'_> {
    /// Parses a full pattern: a constructor pattern with an optional
    /// `: type` ascription.
    pub(super) fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        self.nested(Self::parse_ascribed_pattern)
    }

    fn parse_ascribed_pattern(&mut self) -> ParseResult<Pattern> {
        let pattern = self.parse_constructor_pattern()?;
        if self.eat_punct(Punct::Colon).is_none() {
            return Ok(pattern);
        }
        let ty = self.parse_type()?;
        Ok(Pattern::Ascription {
            span: pattern.span().merge(ty.span()),
            pattern: Box::new(pattern),
            ty,
        })
    }

    /// Parses a constructor with its atomic arguments, an attributed
    /// pattern, or an atom.
    pub(super) fn parse_constructor_pattern(&mut self) -> ParseResult<Pattern> {
        match self.current_kind() {
            TokenKind::Constructor(name) => {
                let tag = Identifier::new(name.clone(), self.current_span());
                self.advance();
                let mut span = tag.span;
                let mut arguments = Vec::new();
                while self.can_start_pattern_atom() {
                    let argument = self.parse_atomic_pattern()?;
                    span = span.merge(argument.span());
                    arguments.push(argument);
                }
                Ok(Pattern::Constructor {
                    tag,
                    arguments,
                    span,
                })
            }
            TokenKind::Punct(Punct::AttributeOpen) => {
                let attribute = self.parse_attribute()?;
                let pattern = self.nested(Self::parse_constructor_pattern)?;
                Ok(Pattern::Attributed {
                    span: attribute.span.merge(pattern.span()),
                    attribute,
                    pattern: Box::new(pattern),
                })
            }
            _ => self.parse_atomic_pattern(),
        }
    }

    /// Whether the current token can begin an atomic pattern.
    pub(super) fn can_start_pattern_atom(&self) -> bool {
        match self.current_kind() {
            TokenKind::Identifier(_) | TokenKind::Integer(_) | TokenKind::Constructor(_) => true,
            TokenKind::Operator(op) => op == "-" && matches!(self.kind_at(1), TokenKind::Integer(_)),
            TokenKind::Punct(punct) => matches!(
                punct,
                Punct::Underscore | Punct::LeftParen | Punct::LeftBrace | Punct::AttributeOpen
            ),
            _ => false,
        }
    }

    /// Whether the current token can begin a function or lambda parameter.
    ///
    /// Literal patterns are not parameters.
    pub(super) fn can_start_param(&self) -> bool {
        self.can_start_pattern_atom()
            && !matches!(
                self.current_kind(),
                TokenKind::Integer(_) | TokenKind::Operator(_)
            )
    }

    /// Parses a pattern atom.
    pub(super) fn parse_atomic_pattern(&mut self) -> ParseResult<Pattern> {
        let span = self.current_span();
        match self.current_kind() {
            TokenKind::Identifier(_) => Ok(Pattern::Identifier(self.expect_identifier()?)),
            TokenKind::Punct(Punct::Underscore) => {
                self.advance();
                Ok(Pattern::Wildcard(span))
            }
            TokenKind::Integer(value) => {
                let value = value.clone();
                self.advance();
                Ok(Pattern::Literal {
                    negative: false,
                    value,
                    span,
                })
            }
            TokenKind::Operator(op) if op == "-" => {
                self.advance();
                let TokenKind::Integer(value) = self.current_kind() else {
                    return Err(self.unexpected(&["an integer literal"]));
                };
                let value = value.clone();
                let end = self.advance().span();
                Ok(Pattern::Literal {
                    negative: true,
                    value,
                    span: span.merge(end),
                })
            }
            TokenKind::Constructor(name) => {
                let tag = Identifier::new(name.clone(), span);
                self.advance();
                Ok(Pattern::Constructor {
                    tag,
                    arguments: Vec::new(),
                    span,
                })
            }
            TokenKind::Punct(Punct::AttributeOpen) => {
                let attribute = self.parse_attribute()?;
                let pattern = self.nested(Self::parse_atomic_pattern)?;
                Ok(Pattern::Attributed {
                    span: attribute.span.merge(pattern.span()),
                    attribute,
                    pattern: Box::new(pattern),
                })
            }
            TokenKind::Punct(Punct::LeftParen) => self.parse_parenthesized_pattern(),
            TokenKind::Punct(Punct::LeftBrace) => self.parse_record_pattern(),
            _ => Err(self.unexpected(&["a pattern"])),
        }
    }

    /// Parses a sequence of parameter patterns, possibly empty.
    pub(super) fn parse_params(&mut self) -> ParseResult<Vec<Pattern>> {
        let mut params = Vec::new();
        while self.can_start_param() {
            params.push(self.nested(Self::parse_atomic_pattern)?);
        }
        Ok(params)
    }

    fn parse_parenthesized_pattern(&mut self) -> ParseResult<Pattern> {
        let open = self.advance().span();
        if let Some(close) = self.eat_punct(Punct::RightParen) {
            return Ok(Pattern::Unit(open.merge(close)));
        }
        let first = self.parse_pattern()?;
        if !self.check_punct(Punct::Comma) {
            let close = self.expect_closing(Punct::RightParen, open, &["`,`"])?;
            return Ok(Pattern::Parens(Box::new(first), open.merge(close)));
        }
        let mut elements = vec![first];
        while self.eat_punct(Punct::Comma).is_some() {
            elements.push(self.parse_pattern()?);
        }
        let close = self.expect_closing(Punct::RightParen, open, &["`,`"])?;
        Ok(Pattern::Tuple {
            elements,
            span: open.merge(close),
        })
    }

    /// Parses `{a, b = p, c: t}`.
    fn parse_record_pattern(&mut self) -> ParseResult<Pattern> {
        let open = self.advance().span();
        let mut fields = Vec::new();
        if !self.check_punct(Punct::RightBrace) {
            loop {
                fields.push(self.parse_record_pattern_field()?);
                if self.eat_punct(Punct::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect_closing(Punct::RightBrace, open, &["`,`", "`=`", "`:`"])?;
        Ok(Pattern::Record {
            fields,
            span: open.merge(close),
        })
    }

    fn parse_record_pattern_field(&mut self) -> ParseResult<RecordPatternField> {
        let name = self.parse_field_name()?;
        if self.eat_punct(Punct::Equal).is_some() {
            let pattern = self.parse_pattern()?;
            return Ok(RecordPatternField {
                span: name.span.merge(pattern.span()),
                name,
                pattern: Some(pattern),
            });
        }
        if self.eat_punct(Punct::Colon).is_some() {
            let ty = self.parse_type()?;
            let span = name.span.merge(ty.span());
            let pattern = Pattern::Ascription {
                pattern: Box::new(Pattern::Identifier(name.clone())),
                ty,
                span,
            };
            return Ok(RecordPatternField {
                name,
                pattern: Some(pattern),
                span,
            });
        }
        Ok(RecordPatternField {
            span: name.span,
            name,
            pattern: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Pattern;
    use crate::source_analysis::{Span, parse_pattern};

    fn parse(source: &str) -> Pattern {
        match parse_pattern(source) {
            Ok(pattern) => pattern,
            Err(error) => panic!("failed to parse {source:?}: {error}"),
        }
    }

    #[test]
    fn negative_literal() {
        let Pattern::Literal { negative, value, span } = parse("-12") else {
            panic!("expected a literal pattern");
        };
        assert!(negative);
        assert_eq!(value.digits, "12");
        assert_eq!(span, Span::new(0, 3));
    }

    #[test]
    fn constructor_arguments_are_atoms() {
        let Pattern::Constructor { arguments, .. } = parse("#node l _ (x, y)") else {
            panic!("expected a constructor pattern");
        };
        assert_eq!(arguments.len(), 3);
        assert!(matches!(arguments[2], Pattern::Tuple { .. }));
    }

    #[test]
    fn bound_names_in_source_order() {
        let pattern = parse("{a, b = (c, _), d: i32}");
        let names: Vec<_> = pattern
            .bound_names()
            .into_iter()
            .map(|name| name.name.as_str())
            .collect();
        assert_eq!(names, ["a", "c", "d"]);
    }

    #[test]
    fn ascription_binds_loosest() {
        let Pattern::Ascription { pattern, .. } = parse("#some x : opt") else {
            panic!("expected an ascription");
        };
        assert!(matches!(*pattern, Pattern::Constructor { .. }));
    }

    #[test]
    fn minus_needs_a_literal() {
        assert!(parse_pattern("-x").is_err());
    }
}
