// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type expression parsing.
//!
//! Loosest first: existentials `?[n]. t`, function arrows (right
//! associative, with optional named parameters), then terms: uniqueness
//! `*t`, arrays `[d]t`, sum types and type application.

use crate::ast::{
    Dimension, DimensionKind, SumConstructor, TypeArg, TypeExpr, TypeField,
};
use crate::source_analysis::{Punct, Span, SyntaxError, SyntaxErrorKind, TokenKind};

use super::operators::TYPE_ARROW;
use super::{ParseResult, Parser};

impl Parser<'_> {
    /// Parses any type expression.
    pub(super) fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        self.nested(|parser| parser.parse_function_type(0))
    }

    /// Parses arrows with precedence climbing over [`TYPE_ARROW`].
    fn parse_function_type(&mut self, min_bp: u8) -> ParseResult<TypeExpr> {
        if self.check_punct(Punct::Question) {
            return self.parse_existential();
        }

        let start = self.current_span();
        let arrow = TYPE_ARROW.binding_power();

        // `(x: t) -> u` names its parameter
        let (mut param_name, mut left) = if self.starts_named_parameter() {
            let open = self.advance().span();
            let name = self.expect_identifier()?;
            self.advance();
            let param = self.parse_type()?;
            self.expect_closing(Punct::RightParen, open, &[])?;
            if !self.check_punct(Punct::Arrow) {
                return Err(self.unexpected(&["`->`"]));
            }
            (Some(name), param)
        } else {
            (None, self.parse_type_term()?)
        };

        while self.check_punct(Punct::Arrow) && arrow.left >= min_bp {
            self.advance();
            let result = self.nested(|parser| parser.parse_function_type(arrow.right))?;
            let span = start.merge(result.span());
            left = TypeExpr::Function {
                param_name: param_name.take(),
                param: Box::new(left),
                result: Box::new(result),
                span,
            };
        }
        Ok(left)
    }

    /// `( ident :` starts a named function parameter.
    fn starts_named_parameter(&self) -> bool {
        self.check_punct(Punct::LeftParen)
            && self.kind_at(1).is_identifier()
            && self.kind_at(2).is_punct(Punct::Colon)
    }

    /// Parses `?[n][m]. t`.
    fn parse_existential(&mut self) -> ParseResult<TypeExpr> {
        let start = self.advance().span();
        let mut sizes = Vec::new();
        while let Some(open) = self.eat_punct(Punct::LeftBracket) {
            sizes.push(self.expect_identifier()?);
            self.expect_closing(Punct::RightBracket, open, &[])?;
        }
        if sizes.is_empty() {
            return Err(self.unexpected(&["`[`"]));
        }
        self.expect_punct(Punct::Dot)?;
        let body = self.parse_type()?;
        Ok(TypeExpr::Existential {
            span: start.merge(body.span()),
            sizes,
            body: Box::new(body),
        })
    }

    /// Parses a type without a top-level arrow.
    pub(super) fn parse_type_term(&mut self) -> ParseResult<TypeExpr> {
        match self.current_kind() {
            TokenKind::Operator(op) if op == "*" => {
                let star = self.advance().span();
                let inner = self.nested(Self::parse_type_term)?;
                Ok(TypeExpr::Unique {
                    span: star.merge(inner.span()),
                    inner: Box::new(inner),
                })
            }
            TokenKind::Punct(Punct::LeftBracket) => {
                let dimension = self.parse_dimension()?;
                let element = self.nested(Self::parse_type_term)?;
                Ok(TypeExpr::Array {
                    span: dimension.span.merge(element.span()),
                    dimension,
                    element: Box::new(element),
                })
            }
            TokenKind::Constructor(_) => self.parse_sum_type(None),
            TokenKind::Punct(Punct::Pipe) => {
                let pipe = self.current_span();
                if !matches!(self.kind_at(1), TokenKind::Constructor(_)) {
                    return Err(SyntaxError::new(SyntaxErrorKind::EmptySumType, pipe));
                }
                self.advance();
                self.parse_sum_type(Some(pipe))
            }
            _ => self.parse_type_application(),
        }
    }

    /// Parses `#a t | #b | ...`, optionally after a leading `|`.
    fn parse_sum_type(&mut self, leading_pipe: Option<Span>) -> ParseResult<TypeExpr> {
        let first = self.parse_sum_constructor()?;
        let start = leading_pipe.unwrap_or(first.span);
        let mut end = first.span;
        let mut constructors = vec![first];
        while let Some(pipe) = self.eat_punct(Punct::Pipe) {
            if !matches!(self.current_kind(), TokenKind::Constructor(_)) {
                return Err(SyntaxError::new(SyntaxErrorKind::EmptySumType, pipe));
            }
            let constructor = self.parse_sum_constructor()?;
            end = constructor.span;
            constructors.push(constructor);
        }
        Ok(TypeExpr::Sum {
            constructors,
            span: start.merge(end),
        })
    }

    fn parse_sum_constructor(&mut self) -> ParseResult<SumConstructor> {
        let TokenKind::Constructor(name) = self.current_kind() else {
            return Err(self.unexpected(&["a constructor"]));
        };
        let tag = crate::ast::Identifier::new(name.clone(), self.current_span());
        self.advance();
        let mut span = tag.span;
        let mut arguments = Vec::new();
        while self.can_start_type_atom() {
            let argument = self.parse_type_atom()?;
            span = span.merge(argument.span());
            arguments.push(argument);
        }
        Ok(SumConstructor {
            tag,
            arguments,
            span,
        })
    }

    /// Parses `head arg ...` where each argument is `[d]` or an atom.
    fn parse_type_application(&mut self) -> ParseResult<TypeExpr> {
        let mut ty = self.parse_type_atom()?;
        if !matches!(ty, TypeExpr::Named(_)) {
            return Ok(ty);
        }
        loop {
            let argument = if self.check_punct(Punct::LeftBracket) {
                TypeArg::Dimension(self.parse_dimension()?)
            } else if matches!(
                self.current_kind(),
                TokenKind::Identifier(_)
                    | TokenKind::Punct(Punct::LeftParen | Punct::LeftBrace)
            ) {
                TypeArg::Type(Box::new(self.parse_type_atom()?))
            } else {
                return Ok(ty);
            };
            let span = ty.span().merge(argument.span());
            ty = TypeExpr::Application {
                head: Box::new(ty),
                argument,
                span,
            };
        }
    }

    fn can_start_type_atom(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Identifier(_)
                | TokenKind::Punct(Punct::LeftParen | Punct::LeftBrace | Punct::LeftBracket)
        )
    }

    /// Parses a type atom: a name, `()`, `(t)`, a tuple, a record, or an
    /// array whose element is itself an atom.
    fn parse_type_atom(&mut self) -> ParseResult<TypeExpr> {
        match self.current_kind() {
            TokenKind::Identifier(_) => Ok(TypeExpr::Named(self.parse_qual_name()?)),
            TokenKind::Punct(Punct::LeftParen) => self.parse_parenthesized_type(),
            TokenKind::Punct(Punct::LeftBrace) => self.parse_record_type(),
            TokenKind::Punct(Punct::LeftBracket) => {
                let dimension = self.parse_dimension()?;
                let element = self.nested(Self::parse_type_atom)?;
                Ok(TypeExpr::Array {
                    span: dimension.span.merge(element.span()),
                    dimension,
                    element: Box::new(element),
                })
            }
            _ => Err(self.unexpected(&["a type"])),
        }
    }

    fn parse_parenthesized_type(&mut self) -> ParseResult<TypeExpr> {
        let open = self.advance().span();
        if let Some(close) = self.eat_punct(Punct::RightParen) {
            return Ok(TypeExpr::Unit(open.merge(close)));
        }
        let first = self.parse_type()?;
        if !self.check_punct(Punct::Comma) {
            let close = self.expect_closing(Punct::RightParen, open, &["`,`"])?;
            return Ok(TypeExpr::Parens(Box::new(first), open.merge(close)));
        }
        let mut elements = vec![first];
        while self.eat_punct(Punct::Comma).is_some() {
            elements.push(self.parse_type()?);
        }
        let close = self.expect_closing(Punct::RightParen, open, &["`,`"])?;
        Ok(TypeExpr::Tuple {
            elements,
            span: open.merge(close),
        })
    }

    /// Parses `{}` or `{a: t, b: u}`.
    fn parse_record_type(&mut self) -> ParseResult<TypeExpr> {
        let open = self.advance().span();
        let mut fields = Vec::new();
        if !self.check_punct(Punct::RightBrace) {
            loop {
                let name = self.parse_field_name()?;
                self.expect_punct(Punct::Colon)?;
                let ty = self.parse_type()?;
                fields.push(TypeField {
                    span: name.span.merge(ty.span()),
                    name,
                    ty,
                });
                if self.eat_punct(Punct::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect_closing(Punct::RightBrace, open, &["`,`"])?;
        Ok(TypeExpr::Record {
            fields,
            span: open.merge(close),
        })
    }

    /// Parses a bracketed dimension: `[]`, `[n]`, `[M.n]` or `[3]`.
    pub(super) fn parse_dimension(&mut self) -> ParseResult<Dimension> {
        let open = self.expect_punct(Punct::LeftBracket)?;
        let kind = match self.current_kind() {
            TokenKind::Punct(Punct::RightBracket) => DimensionKind::Unknown,
            TokenKind::Identifier(_) => DimensionKind::Named(self.parse_qual_name()?),
            TokenKind::Integer(literal) if literal.is_plain_decimal() => {
                let digits = literal.digits.clone();
                self.advance();
                DimensionKind::Literal(digits)
            }
            TokenKind::Eof => return Err(self.unclosed(open)),
            _ => return Err(self.malformed_dimension()),
        };
        let close = match self.current_kind() {
            TokenKind::Punct(Punct::RightBracket) => self.advance().span(),
            TokenKind::Eof => return Err(self.unclosed(open)),
            _ => return Err(self.malformed_dimension()),
        };
        Ok(Dimension {
            kind,
            span: open.merge(close),
        })
    }

    fn malformed_dimension(&self) -> SyntaxError {
        SyntaxError::new(
            SyntaxErrorKind::MalformedDimension {
                found: self.current_kind().to_string().into(),
            },
            self.current_span(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{DimensionKind, TypeArg, TypeExpr};
    use crate::source_analysis::{Span, SyntaxErrorKind, parse_type};

    fn parse(source: &str) -> TypeExpr {
        match parse_type(source) {
            Ok(ty) => ty,
            Err(error) => panic!("failed to parse {source:?}: {error}"),
        }
    }

    #[test]
    fn array_dimensions() {
        let TypeExpr::Array { dimension, element, span } = parse("[3][]f32") else {
            panic!("expected an array type");
        };
        assert_eq!(dimension.kind, DimensionKind::Literal("3".into()));
        assert_eq!(dimension.span, Span::new(0, 3));
        assert_eq!(span, Span::new(0, 8));
        let TypeExpr::Array { dimension, .. } = *element else {
            panic!("expected a nested array type");
        };
        assert_eq!(dimension.kind, DimensionKind::Unknown);
    }

    #[test]
    fn qualified_dimension() {
        let TypeExpr::Array { dimension, .. } = parse("[M.n]i32") else {
            panic!("expected an array type");
        };
        let DimensionKind::Named(name) = dimension.kind else {
            panic!("expected a named dimension");
        };
        assert_eq!(name.to_string(), "M.n");
    }

    #[test]
    fn named_parameter() {
        let TypeExpr::Function { param_name, span, .. } = parse("(n: i64) -> [n]i32") else {
            panic!("expected a function type");
        };
        assert_eq!(param_name.map(|name| name.name), Some("n".into()));
        assert_eq!(span, Span::new(0, 18));
    }

    #[test]
    fn application_arguments() {
        let TypeExpr::Application { head, argument, .. } = parse("matrix [n] [m] f32") else {
            panic!("expected a type application");
        };
        assert!(matches!(argument, TypeArg::Type(_)));
        assert!(matches!(*head, TypeExpr::Application { .. }));
    }

    #[test]
    fn sum_type_with_leading_pipe() {
        let TypeExpr::Sum { constructors, span } = parse("| #a i32 | #b") else {
            panic!("expected a sum type");
        };
        assert_eq!(constructors.len(), 2);
        assert_eq!(constructors[0].arguments.len(), 1);
        assert_eq!(span, Span::new(0, 13));
    }

    #[test]
    fn trailing_pipe_is_an_empty_sum() {
        let error = parse_type("#a |").unwrap_err();
        assert_eq!(error.kind, SyntaxErrorKind::EmptySumType);
        assert_eq!(error.span, Span::new(3, 4));
    }

    #[test]
    fn unclosed_dimension() {
        let error = parse_type("[n").unwrap_err();
        assert!(matches!(
            error.kind,
            SyntaxErrorKind::UnclosedDelimiter { delimiter: '[', .. }
        ));
    }

    #[test]
    fn expression_in_dimension_is_malformed() {
        let error = parse_type("[n+1]i32").unwrap_err();
        assert_eq!(
            error.kind,
            SyntaxErrorKind::MalformedDimension {
                found: "`+`".into()
            }
        );
    }

    #[test]
    fn existential_requires_a_size() {
        assert!(parse_type("?.i32").is_err());
        assert!(matches!(parse("?[n][m].[n][m]u8"), TypeExpr::Existential { .. }));
    }
}
