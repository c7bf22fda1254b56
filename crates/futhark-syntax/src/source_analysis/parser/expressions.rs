// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for Futhark.
//!
//! Levels, loosest first:
//!
//! - Ascription (`e : t`) and coercion (`e :> t`)
//! - Ranges (`a .. b`, `a .. s ... b`, `a ..< b`, `a ..> b`)
//! - Updates (`e with [i] = v`, `e with f.g = v`)
//! - Infix operators, by precedence climbing
//! - Prefix forms: negation and the keyword forms (`if`, `let`, `loop`,
//!   `match`, `\`, `assert`, `unsafe`, `#[attr]`)
//! - Application by juxtaposition, including constructor payloads and `!`
//! - Postfix indexing (`a[i]`) and projection (`e.a.0`)
//! - Atoms

use crate::ast::{
    DimIndex, Expression, Identifier, LetBinding, Literal, LoopForm, MatchCase, OperatorName,
    RangeKind, RecordField, UpdatePath,
};
use crate::source_analysis::{Keyword, Punct, Span, SyntaxError, SyntaxErrorKind, TokenKind};

use super::operators::classify;
use super::{ParseResult, Parser};

const EXPRESSION: &str = "an expression";

impl Parser<'_> {
    // ========================================================================
    // Expression Parsing
    // ========================================================================

    /// Parses any expression.
    ///
    /// Entry point for expression parsing; one nesting level deep.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_ascription)
    }

    /// Parses `e : t` and `e :> t`. Neither nests: a second `:` is left for
    /// the caller to reject.
    fn parse_ascription(&mut self) -> ParseResult<Expression> {
        let expression = self.parse_range()?;
        let is_coercion = match self.current_kind() {
            TokenKind::Punct(Punct::Colon) => false,
            TokenKind::Punct(Punct::ColonGreater) => true,
            _ => return Ok(expression),
        };
        self.advance();
        let ty = self.parse_type()?;
        let span = expression.span().merge(ty.span());
        let expression = Box::new(expression);
        Ok(if is_coercion {
            Expression::Coerce {
                expression,
                ty,
                span,
            }
        } else {
            Expression::Ascription {
                expression,
                ty,
                span,
            }
        })
    }

    /// Parses ranges: `a .. b`, `a ..< b`, `a ..> b`, and the stepped forms
    /// `a .. s ... b`, `a .. s ..< b`, `a .. s ..> b`.
    fn parse_range(&mut self) -> ParseResult<Expression> {
        let start = self.parse_update()?;
        let Some(first) = self.range_operator(&[Punct::DotDot, Punct::DotDotLess, Punct::DotDotGreater])
        else {
            return Ok(start);
        };
        let first_span = self.advance().span();
        let second = self.parse_operand_after(first.as_str(), first_span, Self::parse_update)?;

        let (step, end, kind) = match first {
            Punct::DotDot => {
                match self.range_operator(&[
                    Punct::DotDotDot,
                    Punct::DotDotLess,
                    Punct::DotDotGreater,
                ]) {
                    Some(second_operator) => {
                        let span = self.advance().span();
                        let end = self.parse_operand_after(
                            second_operator.as_str(),
                            span,
                            Self::parse_update,
                        )?;
                        (Some(Box::new(second)), end, range_kind(second_operator))
                    }
                    None => (None, second, RangeKind::Inclusive),
                }
            }
            _ => (None, second, range_kind(first)),
        };

        let span = start.span().merge(end.span());
        Ok(Expression::Range {
            start: Box::new(start),
            step,
            end: Box::new(end),
            kind,
            span,
        })
    }

    /// Returns the current token if it is one of the given range operators.
    fn range_operator(&self, accepted: &[Punct]) -> Option<Punct> {
        match self.current_kind() {
            TokenKind::Punct(punct) if accepted.contains(punct) => Some(*punct),
            _ => None,
        }
    }

    /// Parses a left-associative chain of `with` updates.
    fn parse_update(&mut self) -> ParseResult<Expression> {
        let mut target = self.parse_binary(0)?;
        while let Some(with_span) = self.eat_keyword(Keyword::With) {
            let path = if let Some(open) = self.eat_punct(Punct::LeftBracket) {
                let (indices, close) = self.parse_indices(open)?;
                UpdatePath::Index {
                    indices,
                    span: open.merge(close),
                }
            } else {
                UpdatePath::Field(self.parse_field_path()?)
            };
            let equals = self.expect_punct(Punct::Equal)?;
            let value =
                self.parse_operand_after("=", equals, |parser| {
                    parser.nested(|parser| parser.parse_binary(0))
                })?;
            let span = target.span().merge(with_span).merge(value.span());
            target = Expression::Update {
                target: Box::new(target),
                path,
                value: Box::new(value),
                span,
            };
        }
        Ok(target)
    }

    /// Parses `a.b.0` after `with`.
    fn parse_field_path(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut fields = vec![self.parse_field_name()?];
        while self.eat_punct(Punct::Dot).is_some() {
            fields.push(self.parse_field_name()?);
        }
        Ok(fields)
    }

    /// Pratt parsing for infix operators.
    ///
    /// `min_bp` is the minimum binding power an operator needs to be folded
    /// into the expression parsed so far (0 at the top level).
    fn parse_binary(&mut self, min_bp: u8) -> ParseResult<Expression> {
        let mut left = self.parse_prefix()?;

        while let TokenKind::Operator(op) = self.current_kind() {
            let op = op.clone();

            // Unclassified spellings such as `!` end the expression
            let Some(class) = classify(&op) else {
                break;
            };
            let bp = class.binding_power();
            if bp.left < min_bp {
                break;
            }

            // `(e op)` is a left section; leave the operator to the caller
            if self.kind_at(1).is_punct(Punct::RightParen) {
                break;
            }

            let operator = OperatorName::new(op, self.advance().span());
            let right = self.parse_operand_after(&operator.symbol, operator.span, |parser| {
                parser.nested(|parser| parser.parse_binary(bp.right))
            })?;

            let span = left.span().merge(right.span());
            left = Expression::Infix {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    /// Runs `parse` if an expression can start here, and reports a missing
    /// operand after `operator` otherwise.
    fn parse_operand_after(
        &mut self,
        operator: &str,
        operator_span: Span,
        parse: impl FnOnce(&mut Self) -> ParseResult<Expression>,
    ) -> ParseResult<Expression> {
        if self.can_start_expression() {
            parse(self)
        } else {
            Err(SyntaxError::new(
                SyntaxErrorKind::MissingOperand {
                    operator: operator.into(),
                },
                operator_span,
            ))
        }
    }

    /// Parses prefix negation and the keyword-introduced forms.
    fn parse_prefix(&mut self) -> ParseResult<Expression> {
        match self.current_kind() {
            TokenKind::Operator(op) if op == "-" => {
                let minus = self.advance().span();
                let operand =
                    self.parse_operand_after("-", minus, |parser| parser.nested(Self::parse_prefix))?;
                Ok(Expression::Negate {
                    span: minus.merge(operand.span()),
                    operand: Box::new(operand),
                })
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::Let) => self.parse_let(),
            TokenKind::Keyword(Keyword::Loop) => self.parse_loop(),
            TokenKind::Keyword(Keyword::Match) => self.parse_match(),
            TokenKind::Keyword(Keyword::Assert) => self.parse_assert(),
            TokenKind::Keyword(Keyword::Unsafe) => {
                let start = self.advance().span();
                let body = self.parse_expression()?;
                Ok(Expression::Unsafe {
                    span: start.merge(body.span()),
                    body: Box::new(body),
                })
            }
            TokenKind::Punct(Punct::Backslash) => self.parse_lambda(),
            TokenKind::Punct(Punct::AttributeOpen) => {
                let attribute = self.parse_attribute()?;
                let expression = self.parse_expression()?;
                Ok(Expression::Attributed {
                    span: attribute.span.merge(expression.span()),
                    attribute,
                    expression: Box::new(expression),
                })
            }
            _ => self.parse_application(),
        }
    }

    /// Parses function application by juxtaposition.
    ///
    /// A constructor head collects its arguments into one node; `!` applies
    /// to the atom right after it, so `!f x` is `(!f) x`.
    fn parse_application(&mut self) -> ParseResult<Expression> {
        if let TokenKind::Constructor(name) = self.current_kind() {
            let tag = Identifier::new(name.clone(), self.current_span());
            self.advance();
            let mut span = tag.span;
            let mut arguments = Vec::new();
            while self.can_start_atom() {
                let argument = self.parse_postfix_atom()?;
                span = span.merge(argument.span());
                arguments.push(argument);
            }
            return Ok(Expression::Constructor {
                tag,
                arguments,
                span,
            });
        }

        let mut function = if self.current_kind().is_operator("!") {
            let bang = self.advance().span();
            if !self.can_start_atom() {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::MissingOperand {
                        operator: "!".into(),
                    },
                    bang,
                ));
            }
            let operand = self.nested(Self::parse_postfix_atom)?;
            Expression::Not {
                span: bang.merge(operand.span()),
                operand: Box::new(operand),
            }
        } else {
            self.parse_postfix_atom()?
        };

        while self.can_start_atom() {
            let argument = self.parse_postfix_atom()?;
            let span = function.span().merge(argument.span());
            function = Expression::Application {
                function: Box::new(function),
                argument: Box::new(argument),
                span,
            };
        }
        Ok(function)
    }

    /// Whether the current token can begin an atom.
    pub(super) fn can_start_atom(&self) -> bool {
        match self.current_kind() {
            TokenKind::Identifier(_)
            | TokenKind::Constructor(_)
            | TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::String { .. }
            | TokenKind::Character(_) => true,
            TokenKind::Keyword(keyword) => matches!(keyword, Keyword::True | Keyword::False),
            TokenKind::Punct(punct) => matches!(
                punct,
                Punct::LeftParen | Punct::LeftBracket | Punct::LeftBrace
            ),
            _ => false,
        }
    }

    /// Whether the current token can begin an expression.
    pub(super) fn can_start_expression(&self) -> bool {
        if self.can_start_atom() {
            return true;
        }
        match self.current_kind() {
            TokenKind::Operator(op) => op == "-" || op == "!",
            TokenKind::Keyword(keyword) => matches!(
                keyword,
                Keyword::If
                    | Keyword::Let
                    | Keyword::Loop
                    | Keyword::Match
                    | Keyword::Assert
                    | Keyword::Unsafe
            ),
            TokenKind::Punct(punct) => matches!(punct, Punct::Backslash | Punct::AttributeOpen),
            _ => false,
        }
    }

    // ========================================================================
    // Postfix Forms & Atoms
    // ========================================================================

    /// Parses an atom followed by adjacent indexing and projections.
    pub(super) fn parse_postfix_atom(&mut self) -> ParseResult<Expression> {
        let mut expression = self.parse_atom()?;
        loop {
            if self.check_punct(Punct::LeftBracket) && self.is_adjacent() {
                let open = self.advance().span();
                let (indices, close) = self.parse_indices(open)?;
                let span = expression.span().merge(close);
                expression = Expression::Index {
                    base: Box::new(expression),
                    indices,
                    span,
                };
            } else if self.at_adjacent_projection() {
                let mut fields = Vec::new();
                while self.at_adjacent_projection() {
                    self.advance();
                    fields.push(self.parse_field_name()?);
                }
                let end = fields.last().map_or(expression.span(), |field| field.span);
                let span = expression.span().merge(end);
                expression = Expression::Project {
                    base: Box::new(expression),
                    fields,
                    span,
                };
            } else {
                return Ok(expression);
            }
        }
    }

    /// `.field` touching the expression before it.
    fn at_adjacent_projection(&self) -> bool {
        self.check_punct(Punct::Dot)
            && self.is_adjacent()
            && self.is_adjacent_at(1)
            && self.is_field_name_at(1)
    }

    /// Parses the comma-separated indices after `[`, through the closing
    /// bracket.
    pub(super) fn parse_indices(&mut self, open: Span) -> ParseResult<(Vec<DimIndex>, Span)> {
        let mut indices = Vec::new();
        loop {
            indices.push(self.parse_dim_index()?);
            if self.eat_punct(Punct::Comma).is_none() {
                break;
            }
        }
        let close = self.expect_closing(Punct::RightBracket, open, &["`,`", "`:`"])?;
        Ok((indices, close))
    }

    /// Parses one index: `i`, or a slice `i:j:s` with any part omitted.
    fn parse_dim_index(&mut self) -> ParseResult<DimIndex> {
        let start = if self.check_punct(Punct::Colon) {
            None
        } else {
            let index = self.nested(Self::parse_range)?;
            if !self.check_punct(Punct::Colon) {
                return Ok(DimIndex::Fix(index));
            }
            Some(index)
        };

        let colon = self.advance().span();
        let mut span = start.as_ref().map_or(colon, |start| start.span().merge(colon));
        let end = self.parse_slice_part()?;
        if let Some(end) = &end {
            span = span.merge(end.span());
        }
        let stride = match self.eat_punct(Punct::Colon) {
            Some(colon) => {
                span = span.merge(colon);
                let stride = self.parse_slice_part()?;
                if let Some(stride) = &stride {
                    span = span.merge(stride.span());
                }
                stride
            }
            None => None,
        };
        Ok(DimIndex::Slice {
            start,
            end,
            stride,
            span,
        })
    }

    fn parse_slice_part(&mut self) -> ParseResult<Option<Expression>> {
        if self.can_start_expression() {
            self.nested(Self::parse_range).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parses an atom.
    fn parse_atom(&mut self) -> ParseResult<Expression> {
        let span = self.current_span();
        let literal = match self.current_kind() {
            TokenKind::Integer(literal) => Literal::Integer(literal.clone()),
            TokenKind::Float(literal) => Literal::Float(literal.clone()),
            TokenKind::String { value, .. } => Literal::String(value.clone()),
            TokenKind::Character(c) => Literal::Character(*c),
            TokenKind::Keyword(Keyword::True) => Literal::Bool(true),
            TokenKind::Keyword(Keyword::False) => Literal::Bool(false),
            TokenKind::Identifier(_) => return self.parse_variable(),
            TokenKind::Constructor(name) => {
                let tag = Identifier::new(name.clone(), span);
                self.advance();
                return Ok(Expression::Constructor {
                    tag,
                    arguments: Vec::new(),
                    span,
                });
            }
            TokenKind::Punct(Punct::LeftParen) => return self.parse_parenthesized(),
            TokenKind::Punct(Punct::LeftBracket) => return self.parse_array(),
            TokenKind::Punct(Punct::LeftBrace) => return self.parse_record(),
            _ => return Err(self.unexpected(&[EXPRESSION])),
        };
        self.advance();
        Ok(Expression::Literal(literal, span))
    }

    /// Parses a qualified name, or `M.(e)`.
    fn parse_variable(&mut self) -> ParseResult<Expression> {
        let name = self.parse_qual_name()?;
        let opens_module = self.check_punct(Punct::Dot)
            && self.is_adjacent()
            && self.kind_at(1).is_punct(Punct::LeftParen)
            && self.is_adjacent_at(1);
        if !opens_module {
            return Ok(Expression::Variable(name));
        }
        self.advance();
        let open = self.advance().span();
        let expression = self.parse_expression()?;
        let close = self.expect_closing(Punct::RightParen, open, &[])?;
        Ok(Expression::QualifiedParens {
            span: name.span.merge(close),
            module: name,
            expression: Box::new(expression),
        })
    }

    /// Parses everything that starts with `(`: unit, parentheses, tuples,
    /// and operator sections.
    fn parse_parenthesized(&mut self) -> ParseResult<Expression> {
        let open = self.advance().span();

        if let Some(close) = self.eat_punct(Punct::RightParen) {
            return Ok(Expression::Unit(open.merge(close)));
        }
        if self.check_punct(Punct::Dot) {
            return self.parse_projection_section(open);
        }

        if let TokenKind::Operator(op) = self.current_kind() {
            let op = op.clone();
            // `(+)`
            if self.kind_at(1).is_punct(Punct::RightParen) {
                let operator = OperatorName::new(op, self.advance().span());
                let close = self.advance().span();
                return Ok(Expression::Section {
                    operator,
                    span: open.merge(close),
                });
            }
            // `(+ e)`; `(-e)` and `(!e)` are prefix forms instead
            if op != "-" && classify(&op).is_some() {
                let operator = OperatorName::new(op, self.advance().span());
                let operand = self.parse_operand_after(&operator.symbol, operator.span, |parser| {
                    parser.nested(|parser| parser.parse_binary(0))
                })?;
                let close = self.expect_closing(Punct::RightParen, open, &[])?;
                return Ok(Expression::RightSection {
                    operator,
                    operand: Box::new(operand),
                    span: open.merge(close),
                });
            }
        }

        let first = self.parse_expression()?;

        // `(e +)`
        if let TokenKind::Operator(op) = self.current_kind() {
            if classify(op).is_some() && self.kind_at(1).is_punct(Punct::RightParen) {
                let operator = OperatorName::new(op.clone(), self.current_span());
                self.advance();
                let close = self.advance().span();
                return Ok(Expression::LeftSection {
                    operand: Box::new(first),
                    operator,
                    span: open.merge(close),
                });
            }
        }

        if self.check_punct(Punct::Comma) {
            let mut elements = vec![first];
            while self.eat_punct(Punct::Comma).is_some() {
                elements.push(self.parse_expression()?);
            }
            let close = self.expect_closing(Punct::RightParen, open, &["`,`"])?;
            return Ok(Expression::Tuple {
                elements,
                span: open.merge(close),
            });
        }

        let close = self.expect_closing(Punct::RightParen, open, &["`,`"])?;
        Ok(Expression::Parens(Box::new(first), open.merge(close)))
    }

    /// Parses `(.a.b)` after the opening parenthesis.
    fn parse_projection_section(&mut self, open: Span) -> ParseResult<Expression> {
        let mut fields = Vec::new();
        while self.eat_punct(Punct::Dot).is_some() {
            fields.push(self.parse_field_name()?);
        }
        let close = self.expect_closing(Punct::RightParen, open, &["`.`"])?;
        Ok(Expression::ProjectSection {
            fields,
            span: open.merge(close),
        })
    }

    /// Parses `[]` or `[e, ...]`.
    fn parse_array(&mut self) -> ParseResult<Expression> {
        let open = self.advance().span();
        let mut elements = Vec::new();
        if !self.check_punct(Punct::RightBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if self.eat_punct(Punct::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect_closing(Punct::RightBracket, open, &["`,`"])?;
        Ok(Expression::Array {
            elements,
            span: open.merge(close),
        })
    }

    /// Parses `{}` or `{a = e, b}`.
    fn parse_record(&mut self) -> ParseResult<Expression> {
        let open = self.advance().span();
        let mut fields = Vec::new();
        if !self.check_punct(Punct::RightBrace) {
            loop {
                let name = self.parse_field_name()?;
                if self.eat_punct(Punct::Equal).is_some() {
                    let value = self.parse_expression()?;
                    fields.push(RecordField::Explicit {
                        span: name.span.merge(value.span()),
                        name,
                        value,
                    });
                } else {
                    fields.push(RecordField::Shorthand(name));
                }
                if self.eat_punct(Punct::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect_closing(Punct::RightBrace, open, &["`,`", "`=`"])?;
        Ok(Expression::Record {
            fields,
            span: open.merge(close),
        })
    }

    // ========================================================================
    // Keyword Forms
    // ========================================================================

    /// Parses `if c then a else b`.
    fn parse_if(&mut self) -> ParseResult<Expression> {
        let start = self.advance().span();
        let condition = self.parse_expression()?;
        self.expect_keyword(Keyword::Then)?;
        let then_branch = self.parse_expression()?;
        self.expect_keyword(Keyword::Else)?;
        let else_branch = self.parse_expression()?;
        Ok(Expression::If {
            span: start.merge(else_branch.span()),
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    /// Parses `let binding in body`. A following `let` may stand in for
    /// `in`, nesting the rest of the chain as the body.
    fn parse_let(&mut self) -> ParseResult<Expression> {
        let start = self.advance().span();
        let binding = self.parse_let_binding()?;
        let body = if self.eat_keyword(Keyword::In).is_some() {
            self.parse_expression()?
        } else if self.check_keyword(Keyword::Let) {
            self.nested(Self::parse_let)?
        } else {
            return Err(self.unexpected(&["`in`", "`let`"]));
        };
        Ok(Expression::Let {
            span: start.merge(body.span()),
            binding: Box::new(binding),
            body: Box::new(body),
        })
    }

    fn parse_let_binding(&mut self) -> ParseResult<LetBinding> {
        if self.current_kind().is_identifier() {
            // let a[i] = v
            if self.kind_at(1).is_punct(Punct::LeftBracket) && self.is_adjacent_at(1) {
                let name = self.expect_identifier()?;
                let open = self.advance().span();
                let (indices, _) = self.parse_indices(open)?;
                self.expect_punct(Punct::Equal)?;
                let value = self.parse_expression()?;
                return Ok(LetBinding::Update {
                    name,
                    indices,
                    value,
                });
            }
            // let f 't [n] x y : t = e
            if self.starts_function_params_at(1) {
                let name = self.expect_identifier()?;
                let type_params = self.parse_type_params()?;
                let params = self.parse_params()?;
                let return_type = match self.eat_punct(Punct::Colon) {
                    Some(_) => Some(self.parse_type()?),
                    None => None,
                };
                self.expect_punct(Punct::Equal)?;
                let value = self.parse_expression()?;
                return Ok(LetBinding::Function {
                    name,
                    type_params,
                    params,
                    return_type,
                    value,
                });
            }
        }
        let pattern = self.parse_pattern()?;
        self.expect_punct(Punct::Equal)?;
        let value = self.parse_expression()?;
        Ok(LetBinding::Pattern { pattern, value })
    }

    /// Parses `loop p (= init)? form do body`.
    fn parse_loop(&mut self) -> ParseResult<Expression> {
        let start = self.advance().span();
        let parameter = self.parse_pattern()?;
        let initial = match self.eat_punct(Punct::Equal) {
            Some(_) => Some(Box::new(self.parse_expression()?)),
            None => None,
        };
        let form = if self.eat_keyword(Keyword::For).is_some() {
            if self.current_kind().is_identifier() && self.kind_at(1).is_operator("<") {
                let name = self.expect_identifier()?;
                self.advance();
                let bound = self.parse_expression()?;
                LoopForm::For { name, bound }
            } else {
                let pattern = self.parse_pattern()?;
                self.expect_keyword(Keyword::In)?;
                let source = self.parse_expression()?;
                LoopForm::ForIn { pattern, source }
            }
        } else if self.eat_keyword(Keyword::While).is_some() {
            LoopForm::While(self.parse_expression()?)
        } else if initial.is_none() {
            return Err(self.unexpected(&["`=`", "`for`", "`while`"]));
        } else {
            return Err(self.unexpected(&["`for`", "`while`"]));
        };
        self.expect_keyword(Keyword::Do)?;
        let body = self.parse_expression()?;
        Ok(Expression::Loop {
            span: start.merge(body.span()),
            parameter,
            initial,
            form: Box::new(form),
            body: Box::new(body),
        })
    }

    /// Parses `match e case p -> a case q -> b ...`.
    fn parse_match(&mut self) -> ParseResult<Expression> {
        let start = self.advance().span();
        let scrutinee = self.parse_expression()?;
        let mut cases = Vec::new();
        while let Some(case) = self.eat_keyword(Keyword::Case) {
            // A case pattern cannot carry an ascription: its type would
            // swallow the `->`.
            let pattern = self.nested(Self::parse_constructor_pattern)?;
            self.expect_punct(Punct::Arrow)?;
            let body = self.parse_expression()?;
            cases.push(MatchCase {
                span: case.merge(body.span()),
                pattern,
                body,
            });
        }
        let Some(last) = cases.last() else {
            return Err(self.unexpected(&["`case`"]));
        };
        Ok(Expression::Match {
            span: start.merge(last.span),
            scrutinee: Box::new(scrutinee),
            cases,
        })
    }

    /// Parses `\p q : t -> e`.
    fn parse_lambda(&mut self) -> ParseResult<Expression> {
        let start = self.advance().span();
        let parameters = self.parse_params()?;
        if parameters.is_empty() {
            return Err(self.unexpected(&["a parameter"]));
        }
        let return_type = match self.eat_punct(Punct::Colon) {
            Some(_) => Some(self.nested(Self::parse_type_term)?),
            None => None,
        };
        self.expect_punct(Punct::Arrow)?;
        let body = self.parse_expression()?;
        Ok(Expression::Lambda {
            span: start.merge(body.span()),
            parameters,
            return_type,
            body: Box::new(body),
        })
    }

    /// Parses `assert c e`, where both operands are atoms.
    fn parse_assert(&mut self) -> ParseResult<Expression> {
        let start = self.advance().span();
        let condition = self.nested(Self::parse_postfix_atom)?;
        let body = self.nested(Self::parse_postfix_atom)?;
        Ok(Expression::Assert {
            span: start.merge(body.span()),
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }
}

fn range_kind(operator: Punct) -> RangeKind {
    match operator {
        Punct::DotDotLess => RangeKind::ExclusiveBelow,
        Punct::DotDotGreater => RangeKind::ExclusiveAbove,
        _ => RangeKind::Inclusive,
    }
}
