// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing for Futhark.
//!
//! This module handles the declarations that make up a program or a module
//! body:
//! - Value bindings (`def`, `entry`, `let`), including operator and infix
//!   forms
//! - Type bindings (`type`, `type^`, `type~`)
//! - `open`, `import` and `local`
//! - Attributes and doc comments
//!
//! Module and module type bindings live in `modules.rs`.

use ecow::EcoString;

use crate::ast::{
    BindingKind, BindingName, Declaration, Liftedness, OperatorName, Program, TypeBinding,
    TypeParam, ValueBinding,
};
use crate::source_analysis::{Keyword, Punct, Span, SyntaxError, SyntaxErrorKind, TokenKind};

use super::operators::classify;
use super::{ParseResult, Parser};

/// What may start a declaration, for error messages.
pub(super) const DECLARATION_START: &[&str] = &[
    "`def`", "`entry`", "`let`", "`type`", "`module`", "`open`", "`import`", "`local`", "`#[`",
];

impl Parser<'_> {
    // ========================================================================
    // Programs
    // ========================================================================

    /// Parses declarations until the end of input.
    pub(super) fn parse_program(&mut self) -> ParseResult<Program> {
        let mut declarations = Vec::new();
        while !self.is_at_end() {
            declarations.push(self.parse_declaration()?);
        }
        Ok(Program {
            declarations,
            span: Span::new(0, self.current_span().end()),
        })
    }

    /// Parses one declaration together with its doc comment.
    pub(super) fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        let doc = self.collect_doc_comment();
        self.parse_declaration_with_doc(doc)
    }

    fn parse_declaration_with_doc(&mut self, doc: Option<EcoString>) -> ParseResult<Declaration> {
        tracing::trace!(offset = self.current_span().start(), "parsing declaration");
        match self.current_kind() {
            TokenKind::Punct(Punct::AttributeOpen) => {
                let attribute = self.parse_attribute()?;
                let doc = doc.or_else(|| self.collect_doc_comment());
                let declaration = self.nested(|parser| parser.parse_declaration_with_doc(doc))?;
                Ok(Declaration::Attributed {
                    span: attribute.span.merge(declaration.span()),
                    attribute,
                    declaration: Box::new(declaration),
                })
            }
            TokenKind::Keyword(Keyword::Def | Keyword::Entry | Keyword::Let) => {
                Ok(Declaration::Value(self.parse_value_binding(doc)?))
            }
            TokenKind::Keyword(Keyword::Type) => Ok(Declaration::Type(self.parse_type_binding(doc)?)),
            TokenKind::Keyword(Keyword::Module) => self.parse_module_binding(doc),
            TokenKind::Keyword(Keyword::Open) => {
                let start = self.advance().span();
                let module = self.parse_module_expression()?;
                Ok(Declaration::Open {
                    span: start.merge(module.span()),
                    module,
                })
            }
            TokenKind::Keyword(Keyword::Import) => {
                let start = self.advance().span();
                let (path, path_span) = self.parse_import_path()?;
                let resolved = self.resolve_import(&path, path_span)?;
                Ok(Declaration::Import {
                    path,
                    resolved,
                    span: start.merge(path_span),
                })
            }
            TokenKind::Keyword(Keyword::Local) => {
                let start = self.advance().span();
                let declaration = self.nested(|parser| {
                    let doc = doc.or_else(|| parser.collect_doc_comment());
                    parser.parse_declaration_with_doc(doc)
                })?;
                Ok(Declaration::Local {
                    span: start.merge(declaration.span()),
                    declaration: Box::new(declaration),
                })
            }
            _ => Err(self.unexpected(DECLARATION_START)),
        }
    }

    // ========================================================================
    // Value Bindings
    // ========================================================================

    /// Parses `def name tparams params : t = e`, `def (op) ...` and the
    /// infix form `def x op y = e`.
    fn parse_value_binding(&mut self, doc: Option<EcoString>) -> ParseResult<ValueBinding> {
        let keyword = self.advance();
        let kind = match keyword.kind() {
            TokenKind::Keyword(Keyword::Entry) => BindingKind::Entry,
            TokenKind::Keyword(Keyword::Let) => BindingKind::Let,
            _ => BindingKind::Def,
        };

        let (name, type_params, params) = if self.starts_infix_binding() {
            let left = self.nested(Self::parse_atomic_pattern)?;
            let operator = self.expect_infix_operator()?;
            let right = self.nested(Self::parse_atomic_pattern)?;
            (BindingName::Operator(operator), Vec::new(), vec![left, right])
        } else {
            let name = self.parse_binding_name()?;
            let type_params = self.parse_type_params()?;
            let params = self.parse_params()?;
            (name, type_params, params)
        };

        let return_type = match self.eat_punct(Punct::Colon) {
            Some(_) => Some(self.parse_type()?),
            None => None,
        };
        self.expect_punct(Punct::Equal)?;
        let body = self.parse_expression()?;

        Ok(ValueBinding {
            span: keyword.span().merge(body.span()),
            kind,
            name,
            type_params,
            params,
            return_type,
            body,
            doc,
        })
    }

    /// `x op y` and `(p) op q` bind an infix operator; `(op)` does not.
    fn starts_infix_binding(&self) -> bool {
        match self.current_kind() {
            TokenKind::Identifier(_) => matches!(self.kind_at(1), TokenKind::Operator(_)),
            TokenKind::Punct(Punct::LeftParen) => !(matches!(self.kind_at(1), TokenKind::Operator(_))
                && self.kind_at(2).is_punct(Punct::RightParen)),
            _ => false,
        }
    }

    /// Parses a plain name or `(op)`.
    pub(super) fn parse_binding_name(&mut self) -> ParseResult<BindingName> {
        if self.check_punct(Punct::LeftParen) {
            let open = self.advance().span();
            let operator = self.expect_infix_operator()?;
            self.expect_closing(Punct::RightParen, open, &[])?;
            return Ok(BindingName::Operator(operator));
        }
        if self.current_kind().is_identifier() {
            return Ok(BindingName::Name(self.expect_identifier()?));
        }
        Err(self.unexpected(&["a name", "`(`"]))
    }

    fn expect_infix_operator(&mut self) -> ParseResult<OperatorName> {
        match self.current_kind() {
            TokenKind::Operator(op) if classify(op).is_some() => {
                let operator = OperatorName::new(op.clone(), self.current_span());
                self.advance();
                Ok(operator)
            }
            _ => Err(self.unexpected(&["an infix operator"])),
        }
    }

    /// Whether a `let` binding at `offset - 1` defines a function: the
    /// token at `offset` starts a type, size or value parameter.
    pub(super) fn starts_function_params_at(&self, offset: usize) -> bool {
        match self.kind_at(offset) {
            TokenKind::Identifier(_) => true,
            TokenKind::Punct(Punct::LeftBracket) => !self.is_adjacent_at(offset),
            TokenKind::Punct(punct) => matches!(
                punct,
                Punct::Underscore
                    | Punct::LeftParen
                    | Punct::LeftBrace
                    | Punct::Apostrophe
                    | Punct::ApostropheHat
                    | Punct::ApostropheTilde
                    | Punct::AttributeOpen
            ),
            _ => false,
        }
    }

    /// Parses type parameters `'t`, `'^t`, `'~t` and size parameters `[n]`.
    pub(super) fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParam>> {
        let mut params = Vec::new();
        loop {
            let liftedness = match self.current_kind() {
                TokenKind::Punct(Punct::Apostrophe) => Liftedness::Unlifted,
                TokenKind::Punct(Punct::ApostropheTilde) => Liftedness::SizeLifted,
                TokenKind::Punct(Punct::ApostropheHat) => Liftedness::Lifted,
                TokenKind::Punct(Punct::LeftBracket) => {
                    let open = self.advance().span();
                    let name = self.expect_identifier()?;
                    let close = self.expect_closing(Punct::RightBracket, open, &[])?;
                    params.push(TypeParam::Size {
                        name,
                        span: open.merge(close),
                    });
                    continue;
                }
                _ => return Ok(params),
            };
            let start = self.advance().span();
            let name = self.expect_identifier()?;
            params.push(TypeParam::Type {
                span: start.merge(name.span),
                name,
                liftedness,
            });
        }
    }

    // ========================================================================
    // Type Bindings
    // ========================================================================

    /// Parses `type^ name params = t`.
    fn parse_type_binding(&mut self, doc: Option<EcoString>) -> ParseResult<TypeBinding> {
        let keyword = self.advance().span();
        let liftedness = self.parse_liftedness_marker();
        let name = self.expect_identifier()?;
        let params = self.parse_type_params()?;
        self.expect_punct(Punct::Equal)?;
        let definition = self.parse_type()?;
        Ok(TypeBinding {
            span: keyword.merge(definition.span()),
            liftedness,
            name,
            params,
            definition,
            doc,
        })
    }

    /// Consumes the `^` or `~` after `type`, if present.
    pub(super) fn parse_liftedness_marker(&mut self) -> Liftedness {
        if self.current_kind().is_operator("^") {
            self.advance();
            Liftedness::Lifted
        } else if self.eat_punct(Punct::Tilde).is_some() {
            Liftedness::SizeLifted
        } else {
            Liftedness::Unlifted
        }
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// Parses the string literal after `import`.
    pub(super) fn parse_import_path(&mut self) -> ParseResult<(EcoString, Span)> {
        let TokenKind::String { value, .. } = self.current_kind() else {
            return Err(self.unexpected(&["a string literal"]));
        };
        let path = value.clone();
        let span = self.advance().span();
        Ok((path, span))
    }

    /// Hands an import to the resolver, if there is one.
    pub(super) fn resolve_import(
        &mut self,
        path: &str,
        span: Span,
    ) -> ParseResult<Option<Box<Program>>> {
        let Some(resolver) = self.resolver.as_deref_mut() else {
            return Ok(None);
        };
        tracing::debug!(path, "resolving import");
        match resolver.resolve(path, span) {
            Ok(program) => Ok(Some(Box::new(program))),
            Err(error) => {
                tracing::debug!(path, error = %error, "import failed");
                Err(SyntaxError::new(
                    SyntaxErrorKind::ImportFailed {
                        path: path.into(),
                        reason: error.message,
                    },
                    span,
                ))
            }
        }
    }
}
