// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Module system parsing: module bindings, module expressions, module types
//! and the specs inside them.

use ecow::EcoString;

use crate::ast::{Declaration, ModuleExpression, ModuleParam, ModuleTypeExpression, Spec};
use crate::source_analysis::{Keyword, Punct, TokenKind};

use super::declarations::DECLARATION_START;
use super::{ParseResult, Parser};

const SPEC_START: &[&str] = &["`val`", "`type`", "`module`", "`include`", "`#[`"];

impl Parser<'_> {
    // ========================================================================
    // Module Bindings
    // ========================================================================

    /// Parses `module m params : s = e` or `module type s = t`.
    pub(super) fn parse_module_binding(
        &mut self,
        doc: Option<EcoString>,
    ) -> ParseResult<Declaration> {
        let keyword = self.advance().span();

        if self.eat_keyword(Keyword::Type).is_some() {
            let name = self.expect_identifier()?;
            self.expect_punct(Punct::Equal)?;
            let body = self.parse_module_type()?;
            return Ok(Declaration::ModuleType {
                span: keyword.merge(body.span()),
                name,
                body,
                doc,
            });
        }

        let name = self.expect_identifier()?;
        let mut params = Vec::new();
        while self.check_punct(Punct::LeftParen) {
            params.push(self.parse_module_param()?);
        }
        let signature = match self.eat_punct(Punct::Colon) {
            Some(_) => Some(self.parse_module_type()?),
            None => None,
        };
        self.expect_punct(Punct::Equal)?;
        let body = self.parse_module_expression()?;
        Ok(Declaration::Module {
            span: keyword.merge(body.span()),
            name,
            params,
            signature,
            body,
            doc,
        })
    }

    /// Parses `(p: s)`.
    fn parse_module_param(&mut self) -> ParseResult<ModuleParam> {
        let open = self.expect_punct(Punct::LeftParen)?;
        let name = self.expect_identifier()?;
        self.expect_punct(Punct::Colon)?;
        let signature = self.parse_module_type()?;
        let close = self.expect_closing(Punct::RightParen, open, &[])?;
        Ok(ModuleParam {
            name,
            signature,
            span: open.merge(close),
        })
    }

    // ========================================================================
    // Module Expressions
    // ========================================================================

    /// Parses a module expression.
    pub(super) fn parse_module_expression(&mut self) -> ParseResult<ModuleExpression> {
        self.nested(Self::parse_module_ascription)
    }

    fn parse_module_ascription(&mut self) -> ParseResult<ModuleExpression> {
        if self.check_punct(Punct::Backslash) {
            return self.parse_module_lambda();
        }
        let mut module = self.parse_module_application()?;
        while self.eat_punct(Punct::Colon).is_some() {
            let signature = self.parse_module_type()?;
            module = ModuleExpression::Ascription {
                span: module.span().merge(signature.span()),
                module: Box::new(module),
                signature,
            };
        }
        Ok(module)
    }

    /// Parses `\(p: s) : r -> m`.
    fn parse_module_lambda(&mut self) -> ParseResult<ModuleExpression> {
        let start = self.advance().span();
        let param = self.parse_module_param()?;
        // The result signature stops before `->`
        let result_signature = match self.eat_punct(Punct::Colon) {
            Some(_) => Some(self.nested(Self::parse_refined_module_type)?),
            None => None,
        };
        self.expect_punct(Punct::Arrow)?;
        let body = self.parse_module_expression()?;
        Ok(ModuleExpression::Lambda {
            span: start.merge(body.span()),
            param,
            result_signature,
            body: Box::new(body),
        })
    }

    /// Parses functor application by juxtaposition.
    fn parse_module_application(&mut self) -> ParseResult<ModuleExpression> {
        let mut module = self.parse_module_atom()?;
        while self.can_start_module_atom() {
            let argument = self.parse_module_atom()?;
            module = ModuleExpression::Application {
                span: module.span().merge(argument.span()),
                functor: Box::new(module),
                argument: Box::new(argument),
            };
        }
        Ok(module)
    }

    fn can_start_module_atom(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Identifier(_)
                | TokenKind::Keyword(Keyword::Import)
                | TokenKind::Punct(Punct::LeftParen | Punct::LeftBrace)
        )
    }

    fn parse_module_atom(&mut self) -> ParseResult<ModuleExpression> {
        match self.current_kind() {
            TokenKind::Identifier(_) => Ok(ModuleExpression::Name(self.parse_qual_name()?)),
            TokenKind::Keyword(Keyword::Import) => {
                let start = self.advance().span();
                let (path, path_span) = self.parse_import_path()?;
                let resolved = self.resolve_import(&path, path_span)?;
                Ok(ModuleExpression::Import {
                    path,
                    resolved,
                    span: start.merge(path_span),
                })
            }
            TokenKind::Punct(Punct::LeftParen) => {
                let open = self.advance().span();
                let module = self.parse_module_expression()?;
                let close = self.expect_closing(Punct::RightParen, open, &[])?;
                Ok(ModuleExpression::Parens(Box::new(module), open.merge(close)))
            }
            TokenKind::Punct(Punct::LeftBrace) => {
                let open = self.advance().span();
                let mut declarations = Vec::new();
                while !self.check_punct(Punct::RightBrace) && !self.is_at_end() {
                    declarations.push(self.nested(Self::parse_declaration)?);
                }
                let close = self.expect_closing(Punct::RightBrace, open, DECLARATION_START)?;
                Ok(ModuleExpression::Struct {
                    declarations,
                    span: open.merge(close),
                })
            }
            _ => Err(self.unexpected(&["a module expression"])),
        }
    }

    // ========================================================================
    // Module Types
    // ========================================================================

    /// Parses a module type, including functor signatures.
    pub(super) fn parse_module_type(&mut self) -> ParseResult<ModuleTypeExpression> {
        self.nested(Self::parse_functor_type)
    }

    /// Parses `(p: s1) -> s2`, `s1 -> s2`, or a refined module type.
    fn parse_functor_type(&mut self) -> ParseResult<ModuleTypeExpression> {
        let named = self.check_punct(Punct::LeftParen)
            && matches!(self.kind_at(1), TokenKind::Identifier(_))
            && self.kind_at(2).is_punct(Punct::Colon);
        if named {
            let open = self.advance().span();
            let param_name = self.expect_identifier()?;
            self.expect_punct(Punct::Colon)?;
            let param = self.parse_module_type()?;
            self.expect_closing(Punct::RightParen, open, &[])?;
            self.expect_punct(Punct::Arrow)?;
            let result = self.parse_module_type()?;
            return Ok(ModuleTypeExpression::Functor {
                span: open.merge(result.span()),
                param_name: Some(param_name),
                param: Box::new(param),
                result: Box::new(result),
            });
        }

        let param = self.parse_refined_module_type()?;
        if self.eat_punct(Punct::Arrow).is_none() {
            return Ok(param);
        }
        let result = self.parse_module_type()?;
        Ok(ModuleTypeExpression::Functor {
            span: param.span().merge(result.span()),
            param_name: None,
            param: Box::new(param),
            result: Box::new(result),
        })
    }

    /// Parses an atom followed by `with t params = type` refinements.
    fn parse_refined_module_type(&mut self) -> ParseResult<ModuleTypeExpression> {
        let mut signature = self.parse_module_type_atom()?;
        while self.eat_keyword(Keyword::With).is_some() {
            let type_name = self.parse_qual_name()?;
            let params = self.parse_type_params()?;
            self.expect_punct(Punct::Equal)?;
            let definition = self.parse_type()?;
            signature = ModuleTypeExpression::With {
                span: signature.span().merge(definition.span()),
                base: Box::new(signature),
                type_name,
                params,
                definition,
            };
        }
        Ok(signature)
    }

    fn parse_module_type_atom(&mut self) -> ParseResult<ModuleTypeExpression> {
        match self.current_kind() {
            TokenKind::Identifier(_) => Ok(ModuleTypeExpression::Name(self.parse_qual_name()?)),
            TokenKind::Punct(Punct::LeftParen) => {
                let open = self.advance().span();
                let signature = self.parse_module_type()?;
                let close = self.expect_closing(Punct::RightParen, open, &[])?;
                Ok(ModuleTypeExpression::Parens(
                    Box::new(signature),
                    open.merge(close),
                ))
            }
            TokenKind::Punct(Punct::LeftBrace) => {
                let open = self.advance().span();
                let mut specs = Vec::new();
                while !self.check_punct(Punct::RightBrace) && !self.is_at_end() {
                    specs.push(self.nested(Self::parse_spec)?);
                }
                let close = self.expect_closing(Punct::RightBrace, open, SPEC_START)?;
                Ok(ModuleTypeExpression::Specs {
                    specs,
                    span: open.merge(close),
                })
            }
            _ => Err(self.unexpected(&["a module type"])),
        }
    }

    // ========================================================================
    // Specs
    // ========================================================================

    /// Parses one spec together with its doc comment.
    fn parse_spec(&mut self) -> ParseResult<Spec> {
        let doc = self.collect_doc_comment();
        self.parse_spec_with_doc(doc)
    }

    fn parse_spec_with_doc(&mut self, doc: Option<EcoString>) -> ParseResult<Spec> {
        match self.current_kind() {
            TokenKind::Punct(Punct::AttributeOpen) => {
                let attribute = self.parse_attribute()?;
                let doc = doc.or_else(|| self.collect_doc_comment());
                let spec = self.nested(|parser| parser.parse_spec_with_doc(doc))?;
                Ok(Spec::Attributed {
                    span: attribute.span.merge(spec.span()),
                    attribute,
                    spec: Box::new(spec),
                })
            }
            TokenKind::Keyword(Keyword::Val) => {
                let start = self.advance().span();
                let name = self.parse_binding_name()?;
                let type_params = self.parse_type_params()?;
                self.expect_punct(Punct::Colon)?;
                let ty = self.parse_type()?;
                Ok(Spec::Value {
                    span: start.merge(ty.span()),
                    name,
                    type_params,
                    ty,
                    doc,
                })
            }
            TokenKind::Keyword(Keyword::Type) => {
                let start = self.advance().span();
                let liftedness = self.parse_liftedness_marker();
                let name = self.expect_identifier()?;
                let params = self.parse_type_params()?;
                let definition = match self.eat_punct(Punct::Equal) {
                    Some(_) => Some(self.parse_type()?),
                    None => None,
                };
                let end = definition
                    .as_ref()
                    .map(crate::ast::TypeExpr::span)
                    .or_else(|| params.last().map(crate::ast::TypeParam::span))
                    .unwrap_or(name.span);
                Ok(Spec::Type {
                    span: start.merge(end),
                    liftedness,
                    name,
                    params,
                    definition,
                    doc,
                })
            }
            TokenKind::Keyword(Keyword::Module) => {
                let start = self.advance().span();
                let name = self.expect_identifier()?;
                self.expect_punct(Punct::Colon)?;
                let signature = self.parse_module_type()?;
                Ok(Spec::Module {
                    span: start.merge(signature.span()),
                    name,
                    signature,
                    doc,
                })
            }
            TokenKind::Keyword(Keyword::Include) => {
                let start = self.advance().span();
                let signature = self.parse_module_type()?;
                Ok(Spec::Include {
                    span: start.merge(signature.span()),
                    signature,
                })
            }
            _ => Err(self.unexpected(SPEC_START)),
        }
    }
}
