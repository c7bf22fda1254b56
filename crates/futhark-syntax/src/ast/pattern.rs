// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Binding patterns.

use super::{Attribute, Identifier, TypeExpr};
use crate::source_analysis::{IntLiteral, Span};

/// A pattern, as found in `let`, function parameters, `loop` and `case`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Identifier(Identifier),

    /// `_`
    Wildcard(Span),

    /// An integer literal, optionally negated: `0`, `-1`.
    Literal {
        negative: bool,
        value: IntLiteral,
        span: Span,
    },

    /// `()`
    Unit(Span),

    /// `(p)`, kept so spans stay exact.
    Parens(Box<Pattern>, Span),

    /// `(a, b, ...)` with at least two elements.
    Tuple { elements: Vec<Pattern>, span: Span },

    /// `{a, b = p, c: t}`
    Record {
        fields: Vec<RecordPatternField>,
        span: Span,
    },

    /// `#some x`, `#none`
    Constructor {
        tag: Identifier,
        arguments: Vec<Pattern>,
        span: Span,
    },

    /// `p : t`
    Ascription {
        pattern: Box<Pattern>,
        ty: TypeExpr,
        span: Span,
    },

    /// `#[attr] p`
    Attributed {
        attribute: Attribute,
        pattern: Box<Pattern>,
        span: Span,
    },
}

impl Pattern {
    /// Returns the span of this pattern.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Identifier(name) => name.span,
            Self::Wildcard(span) | Self::Unit(span) | Self::Parens(_, span) => *span,
            Self::Literal { span, .. }
            | Self::Tuple { span, .. }
            | Self::Record { span, .. }
            | Self::Constructor { span, .. }
            | Self::Ascription { span, .. }
            | Self::Attributed { span, .. } => *span,
        }
    }

    /// Names bound by this pattern, in source order.
    #[must_use]
    pub fn bound_names(&self) -> Vec<&Identifier> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a Identifier>) {
        match self {
            Self::Identifier(name) => names.push(name),
            Self::Wildcard(_) | Self::Literal { .. } | Self::Unit(_) => {}
            Self::Parens(inner, _)
            | Self::Ascription { pattern: inner, .. }
            | Self::Attributed { pattern: inner, .. } => inner.collect_names(names),
            Self::Tuple { elements, .. }
            | Self::Constructor {
                arguments: elements,
                ..
            } => {
                for element in elements {
                    element.collect_names(names);
                }
            }
            Self::Record { fields, .. } => {
                for field in fields {
                    match &field.pattern {
                        Some(pattern) => pattern.collect_names(names),
                        None => names.push(&field.name),
                    }
                }
            }
        }
    }
}

/// One field of a record pattern.
///
/// `{a}` has no subpattern; `{a = p}` has `p`; `{a: t}` is stored as the
/// subpattern `a : t`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPatternField {
    pub name: Identifier,
    pub pattern: Option<Pattern>,
    pub span: Span,
}
