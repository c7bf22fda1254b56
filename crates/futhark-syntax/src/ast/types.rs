// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type expressions.

use ecow::EcoString;

use super::{Identifier, QualName};
use crate::source_analysis::Span;

/// A type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `i32`, `M.t`
    Named(QualName),

    /// `[n]t`, `[]t`
    Array {
        dimension: Dimension,
        element: Box<TypeExpr>,
        span: Span,
    },

    /// `()`
    Unit(Span),

    /// `(t)`, kept so spans stay exact.
    Parens(Box<TypeExpr>, Span),

    /// `(a, b, ...)` with at least two elements.
    Tuple { elements: Vec<TypeExpr>, span: Span },

    /// `{a: t, b: u}`, possibly empty.
    Record { fields: Vec<TypeField>, span: Span },

    /// `#a t | #b` with at least one constructor.
    Sum {
        constructors: Vec<SumConstructor>,
        span: Span,
    },

    /// `a -> b` or `(x: a) -> b`
    Function {
        param_name: Option<Identifier>,
        param: Box<TypeExpr>,
        result: Box<TypeExpr>,
        span: Span,
    },

    /// `vec [n] t`: one argument per node, left-nested.
    Application {
        head: Box<TypeExpr>,
        argument: TypeArg,
        span: Span,
    },

    /// `?[n][m].t`
    Existential {
        sizes: Vec<Identifier>,
        body: Box<TypeExpr>,
        span: Span,
    },

    /// `*t`: a unique (consumable) type.
    Unique { inner: Box<TypeExpr>, span: Span },
}

impl TypeExpr {
    /// Returns the span of this type.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Named(name) => name.span,
            Self::Unit(span) | Self::Parens(_, span) => *span,
            Self::Array { span, .. }
            | Self::Tuple { span, .. }
            | Self::Record { span, .. }
            | Self::Sum { span, .. }
            | Self::Function { span, .. }
            | Self::Application { span, .. }
            | Self::Existential { span, .. }
            | Self::Unique { span, .. } => *span,
        }
    }
}

/// An argument in a type application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArg {
    Type(Box<TypeExpr>),
    Dimension(Dimension),
}

impl TypeArg {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Type(ty) => ty.span(),
            Self::Dimension(dimension) => dimension.span,
        }
    }
}

/// A bracketed array size: `[]`, `[n]`, `[M.n]`, `[3]`.
///
/// The span includes the brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub kind: DimensionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionKind {
    Unknown,
    Named(QualName),
    /// Decimal digits, without separators.
    Literal(EcoString),
}

/// `name: t` inside a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeField {
    pub name: Identifier,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `#tag t u` inside a sum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumConstructor {
    pub tag: Identifier,
    pub arguments: Vec<TypeExpr>,
    pub span: Span,
}
