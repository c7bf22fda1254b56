// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declarations, module expressions and module types.

use ecow::EcoString;

use super::{Attribute, Expression, Identifier, OperatorName, Pattern, Program, QualName, TypeExpr};
use crate::source_analysis::Span;

/// A top-level (or module-level) declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `def`, `entry` or `let` binding.
    Value(ValueBinding),

    /// `type t = ...`
    Type(TypeBinding),

    /// `module m (p: s) : s = e`
    Module {
        name: Identifier,
        params: Vec<ModuleParam>,
        signature: Option<ModuleTypeExpression>,
        body: ModuleExpression,
        doc: Option<EcoString>,
        span: Span,
    },

    /// `module type s = e`
    ModuleType {
        name: Identifier,
        body: ModuleTypeExpression,
        doc: Option<EcoString>,
        span: Span,
    },

    /// `open e`
    Open { module: ModuleExpression, span: Span },

    /// `import "path"`. When an import resolver was supplied, `resolved`
    /// holds the imported program.
    Import {
        path: EcoString,
        resolved: Option<Box<Program>>,
        span: Span,
    },

    /// `local d`
    Local { declaration: Box<Declaration>, span: Span },

    /// `#[attr] d`
    Attributed {
        attribute: Attribute,
        declaration: Box<Declaration>,
        span: Span,
    },
}

impl Declaration {
    /// Returns the span of this declaration.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Value(binding) => binding.span,
            Self::Type(binding) => binding.span,
            Self::Module { span, .. }
            | Self::ModuleType { span, .. }
            | Self::Open { span, .. }
            | Self::Import { span, .. }
            | Self::Local { span, .. }
            | Self::Attributed { span, .. } => *span,
        }
    }

    /// The doc comment attached to this declaration, if any.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        match self {
            Self::Value(binding) => binding.doc.as_deref(),
            Self::Type(binding) => binding.doc.as_deref(),
            Self::Module { doc, .. } | Self::ModuleType { doc, .. } => doc.as_deref(),
            Self::Local { declaration, .. } | Self::Attributed { declaration, .. } => {
                declaration.doc()
            }
            Self::Open { .. } | Self::Import { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Def,
    Entry,
    Let,
}

impl BindingKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Def => "def",
            Self::Entry => "entry",
            Self::Let => "let",
        }
    }
}

/// The name a value binding defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingName {
    Name(Identifier),
    /// `(+++)`, or the operator of the infix form `def x +++ y`.
    Operator(OperatorName),
}

impl BindingName {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Name(name) => &name.name,
            Self::Operator(operator) => &operator.symbol,
        }
    }
}

/// `def f 't [n] (x: t) : t = e`
///
/// The infix form `def x +++ y = e` is stored as the operator name with
/// exactly two parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueBinding {
    pub kind: BindingKind,
    pub name: BindingName,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Pattern>,
    pub return_type: Option<TypeExpr>,
    pub body: Expression,
    pub doc: Option<EcoString>,
    pub span: Span,
}

/// `type`, `type^` (lifted) or `type~` (size-lifted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liftedness {
    Unlifted,
    SizeLifted,
    Lifted,
}

impl Liftedness {
    /// The marker written after `type` or `'`.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Unlifted => "",
            Self::SizeLifted => "~",
            Self::Lifted => "^",
        }
    }
}

/// `type^ t 'a [n] = ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    pub liftedness: Liftedness,
    pub name: Identifier,
    pub params: Vec<TypeParam>,
    pub definition: TypeExpr,
    pub doc: Option<EcoString>,
    pub span: Span,
}

/// A type or size parameter of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeParam {
    /// `[n]`; the span includes the brackets.
    Size { name: Identifier, span: Span },
    /// `'t`, `'^t`, `'~t`
    Type {
        name: Identifier,
        liftedness: Liftedness,
        span: Span,
    },
}

impl TypeParam {
    #[must_use]
    pub fn name(&self) -> &Identifier {
        match self {
            Self::Size { name, .. } | Self::Type { name, .. } => name,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Size { span, .. } | Self::Type { span, .. } => *span,
        }
    }
}

/// `(p: s)`, a functor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleParam {
    pub name: Identifier,
    pub signature: ModuleTypeExpression,
    pub span: Span,
}

/// A module expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleExpression {
    /// `{ decls }`
    Struct {
        declarations: Vec<Declaration>,
        span: Span,
    },
    Name(QualName),
    Parens(Box<ModuleExpression>, Span),
    /// `import "path"` used as a module.
    Import {
        path: EcoString,
        resolved: Option<Box<Program>>,
        span: Span,
    },
    /// Functor application `f m`.
    Application {
        functor: Box<ModuleExpression>,
        argument: Box<ModuleExpression>,
        span: Span,
    },
    /// `m : s`
    Ascription {
        module: Box<ModuleExpression>,
        signature: ModuleTypeExpression,
        span: Span,
    },
    /// `\(p: s) : s -> m`
    Lambda {
        param: ModuleParam,
        result_signature: Option<ModuleTypeExpression>,
        body: Box<ModuleExpression>,
        span: Span,
    },
}

impl ModuleExpression {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Name(name) => name.span,
            Self::Parens(_, span)
            | Self::Struct { span, .. }
            | Self::Import { span, .. }
            | Self::Application { span, .. }
            | Self::Ascription { span, .. }
            | Self::Lambda { span, .. } => *span,
        }
    }
}

/// A module type (signature) expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleTypeExpression {
    /// `{ specs }`
    Specs { specs: Vec<Spec>, span: Span },
    Name(QualName),
    Parens(Box<ModuleTypeExpression>, Span),
    /// `s with t 'a = u`
    With {
        base: Box<ModuleTypeExpression>,
        type_name: QualName,
        params: Vec<TypeParam>,
        definition: TypeExpr,
        span: Span,
    },
    /// `(p: s1) -> s2` or `s1 -> s2`
    Functor {
        param_name: Option<Identifier>,
        param: Box<ModuleTypeExpression>,
        result: Box<ModuleTypeExpression>,
        span: Span,
    },
}

impl ModuleTypeExpression {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Name(name) => name.span,
            Self::Parens(_, span)
            | Self::Specs { span, .. }
            | Self::With { span, .. }
            | Self::Functor { span, .. } => *span,
        }
    }
}

/// One item of a signature.
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    /// `val f 'a : a -> a`
    Value {
        name: BindingName,
        type_params: Vec<TypeParam>,
        ty: TypeExpr,
        doc: Option<EcoString>,
        span: Span,
    },
    /// `type t`, `type^ t 'a = u`
    Type {
        liftedness: Liftedness,
        name: Identifier,
        params: Vec<TypeParam>,
        definition: Option<TypeExpr>,
        doc: Option<EcoString>,
        span: Span,
    },
    /// `module m : s`
    Module {
        name: Identifier,
        signature: ModuleTypeExpression,
        doc: Option<EcoString>,
        span: Span,
    },
    /// `include s`
    Include {
        signature: ModuleTypeExpression,
        span: Span,
    },
    Attributed {
        attribute: Attribute,
        spec: Box<Spec>,
        span: Span,
    },
}

impl Spec {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Value { span, .. }
            | Self::Type { span, .. }
            | Self::Module { span, .. }
            | Self::Include { span, .. }
            | Self::Attributed { span, .. } => *span,
        }
    }
}
