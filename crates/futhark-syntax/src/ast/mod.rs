// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Futhark.
//!
//! The AST is the direct result of parsing: no names are resolved, no types
//! are checked, and nothing is desugared. Every node carries a [`Span`]
//! covering exactly its source text. Parenthesized forms are kept as
//! `Parens` nodes so that an outer node's span never has to guess where a
//! closing parenthesis was.
//!
//! The tree is split by syntactic category:
//!
//! - [`expression`]: values, operators, control flow
//! - [`types`]: type expressions and array dimensions
//! - [`pattern`]: binding patterns
//! - [`declaration`]: top-level declarations, module expressions and
//!   signatures
//!
//! # Example
//!
//! ```
//! use futhark_syntax::ast::{Declaration, Expression};
//! use futhark_syntax::parse_program;
//!
//! let program = parse_program("def double x = x * 2").unwrap();
//! let Declaration::Value(binding) = &program.declarations[0] else {
//!     panic!("expected a value binding");
//! };
//! assert!(matches!(binding.body, Expression::Infix { .. }));
//! ```

pub mod declaration;
pub mod expression;
pub mod pattern;
pub mod types;

use std::fmt;

use ecow::EcoString;

use crate::source_analysis::{IntLiteral, OperatorClass, Span, classify};

pub use declaration::{
    BindingKind, BindingName, Declaration, Liftedness, ModuleExpression, ModuleParam,
    ModuleTypeExpression, Spec, TypeBinding, TypeParam, ValueBinding,
};
pub use expression::{
    DimIndex, Expression, LetBinding, Literal, LoopForm, MatchCase, RangeKind, RecordField,
    UpdatePath,
};
pub use pattern::{Pattern, RecordPatternField};
pub use types::{Dimension, DimensionKind, SumConstructor, TypeArg, TypeExpr, TypeField};

/// A parsed source file: its declarations in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    /// Covers the whole source text.
    pub span: Span,
}

/// A single name with its location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: EcoString,
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A possibly qualified name: `x`, `f32.sqrt`, `M.N.t`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualName {
    /// Module path before the final name, outermost first.
    pub qualifiers: Vec<Identifier>,
    pub name: Identifier,
    pub span: Span,
}

impl fmt::Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for qualifier in &self.qualifiers {
            write!(f, "{qualifier}.")?;
        }
        write!(f, "{}", self.name)
    }
}

/// One occurrence of an operator symbol, infix or in a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorName {
    pub symbol: EcoString,
    pub span: Span,
}

impl OperatorName {
    #[must_use]
    pub fn new(symbol: impl Into<EcoString>, span: Span) -> Self {
        Self {
            symbol: symbol.into(),
            span,
        }
    }

    /// The operator's precedence class, derived from its spelling.
    #[must_use]
    pub fn class(&self) -> Option<OperatorClass> {
        classify(&self.symbol)
    }
}

/// An attribute: `#[inline]`, `#[unroll(4)]`, `#[3]`.
///
/// Attributes are opaque to the parser; they decorate expressions,
/// patterns, declarations and specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    Name(EcoString),
    Integer(IntLiteral),
    Call {
        name: EcoString,
        arguments: Vec<Attribute>,
    },
}
