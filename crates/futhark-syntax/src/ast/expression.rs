// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expressions.

use ecow::EcoString;

use super::{Attribute, Identifier, OperatorName, Pattern, QualName, TypeExpr, TypeParam};
use crate::source_analysis::{FloatLiteral, IntLiteral, Span};

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal, Span),

    Variable(QualName),

    /// `(e)`, kept so spans stay exact.
    Parens(Box<Expression>, Span),

    /// `()`
    Unit(Span),

    /// `(a, b, ...)` with at least two elements.
    Tuple {
        elements: Vec<Expression>,
        span: Span,
    },

    /// `{a = e, b}`; duplicate field names are not rejected here.
    Record {
        fields: Vec<RecordField>,
        span: Span,
    },

    /// `[a, b, ...]`, possibly empty.
    Array {
        elements: Vec<Expression>,
        span: Span,
    },

    /// `a .. b`, `a .. s ... b`, `a ..< b`, `a .. s ..> b` and so on.
    Range {
        start: Box<Expression>,
        step: Option<Box<Expression>>,
        end: Box<Expression>,
        kind: RangeKind,
        span: Span,
    },

    /// Function application by juxtaposition: `f x`.
    Application {
        function: Box<Expression>,
        argument: Box<Expression>,
        span: Span,
    },

    Infix {
        operator: OperatorName,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },

    /// Prefix `-e`.
    Negate {
        operand: Box<Expression>,
        span: Span,
    },

    /// Prefix `!e`.
    Not {
        operand: Box<Expression>,
        span: Span,
    },

    /// A sum type constructor with its payload: `#some x`, `#none`.
    Constructor {
        tag: Identifier,
        arguments: Vec<Expression>,
        span: Span,
    },

    /// `e : t`
    Ascription {
        expression: Box<Expression>,
        ty: TypeExpr,
        span: Span,
    },

    /// `e :> t`
    Coerce {
        expression: Box<Expression>,
        ty: TypeExpr,
        span: Span,
    },

    /// `a[i, j:k]`; the bracket must touch the indexed expression.
    Index {
        base: Box<Expression>,
        indices: Vec<DimIndex>,
        span: Span,
    },

    /// `e.a.0`: field projection chain.
    Project {
        base: Box<Expression>,
        fields: Vec<Identifier>,
        span: Span,
    },

    /// `M.(e)`: evaluate `e` with module `M` opened.
    QualifiedParens {
        module: QualName,
        expression: Box<Expression>,
        span: Span,
    },

    /// `(+)`
    Section { operator: OperatorName, span: Span },

    /// `(e +)`
    LeftSection {
        operand: Box<Expression>,
        operator: OperatorName,
        span: Span,
    },

    /// `(+ e)`
    RightSection {
        operator: OperatorName,
        operand: Box<Expression>,
        span: Span,
    },

    /// `(.a.b)`
    ProjectSection { fields: Vec<Identifier>, span: Span },

    /// `e with [i] = v` or `e with a.b = v`
    Update {
        target: Box<Expression>,
        path: UpdatePath,
        value: Box<Expression>,
        span: Span,
    },

    If {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
        span: Span,
    },

    Let {
        binding: Box<LetBinding>,
        body: Box<Expression>,
        span: Span,
    },

    Loop {
        parameter: Pattern,
        initial: Option<Box<Expression>>,
        form: Box<LoopForm>,
        body: Box<Expression>,
        span: Span,
    },

    Match {
        scrutinee: Box<Expression>,
        cases: Vec<MatchCase>,
        span: Span,
    },

    /// `\x y : t -> e`
    Lambda {
        parameters: Vec<Pattern>,
        return_type: Option<TypeExpr>,
        body: Box<Expression>,
        span: Span,
    },

    /// `assert c e`
    Assert {
        condition: Box<Expression>,
        body: Box<Expression>,
        span: Span,
    },

    Unsafe {
        body: Box<Expression>,
        span: Span,
    },

    /// `#[attr] e`
    Attributed {
        attribute: Attribute,
        expression: Box<Expression>,
        span: Span,
    },
}

impl Expression {
    /// Returns the span of this expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(_, span) | Self::Parens(_, span) | Self::Unit(span) => *span,
            Self::Variable(name) => name.span,
            Self::Tuple { span, .. }
            | Self::Record { span, .. }
            | Self::Array { span, .. }
            | Self::Range { span, .. }
            | Self::Application { span, .. }
            | Self::Infix { span, .. }
            | Self::Negate { span, .. }
            | Self::Not { span, .. }
            | Self::Constructor { span, .. }
            | Self::Ascription { span, .. }
            | Self::Coerce { span, .. }
            | Self::Index { span, .. }
            | Self::Project { span, .. }
            | Self::QualifiedParens { span, .. }
            | Self::Section { span, .. }
            | Self::LeftSection { span, .. }
            | Self::RightSection { span, .. }
            | Self::ProjectSection { span, .. }
            | Self::Update { span, .. }
            | Self::If { span, .. }
            | Self::Let { span, .. }
            | Self::Loop { span, .. }
            | Self::Match { span, .. }
            | Self::Lambda { span, .. }
            | Self::Assert { span, .. }
            | Self::Unsafe { span, .. }
            | Self::Attributed { span, .. } => *span,
        }
    }

    /// Strips any number of enclosing `Parens` nodes.
    #[must_use]
    pub fn unparenthesized(&self) -> &Self {
        let mut expression = self;
        while let Self::Parens(inner, _) = expression {
            expression = inner;
        }
        expression
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Integer(IntLiteral),
    Float(FloatLiteral),
    /// Decoded string contents.
    String(EcoString),
    Character(char),
    Bool(bool),
}

/// Which ends of a range are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// `a .. b` and `a .. s ... b`
    Inclusive,
    /// `a ..< b`: counts up, excludes `b`
    ExclusiveBelow,
    /// `a ..> b`: counts down, excludes `b`
    ExclusiveAbove,
}

/// One field of a record literal.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordField {
    /// `name = value`
    Explicit {
        name: Identifier,
        value: Expression,
        span: Span,
    },
    /// `name`, standing for `name = name`
    Shorthand(Identifier),
}

impl RecordField {
    #[must_use]
    pub fn name(&self) -> &Identifier {
        match self {
            Self::Explicit { name, .. } | Self::Shorthand(name) => name,
        }
    }
}

/// One position inside `a[...]`.
#[derive(Debug, Clone, PartialEq)]
pub enum DimIndex {
    /// A fixed index: `a[i]`
    Fix(Expression),
    /// A slice `a[i:j:s]`; any part may be omitted.
    Slice {
        start: Option<Expression>,
        end: Option<Expression>,
        stride: Option<Expression>,
        span: Span,
    },
}

/// What a `with` update replaces.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePath {
    /// `e with [i, j] = v`
    Index { indices: Vec<DimIndex>, span: Span },
    /// `e with a.b = v`
    Field(Vec<Identifier>),
}

/// The binding part of a `let` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LetBinding {
    /// `let p = e`
    Pattern { pattern: Pattern, value: Expression },
    /// `let f 't [n] x y : t = e`
    Function {
        name: Identifier,
        type_params: Vec<TypeParam>,
        params: Vec<Pattern>,
        return_type: Option<TypeExpr>,
        value: Expression,
    },
    /// `let a[i] = e`: in-place update of an array variable.
    Update {
        name: Identifier,
        indices: Vec<DimIndex>,
        value: Expression,
    },
}

/// How a `loop` iterates.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopForm {
    /// `for i < n`
    For { name: Identifier, bound: Expression },
    /// `for x in xs`
    ForIn { pattern: Pattern, source: Expression },
    /// `while c`
    While(Expression),
}

/// `case p -> e`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Expression,
    pub span: Span,
}
