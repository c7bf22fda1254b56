// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rendering of syntax trees back to Futhark source.
//!
//! The output is canonical and fully parenthesized: `Parens` nodes are
//! dropped and every compound expression or type gets exactly one pair of
//! parentheses of its own. Parsing the output and rendering it again gives
//! the same text, which makes the renderer a test oracle for grouping.
//!
//! ```
//! use futhark_syntax::parse_expression;
//! use futhark_syntax::unparse::unparse_expression;
//!
//! let expression = parse_expression("a + b * c").unwrap();
//! assert_eq!(unparse_expression(&expression), "(a + (b * c))");
//! ```

pub mod document;

use crate::ast::{
    Attribute, AttributeKind, BindingName, Declaration, DimIndex, Dimension, DimensionKind,
    Expression, LetBinding, Literal, LoopForm, ModuleExpression, ModuleParam,
    ModuleTypeExpression, Pattern, Program, QualName, RangeKind, RecordField, RecordPatternField,
    Spec, SumConstructor, TypeArg, TypeExpr, TypeParam, UpdatePath, ValueBinding,
};
use crate::docvec;
use crate::source_analysis::{STACK_GROWTH, STACK_RED_ZONE};
use document::{Document, Documentable, INDENT, join, line, nest, nil};

/// Renders a whole program, one blank line between declarations.
#[must_use]
pub fn unparse_program(program: &Program) -> String {
    if program.declarations.is_empty() {
        return String::new();
    }
    let mut output = declarations(&program.declarations).to_pretty_string();
    output.push('\n');
    output
}

#[must_use]
pub fn unparse_declaration(declaration: &Declaration) -> String {
    self::declaration(declaration).to_pretty_string()
}

#[must_use]
pub fn unparse_expression(expression: &Expression) -> String {
    self::expression(expression).to_pretty_string()
}

#[must_use]
pub fn unparse_type(ty: &TypeExpr) -> String {
    type_expr(ty).to_pretty_string()
}

#[must_use]
pub fn unparse_pattern(pattern: &Pattern) -> String {
    self::pattern(pattern).to_pretty_string()
}

fn comma() -> Document<'static> {
    Document::Str(", ")
}

fn parenthesized(doc: Document<'_>) -> Document<'_> {
    docvec!["(", doc, ")"]
}

// ============================================================================
// Names, literals, attributes
// ============================================================================

fn qual_name(name: &QualName) -> Document<'_> {
    let mut docs = Vec::with_capacity(name.qualifiers.len() * 2 + 1);
    for qualifier in &name.qualifiers {
        docs.push(Document::Str(&qualifier.name));
        docs.push(Document::Str("."));
    }
    docs.push(Document::Str(&name.name.name));
    Document::Vec(docs)
}

fn literal(literal: &Literal) -> Document<'_> {
    match literal {
        Literal::Integer(value) => value.to_string().to_doc(),
        Literal::Float(value) => value.to_string().to_doc(),
        Literal::String(value) => quoted(value).to_doc(),
        Literal::Character(c) => character(*c).to_doc(),
        Literal::Bool(true) => "true".to_doc(),
        Literal::Bool(false) => "false".to_doc(),
    }
}

fn quoted(value: &str) -> String {
    let mut output = String::with_capacity(value.len() + 2);
    output.push('"');
    for c in value.chars() {
        match c {
            '"' => output.push_str("\\\""),
            _ => push_escaped(&mut output, c),
        }
    }
    output.push('"');
    output
}

fn character(c: char) -> String {
    let mut output = String::from("'");
    match c {
        '\'' => output.push_str("\\'"),
        _ => push_escaped(&mut output, c),
    }
    output.push('\'');
    output
}

fn push_escaped(output: &mut String, c: char) {
    match c {
        '\\' => output.push_str("\\\\"),
        '\n' => output.push_str("\\n"),
        '\t' => output.push_str("\\t"),
        '\r' => output.push_str("\\r"),
        _ => output.push(c),
    }
}

fn attribute(attribute: &Attribute) -> Document<'_> {
    docvec!["#[", attribute_info(attribute), "]"]
}

fn attribute_info(attribute: &Attribute) -> Document<'_> {
    match &attribute.kind {
        AttributeKind::Name(name) => name.as_str().to_doc(),
        AttributeKind::Integer(value) => value.to_string().to_doc(),
        AttributeKind::Call { name, arguments } => docvec![
            name.as_str(),
            "(",
            join(arguments.iter().map(attribute_info), &comma()),
            ")"
        ],
    }
}

// ============================================================================
// Expressions
// ============================================================================

fn expression(expression: &Expression) -> Document<'_> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || expression_doc(expression))
}

fn expression_doc(expression: &Expression) -> Document<'_> {
    match expression {
        Expression::Literal(value, _) => literal(value),
        Expression::Variable(name) => qual_name(name),
        Expression::Parens(inner, _) => self::expression(inner),
        Expression::Unit(_) => "()".to_doc(),
        Expression::Tuple { elements, .. } => {
            parenthesized(join(elements.iter().map(self::expression), &comma()))
        }
        Expression::Record { fields, .. } => docvec![
            "{",
            join(fields.iter().map(record_field), &comma()),
            "}"
        ],
        Expression::Array { elements, .. } => docvec![
            "[",
            join(elements.iter().map(self::expression), &comma()),
            "]"
        ],
        Expression::Range {
            start,
            step,
            end,
            kind,
            ..
        } => {
            let mut docs = vec![Document::Str("("), self::expression(start)];
            if let Some(step) = step {
                docs.push(Document::Str(" .. "));
                docs.push(self::expression(step));
            }
            docs.push(docvec![
                " ",
                range_end_operator(*kind, step.is_some()),
                " ",
                self::expression(end),
                ")"
            ]);
            Document::Vec(docs)
        }
        Expression::Application {
            function,
            argument,
            ..
        } => parenthesized(docvec![
            juxtaposition_head(function),
            " ",
            self::expression(argument)
        ]),
        Expression::Infix {
            operator,
            left,
            right,
            ..
        } => parenthesized(docvec![
            self::expression(left),
            " ",
            operator.symbol.as_str(),
            " ",
            self::expression(right)
        ]),
        Expression::Negate { operand, .. } => docvec!["(-", self::expression(operand), ")"],
        Expression::Not { operand, .. } => docvec!["(!", self::expression(operand), ")"],
        Expression::Constructor { tag, arguments, .. } => {
            if arguments.is_empty() {
                return docvec!["#", tag.name.as_str()];
            }
            let mut docs = vec![Document::Str("(#"), Document::Str(&tag.name)];
            for argument in arguments {
                docs.push(Document::Str(" "));
                docs.push(self::expression(argument));
            }
            docs.push(Document::Str(")"));
            Document::Vec(docs)
        }
        Expression::Ascription { expression, ty, .. } => {
            parenthesized(docvec![self::expression(expression), " : ", type_expr(ty)])
        }
        Expression::Coerce { expression, ty, .. } => {
            parenthesized(docvec![self::expression(expression), " :> ", type_expr(ty)])
        }
        Expression::Index { base, indices, .. } => {
            docvec![juxtaposition_head(base), indices_doc(indices)]
        }
        Expression::Project { base, fields, .. } => {
            let base_doc = match base.unparenthesized() {
                base @ (Expression::Variable(_) | Expression::Literal(..)) => {
                    parenthesized(self::expression(base))
                }
                base => juxtaposition_head(base),
            };
            let mut docs = vec![base_doc];
            for field in fields {
                docs.push(Document::Str("."));
                docs.push(Document::Str(&field.name));
            }
            Document::Vec(docs)
        }
        Expression::QualifiedParens {
            module, expression, ..
        } => docvec![qual_name(module), ".(", self::expression(expression), ")"],
        Expression::Section { operator, .. } => parenthesized(operator.symbol.as_str().to_doc()),
        Expression::LeftSection {
            operand, operator, ..
        } => parenthesized(docvec![
            self::expression(operand),
            " ",
            operator.symbol.as_str()
        ]),
        Expression::RightSection {
            operator, operand, ..
        } => parenthesized(docvec![
            operator.symbol.as_str(),
            " ",
            self::expression(operand)
        ]),
        Expression::ProjectSection { fields, .. } => {
            let mut docs = vec![Document::Str("(")];
            for field in fields {
                docs.push(Document::Str("."));
                docs.push(Document::Str(&field.name));
            }
            docs.push(Document::Str(")"));
            Document::Vec(docs)
        }
        Expression::Update {
            target,
            path,
            value,
            ..
        } => {
            let path = match path {
                UpdatePath::Index { indices, .. } => indices_doc(indices),
                UpdatePath::Field(fields) => join(
                    fields.iter().map(|field| Document::Str(&field.name)),
                    &Document::Str("."),
                ),
            };
            parenthesized(docvec![
                self::expression(target),
                " with ",
                path,
                " = ",
                self::expression(value)
            ])
        }
        Expression::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => parenthesized(docvec![
            "if ",
            self::expression(condition),
            " then ",
            self::expression(then_branch),
            " else ",
            self::expression(else_branch)
        ]),
        Expression::Let { binding, body, .. } => parenthesized(docvec![
            "let ",
            let_binding(binding),
            " in ",
            self::expression(body)
        ]),
        Expression::Loop {
            parameter,
            initial,
            form,
            body,
            ..
        } => {
            let initial = match initial {
                Some(initial) => docvec![" = ", self::expression(initial)],
                None => nil(),
            };
            let form = match &**form {
                LoopForm::For { name, bound } => {
                    docvec![" for ", name.name.as_str(), " < ", self::expression(bound)]
                }
                LoopForm::ForIn { pattern, source } => {
                    docvec![" for ", self::pattern(pattern), " in ", self::expression(source)]
                }
                LoopForm::While(condition) => docvec![" while ", self::expression(condition)],
            };
            parenthesized(docvec![
                "loop ",
                self::pattern(parameter),
                initial,
                form,
                " do ",
                self::expression(body)
            ])
        }
        Expression::Match {
            scrutinee, cases, ..
        } => {
            let mut docs = vec![Document::Str("(match "), self::expression(scrutinee)];
            for case in cases {
                docs.push(docvec![
                    " case ",
                    self::pattern(&case.pattern),
                    " -> ",
                    self::expression(&case.body)
                ]);
            }
            docs.push(Document::Str(")"));
            Document::Vec(docs)
        }
        Expression::Lambda {
            parameters,
            return_type,
            body,
            ..
        } => {
            let return_type = match return_type {
                Some(ty) => docvec![" : ", type_term(ty)],
                None => nil(),
            };
            docvec![
                "(\\",
                join(parameters.iter().map(parameter), &Document::Str(" ")),
                return_type,
                " -> ",
                self::expression(body),
                ")"
            ]
        }
        Expression::Assert {
            condition, body, ..
        } => parenthesized(docvec![
            "assert ",
            self::expression(condition),
            " ",
            self::expression(body)
        ]),
        Expression::Unsafe { body, .. } => {
            parenthesized(docvec!["unsafe ", self::expression(body)])
        }
        Expression::Attributed {
            attribute,
            expression,
            ..
        } => parenthesized(docvec![
            self::attribute(attribute),
            " ",
            self::expression(expression)
        ]),
    }
}

/// Renders an expression in front of an argument, index or projection,
/// where a bare constructor would swallow what follows.
fn juxtaposition_head(expression: &Expression) -> Document<'_> {
    match expression.unparenthesized() {
        constructor @ Expression::Constructor { arguments, .. } if arguments.is_empty() => {
            parenthesized(self::expression(constructor))
        }
        other => self::expression(other),
    }
}

fn range_end_operator(kind: RangeKind, stepped: bool) -> &'static str {
    match kind {
        RangeKind::Inclusive if stepped => "...",
        RangeKind::Inclusive => "..",
        RangeKind::ExclusiveBelow => "..<",
        RangeKind::ExclusiveAbove => "..>",
    }
}

fn record_field(field: &RecordField) -> Document<'_> {
    match field {
        RecordField::Explicit { name, value, .. } => {
            docvec![name.name.as_str(), " = ", expression(value)]
        }
        RecordField::Shorthand(name) => name.name.as_str().to_doc(),
    }
}

fn indices_doc(indices: &[DimIndex]) -> Document<'_> {
    docvec!["[", join(indices.iter().map(dim_index), &comma()), "]"]
}

fn dim_index(index: &DimIndex) -> Document<'_> {
    match index {
        DimIndex::Fix(index) => expression(index),
        DimIndex::Slice {
            start, end, stride, ..
        } => {
            let stride = match stride {
                Some(stride) => docvec![":", expression(stride)],
                None => nil(),
            };
            docvec![
                optional_expression(start.as_ref()),
                ":",
                optional_expression(end.as_ref()),
                stride
            ]
        }
    }
}

fn optional_expression(part: Option<&Expression>) -> Document<'_> {
    match part {
        Some(part) => expression(part),
        None => nil(),
    }
}

fn let_binding(binding: &LetBinding) -> Document<'_> {
    match binding {
        LetBinding::Pattern { pattern, value } => {
            docvec![self::pattern(pattern), " = ", expression(value)]
        }
        LetBinding::Function {
            name,
            type_params,
            params,
            return_type,
            value,
        } => docvec![
            name.name.as_str(),
            type_params_doc(type_params),
            params_doc(params),
            return_type_doc(return_type.as_ref()),
            " = ",
            expression(value)
        ],
        LetBinding::Update {
            name,
            indices,
            value,
        } => docvec![
            name.name.as_str(),
            indices_doc(indices),
            " = ",
            expression(value)
        ],
    }
}

// ============================================================================
// Types
// ============================================================================

fn type_expr(ty: &TypeExpr) -> Document<'_> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || type_doc(ty))
}

fn type_doc(ty: &TypeExpr) -> Document<'_> {
    match ty {
        TypeExpr::Named(name) => qual_name(name),
        TypeExpr::Array {
            dimension,
            element,
            ..
        } => docvec![self::dimension(dimension), type_term(element)],
        TypeExpr::Unit(_) => "()".to_doc(),
        TypeExpr::Parens(inner, _) => type_expr(inner),
        TypeExpr::Tuple { elements, .. } => {
            parenthesized(join(elements.iter().map(type_expr), &comma()))
        }
        TypeExpr::Record { fields, .. } => docvec![
            "{",
            join(
                fields
                    .iter()
                    .map(|field| docvec![field.name.name.as_str(), ": ", type_expr(&field.ty)]),
                &comma(),
            ),
            "}"
        ],
        TypeExpr::Sum { constructors, .. } => join(
            constructors.iter().map(sum_constructor),
            &Document::Str(" | "),
        ),
        TypeExpr::Function {
            param_name,
            param,
            result,
            ..
        } => {
            let param = match param_name {
                Some(name) => docvec!["(", name.name.as_str(), ": ", type_expr(param), ")"],
                None => type_term(param),
            };
            parenthesized(docvec![param, " -> ", type_expr(result)])
        }
        TypeExpr::Application { .. } => {
            // Arguments are stored left-nested; print them flat after the head
            let mut arguments = Vec::new();
            let mut head = ty;
            while let TypeExpr::Application {
                head: inner,
                argument,
                ..
            } = head
            {
                arguments.push(argument);
                head = inner.as_ref();
            }
            let mut docs = vec![Document::Str("("), type_expr(head)];
            for argument in arguments.into_iter().rev() {
                docs.push(Document::Str(" "));
                docs.push(match argument {
                    TypeArg::Dimension(dimension) => self::dimension(dimension),
                    TypeArg::Type(ty) => type_atom(ty),
                });
            }
            docs.push(Document::Str(")"));
            Document::Vec(docs)
        }
        TypeExpr::Existential { sizes, body, .. } => {
            let mut docs = vec![Document::Str("?")];
            for size in sizes {
                docs.push(docvec!["[", size.name.as_str(), "]"]);
            }
            docs.push(Document::Str("."));
            docs.push(type_expr(body));
            Document::Vec(docs)
        }
        TypeExpr::Unique { inner, .. } => docvec!["*", type_term(inner)],
    }
}

/// A type where a term is expected: no leading `?`, and a sum only in
/// parentheses so that nothing after it joins its last constructor.
fn type_term(ty: &TypeExpr) -> Document<'_> {
    match ty {
        TypeExpr::Parens(inner, _) => type_term(inner),
        TypeExpr::Existential { .. } | TypeExpr::Sum { .. } => parenthesized(type_expr(ty)),
        other => type_expr(other),
    }
}

/// A type in argument position: names, brackets and parenthesized forms
/// only.
fn type_atom(ty: &TypeExpr) -> Document<'_> {
    match ty {
        TypeExpr::Parens(inner, _) => type_atom(inner),
        TypeExpr::Named(_)
        | TypeExpr::Unit(_)
        | TypeExpr::Tuple { .. }
        | TypeExpr::Record { .. }
        | TypeExpr::Function { .. }
        | TypeExpr::Application { .. } => type_expr(ty),
        _ => parenthesized(type_expr(ty)),
    }
}

fn sum_constructor(constructor: &SumConstructor) -> Document<'_> {
    let mut docs = vec![Document::Str("#"), Document::Str(&constructor.tag.name)];
    for argument in &constructor.arguments {
        docs.push(Document::Str(" "));
        docs.push(type_atom(argument));
    }
    Document::Vec(docs)
}

fn dimension(dimension: &Dimension) -> Document<'_> {
    match &dimension.kind {
        DimensionKind::Unknown => "[]".to_doc(),
        DimensionKind::Named(name) => docvec!["[", qual_name(name), "]"],
        DimensionKind::Literal(digits) => docvec!["[", digits.as_str(), "]"],
    }
}

fn type_params_doc(params: &[TypeParam]) -> Document<'_> {
    let mut docs = Vec::with_capacity(params.len() * 2);
    for param in params {
        docs.push(Document::Str(" "));
        docs.push(match param {
            TypeParam::Size { name, .. } => docvec!["[", name.name.as_str(), "]"],
            TypeParam::Type {
                name, liftedness, ..
            } => docvec!["'", liftedness.marker(), name.name.as_str()],
        });
    }
    Document::Vec(docs)
}

fn return_type_doc(return_type: Option<&TypeExpr>) -> Document<'_> {
    match return_type {
        Some(ty) => docvec![" : ", type_expr(ty)],
        None => nil(),
    }
}

// ============================================================================
// Patterns
// ============================================================================

fn pattern(pattern: &Pattern) -> Document<'_> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || pattern_doc(pattern))
}

fn pattern_doc(pattern: &Pattern) -> Document<'_> {
    match pattern {
        Pattern::Identifier(name) => name.name.as_str().to_doc(),
        Pattern::Wildcard(_) => "_".to_doc(),
        Pattern::Literal {
            negative, value, ..
        } => {
            let sign = if *negative { "-" } else { "" };
            docvec![sign, value.to_string()]
        }
        Pattern::Unit(_) => "()".to_doc(),
        Pattern::Parens(inner, _) => self::pattern(inner),
        Pattern::Tuple { elements, .. } => {
            parenthesized(join(elements.iter().map(self::pattern), &comma()))
        }
        Pattern::Record { fields, .. } => docvec![
            "{",
            join(fields.iter().map(record_pattern_field), &comma()),
            "}"
        ],
        Pattern::Constructor { tag, arguments, .. } => {
            if arguments.is_empty() {
                return docvec!["#", tag.name.as_str()];
            }
            let mut docs = vec![Document::Str("(#"), Document::Str(&tag.name)];
            for argument in arguments {
                docs.push(Document::Str(" "));
                docs.push(self::pattern(argument));
            }
            docs.push(Document::Str(")"));
            Document::Vec(docs)
        }
        Pattern::Ascription { pattern, ty, .. } => {
            parenthesized(docvec![self::pattern(pattern), " : ", type_expr(ty)])
        }
        Pattern::Attributed {
            attribute, pattern, ..
        } => parenthesized(docvec![
            self::attribute(attribute),
            " ",
            self::pattern(pattern)
        ]),
    }
}

fn record_pattern_field(field: &RecordPatternField) -> Document<'_> {
    match &field.pattern {
        None => field.name.name.as_str().to_doc(),
        // `{x: t}` is stored as the subpattern `x : t`
        Some(Pattern::Ascription { pattern, ty, .. })
            if matches!(pattern.as_ref(), Pattern::Identifier(name) if name.name == field.name.name) =>
        {
            docvec![field.name.name.as_str(), ": ", type_expr(ty)]
        }
        Some(subpattern) => docvec![field.name.name.as_str(), " = ", self::pattern(subpattern)],
    }
}

/// A function or lambda parameter. Literals are not parameters unless
/// parenthesized.
fn parameter(param: &Pattern) -> Document<'_> {
    match param {
        Pattern::Parens(inner, _) => parameter(inner),
        Pattern::Literal { .. } => parenthesized(pattern(param)),
        other => pattern(other),
    }
}

fn params_doc(params: &[Pattern]) -> Document<'_> {
    let mut docs = Vec::with_capacity(params.len() * 2);
    for param in params {
        docs.push(Document::Str(" "));
        docs.push(parameter(param));
    }
    Document::Vec(docs)
}

// ============================================================================
// Declarations
// ============================================================================

fn declarations(declarations: &[Declaration]) -> Document<'_> {
    let mut docs = Vec::with_capacity(declarations.len() * 3);
    for (index, declaration) in declarations.iter().enumerate() {
        if index > 0 {
            docs.push(Document::Str("\n"));
            docs.push(line());
        }
        docs.push(self::declaration(declaration));
    }
    Document::Vec(docs)
}

fn declaration(declaration: &Declaration) -> Document<'_> {
    docvec![doc_comment(declaration.doc()), declaration_body(declaration)]
}

/// Doc comment lines, each followed by a line break.
fn doc_comment(doc: Option<&str>) -> Document<'_> {
    let Some(doc) = doc else {
        return nil();
    };
    let mut docs = Vec::new();
    for (index, text) in doc.split('\n').enumerate() {
        let marker = if index == 0 { "-- |" } else { "--" };
        if text.is_empty() {
            docs.push(Document::Str(marker));
        } else {
            docs.push(docvec![marker, " ", text]);
        }
        docs.push(line());
    }
    Document::Vec(docs)
}

fn declaration_body(declaration: &Declaration) -> Document<'_> {
    match declaration {
        Declaration::Value(binding) => value_binding(binding),
        Declaration::Type(binding) => docvec![
            "type",
            binding.liftedness.marker(),
            " ",
            binding.name.name.as_str(),
            type_params_doc(&binding.params),
            " = ",
            type_expr(&binding.definition)
        ],
        Declaration::Module {
            name,
            params,
            signature,
            body,
            ..
        } => {
            let mut docs = vec![Document::Str("module "), Document::Str(&name.name)];
            for param in params {
                docs.push(Document::Str(" "));
                docs.push(module_param(param));
            }
            if let Some(signature) = signature {
                docs.push(Document::Str(" : "));
                docs.push(module_type(signature));
            }
            docs.push(Document::Str(" = "));
            docs.push(module_expression(body));
            Document::Vec(docs)
        }
        Declaration::ModuleType { name, body, .. } => {
            docvec!["module type ", name.name.as_str(), " = ", module_type(body)]
        }
        Declaration::Open { module, .. } => docvec!["open ", module_expression(module)],
        Declaration::Import { path, .. } => docvec!["import ", quoted(path)],
        Declaration::Local { declaration, .. } => {
            docvec!["local ", declaration_body(declaration)]
        }
        Declaration::Attributed {
            attribute,
            declaration,
            ..
        } => docvec![self::attribute(attribute), " ", declaration_body(declaration)],
    }
}

fn value_binding(binding: &ValueBinding) -> Document<'_> {
    docvec![
        binding.kind.keyword(),
        " ",
        binding_name(&binding.name),
        type_params_doc(&binding.type_params),
        params_doc(&binding.params),
        return_type_doc(binding.return_type.as_ref()),
        " = ",
        expression(&binding.body)
    ]
}

fn binding_name(name: &BindingName) -> Document<'_> {
    match name {
        BindingName::Name(name) => name.name.as_str().to_doc(),
        BindingName::Operator(operator) => parenthesized(operator.symbol.as_str().to_doc()),
    }
}

// ============================================================================
// Modules
// ============================================================================

fn module_param(param: &ModuleParam) -> Document<'_> {
    docvec!["(", param.name.name.as_str(), ": ", module_type(&param.signature), ")"]
}

/// Renders `{`, the nested items one per line, and `}`.
fn braced_block(body: Document<'_>, is_empty: bool) -> Document<'_> {
    if is_empty {
        return "{}".to_doc();
    }
    docvec!["{", nest(INDENT, docvec![line(), body]), line(), "}"]
}

fn module_expression(module: &ModuleExpression) -> Document<'_> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || module_expression_doc(module))
}

fn module_expression_doc(module: &ModuleExpression) -> Document<'_> {
    match module {
        ModuleExpression::Struct { declarations, .. } => {
            braced_block(self::declarations(declarations), declarations.is_empty())
        }
        ModuleExpression::Name(name) => qual_name(name),
        ModuleExpression::Parens(inner, _) => module_expression(inner),
        ModuleExpression::Import { path, .. } => docvec!["import ", quoted(path)],
        ModuleExpression::Application {
            functor, argument, ..
        } => parenthesized(docvec![
            module_expression(functor),
            " ",
            module_expression(argument)
        ]),
        ModuleExpression::Ascription {
            module, signature, ..
        } => parenthesized(docvec![
            module_expression(module),
            " : ",
            module_type(signature)
        ]),
        ModuleExpression::Lambda {
            param,
            result_signature,
            body,
            ..
        } => {
            let result_signature = match result_signature {
                Some(signature) => docvec![" : ", module_type(signature)],
                None => nil(),
            };
            docvec![
                "(\\",
                module_param(param),
                result_signature,
                " -> ",
                module_expression(body),
                ")"
            ]
        }
    }
}

fn module_type(signature: &ModuleTypeExpression) -> Document<'_> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || module_type_doc(signature))
}

fn module_type_doc(signature: &ModuleTypeExpression) -> Document<'_> {
    match signature {
        ModuleTypeExpression::Specs { specs, .. } => {
            let mut docs = Vec::with_capacity(specs.len() * 2);
            for (index, spec) in specs.iter().enumerate() {
                if index > 0 {
                    docs.push(line());
                }
                docs.push(self::spec(spec));
            }
            braced_block(Document::Vec(docs), specs.is_empty())
        }
        ModuleTypeExpression::Name(name) => qual_name(name),
        ModuleTypeExpression::Parens(inner, _) => module_type(inner),
        ModuleTypeExpression::With {
            base,
            type_name,
            params,
            definition,
            ..
        } => parenthesized(docvec![
            module_type(base),
            " with ",
            qual_name(type_name),
            type_params_doc(params),
            " = ",
            type_expr(definition)
        ]),
        ModuleTypeExpression::Functor {
            param_name,
            param,
            result,
            ..
        } => {
            let param = match param_name {
                Some(name) => docvec!["(", name.name.as_str(), ": ", module_type(param), ")"],
                None => module_type(param),
            };
            parenthesized(docvec![param, " -> ", module_type(result)])
        }
    }
}

fn spec(spec: &Spec) -> Document<'_> {
    docvec![doc_comment(spec_doc(spec)), spec_body(spec)]
}

fn spec_doc(spec: &Spec) -> Option<&str> {
    match spec {
        Spec::Value { doc, .. } | Spec::Type { doc, .. } | Spec::Module { doc, .. } => {
            doc.as_deref()
        }
        Spec::Attributed { spec, .. } => spec_doc(spec),
        Spec::Include { .. } => None,
    }
}

fn spec_body(spec: &Spec) -> Document<'_> {
    match spec {
        Spec::Value {
            name,
            type_params,
            ty,
            ..
        } => docvec![
            "val ",
            binding_name(name),
            type_params_doc(type_params),
            " : ",
            type_expr(ty)
        ],
        Spec::Type {
            liftedness,
            name,
            params,
            definition,
            ..
        } => {
            let definition = match definition {
                Some(ty) => docvec![" = ", type_expr(ty)],
                None => nil(),
            };
            docvec![
                "type",
                liftedness.marker(),
                " ",
                name.name.as_str(),
                type_params_doc(params),
                definition
            ]
        }
        Spec::Module {
            name, signature, ..
        } => docvec!["module ", name.name.as_str(), " : ", module_type(signature)],
        Spec::Include { signature, .. } => docvec!["include ", module_type(signature)],
        Spec::Attributed {
            attribute, spec, ..
        } => docvec![self::attribute(attribute), " ", spec_body(spec)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_program;
    use crate::source_analysis::{parse_expression, parse_pattern, parse_type};

    fn program(source: &str) -> String {
        match parse_program(source) {
            Ok(program) => unparse_program(&program),
            Err(error) => panic!("failed to parse {source:?}: {error}"),
        }
    }

    fn assert_fixpoint(source: &str) {
        let once = program(source);
        assert_eq!(program(&once), once, "rendering of {source:?} is not stable");
    }

    #[test]
    fn value_bindings() {
        assert_eq!(
            program("def add 't [n] (xs: [n]t) (y: t) : [n]t = map (+ y) xs"),
            "def add 't [n] (xs : [n]t) (y : t) : [n]t = ((map (+ y)) xs)\n"
        );
        assert_eq!(program("entry main = 0"), "entry main = 0\n");
        assert_eq!(program("def x +++ y = x ++ y"), "def (+++) x y = (x ++ y)\n");
    }

    #[test]
    fn single_declarations_carry_their_doc_comment() {
        let program = parse_program("-- | Doubles.\nlocal def twice x = x * 2").unwrap();
        assert_eq!(
            unparse_declaration(&program.declarations[0]),
            "-- | Doubles.\nlocal def twice x = (x * 2)"
        );
    }

    #[test]
    fn declarations_are_separated_by_blank_lines() {
        assert_eq!(
            program("type t = i32 def x: t = 1"),
            "type t = i32\n\ndef x : t = 1\n"
        );
    }

    #[test]
    fn type_bindings_keep_liftedness() {
        assert_eq!(program("type^ f 'a = a -> a"), "type^ f 'a = (a -> a)\n");
        assert_eq!(program("type~ v 'a = []a"), "type~ v 'a = []a\n");
        assert_eq!(
            program("type shape = #circle f32 | #rect [2]f32"),
            "type shape = #circle f32 | #rect ([2]f32)\n"
        );
    }

    #[test]
    fn doc_comments_precede_the_declaration() {
        assert_eq!(
            program("-- | Adds one.\n--\n-- Twice over.\n#[inline] def inc x = x + 1"),
            "-- | Adds one.\n--\n-- Twice over.\n#[inline] def inc x = (x + 1)\n"
        );
    }

    #[test]
    fn modules_are_indented() {
        assert_eq!(
            program("module m : { type t val x: t } = { type t = i32 def x = 1 }"),
            "module m : {\n  type t\n  val x : t\n} = {\n  type t = i32\n\n  def x = 1\n}\n"
        );
        assert_eq!(program("module e = {}"), "module e = {}\n");
    }

    #[test]
    fn module_signatures() {
        assert_eq!(
            program("module type s = (P: p) -> q with t = i32"),
            "module type s = ((P: p) -> (q with t = i32))\n"
        );
        assert_eq!(
            program("module n = f (g : s) : s"),
            "module n = ((f (g : s)) : s)\n"
        );
        assert_eq!(
            program("open import \"lib\""),
            "open import \"lib\"\n"
        );
    }

    #[test]
    fn literals_are_escaped() {
        let expression = parse_expression(r#"f "a\"b\\c\n" '\''"#).unwrap();
        assert_eq!(
            unparse_expression(&expression),
            r#"((f "a\"b\\c\n") '\'')"#
        );
    }

    #[test]
    fn bare_constructors_before_arguments_are_parenthesized() {
        let expression = parse_expression("(#a) x").unwrap();
        assert_eq!(unparse_expression(&expression), "((#a) x)");
        assert_eq!(
            unparse_expression(&parse_expression("#a x").unwrap()),
            "(#a x)"
        );
    }

    #[test]
    fn types_in_argument_positions() {
        let ty = parse_type("opt ([n]i32) -> ?[m].[m]u8").unwrap();
        assert_eq!(unparse_type(&ty), "((opt ([n]i32)) -> ?[m].[m]u8)");
        let ty = parse_type("[3](?[k].[k]i32)").unwrap();
        assert_eq!(unparse_type(&ty), "[3](?[k].[k]i32)");
    }

    #[test]
    fn sums_in_term_positions_keep_their_parentheses() {
        assert_eq!(
            program("type t = (#a | #b) -> i32"),
            "type t = ((#a | #b) -> i32)\n"
        );
        assert_fixpoint("type t = (#a | #b) -> i32");
        assert_fixpoint("def f (x: #a -> #b) = x");
        assert_eq!(
            unparse_type(&parse_type("[2](#a | #b)").unwrap()),
            "[2](#a | #b)"
        );
        assert_eq!(unparse_type(&parse_type("*(#a | #b)").unwrap()), "*(#a | #b)");
    }

    #[test]
    fn deep_nesting_renders_without_overflow() {
        let parens = format!("def x = {}a{}", "(".repeat(500), ")".repeat(500));
        assert_eq!(program(&parens), "def x = a\n");

        let powers = program(&format!("def x = {}a", "a ** ".repeat(1000)));
        assert!(powers.starts_with("def x = (a ** (a ** "));
        assert_eq!(powers.matches("**").count(), 1000);

        let negations = program(&format!("def x = {}a", "- ".repeat(1000)));
        assert_eq!(negations.matches("(-").count(), 1000);
    }

    #[test]
    fn literal_parameters_are_parenthesized() {
        let pattern = parse_pattern("(-1)").unwrap();
        assert_eq!(unparse_pattern(&pattern), "-1");
        assert_eq!(parameter(&pattern).to_pretty_string(), "(-1)");
    }

    #[test]
    fn rendering_is_stable() {
        assert_fixpoint(
            "-- | Sums a vector.\n\
             def sum [n] (xs: [n]i32) : i32 =\n\
               loop acc = 0 for x in xs do acc + x\n\
             \n\
             module vec3 = {\n\
               type t = {x: f32, y: f32, z: f32}\n\
               def dot (a: t) (b: t) = a.x * b.x + a.y * b.y + a.z * b.z\n\
             }\n\
             \n\
             def classify (o: #some i32 | #none) =\n\
               match o\n\
               case #some x -> if x < 0 then -x else x\n\
               case #none -> 0\n\
             \n\
             entry main (xs: []f32) = xs with [0] = 1.0f32 |> map (\\x -> x * 2)\n",
        );
    }
}
