// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Document tree for rendering Futhark source.
//!
//! Rendering functions return `Document` values instead of writing into a
//! shared buffer. Layout is fixed: the only line breaks are explicit
//! [`line`]s, and [`nest`] raises the indentation that follows them.
//!
//! # Example
//!
//! ```
//! use futhark_syntax::docvec;
//! use futhark_syntax::unparse::document::{INDENT, line, nest};
//!
//! let doc = docvec!["module m = {", nest(INDENT, docvec![line(), "def x = 1"]), line(), "}"];
//! assert_eq!(doc.to_pretty_string(), "module m = {\n  def x = 1\n}");
//! ```

use crate::source_analysis::{STACK_GROWTH, STACK_RED_ZONE};

/// Indentation width of module and signature bodies.
pub const INDENT: isize = 2;

/// A renderable document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document<'a> {
    /// Text borrowed from the syntax tree.
    Str(&'a str),
    /// Text built during rendering.
    String(String),
    /// A newline followed by the current indentation.
    Line,
    /// Extra indentation for lines inside the nested document.
    Nest(isize, Box<Document<'a>>),
    Vec(Vec<Document<'a>>),
    Nil,
}

/// Conversion into a [`Document`].
pub trait Documentable<'a> {
    fn to_doc(self) -> Document<'a>;
}

impl<'a> Documentable<'a> for &'a str {
    fn to_doc(self) -> Document<'a> {
        Document::Str(self)
    }
}

impl<'a> Documentable<'a> for String {
    fn to_doc(self) -> Document<'a> {
        Document::String(self)
    }
}

impl<'a> Documentable<'a> for Document<'a> {
    fn to_doc(self) -> Document<'a> {
        self
    }
}

impl<'a> Documentable<'a> for Vec<Document<'a>> {
    fn to_doc(self) -> Document<'a> {
        Document::Vec(self)
    }
}

/// Concatenates documents, converting each through [`Documentable`].
///
/// ```
/// use futhark_syntax::docvec;
///
/// let doc = docvec!["(", "f", " ", "x", ")"];
/// assert_eq!(doc.to_pretty_string(), "(f x)");
/// ```
#[macro_export]
macro_rules! docvec {
    () => {
        $crate::unparse::document::Document::Vec(Vec::new())
    };

    ($first:expr $(,)?) => {
        $crate::unparse::document::Document::Vec(
            vec![$crate::unparse::document::Documentable::to_doc($first)]
        )
    };

    ($first:expr, $($rest:expr),+ $(,)?) => {
        match $crate::unparse::document::Documentable::to_doc($first) {
            $crate::unparse::document::Document::Vec(mut vec) => {
                $(
                    vec.push($crate::unparse::document::Documentable::to_doc($rest));
                )*
                $crate::unparse::document::Document::Vec(vec)
            },
            first => {
                $crate::unparse::document::Document::Vec(
                    vec![first, $($crate::unparse::document::Documentable::to_doc($rest)),+]
                )
            }
        }
    };
}

/// A mandatory newline followed by indentation.
#[must_use]
pub fn line() -> Document<'static> {
    Document::Line
}

#[must_use]
pub fn nil() -> Document<'static> {
    Document::Nil
}

/// Indents every line break inside `doc` by `indent` more columns.
#[must_use]
pub fn nest(indent: isize, doc: Document<'_>) -> Document<'_> {
    Document::Nest(indent, Box::new(doc))
}

/// Joins documents with a separator between each pair.
#[must_use]
pub fn join<'a>(
    docs: impl IntoIterator<Item = Document<'a>>,
    separator: &Document<'a>,
) -> Document<'a> {
    let mut result = Vec::new();
    for doc in docs {
        if !result.is_empty() {
            result.push(separator.clone());
        }
        result.push(doc);
    }
    if result.is_empty() {
        Document::Nil
    } else {
        Document::Vec(result)
    }
}

/// Concatenates documents without any separator.
#[must_use]
pub fn concat<'a>(docs: impl IntoIterator<Item = Document<'a>>) -> Document<'a> {
    Document::Vec(docs.into_iter().collect())
}

impl Document<'_> {
    /// Renders the document to a string.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let mut output = String::new();
        self.render_to(&mut output, 0);
        output
    }

    fn render_to(&self, output: &mut String, indent: isize) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.render_node(output, indent);
        });
    }

    fn render_node(&self, output: &mut String, indent: isize) {
        match self {
            Document::Str(s) => output.push_str(s),
            Document::String(s) => output.push_str(s),
            Document::Nil => {}
            Document::Line => {
                output.push('\n');
                write_indent(output, indent);
            }
            Document::Nest(extra, doc) => doc.render_to(output, indent + extra),
            Document::Vec(docs) => {
                for doc in docs {
                    doc.render_to(output, indent);
                }
            }
        }
    }
}

fn write_indent(output: &mut String, indent: isize) {
    for _ in 0..indent {
        output.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lines_are_indented() {
        let doc = docvec![
            "{",
            nest(INDENT, docvec![line(), "type t", line(), "val x: t"]),
            line(),
            "}",
        ];
        assert_eq!(doc.to_pretty_string(), "{\n  type t\n  val x: t\n}");
    }

    #[test]
    fn nesting_accumulates() {
        let doc = nest(
            2,
            docvec![line(), "outer", nest(2, docvec![line(), "inner"])],
        );
        assert_eq!(doc.to_pretty_string(), "\n  outer\n    inner");
    }

    #[test]
    fn docvec_flattens_leading_vec() {
        let doc = docvec![docvec!["a", "b"], "c"];
        assert_eq!(doc.to_pretty_string(), "abc");
        let Document::Vec(docs) = doc else {
            panic!("expected a vector document");
        };
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn docvec_accepts_owned_strings() {
        let doc = docvec!["x", String::from("42"), nil()];
        assert_eq!(doc.to_pretty_string(), "x42");
    }

    #[test]
    fn join_separates_pairs() {
        let docs = ["a", "b", "c"].map(Document::Str);
        assert_eq!(join(docs, &Document::Str(", ")).to_pretty_string(), "a, b, c");
        assert_eq!(join(Vec::new(), &Document::Str(", ")), Document::Nil);
        assert_eq!(
            join([Document::Str("only")], &Document::Str(", ")).to_pretty_string(),
            "only"
        );
    }

    #[test]
    fn concat_has_no_separator() {
        let doc = concat([Document::Str("f"), Document::Str(" "), Document::Str("x")]);
        assert_eq!(doc.to_pretty_string(), "f x");
    }

    #[test]
    fn raw_newline_leaves_blank_line_unindented() {
        let doc = nest(INDENT, docvec![line(), "a", "\n", line(), "b"]);
        assert_eq!(doc.to_pretty_string(), "\n  a\n\n  b");
    }
}
