// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Structural operator classification.
//!
//! Futhark lets programs define their own infix operators, so precedence
//! cannot come from a symbol table. Instead an operator's level and
//! associativity follow from its spelling, mostly its leading characters:
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | Pow (16) | `**…`, `lsl`, `lsr`, `asr` | Right |
//! | Mult (15) | `*…`, `/…`, `%…`, `mod`, `land`, `lor`, `lxor` | Left |
//! | Add (14) | `+…`, `-…` | Left |
//! | Concat (12) | `@…`, `^…` | Right |
//! | Rel (9) | `=…` (two or more characters), `<…`, `>…`, `$…`, `!=`, `&…`, `\|…` | Left |
//! | And (8) | `&`, `&&` | Right |
//! | Or (7) | `\|\|`, `or` | Right |
//! | Assign (5) | `:=` | Right |
//!
//! Unary negation sits at [`OperatorLevel::Neg`] and function application
//! at [`OperatorLevel::App`], both above every infix level.

/// Precedence ranks, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorLevel {
    /// The `->` of function types
    Arrow = 3,
    Assign = 5,
    Or = 7,
    And = 8,
    Rel = 9,
    Concat = 12,
    Add = 14,
    Mult = 15,
    Pow = 16,
    Neg = 17,
    App = 18,
}

impl OperatorLevel {
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    NonAssoc,
}

/// Level and associativity of an infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorClass {
    pub level: OperatorLevel,
    pub associativity: Associativity,
}

/// The function type arrow: right-associative, below every expression level.
pub const TYPE_ARROW: OperatorClass = OperatorClass::right(OperatorLevel::Arrow);

impl OperatorClass {
    const fn left(level: OperatorLevel) -> Self {
        Self {
            level,
            associativity: Associativity::Left,
        }
    }

    const fn right(level: OperatorLevel) -> Self {
        Self {
            level,
            associativity: Associativity::Right,
        }
    }

    /// Binding powers for precedence climbing.
    ///
    /// Ranks are doubled so a right-associative level never shares a binding
    /// power with the level above it.
    pub(crate) const fn binding_power(self) -> BindingPower {
        let left = self.level.rank() * 2;
        match self.associativity {
            Associativity::Right => BindingPower { left, right: left },
            Associativity::Left | Associativity::NonAssoc => BindingPower {
                left,
                right: left + 1,
            },
        }
    }
}

/// Binding power for infix operators.
///
/// Higher values bind tighter. An operator is folded into the current
/// expression when its `left` power is at least the caller's minimum, and
/// its right operand is parsed with `right` as the new minimum:
/// - Left-associative: `right == left + 1`
/// - Right-associative: `right == left`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BindingPower {
    pub(crate) left: u8,
    pub(crate) right: u8,
}

/// Classifies an infix operator by its spelling.
///
/// Returns `None` for spellings that are not infix operators, such as the
/// prefix-only `!`.
///
/// ```
/// use futhark_syntax::source_analysis::{Associativity, OperatorLevel, classify};
///
/// let class = classify("**.").unwrap();
/// assert_eq!(class.level, OperatorLevel::Pow);
/// assert_eq!(class.associativity, Associativity::Right);
/// assert!(classify("!").is_none());
/// ```
#[must_use]
pub fn classify(op: &str) -> Option<OperatorClass> {
    use OperatorLevel::{Add, And, Assign, Concat, Mult, Or, Pow, Rel};

    match op {
        "lsl" | "lsr" | "asr" => return Some(OperatorClass::right(Pow)),
        "mod" | "land" | "lor" | "lxor" => return Some(OperatorClass::left(Mult)),
        "or" | "||" => return Some(OperatorClass::right(Or)),
        "&" | "&&" => return Some(OperatorClass::right(And)),
        ":=" => return Some(OperatorClass::right(Assign)),
        "!=" => return Some(OperatorClass::left(Rel)),
        _ => {}
    }

    let mut chars = op.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    let class = match first {
        '*' if rest.starts_with('*') => OperatorClass::right(Pow),
        '*' | '/' | '%' => OperatorClass::left(Mult),
        '+' | '-' => OperatorClass::left(Add),
        '@' | '^' => OperatorClass::right(Concat),
        '<' | '>' | '$' => OperatorClass::left(Rel),
        // Bare `=` and `|` are punctuation, and `&&`/`||` were handled above.
        '=' | '&' | '|' if !rest.is_empty() => OperatorClass::left(Rel),
        _ => return None,
    };
    Some(class)
}
