//! Atom tree
//!
//! Atoms are the abstract syntax tree produced by the parser. They are
//! immutable once built; [`Atom::layout`](crate::core::layout) turns an atom
//! into a measured box as a pure function of the atom and the environment.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::core::array::{ArrayAtom, HLine};
use crate::core::boxes::HAlign;
use crate::core::environment::{FontChange, MathStyle};
use crate::data::colors::Color;
use crate::data::symbols::{char_class, is_integral, is_large_op, literal_glyph};
use crate::data::units::Length;

/// TeX's spacing class of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum MathClass {
    Ord,
    /// Large operator
    Op,
    /// Binary operator
    Bin,
    /// Relation
    Rel,
    Open,
    Close,
    Punct,
    Inner,
    /// Takes no part in inter-atom spacing
    None,
}

/// Line over or under a subformula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    Overline,
    Underline,
}

/// Declaration that applies to the rest of its group
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwitchKind {
    Style(MathStyle),
    Font(FontChange),
    Color(Color),
}

/// A node of the formula tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Atom {
    /// Degenerate atom; lays out as the zero box
    #[default]
    Empty,
    /// A single glyph with its math class
    Symbol { ch: char, class: MathClass },
    /// Ordered children sharing a baseline
    Row(Vec<Atom>),
    /// Nucleus with optional superscript and subscript
    Scripts {
        base: Box<Atom>,
        sup: Option<Box<Atom>>,
        sub: Option<Box<Atom>>,
    },
    /// Generalized fraction; `rule` is false for `\atop`-like fractions
    Fraction {
        num: Box<Atom>,
        den: Box<Atom>,
        rule: bool,
    },
    Radical {
        body: Box<Atom>,
        degree: Option<Box<Atom>>,
    },
    /// Subtree drawn with a foreground and/or background color
    Color {
        body: Box<Atom>,
        fg: Option<Color>,
        bg: Option<Color>,
    },
    /// Padded box with an optional rule border and background
    FBox {
        body: Box<Atom>,
        ruled: bool,
        frame: Option<Color>,
        bg: Option<Color>,
    },
    Array(Box<ArrayAtom>),
    /// `\left ... \middle ... \right`; `segments` has one more entry than `middles`
    Fenced {
        left: Option<char>,
        right: Option<char>,
        segments: Vec<Atom>,
        middles: Vec<Option<char>>,
    },
    /// Fixed-size delimiter from `\big` and friends; `size` is the total height in em
    BigDelim {
        ch: Option<char>,
        size: f64,
        class: MathClass,
    },
    /// Lines stacked vertically; `align: None` is multline placement
    /// (first line left, last line right, the others centered)
    Multline {
        lines: Vec<Atom>,
        align: Option<HAlign>,
    },
    Styled { style: MathStyle, body: Box<Atom> },
    /// `\bf`, `\displaystyle`, `\color` and the atoms following them in
    /// their group. Unlike a braced argument this opens no subformula:
    /// the atoms keep spacing against the surrounding row.
    Switch { kind: SwitchKind, body: Vec<Atom> },
    Font { change: FontChange, body: Box<Atom> },
    /// Explicit horizontal space
    Space(Length),
    /// Upright text set in a text font
    Text { text: String, font: FontChange },
    /// Subformula with an overridden math class (`\mathbin`, ...)
    Class { class: MathClass, body: Box<Atom> },
    /// Operator name such as `\sin` or `\lim`
    OpName { name: String, limits: bool },
    /// `\limits` or `\nolimits` applied to an operator
    Limits { base: Box<Atom>, limits: bool },
    /// Subformula centered on the math axis
    VCentered(Box<Atom>),
    Decorated {
        body: Box<Atom>,
        decoration: Decoration,
    },
    /// `\rule[raise]{width}{height}`
    Rule {
        width: Length,
        height: Length,
        raise: Length,
    },
    /// Array marker: horizontal rule before the current row
    HLine(HLine),
    /// Array marker: background of the current cell
    CellColor(Color),
    /// Array marker: background of the current row
    RowColor(Color),
}

impl Atom {
    /// A literal character typed in math mode
    pub fn char(ch: char) -> Atom {
        Atom::Symbol {
            ch: literal_glyph(ch),
            class: char_class(ch),
        }
    }

    pub fn symbol(ch: char, class: MathClass) -> Atom {
        Atom::Symbol { ch, class }
    }

    /// Row of atoms; a single atom stays as it is
    pub fn row(mut atoms: Vec<Atom>) -> Atom {
        if atoms.len() == 1 {
            return atoms.remove(0);
        }
        Atom::Row(atoms)
    }

    /// The math class governing spacing around this atom
    pub fn class(&self) -> MathClass {
        match self {
            Atom::Symbol { class, .. } => *class,
            Atom::Scripts { base, .. } => base.class(),
            Atom::Fraction { .. } | Atom::Fenced { .. } => MathClass::Inner,
            Atom::Color { body, .. } | Atom::Styled { body, .. } | Atom::Font { body, .. } => {
                body.class()
            }
            Atom::Switch { body, .. } => body
                .iter()
                .map(Atom::class)
                .find(|c| *c != MathClass::None)
                .unwrap_or(MathClass::None),
            Atom::Class { class, .. } | Atom::BigDelim { class, .. } => *class,
            Atom::OpName { .. } | Atom::Limits { .. } => MathClass::Op,
            Atom::Empty
            | Atom::Space(_)
            | Atom::HLine(_)
            | Atom::CellColor(_)
            | Atom::RowColor(_) => MathClass::None,
            Atom::Row(_)
            | Atom::Radical { .. }
            | Atom::FBox { .. }
            | Atom::Array(_)
            | Atom::Multline { .. }
            | Atom::Text { .. }
            | Atom::VCentered(_)
            | Atom::Decorated { .. }
            | Atom::Rule { .. } => MathClass::Ord,
        }
    }

    /// Whether this atom's scripts go above and below it in `style`
    pub fn limits_in(&self, style: MathStyle) -> bool {
        match self {
            Atom::Limits { limits, .. } => *limits,
            Atom::OpName { limits, .. } => *limits && style.is_display(),
            Atom::Symbol { ch, class } => {
                *class == MathClass::Op
                    && is_large_op(*ch)
                    && !is_integral(*ch)
                    && style.is_display()
            }
            _ => false,
        }
    }

    /// A large operator symbol such as `\sum`
    pub fn is_large_op(&self) -> bool {
        matches!(self, Atom::Symbol { ch, class: MathClass::Op } if is_large_op(*ch))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Atom::Empty => true,
            Atom::Row(children) | Atom::Switch { body: children, .. } => {
                children.iter().all(Atom::is_empty)
            }
            _ => false,
        }
    }

    /// A row holding only primes, as produced by `x'` and `x''`
    pub fn is_prime_row(&self) -> bool {
        match self {
            Atom::Symbol { ch: '\u{2032}', .. } => true,
            Atom::Row(children) => {
                !children.is_empty() && children.iter().all(Atom::is_prime_row)
            }
            _ => false,
        }
    }

    /// Child atoms, for tree walks
    pub fn children(&self) -> Vec<&Atom> {
        match self {
            Atom::Row(children) | Atom::Switch { body: children, .. } => children.iter().collect(),
            Atom::Scripts { base, sup, sub } => std::iter::once(base.as_ref())
                .chain(sup.as_deref())
                .chain(sub.as_deref())
                .collect(),
            Atom::Fraction { num, den, .. } => vec![num.as_ref(), den.as_ref()],
            Atom::Radical { body, degree } => {
                std::iter::once(body.as_ref()).chain(degree.as_deref()).collect()
            }
            Atom::Color { body, .. }
            | Atom::FBox { body, .. }
            | Atom::Styled { body, .. }
            | Atom::Font { body, .. }
            | Atom::Class { body, .. }
            | Atom::Decorated { body, .. }
            | Atom::Limits { base: body, .. }
            | Atom::VCentered(body) => vec![body.as_ref()],
            Atom::Fenced { segments, .. } => segments.iter().collect(),
            Atom::Multline { lines, .. } => lines.iter().collect(),
            Atom::Array(array) => array.cells().collect(),
            _ => Vec::new(),
        }
    }
}
