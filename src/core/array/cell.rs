//! Cells and column formats
//!
//! A column format is read from the `{spec}` argument of `\begin{array}`:
//! `l`, `c`, `r` for aligned columns, `p{len}` for fixed-width columns,
//! `|` for vertical rules and `@{}` to suppress the gap at a boundary.
//! `*{n}{spec}` repeats a sub-format.

use crate::core::atom::Atom;
use crate::core::boxes::HAlign;
use crate::data::colors::Color;
use crate::data::units::Length;

use log::warn;

/// Upper bound on the columns a `*{n}{spec}` repeat may expand to
pub const MAX_COLUMNS: usize = 256;

/// A single table cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridCell {
    pub content: Atom,
    /// Background from `\cellcolor`
    pub color: Option<Color>,
}

impl GridCell {
    pub fn new(content: Atom) -> Self {
        GridCell {
            content,
            color: None,
        }
    }

    pub fn empty() -> Self {
        GridCell::new(Atom::Row(Vec::new()))
    }
}

/// Alignment of a column letter
pub fn align_from_char(c: char) -> Option<HAlign> {
    match c {
        'l' => Some(HAlign::Left),
        'c' => Some(HAlign::Center),
        'r' => Some(HAlign::Right),
        // paragraph columns
        'p' | 'm' | 'b' => Some(HAlign::Left),
        _ => None,
    }
}

/// One column of a table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnSpec {
    pub align: HAlign,
    /// Fixed width of a `p{len}` column
    pub width: Option<Length>,
}

impl ColumnSpec {
    pub const fn aligned(align: HAlign) -> Self {
        ColumnSpec { align, width: None }
    }
}

/// What sits between two columns (or at the outer edges)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Boundary {
    /// Number of vertical rules
    pub rules: usize,
    /// `@{}`: no column gap at this boundary
    pub suppress_gap: bool,
}

/// Column alignments and separators of a table.
///
/// `boundaries` always holds one more entry than `columns`. Tables without a
/// declared format (matrices) take their column count from their rows and
/// cycle through `pattern` for the alignments.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFormat {
    pub columns: Vec<ColumnSpec>,
    pub boundaries: Vec<Boundary>,
    pub pattern: Vec<ColumnSpec>,
}

impl Default for ColumnFormat {
    fn default() -> Self {
        ColumnFormat::natural(vec![ColumnSpec::aligned(HAlign::Center)])
    }
}

impl ColumnFormat {
    /// Undeclared column count, alignments cycling through `pattern`
    pub fn natural(pattern: Vec<ColumnSpec>) -> Self {
        ColumnFormat {
            columns: Vec::new(),
            boundaries: vec![Boundary::default()],
            pattern,
        }
    }

    /// Parse an array column specification such as `|l|c|r|` or `@{}p{2cm}c`
    pub fn parse(spec: &str) -> Self {
        let mut format = ColumnFormat {
            columns: Vec::new(),
            boundaries: vec![Boundary::default()],
            pattern: Vec::new(),
        };
        format.push_spec(spec);
        format
    }

    fn push_spec(&mut self, spec: &str) {
        let mut chars = spec.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '|' => self.last_boundary().rules += 1,
                'l' | 'c' | 'r' => self.push_column(ColumnSpec::aligned(align_from_char(c).unwrap_or_default())),
                'p' | 'm' | 'b' => {
                    let width = read_braced(&mut chars).and_then(|w| Length::parse(&w));
                    self.push_column(ColumnSpec {
                        align: HAlign::Left,
                        width,
                    });
                }
                '@' => {
                    if let Some(inner) = read_braced(&mut chars) {
                        if inner.trim().is_empty() {
                            self.last_boundary().suppress_gap = true;
                        }
                    }
                }
                '*' => {
                    let count = read_braced(&mut chars).and_then(|n| n.trim().parse::<usize>().ok());
                    let repeated = read_braced(&mut chars);
                    if let (Some(count), Some(repeated)) = (count, repeated) {
                        for _ in 0..count.min(MAX_COLUMNS) {
                            if self.columns.len() >= MAX_COLUMNS {
                                warn!("column repeat *{{{}}} truncated at {} columns", count, MAX_COLUMNS);
                                break;
                            }
                            self.push_spec(&repeated);
                        }
                    }
                }
                // Skip >{...} and <{...} decorations
                '>' | '<' | '!' => {
                    read_braced(&mut chars);
                }
                _ => {}
            }
        }
    }

    fn push_column(&mut self, column: ColumnSpec) {
        self.columns.push(column);
        self.boundaries.push(Boundary::default());
    }

    fn last_boundary(&mut self) -> &mut Boundary {
        let last = self.boundaries.len() - 1;
        &mut self.boundaries[last]
    }

    /// Number of declared columns, if any were declared
    pub fn declared(&self) -> Option<usize> {
        if self.columns.is_empty() {
            None
        } else {
            Some(self.columns.len())
        }
    }

    /// Specification of column `index`
    pub fn column(&self, index: usize) -> ColumnSpec {
        match self.columns.get(index) {
            Some(spec) => *spec,
            None if !self.pattern.is_empty() => self.pattern[index % self.pattern.len()],
            None => ColumnSpec::default(),
        }
    }

    /// Boundary before column `index` (`index == columns` is the right edge)
    pub fn boundary(&self, index: usize) -> Boundary {
        if self.columns.is_empty() {
            return Boundary::default();
        }
        self.boundaries.get(index).copied().unwrap_or_default()
    }
}

/// Read a `{...}` group from the spec, with nesting
fn read_braced(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<String> {
    if chars.peek() != Some(&'{') {
        return None;
    }
    chars.next();

    let mut out = String::new();
    let mut depth = 1;
    for c in chars.by_ref() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(out);
                }
            }
            _ => {}
        }
        out.push(c);
    }
    Some(out)
}
