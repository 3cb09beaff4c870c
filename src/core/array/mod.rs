//! Arrays and matrices
//!
//! The parser fills an [`ArrayOfAtoms`] cell by cell while an environment is
//! open. At `\end` the table is checked, then turned into an atom according
//! to its [`TableKind`]: a laid-out grid ([`ArrayAtom`]) for `array`,
//! the matrix family, `cases` and `aligned`, or a plain list of lines for
//! the display environments `multline` and `gather`.

pub mod builder;
pub mod cell;
pub mod hline;
pub mod layout;

pub use builder::{ArrayOfAtoms, GridRow};
pub use cell::{align_from_char, Boundary, ColumnFormat, ColumnSpec, GridCell};
pub use hline::{extract_hline_range, HLine};
pub use layout::{layout_array, ArrayOptions};

use crate::core::atom::Atom;
use crate::core::boxes::{HAlign, LayoutBox};
use crate::core::environment::{Environment, MathStyle};
use crate::utils::error::DimensionError;

/// A table whose dimensions have been checked
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAtom {
    table: ArrayOfAtoms,
    options: ArrayOptions,
}

impl ArrayAtom {
    /// Pad `table` to its column count; fails on rows that are too long
    pub fn new(mut table: ArrayOfAtoms, options: ArrayOptions) -> Result<Self, DimensionError> {
        table.check_dimensions()?;
        Ok(ArrayAtom { table, options })
    }

    pub fn table(&self) -> &ArrayOfAtoms {
        &self.table
    }

    pub fn options(&self) -> &ArrayOptions {
        &self.options
    }

    /// Cell contents in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.table
            .rows()
            .iter()
            .flat_map(|row| row.cells.iter().map(|cell| &cell.content))
    }

    pub fn layout(&self, env: &Environment) -> LayoutBox {
        match layout_array(&self.table, &self.options, env) {
            Ok(b) => b,
            Err(err) => unreachable!("array atom holds an unchecked table: {}", err),
        }
    }
}

/// How the body of an environment is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// `array`: column format from the `{spec}` argument
    Array,
    /// `matrix`, `pmatrix`, `bmatrix`, ...: centered columns between fences
    Matrix {
        left: Option<char>,
        right: Option<char>,
    },
    SmallMatrix,
    /// Two left-aligned columns after a left brace
    Cases,
    /// Right/left column pairs in display style
    Aligned,
    /// One centered column in display style
    Gathered,
    /// One line per row; `None` is multline placement
    Lines(Option<HAlign>),
}

impl TableKind {
    /// Environment kind for `name`; starred forms behave like the plain ones
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.trim_end_matches('*') {
            "array" => TableKind::Array,
            "matrix" => TableKind::Matrix {
                left: None,
                right: None,
            },
            "pmatrix" => TableKind::Matrix {
                left: Some('('),
                right: Some(')'),
            },
            "bmatrix" => TableKind::Matrix {
                left: Some('['),
                right: Some(']'),
            },
            "Bmatrix" => TableKind::Matrix {
                left: Some('{'),
                right: Some('}'),
            },
            "vmatrix" => TableKind::Matrix {
                left: Some('|'),
                right: Some('|'),
            },
            "Vmatrix" => TableKind::Matrix {
                left: Some('\u{2016}'),
                right: Some('\u{2016}'),
            },
            "smallmatrix" => TableKind::SmallMatrix,
            "cases" => TableKind::Cases,
            "aligned" | "align" | "split" | "eqnarray" => TableKind::Aligned,
            "gathered" => TableKind::Gathered,
            "gather" => TableKind::Lines(Some(HAlign::Center)),
            "multline" => TableKind::Lines(None),
            _ => return None,
        };
        Some(kind)
    }

    /// Whether `\begin{name}` is followed by a column specification
    pub fn takes_spec(self) -> bool {
        self == TableKind::Array
    }

    pub fn format(self, spec: Option<&str>) -> ColumnFormat {
        let left = ColumnSpec::aligned(HAlign::Left);
        match self {
            TableKind::Array => spec.map(ColumnFormat::parse).unwrap_or_default(),
            TableKind::Cases => ColumnFormat::natural(vec![left]),
            TableKind::Aligned => {
                ColumnFormat::natural(vec![ColumnSpec::aligned(HAlign::Right), left])
            }
            _ => ColumnFormat::default(),
        }
    }

    pub fn options(self) -> ArrayOptions {
        let base = ArrayOptions::default();
        match self {
            TableKind::Array | TableKind::Lines(_) => base,
            TableKind::Matrix { left, right } => ArrayOptions {
                outer_gap: false,
                ..base
            }
            .with_fences(left, right),
            TableKind::SmallMatrix => ArrayOptions {
                style: MathStyle::Script,
                outer_gap: false,
                row_stretch: 0.7,
                ..base
            },
            TableKind::Cases => ArrayOptions {
                outer_gap: false,
                ..base
            }
            .with_fences(Some('{'), None),
            TableKind::Aligned => ArrayOptions {
                style: MathStyle::Display,
                column_gap: 2.0,
                outer_gap: false,
                paired: true,
                ..base
            },
            TableKind::Gathered => ArrayOptions {
                style: MathStyle::Display,
                outer_gap: false,
                ..base
            },
        }
    }

    /// Turn a filled table into the environment's atom
    pub fn finish(self, mut table: ArrayOfAtoms) -> Result<Atom, DimensionError> {
        table.check_dimensions()?;
        match self {
            TableKind::Lines(align) => {
                let lines = table
                    .rows()
                    .iter()
                    .map(|row| Atom::row(row.cells.iter().map(|c| c.content.clone()).collect()))
                    .collect();
                Ok(Atom::Multline { lines, align })
            }
            TableKind::Aligned => {
                // The right-hand side of a pair starts after an invisible
                // ordinary atom so `&=` spaces like a relation
                for row in table.rows_mut() {
                    for cell in row.cells.iter_mut().skip(1).step_by(2) {
                        if let Atom::Row(atoms) = &mut cell.content {
                            if !atoms.is_empty() {
                                atoms.insert(0, Atom::Row(Vec::new()));
                            }
                        }
                    }
                }
                Ok(Atom::Array(Box::new(ArrayAtom::new(table, self.options())?)))
            }
            _ => Ok(Atom::Array(Box::new(ArrayAtom::new(table, self.options())?))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::atom::MathClass;

    fn fill(table: &mut ArrayOfAtoms, rows: &[&[Vec<Atom>]]) {
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                table.add_row(None);
            }
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    table.add_col();
                }
                for atom in cell {
                    table.add_atom(atom.clone());
                }
            }
        }
    }

    #[test]
    fn test_environment_names() {
        assert_eq!(TableKind::from_name("array"), Some(TableKind::Array));
        assert_eq!(
            TableKind::from_name("pmatrix"),
            Some(TableKind::Matrix {
                left: Some('('),
                right: Some(')')
            })
        );
        assert_eq!(TableKind::from_name("align*"), Some(TableKind::Aligned));
        assert_eq!(TableKind::from_name("tabularx"), None);
        assert!(TableKind::Array.takes_spec());
        assert!(!TableKind::Cases.takes_spec());
    }

    #[test]
    fn test_multline_becomes_lines() {
        let mut table = ArrayOfAtoms::default();
        fill(&mut table, &[&[vec![Atom::char('a')]], &[vec![Atom::char('b')]]]);
        let atom = TableKind::Lines(None).finish(table).unwrap();
        let Atom::Multline { lines, align } = atom else {
            panic!("expected lines");
        };
        assert_eq!(lines.len(), 2);
        assert_eq!(align, None);
    }

    #[test]
    fn test_aligned_right_cells_start_ordinary() {
        let mut table = ArrayOfAtoms::new(TableKind::Aligned.format(None));
        fill(
            &mut table,
            &[&[vec![Atom::char('x')], vec![Atom::char('='), Atom::char('1')]]],
        );
        let atom = TableKind::Aligned.finish(table).unwrap();
        let Atom::Array(array) = atom else {
            panic!("expected an array");
        };
        let cells: Vec<&Atom> = array.cells().collect();
        let Atom::Row(right) = cells[1] else {
            panic!("expected a row");
        };
        assert_eq!(right[0], Atom::Row(Vec::new()));
        assert_eq!(right[1].class(), MathClass::Rel);
    }

    #[test]
    fn test_too_wide_row_is_rejected() {
        let mut table = ArrayOfAtoms::new(TableKind::Array.format(Some("cc")));
        fill(
            &mut table,
            &[&[vec![Atom::char('a')], vec![Atom::char('b')], vec![Atom::char('c')]]],
        );
        assert!(TableKind::Array.finish(table).is_err());
    }

    #[test]
    fn test_array_atom_lays_out() {
        let mut table = ArrayOfAtoms::default();
        fill(&mut table, &[&[vec![Atom::char('a')], vec![Atom::char('b')]]]);
        let atom = TableKind::Matrix {
            left: Some('('),
            right: Some(')'),
        }
        .finish(table)
        .unwrap();
        let b = atom.layout(&Environment::new(MathStyle::Display, 10.0));
        assert!(b.width > 0.0);
        assert_eq!(atom.children().len(), 2);
    }
}
