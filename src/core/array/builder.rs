//! Row-by-row table builder fed by the parser

use log::trace;

use super::cell::{ColumnFormat, GridCell};
use super::hline::HLine;
use crate::core::atom::Atom;
use crate::data::colors::Color;
use crate::data::units::Length;
use crate::utils::error::DimensionError;

/// A finished table row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridRow {
    pub cells: Vec<GridCell>,
    /// Horizontal rules above this row
    pub hlines_before: Vec<HLine>,
    /// Background from `\rowcolor`
    pub color: Option<Color>,
    /// Extra space below the row from `\\[len]`
    pub gap: Option<Length>,
}

impl GridRow {
    pub fn new() -> Self {
        GridRow::default()
    }

    fn is_blank(&self) -> bool {
        self.cells.is_empty() && self.color.is_none()
    }
}

/// Table under construction.
///
/// Atoms are appended to the current cell; `&` closes the cell and `\\`
/// closes the row. Rule and color markers are routed to the row or cell
/// they apply to. [`check_dimensions`](Self::check_dimensions) closes the
/// last row and pads every row to the column count.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayOfAtoms {
    pub format: ColumnFormat,
    rows: Vec<GridRow>,
    row: GridRow,
    cell: Vec<Atom>,
    cell_color: Option<Color>,
    /// Rules seen after the current row got content, for the next row
    pending_hlines: Vec<HLine>,
    /// Rules below the last row
    trailing_hlines: Vec<HLine>,
}

impl Default for ArrayOfAtoms {
    fn default() -> Self {
        ArrayOfAtoms::new(ColumnFormat::default())
    }
}

impl ArrayOfAtoms {
    pub fn new(format: ColumnFormat) -> Self {
        ArrayOfAtoms {
            format,
            rows: Vec::new(),
            row: GridRow::new(),
            cell: Vec::new(),
            cell_color: None,
            pending_hlines: Vec::new(),
            trailing_hlines: Vec::new(),
        }
    }

    /// Build a table directly from rows of cell atoms
    pub fn from_rows(format: ColumnFormat, rows: Vec<Vec<Atom>>) -> Self {
        let mut table = ArrayOfAtoms::new(format);
        table.rows = rows
            .into_iter()
            .map(|cells| GridRow {
                cells: cells.into_iter().map(GridCell::new).collect(),
                ..GridRow::new()
            })
            .collect();
        table
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [GridRow] {
        &mut self.rows
    }

    pub fn trailing_hlines(&self) -> &[HLine] {
        &self.trailing_hlines
    }

    /// Atoms of the cell being filled
    pub fn current_cell(&mut self) -> &mut Vec<Atom> {
        &mut self.cell
    }

    fn row_is_fresh(&self) -> bool {
        self.row.cells.is_empty() && self.cell.is_empty()
    }

    /// Append an atom to the current cell, or apply a rule/color marker
    pub fn add_atom(&mut self, atom: Atom) {
        match atom {
            Atom::HLine(line) => self.add_rule(line),
            Atom::CellColor(color) => self.cell_color = Some(color),
            Atom::RowColor(color) => self.row.color = Some(color),
            atom => self.cell.push(atom),
        }
    }

    fn add_rule(&mut self, line: HLine) {
        if self.row_is_fresh() {
            self.row.hlines_before.push(line);
        } else {
            self.pending_hlines.push(line);
        }
    }

    /// Close the current cell (`&`)
    pub fn add_col(&mut self) {
        let atoms = std::mem::take(&mut self.cell);
        self.row.cells.push(GridCell {
            content: Atom::Row(atoms),
            color: self.cell_color.take(),
        });
    }

    /// Close the current row (`\\`), with optional extra space below it
    pub fn add_row(&mut self, gap: Option<Length>) {
        self.add_col();
        let mut row = std::mem::take(&mut self.row);
        row.gap = gap;
        trace!("array row {} with {} cells", self.rows.len(), row.cells.len());
        self.rows.push(row);
        self.row.hlines_before.append(&mut self.pending_hlines);
    }

    /// Number of columns: the declared count, else the longest row
    pub fn column_count(&self) -> usize {
        self.format
            .declared()
            .unwrap_or_else(|| self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0))
    }

    /// Close the last row and pad every row to the column count.
    ///
    /// Fails when a row holds more cells than the format declares columns.
    pub fn check_dimensions(&mut self) -> Result<(), DimensionError> {
        if self.row_is_fresh() && self.row.is_blank() {
            // `\\` before `\end`: the empty last row only carries rules
            let row = std::mem::take(&mut self.row);
            self.trailing_hlines.extend(row.hlines_before);
            self.trailing_hlines.append(&mut self.pending_hlines);
        } else {
            self.add_col();
            let row = std::mem::take(&mut self.row);
            self.rows.push(row);
            self.trailing_hlines.append(&mut self.pending_hlines);
        }

        let columns = self.column_count();
        for (index, row) in self.rows.iter_mut().enumerate() {
            if row.cells.len() > columns {
                return Err(DimensionError {
                    row: index,
                    cells: row.cells.len(),
                    columns,
                });
            }
            row.cells.resize_with(columns, GridCell::empty);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(table: &mut ArrayOfAtoms, rows: &[&[char]]) {
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                table.add_row(None);
            }
            for (j, ch) in row.iter().enumerate() {
                if j > 0 {
                    table.add_col();
                }
                table.add_atom(Atom::char(*ch));
            }
        }
    }

    #[test]
    fn test_rows_are_padded() {
        let mut table = ArrayOfAtoms::new(ColumnFormat::parse("ccc"));
        feed(&mut table, &[&['a', 'b', 'c'], &['d']]);
        table.check_dimensions().unwrap();
        assert_eq!(table.rows().len(), 2);
        assert!(table.rows().iter().all(|r| r.cells.len() == 3));
    }

    #[test]
    fn test_too_many_cells() {
        let mut table = ArrayOfAtoms::new(ColumnFormat::parse("cc"));
        feed(&mut table, &[&['a', 'b'], &['c', 'd', 'e']]);
        let err = table.check_dimensions().unwrap_err();
        assert_eq!(
            err,
            DimensionError {
                row: 1,
                cells: 3,
                columns: 2
            }
        );
    }

    #[test]
    fn test_natural_columns() {
        let mut table = ArrayOfAtoms::default();
        feed(&mut table, &[&['a'], &['b', 'c']]);
        table.check_dimensions().unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows()[0].cells.len(), 2);
    }

    #[test]
    fn test_trailing_row_separator() {
        let mut table = ArrayOfAtoms::default();
        feed(&mut table, &[&['a', 'b']]);
        table.add_row(None);
        table.add_atom(Atom::HLine(HLine::full()));
        table.check_dimensions().unwrap();
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.trailing_hlines(), &[HLine::full()]);
    }

    #[test]
    fn test_markers() {
        let mut table = ArrayOfAtoms::default();
        table.add_atom(Atom::HLine(HLine::full()));
        table.add_atom(Atom::RowColor(Color::WHITE));
        table.add_atom(Atom::CellColor(Color::BLACK));
        table.add_atom(Atom::char('x'));
        table.add_col();
        table.add_atom(Atom::char('y'));
        table.add_atom(Atom::HLine(HLine::partial(1, 1)));
        table.add_row(None);
        table.add_atom(Atom::char('z'));
        table.check_dimensions().unwrap();

        let rows = table.rows();
        assert_eq!(rows[0].hlines_before, vec![HLine::full()]);
        assert_eq!(rows[0].color, Some(Color::WHITE));
        assert_eq!(rows[0].cells[0].color, Some(Color::BLACK));
        assert_eq!(rows[0].cells[1].color, None);
        assert_eq!(rows[1].hlines_before, vec![HLine::partial(1, 1)]);
    }
}
