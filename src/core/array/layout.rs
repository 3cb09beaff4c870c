//! Two-pass array layout
//!
//! The first pass lays out every cell and takes each column's width as the
//! widest cell. The second pass pads the cells to their column widths, puts
//! the separators between them and stacks the rows around the math axis.

use log::debug;

use super::builder::ArrayOfAtoms;
use crate::core::boxes::{HAlign, LayoutBox};
use crate::core::environment::{Environment, MathStyle};
use crate::core::layout::math::{delimiter, fence_size};
use crate::utils::error::DimensionError;

/// Row strut: height and depth in em
const STRUT: (f64, f64) = (0.84, 0.36);
/// Space between double rules (doublerulesep)
const DOUBLE_RULE_SEP: f64 = 0.2;

/// Presentation of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayOptions {
    /// Style the cells are set in
    pub style: MathStyle,
    /// Space between columns in em
    pub column_gap: f64,
    /// Half a column gap at the outer edges
    pub outer_gap: bool,
    /// Columns come in right/left pairs with no gap inside a pair
    pub paired: bool,
    /// Scale factor of the row strut (arraystretch)
    pub row_stretch: f64,
    pub left: Option<char>,
    pub right: Option<char>,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        ArrayOptions {
            style: MathStyle::Text,
            column_gap: 1.0,
            outer_gap: true,
            paired: false,
            row_stretch: 1.0,
            left: None,
            right: None,
        }
    }
}

impl ArrayOptions {
    pub fn with_fences(mut self, left: Option<char>, right: Option<char>) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    fn is_fenced(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

/// Horizontal metrics shared by all rows
struct Grid {
    widths: Vec<f64>,
    /// Space before and after the rules of every boundary
    gaps: Vec<(f64, f64)>,
    rules: Vec<usize>,
    theta: f64,
    rule_sep: f64,
}

impl Grid {
    fn boundary_width(&self, j: usize) -> f64 {
        let rules = self.rules[j] as f64;
        let seps = self.rules[j].saturating_sub(1) as f64;
        self.gaps[j].0 + self.gaps[j].1 + rules * self.theta + seps * self.rule_sep
    }

    /// Boundary `j` as a run of boxes spanning a row of the given height and depth
    fn boundary(&self, j: usize, height: f64, depth: f64) -> Vec<LayoutBox> {
        let mut out = vec![LayoutBox::kern(self.gaps[j].0)];
        for k in 0..self.rules[j] {
            if k > 0 {
                out.push(LayoutBox::kern(self.rule_sep));
            }
            out.push(LayoutBox::rule(self.theta, height, depth));
        }
        out.push(LayoutBox::kern(self.gaps[j].1));
        out
    }

    /// Left edge of column `c`'s content
    fn column_start(&self, c: usize) -> f64 {
        (0..=c).map(|j| self.boundary_width(j)).sum::<f64>() + self.widths[..c].iter().sum::<f64>()
    }

    fn total_width(&self) -> f64 {
        let n = self.widths.len();
        self.column_start(n.saturating_sub(1))
            + self.widths.last().copied().unwrap_or(0.0)
            + self.boundary_width(n)
    }
}

/// Lay out a table. Fails when a row's cell count differs from the column
/// count (the declared one, else the first row's).
pub fn layout_array(
    table: &ArrayOfAtoms,
    options: &ArrayOptions,
    env: &Environment,
) -> Result<LayoutBox, DimensionError> {
    let rows = table.rows();
    let columns = table
        .format
        .declared()
        .unwrap_or_else(|| rows.first().map_or(0, |r| r.cells.len()));
    for (index, row) in rows.iter().enumerate() {
        if row.cells.len() != columns {
            return Err(DimensionError {
                row: index,
                cells: row.cells.len(),
                columns,
            });
        }
    }
    if rows.is_empty() || columns == 0 {
        return Ok(LayoutBox::empty());
    }

    let cell_env = env.with_style(options.style);
    let em = cell_env.em();

    // First pass: natural cell boxes and column widths
    let boxes: Vec<Vec<LayoutBox>> = rows
        .iter()
        .map(|row| row.cells.iter().map(|c| c.content.layout(&cell_env)).collect())
        .collect();

    let widths: Vec<f64> = (0..columns)
        .map(|j| {
            let natural = boxes.iter().fold(0.0_f64, |w, row| w.max(row[j].width));
            match table.format.column(j).width {
                Some(fixed) => natural.max(fixed.to_points(em)),
                None => natural,
            }
        })
        .collect();

    let half = options.column_gap * em / 2.0;
    let outer = if options.outer_gap { half } else { 0.0 };
    let gaps: Vec<(f64, f64)> = (0..=columns)
        .map(|j| {
            if table.format.boundary(j).suppress_gap {
                (0.0, 0.0)
            } else if j == 0 {
                (0.0, outer)
            } else if j == columns {
                (outer, 0.0)
            } else if options.paired && j % 2 == 1 {
                (0.0, 0.0)
            } else {
                (half, half)
            }
        })
        .collect();

    let grid = Grid {
        widths,
        gaps,
        rules: (0..=columns).map(|j| table.format.boundary(j).rules).collect(),
        theta: cell_env.rule_thickness(),
        rule_sep: DOUBLE_RULE_SEP * em,
    };
    let total_width = grid.total_width();
    let strut_height = STRUT.0 * options.row_stretch * em;
    let strut_depth = STRUT.1 * options.row_stretch * em;

    // Second pass: padded rows stacked with their rules
    let mut stack = Vec::with_capacity(rows.len() * 2);
    let mut baseline = 0;
    for (row, cells) in rows.iter().zip(boxes) {
        for line in &row.hlines_before {
            stack.push(hline_box(&grid, line.span(columns)));
        }

        let height = cells.iter().fold(strut_height, |h, b| h.max(b.height));
        let depth = cells.iter().fold(strut_depth, |d, b| d.max(b.depth));

        let mut children = Vec::with_capacity(columns * 4);
        for (j, (cell, b)) in row.cells.iter().zip(cells).enumerate() {
            children.extend(grid.boundary(j, height, depth));
            let spec = table.format.column(j);
            let align = if spec.width.is_some() { HAlign::Left } else { spec.align };
            let padded = LayoutBox::hbox(vec![
                LayoutBox::strut(0.0, height, depth),
                b.aligned(grid.widths[j], align),
            ]);
            children.push(match cell.color {
                Some(bg) => LayoutBox::colored(padded, None, Some(bg)),
                None => padded,
            });
        }
        children.extend(grid.boundary(columns, height, depth));

        let line = LayoutBox::hbox(children);
        stack.push(match row.color {
            Some(bg) => LayoutBox::colored(line, None, Some(bg)),
            None => line,
        });
        baseline = stack.len() - 1;
        if let Some(gap) = row.gap {
            stack.push(LayoutBox::vkern(gap.to_points(em)));
        }
    }
    for line in table.trailing_hlines() {
        stack.push(hline_box(&grid, line.span(columns)));
    }

    let body = LayoutBox::vbox(stack, baseline);
    debug!(
        "array {}x{}: {:.3} x {:.3}",
        rows.len(),
        columns,
        total_width,
        body.total_height()
    );
    let shift = (body.height - body.depth) / 2.0 - env.axis_height();
    let centered = LayoutBox::hbox(vec![body.with_shift(shift)]);

    if !options.is_fenced() {
        return Ok(centered);
    }
    let target = fence_size(centered.height, centered.depth, env);
    Ok(LayoutBox::hbox(vec![
        delimiter(options.left, target, env),
        centered,
        delimiter(options.right, target, env),
    ]))
}

/// Horizontal rule over the zero-based column range `span`
fn hline_box(grid: &Grid, span: Option<(usize, usize)>) -> LayoutBox {
    let Some((first, last)) = span else {
        return LayoutBox::empty();
    };
    let total = grid.total_width();
    let (start, end) = if first == 0 && last + 1 == grid.widths.len() {
        (0.0, total)
    } else {
        let start = grid.column_start(first) - grid.gaps[first].1;
        let end = grid.column_start(last) + grid.widths[last] + grid.gaps[last + 1].0;
        (start, end)
    };
    LayoutBox::hbox(vec![
        LayoutBox::kern(start),
        LayoutBox::rule(end - start, grid.theta, 0.0),
        LayoutBox::kern(total - end),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::array::cell::ColumnFormat;
    use crate::core::atom::Atom;
    use crate::core::array::hline::HLine;
    use crate::core::boxes::BoxKind;
    use crate::data::colors::Color;

    fn env() -> Environment {
        Environment::new(MathStyle::Text, 10.0)
    }

    fn cells(rows: &[&[char]]) -> Vec<Vec<Atom>> {
        rows.iter()
            .map(|r| r.iter().map(|c| Atom::char(*c)).collect())
            .collect()
    }

    #[test]
    fn test_unequal_rows_fail() {
        let table = ArrayOfAtoms::from_rows(
            ColumnFormat::parse("cc"),
            cells(&[&['a', 'b'], &['c', 'd', 'e']]),
        );
        let err = layout_array(&table, &ArrayOptions::default(), &env()).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.columns, 2);
    }

    #[test]
    fn test_equal_rows_succeed() {
        let table = ArrayOfAtoms::from_rows(
            ColumnFormat::parse("cc"),
            cells(&[&['a', 'b'], &['c', 'd']]),
        );
        let b = layout_array(&table, &ArrayOptions::default(), &env()).unwrap();
        assert!(b.width > 0.0);
        assert!(b.height > 0.0 && b.depth > 0.0);
    }

    #[test]
    fn test_columns_share_width() {
        let table = ArrayOfAtoms::from_rows(
            ColumnFormat::default(),
            cells(&[&['m', 'i'], &['i', 'm']]),
        );
        let options = ArrayOptions {
            outer_gap: false,
            ..Default::default()
        };
        let b = layout_array(&table, &options, &env()).unwrap();
        let stack = &b.children()[0];
        let rows: Vec<&LayoutBox> = stack.children().iter().collect();
        assert_eq!(rows.len(), 2);
        assert!((rows[0].width - rows[1].width).abs() < 1e-9);
        assert!((rows[0].width - b.width).abs() < 1e-9);
    }

    #[test]
    fn test_rules_add_width() {
        let plain = ArrayOfAtoms::from_rows(ColumnFormat::parse("cc"), cells(&[&['a', 'b']]));
        let ruled = ArrayOfAtoms::from_rows(ColumnFormat::parse("|c|c|"), cells(&[&['a', 'b']]));
        let options = ArrayOptions::default();
        let w0 = layout_array(&plain, &options, &env()).unwrap().width;
        let w1 = layout_array(&ruled, &options, &env()).unwrap().width;
        assert!((w1 - w0 - 3.0 * env().rule_thickness()).abs() < 1e-9);
    }

    #[test]
    fn test_centered_on_axis() {
        let table = ArrayOfAtoms::from_rows(
            ColumnFormat::default(),
            cells(&[&['a'], &['b'], &['c']]),
        );
        let b = layout_array(&table, &ArrayOptions::default(), &env()).unwrap();
        let middle = (b.height - b.depth) / 2.0;
        assert!((middle - env().axis_height()).abs() < 1e-9);
    }

    #[test]
    fn test_fences_and_colors() {
        let mut table = ArrayOfAtoms::default();
        table.add_atom(Atom::char('a'));
        table.add_row(None);
        table.add_atom(Atom::CellColor(Color::WHITE));
        table.add_atom(Atom::char('b'));
        table.check_dimensions().unwrap();

        let options = ArrayOptions::default().with_fences(Some('('), Some(')'));
        let b = layout_array(&table, &options, &env()).unwrap();
        assert_eq!(b.children().len(), 3);
        assert!(b.is_colored());
        assert!(!matches!(b.children()[0].kind, BoxKind::Glue { .. }));
    }

    #[test]
    fn test_hline_spans_table() {
        let mut table = ArrayOfAtoms::new(ColumnFormat::parse("cc"));
        table.add_atom(Atom::HLine(HLine::full()));
        table.add_atom(Atom::char('a'));
        table.add_col();
        table.add_atom(Atom::char('b'));
        table.check_dimensions().unwrap();
        let b = layout_array(&table, &ArrayOptions::default(), &env()).unwrap();
        let stack = &b.children()[0];
        let rule = &stack.children()[0];
        assert!((rule.width - b.width).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table() {
        let table = ArrayOfAtoms::default();
        let b = layout_array(&table, &ArrayOptions::default(), &env()).unwrap();
        assert_eq!(b.width, 0.0);
    }
}
