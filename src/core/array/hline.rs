//! Horizontal rules between array rows

/// A horizontal rule (full or partial) drawn above a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HLine {
    /// Starting column (1-based, as in `\cline{start-end}`)
    pub start_col: Option<usize>,
    /// Ending column (1-based, inclusive)
    pub end_col: Option<usize>,
}

impl HLine {
    /// Rule across the whole table
    pub fn full() -> Self {
        HLine {
            start_col: None,
            end_col: None,
        }
    }

    /// Rule across columns `start..=end`
    pub fn partial(start: usize, end: usize) -> Self {
        HLine {
            start_col: Some(start),
            end_col: Some(end),
        }
    }

    /// Zero-based column range covered by this rule in a table of `columns`
    /// columns; `None` when the range falls outside the table.
    pub fn span(&self, columns: usize) -> Option<(usize, usize)> {
        match (self.start_col, self.end_col) {
            (Some(s), Some(e)) => {
                let start = s.max(1) - 1;
                let end = e.min(columns);
                if start < end {
                    Some((start, end - 1))
                } else {
                    None
                }
            }
            _ if columns > 0 => Some((0, columns - 1)),
            _ => None,
        }
    }
}

/// Extract the column range from the argument of `\cline{a-b}`.
/// Returns `None` unless the argument has the form `number-number`.
pub fn extract_hline_range(arg: &str) -> Option<(usize, usize)> {
    let s = arg.trim();

    // Skip the optional (lr) trim of \cmidrule
    let s = match s.strip_prefix('(') {
        Some(rest) => rest.find(')').map_or(s, |end| &rest[end + 1..]),
        None => s,
    };

    let (first, second) = s.trim().split_once('-')?;
    let n1: usize = first.trim().parse().ok()?;
    let n2: usize = second.trim().parse().ok()?;
    Some((n1, n2))
}
