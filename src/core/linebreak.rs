//! Greedy line breaking
//!
//! Only the top level of a horizontal box is scanned, looking through
//! colored runs. Legal break points are the breakable glue items inserted
//! after binary operators and relations and by explicit positive spaces;
//! fractions, radicals and other compound boxes are never broken. The glue
//! at a break point is dropped.

use log::debug;

use crate::core::boxes::{wrap_tinted, BoxKind, LayoutBox, Tint, TintedBox};

/// Collect the children of `b`, opening colored horizontal runs so their
/// glue can be broken; each piece remembers the tints it was drawn in
fn open_runs(b: &LayoutBox, path: &mut Vec<usize>, tints: &mut Vec<Tint>, out: &mut Vec<TintedBox>) {
    for child in b.children() {
        match &child.kind {
            BoxKind::Colored { fg, bg, child: inner }
                if child.shift == 0.0
                    && inner.shift == 0.0
                    && matches!(inner.kind, BoxKind::HBox { .. }) =>
            {
                tints.push(Tint { fg: *fg, bg: *bg });
                path.push(tints.len() - 1);
                open_runs(inner, path, tints, out);
                path.pop();
            }
            _ => out.push((child.clone(), path.clone())),
        }
    }
}

/// Split `b` into lines no wider than `width` where possible, stacked with
/// `interline` points between them. A box that already fits, or that is not
/// a horizontal box, is returned unchanged.
pub fn split(b: &LayoutBox, width: f64, interline: f64) -> LayoutBox {
    if b.width <= width || !matches!(b.kind, BoxKind::HBox { .. }) {
        return b.clone();
    }
    let mut tints = Vec::new();
    let mut pieces = Vec::new();
    open_runs(b, &mut Vec::new(), &mut tints, &mut pieces);

    let mut lines: Vec<Vec<TintedBox>> = Vec::new();
    let mut current: Vec<TintedBox> = Vec::new();
    let mut current_width = 0.0;
    // Index in `current` of the last breakable glue
    let mut last_break: Option<usize> = None;

    for piece in pieces {
        let (child, _) = &piece;
        let breakable = child.is_breakable_glue();
        let child_width = child.width;
        if breakable {
            if current.is_empty() {
                // never start a line with a break point
                if !lines.is_empty() {
                    continue;
                }
            } else if current_width + child_width > width {
                debug!("break at glue overflowing by {:.3}", current_width + child_width - width);
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
                last_break = None;
                continue;
            }
        }

        while current_width + child_width > width {
            let Some(at) = last_break else {
                debug!("no break point before {:.3}, overflowing", current_width + child_width);
                break;
            };
            let rest = current.split_off(at + 1);
            current.pop();
            debug!("break at child {} of line {}", at, lines.len());
            lines.push(std::mem::replace(&mut current, rest));
            current_width = current.iter().map(|(c, _)| c.width).sum();
            last_break = current.iter().rposition(|(c, _)| c.is_breakable_glue());
        }

        if breakable {
            last_break = Some(current.len());
        }
        current_width += child_width;
        current.push(piece);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() <= 1 {
        return b.clone();
    }
    debug!("split into {} lines at width {:.3}", lines.len(), width);

    let mut stack = Vec::with_capacity(lines.len() * 2);
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            stack.push(LayoutBox::vkern(interline));
        }
        stack.push(LayoutBox::hbox(wrap_tinted(line, &tints)));
    }
    LayoutBox::vbox(stack, 0)
}
