//! Measured box tree
//!
//! A [`LayoutBox`] is fixed at construction: width, height (above the
//! baseline), depth (below the baseline) and a shift. Inside a horizontal box
//! a positive shift lowers the child; children of vertical boxes are never
//! shifted. All lengths are in points.
//!
//! Painting walks the tree and reports absolute pen positions to a
//! [`Painter`]. The y axis grows downward and every position handed to the
//! painter is a baseline unless stated otherwise.

use std::fmt::Write;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::core::environment::FontSet;
use crate::data::colors::Color;

/// What a box draws
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BoxKind {
    /// A single glyph at `size` points
    Char { ch: char, font: FontSet, size: f64 },
    /// A filled rectangle covering the whole box
    Rule,
    /// Invisible box that only contributes its metrics
    Strut,
    /// Horizontal space; `breakable` marks a legal line break point
    Glue { breakable: bool },
    /// A delimiter stretched to fill the box
    Delimiter { ch: char },
    /// Children laid out left to right on a common baseline
    HBox { children: Vec<LayoutBox> },
    /// Children stacked top to bottom; the box baseline is that of `children[baseline]`
    VBox {
        children: Vec<LayoutBox>,
        baseline: usize,
    },
    /// Child drawn with a foreground color over an optional background
    Colored {
        fg: Option<Color>,
        bg: Option<Color>,
        child: Box<LayoutBox>,
    },
    /// Child surrounded by padding and an optional rule border
    Framed {
        thickness: f64,
        padding: f64,
        frame: Option<Color>,
        bg: Option<Color>,
        child: Box<LayoutBox>,
    },
}

/// A measured layout node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LayoutBox {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub shift: f64,
    pub kind: BoxKind,
}

/// Backend receiving paint callbacks from [`LayoutBox::draw`]
pub trait Painter {
    /// Draw `ch` with its baseline origin at (`x`, `y`)
    fn draw_char(&mut self, ch: char, font: &FontSet, size: f64, x: f64, y: f64, color: Color);

    /// Draw `ch` stretched to fill the rectangle whose top-left corner is (`x`, `y`)
    fn draw_delimiter(&mut self, ch: char, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Fill the rectangle whose top-left corner is (`x`, `y`)
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Stroke the inside of the rectangle whose top-left corner is (`x`, `y`)
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, thickness: f64, color: Color);
}

impl LayoutBox {
    fn leaf(width: f64, height: f64, depth: f64, kind: BoxKind) -> Self {
        LayoutBox {
            width,
            height,
            depth,
            shift: 0.0,
            kind,
        }
    }

    /// The zero box, identity of horizontal concatenation
    pub fn empty() -> Self {
        LayoutBox::strut(0.0, 0.0, 0.0)
    }

    pub fn strut(width: f64, height: f64, depth: f64) -> Self {
        LayoutBox::leaf(width, height, depth, BoxKind::Strut)
    }

    pub fn rule(width: f64, height: f64, depth: f64) -> Self {
        LayoutBox::leaf(width, height, depth, BoxKind::Rule)
    }

    /// Horizontal space; may be negative
    pub fn glue(width: f64, breakable: bool) -> Self {
        LayoutBox::leaf(width, 0.0, 0.0, BoxKind::Glue { breakable })
    }

    /// Unbreakable horizontal space
    pub fn kern(width: f64) -> Self {
        LayoutBox::glue(width, false)
    }

    /// Vertical space inside a vertical box
    pub fn vkern(height: f64) -> Self {
        LayoutBox::strut(0.0, height, 0.0)
    }

    pub fn glyph(ch: char, font: FontSet, size: f64, width: f64, height: f64, depth: f64) -> Self {
        LayoutBox::leaf(width, height, depth, BoxKind::Char { ch, font, size })
    }

    pub fn delimiter(ch: char, width: f64, height: f64, depth: f64) -> Self {
        LayoutBox::leaf(width, height, depth, BoxKind::Delimiter { ch })
    }

    /// Horizontal box: width is the sum of the children's widths, height and
    /// depth the maxima over the (shifted) children
    pub fn hbox(children: Vec<LayoutBox>) -> Self {
        let mut width = 0.0;
        let mut height: f64 = 0.0;
        let mut depth: f64 = 0.0;
        for child in &children {
            width += child.width;
            height = height.max(child.height - child.shift);
            depth = depth.max(child.depth + child.shift);
        }
        LayoutBox::leaf(width, height, depth, BoxKind::HBox { children })
    }

    /// Vertical box stacked top to bottom, with its baseline on the baseline
    /// of `children[baseline]`
    pub fn vbox(children: Vec<LayoutBox>, baseline: usize) -> Self {
        debug_assert!(baseline < children.len().max(1));
        let mut width: f64 = 0.0;
        let mut height = 0.0;
        let mut depth = 0.0;
        for (i, child) in children.iter().enumerate() {
            width = width.max(child.width);
            let total = child.height + child.depth;
            match i.cmp(&baseline) {
                std::cmp::Ordering::Less => height += total,
                std::cmp::Ordering::Equal => {
                    height += child.height;
                    depth += child.depth;
                }
                std::cmp::Ordering::Greater => depth += total,
            }
        }
        LayoutBox::leaf(width, height, depth, BoxKind::VBox { children, baseline })
    }

    pub fn colored(child: LayoutBox, fg: Option<Color>, bg: Option<Color>) -> Self {
        LayoutBox::leaf(
            child.width,
            child.height,
            child.depth,
            BoxKind::Colored {
                fg,
                bg,
                child: Box::new(child),
            },
        )
    }

    /// Frame `child`; a zero `thickness` gives a padded background box
    pub fn framed(
        child: LayoutBox,
        thickness: f64,
        padding: f64,
        frame: Option<Color>,
        bg: Option<Color>,
    ) -> Self {
        let edge = thickness + padding;
        LayoutBox::leaf(
            child.width + 2.0 * edge,
            child.height + edge,
            child.depth + edge,
            BoxKind::Framed {
                thickness,
                padding,
                frame,
                bg,
                child: Box::new(child),
            },
        )
    }

    /// Place `self` in a box of `width`, aligned horizontally. Boxes that
    /// are already at least that wide are returned unchanged.
    pub fn aligned(self, width: f64, align: HAlign) -> LayoutBox {
        let extra = width - self.width;
        if extra <= 0.0 {
            return self;
        }
        let (left, right) = match align {
            HAlign::Left => (0.0, extra),
            HAlign::Center => (extra / 2.0, extra / 2.0),
            HAlign::Right => (extra, 0.0),
        };
        LayoutBox::hbox(vec![LayoutBox::kern(left), self, LayoutBox::kern(right)])
    }

    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    /// Height plus depth
    pub fn total_height(&self) -> f64 {
        self.height + self.depth
    }

    pub fn children(&self) -> &[LayoutBox] {
        match &self.kind {
            BoxKind::HBox { children } | BoxKind::VBox { children, .. } => children,
            BoxKind::Colored { child, .. } | BoxKind::Framed { child, .. } => {
                std::slice::from_ref(child.as_ref())
            }
            _ => &[],
        }
    }

    pub fn is_breakable_glue(&self) -> bool {
        matches!(self.kind, BoxKind::Glue { breakable: true })
    }

    /// Whether any box in the tree sets a color
    pub fn is_colored(&self) -> bool {
        match &self.kind {
            BoxKind::Colored { fg, bg, .. } if fg.is_some() || bg.is_some() => true,
            BoxKind::Framed { frame, bg, .. } if frame.is_some() || bg.is_some() => true,
            _ => self.children().iter().any(LayoutBox::is_colored),
        }
    }

    /// Paint with black as the default foreground; (`x`, `y`) is the left end of the baseline
    pub fn draw(&self, painter: &mut dyn Painter, x: f64, y: f64) {
        self.draw_with(painter, x, y, Color::BLACK);
    }

    /// Paint with `fg` as the inherited foreground color
    pub fn draw_with(&self, painter: &mut dyn Painter, x: f64, y: f64, fg: Color) {
        match &self.kind {
            BoxKind::Char { ch, font, size } => painter.draw_char(*ch, font, *size, x, y, fg),
            BoxKind::Rule => {
                painter.fill_rect(x, y - self.height, self.width, self.total_height(), fg)
            }
            BoxKind::Strut | BoxKind::Glue { .. } => {}
            BoxKind::Delimiter { ch } => painter.draw_delimiter(
                *ch,
                x,
                y - self.height,
                self.width,
                self.total_height(),
                fg,
            ),
            BoxKind::HBox { children } => {
                let mut cx = x;
                for child in children {
                    child.draw_with(painter, cx, y + child.shift, fg);
                    cx += child.width;
                }
            }
            BoxKind::VBox { children, .. } => {
                let mut top = y - self.height;
                for child in children {
                    child.draw_with(painter, x, top + child.height, fg);
                    top += child.total_height();
                }
            }
            BoxKind::Colored { fg: color, bg, child } => {
                if let Some(bg) = bg {
                    painter.fill_rect(x, y - self.height, self.width, self.total_height(), *bg);
                }
                child.draw_with(painter, x, y, color.unwrap_or(fg));
            }
            BoxKind::Framed {
                thickness,
                padding,
                frame,
                bg,
                child,
            } => {
                let top = y - self.height;
                if let Some(bg) = bg {
                    painter.fill_rect(x, top, self.width, self.total_height(), *bg);
                }
                if *thickness > 0.0 {
                    painter.stroke_rect(
                        x,
                        top,
                        self.width,
                        self.total_height(),
                        *thickness,
                        frame.unwrap_or(fg),
                    );
                }
                child.draw_with(painter, x + thickness + padding, y, fg);
            }
        }
    }

    /// Indented textual dump of the tree, one box per line
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let label = match &self.kind {
            BoxKind::Char { ch, .. } => format!("char '{}'", ch),
            BoxKind::Rule => "rule".to_string(),
            BoxKind::Strut => "strut".to_string(),
            BoxKind::Glue { breakable: true } => "glue (breakable)".to_string(),
            BoxKind::Glue { breakable: false } => "glue".to_string(),
            BoxKind::Delimiter { ch } => format!("delimiter '{}'", ch),
            BoxKind::HBox { .. } => "hbox".to_string(),
            BoxKind::VBox { baseline, .. } => format!("vbox (baseline {})", baseline),
            BoxKind::Colored { fg, bg, .. } => format!(
                "colored fg={} bg={}",
                fg.map_or("-".to_string(), |c| c.to_string()),
                bg.map_or("-".to_string(), |c| c.to_string())
            ),
            BoxKind::Framed { .. } => "framed".to_string(),
        };
        let _ = write!(
            out,
            "{:indent$}{} w={:.3} h={:.3} d={:.3}",
            "",
            label,
            self.width,
            self.height,
            self.depth,
            indent = depth * 2
        );
        if self.shift != 0.0 {
            let _ = write!(out, " shift={:.3}", self.shift);
        }
        out.push('\n');
        for child in self.children() {
            child.dump_into(out, depth + 1);
        }
    }
}

/// Horizontal alignment of a box inside a wider one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Colors of a run of boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

/// A box with the chain of tints it is drawn in, outermost first, as
/// indices into a tint table
pub type TintedBox = (LayoutBox, Vec<usize>);

/// Wrap maximal runs of boxes sharing a tint in one colored box per tint,
/// nesting inner tints inside outer ones
pub fn wrap_tinted(items: Vec<TintedBox>, tints: &[Tint]) -> Vec<LayoutBox> {
    wrap_tinted_at(items, 0, tints)
}

fn wrap_tinted_at(items: Vec<TintedBox>, depth: usize, tints: &[Tint]) -> Vec<LayoutBox> {
    let mut out = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();
    while let Some((b, path)) = iter.next() {
        let Some(&id) = path.get(depth) else {
            out.push(b);
            continue;
        };
        let mut run = vec![(b, path)];
        while iter.peek().is_some_and(|(_, next)| next.get(depth) == Some(&id)) {
            run.extend(iter.next());
        }
        let inner = LayoutBox::hbox(wrap_tinted_at(run, depth + 1, tints));
        let tint = tints.get(id).copied().unwrap_or(Tint { fg: None, bg: None });
        out.push(LayoutBox::colored(inner, tint.fg, tint.bg));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(w: f64, h: f64, d: f64) -> LayoutBox {
        LayoutBox::glyph('x', FontSet::MATH, 10.0, w, h, d)
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Painter for Recorder {
        fn draw_char(&mut self, ch: char, _: &FontSet, _: f64, x: f64, y: f64, color: Color) {
            self.calls.push(format!("char {} {} {} {}", ch, x, y, color));
        }
        fn draw_delimiter(&mut self, ch: char, x: f64, y: f64, _: f64, h: f64, _: Color) {
            self.calls.push(format!("delim {} {} {} {}", ch, x, y, h));
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
            self.calls.push(format!("fill {} {} {} {} {}", x, y, w, h, color));
        }
        fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, t: f64, _: Color) {
            self.calls.push(format!("stroke {} {} {} {} {}", x, y, w, h, t));
        }
    }

    #[test]
    fn test_hbox_metrics() {
        let b = LayoutBox::hbox(vec![glyph(1.0, 2.0, 0.5), glyph(2.0, 1.0, 1.0)]);
        assert_eq!(b.width, 3.0);
        assert_eq!(b.height, 2.0);
        assert_eq!(b.depth, 1.0);
    }

    #[test]
    fn test_hbox_respects_shift() {
        let b = LayoutBox::hbox(vec![glyph(1.0, 2.0, 0.0).with_shift(-1.0)]);
        assert_eq!(b.height, 3.0);
        assert_eq!(b.depth, 0.0);
    }

    #[test]
    fn test_vbox_metrics() {
        let b = LayoutBox::vbox(
            vec![glyph(1.0, 2.0, 0.5), LayoutBox::vkern(1.0), glyph(3.0, 1.0, 1.0)],
            2,
        );
        assert_eq!(b.width, 3.0);
        assert_eq!(b.height, 2.5 + 1.0 + 1.0);
        assert_eq!(b.depth, 1.0);
    }

    #[test]
    fn test_empty_is_identity() {
        let b = glyph(1.0, 2.0, 0.5);
        let left = LayoutBox::hbox(vec![LayoutBox::empty(), b.clone()]);
        let right = LayoutBox::hbox(vec![b.clone(), LayoutBox::empty()]);
        for c in [left, right] {
            assert_eq!((c.width, c.height, c.depth), (b.width, b.height, b.depth));
        }
    }

    #[test]
    fn test_framed_metrics() {
        let b = LayoutBox::framed(glyph(1.0, 1.0, 0.0), 0.5, 0.5, None, None);
        assert_eq!(b.width, 3.0);
        assert_eq!(b.height, 2.0);
        assert_eq!(b.depth, 1.0);
        assert!(!b.is_colored());
    }

    #[test]
    fn test_colored_flag_bubbles_up() {
        let red = Color::rgb(255, 0, 0);
        let inner = LayoutBox::colored(glyph(1.0, 1.0, 0.0), Some(red), None);
        let outer = LayoutBox::hbox(vec![glyph(1.0, 1.0, 0.0), inner]);
        assert!(outer.is_colored());
        assert!(!LayoutBox::hbox(vec![glyph(1.0, 1.0, 0.0)]).is_colored());
    }

    #[test]
    fn test_wrap_tinted_groups_runs() {
        let red = Tint {
            fg: Some(Color::rgb(255, 0, 0)),
            bg: None,
        };
        let blue = Tint {
            fg: Some(Color::rgb(0, 0, 255)),
            bg: None,
        };
        let items = vec![
            (glyph(1.0, 1.0, 0.0), vec![]),
            (glyph(1.0, 1.0, 0.0), vec![0]),
            (glyph(1.0, 1.0, 0.0), vec![0, 1]),
            (glyph(1.0, 1.0, 0.0), vec![0]),
            (glyph(1.0, 1.0, 0.0), vec![]),
        ];
        let out = wrap_tinted(items, &[red, blue]);
        assert_eq!(out.len(), 3);
        let BoxKind::Colored { fg, child, .. } = &out[1].kind else {
            panic!("expected a colored run");
        };
        assert_eq!(*fg, red.fg);
        assert_eq!(out[1].width, 3.0);
        assert_eq!(child.children().len(), 3);
        assert!(matches!(child.children()[1].kind, BoxKind::Colored { fg, .. } if fg == blue.fg));
    }

    #[test]
    fn test_aligned() {
        let b = glyph(2.0, 1.0, 0.0).aligned(6.0, HAlign::Center);
        assert_eq!(b.width, 6.0);
        assert_eq!(b.children()[0].width, 2.0);
        let wide = glyph(8.0, 1.0, 0.0).aligned(6.0, HAlign::Left);
        assert_eq!(wide.width, 8.0);
    }

    #[test]
    fn test_draw_positions() {
        let red = Color::rgb(255, 0, 0);
        let b = LayoutBox::hbox(vec![
            glyph(1.0, 1.0, 0.0),
            LayoutBox::colored(glyph(1.0, 1.0, 0.0), Some(red), None),
        ]);
        let mut rec = Recorder::default();
        b.draw(&mut rec, 10.0, 20.0);
        assert_eq!(
            rec.calls,
            vec![
                "char x 10 20 #000000".to_string(),
                "char x 11 20 #FF0000".to_string(),
            ]
        );
    }

    #[test]
    fn test_draw_vbox_baselines() {
        let b = LayoutBox::vbox(vec![glyph(1.0, 1.0, 0.5), glyph(1.0, 2.0, 0.0)], 1);
        let mut rec = Recorder::default();
        b.draw(&mut rec, 0.0, 10.0);
        // top of the box is at 10 - 3.5; first baseline 1 below that
        assert_eq!(rec.calls[0], "char x 0 7.5 #000000");
        assert_eq!(rec.calls[1], "char x 0 10 #000000");
    }

    #[test]
    fn test_dump_lists_children() {
        let b = LayoutBox::hbox(vec![glyph(1.0, 1.0, 0.0), LayoutBox::glue(0.5, true)]);
        let dump = b.dump();
        assert!(dump.starts_with("hbox"));
        assert!(dump.contains("  char 'x'"));
        assert!(dump.contains("glue (breakable)"));
    }
}
