//! Box construction
//!
//! `Atom::layout` is total: every well-formed atom tree yields a box. Rows
//! insert inter-atom glue from the spacing table after TeX's binary-operator
//! reclassification; the math-specific constructions (scripts, fractions,
//! radicals, fences) live in [`math`].

pub mod math;

use crate::core::atom::{Atom, MathClass, SwitchKind};
use crate::core::boxes::{wrap_tinted, HAlign, LayoutBox, Tint, TintedBox};
use crate::core::environment::{Environment, FontChange, FontFamily, FontSet};
use crate::data::metrics::char_metrics;
use crate::data::spacing::{glue_mu, THIN};

/// Padding of `\fbox` and `\colorbox` (fboxsep)
const FBOX_PADDING: f64 = 0.3;
/// Gap between the lines of a multi-line formula
const LINE_GAP: f64 = 0.3;
/// Minimum line height and depth of a multi-line formula
const LINE_STRUT: (f64, f64) = (0.7, 0.3);

impl Atom {
    /// Lay out this atom in `env`
    pub fn layout(&self, env: &Environment) -> LayoutBox {
        match self {
            Atom::Empty | Atom::HLine(_) | Atom::CellColor(_) | Atom::RowColor(_) => {
                LayoutBox::empty()
            }
            Atom::Symbol { ch, .. } => {
                if self.is_large_op() {
                    math::large_op(*ch, env)
                } else {
                    math::glyph(*ch, env, true).0
                }
            }
            Atom::Row(children) => layout_row(children, env),
            Atom::Scripts { base, sup, sub } => {
                math::scripts(base, sup.as_deref(), sub.as_deref(), env)
            }
            Atom::Fraction { num, den, rule } => math::fraction(num, den, *rule, env),
            Atom::Radical { body, degree } => math::radical(body, degree.as_deref(), env),
            Atom::Color { body, fg, bg } => {
                let inner = body.layout(&env.with_fg(*fg).with_bg(*bg));
                LayoutBox::colored(inner, *fg, *bg)
            }
            Atom::FBox {
                body,
                ruled,
                frame,
                bg,
            } => {
                let inner = body.layout(env);
                let thickness = if *ruled { env.rule_thickness() } else { 0.0 };
                LayoutBox::framed(inner, thickness, env.param(FBOX_PADDING), *frame, *bg)
            }
            Atom::Array(array) => array.layout(env),
            Atom::Fenced {
                left,
                right,
                segments,
                middles,
            } => math::fenced(*left, *right, segments, middles, env),
            Atom::BigDelim { ch, size, class } => math::big_delimiter(*ch, *size, *class, env),
            Atom::Multline { lines, align } => layout_lines(lines, *align, env),
            Atom::Styled { style, body } => body.layout(&env.with_style(*style)),
            Atom::Font { change, body } => body.layout(&env.with_font(change.apply(env.font))),
            Atom::Switch { .. } => layout_row(std::slice::from_ref(self), env),
            Atom::Space(length) => {
                let width = length.to_points(env.em());
                LayoutBox::glue(width, width > 0.0)
            }
            Atom::Text { text, font } => layout_text(text, font.apply(text_font(env)), env),
            Atom::Class { body, .. } | Atom::Limits { base: body, .. } => body.layout(env),
            Atom::OpName { name, .. } => layout_text(name, text_font(env), env),
            Atom::VCentered(body) => {
                let inner = body.layout(env);
                let shift = (inner.height - inner.depth) / 2.0 - env.axis_height();
                LayoutBox::hbox(vec![inner.with_shift(shift)])
            }
            Atom::Decorated { body, decoration } => math::decorated(body, *decoration, env),
            Atom::Rule {
                width,
                height,
                raise,
            } => {
                let em = env.em();
                let rule = LayoutBox::rule(width.to_points(em), height.to_points(em), 0.0);
                LayoutBox::hbox(vec![rule.with_shift(-raise.to_points(em))])
            }
        }
    }
}

/// Upright roman font keeping the current weight
fn text_font(env: &Environment) -> FontSet {
    FontChange::family(FontFamily::Roman).apply(env.font)
}

/// TeX rules 5 and 6: a binary operator with nothing to operate on becomes ordinary
fn resolve_classes(mut classes: Vec<MathClass>) -> Vec<MathClass> {
    let mut prev: Option<usize> = None;

    for i in 0..classes.len() {
        let class = classes[i];
        if class == MathClass::None {
            continue;
        }
        match class {
            MathClass::Bin => {
                let prev_class = prev.map(|p| classes[p]);
                if matches!(
                    prev_class,
                    None | Some(MathClass::Bin)
                        | Some(MathClass::Op)
                        | Some(MathClass::Rel)
                        | Some(MathClass::Open)
                        | Some(MathClass::Punct)
                ) {
                    classes[i] = MathClass::Ord;
                }
            }
            MathClass::Rel | MathClass::Close | MathClass::Punct => {
                if let Some(p) = prev {
                    if classes[p] == MathClass::Bin {
                        classes[p] = MathClass::Ord;
                    }
                }
            }
            _ => {}
        }
        prev = Some(i);
    }

    if let Some(p) = prev {
        if classes[p] == MathClass::Bin {
            classes[p] = MathClass::Ord;
        }
    }
    classes
}

/// A row member once switches are expanded
struct RowItem<'a> {
    atom: &'a Atom,
    env: Environment,
    /// Tints from enclosing `\color` switches, outermost first
    tints: Vec<usize>,
}

/// Expand switches in place: their atoms join the enclosing row, set in
/// the switched environment
fn flatten_row<'a>(
    atoms: &'a [Atom],
    env: &Environment,
    path: &mut Vec<usize>,
    tints: &mut Vec<Tint>,
    out: &mut Vec<RowItem<'a>>,
) {
    for atom in atoms {
        let Atom::Switch { kind, body } = atom else {
            out.push(RowItem {
                atom,
                env: *env,
                tints: path.clone(),
            });
            continue;
        };
        match kind {
            SwitchKind::Style(style) => flatten_row(body, &env.with_style(*style), path, tints, out),
            SwitchKind::Font(change) => {
                flatten_row(body, &env.with_font(change.apply(env.font)), path, tints, out)
            }
            SwitchKind::Color(color) => {
                tints.push(Tint {
                    fg: Some(*color),
                    bg: None,
                });
                path.push(tints.len() - 1);
                flatten_row(body, &env.with_fg(Some(*color)), path, tints, out);
                path.pop();
            }
        }
    }
}

/// Lay out a row of sibling atoms with inter-atom glue. Glue following a
/// binary operator or a relation is a legal line break point. Switches are
/// transparent: spacing is resolved over the expanded sequence, and the
/// glue takes the style of the atom after it.
pub fn layout_row(atoms: &[Atom], env: &Environment) -> LayoutBox {
    let mut tints = Vec::new();
    let mut items = Vec::with_capacity(atoms.len());
    flatten_row(atoms, env, &mut Vec::new(), &mut tints, &mut items);
    let classes = resolve_classes(items.iter().map(|item| item.atom.class()).collect());

    let mut pieces: Vec<TintedBox> = Vec::with_capacity(items.len() * 2);
    let mut prev: Option<(MathClass, &[usize])> = None;

    for (item, class) in items.iter().zip(classes) {
        if class != MathClass::None {
            if let Some((left, left_tints)) = prev {
                let mu = glue_mu(left, class, item.env.style);
                if mu != 0.0 {
                    let breakable = matches!(left, MathClass::Bin | MathClass::Rel);
                    let shared = left_tints
                        .iter()
                        .zip(&item.tints)
                        .take_while(|(a, b)| a == b)
                        .map(|(a, _)| *a)
                        .collect();
                    pieces.push((LayoutBox::glue(mu * item.env.mu(), breakable), shared));
                }
            }
            prev = Some((class, &item.tints));
        }
        pieces.push((item.atom.layout(&item.env), item.tints.clone()));
    }

    LayoutBox::hbox(wrap_tinted(pieces, &tints))
}

/// A run of upright text; spaces are fixed interword glue
fn layout_text(text: &str, font: FontSet, env: &Environment) -> LayoutBox {
    let em = env.em();
    let mut children = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if ch == ' ' {
            children.push(LayoutBox::kern(THIN * 2.0 * env.mu()));
            continue;
        }
        let m = char_metrics(ch, &font).scaled(em);
        children.push(LayoutBox::glyph(ch, font, em, m.width, m.height, m.depth));
    }
    LayoutBox::hbox(children)
}

/// Stack lines vertically below the first line's baseline
fn layout_lines(lines: &[Atom], align: Option<HAlign>, env: &Environment) -> LayoutBox {
    let em = env.em();
    let boxes: Vec<LayoutBox> = lines
        .iter()
        .map(|line| {
            let b = line.layout(env);
            LayoutBox::hbox(vec![
                LayoutBox::strut(0.0, LINE_STRUT.0 * em, LINE_STRUT.1 * em),
                b,
            ])
        })
        .collect();

    let natural = boxes.iter().fold(0.0_f64, |w, b| w.max(b.width));
    let width = env.text_width.map_or(natural, |tw| tw.max(natural));
    let gap = env.interline.unwrap_or(LINE_GAP * em);
    let last = boxes.len().saturating_sub(1);

    let mut children = Vec::with_capacity(boxes.len() * 2);
    for (i, b) in boxes.into_iter().enumerate() {
        if i > 0 {
            children.push(LayoutBox::vkern(gap));
        }
        let line_align = match align {
            Some(a) => a,
            None if i == 0 && last > 0 => HAlign::Left,
            None if i == last && last > 0 => HAlign::Right,
            None => HAlign::Center,
        };
        children.push(b.aligned(width, line_align));
    }
    LayoutBox::vbox(children, 0)
}
