//! Math constructions
//!
//! Placement follows the rules of Appendix G of the TeXbook: scripts
//! (rule 18), operator limits (rule 13a), generalized fractions (rule 15)
//! and radicals (rule 11). Font parameters come from [`crate::data::metrics`]
//! and are scaled to the style they are read in.

use log::trace;

use crate::core::atom::{Atom, Decoration, MathClass};
use crate::core::boxes::{HAlign, LayoutBox};
use crate::core::environment::{Environment, MathStyle};
use crate::data::metrics::*;

/// A glyph in the current font. Returns the box and the italic correction;
/// the correction is part of the box width only when `with_italic` is set.
pub fn glyph(ch: char, env: &Environment, with_italic: bool) -> (LayoutBox, f64) {
    let em = env.em();
    let m = char_metrics(ch, &env.font).scaled(em);
    let width = if with_italic { m.width + m.italic } else { m.width };
    (
        LayoutBox::glyph(ch, env.font, em, width, m.height, m.depth),
        m.italic,
    )
}

/// Large operator, enlarged in display style and centered on the axis
pub fn large_op(ch: char, env: &Environment) -> LayoutBox {
    let size = if env.style.is_display() {
        env.em() * DISPLAY_OP_SCALE
    } else {
        env.em()
    };
    let m = char_metrics(ch, &env.font).scaled(size);
    let b = LayoutBox::glyph(ch, env.font, size, m.width, m.height, m.depth);
    let shift = (m.height - m.depth) / 2.0 - env.axis_height();
    LayoutBox::hbox(vec![b.with_shift(shift)])
}

/// Attach scripts to `base`
pub fn scripts(base: &Atom, sup: Option<&Atom>, sub: Option<&Atom>, env: &Environment) -> LayoutBox {
    if base.limits_in(env.style) {
        return limits(base, sup, sub, env);
    }

    let (base_box, italic, is_char) = match base {
        Atom::Symbol { ch, .. } if !base.is_large_op() => {
            let (b, italic) = glyph(*ch, env, sup.is_none());
            (b, italic, true)
        }
        _ => (base.layout(env), 0.0, false),
    };

    let sup_env = env.sup();
    let sub_env = env.sub();
    let x = env.x_height();
    let theta = env.rule_thickness();

    let (mut u, mut v) = if is_char {
        (0.0, 0.0)
    } else {
        (
            base_box.height - sup_env.param(SUP_DROP),
            base_box.depth + sub_env.param(SUB_DROP),
        )
    };

    let script_space = LayoutBox::kern(env.param(SCRIPT_SPACE));
    let sup_box = sup.map(|a| a.layout(&sup_env));
    let sub_box = sub.map(|a| a.layout(&sub_env));

    match (sup_box, sub_box) {
        (None, None) => base_box,
        (None, Some(sub)) => {
            v = v.max(env.param(SUB1)).max(sub.height - 0.8 * x);
            LayoutBox::hbox(vec![base_box, sub.with_shift(v), script_space])
        }
        (Some(sup), sub) => {
            let p = if env.style == MathStyle::Display {
                SUP1
            } else if env.style.is_cramped() {
                SUP3
            } else {
                SUP2
            };
            u = u.max(env.param(p)).max(sup.depth + x / 4.0);

            let Some(sub) = sub else {
                return LayoutBox::hbox(vec![
                    base_box,
                    LayoutBox::kern(italic),
                    sup.with_shift(-u),
                    script_space,
                ]);
            };

            v = v.max(env.param(SUB2));
            let gap = (u - sup.depth) - (sub.height - v);
            if gap < 4.0 * theta {
                v += 4.0 * theta - gap;
                let psi = 0.8 * x - (u - sup.depth);
                if psi > 0.0 {
                    u += psi;
                    v -= psi;
                }
            }
            let gap = (u - sup.depth) - (sub.height - v);
            trace!("scripts: u={:.3} v={:.3} gap={:.3}", u, v, gap);

            let column = LayoutBox::vbox(
                vec![
                    LayoutBox::hbox(vec![LayoutBox::kern(italic), sup]),
                    LayoutBox::vkern(gap),
                    sub,
                ],
                0,
            );
            LayoutBox::hbox(vec![base_box, column.with_shift(-u), script_space])
        }
    }
}

/// Scripts set above and below an operator
pub fn limits(base: &Atom, sup: Option<&Atom>, sub: Option<&Atom>, env: &Environment) -> LayoutBox {
    let op = base.layout(env);
    let sup = sup.map(|a| a.layout(&env.sup()));
    let sub = sub.map(|a| a.layout(&env.sub()));

    let width = [Some(&op), sup.as_ref(), sub.as_ref()]
        .into_iter()
        .flatten()
        .fold(0.0_f64, |w, b| w.max(b.width));

    let mut children = Vec::with_capacity(7);
    if let Some(sup) = sup {
        let kern = env.param(BIG_OP_SPACING1).max(env.param(BIG_OP_SPACING3) - sup.depth);
        children.push(LayoutBox::vkern(env.param(BIG_OP_SPACING5)));
        children.push(sup.aligned(width, HAlign::Center));
        children.push(LayoutBox::vkern(kern));
    }
    let baseline = children.len();
    children.push(op.aligned(width, HAlign::Center));
    if let Some(sub) = sub {
        let kern = env.param(BIG_OP_SPACING2).max(env.param(BIG_OP_SPACING4) - sub.height);
        children.push(LayoutBox::vkern(kern));
        children.push(sub.aligned(width, HAlign::Center));
        children.push(LayoutBox::vkern(env.param(BIG_OP_SPACING5)));
    }
    LayoutBox::vbox(children, baseline)
}

/// Generalized fraction centered on the math axis
pub fn fraction(num: &Atom, den: &Atom, rule: bool, env: &Environment) -> LayoutBox {
    let n = num.layout(&env.num());
    let d = den.layout(&env.den());
    let display = env.style.is_display();
    let default_theta = env.rule_thickness();
    let theta = if rule { default_theta } else { 0.0 };
    let axis = env.axis_height();

    let mut u = env.param(if display {
        NUM1
    } else if rule {
        NUM2
    } else {
        NUM3
    });
    let mut v = env.param(if display { DENOM1 } else { DENOM2 });

    if rule {
        let phi = if display { 3.0 * theta } else { theta };
        let above = (u - n.depth) - (axis + theta / 2.0);
        if above < phi {
            u += phi - above;
        }
        let below = (axis - theta / 2.0) - (d.height - v);
        if below < phi {
            v += phi - below;
        }
    } else {
        let phi = if display { 7.0 * default_theta } else { 3.0 * default_theta };
        let gap = (u - n.depth) - (d.height - v);
        if gap < phi {
            u += (phi - gap) / 2.0;
            v += (phi - gap) / 2.0;
        }
    }

    let width = n.width.max(d.width);
    let bar = if rule {
        LayoutBox::rule(width, theta / 2.0, theta / 2.0)
    } else {
        LayoutBox::strut(width, 0.0, 0.0)
    };
    let n_depth = n.depth;
    let stack = LayoutBox::vbox(
        vec![
            n.aligned(width, HAlign::Center),
            LayoutBox::vkern((u - n_depth) - (axis + theta / 2.0)),
            bar,
            LayoutBox::vkern((axis - theta / 2.0) - (d.height - v)),
            d.aligned(width, HAlign::Center),
        ],
        2,
    );

    let null = env.param(NULL_DELIMITER_SPACE);
    LayoutBox::hbox(vec![
        LayoutBox::kern(null),
        stack.with_shift(-axis),
        LayoutBox::kern(null),
    ])
}

/// Radical sign over a cramped body, with an optional degree
pub fn radical(body: &Atom, degree: Option<&Atom>, env: &Environment) -> LayoutBox {
    let b = body.layout(&env.cramped());
    let theta = env.rule_thickness();
    let phi = if env.style.is_display() {
        env.x_height()
    } else {
        theta
    };
    let psi = theta + phi / 4.0;

    let surd = LayoutBox::delimiter(
        '\u{221A}',
        env.param(SURD_WIDTH),
        b.height + psi + theta,
        b.depth,
    );
    let raise = 0.6 * (surd.height - surd.depth);
    let width = b.width;
    let overbar = LayoutBox::vbox(
        vec![
            LayoutBox::rule(width, theta, 0.0),
            LayoutBox::vkern(psi),
            b,
        ],
        2,
    );

    let mut children = Vec::with_capacity(5);
    if let Some(degree) = degree {
        let d = degree.layout(&env.with_style(MathStyle::ScriptScript));
        children.push(LayoutBox::kern(5.0 * env.mu()));
        children.push(d.with_shift(-raise));
        children.push(LayoutBox::kern(-10.0 * env.mu()));
    }
    children.push(surd);
    children.push(overbar);
    LayoutBox::hbox(children)
}

/// A delimiter covering at least `target` total height, centered on the
/// axis once the natural glyph is too small. `None` is the null delimiter.
pub fn delimiter(ch: Option<char>, target: f64, env: &Environment) -> LayoutBox {
    let Some(ch) = ch else {
        return LayoutBox::kern(env.param(NULL_DELIMITER_SPACE));
    };
    let (natural, _) = glyph(ch, env, true);
    if natural.total_height() >= target {
        return natural;
    }
    let axis = env.axis_height();
    LayoutBox::delimiter(
        ch,
        natural.width,
        target / 2.0 + axis,
        (target / 2.0 - axis).max(0.0),
    )
}

/// Size a fence to cover a box extending `height` above and `depth` below the baseline
pub fn fence_size(height: f64, depth: f64, env: &Environment) -> f64 {
    let axis = env.axis_height();
    let delta = (height - axis).max(depth + axis);
    (2.0 * delta * DELIMITER_FACTOR).max(2.0 * delta - env.param(DELIMITER_SHORTFALL))
}

/// `\left ... \middle ... \right`: all delimiters share one size
pub fn fenced(
    left: Option<char>,
    right: Option<char>,
    segments: &[Atom],
    middles: &[Option<char>],
    env: &Environment,
) -> LayoutBox {
    let boxes: Vec<LayoutBox> = segments.iter().map(|s| s.layout(env)).collect();
    let height = boxes.iter().fold(0.0_f64, |h, b| h.max(b.height - b.shift));
    let depth = boxes.iter().fold(0.0_f64, |d, b| d.max(b.depth + b.shift));
    let target = fence_size(height, depth, env);

    let mut children = Vec::with_capacity(boxes.len() * 2 + 1);
    children.push(delimiter(left, target, env));
    for (i, b) in boxes.into_iter().enumerate() {
        if i > 0 {
            let middle = middles.get(i - 1).copied().flatten();
            children.push(delimiter(middle, target, env));
        }
        children.push(b);
    }
    children.push(delimiter(right, target, env));
    LayoutBox::hbox(children)
}

/// `\big` and friends: a delimiter of fixed total height `size` em
pub fn big_delimiter(ch: Option<char>, size: f64, class: MathClass, env: &Environment) -> LayoutBox {
    let target = env.param(size);
    let b = delimiter(ch, target, env);
    trace!("big delimiter {:?} ({:?}): {:.3}", ch, class, b.total_height());
    b
}

pub fn decorated(body: &Atom, decoration: Decoration, env: &Environment) -> LayoutBox {
    let theta = env.rule_thickness();
    match decoration {
        Decoration::Overline => {
            let b = body.layout(&env.cramped());
            let width = b.width;
            LayoutBox::vbox(
                vec![
                    LayoutBox::vkern(theta),
                    LayoutBox::rule(width, theta, 0.0),
                    LayoutBox::vkern(3.0 * theta),
                    b,
                ],
                3,
            )
        }
        Decoration::Underline => {
            let b = body.layout(env);
            let width = b.width;
            LayoutBox::vbox(
                vec![
                    b,
                    LayoutBox::vkern(3.0 * theta),
                    LayoutBox::rule(width, theta, 0.0),
                    LayoutBox::vkern(theta),
                ],
                0,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::boxes::BoxKind;

    fn env(style: MathStyle) -> Environment {
        Environment::new(style, 10.0)
    }

    fn sym(ch: char) -> Atom {
        Atom::char(ch)
    }

    fn frac(rule: bool) -> Atom {
        Atom::Fraction {
            num: Box::new(sym('a')),
            den: Box::new(sym('b')),
            rule,
        }
    }

    #[test]
    fn test_superscript_is_raised_and_smaller() {
        let e = env(MathStyle::Text);
        let b = scripts(&sym('x'), Some(&sym('2')), None, &e);
        let parts = b.children();
        let sup = &parts[2];
        assert!(sup.shift < 0.0);
        assert!(-sup.shift >= e.param(SUP2) - 1e-9);
        assert!(matches!(sup.kind, BoxKind::Char { size, .. } if (size - 7.0).abs() < 1e-9));
    }

    #[test]
    fn test_subscript_is_lowered() {
        let e = env(MathStyle::Text);
        let b = scripts(&sym('x'), None, Some(&sym('i')), &e);
        let sub = &b.children()[1];
        assert!(sub.shift >= e.param(SUB1) - 1e-9);
        assert!(b.depth > 0.0);
    }

    #[test]
    fn test_both_scripts_keep_clearance() {
        let e = env(MathStyle::Text);
        let b = scripts(&sym('x'), Some(&sym('2')), Some(&sym('i')), &e);
        let column = &b.children()[1];
        let BoxKind::VBox { children, .. } = &column.kind else {
            panic!("expected a script column, got {:?}", column.kind);
        };
        assert!(children[1].height >= 4.0 * e.rule_thickness() - 1e-9);
        assert!(column.shift < 0.0);
    }

    #[test]
    fn test_display_sum_takes_limits() {
        let sum = Atom::symbol('\u{2211}', MathClass::Op);
        let display = scripts(&sum, Some(&sym('n')), Some(&sym('i')), &env(MathStyle::Display));
        assert!(matches!(display.kind, BoxKind::VBox { baseline: 3, .. }));

        let text = scripts(&sum, Some(&sym('n')), Some(&sym('i')), &env(MathStyle::Text));
        assert!(matches!(text.kind, BoxKind::HBox { .. }));
        assert!(display.total_height() > text.total_height());
    }

    #[test]
    fn test_fraction_straddles_axis() {
        let e = env(MathStyle::Text);
        let b = frac(true).layout(&e);
        assert!(b.height > e.axis_height());
        assert!(b.depth > 0.0);
        let a = glyph('a', &e.num(), true).0.width;
        let bw = glyph('b', &e.den(), true).0.width;
        let expected = a.max(bw) + 2.0 * e.param(NULL_DELIMITER_SPACE);
        assert!((b.width - expected).abs() < 1e-9);
    }

    #[test]
    fn test_display_fraction_is_taller() {
        let text = frac(true).layout(&env(MathStyle::Text));
        let display = frac(true).layout(&env(MathStyle::Display));
        assert!(display.total_height() > text.total_height());
    }

    #[test]
    fn test_atop_has_no_rule() {
        let b = frac(false).layout(&env(MathStyle::Text));
        let stack = &b.children()[1];
        assert!(!stack.children().iter().any(|c| c.kind == BoxKind::Rule));
    }

    #[test]
    fn test_radical_covers_body() {
        let e = env(MathStyle::Text);
        let body = sym('x').layout(&e.cramped());
        let b = radical(&sym('x'), None, &e);
        assert!(b.height > body.height);
        assert!(b.width > body.width);

        let with_degree = radical(&sym('x'), Some(&sym('3')), &e);
        assert!(with_degree.width >= b.width - 5.0 * e.mu());
    }

    #[test]
    fn test_fence_grows_with_content() {
        let e = env(MathStyle::Display);
        let small = fenced(Some('('), Some(')'), &[sym('x')], &[], &e);
        assert!(matches!(small.children()[0].kind, BoxKind::Char { .. }));

        let tall = fenced(Some('('), Some(')'), &[frac(true)], &[], &e);
        let left = &tall.children()[0];
        assert!(matches!(left.kind, BoxKind::Delimiter { ch: '(' }));
        assert!(left.total_height() >= tall.children()[1].total_height() * DELIMITER_FACTOR);
    }

    #[test]
    fn test_null_delimiter() {
        let e = env(MathStyle::Text);
        let b = delimiter(None, 100.0, &e);
        assert_eq!(b.width, e.param(NULL_DELIMITER_SPACE));
        assert_eq!(b.total_height(), 0.0);
    }

    #[test]
    fn test_middle_delimiters() {
        let e = env(MathStyle::Text);
        let b = fenced(
            Some('('),
            None,
            &[sym('a'), sym('b')],
            &[Some('|')],
            &e,
        );
        assert_eq!(b.children().len(), 5);
    }

    #[test]
    fn test_overline() {
        let e = env(MathStyle::Text);
        let body = sym('x').layout(&e);
        let b = decorated(&sym('x'), Decoration::Overline, &e);
        assert!((b.height - body.height - 5.0 * e.rule_thickness()).abs() < 1e-9);
        let under = decorated(&sym('x'), Decoration::Underline, &e);
        assert!(under.depth > body.depth);
    }
}
