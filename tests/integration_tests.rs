//! Integration tests for texbox: markup to measured boxes

use pretty_assertions::assert_eq;
use texbox::core::array::{layout_array, ArrayOfAtoms, ArrayOptions, ColumnFormat};
use texbox::{
    parse, parse_partial, render, split, Atom, BoxKind, Environment, Formula, HAlign, LayoutBox,
    LayoutOptions, MathClass, MathStyle, ParseError, Parser, ParserOptions, Registry,
};

fn env() -> Environment {
    Environment::new(MathStyle::Display, 20.0)
}

fn layout(latex: &str) -> LayoutBox {
    parse(latex).unwrap().layout(&env())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Every box in the tree, depth first
fn walk(b: &LayoutBox) -> Vec<&LayoutBox> {
    let mut out = vec![b];
    for child in b.children() {
        out.extend(walk(child));
    }
    out
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binary_operator_spacing() {
        let b = layout("a+b");
        let BoxKind::HBox { children } = &b.kind else {
            panic!("expected an hbox");
        };
        assert_eq!(children.len(), 5);
        assert!(matches!(children[0].kind, BoxKind::Char { ch: 'a', .. }));
        assert!(matches!(children[2].kind, BoxKind::Char { ch: '+', .. }));
        assert!(matches!(children[4].kind, BoxKind::Char { ch: 'b', .. }));

        let medium = 4.0 * env().mu();
        assert!(close(children[1].width, medium));
        assert!(close(children[3].width, medium));
        // the break point follows the operator
        assert!(!children[1].is_breakable_glue());
        assert!(children[3].is_breakable_glue());
    }

    #[test]
    fn test_ordinary_atoms_are_not_spaced() {
        let b = layout("ab");
        assert_eq!(b.children().len(), 2);
    }

    #[test]
    fn test_scripts_use_smaller_style() {
        let atoms = parse("x^2_i").unwrap();
        let Atom::Row(row) = &atoms else {
            panic!("expected a row");
        };
        assert!(matches!(row[0], Atom::Scripts { sup: Some(_), sub: Some(_), .. }));

        let b = layout("x^2_i");
        let sizes: Vec<f64> = walk(&b)
            .into_iter()
            .filter_map(|b| match b.kind {
                BoxKind::Char { size, .. } => Some(size),
                _ => None,
            })
            .collect();
        assert_eq!(sizes.len(), 3);
        assert!(sizes[1] < sizes[0]);
        assert!(sizes[2] < sizes[0]);

        // scripts reach above and below the bare base
        let base = layout("x");
        assert!(b.height > base.height);
        assert!(b.depth > base.depth);
    }

    #[test]
    fn test_unmatched_end_names_environment() {
        let err = parse("a \\end{array}").unwrap_err();
        let ParseError::Syntax(err) = err else {
            panic!("expected a syntax error, got {:?}", err);
        };
        assert_eq!(err.command.as_deref(), Some("\\end{array}"));
        assert!(err.to_string().contains("\\end{array}"));
    }

    #[test]
    fn test_ragged_array_is_a_dimension_error() {
        let row = |n: usize| -> Vec<Atom> { (0..n).map(|i| Atom::char((b'a' + i as u8) as char)).collect() };
        let ragged = ArrayOfAtoms::from_rows(ColumnFormat::parse("cc"), vec![row(2), row(3)]);
        let err = layout_array(&ragged, &ArrayOptions::default(), &env()).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.cells, 3);
        assert_eq!(err.columns, 2);

        let even = ArrayOfAtoms::from_rows(ColumnFormat::parse("cc"), vec![row(2), row(2)]);
        assert!(layout_array(&even, &ArrayOptions::default(), &env()).is_ok());

        assert!(parse("\\begin{array}{cc} a & b \\\\ a & b & c \\end{array}")
            .unwrap_err()
            .is_dimension());
    }

    #[test]
    fn test_wide_formula_is_broken() {
        let b = layout("a+b+c+d+e+f+g+h+i+j+k+l+m+n");
        let width = b.width / 3.0;
        let broken = split(&b, width, 2.0);
        let lines: Vec<&LayoutBox> = broken
            .children()
            .iter()
            .filter(|c| matches!(c.kind, BoxKind::HBox { .. }))
            .collect();
        assert!(lines.len() >= 2);
        for line in lines {
            assert!(line.width <= width + 1e-9);
        }
    }

    #[test]
    fn test_reparse_is_equivalent() {
        let latex = "\\left( \\frac{a}{b} \\right)^2 + \\sqrt[3]{x}";
        let a = parse(latex).unwrap();
        let b = parse(latex).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.layout(&env()), b.layout(&env()));
    }
}

// ============================================================================
// Box tree properties
// ============================================================================

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLES: [&str; 6] = [
        "a+b=c",
        "\\frac{x^2}{1+y}",
        "\\sqrt{\\alpha_1}",
        "\\sum_{i=1}^n i",
        "\\begin{pmatrix} 1 & 0 \\\\ 0 & 1 \\end{pmatrix}",
        "\\left[ x \\middle| y \\right]",
    ];

    #[test]
    fn test_hbox_and_vbox_invariants() {
        for latex in SAMPLES {
            let b = layout(latex);
            for node in walk(&b) {
                match &node.kind {
                    BoxKind::HBox { children } if !children.is_empty() => {
                        let height = children.iter().map(|c| c.height - c.shift).fold(0.0, f64::max);
                        let depth = children.iter().map(|c| c.depth + c.shift).fold(0.0, f64::max);
                        assert!(close(node.height, height), "{}", latex);
                        assert!(close(node.depth, depth), "{}", latex);
                    }
                    BoxKind::VBox { children, .. } => {
                        let width = children.iter().map(|c| c.width).fold(0.0, f64::max);
                        assert!(close(node.width, width), "{}", latex);
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_empty_atoms_are_identity() {
        let empty = Atom::Empty.layout(&env());
        assert_eq!((empty.width, empty.height, empty.depth), (0.0, 0.0, 0.0));
        let empty_row = Atom::Row(Vec::new()).layout(&env());
        assert_eq!((empty_row.width, empty_row.height, empty_row.depth), (0.0, 0.0, 0.0));

        let x = layout("x");
        let left = LayoutBox::hbox(vec![empty.clone(), x.clone()]);
        let right = LayoutBox::hbox(vec![x.clone(), empty]);
        for b in [left, right] {
            assert_eq!((b.width, b.height, b.depth), (x.width, x.height, x.depth));
        }
    }

    #[test]
    fn test_style_ladder_shrinks() {
        let atom = parse("x").unwrap();
        let ladder = [
            MathStyle::Display,
            MathStyle::Text,
            MathStyle::Script,
            MathStyle::ScriptScript,
        ];
        let widths: Vec<f64> = ladder
            .iter()
            .map(|s| atom.layout(&Environment::new(*s, 20.0)).width)
            .collect();
        for pair in widths.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        for latex in SAMPLES {
            assert_eq!(layout(latex), layout(latex));
        }
    }

    #[test]
    fn test_fitting_split_is_identity() {
        let b = layout("a+b+c");
        assert_eq!(split(&b, b.width, 3.0), b);
        assert_eq!(split(&b, b.width * 2.0, 3.0), b);
    }

    #[test]
    fn test_unbreakable_atom_overflows_whole() {
        let b = layout("\\frac{abcdefgh}{ijklmnop}");
        let broken = split(&b, 1.0, 2.0);
        assert_eq!(broken, b);
    }
}

// ============================================================================
// Declarations inside a row
// ============================================================================

mod switches {
    use super::*;

    fn glue_total(latex: &str) -> f64 {
        let b = parse(latex).unwrap().layout(&Environment::new(MathStyle::Text, 10.0));
        walk(&b)
            .into_iter()
            .filter(|b| matches!(b.kind, BoxKind::Glue { .. }))
            .map(|b| b.width)
            .sum()
    }

    #[test]
    fn test_switches_keep_operator_spacing() {
        assert!(close(glue_total("a\\displaystyle=b"), glue_total("a=b")));
        assert!(close(glue_total("a\\bf+b"), glue_total("a+b")));
        assert!(close(glue_total("a\\color{red}=b"), glue_total("a=b")));
        assert!(glue_total("a+b") > 0.0);
    }

    #[test]
    fn test_color_switch_can_be_broken() {
        let latex = "\\color{red} a+b+c+d+e+f+g+h+i+j+k+l+m+n";
        let b = layout(latex);
        let width = b.width / 3.0;
        let broken = split(&b, width, 2.0);
        let lines: Vec<&LayoutBox> = broken
            .children()
            .iter()
            .filter(|c| matches!(c.kind, BoxKind::HBox { .. }))
            .collect();
        assert!(lines.len() >= 2);
        for line in lines {
            assert!(line.width <= width + 1e-9);
            assert!(line.is_colored());
        }
    }
}

// ============================================================================
// Parser features
// ============================================================================

mod parsing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_keeps_prefix() {
        let atom = parse_partial("a + b = \\frac{1}{");
        assert_eq!(atom.children().len(), 5);
        assert!(parse("a + b = \\frac{1}{").is_err());
    }

    #[test]
    fn test_packages_scope_commands() {
        let mut registry = Registry::builtin();
        registry.define_macro(Some("vectors"), texbox::macros::Macro::with_args("vv", 1, "\\mathbf{#1}"));

        let plain = Parser::new("\\vv{v}", &registry, &ParserOptions::default()).parse();
        assert!(matches!(plain, Err(ParseError::UnknownCommand { .. })));

        let options = ParserOptions::default().with_package("vectors");
        let atom = Parser::new("\\vv{v}", &registry, &options).parse().unwrap();
        assert!(matches!(atom.children()[0], Atom::Font { .. }));
    }

    #[test]
    fn test_operators_and_limits() {
        let atom = parse("\\lim_{x \\to 0} f").unwrap();
        let Atom::Scripts { base, .. } = atom.children()[0] else {
            panic!("expected scripts");
        };
        assert!(base.limits_in(MathStyle::Display));
        assert_eq!(base.class(), MathClass::Op);
    }

    #[test]
    fn test_text_formula() {
        let formula = Formula::from_text("one\ntwo", HAlign::Left);
        let b = formula.layout(&env());
        assert!(matches!(b.kind, BoxKind::VBox { .. }));
    }
}

// ============================================================================
// Icons
// ============================================================================

mod icons {
    use super::*;

    #[test]
    fn test_icon_line_breaking() {
        let latex = "a+b+c+d+e+f+g+h+i+j+k+l+m+n";
        let natural = render(latex, &LayoutOptions::display(20.0)).unwrap();
        let width = natural.width() / 2.0;
        let icon = render(
            latex,
            &LayoutOptions::display(20.0)
                .with_width(width, HAlign::Center)
                .with_interline(4.0),
        )
        .unwrap();
        assert!(icon.total_height() > natural.total_height());
        assert!(close(icon.width(), width));
    }

    #[test]
    fn test_max_width_uses_broken_width() {
        let latex = "a+b+c+d+e+f+g+h+i+j+k+l+m+n";
        let natural = render(latex, &LayoutOptions::display(20.0)).unwrap();
        let width = natural.width() / 2.0;
        let icon = render(
            latex,
            &LayoutOptions::display(20.0)
                .with_width(width, HAlign::Right)
                .with_max_width(true)
                .with_interline(4.0),
        )
        .unwrap();
        assert!(icon.width() <= width + 1e-9);
    }

    #[test]
    fn test_colored_flag() {
        assert!(render("\\textcolor{blue}{x}", &LayoutOptions::default()).unwrap().is_colored());
        assert!(render("\\colorbox{yellow}{x}", &LayoutOptions::default()).unwrap().is_colored());
        assert!(!render("\\fbox{x}", &LayoutOptions::default()).unwrap().is_colored());
    }
}
