//! Inter-atom spacing (The TeXbook, chapter 18, rule 20)
//!
//! The table is indexed by the math class of the left and right atoms.
//! Conditional entries only apply in display and text styles; in script
//! and script-script styles they collapse to no glue.

use phf::phf_map;

use crate::core::atom::MathClass;
use crate::core::environment::MathStyle;
use crate::data::units::Length;

/// Thin space, `\,`
pub const THIN: f64 = 3.0;
/// Medium space, `\:`
pub const MEDIUM: f64 = 4.0;
/// Thick space, `\;`
pub const THICK: f64 = 5.0;

/// One cell of the spacing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glue {
    /// No glue
    None,
    Thin,
    Medium,
    Thick,
    /// Thin, but only outside script styles
    CondThin,
    /// Medium, but only outside script styles
    CondMedium,
    /// Thick, but only outside script styles
    CondThick,
    /// The pair cannot occur after bin/ord conversion
    Impossible,
}

use Glue::*;

/// Rows: left class; columns: right class. Order is Ord, Op, Bin, Rel, Open, Close, Punct, Inner.
const TABLE: [[Glue; 8]; 8] = [
    [None, Thin, CondMedium, CondThick, None, None, None, CondThin],
    [Thin, Thin, Impossible, CondThick, None, None, None, CondThin],
    [CondMedium, CondMedium, Impossible, Impossible, CondMedium, Impossible, Impossible, CondMedium],
    [CondThick, CondThick, Impossible, None, CondThick, None, None, CondThick],
    [None, None, Impossible, None, None, None, None, None],
    [None, Thin, CondMedium, CondThick, None, None, None, CondThin],
    [CondThin, CondThin, Impossible, CondThin, CondThin, CondThin, CondThin, CondThin],
    [CondThin, Thin, CondMedium, CondThick, CondThin, None, CondThin, CondThin],
];

fn index(class: MathClass) -> Option<usize> {
    match class {
        MathClass::Ord => Some(0),
        MathClass::Op => Some(1),
        MathClass::Bin => Some(2),
        MathClass::Rel => Some(3),
        MathClass::Open => Some(4),
        MathClass::Close => Some(5),
        MathClass::Punct => Some(6),
        MathClass::Inner => Some(7),
        MathClass::None => Option::None,
    }
}

/// Table entry for a pair of classes
pub fn glue_between(left: MathClass, right: MathClass) -> Glue {
    match (index(left), index(right)) {
        (Some(l), Some(r)) => TABLE[l][r],
        _ => None,
    }
}

/// Glue width in mu between two adjacent atoms in `style`
pub fn glue_mu(left: MathClass, right: MathClass, style: MathStyle) -> f64 {
    let tight = style.is_tight();
    match glue_between(left, right) {
        Thin => THIN,
        Medium => MEDIUM,
        Thick => THICK,
        CondThin if !tight => THIN,
        CondMedium if !tight => MEDIUM,
        CondThick if !tight => THICK,
        _ => 0.0,
    }
}

/// Explicit spacing commands, in mu
pub static SPACE_COMMANDS: phf::Map<&'static str, Length> = phf_map! {
    "," => Length::mu(3.0),
    "thinspace" => Length::mu(3.0),
    ":" => Length::mu(4.0),
    ">" => Length::mu(4.0),
    "medspace" => Length::mu(4.0),
    ";" => Length::mu(5.0),
    "thickspace" => Length::mu(5.0),
    "!" => Length::mu(-3.0),
    "negthinspace" => Length::mu(-3.0),
    "negmedspace" => Length::mu(-4.0),
    "negthickspace" => Length::mu(-5.0),
    " " => Length::mu(6.0),
    "enspace" => Length::mu(9.0),
    "quad" => Length::mu(18.0),
    "qquad" => Length::mu(36.0),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ord_pairs() {
        assert_eq!(glue_mu(MathClass::Ord, MathClass::Ord, MathStyle::Text), 0.0);
        assert_eq!(glue_mu(MathClass::Ord, MathClass::Op, MathStyle::Script), THIN);
    }

    #[test]
    fn test_binary_and_relation() {
        assert_eq!(glue_mu(MathClass::Ord, MathClass::Bin, MathStyle::Display), MEDIUM);
        assert_eq!(glue_mu(MathClass::Bin, MathClass::Ord, MathStyle::Text), MEDIUM);
        assert_eq!(glue_mu(MathClass::Rel, MathClass::Ord, MathStyle::Text), THICK);
        assert_eq!(glue_mu(MathClass::Rel, MathClass::Rel, MathStyle::Text), 0.0);
    }

    #[test]
    fn test_script_styles_collapse_conditional_glue() {
        assert_eq!(glue_mu(MathClass::Ord, MathClass::Bin, MathStyle::Script), 0.0);
        assert_eq!(glue_mu(MathClass::Rel, MathClass::Ord, MathStyle::ScriptScript), 0.0);
        // Cramped text style keeps its glue
        assert_eq!(glue_mu(MathClass::Rel, MathClass::Ord, MathStyle::TextCramped), THICK);
    }

    #[test]
    fn test_none_class_has_no_glue() {
        assert_eq!(glue_between(MathClass::None, MathClass::Rel), Glue::None);
        assert_eq!(glue_between(MathClass::Bin, MathClass::None), Glue::None);
    }

    #[test]
    fn test_space_commands() {
        assert_eq!(SPACE_COMMANDS.get("quad"), Some(&Length::mu(18.0)));
        assert_eq!(SPACE_COMMANDS.get("!"), Some(&Length::mu(-3.0)));
    }
}
