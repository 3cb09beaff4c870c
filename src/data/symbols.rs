//! Math symbol tables
//!
//! Maps symbol command names (without the backslash) to the glyph they
//! produce and the TeX math class that governs the spacing around it.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::core::atom::MathClass;

/// A symbol-producing command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolDef {
    pub ch: char,
    pub class: MathClass,
}

const fn sym(ch: char, class: MathClass) -> SymbolDef {
    SymbolDef { ch, class }
}

lazy_static! {
    /// Symbol commands, keyed without the leading backslash
    pub static ref SYMBOLS: HashMap<&'static str, SymbolDef> = {
        use MathClass::*;
        let mut m = HashMap::new();

        // Greek, lowercase (math italic)
        m.insert("alpha", sym('\u{03B1}', Ord));
        m.insert("beta", sym('\u{03B2}', Ord));
        m.insert("gamma", sym('\u{03B3}', Ord));
        m.insert("delta", sym('\u{03B4}', Ord));
        m.insert("epsilon", sym('\u{03F5}', Ord));
        m.insert("varepsilon", sym('\u{03B5}', Ord));
        m.insert("zeta", sym('\u{03B6}', Ord));
        m.insert("eta", sym('\u{03B7}', Ord));
        m.insert("theta", sym('\u{03B8}', Ord));
        m.insert("vartheta", sym('\u{03D1}', Ord));
        m.insert("iota", sym('\u{03B9}', Ord));
        m.insert("kappa", sym('\u{03BA}', Ord));
        m.insert("lambda", sym('\u{03BB}', Ord));
        m.insert("mu", sym('\u{03BC}', Ord));
        m.insert("nu", sym('\u{03BD}', Ord));
        m.insert("xi", sym('\u{03BE}', Ord));
        m.insert("pi", sym('\u{03C0}', Ord));
        m.insert("varpi", sym('\u{03D6}', Ord));
        m.insert("rho", sym('\u{03C1}', Ord));
        m.insert("varrho", sym('\u{03F1}', Ord));
        m.insert("sigma", sym('\u{03C3}', Ord));
        m.insert("varsigma", sym('\u{03C2}', Ord));
        m.insert("tau", sym('\u{03C4}', Ord));
        m.insert("upsilon", sym('\u{03C5}', Ord));
        m.insert("phi", sym('\u{03D5}', Ord));
        m.insert("varphi", sym('\u{03C6}', Ord));
        m.insert("chi", sym('\u{03C7}', Ord));
        m.insert("psi", sym('\u{03C8}', Ord));
        m.insert("omega", sym('\u{03C9}', Ord));

        // Greek, uppercase (upright)
        m.insert("Gamma", sym('\u{0393}', Ord));
        m.insert("Delta", sym('\u{0394}', Ord));
        m.insert("Theta", sym('\u{0398}', Ord));
        m.insert("Lambda", sym('\u{039B}', Ord));
        m.insert("Xi", sym('\u{039E}', Ord));
        m.insert("Pi", sym('\u{03A0}', Ord));
        m.insert("Sigma", sym('\u{03A3}', Ord));
        m.insert("Upsilon", sym('\u{03A5}', Ord));
        m.insert("Phi", sym('\u{03A6}', Ord));
        m.insert("Psi", sym('\u{03A8}', Ord));
        m.insert("Omega", sym('\u{03A9}', Ord));

        // Ordinary symbols
        m.insert("infty", sym('\u{221E}', Ord));
        m.insert("partial", sym('\u{2202}', Ord));
        m.insert("nabla", sym('\u{2207}', Ord));
        m.insert("forall", sym('\u{2200}', Ord));
        m.insert("exists", sym('\u{2203}', Ord));
        m.insert("nexists", sym('\u{2204}', Ord));
        m.insert("emptyset", sym('\u{2205}', Ord));
        m.insert("varnothing", sym('\u{2205}', Ord));
        m.insert("hbar", sym('\u{210F}', Ord));
        m.insert("ell", sym('\u{2113}', Ord));
        m.insert("wp", sym('\u{2118}', Ord));
        m.insert("Re", sym('\u{211C}', Ord));
        m.insert("Im", sym('\u{2111}', Ord));
        m.insert("aleph", sym('\u{2135}', Ord));
        m.insert("prime", sym('\u{2032}', Ord));
        m.insert("angle", sym('\u{2220}', Ord));
        m.insert("triangle", sym('\u{25B3}', Ord));
        m.insert("neg", sym('\u{00AC}', Ord));
        m.insert("lnot", sym('\u{00AC}', Ord));
        m.insert("top", sym('\u{22A4}', Ord));
        m.insert("bot", sym('\u{22A5}', Ord));
        m.insert("vdots", sym('\u{22EE}', Ord));
        m.insert("ddots", sym('\u{22F1}', Inner));
        m.insert("ldots", sym('\u{2026}', Inner));
        m.insert("dots", sym('\u{2026}', Inner));
        m.insert("cdots", sym('\u{22EF}', Inner));
        m.insert("#", sym('#', Ord));
        m.insert("$", sym('$', Ord));
        m.insert("%", sym('%', Ord));
        m.insert("&", sym('&', Ord));
        m.insert("_", sym('_', Ord));
        m.insert("backslash", sym('\\', Ord));
        m.insert("vert", sym('|', Ord));
        m.insert("Vert", sym('\u{2016}', Ord));
        m.insert("|", sym('\u{2016}', Ord));

        // Binary operators
        m.insert("pm", sym('\u{00B1}', Bin));
        m.insert("mp", sym('\u{2213}', Bin));
        m.insert("times", sym('\u{00D7}', Bin));
        m.insert("div", sym('\u{00F7}', Bin));
        m.insert("cdot", sym('\u{22C5}', Bin));
        m.insert("ast", sym('\u{2217}', Bin));
        m.insert("star", sym('\u{22C6}', Bin));
        m.insert("circ", sym('\u{2218}', Bin));
        m.insert("bullet", sym('\u{2219}', Bin));
        m.insert("cap", sym('\u{2229}', Bin));
        m.insert("cup", sym('\u{222A}', Bin));
        m.insert("wedge", sym('\u{2227}', Bin));
        m.insert("land", sym('\u{2227}', Bin));
        m.insert("vee", sym('\u{2228}', Bin));
        m.insert("lor", sym('\u{2228}', Bin));
        m.insert("setminus", sym('\u{2216}', Bin));
        m.insert("oplus", sym('\u{2295}', Bin));
        m.insert("ominus", sym('\u{2296}', Bin));
        m.insert("otimes", sym('\u{2297}', Bin));
        m.insert("odot", sym('\u{2299}', Bin));
        m.insert("dagger", sym('\u{2020}', Bin));
        m.insert("ddagger", sym('\u{2021}', Bin));

        // Relations
        m.insert("leq", sym('\u{2264}', Rel));
        m.insert("le", sym('\u{2264}', Rel));
        m.insert("geq", sym('\u{2265}', Rel));
        m.insert("ge", sym('\u{2265}', Rel));
        m.insert("neq", sym('\u{2260}', Rel));
        m.insert("ne", sym('\u{2260}', Rel));
        m.insert("equiv", sym('\u{2261}', Rel));
        m.insert("approx", sym('\u{2248}', Rel));
        m.insert("sim", sym('\u{223C}', Rel));
        m.insert("simeq", sym('\u{2243}', Rel));
        m.insert("cong", sym('\u{2245}', Rel));
        m.insert("propto", sym('\u{221D}', Rel));
        m.insert("ll", sym('\u{226A}', Rel));
        m.insert("gg", sym('\u{226B}', Rel));
        m.insert("in", sym('\u{2208}', Rel));
        m.insert("notin", sym('\u{2209}', Rel));
        m.insert("ni", sym('\u{220B}', Rel));
        m.insert("subset", sym('\u{2282}', Rel));
        m.insert("supset", sym('\u{2283}', Rel));
        m.insert("subseteq", sym('\u{2286}', Rel));
        m.insert("supseteq", sym('\u{2287}', Rel));
        m.insert("mid", sym('\u{2223}', Rel));
        m.insert("parallel", sym('\u{2225}', Rel));
        m.insert("perp", sym('\u{22A5}', Rel));
        m.insert("models", sym('\u{22A8}', Rel));
        m.insert("vdash", sym('\u{22A2}', Rel));
        m.insert("to", sym('\u{2192}', Rel));
        m.insert("rightarrow", sym('\u{2192}', Rel));
        m.insert("leftarrow", sym('\u{2190}', Rel));
        m.insert("gets", sym('\u{2190}', Rel));
        m.insert("leftrightarrow", sym('\u{2194}', Rel));
        m.insert("Rightarrow", sym('\u{21D2}', Rel));
        m.insert("Leftarrow", sym('\u{21D0}', Rel));
        m.insert("Leftrightarrow", sym('\u{21D4}', Rel));
        m.insert("mapsto", sym('\u{21A6}', Rel));
        m.insert("implies", sym('\u{27F9}', Rel));
        m.insert("iff", sym('\u{27FA}', Rel));
        m.insert("uparrow", sym('\u{2191}', Rel));
        m.insert("downarrow", sym('\u{2193}', Rel));

        // Large operators
        m.insert("sum", sym('\u{2211}', Op));
        m.insert("prod", sym('\u{220F}', Op));
        m.insert("coprod", sym('\u{2210}', Op));
        m.insert("int", sym('\u{222B}', Op));
        m.insert("iint", sym('\u{222C}', Op));
        m.insert("iiint", sym('\u{222D}', Op));
        m.insert("oint", sym('\u{222E}', Op));
        m.insert("bigcup", sym('\u{22C3}', Op));
        m.insert("bigcap", sym('\u{22C2}', Op));
        m.insert("bigoplus", sym('\u{2A01}', Op));
        m.insert("bigotimes", sym('\u{2A02}', Op));
        m.insert("bigvee", sym('\u{22C1}', Op));
        m.insert("bigwedge", sym('\u{22C0}', Op));

        // Delimiters
        m.insert("{", sym('{', Open));
        m.insert("}", sym('}', Close));
        m.insert("lbrace", sym('{', Open));
        m.insert("rbrace", sym('}', Close));
        m.insert("lbrack", sym('[', Open));
        m.insert("rbrack", sym(']', Close));
        m.insert("langle", sym('\u{27E8}', Open));
        m.insert("rangle", sym('\u{27E9}', Close));
        m.insert("lfloor", sym('\u{230A}', Open));
        m.insert("rfloor", sym('\u{230B}', Close));
        m.insert("lceil", sym('\u{2308}', Open));
        m.insert("rceil", sym('\u{2309}', Close));
        m.insert("lvert", sym('|', Open));
        m.insert("rvert", sym('|', Close));
        m.insert("lVert", sym('\u{2016}', Open));
        m.insert("rVert", sym('\u{2016}', Close));

        // Punctuation
        m.insert("colon", sym(':', Punct));

        m
    };

    /// Operator names: displayed text and whether limits go above/below in display style
    pub static ref OPERATOR_NAMES: HashMap<&'static str, (&'static str, bool)> = {
        let mut m = HashMap::new();
        for name in [
            "sin", "cos", "tan", "cot", "sec", "csc", "arcsin", "arccos", "arctan",
            "sinh", "cosh", "tanh", "coth", "log", "ln", "lg", "exp", "deg", "dim",
            "hom", "ker", "arg",
        ] {
            m.insert(name, (name, false));
        }
        for name in ["lim", "max", "min", "sup", "inf", "det", "gcd", "Pr"] {
            m.insert(name, (name, true));
        }
        m.insert("liminf", ("lim inf", true));
        m.insert("limsup", ("lim sup", true));
        m
    };
}

/// Glyph drawn for a literal character typed in math mode
pub fn literal_glyph(ch: char) -> char {
    match ch {
        '-' => '\u{2212}',
        '*' => '\u{2217}',
        _ => ch,
    }
}

/// TeX math class of a literal character typed in math mode
pub fn char_class(ch: char) -> MathClass {
    match ch {
        '+' | '-' | '*' | '\u{2212}' | '\u{00B1}' | '\u{00D7}' | '\u{00F7}' | '\u{22C5}' => {
            MathClass::Bin
        }
        '=' | '<' | '>' | ':' | '\u{2264}' | '\u{2265}' | '\u{2260}' | '\u{2192}' | '\u{2208}' => {
            MathClass::Rel
        }
        '(' | '[' => MathClass::Open,
        ')' | ']' | '!' | '?' => MathClass::Close,
        ',' | ';' => MathClass::Punct,
        '\u{2211}' | '\u{220F}' | '\u{222B}' => MathClass::Op,
        _ => MathClass::Ord,
    }
}

/// Large operators get a bigger glyph in display style and sit on the axis
pub fn is_large_op(ch: char) -> bool {
    matches!(
        ch,
        '\u{2211}'
            | '\u{220F}'
            | '\u{2210}'
            | '\u{222B}'
            | '\u{222C}'
            | '\u{222D}'
            | '\u{222E}'
            | '\u{22C3}'
            | '\u{22C2}'
            | '\u{2A01}'
            | '\u{2A02}'
            | '\u{22C1}'
            | '\u{22C0}'
    )
}

/// Integral signs keep their scripts beside the symbol even in display style
pub fn is_integral(ch: char) -> bool {
    matches!(ch, '\u{222B}' | '\u{222C}' | '\u{222D}' | '\u{222E}')
}

/// Resolve the delimiter token after `\left`, `\right`, `\middle` or `\big`.
///
/// `token` is either a literal character or a command including its
/// backslash. `Some(None)` is the null delimiter `.`.
pub fn delimiter(token: &str) -> Option<Option<char>> {
    match token {
        "." => Some(None),
        "(" | ")" | "[" | "]" | "|" | "/" => token.chars().next().map(Some),
        "<" => Some(Some('\u{27E8}')),
        ">" => Some(Some('\u{27E9}')),
        _ => {
            let name = token.strip_prefix('\\')?;
            let def = SYMBOLS.get(name)?;
            match def.class {
                MathClass::Open | MathClass::Close => Some(Some(def.ch)),
                _ if matches!(name, "|" | "vert" | "Vert" | "backslash" | "uparrow" | "downarrow") => {
                    Some(Some(def.ch))
                }
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        let alpha = SYMBOLS.get("alpha").copied();
        assert_eq!(alpha, Some(sym('\u{03B1}', MathClass::Ord)));
        assert_eq!(SYMBOLS.get("leq").map(|s| s.class), Some(MathClass::Rel));
        assert_eq!(SYMBOLS.get("sum").map(|s| s.class), Some(MathClass::Op));
        assert!(SYMBOLS.get("nosuchsymbol").is_none());
    }

    #[test]
    fn test_char_classes() {
        assert_eq!(char_class('a'), MathClass::Ord);
        assert_eq!(char_class('+'), MathClass::Bin);
        assert_eq!(char_class('='), MathClass::Rel);
        assert_eq!(char_class('('), MathClass::Open);
        assert_eq!(char_class(')'), MathClass::Close);
        assert_eq!(char_class(','), MathClass::Punct);
    }

    #[test]
    fn test_literal_glyph() {
        assert_eq!(literal_glyph('-'), '\u{2212}');
        assert_eq!(literal_glyph('x'), 'x');
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(delimiter("("), Some(Some('(')));
        assert_eq!(delimiter("."), Some(None));
        assert_eq!(delimiter("|"), Some(Some('|')));
        assert_eq!(delimiter("\\langle"), Some(Some('\u{27E8}')));
        assert_eq!(delimiter("\\{"), Some(Some('{')));
        assert_eq!(delimiter("\\|"), Some(Some('\u{2016}')));
        assert_eq!(delimiter("\\alpha"), None);
        assert_eq!(delimiter("x"), None);
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(OPERATOR_NAMES.get("sin"), Some(&("sin", false)));
        assert_eq!(OPERATOR_NAMES.get("lim"), Some(&("lim", true)));
        assert_eq!(OPERATOR_NAMES.get("limsup"), Some(&("lim sup", true)));
    }
}
