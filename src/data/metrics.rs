//! Glyph metrics and TeX font parameters
//!
//! All values are in em. Glyph boxes approximate Computer Modern (cmmi10,
//! cmr10, cmsy10, cmex10) closely enough for TeX's positioning rules to
//! produce familiar results; they are not read from font files.

use phf::phf_map;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::core::environment::{FontFamily, FontSet};

/// Height of a lowercase `x` (sigma 5)
pub const X_HEIGHT: f64 = 0.431;
/// Height of the math axis above the baseline (sigma 22)
pub const AXIS_HEIGHT: f64 = 0.25;
/// Default rule thickness (xi 8)
pub const RULE_THICKNESS: f64 = 0.04;
/// Superscript shift in display style (sigma 13)
pub const SUP1: f64 = 0.413;
/// Superscript shift in non-cramped text and script styles (sigma 14)
pub const SUP2: f64 = 0.363;
/// Superscript shift in cramped styles (sigma 15)
pub const SUP3: f64 = 0.289;
/// Subscript shift without a superscript (sigma 16)
pub const SUB1: f64 = 0.15;
/// Subscript shift with a superscript (sigma 17)
pub const SUB2: f64 = 0.247;
/// Superscript baseline drop below the top of a compound nucleus (sigma 18)
pub const SUP_DROP: f64 = 0.386;
/// Subscript baseline drop below the bottom of a compound nucleus (sigma 19)
pub const SUB_DROP: f64 = 0.05;
/// Numerator shift in display style (sigma 8)
pub const NUM1: f64 = 0.677;
/// Numerator shift for ruled fractions in text style (sigma 9)
pub const NUM2: f64 = 0.394;
/// Numerator shift for rule-less fractions in text style (sigma 10)
pub const NUM3: f64 = 0.444;
/// Denominator shift in display style (sigma 11)
pub const DENOM1: f64 = 0.686;
/// Denominator shift in text style (sigma 12)
pub const DENOM2: f64 = 0.345;
/// Minimum gap between a limit and its operator, above
pub const BIG_OP_SPACING1: f64 = 0.111;
/// Minimum gap between a limit and its operator, below
pub const BIG_OP_SPACING2: f64 = 0.167;
/// Minimum distance from the operator to the baseline of an upper limit
pub const BIG_OP_SPACING3: f64 = 0.2;
/// Minimum distance from the operator to the baseline of a lower limit
pub const BIG_OP_SPACING4: f64 = 0.6;
/// Padding above and below limits
pub const BIG_OP_SPACING5: f64 = 0.1;
/// Width of a `.` delimiter
pub const NULL_DELIMITER_SPACE: f64 = 0.12;
/// Kern after every script
pub const SCRIPT_SPACE: f64 = 0.05;
/// Size factor of large operators in display style
pub const DISPLAY_OP_SCALE: f64 = 1.4;
/// Width of the radical sign
pub const SURD_WIDTH: f64 = 0.833;
/// Fence height factor (delimiterfactor 901)
pub const DELIMITER_FACTOR: f64 = 0.901;
/// Allowed fence shortfall (delimitershortfall 5pt at 10pt)
pub const DELIMITER_SHORTFALL: f64 = 0.5;

/// Box of a single glyph, in em
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CharMetrics {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Italic correction
    pub italic: f64,
}

impl CharMetrics {
    const fn new(width: f64, height: f64, depth: f64, italic: f64) -> Self {
        CharMetrics {
            width,
            height,
            depth,
            italic,
        }
    }

    /// Scale from em to points
    pub fn scaled(&self, em: f64) -> CharMetrics {
        CharMetrics {
            width: self.width * em,
            height: self.height * em,
            depth: self.depth * em,
            italic: self.italic * em,
        }
    }
}

/// Glyph boxes for characters in the default math fonts
static GLYPHS: phf::Map<char, CharMetrics> = phf_map! {
    // Math italic lowercase
    'a' => CharMetrics::new(0.529, 0.431, 0.0, 0.0),
    'b' => CharMetrics::new(0.429, 0.694, 0.0, 0.0),
    'c' => CharMetrics::new(0.433, 0.431, 0.0, 0.0),
    'd' => CharMetrics::new(0.520, 0.694, 0.0, 0.0),
    'e' => CharMetrics::new(0.466, 0.431, 0.0, 0.0),
    'f' => CharMetrics::new(0.490, 0.694, 0.194, 0.108),
    'g' => CharMetrics::new(0.477, 0.431, 0.194, 0.036),
    'h' => CharMetrics::new(0.576, 0.694, 0.0, 0.0),
    'i' => CharMetrics::new(0.345, 0.660, 0.0, 0.0),
    'j' => CharMetrics::new(0.412, 0.660, 0.194, 0.057),
    'k' => CharMetrics::new(0.521, 0.694, 0.0, 0.0),
    'l' => CharMetrics::new(0.298, 0.694, 0.0, 0.020),
    'm' => CharMetrics::new(0.878, 0.431, 0.0, 0.0),
    'n' => CharMetrics::new(0.600, 0.431, 0.0, 0.0),
    'o' => CharMetrics::new(0.485, 0.431, 0.0, 0.0),
    'p' => CharMetrics::new(0.503, 0.431, 0.194, 0.0),
    'q' => CharMetrics::new(0.446, 0.431, 0.194, 0.036),
    'r' => CharMetrics::new(0.451, 0.431, 0.0, 0.028),
    's' => CharMetrics::new(0.469, 0.431, 0.0, 0.0),
    't' => CharMetrics::new(0.361, 0.615, 0.0, 0.0),
    'u' => CharMetrics::new(0.572, 0.431, 0.0, 0.0),
    'v' => CharMetrics::new(0.485, 0.431, 0.0, 0.036),
    'w' => CharMetrics::new(0.716, 0.431, 0.0, 0.027),
    'x' => CharMetrics::new(0.572, 0.431, 0.0, 0.0),
    'y' => CharMetrics::new(0.490, 0.431, 0.194, 0.036),
    'z' => CharMetrics::new(0.465, 0.431, 0.0, 0.044),

    // Math italic uppercase
    'A' => CharMetrics::new(0.750, 0.683, 0.0, 0.0),
    'B' => CharMetrics::new(0.759, 0.683, 0.0, 0.051),
    'C' => CharMetrics::new(0.715, 0.683, 0.0, 0.072),
    'D' => CharMetrics::new(0.828, 0.683, 0.0, 0.028),
    'E' => CharMetrics::new(0.738, 0.683, 0.0, 0.058),
    'F' => CharMetrics::new(0.643, 0.683, 0.0, 0.139),
    'G' => CharMetrics::new(0.786, 0.683, 0.0, 0.0),
    'H' => CharMetrics::new(0.831, 0.683, 0.0, 0.081),
    'I' => CharMetrics::new(0.440, 0.683, 0.0, 0.078),
    'J' => CharMetrics::new(0.555, 0.683, 0.0, 0.096),
    'K' => CharMetrics::new(0.849, 0.683, 0.0, 0.071),
    'L' => CharMetrics::new(0.681, 0.683, 0.0, 0.0),
    'M' => CharMetrics::new(0.970, 0.683, 0.0, 0.109),
    'N' => CharMetrics::new(0.803, 0.683, 0.0, 0.109),
    'O' => CharMetrics::new(0.763, 0.683, 0.0, 0.028),
    'P' => CharMetrics::new(0.642, 0.683, 0.0, 0.139),
    'Q' => CharMetrics::new(0.791, 0.683, 0.194, 0.0),
    'R' => CharMetrics::new(0.759, 0.683, 0.0, 0.008),
    'S' => CharMetrics::new(0.613, 0.683, 0.0, 0.058),
    'T' => CharMetrics::new(0.584, 0.683, 0.0, 0.139),
    'U' => CharMetrics::new(0.683, 0.683, 0.0, 0.109),
    'V' => CharMetrics::new(0.583, 0.683, 0.0, 0.222),
    'W' => CharMetrics::new(0.944, 0.683, 0.0, 0.139),
    'X' => CharMetrics::new(0.828, 0.683, 0.0, 0.079),
    'Y' => CharMetrics::new(0.581, 0.683, 0.0, 0.222),
    'Z' => CharMetrics::new(0.683, 0.683, 0.0, 0.072),

    // Roman digits
    '0' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '1' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '2' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '3' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '4' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '5' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '6' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '7' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '8' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),
    '9' => CharMetrics::new(0.5, 0.644, 0.0, 0.0),

    // Punctuation and delimiters
    '.' => CharMetrics::new(0.278, 0.106, 0.0, 0.0),
    ',' => CharMetrics::new(0.278, 0.106, 0.194, 0.0),
    ';' => CharMetrics::new(0.278, 0.431, 0.194, 0.0),
    ':' => CharMetrics::new(0.278, 0.431, 0.0, 0.0),
    '!' => CharMetrics::new(0.278, 0.694, 0.0, 0.0),
    '?' => CharMetrics::new(0.472, 0.694, 0.0, 0.0),
    '(' => CharMetrics::new(0.389, 0.75, 0.25, 0.0),
    ')' => CharMetrics::new(0.389, 0.75, 0.25, 0.0),
    '[' => CharMetrics::new(0.278, 0.75, 0.25, 0.0),
    ']' => CharMetrics::new(0.278, 0.75, 0.25, 0.0),
    '{' => CharMetrics::new(0.5, 0.75, 0.25, 0.0),
    '}' => CharMetrics::new(0.5, 0.75, 0.25, 0.0),
    '|' => CharMetrics::new(0.278, 0.75, 0.25, 0.0),
    '\u{2016}' => CharMetrics::new(0.5, 0.75, 0.25, 0.0),
    '/' => CharMetrics::new(0.5, 0.75, 0.25, 0.0),
    '\u{27E8}' => CharMetrics::new(0.389, 0.75, 0.25, 0.0),
    '\u{27E9}' => CharMetrics::new(0.389, 0.75, 0.25, 0.0),
    '\u{230A}' => CharMetrics::new(0.444, 0.75, 0.25, 0.0),
    '\u{230B}' => CharMetrics::new(0.444, 0.75, 0.25, 0.0),
    '\u{2308}' => CharMetrics::new(0.444, 0.75, 0.25, 0.0),
    '\u{2309}' => CharMetrics::new(0.444, 0.75, 0.25, 0.0),
    '\u{2032}' => CharMetrics::new(0.275, 0.559, 0.0, 0.0),
    '\u{221A}' => CharMetrics::new(0.833, 0.8, 0.2, 0.0),

    // Binary operators
    '+' => CharMetrics::new(0.778, 0.583, 0.083, 0.0),
    '\u{2212}' => CharMetrics::new(0.778, 0.583, 0.083, 0.0),
    '\u{00B1}' => CharMetrics::new(0.778, 0.583, 0.083, 0.0),
    '\u{2213}' => CharMetrics::new(0.778, 0.583, 0.083, 0.0),
    '\u{00D7}' => CharMetrics::new(0.778, 0.491, 0.0, 0.0),
    '\u{00F7}' => CharMetrics::new(0.778, 0.5, 0.0, 0.0),
    '\u{22C5}' => CharMetrics::new(0.278, 0.31, 0.0, 0.0),
    '\u{2217}' => CharMetrics::new(0.5, 0.465, 0.0, 0.0),
    '\u{2218}' => CharMetrics::new(0.5, 0.444, 0.0, 0.0),
    '\u{2219}' => CharMetrics::new(0.5, 0.444, 0.0, 0.0),
    '\u{2229}' => CharMetrics::new(0.667, 0.598, 0.0, 0.0),
    '\u{222A}' => CharMetrics::new(0.667, 0.598, 0.0, 0.0),
    '\u{2227}' => CharMetrics::new(0.667, 0.598, 0.0, 0.0),
    '\u{2228}' => CharMetrics::new(0.667, 0.598, 0.0, 0.0),
    '\u{2295}' => CharMetrics::new(0.778, 0.583, 0.083, 0.0),
    '\u{2297}' => CharMetrics::new(0.778, 0.583, 0.083, 0.0),

    // Relations and arrows
    '=' => CharMetrics::new(0.778, 0.367, 0.0, 0.0),
    '<' => CharMetrics::new(0.778, 0.54, 0.04, 0.0),
    '>' => CharMetrics::new(0.778, 0.54, 0.04, 0.0),
    '\u{2264}' => CharMetrics::new(0.778, 0.636, 0.136, 0.0),
    '\u{2265}' => CharMetrics::new(0.778, 0.636, 0.136, 0.0),
    '\u{2260}' => CharMetrics::new(0.778, 0.716, 0.215, 0.0),
    '\u{2261}' => CharMetrics::new(0.778, 0.464, 0.0, 0.0),
    '\u{2248}' => CharMetrics::new(0.778, 0.483, 0.0, 0.0),
    '\u{223C}' => CharMetrics::new(0.778, 0.367, 0.0, 0.0),
    '\u{2208}' => CharMetrics::new(0.667, 0.54, 0.04, 0.0),
    '\u{2282}' => CharMetrics::new(0.778, 0.54, 0.04, 0.0),
    '\u{2283}' => CharMetrics::new(0.778, 0.54, 0.04, 0.0),
    '\u{2286}' => CharMetrics::new(0.778, 0.636, 0.136, 0.0),
    '\u{2287}' => CharMetrics::new(0.778, 0.636, 0.136, 0.0),
    '\u{2192}' => CharMetrics::new(1.0, 0.511, 0.011, 0.0),
    '\u{2190}' => CharMetrics::new(1.0, 0.511, 0.011, 0.0),
    '\u{21D2}' => CharMetrics::new(1.0, 0.525, 0.024, 0.0),
    '\u{21D0}' => CharMetrics::new(1.0, 0.525, 0.024, 0.0),
    '\u{21D4}' => CharMetrics::new(1.0, 0.525, 0.024, 0.0),
    '\u{2194}' => CharMetrics::new(1.0, 0.511, 0.011, 0.0),
    '\u{21A6}' => CharMetrics::new(1.0, 0.511, 0.011, 0.0),
    '\u{27F9}' => CharMetrics::new(1.638, 0.525, 0.024, 0.0),
    '\u{27FA}' => CharMetrics::new(1.858, 0.525, 0.024, 0.0),

    // Large operators (text size)
    '\u{2211}' => CharMetrics::new(1.056, 0.75, 0.25, 0.0),
    '\u{220F}' => CharMetrics::new(0.944, 0.75, 0.25, 0.0),
    '\u{2210}' => CharMetrics::new(0.944, 0.75, 0.25, 0.0),
    '\u{222B}' => CharMetrics::new(0.556, 0.805, 0.306, 0.111),
    '\u{222C}' => CharMetrics::new(0.9, 0.805, 0.306, 0.111),
    '\u{222D}' => CharMetrics::new(1.25, 0.805, 0.306, 0.111),
    '\u{222E}' => CharMetrics::new(0.556, 0.805, 0.306, 0.111),
    '\u{22C3}' => CharMetrics::new(0.833, 0.75, 0.25, 0.0),
    '\u{22C2}' => CharMetrics::new(0.833, 0.75, 0.25, 0.0),
    '\u{2A01}' => CharMetrics::new(1.111, 0.75, 0.25, 0.0),
    '\u{2A02}' => CharMetrics::new(1.111, 0.75, 0.25, 0.0),
    '\u{22C1}' => CharMetrics::new(0.833, 0.75, 0.25, 0.0),
    '\u{22C0}' => CharMetrics::new(0.833, 0.75, 0.25, 0.0),

    // Greek
    '\u{03B1}' => CharMetrics::new(0.640, 0.431, 0.0, 0.0),
    '\u{03B2}' => CharMetrics::new(0.566, 0.694, 0.194, 0.0),
    '\u{03B3}' => CharMetrics::new(0.518, 0.431, 0.194, 0.056),
    '\u{03B4}' => CharMetrics::new(0.444, 0.694, 0.0, 0.038),
    '\u{03B5}' => CharMetrics::new(0.466, 0.431, 0.0, 0.0),
    '\u{03B6}' => CharMetrics::new(0.438, 0.694, 0.194, 0.074),
    '\u{03B7}' => CharMetrics::new(0.497, 0.431, 0.194, 0.036),
    '\u{03B8}' => CharMetrics::new(0.469, 0.694, 0.0, 0.028),
    '\u{03B9}' => CharMetrics::new(0.354, 0.431, 0.0, 0.0),
    '\u{03BA}' => CharMetrics::new(0.576, 0.431, 0.0, 0.0),
    '\u{03BB}' => CharMetrics::new(0.583, 0.694, 0.0, 0.0),
    '\u{03BC}' => CharMetrics::new(0.603, 0.431, 0.194, 0.0),
    '\u{03BD}' => CharMetrics::new(0.494, 0.431, 0.0, 0.064),
    '\u{03BE}' => CharMetrics::new(0.438, 0.694, 0.194, 0.046),
    '\u{03C0}' => CharMetrics::new(0.570, 0.431, 0.0, 0.036),
    '\u{03C1}' => CharMetrics::new(0.517, 0.431, 0.194, 0.0),
    '\u{03C3}' => CharMetrics::new(0.571, 0.431, 0.0, 0.036),
    '\u{03C4}' => CharMetrics::new(0.437, 0.431, 0.0, 0.113),
    '\u{03C5}' => CharMetrics::new(0.540, 0.431, 0.0, 0.036),
    '\u{03C6}' => CharMetrics::new(0.596, 0.694, 0.194, 0.0),
    '\u{03C7}' => CharMetrics::new(0.626, 0.431, 0.194, 0.0),
    '\u{03C8}' => CharMetrics::new(0.651, 0.694, 0.194, 0.036),
    '\u{03C9}' => CharMetrics::new(0.622, 0.431, 0.0, 0.036),
    '\u{0393}' => CharMetrics::new(0.625, 0.683, 0.0, 0.0),
    '\u{0394}' => CharMetrics::new(0.833, 0.683, 0.0, 0.0),
    '\u{0398}' => CharMetrics::new(0.778, 0.683, 0.0, 0.0),
    '\u{039B}' => CharMetrics::new(0.694, 0.683, 0.0, 0.0),
    '\u{039E}' => CharMetrics::new(0.667, 0.683, 0.0, 0.0),
    '\u{03A0}' => CharMetrics::new(0.750, 0.683, 0.0, 0.0),
    '\u{03A3}' => CharMetrics::new(0.722, 0.683, 0.0, 0.0),
    '\u{03A5}' => CharMetrics::new(0.778, 0.683, 0.0, 0.0),
    '\u{03A6}' => CharMetrics::new(0.722, 0.683, 0.0, 0.0),
    '\u{03A8}' => CharMetrics::new(0.778, 0.683, 0.0, 0.0),
    '\u{03A9}' => CharMetrics::new(0.722, 0.683, 0.0, 0.0),

    // Miscellaneous
    '\u{221E}' => CharMetrics::new(1.0, 0.431, 0.0, 0.0),
    '\u{2202}' => CharMetrics::new(0.531, 0.694, 0.0, 0.056),
    '\u{2207}' => CharMetrics::new(0.833, 0.683, 0.0, 0.0),
    '\u{2200}' => CharMetrics::new(0.556, 0.694, 0.0, 0.0),
    '\u{2203}' => CharMetrics::new(0.556, 0.694, 0.0, 0.0),
    '\u{2205}' => CharMetrics::new(0.5, 0.75, 0.056, 0.0),
    '\u{210F}' => CharMetrics::new(0.576, 0.694, 0.0, 0.0),
    '\u{2113}' => CharMetrics::new(0.417, 0.694, 0.0, 0.0),
    '\u{2026}' => CharMetrics::new(1.172, 0.123, 0.0, 0.0),
    '\u{22EF}' => CharMetrics::new(1.172, 0.31, 0.0, 0.0),
    '\u{22EE}' => CharMetrics::new(0.278, 0.75, 0.03, 0.0),
    '\u{22F1}' => CharMetrics::new(1.282, 0.72, 0.03, 0.0),
    '\u{00AC}' => CharMetrics::new(0.667, 0.431, 0.0, 0.0),
    ' ' => CharMetrics::new(0.333, 0.0, 0.0, 0.0),
};

/// Fallback box for glyphs missing from the table
const DEFAULT_GLYPH: CharMetrics = CharMetrics::new(0.6, 0.683, 0.0, 0.0);

/// Monospace advance of the typewriter family
const TYPEWRITER_WIDTH: f64 = 0.525;

/// Metrics of `ch` in `font`, in em
pub fn char_metrics(ch: char, font: &FontSet) -> CharMetrics {
    let mut m = GLYPHS.get(&ch).copied().unwrap_or(DEFAULT_GLYPH);

    if !font.is_slanted(ch) {
        m.italic = 0.0;
    }
    match font.family {
        FontFamily::Typewriter if ch != ' ' => m.width = TYPEWRITER_WIDTH,
        FontFamily::SansSerif => m.width *= 0.95,
        _ => {}
    }
    if font.bold {
        m.width *= 1.1;
        m.italic *= 1.1;
    }
    m
}

/// Whether the glyph table knows `ch`
pub fn has_glyph(ch: char) -> bool {
    GLYPHS.contains_key(&ch)
}
