//! Layout environment
//!
//! An [`Environment`] is the inherited context of box construction: the math
//! style, the font set, the colors and the width budget. It is an immutable
//! value; every recursive layout call derives a copy with the fields it
//! needs overridden, so nothing has to be restored on the way back up.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::data::colors::Color;
use crate::data::metrics::{AXIS_HEIGHT, RULE_THICKNESS, X_HEIGHT};

/// TeX's eight math styles: four sizes, each with a cramped variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum MathStyle {
    Display,
    DisplayCramped,
    Text,
    TextCramped,
    Script,
    ScriptCramped,
    ScriptScript,
    ScriptScriptCramped,
}

impl MathStyle {
    /// Size rung: 0 display, 1 text, 2 script, 3 script-script
    pub fn size(self) -> u8 {
        match self {
            MathStyle::Display | MathStyle::DisplayCramped => 0,
            MathStyle::Text | MathStyle::TextCramped => 1,
            MathStyle::Script | MathStyle::ScriptCramped => 2,
            MathStyle::ScriptScript | MathStyle::ScriptScriptCramped => 3,
        }
    }

    pub fn is_cramped(self) -> bool {
        matches!(
            self,
            MathStyle::DisplayCramped
                | MathStyle::TextCramped
                | MathStyle::ScriptCramped
                | MathStyle::ScriptScriptCramped
        )
    }

    pub fn is_display(self) -> bool {
        self.size() == 0
    }

    /// Script and script-script styles, where conditional glue vanishes
    pub fn is_tight(self) -> bool {
        self.size() >= 2
    }

    fn from_parts(size: u8, cramped: bool) -> MathStyle {
        match (size, cramped) {
            (0, false) => MathStyle::Display,
            (0, true) => MathStyle::DisplayCramped,
            (1, false) => MathStyle::Text,
            (1, true) => MathStyle::TextCramped,
            (2, false) => MathStyle::Script,
            (2, true) => MathStyle::ScriptCramped,
            (_, false) => MathStyle::ScriptScript,
            (_, true) => MathStyle::ScriptScriptCramped,
        }
    }

    /// Style of a superscript
    pub fn sup(self) -> MathStyle {
        let size = match self.size() {
            0 | 1 => 2,
            _ => 3,
        };
        MathStyle::from_parts(size, self.is_cramped())
    }

    /// Style of a subscript (always cramped)
    pub fn sub(self) -> MathStyle {
        self.sup().cramp()
    }

    /// Style of a fraction numerator
    pub fn num(self) -> MathStyle {
        let size = match self.size() {
            0 => 1,
            1 => 2,
            _ => 3,
        };
        MathStyle::from_parts(size, self.is_cramped())
    }

    /// Style of a fraction denominator (always cramped)
    pub fn den(self) -> MathStyle {
        self.num().cramp()
    }

    pub fn cramp(self) -> MathStyle {
        MathStyle::from_parts(self.size(), true)
    }

    /// Font scale relative to the base size
    pub fn scale(self) -> f64 {
        match self.size() {
            0 | 1 => 1.0,
            2 => 0.7,
            _ => 0.5,
        }
    }
}

/// Font family of the active font set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FontFamily {
    /// Math italic letters with upright digits and symbols
    Math,
    Roman,
    SansSerif,
    Typewriter,
}

/// Active font: family, weight and slant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FontSet {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl FontSet {
    pub const MATH: FontSet = FontSet {
        family: FontFamily::Math,
        bold: false,
        italic: false,
    };

    pub const ROMAN: FontSet = FontSet {
        family: FontFamily::Roman,
        bold: false,
        italic: false,
    };

    /// Whether `ch` is drawn slanted in this font
    pub fn is_slanted(&self, ch: char) -> bool {
        if self.italic {
            return true;
        }
        self.family == FontFamily::Math && is_math_italic(ch)
    }
}

impl Default for FontSet {
    fn default() -> Self {
        FontSet::MATH
    }
}

/// Latin letters and lowercase Greek are italic in math mode
fn is_math_italic(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ('\u{03B1}'..='\u{03F5}').contains(&ch)
}

/// A partial font override, as applied by `\mathbf`, `\rm`, `\textit`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontChange {
    pub family: Option<FontFamily>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

impl FontChange {
    pub const fn family(family: FontFamily) -> Self {
        FontChange {
            family: Some(family),
            bold: None,
            italic: None,
        }
    }

    pub const fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub const fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn apply(&self, font: FontSet) -> FontSet {
        FontSet {
            family: self.family.unwrap_or(font.family),
            bold: self.bold.unwrap_or(font.bold),
            italic: self.italic.unwrap_or(font.italic),
        }
    }
}

/// Inherited layout context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub style: MathStyle,
    /// Base font size in points (text style)
    pub size: f64,
    pub font: FontSet,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    /// Target text width in points
    pub text_width: Option<f64>,
    /// Inter-line spacing in points
    pub interline: Option<f64>,
}

impl Environment {
    pub fn new(style: MathStyle, size: f64) -> Self {
        Environment {
            style,
            size,
            font: FontSet::MATH,
            fg: None,
            bg: None,
            text_width: None,
            interline: None,
        }
    }

    pub fn with_style(&self, style: MathStyle) -> Self {
        Environment { style, ..*self }
    }

    pub fn with_font(&self, font: FontSet) -> Self {
        Environment { font, ..*self }
    }

    pub fn with_fg(&self, fg: Option<Color>) -> Self {
        Environment {
            fg: fg.or(self.fg),
            ..*self
        }
    }

    pub fn with_bg(&self, bg: Option<Color>) -> Self {
        Environment {
            bg: bg.or(self.bg),
            ..*self
        }
    }

    pub fn with_text_width(&self, text_width: Option<f64>) -> Self {
        Environment {
            text_width,
            ..*self
        }
    }

    pub fn with_interline(&self, interline: Option<f64>) -> Self {
        Environment {
            interline,
            ..*self
        }
    }

    pub fn sup(&self) -> Self {
        self.with_style(self.style.sup())
    }

    pub fn sub(&self) -> Self {
        self.with_style(self.style.sub())
    }

    pub fn num(&self) -> Self {
        self.with_style(self.style.num())
    }

    pub fn den(&self) -> Self {
        self.with_style(self.style.den())
    }

    pub fn cramped(&self) -> Self {
        self.with_style(self.style.cramp())
    }

    /// Effective font size in points
    pub fn em(&self) -> f64 {
        self.size * self.style.scale()
    }

    /// One math unit (1/18 em) in points
    pub fn mu(&self) -> f64 {
        self.em() / 18.0
    }

    pub fn x_height(&self) -> f64 {
        X_HEIGHT * self.em()
    }

    pub fn axis_height(&self) -> f64 {
        AXIS_HEIGHT * self.em()
    }

    pub fn rule_thickness(&self) -> f64 {
        RULE_THICKNESS * self.em()
    }

    /// A TeX font parameter given in em, scaled to the current style
    pub fn param(&self, em: f64) -> f64 {
        em * self.em()
    }
}
