//! Sized output of a formula
//!
//! [`LayoutOptions`] carries everything needed to turn an atom tree into
//! a final box: the starting style, the point size, an optional font mask,
//! the text width with its alignment, and the inter-line spacing used when
//! the formula has to be broken. [`Icon`] is the result handed to a
//! painting backend.

#[cfg(feature = "serde")]
use serde::Serialize;

use log::debug;

use crate::core::atom::Atom;
use crate::core::boxes::{HAlign, LayoutBox, Painter};
use crate::core::environment::{Environment, FontChange, FontFamily, MathStyle};
use crate::core::linebreak::split;
use crate::data::colors::Color;
use crate::utils::error::ConfigError;

/// Font selection bits for [`LayoutOptions::type_mask`]
pub mod type_mask {
    /// Serif (the default): clears the sans-serif bit
    pub const SERIF: u32 = 1;
    pub const SANSSERIF: u32 = 2;
    pub const BOLD: u32 = 4;
    pub const ITALIC: u32 = 8;
    pub const ROMAN: u32 = 16;
    pub const TYPEWRITER: u32 = 32;
}

/// Font change applied to the whole formula for a type mask
pub fn font_for_mask(mask: u32) -> FontChange {
    let mut change = FontChange::default();
    if mask == type_mask::SERIF {
        return change;
    }
    if mask & type_mask::ROMAN != 0 {
        change.family = Some(FontFamily::Roman);
    }
    if mask & type_mask::TYPEWRITER != 0 {
        change.family = Some(FontFamily::Typewriter);
    }
    if mask & type_mask::SANSSERIF != 0 {
        change.family = Some(FontFamily::SansSerif);
    }
    if mask & type_mask::ITALIC != 0 {
        change.italic = Some(true);
    }
    if mask & type_mask::BOLD != 0 {
        change.bold = Some(true);
    }
    change
}

/// Empty space around the formula, in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    pub const fn uniform(value: f64) -> Self {
        Insets {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Style the formula starts in
    /// Default: display
    pub style: MathStyle,

    /// Font size in points
    /// Default: 20
    pub size: f64,

    /// Combination of [`type_mask`] bits; 0 keeps the math fonts
    pub type_mask: u32,

    /// Foreground color of uncolored content
    /// Default: black
    pub fg: Color,

    /// Background of the whole icon
    pub bg: Option<Color>,

    /// Text width in points and the alignment inside it
    pub width: Option<(f64, HAlign)>,

    /// Shrink the result to the broken formula instead of the text width
    pub max_width: bool,

    /// Space between broken lines, in points; enables line breaking
    pub interline: Option<f64>,

    pub insets: Insets,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            style: MathStyle::Display,
            size: 20.0,
            type_mask: 0,
            fg: Color::BLACK,
            bg: None,
            width: None,
            max_width: false,
            interline: None,
            insets: Insets::default(),
        }
    }
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display style at `size` points
    pub fn display(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Text (inline) style at `size` points
    pub fn inline(size: f64) -> Self {
        Self {
            style: MathStyle::Text,
            size,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: MathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_type(mut self, mask: u32) -> Self {
        self.type_mask = mask;
        self
    }

    pub fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    pub fn with_width(mut self, width: f64, align: HAlign) -> Self {
        self.width = Some((width, align));
        self
    }

    /// Size the result to the broken formula. Only left alignment is
    /// supported in this mode, so the alignment is forced to [`HAlign::Left`].
    pub fn with_max_width(mut self, max_width: bool) -> Self {
        if max_width {
            if let Some((width, _)) = self.width {
                self.width = Some((width, HAlign::Left));
            }
        }
        self.max_width = max_width;
        self
    }

    pub fn with_interline(mut self, interline: f64) -> Self {
        self.interline = Some(interline);
        self
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Check option combinations that cannot be honoured
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::InvalidSize(self.size.to_string()));
        }
        if self.width.is_none() {
            if self.max_width {
                return Err(ConfigError::WidthRequired("max_width"));
            }
            if self.interline.is_some() {
                return Err(ConfigError::WidthRequired("interline spacing"));
            }
        }
        Ok(())
    }

    /// Environment the root atom is laid out in
    pub fn environment(&self) -> Environment {
        let mut env = Environment::new(self.style, self.size)
            .with_text_width(self.width.map(|(w, _)| w))
            .with_interline(self.interline);
        env.font = font_for_mask(self.type_mask).apply(env.font);
        env
    }
}

/// A laid out formula ready for painting
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Icon {
    pub root: LayoutBox,
    pub insets: Insets,
    pub fg: Color,
    pub bg: Option<Color>,
}

impl Icon {
    /// Lay out `atom` according to `options`
    pub fn build(atom: &Atom, options: &LayoutOptions) -> Result<Icon, ConfigError> {
        options.validate()?;
        let env = options.environment();
        let mut root = atom.layout(&env);

        if let Some((width, align)) = options.width {
            if let Some(interline) = options.interline {
                root = split(&root, width, interline);
            }
            let (target, align) = if options.max_width {
                (root.width, HAlign::Left)
            } else {
                (width, align)
            };
            debug!("align formula of width {:.3} in {:.3} ({:?})", root.width, target, align);
            root = root.aligned(target, align);
        }

        Ok(Icon {
            root,
            insets: options.insets,
            fg: options.fg,
            bg: options.bg,
        })
    }

    pub fn width(&self) -> f64 {
        self.root.width + self.insets.left + self.insets.right
    }

    pub fn height(&self) -> f64 {
        self.root.height + self.insets.top
    }

    pub fn depth(&self) -> f64 {
        self.root.depth + self.insets.bottom
    }

    pub fn total_height(&self) -> f64 {
        self.height() + self.depth()
    }

    /// Baseline offset from the top edge
    pub fn baseline(&self) -> f64 {
        self.height()
    }

    /// Whether the formula sets any color of its own
    pub fn is_colored(&self) -> bool {
        self.root.is_colored()
    }

    /// Paint with the top-left corner of the icon at (`x`, `y`)
    pub fn paint(&self, painter: &mut dyn Painter, x: f64, y: f64) {
        if let Some(bg) = self.bg {
            painter.fill_rect(x, y, self.width(), self.total_height(), bg);
        }
        self.root
            .draw_with(painter, x + self.insets.left, y + self.height(), self.fg);
    }
}
