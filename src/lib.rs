//! # texbox
//!
//! LaTeX math markup to measured, paintable box trees, using TeX's math
//! layout rules.
//!
//! ## Features
//!
//! - **Command-driven parser**: a single scan with an explicit consumer stack,
//!   package-scoped commands and user macros
//! - **TeX layout**: the eight math styles, inter-atom glue by math class,
//!   scripts, fractions, radicals, fences and operators with limits
//! - **Arrays**: `array`, the matrix family, `cases`, `aligned`, rules and
//!   cell/row colors
//! - **Line breaking**: greedy splitting of wide formulas at glue
//! - **Partial mode**: keep the valid prefix of markup that is still being typed
//! - **WASM Support**: compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ```rust
//! use texbox::{parse, render, LayoutOptions};
//!
//! let atom = parse(r"\frac{1}{2}").unwrap();
//! assert!(!atom.is_empty());
//!
//! let icon = render(r"x^2 + y^2 = z^2", &LayoutOptions::display(20.0)).unwrap();
//! assert!(icon.width() > 0.0);
//! ```
//!
//! ### Painting
//!
//! ```rust
//! use texbox::{render, Color, FontSet, LayoutOptions, Painter};
//!
//! #[derive(Default)]
//! struct Count(usize);
//!
//! impl Painter for Count {
//!     fn draw_char(&mut self, _: char, _: &FontSet, _: f64, _: f64, _: f64, _: Color) {
//!         self.0 += 1;
//!     }
//!     fn draw_delimiter(&mut self, _: char, _: f64, _: f64, _: f64, _: f64, _: Color) {}
//!     fn fill_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: Color) {}
//!     fn stroke_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: f64, _: Color) {}
//! }
//!
//! let icon = render("a+b", &LayoutOptions::inline(12.0)).unwrap();
//! let mut painter = Count::default();
//! icon.paint(&mut painter, 0.0, 0.0);
//! assert_eq!(painter.0, 3);
//! ```

/// Core layout pipeline
pub mod core;

/// Data layer - static tables and constants
pub mod data;

/// Feature modules
pub mod features;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

pub use core::{
    Atom, BoxKind, Environment, FontChange, FontFamily, FontSet, Formula, HAlign, Icon, Insets,
    LayoutBox, LayoutOptions, MathClass, MathStyle, Painter, Parser, ParserOptions, Registry,
};
pub use core::icon::type_mask;
pub use core::linebreak::split;

// Re-export data modules
pub use data::colors::{self, Color};
pub use data::symbols;
pub use data::units::{Length, Unit};

// Re-export feature modules
pub use features::macros;

// Re-export utilities
pub use utils::error::{ConfigError, DimensionError, Error, ParseError, ParseResult, SyntaxError};

/// Parse markup with the built-in commands
pub fn parse(latex: &str) -> ParseResult<Atom> {
    Formula::parse(latex).map(|f| f.root)
}

/// Parse markup, keeping whatever was built before the first error
pub fn parse_partial(latex: &str) -> Atom {
    Formula::partial(latex).root
}

/// Parse and lay out markup in one step
pub fn render(latex: &str, options: &LayoutOptions) -> Result<Icon, Error> {
    let formula = Formula::parse(latex)?;
    Ok(formula.create_icon(options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse("ab").unwrap().children().len(), 2);
    }

    #[test]
    fn test_parse_partial_never_fails() {
        assert!(parse_partial("\\frac{").is_empty());
        assert!(!parse_partial("x + \\left(").is_empty());
    }

    #[test]
    fn test_render_errors() {
        assert!(matches!(
            render("\\nosuch", &LayoutOptions::default()),
            Err(Error::Parse(ParseError::UnknownCommand { .. }))
        ));
        assert!(matches!(
            render("x", &LayoutOptions::default().with_interline(1.0)),
            Err(Error::Config(ConfigError::WidthRequired(_)))
        ));
    }

    #[test]
    fn test_render_colored() {
        let icon = render("\\color{red} x", &LayoutOptions::default()).unwrap();
        assert!(icon.is_colored());
        let icon = render("x", &LayoutOptions::default()).unwrap();
        assert!(!icon.is_colored());
    }
}
