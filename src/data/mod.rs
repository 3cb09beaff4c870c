//! Data layer - Static tables and constants
//!
//! This module contains all static data used during parsing and layout:
//! - Symbol commands and character classes
//! - Named colors and color models
//! - Glyph metrics and TeX font parameters
//! - Inter-atom spacing rules
//! - Length units

pub mod colors;
pub mod metrics;
pub mod spacing;
pub mod symbols;
pub mod units;

// Re-export commonly used items
pub use colors::{parse_color, parse_color_with, Color, NAMED_COLORS};
pub use metrics::{char_metrics, CharMetrics};
pub use spacing::{glue_mu, SPACE_COMMANDS};
pub use symbols::{char_class, delimiter, SymbolDef, OPERATOR_NAMES, SYMBOLS};
pub use units::{Length, Unit};
