//! Core layout pipeline
//!
//! Markup flows through these modules in order:
//! - `parser` and `command`: markup to [`Atom`](atom::Atom) tree
//! - `layout`, `array`: atom tree to measured [`LayoutBox`](boxes::LayoutBox) tree
//! - `linebreak` and `icon`: line breaking and final sizing

pub mod array;
pub mod atom;
pub mod boxes;
pub mod command;
pub mod environment;
pub mod formula;
pub mod icon;
pub mod layout;
pub mod linebreak;
pub mod parser;

pub use atom::{Atom, MathClass};
pub use boxes::{BoxKind, HAlign, LayoutBox, Painter};
pub use command::{PackagedCommand, Prototype, Registry};
pub use environment::{Environment, FontChange, FontFamily, FontSet, MathStyle};
pub use formula::Formula;
pub use icon::{type_mask, Icon, Insets, LayoutOptions};
pub use parser::{Parser, ParserOptions};
