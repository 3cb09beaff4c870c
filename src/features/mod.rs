//! Feature modules
//!
//! - User-defined macros (`\newcommand`, `\renewcommand`, `\providecommand`, `\def`)

pub mod macros;

pub use macros::{Macro, MacroDb};
