//! Parsed formulas

use crate::core::atom::Atom;
use crate::core::boxes::{HAlign, LayoutBox};
use crate::core::command::Registry;
use crate::core::environment::{Environment, FontChange, FontFamily};
use crate::core::icon::{Icon, LayoutOptions};
use crate::core::parser::{Parser, ParserOptions};
use crate::utils::error::{ConfigError, ParseResult};

/// The atom tree of one piece of markup
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Formula {
    pub root: Atom,
}

impl Formula {
    /// Parse with the global registry
    pub fn parse(latex: &str) -> ParseResult<Formula> {
        Self::parse_with(latex, Registry::global(), &ParserOptions::default())
    }

    pub fn parse_with(latex: &str, registry: &Registry, options: &ParserOptions) -> ParseResult<Formula> {
        let root = Parser::new(latex, registry, options).parse()?;
        Ok(Formula { root })
    }

    /// Parse for live editing: errors are logged and whatever was built
    /// before them is kept
    pub fn partial(latex: &str) -> Formula {
        let root = Parser::new(latex, Registry::global(), &ParserOptions::partial())
            .parse()
            .unwrap_or_default();
        Formula { root }
    }

    /// Plain text in roman, one line per `\n`, `\\` or `\cr`
    pub fn from_text(text: &str, align: HAlign) -> Formula {
        let roman = FontChange::family(FontFamily::Roman);
        let lines: Vec<Atom> = text
            .replace("\\\\", "\n")
            .replace("\\cr", "\n")
            .split('\n')
            .map(|line| Atom::Text {
                text: line.to_string(),
                font: roman,
            })
            .collect();
        let root = if lines.len() == 1 {
            lines.into_iter().next().unwrap_or_default()
        } else {
            Atom::Multline {
                lines,
                align: Some(align),
            }
        };
        Formula { root }
    }

    /// Center the formula on the math axis
    pub fn center_on_axis(self) -> Formula {
        Formula {
            root: Atom::VCentered(Box::new(self.root)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn layout(&self, env: &Environment) -> LayoutBox {
        self.root.layout(env)
    }

    pub fn create_icon(&self, options: &LayoutOptions) -> Result<Icon, ConfigError> {
        Icon::build(&self.root, options)
    }
}
