//! Error handling for texbox
//!
//! Every checked failure crosses the crate boundary at parse time. Layout and
//! line breaking are total once an atom tree exists, so the only error types
//! here are the three parse-time failures plus the configuration error raised
//! by [`LayoutOptions`](crate::LayoutOptions).

use thiserror::Error;

/// A malformed construct found while scanning the markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at position {position}{}: {message}", command_suffix(.command.as_deref()))]
pub struct SyntaxError {
    /// Byte offset into the markup where the problem was detected
    pub position: usize,
    /// Human-readable message
    pub message: String,
    /// Name of the command or environment involved, if any
    pub command: Option<String>,
}

fn command_suffix(command: Option<&str>) -> String {
    command.map(|cmd| format!(" ({})", cmd)).unwrap_or_default()
}

/// An array row holds more cells than the table declares columns, or the
/// table was laid out before its dimensions were checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Dimension error: row {row} has {cells} cells but the array has {columns} columns")]
pub struct DimensionError {
    /// Zero-based index of the offending row
    pub row: usize,
    /// Number of cells found in that row
    pub cells: usize,
    /// Number of columns of the array
    pub columns: usize,
}

/// Parse error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A command name that neither the active packages nor the global table know
    #[error("Unknown command '\\{name}' at position {position}")]
    UnknownCommand { name: String, position: usize },
    /// Malformed argument, unbalanced group, dangling script, mismatched environment
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// Array row/column count mismatch
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

/// Result type for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Invalid combination of layout options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `max_width` or inter-line spacing was requested without a text width
    #[error("Cannot set '{0}' without having specified a width")]
    WidthRequired(&'static str),
    /// The requested font size is not a positive finite number
    #[error("Invalid font size: {0}")]
    InvalidSize(String),
}

/// Any failure of the markup-to-icon pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// Convenience constructors for errors
impl ParseError {
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax(SyntaxError {
            position,
            message: message.into(),
            command: None,
        })
    }

    pub fn syntax_in(position: usize, command: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::Syntax(SyntaxError {
            position,
            message: message.into(),
            command: Some(command.into()),
        })
    }

    pub fn unknown(name: impl Into<String>, position: usize) -> Self {
        ParseError::UnknownCommand {
            name: name.into(),
            position,
        }
    }

    /// Byte offset associated with the error, if it has one
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnknownCommand { position, .. } => Some(*position),
            ParseError::Syntax(err) => Some(err.position),
            ParseError::Dimension(_) => None,
        }
    }

    /// Attach the command being run to a syntax error that names none
    pub fn in_command(self, command: &str) -> Self {
        match self {
            ParseError::Syntax(mut err) if err.command.is_none() => {
                err.command = Some(command.to_string());
                ParseError::Syntax(err)
            }
            other => other,
        }
    }

    pub fn is_dimension(&self) -> bool {
        matches!(self, ParseError::Dimension(_))
    }
}
