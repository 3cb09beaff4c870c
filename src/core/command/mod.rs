//! Command dispatch
//!
//! A command name resolves through the [`Registry`] to a prototype, which is
//! turned into a fresh [`PackagedCommand`] for every invocation. The parser
//! then drives the command through the [`Command`] capabilities: `init`
//! reads raw arguments and tells the parser what to do next, `add` feeds it
//! the atoms parsed after it, and `close` ends commands that run to the end
//! of their group.

pub mod builtins;
pub mod packaged;
pub mod registry;
pub mod state;

pub use builtins::Builtin;
pub use packaged::PackagedCommand;
pub use registry::{Prototype, Registry};
pub use state::{ArgKind, CommandState, ScriptSlot, SwitchKind};

use crate::core::array::{ColumnFormat, TableKind};
use crate::core::atom::Atom;
use crate::core::parser::Parser;
use crate::data::units::Length;
use crate::utils::error::ParseResult;

/// What the parser does with a command after `init`
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// The command is complete; deliver the atom, if any, to the current consumer
    Done(Option<Atom>),
    /// Push the command; it receives the atoms that follow
    Consume,
    /// Hand the command the current row, then push it
    StealRow,
    /// Open an environment
    Begin {
        name: String,
        kind: TableKind,
        format: ColumnFormat,
    },
    /// Close the environment `name`
    End(String),
    /// Row separator with optional extra space
    RowSep(Option<Length>),
    /// Inner fence delimiter for the enclosing `\left`
    Middle(Option<char>),
    /// Closing fence delimiter for the enclosing `\left`
    Right(Option<char>),
}

/// Result of feeding an atom to a command
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Pending,
    Complete(Atom),
}

/// Capabilities of a command during parsing
pub trait Command {
    /// Called once, right after the command name was read
    fn init(&mut self, parser: &mut Parser) -> ParseResult<Init>;

    /// Receive the next parsed atom
    fn add(&mut self, atom: Atom) -> ParseResult<Progress>;

    /// Finish the command early: at the end of its group, at `&` or `\\`,
    /// or when a partial parse is salvaged
    fn close(&mut self) -> Option<Atom>;

    /// Whether the command ends silently with its enclosing group
    fn is_closable(&self) -> bool;

    /// The atoms parsed before an infix command
    fn steal_trailing_row(&mut self, _row: Vec<Atom>) {}

    /// `\middle` (`closing == false`) or `\right` delimiter. `None` when
    /// the command is not a fence.
    fn delimiter(&mut self, _ch: Option<char>, _closing: bool) -> Option<Progress> {
        None
    }

    /// Row that scripts and infix commands take atoms from
    fn current_row(&mut self) -> Option<&mut Vec<Atom>> {
        None
    }
}
