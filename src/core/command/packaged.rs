//! Commands tagged with their owning package

use log::trace;

use super::state::CommandState;
use super::{Command, Init, Progress};
use crate::core::atom::Atom;
use crate::core::parser::Parser;
use crate::utils::error::ParseResult;

/// A command instance together with the package it was resolved from.
///
/// Every capability is forwarded to the wrapped state; syntax errors raised
/// while the command runs are tagged with the command name.
#[derive(Debug, Clone, PartialEq)]
pub struct PackagedCommand {
    package: Option<String>,
    /// Name as written, e.g. `\frac` or `^`
    name: String,
    state: CommandState,
}

impl PackagedCommand {
    pub fn new(package: Option<&str>, name: impl Into<String>, state: CommandState) -> Self {
        PackagedCommand {
            package: package.map(str::to_string),
            name: name.into(),
            state,
        }
    }

    /// Command that belongs to no package
    pub fn global(name: impl Into<String>, state: CommandState) -> Self {
        PackagedCommand::new(None, name, state)
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &CommandState {
        &self.state
    }
}

impl Command for PackagedCommand {
    fn init(&mut self, parser: &mut Parser) -> ParseResult<Init> {
        trace!("init {} (package {:?})", self.name, self.package);
        self.state.init(parser).map_err(|e| e.in_command(&self.name))
    }

    fn add(&mut self, atom: Atom) -> ParseResult<Progress> {
        self.state.add(atom).map_err(|e| e.in_command(&self.name))
    }

    fn close(&mut self) -> Option<Atom> {
        trace!("close {}", self.name);
        self.state.close()
    }

    fn is_closable(&self) -> bool {
        self.state.is_closable()
    }

    fn steal_trailing_row(&mut self, row: Vec<Atom>) {
        self.state.steal_trailing_row(row)
    }

    fn delimiter(&mut self, ch: Option<char>, closing: bool) -> Option<Progress> {
        self.state.delimiter(ch, closing)
    }

    fn current_row(&mut self) -> Option<&mut Vec<Atom>> {
        self.state.current_row()
    }
}
