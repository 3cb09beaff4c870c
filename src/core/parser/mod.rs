//! Markup parser
//!
//! A single left-to-right scan over the markup drives an explicit stack of
//! consumers: brace groups, open environments with their table builders,
//! and commands still waiting for arguments. Ordinary characters become
//! symbol atoms and are handed to the innermost consumer; a completed
//! command hands its atom further down the stack.
//!
//! ```
//! use texbox::core::parser::{Parser, ParserOptions};
//! use texbox::core::command::Registry;
//!
//! let atom = Parser::new("x^2", Registry::global(), &ParserOptions::default())
//!     .parse()
//!     .unwrap();
//! assert!(!atom.is_empty());
//! ```

pub mod lexer;

use fxhash::FxHashMap;
use log::{debug, trace, warn};

use self::lexer::Lexer;
use crate::core::array::ArrayOfAtoms;
use crate::core::atom::{Atom, MathClass};
use crate::core::boxes::HAlign;
use crate::core::command::{Command, CommandState, Init, PackagedCommand, Progress, Registry, ScriptSlot};
use crate::core::command::state::after_primes;
use crate::data::colors::{parse_color_with, Color};
use crate::data::symbols::delimiter;
use crate::data::units::Length;
use crate::features::macros::{Macro, MacroDb, MAX_EXPANSION_DEPTH};
use crate::utils::error::{ParseError, ParseResult};

const PRIME: char = '\u{2032}';

/// How a macro definition treats an existing command of the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefineMode {
    /// `\newcommand`: the name must be free
    New,
    /// `\renewcommand`: the name must exist
    Renew,
    /// `\providecommand`: keep an existing definition
    Provide,
    /// `\def`: always (re)define
    Def,
}

/// Parser configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Swallow errors and return the atoms built so far
    pub partial: bool,
    /// Packages active from the start of the parse
    pub packages: Vec<String>,
}

impl ParserOptions {
    pub fn partial() -> Self {
        ParserOptions {
            partial: true,
            ..Default::default()
        }
    }

    pub fn with_package(mut self, package: &str) -> Self {
        self.packages.push(package.to_string());
        self
    }
}

/// An in-progress builder on the parser stack
#[derive(Debug)]
enum Consumer {
    /// Brace group, or the whole formula when `root` is set
    Group {
        atoms: Vec<Atom>,
        /// Rows already ended by `\\`
        lines: Vec<Atom>,
        start: usize,
        root: bool,
    },
    /// Body of the innermost environment
    Array(ArrayOfAtoms),
    /// Opening of the environment whose body sits above it
    Begin {
        name: String,
        kind: crate::core::array::TableKind,
        start: usize,
    },
    Command { cmd: PackagedCommand, start: usize },
}

impl Consumer {
    fn group(start: usize, root: bool) -> Self {
        Consumer::Group {
            atoms: Vec::new(),
            lines: Vec::new(),
            start,
            root,
        }
    }
}

/// Atom for a finished group: a row, or centered lines when the group
/// contained `\\`
fn group_atom(atoms: Vec<Atom>, mut lines: Vec<Atom>) -> Atom {
    if lines.is_empty() {
        return Atom::Row(atoms);
    }
    lines.push(Atom::Row(atoms));
    Atom::Multline {
        lines,
        align: Some(HAlign::Center),
    }
}

/// Parser over one markup string
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    registry: &'a Registry,
    stack: Vec<Consumer>,
    packages: Vec<String>,
    colors: FxHashMap<String, Color>,
    macros: MacroDb,
    depth: usize,
    partial: bool,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str, registry: &'a Registry, options: &ParserOptions) -> Self {
        Parser {
            lexer: Lexer::new(src),
            registry,
            stack: vec![Consumer::group(0, true)],
            packages: options.packages.clone(),
            colors: FxHashMap::default(),
            macros: MacroDb::new(),
            depth: 0,
            partial: options.partial,
        }
    }

    /// Parse the whole markup into an atom tree
    pub fn parse(mut self) -> ParseResult<Atom> {
        let result = self.scan().and_then(|()| self.finish());
        match result {
            Ok(atom) => Ok(atom),
            Err(err) if self.partial => {
                warn!("partial formula, keeping what was parsed: {}", err);
                Ok(self.salvage())
            }
            Err(err) => Err(err),
        }
    }

    fn scan(&mut self) -> ParseResult<()> {
        loop {
            self.lexer.skip_whitespace();
            let pos = self.lexer.position();
            let Some(ch) = self.lexer.next_char() else {
                return Ok(());
            };
            match ch {
                '%' => self.lexer.skip_comment(),
                '{' => self.open_group(pos),
                '}' => self.close_group(pos)?,
                '^' => self.script(ScriptSlot::Sup, pos)?,
                '_' => self.script(ScriptSlot::Sub, pos)?,
                '\'' => self.prime(pos)?,
                '&' => self.column(pos)?,
                '\\' => self.command(pos)?,
                '~' => self.deliver(Atom::Space(Length::mu(6.0)))?,
                '$' => {}
                c => self.deliver(Atom::char(c))?,
            }
        }
    }

    /// End of input: everything but the root must be closed
    fn finish(&mut self) -> ParseResult<Atom> {
        self.close_closables()?;
        match self.stack.last() {
            Some(Consumer::Group { root: true, .. }) | None => {}
            Some(Consumer::Group { start, .. }) => {
                return Err(ParseError::syntax(*start, "missing '}'"));
            }
            Some(Consumer::Array(_)) | Some(Consumer::Begin { .. }) => {
                let (name, start) = self.open_environment().unwrap_or_default();
                return Err(ParseError::syntax_in(
                    start,
                    format!("\\begin{{{}}}", name),
                    "environment is not closed",
                ));
            }
            Some(Consumer::Command { cmd, start }) => {
                let message = match cmd.state() {
                    CommandState::Fence { .. } => "missing \\right",
                    _ => "missing argument",
                };
                return Err(ParseError::syntax_in(*start, cmd.name(), message));
            }
        }
        match self.stack.pop() {
            Some(Consumer::Group { atoms, lines, .. }) => Ok(group_atom(atoms, lines)),
            _ => Ok(Atom::Row(Vec::new())),
        }
    }

    /// Fold every open consumer into the one below it, dropping what
    /// cannot be completed
    fn salvage(&mut self) -> Atom {
        while self.stack.len() > 1 {
            let atom = match self.stack.pop() {
                Some(Consumer::Group { atoms, lines, .. }) => Some(group_atom(atoms, lines)),
                Some(Consumer::Command { mut cmd, .. }) => cmd.close(),
                Some(Consumer::Array(table)) => match self.stack.pop() {
                    Some(Consumer::Begin { kind, .. }) => kind.finish(table).ok(),
                    _ => None,
                },
                Some(Consumer::Begin { .. }) | None => None,
            };
            if let Some(atom) = atom {
                if let Err(err) = self.deliver(atom) {
                    debug!("dropping salvaged atom: {}", err);
                }
            }
        }
        match self.stack.pop() {
            Some(Consumer::Group { atoms, lines, .. }) => group_atom(atoms, lines),
            _ => Atom::Row(Vec::new()),
        }
    }

    /// Hand a finished atom to the innermost consumer. Commands completed
    /// by it are popped and their atoms handed on in turn.
    fn deliver(&mut self, mut atom: Atom) -> ParseResult<()> {
        loop {
            match self.stack.last_mut() {
                Some(Consumer::Group { atoms, .. }) => {
                    atoms.push(atom);
                    return Ok(());
                }
                Some(Consumer::Array(table)) => {
                    table.add_atom(atom);
                    return Ok(());
                }
                Some(Consumer::Command { cmd, .. }) => match cmd.add(atom)? {
                    Progress::Pending => return Ok(()),
                    Progress::Complete(done) => {
                        self.stack.pop();
                        atom = done;
                    }
                },
                Some(Consumer::Begin { .. }) | None => {
                    return Err(ParseError::syntax(self.lexer.position(), "content outside of any group"));
                }
            }
        }
    }

    /// Close commands that end with their group (`\bf`, `\over`, ...)
    fn close_closables(&mut self) -> ParseResult<()> {
        loop {
            let closable = matches!(
                self.stack.last(),
                Some(Consumer::Command { cmd, .. }) if cmd.is_closable()
            );
            if !closable {
                return Ok(());
            }
            if let Some(Consumer::Command { mut cmd, .. }) = self.stack.pop() {
                if let Some(atom) = cmd.close() {
                    self.deliver(atom)?;
                }
            }
        }
    }

    fn open_group(&mut self, pos: usize) {
        trace!("open group at {}", pos);
        self.stack.push(Consumer::group(pos, false));
    }

    fn close_group(&mut self, pos: usize) -> ParseResult<()> {
        self.close_closables()?;
        match self.stack.last() {
            Some(Consumer::Group { root: false, .. }) => {}
            Some(Consumer::Group { root: true, .. }) | None => {
                return Err(ParseError::syntax(pos, "unmatched '}'"));
            }
            Some(Consumer::Array(_)) | Some(Consumer::Begin { .. }) => {
                let (name, _) = self.open_environment().unwrap_or_default();
                return Err(ParseError::syntax_in(
                    pos,
                    format!("\\begin{{{}}}", name),
                    "environment is not closed before '}'",
                ));
            }
            Some(Consumer::Command { cmd, .. }) => {
                return Err(ParseError::syntax_in(pos, cmd.name(), "missing argument"));
            }
        }

        if let Some(Consumer::Group { atoms, lines, .. }) = self.stack.pop() {
            self.deliver(group_atom(atoms, lines))?;
        }
        Ok(())
    }

    /// Name and position of the innermost open environment
    fn open_environment(&self) -> Option<(String, usize)> {
        self.stack.iter().rev().find_map(|c| match c {
            Consumer::Begin { name, start, .. } => Some((name.clone(), *start)),
            _ => None,
        })
    }

    fn script(&mut self, slot: ScriptSlot, pos: usize) -> ParseResult<()> {
        let mark = match slot {
            ScriptSlot::Sup => "^",
            ScriptSlot::Sub => "_",
        };
        let last = self
            .take_last_atom()
            .ok_or_else(|| ParseError::syntax(pos, format!("dangling '{}' without a base", mark)))?;

        let (base, sup, sub) = match last {
            Atom::Scripts { base, sup, sub } => (*base, sup, sub),
            other => (other, None, None),
        };
        match slot {
            ScriptSlot::Sup if sup.as_deref().is_some_and(|s| !s.is_prime_row()) => {
                return Err(ParseError::syntax(pos, "double superscript"));
            }
            ScriptSlot::Sub if sub.is_some() => {
                return Err(ParseError::syntax(pos, "double subscript"));
            }
            _ => {}
        }

        let state = CommandState::Script {
            base,
            sup,
            sub,
            slot,
        };
        self.stack.push(Consumer::Command {
            cmd: PackagedCommand::global(mark, state),
            start: pos,
        });
        Ok(())
    }

    fn prime(&mut self, pos: usize) -> ParseResult<()> {
        let prime = Atom::symbol(PRIME, MathClass::Ord);
        let atom = match self.take_last_atom().unwrap_or_default() {
            Atom::Scripts {
                base,
                sup: None,
                sub,
            } => Atom::Scripts {
                base,
                sup: Some(Box::new(prime)),
                sub,
            },
            Atom::Scripts {
                base,
                sup: Some(primes),
                sub,
            } if primes.is_prime_row() => Atom::Scripts {
                base,
                sup: Some(Box::new(after_primes(*primes, prime))),
                sub,
            },
            Atom::Scripts { .. } => return Err(ParseError::syntax(pos, "double superscript")),
            base => Atom::Scripts {
                base: Box::new(base),
                sup: Some(Box::new(prime)),
                sub: None,
            },
        };
        self.deliver(atom)
    }

    fn column(&mut self, pos: usize) -> ParseResult<()> {
        self.close_closables()?;
        match self.stack.last_mut() {
            Some(Consumer::Array(table)) => {
                table.add_col();
                Ok(())
            }
            _ => Err(ParseError::syntax(pos, "misplaced '&'")),
        }
    }

    fn row_separator(&mut self, gap: Option<Length>, pos: usize) -> ParseResult<()> {
        self.close_closables()?;
        match self.stack.last_mut() {
            Some(Consumer::Array(table)) => table.add_row(gap),
            Some(Consumer::Group { atoms, lines, .. }) => lines.push(Atom::Row(std::mem::take(atoms))),
            _ => return Err(ParseError::syntax_in(pos, "\\\\", "misplaced row separator")),
        }
        Ok(())
    }

    fn command(&mut self, pos: usize) -> ParseResult<()> {
        let name = self
            .lexer
            .read_command_name()
            .ok_or_else(|| ParseError::syntax(pos, "lone '\\' at end of input"))?;

        let mut cmd = match self.macros.get(&name) {
            Some(m) => PackagedCommand::global(format!("\\{}", name), CommandState::Macro(m.clone())),
            None => self.registry.resolve(&name, &self.packages, pos)?,
        };
        let init = cmd.init(self)?;
        self.apply(cmd, init, pos)
    }

    fn apply(&mut self, mut cmd: PackagedCommand, init: Init, pos: usize) -> ParseResult<()> {
        match init {
            Init::Done(Some(atom)) => self.deliver(atom),
            Init::Done(None) => Ok(()),
            Init::Consume => {
                self.stack.push(Consumer::Command { cmd, start: pos });
                Ok(())
            }
            Init::StealRow => {
                let row = self
                    .take_row()
                    .ok_or_else(|| ParseError::syntax_in(pos, cmd.name(), "no row to take as numerator"))?;
                cmd.steal_trailing_row(row);
                self.stack.push(Consumer::Command { cmd, start: pos });
                Ok(())
            }
            Init::Begin { name, kind, format } => {
                debug!("begin {} at {}", name, pos);
                self.stack.push(Consumer::Begin {
                    name,
                    kind,
                    start: pos,
                });
                self.stack.push(Consumer::Array(ArrayOfAtoms::new(format)));
                Ok(())
            }
            Init::End(name) => self.end_environment(&name, pos),
            Init::RowSep(gap) => self.row_separator(gap, pos),
            Init::Middle(ch) => self.fence_delimiter(ch, false, pos),
            Init::Right(ch) => self.fence_delimiter(ch, true, pos),
        }
    }

    fn end_environment(&mut self, name: &str, pos: usize) -> ParseResult<()> {
        self.close_closables()?;
        let end = format!("\\end{{{}}}", name);
        if !matches!(self.stack.last(), Some(Consumer::Array(_))) {
            return Err(ParseError::syntax_in(pos, end, "no matching \\begin"));
        }
        let Some(Consumer::Array(table)) = self.stack.pop() else {
            return Err(ParseError::syntax_in(pos, end, "no matching \\begin"));
        };
        let Some(Consumer::Begin { name: begin, kind, .. }) = self.stack.pop() else {
            return Err(ParseError::syntax_in(pos, end, "no matching \\begin"));
        };
        if begin != name {
            return Err(ParseError::syntax_in(
                pos,
                end,
                format!("does not match \\begin{{{}}}", begin),
            ));
        }

        debug!("end {} with {} rows", name, table.rows().len());
        let atom = kind.finish(table)?;
        self.deliver(atom)
    }

    fn fence_delimiter(&mut self, ch: Option<char>, closing: bool, pos: usize) -> ParseResult<()> {
        self.close_closables()?;
        let progress = match self.stack.last_mut() {
            Some(Consumer::Command { cmd, .. }) => cmd.delimiter(ch, closing),
            _ => None,
        };
        match progress {
            Some(Progress::Pending) => Ok(()),
            Some(Progress::Complete(atom)) => {
                self.stack.pop();
                self.deliver(atom)
            }
            None => {
                let name = if closing { "\\right" } else { "\\middle" };
                Err(ParseError::syntax_in(pos, name, "missing \\left"))
            }
        }
    }

    // ------------------------------------------------------------------
    // Services for commands
    // ------------------------------------------------------------------

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Byte offset of the next unread character
    pub fn position(&self) -> usize {
        self.lexer.position()
    }

    pub fn eat(&mut self, c: char) -> bool {
        self.lexer.skip_whitespace();
        self.lexer.eat(c)
    }

    pub fn read_until(&mut self, stop: char) -> String {
        self.lexer.read_until(stop)
    }

    /// A braced argument as raw markup
    pub fn read_raw_group(&mut self) -> ParseResult<String> {
        self.lexer.skip_ignorable();
        let pos = self.lexer.position();
        if self.lexer.peek() != Some('{') {
            return Err(ParseError::syntax(pos, "missing argument"));
        }
        self.lexer
            .read_balanced('{', '}')
            .ok_or_else(|| ParseError::syntax(pos, "missing '}'"))
    }

    /// A `[...]` argument as raw markup, if present
    pub fn read_optional(&mut self) -> Option<String> {
        self.lexer.read_optional()
    }

    /// A macro argument: a group, a command token or a single character
    pub fn read_macro_arg(&mut self) -> ParseResult<String> {
        self.lexer.skip_ignorable();
        let pos = self.lexer.position();
        if self.lexer.peek() == Some('}') {
            return Err(ParseError::syntax(pos, "missing argument"));
        }
        self.lexer
            .read_raw_arg()
            .ok_or_else(|| ParseError::syntax(pos, "missing argument"))
    }

    /// Delimiter token after `\left`, `\right`, `\middle` or `\big`
    pub fn read_delimiter(&mut self) -> ParseResult<Option<char>> {
        self.lexer.skip_ignorable();
        let pos = self.lexer.position();
        let token = match self.lexer.next_char() {
            Some('\\') => format!("\\{}", self.lexer.read_command_name().unwrap_or_default()),
            Some(c) => c.to_string(),
            None => return Err(ParseError::syntax(pos, "missing delimiter")),
        };
        delimiter(&token).ok_or_else(|| ParseError::syntax(pos, format!("invalid delimiter '{}'", token)))
    }

    /// A braced length such as `{2em}`
    pub fn read_length(&mut self) -> ParseResult<Length> {
        let pos = self.lexer.position();
        let raw = self.read_raw_group()?;
        Length::parse(raw.trim()).ok_or_else(|| ParseError::syntax(pos, format!("invalid length '{}'", raw)))
    }

    /// `[model]{spec}` color argument
    pub fn read_color(&mut self) -> ParseResult<Color> {
        let model = self.lexer.read_optional();
        let spec = self.read_raw_group()?;
        self.resolve_color(model.as_deref().map(str::trim), &spec)
    }

    /// Resolve a color specification, including colors defined earlier in
    /// this parse
    pub fn resolve_color(&self, model: Option<&str>, spec: &str) -> ParseResult<Color> {
        let lookup = |name: &str| self.colors.get(name).copied();
        parse_color_with(spec, model, &lookup).ok_or_else(|| {
            ParseError::syntax(self.lexer.position(), format!("unknown color '{}'", spec.trim()))
        })
    }

    pub fn define_color(&mut self, name: &str, color: Color) {
        debug!("define color {} = {}", name, color);
        self.colors.insert(name.to_string(), color);
    }

    pub fn define_macro(&mut self, m: Macro, mode: DefineMode) -> ParseResult<()> {
        let exists = self.macros.is_defined(&m.name) || self.registry.is_defined(&m.name, &self.packages);
        match mode {
            DefineMode::New if exists => Err(ParseError::syntax(
                self.position(),
                format!("command \\{} already defined", m.name),
            )),
            DefineMode::Renew if !exists => Err(ParseError::syntax(
                self.position(),
                format!("command \\{} is not defined", m.name),
            )),
            DefineMode::Provide if exists => Ok(()),
            _ => {
                debug!("define \\{} with {} arguments", m.name, m.num_args);
                self.macros.define(m);
                Ok(())
            }
        }
    }

    /// Make the commands of `package` visible for the rest of the parse
    pub fn activate_package(&mut self, package: &str) {
        if !self.registry.has_package(package) {
            debug!(
                "package {} provides no commands (known: {})",
                package,
                self.registry.packages().collect::<Vec<_>>().join(", ")
            );
            return;
        }
        if !self.packages.iter().any(|p| p == package) {
            debug!("activate package {}", package);
            self.packages.push(package.to_string());
        }
    }

    /// Remove and return the most recent atom of the current row
    pub fn take_last_atom(&mut self) -> Option<Atom> {
        match self.stack.last_mut()? {
            Consumer::Group { atoms, .. } => atoms.pop(),
            Consumer::Array(table) => table.current_cell().pop(),
            Consumer::Command { cmd, .. } => cmd.current_row()?.pop(),
            Consumer::Begin { .. } => None,
        }
    }

    fn take_row(&mut self) -> Option<Vec<Atom>> {
        match self.stack.last_mut()? {
            Consumer::Group { atoms, .. } => Some(std::mem::take(atoms)),
            Consumer::Array(table) => Some(std::mem::take(table.current_cell())),
            Consumer::Command { cmd, .. } => cmd.current_row().map(std::mem::take),
            Consumer::Begin { .. } => None,
        }
    }

    /// Parse a piece of markup produced during this parse (macro bodies,
    /// optional arguments) with the same definitions in scope
    pub fn parse_fragment(&mut self, src: &str) -> ParseResult<Atom> {
        if self.depth >= MAX_EXPANSION_DEPTH {
            return Err(ParseError::syntax(self.position(), "macro expansion is nested too deeply"));
        }
        let mut child = Parser {
            lexer: Lexer::new(src),
            registry: self.registry,
            stack: vec![Consumer::group(0, true)],
            packages: self.packages.clone(),
            colors: self.colors.clone(),
            macros: self.macros.clone(),
            depth: self.depth + 1,
            partial: false,
        };
        child.scan()?;
        Ok(match child.finish()? {
            Atom::Row(atoms) => Atom::row(atoms),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::array::TableKind;
    use crate::core::atom::Decoration;
    use crate::core::command::SwitchKind;
    use crate::core::environment::MathStyle;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> ParseResult<Atom> {
        Parser::new(src, Registry::global(), &ParserOptions::default()).parse()
    }

    fn row(src: &str) -> Vec<Atom> {
        match parse(src).unwrap() {
            Atom::Row(atoms) => atoms,
            other => panic!("expected a row, got {:?}", other),
        }
    }

    fn syntax_message(src: &str) -> String {
        match parse(src) {
            Err(ParseError::Syntax(err)) => err.message,
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    mod basics {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_characters() {
            assert_eq!(row("a + b"), vec![Atom::char('a'), Atom::char('+'), Atom::char('b')]);
            assert_eq!(row(""), Vec::<Atom>::new());
        }

        #[test]
        fn test_symbols_and_operators() {
            let atoms = row("\\alpha\\leq\\sin x");
            assert_eq!(atoms[0], Atom::symbol('\u{03B1}', MathClass::Ord));
            assert_eq!(atoms[1].class(), MathClass::Rel);
            assert_eq!(
                atoms[2],
                Atom::OpName {
                    name: "sin".to_string(),
                    limits: false
                }
            );
        }

        #[test]
        fn test_groups() {
            assert_eq!(
                row("{a}{}"),
                vec![Atom::Row(vec![Atom::char('a')]), Atom::Row(Vec::new())]
            );
        }

        #[test]
        fn test_comments() {
            assert_eq!(row("a % comment\n b"), vec![Atom::char('a'), Atom::char('b')]);
        }

        #[test]
        fn test_unknown_command() {
            assert_eq!(parse("a\\nosuch").unwrap_err(), ParseError::unknown("nosuch", 1));
        }
    }

    mod scripts {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_sup_and_sub() {
            let atoms = row("x^2_i");
            assert_eq!(
                atoms,
                vec![Atom::Scripts {
                    base: Box::new(Atom::char('x')),
                    sup: Some(Box::new(Atom::char('2'))),
                    sub: Some(Box::new(Atom::char('i'))),
                }]
            );
        }

        #[test]
        fn test_group_script() {
            let atoms = row("e^{i\\pi}");
            let Atom::Scripts { sup: Some(sup), .. } = &atoms[0] else {
                panic!("expected scripts");
            };
            assert_eq!(sup.children().len(), 2);
        }

        #[test]
        fn test_dangling_script() {
            assert!(syntax_message("^2").contains("dangling"));
            assert!(syntax_message("{_i}").contains("dangling"));
        }

        #[test]
        fn test_double_scripts() {
            assert_eq!(syntax_message("x^1^2"), "double superscript");
            assert_eq!(syntax_message("x_1_2"), "double subscript");
        }

        #[test]
        fn test_primes() {
            let prime = Atom::symbol(PRIME, MathClass::Ord);
            assert_eq!(
                row("f''"),
                vec![Atom::Scripts {
                    base: Box::new(Atom::char('f')),
                    sup: Some(Box::new(Atom::Row(vec![prime.clone(), prime.clone()]))),
                    sub: None,
                }]
            );
            let atoms = row("f'^2");
            let Atom::Scripts { sup: Some(sup), .. } = &atoms[0] else {
                panic!("expected scripts");
            };
            assert_eq!(**sup, Atom::Row(vec![prime, Atom::char('2')]));
        }

        #[test]
        fn test_limits_control() {
            let atoms = row("\\int\\limits_0^1");
            let Atom::Scripts { base, .. } = &atoms[0] else {
                panic!("expected scripts");
            };
            assert!(matches!(**base, Atom::Limits { limits: true, .. }));
            assert!(matches!(parse("\\limits"), Err(ParseError::Syntax(_))));
        }
    }

    mod commands {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_fraction() {
            assert_eq!(
                row("\\frac12"),
                vec![Atom::Fraction {
                    num: Box::new(Atom::char('1')),
                    den: Box::new(Atom::char('2')),
                    rule: true,
                }]
            );
        }

        #[test]
        fn test_missing_argument() {
            let Err(ParseError::Syntax(err)) = parse("\\frac{a}") else {
                panic!("expected a syntax error");
            };
            assert_eq!(err.message, "missing argument");
            assert_eq!(err.command.as_deref(), Some("\\frac"));
            assert_eq!(syntax_message("{\\sqrt}"), "missing argument");
        }

        #[test]
        fn test_infix_fraction() {
            let atoms = row("{a+b \\over c}");
            let Atom::Row(inner) = &atoms[0] else {
                panic!("expected a group");
            };
            let Atom::Fraction { num, den, rule } = &inner[0] else {
                panic!("expected a fraction");
            };
            assert!(rule);
            assert_eq!(num.children().len(), 3);
            assert_eq!(**den, Atom::Row(vec![Atom::char('c')]));
        }

        #[test]
        fn test_sqrt_with_degree() {
            let atoms = row("\\sqrt[3]{x}");
            assert_eq!(
                atoms,
                vec![Atom::Radical {
                    body: Box::new(Atom::Row(vec![Atom::char('x')])),
                    degree: Some(Box::new(Atom::char('3'))),
                }]
            );
        }

        #[test]
        fn test_style_switch_runs_to_group_end() {
            let atoms = row("{\\displaystyle a} b");
            assert_eq!(
                atoms[0],
                Atom::Row(vec![Atom::Switch {
                    kind: SwitchKind::Style(MathStyle::Display),
                    body: vec![Atom::char('a')],
                }])
            );
            assert_eq!(atoms[1], Atom::char('b'));
        }

        #[test]
        fn test_text() {
            let atoms = row("\\text{if } x");
            assert!(matches!(&atoms[0], Atom::Text { text, .. } if text == "if "));
        }

        #[test]
        fn test_decoration() {
            let atoms = row("\\overline{x}");
            assert!(matches!(
                atoms[0],
                Atom::Decorated {
                    decoration: Decoration::Overline,
                    ..
                }
            ));
        }

        #[test]
        fn test_colors() {
            let atoms = row("\\definecolor{mine}{RGB}{255,0,0}\\textcolor{mine}{x}");
            assert_eq!(
                atoms,
                vec![Atom::Color {
                    body: Box::new(Atom::Row(vec![Atom::char('x')])),
                    fg: Some(Color::rgb(255, 0, 0)),
                    bg: None,
                }]
            );
            assert!(syntax_message("\\color{nosuchcolor} x").contains("unknown color"));
        }

        #[test]
        fn test_hspace_and_spaces() {
            let atoms = row("a\\,b\\hspace{1em}c");
            assert_eq!(atoms[1], Atom::Space(Length::mu(3.0)));
            assert_eq!(atoms[3], Atom::Space(Length::em(1.0)));
        }
    }

    mod fences {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_left_middle_right() {
            let atoms = row("\\left( a \\middle| b \\right.");
            assert_eq!(
                atoms,
                vec![Atom::Fenced {
                    left: Some('('),
                    right: None,
                    segments: vec![Atom::Row(vec![Atom::char('a')]), Atom::Row(vec![Atom::char('b')])],
                    middles: vec![Some('|')],
                }]
            );
        }

        #[test]
        fn test_unbalanced_fences() {
            assert_eq!(syntax_message("a \\right)"), "missing \\left");
            assert_eq!(syntax_message("\\left( a"), "missing \\right");
            assert!(syntax_message("\\left x").contains("invalid delimiter"));
        }

        #[test]
        fn test_big_delimiter() {
            let atoms = row("\\bigl( x \\bigr)");
            assert_eq!(
                atoms[0],
                Atom::BigDelim {
                    ch: Some('('),
                    size: 1.2,
                    class: MathClass::Open
                }
            );
        }
    }

    mod groups {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_unbalanced_braces() {
            assert_eq!(syntax_message("a}"), "unmatched '}'");
            assert_eq!(syntax_message("{a"), "missing '}'");
        }

        #[test]
        fn test_top_level_lines() {
            let atom = parse("a \\\\ b").unwrap();
            let Atom::Multline { lines, align } = atom else {
                panic!("expected lines");
            };
            assert_eq!(lines.len(), 2);
            assert_eq!(align, Some(HAlign::Center));
        }

        #[test]
        fn test_misplaced_ampersand() {
            assert_eq!(syntax_message("a & b"), "misplaced '&'");
        }
    }

    mod environments {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_matrix() {
            let atoms = row("\\begin{pmatrix} a & b \\\\ c & d \\end{pmatrix}");
            let Atom::Array(array) = &atoms[0] else {
                panic!("expected an array");
            };
            assert_eq!(array.table().rows().len(), 2);
            assert_eq!(array.table().column_count(), 2);
        }

        #[test]
        fn test_mismatched_end() {
            let Err(ParseError::Syntax(err)) = parse("\\begin{matrix} a \\end{array}") else {
                panic!("expected a syntax error");
            };
            assert_eq!(err.command.as_deref(), Some("\\end{array}"));

            let Err(ParseError::Syntax(err)) = parse("a \\end{array}") else {
                panic!("expected a syntax error");
            };
            assert_eq!(err.command.as_deref(), Some("\\end{array}"));
            assert_eq!(err.message, "no matching \\begin");
        }

        #[test]
        fn test_unclosed_environment() {
            let Err(ParseError::Syntax(err)) = parse("\\begin{cases} a") else {
                panic!("expected a syntax error");
            };
            assert_eq!(err.command.as_deref(), Some("\\begin{cases}"));
        }

        #[test]
        fn test_dimension_error() {
            let err = parse("\\begin{array}{cc} a & b \\\\ c & d & e \\end{array}").unwrap_err();
            assert!(err.is_dimension());
        }

        #[test]
        fn test_hline_and_colors() {
            let atoms = row("\\begin{array}{c} \\hline \\rowcolor{red} a \\\\ \\cline{1-1} b \\end{array}");
            let Atom::Array(array) = &atoms[0] else {
                panic!("expected an array");
            };
            let rows = array.table().rows();
            assert_eq!(rows[0].hlines_before.len(), 1);
            assert!(rows[0].color.is_some());
            assert_eq!(rows[1].hlines_before.len(), 1);
        }

        #[test]
        fn test_multline_environment() {
            let atoms = row("\\begin{multline} a \\\\ b \\\\ c \\end{multline}");
            assert!(matches!(&atoms[0], Atom::Multline { lines, align: None } if lines.len() == 3));
        }

        #[test]
        fn test_unknown_environment() {
            assert_eq!(syntax_message("\\begin{tabular}{c} a \\end{tabular}"), "unknown environment");
        }

        #[test]
        fn test_registered_environment() {
            let mut registry = Registry::builtin();
            registry.register_environment("dcases", TableKind::Cases);
            let atom = Parser::new(
                "\\begin{dcases} a \\end{dcases}",
                &registry,
                &ParserOptions::default(),
            )
            .parse()
            .unwrap();
            assert!(matches!(&atom, Atom::Row(atoms) if matches!(atoms[0], Atom::Array(_))));
        }
    }

    mod macros {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_newcommand() {
            let atoms = row("\\newcommand{\\sq}[1]{#1^2} \\sq{y}");
            assert_eq!(
                atoms,
                vec![Atom::Scripts {
                    base: Box::new(Atom::char('y')),
                    sup: Some(Box::new(Atom::char('2'))),
                    sub: None,
                }]
            );
        }

        #[test]
        fn test_optional_argument_default() {
            let atoms = row("\\newcommand{\\r}[2][2]{\\sqrt[#1]{#2}} \\r{x} \\r[3]{y}");
            assert_eq!(atoms.len(), 2);
            let Atom::Radical { degree: Some(degree), .. } = &atoms[0] else {
                panic!("expected a radical");
            };
            assert_eq!(**degree, Atom::char('2'));
        }

        #[test]
        fn test_def() {
            let atoms = row("\\def\\pair#1#2{(#1,#2)} \\pair ab");
            assert_eq!(atoms.len(), 1);
            assert_eq!(atoms[0].children().len(), 5);
        }

        #[test]
        fn test_redefinition_rules() {
            assert!(syntax_message("\\newcommand{\\frac}{x}").contains("already defined"));
            assert!(syntax_message("\\renewcommand{\\nosuch}{x}").contains("not defined"));
            assert_eq!(row("\\providecommand{\\alpha}{x}\\alpha").len(), 1);
        }

        #[test]
        fn test_recursion_limit() {
            assert!(syntax_message("\\def\\loop{\\loop}\\loop").contains("nested too deeply"));
        }

        #[test]
        fn test_operator_declaration() {
            let atoms = row("\\DeclareMathOperator*{\\argmax}{arg\\,max} \\argmax");
            assert!(matches!(&atoms[0], Atom::OpName { limits: true, .. }));
        }

        #[test]
        fn test_package_activation() {
            assert!(matches!(parse("\\ket{0}"), Err(ParseError::UnknownCommand { .. })));
            let atoms = row("\\usepackage{braket} \\ket{0}");
            assert!(matches!(&atoms[0], Atom::Fenced { .. }));
        }
    }

    mod partial {
        use super::*;
        use pretty_assertions::assert_eq;

        fn parse_partial(src: &str) -> Atom {
            Parser::new(src, Registry::global(), &ParserOptions::partial())
                .parse()
                .unwrap()
        }

        #[test]
        fn test_keeps_valid_prefix() {
            assert_eq!(
                parse_partial("a+\\frac{1"),
                Atom::Row(vec![Atom::char('a'), Atom::char('+')])
            );
        }

        #[test]
        fn test_keeps_open_groups() {
            let atom = parse_partial("x^{2");
            assert_eq!(
                atom,
                Atom::Row(vec![Atom::Scripts {
                    base: Box::new(Atom::char('x')),
                    sup: Some(Box::new(Atom::Row(vec![Atom::char('2')]))),
                    sub: None,
                }])
            );
        }

        #[test]
        fn test_unknown_command_stops_parse() {
            assert_eq!(parse_partial("a\\nosuch b"), Atom::Row(vec![Atom::char('a')]));
        }
    }
}
