//! Command registry with package scoping
//!
//! The registry maps command names to prototypes. Lookup is layered: the
//! packages activated for a parse are searched first (most recently
//! activated first), then the global table, then the symbol table. The
//! global registry is built once and only read afterwards; callers who want
//! extra commands build their own registry from [`Registry::builtin`].

use fxhash::FxHashMap;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::{debug, trace};

use super::builtins::{builtin_commands, Builtin};
use super::packaged::PackagedCommand;
use super::state::CommandState;
use crate::core::array::TableKind;
use crate::data::symbols::{SymbolDef, OPERATOR_NAMES, SYMBOLS};
use crate::features::macros::Macro;
use crate::utils::error::{ParseError, ParseResult};

/// What a command name resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Prototype {
    Symbol(SymbolDef),
    Builtin(Builtin),
    Macro(Macro),
}

impl Prototype {
    /// Fresh per-invocation state
    pub fn instantiate(&self) -> CommandState {
        match self {
            Prototype::Symbol(def) => CommandState::Fresh(Builtin::Symbol(*def)),
            Prototype::Builtin(builtin) => CommandState::Fresh(*builtin),
            Prototype::Macro(m) => CommandState::Macro(m.clone()),
        }
    }
}

type CommandTable = FxHashMap<String, Prototype>;

/// Name to prototype mapping, with named packages
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: CommandTable,
    packages: IndexMap<String, CommandTable>,
    environments: FxHashMap<String, TableKind>,
}

lazy_static! {
    static ref GLOBAL: Registry = Registry::builtin();
}

impl Registry {
    /// Empty registry; names still fall back to the symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command and the bundled packages
    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        for (name, builtin) in builtin_commands() {
            registry.register(name, Prototype::Builtin(builtin));
        }
        for (name, (text, limits)) in OPERATOR_NAMES.iter() {
            registry.register(name, Prototype::Builtin(Builtin::OpName(*text, *limits)));
        }

        for (name, args, body) in [
            ("bra", 1, "\\left\\langle #1\\right|"),
            ("ket", 1, "\\left|#1\\right\\rangle"),
            ("braket", 1, "\\left\\langle #1\\right\\rangle"),
            ("set", 1, "\\left\\{#1\\right\\}"),
        ] {
            registry.define_macro(Some("braket"), Macro::with_args(name, args, body));
        }

        debug!(
            "built-in registry: {} commands, {} packages",
            registry.commands.len(),
            registry.packages.len()
        );
        registry
    }

    /// The process-wide registry, built on first use
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Register a global command
    pub fn register(&mut self, name: &str, prototype: Prototype) {
        self.commands.insert(name.to_string(), prototype);
    }

    /// Register a command that is only visible while `package` is active
    pub fn register_package(&mut self, package: &str, name: &str, prototype: Prototype) {
        trace!("register \\{} in package {}", name, package);
        self.packages
            .entry(package.to_string())
            .or_default()
            .insert(name.to_string(), prototype);
    }

    /// Register a macro, globally or in a package
    pub fn define_macro(&mut self, package: Option<&str>, m: Macro) {
        let name = m.name.clone();
        match package {
            Some(package) => self.register_package(package, &name, Prototype::Macro(m)),
            None => self.register(&name, Prototype::Macro(m)),
        }
    }

    /// Make `\begin{name}` open an environment of `kind`
    pub fn register_environment(&mut self, name: &str, kind: TableKind) {
        self.environments.insert(name.to_string(), kind);
    }

    pub fn has_package(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    /// Registered package names, in registration order
    pub fn packages(&self) -> impl Iterator<Item = &str> + '_ {
        self.packages.keys().map(String::as_str)
    }

    pub fn environment(&self, name: &str) -> Option<TableKind> {
        self.environments
            .get(name)
            .copied()
            .or_else(|| TableKind::from_name(name))
    }

    /// Whether `name` resolves with the given packages active
    pub fn is_defined(&self, name: &str, active: &[String]) -> bool {
        self.lookup(name, active).is_some()
    }

    /// Prototype for `name` and the package that provides it
    pub fn lookup<'r>(&'r self, name: &str, active: &'r [String]) -> Option<(Option<&'r str>, Prototype)> {
        for package in active.iter().rev() {
            if let Some(prototype) = self.packages.get(package).and_then(|table| table.get(name)) {
                return Some((Some(package.as_str()), prototype.clone()));
            }
        }
        if let Some(prototype) = self.commands.get(name) {
            return Some((None, prototype.clone()));
        }
        SYMBOLS.get(name).map(|def| (None, Prototype::Symbol(*def)))
    }

    /// Fresh command for `name`, or an unknown-command error at `position`
    pub fn resolve(&self, name: &str, active: &[String], position: usize) -> ParseResult<PackagedCommand> {
        let (package, prototype) = self
            .lookup(name, active)
            .ok_or_else(|| ParseError::unknown(name, position))?;
        trace!("resolved \\{} from {:?}", name, package.unwrap_or("global"));
        Ok(PackagedCommand::new(
            package,
            format!("\\{}", name),
            prototype.instantiate(),
        ))
    }
}
