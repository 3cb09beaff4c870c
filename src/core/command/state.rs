//! Per-invocation command state
//!
//! Every invocation starts from a fresh value produced by
//! [`Prototype::instantiate`](super::Prototype::instantiate), so no parse
//! state is ever shared between two uses of a command.

use log::trace;

use super::builtins::Builtin;
use super::{Command, Init, Progress};
pub use crate::core::atom::SwitchKind;

use crate::core::atom::{Atom, Decoration, MathClass};
use crate::core::environment::{FontChange, MathStyle};
use crate::core::parser::Parser;
use crate::data::colors::Color;
use crate::features::macros::{ArgSpec, Macro};
use crate::utils::error::{ParseError, ParseResult};

/// Which script slot a `^` or `_` fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSlot {
    Sup,
    Sub,
}

/// Atom built once a fixed number of arguments has arrived
#[derive(Debug, Clone, PartialEq)]
pub enum ArgKind {
    /// `\frac`, `\binom` and their style variants
    Frac {
        rule: bool,
        style: Option<MathStyle>,
        fenced: bool,
    },
    Sqrt { degree: Option<Atom> },
    Decorate(Decoration),
    Font(FontChange),
    Class(MathClass),
    TextColor(Color),
    ColorBox(Color),
    FColorBox { frame: Color, bg: Color },
    FBox,
    VCenter,
}

impl ArgKind {
    /// Number of atom arguments
    pub fn arity(&self) -> usize {
        match self {
            ArgKind::Frac { .. } => 2,
            _ => 1,
        }
    }

    pub fn build(self, args: Vec<Atom>) -> Atom {
        let mut args = args.into_iter();
        let first = Box::new(args.next().unwrap_or_default());

        match self {
            ArgKind::Frac {
                rule,
                style,
                fenced,
            } => {
                let mut atom = Atom::Fraction {
                    num: first,
                    den: Box::new(args.next().unwrap_or_default()),
                    rule,
                };
                if fenced {
                    atom = fence(atom, '(', ')');
                }
                match style {
                    Some(style) => Atom::Styled {
                        style,
                        body: Box::new(atom),
                    },
                    None => atom,
                }
            }
            ArgKind::Sqrt { degree } => Atom::Radical {
                body: first,
                degree: degree.map(Box::new),
            },
            ArgKind::Decorate(decoration) => Atom::Decorated {
                body: first,
                decoration,
            },
            ArgKind::Font(change) => Atom::Font {
                change,
                body: first,
            },
            ArgKind::Class(class) => Atom::Class { class, body: first },
            ArgKind::TextColor(color) => Atom::Color {
                body: first,
                fg: Some(color),
                bg: None,
            },
            ArgKind::ColorBox(color) => Atom::FBox {
                body: first,
                ruled: false,
                frame: None,
                bg: Some(color),
            },
            ArgKind::FColorBox { frame, bg } => Atom::FBox {
                body: first,
                ruled: true,
                frame: Some(frame),
                bg: Some(bg),
            },
            ArgKind::FBox => Atom::FBox {
                body: first,
                ruled: true,
                frame: None,
                bg: None,
            },
            ArgKind::VCenter => Atom::VCentered(first),
        }
    }
}

fn fence(atom: Atom, left: char, right: char) -> Atom {
    Atom::Fenced {
        left: Some(left),
        right: Some(right),
        segments: vec![atom],
        middles: Vec::new(),
    }
}

/// A command between its name and its last argument
#[derive(Debug, Clone, PartialEq)]
pub enum CommandState {
    /// Not initialised yet
    Fresh(Builtin),
    /// Waiting for `kind.arity()` atoms
    Args { kind: ArgKind, args: Vec<Atom> },
    /// `\bf`, `\displaystyle`, `\color`: collects the rest of the group
    Switch { kind: SwitchKind, atoms: Vec<Atom> },
    /// `\over` and friends: numerator stolen, denominator collected
    Infix {
        rule: bool,
        fence: Option<(char, char)>,
        num: Vec<Atom>,
        den: Vec<Atom>,
    },
    /// `\left`: segments between `\middle` delimiters up to `\right`
    Fence {
        left: Option<char>,
        segments: Vec<Atom>,
        middles: Vec<Option<char>>,
        current: Vec<Atom>,
    },
    /// `^` or `_` waiting for its script
    Script {
        base: Atom,
        sup: Option<Box<Atom>>,
        sub: Option<Box<Atom>>,
        slot: ScriptSlot,
    },
    /// User macro, expanded at `init`
    Macro(Macro),
}

impl CommandState {
    fn expand_macro(m: &Macro, parser: &mut Parser) -> ParseResult<Init> {
        let mut args = Vec::with_capacity(m.num_args);
        for spec in &m.arg_specs {
            let arg = match spec {
                ArgSpec::Optional(default) => parser.read_optional().unwrap_or_else(|| default.clone()),
                ArgSpec::Required => parser.read_macro_arg()?,
            };
            args.push(arg);
        }
        let text = m.expand(&args);
        trace!("expand \\{} to {:?}", m.name, text);

        let atom = parser.parse_fragment(&text)?;
        if atom == Atom::Row(Vec::new()) {
            return Ok(Init::Done(None));
        }
        Ok(Init::Done(Some(atom)))
    }

    fn scripts(base: Atom, sup: Option<Box<Atom>>, sub: Option<Box<Atom>>) -> Atom {
        Atom::Scripts {
            base: Box::new(base),
            sup,
            sub,
        }
    }
}

/// Append `atom` to a row of primes, as in `f'^2`
pub fn after_primes(primes: Atom, atom: Atom) -> Atom {
    let mut row = match primes {
        Atom::Row(atoms) => atoms,
        prime => vec![prime],
    };
    row.push(atom);
    Atom::Row(row)
}

impl Command for CommandState {
    fn init(&mut self, parser: &mut Parser) -> ParseResult<Init> {
        match self {
            CommandState::Fresh(builtin) => {
                let builtin = *builtin;
                let (init, next) = builtin.start(parser)?;
                if let Some(next) = next {
                    *self = next;
                }
                Ok(init)
            }
            CommandState::Macro(m) => {
                let m = m.clone();
                CommandState::expand_macro(&m, parser)
            }
            _ => Ok(Init::Consume),
        }
    }

    fn add(&mut self, atom: Atom) -> ParseResult<Progress> {
        match self {
            CommandState::Args { kind, args } => {
                args.push(atom);
                if args.len() < kind.arity() {
                    return Ok(Progress::Pending);
                }
                let kind = kind.clone();
                Ok(Progress::Complete(kind.build(std::mem::take(args))))
            }
            CommandState::Switch { atoms, .. } => {
                atoms.push(atom);
                Ok(Progress::Pending)
            }
            CommandState::Infix { den, .. } => {
                den.push(atom);
                Ok(Progress::Pending)
            }
            CommandState::Fence { current, .. } => {
                current.push(atom);
                Ok(Progress::Pending)
            }
            CommandState::Script {
                base,
                sup,
                sub,
                slot,
            } => {
                match slot {
                    ScriptSlot::Sup => {
                        let script = match sup.take() {
                            Some(primes) if primes.is_prime_row() => after_primes(*primes, atom),
                            _ => atom,
                        };
                        *sup = Some(Box::new(script));
                    }
                    ScriptSlot::Sub => *sub = Some(Box::new(atom)),
                }
                Ok(Progress::Complete(CommandState::scripts(
                    std::mem::take(base),
                    sup.take(),
                    sub.take(),
                )))
            }
            CommandState::Fresh(_) | CommandState::Macro(_) => {
                Err(ParseError::syntax(0, "command takes no arguments"))
            }
        }
    }

    fn close(&mut self) -> Option<Atom> {
        match self {
            CommandState::Switch { kind, atoms } => Some(Atom::Switch {
                kind: *kind,
                body: std::mem::take(atoms),
            }),
            CommandState::Infix {
                rule,
                fence: delims,
                num,
                den,
            } => {
                let frac = Atom::Fraction {
                    num: Box::new(Atom::Row(std::mem::take(num))),
                    den: Box::new(Atom::Row(std::mem::take(den))),
                    rule: *rule,
                };
                Some(match delims {
                    Some((l, r)) => fence(frac, *l, *r),
                    None => frac,
                })
            }
            CommandState::Fence {
                left,
                segments,
                middles,
                current,
            } => {
                let mut segments = std::mem::take(segments);
                segments.push(Atom::Row(std::mem::take(current)));
                Some(Atom::Fenced {
                    left: *left,
                    right: None,
                    segments,
                    middles: std::mem::take(middles),
                })
            }
            CommandState::Script { base, sup, sub, .. } => Some(CommandState::scripts(
                std::mem::take(base),
                sup.take(),
                sub.take(),
            )),
            CommandState::Args { .. } | CommandState::Fresh(_) | CommandState::Macro(_) => None,
        }
    }

    fn is_closable(&self) -> bool {
        matches!(self, CommandState::Switch { .. } | CommandState::Infix { .. })
    }

    fn steal_trailing_row(&mut self, row: Vec<Atom>) {
        if let CommandState::Infix { num, .. } = self {
            *num = row;
        }
    }

    fn delimiter(&mut self, ch: Option<char>, closing: bool) -> Option<Progress> {
        let CommandState::Fence {
            left,
            segments,
            middles,
            current,
        } = self
        else {
            return None;
        };
        segments.push(Atom::Row(std::mem::take(current)));
        if !closing {
            middles.push(ch);
            return Some(Progress::Pending);
        }
        Some(Progress::Complete(Atom::Fenced {
            left: *left,
            right: ch,
            segments: std::mem::take(segments),
            middles: std::mem::take(middles),
        }))
    }

    fn current_row(&mut self) -> Option<&mut Vec<Atom>> {
        match self {
            CommandState::Switch { atoms, .. } => Some(atoms),
            CommandState::Infix { den, .. } => Some(den),
            CommandState::Fence { current, .. } => Some(current),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed(state: &mut CommandState, atoms: Vec<Atom>) -> Vec<Progress> {
        atoms
            .into_iter()
            .map(|a| state.add(a).unwrap())
            .collect()
    }

    #[test]
    fn test_fraction_takes_two_arguments() {
        let mut state = CommandState::Args {
            kind: ArgKind::Frac {
                rule: true,
                style: None,
                fenced: false,
            },
            args: Vec::new(),
        };
        let progress = feed(&mut state, vec![Atom::char('1'), Atom::char('2')]);
        assert_eq!(progress[0], Progress::Pending);
        assert_eq!(
            progress[1],
            Progress::Complete(Atom::Fraction {
                num: Box::new(Atom::char('1')),
                den: Box::new(Atom::char('2')),
                rule: true,
            })
        );
    }

    #[test]
    fn test_switch_closes_with_group() {
        let mut state = CommandState::Switch {
            kind: SwitchKind::Style(MathStyle::Display),
            atoms: Vec::new(),
        };
        assert!(state.is_closable());
        feed(&mut state, vec![Atom::char('a')]);
        assert_eq!(
            state.close(),
            Some(Atom::Switch {
                kind: SwitchKind::Style(MathStyle::Display),
                body: vec![Atom::char('a')],
            })
        );
    }

    #[test]
    fn test_infix_uses_stolen_row() {
        let mut state = CommandState::Infix {
            rule: false,
            fence: Some(('(', ')')),
            num: Vec::new(),
            den: Vec::new(),
        };
        state.steal_trailing_row(vec![Atom::char('n')]);
        feed(&mut state, vec![Atom::char('k')]);
        let Some(Atom::Fenced { segments, .. }) = state.close() else {
            panic!("expected a fenced fraction");
        };
        assert_eq!(
            segments[0],
            Atom::Fraction {
                num: Box::new(Atom::Row(vec![Atom::char('n')])),
                den: Box::new(Atom::Row(vec![Atom::char('k')])),
                rule: false,
            }
        );
    }

    #[test]
    fn test_fence_segments() {
        let mut state = CommandState::Fence {
            left: Some('('),
            segments: Vec::new(),
            middles: Vec::new(),
            current: Vec::new(),
        };
        assert!(!state.is_closable());
        feed(&mut state, vec![Atom::char('a')]);
        assert_eq!(state.delimiter(Some('|'), false), Some(Progress::Pending));
        feed(&mut state, vec![Atom::char('b')]);
        let Some(Progress::Complete(Atom::Fenced {
            right,
            segments,
            middles,
            ..
        })) = state.delimiter(Some(')'), true)
        else {
            panic!("expected a fence");
        };
        assert_eq!(right, Some(')'));
        assert_eq!(segments.len(), 2);
        assert_eq!(middles, vec![Some('|')]);
    }

    #[test]
    fn test_superscript_after_primes() {
        let prime = Atom::symbol('\u{2032}', MathClass::Ord);
        let mut state = CommandState::Script {
            base: Atom::char('f'),
            sup: Some(Box::new(prime.clone())),
            sub: None,
            slot: ScriptSlot::Sup,
        };
        let progress = feed(&mut state, vec![Atom::char('2')]);
        assert_eq!(
            progress[0],
            Progress::Complete(Atom::Scripts {
                base: Box::new(Atom::char('f')),
                sup: Some(Box::new(Atom::Row(vec![prime, Atom::char('2')]))),
                sub: None,
            })
        );
    }

    #[test]
    fn test_non_fence_ignores_delimiters() {
        let mut state = CommandState::Args {
            kind: ArgKind::FBox,
            args: Vec::new(),
        };
        assert_eq!(state.delimiter(Some(')'), true), None);
        assert_eq!(state.close(), None);
    }
}
