//! Built-in commands
//!
//! [`Builtin`] is the prototype of every command the global registry knows
//! besides plain symbols and operator names. It is `Copy`: each invocation
//! starts from the prototype value and builds its own [`CommandState`].

use super::state::{ArgKind, CommandState, SwitchKind};
use super::Init;
use crate::core::array::{extract_hline_range, HLine};
use crate::core::atom::{Atom, Decoration, MathClass};
use crate::core::environment::{FontChange, FontFamily, MathStyle};
use crate::core::parser::{DefineMode, Parser};
use crate::data::spacing::SPACE_COMMANDS;
use crate::data::symbols::SymbolDef;
use crate::data::units::Length;
use crate::features::macros::{def_param_count, extract_macro_name, parse_arg_count, Macro};
use crate::utils::error::{ParseError, ParseResult};

/// Command prototypes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Builtin {
    Symbol(SymbolDef),
    /// Operator name with its limits behaviour
    OpName(&'static str, bool),
    Frac {
        rule: bool,
        style: Option<MathStyle>,
        fenced: bool,
    },
    /// `\over`, `\atop`, `\choose`
    Infix {
        rule: bool,
        fence: Option<(char, char)>,
    },
    Sqrt,
    Decorate(Decoration),
    Font(FontChange),
    FontSwitch(FontChange),
    Text(FontChange),
    Class(MathClass),
    Style(MathStyle),
    Color,
    TextColor,
    ColorBox,
    FColorBox,
    FBox,
    DefineColor,
    Space(Length),
    HSpace,
    Left,
    Middle,
    Right,
    /// `\big` family; size is the delimiter height in em
    BigDelim(f64, MathClass),
    Limits(bool),
    OperatorName,
    DeclareOperator,
    NewCommand(DefineMode),
    Def,
    Begin,
    End,
    RowSep,
    HLine,
    CLine,
    CellColor,
    RowColor,
    Rule,
    UsePackage,
    VCenter,
}

type Started = (Init, Option<CommandState>);

fn done(atom: Atom) -> ParseResult<Started> {
    Ok((Init::Done(Some(atom)), None))
}

fn nothing() -> ParseResult<Started> {
    Ok((Init::Done(None), None))
}

fn consume(kind: ArgKind) -> ParseResult<Started> {
    Ok((
        Init::Consume,
        Some(CommandState::Args {
            kind,
            args: Vec::new(),
        }),
    ))
}

fn switch(kind: SwitchKind) -> ParseResult<Started> {
    Ok((
        Init::Consume,
        Some(CommandState::Switch {
            kind,
            atoms: Vec::new(),
        }),
    ))
}

/// Text argument without its inner grouping braces
fn text_content(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '{' | '}' => {}
            '\\' => match chars.next() {
                Some(e @ ('{' | '}' | '%' | '&' | '#' | '$' | '_')) => out.push(e),
                Some(' ') | Some(',') => out.push(' '),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '~' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

impl Builtin {
    /// Read the raw arguments of the command and decide how the parser
    /// continues. A returned state replaces the prototype.
    pub fn start(self, parser: &mut Parser) -> ParseResult<Started> {
        match self {
            Builtin::Symbol(def) => done(Atom::symbol(def.ch, def.class)),
            Builtin::OpName(name, limits) => done(Atom::OpName {
                name: name.to_string(),
                limits,
            }),
            Builtin::Frac {
                rule,
                style,
                fenced,
            } => consume(ArgKind::Frac {
                rule,
                style,
                fenced,
            }),
            Builtin::Infix { rule, fence } => Ok((
                Init::StealRow,
                Some(CommandState::Infix {
                    rule,
                    fence,
                    num: Vec::new(),
                    den: Vec::new(),
                }),
            )),
            Builtin::Sqrt => {
                let degree = match parser.read_optional() {
                    Some(src) => Some(parser.parse_fragment(&src)?),
                    None => None,
                };
                consume(ArgKind::Sqrt { degree })
            }
            Builtin::Decorate(decoration) => consume(ArgKind::Decorate(decoration)),
            Builtin::Font(change) => consume(ArgKind::Font(change)),
            Builtin::FontSwitch(change) => switch(SwitchKind::Font(change)),
            Builtin::Text(font) => {
                let raw = parser.read_raw_group()?;
                done(Atom::Text {
                    text: text_content(&raw),
                    font,
                })
            }
            Builtin::Class(class) => consume(ArgKind::Class(class)),
            Builtin::Style(style) => switch(SwitchKind::Style(style)),
            Builtin::Color => {
                let color = parser.read_color()?;
                switch(SwitchKind::Color(color))
            }
            Builtin::TextColor => consume(ArgKind::TextColor(parser.read_color()?)),
            Builtin::ColorBox => consume(ArgKind::ColorBox(parser.read_color()?)),
            Builtin::FColorBox => {
                let frame = parser.read_color()?;
                let bg = parser.read_color()?;
                consume(ArgKind::FColorBox { frame, bg })
            }
            Builtin::FBox => consume(ArgKind::FBox),
            Builtin::DefineColor => {
                let name = parser.read_raw_group()?;
                let model = parser.read_raw_group()?;
                let spec = parser.read_raw_group()?;
                let color = parser.resolve_color(Some(model.trim()), &spec)?;
                parser.define_color(name.trim(), color);
                nothing()
            }
            Builtin::Space(length) => done(Atom::Space(length)),
            Builtin::HSpace => {
                parser.eat('*');
                done(Atom::Space(parser.read_length()?))
            }
            Builtin::Left => {
                let left = parser.read_delimiter()?;
                Ok((
                    Init::Consume,
                    Some(CommandState::Fence {
                        left,
                        segments: Vec::new(),
                        middles: Vec::new(),
                        current: Vec::new(),
                    }),
                ))
            }
            Builtin::Middle => Ok((Init::Middle(parser.read_delimiter()?), None)),
            Builtin::Right => Ok((Init::Right(parser.read_delimiter()?), None)),
            Builtin::BigDelim(size, class) => {
                let ch = parser.read_delimiter()?;
                done(Atom::BigDelim { ch, size, class })
            }
            Builtin::Limits(limits) => {
                let base = parser
                    .take_last_atom()
                    .ok_or_else(|| ParseError::syntax(parser.position(), "limit controls must follow a math operator"))?;
                done(Atom::Limits {
                    base: Box::new(base),
                    limits,
                })
            }
            Builtin::OperatorName => {
                let limits = parser.eat('*');
                let name = parser.read_raw_group()?;
                done(Atom::OpName {
                    name: text_content(&name),
                    limits,
                })
            }
            Builtin::DeclareOperator => {
                let limits = parser.eat('*');
                let name = read_macro_name(parser)?;
                let text = parser.read_raw_group()?;
                parser.define_macro(Macro::operator(&name, &text, limits), DefineMode::New)?;
                nothing()
            }
            Builtin::NewCommand(mode) => {
                parser.eat('*');
                let name = read_macro_name(parser)?;
                let num_args = match parser.read_optional() {
                    Some(n) => parse_arg_count(&n).ok_or_else(|| {
                        ParseError::syntax(parser.position(), format!("invalid argument count '{}'", n))
                    })?,
                    None => 0,
                };
                let default = parser.read_optional();
                let body = parser.read_raw_group()?;
                let m = match default {
                    Some(default) => Macro::with_optional(&name, num_args, &default, &body),
                    None => Macro::with_args(&name, num_args, &body),
                };
                parser.define_macro(m, mode)?;
                nothing()
            }
            Builtin::Def => {
                let name = read_macro_name(parser)?;
                let params = parser.read_until('{');
                let num_args = def_param_count(&params).ok_or_else(|| {
                    ParseError::syntax(parser.position(), format!("invalid parameter text '{}'", params))
                })?;
                let body = parser.read_raw_group()?;
                parser.define_macro(Macro::with_args(&name, num_args, &body), DefineMode::Def)?;
                nothing()
            }
            Builtin::Begin => {
                let name = parser.read_raw_group()?.trim().to_string();
                let kind = parser
                    .registry()
                    .environment(&name)
                    .ok_or_else(|| ParseError::syntax_in(parser.position(), format!("\\begin{{{}}}", name), "unknown environment"))?;
                let spec = if kind.takes_spec() {
                    Some(parser.read_raw_group()?)
                } else {
                    None
                };
                let format = kind.format(spec.as_deref());
                Ok((Init::Begin { name, kind, format }, None))
            }
            Builtin::End => {
                let name = parser.read_raw_group()?.trim().to_string();
                Ok((Init::End(name), None))
            }
            Builtin::RowSep => {
                let gap = match parser.read_optional() {
                    Some(spec) => Some(Length::parse(&spec).ok_or_else(|| {
                        ParseError::syntax(parser.position(), format!("invalid length '{}'", spec))
                    })?),
                    None => None,
                };
                Ok((Init::RowSep(gap), None))
            }
            Builtin::HLine => done(Atom::HLine(HLine::full())),
            Builtin::CLine => {
                let range = parser.read_raw_group()?;
                let (start, end) = extract_hline_range(&range).ok_or_else(|| {
                    ParseError::syntax(parser.position(), format!("invalid column range '{}'", range))
                })?;
                done(Atom::HLine(HLine::partial(start, end)))
            }
            Builtin::CellColor => done(Atom::CellColor(parser.read_color()?)),
            Builtin::RowColor => done(Atom::RowColor(parser.read_color()?)),
            Builtin::Rule => {
                let raise = match parser.read_optional() {
                    Some(spec) => Length::parse(&spec).ok_or_else(|| {
                        ParseError::syntax(parser.position(), format!("invalid length '{}'", spec))
                    })?,
                    None => Length::ZERO,
                };
                let width = parser.read_length()?;
                let height = parser.read_length()?;
                done(Atom::Rule {
                    width,
                    height,
                    raise,
                })
            }
            Builtin::UsePackage => {
                parser.read_optional();
                let names = parser.read_raw_group()?;
                for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                    parser.activate_package(name);
                }
                nothing()
            }
            Builtin::VCenter => consume(ArgKind::VCenter),
        }
    }
}

fn read_macro_name(parser: &mut Parser) -> ParseResult<String> {
    let raw = parser.read_macro_arg()?;
    extract_macro_name(&raw)
        .ok_or_else(|| ParseError::syntax(parser.position(), format!("invalid macro name '{}'", raw)))
}

/// Every built-in command with its name (without the backslash)
pub fn builtin_commands() -> Vec<(&'static str, Builtin)> {
    let roman = FontChange::family(FontFamily::Roman);
    let sans = FontChange::family(FontFamily::SansSerif);
    let mono = FontChange::family(FontFamily::Typewriter);
    let bold = roman.with_bold(true);
    let italic = roman.with_italic(true);

    let frac = |rule, style, fenced| Builtin::Frac {
        rule,
        style,
        fenced,
    };

    let mut commands = vec![
        ("frac", frac(true, None, false)),
        ("cfrac", frac(true, Some(MathStyle::Display), false)),
        ("dfrac", frac(true, Some(MathStyle::Display), false)),
        ("tfrac", frac(true, Some(MathStyle::Text), false)),
        ("binom", frac(false, None, true)),
        ("dbinom", frac(false, Some(MathStyle::Display), true)),
        ("tbinom", frac(false, Some(MathStyle::Text), true)),
        ("over", Builtin::Infix { rule: true, fence: None }),
        ("atop", Builtin::Infix { rule: false, fence: None }),
        ("choose", Builtin::Infix { rule: false, fence: Some(('(', ')')) }),
        ("brace", Builtin::Infix { rule: false, fence: Some(('{', '}')) }),
        ("brack", Builtin::Infix { rule: false, fence: Some(('[', ']')) }),
        ("sqrt", Builtin::Sqrt),
        ("overline", Builtin::Decorate(Decoration::Overline)),
        ("underline", Builtin::Decorate(Decoration::Underline)),
        // fonts
        ("mathrm", Builtin::Font(roman)),
        ("mathbf", Builtin::Font(bold)),
        ("mathit", Builtin::Font(italic)),
        ("mathsf", Builtin::Font(sans)),
        ("mathtt", Builtin::Font(mono)),
        ("mathnormal", Builtin::Font(FontChange::family(FontFamily::Math))),
        ("boldsymbol", Builtin::Font(FontChange::default().with_bold(true))),
        ("bm", Builtin::Font(FontChange::default().with_bold(true))),
        ("rm", Builtin::FontSwitch(roman)),
        ("bf", Builtin::FontSwitch(bold)),
        ("it", Builtin::FontSwitch(italic)),
        ("sf", Builtin::FontSwitch(sans)),
        ("tt", Builtin::FontSwitch(mono)),
        ("text", Builtin::Text(roman)),
        ("textrm", Builtin::Text(roman)),
        ("textnormal", Builtin::Text(roman)),
        ("mbox", Builtin::Text(roman)),
        ("textbf", Builtin::Text(bold)),
        ("textit", Builtin::Text(italic)),
        ("textsf", Builtin::Text(sans)),
        ("texttt", Builtin::Text(mono)),
        // classes and styles
        ("mathord", Builtin::Class(MathClass::Ord)),
        ("mathop", Builtin::Class(MathClass::Op)),
        ("mathbin", Builtin::Class(MathClass::Bin)),
        ("mathrel", Builtin::Class(MathClass::Rel)),
        ("mathopen", Builtin::Class(MathClass::Open)),
        ("mathclose", Builtin::Class(MathClass::Close)),
        ("mathpunct", Builtin::Class(MathClass::Punct)),
        ("mathinner", Builtin::Class(MathClass::Inner)),
        ("displaystyle", Builtin::Style(MathStyle::Display)),
        ("textstyle", Builtin::Style(MathStyle::Text)),
        ("scriptstyle", Builtin::Style(MathStyle::Script)),
        ("scriptscriptstyle", Builtin::Style(MathStyle::ScriptScript)),
        // colors and boxes
        ("color", Builtin::Color),
        ("textcolor", Builtin::TextColor),
        ("colorbox", Builtin::ColorBox),
        ("fcolorbox", Builtin::FColorBox),
        ("fbox", Builtin::FBox),
        ("boxed", Builtin::FBox),
        ("definecolor", Builtin::DefineColor),
        // fences
        ("left", Builtin::Left),
        ("middle", Builtin::Middle),
        ("right", Builtin::Right),
        ("limits", Builtin::Limits(true)),
        ("nolimits", Builtin::Limits(false)),
        ("operatorname", Builtin::OperatorName),
        ("DeclareMathOperator", Builtin::DeclareOperator),
        // definitions
        ("newcommand", Builtin::NewCommand(DefineMode::New)),
        ("renewcommand", Builtin::NewCommand(DefineMode::Renew)),
        ("providecommand", Builtin::NewCommand(DefineMode::Provide)),
        ("def", Builtin::Def),
        ("usepackage", Builtin::UsePackage),
        // environments and tables
        ("begin", Builtin::Begin),
        ("end", Builtin::End),
        ("\\", Builtin::RowSep),
        ("cr", Builtin::RowSep),
        ("hline", Builtin::HLine),
        ("cline", Builtin::CLine),
        ("cellcolor", Builtin::CellColor),
        ("rowcolor", Builtin::RowColor),
        ("rule", Builtin::Rule),
        ("hspace", Builtin::HSpace),
        ("vcenter", Builtin::VCenter),
    ];

    for (name, size) in [("big", 1.2), ("Big", 1.8), ("bigg", 2.4), ("Bigg", 3.0)] {
        commands.push((name, Builtin::BigDelim(size, MathClass::Ord)));
    }
    for (name, size) in [("bigl", 1.2), ("Bigl", 1.8), ("biggl", 2.4), ("Biggl", 3.0)] {
        commands.push((name, Builtin::BigDelim(size, MathClass::Open)));
    }
    for (name, size) in [("bigr", 1.2), ("Bigr", 1.8), ("biggr", 2.4), ("Biggr", 3.0)] {
        commands.push((name, Builtin::BigDelim(size, MathClass::Close)));
    }
    for (name, size) in [("bigm", 1.2), ("Bigm", 1.8), ("biggm", 2.4), ("Biggm", 3.0)] {
        commands.push((name, Builtin::BigDelim(size, MathClass::Rel)));
    }
    for (name, length) in SPACE_COMMANDS.entries() {
        commands.push((*name, Builtin::Space(*length)));
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content() {
        assert_eq!(text_content("if {x} \\{y\\}"), "if x {y}");
        assert_eq!(text_content("a~b\\,c"), "a b c");
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let commands = builtin_commands();
        let mut names: Vec<&str> = commands.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), commands.len());
    }

    #[test]
    fn test_builtin_table() {
        let commands = builtin_commands();
        let find = |name: &str| commands.iter().find(|(n, _)| *n == name).map(|(_, b)| *b);
        assert_eq!(
            find("frac"),
            Some(Builtin::Frac {
                rule: true,
                style: None,
                fenced: false
            })
        );
        assert_eq!(find("quad"), Some(Builtin::Space(Length::mu(18.0))));
        assert_eq!(find("Bigl"), Some(Builtin::BigDelim(1.8, MathClass::Open)));
        assert_eq!(find("nosuch"), None);
    }
}
