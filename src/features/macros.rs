//! User-defined macros
//!
//! `\newcommand`, `\renewcommand`, `\def` and `\DeclareMathOperator` define
//! macros that are local to one parse. A macro invocation reads its
//! arguments as raw markup, substitutes them for the `#1`..`#9`
//! placeholders of the replacement text and parses the result in place.

use fxhash::FxHashMap;

/// Maximum nesting of macro expansions and parsed fragments
pub const MAX_EXPANSION_DEPTH: usize = 100;

/// Macro argument specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSpec {
    /// Required argument in braces: {arg}
    Required,
    /// Optional argument in brackets: `[arg]`
    Optional(String), // default value
}

/// A macro definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    /// Macro name (without backslash)
    pub name: String,
    /// Number of arguments
    pub num_args: usize,
    /// Argument specifications
    pub arg_specs: Vec<ArgSpec>,
    /// Replacement text (with #1, #2, etc. placeholders)
    pub replacement: String,
}

impl Macro {
    /// Create a simple macro with no arguments
    pub fn simple(name: &str, replacement: &str) -> Self {
        Self::with_args(name, 0, replacement)
    }

    /// Create a macro with required arguments
    pub fn with_args(name: &str, num_args: usize, replacement: &str) -> Self {
        Self {
            name: name.to_string(),
            num_args,
            arg_specs: vec![ArgSpec::Required; num_args],
            replacement: replacement.to_string(),
        }
    }

    /// Create a macro with an optional first argument
    pub fn with_optional(name: &str, num_args: usize, default: &str, replacement: &str) -> Self {
        let mut arg_specs = vec![ArgSpec::Optional(default.to_string())];
        arg_specs.extend(vec![ArgSpec::Required; num_args.saturating_sub(1)]);

        Self {
            name: name.to_string(),
            num_args: num_args.max(1),
            arg_specs,
            replacement: replacement.to_string(),
        }
    }

    /// `\DeclareMathOperator{\name}{text}`, starred for limits
    pub fn operator(name: &str, text: &str, limits: bool) -> Self {
        let star = if limits { "*" } else { "" };
        Self::simple(name, &format!("\\operatorname{}{{{}}}", star, text))
    }

    /// Replacement text with `args` substituted for the placeholders.
    ///
    /// `##` stands for a literal `#`; placeholders without a matching
    /// argument are left as they are.
    pub fn expand(&self, args: &[String]) -> String {
        let mut result = String::with_capacity(self.replacement.len());
        let mut chars = self.replacement.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '#' {
                result.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('#') => {
                    chars.next();
                    result.push('#');
                }
                Some(d @ '1'..='9') => {
                    let index = d as usize - '1' as usize;
                    match args.get(index) {
                        Some(arg) => {
                            chars.next();
                            result.push_str(arg);
                        }
                        None => result.push('#'),
                    }
                }
                _ => result.push('#'),
            }
        }

        result
    }
}

/// Macro database
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroDb {
    /// Defined macros
    macros: FxHashMap<String, Macro>,
}

impl MacroDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new macro, replacing any previous definition
    pub fn define(&mut self, macro_def: Macro) {
        self.macros.insert(macro_def.name.clone(), macro_def);
    }

    /// Check if a macro is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Get a macro definition
    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

/// Macro name from `{\name}` or `\name`
pub fn extract_macro_name(input: &str) -> Option<String> {
    let name = input.trim().trim_start_matches('{').trim_end_matches('}').trim();
    let name = name.strip_prefix('\\')?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Argument count from the `[n]` option of `\newcommand`
pub fn parse_arg_count(spec: &str) -> Option<usize> {
    spec.trim().parse::<usize>().ok().filter(|n| *n <= 9)
}

/// Number of parameters in a `\def` parameter text such as `#1#2`
pub fn def_param_count(params: &str) -> Option<usize> {
    let mut count = 0;
    let mut chars = params.chars();
    while let Some(c) = chars.next() {
        match c {
            '#' => {
                let d = chars.next()?.to_digit(10)? as usize;
                // parameters must be numbered in order
                if d != count + 1 {
                    return None;
                }
                count = d;
            }
            c if c.is_whitespace() => {}
            _ => return None,
        }
    }
    Some(count)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_macro() {
        let m = Macro::simple("foo", "bar");
        assert_eq!(m.expand(&[]), "bar");
    }

    #[test]
    fn test_macro_with_arg() {
        let m = Macro::with_args("bold", 1, "\\mathbf{#1}");
        assert_eq!(m.expand(&["x".to_string()]), "\\mathbf{x}");
    }

    #[test]
    fn test_macro_with_multiple_args() {
        let m = Macro::with_args("half", 2, "\\frac{#1}{2#2}");
        assert_eq!(m.expand(&["a".to_string(), "b".to_string()]), "\\frac{a}{2b}");
    }

    #[test]
    fn test_escaped_hash_and_missing_arg() {
        let m = Macro::with_args("h", 1, "##1 #1 #2");
        assert_eq!(m.expand(&["x".to_string()]), "#1 x #2");
    }

    #[test]
    fn test_optional_first_arg() {
        let m = Macro::with_optional("norm", 2, "2", "\\|#2\\|_{#1}");
        assert_eq!(m.num_args, 2);
        assert_eq!(m.arg_specs[0], ArgSpec::Optional("2".to_string()));
        assert_eq!(m.arg_specs[1], ArgSpec::Required);
    }

    #[test]
    fn test_declare_math_operator() {
        let m = Macro::operator("argmax", "arg\\,max", true);
        assert_eq!(m.expand(&[]), "\\operatorname*{arg\\,max}");
    }

    #[test]
    fn test_database() {
        let mut db = MacroDb::new();
        db.define(Macro::simple("foo", "bar"));
        assert!(db.is_defined("foo"));
        db.define(Macro::simple("foo", "baz"));
        assert_eq!(db.len(), 1);
        assert_eq!(db.get("foo").map(|m| m.replacement.as_str()), Some("baz"));
        assert!(!db.is_empty());
    }

    #[test]
    fn test_definition_helpers() {
        assert_eq!(extract_macro_name("{\\foo}"), Some("foo".to_string()));
        assert_eq!(extract_macro_name("\\bar"), Some("bar".to_string()));
        assert_eq!(extract_macro_name("foo"), None);
        assert_eq!(parse_arg_count(" 2 "), Some(2));
        assert_eq!(parse_arg_count("x"), None);
        assert_eq!(def_param_count("#1#2"), Some(2));
        assert_eq!(def_param_count(""), Some(0));
        assert_eq!(def_param_count("#2"), None);
    }
}
