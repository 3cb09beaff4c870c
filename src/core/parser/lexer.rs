//! Character stream over the markup
//!
//! The parser pulls single characters for ordinary tokens and asks the lexer
//! for larger raw pieces (command names, balanced groups, optional
//! arguments) when a command reads its arguments. Positions are byte
//! offsets into the markup.

/// Cursor over a markup string
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer { src, pos: 0 }
    }

    /// Byte offset of the next character
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `c` if it is the next character
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next_char();
        }
    }

    /// Skip to the end of the current line, after a `%`
    pub fn skip_comment(&mut self) {
        while let Some(c) = self.next_char() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Skip whitespace and `%` comments
    pub fn skip_ignorable(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek() == Some('%') {
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    /// Name of a command whose backslash has just been consumed: a run of
    /// letters (followed spaces are skipped) or a single other character.
    pub fn read_command_name(&mut self) -> Option<String> {
        let first = self.peek()?;
        if !first.is_ascii_alphabetic() {
            self.next_char();
            return Some(first.to_string());
        }

        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let name = rest[..end].to_string();
        self.pos += end;
        self.skip_whitespace();
        Some(name)
    }

    /// Content between `open` and its matching `close`, which must be the
    /// next character. Escaped delimiters (`\{`) do not count towards
    /// nesting. Returns `None` and leaves the cursor untouched when the
    /// group is not closed.
    pub fn read_balanced(&mut self, open: char, close: char) -> Option<String> {
        let start = self.pos;
        if !self.eat(open) {
            return None;
        }
        let body = self.pos;
        let mut depth = 1;

        while let Some(c) = self.next_char() {
            if c == '\\' {
                self.next_char();
            } else if c == open && open != close {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(self.src[body..self.pos - close.len_utf8()].to_string());
                }
            }
        }

        self.pos = start;
        None
    }

    /// A `[...]` argument if one follows
    pub fn read_optional(&mut self) -> Option<String> {
        let start = self.pos;
        self.skip_ignorable();
        if self.peek() != Some('[') {
            self.pos = start;
            return None;
        }
        let arg = self.read_balanced('[', ']');
        if arg.is_none() {
            self.pos = start;
        }
        arg
    }

    /// One raw macro argument: a braced group without its braces, a
    /// command token, or a single character.
    pub fn read_raw_arg(&mut self) -> Option<String> {
        self.skip_ignorable();
        match self.peek()? {
            '{' => self.read_balanced('{', '}'),
            '\\' => {
                self.next_char();
                let name = self.read_command_name()?;
                Some(format!("\\{}", name))
            }
            _ => self.next_char().map(String::from),
        }
    }

    /// Everything up to (not including) the next `stop` character
    pub fn read_until(&mut self, stop: char) -> String {
        let rest = self.rest();
        let end = rest.find(stop).unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_string()
    }
}
