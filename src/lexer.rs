//! Character cursor driven by the parser.
//!
//! There is no separate tokenizing pass: the parser asks the lexer for the
//! next identifier, number, string, keyword or symbol at the current offset
//! and rewinds it when an alternative does not apply. Every failed attempt
//! is recorded so that the furthest failure can be reported as a
//! [`ParseError`].

use std::collections::BTreeSet;

use crate::error::ParseError;

/// Words that can never be used as identifiers.
pub const RESERVED_WORDS: [&str; 13] = [
    "if", "then", "else", "for", "each", "in", "do", "end", "not", "and", "or", "true", "false",
];

pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '$' || ch == '_'
}

pub fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '$' || ch == '_'
}

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    furthest: usize,
    expected: BTreeSet<String>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            furthest: 0,
            expected: BTreeSet::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewinds (or moves) the cursor to an offset returned by [`Lexer::position`].
    pub fn reset(&mut self, position: usize) {
        self.position = position;
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Records that `label` would have been accepted at the current offset.
    pub fn expected(&mut self, label: &str) {
        self.expected_at(self.position, label);
    }

    fn expected_at(&mut self, position: usize, label: &str) {
        if position > self.furthest {
            self.furthest = position;
            self.expected.clear();
        }
        if position == self.furthest {
            self.expected.insert(label.to_string());
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if is_whitespace(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consumes `ch` if it is the current character.
    pub fn eat_char(&mut self, ch: char) -> bool {
        if self.current_char() == Some(ch) {
            self.advance();
            true
        } else {
            self.expected(&format!("{:?}", ch.to_string()));
            false
        }
    }

    /// Consumes a symbol such as `<=` or `==`.
    pub fn eat_symbol(&mut self, symbol: &str) -> bool {
        if self.starts_with(symbol) {
            self.position += symbol.chars().count();
            true
        } else {
            self.expected(&format!("{:?}", symbol));
            false
        }
    }

    /// Consumes a single `=` that is not the start of `==`.
    pub fn eat_assign(&mut self) -> bool {
        if self.current_char() == Some('=') && self.peek_char(1) != Some('=') {
            self.advance();
            true
        } else {
            self.expected("\"=\"");
            false
        }
    }

    /// True if `keyword` starts at the current offset and is not merely the
    /// prefix of a longer identifier.
    pub fn check_keyword(&self, keyword: &str) -> bool {
        let len = keyword.chars().count();
        self.starts_with(keyword) && !self.peek_char(len).is_some_and(is_identifier_part)
    }

    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.check_keyword(keyword) {
            self.position += keyword.chars().count();
            true
        } else {
            self.expected(&format!("{:?}", keyword));
            false
        }
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, expected)| self.peek_char(i) == Some(expected))
    }

    /// Reads an identifier, refusing reserved words.
    ///
    /// The reserved check applies to the whole match, so `ifMyFunc` is an
    /// identifier while `if` is not.
    pub fn read_identifier(&mut self) -> Option<String> {
        let start = self.position;
        if !self.current_char().is_some_and(is_identifier_start) {
            self.expected("identifier");
            return None;
        }

        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_identifier_part(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_reserved(&result) {
            self.position = start;
            self.expected("identifier");
            return None;
        }
        Some(result)
    }

    /// Reads a double-quoted string. No escapes: everything up to the next
    /// `"` is taken verbatim.
    pub fn read_string(&mut self) -> Option<String> {
        let start = self.position;
        if self.current_char() != Some('"') {
            self.expected("string");
            return None;
        }
        self.advance(); // Consume opening quote

        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '"' {
                self.advance();
                return Some(result);
            }
            result.push(ch);
            self.advance();
        }

        self.expected("\"\\\"\"");
        self.position = start;
        None
    }

    /// Reads an optionally signed number: `8`, `-2.5`, `+25`, `.5`, `3.`.
    ///
    /// At most one sign is consumed, so `--2` is not a number.
    pub fn read_number(&mut self) -> Option<f64> {
        let start = self.position;
        let mut number = String::new();

        if let Some(sign @ ('+' | '-')) = self.current_char() {
            number.push(sign);
            self.advance();
        }

        match self.current_char() {
            Some(ch) if ch.is_ascii_digit() => {
                self.read_digits(&mut number);
                if self.current_char() == Some('.') {
                    number.push('.');
                    self.advance();
                    self.read_digits(&mut number);
                }
            }
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                number.push('.');
                self.advance();
                self.read_digits(&mut number);
            }
            _ => {
                self.expected("number");
                self.position = start;
                return None;
            }
        }

        // Literals that overflow to infinity have no JSON form
        match number.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                self.expected_at(start, "number");
                self.position = start;
                None
            }
        }
    }

    fn read_digits(&mut self, buffer: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                buffer.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Builds the error for the furthest failure seen so far.
    pub fn error(&self) -> ParseError {
        let offset = self.furthest.min(self.input.len());

        let mut line = 1;
        let mut column = 1;
        for ch in self.input.iter().take(offset) {
            if *ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        ParseError {
            offset,
            line,
            column,
            expected: self.expected.iter().cloned().collect(),
            found: self.input.get(offset).copied(),
        }
    }
}
