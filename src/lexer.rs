use thiserror::Error;
use tracing::trace;

use crate::ast::{Token, TokenKind};

/// A malformed token found while scanning.
///
/// The `Display` output is shown to configuration authors verbatim, so its
/// wording is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A `'` with no closing quote; `lexeme` is the rest of the input
    #[error("Unexpected token '{lexeme}' at offset {offset}. Did you forget to close the string?")]
    UnterminatedString { lexeme: String, offset: usize },

    /// A single `=` that is neither `==` nor `=~`
    #[error("Unexpected token '=' at offset {offset}. Did you mean '==' or '=~'?")]
    StrayEquals { offset: usize },

    /// Anything else that cannot start a token
    #[error("Unexpected token '{lexeme}' at offset {offset}")]
    UnexpectedToken { lexeme: String, offset: usize },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnterminatedString { offset, .. }
            | LexError::StrayEquals { offset }
            | LexError::UnexpectedToken { offset, .. } => *offset,
        }
    }

    pub fn lexeme(&self) -> &str {
        match self {
            LexError::UnterminatedString { lexeme, .. }
            | LexError::UnexpectedToken { lexeme, .. } => lexeme,
            LexError::StrayEquals { .. } => "=",
        }
    }
}

const REGEX_FLAGS: &[char] = &['i', 'g', 's', 'm', 'y', 'u'];

const KEY_PUNCTUATION: &[char] = &[
    '_', '-', '.', '/', '\\', ':', '*', '?', '+', '[', ']', '^', ',', '#', '@', ';', '%', '$',
];

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\u{a0}')
}

fn is_key_char(ch: char) -> bool {
    ch.is_alphanumeric() || KEY_PUNCTUATION.contains(&ch)
}

/// Single-pass scanner over an expression.
///
/// Tokens are produced on demand by [`Lexer::next_token`]; malformed input is
/// recorded in [`Lexer::errors`] and skipped, so the scan always reaches
/// [`TokenKind::Eof`].
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    errors: Vec<LexError>,
    finished: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            errors: Vec::new(),
            finished: false,
        }
    }

    /// Scan a whole expression.
    pub fn tokenize(input: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.by_ref().collect();
        (tokens, lexer.errors)
    }

    /// Render a lexing error the way it is shown to users.
    pub fn report_error(error: &LexError) -> String {
        error.to_string()
    }

    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Consume `expected` if it is the current character.
    fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn error(&mut self, error: LexError) {
        trace!(offset = error.offset(), lexeme = error.lexeme(), "lexing error");
        self.errors.push(error);
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, self.text(start, self.position), start)
    }

    /// Read a key: letters, digits and key punctuation. A leading `"` is
    /// allowed, and `<` opens a `<...>` suffix inside which `>` is a key
    /// character too.
    fn read_key(&mut self) -> String {
        let start = self.position;
        self.match_char('"');

        let mut depth = 0usize;
        while let Some(ch) = self.current_char() {
            match ch {
                '<' if self.position > start => depth += 1,
                '>' if depth > 0 => depth -= 1,
                c if is_key_char(c) => {}
                _ => break,
            }
            self.advance();
        }
        self.text(start, self.position)
    }

    fn read_quoted_string(&mut self, start: usize) -> Option<Token> {
        while let Some(ch) = self.current_char() {
            if ch == '\'' {
                let content = self.text(start + 1, self.position);
                self.advance();
                return Some(Token::new(TokenKind::String, content, start));
            }
            self.advance();
        }

        let lexeme = self.text(start, self.position);
        if self.position == start + 1 {
            self.error(LexError::UnexpectedToken { lexeme, offset: start });
        } else {
            self.error(LexError::UnterminatedString { lexeme, offset: start });
        }
        None
    }

    /// Read `/.../flags`. A `/` inside a `[...]` class or after a backslash
    /// does not end the literal.
    fn read_regex(&mut self, start: usize) -> Option<Token> {
        let mut in_escape = false;
        let mut in_class = false;

        loop {
            let Some(ch) = self.current_char() else {
                let lexeme = self.text(start, self.position);
                self.error(LexError::UnexpectedToken { lexeme, offset: start });
                return None;
            };
            self.advance();

            if in_escape {
                in_escape = false;
            } else if ch == '/' && !in_class {
                break;
            } else if ch == '[' {
                in_class = true;
            } else if ch == ']' {
                in_class = false;
            } else if ch == '\\' {
                in_escape = true;
            }
        }

        while self.current_char().is_some_and(|c| REGEX_FLAGS.contains(&c)) {
            self.advance();
        }
        Some(self.token(TokenKind::Regex, start))
    }

    /// After a `not` key, look past whitespace for `in`.
    fn match_in_keyword(&mut self) -> bool {
        let saved = self.position;
        self.skip_whitespace();
        if self.current_char().is_some_and(|c| is_key_char(c) || c == '"') && self.read_key() == "in"
        {
            return true;
        }
        self.position = saved;
        false
    }

    fn scan_token(&mut self) -> Option<Token> {
        let start = self.position;
        let ch = self.current_char()?;
        self.advance();

        match ch {
            '(' => Some(self.token(TokenKind::LParen, start)),
            ')' => Some(self.token(TokenKind::RParen, start)),
            '!' => {
                if self.match_char('=') {
                    self.match_char('=');
                    Some(self.token(TokenKind::NotEq, start))
                } else {
                    Some(self.token(TokenKind::Not, start))
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.match_char('=');
                    Some(self.token(TokenKind::Eq, start))
                } else if self.match_char('~') {
                    Some(self.token(TokenKind::RegexOp, start))
                } else {
                    self.error(LexError::StrayEquals { offset: start });
                    None
                }
            }
            '<' => {
                let kind = if self.match_char('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                };
                Some(self.token(kind, start))
            }
            '>' => {
                let kind = if self.match_char('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                };
                Some(self.token(kind, start))
            }
            '&' | '|' => {
                if self.match_char(ch) {
                    let kind = if ch == '&' { TokenKind::And } else { TokenKind::Or };
                    Some(self.token(kind, start))
                } else {
                    self.error(LexError::UnexpectedToken {
                        lexeme: ch.to_string(),
                        offset: start,
                    });
                    None
                }
            }
            '\'' => self.read_quoted_string(start),
            '/' => self.read_regex(start),
            c if is_key_char(c) || c == '"' => {
                self.position = start;
                let word = self.read_key();
                let kind = match word.as_str() {
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    "in" => TokenKind::In,
                    "not" if self.match_in_keyword() => TokenKind::NotIn,
                    _ => TokenKind::Key,
                };
                Some(self.token(kind, start))
            }
            c => {
                self.error(LexError::UnexpectedToken {
                    lexeme: c.to_string(),
                    offset: start,
                });
                None
            }
        }
    }

    /// Produce the next token, skipping whitespace and malformed input.
    ///
    /// Returns [`TokenKind::Eof`] once the input is exhausted, repeatedly.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            if self.position >= self.input.len() {
                return Token::new(TokenKind::Eof, "", self.input.len());
            }
            if let Some(token) = self.scan_token() {
                return token;
            }
        }
    }
}

/// Yields every token up to and including the first [`TokenKind::Eof`].
impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == TokenKind::Eof;
        Some(token)
    }
}

#[test]
fn test_keywords() {
    let (tokens, errors) = Lexer::tokenize("true false in not in not");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::In,
            TokenKind::NotIn,
            TokenKind::Key,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[3].lexeme, "not in");
    assert!(errors.is_empty());
}

#[test]
fn test_bracketed_key_suffix() {
    let mut lexer = Lexer::new("foo.barBaz<C-r> < 2");
    assert_eq!(
        lexer.next_token(),
        Token::new(TokenKind::Key, "foo.barBaz<C-r>", 0)
    );
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Lt, "<", 16));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Key, "2", 18));
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}
