use fancy_regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{CompareOp, Expr, Token, TokenKind},
    config::ParserConfig,
    diagnostics::Diagnostics,
    lexer::{LexError, Lexer},
    value::CompareValue,
};

const EXPECTED_PRIMARY: &str = "'true', 'false', '(', KEY, KEY '=~' regex, KEY [ ('==' | '!=' | '<' | '<=' | '>' | '>=' | 'in' | 'not' 'in') value ]";
const EXPECTED_NEGATED: &str = "Expected KEY, 'true', or 'false'";
const EMPTY_EXPRESSION: &str = "Empty context key expression";

/// A grammar violation, reported against the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl ParseError {
    fn expected(expected: &str, token: &Token) -> Self {
        ParseError {
            token: token.clone(),
            message: format!("Expected {} but got {}", expected, token.describe()),
        }
    }

    fn unexpected(token: &Token) -> Self {
        ParseError {
            token: token.clone(),
            message: format!(
                "Unexpected token '{}' at offset {}",
                token.lexeme, token.offset
            ),
        }
    }
}

/// Parses context-key expressions into canonical [`Expr`] trees.
///
/// Diagnostics from the latest call stay available through
/// [`Parser::lexing_errors`] and [`Parser::parsing_errors`]; each call starts
/// from scratch.
///
/// # Examples
///
/// ```
/// use contextkey::Parser;
///
/// let mut parser = Parser::new();
/// let expr = parser.parse("foo.bar==enabled").unwrap();
/// assert_eq!(expr.serialize(), "foo.bar == 'enabled'");
///
/// assert!(parser.parse("!(foo && bar)").is_none());
/// assert_eq!(parser.parsing_errors()[0].message, "Expected KEY, 'true', or 'false'");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
    lexing_errors: Vec<LexError>,
    parsing_errors: Vec<ParseError>,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Parser {
            config,
            lexing_errors: Vec::new(),
            parsing_errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn lexing_errors(&self) -> &[LexError] {
        &self.lexing_errors
    }

    pub fn parsing_errors(&self) -> &[ParseError] {
        &self.parsing_errors
    }

    /// Diagnostics of the latest call.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            lexing: self.lexing_errors.clone(),
            parsing: self.parsing_errors.clone(),
        }
    }

    /// Parse `input`. Returns `None` when any lexing or parsing error was found.
    ///
    /// Lexing errors stop the parse before the grammar is applied, so a
    /// malformed token is never reported twice.
    pub fn parse(&mut self, input: &str) -> Option<Expr> {
        self.lexing_errors.clear();
        self.parsing_errors.clear();

        let source: Vec<char> = input.chars().collect();
        let mut lexer = Lexer::new(input);
        let tokens: Vec<Token> = lexer.by_ref().collect();
        self.lexing_errors = lexer.into_errors();

        if !self.lexing_errors.is_empty() {
            debug!(
                len = source.len(),
                errors = self.lexing_errors.len(),
                "expression failed to lex"
            );
            return None;
        }

        let mut state = ParseState {
            tokens,
            position: 0,
            source: &source,
            config: &self.config,
        };

        match state.parse() {
            Ok(expr) => {
                debug!(len = source.len(), canonical = %expr, "parsed expression");
                Some(expr)
            }
            Err(error) => {
                debug!(len = source.len(), error = %error, "expression failed to parse");
                self.parsing_errors.push(error);
                None
            }
        }
    }

    /// Parse `input`, returning the diagnostics on failure.
    pub fn try_parse(&mut self, input: &str) -> Result<Expr, Diagnostics> {
        self.parse(input).ok_or_else(|| self.diagnostics())
    }
}

/// Cursor over one call's token buffer.
struct ParseState<'a> {
    tokens: Vec<Token>,
    position: usize,
    source: &'a [char],
    config: &'a ParserConfig,
}

impl ParseState<'_> {
    fn peek(&self) -> &Token {
        // The buffer always ends with Eof and the cursor never moves past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(expected, self.peek()))
        }
    }

    fn parse(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Eof) {
            return Err(ParseError {
                token: self.peek().clone(),
                message: EMPTY_EXPRESSION.to_string(),
            });
        }

        let expr = self.parse_or()?;
        if !self.check(TokenKind::Eof) {
            return Err(ParseError::unexpected(self.peek()));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut operands = vec![self.parse_and()?];
        while self.check(TokenKind::Or) {
            self.advance();
            operands.push(self.parse_and()?);
        }

        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::or(operands)
        })
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut operands = vec![self.parse_unary()?];
        while self.check(TokenKind::And) {
            self.advance();
            operands.push(self.parse_unary()?);
        }

        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::and(operands)
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if !self.check(TokenKind::Not) {
            return self.parse_primary();
        }
        self.advance();

        // `!` binds to a single key or literal, never to a group.
        let operand = match self.peek().kind {
            TokenKind::Not => self.parse_unary()?,
            TokenKind::True | TokenKind::False | TokenKind::Key => self.parse_primary()?,
            _ => {
                return Err(ParseError {
                    token: self.peek().clone(),
                    message: EXPECTED_NEGATED.to_string(),
                });
            }
        };
        Ok(Expr::not(operand))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().kind {
            TokenKind::True => {
                self.advance();
                Ok(Expr::Constant(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Constant(false))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_or()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::Key => {
                let key = self.advance().lexeme;
                self.parse_key_tail(key)
            }
            _ => Err(ParseError::expected(EXPECTED_PRIMARY, self.peek())),
        }
    }

    /// Whatever follows a key: a comparison, a membership test, a regex match,
    /// or nothing.
    fn parse_key_tail(&mut self, key: String) -> Result<Expr, ParseError> {
        match self.peek().kind {
            TokenKind::Eq => {
                self.advance();
                let value = self.parse_equality_value()?;
                Ok(self.equality(key, value))
            }
            TokenKind::NotEq => {
                self.advance();
                let value = self.parse_equality_value()?;
                Ok(Expr::not(self.equality(key, value)))
            }
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => {
                let op = match self.advance().kind {
                    TokenKind::Lt => CompareOp::Less,
                    TokenKind::LtEq => CompareOp::LessEqual,
                    TokenKind::Gt => CompareOp::Greater,
                    _ => CompareOp::GreaterEqual,
                };
                let value = self.parse_compare_value()?;
                Ok(Expr::compare(op, key, value))
            }
            TokenKind::In | TokenKind::NotIn => {
                let negated = self.advance().kind == TokenKind::NotIn;
                let target = self.expect(TokenKind::Key, "KEY")?.lexeme;
                Ok(if negated {
                    Expr::not_in_collection(key, target)
                } else {
                    Expr::in_collection(key, target)
                })
            }
            TokenKind::RegexOp => {
                self.advance();
                self.parse_regex(key)
            }
            _ => Ok(match self.config.constants.get(&key) {
                Some(value) => Expr::Constant(value),
                None => Expr::key_exists(key),
            }),
        }
    }

    /// `key == value` with host constants folded.
    fn equality(&self, key: String, value: String) -> Expr {
        match self.config.constants.get(&key) {
            Some(constant) => Expr::Constant(value == constant.to_string()),
            None => Expr::equals(key, value),
        }
    }

    fn is_value_token(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Key
                | TokenKind::String
                | TokenKind::True
                | TokenKind::False
                | TokenKind::In
        )
    }

    /// Right side of `==`/`!=`. An unquoted value keeps the whitespace that
    /// separates it from a following token.
    fn parse_equality_value(&mut self) -> Result<String, ParseError> {
        if !Self::is_value_token(self.peek().kind) {
            return Err(ParseError::expected("KEY or STRING", self.peek()));
        }

        let token = self.advance();
        if token.kind == TokenKind::String {
            return Ok(token.lexeme);
        }

        let next = self.peek();
        if next.kind == TokenKind::Eof {
            return Ok(token.lexeme);
        }
        let end = token.offset + token.source_len();
        let gap: String = self.source[end..next.offset.max(end)].iter().collect();
        Ok(token.lexeme + &gap)
    }

    fn parse_compare_value(&mut self) -> Result<CompareValue, ParseError> {
        if !Self::is_value_token(self.peek().kind) {
            return Err(ParseError::expected("KEY or STRING", self.peek()));
        }
        Ok(CompareValue::from_lexeme(&self.advance().lexeme))
    }

    /// Right side of `=~`: a regex literal, or a quoted string holding one.
    fn parse_regex(&mut self, key: String) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        let (pattern, flags) = match token.kind {
            TokenKind::Regex => split_regex_literal(&token.lexeme),
            TokenKind::String => match split_quoted_regex(&token.lexeme) {
                Some(parts) => parts,
                None => return Err(ParseError::expected("REGEX", &token)),
            },
            _ => return Err(ParseError::expected("REGEX", &token)),
        };

        if !compiles(&pattern, &flags) {
            return Err(ParseError::expected("REGEX", &token));
        }
        self.advance();
        Ok(Expr::regex(key, pattern, &flags))
    }
}

/// `/pattern/flags` into its parts.
fn split_regex_literal(lexeme: &str) -> (String, String) {
    let body = lexeme.strip_prefix('/').unwrap_or(lexeme);
    match body.rfind('/') {
        Some(end) => (body[..end].to_string(), body[end + 1..].to_string()),
        None => (body.to_string(), String::new()),
    }
}

/// A quoted regex uses the text between the first and last `/`; only an `i`
/// right after the last slash is honored as a flag. Inner slashes are escaped
/// so the pattern prints as a literal that scans back whole.
fn split_quoted_regex(content: &str) -> Option<(String, String)> {
    let start = content.find('/')?;
    let end = content.rfind('/')?;
    if start == end {
        return None;
    }
    let pattern = escape_slashes(&content[start + 1..end]);
    let flags = if content[end + 1..].starts_with('i') {
        "i"
    } else {
        ""
    };
    Some((pattern, flags.to_string()))
}

/// Escape every `/` outside a character class that is not already escaped.
fn escape_slashes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut in_escape = false;
    let mut in_class = false;

    for ch in pattern.chars() {
        if in_escape {
            in_escape = false;
        } else if ch == '\\' {
            in_escape = true;
        } else if ch == '[' {
            in_class = true;
        } else if ch == ']' {
            in_class = false;
        } else if ch == '/' && !in_class {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Lookaround and backreferences are allowed. `g`, `y` and `u` do not change
/// whether a pattern is valid.
fn compiles(pattern: &str, flags: &str) -> bool {
    let inline: String = flags
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's'))
        .collect();
    let source = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{inline}){pattern}")
    };
    Regex::new(&source).is_ok()
}

/// Parse `input` with the host's default configuration.
///
/// # Examples
///
/// ```
/// let expr = contextkey::parse("a && b || c").unwrap();
/// assert_eq!(expr.to_string(), "(c || (a && b))");
///
/// let err = contextkey::parse("foo && 'bar").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Lexing errors:\n\nUnexpected token ''bar' at offset 7. Did you forget to close the string?\n"
/// );
/// ```
pub fn parse(input: &str) -> Result<Expr, Diagnostics> {
    Parser::new().try_parse(input)
}

#[test]
fn test_regex_literal_split() {
    assert_eq!(
        split_regex_literal("/a\\/b/gi"),
        ("a\\/b".to_string(), "gi".to_string())
    );
    assert_eq!(
        split_quoted_regex("/(servers)/"),
        Some(("(servers)".to_string(), String::new()))
    );
    assert_eq!(split_quoted_regex("servers"), None);
}

#[test]
fn test_quoted_regex_slashes_are_escaped() {
    assert_eq!(
        split_quoted_regex("/a/b/i"),
        Some(("a\\/b".to_string(), "i".to_string()))
    );
    assert_eq!(escape_slashes("a\\/b"), "a\\/b");
    assert_eq!(escape_slashes("[/]x/"), "[/]x\\/");
}

#[test]
fn test_lookaround_and_backreferences_compile() {
    assert!(compiles("^(?!.*\\.d\\.ts$).*\\.ts$", ""));
    assert!(compiles("(?<=a)b", "i"));
    assert!(compiles("(a)\\1", "gm"));
    assert!(!compiles("(", "i"));
}
