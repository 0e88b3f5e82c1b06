use serde::Serialize;

/// Kind of a lexical token.
///
/// The serialized names are what diagnostics print in their
/// `{"type":...,"offset":...}` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// `true`
    True,

    /// `false`
    False,

    /// `(`
    #[serde(rename = "lparen")]
    LParen,

    /// `)`
    #[serde(rename = "rparen")]
    RParen,

    /// Negation `!`
    Not,

    /// `&&`
    And,

    /// `||`
    Or,

    /// `==` (also `===`)
    Eq,

    /// `!=` (also `!==`)
    #[serde(rename = "neq")]
    NotEq,

    /// `<`
    Lt,

    /// `<=`
    #[serde(rename = "lte")]
    LtEq,

    /// `>`
    Gt,

    /// `>=`
    #[serde(rename = "gte")]
    GtEq,

    /// Word operator `in`
    In,

    /// Word operator pair `not in`
    NotIn,

    /// `=~`
    RegexOp,

    /// Context key name, or a bare (unquoted) value
    ///
    /// # Examples
    /// ```text
    /// editorFocus
    /// foo.bar:zed
    /// fee.bee<K-loo+1>
    /// -1
    /// ```
    Key,

    /// Single-quoted string; the lexeme excludes the quotes
    ///
    /// # Example
    /// ```text
    /// 'enabled'
    /// ```
    String,

    /// Regex literal including its delimiters and flags
    ///
    /// # Example
    /// ```text
    /// /^(Starting|Stopped)/i
    /// ```
    Regex,

    /// End of input
    Eof,
}

/// A token with its source text and character offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            offset,
        }
    }

    /// Number of source characters the lexeme spans.
    ///
    /// Quoted strings store their content only, so the quotes are added back.
    pub fn source_len(&self) -> usize {
        let len = self.lexeme.chars().count();
        match self.kind {
            TokenKind::String => len + 2,
            _ => len,
        }
    }

    /// The compact `{"type":...,"offset":...}` record used in parse diagnostics.
    pub fn describe(&self) -> String {
        #[derive(Serialize)]
        struct Record {
            #[serde(rename = "type")]
            kind: TokenKind,
            offset: usize,
        }

        let record = Record {
            kind: self.kind,
            offset: self.offset,
        };
        serde_json::to_string(&record)
            .unwrap_or_else(|_| format!("{{\"offset\":{}}}", self.offset))
    }
}
