use crate::ast::CompareOp;
use crate::value::CompareValue;

/// A normalized context-key expression.
///
/// Nodes are built once by the parser (or the smart constructors in
/// [`crate::normalize`]) and never edited afterwards. `And`/`Or` always hold
/// at least two children, none of them of the same operator, deduplicated and
/// in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Literal `true`/`false`, or the result of folding
    Constant(bool),

    /// Bare key, truthy when the context holds a truthy value for it
    ///
    /// # Example
    /// ```text
    /// editorFocus
    /// ```
    KeyExists(String),

    /// String equality
    ///
    /// # Examples
    /// ```text
    /// foo.bar == 'enabled'
    /// foo.bar==enabled
    /// ```
    Equals {
        key: String,
        value: String,
        case_insensitive: bool,
    },

    /// String inequality (`!=`)
    NotEquals {
        key: String,
        value: String,
        case_insensitive: bool,
    },

    /// Ordered comparison against a number or text
    ///
    /// # Examples
    /// ```text
    /// foo.bar >= -1
    /// resourceSize < 1024
    /// ```
    Compare {
        op: CompareOp,
        key: String,
        value: CompareValue,
    },

    /// Regex match (`=~`)
    ///
    /// # Example
    /// ```text
    /// resourceFilename =~ /docker/i
    /// ```
    RegexMatch {
        key: String,
        pattern: String,
        flags: String,
    },

    /// Membership of the key's value in the collection named by `target`
    ///
    /// # Examples
    /// ```text
    /// resourceExtname in supportedExtensions
    /// resourceExtname not in supportedExtensions
    /// ```
    In {
        key: String,
        negated: bool,
        target: String,
    },

    /// Negation of a key, regex or comparison
    Not(Box<Expr>),

    /// Conjunction
    And(Vec<Expr>),

    /// Disjunction
    Or(Vec<Expr>),
}

impl Expr {
    /// The context key a leaf node tests, looking through negation.
    pub fn key(&self) -> Option<&str> {
        match self {
            Expr::KeyExists(key)
            | Expr::Equals { key, .. }
            | Expr::NotEquals { key, .. }
            | Expr::Compare { key, .. }
            | Expr::RegexMatch { key, .. }
            | Expr::In { key, .. } => Some(key),
            Expr::Not(inner) => inner.key(),
            Expr::Constant(_) | Expr::And(_) | Expr::Or(_) => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Expr::Constant(_))
    }
}
