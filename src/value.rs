use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Right-hand side of an ordered comparison (`<`, `<=`, `>`, `>=`).
///
/// Decimal literals are kept as exact numbers so that `1.50` and `1.5`
/// canonicalize identically; anything else is kept verbatim as text. Numbers
/// and single words display unquoted.
///
/// # Examples
///
/// ```
/// use contextkey::CompareValue;
///
/// assert_eq!(CompareValue::from_lexeme("-1").to_string(), "-1");
/// assert_eq!(CompareValue::from_lexeme("1.50").to_string(), "1.5");
/// assert!(CompareValue::from_lexeme("beta").as_number().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompareValue {
    /// Exact decimal number
    Number(Decimal),

    /// Any non-numeric operand
    Text(String),
}

impl CompareValue {
    pub fn from_lexeme(lexeme: &str) -> Self {
        match Decimal::from_str(lexeme) {
            Ok(n) => CompareValue::Number(n.normalize()),
            Err(_) => CompareValue::Text(lexeme.to_string()),
        }
    }

    /// Get as number
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            CompareValue::Number(n) => Some(*n),
            CompareValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CompareValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareValue::Number(n) => write!(f, "{}", n),
            CompareValue::Text(s) => f.write_str(s),
        }
    }
}
