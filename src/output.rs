//! Canonical text output for context-key expressions.
//!
//! Serialization is a pure function of the tree. Because the tree is built
//! canonical, equal predicates print identically and the output parses back
//! to the same tree.
//!
//! # Rendering Rules
//!
//! - **Constants** print as `true` / `false`
//! - **Equality** quotes its value: `key == 'value'`, `key != 'value'`
//! - **Comparisons** leave numbers and single words bare (`key >= -1`,
//!   `key < beta`) and quote any other text: `key < 'a b'`
//! - **Regex** prints as a literal: `key =~ /pattern/flags`
//! - **Negation** is a bare `!` prefix
//! - **`&&` / `||`** are always parenthesized, at every depth; nothing else is
//!
//! # Examples
//!
//! ```
//! use contextkey::Expr;
//!
//! let expr = Expr::or(vec![
//!     Expr::key_exists("c"),
//!     Expr::and(vec![Expr::key_exists("b"), Expr::key_exists("a")]),
//! ]);
//! assert_eq!(expr.serialize(), "(c || (a && b))");
//! ```

use std::fmt;

use crate::ast::{CompareOp, Expr, TokenKind};
use crate::lexer::Lexer;
use crate::value::CompareValue;

pub struct ExprPrinter<'a> {
    out: &'a mut String,
}

impl<'a> ExprPrinter<'a> {
    pub fn new(out: &'a mut String) -> Self {
        ExprPrinter { out }
    }

    pub fn print(&mut self, expr: &Expr) {
        match expr {
            Expr::Constant(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Expr::KeyExists(key) => self.out.push_str(key),
            Expr::Equals { key, value, .. } => self.print_equality(key, "==", value),
            Expr::NotEquals { key, value, .. } => self.print_equality(key, "!=", value),
            Expr::Compare { op, key, value } => self.print_compare(key, *op, value),
            Expr::RegexMatch {
                key,
                pattern,
                flags,
            } => {
                self.out.push_str(&format!("{} =~ /{}/{}", key, pattern, flags));
            }
            Expr::In {
                key,
                negated,
                target,
            } => {
                let op = if *negated { "not in" } else { "in" };
                self.out.push_str(&format!("{} {} {}", key, op, target));
            }
            Expr::Not(inner) => {
                self.out.push('!');
                self.print(inner);
            }
            Expr::And(children) => self.print_group(children, " && "),
            Expr::Or(children) => self.print_group(children, " || "),
        }
    }

    fn print_equality(&mut self, key: &str, op: &str, value: &str) {
        self.out.push_str(&format!("{} {} '{}'", key, op, value));
    }

    fn print_compare(&mut self, key: &str, op: CompareOp, value: &CompareValue) {
        match value {
            CompareValue::Text(text) if !scans_as_one_value(text) => {
                self.out.push_str(&format!("{} {} '{}'", key, op, text));
            }
            _ => self.out.push_str(&format!("{} {} {}", key, op, value)),
        }
    }

    fn print_group(&mut self, children: &[Expr], separator: &str) {
        self.out.push('(');
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.out.push_str(separator);
            }
            self.print(child);
        }
        self.out.push(')');
    }
}

/// Whether `text` printed bare scans back as a single value token.
fn scans_as_one_value(text: &str) -> bool {
    let (tokens, errors) = Lexer::tokenize(text);
    if !errors.is_empty() {
        return false;
    }
    match tokens.as_slice() {
        [token, eof] => {
            eof.kind == TokenKind::Eof
                && token.lexeme == text
                && matches!(
                    token.kind,
                    TokenKind::Key | TokenKind::True | TokenKind::False | TokenKind::In
                )
        }
        _ => false,
    }
}

impl Expr {
    /// Canonical text of this expression.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        ExprPrinter::new(&mut out).print(self);
        out
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
