//! Canonicalizing constructors for [`Expr`].
//!
//! The parser never builds a node directly; it goes through these functions,
//! which fold constants, flatten nested `&&`/`||`, push negation inward and
//! sort and deduplicate children. A tree built this way is already canonical.

use std::cmp::Ordering;

use crate::ast::{CompareOp, Expr};
use crate::value::CompareValue;

/// Position of a node kind in the canonical child order.
fn rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Constant(false) => 0,
        Expr::Constant(true) => 1,
        Expr::KeyExists(_) => 2,
        Expr::Not(inner) => match inner.as_ref() {
            Expr::KeyExists(_) => 3,
            Expr::RegexMatch { .. } => 8,
            _ => 16,
        },
        Expr::Equals { .. } => 4,
        Expr::NotEquals { .. } => 5,
        Expr::And(_) => 6,
        Expr::RegexMatch { .. } => 7,
        Expr::Or(_) => 9,
        Expr::In { negated: false, .. } => 10,
        Expr::In { negated: true, .. } => 11,
        Expr::Compare { op, .. } => match op {
            CompareOp::Greater => 12,
            CompareOp::GreaterEqual => 13,
            CompareOp::Less => 14,
            CompareOp::LessEqual => 15,
        },
    }
}

/// Total order on sibling expressions: kind, then key, then canonical text.
pub fn canonical_cmp(a: &Expr, b: &Expr) -> Ordering {
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.key().cmp(&b.key()))
        .then_with(|| a.to_string().cmp(&b.to_string()))
}

/// Sort by canonical order and drop children whose serialization repeats.
fn sort_and_dedup(children: &mut Vec<Expr>) {
    children.sort_by_cached_key(|e| (rank(e), e.key().map(str::to_owned), e.to_string()));
    children.dedup_by(|a, b| a.to_string() == b.to_string());
}

impl Expr {
    /// Conjunction of `operands`.
    ///
    /// `true` operands are dropped and any `false` operand makes the whole
    /// conjunction `false`. Nested conjunctions are spliced in.
    pub fn and(operands: Vec<Expr>) -> Expr {
        let mut children = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand {
                Expr::Constant(true) => {}
                Expr::Constant(false) => return Expr::Constant(false),
                Expr::And(nested) => children.extend(nested),
                other => children.push(other),
            }
        }

        sort_and_dedup(&mut children);
        match children.len() {
            0 => Expr::Constant(true),
            1 => children.remove(0),
            _ => Expr::And(children),
        }
    }

    /// Disjunction of `operands`; the dual of [`Expr::and`].
    pub fn or(operands: Vec<Expr>) -> Expr {
        let mut children = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand {
                Expr::Constant(false) => {}
                Expr::Constant(true) => return Expr::Constant(true),
                Expr::Or(nested) => children.extend(nested),
                other => children.push(other),
            }
        }

        sort_and_dedup(&mut children);
        match children.len() {
            0 => Expr::Constant(false),
            1 => children.remove(0),
            _ => Expr::Or(children),
        }
    }

    /// Negation of `operand`.
    ///
    /// Constants flip, double negation cancels, equality and membership turn
    /// into their inverse operator, and De Morgan's laws push negation into
    /// `&&`/`||`. Only keys, regex matches and ordered comparisons end up
    /// under a `Not` node.
    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expr) -> Expr {
        match operand {
            Expr::Constant(b) => Expr::Constant(!b),
            Expr::Not(inner) => *inner,
            Expr::Equals {
                key,
                value,
                case_insensitive,
            } => Expr::NotEquals {
                key,
                value,
                case_insensitive,
            },
            Expr::NotEquals {
                key,
                value,
                case_insensitive,
            } => Expr::Equals {
                key,
                value,
                case_insensitive,
            },
            Expr::In {
                key,
                negated,
                target,
            } => Expr::In {
                key,
                negated: !negated,
                target,
            },
            Expr::And(children) => Expr::or(children.into_iter().map(Expr::not).collect()),
            Expr::Or(children) => Expr::and(children.into_iter().map(Expr::not).collect()),
            other => Expr::Not(Box::new(other)),
        }
    }

    pub fn key_exists(key: impl Into<String>) -> Expr {
        Expr::KeyExists(key.into())
    }

    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Expr {
        Expr::Equals {
            key: key.into(),
            value: value.into(),
            case_insensitive: false,
        }
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<String>) -> Expr {
        Expr::not(Expr::equals(key, value))
    }

    pub fn compare(op: CompareOp, key: impl Into<String>, value: CompareValue) -> Expr {
        Expr::Compare {
            op,
            key: key.into(),
            value,
        }
    }

    /// Regex match; `flags` are stored sorted with duplicates removed.
    pub fn regex(key: impl Into<String>, pattern: impl Into<String>, flags: &str) -> Expr {
        let mut flags: Vec<char> = flags.chars().collect();
        flags.sort_unstable();
        flags.dedup();
        Expr::RegexMatch {
            key: key.into(),
            pattern: pattern.into(),
            flags: flags.into_iter().collect(),
        }
    }

    pub fn in_collection(key: impl Into<String>, target: impl Into<String>) -> Expr {
        Expr::In {
            key: key.into(),
            negated: false,
            target: target.into(),
        }
    }

    pub fn not_in_collection(key: impl Into<String>, target: impl Into<String>) -> Expr {
        Expr::In {
            key: key.into(),
            negated: true,
            target: target.into(),
        }
    }
}
