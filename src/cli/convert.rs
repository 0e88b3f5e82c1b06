//! Expression -> JSON conversion

use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};

use crate::{CompareValue, Expr};

/// Convert an expression tree to a JSON object tagged by node kind.
pub fn expr_to_json(expr: &Expr) -> Value {
    match expr {
        Expr::Constant(b) => json!({ "kind": "constant", "value": b }),
        Expr::KeyExists(key) => json!({ "kind": "key_exists", "key": key }),
        Expr::Equals {
            key,
            value,
            case_insensitive,
        } => json!({
            "kind": "equals",
            "key": key,
            "value": value,
            "case_insensitive": case_insensitive,
        }),
        Expr::NotEquals {
            key,
            value,
            case_insensitive,
        } => json!({
            "kind": "not_equals",
            "key": key,
            "value": value,
            "case_insensitive": case_insensitive,
        }),
        Expr::Compare { op, key, value } => json!({
            "kind": "compare",
            "op": op.symbol(),
            "key": key,
            "value": compare_value_to_json(value),
        }),
        Expr::RegexMatch {
            key,
            pattern,
            flags,
        } => json!({
            "kind": "regex",
            "key": key,
            "pattern": pattern,
            "flags": flags,
        }),
        Expr::In {
            key,
            negated,
            target,
        } => json!({
            "kind": "in",
            "key": key,
            "negated": negated,
            "target": target,
        }),
        Expr::Not(inner) => json!({ "kind": "not", "operand": expr_to_json(inner) }),
        Expr::And(children) => json!({
            "kind": "and",
            "children": children.iter().map(expr_to_json).collect::<Vec<_>>(),
        }),
        Expr::Or(children) => json!({
            "kind": "or",
            "children": children.iter().map(expr_to_json).collect::<Vec<_>>(),
        }),
    }
}

/// Whole numbers become JSON integers, other decimals JSON floats; text stays
/// text.
fn compare_value_to_json(value: &CompareValue) -> Value {
    match value {
        CompareValue::Number(n) if n.scale() == 0 => match n.to_i64() {
            Some(i) => Value::from(i),
            None => Value::String(n.to_string()),
        },
        CompareValue::Number(n) => n
            .to_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(n.to_string())),
        CompareValue::Text(s) => Value::String(s.clone()),
    }
}
