#![cfg(feature = "cli")]

use contextkey::cli::{
    CheckOptions, CheckOutcome, CliError, execute_check, execute_tokens, get_doc_category,
    get_docs_overview,
};
use contextkey::ParserConfig;
use serde_json::json;

fn check(expressions: &[&str], json: bool) -> Vec<CheckOutcome> {
    let options = CheckOptions {
        expressions: expressions.iter().map(|s| s.to_string()).collect(),
        json,
        config: ParserConfig::without_constants(),
    };
    execute_check(&options)
        .unwrap()
        .into_iter()
        .map(|r| r.outcome)
        .collect()
}

#[test]
fn test_check_canonical_and_failures() {
    let outcomes = check(&["b && a", "foo && 'bar", "!(x)"], false);
    assert_eq!(
        outcomes,
        vec![
            CheckOutcome::Canonical("(a && b)".into()),
            CheckOutcome::Failed(
                "Lexing errors:\n\nUnexpected token ''bar' at offset 7. Did you forget to close the string?\n"
                    .into()
            ),
            CheckOutcome::Failed("Parsing errors:\n\nExpected KEY, 'true', or 'false'\n".into()),
        ]
    );
}

#[test]
fn test_check_json_output() {
    let outcomes = check(&["isMac || foo.bar >= -1"], true);
    assert_eq!(
        outcomes,
        vec![CheckOutcome::Json(json!({
            "kind": "or",
            "children": [
                { "kind": "key_exists", "key": "isMac" },
                { "kind": "compare", "op": ">=", "key": "foo.bar", "value": -1 },
            ],
        }))]
    );
}

#[test]
fn test_check_uses_constants_from_config() {
    let options = CheckOptions {
        expressions: vec!["isDev && foo".into()],
        json: false,
        config: ParserConfig::without_constants().with_constant("isDev", false),
    };
    let reports = execute_check(&options).unwrap();
    assert_eq!(reports[0].input, "isDev && foo");
    assert_eq!(reports[0].outcome, CheckOutcome::Canonical("false".into()));
    assert!(!reports[0].is_failure());
}

#[test]
fn test_check_requires_input() {
    let result = execute_check(&CheckOptions::default());
    assert!(matches!(result, Err(CliError::NoInput)));
}

#[test]
fn test_tokens_command() {
    let (lines, errors) = execute_tokens("a == b").unwrap();
    assert_eq!(
        lines,
        vec![
            r#"{"type":"key","lexeme":"a","offset":0}"#,
            r#"{"type":"eq","lexeme":"==","offset":2}"#,
            r#"{"type":"key","lexeme":"b","offset":5}"#,
            r#"{"type":"eof","lexeme":"","offset":6}"#,
        ]
    );
    assert!(errors.is_empty());

    let (_, errors) = execute_tokens("a = b").unwrap();
    assert_eq!(
        errors,
        vec!["Unexpected token '=' at offset 2. Did you mean '==' or '=~'?"]
    );
}

#[test]
fn test_docs() {
    assert!(get_docs_overview().contains("syntax"));
    assert!(get_doc_category("operators").unwrap().contains("=~"));
    let err = get_doc_category("onboarding").unwrap_err();
    assert!(err.to_string().contains("Unknown category: 'onboarding'"));
}
