// tests/parser_tests.rs

use contextkey::ast::{CompareOp, Expr, TokenKind};
use contextkey::parser::Parser;
use contextkey::{CompareValue, ParserConfig};
use rstest::rstest;

/// Canonical text on success, the rendered diagnostics otherwise.
fn render(input: &str) -> String {
    let mut parser = Parser::new();
    match parser.parse(input) {
        Some(expr) => expr.serialize(),
        None => parser.diagnostics().to_string(),
    }
}

fn parse_plain(input: &str) -> Expr {
    Parser::with_config(ParserConfig::without_constants())
        .parse(input)
        .unwrap_or_else(|| panic!("failed to parse {input:?}"))
}

// ============================================================================
// Canonical output
// ============================================================================

#[rstest]
#[case("!true && foo", "false")]
#[case(
    "!isAppcanProject && !inDebugMode && 1===2",
    "(!inDebugMode && !isAppcanProject && 1 == '2')"
)]
#[case(" foo", "foo")]
#[case("!foo", "!foo")]
#[case("foo =~ /bar/", "foo =~ /bar/")]
#[case("foo || (foo =~ /bar/ && baz)", "(foo || (baz && foo =~ /bar/))")]
#[case("foo || (foo =~ /bar/ || baz)", "(baz || foo || foo =~ /bar/)")]
#[case("foo && foo =~ /zee/i", "(foo && foo =~ /zee/i)")]
#[case("foo.bar==enabled", "foo.bar == 'enabled'")]
#[case("foo.bar == 'enabled'", "foo.bar == 'enabled'")]
#[case("foo.bar:zed==completed", "foo.bar:zed == 'completed'")]
#[case("a && b || c", "(c || (a && b))")]
#[case(
    "fooBar && baz.jar && fee.bee<K-loo+1>",
    "(baz.jar && fee.bee<K-loo+1> && fooBar)"
)]
#[case("foo.barBaz<C-r> < 2", "foo.barBaz<C-r> < 2")]
#[case("foo.bar >= -1", "foo.bar >= -1")]
#[case(
    "view == vsc-packages-activitybar-folders && vsc-packages-folders-loaded",
    "(vsc-packages-folders-loaded && view == 'vsc-packages-activitybar-folders ')"
)]
#[case("foo.bar <= -1", "foo.bar <= -1")]
#[case(
    "!cmake:hideBuildCommand \u{0026}\u{0026} cmake:enableFullFeatureSet",
    "(cmake:enableFullFeatureSet && !cmake:hideBuildCommand)"
)]
fn test_canonical_output(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input), expected);
}

#[test]
fn test_platform_constant_folds() {
    let expected = if cfg!(target_os = "macos") {
        "foo"
    } else {
        "(foo && foo =~ /bar/)"
    };
    assert_eq!(render("foo && (foo =~ /bar/ || isMac)"), expected);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[rstest]
#[case(
    "!foo &&  in bar",
    "Parsing errors:\n\nExpected 'true', 'false', '(', KEY, KEY '=~' regex, KEY [ ('==' | '!=' | '<' | '<=' | '>' | '>=' | 'in' | 'not' 'in') value ] but got {\"type\":\"in\",\"offset\":9}\n"
)]
#[case(
    "view =~ '/(servers)/' && viewItem =~ /^(Starting|Started|Debugging|Stopping|Stopped|Unknown)/'",
    "Lexing errors:\n\nUnexpected token ''' at offset 93\n"
)]
#[case(
    "debugState == \"stopped\"",
    "Parsing errors:\n\nUnexpected token '\"' at offset 22\n"
)]
#[case(
    "vim<c-r>==1 && vim<2<=3",
    "Lexing errors:\n\nUnexpected token '=' at offset 21. Did you mean '==' or '=~'?\n"
)]
#[case(
    " viewItem == VSCode WorkSpace",
    "Parsing errors:\n\nUnexpected token 'WorkSpace' at offset 20\n"
)]
#[case(
    "foo && 'bar",
    "Lexing errors:\n\nUnexpected token ''bar' at offset 7. Did you forget to close the string?\n"
)]
#[case("!(foo && bar)", "Parsing errors:\n\nExpected KEY, 'true', or 'false'\n")]
fn test_error_reports(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input), expected);
}

#[rstest]
#[case("", "Empty context key expression")]
#[case("   ", "Empty context key expression")]
#[case("(foo", "Expected ')' but got {\"type\":\"eof\",\"offset\":4}")]
#[case("foo ==", "Expected KEY or STRING but got {\"type\":\"eof\",\"offset\":6}")]
#[case("foo < )", "Expected KEY or STRING but got {\"type\":\"rparen\",\"offset\":6}")]
#[case("foo in 'x'", "Expected KEY but got {\"type\":\"string\",\"offset\":7}")]
#[case("foo =~ bar", "Expected REGEX but got {\"type\":\"key\",\"offset\":7}")]
#[case("foo =~ /(/", "Expected REGEX but got {\"type\":\"regex\",\"offset\":7}")]
#[case("foo =~ 'bar'", "Expected REGEX but got {\"type\":\"string\",\"offset\":7}")]
#[case("foo && ", "Expected 'true', 'false', '(', KEY, KEY '=~' regex, KEY [ ('==' | '!=' | '<' | '<=' | '>' | '>=' | 'in' | 'not' 'in') value ] but got {\"type\":\"eof\",\"offset\":7}")]
#[case("foo bar", "Unexpected token 'bar' at offset 4")]
#[case("a || )", "Expected 'true', 'false', '(', KEY, KEY '=~' regex, KEY [ ('==' | '!=' | '<' | '<=' | '>' | '>=' | 'in' | 'not' 'in') value ] but got {\"type\":\"rparen\",\"offset\":5}")]
fn test_parse_error_messages(#[case] input: &str, #[case] message: &str) {
    let mut parser = Parser::new();
    assert!(parser.parse(input).is_none());
    assert!(parser.lexing_errors().is_empty());
    assert_eq!(parser.parsing_errors().len(), 1);
    assert_eq!(parser.parsing_errors()[0].message, message);
}

#[test]
fn test_parse_error_carries_token() {
    let mut parser = Parser::new();
    assert!(parser.parse("!foo &&  in bar").is_none());
    let error = &parser.parsing_errors()[0];
    assert_eq!(error.token.kind, TokenKind::In);
    assert_eq!(error.token.offset, 9);
    assert_eq!(error.to_string(), error.message);
}

#[test]
fn test_lexing_errors_skip_parsing() {
    let mut parser = Parser::new();
    assert!(parser.parse("a = b c d").is_none());
    assert_eq!(parser.lexing_errors().len(), 1);
    assert!(parser.parsing_errors().is_empty());
}

#[test]
fn test_errors_reset_between_calls() {
    let mut parser = Parser::new();
    assert!(parser.parse("foo && 'bar").is_none());
    assert!(parser.parse("foo").is_some());
    assert!(parser.lexing_errors().is_empty());
    assert!(parser.parsing_errors().is_empty());
    assert!(parser.diagnostics().is_empty());
}

#[test]
fn test_try_parse_and_free_function() {
    let err = contextkey::parse("!(a)").unwrap_err();
    assert_eq!(err.parsing.len(), 1);
    assert_eq!(
        contextkey::parse("b && a").unwrap(),
        Expr::And(vec![Expr::key_exists("a"), Expr::key_exists("b")])
    );
}

// ============================================================================
// Tree shape
// ============================================================================

#[test]
fn test_or_chain_is_flat() {
    assert_eq!(
        parse_plain("a || b || c || d"),
        Expr::Or(vec![
            Expr::key_exists("a"),
            Expr::key_exists("b"),
            Expr::key_exists("c"),
            Expr::key_exists("d"),
        ])
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = parse_plain("a || b && c");
    assert_eq!(
        expr,
        Expr::Or(vec![
            Expr::key_exists("a"),
            Expr::And(vec![Expr::key_exists("b"), Expr::key_exists("c")]),
        ])
    );
}

#[test]
fn test_numeric_looking_key_stays_a_key() {
    assert_eq!(parse_plain("1==2"), Expr::equals("1", "2"));
    assert_eq!(parse_plain("1"), Expr::key_exists("1"));
}

#[test]
fn test_relational_values() {
    assert_eq!(
        parse_plain("size > 1.50"),
        Expr::compare(CompareOp::Greater, "size", CompareValue::from_lexeme("1.5"))
    );
    assert_eq!(
        parse_plain("channel <= 'beta'"),
        Expr::compare(
            CompareOp::LessEqual,
            "channel",
            CompareValue::Text("beta".into())
        )
    );
    assert_eq!(parse_plain("k>=-1").serialize(), "k >= -1");
}

#[test]
fn test_equality_value_keywords() {
    assert_eq!(parse_plain("foo == true"), Expr::equals("foo", "true"));
    assert_eq!(parse_plain("languageId == in"), Expr::equals("languageId", "in"));
}

#[test]
fn test_unquoted_value_keeps_gap_before_next_token() {
    assert_eq!(
        parse_plain("a == b  || c"),
        Expr::Or(vec![Expr::key_exists("c"), Expr::equals("a", "b  ")])
    );
    assert_eq!(parse_plain("a == b   "), Expr::equals("a", "b"));
    assert_eq!(
        parse_plain("(a == 'b' )"),
        Expr::equals("a", "b")
    );
}

#[test]
fn test_not_equals() {
    assert_eq!(parse_plain("a != b"), Expr::not_equals("a", "b"));
    assert_eq!(parse_plain("!a == b"), Expr::not_equals("a", "b"));
    assert_eq!(parse_plain("a !== b").serialize(), "a != 'b'");
}

#[test]
fn test_membership() {
    assert_eq!(
        parse_plain("resourceExtname in supportedExts"),
        Expr::in_collection("resourceExtname", "supportedExts")
    );
    assert_eq!(
        parse_plain("resourceExtname not in supportedExts").serialize(),
        "resourceExtname not in supportedExts"
    );
    assert_eq!(
        parse_plain("!a in b"),
        Expr::not_in_collection("a", "b")
    );
}

#[test]
fn test_regex_forms() {
    assert_eq!(
        parse_plain("view =~ '/(servers)/i'"),
        Expr::regex("view", "(servers)", "i")
    );
    assert_eq!(parse_plain("a =~ /x/mi").serialize(), "a =~ /x/im");
    assert_eq!(parse_plain("!a =~ /x/").serialize(), "!a =~ /x/");
}

#[rstest]
#[case(
    r"resourceFilename =~ /^(?!.*\.d\.ts$).*\.ts$/",
    r"resourceFilename =~ /^(?!.*\.d\.ts$).*\.ts$/"
)]
#[case(r"k =~ /(a)\1/", r"k =~ /(a)\1/")]
#[case(r"k =~ /(?<=foo)bar/i", r"k =~ /(?<=foo)bar/i")]
#[case("k =~ '/a/b/'", r"k =~ /a\/b/")]
#[case("k =~ '/[/]x/i'", "k =~ /[/]x/i")]
fn test_regex_text_is_stable(#[case] input: &str, #[case] expected: &str) {
    let once = parse_plain(input).serialize();
    assert_eq!(once, expected);
    assert_eq!(parse_plain(&once).serialize(), once);
}

#[rstest]
#[case("k < 'a b'", "k < 'a b'")]
#[case("k < 'x && y'", "k < 'x && y'")]
#[case("k >= ')'", "k >= ')'")]
#[case("k > 'beta'", "k > beta")]
#[case("k <= '2'", "k <= 2")]
fn test_compare_text_is_stable(#[case] input: &str, #[case] expected: &str) {
    let once = parse_plain(input).serialize();
    assert_eq!(once, expected);
    assert_eq!(parse_plain(&once).serialize(), once);
}

#[test]
fn test_negation_chains() {
    assert_eq!(parse_plain("!!k"), Expr::key_exists("k"));
    assert_eq!(parse_plain("!!!k"), Expr::not(Expr::key_exists("k")));
    assert_eq!(parse_plain("!false"), Expr::Constant(true));
}

// ============================================================================
// Constant keys
// ============================================================================

#[test]
fn test_custom_constants() {
    let config = ParserConfig::without_constants()
        .with_constant("isDev", true)
        .with_constant("isBeta", false);
    let mut parser = Parser::with_config(config);

    assert_eq!(parser.parse("isDev && foo").unwrap(), Expr::key_exists("foo"));
    assert_eq!(parser.parse("isBeta || foo").unwrap(), Expr::key_exists("foo"));
    assert_eq!(parser.parse("!isBeta").unwrap(), Expr::Constant(true));
    assert_eq!(parser.parse("isDev == true").unwrap(), Expr::Constant(true));
    assert_eq!(parser.parse("isDev == 'false'").unwrap(), Expr::Constant(false));
    assert_eq!(parser.parse("isDev != false").unwrap(), Expr::Constant(true));
}

#[test]
fn test_without_constants_keeps_platform_keys() {
    assert_eq!(parse_plain("isMac"), Expr::key_exists("isMac"));
}

#[test]
fn test_host_constants_fold() {
    let mut parser = Parser::new();
    let expected = Expr::Constant(cfg!(target_os = "linux"));
    assert_eq!(parser.parse("isLinux").unwrap(), expected);
    assert_eq!(parser.parse("isWeb || isFirefox").unwrap(), Expr::Constant(false));
}
