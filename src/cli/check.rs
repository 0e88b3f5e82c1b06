//! Parse expressions and report their canonical form or diagnostics

use tracing::info;

use super::{CliError, expr_to_json};
use crate::{Lexer, Parser, ParserConfig};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Expressions to check, one per entry
    pub expressions: Vec<String>,
    /// Emit the tree as JSON instead of canonical text
    pub json: bool,
    /// Constant keys and other parser settings
    pub config: ParserConfig,
}

/// What became of one expression
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Canonical text
    Canonical(String),
    /// Expression tree as JSON
    Json(serde_json::Value),
    /// Rendered diagnostics
    Failed(String),
}

/// Result of checking one expression
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub input: String,
    pub outcome: CheckOutcome,
}

impl CheckReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Failed(_))
    }
}

/// Parse every expression in `options`, one fresh parse per expression.
pub fn execute_check(options: &CheckOptions) -> Result<Vec<CheckReport>, CliError> {
    if options.expressions.is_empty() {
        return Err(CliError::NoInput);
    }

    let mut parser = Parser::with_config(options.config.clone());
    let reports: Vec<CheckReport> = options
        .expressions
        .iter()
        .map(|input| {
            let outcome = match parser.parse(input) {
                Some(expr) if options.json => CheckOutcome::Json(expr_to_json(&expr)),
                Some(expr) => CheckOutcome::Canonical(expr.serialize()),
                None => CheckOutcome::Failed(parser.diagnostics().to_string()),
            };
            CheckReport {
                input: input.clone(),
                outcome,
            }
        })
        .collect();

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    info!(checked = reports.len(), failed, "check finished");
    Ok(reports)
}

/// Token stream of `expression` as JSON lines, followed by any rendered
/// lexing errors.
pub fn execute_tokens(expression: &str) -> Result<(Vec<String>, Vec<String>), CliError> {
    let (tokens, errors) = Lexer::tokenize(expression);
    let lines = tokens
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    let errors = errors.iter().map(Lexer::report_error).collect();
    Ok((lines, errors))
}
