//! CLI support for contextkey
//!
//! Provides programmatic access to the `ctxkey` subcommands so other tools can
//! lint or canonicalize expressions without spawning a process.

mod check;
mod convert;
mod docs;

pub use check::{CheckOptions, CheckOutcome, CheckReport, execute_check, execute_tokens};
pub use convert::expr_to_json;
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// One or more expressions did not parse
    #[error("{0} expression(s) failed to parse")]
    Failed(usize),

    /// Invalid flag value
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Nothing to check
    #[error("No expression provided. Pass one as an argument or pipe them to stdin.")]
    NoInput,

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'ctxkey docs' to see available categories.")]
    UnknownCategory(String),
}
