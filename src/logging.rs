//! Logging setup for the command-line tool.
//!
//! Logs go to stderr so that canonical output and diagnostics on stdout can
//! be piped.

use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Environment variable consulted when `--log-level` is not given.
pub const LOG_LEVEL_ENV: &str = "CTXKEY_LOG_LEVEL";

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::new(level.as_filter_str())
}

/// Install a stderr subscriber at `level`.
///
/// If a global subscriber is already set the call does nothing; the first
/// one wins.
pub fn init_logging(level: LogLevel) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
