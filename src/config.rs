//! Parser configuration.
//!
//! Some context keys describe the host and can never change while a program
//! runs (`isMac`, `isWeb`, ...). The parser folds them to constants while it
//! builds an expression, so `isLinux && editorFocus` is just `editorFocus` on
//! Linux and `false` everywhere else.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while building configuration from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown log level '{0}', expected one of: trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("invalid constant '{0}', expected KEY=true or KEY=false")]
    InvalidConstant(String),
}

/// Keys with a value fixed at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstantKeys {
    values: BTreeMap<String, bool>,
}

impl ConstantKeys {
    /// No constant keys at all.
    pub fn empty() -> Self {
        ConstantKeys::default()
    }

    /// Platform keys describing the machine this crate was compiled for.
    pub fn for_host() -> Self {
        let is_mac = cfg!(target_os = "macos");
        let is_ios = cfg!(target_os = "ios");
        let is_web = cfg!(target_family = "wasm");

        let mut keys = ConstantKeys::empty();
        keys.insert("isMac", is_mac);
        keys.insert("isLinux", cfg!(target_os = "linux"));
        keys.insert("isWindows", cfg!(target_os = "windows"));
        keys.insert("isWeb", is_web);
        keys.insert("isMacNative", is_mac && !is_web);
        keys.insert("isIOS", is_ios);
        keys.insert("isMobile", is_ios || cfg!(target_os = "android"));
        keys.insert("isEdge", false);
        keys.insert("isFirefox", false);
        keys.insert("isChrome", false);
        keys.insert("isSafari", false);
        keys
    }

    pub fn insert(&mut self, key: impl Into<String>, value: bool) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Add every entry of `other`, replacing existing values.
    pub fn merge(&mut self, other: ConstantKeys) {
        self.values.extend(other.values);
    }
}

/// Parses a `KEY=true` / `KEY=false` override.
impl FromStr for ConstantKeys {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidConstant(s.to_string()))?;
        let key = key.trim();
        let value = match value.trim() {
            "true" => true,
            "false" => false,
            _ => return Err(ConfigError::InvalidConstant(s.to_string())),
        };
        if key.is_empty() {
            return Err(ConfigError::InvalidConstant(s.to_string()));
        }

        let mut keys = ConstantKeys::empty();
        keys.insert(key, value);
        Ok(keys)
    }
}

/// Settings for a [`crate::Parser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    pub constants: ConstantKeys,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            constants: ConstantKeys::for_host(),
        }
    }
}

impl ParserConfig {
    /// Treat every key as a runtime value.
    pub fn without_constants() -> Self {
        ParserConfig {
            constants: ConstantKeys::empty(),
        }
    }

    #[must_use]
    pub fn with_constant(mut self, key: impl Into<String>, value: bool) -> Self {
        self.constants.insert(key, value);
        self
    }
}

/// Log level for the command-line tool.
///
/// Defaults to `Warn` so diagnostics on stdout stay uncluttered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::UnknownLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
