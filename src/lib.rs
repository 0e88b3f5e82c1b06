pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod logging;

pub use ast::{CompareOp, Expr, Token, TokenKind};
pub use config::{ConfigError, ConstantKeys, LogLevel, ParserConfig};
pub use diagnostics::Diagnostics;
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser, parse};
pub use value::CompareValue;
