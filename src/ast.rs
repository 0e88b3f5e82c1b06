//! # Context-Key Expressions - Abstract Syntax Tree
//!
//! A context-key expression is a small boolean predicate over named flags
//! (`editorFocus`, `resourceExtname`, `view`, ...) kept by a runtime context
//! store. Menus, commands and views carry one to decide whether they apply.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - The closed set of expression nodes
//! - **[operators]** - Relational comparison operators
//!
//! ## Quick Start
//!
//! ```text
//! editorFocus && resourceExtname == '.rs' && !inDebugMode
//! ```
//!
//! serializes canonically as
//!
//! ```text
//! (editorFocus && !inDebugMode && resourceExtname == '.rs')
//! ```
//!
//! ## Core Concepts
//!
//! ### Precedence
//!
//! From loosest to tightest: `||`, `&&`, `!`, comparisons. Parentheses group.
//!
//! ### Canonical Form
//!
//! Every `&&`/`||` chain is flattened, deduplicated and sorted while it is
//! built, and constants fold away, so two spellings of the same predicate
//! serialize identically.
//!
//! ### Keys Are Opaque
//!
//! The left side of a comparison is always a key name, even when it looks like
//! a number: `1 == 2` compares the key `1` against the string `'2'`.
//!
//! ## Examples
//!
//! ```text
//! foo.bar==enabled            // foo.bar == 'enabled'
//! a && b || c                 // (c || (a && b))
//! foo.bar >= -1               // foo.bar >= -1
//! viewItem =~ /^(Started)/i   // viewItem =~ /^(Started)/i
//! ext in supportedExts        // ext in supportedExts
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::CompareOp;
pub use tokens::{Token, TokenKind};
