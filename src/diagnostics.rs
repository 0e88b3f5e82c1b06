use std::fmt;

use crate::lexer::LexError;
use crate::parser::ParseError;

/// Everything that went wrong in one parse attempt.
///
/// `Display` renders the report shown to configuration authors:
///
/// ```text
/// Lexing errors:
///
/// Unexpected token ''bar' at offset 7. Did you forget to close the string?
///
///  ---
/// Parsing errors:
///
/// ...
/// ```
///
/// Each section appears only when it has entries, and the separator only
/// when both do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub lexing: Vec<LexError>,
    pub parsing: Vec<ParseError>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.lexing.is_empty() && self.parsing.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lexing.len() + self.parsing.len()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.lexing.is_empty() {
            f.write_str("Lexing errors:\n\n")?;
            for error in &self.lexing {
                writeln!(f, "{}", error)?;
            }
        }

        if !self.parsing.is_empty() {
            if !self.lexing.is_empty() {
                f.write_str("\n --- \n")?;
            }
            f.write_str("Parsing errors:\n\n")?;
            for error in &self.parsing {
                writeln!(f, "{}", error.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
