//! Documentation content for the ctxkey CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Canonical,
    Errors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "canonical" | "canonical_form" | "normalization" => Some(Self::Canonical),
            "errors" | "diagnostics" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"CONTEXT KEY EXPRESSIONS

A context key expression is a boolean predicate over named flags that a host
application keeps at runtime. It decides whether a menu entry, command or view
applies. ctxkey parses expressions, reports malformed ones and prints their
canonical form.

DOCUMENTATION CATEGORIES

  syntax            Keys, literals, grouping and precedence
  operators         Comparison, regex, membership and logical operators
  canonical         How expressions are normalized and printed
  errors            Lexing and parsing diagnostics

QUICK REFERENCE

  key                   Key is set and truthy
  !key                  Negation
  key == value          String equality (value quoted or bare)
  key >= 2              Ordered comparison
  key =~ /re/i          Regex match
  key in list           Membership
  a && b || c           && binds tighter than ||

Run 'ctxkey doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Canonical) => Ok(CANONICAL_DOC),
        Some(DocCategory::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Keys, Literals and Grouping

GRAMMAR (loosest to tightest)
  or      := and ('||' and)*
  and     := unary ('&&' unary)*
  unary   := '!' unary | primary
  primary := 'true' | 'false' | '(' or ')' | KEY [ tail ]
  tail    := ('==' | '!=' | '<' | '<=' | '>' | '>=' | 'in' | 'not' 'in') value
           | '=~' regex

KEYS
  Letters, digits and _ - . / \ : * ? + [ ] ^ , # @ ; % $
  A <...> suffix belongs to the key:   fee.bee<K-loo+1>   vim<c-r>
  Write spaces around < and <= after a key:   count < 2

LITERALS
  true, false           Boolean constants
  'text'                Quoted string (no escapes)
  /pattern/flags        Regex, flags from igsmyu

NEGATION
  ! applies to a key, a comparison or a literal, never to a group.

    !foo                  ok
    !foo == 'x'           ok, same as foo != 'x'
    !(foo && bar)         error
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

EQUALITY
  ==  ===   Equal, value compared as a string
  !=  !==   Not equal

  Bare and quoted values are the same:
    foo.bar==enabled      foo.bar == 'enabled'

ORDERED COMPARISON
  <  <=  >  >=
  Decimal operands stay numbers, anything else is text. Numbers and single
  words print bare, other text is quoted:
    foo.bar >= -1         channel > beta        label < 'a b'

REGEX
  =~ /pattern/flags
  The pattern must be a valid regular expression. A quoted '/pattern/' is
  accepted too.

MEMBERSHIP
  key in other          Value of key is contained in value of other
  key not in other

LOGICAL
  &&  ||  !
"#;

const CANONICAL_DOC: &str = r#"CANONICAL FORM

Every expression is normalized while it is parsed:

  - constants fold:           !true && foo        -> false
  - double negation cancels:  !!foo               -> foo
  - nested groups flatten:    a || (b || c)       -> (a || b || c)
  - duplicates drop:          a && a              -> a
  - children are sorted by kind, then key:
        a && b || c                               -> (c || (a && b))
        !x && y                                   -> (y && !x)
  - host keys fold: isMac, isLinux, isWindows, isWeb, ... are constants

Every && and || group is printed in parentheses, at every depth.
Printing a canonical form and parsing it again gives the same form.
"#;

const ERRORS_DOC: &str = r#"ERRORS

Lexing errors come first; when there are any, the expression is not parsed.

  Unexpected token ''bar' at offset 7. Did you forget to close the string?
  Unexpected token '=' at offset 21. Did you mean '==' or '=~'?
  Unexpected token '~' at offset 4

Parsing errors name what was expected and the token found:

  Expected 'true', 'false', '(', KEY, ... but got {"type":"in","offset":9}
  Expected KEY, 'true', or 'false'
  Unexpected token 'WorkSpace' at offset 20

Offsets count characters from 0.
"#;
