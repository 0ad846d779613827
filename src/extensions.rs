use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// The set of optional grammar relaxations accepted by a parser.
///
/// Extensions are selected when the parser is constructed and are immutable
/// afterwards. Individual flags combine with `|`:
///
/// ```
/// use peejay::Extensions;
///
/// let ext = Extensions::SINGLE_LINE_COMMENTS | Extensions::ARRAY_TRAILING_COMMA;
/// assert!(ext.contains(Extensions::ARRAY_TRAILING_COMMA));
/// assert!(!ext.contains(Extensions::SINGLE_QUOTE_STRING));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extensions(u16);

impl Extensions {
    /// Strict RFC 8259 grammar; no relaxations.
    pub const NONE: Extensions = Extensions(0);

    /// Allow `# …` single-line comments.
    pub const BASH_COMMENTS: Extensions = Extensions(1 << 0);

    /// Allow `// …` single-line comments.
    pub const SINGLE_LINE_COMMENTS: Extensions = Extensions(1 << 1);

    /// Allow `/* … */` comments.
    pub const MULTI_LINE_COMMENTS: Extensions = Extensions(1 << 2);

    /// Allow a trailing comma before an array's closing bracket.
    pub const ARRAY_TRAILING_COMMA: Extensions = Extensions(1 << 3);

    /// Allow a trailing comma before an object's closing brace.
    pub const OBJECT_TRAILING_COMMA: Extensions = Extensions(1 << 4);

    /// Allow strings enclosed by single quotes.
    pub const SINGLE_QUOTE_STRING: Extensions = Extensions(1 << 5);

    /// Allow a `+` sign before a number.
    pub const LEADING_PLUS: Extensions = Extensions(1 << 6);

    /// Accept the full Unicode whitespace class between tokens.
    pub const EXTRA_WHITESPACE: Extensions = Extensions(1 << 7);

    /// Allow an ECMAScript IdentifierName as an object key.
    pub const IDENTIFIER_OBJECT_KEY: Extensions = Extensions(1 << 8);

    /// Allow the additional string escapes `\0`, `\v`, `\x`, `\'`, and
    /// escaped line continuations.
    pub const STRING_ESCAPES: Extensions = Extensions(1 << 9);

    /// Relaxed numbers: hexadecimal integers, leading/trailing decimal
    /// points, `Infinity`, and `NaN`.
    pub const NUMBERS: Extensions = Extensions(1 << 10);

    /// Every extension enabled.
    pub const ALL: Extensions = Extensions((1 << 11) - 1);

    /// Check whether any of the flags in `flags` is a member of this set.
    pub fn contains(self, flags: Extensions) -> bool {
        self.0 & flags.0 != 0
    }

    /// True if no extension is enabled.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Extensions {
    type Output = Extensions;

    fn bitor(self, rhs: Extensions) -> Extensions {
        Extensions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Extensions {
    fn bitor_assign(&mut self, rhs: Extensions) {
        self.0 |= rhs.0;
    }
}

/// The error returned when an extension name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownExtensionError(String);

impl fmt::Display for UnknownExtensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown extension name: `{}'", self.0)
    }
}

impl std::error::Error for UnknownExtensionError {}

impl FromStr for Extensions {
    type Err = UnknownExtensionError;

    /// Parse a single extension name. The names match the constant names
    /// (lower-cased), plus `all` and `none`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Extensions::NONE),
            "bash_comments" => Ok(Extensions::BASH_COMMENTS),
            "single_line_comments" => Ok(Extensions::SINGLE_LINE_COMMENTS),
            "multi_line_comments" => Ok(Extensions::MULTI_LINE_COMMENTS),
            "array_trailing_comma" => Ok(Extensions::ARRAY_TRAILING_COMMA),
            "object_trailing_comma" => Ok(Extensions::OBJECT_TRAILING_COMMA),
            "single_quote_string" => Ok(Extensions::SINGLE_QUOTE_STRING),
            "leading_plus" => Ok(Extensions::LEADING_PLUS),
            "extra_whitespace" => Ok(Extensions::EXTRA_WHITESPACE),
            "identifier_object_key" => Ok(Extensions::IDENTIFIER_OBJECT_KEY),
            "string_escapes" => Ok(Extensions::STRING_ESCAPES),
            "numbers" => Ok(Extensions::NUMBERS),
            "all" => Ok(Extensions::ALL),
            _ => Err(UnknownExtensionError(s.to_owned())),
        }
    }
}
