use core::fmt;

use thiserror::Error;

/// Where in the stream an error was detected.
///
/// `offset` counts the characters consumed before the offending one, `line`
/// and `column` are 1-based and point at the offending character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Zero-based character offset.
    pub offset: usize,
    /// One-based line number.
    pub line: usize,
    /// One-based column number.
    pub column: usize,
}

impl Position {
    pub(crate) const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn advance(&mut self, c: char) {
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A syntax violation reported by [`Validator`](crate::Validator).
///
/// Every error is fatal to the stream that produced it: the validator stays
/// [`Status::Invalid`](crate::Status::Invalid) afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {position}")]
pub struct ValidationError {
    pub(crate) kind: ErrorKind,
    pub(crate) position: Position,
}

impl ValidationError {
    /// The category of the violation.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Where the violation was detected.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }
}

/// The kinds of syntax violation.
///
/// Variants carry the offending character where there is one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The first significant character was not `{` (or `[` when array roots
    /// are allowed).
    #[error("document must start with '{{', found {}", Quoted(.0))]
    DocumentMustStartWithObject(char),
    /// Opening another container would exceed the configured depth.
    #[error("maximum nesting depth of {max} exceeded")]
    MaxNestingDepthExceeded {
        /// The configured maximum.
        max: usize,
    },
    /// A closing bracket with no open container.
    #[error("unexpected closing bracket {}", Quoted(.0))]
    UnexpectedClosingBracket(char),
    /// A closing bracket that does not match the innermost open container.
    #[error("mismatched closing bracket: expected {}, found {}", Quoted(.expected), Quoted(.found))]
    MismatchedClosingBracket {
        /// The bracket that would close the innermost container.
        expected: char,
        /// The bracket that was seen.
        found: char,
    },
    /// An object member name was required.
    #[error("expected a double-quoted key, found {}", Quoted(.0))]
    ExpectedKey(char),
    /// A `:` was required after an object key.
    #[error("expected ':' after key, found {}", Quoted(.0))]
    ExpectedColon(char),
    /// An object member value was required.
    #[error("expected a value, found {}", Quoted(.0))]
    ExpectedValue(char),
    /// A `,` or a closing bracket was required after an entry.
    #[error("expected ',' or closing bracket, found {}", Quoted(.0))]
    ExpectedCommaOrClose(char),
    /// A `,` with no entry before it.
    #[error("unexpected ','")]
    UnexpectedComma,
    /// A closing bracket directly after a `,`.
    #[error("trailing comma before {}", Quoted(.0))]
    TrailingComma(char),
    /// A container closed without any entry.
    #[error("empty container closed by {} is not allowed", Quoted(.0))]
    EmptyContainerNotAllowed(char),
    /// An object key with no characters.
    #[error("object keys must not be empty")]
    EmptyKey,
    /// An object key whose first character is not a letter.
    #[error("object keys must start with a letter, found {}", Quoted(.0))]
    InvalidKeyStart(char),
    /// An object key containing something other than letters and digits.
    #[error("object keys may only contain letters and digits, found {}", Quoted(.0))]
    InvalidKeyCharacter(char),
    /// A backslash followed by something other than a legal escape.
    #[error("invalid escape sequence: backslash followed by {}", Quoted(.0))]
    InvalidEscapeSequence(char),
    /// A raw control character (below U+0020) inside a string.
    #[error("invalid control character {} in string", Quoted(.0))]
    InvalidControlCharacterInString(char),
    /// A character that is never legal at this point.
    #[error("unexpected character {}", Quoted(.0))]
    UnexpectedCharacter(char),
    /// Input ended with open containers.
    #[error("unclosed structure: {depth} container(s) still open")]
    UnclosedStructure {
        /// How many containers were still open.
        depth: usize,
    },
    /// A byte that does not start or continue a valid UTF-8 sequence.
    #[error("invalid UTF-8 byte 0x{0:02X}")]
    InvalidUtf8(u8),
}

/// Renders a character for diagnostics, escaping the invisible ones.
struct Quoted<'a>(&'a char);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            '\'' => f.write_str("'\\''"),
            '\\' => f.write_str("'\\\\'"),
            '\n' => f.write_str("'\\n'"),
            '\r' => f.write_str("'\\r'"),
            '\t' => f.write_str("'\\t'"),
            '\0' => f.write_str("'\\0'"),
            c if c.is_control() => write!(f, "U+{:04X}", c as u32),
            c if c.is_whitespace() && !c.is_ascii_whitespace() => write!(f, "U+{:04X}", c as u32),
            c => write!(f, "'{c}'"),
        }
    }
}
