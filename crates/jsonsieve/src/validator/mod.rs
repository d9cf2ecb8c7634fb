//! The incremental validator.
//!
//! Overview
//! - Input is consumed one character at a time and every decision is final:
//!   nothing is re-read and no parse tree is built. Memory is bounded by the
//!   nesting depth plus the longest single string token.
//! - Inside a string, characters go to the string sub-machine
//!   (`StringScanner`). Outside, they go to the context machine, whose `Mode`
//!   says which token class is legal next and which consults the bounded
//!   `NestingStack` for brackets and commas.
//! - After each accepted character the running [`Status`] is recomputed. An
//!   unclosed structure is never an error by itself; only
//!   [`Validator::finalize`] reports it.
//! - The first error freezes the instance: it stays [`Status::Invalid`] and
//!   further input is ignored without raising the error again.
//!
//! # Examples
//!
//! ```rust
//! use jsonsieve::{Status, Validator};
//!
//! let mut validator = Validator::new();
//! validator.feed(r#"{"key":"#).unwrap();
//! assert_eq!(validator.status(), Status::Incomplete);
//! validator.feed(r#""value"}"#).unwrap();
//! assert_eq!(validator.status(), Status::Valid);
//! validator.finalize().unwrap();
//! ```

mod escape_buffer;
mod nesting;
mod string;
mod utf8;

use core::fmt;

use log::{debug, trace};
use nesting::{ContainerKind, NestingStack};
use string::{ScanStep, StringRole, StringScanner, check_key};
use utf8::Utf8Carry;

use crate::{
    error::{ErrorKind, Position, ValidationError},
    options::ValidatorOptions,
};

/// Classification of the input seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// No character has been accepted yet.
    Empty,
    /// A complete document has been closed and nothing is pending.
    Valid,
    /// The input is a valid prefix of a document.
    Incomplete,
    /// A syntax error was reported; the instance is frozen.
    Invalid,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Empty => "empty",
            Status::Valid => "valid",
            Status::Incomplete => "incomplete",
            Status::Invalid => "invalid",
        })
    }
}

/// Which token class is legal next when outside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    AwaitingStart,
    AwaitingKey,
    AwaitingColon,
    AwaitingValue,
    AwaitingCommaOrEnd,
    /// Inside an unquoted array element.
    BareElement,
    /// A root container has been closed.
    Complete,
}

/// Characters that may appear in an unquoted array element.
fn is_bare_char(c: char) -> bool {
    !c.is_control() && !matches!(c, '{' | '}' | '[' | ']' | ',' | ':' | '"')
}

/// An incremental syntax validator for one stream.
///
/// Characters are fed with [`accept`](Self::accept) (or the chunked
/// [`feed`](Self::feed) and [`feed_bytes`](Self::feed_bytes)) and the
/// classification of the input so far is read with
/// [`status`](Self::status). One instance validates one stream; there is no
/// way to recover from an error, so start a new instance to retry.
///
/// # Examples
///
/// ```rust
/// use jsonsieve::{ErrorKind, Status, Validator};
///
/// let mut validator = Validator::new();
/// let err = validator.feed(r#"{"a":"b",}"#).unwrap_err();
/// assert_eq!(err.kind(), &ErrorKind::TrailingComma('}'));
/// assert_eq!(validator.status(), Status::Invalid);
///
/// // Frozen: further input is ignored.
/// assert!(validator.accept('{').is_ok());
/// assert_eq!(validator.status(), Status::Invalid);
/// ```
#[derive(Debug)]
pub struct Validator {
    options: ValidatorOptions,
    stack: NestingStack,
    mode: Mode,
    string: StringScanner,
    /// Armed by a comma, disarmed when the next key or value begins.
    trailing_comma: bool,
    invalid: bool,
    status: Status,
    position: Position,
    utf8: Utf8Carry,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a validator for the strict grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ValidatorOptions::default())
    }

    /// Creates a validator with the given options.
    #[must_use]
    pub fn with_options(options: ValidatorOptions) -> Self {
        Self {
            stack: NestingStack::new(options.max_depth),
            options,
            mode: Mode::AwaitingStart,
            string: StringScanner::new(),
            trailing_comma: false,
            invalid: false,
            status: Status::Empty,
            position: Position::start(),
            utf8: Utf8Carry::new(),
        }
    }

    /// The classification of the input accepted so far.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// The options this validator was created with.
    #[must_use]
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// The number of currently open containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// The position of the next character.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether an error has been reported.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Accepts a single character.
    ///
    /// # Errors
    ///
    /// Returns the violation if `c` cannot continue the document. The error
    /// is reported once: afterwards the validator is frozen and every call
    /// returns `Ok(())` without looking at its input.
    pub fn accept(&mut self, c: char) -> Result<(), ValidationError> {
        if self.invalid {
            return Ok(());
        }

        let step = if self.string.is_open() {
            self.step_string(c)
        } else {
            self.step_context(c)
        };

        match step {
            Ok(()) => {
                self.position.advance(c);
                self.update_status();
                Ok(())
            }
            Err(kind) => Err(self.fail(kind)),
        }
    }

    /// Accepts every character of `chunk`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first violation, as [`accept`](Self::accept) does.
    pub fn feed(&mut self, chunk: &str) -> Result<(), ValidationError> {
        for c in chunk.chars() {
            if self.invalid {
                break;
            }
            self.accept(c)?;
        }
        Ok(())
    }

    /// Accepts UTF-8 encoded bytes.
    ///
    /// A multi-byte character may be split across calls.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidUtf8`] for bytes that are not UTF-8, or the
    /// first violation in the decoded characters.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<(), ValidationError> {
        if self.invalid {
            return Ok(());
        }

        let mut utf8 = core::mem::take(&mut self.utf8);
        let result = utf8.decode(bytes, |item| match item {
            Ok(c) => self.accept(c),
            Err(byte) => Err(self.fail(ErrorKind::InvalidUtf8(byte))),
        });
        self.utf8 = utf8;
        result
    }

    /// Declares the end of input.
    ///
    /// The running status never treats open containers as an error, since
    /// more input may arrive. Once the caller knows none will, this reports
    /// them. On success the status is left unchanged, so input that never
    /// started a document stays `Empty` or `Incomplete`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::UnclosedStructure`] if containers are still open.
    /// - [`ErrorKind::InvalidUtf8`] if [`feed_bytes`](Self::feed_bytes) left
    ///   an unfinished UTF-8 sequence.
    ///
    /// Like [`accept`](Self::accept), a failure freezes the validator, and an
    /// already frozen validator returns `Ok(())`.
    pub fn finalize(&mut self) -> Result<(), ValidationError> {
        if self.invalid {
            return Ok(());
        }
        if let Some(byte) = self.utf8.dangling() {
            return Err(self.fail(ErrorKind::InvalidUtf8(byte)));
        }
        if self.stack.is_empty() {
            return Ok(());
        }

        let depth = self.stack.depth();
        Err(self.fail(ErrorKind::UnclosedStructure { depth }))
    }

    // ------------------------------------------------------------------------------------------------
    // String sub-machine
    // ------------------------------------------------------------------------------------------------

    fn step_string(&mut self, c: char) -> Result<(), ErrorKind> {
        match self.string.step(c)? {
            ScanStep::Continue => {}
            ScanStep::Closed(StringRole::Key) => {
                check_key(self.string.token(), self.options.key_format)?;
                self.mode = Mode::AwaitingColon;
            }
            ScanStep::Closed(StringRole::Value) => {
                self.stack.mark_entry();
                self.mode = Mode::AwaitingCommaOrEnd;
            }
        }
        Ok(())
    }

    fn begin_string(&mut self, role: StringRole) {
        self.trailing_comma = false;
        self.string.begin(role);
    }

    // ------------------------------------------------------------------------------------------------
    // Context machine
    // ------------------------------------------------------------------------------------------------

    fn step_context(&mut self, c: char) -> Result<(), ErrorKind> {
        if self.options.is_whitespace(c) {
            if self.mode == Mode::BareElement {
                self.mode = Mode::AwaitingCommaOrEnd;
            }
            return Ok(());
        }
        match self.mode {
            Mode::AwaitingStart => self.start_document(c),
            Mode::AwaitingKey => match c {
                '"' => {
                    self.begin_string(StringRole::Key);
                    Ok(())
                }
                '}' | ']' => self.close(c),
                ',' => Err(ErrorKind::UnexpectedComma),
                _ => Err(ErrorKind::ExpectedKey(c)),
            },
            Mode::AwaitingColon => match c {
                ':' => {
                    self.mode = Mode::AwaitingValue;
                    Ok(())
                }
                _ => Err(ErrorKind::ExpectedColon(c)),
            },
            Mode::AwaitingValue => self.expect_value(c),
            Mode::AwaitingCommaOrEnd => self.expect_comma_or_end(c),
            Mode::BareElement if is_bare_char(c) => Ok(()),
            Mode::BareElement => self.expect_comma_or_end(c),
            Mode::Complete if self.options.allow_multiple_documents || matches!(c, '}' | ']') => {
                self.start_document(c)
            }
            Mode::Complete => Err(ErrorKind::UnexpectedCharacter(c)),
        }
    }

    fn start_document(&mut self, c: char) -> Result<(), ErrorKind> {
        match c {
            '{' => self.open(ContainerKind::Object),
            '[' if self.options.allow_array_root => self.open(ContainerKind::Array),
            '}' | ']' => Err(ErrorKind::UnexpectedClosingBracket(c)),
            _ => Err(ErrorKind::DocumentMustStartWithObject(c)),
        }
    }

    fn expect_value(&mut self, c: char) -> Result<(), ErrorKind> {
        if let Some(kind) = ContainerKind::from_open(c) {
            return self.open(kind);
        }

        match c {
            '"' => {
                self.begin_string(StringRole::Value);
                Ok(())
            }
            // An array may close here when empty or after a trailing comma;
            // `close` reports which.
            '}' | ']' if self.stack.top_is_array() => self.close(c),
            '}' | ']' => Err(ErrorKind::ExpectedValue(c)),
            ',' => Err(ErrorKind::UnexpectedComma),
            _ if self.options.allow_bare_array_elements
                && self.stack.top_is_array()
                && is_bare_char(c) =>
            {
                self.trailing_comma = false;
                self.stack.mark_entry();
                self.mode = Mode::BareElement;
                Ok(())
            }
            _ => Err(ErrorKind::UnexpectedCharacter(c)),
        }
    }

    fn expect_comma_or_end(&mut self, c: char) -> Result<(), ErrorKind> {
        match c {
            ',' => {
                self.trailing_comma = true;
                self.mode = if self.stack.top_is_object() {
                    Mode::AwaitingKey
                } else {
                    Mode::AwaitingValue
                };
                Ok(())
            }
            '}' | ']' => self.close(c),
            _ => Err(ErrorKind::ExpectedCommaOrClose(c)),
        }
    }

    fn open(&mut self, kind: ContainerKind) -> Result<(), ErrorKind> {
        self.stack.open(kind)?;
        self.trailing_comma = false;
        self.mode = match kind {
            ContainerKind::Object => Mode::AwaitingKey,
            ContainerKind::Array => Mode::AwaitingValue,
        };
        trace!("open {kind:?}, depth {}", self.stack.depth());
        Ok(())
    }

    fn close(&mut self, c: char) -> Result<(), ErrorKind> {
        let Some(kind) = ContainerKind::from_close(c) else {
            return Err(ErrorKind::UnexpectedCharacter(c));
        };
        self.stack.check_close(kind)?;
        if self.trailing_comma {
            return Err(ErrorKind::TrailingComma(c));
        }
        if !self.stack.top_has_entry() && !self.options.allow_empty_containers {
            return Err(ErrorKind::EmptyContainerNotAllowed(c));
        }

        let parent = self.stack.close(kind)?;
        trace!("close {kind:?}, depth {}", self.stack.depth());
        if parent.is_some() {
            self.stack.mark_entry();
            self.mode = Mode::AwaitingCommaOrEnd;
        } else {
            debug!("document complete at {}", self.position);
            self.mode = Mode::Complete;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------------------------------
    // Status & errors
    // ------------------------------------------------------------------------------------------------

    fn update_status(&mut self) {
        self.status = if self.invalid {
            Status::Invalid
        } else if self.position.offset == 0 {
            Status::Empty
        } else if self.mode == Mode::Complete && self.stack.is_empty() && !self.string.is_open() {
            Status::Valid
        } else {
            Status::Incomplete
        };
    }

    fn fail(&mut self, kind: ErrorKind) -> ValidationError {
        self.invalid = true;
        self.status = Status::Invalid;
        let err = ValidationError {
            kind,
            position: self.position,
        };
        debug!("validation failed: {err}");
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(!self.options.panic_on_error, "{err}");
        err
    }
}

/// Validates a complete document in one call.
///
/// # Errors
///
/// Returns the first violation, including [`ErrorKind::UnclosedStructure`]
/// for a truncated document.
///
/// # Examples
///
/// ```rust
/// use jsonsieve::{ErrorKind, ValidatorOptions, validate};
///
/// assert!(validate(r#"{"a":["b",{"c":"d"}]}"#, ValidatorOptions::default()).is_ok());
///
/// let err = validate(r#"{"a":"#, ValidatorOptions::default()).unwrap_err();
/// assert_eq!(err.kind(), &ErrorKind::UnclosedStructure { depth: 1 });
/// ```
pub fn validate(text: &str, options: ValidatorOptions) -> Result<(), ValidationError> {
    let mut validator = Validator::with_options(options);
    validator.feed(text)?;
    validator.finalize()
}
