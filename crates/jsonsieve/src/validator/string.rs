use alloc::string::String;

use super::escape_buffer::{EscapeStep, UnicodeEscapeBuffer};
use crate::{error::ErrorKind, options::KeyFormat};

/// What the string being scanned will become once closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringRole {
    Key,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    /// A backslash was consumed.
    Pending,
    /// Inside the hex digits of `\uXXXX`.
    Unicode,
}

/// Outcome of scanning one character inside a string.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ScanStep {
    Continue,
    Closed(StringRole),
}

/// The string/escape sub-machine.
///
/// Resolved characters accumulate in `pending` until the closing quote; the
/// buffer is cleared when the next string begins.
#[derive(Debug)]
pub(crate) struct StringScanner {
    role: Option<StringRole>,
    escape: Escape,
    unicode: UnicodeEscapeBuffer,
    pending: String,
}

impl StringScanner {
    pub(crate) fn new() -> Self {
        Self {
            role: None,
            escape: Escape::None,
            unicode: UnicodeEscapeBuffer::new(),
            pending: String::new(),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.role.is_some()
    }

    pub(crate) fn begin(&mut self, role: StringRole) {
        self.role = Some(role);
        self.escape = Escape::None;
        self.unicode.reset();
        self.pending.clear();
    }

    /// The resolved contents of the string scanned so far.
    pub(crate) fn token(&self) -> &str {
        &self.pending
    }

    pub(crate) fn step(&mut self, c: char) -> Result<ScanStep, ErrorKind> {
        match self.escape {
            Escape::Unicode => {
                match self
                    .unicode
                    .feed(c)
                    .map_err(ErrorKind::InvalidEscapeSequence)?
                {
                    EscapeStep::NeedMore => {}
                    EscapeStep::Done(resolved) => {
                        self.pending.push(resolved);
                        self.escape = Escape::None;
                    }
                }
                Ok(ScanStep::Continue)
            }
            Escape::Pending => {
                let resolved = match c {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'u' => {
                        self.escape = Escape::Unicode;
                        return Ok(ScanStep::Continue);
                    }
                    other => return Err(ErrorKind::InvalidEscapeSequence(other)),
                };
                self.pending.push(resolved);
                self.escape = Escape::None;
                Ok(ScanStep::Continue)
            }
            Escape::None => match c {
                '\\' => {
                    self.escape = Escape::Pending;
                    Ok(ScanStep::Continue)
                }
                '"' => {
                    let role = self.role.take().unwrap_or(StringRole::Value);
                    Ok(ScanStep::Closed(role))
                }
                c if u32::from(c) < 0x20 => Err(ErrorKind::InvalidControlCharacterInString(c)),
                c => {
                    self.pending.push(c);
                    Ok(ScanStep::Continue)
                }
            },
        }
    }
}

/// Checks a closed key against the configured key format.
pub(crate) fn check_key(key: &str, format: KeyFormat) -> Result<(), ErrorKind> {
    if format == KeyFormat::AnyString {
        return Ok(());
    }

    let mut chars = key.chars();
    let first = chars.next().ok_or(ErrorKind::EmptyKey)?;
    if !first.is_ascii_alphabetic() {
        return Err(ErrorKind::InvalidKeyStart(first));
    }
    match chars.find(|c| !c.is_ascii_alphanumeric()) {
        Some(bad) => Err(ErrorKind::InvalidKeyCharacter(bad)),
        None => Ok(()),
    }
}
