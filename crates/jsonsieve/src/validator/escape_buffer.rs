//! Accumulates the four hexadecimal digits of a `\uXXXX` escape.
//!
//! Digits are folded into the code unit as they arrive, so nothing but the
//! running value and the digit count is stored. Code units that are not
//! Unicode scalar values on their own (surrogate halves) resolve to
//! U+FFFD: the validator only checks that the escape is well formed.

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    code: u32,
    len: u8,
}

/// Result of feeding one character.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum EscapeStep {
    /// More digits are needed.
    NeedMore,
    /// The fourth digit arrived; carries the resolved character.
    Done(char),
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        self.code = 0;
        self.len = 0;
    }

    /// Feeds one character of the escape. A non-hex character is returned
    /// back as the error.
    pub(crate) fn feed(&mut self, c: char) -> Result<EscapeStep, char> {
        let digit = c.to_digit(16).ok_or(c)?;
        self.code = (self.code << 4) | digit;
        self.len += 1;

        if self.len < 4 {
            return Ok(EscapeStep::NeedMore);
        }

        let resolved = char::from_u32(self.code).unwrap_or(char::REPLACEMENT_CHARACTER);
        self.reset();
        Ok(EscapeStep::Done(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::{EscapeStep, UnicodeEscapeBuffer};

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('0'), Ok(EscapeStep::NeedMore));
        assert_eq!(buf.feed('0'), Ok(EscapeStep::NeedMore));
        assert_eq!(buf.feed('4'), Ok(EscapeStep::NeedMore));
        assert_eq!(buf.feed('1'), Ok(EscapeStep::Done('A')));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        let steps: alloc::vec::Vec<_> = "aBcD".chars().map(|c| buf.feed(c)).collect();
        assert_eq!(
            steps.last(),
            Some(&Ok(EscapeStep::Done(char::from_u32(0xABCD).unwrap())))
        );
    }

    #[test]
    fn buffer_is_reusable_after_completion() {
        let mut buf = UnicodeEscapeBuffer::new();
        for c in "0041".chars() {
            buf.feed(c).unwrap();
        }
        for c in "006".chars() {
            buf.feed(c).unwrap();
        }
        assert_eq!(buf.feed('2'), Ok(EscapeStep::Done('b')));
    }

    #[test]
    fn non_hex_is_rejected() {
        let mut buf = UnicodeEscapeBuffer::new();
        buf.feed('0').unwrap();
        assert_eq!(buf.feed('G'), Err('G'));
    }

    #[test]
    fn lone_surrogate_resolves_to_replacement() {
        let mut buf = UnicodeEscapeBuffer::new();
        let last = "D800".chars().map(|c| buf.feed(c)).last();
        assert_eq!(last, Some(Ok(EscapeStep::Done(char::REPLACEMENT_CHARACTER))));
    }
}
