//! Incremental UTF-8 decoding for byte-oriented input.
//!
//! A multi-byte sequence may be split across two `feed_bytes` calls; the
//! leading part is carried over in a four-byte buffer until it completes.

use bstr::decode_utf8;

#[derive(Debug, Default)]
pub(crate) struct Utf8Carry {
    buf: [u8; 4],
    len: usize,
}

/// Length of the sequence introduced by `lead`, if it can introduce one.
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// `Some(bad_byte)` if `bytes` is not a UTF-8 sequence or the start of one.
fn classify(bytes: &[u8]) -> Result<Option<(char, usize)>, u8> {
    let (decoded, size) = decode_utf8(bytes);
    match decoded {
        Some(c) => Ok(Some((c, size))),
        None => {
            let expected = sequence_len(bytes[0]).ok_or(bytes[0])?;
            if size == bytes.len() && size < expected {
                // A valid but unfinished prefix.
                Ok(None)
            } else {
                Err(bytes[size.min(bytes.len() - 1)])
            }
        }
    }
}

impl Utf8Carry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The first byte of an unfinished sequence, if any.
    pub(crate) fn dangling(&self) -> Option<u8> {
        (self.len > 0).then_some(self.buf[0])
    }

    /// Decodes `bytes`, handing each character (or the first invalid byte)
    /// to `emit`. Stops at the first error `emit` returns.
    pub(crate) fn decode<E>(
        &mut self,
        mut bytes: &[u8],
        mut emit: impl FnMut(Result<char, u8>) -> Result<(), E>,
    ) -> Result<(), E> {
        while self.len > 0 && !bytes.is_empty() {
            self.buf[self.len] = bytes[0];
            self.len += 1;
            bytes = &bytes[1..];
            match classify(&self.buf[..self.len]) {
                Ok(None) => {}
                Ok(Some((c, _))) => {
                    self.len = 0;
                    emit(Ok(c))?;
                }
                Err(bad) => {
                    self.len = 0;
                    return emit(Err(bad));
                }
            }
        }

        while !bytes.is_empty() {
            match classify(bytes) {
                Ok(Some((c, size))) => {
                    bytes = &bytes[size..];
                    emit(Ok(c))?;
                }
                Ok(None) => {
                    self.buf[..bytes.len()].copy_from_slice(bytes);
                    self.len = bytes.len();
                    return Ok(());
                }
                Err(bad) => return emit(Err(bad)),
            }
        }
        Ok(())
    }
}
