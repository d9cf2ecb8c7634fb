use alloc::vec::Vec;

use crate::error::ErrorKind;

/// The kind of an open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Object,
    Array,
}

impl ContainerKind {
    pub(crate) fn from_open(c: char) -> Option<Self> {
        match c {
            '{' => Some(Self::Object),
            '[' => Some(Self::Array),
            _ => None,
        }
    }

    pub(crate) fn from_close(c: char) -> Option<Self> {
        match c {
            '}' => Some(Self::Object),
            ']' => Some(Self::Array),
            _ => None,
        }
    }

    pub(crate) fn close_char(self) -> char {
        match self {
            Self::Object => '}',
            Self::Array => ']',
        }
    }
}

/// One entry per open container.
#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ContainerKind,
    /// Whether the container has admitted at least one entry.
    has_entry: bool,
}

/// Bounded stack of open containers.
///
/// Never holds more than the configured depth, so hostile nesting costs a
/// bounded amount of memory.
#[derive(Debug)]
pub(crate) struct NestingStack {
    frames: Vec<Frame>,
    max_depth: usize,
}

impl NestingStack {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            // Capped so a huge configured depth does not allocate eagerly.
            frames: Vec::with_capacity(max_depth.min(128)),
            max_depth,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn top(&self) -> Option<ContainerKind> {
        self.frames.last().map(|frame| frame.kind)
    }

    pub(crate) fn top_is_array(&self) -> bool {
        self.top() == Some(ContainerKind::Array)
    }

    pub(crate) fn top_is_object(&self) -> bool {
        self.top() == Some(ContainerKind::Object)
    }

    pub(crate) fn top_has_entry(&self) -> bool {
        self.frames.last().is_some_and(|frame| frame.has_entry)
    }

    pub(crate) fn mark_entry(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.has_entry = true;
        }
    }

    pub(crate) fn open(&mut self, kind: ContainerKind) -> Result<(), ErrorKind> {
        if self.frames.len() >= self.max_depth {
            return Err(ErrorKind::MaxNestingDepthExceeded {
                max: self.max_depth,
            });
        }
        self.frames.push(Frame {
            kind,
            has_entry: false,
        });
        Ok(())
    }

    /// Checks that `kind` would close the innermost container, without
    /// popping it.
    pub(crate) fn check_close(&self, kind: ContainerKind) -> Result<(), ErrorKind> {
        match self.top() {
            None => Err(ErrorKind::UnexpectedClosingBracket(kind.close_char())),
            Some(top) if top != kind => Err(ErrorKind::MismatchedClosingBracket {
                expected: top.close_char(),
                found: kind.close_char(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Pops the innermost container and returns the new innermost one.
    pub(crate) fn close(&mut self, kind: ContainerKind) -> Result<Option<ContainerKind>, ErrorKind> {
        self.check_close(kind)?;
        self.frames.pop();
        Ok(self.top())
    }
}
