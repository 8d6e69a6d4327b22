use crate::foundation::error::{ReelError, ReelResult};

/// Position within the selected series. Wraps modulo the episode count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackCursor {
    index: usize,
    len: usize,
}

impl PlaybackCursor {
    /// Cursor at the first of `len` episodes.
    pub fn start(len: usize) -> ReelResult<Self> {
        Self::at(0, len)
    }

    pub fn at(index: usize, len: usize) -> ReelResult<Self> {
        if len == 0 {
            return Err(ReelError::validation("cursor needs at least one episode"));
        }
        if index >= len {
            return Err(ReelError::validation(format!(
                "cursor index {index} out of range for {len} episodes"
            )));
        }
        Ok(Self { index, len })
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn episode_count(self) -> usize {
        self.len
    }

    /// The next episode, wrapping back to 0 after the last.
    #[must_use]
    pub fn advance(self) -> Self {
        Self {
            index: (self.index + 1) % self.len,
            len: self.len,
        }
    }
}
