use std::path::PathBuf;

/// Convenience result type used across reelloop.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by playback APIs.
///
/// Cancellation is not represented here: a quit request is a normal
/// [`crate::EpisodeOutcome::Cancelled`] value, not a failure.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration, canvas geometry or frame data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The media root holds no series directories at all.
    #[error("no series found under '{}'", .0.display())]
    NoSeries(PathBuf),

    /// The selected series has no playable files. Fatal for the whole run.
    #[error("no episodes found in series '{0}'")]
    NoEpisodes(String),

    /// An episode could not be opened for decoding. Recoverable: the episode is skipped.
    #[error("open error: {0}")]
    Open(String),

    /// The display surface could not be created or refused a frame.
    #[error("display error: {0}")]
    Display(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::NoEpisodes`] value.
    pub fn no_episodes(series: impl Into<String>) -> Self {
        Self::NoEpisodes(series.into())
    }

    /// Build a [`ReelError::Open`] value.
    pub fn open(msg: impl Into<String>) -> Self {
        Self::Open(msg.into())
    }

    /// Build a [`ReelError::Display`] value.
    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display(msg.into())
    }

    /// Whether the error ends the whole run rather than a single episode.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Open(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
