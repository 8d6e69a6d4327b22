use std::{path::Path, time::Duration};

use crate::{
    assets::media::{EpisodeDecoder, FrameStream},
    display::{DisplaySurface, InputEvent},
    foundation::error::ReelResult,
    playback::cancel::CancelToken,
    render::composite::FrameCompositor,
};

/// Lifecycle of a single `play` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Opening,
    Playing,
    Draining,
    Cancelled,
    Failed,
    Closed,
}

/// How one episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// Every frame was presented.
    Completed { frames: u64 },
    /// The decoder could not be opened; nothing was presented.
    OpenFailed,
    /// A quit request arrived. Stops the whole controller, not just this episode.
    Cancelled { frames: u64 },
}

impl EpisodeOutcome {
    pub fn frames(self) -> u64 {
        match self {
            Self::Completed { frames } | Self::Cancelled { frames } => frames,
            Self::OpenFailed => 0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SessionSettings {
    /// Bounded wait handed to the display after each frame; paces playback.
    pub frame_wait: Duration,
    pub quit_key: char,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            frame_wait: Duration::from_millis(25),
            quit_key: 'q',
        }
    }
}

/// Closes the stream on every exit path, including `?` and panics.
struct OpenStream(Box<dyn FrameStream>);

impl Drop for OpenStream {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Drives one episode at a time from decoder to display.
///
/// The session exclusively borrows the decoder and the display for its lifetime; a decoder
/// stream never outlives the `play` call that opened it.
pub struct PlaybackSession<'a> {
    decoder: &'a mut dyn EpisodeDecoder,
    display: &'a mut dyn DisplaySurface,
    compositor: FrameCompositor,
    settings: SessionSettings,
    cancel: CancelToken,
    state: SessionState,
}

impl<'a> PlaybackSession<'a> {
    pub fn new(
        decoder: &'a mut dyn EpisodeDecoder,
        display: &'a mut dyn DisplaySurface,
        settings: SessionSettings,
        cancel: CancelToken,
    ) -> ReelResult<Self> {
        let compositor = FrameCompositor::new(display.canvas())?;
        Ok(Self {
            decoder,
            display,
            compositor,
            settings,
            cancel,
            state: SessionState::Idle,
        })
    }

    pub fn with_compositor(mut self, compositor: FrameCompositor) -> Self {
        self.compositor = compositor;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Play `path` to the end, until cancelled, or not at all if it cannot be opened.
    ///
    /// Errors are reserved for failures that end the run (display or compositing); an
    /// unopenable episode is the [`EpisodeOutcome::OpenFailed`] value.
    #[tracing::instrument(skip(self, path), fields(episode = %path.display()))]
    pub fn play(&mut self, path: &Path) -> ReelResult<EpisodeOutcome> {
        self.transition(SessionState::Opening);
        let stream = match self.decoder.open(path) {
            Ok(stream) => stream,
            Err(err) if !err.is_fatal() => {
                tracing::warn!(error = %err, "could not open episode, skipping");
                self.transition(SessionState::Failed);
                self.transition(SessionState::Closed);
                return Ok(EpisodeOutcome::OpenFailed);
            }
            Err(err) => {
                self.transition(SessionState::Closed);
                return Err(err);
            }
        };

        tracing::info!("playing episode");
        self.transition(SessionState::Playing);
        let mut stream = OpenStream(stream);
        let result = self.present_frames(&mut stream);
        drop(stream);
        self.transition(SessionState::Closed);

        let outcome = result?;
        tracing::debug!(?outcome, "episode finished");
        Ok(outcome)
    }

    fn present_frames(&mut self, stream: &mut OpenStream) -> ReelResult<EpisodeOutcome> {
        let mut frames = 0u64;
        loop {
            let Some(frame) = stream.0.next_frame() else {
                self.transition(SessionState::Draining);
                return Ok(EpisodeOutcome::Completed { frames });
            };

            let composed = self.compositor.compose(&frame)?;
            drop(frame);
            let events = self.display.present(&composed, self.settings.frame_wait)?;
            frames += 1;

            if self.quit_requested(&events) {
                tracing::info!(frames, "playback cancelled");
                self.transition(SessionState::Cancelled);
                return Ok(EpisodeOutcome::Cancelled { frames });
            }
        }
    }

    /// Keep the display responsive for `wait` without presenting. Returns whether a quit
    /// request arrived meanwhile.
    pub fn idle(&mut self, wait: Duration) -> ReelResult<bool> {
        let events = self.display.poll_events(wait)?;
        Ok(self.quit_requested(&events))
    }

    fn quit_requested(&self, events: &[InputEvent]) -> bool {
        let quit_key = self.settings.quit_key;
        events.iter().any(|e| e.is_quit(quit_key)) || self.cancel.is_cancelled()
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
