use std::time::Duration;

use crate::{
    foundation::error::{ReelError, ReelResult},
    library::series::{MediaFs, Series, SeriesSelector},
    playback::{
        cursor::PlaybackCursor,
        session::{EpisodeOutcome, PlaybackSession},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Initializing,
    Running,
    Terminated,
}

/// Totals for one `run`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    pub episodes_completed: u64,
    pub episodes_skipped: u64,
    pub frames_presented: u64,
    /// Index of the episode that was playing (or about to play) when the run stopped.
    pub final_index: usize,
}

/// Where the cursor goes after `outcome`, or `None` when playback must stop.
///
/// Completed and unopenable episodes both move on by one with wraparound; an episode is
/// never retried in place.
pub fn advance_after(cursor: PlaybackCursor, outcome: EpisodeOutcome) -> Option<PlaybackCursor> {
    match outcome {
        EpisodeOutcome::Completed { .. } | EpisodeOutcome::OpenFailed => Some(cursor.advance()),
        EpisodeOutcome::Cancelled { .. } => None,
    }
}

/// Loops one series forever until a quit request.
#[derive(Debug)]
pub struct PlaybackController {
    series: Series,
    cursor: PlaybackCursor,
    state: ControllerState,
    idle_backoff: Duration,
}

impl PlaybackController {
    /// Select the series to play. An empty series is fatal and no controller is built.
    pub fn initialize<F: MediaFs>(
        selector: &mut SeriesSelector<F>,
        pinned: Option<&str>,
    ) -> ReelResult<Self> {
        let series = selector.select_from_root(pinned)?;
        Self::with_series(series)
    }

    pub fn with_series(series: Series) -> ReelResult<Self> {
        if series.is_empty() {
            return Err(ReelError::no_episodes(series.name()));
        }
        let cursor = PlaybackCursor::start(series.len())?;
        Ok(Self {
            series,
            cursor,
            state: ControllerState::Initializing,
            idle_backoff: Duration::from_secs(1),
        })
    }

    /// Pause applied after a full pass in which no episode could be opened.
    pub fn with_idle_backoff(mut self, idle_backoff: Duration) -> Self {
        self.idle_backoff = idle_backoff;
        self
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Play episodes in order, wrapping at the end, until cancelled. Only a quit request or a
    /// fatal error returns.
    pub fn run(&mut self, session: &mut PlaybackSession<'_>) -> ReelResult<PlaybackReport> {
        self.state = ControllerState::Running;
        tracing::info!(
            series = self.series.name(),
            episodes = self.series.len(),
            "starting playback"
        );

        let mut report = PlaybackReport::default();
        let result = self.run_loop(session, &mut report);

        self.state = ControllerState::Terminated;
        report.final_index = self.cursor.index();
        match &result {
            Ok(()) => tracing::info!(
                completed = report.episodes_completed,
                skipped = report.episodes_skipped,
                frames = report.frames_presented,
                "playback stopped"
            ),
            Err(err) => tracing::error!(error = %err, "playback aborted"),
        }
        result.map(|()| report)
    }

    fn run_loop(
        &mut self,
        session: &mut PlaybackSession<'_>,
        report: &mut PlaybackReport,
    ) -> ReelResult<()> {
        // Episodes in a row that showed nothing, whether unopenable or empty.
        let mut blank_in_a_row = 0usize;
        loop {
            if session.cancel_token().is_cancelled() {
                return Ok(());
            }

            let index = self.cursor.index();
            let path = self.series.episode(index).ok_or_else(|| {
                ReelError::validation(format!("cursor {index} outside series (bug)"))
            })?;
            tracing::debug!(index, "next episode");

            let outcome = session.play(path)?;
            report.frames_presented += outcome.frames();
            match outcome {
                EpisodeOutcome::Completed { frames } => {
                    report.episodes_completed += 1;
                    if frames == 0 {
                        tracing::warn!(index, "episode decoded no frames");
                        blank_in_a_row += 1;
                    } else {
                        blank_in_a_row = 0;
                    }
                }
                EpisodeOutcome::OpenFailed => {
                    report.episodes_skipped += 1;
                    blank_in_a_row += 1;
                }
                EpisodeOutcome::Cancelled { .. } => {}
            }

            let Some(next) = advance_after(self.cursor, outcome) else {
                return Ok(());
            };
            self.cursor = next;

            if blank_in_a_row >= self.series.len() {
                tracing::warn!(
                    series = self.series.name(),
                    backoff_ms = self.idle_backoff.as_millis() as u64,
                    "a full pass over the series showed no frames"
                );
                blank_in_a_row = 0;
                if session.idle(self.idle_backoff)? {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
