use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::CanvasGeometry,
        error::{ReelError, ReelResult},
    },
    playback::session::SessionSettings,
    render::composite::ScaleFilter,
};

/// Runtime settings for the kiosk. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KioskConfig {
    /// Directory whose sub-directories are the series.
    pub media_dir: PathBuf,
    pub canvas: CanvasGeometry,
    /// Wait after each presented frame, in milliseconds.
    pub frame_wait_ms: u64,
    pub quit_key: char,
    pub fullscreen: bool,
    /// Play this series instead of picking one at random.
    pub series: Option<String>,
    /// Seed for the series pick.
    pub seed: Option<u64>,
    /// Pause after a pass where no episode could be opened, in milliseconds.
    pub idle_backoff_ms: u64,
    pub scale_filter: ScaleFilter,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("Media"),
            canvas: CanvasGeometry::default(),
            frame_wait_ms: 25,
            quit_key: 'q',
            fullscreen: true,
            series: None,
            seed: None,
            idle_backoff_ms: 1000,
            scale_filter: ScaleFilter::default(),
        }
    }
}

impl KioskConfig {
    pub fn load_json(path: &Path) -> ReelResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config '{}'", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.canvas.validate()?;
        if self.frame_wait_ms == 0 {
            return Err(ReelError::validation(
                "frame_wait_ms must be non-zero (it paces playback)",
            ));
        }
        if self.quit_key.is_control() || self.quit_key.is_whitespace() {
            return Err(ReelError::validation(format!(
                "quit_key must be a printable character, got {:?}",
                self.quit_key
            )));
        }
        if let Some(series) = &self.series {
            if matches!(series.as_str(), "" | "." | "..") || series.contains(['/', '\\']) {
                return Err(ReelError::validation(format!(
                    "series must be a plain directory name, got {series:?}"
                )));
            }
        }
        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            frame_wait: Duration::from_millis(self.frame_wait_ms),
            quit_key: self.quit_key,
        }
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }
}
