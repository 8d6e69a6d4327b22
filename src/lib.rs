//! reelloop is a continuous-playback media kiosk.
//!
//! It picks one series (a directory of episode files) under a media root, then plays the
//! episodes back-to-back in a fixed-size fullscreen canvas, wrapping to the first episode after
//! the last, until a quit key, a window close or an interrupt stops it.
//!
//! # Pipeline overview
//!
//! 1. **Select**: [`SeriesSelector`] picks a series and lists its files in byte order.
//! 2. **Decode**: an [`EpisodeDecoder`] opens one episode and yields RGB8 frames
//!    ([`FfmpegDecoder`] streams them out of the system `ffmpeg` binary).
//! 3. **Composite**: [`FrameCompositor`] scales each frame to fit the canvas, preserving aspect,
//!    and centers it on black.
//! 4. **Present**: a [`DisplaySurface`] shows the canvas and waits briefly for input.
//!
//! [`PlaybackSession`] runs steps 2-4 for one episode; [`PlaybackController`] loops it over the
//! series. Everything runs on one thread; the only blocking point is
//! [`DisplaySurface::present`].
#![forbid(unsafe_code)]

mod assets;
mod config;
mod display;
mod foundation;
mod library;
mod playback;
mod render;

pub use assets::media::{
    EpisodeDecoder, FfmpegDecoder, FfmpegStream, FrameStream, VideoSourceInfo, is_ffmpeg_on_path,
    probe_video,
};
pub use config::KioskConfig;
#[cfg(feature = "window")]
pub use display::window::WindowSurface;
pub use display::{
    DisplayKind, DisplaySettings, DisplaySurface, InputEvent, blit_centered_xrgb, create_display,
    headless::HeadlessSurface,
};
pub use foundation::core::{CanvasGeometry, FrameRGB, Placement, RGB_CHANNELS};
pub use foundation::error::{ReelError, ReelResult};
pub use library::series::{MediaFs, Series, SeriesSelector, StdFs};
pub use playback::cancel::CancelToken;
pub use playback::controller::{
    ControllerState, PlaybackController, PlaybackReport, advance_after,
};
pub use playback::cursor::PlaybackCursor;
pub use playback::session::{EpisodeOutcome, PlaybackSession, SessionSettings, SessionState};
pub use render::composite::{FrameCompositor, ScaleFilter, compose, fit_placement};
