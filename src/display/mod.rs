use std::time::Duration;

use crate::foundation::{
    core::{CanvasGeometry, FrameRGB},
    error::{ReelError, ReelResult},
};

pub mod headless;
#[cfg(feature = "window")]
pub mod window;

/// Input observed by a display surface while it waited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(char),
    Escape,
    CloseRequested,
}

impl InputEvent {
    /// Whether this event asks playback to stop.
    pub fn is_quit(&self, quit_key: char) -> bool {
        match self {
            Self::Key(c) => *c == quit_key,
            Self::CloseRequested => true,
            Self::Escape => false,
        }
    }
}

/// The fullscreen output target.
///
/// `present` is the only blocking call in playback: it shows a canvas-sized frame, then waits
/// up to `wait` for input and returns everything received, oldest first.
pub trait DisplaySurface {
    fn canvas(&self) -> CanvasGeometry;

    fn present(&mut self, frame: &FrameRGB, wait: Duration) -> ReelResult<Vec<InputEvent>>;

    /// Wait for input without changing what is on screen.
    fn poll_events(&mut self, wait: Duration) -> ReelResult<Vec<InputEvent>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayKind {
    #[cfg(feature = "window")]
    Window,
    Headless,
}

#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub canvas: CanvasGeometry,
    pub fullscreen: bool,
    pub title: String,
}

impl DisplaySettings {
    pub fn new(canvas: CanvasGeometry) -> Self {
        Self {
            canvas,
            fullscreen: true,
            title: "reelloop".to_string(),
        }
    }
}

pub fn create_display(
    kind: DisplayKind,
    settings: &DisplaySettings,
) -> ReelResult<Box<dyn DisplaySurface>> {
    settings.canvas.validate()?;
    match kind {
        #[cfg(feature = "window")]
        DisplayKind::Window => Ok(Box::new(window::WindowSurface::open(settings.clone())?)),
        DisplayKind::Headless => Ok(Box::new(headless::HeadlessSurface::new(settings.canvas))),
        #[allow(unreachable_patterns)]
        _ => Err(ReelError::display("requested display is not available")),
    }
}

pub(crate) fn check_frame_fits(canvas: CanvasGeometry, frame: &FrameRGB) -> ReelResult<()> {
    if frame.width != canvas.width || frame.height != canvas.height {
        return Err(ReelError::display(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, canvas.width, canvas.height
        )));
    }
    if frame.data.len() != canvas.byte_len() {
        return Err(ReelError::display(
            "frame.data size mismatch with width*height*3",
        ));
    }
    Ok(())
}

/// Copy `frame` into a `dst_width x dst_height` 0RGB pixel buffer, centered, clipping when the
/// destination is smaller and leaving black around it when larger.
pub fn blit_centered_xrgb(dst: &mut [u32], dst_width: u32, dst_height: u32, frame: &FrameRGB) {
    dst.fill(0);

    let (dst_x, src_x, copy_w) = center_span(dst_width, frame.width);
    let (dst_y, src_y, copy_h) = center_span(dst_height, frame.height);
    let dst_stride = dst_width as usize;
    let src_stride = frame.width as usize * 3;

    for row in 0..copy_h as usize {
        let d_off = (dst_y as usize + row) * dst_stride + dst_x as usize;
        let s_off = (src_y as usize + row) * src_stride + src_x as usize * 3;
        let Some(d_row) = dst.get_mut(d_off..d_off + copy_w as usize) else {
            return;
        };
        let s_row = &frame.data[s_off..s_off + copy_w as usize * 3];
        for (d, px) in d_row.iter_mut().zip(s_row.chunks_exact(3)) {
            *d = (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]);
        }
    }
}

/// (destination offset, source offset, length) of a centered 1-D copy.
fn center_span(dst_len: u32, src_len: u32) -> (u32, u32, u32) {
    if dst_len >= src_len {
        ((dst_len - src_len) / 2, 0, src_len)
    } else {
        (0, (src_len - dst_len) / 2, dst_len)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/display/mod.rs"]
mod tests;
