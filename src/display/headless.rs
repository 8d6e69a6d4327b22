use std::time::Duration;

use crate::{
    display::{DisplaySurface, InputEvent, check_frame_fits},
    foundation::{
        core::{CanvasGeometry, FrameRGB},
        error::ReelResult,
    },
};

/// A display with no window: frames are checked and counted, waits are real sleeps, and no
/// input ever arrives. Interrupts still work through the process-level cancel token.
#[derive(Debug)]
pub struct HeadlessSurface {
    canvas: CanvasGeometry,
    frames_presented: u64,
}

impl HeadlessSurface {
    pub fn new(canvas: CanvasGeometry) -> Self {
        Self {
            canvas,
            frames_presented: 0,
        }
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl DisplaySurface for HeadlessSurface {
    fn canvas(&self) -> CanvasGeometry {
        self.canvas
    }

    fn present(&mut self, frame: &FrameRGB, wait: Duration) -> ReelResult<Vec<InputEvent>> {
        check_frame_fits(self.canvas, frame)?;
        self.frames_presented += 1;
        self.poll_events(wait)
    }

    fn poll_events(&mut self, wait: Duration) -> ReelResult<Vec<InputEvent>> {
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        Ok(Vec::new())
    }
}
