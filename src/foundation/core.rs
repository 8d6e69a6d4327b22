use crate::foundation::error::{ReelError, ReelResult};

/// Bytes per pixel of every frame buffer in the pipeline (RGB, 8 bits per channel).
pub const RGB_CHANNELS: usize = 3;

/// Fixed output resolution of the display surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
}

impl CanvasGeometry {
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * RGB_CHANNELS
    }
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Row-major, tightly packed RGB8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGB {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGB {
    /// Wrap decoded bytes, checking that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> ReelResult<Self> {
        let frame = Self {
            width,
            height,
            data,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// An all-black frame.
    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * RGB_CHANNELS],
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation(format!(
                "frame must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * RGB_CHANNELS;
        if self.data.len() != expected {
            return Err(ReelError::validation(format!(
                "frame buffer has {} bytes, expected {expected} for {}x{} rgb8",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * RGB_CHANNELS;
        Some([self.data[off], self.data[off + 1], self.data[off + 2]])
    }
}

/// Where scaled content lands inside a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub fn is_full_canvas(self, canvas: CanvasGeometry) -> bool {
        self.x == 0 && self.y == 0 && self.width == canvas.width && self.height == canvas.height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
