use image::{ImageBuffer, Rgb, RgbImage, imageops};

use crate::foundation::{
    core::{CanvasGeometry, FrameRGB, Placement},
    error::{ReelError, ReelResult},
};

/// Resampling filter used when scaling decoded frames onto the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleFilter {
    Nearest,
    #[default]
    Linear,
    CatmullRom,
}

impl ScaleFilter {
    fn as_image_filter(self) -> imageops::FilterType {
        match self {
            Self::Nearest => imageops::FilterType::Nearest,
            Self::Linear => imageops::FilterType::Triangle,
            Self::CatmullRom => imageops::FilterType::CatmullRom,
        }
    }
}

/// Aspect-preserving fit of a `frame_width x frame_height` source into `canvas`.
///
/// The relatively wider side is fitted first; if rounding pushes the other side past the
/// canvas, it is clamped and the fitted side recomputed. The result is centered with
/// integer-division offsets and never exceeds the canvas in either dimension.
pub fn fit_placement(frame_width: u32, frame_height: u32, canvas: CanvasGeometry) -> Placement {
    let frame_aspect = f64::from(frame_width) / f64::from(frame_height);
    let screen_aspect = canvas.aspect();
    let (cw, ch) = (canvas.width, canvas.height);

    let (mut width, mut height);
    if frame_aspect > screen_aspect {
        width = cw;
        height = round_dim(f64::from(cw) / frame_aspect);
        if height > ch {
            height = ch;
            width = round_dim(f64::from(ch) * frame_aspect);
        }
    } else {
        height = ch;
        width = round_dim(f64::from(ch) * frame_aspect);
        if width > cw {
            width = cw;
            height = round_dim(f64::from(cw) / frame_aspect);
        }
    }

    // Extreme aspect ratios can round a side to zero.
    let width = width.clamp(1, cw);
    let height = height.clamp(1, ch);

    Placement {
        x: (cw - width) / 2,
        y: (ch - height) / 2,
        width,
        height,
    }
}

fn round_dim(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Letterbox/pillarbox `frame` onto a freshly allocated black canvas.
///
/// Pure: the same inputs always produce byte-identical output, and the source buffer is
/// never written to.
pub fn compose(
    frame: &FrameRGB,
    canvas: CanvasGeometry,
    filter: ScaleFilter,
) -> ReelResult<FrameRGB> {
    canvas.validate()?;
    frame.validate()?;

    let placement = fit_placement(frame.width, frame.height, canvas);
    if placement.is_full_canvas(canvas)
        && (frame.width, frame.height) == (canvas.width, canvas.height)
    {
        return Ok(frame.clone());
    }
    let src = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(frame.width, frame.height, frame.data.as_slice())
        .ok_or_else(|| ReelError::validation("frame buffer does not match its dimensions"))?;

    let mut out = RgbImage::new(canvas.width, canvas.height);
    let (x, y) = (i64::from(placement.x), i64::from(placement.y));
    if placement.width == frame.width && placement.height == frame.height {
        imageops::replace(&mut out, &src, x, y);
    } else {
        let scaled = imageops::resize(
            &src,
            placement.width,
            placement.height,
            filter.as_image_filter(),
        );
        imageops::replace(&mut out, &scaled, x, y);
    }

    Ok(FrameRGB {
        width: canvas.width,
        height: canvas.height,
        data: out.into_raw(),
    })
}

/// Canvas-bound compositor owned by a playback session.
#[derive(Clone, Copy, Debug)]
pub struct FrameCompositor {
    canvas: CanvasGeometry,
    filter: ScaleFilter,
}

impl FrameCompositor {
    pub fn new(canvas: CanvasGeometry) -> ReelResult<Self> {
        canvas.validate()?;
        Ok(Self {
            canvas,
            filter: ScaleFilter::default(),
        })
    }

    pub fn with_filter(mut self, filter: ScaleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn canvas(&self) -> CanvasGeometry {
        self.canvas
    }

    pub fn placement_for(&self, frame: &FrameRGB) -> Placement {
        fit_placement(frame.width, frame.height, self.canvas)
    }

    pub fn compose(&self, frame: &FrameRGB) -> ReelResult<FrameRGB> {
        compose(frame, self.canvas, self.filter)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
