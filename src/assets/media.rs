use std::{
    io::{BufReader, ErrorKind, Read},
    path::{Path, PathBuf},
    process::{Child, ChildStdout, Command, Stdio},
};

use crate::foundation::{
    core::{FrameRGB, RGB_CHANNELS},
    error::{ReelError, ReelResult},
};

/// Native stream properties reported by `ffprobe`.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
}

impl VideoSourceInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }

    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * RGB_CHANNELS
    }
}

/// Opens episodes for decoding.
pub trait EpisodeDecoder {
    /// Establish a stream for `path`. Any failure is an [`ReelError::Open`].
    fn open(&mut self, path: &Path) -> ReelResult<Box<dyn FrameStream>>;
}

/// A lazily decoded, finite sequence of frames.
pub trait FrameStream {
    /// Next frame in decode order, or `None` once the stream has ended. After the first
    /// `None`, every later call returns `None` as well.
    fn next_frame(&mut self) -> Option<FrameRGB>;

    /// Release decoder resources. Safe to call more than once.
    fn close(&mut self);
}

pub fn is_ffmpeg_on_path() -> bool {
    tool_runs("ffmpeg") && tool_runs("ffprobe")
}

fn tool_runs(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn probe_video(source_path: &Path) -> ReelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    if !source_path.is_file() {
        return Err(ReelError::open(format!(
            "'{}' is not a readable file",
            source_path.display()
        )));
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::open(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::open(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::open(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ReelError::open(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let (width, height) = match (video_stream.width, video_stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        (w, h) => {
            return Err(ReelError::open(format!(
                "invalid video dimensions {w:?}x{h:?} in '{}'",
                source_path.display()
            )));
        }
    };

    let (fps_num, fps_den) =
        parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1")).unwrap_or((0, 1));
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

/// Decodes episodes by streaming raw RGB24 frames out of the system `ffmpeg` binary.
#[derive(Clone, Debug, Default)]
pub struct FfmpegDecoder;

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl EpisodeDecoder for FfmpegDecoder {
    fn open(&mut self, path: &Path) -> ReelResult<Box<dyn FrameStream>> {
        Ok(Box::new(FfmpegStream::spawn(probe_video(path)?)?))
    }
}

/// One running `ffmpeg` child producing frames for a single episode.
pub struct FfmpegStream {
    info: VideoSourceInfo,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    frames_read: u64,
}

impl FfmpegStream {
    pub fn spawn(info: VideoSourceInfo) -> ReelResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(&info.source_path)
            .args([
                "-map", "0:v:0", "-an", "-sn", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ReelError::open(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ReelError::open("failed to open ffmpeg stdout (unexpected)"));
            }
        };

        tracing::debug!(
            path = %info.source_path.display(),
            width = info.width,
            height = info.height,
            fps = info.source_fps(),
            duration_sec = info.duration_sec,
            "decoder started"
        );
        Ok(Self {
            info,
            child: Some(child),
            stdout: Some(BufReader::with_capacity(1 << 20, stdout)),
            frames_read: 0,
        })
    }

}

impl FrameStream for FfmpegStream {
    fn next_frame(&mut self) -> Option<FrameRGB> {
        let reader = self.stdout.as_mut()?;

        let mut data = vec![0u8; self.info.frame_len()];
        match reader.read_exact(&mut data) {
            Ok(()) => {
                self.frames_read += 1;
                Some(FrameRGB {
                    width: self.info.width,
                    height: self.info.height,
                    data,
                })
            }
            Err(e) => {
                if e.kind() != ErrorKind::UnexpectedEof {
                    tracing::warn!(
                        path = %self.info.source_path.display(),
                        error = %e,
                        "video stream read failed; treating as end of stream"
                    );
                }
                self.stdout = None;
                None
            }
        }
    }

    fn close(&mut self) {
        self.stdout = None;
        let Some(mut child) = self.child.take() else {
            return;
        };
        // A still-running child means playback stopped early.
        if let Ok(None) = child.try_wait() {
            let _ = child.kill();
        }
        if let Err(e) = child.wait() {
            tracing::warn!(error = %e, "failed to reap ffmpeg decoder");
        }
        tracing::debug!(frames = self.frames_read, "decoder closed");
    }
}

impl Drop for FfmpegStream {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
