#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use reelloop::{
    CanvasGeometry, DisplaySurface, EpisodeDecoder, FrameRGB, FrameStream, InputEvent, ReelError,
    ReelResult,
};

pub fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "reelloop_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[derive(Default, Debug)]
pub struct DecoderLog {
    pub opened: Vec<PathBuf>,
    pub closed: usize,
}

/// Decoder whose episodes are `frames` solid frames, or fail to open when absent.
pub struct ScriptedDecoder {
    episodes: HashMap<PathBuf, usize>,
    frame_size: (u32, u32),
    pub log: Rc<RefCell<DecoderLog>>,
}

impl ScriptedDecoder {
    pub fn new(frame_size: (u32, u32)) -> Self {
        Self {
            episodes: HashMap::new(),
            frame_size,
            log: Rc::default(),
        }
    }

    pub fn episode(mut self, path: impl Into<PathBuf>, frames: usize) -> Self {
        self.episodes.insert(path.into(), frames);
        self
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.log.borrow().opened.clone()
    }

    pub fn closed(&self) -> usize {
        self.log.borrow().closed
    }
}

struct ScriptedStream {
    remaining: usize,
    size: (u32, u32),
    closed: bool,
    log: Rc<RefCell<DecoderLog>>,
}

impl FrameStream for ScriptedStream {
    fn next_frame(&mut self) -> Option<FrameRGB> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(FrameRGB::black(self.size.0, self.size.1))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.log.borrow_mut().closed += 1;
        }
    }
}

impl EpisodeDecoder for ScriptedDecoder {
    fn open(&mut self, path: &Path) -> ReelResult<Box<dyn FrameStream>> {
        self.log.borrow_mut().opened.push(path.to_path_buf());
        match self.episodes.get(path) {
            Some(&remaining) => Ok(Box::new(ScriptedStream {
                remaining,
                size: self.frame_size,
                closed: false,
                log: self.log.clone(),
            })),
            None => Err(ReelError::open(format!("cannot open {}", path.display()))),
        }
    }
}

/// Display that presses the quit key after a fixed number of presents or polls.
pub struct ScriptedDisplay {
    canvas: CanvasGeometry,
    pub presents: usize,
    pub polls: usize,
    quit_after_presents: Option<usize>,
    quit_after_polls: Option<usize>,
}

impl ScriptedDisplay {
    pub fn new(canvas: CanvasGeometry) -> Self {
        Self {
            canvas,
            presents: 0,
            polls: 0,
            quit_after_presents: None,
            quit_after_polls: None,
        }
    }

    pub fn quit_after_presents(mut self, n: usize) -> Self {
        self.quit_after_presents = Some(n);
        self
    }

    pub fn quit_after_polls(mut self, n: usize) -> Self {
        self.quit_after_polls = Some(n);
        self
    }
}

impl DisplaySurface for ScriptedDisplay {
    fn canvas(&self) -> CanvasGeometry {
        self.canvas
    }

    fn present(&mut self, frame: &FrameRGB, _wait: Duration) -> ReelResult<Vec<InputEvent>> {
        assert_eq!((frame.width, frame.height), (self.canvas.width, self.canvas.height));
        self.presents += 1;
        if self.quit_after_presents == Some(self.presents) {
            return Ok(vec![InputEvent::Key('q')]);
        }
        Ok(Vec::new())
    }

    fn poll_events(&mut self, _wait: Duration) -> ReelResult<Vec<InputEvent>> {
        self.polls += 1;
        if self.quit_after_polls == Some(self.polls) {
            return Ok(vec![InputEvent::CloseRequested]);
        }
        Ok(Vec::new())
    }
}
