use std::{cell::RefCell, collections::HashMap, path::PathBuf, rc::Rc};

use super::*;
use crate::{
    foundation::{
        core::{CanvasGeometry, FrameRGB},
        error::ReelError,
    },
    render::composite::ScaleFilter,
};

#[derive(Default)]
struct Log {
    opened: Vec<PathBuf>,
    closed: usize,
}

struct VecStream {
    frames: std::vec::IntoIter<FrameRGB>,
    ended: bool,
    log: Rc<RefCell<Log>>,
}

impl FrameStream for VecStream {
    fn next_frame(&mut self) -> Option<FrameRGB> {
        if self.ended {
            return None;
        }
        let next = self.frames.next();
        self.ended = next.is_none();
        next
    }

    fn close(&mut self) {
        self.log.borrow_mut().closed += 1;
    }
}

struct FakeDecoder {
    episodes: HashMap<PathBuf, usize>,
    log: Rc<RefCell<Log>>,
}

impl EpisodeDecoder for FakeDecoder {
    fn open(&mut self, path: &Path) -> ReelResult<Box<dyn FrameStream>> {
        self.log.borrow_mut().opened.push(path.to_path_buf());
        let Some(&count) = self.episodes.get(path) else {
            return Err(ReelError::open(format!("missing {}", path.display())));
        };
        Ok(Box::new(VecStream {
            frames: vec![FrameRGB::black(4, 3); count].into_iter(),
            ended: false,
            log: self.log.clone(),
        }))
    }
}

struct FakeDisplay {
    canvas: CanvasGeometry,
    presented: Vec<FrameRGB>,
    quit_after: Option<usize>,
}

impl DisplaySurface for FakeDisplay {
    fn canvas(&self) -> CanvasGeometry {
        self.canvas
    }

    fn present(&mut self, frame: &FrameRGB, _wait: Duration) -> ReelResult<Vec<InputEvent>> {
        self.presented.push(frame.clone());
        if self.quit_after == Some(self.presented.len()) {
            return Ok(vec![InputEvent::Key('x'), InputEvent::Key('q')]);
        }
        Ok(vec![InputEvent::Key('x')])
    }

    fn poll_events(&mut self, _wait: Duration) -> ReelResult<Vec<InputEvent>> {
        Ok(Vec::new())
    }
}

fn fixtures(quit_after: Option<usize>) -> (FakeDecoder, FakeDisplay, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let decoder = FakeDecoder {
        episodes: HashMap::from([(PathBuf::from("s/ep1"), 3), (PathBuf::from("s/empty"), 0)]),
        log: log.clone(),
    };
    let display = FakeDisplay {
        canvas: CanvasGeometry::new(16, 9).unwrap(),
        presented: Vec::new(),
        quit_after,
    };
    (decoder, display, log)
}

#[test]
fn plays_every_frame_then_closes() {
    let (mut decoder, mut display, log) = fixtures(None);
    let mut session = PlaybackSession::new(
        &mut decoder,
        &mut display,
        SessionSettings::default(),
        CancelToken::new(),
    )
    .unwrap();
    assert_eq!(session.state(), SessionState::Idle);

    let outcome = session.play(Path::new("s/ep1")).unwrap();
    assert_eq!(outcome, EpisodeOutcome::Completed { frames: 3 });
    assert_eq!(session.state(), SessionState::Closed);
    drop(session);

    assert_eq!(display.presented.len(), 3);
    for frame in &display.presented {
        assert_eq!((frame.width, frame.height), (16, 9));
    }
    assert_eq!(log.borrow().closed, 1);
}

#[test]
fn empty_episode_completes_with_zero_frames() {
    let (mut decoder, mut display, log) = fixtures(None);
    let mut session = PlaybackSession::new(
        &mut decoder,
        &mut display,
        SessionSettings::default(),
        CancelToken::new(),
    )
    .unwrap();
    let outcome = session.play(Path::new("s/empty")).unwrap();
    assert_eq!(outcome, EpisodeOutcome::Completed { frames: 0 });
    drop(session);
    assert!(display.presented.is_empty());
    assert_eq!(log.borrow().closed, 1);
}

#[test]
fn open_failure_is_reported_not_raised() {
    let (mut decoder, mut display, log) = fixtures(None);
    let mut session = PlaybackSession::new(
        &mut decoder,
        &mut display,
        SessionSettings::default(),
        CancelToken::new(),
    )
    .unwrap();
    let outcome = session.play(Path::new("s/missing")).unwrap();
    assert_eq!(outcome, EpisodeOutcome::OpenFailed);
    assert_eq!(session.state(), SessionState::Closed);
    drop(session);
    assert_eq!(log.borrow().closed, 0);
    assert_eq!(log.borrow().opened.len(), 1);
}

#[test]
fn quit_key_cancels_after_presenting_and_still_closes() {
    let (mut decoder, mut display, log) = fixtures(Some(2));
    let mut session = PlaybackSession::new(
        &mut decoder,
        &mut display,
        SessionSettings::default(),
        CancelToken::new(),
    )
    .unwrap();
    let outcome = session.play(Path::new("s/ep1")).unwrap();
    assert_eq!(outcome, EpisodeOutcome::Cancelled { frames: 2 });
    drop(session);
    assert_eq!(display.presented.len(), 2);
    assert_eq!(log.borrow().closed, 1);
}

#[test]
fn custom_quit_key_is_honoured() {
    let (mut decoder, mut display, _log) = fixtures(None);
    let settings = SessionSettings {
        frame_wait: Duration::ZERO,
        quit_key: 'x',
    };
    let mut session =
        PlaybackSession::new(&mut decoder, &mut display, settings, CancelToken::new()).unwrap();
    let outcome = session.play(Path::new("s/ep1")).unwrap();
    assert_eq!(outcome, EpisodeOutcome::Cancelled { frames: 1 });
}

#[test]
fn interrupt_flag_cancels_on_next_frame() {
    let (mut decoder, mut display, log) = fixtures(None);
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut session = PlaybackSession::new(
        &mut decoder,
        &mut display,
        SessionSettings::default(),
        cancel,
    )
    .unwrap();
    let outcome = session.play(Path::new("s/ep1")).unwrap();
    assert_eq!(outcome, EpisodeOutcome::Cancelled { frames: 1 });
    assert!(session.idle(Duration::ZERO).unwrap());
    drop(session);
    assert_eq!(log.borrow().closed, 1);
}

#[test]
fn composited_frames_match_the_compositor() {
    let (mut decoder, mut display, _log) = fixtures(None);
    let compositor = FrameCompositor::new(CanvasGeometry::new(16, 9).unwrap())
        .unwrap()
        .with_filter(ScaleFilter::Nearest);
    let mut session = PlaybackSession::new(
        &mut decoder,
        &mut display,
        SessionSettings::default(),
        CancelToken::new(),
    )
    .unwrap()
    .with_compositor(compositor);
    session.play(Path::new("s/ep1")).unwrap();
    drop(session);

    let expected = compositor.compose(&FrameRGB::black(4, 3)).unwrap();
    assert!(display.presented.iter().all(|f| *f == expected));
}
