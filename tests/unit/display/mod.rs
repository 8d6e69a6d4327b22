use super::*;

#[test]
fn quit_key_and_close_request_stop_playback() {
    assert!(InputEvent::Key('q').is_quit('q'));
    assert!(!InputEvent::Key('Q').is_quit('q'));
    assert!(!InputEvent::Key('x').is_quit('q'));
    assert!(InputEvent::CloseRequested.is_quit('q'));
    assert!(!InputEvent::Escape.is_quit('q'));
}

#[test]
fn headless_counts_frames_and_rejects_wrong_size() {
    let canvas = CanvasGeometry::new(4, 2).unwrap();
    let mut surface = headless::HeadlessSurface::new(canvas);

    let events = surface
        .present(&FrameRGB::black(4, 2), Duration::ZERO)
        .unwrap();
    assert!(events.is_empty());
    assert_eq!(surface.frames_presented(), 1);

    let err = surface
        .present(&FrameRGB::black(2, 2), Duration::ZERO)
        .unwrap_err();
    assert!(err.to_string().contains("frame size mismatch"));
    assert_eq!(surface.frames_presented(), 1);
}

#[test]
fn create_headless_display() {
    let settings = DisplaySettings::new(CanvasGeometry::new(8, 8).unwrap());
    let mut display = create_display(DisplayKind::Headless, &settings).unwrap();
    assert_eq!(display.canvas(), settings.canvas);
    assert!(display.poll_events(Duration::ZERO).unwrap().is_empty());
}

#[test]
fn blit_into_larger_window_is_centered_on_black() {
    let frame = FrameRGB::new(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
    let mut dst = vec![0xdead_beefu32; 4 * 3];
    blit_centered_xrgb(&mut dst, 4, 3, &frame);
    let expected = [
        [0, 0, 0, 0],
        [0, 0x00ff_0000, 0x0000_00ff, 0],
        [0, 0, 0, 0],
    ]
    .concat();
    assert_eq!(dst, expected);
}

#[test]
fn blit_into_smaller_window_clips_around_center() {
    let data: Vec<u8> = (0..9u8).flat_map(|i| [i, i, i]).collect();
    let frame = FrameRGB::new(3, 3, data).unwrap();
    let mut dst = vec![0u32; 1];
    blit_centered_xrgb(&mut dst, 1, 1, &frame);
    assert_eq!(dst, vec![0x0004_0404]);
}
