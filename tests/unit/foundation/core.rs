use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(CanvasGeometry::new(0, 1080).is_err());
    assert!(CanvasGeometry::new(1920, 0).is_err());
    let c = CanvasGeometry::new(1920, 1080).unwrap();
    assert_eq!(c, CanvasGeometry::default());
    assert_eq!(c.byte_len(), 1920 * 1080 * 3);
}

#[test]
fn frame_new_checks_buffer_length() {
    assert!(FrameRGB::new(2, 2, vec![0u8; 12]).is_ok());
    assert!(FrameRGB::new(2, 2, vec![0u8; 11]).is_err());
    assert!(FrameRGB::new(0, 2, Vec::new()).is_err());
}

#[test]
fn frame_pixel_reads_row_major() {
    let mut data = vec![0u8; 2 * 2 * 3];
    data[9..12].copy_from_slice(&[7, 8, 9]);
    let f = FrameRGB::new(2, 2, data).unwrap();
    assert_eq!(f.pixel(1, 1), Some([7, 8, 9]));
    assert_eq!(f.pixel(0, 0), Some([0, 0, 0]));
    assert_eq!(f.pixel(2, 0), None);
}

#[test]
fn placement_full_canvas() {
    let c = CanvasGeometry::new(4, 2).unwrap();
    let p = Placement {
        x: 0,
        y: 0,
        width: 4,
        height: 2,
    };
    assert!(p.is_full_canvas(c));
    assert!(!Placement { x: 1, ..p }.is_full_canvas(c));
}
