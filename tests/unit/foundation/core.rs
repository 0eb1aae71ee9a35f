use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
}

#[test]
fn fps_covers_duration_with_ceil() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(1.0), 30);
    assert_eq!(fps.secs_to_frames_ceil(1.01), 31);
    assert_eq!(fps.secs_to_frames_ceil(-3.0), 0);
    assert_eq!(fps.frames_to_secs(45), 1.5);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn hex_colors_parse_both_widths() {
    assert_eq!(Rgba8::from_hex("#1a1a1a").unwrap(), Rgba8::rgb(26, 26, 26));
    let c = Rgba8::from_hex("FF000080").unwrap();
    assert_eq!((c.r, c.g, c.b, c.a), (255, 0, 0, 128));
    assert_eq!(c.to_hex_rgb(), "#ff0000");
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#gg0000").is_err());
}

#[test]
fn canvas_rejects_zero_size() {
    assert!(Canvas::default().validate().is_ok());
    assert!(
        Canvas {
            width: 0,
            height: 10
        }
        .validate()
        .is_err()
    );
    assert_eq!(Canvas::FULL_HD.center_y(), 540.0);
}
