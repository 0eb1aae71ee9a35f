use super::*;
use crate::foundation::core::Rgba8;

fn empty_frame(w: u32, h: u32, bg: Rgba8) -> FrameDescription {
    FrameDescription {
        time_s: 0.0,
        canvas: Canvas {
            width: w,
            height: h,
        },
        background: bg,
        font_family: "Arial".to_owned(),
        font_size: 24.0,
        row_height: 28.0,
        shadow: None,
        lines: vec![],
        highlight: None,
    }
}

#[test]
fn background_fills_every_pixel() {
    let r = SvgRasterizer::with_font_dirs(&[]);
    let out = r
        .render(&empty_frame(32, 16, Rgba8::rgb(0x1a, 0x2b, 0x3c)))
        .unwrap();
    assert_eq!((out.width, out.height), (32, 16));
    assert_eq!(out.data.len(), 32 * 16 * 4);
    assert!(out.premultiplied);
    assert_eq!(out.pixel(0, 0), Some([0x1a, 0x2b, 0x3c, 0xff]));
    assert_eq!(out.pixel(31, 15), Some([0x1a, 0x2b, 0x3c, 0xff]));
}

#[test]
fn malformed_svg_is_a_render_error() {
    let r = SvgRasterizer::with_font_dirs(&[]);
    let err = r
        .rasterize_svg("<svg", Canvas { width: 4, height: 4 })
        .unwrap_err();
    assert!(matches!(err, LyricaError::Render(_)));
}

#[test]
fn zero_canvas_is_rejected() {
    let r = SvgRasterizer::with_font_dirs(&[]);
    assert!(r.render(&empty_frame(0, 10, Rgba8::rgb(0, 0, 0))).is_err());
}

#[test]
fn missing_font_dir_is_ignored() {
    let r = SvgRasterizer::with_font_dirs(&[Path::new("/definitely/not/a/font/dir")]);
    let base = SvgRasterizer::with_font_dirs(&[]);
    assert_eq!(r.face_count(), base.face_count());
}

#[test]
fn rasterizer_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SvgRasterizer>();
}
