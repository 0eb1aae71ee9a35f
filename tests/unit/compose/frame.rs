use super::*;
use crate::eval::engine::EngineConfig;
use crate::timeline::model::LyricLine;

fn engine() -> ScrollEngine {
    ScrollEngine::from_lines(
        vec![
            LyricLine::new("hold me closer", 0.0, 4.0),
            LyricLine::new("tiny dancer", 4.0, 10.0),
            LyricLine::new("count the headlights on the highway", 10.0, 13.0),
        ],
        &EngineConfig {
            line_height: 120.0,
            inactive_opacity_gradient: vec![0.6, 0.4, 0.2],
            canvas: Canvas::FULL_HD,
        },
    )
    .unwrap()
}

#[test]
fn active_line_gets_active_style() {
    let theme = Theme {
        active_text_color: Rgba8::rgb(255, 0, 0),
        active_text_bold: true,
        ..Theme::default()
    };
    let frame = assemble_frame(&engine(), &theme, 5.0);
    let active = frame.lines.iter().find(|l| l.is_active).unwrap();
    assert_eq!(active.index, 1);
    assert_eq!(active.color, Rgba8::rgb(255, 0, 0));
    assert!(active.bold);
    assert_eq!(active.glow, Some(theme.active_glow_color));
    assert!(active.tokens.is_empty());

    for other in frame.lines.iter().filter(|l| !l.is_active) {
        assert_eq!(other.color, theme.text_color);
        assert!(!other.bold && other.glow.is_none());
    }
    assert_eq!(frame.background, theme.background_color);
}

#[test]
fn word_mode_marks_sung_words() {
    let theme = Theme {
        highlight_mode: HighlightMode::Word,
        ..Theme::default()
    };
    // 0.625 through "hold me closer"
    let frame = assemble_frame(&engine(), &theme, 2.5);
    let active = frame.lines.iter().find(|l| l.is_active).unwrap();
    let lit: Vec<_> = active.tokens.iter().map(|t| (t.text.as_str(), t.lit)).collect();
    assert_eq!(lit, [("hold ", true), ("me ", true), ("closer", false)]);
    let hl = frame.highlight.unwrap();
    assert_eq!((hl.lit_token_count, hl.total_token_count), (2, 3));
}

#[test]
fn rows_stack_around_screen_y() {
    let line = LineDescription {
        index: 0,
        rows: vec!["a".into(), "b".into()],
        x: 0.0,
        anchor: LyricPosition::Center,
        screen_y: 500.0,
        alpha: 1.0,
        is_active: false,
        color: Rgba8::rgb(0, 0, 0),
        bold: false,
        glow: None,
        tokens: vec![],
        dim_alpha: 0.3,
    };
    assert_eq!(line.row_y(0, 80.0), 460.0);
    assert_eq!(line.row_y(1, 80.0), 540.0);
}

#[test]
fn anchor_follows_lyric_position() {
    let c = Canvas::FULL_HD;
    assert_eq!(anchor_x(c, LyricPosition::Center), 960.0);
    assert!(anchor_x(c, LyricPosition::Left) < anchor_x(c, LyricPosition::Right));
}

#[test]
fn resting_frames_draw_the_same_picture() {
    let e = engine();
    let theme = Theme::default();
    // between the 0->1 landing at 4.0 and the next lead at 8.5
    let a = assemble_frame(&e, &theme, 5.0);
    let b = assemble_frame(&e, &theme, 6.0);
    assert_ne!(a, b);
    assert!(a.same_picture(&b));

    let moving = assemble_frame(&e, &theme, 9.0);
    assert!(!a.same_picture(&moving));
}

#[test]
fn description_serializes_to_json() {
    let frame = assemble_frame(&engine(), &Theme::default(), 5.0);
    let v = serde_json::to_value(&frame).unwrap();
    assert_eq!(v["time_s"], 5.0);
    assert_eq!(v["lines"].as_array().unwrap().len(), frame.lines.len());
    assert_eq!(v["lines"][0]["anchor"], "center");
}

#[test]
fn background_frame_matches_the_assembled_base() {
    let theme = Theme {
        background_color: Rgba8::rgb(10, 20, 30),
        ..Theme::default()
    };
    let bare = background_frame(Canvas::FULL_HD, &theme, 1.5);
    assert!(bare.lines.is_empty());
    assert!(bare.highlight.is_none());
    assert_eq!(bare.time_s, 1.5);
    assert_eq!(bare.background, Rgba8::rgb(10, 20, 30));

    let full = assemble_frame(&engine(), &theme, 1.5);
    assert_eq!(bare.font_family, full.font_family);
    assert_eq!(bare.row_height, full.row_height);
    assert!(bare.same_picture(&background_frame(Canvas::FULL_HD, &theme, 99.0)));
}
