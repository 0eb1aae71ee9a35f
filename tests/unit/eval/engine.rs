use super::*;

fn cfg(gradient: &[f64]) -> EngineConfig {
    EngineConfig {
        line_height: 120.0,
        inactive_opacity_gradient: gradient.to_vec(),
        canvas: Canvas::FULL_HD,
    }
}

fn three_line_engine() -> ScrollEngine {
    ScrollEngine::from_lines(
        vec![
            LyricLine::new("one", 0.0, 4.0),
            LyricLine::new("two", 4.0, 10.0),
            LyricLine::new("three", 10.0, 13.0),
        ],
        &cfg(&[0.6, 0.4, 0.2]),
    )
    .unwrap()
}

#[test]
fn construction_errors_are_typed() {
    let lines = vec![LyricLine::new("a", 0.0, 1.0)];
    let mut bad = cfg(&[0.5]);
    bad.line_height = 0.0;
    assert!(matches!(
        ScrollEngine::from_lines(lines.clone(), &bad),
        Err(LyricaError::InvalidConfig(_))
    ));
    assert!(matches!(
        ScrollEngine::from_lines(lines.clone(), &cfg(&[1.5])),
        Err(LyricaError::InvalidConfig(_))
    ));
    assert!(matches!(
        ScrollEngine::from_lines(vec![LyricLine::new("a", 3.0, 1.0)], &cfg(&[])),
        Err(LyricaError::InvalidTimeline(_))
    ));
}

#[test]
fn mid_scroll_frame_places_both_lines() {
    let engine = three_line_engine();
    let lines = engine.visible_lines(3.25);
    let one = lines.iter().find(|l| l.index == 0).unwrap();
    let two = lines.iter().find(|l| l.index == 1).unwrap();
    assert_eq!(one.screen_y, 480.0);
    assert_eq!(two.screen_y, 600.0);
    assert!(one.is_active && !two.is_active);
    assert_eq!(one.alpha, two.alpha);
}

#[test]
fn view_rests_on_landed_line() {
    let engine = three_line_engine();
    let lines = engine.visible_lines(7.0);
    let two = lines.iter().find(|l| l.index == 1).unwrap();
    assert_eq!(two.screen_y, 540.0);
    assert_eq!(two.alpha, 1.0);
    assert!(two.is_active);
    assert!(engine.highlight_progress(7.0) > 0.49 && engine.highlight_progress(7.0) < 0.51);
}

#[test]
fn engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ScrollEngine>();
}
