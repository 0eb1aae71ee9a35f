use super::*;
use crate::timeline::model::LyricLine;

fn setup(lines: &[(f64, f64)], line_height: f64) -> (Timeline, TransitionSchedule) {
    let tl = Timeline::new(
        lines
            .iter()
            .map(|&(s, e)| LyricLine::new("x", s, e))
            .collect(),
    )
    .unwrap();
    let sched = TransitionSchedule::build(&tl, line_height).unwrap();
    (tl, sched)
}

#[test]
fn three_line_scenario() {
    let (tl, sched) = setup(&[(0.0, 4.0), (4.0, 10.0), (10.0, 13.0)], 120.0);
    assert_eq!(scroll_position(&tl, &sched, 0.0), 0.0);
    assert_eq!(scroll_position(&tl, &sched, 2.0), 0.0);
    assert_eq!(scroll_position(&tl, &sched, 2.5), 0.0);
    assert_eq!(scroll_position(&tl, &sched, 3.25), 60.0);
    assert_eq!(scroll_position(&tl, &sched, 4.0), 120.0);
    assert_eq!(scroll_position(&tl, &sched, 7.0), 120.0);
    assert_eq!(scroll_position(&tl, &sched, 10.0), 240.0);
    assert_eq!(scroll_position(&tl, &sched, 100.0), 240.0);
}

#[test]
fn single_line_never_moves() {
    let (tl, sched) = setup(&[(0.0, 5.0)], 120.0);
    let mut t = -10.0;
    while t <= 100.0 {
        assert_eq!(scroll_position(&tl, &sched, t), 0.0, "t={t}");
        t += 0.25;
    }
}

#[test]
fn late_single_line_rises_into_place() {
    let (tl, sched) = setup(&[(5.0, 8.0)], 100.0);
    assert_eq!(scroll_position(&tl, &sched, 1.0), -200.0);
    assert_eq!(scroll_position(&tl, &sched, 3.5), -100.0);
    assert_eq!(scroll_position(&tl, &sched, 5.0), 0.0);
    assert_eq!(scroll_position(&tl, &sched, 20.0), 0.0);

    let mut prev = f64::NEG_INFINITY;
    let mut t = 1.0;
    while t < 6.0 {
        let p = scroll_position(&tl, &sched, t);
        assert!(p >= prev && p <= 0.0, "t={t}");
        prev = p;
        t += 0.01;
    }
}

#[test]
fn zero_length_window_snaps_to_its_target() {
    let (tl, sched) = setup(&[(0.0, 4.0), (4.0, 6.0), (4.0, 8.0)], 120.0);
    assert!(sched.transitions()[1].is_degenerate());

    assert_eq!(scroll_position(&tl, &sched, 3.25), 60.0);
    assert_eq!(scroll_position(&tl, &sched, 4.0), 240.0);
    assert_eq!(scroll_position(&tl, &sched, 4.5), 240.0);
    for t in [3.9, 3.999_999, 4.0, 4.000_001, 4.1, 7.9] {
        let p = scroll_position(&tl, &sched, t);
        assert!(p.is_finite() && (0.0..=240.0).contains(&p), "t={t}");
    }

    // Zero-length window at the very start, with no lead-in in front of it.
    let (tl, sched) = setup(&[(0.0, 4.0), (0.0, 6.0)], 120.0);
    assert!(sched.pre_roll().is_none());
    assert!(sched.transitions()[0].is_degenerate());
    assert_eq!(scroll_position(&tl, &sched, 0.0), 120.0);
    assert_eq!(scroll_position(&tl, &sched, -1.0), 0.0);
}

#[test]
fn pre_roll_eases_from_below_center() {
    let (tl, sched) = setup(&[(5.0, 8.0), (8.0, 11.0)], 100.0);
    assert_eq!(scroll_position(&tl, &sched, -4.0), -200.0);
    assert_eq!(scroll_position(&tl, &sched, 2.0), -200.0);
    assert_eq!(scroll_position(&tl, &sched, 3.5), -100.0);
    assert_eq!(scroll_position(&tl, &sched, 5.0), 0.0);

    let mut prev = f64::NEG_INFINITY;
    let mut t = 2.0;
    while t < 5.0 {
        let p = scroll_position(&tl, &sched, t);
        assert!(p >= prev);
        assert!(p <= 0.0);
        prev = p;
        t += 0.01;
    }
}

#[test]
fn landing_is_exact_for_fractional_line_heights() {
    let (tl, sched) = setup(
        &[(0.3, 1.1), (1.1, 2.9), (2.9, 7.3), (7.3, 7.9), (7.9, 12.0)],
        108.7,
    );
    for tr in sched.transitions() {
        assert_eq!(
            scroll_position(&tl, &sched, tr.t_end),
            tr.to_idx as f64 * 108.7
        );
    }
}

#[test]
fn scroll_is_monotonic_inside_each_window() {
    let (tl, sched) = setup(&[(0.0, 4.0), (4.0, 10.0), (10.0, 10.5), (10.5, 13.0)], 120.0);
    for tr in sched.transitions() {
        let mut prev = scroll_position(&tl, &sched, tr.t_start);
        for i in 1..=200 {
            let t = tr.t_start + (tr.t_end - tr.t_start) * f64::from(i) / 200.0;
            let p = scroll_position(&tl, &sched, t);
            assert!(p >= prev, "t={t}");
            prev = p;
        }
    }
}

#[test]
fn no_jumps_between_neighbouring_samples() {
    let (tl, sched) = setup(
        &[(2.0, 4.0), (4.0, 10.0), (10.0, 10.5), (10.5, 30.0), (30.0, 33.0)],
        120.0,
    );
    let eps = 1e-4;
    // smoothstep peaks at slope 1.5 over the shortest window (0.2s) and the lead-in is 3s.
    let max_slope = 1.5 * 120.0 / 0.2;
    let mut t = -1.0;
    while t < 35.0 {
        let a = scroll_position(&tl, &sched, t);
        let b = scroll_position(&tl, &sched, t + eps);
        assert!((b - a).abs() <= max_slope * eps * 1.01, "jump at t={t}: {a} -> {b}");
        t += eps * 37.0;
    }
}

#[test]
fn out_of_range_times_are_finite() {
    let (tl, sched) = setup(&[(1.0, 2.0), (2.0, 3.0)], 50.0);
    for t in [f64::NEG_INFINITY, -1e12, 0.0, 1e12, f64::INFINITY, f64::NAN] {
        assert!(scroll_position(&tl, &sched, t).is_finite(), "t={t}");
    }
}
