use super::*;
use crate::timeline::model::LyricLine;

fn timeline(starts_ends: &[(f64, f64)]) -> Timeline {
    Timeline::new(
        starts_ends
            .iter()
            .enumerate()
            .map(|(i, &(s, e))| LyricLine::new(format!("line {i}"), s, e))
            .collect(),
    )
    .unwrap()
}

#[test]
fn scroll_duration_is_capped_by_time_and_fraction() {
    let tl = timeline(&[(0.0, 4.0), (4.0, 10.0), (10.0, 11.0), (11.0, 13.0)]);
    let sched = TransitionSchedule::build(&tl, 120.0).unwrap();
    let trs = sched.transitions();
    assert_eq!(trs.len(), 3);

    // 4s slot: min(1.5, 1.6)
    assert_eq!(trs[0].t_start, 2.5);
    assert_eq!(trs[0].t_end, 4.0);
    assert_eq!((trs[0].from_idx, trs[0].to_idx), (0, 1));

    // 6s slot: capped at 1.5
    assert_eq!(trs[1].t_start, 8.5);

    // 1s slot: 40% of the slot
    assert!((trs[2].t_start - 10.6).abs() < 1e-12);
    assert_eq!(trs[2].t_end, 11.0);
}

#[test]
fn transitions_stay_inside_their_source_slot() {
    let tl = timeline(&[(0.5, 0.7), (0.7, 5.0), (5.0, 5.1), (5.1, 30.0), (30.0, 31.0)]);
    let sched = TransitionSchedule::build(&tl, 80.0).unwrap();
    for (tr, line) in sched.transitions().iter().zip(tl.lines()) {
        assert!(tr.t_start >= line.start_time);
        assert!(tr.t_start <= tr.t_end);
        assert_eq!(tr.t_end, tl.lines()[tr.to_idx].start_time);
    }
}

#[test]
fn single_line_at_zero_has_no_transitions_or_pre_roll() {
    let tl = timeline(&[(0.0, 5.0)]);
    let sched = TransitionSchedule::build(&tl, 120.0).unwrap();
    assert!(sched.transitions().is_empty());
    assert!(sched.pre_roll().is_none());
}

#[test]
fn late_single_line_still_gets_a_pre_roll() {
    let tl = timeline(&[(5.0, 8.0)]);
    let sched = TransitionSchedule::build(&tl, 100.0).unwrap();
    assert!(sched.transitions().is_empty());
    let pre = sched.pre_roll().unwrap();
    assert_eq!(pre.t_start, 2.0);
    assert_eq!(pre.t_end, 5.0);
    assert_eq!(pre.start_pos, -200.0);
}

#[test]
fn equal_starts_make_a_zero_length_transition() {
    let tl = timeline(&[(0.0, 4.0), (4.0, 6.0), (4.0, 8.0)]);
    let sched = TransitionSchedule::build(&tl, 120.0).unwrap();
    let trs = sched.transitions();
    assert!(!trs[0].is_degenerate());
    assert!(trs[1].is_degenerate());
    assert_eq!((trs[1].t_start, trs[1].t_end), (4.0, 4.0));
    assert_eq!(sched.last_completed(4.0).map(|tr| tr.to_idx), Some(2));
}

#[test]
fn pre_roll_window_is_clamped_at_zero() {
    let tl = timeline(&[(1.2, 3.0), (3.0, 4.0)]);
    let sched = TransitionSchedule::build(&tl, 100.0).unwrap();
    let pre = sched.pre_roll().unwrap();
    assert_eq!(pre.t_start, 0.0);
    assert_eq!(pre.t_end, 1.2);
    assert_eq!(pre.start_pos, -200.0);

    let tl = timeline(&[(10.0, 12.0), (12.0, 14.0)]);
    let sched = TransitionSchedule::build(&tl, 100.0).unwrap();
    assert_eq!(sched.pre_roll().unwrap().t_start, 7.0);

    let tl = timeline(&[(0.0, 2.0), (2.0, 4.0)]);
    let sched = TransitionSchedule::build(&tl, 100.0).unwrap();
    assert!(sched.pre_roll().is_none());
}

#[test]
fn rejects_non_positive_line_height() {
    let tl = timeline(&[(0.0, 1.0)]);
    for h in [0.0, -4.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            TransitionSchedule::build(&tl, h),
            Err(LyricaError::InvalidConfig(_))
        ));
    }
}

#[test]
fn sorted_lookups_match_linear_scan() {
    let tl = timeline(&[
        (0.0, 0.3),
        (0.3, 2.0),
        (2.0, 2.0 + 1e-9),
        (2.0 + 1e-9, 9.0),
        (9.0, 9.5),
        (9.5, 12.0),
    ]);
    let sched = TransitionSchedule::build(&tl, 64.0).unwrap();
    let trs = sched.transitions();

    let mut t = -1.0;
    while t < 14.0 {
        let linear_in = trs.iter().find(|tr| tr.contains(t));
        assert_eq!(sched.containing(t), linear_in, "containing at t={t}");

        let linear_done = trs.iter().rev().find(|tr| t >= tr.t_end);
        assert_eq!(sched.last_completed(t), linear_done, "last_completed at t={t}");
        t += 0.01;
    }

    for tr in trs {
        assert_eq!(sched.containing(tr.t_end), trs.iter().find(|x| x.contains(tr.t_end)));
        assert_eq!(
            sched.last_completed(tr.t_end).map(|x| x.to_idx),
            Some(tr.to_idx)
        );
    }
}
