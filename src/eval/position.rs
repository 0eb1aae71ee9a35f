use crate::foundation::math::smoothstep;
use crate::schedule::transitions::TransitionSchedule;
use crate::timeline::model::Timeline;

/// Virtual y coordinate (line `i` sits at `i * line_height`) centered on screen at time `t`.
///
/// Resolution order:
/// 1. before the first line: the lead-in (parked below center, then eased up to line 0);
/// 2. inside a scroll window: smoothstep from `from_idx` to `to_idx`;
/// 3. at or after a window's end: rest on the latest such window's `to_idx`, so zero-length
///    windows snap the moment they open;
/// 4. otherwise the active line, or 0 when nothing has started.
///
/// Step 3 uses the window's target rather than the active line: the view lands on the next
/// line when its start arrives, and the active index can lag behind during long holds.
pub(crate) fn scroll_position(timeline: &Timeline, schedule: &TransitionSchedule, t: f64) -> f64 {
    let line_height = schedule.line_height();

    if let Some(pre) = schedule.pre_roll()
        && t < pre.t_end
    {
        if t <= pre.t_start {
            return pre.start_pos;
        }
        let raw = (t - pre.t_start) / (pre.t_end - pre.t_start);
        return pre.start_pos * (1.0 - smoothstep(raw));
    }

    // A window at its end is complete; zero-length windows are complete as soon as they open.
    if let Some(tr) = schedule.containing(t)
        && t < tr.t_end
    {
        let raw = ((t - tr.t_start) / (tr.t_end - tr.t_start)).clamp(0.0, 1.0);
        if raw >= 1.0 {
            return tr.to_idx as f64 * line_height;
        }
        return tr.from_idx as f64 * line_height + smoothstep(raw) * line_height;
    }

    if let Some(tr) = schedule.last_completed(t) {
        return tr.to_idx as f64 * line_height;
    }

    match timeline.active_line_index(t) {
        Some(idx) => idx as f64 * line_height,
        None => 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/position.rs"]
mod tests;
