use crate::foundation::error::{LyricaError, LyricaResult};
use crate::timeline::model::Timeline;

/// Upper bound, in seconds, on how long a scroll between two lines may take.
pub const LEAD_CAP_SECONDS: f64 = 1.5;
/// Upper bound on the share of a line's slot spent scrolling to the next line.
pub const LEAD_FRACTION: f64 = 0.40;
/// Length of the lead-in before the first line is sung.
pub const INTRO_SECONDS: f64 = 3.0;
/// How many line slots below center the first line is parked before the lead-in.
pub const INTRO_OFFSET_LINES: f64 = 2.0;

/// Scroll window from line `from_idx` to line `to_idx`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Transition {
    /// Time the scroll begins.
    pub t_start: f64,
    /// Time the scroll lands on `to_idx`; equals the next line's start time.
    pub t_end: f64,
    /// Line centered before the scroll.
    pub from_idx: usize,
    /// Line centered after the scroll.
    pub to_idx: usize,
}

impl Transition {
    /// `true` for a zero-length window (snap instead of scroll).
    pub fn is_degenerate(&self) -> bool {
        self.t_end <= self.t_start
    }

    /// `true` when `t_start <= t <= t_end`.
    pub fn contains(&self, t: f64) -> bool {
        self.t_start <= t && t <= self.t_end
    }
}

/// Lead-in window that scrolls the first lines up from below center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PreRoll {
    /// Time the lead-in begins (never before 0).
    pub t_start: f64,
    /// First line's start time.
    pub t_end: f64,
    /// Scroll position held until `t_start` (negative: lines parked below center).
    pub start_pos: f64,
}

/// Scroll windows for a whole song, computed once and never mutated.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TransitionSchedule {
    line_height: f64,
    transitions: Vec<Transition>,
    pre_roll: Option<PreRoll>,
}

impl TransitionSchedule {
    /// Schedule one transition per consecutive line pair plus the first line's lead-in.
    ///
    /// Each scroll ends exactly on the next line's start and lasts
    /// `min(LEAD_CAP_SECONDS, slot * LEAD_FRACTION)`, where the slot runs from this line's
    /// start to the next line's start.
    ///
    /// The lead-in exists whenever the first line starts after 0, single-line songs included;
    /// a zero-length lead-in would otherwise snap at the first line.
    #[tracing::instrument(skip(timeline), fields(lines = timeline.len()))]
    pub fn build(timeline: &Timeline, line_height: f64) -> LyricaResult<Self> {
        if !line_height.is_finite() || line_height <= 0.0 {
            return Err(LyricaError::invalid_config(format!(
                "line_height must be a positive finite number, got {line_height}"
            )));
        }

        let lines = timeline.lines();
        let transitions = lines
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let available = pair[1].start_time - pair[0].start_time;
                let scroll_duration = LEAD_CAP_SECONDS.min(available * LEAD_FRACTION);
                let t_end = pair[1].start_time;
                Transition {
                    t_start: t_end - scroll_duration,
                    t_end,
                    from_idx: i,
                    to_idx: i + 1,
                }
            })
            .collect::<Vec<_>>();

        let first_start = timeline.first().start_time;
        let pre_roll = (first_start > 0.0).then(|| PreRoll {
            t_start: (first_start - INTRO_SECONDS).max(0.0),
            t_end: first_start,
            start_pos: -INTRO_OFFSET_LINES * line_height,
        });

        tracing::debug!(
            transitions = transitions.len(),
            degenerate = transitions.iter().filter(|t| t.is_degenerate()).count(),
            pre_roll = pre_roll.is_some(),
            "scheduled scroll transitions"
        );

        Ok(Self {
            line_height,
            transitions,
            pre_roll,
        })
    }

    /// Height of one line slot in virtual space.
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Transitions in timeline order (sorted by `t_end`).
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The first line's lead-in, if any.
    pub fn pre_roll(&self) -> Option<&PreRoll> {
        self.pre_roll.as_ref()
    }

    /// The earliest transition whose window contains `t`.
    ///
    /// Later windows start no earlier than the previous `t_end`, so the first transition with
    /// `t_end >= t` is the only candidate.
    pub fn containing(&self, t: f64) -> Option<&Transition> {
        let idx = self.transitions.partition_point(|tr| tr.t_end < t);
        self.transitions.get(idx).filter(|tr| tr.contains(t))
    }

    /// The last transition with `t_end <= t`.
    pub fn last_completed(&self, t: f64) -> Option<&Transition> {
        let idx = self.transitions.partition_point(|tr| tr.t_end <= t);
        idx.checked_sub(1).and_then(|i| self.transitions.get(i))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/transitions.rs"]
mod tests;
