use crate::eval::highlight::highlight_progress;
use crate::eval::position::scroll_position;
use crate::eval::visibility::{LineRenderInfo, OpacityFalloff, visible_lines};
use crate::foundation::core::Canvas;
use crate::foundation::error::{LyricaError, LyricaResult};
use crate::schedule::transitions::TransitionSchedule;
use crate::timeline::model::{LyricLine, Timeline};

/// Geometry inputs of the scroll engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Height of one line slot in pixels.
    pub line_height: f64,
    /// Opacity of lines 1, 2, ... slots away from center; its length sets how far lines stay
    /// visible.
    pub inactive_opacity_gradient: Vec<f64>,
    /// Output frame size.
    pub canvas: Canvas,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            line_height: 108.0,
            inactive_opacity_gradient: vec![0.6, 0.4, 0.2],
            canvas: Canvas::FULL_HD,
        }
    }
}

impl EngineConfig {
    /// Reject geometry the engine cannot lay out.
    pub fn validate(&self) -> LyricaResult<()> {
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(LyricaError::invalid_config(format!(
                "line_height must be a positive finite number, got {}",
                self.line_height
            )));
        }
        if let Some(bad) = self
            .inactive_opacity_gradient
            .iter()
            .find(|a| !(0.0..=1.0).contains(*a))
        {
            return Err(LyricaError::invalid_config(format!(
                "inactive opacity gradient entries must lie in [0, 1], got {bad}"
            )));
        }
        self.canvas.validate()
    }
}

/// Pure per-frame scroll engine over one song.
///
/// Built once per render job; every query is a side-effect-free function of `t`, so one engine
/// can be shared by reference across worker threads.
#[derive(Clone, Debug)]
pub struct ScrollEngine {
    timeline: Timeline,
    schedule: TransitionSchedule,
    falloff: OpacityFalloff,
    canvas: Canvas,
}

impl ScrollEngine {
    /// Validate `cfg` and schedule the song's transitions.
    #[tracing::instrument(skip_all, fields(lines = timeline.len()))]
    pub fn new(timeline: Timeline, cfg: &EngineConfig) -> LyricaResult<Self> {
        cfg.validate()?;
        let schedule = TransitionSchedule::build(&timeline, cfg.line_height)?;
        Ok(Self {
            timeline,
            schedule,
            falloff: OpacityFalloff::from_gradient_len(cfg.inactive_opacity_gradient.len()),
            canvas: cfg.canvas,
        })
    }

    /// Validate raw lines into a timeline, then build the engine.
    pub fn from_lines(lines: Vec<LyricLine>, cfg: &EngineConfig) -> LyricaResult<Self> {
        Self::new(Timeline::new(lines)?, cfg)
    }

    /// The validated timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The precomputed transition table.
    pub fn schedule(&self) -> &TransitionSchedule {
        &self.schedule
    }

    /// Output frame size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Height of one line slot.
    pub fn line_height(&self) -> f64 {
        self.schedule.line_height()
    }

    /// Opacity falloff in use.
    pub fn falloff(&self) -> OpacityFalloff {
        self.falloff
    }

    /// Line being sung at `t`; see [`Timeline::active_line_index`].
    pub fn active_line_index(&self, t: f64) -> Option<usize> {
        self.timeline.active_line_index(t)
    }

    /// Virtual y coordinate centered on screen at `t`.
    pub fn scroll_position(&self, t: f64) -> f64 {
        scroll_position(&self.timeline, &self.schedule, t)
    }

    /// Lines on screen at `t`, in timeline order, with position, opacity and active flag.
    pub fn visible_lines(&self, t: f64) -> Vec<LineRenderInfo> {
        visible_lines(
            &self.timeline,
            self.scroll_position(t),
            self.active_line_index(t),
            self.line_height(),
            self.canvas,
            self.falloff,
        )
    }

    /// Fraction of the active line sung at `t`, `0` when nothing is active.
    pub fn highlight_progress(&self, t: f64) -> f64 {
        highlight_progress(&self.timeline, t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/engine.rs"]
mod tests;
