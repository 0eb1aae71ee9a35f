use crate::foundation::core::Canvas;
use crate::foundation::math::cosine_taper;
use crate::timeline::model::Timeline;

/// Per-frame placement of one visible lyric line.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LineRenderInfo {
    /// Index of the line in the timeline.
    pub index: usize,
    /// Display text.
    pub text: String,
    /// Vertical center of the line on screen, in pixels.
    pub screen_y: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Whether this is the line currently being sung.
    pub is_active: bool,
}

/// Distance-to-opacity falloff derived from the theme's inactive opacity gradient.
///
/// Only the gradient's length matters: lines fade out along a raised cosine that reaches zero at
/// `len + 1` line slots from center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct OpacityFalloff {
    max_dist: f64,
}

impl OpacityFalloff {
    /// Falloff for a gradient with `gradient_len` entries.
    pub fn from_gradient_len(gradient_len: usize) -> Self {
        Self {
            max_dist: gradient_len as f64 + 1.0,
        }
    }

    /// Distance, in line slots, at which lines disappear.
    pub fn max_dist(&self) -> f64 {
        self.max_dist
    }

    /// Opacity for a line `dist` slots from center, or `None` once it has faded out.
    pub fn alpha(&self, dist: f64) -> Option<f64> {
        if dist.is_nan() || dist >= self.max_dist {
            return None;
        }
        Some(cosine_taper(dist, self.max_dist))
    }
}

pub(crate) fn visible_lines(
    timeline: &Timeline,
    scroll_pos: f64,
    active: Option<usize>,
    line_height: f64,
    canvas: Canvas,
    falloff: OpacityFalloff,
) -> Vec<LineRenderInfo> {
    let center_y = canvas.center_y();
    let frame_h = f64::from(canvas.height);

    let mut out = Vec::new();
    for (i, line) in timeline.lines().iter().enumerate() {
        let screen_y = i as f64 * line_height - scroll_pos + center_y;
        if screen_y < -line_height || screen_y > frame_h + line_height {
            continue;
        }

        let dist = (screen_y - center_y).abs() / line_height;
        let Some(alpha) = falloff.alpha(dist) else {
            continue;
        };

        out.push(LineRenderInfo {
            index: i,
            text: line.text.clone(),
            screen_y,
            alpha,
            is_active: active == Some(i),
        });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/eval/visibility.rs"]
mod tests;
