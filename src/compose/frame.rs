use crate::eval::engine::ScrollEngine;
use crate::eval::highlight::{
    HighlightMode, HighlightState, HighlightToken, WRAP_MAX_CHARS, partition_tokens, wrap_text,
};
use crate::foundation::core::{Canvas, Rgba8};
use crate::theme::model::{LyricPosition, TextShadow, Theme};

/// Horizontal margin for left/right anchored lyrics, as a share of the frame width.
pub const SIDE_MARGIN_FRACTION: f64 = 0.08;
/// Distance between wrapped rows of one line, as a multiple of the font size.
pub const ROW_SPACING: f64 = 1.15;

/// Render-ready description of one output frame.
///
/// This is everything a rasterizer needs; it holds no references back into the engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameDescription {
    /// Presentation time in seconds.
    pub time_s: f64,
    /// Output size.
    pub canvas: Canvas,
    /// Solid background color.
    pub background: Rgba8,
    /// Font family for every row.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Vertical distance between wrapped rows.
    pub row_height: f64,
    /// Optional drop shadow.
    pub shadow: Option<TextShadow>,
    /// Visible lines in timeline order.
    pub lines: Vec<LineDescription>,
    /// Highlight state of the active line when it is on screen.
    pub highlight: Option<HighlightState>,
}

/// One visible lyric line, styled and wrapped.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LineDescription {
    /// Index of the line in the timeline.
    pub index: usize,
    /// Wrapped rows in reading order.
    pub rows: Vec<String>,
    /// Anchor x in pixels.
    pub x: f64,
    /// How rows hang off `x`.
    pub anchor: LyricPosition,
    /// Vertical center of the row block.
    pub screen_y: f64,
    /// Line opacity in `[0, 1]`.
    pub alpha: f64,
    /// Whether this is the line being sung.
    pub is_active: bool,
    /// Fill color.
    pub color: Rgba8,
    /// Bold weight.
    pub bold: bool,
    /// Glow color, active line only.
    pub glow: Option<Rgba8>,
    /// Lit/dim runs when the active line uses word or character highlighting.
    pub tokens: Vec<HighlightToken>,
    /// Opacity multiplier of dim tokens.
    pub dim_alpha: f64,
}

impl FrameDescription {
    /// `true` when both descriptions draw identical pixels.
    ///
    /// Time and the highlight summary are ignored; the drawn token runs live on the lines.
    pub fn same_picture(&self, other: &Self) -> bool {
        let Self {
            time_s: _,
            canvas,
            background,
            font_family,
            font_size,
            row_height,
            shadow,
            lines,
            highlight: _,
        } = self;
        *canvas == other.canvas
            && *background == other.background
            && *font_family == other.font_family
            && *font_size == other.font_size
            && *row_height == other.row_height
            && *shadow == other.shadow
            && *lines == other.lines
    }
}

impl LineDescription {
    /// Y of the baseline center of row `row`.
    pub fn row_y(&self, row: usize, row_height: f64) -> f64 {
        let n = self.rows.len().max(1) as f64;
        self.screen_y + (row as f64 - (n - 1.0) / 2.0) * row_height
    }
}

/// Combine engine queries at `t` with the resolved theme.
pub fn assemble_frame(engine: &ScrollEngine, theme: &Theme, t: f64) -> FrameDescription {
    let canvas = engine.canvas();
    let x = anchor_x(canvas, theme.lyric_position);
    let progress = engine.highlight_progress(t);
    let mut highlight = None;

    let lines = engine
        .visible_lines(t)
        .into_iter()
        .map(|info| {
            let rows = wrap_text(&info.text, WRAP_MAX_CHARS);
            let mut tokens = Vec::new();
            if info.is_active {
                let (state, toks) = partition_tokens(&rows, theme.highlight_mode, progress);
                highlight = Some(state);
                if theme.highlight_mode != HighlightMode::Line {
                    tokens = toks;
                }
            }
            LineDescription {
                index: info.index,
                rows,
                x,
                anchor: theme.lyric_position,
                screen_y: info.screen_y,
                alpha: info.alpha,
                is_active: info.is_active,
                color: if info.is_active {
                    theme.active_text_color
                } else {
                    theme.text_color
                },
                bold: info.is_active && theme.active_text_bold,
                glow: (info.is_active && theme.active_text_glow)
                    .then_some(theme.active_glow_color),
                tokens,
                dim_alpha: theme.highlight_dim_alpha,
            }
        })
        .collect();

    FrameDescription {
        lines,
        highlight,
        ..background_frame(canvas, theme, t)
    }
}

/// Frame with the theme's background and no lyric lines.
///
/// Used for stretches of a video that have no lyrics at all, such as a preview cut that ends
/// before the first line.
pub fn background_frame(canvas: Canvas, theme: &Theme, t: f64) -> FrameDescription {
    let font_size = f64::from(theme.font_size);
    FrameDescription {
        time_s: t,
        canvas,
        background: theme.background_color,
        font_family: theme.font_family.clone(),
        font_size,
        row_height: font_size * ROW_SPACING,
        shadow: theme.text_shadow,
        lines: Vec::new(),
        highlight: None,
    }
}

fn anchor_x(canvas: Canvas, position: LyricPosition) -> f64 {
    let w = f64::from(canvas.width);
    match position {
        LyricPosition::Left => w * SIDE_MARGIN_FRACTION,
        LyricPosition::Center => w / 2.0,
        LyricPosition::Right => w * (1.0 - SIDE_MARGIN_FRACTION),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
