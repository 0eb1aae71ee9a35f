use crate::eval::engine::EngineConfig;
use crate::eval::highlight::HighlightMode;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{LyricaError, LyricaResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Horizontal anchoring of lyric rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricPosition {
    /// Rows start at the left margin.
    Left,
    /// Rows are centered horizontally.
    #[default]
    Center,
    /// Rows end at the right margin.
    Right,
}

impl LyricPosition {
    /// Parse `left` / `center` / `right`.
    pub fn parse(s: &str) -> LyricaResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(LyricaError::invalid_config(format!(
                "unknown lyric position '{other}' (expected left, center or right)"
            ))),
        }
    }
}

fn parse_highlight_mode(s: &str) -> Option<HighlightMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "line" => Some(HighlightMode::Line),
        "word" => Some(HighlightMode::Word),
        "character" => Some(HighlightMode::Character),
        _ => None,
    }
}

/// Drop shadow drawn under every lyric row.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextShadow {
    /// Shadow color.
    pub color: Rgba8,
    /// Offset in pixels (x, y).
    pub offset: [f64; 2],
}

/// Fully resolved, immutable theme.
///
/// Fallback chains (`active_glow_color -> active_text_color -> text_color`) and legacy keys are
/// resolved once when the theme is loaded.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Theme {
    /// Display name.
    pub name: String,
    /// Solid frame background.
    pub background_color: Rgba8,
    /// Color of inactive lines.
    pub text_color: Rgba8,
    /// Color of the active line.
    pub active_text_color: Rgba8,
    /// Draw the active line bold.
    pub active_text_bold: bool,
    /// Draw a glow behind the active line.
    pub active_text_glow: bool,
    /// Glow color.
    pub active_glow_color: Rgba8,
    /// Opacity of lines 1, 2, ... away from center.
    pub inactive_text_opacity_gradient: Vec<f64>,
    /// Font family name (falls back to a sans-serif face when missing).
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: u32,
    /// Line slot height as a multiple of `font_size`.
    pub line_spacing: f64,
    /// Horizontal anchoring.
    pub lyric_position: LyricPosition,
    /// Sub-line highlight granularity.
    pub highlight_mode: HighlightMode,
    /// Opacity multiplier of not-yet-sung tokens on the active line.
    pub highlight_dim_alpha: f64,
    /// Optional drop shadow.
    pub text_shadow: Option<TextShadow>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Default".to_owned(),
            background_color: Rgba8::rgb(0x1a, 0x1a, 0x1a),
            text_color: Rgba8::rgb(0xff, 0xff, 0xff),
            active_text_color: Rgba8::rgb(0xff, 0xff, 0xff),
            active_text_bold: false,
            active_text_glow: true,
            active_glow_color: Rgba8::rgb(0xff, 0xff, 0xff),
            inactive_text_opacity_gradient: vec![0.6, 0.4, 0.2],
            font_family: "Arial".to_owned(),
            font_size: 72,
            line_spacing: 1.5,
            lyric_position: LyricPosition::Center,
            highlight_mode: HighlightMode::Line,
            highlight_dim_alpha: 0.3,
            text_shadow: None,
        }
    }
}

impl Theme {
    /// Parse and resolve a theme from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LyricaResult<Self> {
        let def: ThemeDef = serde_json::from_reader(r)
            .map_err(|e| LyricaError::serde(format!("parse theme JSON: {e}")))?;
        def.resolve()
    }

    /// Parse and resolve a theme from a JSON string.
    pub fn from_json_str(s: &str) -> LyricaResult<Self> {
        let def: ThemeDef = serde_json::from_str(s)
            .map_err(|e| LyricaError::serde(format!("parse theme JSON: {e}")))?;
        def.resolve()
    }

    /// Parse and resolve a theme JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> LyricaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LyricaError::validation(format!("open theme JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f)).map_err(|e| match e {
            LyricaError::InvalidConfig(msg) => {
                LyricaError::invalid_config(format!("theme '{}': {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Line slot height in pixels: `floor(line_spacing * font_size)`.
    pub fn line_height(&self) -> f64 {
        (self.line_spacing * f64::from(self.font_size)).floor()
    }

    /// Engine geometry for this theme on `canvas`.
    pub fn engine_config(&self, canvas: Canvas) -> EngineConfig {
        EngineConfig {
            line_height: self.line_height(),
            inactive_opacity_gradient: self.inactive_text_opacity_gradient.clone(),
            canvas,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ThemeDef {
    name: Option<String>,
    background_color: Option<String>,
    text_color: Option<String>,
    active_text_color: Option<String>,
    active_text_bold: Option<bool>,
    active_text_glow: Option<bool>,
    active_glow_color: Option<String>,
    inactive_text_opacity_gradient: Option<Vec<f64>>,
    font_family: Option<String>,
    font_size: Option<f64>,
    line_spacing: Option<f64>,
    lyric_position: Option<String>,
    highlight_mode: Option<String>,
    highlight_dim_alpha: Option<f64>,
    text_shadow: Option<bool>,
    text_shadow_color: Option<String>,
    text_shadow_offset: Option<[f64; 2]>,

    // Legacy spellings.
    glow_enabled: Option<bool>,
    inactive_alphas: Option<Vec<f64>>,
    line_height: Option<f64>,
}

impl ThemeDef {
    fn resolve(self) -> LyricaResult<Theme> {
        let defaults = Theme::default();
        let mut errors = Vec::<String>::new();

        let mut color = |key: &str, value: Option<&String>| -> Option<Rgba8> {
            let value = value?;
            match Rgba8::from_hex(value) {
                Ok(c) => Some(c),
                Err(_) => {
                    errors.push(format!(
                        "'{key}': '{value}' is not a valid hex color (expected #RRGGBB)"
                    ));
                    None
                }
            }
        };
        let background_color = color("background_color", self.background_color.as_ref());
        let text_color = color("text_color", self.text_color.as_ref());
        let active_text_color = color("active_text_color", self.active_text_color.as_ref());
        let active_glow_color = color("active_glow_color", self.active_glow_color.as_ref());
        let text_shadow_color = color("text_shadow_color", self.text_shadow_color.as_ref());

        let lyric_position = match self.lyric_position.as_deref() {
            None => Some(defaults.lyric_position),
            Some(s) => LyricPosition::parse(s).ok(),
        };
        if lyric_position.is_none() {
            errors.push("'lyric_position': must be 'left', 'center', or 'right'".to_owned());
        }

        let highlight_mode = match self.highlight_mode.as_deref() {
            None => Some(defaults.highlight_mode),
            Some(s) => parse_highlight_mode(s),
        };
        if highlight_mode.is_none() {
            errors.push("'highlight_mode': must be 'line', 'word', or 'character'".to_owned());
        }

        let gradient = self
            .inactive_text_opacity_gradient
            .or(self.inactive_alphas)
            .unwrap_or_else(|| defaults.inactive_text_opacity_gradient.clone());
        if gradient.iter().any(|a| !(0.0..=1.0).contains(a)) {
            errors.push(
                "'inactive_text_opacity_gradient': must be a list of floats between 0.0 and 1.0"
                    .to_owned(),
            );
        }

        let font_size = self.font_size.unwrap_or(f64::from(defaults.font_size));
        let font_size_ok = font_size.is_finite()
            && font_size > 0.0
            && font_size.fract() == 0.0
            && font_size <= f64::from(u32::MAX);
        if !font_size_ok {
            errors.push("'font_size': must be a positive integer".to_owned());
        }

        let line_spacing = match (self.line_spacing, self.line_height) {
            (Some(ls), _) => ls,
            (None, Some(lh)) if font_size_ok => lh / font_size,
            (None, _) => defaults.line_spacing,
        };
        if !line_spacing.is_finite() || line_spacing <= 0.0 {
            errors.push("'line_spacing': must be a positive number".to_owned());
        }

        let highlight_dim_alpha = self
            .highlight_dim_alpha
            .unwrap_or(defaults.highlight_dim_alpha);
        if !(0.0..=1.0).contains(&highlight_dim_alpha) {
            errors.push("'highlight_dim_alpha': must be between 0.0 and 1.0".to_owned());
        }

        if !errors.is_empty() {
            return Err(LyricaError::invalid_config(format!(
                "invalid theme:\n{}",
                errors
                    .iter()
                    .map(|e| format!("  - {e}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            )));
        }

        let text_color = text_color.unwrap_or(defaults.text_color);
        let active_text_color = active_text_color.unwrap_or(text_color);
        let active_glow_color = active_glow_color.unwrap_or(active_text_color);
        let text_shadow = self.text_shadow.unwrap_or(false).then(|| TextShadow {
            color: text_shadow_color.unwrap_or(Rgba8::rgb(0, 0, 0)),
            offset: self.text_shadow_offset.unwrap_or([3.0, 3.0]),
        });

        Ok(Theme {
            name: self.name.unwrap_or(defaults.name),
            background_color: background_color.unwrap_or(defaults.background_color),
            text_color,
            active_text_color,
            active_text_bold: self.active_text_bold.unwrap_or(defaults.active_text_bold),
            active_text_glow: self
                .active_text_glow
                .or(self.glow_enabled)
                .unwrap_or(defaults.active_text_glow),
            active_glow_color,
            inactive_text_opacity_gradient: gradient,
            font_family: self.font_family.unwrap_or(defaults.font_family),
            font_size: font_size as u32,
            line_spacing,
            lyric_position: lyric_position.unwrap_or_default(),
            highlight_mode: highlight_mode.unwrap_or_default(),
            highlight_dim_alpha,
            text_shadow,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/model.rs"]
mod tests;
