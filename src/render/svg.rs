use crate::compose::frame::{FrameDescription, LineDescription};
use crate::theme::model::{LyricPosition, TextShadow};

/// Baseline offset below a row's vertical center, as a multiple of the font size.
const BASELINE_SHIFT: f64 = 0.35;
/// Glow blur radius as a multiple of the font size.
const GLOW_STD_DEV: f64 = 0.12;

/// Serialize a frame description into a standalone SVG document.
///
/// Rows are drawn back to front per line: shadow, glow, then the fill. Word and character
/// highlighting emits one `tspan` per token with its own fill and opacity.
pub fn frame_to_svg(frame: &FrameDescription) -> String {
    let w = frame.canvas.width;
    let h = frame.canvas.height;
    let mut out = String::with_capacity(1024 + frame.lines.len() * 512);

    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    ));
    if frame.lines.iter().any(|l| l.glow.is_some()) {
        out.push_str(&format!(
            r#"<defs><filter id="glow" x="-25%" y="-100%" width="150%" height="300%"><feGaussianBlur stdDeviation="{}"/></filter></defs>"#,
            num(frame.font_size * GLOW_STD_DEV)
        ));
    }
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"{}/>"#,
        frame.background.to_hex_rgb(),
        opacity_attr("fill-opacity", frame.background.alpha_f64()),
    ));

    for line in &frame.lines {
        push_line(&mut out, frame, line);
    }
    out.push_str("</svg>");
    out
}

fn push_line(out: &mut String, frame: &FrameDescription, line: &LineDescription) {
    for (r, row) in line.rows.iter().enumerate() {
        let y = line.row_y(r, frame.row_height) + frame.font_size * BASELINE_SHIFT;

        if let Some(TextShadow { color, offset }) = frame.shadow {
            let attrs = text_attrs(frame, line, line.x + offset[0], y + offset[1]);
            out.push_str(&format!(
                r#"<text {attrs} fill="{}"{}>{}</text>"#,
                color.to_hex_rgb(),
                opacity_attr("fill-opacity", color.alpha_f64() * line.alpha),
                escape(row),
            ));
        }

        if let Some(glow) = line.glow {
            let attrs = text_attrs(frame, line, line.x, y);
            out.push_str(&format!(
                r#"<text {attrs} fill="{}"{} filter="url(#glow)">{}</text>"#,
                glow.to_hex_rgb(),
                opacity_attr("fill-opacity", glow.alpha_f64() * line.alpha),
                escape(row),
            ));
        }

        let attrs = text_attrs(frame, line, line.x, y);
        if line.tokens.is_empty() {
            out.push_str(&format!(
                r#"<text {attrs} fill="{}"{}>{}</text>"#,
                line.color.to_hex_rgb(),
                opacity_attr("fill-opacity", line.color.alpha_f64() * line.alpha),
                escape(row),
            ));
            continue;
        }

        out.push_str(&format!("<text {attrs}>"));
        for tok in line.tokens.iter().filter(|t| t.row == r) {
            let alpha = if tok.lit { 1.0 } else { line.dim_alpha };
            out.push_str(&format!(
                r#"<tspan fill="{}"{}>{}</tspan>"#,
                line.color.to_hex_rgb(),
                opacity_attr(
                    "fill-opacity",
                    line.color.alpha_f64() * line.alpha * alpha
                ),
                escape(&tok.text),
            ));
        }
        out.push_str("</text>");
    }
}

fn text_attrs(frame: &FrameDescription, line: &LineDescription, x: f64, y: f64) -> String {
    let anchor = match line.anchor {
        LyricPosition::Left => "start",
        LyricPosition::Center => "middle",
        LyricPosition::Right => "end",
    };
    let weight = if line.bold { "bold" } else { "normal" };
    format!(
        r#"x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{weight}" text-anchor="{anchor}" xml:space="preserve""#,
        num(x),
        num(y),
        escape(&frame.font_family),
        num(frame.font_size),
    )
}

fn opacity_attr(name: &str, value: f64) -> String {
    let v = value.clamp(0.0, 1.0);
    if v >= 1.0 {
        String::new()
    } else {
        format!(r#" {name}="{}""#, num(v))
    }
}

fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

/// Escape text for use in SVG character data and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
