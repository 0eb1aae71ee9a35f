use std::path::Path;
use std::sync::Arc;

use crate::compose::frame::FrameDescription;
use crate::foundation::core::Canvas;
use crate::foundation::error::{LyricaError, LyricaResult};
use crate::render::backend::FrameRGBA;
use crate::render::svg::frame_to_svg;

/// Largest frame edge the rasterizer will allocate.
const MAX_DIM: u32 = 16_384;

/// Rasterizes frame descriptions through `usvg` + `resvg`.
///
/// The font database is loaded once and shared; the rasterizer is `Sync` and can be used from
/// rayon workers by reference.
#[derive(Clone)]
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl SvgRasterizer {
    /// Rasterizer over the system fonts.
    #[tracing::instrument]
    pub fn new() -> Self {
        Self::with_font_dirs(&[])
    }

    /// Rasterizer over the system fonts plus every `.ttf`/`.otf`/`.ttc` file in `dirs`.
    pub fn with_font_dirs(dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font database loaded");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Rasterize one frame description.
    pub fn render(&self, frame: &FrameDescription) -> LyricaResult<FrameRGBA> {
        self.rasterize_svg(&frame_to_svg(frame), frame.canvas)
    }

    /// Parse `svg` and draw it scaled to `canvas`, returning premultiplied RGBA8.
    pub fn rasterize_svg(&self, svg: &str, canvas: Canvas) -> LyricaResult<FrameRGBA> {
        canvas.validate()?;
        if canvas.width > MAX_DIM || canvas.height > MAX_DIM {
            return Err(LyricaError::render(format!(
                "frame size too large: {}x{} (max {MAX_DIM}x{MAX_DIM})",
                canvas.width, canvas.height
            )));
        }

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts)
            .map_err(|e| LyricaError::render(format!("parse svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| LyricaError::render("failed to allocate frame pixmap"))?;
        let sx = canvas.width as f32 / tree.size().width();
        let sy = canvas.height as f32 / tree.size().height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping font file");
        }
    }
}

/// Resolve the requested family, then fall back to generic sans-serif faces and finally to any face.
fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                })
                .collect::<Vec<_>>();
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Serif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
