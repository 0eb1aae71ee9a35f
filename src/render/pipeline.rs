use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::compose::frame::{FrameDescription, assemble_frame, background_frame};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::eval::engine::ScrollEngine;
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{LyricaError, LyricaResult};
use crate::render::backend::FrameRGBA;
use crate::render::raster::SvgRasterizer;
use crate::theme::model::Theme;
use crate::timeline::lyrics::LyricsDoc;
use crate::timeline::model::Timeline;

/// Maps output frames to presentation times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSchedule {
    fps: Fps,
    total_duration: f64,
}

impl FrameSchedule {
    /// Schedule covering `total_duration` seconds at `fps`.
    pub fn new(fps: Fps, total_duration: f64) -> LyricaResult<Self> {
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(LyricaError::invalid_config(format!(
                "total duration must be finite and > 0, got {total_duration}"
            )));
        }
        Ok(Self {
            fps,
            total_duration,
        })
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Covered duration in seconds.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// `ceil(total_duration × fps)`.
    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_ceil(self.total_duration)
    }

    /// Presentation time of frame `idx`.
    pub fn time_of(&self, idx: FrameIndex) -> f64 {
        self.fps.frames_to_secs(idx.0)
    }

    /// Every frame of the schedule.
    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.frame_count()),
        }
    }
}

/// A lyric video ready to render: engine, theme, frame schedule and optional audio track.
///
/// A video without lyric lines has no engine and renders the background only.
#[derive(Clone, Debug)]
pub struct LyricVideo {
    engine: Option<ScrollEngine>,
    theme: Theme,
    canvas: Canvas,
    schedule: FrameSchedule,
    audio: Option<PathBuf>,
}

impl LyricVideo {
    /// Build the engine for `timeline` with the theme's layout on `canvas`.
    #[tracing::instrument(skip_all, fields(lines = timeline.len(), duration = total_duration))]
    pub fn new(
        timeline: Timeline,
        theme: Theme,
        canvas: Canvas,
        fps: Fps,
        total_duration: f64,
    ) -> LyricaResult<Self> {
        let schedule = FrameSchedule::new(fps, total_duration)?;
        let engine = ScrollEngine::new(timeline, &theme.engine_config(canvas))?;
        Ok(Self {
            engine: Some(engine),
            theme,
            canvas,
            schedule,
            audio: None,
        })
    }

    /// Background-only video, for instrumental stretches or a preview cut before the first line.
    ///
    /// The theme's layout is still validated against `canvas`.
    pub fn without_lyrics(
        theme: Theme,
        canvas: Canvas,
        fps: Fps,
        total_duration: f64,
    ) -> LyricaResult<Self> {
        let schedule = FrameSchedule::new(fps, total_duration)?;
        theme.engine_config(canvas).validate()?;
        Ok(Self {
            engine: None,
            theme,
            canvas,
            schedule,
            audio: None,
        })
    }

    /// Video for a loaded lyrics document; an empty document yields a background-only video.
    pub fn from_lyrics(
        doc: &LyricsDoc,
        theme: Theme,
        canvas: Canvas,
        fps: Fps,
        total_duration: f64,
    ) -> LyricaResult<Self> {
        if doc.lines.is_empty() {
            tracing::info!("no lyric lines in range, rendering background only");
            return Self::without_lyrics(theme, canvas, fps, total_duration);
        }
        Self::new(doc.timeline()?, theme, canvas, fps, total_duration)
    }

    /// Attach an audio track for sinks that mux audio.
    pub fn with_audio(mut self, path: impl Into<PathBuf>) -> Self {
        self.audio = Some(path.into());
        self
    }

    /// Timeline engine, `None` for a background-only video.
    pub fn engine(&self) -> Option<&ScrollEngine> {
        self.engine.as_ref()
    }

    /// Resolved theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Frame schedule.
    pub fn schedule(&self) -> &FrameSchedule {
        &self.schedule
    }

    /// Output size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Attached audio track, if any.
    pub fn audio(&self) -> Option<&Path> {
        self.audio.as_deref()
    }

    /// Frame description at an arbitrary time.
    pub fn describe_at(&self, t: f64) -> FrameDescription {
        match &self.engine {
            Some(engine) => assemble_frame(engine, &self.theme, t),
            None => background_frame(self.canvas, &self.theme, t),
        }
    }

    /// Frame description of output frame `idx`.
    pub fn describe_frame(&self, idx: FrameIndex) -> FrameDescription {
        self.describe_at(self.schedule.time_of(idx))
    }

    /// Sink configuration matching this video.
    pub fn sink_config(&self) -> SinkConfig {
        let canvas = self.canvas();
        SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.schedule.fps(),
            audio: self.audio.clone().map(|path| AudioInputConfig { path }),
        }
    }
}

/// Describe and rasterize a single frame.
pub fn render_frame(
    video: &LyricVideo,
    idx: FrameIndex,
    rasterizer: &SvgRasterizer,
) -> LyricaResult<FrameRGBA> {
    rasterizer.render(&video.describe_frame(idx))
}

#[derive(Clone, Debug)]
/// Threading and chunking controls for multi-frame rendering.
pub struct RenderThreading {
    /// Enable parallel rendering when `true`.
    pub parallel: bool,
    /// Chunk size in frames for batched scheduling.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Reuse the previous raster when consecutive frames draw the same picture.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Total requested frames.
    pub frames_total: u64,
    /// Frames that were actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused via static-frame elision.
    pub frames_elided: u64,
}

/// Render `range` and push every frame to `sink` in frame order.
///
/// Frames are described sequentially and rasterized per chunk, on a rayon pool when
/// `threading.parallel` is set. The sink sees `begin`, every frame in increasing order, then
/// `end`.
#[tracing::instrument(
    skip_all,
    fields(start = range.start.0, end = range.end.0, parallel = threading.parallel)
)]
pub fn render_range(
    video: &LyricVideo,
    range: FrameRange,
    rasterizer: &SvgRasterizer,
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
) -> LyricaResult<RenderStats> {
    if range.is_empty() {
        return Err(LyricaError::validation("render range must be non-empty"));
    }
    let frame_count = video.schedule().frame_count();
    if range.end.0 > frame_count {
        return Err(LyricaError::validation(format!(
            "render range end {} exceeds frame count {frame_count}",
            range.end.0
        )));
    }

    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    sink.begin(video.sink_config())?;

    let mut stats = RenderStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;

        let out = render_chunk(video, chunk, rasterizer, threading, pool.as_ref())?;
        for (offset, &u) in out.frame_to_unique.iter().enumerate() {
            let frame = out.unique_frames.get(u).ok_or_else(|| {
                LyricaError::render("internal error: unique frame index out of range")
            })?;
            sink.push_frame(FrameIndex(chunk_start + offset as u64), frame)?;
        }

        stats.frames_total += out.stats.frames_total;
        stats.frames_rendered += out.stats.frames_rendered;
        stats.frames_elided += out.stats.frames_elided;
        chunk_start = chunk_end;
    }

    sink.end()?;
    tracing::debug!(
        total = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "render range finished"
    );
    Ok(stats)
}

struct ChunkOut {
    unique_frames: Vec<FrameRGBA>,
    frame_to_unique: Vec<usize>,
    stats: RenderStats,
}

fn render_chunk(
    video: &LyricVideo,
    range: FrameRange,
    rasterizer: &SvgRasterizer,
    threading: &RenderThreading,
    pool: Option<&rayon::ThreadPool>,
) -> LyricaResult<ChunkOut> {
    let descs = (range.start.0..range.end.0)
        .map(|f| video.describe_frame(FrameIndex(f)))
        .collect::<Vec<_>>();

    let mut unique = Vec::<usize>::with_capacity(descs.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(descs.len());
    for (idx, desc) in descs.iter().enumerate() {
        if threading.static_frame_elision
            && let Some(&last) = unique.last()
            && descs[last].same_picture(desc)
        {
            frame_to_unique.push(unique.len() - 1);
            continue;
        }
        frame_to_unique.push(unique.len());
        unique.push(idx);
    }

    let rendered = match pool {
        Some(pool) => pool.install(|| {
            unique
                .par_iter()
                .map(|&i| rasterizer.render(&descs[i]))
                .collect::<Vec<_>>()
        }),
        None => unique
            .iter()
            .map(|&i| rasterizer.render(&descs[i]))
            .collect::<Vec<_>>(),
    };
    let unique_frames = rendered.into_iter().collect::<LyricaResult<Vec<_>>>()?;

    let total = descs.len() as u64;
    let rendered_count = unique_frames.len() as u64;
    Ok(ChunkOut {
        unique_frames,
        frame_to_unique,
        stats: RenderStats {
            frames_total: total,
            frames_rendered: rendered_count,
            frames_elided: total.saturating_sub(rendered_count),
        },
    })
}

fn build_thread_pool(threads: Option<usize>) -> LyricaResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LyricaError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LyricaError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
