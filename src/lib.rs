//! Lyrica renders scrolling lyric videos.
//!
//! The core is a pure timeline engine: given timed lyric lines, a line height and an opacity
//! gradient, every query is a deterministic function of the presentation time `t`.
//!
//! - Load a [`LyricsDoc`] and a [`Theme`]
//! - Build a [`LyricVideo`] (engine + frame schedule)
//! - Describe or rasterize single frames, or stream a range into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Media probing and song input matching.
pub mod assets;
/// Frame description assembly.
pub mod compose;
/// Encoding sinks.
pub mod encode;
/// Per-instant engine queries.
pub mod eval;
/// Rasterization and the render driver.
pub mod render;
/// Transition scheduling.
pub mod schedule;
/// Theme configuration.
pub mod theme;
/// Lyric timeline model and input.
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8};
pub use crate::foundation::error::{LyricaError, LyricaResult};

pub use crate::assets::media::probe_duration_secs;
pub use crate::assets::resolve::{SongInputs, resolve_song};
pub use crate::compose::frame::{
    FrameDescription, LineDescription, assemble_frame, background_frame,
};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::eval::engine::{EngineConfig, ScrollEngine};
pub use crate::eval::highlight::{HighlightMode, HighlightState, HighlightToken};
pub use crate::eval::visibility::{LineRenderInfo, OpacityFalloff};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::pipeline::{
    FrameSchedule, LyricVideo, RenderStats, RenderThreading, render_frame, render_range,
};
pub use crate::render::raster::SvgRasterizer;
pub use crate::schedule::transitions::{PreRoll, Transition, TransitionSchedule};
pub use crate::theme::model::{LyricPosition, TextShadow, Theme};
pub use crate::timeline::lyrics::LyricsDoc;
pub use crate::timeline::model::{LyricLine, Timeline};
