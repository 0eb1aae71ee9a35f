use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lyrica::assets::resolve::{DEFAULT_INPUT_DIR, resolve_lyrics};
use lyrica::timeline::lyrics::PREVIEW_SECONDS;
use lyrica::{
    Canvas, FfmpegSink, FfmpegSinkOpts, Fps, FrameIndex, FrameRange, FrameSink, LyricPosition,
    LyricVideo, LyricsDoc, PngSequenceSink, RenderThreading, SvgRasterizer, Theme,
};

#[derive(Parser, Debug)]
#[command(name = "lyrica", version, about = "Render scrolling lyric videos")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print frame descriptions as JSON lines.
    Plan(PlanArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Song name: matches `<input-dir>/lyrics/<song>.json` and
    /// `<input-dir>/audio/<song>.{mp3,wav}`.
    #[arg(long)]
    song: Option<String>,

    /// Lyrics JSON (`title`, `artist`, `lyrics: [{time, text}]`); overrides the `--song` match.
    #[arg(long, required_unless_present = "song")]
    lyrics: Option<PathBuf>,

    /// Root of the `lyrics/` and `audio/` folders used by `--song`.
    #[arg(long, default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Theme JSON; built-in defaults when omitted.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Horizontal lyric position, overriding the theme.
    #[arg(long, value_parser = ["left", "center", "right"])]
    lyric_position: Option<String>,

    /// Output width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Total duration in seconds; defaults to the audio length, else the last line's end.
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Presentation time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    input: InputArgs,

    /// First second to describe.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Last second to describe (exclusive); defaults to the total duration.
    #[arg(long)]
    end: Option<f64>,

    /// Write JSON lines here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Audio track muxed into the MP4; also sets the duration when `--duration` is absent.
    /// Overrides the `--song` match.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Output path; defaults to `output/<song>.mp4`, or `output/<title>.mp4` without `--song`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write a PNG sequence into `--out` instead of an MP4.
    #[arg(long, default_value_t = false)]
    png_sequence: bool,

    /// Render only the first 30 seconds.
    #[arg(long, default_value_t = false)]
    preview: bool,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Reuse the previous frame when nothing on screen changed.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_theme(input: &InputArgs) -> anyhow::Result<Theme> {
    let mut theme = match &input.theme {
        Some(path) => Theme::from_path(path)?,
        None => Theme::default(),
    };
    if let Some(pos) = &input.lyric_position {
        theme.lyric_position = LyricPosition::parse(pos)?;
    }
    Ok(theme)
}

fn load_lyrics(input: &InputArgs) -> anyhow::Result<LyricsDoc> {
    let path = match (&input.lyrics, &input.song) {
        (Some(path), _) => path.clone(),
        (None, Some(song)) => resolve_lyrics(&input.input_dir, song)?,
        (None, None) => anyhow::bail!("provide either --song <name> or --lyrics <file>"),
    };
    Ok(LyricsDoc::from_path(&path)?)
}

/// End of the last line, `None` when the document has no lines.
fn lyrics_end(doc: &LyricsDoc) -> Option<f64> {
    doc.lines.iter().map(|l| l.end_time).reduce(f64::max)
}

fn build_video(
    input: &InputArgs,
    doc: &LyricsDoc,
    audio: Option<&Path>,
    lyrics_end: Option<f64>,
    cap: Option<f64>,
) -> anyhow::Result<LyricVideo> {
    let theme = load_theme(input)?;

    let mut duration = match (input.duration, audio, lyrics_end) {
        (Some(d), _, _) => d,
        (None, Some(path), _) => lyrica::probe_duration_secs(path)?,
        (None, None, Some(end)) => end,
        (None, None, None) => {
            anyhow::bail!("lyrics have no lines; pass --duration or --audio to size the video")
        }
    };
    if let Some(cap) = cap {
        duration = duration.min(cap);
    }

    let canvas = Canvas {
        width: input.width,
        height: input.height,
    };
    let fps = Fps::new(input.fps, 1)?;
    tracing::info!(
        title = %doc.title,
        artist = %doc.artist,
        lines = doc.lines.len(),
        fps = input.fps,
        duration,
        "loaded lyrics"
    );

    let video = LyricVideo::from_lyrics(doc, theme, canvas, fps, duration)?;
    Ok(match audio {
        Some(path) => video.with_audio(path),
        None => video,
    })
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let doc = load_lyrics(&args.input)?;
    let video = build_video(&args.input, &doc, None, lyrics_end(&doc), None)?;

    let rasterizer = SvgRasterizer::new();
    let frame = rasterizer.render(&video.describe_at(args.time))?;
    lyrica::encode::png::write_png(&args.out, &frame)?;
    tracing::info!(out = %args.out.display(), "frame written");
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let doc = load_lyrics(&args.input)?;
    let video = build_video(&args.input, &doc, None, lyrics_end(&doc), None)?;
    let schedule = video.schedule();
    let fps = schedule.fps();

    let start = fps.secs_to_frames_ceil(args.start.max(0.0));
    let end = args
        .end
        .map(|e| fps.secs_to_frames_ceil(e))
        .unwrap_or_else(|| schedule.frame_count())
        .min(schedule.frame_count());

    let mut w: Box<dyn std::io::Write> = match &args.out {
        Some(path) => {
            lyrica::encode::sink::ensure_parent_dir(path)?;
            let f = std::fs::File::create(path)
                .with_context(|| format!("create '{}'", path.display()))?;
            Box::new(std::io::BufWriter::new(f))
        }
        None => Box::new(std::io::BufWriter::new(std::io::stdout().lock())),
    };
    for f in start..end {
        serde_json::to_writer(&mut w, &video.describe_frame(FrameIndex(f)))
            .context("serialize frame description")?;
        w.write_all(b"\n").context("write frame description")?;
    }
    w.flush().context("flush frame descriptions")?;
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (mut doc, audio) = match &args.input.song {
        Some(song) => {
            let inputs = lyrica::resolve_song(
                &args.input.input_dir,
                song,
                args.input.lyrics.as_deref(),
                args.audio.as_deref(),
            )?;
            (LyricsDoc::from_path(&inputs.lyrics)?, Some(inputs.audio))
        }
        None => (load_lyrics(&args.input)?, args.audio.clone()),
    };
    let full_end = lyrics_end(&doc);
    let cap = if args.preview {
        doc.truncate_to(PREVIEW_SECONDS);
        Some(PREVIEW_SECONDS)
    } else {
        None
    };
    let video = build_video(&args.input, &doc, audio.as_deref(), full_end, cap)?;

    let out = args.out.clone().unwrap_or_else(|| {
        let stem = match &args.input.song {
            Some(song) => song.clone(),
            None => doc.title.replace(' ', "_"),
        };
        if args.png_sequence {
            PathBuf::from("output").join(stem)
        } else {
            PathBuf::from("output").join(format!("{stem}.mp4"))
        }
    });

    let mut sink: Box<dyn FrameSink> = if args.png_sequence {
        Box::new(PngSequenceSink::new(&out))
    } else {
        let mut opts = FfmpegSinkOpts::new(&out);
        opts.overwrite = args.overwrite;
        opts.background = video.theme().background_color;
        Box::new(FfmpegSink::new(opts))
    };

    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        static_frame_elision: args.static_frame_elision,
    };
    let range: FrameRange = video.schedule().full_range();
    let rasterizer = SvgRasterizer::new();

    let started = std::time::Instant::now();
    let stats = lyrica::render_range(&video, range, &rasterizer, &threading, sink.as_mut())?;
    tracing::info!(
        out = %out.display(),
        frames = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        secs = started.elapsed().as_secs_f64(),
        "render finished"
    );
    Ok(())
}
