use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::assets::media::is_on_path;
use crate::encode::sink::{FrameSink, SinkConfig, ensure_parent_dir};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{LyricaError, LyricaResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Color that transparent pixels are flattened onto; the video has no alpha.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    /// Options writing an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::rgb(0, 0, 0),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to its stdin.
///
/// Video is H.264 `yuv420p`; an audio track from `SinkConfig.audio` is encoded to AAC and the
/// output is cut to the shorter of the two streams.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
}

/// A running `ffmpeg` process and the frame buffer fed to it.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    log: JoinHandle<String>,
    cfg: SinkConfig,
    opaque: Vec<u8>,
    last: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Sink that encodes to `opts.out_path`; nothing runs until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    #[tracing::instrument(skip_all, fields(out = %self.opts.out_path.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> LyricaResult<()> {
        check_output(&self.opts, &cfg)?;
        if !is_ffmpeg_on_path() {
            return Err(LyricaError::encode(
                "ffmpeg not found on PATH; install it or render with --png-sequence",
            ));
        }
        self.encoder = Some(Encoder::start(&self.opts, cfg)?);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LyricaResult<()> {
        let enc = self
            .encoder
            .as_mut()
            .ok_or_else(|| LyricaError::encode("frame pushed to an ffmpeg sink that is not running"))?;
        enc.write(idx, frame, self.opts.background)
    }

    fn end(&mut self) -> LyricaResult<()> {
        let enc = self
            .encoder
            .take()
            .ok_or_else(|| LyricaError::encode("ffmpeg sink ended without being started"))?;
        enc.finish()?;
        tracing::debug!(out = %self.opts.out_path.display(), "mp4 written");
        Ok(())
    }
}

impl Encoder {
    fn start(opts: &FfmpegSinkOpts, cfg: SinkConfig) -> LyricaResult<Self> {
        let mut child = build_command(opts, &cfg)
            .spawn()
            .map_err(|e| LyricaError::encode(format!("could not start ffmpeg: {e}")))?;
        let (Some(stdin), Some(stderr)) = (child.stdin.take(), child.stderr.take()) else {
            return Err(LyricaError::encode("ffmpeg started without piped stdio"));
        };
        // ffmpeg blocks once its stderr pipe fills, so read it for the whole run.
        let log = std::thread::spawn(move || std::io::read_to_string(stderr).unwrap_or_default());

        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            audio = cfg.audio.is_some(),
            "ffmpeg started"
        );
        let opaque = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        Ok(Self {
            child,
            stdin,
            log,
            cfg,
            opaque,
            last: None,
        })
    }

    fn write(&mut self, idx: FrameIndex, frame: &FrameRGBA, background: Rgba8) -> LyricaResult<()> {
        if self.last.is_some_and(|last| idx <= last) {
            return Err(LyricaError::encode(format!(
                "frame {} arrived after frame {}",
                idx.0,
                self.last.map_or(0, |l| l.0)
            )));
        }
        if (frame.width, frame.height) != (self.cfg.width, self.cfg.height)
            || frame.data.len() != self.opaque.len()
        {
            return Err(LyricaError::validation(format!(
                "frame size mismatch: {}x{} frame for a {}x{} video",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        self.last = Some(idx);

        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.opaque, &frame.data, background)?;
        } else {
            self.opaque.copy_from_slice(&frame.data);
        }
        self.stdin
            .write_all(&self.opaque)
            .map_err(|e| LyricaError::encode(format!("ffmpeg stopped reading frames: {e}")))
    }

    fn finish(self) -> LyricaResult<()> {
        let Self {
            mut child,
            stdin,
            log,
            ..
        } = self;
        // Closing stdin is the end-of-stream signal.
        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| LyricaError::encode(format!("lost track of ffmpeg: {e}")))?;
        let log = log.join().unwrap_or_default();
        if status.success() {
            return Ok(());
        }
        Err(LyricaError::encode(format!(
            "ffmpeg failed ({status}): {}",
            log.trim()
        )))
    }
}

/// Reject configurations ffmpeg would fail on, before anything is spawned.
fn check_output(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> LyricaResult<()> {
    let (w, h) = (cfg.width, cfg.height);
    if w == 0 || h == 0 || !w.is_multiple_of(2) || !h.is_multiple_of(2) {
        return Err(LyricaError::validation(format!(
            "mp4 output needs a non-zero, even width and height for yuv420p, got {w}x{h}"
        )));
    }
    if let Some(audio) = &cfg.audio
        && !audio.path.is_file()
    {
        return Err(LyricaError::validation(format!(
            "audio track '{}' is not a file",
            audio.path.display()
        )));
    }
    ensure_parent_dir(&opts.out_path)?;
    if !opts.overwrite && opts.out_path.exists() {
        return Err(LyricaError::validation(format!(
            "'{}' exists and overwriting is off",
            opts.out_path.display()
        )));
    }
    Ok(())
}

fn build_command(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .arg(if opts.overwrite { "-y" } else { "-n" })
        .args(["-loglevel", "error"]);

    // Input 0: opaque RGBA frames on stdin; the rate must precede `-i`.
    cmd.args(["-f", "rawvideo", "-pix_fmt", "rgba"])
        .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
        .args(["-r", &format!("{}/{}", cfg.fps.num, cfg.fps.den)])
        .args(["-i", "pipe:0"]);

    match &cfg.audio {
        Some(audio) => {
            cmd.arg("-i")
                .arg(&audio.path)
                .args(["-map", "0:v:0", "-map", "1:a:0"])
                .args(["-c:a", "aac", "-b:a", "192k", "-shortest"]);
        }
        None => {
            cmd.arg("-an");
        }
    }

    cmd.args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .args(["-movflags", "+faststart"])
        .arg(&opts.out_path);
    cmd
}

/// Composite premultiplied RGBA onto an opaque background.
fn flatten_premul_over_bg(dst: &mut [u8], src_premul: &[u8], bg: Rgba8) -> LyricaResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(LyricaError::validation(format!(
            "cannot flatten {} premultiplied bytes into a {} byte buffer",
            src_premul.len(),
            dst.len()
        )));
    }

    let bg = [bg.r, bg.g, bg.b].map(u16::from);
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for (dc, (&sc, &bc)) in d.iter_mut().zip(s.iter().zip(&bg)) {
            *dc = (u16::from(sc) + mul_div255_u16(bc, inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_on_path("ffmpeg")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
